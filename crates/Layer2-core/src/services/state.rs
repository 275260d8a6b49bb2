//! State DB - 재시작 사이에 유지되는 키-값 상태

use async_trait::async_trait;
use lab_foundation::{JsonStore, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

/// 키-값 상태 저장소
#[async_trait]
pub trait StateDb: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Option<Value>>;

    async fn save(&self, key: &str, value: Value) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// 메모리 상태 저장소
///
/// 영속화하면 키마다 `dir` 아래 JSON 파일 하나를 쓴다. 메모리가 원본이고
/// 파일은 저장/삭제 시점에 그 키만 갱신된다.
pub struct MemoryStateDb {
    values: RwLock<HashMap<String, Value>>,
    store: Option<JsonStore>,
}

impl MemoryStateDb {
    /// 프로세스 안에서만 유지되는 저장소
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// `dir`에 저장되는 저장소 (기존 키를 모두 불러옴)
    pub fn persistent(dir: impl AsRef<Path>) -> Result<Self> {
        let store = JsonStore::at(dir.as_ref());
        let mut values = HashMap::new();
        for key in store.keys()? {
            if let Some(value) = store.read::<Value>(&key)? {
                values.insert(key, value);
            }
        }
        debug!("Loaded {} state value(s) from {}", values.len(), store.dir().display());
        Ok(Self {
            values: RwLock::new(values),
            store: Some(store),
        })
    }
}

impl Default for MemoryStateDb {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateDb for MemoryStateDb {
    async fn fetch(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().await;
        if let Some(store) = &self.store {
            store.write(key, &value)?;
        }
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().await;
        if let Some(store) = &self.store {
            store.remove(key)?;
        }
        values.remove(key);
        Ok(())
    }
}
