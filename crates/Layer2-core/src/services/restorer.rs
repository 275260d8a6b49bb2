//! Layout Restorer - 셸 레이아웃을 상태 저장소에 저장/복원

use super::state::StateDb;
use crate::host::LayoutData;
use lab_foundation::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 레이아웃이 저장되는 상태 키
pub const LAYOUT_STATE_KEY: &str = "layout-restorer:data";

/// 레이아웃 복원기
pub struct LayoutRestorer {
    state: Arc<dyn StateDb>,
    key: String,
    saves: AtomicUsize,
}

impl LayoutRestorer {
    pub fn new(state: Arc<dyn StateDb>) -> Self {
        Self {
            state,
            key: LAYOUT_STATE_KEY.to_string(),
            saves: AtomicUsize::new(0),
        }
    }

    /// 다른 키 사용 (여러 워크스페이스)
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 저장된 레이아웃 조회
    pub async fn fetch(&self) -> Result<Option<LayoutData>> {
        self.state.fetch(&self.key).await
    }

    /// 레이아웃 저장
    pub async fn save(&self, layout: LayoutData) -> Result<()> {
        self.state.save(&self.key, layout).await?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!("Saved layout under {}", self.key);
        Ok(())
    }

    /// 지금까지 저장한 횟수
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}
