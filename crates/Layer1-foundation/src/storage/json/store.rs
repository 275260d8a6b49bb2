//! JSON 문서 저장소
//!
//! 키 하나가 디렉토리 안의 JSON 파일 하나에 대응한다. 키는 percent-encoding
//! 되어 파일명이 되므로 `layout-restorer:data` 같은 상태 키도 그대로 쓸 수
//! 있다 (`layout-restorer%3Adata.json`).
//!
//! 쓰기는 임시 파일에 기록한 뒤 rename 하므로, 중간에 중단되어도 이전
//! 문서가 남는다.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 글로벌 디렉토리 이름 (`<config_dir>/labshell`)
pub const GLOBAL_DIR_NAME: &str = "labshell";

/// 프로젝트 디렉토리 이름 (`<root>/.labshell`)
pub const PROJECT_DIR_NAME: &str = ".labshell";

const EXTENSION: &str = ".json";
const TEMP_SUFFIX: &str = ".tmp";

/// 문서가 놓이는 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreScope {
    /// 사용자 전체 (`<config_dir>/labshell`)
    Global,
    /// 프로젝트 루트 아래 (`<root>/.labshell`)
    Project(PathBuf),
    /// 지정한 디렉토리 그대로
    Dir(PathBuf),
}

/// 키 → JSON 파일 저장소
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// 범위에 해당하는 저장소
    pub fn open(scope: StoreScope) -> Result<Self> {
        let dir = match scope {
            StoreScope::Global => dirs::config_dir()
                .ok_or_else(|| Error::Config("no user config directory on this platform".into()))?
                .join(GLOBAL_DIR_NAME),
            StoreScope::Project(root) => root.join(PROJECT_DIR_NAME),
            StoreScope::Dir(dir) => dir,
        };
        Ok(Self { dir })
    }

    /// 지정한 디렉토리의 저장소
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 설정 병합 순서의 저장소들: 글로벌, 그 다음 현재 디렉토리 프로젝트
    ///
    /// 위치를 알 수 없는 범위는 건너뛴다.
    pub fn layered() -> Vec<Self> {
        let mut stores = Vec::with_capacity(2);
        match Self::open(StoreScope::Global) {
            Ok(store) => stores.push(store),
            Err(e) => debug!("Skipping global store: {}", e),
        }
        match std::env::current_dir() {
            Ok(cwd) => stores.push(Self::at(cwd.join(PROJECT_DIR_NAME))),
            Err(e) => warn!("Skipping project store: {}", e),
        }
        stores
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 키가 저장되는 파일 경로
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", urlencoding::encode(key), EXTENSION))
    }

    /// 문서 읽기 (없으면 None)
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Config(format!("{} is not valid: {}", path.display(), e)))
    }

    /// 문서 쓰기 (임시 파일 → rename)
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp = path.with_file_name(format!(
            "{}{}",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            TEMP_SUFFIX
        ));

        fs::write(&temp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&temp, &path)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// 문서 삭제 (있었으면 true)
    pub fn remove(&self, key: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// 저장된 키 목록 (정렬됨, 디렉토리가 없으면 빈 목록)
    pub fn keys(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            let Some(encoded) = name.strip_suffix(EXTENSION) else {
                continue;
            };
            match urlencoding::decode(encoded) {
                Ok(key) => keys.push(key.into_owned()),
                Err(e) => warn!("Ignoring {} in {}: {}", name, self.dir.display(), e),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
