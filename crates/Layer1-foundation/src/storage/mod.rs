//! Storage module for LabShell
//!
//! - `json`: 키마다 JSON 파일 하나 (페이지 설정, 영속 상태 DB)

mod json;

pub use json::{JsonStore, StoreScope, GLOBAL_DIR_NAME, PROJECT_DIR_NAME};
