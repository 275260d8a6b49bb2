//! JSON 저장소 (키 → 파일)

mod store;

pub use store::{JsonStore, StoreScope, GLOBAL_DIR_NAME, PROJECT_DIR_NAME};
