//! # lab-foundation
//!
//! Foundation layer for LabShell:
//! - Error: 중앙 에러 타입 (`Error`, `Result`)
//! - Config: 페이지 설정 (PageConfig), 서버 모드 결정 (ServerSettings)
//! - Storage: JsonStore (키 → JSON 파일)
//! - Event: EventBus (호스트 시그널 + 레지스트리/라우터 이벤트)
//! - URL: 경로 조합/이스케이프 유틸리티

pub mod config;
pub mod error;
pub mod event;
pub mod storage;
pub mod url_ext;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{LaunchOptions, PageConfig, ServerSettings, PAGE_CONFIG_KEY};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{JsonStore, StoreScope};

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{EventBus, EventHandler, EventType, LabEvent};

// ============================================================================
// URL
// ============================================================================
pub use url_ext::{url_escape, url_join, url_unescape};
