//! Config - 설정 관리
//!
//! - `page.rs` - PageConfig (클라이언트 페이지 설정, JSON 파일)
//! - `server.rs` - ServerSettings (실행 모드 결정)

mod page;
mod server;

pub use page::{PageConfig, PAGE_CONFIG_KEY};
pub use server::{LaunchOptions, ServerSettings};
