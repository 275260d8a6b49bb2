//! # Plugins
//!
//! - `main.rs` - 메인 영역 커맨드, 빌드 확인, 페이지 이탈 가드
//! - `layout.rs` - 레이아웃 복원기 (`LAYOUT_RESTORER`)
//! - `router.rs` - URL 라우터 (`ROUTER`)
//! - `notfound.rs` - 찾을 수 없는 경로 알림
//! - `services.rs` - headless 팔레트/상태 저장소/파일 브라우저

pub mod build_check;
pub mod layout;
pub mod main;
pub mod notfound;
pub mod router;
pub mod services;

pub use build_check::{check_build, BuildOutcome};
