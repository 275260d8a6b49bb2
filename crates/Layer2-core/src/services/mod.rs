//! Services - 토큰으로 공유되는 기능 인터페이스
//!
//! - `palette.rs` - 커맨드 팔레트 (`COMMAND_PALETTE`)
//! - `state.rs` - 키-값 상태 저장소 (`STATE_DB`)
//! - `restorer.rs` - 레이아웃 저장/복원 (`LAYOUT_RESTORER`)

mod palette;
mod restorer;
mod state;

pub use palette::{CommandPalette, PaletteItem, PaletteModel};
pub use restorer::{LayoutRestorer, LAYOUT_STATE_KEY};
pub use state::{MemoryStateDb, StateDb};
