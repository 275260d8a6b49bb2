//! Event System - 이벤트 발행/구독 시스템
//!
//! ```text
//! ┌──────────────┐   publish    ┌──────────────────────────────┐
//! │ Host Shell   │ ───────────▶ │          EventBus            │
//! │ Registry     │              │  handlers ─▶ CloseAllRefresh │
//! │ Router       │              │            ─▶ LayoutSaver    │
//! └──────────────┘              │  broadcast ─▶ subscribers    │
//!                               └──────────────────────────────┘
//! ```

mod bus;
mod types;

pub use bus::{EventBus, EventHandler};
pub use types::{EventType, LabEvent};
