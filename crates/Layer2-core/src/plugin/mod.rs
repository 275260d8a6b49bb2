//! # Plugin System
//!
//! 토큰 기반 플러그인 의존성 해결 및 활성화
//!
//! ## 개요
//!
//! 플러그인은 디스크립터로 선언된다:
//! - `requires`: 필요한 기능 토큰 (선언 순서대로 activate 함수에 전달)
//! - `provides`: 제공하는 기능 토큰 (토큰 하나당 제공자는 하나)
//! - `auto_start`: `activate_all` 대상 여부
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     PluginRegistry                       │
//! │  ┌──────────────┬──────────────┬──────────────────────┐  │
//! │  │ router       │ layout       │ main                 │  │
//! │  │ provides     │ requires     │ requires             │  │
//! │  │  ROUTER      │  STATE_DB    │  COMMAND_PALETTE     │  │
//! │  └──────────────┴──────────────┴──────────────────────┘  │
//! │          │ token -> provider        │ OnceCell per plugin │
//! │          ▼                          ▼                     │
//! │   activation plan (DFS)   →   activate fn (once)         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! const CLOCK: Token<dyn Clock> = Token::new("@demo/clock:IClock");
//!
//! registry.register(
//!     PluginDescriptor::new("@demo/clock:plugin")
//!         .provides(&CLOCK, |_app, _deps| async { Ok(Arc::new(SystemClock) as Arc<dyn Clock>) }),
//! )?;
//! registry.register(
//!     PluginDescriptor::new("@demo/status:plugin")
//!         .requires(&CLOCK)
//!         .auto_start(true)
//!         .activate(|_app, deps| async move {
//!             let clock = deps.get(&CLOCK)?;
//!             Ok(())
//!         }),
//! )?;
//!
//! let report = registry.activate_all().await;
//! ```

mod descriptor;
mod registry;
mod token;

pub use descriptor::{ActivateFn, ActivateFuture, PluginDescriptor};
pub use registry::{ActivationFailure, ActivationReport, PluginInfo, PluginRegistry, PluginStatus};
pub use token::{Capability, Dependencies, Token};
