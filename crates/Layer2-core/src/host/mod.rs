//! # Host
//!
//! 호스트(브라우저 셸)가 제공하는 서비스.
//!
//! - `traits.rs` - Shell, Dialogs, Builder, Navigator 인터페이스
//! - `headless.rs` - 메모리 기반 구현 (CLI, 테스트)

mod headless;
mod traits;

pub use headless::{HeadlessHost, HeadlessShell, MemoryNavigator, ScriptedDialogs, StaticBuilder};
pub use traits::{
    BuildState, BuildStatus, Builder, ButtonKind, DialogButton, DialogOptions, DialogResult,
    Dialogs, DocumentMode, LayoutData, Navigator, Shell, ShellArea, UnloadGuard,
};

use std::sync::Arc;

/// 애플리케이션이 들고 있는 호스트 서비스 묶음
#[derive(Clone)]
pub struct HostServices {
    pub shell: Arc<dyn Shell>,
    pub dialogs: Arc<dyn Dialogs>,
    pub builder: Arc<dyn Builder>,
    pub navigator: Arc<dyn Navigator>,
}
