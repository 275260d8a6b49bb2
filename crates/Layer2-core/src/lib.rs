//! # lab-core
//!
//! LabShell 코어 런타임:
//! - Plugin: 토큰 기반 의존성 해결과 활성화 (`PluginRegistry`)
//! - Command: 이름으로 실행되는 커맨드 (`CommandRegistry`)
//! - Router: URL 패턴 → 커맨드 (`Router`)
//! - Host: 셸/다이얼로그/빌드/내비게이션 인터페이스와 headless 구현
//! - Services: 팔레트, 상태 저장소, 레이아웃 복원기
//! - Application: 위의 것들을 묶어 플러그인에 전달하는 핸들

pub mod app;
pub mod command;
pub mod host;
pub mod plugin;
pub mod router;
pub mod services;
pub mod tokens;

// ============================================================================
// Application
// ============================================================================
pub use app::{Application, WeakApplication};

// ============================================================================
// Plugin
// ============================================================================
pub use plugin::{
    ActivationFailure, ActivationReport, Capability, Dependencies, PluginDescriptor, PluginInfo,
    PluginRegistry, PluginStatus, Token,
};

// ============================================================================
// Command / Router
// ============================================================================
pub use command::{CommandInfo, CommandRegistry, CommandSpec};
pub use router::{RouteArgs, RouteDispatch, RouteOutcome, Router};

// ============================================================================
// Host / Services
// ============================================================================
pub use host::{
    BuildState, BuildStatus, Builder, DialogButton, DialogOptions, DialogResult, Dialogs,
    DocumentMode, HeadlessHost, HostServices, LayoutData, Navigator, Shell, ShellArea,
};
pub use services::{
    CommandPalette, LayoutRestorer, MemoryStateDb, PaletteItem, PaletteModel, StateDb,
    LAYOUT_STATE_KEY,
};
pub use tokens::{COMMAND_PALETTE, LAYOUT_RESTORER, ROUTER, STATE_DB};

// Re-export foundation
pub use lab_foundation::{Error, EventBus, EventType, LabEvent, PageConfig, Result};
