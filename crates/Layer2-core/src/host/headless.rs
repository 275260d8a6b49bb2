//! Headless host - 메모리 기반 호스트 구현
//!
//! 브라우저 없이 셸을 부팅할 때(CLI, 테스트) 사용한다. 각 구현은 받은
//! 호출을 기록해 두므로 동작을 그대로 검사할 수 있다.

use super::traits::{
    BuildState, BuildStatus, Builder, DialogButton, DialogOptions, DialogResult, Dialogs,
    DocumentMode, LayoutData, Navigator, Shell, ShellArea, UnloadGuard,
};
use async_trait::async_trait;
use lab_foundation::{Error, EventBus, EventType, LabEvent, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

// ============================================================================
// HeadlessShell
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SideArea {
    widgets: Vec<String>,
    collapsed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShellState {
    main: Vec<String>,
    current: Option<usize>,
    left: SideArea,
    right: SideArea,
    mode: DocumentMode,
}

impl ShellState {
    fn side(&self, area: ShellArea) -> Option<&SideArea> {
        match area {
            ShellArea::Left => Some(&self.left),
            ShellArea::Right => Some(&self.right),
            ShellArea::Main => None,
        }
    }

    fn side_mut(&mut self, area: ShellArea) -> Option<&mut SideArea> {
        match area {
            ShellArea::Left => Some(&mut self.left),
            ShellArea::Right => Some(&mut self.right),
            ShellArea::Main => None,
        }
    }

    fn current_widget(&self) -> Option<String> {
        self.current.and_then(|i| self.main.get(i).cloned())
    }
}

/// 위젯 id 목록만으로 레이아웃을 흉내내는 셸
pub struct HeadlessShell {
    events: Arc<EventBus>,
    state: Mutex<ShellState>,
}

impl HeadlessShell {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            events,
            state: Mutex::new(ShellState::default()),
        }
    }

    /// 위젯 추가 (메인 영역이면 현재 위젯이 됨)
    pub async fn add_widget(&self, area: ShellArea, id: impl Into<String>) {
        let id = id.into();
        let current_changed = {
            let mut state = self.state.lock();
            match state.side_mut(area) {
                Some(side) => {
                    side.widgets.push(id.clone());
                    false
                }
                None => {
                    state.main.push(id.clone());
                    state.current = Some(state.main.len() - 1);
                    true
                }
            }
        };
        debug!("Added widget {} to {} area", id, area);

        if current_changed {
            self.current_changed().await;
        }
        self.layout_modified().await;
    }

    /// 영역의 위젯 목록
    pub fn widgets(&self, area: ShellArea) -> Vec<String> {
        let state = self.state.lock();
        match state.side(area) {
            Some(side) => side.widgets.clone(),
            None => state.main.clone(),
        }
    }

    /// 메인 영역의 현재 위젯
    pub fn current_widget(&self) -> Option<String> {
        self.state.lock().current_widget()
    }

    async fn current_changed(&self) {
        let current = self.current_widget();
        self.events
            .publish(LabEvent::new(
                EventType::CurrentChanged,
                json!({ "current": current }),
                "shell",
            ))
            .await;
    }

    async fn layout_modified(&self) {
        self.events
            .publish(LabEvent::simple(EventType::LayoutModified, "shell"))
            .await;
    }

    /// 현재 탭을 offset만큼 이동
    async fn cycle_tab(&self, forward: bool) {
        let moved = {
            let mut state = self.state.lock();
            let len = state.main.len();
            match state.current {
                Some(current) if len > 1 => {
                    let next = if forward {
                        (current + 1) % len
                    } else {
                        (current + len - 1) % len
                    };
                    state.current = Some(next);
                    true
                }
                _ => false,
            }
        };
        if moved {
            self.current_changed().await;
            self.layout_modified().await;
        }
    }

    async fn set_collapsed(&self, area: ShellArea, collapsed: bool) {
        let changed = {
            let mut state = self.state.lock();
            match state.side_mut(area) {
                Some(side) if side.collapsed != collapsed => {
                    side.collapsed = collapsed;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.layout_modified().await;
        }
    }
}

#[async_trait]
impl Shell for HeadlessShell {
    async fn activate_next_tab(&self) {
        self.cycle_tab(true).await;
    }

    async fn activate_previous_tab(&self) {
        self.cycle_tab(false).await;
    }

    async fn close_all(&self) {
        let closed = {
            let mut state = self.state.lock();
            let closed = state.main.len();
            state.main.clear();
            state.current = None;
            closed
        };
        if closed > 0 {
            info!("Closed {} widget(s) in main area", closed);
            self.current_changed().await;
            self.layout_modified().await;
        }
    }

    fn is_collapsed(&self, area: ShellArea) -> bool {
        self.state
            .lock()
            .side(area)
            .map(|side| side.collapsed)
            .unwrap_or(false)
    }

    async fn expand(&self, area: ShellArea) {
        self.set_collapsed(area, false).await;
    }

    async fn collapse(&self, area: ShellArea) {
        self.set_collapsed(area, true).await;
    }

    fn is_empty(&self, area: ShellArea) -> bool {
        let state = self.state.lock();
        match state.side(area) {
            Some(side) => side.widgets.is_empty(),
            None => state.main.is_empty(),
        }
    }

    fn mode(&self) -> DocumentMode {
        self.state.lock().mode
    }

    async fn set_mode(&self, mode: DocumentMode) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.mode != mode;
            state.mode = mode;
            changed
        };
        if changed {
            debug!("Shell mode set to {}", mode);
            self.layout_modified().await;
        }
    }

    fn save_layout(&self) -> LayoutData {
        serde_json::to_value(&*self.state.lock()).unwrap_or_default()
    }

    async fn restore_layout(&self, layout: Option<LayoutData>) {
        let Some(layout) = layout else {
            debug!("No saved layout, using defaults");
            return;
        };
        match serde_json::from_value::<ShellState>(layout) {
            Ok(restored) => {
                *self.state.lock() = restored;
                info!("Restored shell layout");
            }
            Err(e) => warn!("Ignoring unreadable saved layout: {}", e),
        }
    }
}

// ============================================================================
// ScriptedDialogs
// ============================================================================

/// 미리 정한 답(수락/거절)으로 응답하는 다이얼로그
pub struct ScriptedDialogs {
    accept: AtomicBool,
    shown: Mutex<Vec<DialogOptions>>,
    notify: Notify,
}

impl ScriptedDialogs {
    /// 모든 다이얼로그를 거절하는 구현
    pub fn new() -> Self {
        Self {
            accept: AtomicBool::new(false),
            shown: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }

    /// 모든 다이얼로그를 수락하는 구현
    pub fn accepting() -> Self {
        let dialogs = Self::new();
        dialogs.set_accept(true);
        dialogs
    }

    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    /// 지금까지 표시된 다이얼로그
    pub fn shown(&self) -> Vec<DialogOptions> {
        self.shown.lock().clone()
    }

    /// 다이얼로그가 `count`개 이상 표시될 때까지 대기
    pub async fn wait_for(&self, count: usize) {
        loop {
            let notified = self.notify.notified();
            if self.shown.lock().len() >= count {
                return;
            }
            notified.await;
        }
    }

    fn choose(&self, buttons: &[DialogButton]) -> DialogButton {
        let accept = self.accept.load(Ordering::SeqCst);
        buttons
            .iter()
            .find(|b| b.accept == accept)
            .or_else(|| buttons.first())
            .cloned()
            .unwrap_or_else(DialogButton::cancel)
    }
}

impl Default for ScriptedDialogs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn show_dialog(&self, options: DialogOptions) -> DialogResult {
        info!("Dialog: {} - {}", options.title, options.body);
        let button = self.choose(&options.buttons);
        self.shown.lock().push(options);
        self.notify.notify_waiters();
        DialogResult { button }
    }
}

// ============================================================================
// StaticBuilder
// ============================================================================

/// 고정된 상태를 보고하는 빌드 관리자
pub struct StaticBuilder {
    available: bool,
    should_check: bool,
    status: Mutex<BuildStatus>,
    build_error: Mutex<Option<String>>,
    builds: AtomicUsize,
}

impl StaticBuilder {
    pub fn new(available: bool, should_check: bool) -> Self {
        Self {
            available,
            should_check,
            status: Mutex::new(BuildStatus {
                status: BuildState::Stable,
                message: String::new(),
            }),
            build_error: Mutex::new(None),
            builds: AtomicUsize::new(0),
        }
    }

    /// 빌드를 지원하지 않는 서버
    pub fn unavailable() -> Self {
        Self::new(false, false)
    }

    /// 보고할 상태 지정
    pub fn with_status(self, status: BuildState, message: impl Into<String>) -> Self {
        *self.status.lock() = BuildStatus {
            status,
            message: message.into(),
        };
        self
    }

    /// 빌드가 실패하도록 지정
    pub fn failing_with(self, message: impl Into<String>) -> Self {
        *self.build_error.lock() = Some(message.into());
        self
    }

    /// 실행된 빌드 수
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Builder for StaticBuilder {
    fn is_available(&self) -> bool {
        self.available
    }

    fn should_check(&self) -> bool {
        self.should_check
    }

    async fn get_status(&self) -> Result<BuildStatus> {
        Ok(self.status.lock().clone())
    }

    async fn build(&self) -> Result<()> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.build_error.lock().clone() {
            return Err(Error::Build(message));
        }
        self.status.lock().status = BuildState::Stable;
        info!("Build completed");
        Ok(())
    }
}

// ============================================================================
// MemoryNavigator
// ============================================================================

/// URL 변경과 새로고침을 기록하는 내비게이터
pub struct MemoryNavigator {
    location: Mutex<String>,
    replaced: Mutex<Vec<String>>,
    reloads: AtomicUsize,
    guards: Mutex<Vec<UnloadGuard>>,
}

impl MemoryNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Mutex::new(location.into()),
            replaced: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
            guards: Mutex::new(Vec::new()),
        }
    }

    /// `replace_state`로 교체된 URL 목록
    pub fn replaced(&self) -> Vec<String> {
        self.replaced.lock().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    /// 현재 URL 변경 (사용자가 주소를 입력한 것처럼)
    pub fn set_location(&self, url: impl Into<String>) {
        *self.location.lock() = url.into();
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        self.location.lock().clone()
    }

    fn replace_state(&self, url: &str) {
        debug!("Replacing location with {}", url);
        *self.location.lock() = url.to_string();
        self.replaced.lock().push(url.to_string());
    }

    fn reload(&self) {
        info!("Reloading page");
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn set_unload_guard(&self, guard: UnloadGuard) {
        self.guards.lock().push(guard);
    }

    fn before_unload(&self) -> Option<String> {
        let guards: Vec<UnloadGuard> = self.guards.lock().clone();
        guards.iter().find_map(|guard| guard())
    }
}

// ============================================================================
// HeadlessHost
// ============================================================================

/// headless 호스트 구현 묶음 (구체 타입 유지)
#[derive(Clone)]
pub struct HeadlessHost {
    pub shell: Arc<HeadlessShell>,
    pub dialogs: Arc<ScriptedDialogs>,
    pub builder: Arc<StaticBuilder>,
    pub navigator: Arc<MemoryNavigator>,
}

impl HeadlessHost {
    /// 기본 구성: 빌드 미지원, 다이얼로그 거절, 위치는 `location`
    pub fn new(events: Arc<EventBus>, location: impl Into<String>) -> Self {
        Self {
            shell: Arc::new(HeadlessShell::new(events)),
            dialogs: Arc::new(ScriptedDialogs::new()),
            builder: Arc::new(StaticBuilder::unavailable()),
            navigator: Arc::new(MemoryNavigator::new(location)),
        }
    }

    pub fn with_dialogs(mut self, dialogs: ScriptedDialogs) -> Self {
        self.dialogs = Arc::new(dialogs);
        self
    }

    pub fn with_builder(mut self, builder: StaticBuilder) -> Self {
        self.builder = Arc::new(builder);
        self
    }

    /// 트레이트 객체 묶음으로 변환
    pub fn services(&self) -> super::HostServices {
        super::HostServices {
            shell: self.shell.clone(),
            dialogs: self.dialogs.clone(),
            builder: self.builder.clone(),
            navigator: self.navigator.clone(),
        }
    }
}
