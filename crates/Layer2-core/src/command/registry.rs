//! Command Registry - 커맨드 등록 및 실행

use futures::future::BoxFuture;
use futures::FutureExt;
use lab_foundation::{Error, Result};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// 커맨드 실행 future
pub type CommandFuture = BoxFuture<'static, Result<Value>>;

/// 커맨드 실행 함수
pub type ExecuteFn = Arc<dyn Fn(Value) -> CommandFuture + Send + Sync>;

/// 인자에 따라 결정되는 라벨
pub type LabelFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// 토글/표시/활성 여부 판정
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// ============================================================================
// CommandSpec
// ============================================================================

/// 커맨드 정의
#[derive(Clone)]
pub struct CommandSpec {
    execute: ExecuteFn,
    label: Option<LabelFn>,
    caption: String,
    is_toggled: Option<PredicateFn>,
    is_visible: Option<PredicateFn>,
    is_enabled: Option<PredicateFn>,
}

impl CommandSpec {
    /// 실행 함수로 커맨드 생성
    pub fn new<F, Fut>(execute: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self::from_fn(Arc::new(move |args: Value| -> CommandFuture { execute(args).boxed() }))
    }

    /// 결과 없이 항상 성공하는 커맨드 (`Value::Null` 반환)
    pub fn action<F, Fut>(action: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::from_fn(Arc::new(move |args: Value| -> CommandFuture {
            action(args).map(|()| Ok(Value::Null)).boxed()
        }))
    }

    fn from_fn(execute: ExecuteFn) -> Self {
        Self {
            execute,
            label: None,
            caption: String::new(),
            is_toggled: None,
            is_visible: None,
            is_enabled: None,
        }
    }

    /// 고정 라벨
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = Some(Arc::new(move |_: &Value| label.clone()));
        self
    }

    /// 인자에 따라 바뀌는 라벨
    pub fn with_dynamic_label<F>(mut self, label: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.label = Some(Arc::new(label));
        self
    }

    /// 설명 문구
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_toggled<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_toggled = Some(Arc::new(predicate));
        self
    }

    pub fn with_visible<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_visible = Some(Arc::new(predicate));
        self
    }

    pub fn with_enabled<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_enabled = Some(Arc::new(predicate));
        self
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("caption", &self.caption)
            .field("toggleable", &self.is_toggled.is_some())
            .finish()
    }
}

/// 커맨드 정보 (목록 출력용)
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub id: String,
    pub label: String,
    pub caption: String,
    pub toggled: bool,
    pub visible: bool,
    pub enabled: bool,
}

// ============================================================================
// CommandRegistry
// ============================================================================

/// 커맨드 레지스트리
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, CommandSpec>>,

    /// 커맨드 상태(라벨/토글 등) 변경 알림
    changed: broadcast::Sender<String>,
}

impl CommandRegistry {
    /// 빈 레지스트리 생성
    pub fn new() -> Self {
        let (changed, _) = broadcast::channel(64);
        Self {
            commands: RwLock::new(HashMap::new()),
            changed,
        }
    }

    /// 커맨드 등록
    pub fn add_command(&self, id: impl Into<String>, spec: CommandSpec) -> Result<()> {
        let id = id.into();
        let mut commands = self.commands.write();
        if commands.contains_key(&id) {
            warn!("Command {} is already registered", id);
            return Err(Error::DuplicateCommand(id));
        }
        debug!("Added command: {}", id);
        commands.insert(id, spec);
        Ok(())
    }

    /// 커맨드 제거
    pub fn remove_command(&self, id: &str) -> bool {
        self.commands.write().remove(id).is_some()
    }

    /// 커맨드 존재 여부
    pub fn has_command(&self, id: &str) -> bool {
        self.commands.read().contains_key(id)
    }

    /// 등록된 커맨드 ID (정렬됨)
    pub fn list_commands(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.commands.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// 커맨드 수
    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    /// 비어있는지 확인
    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    fn spec(&self, id: &str) -> Option<CommandSpec> {
        self.commands.read().get(id).cloned()
    }

    /// 커맨드 실행 시작
    ///
    /// 실행 함수는 이 호출 안에서 바로 불린다. 반환된 future는 나머지
    /// 작업이며, 호출 순서가 곧 실행 시작 순서다.
    pub fn start(&self, id: &str, args: Value) -> Result<CommandFuture> {
        let execute = self
            .commands
            .read()
            .get(id)
            .map(|spec| Arc::clone(&spec.execute))
            .ok_or_else(|| Error::CommandNotFound(id.to_string()))?;

        info!("Executing command: {}", id);
        Ok(execute(args))
    }

    /// 커맨드 실행
    pub async fn execute(&self, id: &str, args: Value) -> Result<Value> {
        self.start(id, args)?.await
    }

    /// 라벨 (없으면 빈 문자열)
    pub fn label(&self, id: &str, args: &Value) -> String {
        self.spec(id)
            .and_then(|spec| spec.label.map(|label| label(args)))
            .unwrap_or_default()
    }

    pub fn caption(&self, id: &str) -> String {
        self.spec(id).map(|spec| spec.caption).unwrap_or_default()
    }

    /// 토글 상태 (기본 false)
    pub fn is_toggled(&self, id: &str, args: &Value) -> bool {
        self.spec(id)
            .and_then(|spec| spec.is_toggled.map(|f| f(args)))
            .unwrap_or(false)
    }

    /// 표시 여부 (등록된 커맨드는 기본 true)
    pub fn is_visible(&self, id: &str, args: &Value) -> bool {
        self.spec(id)
            .map(|spec| spec.is_visible.map_or(true, |f| f(args)))
            .unwrap_or(false)
    }

    /// 활성 여부 (등록된 커맨드는 기본 true)
    pub fn is_enabled(&self, id: &str, args: &Value) -> bool {
        self.spec(id)
            .map(|spec| spec.is_enabled.map_or(true, |f| f(args)))
            .unwrap_or(false)
    }

    /// 모든 커맨드 정보 (정렬됨)
    pub fn describe(&self, args: &Value) -> Vec<CommandInfo> {
        self.list_commands()
            .into_iter()
            .map(|id| CommandInfo {
                label: self.label(&id, args),
                caption: self.caption(&id),
                toggled: self.is_toggled(&id, args),
                visible: self.is_visible(&id, args),
                enabled: self.is_enabled(&id, args),
                id,
            })
            .collect()
    }

    /// 커맨드 상태가 바뀌었음을 알림 (메뉴/팔레트 갱신용)
    pub fn notify_command_changed(&self, id: &str) {
        debug!("Command changed: {}", id);
        // 구독자가 없어도 OK
        let _ = self.changed.send(id.to_string());
    }

    /// 커맨드 변경 알림 구독
    pub fn subscribe_changes(&self) -> broadcast::Receiver<String> {
        self.changed.subscribe()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
