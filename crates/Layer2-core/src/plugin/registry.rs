//! Plugin Registry - 플러그인 저장소 및 활성화
//!
//! ## 활성화 절차
//!
//! 1. **계획**: 요청된 플러그인부터 `requires`를 따라 깊이 우선으로 내려가며
//!    활성화 순서(의존성 먼저)를 만든다. 이 단계에서 누락된 제공자와 순환
//!    의존성이 검출되며, 오류가 있으면 어떤 activate 함수도 실행되지 않는다.
//! 2. **실행**: 계획된 순서대로 각 플러그인을 활성화한다. 플러그인마다
//!    `OnceCell`이 있어 동시에 요청되어도 activate 함수는 한 번만 실행된다.
//!
//! 실패한 플러그인은 다시 시도하지 않는다. 이후 요청은 기록된 원인과 함께
//! 같은 에러를 돌려받는다.

use super::descriptor::PluginDescriptor;
use super::token::{Capability, Dependencies, Token};
use crate::app::Application;
use lab_foundation::{Error, EventType, LabEvent, Result};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

// ============================================================================
// PluginStatus
// ============================================================================

/// 플러그인 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// 등록됨 (아직 활성화 안됨)
    Registered,

    /// activate 함수 실행 중
    Activating,

    /// 활성화됨
    Active,

    /// activate 함수가 실패함 (재시도 없음)
    Failed,
}

impl fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Activating => write!(f, "activating"),
            Self::Active => write!(f, "active"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// ============================================================================
// PluginInfo / ActivationReport
// ============================================================================

/// 플러그인 정보 (조회용 스냅샷)
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub id: String,
    pub description: String,
    pub requires: Vec<String>,
    pub provides: Option<String>,
    pub auto_start: bool,
    pub status: PluginStatus,
    /// 실패 원인 (Failed 상태일 때)
    pub failure: Option<String>,
    /// 등록 순서
    pub load_order: usize,
}

/// 루트 하나의 활성화 실패
#[derive(Debug)]
pub struct ActivationFailure {
    pub plugin_id: String,
    pub error: Error,
}

/// `activate_all` 결과
#[derive(Debug, Default)]
pub struct ActivationReport {
    /// 활성화에 성공한 자동 시작 플러그인 (등록 순서)
    pub activated: Vec<String>,

    /// 실패한 자동 시작 플러그인
    pub failures: Vec<ActivationFailure>,
}

impl ActivationReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.plugin_id.as_str()).collect()
    }
}

// ============================================================================
// PluginEntry - 내부 저장 단위
// ============================================================================

struct PluginEntry {
    descriptor: PluginDescriptor,
    load_order: usize,
    /// 활성화 결과 (성공 시에만 채워짐)
    instance: OnceCell<Option<Capability>>,
    state: Mutex<EntryState>,
}

struct EntryState {
    status: PluginStatus,
    failure: Option<String>,
}

impl PluginEntry {
    fn new(descriptor: PluginDescriptor, load_order: usize) -> Self {
        Self {
            descriptor,
            load_order,
            instance: OnceCell::new(),
            state: Mutex::new(EntryState {
                status: PluginStatus::Registered,
                failure: None,
            }),
        }
    }

    fn id(&self) -> &str {
        self.descriptor.id()
    }

    fn status(&self) -> PluginStatus {
        self.state.lock().status
    }

    fn failure(&self) -> Option<String> {
        self.state.lock().failure.clone()
    }

    fn set_status(&self, status: PluginStatus) {
        self.state.lock().status = status;
        debug!("Set plugin {} status to {}", self.id(), status);
    }

    fn fail(&self, cause: String) {
        let mut state = self.state.lock();
        state.status = PluginStatus::Failed;
        state.failure = Some(cause);
    }

    fn info(&self) -> PluginInfo {
        let state = self.state.lock();
        PluginInfo {
            id: self.id().to_string(),
            description: self.descriptor.description().to_string(),
            requires: self
                .descriptor
                .required_tokens()
                .iter()
                .map(|t| t.to_string())
                .collect(),
            provides: self.descriptor.provided_token().map(str::to_string),
            auto_start: self.descriptor.is_auto_start(),
            status: state.status,
            failure: state.failure.clone(),
            load_order: self.load_order,
        }
    }
}

// ============================================================================
// PluginRegistry
// ============================================================================

#[derive(Default)]
struct RegistryState {
    /// 플러그인 저장소 (ID -> Entry)
    plugins: HashMap<String, Arc<PluginEntry>>,

    /// 토큰 이름 -> 제공 플러그인 ID
    providers: HashMap<&'static str, String>,

    /// 등록 순서
    order: Vec<String>,
}

/// 플러그인 레지스트리 - 등록, 의존성 해결, 활성화
pub struct PluginRegistry {
    app: Application,
    state: RwLock<RegistryState>,
}

impl PluginRegistry {
    /// 새 레지스트리 생성
    pub fn new(app: Application) -> Self {
        Self {
            app,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// 레지스트리가 activate 함수에 넘겨주는 애플리케이션
    pub fn app(&self) -> &Application {
        &self.app
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 플러그인 등록
    ///
    /// 같은 id나 같은 토큰 제공자가 이미 있으면 거부되며 레지스트리는
    /// 변경되지 않는다.
    pub fn register(&self, descriptor: PluginDescriptor) -> Result<()> {
        let id = descriptor.id().to_string();
        let mut state = self.state.write();

        if state.plugins.contains_key(&id) {
            warn!("Plugin {} is already registered", id);
            return Err(Error::DuplicateId(id));
        }

        if let Some(token) = descriptor.provided_token() {
            if let Some(existing) = state.providers.get(token) {
                warn!("Capability {} is already provided by {}", token, existing);
                return Err(Error::DuplicateProvider {
                    token: token.to_string(),
                    existing: existing.clone(),
                    rejected: id,
                });
            }
            state.providers.insert(token, id.clone());
        }

        let load_order = state.order.len();
        state.order.push(id.clone());
        state
            .plugins
            .insert(id.clone(), Arc::new(PluginEntry::new(descriptor, load_order)));

        info!("Registered plugin: {}", id);
        Ok(())
    }

    /// 여러 플러그인 등록 (첫 에러에서 중단)
    pub fn register_all(&self, descriptors: impl IntoIterator<Item = PluginDescriptor>) -> Result<()> {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    // ========================================================================
    // 활성화
    // ========================================================================

    /// 플러그인과 그 의존성을 활성화
    ///
    /// 이미 활성화된 플러그인은 저장된 인스턴스를 그대로 돌려준다.
    pub async fn activate(&self, id: &str) -> Result<Option<Capability>> {
        let plan = self.plan(id)?;
        debug!(
            "Activation plan for {}: [{}]",
            id,
            plan.iter().map(|e| e.id()).collect::<Vec<_>>().join(", ")
        );

        for entry in &plan {
            if let Err(e) = self.activate_entry(entry).await {
                if entry.id() == id {
                    return Err(e);
                }
                let cause = format!("dependency {} failed: {}", entry.id(), e);
                warn!("Plugin {} cannot activate: {}", id, cause);
                return Err(Error::activation(id, cause));
            }
        }

        let entry = self.entry(id)?;
        Ok(entry.instance.get().cloned().flatten())
    }

    /// 모든 자동 시작 플러그인 활성화
    ///
    /// 한 루트의 실패는 기록만 하고 나머지 루트는 계속 진행한다.
    pub async fn activate_all(&self) -> ActivationReport {
        let roots: Vec<String> = {
            let state = self.state.read();
            state
                .order
                .iter()
                .filter(|id| {
                    state
                        .plugins
                        .get(*id)
                        .is_some_and(|e| e.descriptor.is_auto_start())
                })
                .cloned()
                .collect()
        };

        let mut report = ActivationReport::default();
        for id in roots {
            match self.activate(&id).await {
                Ok(_) => report.activated.push(id),
                Err(e) => {
                    error!("Failed to activate plugin {}: {}", id, e);
                    report.failures.push(ActivationFailure {
                        plugin_id: id,
                        error: e,
                    });
                }
            }
        }

        info!(
            "Activated {} plugin(s), {} failure(s)",
            report.activated.len(),
            report.failures.len()
        );
        report
    }

    /// 토큰의 제공자를 (필요하면) 활성화하고 인스턴스 반환
    pub async fn resolve<T: ?Sized + Send + Sync + 'static>(&self, token: &Token<T>) -> Result<Arc<T>> {
        let provider = self
            .provider_of(token.name())
            .ok_or_else(|| Error::NotFound(format!("no plugin provides {}", token.name())))?;
        let capability = self.activate(&provider).await?.ok_or_else(|| {
            Error::Internal(format!("{} activated without an instance", provider))
        })?;
        token.unwrap(&capability)
    }

    /// 활성화 계획 (의존성 먼저, 요청된 플러그인이 마지막)
    fn plan(&self, id: &str) -> Result<Vec<Arc<PluginEntry>>> {
        let state = self.state.read();
        let mut order = Vec::new();
        let mut stack = Vec::new();
        let mut visited = HashSet::new();
        Self::visit(&state, id, &mut stack, &mut visited, &mut order)?;
        Ok(order)
    }

    fn visit(
        state: &RegistryState,
        id: &str,
        stack: &mut Vec<String>,
        visited: &mut HashSet<String>,
        order: &mut Vec<Arc<PluginEntry>>,
    ) -> Result<()> {
        if let Some(pos) = stack.iter().position(|s| s == id) {
            let mut path = stack[pos..].to_vec();
            path.push(id.to_string());
            return Err(Error::CyclicDependency { path });
        }
        if visited.contains(id) {
            return Ok(());
        }

        let entry = state
            .plugins
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownPlugin(id.to_string()))?;

        // 활성화된 플러그인의 의존성은 이미 모두 활성화되어 있다
        if entry.status() != PluginStatus::Active {
            stack.push(id.to_string());
            for token in entry.descriptor.required_tokens() {
                let provider = state
                    .providers
                    .get(token)
                    .ok_or_else(|| Error::missing_dependency(id, *token))?;
                Self::visit(state, provider, stack, visited, order)?;
            }
            stack.pop();
            order.push(entry);
        }

        visited.insert(id.to_string());
        Ok(())
    }

    /// 플러그인 하나 활성화 (의존성은 이미 활성화된 상태여야 함)
    async fn activate_entry(&self, entry: &Arc<PluginEntry>) -> Result<()> {
        entry
            .instance
            .get_or_try_init(|| async {
                let id = entry.id();
                if let Some(cause) = entry.failure() {
                    return Err(Error::activation(id, cause));
                }

                let deps = self.dependencies_of(entry)?;
                entry.set_status(PluginStatus::Activating);
                info!("Activating plugin: {}", id);

                let activate = entry.descriptor.activate_fn();
                match activate(self.app.clone(), deps).await {
                    Ok(instance) => {
                        entry.set_status(PluginStatus::Active);
                        self.app
                            .events()
                            .publish(LabEvent::plugin(EventType::PluginActivated, id))
                            .await;
                        Ok(instance)
                    }
                    Err(e) => {
                        let cause = e.to_string();
                        error!("Plugin {} failed to activate: {}", id, cause);
                        entry.fail(cause.clone());
                        self.app
                            .events()
                            .publish(LabEvent::new(
                                EventType::PluginFailed,
                                json!({ "plugin_id": id, "error": cause }),
                                "plugin_registry",
                            ))
                            .await;
                        Err(Error::activation(id, cause))
                    }
                }
            })
            .await
            .map(|_| ())
    }

    /// `requires` 선언 순서대로 제공자 인스턴스 수집
    fn dependencies_of(&self, entry: &PluginEntry) -> Result<Dependencies> {
        let state = self.state.read();
        let mut resolved = Vec::with_capacity(entry.descriptor.required_tokens().len());

        for token in entry.descriptor.required_tokens() {
            let instance = state
                .providers
                .get(token)
                .and_then(|provider| state.plugins.get(provider))
                .and_then(|provider| provider.instance.get().cloned().flatten())
                .ok_or_else(|| Error::missing_dependency(entry.id(), *token))?;
            resolved.push((*token, instance));
        }

        Ok(Dependencies::new(resolved))
    }

    // ========================================================================
    // 조회
    // ========================================================================

    fn entry(&self, id: &str) -> Result<Arc<PluginEntry>> {
        self.state
            .read()
            .plugins
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownPlugin(id.to_string()))
    }

    /// 활성화된 제공자의 인스턴스 조회 (활성화를 일으키지 않음)
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, token: &Token<T>) -> Option<Arc<T>> {
        let provider = self.provider_of(token.name())?;
        let entry = self.entry(&provider).ok()?;
        let capability = entry.instance.get().cloned().flatten()?;
        token.unwrap(&capability).ok()
    }

    /// 토큰을 제공하는 플러그인 ID
    pub fn provider_of(&self, token: &str) -> Option<String> {
        self.state.read().providers.get(token).cloned()
    }

    /// 플러그인 상태 조회
    pub fn status(&self, id: &str) -> Option<PluginStatus> {
        self.entry(id).ok().map(|e| e.status())
    }

    /// 플러그인 정보 조회
    pub fn info(&self, id: &str) -> Option<PluginInfo> {
        self.entry(id).ok().map(|e| e.info())
    }

    /// 모든 플러그인 정보 (등록 순서대로)
    pub fn list(&self) -> Vec<PluginInfo> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|id| state.plugins.get(id))
            .map(|e| e.info())
            .collect()
    }

    /// 등록 순서대로 정렬된 플러그인 ID 목록
    pub fn load_order(&self) -> Vec<String> {
        self.state.read().order.clone()
    }

    /// 플러그인 존재 여부 확인
    pub fn contains(&self, id: &str) -> bool {
        self.state.read().plugins.contains_key(id)
    }

    /// 플러그인 수
    pub fn len(&self) -> usize {
        self.state.read().plugins.len()
    }

    /// 비어있는지 확인
    pub fn is_empty(&self) -> bool {
        self.state.read().plugins.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PluginRegistry")
            .field("plugins", &state.order)
            .field("providers", &state.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Application;
    use lab_foundation::PageConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const A: Token<String> = Token::new("test:A");
    const B: Token<String> = Token::new("test:B");
    const C: Token<String> = Token::new("test:C");

    fn registry() -> PluginRegistry {
        let (app, _host) = Application::headless(PageConfig::default());
        PluginRegistry::new(app)
    }

    /// 호출 횟수를 세면서 토큰을 제공하는 플러그인
    fn counting_provider(
        id: &str,
        token: &Token<String>,
        value: &str,
        calls: Arc<AtomicUsize>,
    ) -> PluginDescriptor {
        let value = value.to_string();
        PluginDescriptor::new(id).provides(token, move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            let value = value.clone();
            async move { Ok::<_, Error>(Arc::new(value)) }
        })
    }

    #[tokio::test]
    async fn test_register_and_duplicate_id() {
        let registry = registry();
        registry.register(PluginDescriptor::new("p")).unwrap();

        let err = registry.register(PluginDescriptor::new("p")).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "p"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_provider_rejected() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry
            .register(counting_provider("first", &A, "1", calls.clone()))
            .unwrap();

        let err = registry
            .register(counting_provider("second", &A, "2", calls))
            .unwrap_err();
        match err {
            Error::DuplicateProvider {
                token,
                existing,
                rejected,
            } => {
                assert_eq!(token, "test:A");
                assert_eq!(existing, "first");
                assert_eq!(rejected, "second");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!registry.contains("second"));
        assert_eq!(registry.provider_of("test:A").as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_dependency_activates_first_and_once() {
        let registry = registry();
        let order = Arc::new(Mutex::new(Vec::new()));

        let log = order.clone();
        registry
            .register(PluginDescriptor::new("provider").provides(&A, move |_, _| {
                log.lock().push("provider");
                async { Ok::<_, Error>(Arc::new("from-a".to_string())) }
            }))
            .unwrap();

        let log = order.clone();
        let seen = Arc::new(Mutex::new(None));
        let seen_in = seen.clone();
        registry
            .register(
                PluginDescriptor::new("consumer")
                    .requires(&A)
                    .activate(move |_, deps| {
                        log.lock().push("consumer");
                        let seen = seen_in.clone();
                        async move {
                            deps.get(&A).map(|value| {
                                *seen.lock() = Some(value.as_str().to_string());
                            })
                        }
                    }),
            )
            .unwrap();

        registry.activate("consumer").await.unwrap();
        registry.activate("consumer").await.unwrap();
        registry.activate("provider").await.unwrap();

        assert_eq!(*order.lock(), vec!["provider", "consumer"]);
        assert_eq!(seen.lock().as_deref(), Some("from-a"));
        assert_eq!(registry.status("provider"), Some(PluginStatus::Active));
        assert_eq!(registry.status("consumer"), Some(PluginStatus::Active));
        assert_eq!(registry.get(&A).as_deref().map(String::as_str), Some("from-a"));
    }

    #[tokio::test]
    async fn test_missing_dependency_runs_nothing() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        registry
            .register(PluginDescriptor::new("lonely").requires(&B).activate(move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>(()) }
            }))
            .unwrap();

        let err = registry.activate("lonely").await.unwrap_err();
        assert!(
            matches!(&err, Error::MissingDependency { plugin, token } if plugin == "lonely" && token == "test:B")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.status("lonely"), Some(PluginStatus::Registered));

        // 제공자를 나중에 등록하면 활성화 가능
        registry
            .register(counting_provider("late", &B, "b", Arc::new(AtomicUsize::new(0))))
            .unwrap();
        registry.activate("lonely").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cycle_detected_without_running() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));

        let counted = calls.clone();
        registry
            .register(PluginDescriptor::new("x").requires(&B).provides(&A, move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>(Arc::new("x".to_string())) }
            }))
            .unwrap();
        let counted = calls.clone();
        registry
            .register(PluginDescriptor::new("y").requires(&A).provides(&B, move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>(Arc::new("y".to_string())) }
            }))
            .unwrap();

        match registry.activate("x").await.unwrap_err() {
            Error::CyclicDependency { path } => assert_eq!(path, vec!["x", "y", "x"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_plugin_is_not_retried() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        registry
            .register(PluginDescriptor::new("broken").provides(&A, move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Err::<Arc<String>, _>(Error::Internal("boom".into())) }
            }))
            .unwrap();
        registry
            .register(PluginDescriptor::new("dependent").requires(&A))
            .unwrap();

        let err = registry.activate("broken").await.unwrap_err();
        assert!(matches!(&err, Error::Activation { id, .. } if id == "broken"));
        assert_eq!(registry.status("broken"), Some(PluginStatus::Failed));
        assert!(registry.info("broken").unwrap().failure.unwrap().contains("boom"));

        let err = registry.activate("dependent").await.unwrap_err();
        match err {
            Error::Activation { id, cause } => {
                assert_eq!(id, "dependent");
                assert!(cause.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.get(&A).is_none());
    }

    #[tokio::test]
    async fn test_activate_all_isolates_failures() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));

        registry
            .register(
                PluginDescriptor::new("bad")
                    .auto_start(true)
                    .activate(|_, _| async { Err(Error::Internal("nope".into())) }),
            )
            .unwrap();
        registry
            .register(counting_provider("shared", &C, "c", calls.clone()))
            .unwrap();
        registry
            .register(PluginDescriptor::new("one").requires(&C).auto_start(true))
            .unwrap();
        registry
            .register(PluginDescriptor::new("two").requires(&C).auto_start(true))
            .unwrap();
        registry
            .register(PluginDescriptor::new("orphan").requires(&B).auto_start(true))
            .unwrap();
        registry.register(PluginDescriptor::new("lazy")).unwrap();

        let report = registry.activate_all().await;

        assert_eq!(report.activated, vec!["one", "two"]);
        assert_eq!(report.failed_ids(), vec!["bad", "orphan"]);
        assert!(report.failures[1].error.is_structural());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.status("shared"), Some(PluginStatus::Active));
        assert_eq!(registry.status("lazy"), Some(PluginStatus::Registered));
    }

    #[tokio::test]
    async fn test_concurrent_activation_runs_once() {
        let registry = Arc::new(registry());
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        registry
            .register(PluginDescriptor::new("slow").provides(&A, move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::task::yield_now().await;
                    Ok::<_, Error>(Arc::new("done".to_string()))
                }
            }))
            .unwrap();

        let (first, second) = tokio::join!(registry.activate("slow"), registry.activate("slow"));
        assert!(first.is_ok() && second.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_activates_lazily() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry
            .register(counting_provider("lazy", &A, "value", calls.clone()))
            .unwrap();

        assert!(registry.get(&A).is_none());
        let value = registry.resolve(&A).await.unwrap();
        assert_eq!(value.as_str(), "value");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_plugin() {
        let registry = registry();
        assert!(matches!(
            registry.activate("ghost").await,
            Err(Error::UnknownPlugin(_))
        ));
    }

    #[tokio::test]
    async fn test_activation_events_published() {
        let registry = registry();
        registry
            .register(PluginDescriptor::new("ok").auto_start(true))
            .unwrap();
        registry.activate_all().await;

        let events = registry
            .app()
            .events()
            .history_by_type(EventType::PluginActivated)
            .await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].str_field("plugin_id"), Some("ok"));
    }

    #[test]
    fn test_debug_lists_plugins_in_order() {
        let registry = registry();
        registry.register(PluginDescriptor::new("second")).unwrap();
        registry.register(PluginDescriptor::new("first")).unwrap();

        let debug = format!("{:?}", registry);
        assert!(debug.contains(r#"plugins: ["second", "first"]"#), "{}", debug);
    }
}
