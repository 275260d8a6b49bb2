//! Application - 플러그인에 전달되는 애플리케이션 핸들
//!
//! 커맨드 레지스트리, 이벤트 버스, 페이지 설정, 호스트 서비스를 묶는다.
//! 복제는 `Arc` 복제일 뿐이므로 activate 함수와 커맨드에 자유롭게 넘긴다.

use crate::command::CommandRegistry;
use crate::host::{HeadlessHost, HostServices};
use crate::plugin::{ActivationReport, PluginRegistry};
use lab_foundation::{EventBus, EventType, LabEvent, PageConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::info;

struct AppInner {
    commands: Arc<CommandRegistry>,
    events: Arc<EventBus>,
    page_config: PageConfig,
    host: HostServices,
    restored: watch::Sender<bool>,
    dirty: AtomicBool,
}

/// 애플리케이션 핸들
#[derive(Clone)]
pub struct Application {
    inner: Arc<AppInner>,
}

/// 순환 참조 없이 보관하는 애플리케이션 핸들
#[derive(Clone)]
pub struct WeakApplication {
    inner: Weak<AppInner>,
}

impl WeakApplication {
    pub fn upgrade(&self) -> Option<Application> {
        self.inner.upgrade().map(|inner| Application { inner })
    }
}

impl Application {
    /// 새 애플리케이션 생성
    ///
    /// 호스트가 같은 버스로 시그널을 발행하도록 `events`를 공유한다.
    pub fn new(page_config: PageConfig, host: HostServices, events: Arc<EventBus>) -> Self {
        let (restored, _) = watch::channel(false);
        Self {
            inner: Arc::new(AppInner {
                commands: Arc::new(CommandRegistry::new()),
                events,
                page_config,
                host,
                restored,
                dirty: AtomicBool::new(false),
            }),
        }
    }

    /// headless 호스트로 애플리케이션 생성
    ///
    /// 위치는 앱 URL로 시작한다.
    pub fn headless(page_config: PageConfig) -> (Self, HeadlessHost) {
        let events = Arc::new(EventBus::new());
        let host = HeadlessHost::new(events.clone(), page_config.app_url());
        let app = Self::new(page_config, host.services(), events);
        (app, host)
    }

    pub fn downgrade(&self) -> WeakApplication {
        WeakApplication {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    pub fn commands(&self) -> &Arc<CommandRegistry> {
        &self.inner.commands
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.inner.events
    }

    pub fn page_config(&self) -> &PageConfig {
        &self.inner.page_config
    }

    /// 앱의 base URL (예: `/lab`)
    pub fn base_url(&self) -> String {
        self.inner.page_config.app_url()
    }

    pub fn host(&self) -> &HostServices {
        &self.inner.host
    }

    // ========================================================================
    // 상태
    // ========================================================================

    /// 저장되지 않은 변경이 있는지
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::SeqCst)
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.inner.dirty.store(dirty, Ordering::SeqCst);
    }

    pub fn is_restored(&self) -> bool {
        *self.inner.restored.borrow()
    }

    /// 복원이 끝날 때까지 대기 (이미 끝났으면 바로 반환)
    pub async fn restored(&self) {
        let mut receiver = self.inner.restored.subscribe();
        // Sender가 self에 있으므로 닫히지 않는다
        let _ = receiver.wait_for(|restored| *restored).await;
    }

    /// 복원 완료 표시
    pub async fn mark_restored(&self) {
        if self.inner.restored.send_replace(true) {
            return;
        }
        info!("Application restored");
        self.inner
            .events
            .publish(LabEvent::simple(EventType::ApplicationRestored, "application"))
            .await;
    }

    /// 자동 시작 플러그인을 모두 활성화한 뒤 복원 완료 표시
    pub async fn start(&self, registry: &PluginRegistry) -> ActivationReport {
        let report = registry.activate_all().await;
        self.mark_restored().await;
        report
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("base_url", &self.base_url())
            .field("restored", &self.is_restored())
            .finish()
    }
}
