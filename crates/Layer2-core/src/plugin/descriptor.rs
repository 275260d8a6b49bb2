//! Plugin Descriptor - 플러그인 선언
//!
//! 디스크립터는 id, 필요한 토큰, 제공하는 토큰, 자동 시작 여부, 그리고
//! activate 함수로 이루어진다. 등록 후에는 변경되지 않는다.

use super::token::{Capability, Dependencies, Token};
use crate::app::Application;
use futures::future::BoxFuture;
use futures::FutureExt;
use lab_foundation::Result;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// activate 함수가 돌려주는 future
pub type ActivateFuture = BoxFuture<'static, Result<Option<Capability>>>;

/// activate 함수
pub type ActivateFn = Arc<dyn Fn(Application, Dependencies) -> ActivateFuture + Send + Sync>;

/// 플러그인 디스크립터
#[derive(Clone)]
pub struct PluginDescriptor {
    id: String,
    description: String,
    requires: Vec<&'static str>,
    provides: Option<&'static str>,
    auto_start: bool,
    activate: ActivateFn,
}

impl PluginDescriptor {
    /// 아무 일도 하지 않는 activate 함수를 가진 디스크립터 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            requires: Vec::new(),
            provides: None,
            auto_start: false,
            activate: Arc::new(|_: Application, _: Dependencies| -> ActivateFuture {
                async { Ok(None) }.boxed()
            }),
        }
    }

    /// 설명 추가
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 필요한 기능 추가 (선언 순서가 곧 전달 순서)
    pub fn requires<T: ?Sized + 'static>(mut self, token: &Token<T>) -> Self {
        if !self.requires.contains(&token.name()) {
            self.requires.push(token.name());
        }
        self
    }

    /// `activate_all` 대상 여부
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// 기능을 제공하지 않는 activate 함수 지정
    pub fn activate<F, Fut>(mut self, activate: F) -> Self
    where
        F: Fn(Application, Dependencies) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.provides = None;
        self.activate = Arc::new(move |app: Application, deps: Dependencies| -> ActivateFuture {
            let fut = activate(app, deps);
            async move { fut.await.map(|()| None) }.boxed()
        });
        self
    }

    /// 토큰을 제공하는 activate 함수 지정
    ///
    /// 반환된 인스턴스가 곧 토큰의 값이 된다.
    pub fn provides<T, F, Fut>(mut self, token: &Token<T>, activate: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Application, Dependencies) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<T>>> + Send + 'static,
    {
        let token = *token;
        self.provides = Some(token.name());
        self.activate = Arc::new(move |app: Application, deps: Dependencies| -> ActivateFuture {
            let fut = activate(app, deps);
            async move { fut.await.map(|instance| Some(token.wrap(instance))) }.boxed()
        });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required_tokens(&self) -> &[&'static str] {
        &self.requires
    }

    pub fn provided_token(&self) -> Option<&'static str> {
        self.provides
    }

    pub fn is_auto_start(&self) -> bool {
        self.auto_start
    }

    pub(crate) fn activate_fn(&self) -> ActivateFn {
        Arc::clone(&self.activate)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("requires", &self.requires)
            .field("provides", &self.provides)
            .field("auto_start", &self.auto_start)
            .finish()
    }
}
