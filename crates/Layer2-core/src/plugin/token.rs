//! Token - 타입이 붙은 기능(capability) 식별자
//!
//! 플러그인은 토큰으로 "무엇을 필요로 하는지 / 무엇을 제공하는지"를 선언한다.
//! 토큰은 이름과 인터페이스 타입을 함께 가지므로, 소비자는 다운캐스트 없이
//! `Arc<T>`를 받는다.

use lab_foundation::{Error, Result};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 레지스트리 내부에 저장되는 기능 인스턴스 (`Arc<T>`를 한 번 더 감싼 형태)
pub type Capability = Arc<dyn Any + Send + Sync>;

// ============================================================================
// Token
// ============================================================================

/// 기능 토큰
///
/// ```
/// use lab_core::plugin::Token;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// const CLOCK: Token<dyn Clock> = Token::new("@demo/clock:IClock");
/// assert_eq!(CLOCK.name(), "@demo/clock:IClock");
/// ```
pub struct Token<T: ?Sized + 'static> {
    name: &'static str,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + 'static> Token<T> {
    /// 새 토큰 생성
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// 토큰 이름
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized + Send + Sync + 'static> Token<T> {
    /// 인스턴스를 저장 가능한 형태로 감싸기
    pub(crate) fn wrap(&self, instance: Arc<T>) -> Capability {
        Arc::new(instance)
    }

    /// 저장된 인스턴스를 토큰의 타입으로 꺼내기
    pub(crate) fn unwrap(&self, capability: &Capability) -> Result<Arc<T>> {
        capability
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| Error::CapabilityMismatch(self.name.to_string()))
    }
}

impl<T: ?Sized> Clone for Token<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Token<T> {}

impl<T: ?Sized> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.name).finish()
    }
}

impl<T: ?Sized> fmt::Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Dependencies - activate 함수에 전달되는 해결된 의존성
// ============================================================================

/// 선언된 `requires` 순서대로 해결된 기능 인스턴스
#[derive(Clone, Default)]
pub struct Dependencies {
    entries: Vec<(&'static str, Capability)>,
}

impl Dependencies {
    pub(crate) fn new(entries: Vec<(&'static str, Capability)>) -> Self {
        Self { entries }
    }

    /// 토큰으로 의존성 조회
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, token: &Token<T>) -> Result<Arc<T>> {
        let (_, capability) = self
            .entries
            .iter()
            .find(|(name, _)| *name == token.name())
            .ok_or_else(|| {
                Error::NotFound(format!("{} is not a declared requirement", token.name()))
            })?;
        token.unwrap(capability)
    }

    /// 해결된 토큰 이름 (선언 순서)
    pub fn tokens(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens()).finish()
    }
}
