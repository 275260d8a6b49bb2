//! Error types for LabShell
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// LabShell 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 플러그인 등록 (구조적 에러)
    // ========================================================================
    #[error("Plugin already registered: {0}")]
    DuplicateId(String),

    #[error("Capability {token} is already provided by {existing} (rejected: {rejected})")]
    DuplicateProvider {
        token: String,
        existing: String,
        rejected: String,
    },

    // ========================================================================
    // 플러그인 활성화
    // ========================================================================
    #[error("Plugin {plugin} requires {token}, but no plugin provides it")]
    MissingDependency { plugin: String, token: String },

    #[error("Cyclic plugin dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("Plugin {id} failed to activate: {cause}")]
    Activation { id: String, cause: String },

    #[error("Plugin not registered: {0}")]
    UnknownPlugin(String),

    #[error("Capability {0} does not hold the requested interface")]
    CapabilityMismatch(String),

    // ========================================================================
    // 커맨드
    // ========================================================================
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command already registered: {0}")]
    DuplicateCommand(String),

    // ========================================================================
    // 라우팅
    // ========================================================================
    #[error("Invalid route pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // ========================================================================
    // 호스트 서비스
    // ========================================================================
    /// 빌드 실패 (메시지를 그대로 사용자에게 보여줌)
    #[error("{0}")]
    Build(String),

    // ========================================================================
    // 설정 / 일반
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 설정 오류(중복/누락/순환)인지 확인
    ///
    /// 구조적 에러는 재시도해도 결과가 같으므로 즉시 호출자에게 전달한다.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::DuplicateId(_)
                | Error::DuplicateProvider { .. }
                | Error::MissingDependency { .. }
                | Error::CyclicDependency { .. }
        )
    }

    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::InvalidInput(_) | Error::CommandNotFound(_)
        )
    }

    /// 활성화 에러 생성 헬퍼
    pub fn activation(id: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::Activation {
            id: id.into(),
            cause: cause.to_string(),
        }
    }

    /// 의존성 누락 에러 생성 헬퍼
    pub fn missing_dependency(plugin: impl Into<String>, token: impl Into<String>) -> Self {
        Error::MissingDependency {
            plugin: plugin.into(),
            token: token.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidPattern(e.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
