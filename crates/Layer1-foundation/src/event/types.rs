//! Event Types - 셸 전체에서 사용되는 이벤트 정의

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// EventType - 이벤트 종류
// ============================================================================

/// 이벤트 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // 플러그인 이벤트
    PluginActivated,
    PluginFailed,

    // 애플리케이션 이벤트
    ApplicationRestored,

    // 커맨드 이벤트
    CommandFailed,

    // 셸 시그널 (호스트가 발행)
    CurrentChanged,
    LayoutModified,

    // 사용자 정의 이벤트
    Custom,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PluginActivated => "plugin_activated",
            Self::PluginFailed => "plugin_failed",
            Self::ApplicationRestored => "application_restored",
            Self::CommandFailed => "command_failed",
            Self::CurrentChanged => "current_changed",
            Self::LayoutModified => "layout_modified",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LabEvent - 이벤트 데이터
// ============================================================================

/// 셸 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabEvent {
    /// 이벤트 타입
    pub event_type: EventType,

    /// 이벤트 데이터
    pub data: Value,

    /// 타임스탬프
    pub timestamp: DateTime<Utc>,

    /// 소스 (이벤트 발생 위치)
    pub source: String,
}

impl LabEvent {
    /// 새 이벤트 생성
    pub fn new(event_type: EventType, data: Value, source: impl Into<String>) -> Self {
        Self {
            event_type,
            data,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }

    /// 데이터 없는 이벤트 생성
    pub fn simple(event_type: EventType, source: impl Into<String>) -> Self {
        Self::new(event_type, Value::Null, source)
    }

    /// 플러그인 관련 이벤트
    pub fn plugin(event_type: EventType, plugin_id: &str) -> Self {
        Self::new(
            event_type,
            serde_json::json!({ "plugin_id": plugin_id }),
            "plugin_registry",
        )
    }

    /// 데이터에서 문자열 필드 조회
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
