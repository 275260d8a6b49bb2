//! Host traits - 호스트가 제공하는 서비스 인터페이스
//!
//! 셸 레이아웃, 다이얼로그, 빌드 관리자, 브라우저 내비게이션은 모두 호스트의
//! 것이다. 플러그인은 이 트레이트를 통해서만 호스트와 상호작용한다.

use async_trait::async_trait;
use lab_foundation::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Shell
// ============================================================================

/// 셸 영역
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellArea {
    Main,
    Left,
    Right,
}

impl fmt::Display for ShellArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// 메인 영역 문서 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentMode {
    SingleDocument,
    #[default]
    MultipleDocument,
}

impl DocumentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleDocument => "single-document",
            Self::MultipleDocument => "multiple-document",
        }
    }

    /// 모드 이름 파싱 (알 수 없는 이름이면 None)
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "single-document" => Some(Self::SingleDocument),
            "multiple-document" => Some(Self::MultipleDocument),
            _ => None,
        }
    }

    /// 반대 모드
    pub fn toggled(&self) -> Self {
        match self {
            Self::SingleDocument => Self::MultipleDocument,
            Self::MultipleDocument => Self::SingleDocument,
        }
    }
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 셸이 직렬화한 레이아웃 (내용은 셸만 해석한다)
pub type LayoutData = Value;

/// 애플리케이션 셸
///
/// 상태를 바꾸는 메서드는 비동기이며, 셸은 변경 후 `CurrentChanged` /
/// `LayoutModified` 이벤트를 발행한다.
#[async_trait]
pub trait Shell: Send + Sync {
    async fn activate_next_tab(&self);

    async fn activate_previous_tab(&self);

    /// 메인 영역의 모든 위젯 닫기
    async fn close_all(&self);

    /// 사이드 영역이 접혀 있는지
    fn is_collapsed(&self, area: ShellArea) -> bool;

    async fn expand(&self, area: ShellArea);

    async fn collapse(&self, area: ShellArea);

    /// 영역에 위젯이 없는지
    fn is_empty(&self, area: ShellArea) -> bool;

    fn mode(&self) -> DocumentMode;

    async fn set_mode(&self, mode: DocumentMode);

    /// 현재 레이아웃 직렬화
    fn save_layout(&self) -> LayoutData;

    /// 레이아웃 복원 (None이면 기본 레이아웃)
    async fn restore_layout(&self, layout: Option<LayoutData>);
}

// ============================================================================
// Dialogs
// ============================================================================

/// 버튼 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    #[default]
    Default,
    Accept,
    Warn,
}

/// 다이얼로그 버튼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub label: String,
    /// 누르면 다이얼로그가 "수락"된 것으로 처리되는지
    pub accept: bool,
    pub kind: ButtonKind,
}

impl DialogButton {
    /// 기본 수락 버튼 ("OK")
    pub fn ok() -> Self {
        Self::ok_labeled("OK")
    }

    pub fn ok_labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            accept: true,
            kind: ButtonKind::Accept,
        }
    }

    /// 취소 버튼 ("CANCEL")
    pub fn cancel() -> Self {
        Self {
            label: "CANCEL".into(),
            accept: false,
            kind: ButtonKind::Default,
        }
    }

    /// 경고 색의 수락 버튼
    pub fn warn(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            accept: true,
            kind: ButtonKind::Warn,
        }
    }
}

/// 다이얼로그 옵션
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogOptions {
    pub title: String,
    pub body: String,
    pub buttons: Vec<DialogButton>,
}

impl DialogOptions {
    /// 기본 버튼(취소, 확인)으로 생성
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            buttons: vec![DialogButton::cancel(), DialogButton::ok()],
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<DialogButton>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// 다이얼로그 결과
#[derive(Debug, Clone, PartialEq)]
pub struct DialogResult {
    pub button: DialogButton,
}

impl DialogResult {
    pub fn accepted(&self) -> bool {
        self.button.accept
    }
}

/// 모달 다이얼로그
#[async_trait]
pub trait Dialogs: Send + Sync {
    async fn show_dialog(&self, options: DialogOptions) -> DialogResult;
}

// ============================================================================
// Builder
// ============================================================================

/// 빌드 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildState {
    /// 빌드 불필요
    Stable,
    /// 빌드 진행 중
    Building,
    /// 빌드 권장
    Needed,
}

/// 빌드 상태 조회 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub status: BuildState,
    pub message: String,
}

/// 확장 빌드 관리자
#[async_trait]
pub trait Builder: Send + Sync {
    /// 서버가 빌드를 지원하는지
    fn is_available(&self) -> bool;

    /// 시작 시 빌드 상태를 확인해야 하는지
    fn should_check(&self) -> bool;

    async fn get_status(&self) -> Result<BuildStatus>;

    /// 빌드 실행 (완료될 때까지)
    async fn build(&self) -> Result<()>;
}

// ============================================================================
// Navigator
// ============================================================================

/// 페이지를 떠나려 할 때 호출됨 (Some이면 확인 메시지)
pub type UnloadGuard = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// 브라우저 위치/내비게이션
pub trait Navigator: Send + Sync {
    /// 현재 URL
    fn location(&self) -> String;

    /// 히스토리 항목 없이 URL 교체
    fn replace_state(&self, url: &str);

    /// 페이지 새로고침
    fn reload(&self);

    /// 페이지 이탈 확인 가드 설치
    fn set_unload_guard(&self, guard: UnloadGuard);

    /// 이탈 시도: 가드가 메시지를 돌려주면 이탈을 막는다
    fn before_unload(&self) -> Option<String>;
}
