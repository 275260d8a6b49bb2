//! # lab-application
//!
//! 애플리케이션 셸 플러그인:
//! - main: 탭/영역/모드 커맨드, 빌드 확인, 페이지 이탈 가드
//! - layout: 레이아웃 저장/복원 (`LAYOUT_RESTORER` 제공)
//! - router: `/tree/...` URL 라우팅 (`ROUTER` 제공)
//! - notfound: 서버가 찾지 못한 경로 알림
//!
//! 브라우저 호스트가 없을 때는 `headless_services()`가 팔레트, 상태 저장소,
//! 파일 브라우저를 대신 제공한다.

pub mod command_ids;
pub mod plugins;

pub use plugins::{check_build, BuildOutcome};

use lab_core::{ActivationReport, Application, PluginDescriptor, PluginRegistry};
use lab_foundation::Result;
use std::path::PathBuf;
use tracing::info;

/// 애플리케이션 확장 플러그인 (main, layout, router, notfound)
pub fn plugins() -> Vec<PluginDescriptor> {
    vec![
        plugins::main::plugin(),
        plugins::layout::plugin(),
        plugins::router::plugin(),
        plugins::notfound::plugin(),
    ]
}

/// headless 호스트용 서비스 플러그인
///
/// `state_dir`이 있으면 상태(레이아웃 포함)가 그 디렉토리에 저장된다.
pub fn headless_services(state_dir: Option<PathBuf>) -> Vec<PluginDescriptor> {
    vec![
        plugins::services::palette_plugin(),
        plugins::services::state_plugin(state_dir),
        plugins::services::filebrowser_plugin(),
    ]
}

/// 플러그인을 등록하고 애플리케이션을 시작한다
///
/// 등록 에러(중복 id/제공자)는 바로 반환된다. 활성화 실패는 리포트에 담긴다.
pub async fn boot(
    app: &Application,
    descriptors: Vec<PluginDescriptor>,
) -> Result<(PluginRegistry, ActivationReport)> {
    let registry = PluginRegistry::new(app.clone());
    registry.register_all(descriptors)?;

    let report = app.start(&registry).await;
    info!(
        "Application started: {} activated, {} failed",
        report.activated.len(),
        report.failures.len()
    );
    Ok((registry, report))
}
