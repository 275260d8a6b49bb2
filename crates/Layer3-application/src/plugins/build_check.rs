//! Build check - 시작 시 확장 빌드가 필요한지 확인하고 사용자에게 묻는다
//!
//! ```text
//! get_status
//!   ├─ building → do_build
//!   ├─ needed   → "Build Recommended" ── BUILD → do_build
//!   └─ stable   → 종료
//!
//! do_build
//!   ├─ Ok  → "Build Complete" ── RELOAD → navigator.reload()
//!   └─ Err → "Build Failed"
//! ```

use lab_core::{Application, BuildState, DialogButton, DialogOptions};
use tracing::{debug, error, info, warn};

/// 빌드 확인 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// 빌드를 지원하지 않거나 확인하지 않도록 설정됨
    Skipped,
    /// 빌드 불필요
    UpToDate,
    /// 사용자가 빌드를 거절함
    Declined,
    /// 빌드 완료
    Built { reloaded: bool },
    /// 상태 조회 또는 빌드 실패
    Failed(String),
}

/// 빌드 상태를 확인하고 필요하면 빌드를 제안한다
pub async fn check_build(app: &Application) -> BuildOutcome {
    let builder = &app.host().builder;
    if !builder.is_available() || !builder.should_check() {
        debug!("Build check skipped");
        return BuildOutcome::Skipped;
    }

    let status = match builder.get_status().await {
        Ok(status) => status,
        Err(e) => {
            warn!("Failed to get build status: {}", e);
            return BuildOutcome::Failed(e.to_string());
        }
    };

    match status.status {
        BuildState::Building => do_build(app).await,
        BuildState::Needed => {
            let body = format!(
                "{} build is suggested:\n{}",
                app.page_config().app_name,
                status.message
            );
            let result = app
                .host()
                .dialogs
                .show_dialog(
                    DialogOptions::new("Build Recommended", body).with_buttons(vec![
                        DialogButton::cancel(),
                        DialogButton::ok_labeled("BUILD"),
                    ]),
                )
                .await;

            if result.accepted() {
                do_build(app).await
            } else {
                info!("Build declined");
                BuildOutcome::Declined
            }
        }
        BuildState::Stable => BuildOutcome::UpToDate,
    }
}

async fn do_build(app: &Application) -> BuildOutcome {
    let host = app.host();
    info!("Building extensions");

    match host.builder.build().await {
        Ok(()) => {
            let result = host
                .dialogs
                .show_dialog(
                    DialogOptions::new(
                        "Build Complete",
                        "Build successfully completed, reload page?",
                    )
                    .with_buttons(vec![DialogButton::cancel(), DialogButton::warn("RELOAD")]),
                )
                .await;

            let reloaded = result.accepted();
            if reloaded {
                host.navigator.reload();
            }
            BuildOutcome::Built { reloaded }
        }
        Err(e) => {
            error!("Build failed: {}", e);
            let message = e.to_string();
            host.dialogs
                .show_dialog(DialogOptions::new("Build Failed", message.clone()))
                .await;
            BuildOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::host::{HeadlessHost, ScriptedDialogs, StaticBuilder};
    use lab_foundation::{EventBus, PageConfig};
    use std::sync::Arc;

    fn app_with(builder: StaticBuilder, dialogs: ScriptedDialogs) -> (Application, HeadlessHost) {
        let events = Arc::new(EventBus::new());
        let host = HeadlessHost::new(events.clone(), "/lab")
            .with_builder(builder)
            .with_dialogs(dialogs);
        let app = Application::new(PageConfig::default(), host.services(), events);
        (app, host)
    }

    #[tokio::test]
    async fn test_skipped_when_unavailable() {
        let (app, host) = app_with(StaticBuilder::unavailable(), ScriptedDialogs::accepting());
        assert_eq!(check_build(&app).await, BuildOutcome::Skipped);
        assert!(host.dialogs.shown().is_empty());
    }

    #[tokio::test]
    async fn test_stable_shows_nothing() {
        let (app, host) = app_with(StaticBuilder::new(true, true), ScriptedDialogs::accepting());
        assert_eq!(check_build(&app).await, BuildOutcome::UpToDate);
        assert!(host.dialogs.shown().is_empty());
    }

    #[tokio::test]
    async fn test_needed_and_accepted() {
        let builder =
            StaticBuilder::new(true, true).with_status(BuildState::Needed, "jupyterlab-foo added");
        let (app, host) = app_with(builder, ScriptedDialogs::accepting());

        assert_eq!(check_build(&app).await, BuildOutcome::Built { reloaded: true });

        let shown = host.dialogs.shown();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].title, "Build Recommended");
        assert_eq!(
            shown[0].body,
            "JupyterLab build is suggested:\njupyterlab-foo added"
        );
        assert_eq!(shown[0].buttons[1].label, "BUILD");
        assert_eq!(shown[1].title, "Build Complete");
        assert_eq!(shown[1].buttons[1].label, "RELOAD");
        assert_eq!(host.builder.build_count(), 1);
        assert_eq!(host.navigator.reload_count(), 1);
    }

    #[tokio::test]
    async fn test_needed_and_declined() {
        let builder = StaticBuilder::new(true, true).with_status(BuildState::Needed, "");
        let (app, host) = app_with(builder, ScriptedDialogs::new());

        assert_eq!(check_build(&app).await, BuildOutcome::Declined);
        assert_eq!(host.builder.build_count(), 0);
    }

    #[tokio::test]
    async fn test_building_goes_straight_to_build() {
        let builder = StaticBuilder::new(true, true).with_status(BuildState::Building, "");
        let (app, host) = app_with(builder, ScriptedDialogs::new());

        assert_eq!(check_build(&app).await, BuildOutcome::Built { reloaded: false });
        let shown = host.dialogs.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Build Complete");
        assert_eq!(host.navigator.reload_count(), 0);
    }

    #[tokio::test]
    async fn test_build_failure_dialog() {
        let builder = StaticBuilder::new(true, true)
            .with_status(BuildState::Building, "")
            .failing_with("npm exited with 1");
        let (app, host) = app_with(builder, ScriptedDialogs::accepting());

        assert_eq!(
            check_build(&app).await,
            BuildOutcome::Failed("npm exited with 1".to_string())
        );
        let shown = host.dialogs.shown();
        assert_eq!(shown[0].title, "Build Failed");
        assert_eq!(shown[0].body, "npm exited with 1");
    }
}
