//! Not-found plugin - 서버가 찾지 못한 경로를 알리고 앱 URL로 되돌린다

use lab_core::{Application, Dependencies, DialogButton, DialogOptions, PluginDescriptor};
use lab_foundation::Result;
use tracing::info;

pub const PLUGIN_ID: &str = "@lab/application-extension:notfound";

pub fn plugin() -> PluginDescriptor {
    PluginDescriptor::new(PLUGIN_ID)
        .with_description("Reports paths the server could not find")
        .auto_start(true)
        .activate(activate)
}

async fn activate(app: Application, _deps: Dependencies) -> Result<()> {
    let Some(bad) = app.page_config().not_found_url.clone() else {
        return Ok(());
    };

    let base = app.base_url();
    info!("Path {} was not found, redirecting to {}", bad, base);
    app.host().navigator.replace_state(&base);

    let options = DialogOptions::new(
        "Path Not Found",
        format!(
            "The path: {} was not found. {} redirected to: {}",
            bad,
            app.page_config().app_name,
            base
        ),
    )
    .with_buttons(vec![DialogButton::ok()]);

    // 다이얼로그가 닫히기를 기다리지 않는다
    let dialogs = app.host().dialogs.clone();
    tokio::spawn(async move {
        dialogs.show_dialog(options).await;
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::{PageConfig, PluginRegistry};

    #[tokio::test]
    async fn test_reports_not_found_path() {
        let config = PageConfig::default().with_not_found_url("/lab/workspaces/missing");
        let (app, host) = Application::headless(config);
        let registry = PluginRegistry::new(app);
        registry.register(plugin()).unwrap();
        registry.activate(PLUGIN_ID).await.unwrap();

        assert_eq!(host.navigator.replaced(), vec!["/lab".to_string()]);

        host.dialogs.wait_for(1).await;
        let shown = host.dialogs.shown();
        assert_eq!(shown[0].title, "Path Not Found");
        assert_eq!(
            shown[0].body,
            "The path: /lab/workspaces/missing was not found. JupyterLab redirected to: /lab"
        );
        assert_eq!(shown[0].buttons, vec![DialogButton::ok()]);
    }

    #[tokio::test]
    async fn test_does_nothing_without_not_found_url() {
        let (app, host) = Application::headless(PageConfig::default());
        let registry = PluginRegistry::new(app);
        registry.register(plugin()).unwrap();
        registry.activate(PLUGIN_ID).await.unwrap();

        tokio::task::yield_now().await;
        assert!(host.navigator.replaced().is_empty());
        assert!(host.dialogs.shown().is_empty());
    }
}
