//! Router plugin - 기본 URL 라우터 제공
//!
//! `<base>/tree/<path>`로 들어온 요청은 파일 브라우저로 넘기고 주소는 앱
//! URL로 되돌린다. 라우팅은 애플리케이션 복원 이후 한 번 실행된다.

use crate::command_ids::{NAVIGATE_MAIN, TREE, TREE_URL};
use lab_core::command::CommandRegistry;
use lab_core::{Application, CommandSpec, Dependencies, Navigator, PluginDescriptor, Router, ROUTER};
use lab_foundation::url_ext::url_join;
use lab_foundation::{Error, Result};
use serde_json::{json, Value};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

pub const PLUGIN_ID: &str = "@lab/application-extension:router";

/// 파일 트리 경로 패턴
pub const TREE_PATTERN: &str = r"^/tree/.+";

pub fn plugin() -> PluginDescriptor {
    PluginDescriptor::new(PLUGIN_ID)
        .with_description("Default URL router")
        .auto_start(true)
        .provides(&ROUTER, activate)
}

async fn activate(app: Application, _deps: Dependencies) -> Result<Arc<Router>> {
    let base = app.base_url();
    let tree = app.page_config().tree_url();
    let commands = app.commands();
    let router = Arc::new(
        Router::new(base.clone(), Arc::clone(commands)).with_events(Arc::clone(app.events())),
    );

    let navigator = Arc::clone(&app.host().navigator);
    let registry = Arc::downgrade(commands);
    commands.add_command(
        TREE,
        CommandSpec::new(move |args| {
            open_tree(Arc::clone(&navigator), registry.clone(), base.clone(), args)
        }),
    )?;

    commands.add_command(
        TREE_URL,
        CommandSpec::new(move |args| tree_url(tree.clone(), args)),
    )?;

    router.register(TREE_PATTERN, TREE)?;

    let routing = Arc::clone(&router);
    let restored = app.clone();
    tokio::spawn(async move {
        restored.restored().await;
        let location = restored.host().navigator.location();
        match routing.route(&location) {
            Ok(dispatch) => debug!("Initial route {} -> {:?}", location, dispatch.commands()),
            Err(e) => warn!("Routing {} failed: {}", location, e),
        }
    });

    Ok(router)
}

fn route_path(args: &Value) -> Result<&str> {
    args.get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidInput("route arguments have no path".into()))
}

/// `router:tree` - 파일 브라우저에서 경로 열기
async fn open_tree(
    navigator: Arc<dyn Navigator>,
    commands: Weak<CommandRegistry>,
    base: String,
    args: Value,
) -> Result<Value> {
    let path = route_path(&args)?.replacen("/tree", "", 1);
    let commands = commands
        .upgrade()
        .ok_or_else(|| Error::Internal("command registry is gone".into()))?;

    // 주소를 앱 URL로 되돌림
    navigator.replace_state(&base);

    commands.execute(NAVIGATE_MAIN, json!({ "path": path })).await
}

/// `router:tree-url` - 경로의 트리 URL
async fn tree_url(tree: String, args: Value) -> Result<Value> {
    let path = route_path(&args)?;
    Ok(Value::String(url_join(&[&tree, path])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::host::HeadlessHost;
    use lab_core::{PageConfig, PluginRegistry};
    use tokio::sync::mpsc;

    async fn activated(config: PageConfig) -> (Application, HeadlessHost, PluginRegistry) {
        let (app, host) = Application::headless(config);
        let registry = PluginRegistry::new(app.clone());
        registry.register(plugin()).unwrap();
        registry.activate(PLUGIN_ID).await.unwrap();
        (app, host, registry)
    }

    fn echo_navigate(app: &Application) {
        app.commands()
            .add_command(
                NAVIGATE_MAIN,
                CommandSpec::new(|args: Value| async move { Ok::<_, Error>(args) }),
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_tree_route_opens_file_browser() {
        let (app, host, registry) = activated(PageConfig::default()).await;
        echo_navigate(&app);

        let router = registry.get(&ROUTER).unwrap();
        assert_eq!(router.base(), "/lab");

        let dispatch = router.route("/lab/tree/notebooks/a.ipynb").unwrap();
        assert_eq!(dispatch.commands(), vec![TREE]);

        let outcomes = dispatch.settle().await;
        assert_eq!(
            outcomes[0].result.as_ref().unwrap(),
            &json!({ "path": "/notebooks/a.ipynb" })
        );
        assert_eq!(host.navigator.replaced(), vec!["/lab".to_string()]);
    }

    #[tokio::test]
    async fn test_bare_tree_does_not_match() {
        let (_app, _host, registry) = activated(PageConfig::default()).await;
        let router = registry.get(&ROUTER).unwrap();
        assert!(router.route("/lab/tree/").unwrap().is_empty());
        assert!(router.route("/lab").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tree_url_command() {
        let (app, _host, _registry) =
            activated(PageConfig::default().base_url("/user/alice/")).await;

        let url = app
            .commands()
            .execute(TREE_URL, json!({ "path": "data/b.csv" }))
            .await
            .unwrap();
        assert_eq!(url, json!("/user/alice/lab/tree/data/b.csv"));

        let err = app.commands().execute(TREE_URL, json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_routes_location_after_restore() {
        let (app, host) = Application::headless(PageConfig::default());
        host.navigator.set_location("http://localhost:8888/lab/tree/x.ipynb?reset");

        let (tx, mut rx) = mpsc::unbounded_channel();
        app.commands()
            .add_command(
                NAVIGATE_MAIN,
                CommandSpec::new(move |args: Value| {
                    let tx = tx.clone();
                    async move {
                        let _ = tx.send(args);
                        Ok::<_, Error>(Value::Null)
                    }
                }),
            )
            .unwrap();

        let registry = PluginRegistry::new(app.clone());
        registry.register(plugin()).unwrap();
        registry.activate(PLUGIN_ID).await.unwrap();

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        app.mark_restored().await;
        assert_eq!(rx.recv().await.unwrap(), json!({ "path": "/x.ipynb" }));
        assert_eq!(host.navigator.location(), "/lab");
    }
}
