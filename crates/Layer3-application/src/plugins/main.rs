//! Main plugin - 셸 커맨드, 빌드 확인, 페이지 이탈 경고

use super::build_check::check_build;
use crate::command_ids::{
    ACTIVATE_NEXT_TAB, ACTIVATE_PREVIOUS_TAB, CLOSE_ALL, SET_MODE, TOGGLE_LEFT_AREA, TOGGLE_MODE,
    TOGGLE_RIGHT_AREA,
};
use async_trait::async_trait;
use lab_core::command::CommandRegistry;
use lab_core::{
    Application, CommandPalette, CommandSpec, Dependencies, DocumentMode, PaletteItem,
    PluginDescriptor, Shell, ShellArea, COMMAND_PALETTE,
};
use lab_foundation::{Error, EventHandler, EventType, LabEvent, Result};
use serde_json::{json, Value};
use std::sync::{Arc, Weak};
use tracing::debug;

pub const PLUGIN_ID: &str = "@lab/application-extension:main";

/// 팔레트 카테고리
pub const CATEGORY: &str = "Main Area";

pub fn plugin() -> PluginDescriptor {
    PluginDescriptor::new(PLUGIN_ID)
        .with_description("Main area commands, build check and unload guard")
        .requires(&COMMAND_PALETTE)
        .auto_start(true)
        .activate(activate)
}

async fn activate(app: Application, deps: Dependencies) -> Result<()> {
    let palette = deps.get(&COMMAND_PALETTE)?;
    add_commands(&app, palette.as_ref())?;

    // 현재 위젯이 바뀌면 close-all 상태 갱신
    app.events()
        .register_handler(Arc::new(CloseAllRefresher {
            commands: Arc::downgrade(app.commands()),
        }))
        .await;

    let checking = app.clone();
    tokio::spawn(async move {
        let outcome = check_build(&checking).await;
        debug!("Build check finished: {:?}", outcome);
    });

    install_unload_guard(&app);
    Ok(())
}

// ============================================================================
// 커맨드
// ============================================================================

fn add_commands(app: &Application, palette: &dyn CommandPalette) -> Result<()> {
    let commands = app.commands();
    let shell = &app.host().shell;

    let tabs = Arc::clone(shell);
    commands.add_command(
        ACTIVATE_NEXT_TAB,
        CommandSpec::action(move |_| {
            let shell = Arc::clone(&tabs);
            async move { shell.activate_next_tab().await }
        })
        .with_label("Activate Next Tab"),
    )?;
    palette.add_item(PaletteItem::new(ACTIVATE_NEXT_TAB, CATEGORY));

    let tabs = Arc::clone(shell);
    commands.add_command(
        ACTIVATE_PREVIOUS_TAB,
        CommandSpec::action(move |_| {
            let shell = Arc::clone(&tabs);
            async move { shell.activate_previous_tab().await }
        })
        .with_label("Activate Previous Tab"),
    )?;
    palette.add_item(PaletteItem::new(ACTIVATE_PREVIOUS_TAB, CATEGORY));

    let closing = Arc::clone(shell);
    commands.add_command(
        CLOSE_ALL,
        CommandSpec::action(move |_| {
            let shell = Arc::clone(&closing);
            async move { shell.close_all().await }
        })
        .with_label("Close All Widgets"),
    )?;
    palette.add_item(PaletteItem::new(CLOSE_ALL, CATEGORY));

    commands.add_command(TOGGLE_LEFT_AREA, toggle_area(shell, ShellArea::Left, "Show Left Area"))?;
    palette.add_item(PaletteItem::new(TOGGLE_LEFT_AREA, CATEGORY));

    commands.add_command(TOGGLE_RIGHT_AREA, toggle_area(shell, ShellArea::Right, "Show Right Area"))?;
    palette.add_item(PaletteItem::new(TOGGLE_RIGHT_AREA, CATEGORY));

    let moding = Arc::clone(shell);
    commands.add_command(
        SET_MODE,
        CommandSpec::new(move |args| set_mode(Arc::clone(&moding), args))
            .with_visible(|args| requested_mode(args).is_some()),
    )?;

    let toggling = Arc::clone(shell);
    let registry = Arc::downgrade(commands);
    commands.add_command(
        TOGGLE_MODE,
        CommandSpec::new(move |_| toggle_mode(Arc::clone(&toggling), registry.clone()))
            .with_dynamic_label(|args| {
                if args.get("isPalette").and_then(Value::as_bool).unwrap_or(false) {
                    "Toggle Single-Document Mode".to_string()
                } else {
                    "Single-Document Mode".to_string()
                }
            })
            .with_toggled({
                let shell = Arc::clone(shell);
                move |_| shell.mode() == DocumentMode::SingleDocument
            }),
    )?;
    palette.add_item(PaletteItem::new(TOGGLE_MODE, CATEGORY).with_args(json!({ "isPalette": true })));

    Ok(())
}

/// 사이드 영역 펼치기/접기
fn toggle_area(shell: &Arc<dyn Shell>, area: ShellArea, label: &str) -> CommandSpec {
    let toggling = Arc::clone(shell);
    let toggled = Arc::clone(shell);
    let visible = Arc::clone(shell);

    CommandSpec::action(move |_| {
        let shell = Arc::clone(&toggling);
        async move {
            if shell.is_collapsed(area) {
                shell.expand(area).await;
            } else {
                shell.collapse(area).await;
            }
        }
    })
    .with_label(label)
    .with_toggled(move |_| !toggled.is_collapsed(area))
    .with_visible(move |_| !visible.is_empty(area))
}

fn requested_mode(args: &Value) -> Option<DocumentMode> {
    args.get("mode")
        .and_then(Value::as_str)
        .and_then(DocumentMode::parse)
}

async fn set_mode(shell: Arc<dyn Shell>, args: Value) -> Result<Value> {
    match requested_mode(&args) {
        Some(mode) => {
            shell.set_mode(mode).await;
            Ok(Value::Null)
        }
        None => {
            let mode = args.get("mode").map(Value::to_string).unwrap_or_default();
            Err(Error::InvalidInput(format!(
                "Unsupported application shell mode: {}",
                mode.trim_matches('"')
            )))
        }
    }
}

async fn toggle_mode(shell: Arc<dyn Shell>, commands: Weak<CommandRegistry>) -> Result<Value> {
    let commands = commands
        .upgrade()
        .ok_or_else(|| Error::Internal("command registry is gone".into()))?;
    let next = shell.mode().toggled();
    commands
        .execute(SET_MODE, json!({ "mode": next.as_str() }))
        .await
}

// ============================================================================
// 이벤트 핸들러 / 이탈 가드
// ============================================================================

/// `CurrentChanged` → close-all 커맨드 상태 갱신 알림
struct CloseAllRefresher {
    commands: Weak<CommandRegistry>,
}

#[async_trait]
impl EventHandler for CloseAllRefresher {
    fn name(&self) -> &str {
        "application:close-all-refresher"
    }

    fn interested_events(&self) -> Vec<EventType> {
        vec![EventType::CurrentChanged]
    }

    async fn handle(&self, _event: &LabEvent) {
        if let Some(commands) = self.commands.upgrade() {
            commands.notify_command_changed(CLOSE_ALL);
        }
    }
}

/// 저장되지 않은 변경이 있으면 페이지 이탈 시 확인 메시지
fn install_unload_guard(app: &Application) {
    let message = format!(
        "Are you sure you want to exit {}?\nAny unsaved changes will be lost.",
        app.page_config().app_name
    );
    let weak = app.downgrade();
    app.host().navigator.set_unload_guard(Arc::new(move || {
        let app = weak.upgrade()?;
        app.is_dirty().then(|| message.clone())
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::host::HeadlessHost;
    use lab_core::{Navigator, PaletteModel};
    use lab_foundation::PageConfig;

    fn app_with_commands() -> (Application, HeadlessHost, Arc<PaletteModel>) {
        let (app, host) = Application::headless(PageConfig::default());
        let palette = Arc::new(PaletteModel::new());
        add_commands(&app, palette.as_ref()).unwrap();
        (app, host, palette)
    }

    #[test]
    fn test_palette_items() {
        let (_app, _host, palette) = app_with_commands();
        let items = palette.items_in(CATEGORY);
        let ids: Vec<&str> = items.iter().map(|i| i.command.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                ACTIVATE_NEXT_TAB,
                ACTIVATE_PREVIOUS_TAB,
                CLOSE_ALL,
                TOGGLE_LEFT_AREA,
                TOGGLE_RIGHT_AREA,
                TOGGLE_MODE
            ]
        );
        assert_eq!(items[5].args, json!({ "isPalette": true }));
    }

    #[tokio::test]
    async fn test_set_mode_validation() {
        let (app, _host, _palette) = app_with_commands();
        let commands = app.commands();

        assert!(commands.is_visible(SET_MODE, &json!({ "mode": "single-document" })));
        assert!(!commands.is_visible(SET_MODE, &json!({ "mode": "zen" })));

        let err = commands
            .execute(SET_MODE, json!({ "mode": "zen" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Unsupported application shell mode: zen"
        );

        commands
            .execute(SET_MODE, json!({ "mode": "single-document" }))
            .await
            .unwrap();
        assert_eq!(app.host().shell.mode(), DocumentMode::SingleDocument);
    }

    #[tokio::test]
    async fn test_toggle_mode() {
        let (app, _host, _palette) = app_with_commands();
        let commands = app.commands();

        assert_eq!(
            commands.label(TOGGLE_MODE, &json!({ "isPalette": true })),
            "Toggle Single-Document Mode"
        );
        assert_eq!(commands.label(TOGGLE_MODE, &Value::Null), "Single-Document Mode");
        assert!(!commands.is_toggled(TOGGLE_MODE, &Value::Null));

        commands.execute(TOGGLE_MODE, Value::Null).await.unwrap();
        assert!(commands.is_toggled(TOGGLE_MODE, &Value::Null));
        commands.execute(TOGGLE_MODE, Value::Null).await.unwrap();
        assert_eq!(app.host().shell.mode(), DocumentMode::MultipleDocument);
    }

    #[tokio::test]
    async fn test_toggle_area() {
        let (app, host, _palette) = app_with_commands();
        let commands = app.commands();

        // 빈 영역은 보이지 않는다
        assert!(!commands.is_visible(TOGGLE_LEFT_AREA, &Value::Null));
        host.shell.add_widget(ShellArea::Left, "filebrowser").await;
        assert!(commands.is_visible(TOGGLE_LEFT_AREA, &Value::Null));

        assert!(commands.is_toggled(TOGGLE_LEFT_AREA, &Value::Null));
        commands.execute(TOGGLE_LEFT_AREA, Value::Null).await.unwrap();
        assert!(host.shell.is_collapsed(ShellArea::Left));
        assert!(!commands.is_toggled(TOGGLE_LEFT_AREA, &Value::Null));
        commands.execute(TOGGLE_LEFT_AREA, Value::Null).await.unwrap();
        assert!(!host.shell.is_collapsed(ShellArea::Left));
    }

    #[tokio::test]
    async fn test_tab_commands() {
        let (app, host, _palette) = app_with_commands();
        host.shell.add_widget(ShellArea::Main, "a.ipynb").await;
        host.shell.add_widget(ShellArea::Main, "b.ipynb").await;

        app.commands()
            .execute(ACTIVATE_NEXT_TAB, Value::Null)
            .await
            .unwrap();
        assert_eq!(host.shell.current_widget().as_deref(), Some("a.ipynb"));

        app.commands().execute(CLOSE_ALL, Value::Null).await.unwrap();
        assert!(host.shell.is_empty(ShellArea::Main));
    }

    #[tokio::test]
    async fn test_close_all_refreshed_on_current_change() {
        let (app, host, _palette) = app_with_commands();
        app.events()
            .register_handler(Arc::new(CloseAllRefresher {
                commands: Arc::downgrade(app.commands()),
            }))
            .await;
        let mut changes = app.commands().subscribe_changes();

        host.shell.add_widget(ShellArea::Main, "a.ipynb").await;
        assert_eq!(changes.recv().await.unwrap(), CLOSE_ALL);
    }

    #[test]
    fn test_unload_guard() {
        let (app, host) = Application::headless(PageConfig::default());
        install_unload_guard(&app);

        assert_eq!(host.navigator.before_unload(), None);
        app.set_dirty(true);
        assert_eq!(
            host.navigator.before_unload().as_deref(),
            Some("Are you sure you want to exit JupyterLab?\nAny unsaved changes will be lost.")
        );
    }
}
