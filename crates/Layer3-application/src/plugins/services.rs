//! Headless service plugins
//!
//! 브라우저 호스트에서는 다른 확장이 제공하는 팔레트, 상태 저장소,
//! 파일 브라우저를 대신한다.

use crate::command_ids::NAVIGATE_MAIN;
use lab_core::{
    Application, CommandPalette, CommandSpec, Dependencies, MemoryStateDb, PaletteModel,
    PluginDescriptor, StateDb, COMMAND_PALETTE, STATE_DB,
};
use lab_foundation::{Error, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub const PALETTE_PLUGIN_ID: &str = "@lab/services:palette";
pub const STATE_PLUGIN_ID: &str = "@lab/services:state";
pub const FILEBROWSER_PLUGIN_ID: &str = "@lab/services:filebrowser";

/// 항목을 기록만 하는 커맨드 팔레트
pub fn palette_plugin() -> PluginDescriptor {
    PluginDescriptor::new(PALETTE_PLUGIN_ID)
        .with_description("In-memory command palette")
        .provides(&COMMAND_PALETTE, open_palette)
}

async fn open_palette(_app: Application, _deps: Dependencies) -> Result<Arc<dyn CommandPalette>> {
    let palette: Arc<dyn CommandPalette> = Arc::new(PaletteModel::new());
    Ok(palette)
}

/// 상태 저장소 (`dir`이 있으면 키마다 `dir/<key>.json`에 영속화)
pub fn state_plugin(dir: Option<PathBuf>) -> PluginDescriptor {
    PluginDescriptor::new(STATE_PLUGIN_ID)
        .with_description("Key-value state database")
        .provides(&STATE_DB, move |_, _| open_state(dir.clone()))
}

async fn open_state(dir: Option<PathBuf>) -> Result<Arc<dyn StateDb>> {
    let state: Arc<dyn StateDb> = match dir {
        Some(dir) => {
            info!("Persisting state under {}", dir.display());
            Arc::new(MemoryStateDb::persistent(dir)?)
        }
        None => Arc::new(MemoryStateDb::new()),
    };
    Ok(state)
}

/// `filebrowser:navigate-main`을 제공하는 파일 브라우저
pub fn filebrowser_plugin() -> PluginDescriptor {
    PluginDescriptor::new(FILEBROWSER_PLUGIN_ID)
        .with_description("Headless file browser")
        .auto_start(true)
        .activate(activate_filebrowser)
}

async fn activate_filebrowser(app: Application, _deps: Dependencies) -> Result<()> {
    app.commands()
        .add_command(NAVIGATE_MAIN, CommandSpec::new(navigate_main).with_label("Navigate"))
}

async fn navigate_main(args: Value) -> Result<Value> {
    let path = args
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidInput("navigate-main requires a path".into()))?;
    info!("Opening {} in the file browser", path);
    Ok(json!({ "path": path }))
}
