//! Layout plugin - 셸 레이아웃 복원과 변경 시 저장

use async_trait::async_trait;
use lab_core::{
    Application, Dependencies, LayoutRestorer, PluginDescriptor, Shell, LAYOUT_RESTORER, STATE_DB,
};
use lab_foundation::{EventHandler, EventType, LabEvent, Result};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

pub const PLUGIN_ID: &str = "@lab/application-extension:layout";

pub fn plugin() -> PluginDescriptor {
    PluginDescriptor::new(PLUGIN_ID)
        .with_description("Restores the shell layout and saves it on change")
        .requires(&STATE_DB)
        .auto_start(true)
        .provides(&LAYOUT_RESTORER, activate)
}

async fn activate(app: Application, deps: Dependencies) -> Result<Arc<LayoutRestorer>> {
    let state = deps.get(&STATE_DB)?;
    let restorer = Arc::new(LayoutRestorer::new(state));
    let shell = Arc::clone(&app.host().shell);

    let saved = match restorer.fetch().await {
        Ok(saved) => saved,
        Err(e) => {
            warn!("Fetching saved layout failed: {}", e);
            None
        }
    };
    shell.restore_layout(saved).await;

    // 복원 이후의 변경만 저장
    app.events()
        .register_handler(Arc::new(LayoutSaver {
            shell: Arc::downgrade(&shell),
            restorer: Arc::clone(&restorer),
        }))
        .await;

    Ok(restorer)
}

/// `LayoutModified` → 현재 레이아웃 저장
struct LayoutSaver {
    shell: Weak<dyn Shell>,
    restorer: Arc<LayoutRestorer>,
}

#[async_trait]
impl EventHandler for LayoutSaver {
    fn name(&self) -> &str {
        "application:layout-saver"
    }

    fn interested_events(&self) -> Vec<EventType> {
        vec![EventType::LayoutModified]
    }

    async fn handle(&self, _event: &LabEvent) {
        let Some(shell) = self.shell.upgrade() else {
            debug!("Shell dropped, skipping layout save");
            return;
        };
        if let Err(e) = self.restorer.save(shell.save_layout()).await {
            warn!("Saving layout failed: {}", e);
        }
    }
}
