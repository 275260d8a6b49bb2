//! LabShell CLI - Main entry point

mod report;

use clap::{Parser, Subcommand};
use lab_application::{boot, headless_services, plugins};
use lab_core::{Application, Navigator, ROUTER};
use lab_foundation::{LaunchOptions, PageConfig, ServerSettings};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// LabShell - headless application shell
#[derive(Parser, Debug)]
#[command(name = "labshell")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// URL to route after the application is restored
    url: Option<String>,

    /// Server base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Application page URL (relative to the base URL)
    #[arg(long)]
    page_url: Option<String>,

    /// File tree URL (relative to the base URL)
    #[arg(long)]
    tree_url: Option<String>,

    /// Path the server could not find
    #[arg(long)]
    not_found_url: Option<String>,

    /// Run in core mode (no extension builds)
    #[arg(long)]
    core_mode: bool,

    /// Run in dev mode
    #[arg(long)]
    dev_mode: bool,

    /// Watch mode
    #[arg(long)]
    watch: bool,

    /// File to open at startup
    #[arg(long)]
    file_to_run: Option<PathBuf>,

    /// Notebook root directory (defaults to the current directory)
    #[arg(long)]
    notebook_dir: Option<PathBuf>,

    /// Directory for persisted state (layout etc.)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Persist state under the user data directory
    #[arg(long, conflicts_with = "state_dir")]
    persist: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered plugins and their status
    Plugins,
    /// List registered commands
    Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut page_config = PageConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load page config: {}", e);
        PageConfig::default()
    });
    apply_overrides(&mut page_config, &args);

    let notebook_dir = match &args.notebook_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let options = LaunchOptions {
        core_mode: args.core_mode,
        dev_mode: args.dev_mode,
        watch: args.watch,
        app_dir: notebook_dir.clone(),
        file_to_run: args.file_to_run.clone(),
        notebook_dir,
        ..Default::default()
    };
    let settings = ServerSettings::resolve(&options, page_config);
    for warning in &settings.warnings {
        eprintln!("Warning: {}", warning);
    }

    // Boot
    let (app, host) = Application::headless(settings.page_config.clone());
    let mut descriptors = headless_services(state_dir(&args));
    descriptors.extend(plugins());
    let (registry, activation) = boot(&app, descriptors).await?;
    for failure in &activation.failures {
        warn!("{} failed: {}", failure.plugin_id, failure.error);
    }

    match args.command {
        Some(Command::Plugins) => {
            report::print_plugins(&registry.list(), args.json)?;
            return Ok(());
        }
        Some(Command::Commands) => {
            report::print_commands(&app.commands().describe(&serde_json::Value::Null), args.json)?;
            return Ok(());
        }
        None => {}
    }

    let url = args
        .url
        .clone()
        .or(settings.default_url.clone())
        .unwrap_or_else(|| host.navigator.location());
    info!("Routing {}", url);

    let router = registry.resolve(&ROUTER).await?;
    let dispatch = router.route(&url)?;
    let path = dispatch.args.path.clone();
    let outcomes = dispatch.settle().await;
    report::print_outcomes(&path, &outcomes, args.json)?;

    Ok(())
}

/// CLI 플래그로 페이지 설정 덮어쓰기
fn apply_overrides(config: &mut PageConfig, args: &Args) {
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(page_url) = &args.page_url {
        config.page_url = page_url.clone();
    }
    if let Some(tree_url) = &args.tree_url {
        config.tree_url = Some(tree_url.clone());
    }
    if let Some(not_found_url) = &args.not_found_url {
        config.not_found_url = Some(not_found_url.clone());
    }
}

fn state_dir(args: &Args) -> Option<PathBuf> {
    if let Some(dir) = &args.state_dir {
        return Some(dir.clone());
    }
    if args.persist {
        return dirs::data_dir().map(|dir| dir.join("labshell"));
    }
    None
}
