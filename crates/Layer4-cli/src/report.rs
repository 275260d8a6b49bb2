//! 실행 결과 출력

use lab_core::{CommandInfo, PluginInfo, RouteOutcome};
use serde_json::json;

pub fn print_plugins(plugins: &[PluginInfo], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(plugins)?);
        return Ok(());
    }

    for plugin in plugins {
        let provides = plugin.provides.as_deref().unwrap_or("-");
        println!("{:<10} {} (provides {})", plugin.status.to_string(), plugin.id, provides);
        if !plugin.requires.is_empty() {
            println!("           requires: {}", plugin.requires.join(", "));
        }
        if let Some(failure) = &plugin.failure {
            println!("           error: {}", failure);
        }
    }
    Ok(())
}

pub fn print_commands(commands: &[CommandInfo], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(commands)?);
        return Ok(());
    }

    for command in commands {
        let mut flags = Vec::new();
        if command.toggled {
            flags.push("toggled");
        }
        if !command.visible {
            flags.push("hidden");
        }
        if !command.enabled {
            flags.push("disabled");
        }
        let label = if command.label.is_empty() { "-" } else { &command.label };
        println!("{:<40} {} {}", command.id, label, flags.join(" "));
    }
    Ok(())
}

pub fn print_outcomes(path: &str, outcomes: &[RouteOutcome], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let results: Vec<_> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(value) => json!({ "command": outcome.command, "result": value }),
                Err(e) => json!({ "command": outcome.command, "error": e.to_string() }),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "path": path, "outcomes": results }))?
        );
        return Ok(());
    }

    if outcomes.is_empty() {
        println!("No route matches {}", path);
        return Ok(());
    }
    for outcome in outcomes {
        match &outcome.result {
            Ok(value) => println!("✓ {} -> {}", outcome.command, value),
            Err(e) => println!("✗ {} failed: {}", outcome.command, e),
        }
    }
    Ok(())
}
