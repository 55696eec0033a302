//! Configuration management commands

use anyhow::{Context, Result, bail};
use botreplay_core::BotReplayConfig;
use botreplay_core::config::save_config;
use colored::*;

use crate::app::Settings;
use crate::console::CliConsole;

/// Show the effective configuration
pub fn show(settings: &Settings) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    match &settings.config_path {
        Some(path) if path.exists() => {
            console.success(&format!("Loaded configuration from: {}", path.display()));
        }
        Some(path) => {
            console.warn(&format!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            ));
        }
        None => console.warn("No configuration file (using defaults)"),
    }

    print_config(&settings.config);
    Ok(())
}

/// Write the default configuration to the config file
pub fn init(settings: &Settings, force: bool) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Initialization");

    let path = match settings.config_path.clone() {
        Some(path) => path,
        None => bail!("Cannot determine a configuration path; pass --config-file"),
    };

    if path.exists() && !force {
        console.error(&format!("Configuration file already exists: {}", path.display()));
        bail!("Use --force to overwrite {}", path.display());
    }

    save_config(&BotReplayConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    console.success(&format!("Created configuration file: {}", path.display()));
    Ok(())
}

fn print_config(config: &BotReplayConfig) {
    println!("{:<18} {}", "data_dir:".bold(), config.data_dir.display());
    println!("{:<18} {}", "bot_endpoint:".bold(), config.bot_endpoint);
    println!("{:<18} {}", "default_locale:".bold(), config.default_locale);
    println!("{:<18} {}s", "turn_timeout:".bold(), config.turn_timeout_secs);
    println!("{:<18} {}s", "connect_timeout:".bold(), config.connect_timeout_secs);
    println!(
        "{:<18} {} ({})",
        "logging:".bold(),
        config.logging.level,
        config.logging.format
    );
}
