//! Bot catalog listing

use anyhow::{Context, Result};
use botreplay_core::BotCatalog;
use colored::*;

use crate::app::App;

/// List every bot and locale the bot service offers
pub async fn list(app: &App) -> Result<()> {
    let bots = app
        .driver()
        .list_bots()
        .await
        .with_context(|| format!("Failed to reach bot service at {}", app.config.bot_endpoint))?;

    if bots.is_empty() {
        println!("{}", "No bots available.".yellow());
        return Ok(());
    }

    println!("\n{}", "Available bots".bold().underline());
    println!("{:<20} {:<8} {:<25} {}", "Key", "Locale", "Name", "Description");
    println!("{}", "-".repeat(80).dimmed());

    for bot in &bots {
        for offer in bot.offers(&app.config.default_locale) {
            println!(
                "{:<20} {:<8} {:<25} {}",
                offer.key.cyan(),
                offer.locale,
                offer.name,
                offer.description.dimmed()
            );
        }
    }

    Ok(())
}
