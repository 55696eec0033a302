//! Interactive scenario recording

use anyhow::Result;
use botreplay_core::{BotCatalog, Role};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use crate::app::App;
use crate::console::CliConsole;

/// Talk to a bot, then save the conversation as a new scenario
///
/// An empty message ends the conversation.
pub async fn run(
    app: &App,
    bot_key: &str,
    locale: Option<String>,
    name: &str,
    description: &str,
) -> Result<()> {
    let console = CliConsole::new(true);
    let locale = locale.unwrap_or_else(|| app.config.default_locale.clone());

    match app.driver().find_bot(bot_key).await {
        Ok(Some(bot)) if !bot.speaks(&locale) => {
            console.warn(&format!("{} does not declare locale '{}'", bot.name, locale));
        }
        Ok(None) => console.warn(&format!("Bot '{}' is not in the catalog", bot_key)),
        Err(e) => tracing::debug!("Catalog lookup failed: {}", e),
        _ => {}
    }

    let recorder = app.recorder();
    let session = recorder.start(bot_key, locale.as_str());

    console.print_header(&format!("Recording '{}' with {} ({})", name, bot_key, locale));
    println!("{}", "Send an empty message to finish.".dimmed());

    let theme = ColorfulTheme::default();
    let mut shown = 0;
    loop {
        let message: String = Input::with_theme(&theme)
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;
        if message.trim().is_empty() {
            break;
        }

        let spinner = console.spinner("waiting for the bot");
        let outcome = session.say(&message).await;
        spinner.finish_and_clear();

        if let Err(e) = outcome {
            console.error(&format!("{}", e));
            continue;
        }

        let posts = session.posts().await?;
        for post in posts.iter().skip(shown) {
            if post.role == Role::Bot && !post.content.is_empty() {
                println!("{} {}", "bot:".cyan().bold(), post.content);
            }
        }
        shown = posts.len();
    }

    let save = Confirm::with_theme(&theme)
        .with_prompt(format!("Save scenario '{}'?", name))
        .default(true)
        .interact()?;
    if !save {
        console.warn("Recording discarded");
        return Ok(());
    }

    let scenario = recorder.save(&session, name, description).await?;
    console.success(&format!("Saved scenario #{} '{}'", scenario.id, scenario.name));
    Ok(())
}
