//! Scenario management commands

use anyhow::Result;
use botreplay_core::{ScenarioFilter, ScenarioId, Version};
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use super::outcome_label;
use crate::app::App;
use crate::console::CliConsole;

pub async fn list(
    app: &App,
    bot: Option<String>,
    title: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let mut filter = ScenarioFilter::new();
    if let Some(bot) = bot {
        filter = filter.with_bot(bot);
    }
    if let Some(title) = title {
        filter = filter.with_name(title);
    }
    if let Some(limit) = limit {
        filter = filter.with_limit(limit);
    }

    let scenarios = app.scenarios().list(&filter).await?;
    if scenarios.is_empty() {
        println!("{}", "No scenarios found.".yellow());
        return Ok(());
    }

    println!("\n{}", "Scenarios".bold().underline());
    println!(
        "{:>5}  {:<30} {:<16} {:<18} {:<6} {}",
        "ID", "Name", "Bot", "Reference", "Status", "Last run"
    );
    println!("{}", "-".repeat(96).dimmed());

    for scenario in scenarios {
        let last_run = scenario
            .last_run
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:>5}  {:<30} {:<16} {:<18} {:<6} {}",
            scenario.id.0,
            scenario.name,
            scenario.bot_key,
            scenario.version.label(),
            outcome_label(scenario.status),
            last_run.dimmed()
        );
    }
    Ok(())
}

pub async fn show(app: &App, id: u64) -> Result<()> {
    let manager = app.scenarios();
    let scenario = manager.get(ScenarioId(id)).await?;
    let turns = manager
        .transcripts()
        .load_turns(scenario.id, scenario.version)
        .await?;

    let console = CliConsole::new(true);
    console.print_header(&format!("#{} {}", scenario.id, scenario.name));
    if !scenario.description.is_empty() {
        println!("{}", scenario.description.dimmed());
    }
    println!("Bot:       {}", scenario.bot_key);
    println!("Reference: {}", scenario.version.label());
    println!("Status:    {}", outcome_label(scenario.status));
    println!(
        "Created:   {}",
        scenario.created.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(last_run) = scenario.last_run {
        println!("Last run:  {}", last_run.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    println!();
    for record in turns {
        let who = if record.turn.is_user() {
            "user:".blue().bold()
        } else {
            "bot: ".cyan().bold()
        };
        println!("{:>4} {} {}", record.seq, who, record.turn.text());
    }
    Ok(())
}

pub async fn edit(
    app: &App,
    id: u64,
    name: Option<String>,
    description: Option<String>,
    version: Option<u64>,
) -> Result<()> {
    let manager = app.scenarios();
    let console = CliConsole::new(true);
    let id = ScenarioId(id);

    if name.is_none() && description.is_none() && version.is_none() {
        console.warn("Nothing to change; use --name, --description or --version");
        return Ok(());
    }

    let mut scenario = manager.get(id).await?;
    if name.is_some() || description.is_some() {
        scenario = manager.update_details(id, name, description).await?;
    }
    if let Some(version) = version {
        scenario = manager.select_version(id, Version(version)).await?;
    }

    console.success(&format!(
        "Updated '{}' (reference: {})",
        scenario.name,
        scenario.version.label()
    ));
    Ok(())
}

pub async fn remove(app: &App, id: u64, force: bool) -> Result<()> {
    let manager = app.scenarios();
    let scenario = manager.get(ScenarioId(id)).await?;

    if !force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete '{}' with all its versions and replays?",
                scenario.name
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    manager.remove(scenario.id).await?;
    CliConsole::new(true).success(&format!("Deleted scenario '{}'", scenario.name));
    Ok(())
}
