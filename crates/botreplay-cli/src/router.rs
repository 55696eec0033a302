//! Command routing logic for CLI

use std::process::ExitCode;

use anyhow::Result;

use crate::app::{App, Settings};
use crate::args::{Cli, Commands, ConfigAction, ReplayAction, ScenarioAction};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, settings: Settings) -> Result<ExitCode> {
    // Config commands work without opening the store
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Show => commands::config::show(&settings)?,
            ConfigAction::Init { force } => commands::config::init(&settings, *force)?,
        }
        return Ok(ExitCode::SUCCESS);
    }

    let app = App::open(&settings).await?;

    match cli.command {
        Commands::Bots => commands::bots::list(&app).await?,
        Commands::Record {
            bot,
            locale,
            name,
            description,
        } => commands::record::run(&app, &bot, locale, &name, &description).await?,
        Commands::Scenario { action } => route_scenario(&app, action).await?,
        Commands::Versions { id } => commands::versions::list(&app, id).await?,
        Commands::Replay { action } => return route_replay(&app, action).await,
        Commands::Promote { replay_id } => commands::promote::run(&app, replay_id).await?,
        Commands::Config { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

async fn route_scenario(app: &App, action: ScenarioAction) -> Result<()> {
    match action {
        ScenarioAction::List { bot, title, limit } => {
            commands::scenario::list(app, bot, title, limit).await
        }
        ScenarioAction::Show { id } => commands::scenario::show(app, id).await,
        ScenarioAction::Edit {
            id,
            name,
            description,
            version,
        } => commands::scenario::edit(app, id, name, description, version).await,
        ScenarioAction::Remove { id, force } => commands::scenario::remove(app, id, force).await,
    }
}

async fn route_replay(app: &App, action: ReplayAction) -> Result<ExitCode> {
    match action {
        ReplayAction::Run { id, locale, format } => {
            let passed = commands::replay::run(app, id, locale, &format).await?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        ReplayAction::List { id } => {
            commands::replay::list(app, id).await?;
            Ok(ExitCode::SUCCESS)
        }
        ReplayAction::Show { replay_id, format } => {
            commands::replay::show(app, replay_id, &format).await?;
            Ok(ExitCode::SUCCESS)
        }
        ReplayAction::Remove { replay_id, force } => {
            commands::replay::remove(app, replay_id, force).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
