//! Replay commands

use anyhow::Result;
use botreplay_core::{
    ReplayId, ReplayReport, ReplayTurn, ReportFormat, ScenarioId, TurnStatus, generate_report,
};
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use super::{outcome_label, status_mark};
use crate::app::App;
use crate::console::CliConsole;

/// Replay a scenario and print the report; returns whether it passed
pub async fn run(app: &App, id: u64, locale: Option<String>, format: &str) -> Result<bool> {
    let console = CliConsole::new(true);
    let orchestrator = app.orchestrator();
    let scenario = app.scenarios().get(ScenarioId(id)).await?;
    let locale = locale.unwrap_or_else(|| app.config.default_locale.clone());

    let spinner = console.spinner(&format!("Replaying '{}'", scenario.name));
    let outcome = orchestrator.run_in_locale(scenario.id, &locale).await;
    spinner.finish_and_clear();
    let result = outcome?;

    let rows = orchestrator
        .diff_presentation(scenario.id, result.replay.id)
        .await?;
    let scenario = app.scenarios().get(scenario.id).await?;
    let passed = result.passed();
    let report = ReplayReport::new(scenario, result.replay, result.turns, rows);

    let report_format = ReportFormat::from_str(format).unwrap_or(ReportFormat::Table);
    println!("{}", generate_report(&report, report_format)?);

    if report_format == ReportFormat::Table {
        if passed {
            console.success("Replay matches the reference");
        } else {
            console.error(&format!(
                "Replay differs from the reference ({} error(s))",
                report.replay.error_count
            ));
        }
    }
    Ok(passed)
}

pub async fn list(app: &App, id: u64) -> Result<()> {
    let manager = app.scenarios();
    let scenario = manager.get(ScenarioId(id)).await?;
    let replays = manager.replays(scenario.id).await?;

    if replays.is_empty() {
        println!("{}", format!("'{}' was never replayed.", scenario.name).yellow());
        return Ok(());
    }

    println!(
        "\n{}",
        format!("Replays of '{}'", scenario.name).bold().underline()
    );
    println!(
        "{:>6}  {:<20} {:<18} {:<6} {:>6}",
        "ID", "Run", "Reference", "Status", "Errors"
    );
    println!("{}", "-".repeat(64).dimmed());
    for replay in replays {
        println!(
            "{:>6}  {:<20} {:<18} {:<6} {:>6}",
            replay.id.0,
            replay.last_run.format("%Y-%m-%d %H:%M:%S").to_string(),
            replay.version.label(),
            outcome_label(replay.status),
            replay.error_count
        );
    }
    Ok(())
}

pub async fn show(app: &App, replay_id: u64, format: &str) -> Result<()> {
    let manager = app.scenarios();
    let replay = manager.replay(ReplayId(replay_id)).await?;
    let scenario = manager.get(replay.scenario_id).await?;

    let turns: Vec<ReplayTurn> = manager
        .replay_turns(replay.id)
        .await?
        .into_iter()
        .map(|record| ReplayTurn {
            turn: record.turn,
            status: record.status,
        })
        .collect();
    let rows = app
        .orchestrator()
        .diff_presentation(scenario.id, replay.id)
        .await?;

    let report_format = ReportFormat::from_str(format).unwrap_or(ReportFormat::Table);
    let report = ReplayReport::new(scenario, replay, turns, rows);
    println!("{}", generate_report(&report, report_format)?);

    if report_format == ReportFormat::Table && !report.rows.is_empty() {
        let matched = report.rows.iter().filter(|r| !r.status.is_mismatch()).count();
        let overall = if matched == report.rows.len() {
            TurnStatus::Matched
        } else {
            TurnStatus::Mismatched
        };
        println!(
            "{} {}/{} answers unchanged",
            status_mark(overall),
            matched,
            report.rows.len()
        );
    }
    Ok(())
}

pub async fn remove(app: &App, replay_id: u64, force: bool) -> Result<()> {
    let manager = app.scenarios();
    let replay = manager.replay(ReplayId(replay_id)).await?;

    if !force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete replay #{}?", replay.id))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    manager.remove_replay(replay.id).await?;
    CliConsole::new(true).success(&format!("Deleted replay #{}", replay.id));
    Ok(())
}
