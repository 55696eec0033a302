//! Replay reports
//!
//! Renders a replay summary with its per-turn statuses and the
//! question/answer review rows as a terminal table, Markdown or JSON.

mod json;
mod markdown;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

use anyhow::Result;
use serde::Serialize;

use crate::diff::ResultRow;
use crate::model::{Replay, ReplayTurn, Scenario, TurnStatus};

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Table,
    Markdown,
    Json,
}

impl ReportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(ReportFormat::Table),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Everything shown about one replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub scenario: Scenario,
    pub replay: Replay,
    /// Label of the reference version the replay ran against
    pub version_label: String,
    pub turns: Vec<ReplayTurn>,
    pub rows: Vec<ResultRow>,
}

impl ReplayReport {
    pub fn new(
        scenario: Scenario,
        replay: Replay,
        turns: Vec<ReplayTurn>,
        rows: Vec<ResultRow>,
    ) -> Self {
        Self {
            version_label: replay.version.label(),
            scenario,
            replay,
            turns,
            rows,
        }
    }

    pub fn mismatched_turns(&self) -> usize {
        self.turns.iter().filter(|t| t.status.is_mismatch()).count()
    }
}

/// Generate a report in the specified format
pub fn generate_report(report: &ReplayReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => generate_table(report),
        ReportFormat::Markdown => MarkdownReporter::generate(report),
        ReportFormat::Json => JsonReporter::generate(report),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn status_label(status: TurnStatus) -> &'static str {
    match status {
        TurnStatus::Matched => "OK",
        TurnStatus::Mismatched => "DIFF",
    }
}

/// Simple table report for terminal output
fn generate_table(report: &ReplayReport) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{:=<78}\n",
        format!("= Replay #{} of '{}' ", report.replay.id, report.scenario.name)
    ));
    output.push_str(&format!(
        "Bot: {} | Reference: {} | Run: {}\n",
        report.scenario.bot_key,
        report.version_label,
        report.replay.last_run.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "Status: {} | Errors: {}\n",
        report.replay.status, report.replay.error_count
    ));
    output.push_str(&format!("{:=<78}\n\n", ""));

    output.push_str("TURNS\n");
    output.push_str(&format!("{:-<78}\n", ""));
    output.push_str(&format!("{:>4} {:<6} {:<58} {:>6}\n", "#", "Role", "Text", "Status"));
    output.push_str(&format!("{:-<78}\n", ""));
    for (index, turn) in report.turns.iter().enumerate() {
        output.push_str(&format!(
            "{:>4} {:<6} {:<58} {:>6}\n",
            index,
            turn.turn.role().to_string(),
            truncate(turn.turn.text(), 58),
            status_label(turn.status)
        ));
    }
    output.push_str(&format!("{:-<78}\n\n", ""));

    output.push_str("ANSWERS\n");
    output.push_str(&format!("{:-<78}\n", ""));
    if report.rows.is_empty() {
        output.push_str("(no questions to compare)\n");
    }
    for row in &report.rows {
        output.push_str(&format!("[{}] Q: {}\n", status_label(row.status), row.question));
        output.push_str(&format!(
            "       expected: {}\n",
            row.reference_answer.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "       current:  {}\n",
            row.current_answer.as_deref().unwrap_or("-")
        ));
    }
    output.push_str(&format!("{:=<78}\n", ""));

    Ok(output)
}
