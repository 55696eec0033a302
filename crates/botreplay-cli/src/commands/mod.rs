//! CLI commands

pub mod bots;
pub mod config;
pub mod promote;
pub mod record;
pub mod replay;
pub mod scenario;
pub mod versions;

use botreplay_core::{Outcome, TurnStatus};
use colored::*;

/// Colored PASS/FAIL label
pub(crate) fn outcome_label(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Pass => "PASS".green().bold(),
        Outcome::Fail => "FAIL".red().bold(),
    }
}

pub(crate) fn status_mark(status: TurnStatus) -> ColoredString {
    match status {
        TurnStatus::Matched => "✓".green(),
        TurnStatus::Mismatched => "✗".red(),
    }
}
