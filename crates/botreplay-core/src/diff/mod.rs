//! Alignment and diff engine
//!
//! Compares a reference turn sequence with the turns a live bot
//! produced during a replay. Two independent passes exist:
//!
//! - **Scoring** assigns a status to every replay turn and counts
//!   errors; it decides pass/fail.
//! - **Presentation** pairs each reference question with the reference
//!   and current answers for human review. It never feeds the error
//!   count.
//!
//! Both passes compare strictly by position. An inserted or dropped
//! turn shifts every later index and shows up as a run of mismatches,
//! not as one localized difference. Existing pass/fail verdicts depend
//! on this, so any aligning algorithm has to be added as a new
//! [`DiffAlgorithm`] variant rather than changing this one.

mod presentation;
mod scoring;

pub use presentation::{ResultRow, present};
pub use scoring::{Scoring, score, score_replay_turns};

use serde::{Deserialize, Serialize};

use crate::model::{ReplayTurn, Turn};

/// Comparison strategy used for a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffAlgorithm {
    /// Index-by-index comparison without realignment
    #[default]
    Positional,
}

impl DiffAlgorithm {
    /// Scoring pass
    pub fn score(&self, reference: &[Turn], replay: &[Turn]) -> Scoring {
        match self {
            DiffAlgorithm::Positional => score(reference, replay),
        }
    }

    /// Scoring pass writing statuses onto replay turns; returns the error count
    pub fn score_in_place(&self, reference: &[Turn], replay: &mut [ReplayTurn]) -> usize {
        match self {
            DiffAlgorithm::Positional => score_replay_turns(reference, replay),
        }
    }

    /// Presentation pass
    pub fn present(&self, reference: &[Turn], replay: &[Turn]) -> Vec<ResultRow> {
        match self {
            DiffAlgorithm::Positional => present(reference, replay),
        }
    }
}
