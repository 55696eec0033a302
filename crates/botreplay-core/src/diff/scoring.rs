//! Scoring pass

use serde::{Deserialize, Serialize};

use crate::model::{Outcome, ReplayTurn, Turn, TurnStatus};

/// Result of the scoring pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    /// One status per replay turn, same order as the replay
    pub statuses: Vec<TurnStatus>,

    /// Mismatches plus every index past the shorter sequence
    pub error_count: usize,
}

impl Scoring {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_error_count(self.error_count)
    }

    pub fn passed(&self) -> bool {
        self.error_count == 0
    }
}

/// Compare two turns at the same index
///
/// A reference user turn answered by a bot turn at the same index is
/// deliberately not flagged; only the opposite role flip is.
fn is_mismatch(expected: &Turn, actual: &Turn) -> bool {
    match (expected, actual) {
        (Turn::User(expected), Turn::User(actual)) => expected != actual,
        (Turn::Bot(expected), Turn::Bot(actual)) => expected != actual,
        (Turn::Bot(_), Turn::User(_)) => true,
        (Turn::User(_), Turn::Bot(_)) => false,
    }
}

/// Positional scoring of `replay` against `reference`
pub fn score(reference: &[Turn], replay: &[Turn]) -> Scoring {
    let min_len = reference.len().min(replay.len());
    let max_len = reference.len().max(replay.len());

    let mut statuses = vec![TurnStatus::Matched; replay.len()];
    let mut error_count = 0;

    for i in 0..max_len {
        if i < min_len {
            if is_mismatch(&reference[i], &replay[i]) {
                statuses[i] = TurnStatus::Mismatched;
                error_count += 1;
            }
        } else {
            // Extra replay turns get flagged; missing ones only count.
            if i < replay.len() {
                statuses[i] = TurnStatus::Mismatched;
            }
            error_count += 1;
        }
    }

    Scoring {
        statuses,
        error_count,
    }
}

/// Score replay turns in place and return the error count
pub fn score_replay_turns(reference: &[Turn], replay: &mut [ReplayTurn]) -> usize {
    let turns: Vec<Turn> = replay.iter().map(|t| t.turn.clone()).collect();
    let scoring = score(reference, &turns);

    for (replay_turn, status) in replay.iter_mut().zip(scoring.statuses) {
        replay_turn.status = status;
    }
    scoring.error_count
}
