//! Replay records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Outcome, ReplayId, ScenarioId, Turn, TurnStatus, Version};

/// One execution of a scenario against a live bot
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    pub id: ReplayId,

    pub scenario_id: ScenarioId,

    /// Reference version the replay was compared against
    pub version: Version,

    pub last_run: DateTime<Utc>,

    pub status: Outcome,

    pub error_count: usize,
}

/// Fields supplied when persisting a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReplay {
    pub scenario_id: ScenarioId,
    pub version: Version,
    pub last_run: DateTime<Utc>,
    pub status: Outcome,
    pub error_count: usize,
}

/// A turn produced by the live bot during a replay, before persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayTurn {
    pub turn: Turn,

    #[serde(default)]
    pub status: TurnStatus,
}

impl ReplayTurn {
    pub fn new(turn: Turn) -> Self {
        Self {
            turn,
            status: TurnStatus::Matched,
        }
    }
}

/// A persisted replay turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayTurnRecord {
    pub id: u64,

    pub replay_id: ReplayId,

    /// Position within the replay, starting at 0
    pub seq: u64,

    pub turn: Turn,

    pub status: TurnStatus,
}
