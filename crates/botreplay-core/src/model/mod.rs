//! Core data model
//!
//! Defines the records the rest of the crate works with:
//! - Scenario: a named reference conversation for one bot
//! - Turn: one utterance, tagged by who said it
//! - Replay: one execution of a scenario against a live bot
//! - Version: which recorded turn sequence is the current reference

mod ids;
mod replay;
mod scenario;
mod turn;

pub use ids::{ReplayId, ScenarioId, Version};
pub use replay::{NewReplay, Replay, ReplayTurn, ReplayTurnRecord};
pub use scenario::{NewScenario, Outcome, Scenario};
pub use turn::{Role, Turn, TurnRecord, TurnStatus};
