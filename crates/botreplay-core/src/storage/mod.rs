//! Repository abstraction
//!
//! Persistence of scenarios, turns and replays sits behind the
//! [`Repository`] trait so the replay engine never depends on a
//! concrete backend. [`MemoryRepository`] lives here; the file backed
//! repository lives in `botreplay-store`.

mod memory;
mod state;

pub use memory::MemoryRepository;
pub use state::StoreState;

use crate::model::{
    NewReplay, NewScenario, Replay, ReplayId, ReplayTurn, ReplayTurnRecord, Scenario, ScenarioId,
    Turn, TurnRecord, Version,
};
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Storage path not available")]
    PathUnavailable,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Filter criteria for scenario listing
#[derive(Debug, Default, Clone)]
pub struct ScenarioFilter {
    /// Only scenarios for this bot
    pub bot_key: Option<String>,

    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl ScenarioFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bot(mut self, bot_key: impl Into<String>) -> Self {
        self.bot_key = Some(bot_key.into());
        self
    }

    pub fn with_name(mut self, search: impl Into<String>) -> Self {
        self.name_contains = Some(search.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if a scenario matches this filter (the limit is applied by the caller)
    pub fn matches(&self, scenario: &Scenario) -> bool {
        if let Some(ref bot_key) = self.bot_key {
            if &scenario.bot_key != bot_key {
                return false;
            }
        }

        if let Some(ref search) = self.name_contains {
            if !scenario
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

/// Persistence backend for scenarios, transcripts and replays
///
/// Lookups return `Ok(None)` for unknown ids; deciding whether that is
/// an error belongs to the caller.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Create a scenario at version 0 with a passing status
    async fn create_scenario(&self, scenario: NewScenario) -> StorageResult<Scenario>;

    async fn load_scenario(&self, id: ScenarioId) -> StorageResult<Option<Scenario>>;

    /// Overwrite an existing scenario
    async fn update_scenario(&self, scenario: &Scenario) -> StorageResult<()>;

    /// Delete a scenario with its turns, replays and replay turns
    async fn delete_scenario(&self, id: ScenarioId) -> StorageResult<()>;

    /// Scenarios matching the filter, ordered by id
    async fn list_scenarios(&self, filter: &ScenarioFilter) -> StorageResult<Vec<Scenario>>;

    /// Append turns at the end of (scenario, version) in one critical section
    ///
    /// Sequence numbers continue from the last stored turn of that
    /// version, so interleaved writers never produce ambiguous order.
    async fn append_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
        turns: Vec<Turn>,
    ) -> StorageResult<Vec<TurnRecord>>;

    /// Turns of (scenario, version) ordered by sequence number
    async fn load_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
    ) -> StorageResult<Vec<TurnRecord>>;

    /// Distinct versions of a scenario, ordered by their first turn's creation
    async fn list_versions(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Version>>;

    /// Persist a replay together with its turns
    async fn create_replay(
        &self,
        replay: NewReplay,
        turns: Vec<ReplayTurn>,
    ) -> StorageResult<Replay>;

    async fn load_replay(&self, id: ReplayId) -> StorageResult<Option<Replay>>;

    /// Replay turns ordered by sequence number
    async fn load_replay_turns(&self, id: ReplayId) -> StorageResult<Vec<ReplayTurnRecord>>;

    /// Replays of a scenario, newest first
    async fn list_replays(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Replay>>;

    /// Delete a replay and its turns
    async fn delete_replay(&self, id: ReplayId) -> StorageResult<()>;

    /// Create a scenario together with its version 0 transcript
    ///
    /// Either both are stored or neither is. Backends that cannot write
    /// both at once fall back to removing the scenario again when the
    /// turns cannot be appended.
    async fn create_scenario_with_turns(
        &self,
        scenario: NewScenario,
        turns: Vec<Turn>,
    ) -> StorageResult<Scenario> {
        let created = self.create_scenario(scenario).await?;
        if let Err(err) = self
            .append_turns(created.id, Version::INITIAL, turns)
            .await
        {
            if let Err(cleanup) = self.delete_scenario(created.id).await {
                tracing::warn!(
                    "Could not remove scenario {} after failed append: {}",
                    created.id,
                    cleanup
                );
            }
            return Err(err);
        }
        Ok(created)
    }

    /// Persist a finished replay and the scenario status it produced
    ///
    /// Either both are stored or neither is; the same fallback as
    /// [`Repository::create_scenario_with_turns`] applies.
    async fn record_replay(
        &self,
        replay: NewReplay,
        turns: Vec<ReplayTurn>,
        scenario: &Scenario,
    ) -> StorageResult<Replay> {
        let created = self.create_replay(replay, turns).await?;
        if let Err(err) = self.update_scenario(scenario).await {
            if let Err(cleanup) = self.delete_replay(created.id).await {
                tracing::warn!(
                    "Could not remove replay {} after failed scenario update: {}",
                    created.id,
                    cleanup
                );
            }
            return Err(err);
        }
        Ok(created)
    }

    /// Check if a scenario exists
    async fn scenario_exists(&self, id: ScenarioId) -> StorageResult<bool> {
        Ok(self.load_scenario(id).await?.is_some())
    }
}
