//! In-memory repository

use super::{Repository, ScenarioFilter, StorageResult, StoreState};
use crate::model::{
    NewReplay, NewScenario, Replay, ReplayId, ReplayTurn, ReplayTurnRecord, Scenario, ScenarioId,
    Turn, TurnRecord, Version,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

/// Repository kept entirely in process memory
///
/// Used by tests and by short-lived tooling that does not need to
/// survive a restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<StoreState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_scenario(&self, scenario: NewScenario) -> StorageResult<Scenario> {
        Ok(self.state.write().create_scenario(scenario, Utc::now()))
    }

    async fn load_scenario(&self, id: ScenarioId) -> StorageResult<Option<Scenario>> {
        Ok(self.state.read().scenario(id).cloned())
    }

    async fn update_scenario(&self, scenario: &Scenario) -> StorageResult<()> {
        self.state.write().update_scenario(scenario)
    }

    async fn delete_scenario(&self, id: ScenarioId) -> StorageResult<()> {
        self.state.write().delete_scenario(id)
    }

    async fn list_scenarios(&self, filter: &ScenarioFilter) -> StorageResult<Vec<Scenario>> {
        Ok(self.state.read().list_scenarios(filter))
    }

    async fn append_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
        turns: Vec<Turn>,
    ) -> StorageResult<Vec<TurnRecord>> {
        self.state.write().append_turns(scenario_id, version, turns)
    }

    async fn create_scenario_with_turns(
        &self,
        scenario: NewScenario,
        turns: Vec<Turn>,
    ) -> StorageResult<Scenario> {
        self.state
            .write()
            .create_scenario_with_turns(scenario, turns, Utc::now())
    }

    async fn load_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
    ) -> StorageResult<Vec<TurnRecord>> {
        Ok(self.state.read().turns(scenario_id, version))
    }

    async fn list_versions(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Version>> {
        Ok(self.state.read().versions(scenario_id))
    }

    async fn create_replay(
        &self,
        replay: NewReplay,
        turns: Vec<ReplayTurn>,
    ) -> StorageResult<Replay> {
        self.state.write().create_replay(replay, turns)
    }

    async fn record_replay(
        &self,
        replay: NewReplay,
        turns: Vec<ReplayTurn>,
        scenario: &Scenario,
    ) -> StorageResult<Replay> {
        self.state.write().record_replay(replay, turns, scenario)
    }

    async fn load_replay(&self, id: ReplayId) -> StorageResult<Option<Replay>> {
        Ok(self.state.read().replay(id).cloned())
    }

    async fn load_replay_turns(&self, id: ReplayId) -> StorageResult<Vec<ReplayTurnRecord>> {
        Ok(self.state.read().replay_turns(id))
    }

    async fn list_replays(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Replay>> {
        Ok(self.state.read().replays(scenario_id))
    }

    async fn delete_replay(&self, id: ReplayId) -> StorageResult<()> {
        self.state.write().delete_replay(id)
    }
}
