//! Local filesystem repository
//!
//! The whole store lives in `<data_dir>/botreplay.json`. Writes go to a
//! temporary file first and are renamed into place, so a crash never
//! leaves a half written store behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use botreplay_core::model::{
    NewReplay, NewScenario, Replay, ReplayId, ReplayTurn, ReplayTurnRecord, Scenario, ScenarioId,
    Turn, TurnRecord, Version,
};
use botreplay_core::storage::{
    Repository, ScenarioFilter, StorageError, StorageResult, StoreState,
};
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Name of the store document inside the data directory
pub const STORE_FILE: &str = "botreplay.json";

/// Repository persisted as one JSON file
///
/// Every mutation is applied to a copy of the state, written to disk,
/// and only then made visible. A failed write leaves both the file and
/// the in-memory state unchanged.
pub struct LocalRepository {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl LocalRepository {
    /// Open the store in `~/.botreplay`
    pub async fn open_default() -> StorageResult<Self> {
        let dir = dirs::home_dir()
            .ok_or(StorageError::PathUnavailable)?
            .join(".botreplay");
        Self::open(dir).await
    }

    /// Open (or create) the store in `dir`
    pub async fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let path = dir.join(STORE_FILE);

        let state = if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path).await?;
            let state: StoreState = serde_json::from_str(&content)?;
            debug!("Loaded store from {:?}", path);
            state
        } else {
            debug!("No store at {:?}, starting empty", path);
            StoreState::new()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Location of the store document
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, state: &StoreState) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!("Saved store to {:?}", self.path);
        Ok(())
    }

    async fn mutate<T: Send>(
        &self,
        apply: impl FnOnce(&mut StoreState) -> StorageResult<T> + Send,
    ) -> StorageResult<T> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let out = apply(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(out)
    }
}

#[async_trait]
impl Repository for LocalRepository {
    async fn create_scenario(&self, scenario: NewScenario) -> StorageResult<Scenario> {
        self.mutate(|state| Ok(state.create_scenario(scenario, Utc::now())))
            .await
    }

    async fn load_scenario(&self, id: ScenarioId) -> StorageResult<Option<Scenario>> {
        Ok(self.state.lock().await.scenario(id).cloned())
    }

    async fn update_scenario(&self, scenario: &Scenario) -> StorageResult<()> {
        self.mutate(|state| state.update_scenario(scenario)).await
    }

    async fn delete_scenario(&self, id: ScenarioId) -> StorageResult<()> {
        self.mutate(|state| state.delete_scenario(id)).await
    }

    async fn list_scenarios(&self, filter: &ScenarioFilter) -> StorageResult<Vec<Scenario>> {
        Ok(self.state.lock().await.list_scenarios(filter))
    }

    async fn append_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
        turns: Vec<Turn>,
    ) -> StorageResult<Vec<TurnRecord>> {
        self.mutate(|state| state.append_turns(scenario_id, version, turns))
            .await
    }

    async fn create_scenario_with_turns(
        &self,
        scenario: NewScenario,
        turns: Vec<Turn>,
    ) -> StorageResult<Scenario> {
        self.mutate(|state| state.create_scenario_with_turns(scenario, turns, Utc::now()))
            .await
    }

    async fn load_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
    ) -> StorageResult<Vec<TurnRecord>> {
        Ok(self.state.lock().await.turns(scenario_id, version))
    }

    async fn list_versions(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Version>> {
        Ok(self.state.lock().await.versions(scenario_id))
    }

    async fn create_replay(
        &self,
        replay: NewReplay,
        turns: Vec<ReplayTurn>,
    ) -> StorageResult<Replay> {
        self.mutate(|state| state.create_replay(replay, turns)).await
    }

    async fn record_replay(
        &self,
        replay: NewReplay,
        turns: Vec<ReplayTurn>,
        scenario: &Scenario,
    ) -> StorageResult<Replay> {
        self.mutate(|state| state.record_replay(replay, turns, scenario))
            .await
    }

    async fn load_replay(&self, id: ReplayId) -> StorageResult<Option<Replay>> {
        Ok(self.state.lock().await.replay(id).cloned())
    }

    async fn load_replay_turns(&self, id: ReplayId) -> StorageResult<Vec<ReplayTurnRecord>> {
        Ok(self.state.lock().await.replay_turns(id))
    }

    async fn list_replays(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Replay>> {
        Ok(self.state.lock().await.replays(scenario_id))
    }

    async fn delete_replay(&self, id: ReplayId) -> StorageResult<()> {
        self.mutate(|state| state.delete_replay(id)).await
    }
}
