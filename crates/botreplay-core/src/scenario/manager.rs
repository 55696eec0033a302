//! Scenario administration

use std::sync::Arc;

use tracing::info;

use crate::error::{BotReplayError, BotReplayResult};
use crate::model::{Replay, ReplayId, ReplayTurnRecord, Scenario, ScenarioId, Version};
use crate::replay::ScenarioLocks;
use crate::storage::{Repository, ScenarioFilter};
use crate::transcript::TranscriptStore;

/// Browse, edit and delete scenarios and their replays
pub struct ScenarioManager {
    repository: Arc<dyn Repository>,
    transcripts: TranscriptStore,
    locks: ScenarioLocks,
}

impl ScenarioManager {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            transcripts: TranscriptStore::new(repository.clone()),
            repository,
            locks: ScenarioLocks::new(),
        }
    }

    pub fn with_locks(mut self, locks: ScenarioLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn transcripts(&self) -> &TranscriptStore {
        &self.transcripts
    }

    pub async fn list(&self, filter: &ScenarioFilter) -> BotReplayResult<Vec<Scenario>> {
        Ok(self.repository.list_scenarios(filter).await?)
    }

    pub async fn get(&self, id: ScenarioId) -> BotReplayResult<Scenario> {
        self.repository
            .load_scenario(id)
            .await?
            .ok_or_else(|| BotReplayError::invalid_argument(format!("unknown scenario {}", id)))
    }

    /// Rename and/or describe a scenario; `None` keeps the current value
    pub async fn update_details(
        &self,
        id: ScenarioId,
        name: Option<String>,
        description: Option<String>,
    ) -> BotReplayResult<Scenario> {
        let _guard = self.locks.lock(id).await;
        let mut scenario = self.get(id).await?;

        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(BotReplayError::invalid_argument(
                    "scenario name must not be empty",
                ));
            }
            scenario.name = name.to_string();
        }
        if let Some(description) = description {
            scenario.description = description.trim().to_string();
        }

        self.repository.update_scenario(&scenario).await?;
        Ok(scenario)
    }

    /// Make an already recorded version the reference
    pub async fn select_version(
        &self,
        id: ScenarioId,
        version: Version,
    ) -> BotReplayResult<Scenario> {
        let _guard = self.locks.lock(id).await;
        let mut scenario = self.get(id).await?;

        let known = self
            .transcripts
            .list_versions(id)
            .await?
            .iter()
            .any(|entry| entry.version == version);
        if !known {
            return Err(BotReplayError::invalid_argument(format!(
                "scenario {} has no version {}",
                id, version
            )));
        }

        scenario.version = version;
        self.repository.update_scenario(&scenario).await?;
        info!(scenario_id = %id, "Reference set to {}", version.label());
        Ok(scenario)
    }

    /// Delete a scenario with its transcripts and replays
    pub async fn remove(&self, id: ScenarioId) -> BotReplayResult<()> {
        {
            let _guard = self.locks.lock(id).await;
            self.get(id).await?;
            self.repository.delete_scenario(id).await?;
        }
        self.locks.forget(id);
        info!(scenario_id = %id, "Removed scenario");
        Ok(())
    }

    /// Replays of a scenario, newest first
    pub async fn replays(&self, id: ScenarioId) -> BotReplayResult<Vec<Replay>> {
        self.get(id).await?;
        Ok(self.repository.list_replays(id).await?)
    }

    pub async fn replay(&self, id: ReplayId) -> BotReplayResult<Replay> {
        self.repository
            .load_replay(id)
            .await?
            .ok_or_else(|| BotReplayError::invalid_argument(format!("unknown replay {}", id)))
    }

    pub async fn replay_turns(&self, id: ReplayId) -> BotReplayResult<Vec<ReplayTurnRecord>> {
        self.replay(id).await?;
        Ok(self.repository.load_replay_turns(id).await?)
    }

    pub async fn remove_replay(&self, id: ReplayId) -> BotReplayResult<()> {
        let replay = self.replay(id).await?;
        let _guard = self.locks.lock(replay.scenario_id).await;
        self.repository.delete_replay(id).await?;
        info!(scenario_id = %replay.scenario_id, "Removed replay {}", id);
        Ok(())
    }
}
