//! Reference version promotion

use std::sync::Arc;

use tracing::{debug, info};

use super::ScenarioLocks;
use crate::error::{BotReplayError, BotReplayResult};
use crate::model::{Outcome, ReplayId, Scenario, ScenarioId, Turn, Version};
use crate::storage::Repository;
use crate::transcript::{TranscriptStore, VersionEntry};

/// Makes a replay's transcript the new reference of its scenario
pub struct VersionManager {
    repository: Arc<dyn Repository>,
    transcripts: TranscriptStore,
    locks: ScenarioLocks,
}

impl VersionManager {
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

    /// Promote a replay to be the reference of its scenario
    ///
    /// The new version id is the replay id. Turns are copied only when
    /// that version has none yet, so promoting twice changes nothing.
    pub async fn promote(&self, replay_id: ReplayId) -> BotReplayResult<Scenario> {
        let replay = self
            .repository
            .load_replay(replay_id)
            .await?
            .ok_or_else(|| {
                BotReplayError::invalid_argument(format!("unknown replay {}", replay_id))
            })?;

        let _guard = self.locks.lock(replay.scenario_id).await;

        let mut scenario = self
            .repository
            .load_scenario(replay.scenario_id)
            .await?
            .ok_or_else(|| {
                BotReplayError::invalid_argument(format!(
                    "unknown scenario {}",
                    replay.scenario_id
                ))
            })?;

        let version = Version::from(replay_id);
        scenario.version = version;
        scenario.status = Outcome::Pass;

        if self.transcripts.has_version(scenario.id, version).await? {
            debug!(
                "Scenario {} already holds turns for {}, nothing to copy",
                scenario.id, version
            );
        } else {
            let turns: Vec<Turn> = self
                .repository
                .load_replay_turns(replay_id)
                .await?
                .into_iter()
                .map(|record| record.turn)
                .collect();
            self.transcripts
                .append_turns(scenario.id, version, turns)
                .await?;
        }

        self.repository.update_scenario(&scenario).await?;
        info!(
            scenario_id = %scenario.id,
            "Promoted replay {} to reference ({})",
            replay_id,
            version.label()
        );

        Ok(scenario)
    }

    /// Versions recorded for a scenario, oldest first
    pub async fn list_versions(&self, scenario_id: ScenarioId) -> BotReplayResult<Vec<VersionEntry>> {
        self.transcripts.list_versions(scenario_id).await
    }
}
