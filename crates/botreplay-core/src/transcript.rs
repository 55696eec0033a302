//! Transcript store
//!
//! Ordered reference turns per (scenario, version). Append-only within
//! a version; every operation rejects unknown scenarios before touching
//! the repository.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BotReplayError, BotReplayResult};
use crate::model::{ScenarioId, Turn, TurnRecord, Version};
use crate::storage::{Repository, StorageError};

/// A version entry as shown when listing a scenario's versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: Version,
    pub label: String,
}

impl From<Version> for VersionEntry {
    fn from(version: Version) -> Self {
        Self {
            label: version.label(),
            version,
        }
    }
}

/// Ordered reference transcripts on top of a [`Repository`]
#[derive(Clone)]
pub struct TranscriptStore {
    repository: Arc<dyn Repository>,
}

impl TranscriptStore {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Add one turn at the end of (scenario, version)
    pub async fn append_turn(
        &self,
        scenario_id: ScenarioId,
        version: Version,
        turn: Turn,
    ) -> BotReplayResult<TurnRecord> {
        self.append_turns(scenario_id, version, vec![turn])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                StorageError::InvalidData(format!(
                    "append to scenario {} version {} returned no record",
                    scenario_id, version
                ))
                .into()
            })
    }

    /// Add several turns at the end of (scenario, version), keeping their order
    pub async fn append_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
        turns: Vec<Turn>,
    ) -> BotReplayResult<Vec<TurnRecord>> {
        self.ensure_scenario(scenario_id).await?;
        let count = turns.len();
        let records = self
            .repository
            .append_turns(scenario_id, version, turns)
            .await?;
        debug!(
            "Appended {} turn(s) to scenario {} version {}",
            count, scenario_id, version
        );
        Ok(records)
    }

    /// Stored turns of (scenario, version) in order; empty if none were recorded
    pub async fn load_turns(
        &self,
        scenario_id: ScenarioId,
        version: Version,
    ) -> BotReplayResult<Vec<TurnRecord>> {
        self.ensure_scenario(scenario_id).await?;
        Ok(self.repository.load_turns(scenario_id, version).await?)
    }

    /// Just the utterances of (scenario, version), in order
    pub async fn load_transcript(
        &self,
        scenario_id: ScenarioId,
        version: Version,
    ) -> BotReplayResult<Vec<Turn>> {
        Ok(self
            .load_turns(scenario_id, version)
            .await?
            .into_iter()
            .map(|record| record.turn)
            .collect())
    }

    /// Whether any turn exists for (scenario, version)
    pub async fn has_version(
        &self,
        scenario_id: ScenarioId,
        version: Version,
    ) -> BotReplayResult<bool> {
        Ok(!self.load_turns(scenario_id, version).await?.is_empty())
    }

    /// Distinct versions with their display labels, oldest first
    pub async fn list_versions(&self, scenario_id: ScenarioId) -> BotReplayResult<Vec<VersionEntry>> {
        self.ensure_scenario(scenario_id).await?;
        Ok(self
            .repository
            .list_versions(scenario_id)
            .await?
            .into_iter()
            .map(VersionEntry::from)
            .collect())
    }

    async fn ensure_scenario(&self, scenario_id: ScenarioId) -> BotReplayResult<()> {
        if self.repository.scenario_exists(scenario_id).await? {
            Ok(())
        } else {
            Err(BotReplayError::invalid_argument(format!(
                "unknown scenario {}",
                scenario_id
            )))
        }
    }
}
