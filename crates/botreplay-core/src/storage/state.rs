//! In-process repository state
//!
//! Plain data plus the bookkeeping every backend needs: id allocation
//! per entity kind and sequence numbers per (scenario, version) and per
//! replay. Backends wrap it in their own lock and decide where it lives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ScenarioFilter, StorageError, StorageResult};
use crate::model::{
    NewReplay, NewScenario, Outcome, Replay, ReplayId, ReplayTurn, ReplayTurnRecord, Scenario,
    ScenarioId, Turn, TurnRecord, Version,
};

/// Snapshot of everything a repository stores
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreState {
    /// Last allocated scenario id
    #[serde(default)]
    last_scenario_id: u64,

    /// Last allocated turn creation id
    #[serde(default)]
    last_turn_id: u64,

    /// Last allocated replay id
    #[serde(default)]
    last_replay_id: u64,

    /// Last allocated replay turn id
    #[serde(default)]
    last_replay_turn_id: u64,

    #[serde(default)]
    scenarios: Vec<Scenario>,

    #[serde(default)]
    turns: Vec<TurnRecord>,

    #[serde(default)]
    replays: Vec<Replay>,

    #[serde(default)]
    replay_turns: Vec<ReplayTurnRecord>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_scenario(&mut self, draft: NewScenario, now: DateTime<Utc>) -> Scenario {
        self.last_scenario_id += 1;
        let scenario = Scenario {
            id: ScenarioId(self.last_scenario_id),
            name: draft.name,
            description: draft.description,
            bot_key: draft.bot_key,
            status: Outcome::Pass,
            last_run: None,
            version: Version::INITIAL,
            created: now,
        };
        self.scenarios.push(scenario.clone());
        scenario
    }

    pub fn scenario(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn update_scenario(&mut self, scenario: &Scenario) -> StorageResult<()> {
        let slot = self
            .scenarios
            .iter_mut()
            .find(|s| s.id == scenario.id)
            .ok_or_else(|| StorageError::NotFound(format!("scenario {}", scenario.id)))?;
        *slot = scenario.clone();
        Ok(())
    }

    pub fn delete_scenario(&mut self, id: ScenarioId) -> StorageResult<()> {
        if self.scenario(id).is_none() {
            return Err(StorageError::NotFound(format!("scenario {}", id)));
        }

        let replay_ids: Vec<ReplayId> = self
            .replays
            .iter()
            .filter(|r| r.scenario_id == id)
            .map(|r| r.id)
            .collect();

        self.scenarios.retain(|s| s.id != id);
        self.turns.retain(|t| t.scenario_id != id);
        self.replays.retain(|r| r.scenario_id != id);
        self.replay_turns
            .retain(|t| !replay_ids.contains(&t.replay_id));
        Ok(())
    }

    /// Matching scenarios ordered by id, truncated to the filter's limit
    pub fn list_scenarios(&self, filter: &ScenarioFilter) -> Vec<Scenario> {
        let mut scenarios: Vec<Scenario> = self
            .scenarios
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        scenarios.sort_by_key(|s| s.id);

        if let Some(limit) = filter.limit {
            scenarios.truncate(limit);
        }
        scenarios
    }

    pub fn append_turns(
        &mut self,
        scenario_id: ScenarioId,
        version: Version,
        turns: Vec<Turn>,
    ) -> StorageResult<Vec<TurnRecord>> {
        if self.scenario(scenario_id).is_none() {
            return Err(StorageError::NotFound(format!("scenario {}", scenario_id)));
        }

        let mut next_seq = self
            .turns
            .iter()
            .filter(|t| t.scenario_id == scenario_id && t.version == version)
            .map(|t| t.seq + 1)
            .max()
            .unwrap_or(0);

        let mut records = Vec::with_capacity(turns.len());
        for turn in turns {
            self.last_turn_id += 1;
            let record = TurnRecord {
                id: self.last_turn_id,
                scenario_id,
                version,
                seq: next_seq,
                turn,
            };
            next_seq += 1;
            self.turns.push(record.clone());
            records.push(record);
        }
        Ok(records)
    }

    /// New scenario with its version 0 turns
    pub fn create_scenario_with_turns(
        &mut self,
        draft: NewScenario,
        turns: Vec<Turn>,
        now: DateTime<Utc>,
    ) -> StorageResult<Scenario> {
        let scenario = self.create_scenario(draft, now);
        self.append_turns(scenario.id, Version::INITIAL, turns)?;
        Ok(scenario)
    }

    pub fn turns(&self, scenario_id: ScenarioId, version: Version) -> Vec<TurnRecord> {
        let mut turns: Vec<TurnRecord> = self
            .turns
            .iter()
            .filter(|t| t.scenario_id == scenario_id && t.version == version)
            .cloned()
            .collect();
        turns.sort_by_key(|t| t.seq);
        turns
    }

    /// Distinct versions ordered by the creation id of their first turn
    pub fn versions(&self, scenario_id: ScenarioId) -> Vec<Version> {
        let mut firsts: Vec<(u64, Version)> = Vec::new();
        for turn in self.turns.iter().filter(|t| t.scenario_id == scenario_id) {
            match firsts.iter_mut().find(|(_, v)| *v == turn.version) {
                Some(entry) => entry.0 = entry.0.min(turn.id),
                None => firsts.push((turn.id, turn.version)),
            }
        }
        firsts.sort_by_key(|(first_id, _)| *first_id);
        firsts.into_iter().map(|(_, version)| version).collect()
    }

    pub fn create_replay(
        &mut self,
        draft: NewReplay,
        turns: Vec<ReplayTurn>,
    ) -> StorageResult<Replay> {
        if self.scenario(draft.scenario_id).is_none() {
            return Err(StorageError::NotFound(format!(
                "scenario {}",
                draft.scenario_id
            )));
        }

        self.last_replay_id += 1;
        let replay = Replay {
            id: ReplayId(self.last_replay_id),
            scenario_id: draft.scenario_id,
            version: draft.version,
            last_run: draft.last_run,
            status: draft.status,
            error_count: draft.error_count,
        };

        for (seq, replay_turn) in turns.into_iter().enumerate() {
            self.last_replay_turn_id += 1;
            self.replay_turns.push(ReplayTurnRecord {
                id: self.last_replay_turn_id,
                replay_id: replay.id,
                seq: seq as u64,
                turn: replay_turn.turn,
                status: replay_turn.status,
            });
        }

        self.replays.push(replay.clone());
        Ok(replay)
    }

    /// Store a replay and the scenario it updated; the scenario must exist
    pub fn record_replay(
        &mut self,
        draft: NewReplay,
        turns: Vec<ReplayTurn>,
        scenario: &Scenario,
    ) -> StorageResult<Replay> {
        self.update_scenario(scenario)?;
        self.create_replay(draft, turns)
    }

    pub fn replay(&self, id: ReplayId) -> Option<&Replay> {
        self.replays.iter().find(|r| r.id == id)
    }

    pub fn replay_turns(&self, id: ReplayId) -> Vec<ReplayTurnRecord> {
        let mut turns: Vec<ReplayTurnRecord> = self
            .replay_turns
            .iter()
            .filter(|t| t.replay_id == id)
            .cloned()
            .collect();
        turns.sort_by_key(|t| t.seq);
        turns
    }

    /// Replays of a scenario, newest first
    pub fn replays(&self, scenario_id: ScenarioId) -> Vec<Replay> {
        let mut replays: Vec<Replay> = self
            .replays
            .iter()
            .filter(|r| r.scenario_id == scenario_id)
            .cloned()
            .collect();
        replays.sort_by(|a, b| b.id.cmp(&a.id));
        replays
    }

    pub fn delete_replay(&mut self, id: ReplayId) -> StorageResult<()> {
        if self.replay(id).is_none() {
            return Err(StorageError::NotFound(format!("replay {}", id)));
        }
        self.replays.retain(|r| r.id != id);
        self.replay_turns.retain(|t| t.replay_id != id);
        Ok(())
    }
}
