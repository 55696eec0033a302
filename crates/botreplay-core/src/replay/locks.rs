//! Per-scenario serialization

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::model::ScenarioId;

/// One async mutex per scenario, created on first use
///
/// Cloning shares the same lock table.
#[derive(Debug, Clone, Default)]
pub struct ScenarioLocks {
    locks: Arc<DashMap<ScenarioId, Arc<Mutex<()>>>>,
}

impl ScenarioLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a scenario
    pub async fn lock(&self, scenario_id: ScenarioId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(scenario_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock of a scenario that no longer exists
    pub fn forget(&self, scenario_id: ScenarioId) {
        self.locks.remove(&scenario_id);
    }

    /// Number of scenarios with a lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
