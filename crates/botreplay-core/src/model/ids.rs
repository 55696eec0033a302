//! Strongly typed identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u64);

impl From<u64> for ScenarioId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a replay
///
/// Replay ids start at 1, so they never collide with [`Version::INITIAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayId(pub u64);

impl From<u64> for ReplayId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ReplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference transcript version of a scenario
///
/// `0` is the original recording; any other value is the id of the
/// replay whose transcript was promoted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    /// The originally recorded transcript
    pub const INITIAL: Version = Version(0);

    /// Whether this is the original recording
    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }

    /// Human readable label used when listing versions
    pub fn label(&self) -> String {
        if self.is_initial() {
            "initial version".to_string()
        } else {
            format!("recording #{}", self.0)
        }
    }
}

impl From<ReplayId> for Version {
    fn from(id: ReplayId) -> Self {
        Self(id.0)
    }
}

impl From<u64> for Version {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
