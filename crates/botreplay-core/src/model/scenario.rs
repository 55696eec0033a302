//! Scenario records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ScenarioId, Version};

/// Pass/fail verdict of a replay, also mirrored on the scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pass,
    Fail,
}

impl Outcome {
    /// Verdict for an error count: zero errors pass, anything else fails
    pub fn from_error_count(errors: usize) -> Self {
        if errors == 0 {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    /// Numeric code (0 = pass, 1 = fail)
    pub fn code(&self) -> u8 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 1,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// A recorded conversation test case tied to one bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Which bot this scenario talks to
    pub bot_key: String,

    /// Outcome of the last replay (or of the last promotion)
    #[serde(default)]
    pub status: Outcome,

    /// When the scenario was last replayed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,

    /// Transcript currently used as reference
    #[serde(default)]
    pub version: Version,

    pub created: DateTime<Utc>,
}

/// Fields supplied when creating a scenario; the store assigns the rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScenario {
    pub name: String,
    pub description: String,
    pub bot_key: String,
}

impl NewScenario {
    pub fn new(name: impl Into<String>, bot_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            bot_key: bot_key.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_error_count() {
        assert_eq!(Outcome::from_error_count(0), Outcome::Pass);
        assert_eq!(Outcome::from_error_count(3), Outcome::Fail);
        assert_eq!(Outcome::Fail.code(), 1);
    }
}
