//! Per-call replay context

use crate::driver::new_conversation_id;
use crate::model::{Scenario, ScenarioId, Version};

/// Everything one replay needs to talk to the bot
///
/// Built fresh for every run and passed by reference; nothing here
/// outlives the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayContext {
    pub scenario_id: ScenarioId,
    pub bot_key: String,
    /// Reference version the run is compared against
    pub version: Version,
    pub locale: String,
    pub conversation_id: String,
}

impl ReplayContext {
    /// Context for a new bot session on `scenario`
    pub fn new(scenario: &Scenario, locale: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario.id,
            bot_key: scenario.bot_key.clone(),
            version: scenario.version,
            locale: locale.into(),
            conversation_id: new_conversation_id(),
        }
    }
}
