//! Bot catalog
//!
//! Resolves bot keys to display metadata and the locales a bot speaks.
//! Only the surrounding tooling uses it; the diff engine never does.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DriverResult;

/// A bot as advertised by the bot service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotDescription {
    pub key: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Declared languages; empty means the service default
    #[serde(default)]
    pub languages: Vec<String>,
}

/// A bot in one specific locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotOffer {
    pub key: String,
    pub name: String,
    pub description: String,
    pub locale: String,
}

impl BotDescription {
    /// One offer per declared language, or a single one in `default_locale`
    pub fn offers(&self, default_locale: &str) -> Vec<BotOffer> {
        let offer = |locale: &str| BotOffer {
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            locale: locale.to_string(),
        };

        if self.languages.is_empty() {
            vec![offer(default_locale)]
        } else {
            self.languages.iter().map(|l| offer(l)).collect()
        }
    }

    pub fn speaks(&self, locale: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == locale)
    }
}

/// Source of bot descriptions
#[async_trait]
pub trait BotCatalog: Send + Sync {
    async fn list_bots(&self) -> DriverResult<Vec<BotDescription>>;

    /// Look up one bot by key
    async fn find_bot(&self, key: &str) -> DriverResult<Option<BotDescription>> {
        Ok(self.list_bots().await?.into_iter().find(|b| b.key == key))
    }
}
