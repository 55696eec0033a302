//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::timeouts;
use crate::error::{BotReplayError, BotReplayResult};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// botreplay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReplayConfig {
    /// Directory holding the local repository
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the bot HTTP API
    #[serde(default = "default_bot_endpoint")]
    pub bot_endpoint: String,

    /// Locale used when none is given explicitly
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Bound on each bot call in seconds
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,

    /// HTTP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".botreplay"))
        .unwrap_or_else(|| PathBuf::from(".botreplay"))
}

fn default_bot_endpoint() -> String {
    "http://localhost:8080/api/chatbot".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_turn_timeout() -> u64 {
    timeouts::TURN_SECS
}

fn default_connect_timeout() -> u64 {
    timeouts::CONNECT_SECS
}

impl Default for BotReplayConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bot_endpoint: default_bot_endpoint(),
            default_locale: default_locale(),
            turn_timeout_secs: default_turn_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BotReplayConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Apply the fields a source actually set
    pub fn merge(&mut self, patch: ConfigPatch) {
        if let Some(data_dir) = patch.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(endpoint) = patch.bot_endpoint {
            self.bot_endpoint = endpoint;
        }
        if let Some(locale) = patch.default_locale {
            self.default_locale = locale;
        }
        if let Some(secs) = patch.turn_timeout_secs {
            self.turn_timeout_secs = secs;
        }
        if let Some(secs) = patch.connect_timeout_secs {
            self.connect_timeout_secs = secs;
        }
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    pub fn validate(&self) -> BotReplayResult<()> {
        if self.bot_endpoint.trim().is_empty() {
            return Err(BotReplayError::config("bot_endpoint must not be empty"));
        }
        if self.default_locale.trim().is_empty() {
            return Err(BotReplayError::config("default_locale must not be empty"));
        }
        if self.turn_timeout_secs == 0 {
            return Err(BotReplayError::config(
                "turn_timeout_secs must be greater than zero",
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "compact" | "json") {
            return Err(BotReplayError::config(format!(
                "unknown logging format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// Partial configuration produced by a single source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub bot_endpoint: Option<String>,
    #[serde(default)]
    pub default_locale: Option<String>,
    #[serde(default)]
    pub turn_timeout_secs: Option<u64>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: Option<LoggingPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingPatch {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}
