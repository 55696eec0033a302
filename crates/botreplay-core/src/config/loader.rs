//! Configuration loading

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::{BotReplayConfig, ConfigPatch, LoggingPatch};
use crate::error::{BotReplayError, BotReplayResult};

/// Environment variables and the configuration keys they set
const ENV_KEYS: &[(&str, &str)] = &[
    ("BOTREPLAY_DATA_DIR", "data_dir"),
    ("BOTREPLAY_BOT_ENDPOINT", "bot_endpoint"),
    ("BOTREPLAY_LOCALE", "default_locale"),
    ("BOTREPLAY_TURN_TIMEOUT_SECS", "turn_timeout_secs"),
    ("BOTREPLAY_CONNECT_TIMEOUT_SECS", "connect_timeout_secs"),
    ("BOTREPLAY_LOG_LEVEL", "log_level"),
    ("BOTREPLAY_LOG_FORMAT", "log_format"),
];

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration file; format chosen by extension
    File(PathBuf),
    /// `BOTREPLAY_*` environment variables
    Environment,
    /// Explicit key/value overrides, e.g. from command line flags
    Values(HashMap<String, String>),
    /// Built-in defaults
    Default,
}

/// Configuration loader merging several sources in order
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    pub fn with_values(self, values: HashMap<String, String>) -> Self {
        self.add_source(ConfigSource::Values(values))
    }

    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Merge all sources over the defaults and validate the result
    pub fn load(self) -> BotReplayResult<BotReplayConfig> {
        let mut config = BotReplayConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config.merge(load_patch_from_file(path)?);
                }
                ConfigSource::Environment => {
                    tracing::debug!("Loading config from environment");
                    let values: HashMap<String, String> = ENV_KEYS
                        .iter()
                        .filter_map(|(var, key)| env::var(var).ok().map(|v| (key.to_string(), v)))
                        .collect();
                    config.merge(patch_from_values(&values)?);
                }
                ConfigSource::Values(values) => {
                    tracing::debug!("Loading config from {} explicit value(s)", values.len());
                    config.merge(patch_from_values(values)?);
                }
                ConfigSource::Default => {
                    config = BotReplayConfig::default();
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Defaults, then the file, then the environment
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> BotReplayResult<BotReplayConfig> {
    ConfigLoader::new()
        .with_defaults()
        .with_file(path)
        .with_env()
        .load()
}

/// Like [`load_config_from_file`], without a file when none is given
pub fn load_config(path: Option<&Path>) -> BotReplayResult<BotReplayConfig> {
    match path {
        Some(path) => load_config_from_file(path),
        None => ConfigLoader::new().with_defaults().with_env().load(),
    }
}

fn load_patch_from_file(path: &Path) -> BotReplayResult<ConfigPatch> {
    if !path.exists() {
        return Ok(ConfigPatch::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        BotReplayError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let parsed = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        _ => serde_json::from_str(&content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|e| {
        BotReplayError::config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

fn parse_secs(key: &str, value: &str) -> BotReplayResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| BotReplayError::config(format!("Invalid {} value: '{}'", key, value)))
}

fn patch_from_values(values: &HashMap<String, String>) -> BotReplayResult<ConfigPatch> {
    let mut patch = ConfigPatch::default();
    let mut logging = LoggingPatch::default();

    for (key, value) in values {
        match key.as_str() {
            "data_dir" => patch.data_dir = Some(PathBuf::from(value)),
            "bot_endpoint" => patch.bot_endpoint = Some(value.clone()),
            "default_locale" => patch.default_locale = Some(value.clone()),
            "turn_timeout_secs" => patch.turn_timeout_secs = Some(parse_secs(key, value)?),
            "connect_timeout_secs" => patch.connect_timeout_secs = Some(parse_secs(key, value)?),
            "log_level" => logging.level = Some(value.clone()),
            "log_format" => logging.format = Some(value.clone()),
            other => {
                return Err(BotReplayError::config(format!(
                    "Unknown configuration key '{}'",
                    other
                )));
            }
        }
    }

    if logging != LoggingPatch::default() {
        patch.logging = Some(logging);
    }
    Ok(patch)
}

/// Write a configuration file; format chosen by extension
pub fn save_config(config: &BotReplayConfig, path: &Path) -> BotReplayResult<()> {
    let content = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::to_string_pretty(config).map_err(|e| e.to_string()),
        Some("yaml") | Some("yml") => serde_yaml::to_string(config).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
    }
    .map_err(|e| BotReplayError::config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                BotReplayError::config(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }
    }

    fs::write(path, content).map_err(|e| {
        BotReplayError::config(format!(
            "Failed to write config file '{}': {}",
            path.display(),
            e
        ))
    })
}
