//! Shared wiring for commands

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use botreplay_core::{
    BotReplayConfig, ConfigLoader, HttpBotDriver, ReplayOrchestrator, ScenarioLocks,
    ScenarioManager, ScenarioRecorder, VersionManager,
};
use botreplay_store::LocalRepository;

use crate::args::{Cli, DEFAULT_CONFIG_FILE};

/// Effective configuration and where it was read from
pub struct Settings {
    pub config: BotReplayConfig,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Defaults, then the config file, then `BOTREPLAY_*`, then flags
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config_file.clone().or_else(default_config_path);

        let mut overrides = HashMap::new();
        if let Some(dir) = &cli.data_dir {
            overrides.insert("data_dir".to_string(), dir.display().to_string());
        }

        let mut loader = ConfigLoader::new().with_defaults();
        if let Some(path) = &config_path {
            loader = loader.with_file(path);
        }
        let config = loader
            .with_env()
            .with_values(overrides)
            .load()
            .context("Failed to load configuration")?;

        Ok(Self {
            config,
            config_path,
        })
    }
}

/// `~/.botreplay/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".botreplay").join(DEFAULT_CONFIG_FILE))
}

/// Repository, bot driver and lock table for one CLI invocation
pub struct App {
    pub config: BotReplayConfig,
    repository: Arc<LocalRepository>,
    driver: Arc<HttpBotDriver>,
    locks: ScenarioLocks,
}

impl App {
    pub async fn open(settings: &Settings) -> Result<Self> {
        let config = settings.config.clone();
        let repository = LocalRepository::open(&config.data_dir)
            .await
            .with_context(|| format!("Failed to open store in {}", config.data_dir.display()))?;
        tracing::debug!("Using store {}", repository.path().display());

        let driver = HttpBotDriver::from_config(&config)
            .context("Failed to set up the bot HTTP client")?;

        Ok(Self {
            driver: Arc::new(driver),
            repository: Arc::new(repository),
            locks: ScenarioLocks::new(),
            config,
        })
    }

    pub fn driver(&self) -> Arc<HttpBotDriver> {
        self.driver.clone()
    }

    pub fn orchestrator(&self) -> ReplayOrchestrator {
        ReplayOrchestrator::from_config(self.repository.clone(), self.driver.clone(), &self.config)
            .with_locks(self.locks.clone())
    }

    pub fn versions(&self) -> VersionManager {
        VersionManager::new(self.repository.clone()).with_locks(self.locks.clone())
    }

    pub fn scenarios(&self) -> ScenarioManager {
        ScenarioManager::new(self.repository.clone()).with_locks(self.locks.clone())
    }

    pub fn recorder(&self) -> ScenarioRecorder {
        ScenarioRecorder::new(self.repository.clone(), self.driver.clone())
            .with_turn_timeout(self.config.turn_timeout())
    }
}
