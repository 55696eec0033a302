//! Configuration management
//!
//! Settings come from defaults, an optional file (JSON, TOML or YAML)
//! and `BOTREPLAY_*` environment variables, merged in that order.

mod loader;
mod model;
pub mod timeouts;

pub use loader::{ConfigLoader, ConfigSource, load_config, load_config_from_file, save_config};
pub use model::{BotReplayConfig, ConfigPatch, LoggingConfig, LoggingPatch};
