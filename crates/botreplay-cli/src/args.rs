//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name, looked up in `~/.botreplay`
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Parser, Debug)]
#[command(name = "botreplay")]
#[command(about = "Record chatbot conversations and replay them to catch regressions")]
#[command(
    long_about = r#"Record chatbot conversations and replay them to catch regressions

USAGE:
  botreplay record --bot KEY --name NAME     # Record a reference conversation
  botreplay replay run ID                    # Replay it against the live bot
  botreplay replay show REPLAY_ID            # Compare answers with the reference
  botreplay promote REPLAY_ID                # Accept a replay as the new reference

For detailed help: botreplay --help"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Directory holding the scenario store
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the bots offered by the bot service
    Bots,

    /// Record a new scenario interactively
    Record {
        /// Bot key
        #[arg(long)]
        bot: String,

        /// Conversation locale (defaults to the configured one)
        #[arg(long)]
        locale: Option<String>,

        /// Scenario name
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Manage recorded scenarios
    Scenario {
        #[command(subcommand)]
        action: ScenarioAction,
    },

    /// List the recorded versions of a scenario
    Versions {
        /// Scenario ID
        id: u64,
    },

    /// Run and inspect replays
    Replay {
        #[command(subcommand)]
        action: ReplayAction,
    },

    /// Make a replay the reference of its scenario
    Promote {
        /// Replay ID
        replay_id: u64,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScenarioAction {
    /// List scenarios
    List {
        /// Only scenarios of this bot
        #[arg(long)]
        bot: Option<String>,

        /// Only scenarios whose name contains this text
        #[arg(long)]
        title: Option<String>,

        /// Maximum number of scenarios to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a scenario with its reference transcript
    Show {
        /// Scenario ID
        id: u64,
    },

    /// Rename, describe or switch the reference version
    Edit {
        /// Scenario ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Recorded version to use as reference
        #[arg(long)]
        version: Option<u64>,
    },

    /// Delete a scenario with its replays
    Remove {
        /// Scenario ID
        id: u64,

        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReplayAction {
    /// Replay a scenario against the live bot
    Run {
        /// Scenario ID
        id: u64,

        /// Conversation locale (defaults to the configured one)
        #[arg(long)]
        locale: Option<String>,

        /// Report format: table, markdown or json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List the replays of a scenario, newest first
    List {
        /// Scenario ID
        id: u64,
    },

    /// Compare a replay's answers with its reference
    Show {
        /// Replay ID
        replay_id: u64,

        /// Report format: table, markdown or json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete a replay
    Remove {
        /// Replay ID
        replay_id: u64,

        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_replay_run_defaults() {
        let cli = Cli::try_parse_from(["botreplay", "replay", "run", "3"]).unwrap();
        match cli.command {
            Commands::Replay {
                action: ReplayAction::Run { id, locale, format },
            } => {
                assert_eq!(id, 3);
                assert_eq!(locale, None);
                assert_eq!(format, "table");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "botreplay",
            "scenario",
            "list",
            "--bot",
            "helpdesk",
            "--data-dir",
            "/tmp/botreplay",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/botreplay")));
        assert!(matches!(
            cli.command,
            Commands::Scenario {
                action: ScenarioAction::List { bot: Some(ref b), .. }
            } if b == "helpdesk"
        ));
    }

    #[test]
    fn test_record_requires_bot_and_name() {
        assert!(Cli::try_parse_from(["botreplay", "record", "--name", "x"]).is_err());
        assert!(Cli::try_parse_from(["botreplay", "record", "--bot", "b"]).is_err());
        assert!(Cli::try_parse_from(["botreplay", "record", "--bot", "b", "--name", "x"]).is_ok());
    }

    #[test]
    fn test_ids_must_be_numeric() {
        assert!(Cli::try_parse_from(["botreplay", "promote", "latest"]).is_err());
    }
}
