//! botreplay command-line interface
//!
//! Records reference conversations with a chatbot, replays them and
//! shows what changed.
//!
//! ```bash
//! botreplay record --bot helpdesk --name "Opening hours"
//! botreplay replay run 1
//! botreplay promote 4
//! ```
//!
//! `botreplay replay run` exits with status 1 when the replay fails, so
//! it can gate a deployment pipeline.

mod app;
mod args;
mod commands;
mod console;
mod logging;
mod router;

use std::process::ExitCode;

use clap::Parser;

use crate::args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = app::Settings::load(&cli)?;
    logging::init(&settings.config.logging, cli.verbose);

    router::route(cli, settings).await
}
