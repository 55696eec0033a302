//! Version promotion

use anyhow::Result;
use botreplay_core::ReplayId;

use crate::app::App;
use crate::console::CliConsole;

pub async fn run(app: &App, replay_id: u64) -> Result<()> {
    let scenario = app.versions().promote(ReplayId(replay_id)).await?;
    CliConsole::new(true).success(&format!(
        "'{}' now uses {} as reference",
        scenario.name,
        scenario.version.label()
    ));
    Ok(())
}
