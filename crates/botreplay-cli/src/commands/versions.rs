//! Version listing

use anyhow::Result;
use botreplay_core::ScenarioId;
use colored::*;

use crate::app::App;

/// Recorded versions of a scenario; the reference is starred
pub async fn list(app: &App, id: u64) -> Result<()> {
    let scenario = app.scenarios().get(ScenarioId(id)).await?;
    let versions = app.versions().list_versions(scenario.id).await?;

    println!(
        "\n{}",
        format!("Versions of '{}'", scenario.name).bold().underline()
    );
    if versions.is_empty() {
        println!("{}", "No recorded turns.".yellow());
        return Ok(());
    }

    for entry in versions {
        let marker = if entry.version == scenario.version {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!("{} {:>6}  {}", marker, entry.version.0, entry.label);
    }
    Ok(())
}
