//! Scenario recording and management

mod manager;
mod recorder;

pub use manager::ScenarioManager;
pub use recorder::{RecordingSession, ScenarioRecorder};
