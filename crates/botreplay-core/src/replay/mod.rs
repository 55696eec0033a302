//! Replay execution and version promotion
//!
//! [`ReplayOrchestrator`] re-runs a scenario's reference transcript
//! against the live bot and records the scored result.
//! [`VersionManager`] turns a replay into the new reference.
//! Both take the per-scenario lock from [`ScenarioLocks`], so work on
//! one scenario is serialized while different scenarios run freely.

mod context;
mod locks;
mod orchestrator;
mod version;

pub use context::ReplayContext;
pub use locks::ScenarioLocks;
pub use orchestrator::{ReplayOrchestrator, ReplayResult};
pub use version::VersionManager;
