//! botreplay core library
//!
//! Records reference conversations with a chatbot, replays them against
//! the live bot and reports where the answers diverge.
//!
//! # Features
//!
//! - **Transcript Store**: ordered reference turns per scenario and version
//! - **Positional Diff**: scoring and question/answer presentation passes
//! - **Replay Orchestration**: serialized per scenario, bounded per bot call
//! - **Version Promotion**: any replay can become the new reference
//! - **Reports**: table, Markdown and JSON output
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use botreplay_core::{HttpBotDriver, MemoryRepository, ReplayOrchestrator, ScenarioId};
//!
//! let repository = Arc::new(MemoryRepository::new());
//! let driver = Arc::new(HttpBotDriver::new("http://localhost:8080/api/chatbot", timeout)?);
//! let orchestrator = ReplayOrchestrator::new(repository, driver);
//! let result = orchestrator.run(ScenarioId(1)).await?;
//! println!("{} error(s)", result.error_count());
//! ```

pub mod config;
pub mod diff;
pub mod driver;
pub mod error;
pub mod model;
pub mod replay;
pub mod report;
pub mod scenario;
pub mod storage;
pub mod transcript;

// Re-exports for convenience
pub use config::{BotReplayConfig, ConfigLoader, load_config};
pub use diff::{DiffAlgorithm, ResultRow, Scoring};
pub use driver::{
    BotCatalog, BotDescription, BotOffer, BotSessionDriver, DriverError, HttpBotDriver, Post,
    TimeoutDriver,
};
pub use error::{BotReplayError, BotReplayResult};
pub use model::{
    Outcome, Replay, ReplayId, ReplayTurn, ReplayTurnRecord, Role, Scenario, ScenarioId, Turn,
    TurnRecord, TurnStatus, Version,
};
pub use replay::{ReplayContext, ReplayOrchestrator, ReplayResult, ScenarioLocks, VersionManager};
pub use report::{ReplayReport, ReportFormat, generate_report};
pub use scenario::{RecordingSession, ScenarioManager, ScenarioRecorder};
pub use storage::{MemoryRepository, Repository, ScenarioFilter, StorageError, StoreState};
pub use transcript::{TranscriptStore, VersionEntry};
