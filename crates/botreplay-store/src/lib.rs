//! File backed persistence for botreplay
//!
//! Keeps every scenario, transcript and replay in a single JSON
//! document under the data directory.

mod local;

pub use local::{LocalRepository, STORE_FILE};
