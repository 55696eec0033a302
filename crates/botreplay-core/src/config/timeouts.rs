//! Default timeout values
//!
//! All of them can be overridden through configuration.

use std::time::Duration;

/// Default bound on a single bot call, including the bot's thinking time (60 seconds)
pub const TURN_SECS: u64 = 60;

/// Default HTTP connect timeout for the bot service (10 seconds)
pub const CONNECT_SECS: u64 = 10;

pub fn turn_timeout() -> Duration {
    Duration::from_secs(TURN_SECS)
}
