//! Bot session driver
//!
//! The replay engine talks to a live bot only through
//! [`BotSessionDriver`]: send one user message, then read back
//! everything said in the conversation so far.

mod catalog;
mod http;

pub use catalog::{BotCatalog, BotDescription, BotOffer};
pub use http::HttpBotDriver;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{Role, Turn};

/// Failures reported by a bot driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("bot unavailable: {0}")]
    BotUnavailable(String),

    #[error("invalid bot key: {0}")]
    InvalidBotKey(String),
}

impl DriverError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DriverError::BotUnavailable(_) => "bot_unavailable",
            DriverError::InvalidBotKey(_) => "invalid_bot_key",
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// One entry of a live conversation as reported by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub role: Role,
    pub content: String,
}

impl Post {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// Convert a live transcript into turns, dropping posts without content
pub fn turns_from_posts(posts: Vec<Post>) -> Vec<Turn> {
    posts
        .into_iter()
        .filter(|post| !post.content.is_empty())
        .map(|post| Turn::from_role(post.role, post.content))
        .collect()
}

/// Fresh conversation id for a new bot session
pub fn new_conversation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Drives a live bot conversation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotSessionDriver: Send + Sync {
    /// Send one user message and wait for the bot to finish answering
    async fn send(
        &self,
        conversation_id: &str,
        text: &str,
        bot_key: &str,
        locale: &str,
    ) -> DriverResult<()>;

    /// Everything exchanged in the conversation so far, oldest first
    async fn transcript(
        &self,
        conversation_id: &str,
        bot_key: &str,
        locale: &str,
    ) -> DriverResult<Vec<Post>>;
}

/// Bounds every call of an inner driver
///
/// A call that does not finish in time fails with
/// [`DriverError::BotUnavailable`] instead of hanging the replay.
pub struct TimeoutDriver {
    inner: Arc<dyn BotSessionDriver>,
    timeout: Duration,
}

impl TimeoutDriver {
    pub fn new(inner: Arc<dyn BotSessionDriver>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn elapsed(&self, what: &str, bot_key: &str) -> DriverError {
        debug!("{} for bot {} timed out after {:?}", what, bot_key, self.timeout);
        DriverError::BotUnavailable(format!(
            "{} got no answer within {}s",
            what,
            self.timeout.as_secs_f64()
        ))
    }
}

#[async_trait]
impl BotSessionDriver for TimeoutDriver {
    async fn send(
        &self,
        conversation_id: &str,
        text: &str,
        bot_key: &str,
        locale: &str,
    ) -> DriverResult<()> {
        tokio::time::timeout(
            self.timeout,
            self.inner.send(conversation_id, text, bot_key, locale),
        )
        .await
        .map_err(|_| self.elapsed("send", bot_key))?
    }

    async fn transcript(
        &self,
        conversation_id: &str,
        bot_key: &str,
        locale: &str,
    ) -> DriverResult<Vec<Post>> {
        tokio::time::timeout(
            self.timeout,
            self.inner.transcript(conversation_id, bot_key, locale),
        )
        .await
        .map_err(|_| self.elapsed("transcript", bot_key))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowBot;

    #[async_trait]
    impl BotSessionDriver for SlowBot {
        async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> DriverResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn transcript(&self, _: &str, _: &str, _: &str) -> DriverResult<Vec<Post>> {
            Ok(vec![Post::user("hi")])
        }
    }

    #[test]
    fn test_turns_from_posts_drops_empty_content() {
        let turns = turns_from_posts(vec![
            Post::user("hi"),
            Post::bot(""),
            Post::bot("hello"),
        ]);
        assert_eq!(turns, vec![Turn::user("hi"), Turn::bot("hello")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_surfaces_bot_unavailable() {
        let driver = TimeoutDriver::new(Arc::new(SlowBot), Duration::from_secs(5));

        let result = driver.send("c1", "hi", "bot", "en").await;
        assert!(matches!(result, Err(DriverError::BotUnavailable(_))));

        let posts = driver.transcript("c1", "bot", "en").await.unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_passes_inner_errors_through() {
        let mut inner = MockBotSessionDriver::new();
        inner
            .expect_send()
            .returning(|_, _, key, _| Err(DriverError::InvalidBotKey(key.to_string())));

        let driver = TimeoutDriver::new(Arc::new(inner), Duration::from_secs(5));
        let result = driver.send("c1", "hi", "ghost", "en").await;
        assert_eq!(result, Err(DriverError::InvalidBotKey("ghost".to_string())));
    }
}
