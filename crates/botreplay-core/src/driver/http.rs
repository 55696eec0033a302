//! HTTP bot driver
//!
//! Talks to a bot service over JSON:
//! - `POST {endpoint}/bots/{bot}/conversations/{id}/messages` sends a message
//! - `GET  {endpoint}/bots/{bot}/conversations/{id}?locale=` reads the transcript
//! - `GET  {endpoint}/bots` lists the available bots

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BotCatalog, BotDescription, BotSessionDriver, DriverError, DriverResult, Post};
use crate::config::BotReplayConfig;
use crate::model::Role;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    text: &'a str,
    locale: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    posts: Vec<WirePost>,
}

#[derive(Debug, Deserialize)]
struct WirePost {
    author: Role,
    #[serde(default)]
    content: Option<String>,
}

impl From<WirePost> for Post {
    fn from(post: WirePost) -> Self {
        Post {
            role: post.author,
            content: post.content.unwrap_or_default(),
        }
    }
}

/// Bot driver and catalog backed by a bot HTTP API
pub struct HttpBotDriver {
    http_client: Client,
    endpoint: String,
}

impl HttpBotDriver {
    /// Fails when the HTTP client cannot be built, e.g. no TLS backend
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> DriverResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                DriverError::BotUnavailable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BotReplayConfig) -> DriverResult<Self> {
        Self::new(config.bot_endpoint.clone(), config.connect_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn conversation_url(&self, bot_key: &str, conversation_id: &str) -> String {
        format!(
            "{}/bots/{}/conversations/{}",
            self.endpoint, bot_key, conversation_id
        )
    }

    fn transport_error(err: reqwest::Error) -> DriverError {
        DriverError::BotUnavailable(err.to_string())
    }

    async fn check_status(response: Response, bot_key: &str) -> DriverResult<Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DriverError::InvalidBotKey(bot_key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriverError::BotUnavailable(format!("HTTP {}: {}", status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl BotSessionDriver for HttpBotDriver {
    async fn send(
        &self,
        conversation_id: &str,
        text: &str,
        bot_key: &str,
        locale: &str,
    ) -> DriverResult<()> {
        let url = format!("{}/messages", self.conversation_url(bot_key, conversation_id));
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&SendRequest { text, locale })
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::check_status(response, bot_key).await?;
        Ok(())
    }

    async fn transcript(
        &self,
        conversation_id: &str,
        bot_key: &str,
        locale: &str,
    ) -> DriverResult<Vec<Post>> {
        let url = self.conversation_url(bot_key, conversation_id);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("locale", locale)])
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body: TranscriptResponse = Self::check_status(response, bot_key)
            .await?
            .json()
            .await
            .map_err(Self::transport_error)?;

        Ok(body.posts.into_iter().map(Post::from).collect())
    }
}

#[async_trait]
impl BotCatalog for HttpBotDriver {
    async fn list_bots(&self) -> DriverResult<Vec<BotDescription>> {
        let url = format!("{}/bots", self.endpoint);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriverError::BotUnavailable(format!(
                "bot catalog returned HTTP {}",
                status
            )));
        }

        response.json().await.map_err(Self::transport_error)
    }
}
