//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use botreplay_core::driver::DriverResult;
use botreplay_core::{
    BotSessionDriver, DriverError, MemoryRepository, Post, Repository, Scenario, Turn, Version,
};
use botreplay_core::model::NewScenario;
use parking_lot::Mutex;

/// Bot answering from a fixed script
///
/// Unknown questions get "I don't understand". Questions listed in
/// `unavailable_on` fail with `BotUnavailable` and leave no trace in
/// the transcript. `extra_after` injects an additional bot message
/// after the answer to a question.
#[derive(Default)]
pub struct ScriptedBot {
    answers: HashMap<String, String>,
    extra_after: HashMap<String, String>,
    unavailable_on: HashSet<String>,
    conversations: Mutex<HashMap<String, Vec<Post>>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedBot {
    pub fn new(script: &[(&str, &str)]) -> Self {
        Self {
            answers: script
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, question: &str) -> Self {
        self.unavailable_on.insert(question.to_string());
        self
    }

    pub fn with_extra_after(mut self, question: &str, message: &str) -> Self {
        self.extra_after
            .insert(question.to_string(), message.to_string());
        self
    }

    /// Every message the bot was asked to handle, in order
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl BotSessionDriver for ScriptedBot {
    async fn send(
        &self,
        conversation_id: &str,
        text: &str,
        _bot_key: &str,
        _locale: &str,
    ) -> DriverResult<()> {
        self.sent.lock().push(text.to_string());
        if self.unavailable_on.contains(text) {
            return Err(DriverError::BotUnavailable("scripted outage".to_string()));
        }

        let answer = self
            .answers
            .get(text)
            .cloned()
            .unwrap_or_else(|| "I don't understand".to_string());

        let mut conversations = self.conversations.lock();
        let posts = conversations.entry(conversation_id.to_string()).or_default();
        posts.push(Post::user(text));
        posts.push(Post::bot(answer));
        if let Some(extra) = self.extra_after.get(text) {
            posts.push(Post::bot(extra.clone()));
        }
        Ok(())
    }

    async fn transcript(
        &self,
        conversation_id: &str,
        _bot_key: &str,
        _locale: &str,
    ) -> DriverResult<Vec<Post>> {
        Ok(self
            .conversations
            .lock()
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

pub const GREETING: &[(&str, &str)] = &[
    ("hi", "hello"),
    ("what can you do?", "I answer questions about the library"),
    ("bye", "goodbye"),
];

pub fn greeting_reference() -> Vec<Turn> {
    vec![
        Turn::user("hi"),
        Turn::bot("hello"),
        Turn::user("what can you do?"),
        Turn::bot("I answer questions about the library"),
        Turn::user("bye"),
        Turn::bot("goodbye"),
    ]
}

/// Create a scenario whose version 0 holds `turns`
pub async fn seed_scenario(repository: &Arc<MemoryRepository>, turns: Vec<Turn>) -> Scenario {
    let scenario = repository
        .create_scenario(NewScenario::new("Greeting", "library"))
        .await
        .unwrap();
    repository
        .append_turns(scenario.id, Version::INITIAL, turns)
        .await
        .unwrap();
    scenario
}
