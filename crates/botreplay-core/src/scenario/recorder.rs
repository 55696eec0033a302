//! Interactive scenario recording
//!
//! A recording is a live conversation with the bot. Once the operator
//! is happy with it, the transcript is saved as version 0 of a new
//! scenario.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::timeouts;
use crate::driver::{BotSessionDriver, Post, TimeoutDriver, new_conversation_id, turns_from_posts};
use crate::error::{BotReplayError, BotReplayResult};
use crate::model::{NewScenario, Scenario};
use crate::storage::Repository;

/// Fewest non-empty posts worth saving as a scenario
const MIN_POSTS: usize = 2;

/// A live conversation being recorded
pub struct RecordingSession {
    driver: Arc<dyn BotSessionDriver>,
    bot_key: String,
    locale: String,
    conversation_id: String,
}

impl RecordingSession {
    pub fn bot_key(&self) -> &str {
        &self.bot_key
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Send one user message; failures are returned to the operator
    pub async fn say(&self, text: &str) -> BotReplayResult<()> {
        if text.trim().is_empty() {
            return Err(BotReplayError::invalid_argument("message must not be empty"));
        }
        self.driver
            .send(&self.conversation_id, text, &self.bot_key, &self.locale)
            .await?;
        Ok(())
    }

    /// Everything exchanged so far
    pub async fn posts(&self) -> BotReplayResult<Vec<Post>> {
        Ok(self
            .driver
            .transcript(&self.conversation_id, &self.bot_key, &self.locale)
            .await?)
    }
}

/// Opens recording sessions and saves them as scenarios
pub struct ScenarioRecorder {
    repository: Arc<dyn Repository>,
    driver: Arc<dyn BotSessionDriver>,
    turn_timeout: Duration,
}

impl ScenarioRecorder {
    pub fn new(repository: Arc<dyn Repository>, driver: Arc<dyn BotSessionDriver>) -> Self {
        Self {
            repository,
            driver,
            turn_timeout: timeouts::turn_timeout(),
        }
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Start a fresh conversation with a bot
    pub fn start(&self, bot_key: impl Into<String>, locale: impl Into<String>) -> RecordingSession {
        RecordingSession {
            driver: Arc::new(TimeoutDriver::new(self.driver.clone(), self.turn_timeout)),
            bot_key: bot_key.into(),
            locale: locale.into(),
            conversation_id: new_conversation_id(),
        }
    }

    /// Save the session transcript as a new scenario at version 0
    pub async fn save(
        &self,
        session: &RecordingSession,
        name: &str,
        description: &str,
    ) -> BotReplayResult<Scenario> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BotReplayError::invalid_argument("scenario name must not be empty"));
        }

        let turns = turns_from_posts(session.posts().await?);
        if turns.len() < MIN_POSTS {
            return Err(BotReplayError::invalid_argument("nothing to save"));
        }

        let count = turns.len();
        let scenario = self
            .repository
            .create_scenario_with_turns(
                NewScenario::new(name, session.bot_key()).with_description(description.trim()),
                turns,
            )
            .await?;

        info!(
            scenario_id = %scenario.id,
            bot_key = %scenario.bot_key,
            "Saved scenario '{}' with {} turns",
            scenario.name,
            count
        );
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, MockBotSessionDriver};
    use crate::model::{
        NewReplay, Outcome, Replay, ReplayId, ReplayTurn, ReplayTurnRecord, ScenarioId, Turn,
        TurnRecord, Version,
    };
    use crate::storage::{MemoryRepository, ScenarioFilter, StorageError, StorageResult};
    use async_trait::async_trait;

    /// Memory store that refuses to append reference turns
    struct NoAppendRepository {
        inner: MemoryRepository,
    }

    #[async_trait]
    impl Repository for NoAppendRepository {
        async fn create_scenario(&self, scenario: NewScenario) -> StorageResult<Scenario> {
            self.inner.create_scenario(scenario).await
        }

        async fn load_scenario(&self, id: ScenarioId) -> StorageResult<Option<Scenario>> {
            self.inner.load_scenario(id).await
        }

        async fn update_scenario(&self, scenario: &Scenario) -> StorageResult<()> {
            self.inner.update_scenario(scenario).await
        }

        async fn delete_scenario(&self, id: ScenarioId) -> StorageResult<()> {
            self.inner.delete_scenario(id).await
        }

        async fn list_scenarios(&self, filter: &ScenarioFilter) -> StorageResult<Vec<Scenario>> {
            self.inner.list_scenarios(filter).await
        }

        async fn append_turns(
            &self,
            _scenario_id: ScenarioId,
            _version: Version,
            _turns: Vec<Turn>,
        ) -> StorageResult<Vec<TurnRecord>> {
            Err(StorageError::InvalidData("disk full".to_string()))
        }

        async fn load_turns(
            &self,
            scenario_id: ScenarioId,
            version: Version,
        ) -> StorageResult<Vec<TurnRecord>> {
            self.inner.load_turns(scenario_id, version).await
        }

        async fn list_versions(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Version>> {
            self.inner.list_versions(scenario_id).await
        }

        async fn create_replay(
            &self,
            replay: NewReplay,
            turns: Vec<ReplayTurn>,
        ) -> StorageResult<Replay> {
            self.inner.create_replay(replay, turns).await
        }

        async fn load_replay(&self, id: ReplayId) -> StorageResult<Option<Replay>> {
            self.inner.load_replay(id).await
        }

        async fn load_replay_turns(&self, id: ReplayId) -> StorageResult<Vec<ReplayTurnRecord>> {
            self.inner.load_replay_turns(id).await
        }

        async fn list_replays(&self, scenario_id: ScenarioId) -> StorageResult<Vec<Replay>> {
            self.inner.list_replays(scenario_id).await
        }

        async fn delete_replay(&self, id: ReplayId) -> StorageResult<()> {
            self.inner.delete_replay(id).await
        }
    }

    fn chatty_driver() -> MockBotSessionDriver {
        let mut driver = MockBotSessionDriver::new();
        driver.expect_send().returning(|_, _, _, _| Ok(()));
        driver.expect_transcript().returning(|_, _, _| {
            Ok(vec![
                Post::user("hello"),
                Post::bot(""),
                Post::bot("hi, how can I help?"),
            ])
        });
        driver
    }

    #[tokio::test]
    async fn test_save_creates_initial_version() {
        let repository = Arc::new(MemoryRepository::new());
        let recorder = ScenarioRecorder::new(repository.clone(), Arc::new(chatty_driver()));

        let session = recorder.start("helpdesk", "en");
        session.say("hello").await.unwrap();
        let scenario = recorder
            .save(&session, " Greeting ", "first contact")
            .await
            .unwrap();

        assert_eq!(scenario.name, "Greeting");
        assert_eq!(scenario.description, "first contact");
        assert_eq!(scenario.bot_key, "helpdesk");
        assert_eq!(scenario.version, Version::INITIAL);
        assert_eq!(scenario.status, Outcome::Pass);
        assert_eq!(scenario.last_run, None);

        let turns: Vec<Turn> = repository
            .load_turns(scenario.id, Version::INITIAL)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.turn)
            .collect();
        assert_eq!(turns, vec![Turn::user("hello"), Turn::bot("hi, how can I help?")]);
    }

    #[tokio::test]
    async fn test_save_rejects_short_transcript() {
        let repository = Arc::new(MemoryRepository::new());
        let mut driver = MockBotSessionDriver::new();
        driver
            .expect_transcript()
            .returning(|_, _, _| Ok(vec![Post::user("hello"), Post::bot("")]));
        let recorder = ScenarioRecorder::new(repository.clone(), Arc::new(driver));

        let session = recorder.start("helpdesk", "en");
        let result = recorder.save(&session, "Greeting", "").await;

        assert!(matches!(result, Err(BotReplayError::InvalidArgument(_))));
        let all = repository.list_scenarios(&ScenarioFilter::new()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_failed_transcript_write_leaves_no_scenario() {
        let repository = Arc::new(NoAppendRepository {
            inner: MemoryRepository::new(),
        });
        let recorder = ScenarioRecorder::new(repository.clone(), Arc::new(chatty_driver()));

        let session = recorder.start("helpdesk", "en");
        session.say("hello").await.unwrap();
        let result = recorder.save(&session, "Greeting", "").await;

        assert!(matches!(
            result,
            Err(BotReplayError::Persistence(StorageError::InvalidData(_)))
        ));
        let left = repository.list_scenarios(&ScenarioFilter::new()).await.unwrap();
        assert!(left.is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_empty_name() {
        let mut driver = MockBotSessionDriver::new();
        driver.expect_transcript().never();
        let recorder = ScenarioRecorder::new(Arc::new(MemoryRepository::new()), Arc::new(driver));

        let session = recorder.start("helpdesk", "en");
        let result = recorder.save(&session, "   ", "").await;
        assert!(matches!(result, Err(BotReplayError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_say_propagates_driver_errors() {
        let mut driver = MockBotSessionDriver::new();
        driver
            .expect_send()
            .returning(|_, _, bot_key, _| Err(DriverError::InvalidBotKey(bot_key.to_string())));
        let recorder = ScenarioRecorder::new(Arc::new(MemoryRepository::new()), Arc::new(driver));

        let session = recorder.start("nobody", "en");
        let result = session.say("hello").await;
        assert!(matches!(result, Err(BotReplayError::InvalidBotKey(key)) if key == "nobody"));

        let empty = session.say("  ").await;
        assert!(matches!(empty, Err(BotReplayError::InvalidArgument(_))));
    }
}
