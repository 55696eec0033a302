//! Replay orchestrator

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{ReplayContext, ScenarioLocks};
use crate::config::{BotReplayConfig, timeouts};
use crate::diff::{DiffAlgorithm, ResultRow};
use crate::driver::{BotSessionDriver, TimeoutDriver, turns_from_posts};
use crate::error::{BotReplayError, BotReplayResult};
use crate::model::{
    NewReplay, Outcome, Replay, ReplayId, ReplayTurn, Scenario, ScenarioId, Turn,
};
use crate::storage::Repository;
use crate::transcript::TranscriptStore;

/// Outcome of one replay run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// The persisted replay record
    pub replay: Replay,

    /// Turns the bot produced, with their scored status
    pub turns: Vec<ReplayTurn>,
}

impl ReplayResult {
    pub fn error_count(&self) -> usize {
        self.replay.error_count
    }

    pub fn passed(&self) -> bool {
        self.replay.status.is_pass()
    }
}

/// Re-runs scenarios against the live bot and records the results
pub struct ReplayOrchestrator {
    repository: Arc<dyn Repository>,
    transcripts: TranscriptStore,
    driver: Arc<dyn BotSessionDriver>,
    locks: ScenarioLocks,
    algorithm: DiffAlgorithm,
    turn_timeout: Duration,
    default_locale: String,
}

impl ReplayOrchestrator {
    pub fn new(repository: Arc<dyn Repository>, driver: Arc<dyn BotSessionDriver>) -> Self {
        Self {
            transcripts: TranscriptStore::new(repository.clone()),
            repository,
            driver,
            locks: ScenarioLocks::new(),
            algorithm: DiffAlgorithm::default(),
            turn_timeout: timeouts::turn_timeout(),
            default_locale: "en".to_string(),
        }
    }

    /// Orchestrator using the configured timeout and locale
    pub fn from_config(
        repository: Arc<dyn Repository>,
        driver: Arc<dyn BotSessionDriver>,
        config: &BotReplayConfig,
    ) -> Self {
        Self::new(repository, driver)
            .with_turn_timeout(config.turn_timeout())
            .with_default_locale(config.default_locale.clone())
    }

    /// Share a lock table with other components working on the same scenarios
    pub fn with_locks(mut self, locks: ScenarioLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn locks(&self) -> &ScenarioLocks {
        &self.locks
    }

    /// Replay a scenario in the default locale
    pub async fn run(&self, scenario_id: ScenarioId) -> BotReplayResult<ReplayResult> {
        let locale = self.default_locale.clone();
        self.run_in_locale(scenario_id, &locale).await
    }

    /// Replay a scenario against the live bot
    ///
    /// Every user turn of the current reference transcript is sent in
    /// order, each call awaited before the next. A failed send is
    /// logged and skipped; the missing answer then shows up as a
    /// mismatch. Failing to fetch the final transcript aborts the run
    /// without persisting anything.
    pub async fn run_in_locale(
        &self,
        scenario_id: ScenarioId,
        locale: &str,
    ) -> BotReplayResult<ReplayResult> {
        let _guard = self.locks.lock(scenario_id).await;

        let mut scenario = self.load_scenario(scenario_id).await?;
        let reference = self
            .transcripts
            .load_transcript(scenario_id, scenario.version)
            .await?;
        let context = ReplayContext::new(&scenario, locale);

        info!(
            scenario_id = %scenario_id,
            version = %context.version,
            bot_key = %context.bot_key,
            locale = %context.locale,
            "Starting replay of '{}' ({} reference turns)",
            scenario.name,
            reference.len()
        );

        let driver = TimeoutDriver::new(self.driver.clone(), self.turn_timeout);
        self.send_user_turns(&driver, &context, &reference).await;

        let posts = driver
            .transcript(&context.conversation_id, &context.bot_key, &context.locale)
            .await?;
        let mut turns: Vec<ReplayTurn> = turns_from_posts(posts)
            .into_iter()
            .map(ReplayTurn::new)
            .collect();

        let error_count = self.algorithm.score_in_place(&reference, &mut turns);
        let status = Outcome::from_error_count(error_count);
        let now = Utc::now();

        scenario.status = status;
        scenario.last_run = Some(now);
        let replay = self
            .repository
            .record_replay(
                NewReplay {
                    scenario_id,
                    version: context.version,
                    last_run: now,
                    status,
                    error_count,
                },
                turns.clone(),
                &scenario,
            )
            .await?;

        info!(
            scenario_id = %scenario_id,
            replay_id = %replay.id,
            error_count,
            "Replay finished: {}",
            status
        );

        Ok(ReplayResult { replay, turns })
    }

    /// Question/answer rows comparing a replay with the reference it ran against
    pub async fn diff_presentation(
        &self,
        scenario_id: ScenarioId,
        replay_id: ReplayId,
    ) -> BotReplayResult<Vec<ResultRow>> {
        self.load_scenario(scenario_id).await?;
        let replay = self
            .repository
            .load_replay(replay_id)
            .await?
            .ok_or_else(|| {
                BotReplayError::invalid_argument(format!("unknown replay {}", replay_id))
            })?;
        if replay.scenario_id != scenario_id {
            return Err(BotReplayError::invalid_argument(format!(
                "replay {} does not belong to scenario {}",
                replay_id, scenario_id
            )));
        }

        let reference = self
            .transcripts
            .load_transcript(scenario_id, replay.version)
            .await?;
        let current: Vec<Turn> = self
            .repository
            .load_replay_turns(replay_id)
            .await?
            .into_iter()
            .map(|record| record.turn)
            .collect();

        Ok(self.algorithm.present(&reference, &current))
    }

    async fn send_user_turns(
        &self,
        driver: &TimeoutDriver,
        context: &ReplayContext,
        reference: &[Turn],
    ) {
        for (turn_index, turn) in reference.iter().enumerate() {
            let Some(text) = turn.user_text() else {
                continue;
            };

            match driver
                .send(&context.conversation_id, text, &context.bot_key, &context.locale)
                .await
            {
                Ok(()) => debug!(turn_index, "Sent user turn"),
                Err(err) => warn!(
                    scenario_id = %context.scenario_id,
                    turn_index,
                    error_code = err.error_code(),
                    "Send failed, continuing with the next turn: {}",
                    err
                ),
            }
        }
    }

    async fn load_scenario(&self, scenario_id: ScenarioId) -> BotReplayResult<Scenario> {
        self.repository
            .load_scenario(scenario_id)
            .await?
            .ok_or_else(|| {
                BotReplayError::invalid_argument(format!("unknown scenario {}", scenario_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, DriverResult, MockBotSessionDriver, Post};
    use crate::model::{NewScenario, TurnStatus, Version};
    use crate::storage::MemoryRepository;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every message with "echo: <text>" after a short delay
    #[derive(Default)]
    struct EchoBot {
        conversations: Mutex<HashMap<String, Vec<Post>>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl BotSessionDriver for EchoBot {
        async fn send(&self, conversation_id: &str, text: &str, _: &str, _: &str) -> DriverResult<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.conversations
                .lock()
                .entry(conversation_id.to_string())
                .or_default()
                .extend([Post::user(text), Post::bot(format!("echo: {}", text))]);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }

        async fn transcript(&self, conversation_id: &str, _: &str, _: &str) -> DriverResult<Vec<Post>> {
            Ok(self
                .conversations
                .lock()
                .get(conversation_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    async fn seed(repository: &Arc<MemoryRepository>, turns: Vec<Turn>) -> Scenario {
        let scenario = repository
            .create_scenario(NewScenario::new("Greeting", "echo"))
            .await
            .unwrap();
        repository
            .append_turns(scenario.id, Version::INITIAL, turns)
            .await
            .unwrap();
        scenario
    }

    fn echo_reference() -> Vec<Turn> {
        vec![
            Turn::user("hi"),
            Turn::bot("echo: hi"),
            Turn::user("bye"),
            Turn::bot("echo: bye"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_matching_replay_passes() {
        let repository = Arc::new(MemoryRepository::new());
        let scenario = seed(&repository, echo_reference()).await;
        let orchestrator = ReplayOrchestrator::new(repository.clone(), Arc::new(EchoBot::default()));

        let result = orchestrator.run(scenario.id).await.unwrap();

        assert!(result.passed());
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.turns.len(), 4);
        assert_eq!(result.replay.version, Version::INITIAL);

        let stored = repository.load_scenario(scenario.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Outcome::Pass);
        assert_eq!(stored.last_run, Some(result.replay.last_run));
        assert_eq!(repository.load_replay_turns(result.replay.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_send_failure_does_not_abort_remaining_turns() {
        let repository = Arc::new(MemoryRepository::new());
        let scenario = seed(
            &repository,
            vec![
                Turn::user("hi"),
                Turn::bot("hello"),
                Turn::user("weather?"),
                Turn::bot("sunny"),
                Turn::user("bye"),
                Turn::bot("goodbye"),
            ],
        )
        .await;

        let sent = Arc::new(Mutex::new(Vec::new()));
        let recorder = sent.clone();
        let mut driver = MockBotSessionDriver::new();
        driver.expect_send().times(3).returning(move |_, text, _, _| {
            recorder.lock().push(text.to_string());
            if text == "weather?" {
                Err(DriverError::BotUnavailable("connection reset".into()))
            } else {
                Ok(())
            }
        });
        driver.expect_transcript().times(1).returning(|_, _, _| {
            Ok(vec![
                Post::user("hi"),
                Post::bot("hello"),
                Post::user("bye"),
                Post::bot("goodbye"),
            ])
        });

        let orchestrator = ReplayOrchestrator::new(repository.clone(), Arc::new(driver));
        let result = orchestrator.run(scenario.id).await.unwrap();

        assert_eq!(*sent.lock(), vec!["hi", "weather?", "bye"]);
        assert!(!result.passed());
        // "bye" now sits where "weather?" was expected, and the two
        // reference turns past the end of the replay count as well
        assert_eq!(result.error_count(), 4);
        assert_eq!(result.turns.len(), 4);
        assert_eq!(result.turns[1].status, TurnStatus::Matched);
        assert_eq!(result.turns[2].status, TurnStatus::Mismatched);
        assert_eq!(result.turns[3].status, TurnStatus::Mismatched);

        let stored = repository.load_scenario(scenario.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Outcome::Fail);
        assert_eq!(repository.list_replays(scenario.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transcript_failure_persists_nothing() {
        let repository = Arc::new(MemoryRepository::new());
        let scenario = seed(&repository, echo_reference()).await;

        let mut driver = MockBotSessionDriver::new();
        driver.expect_send().returning(|_, _, _, _| Ok(()));
        driver
            .expect_transcript()
            .returning(|_, _, _| Err(DriverError::BotUnavailable("gone".into())));

        let orchestrator = ReplayOrchestrator::new(repository.clone(), Arc::new(driver));
        let result = orchestrator.run(scenario.id).await;

        assert!(matches!(result, Err(BotReplayError::BotUnavailable(_))));
        assert!(repository.list_replays(scenario.id).await.unwrap().is_empty());
        let stored = repository.load_scenario(scenario.id).await.unwrap().unwrap();
        assert_eq!(stored.last_run, None);
    }

    #[tokio::test]
    async fn test_unknown_scenario_is_rejected_before_any_call() {
        let mut driver = MockBotSessionDriver::new();
        driver.expect_send().never();
        driver.expect_transcript().never();

        let orchestrator =
            ReplayOrchestrator::new(Arc::new(MemoryRepository::new()), Arc::new(driver));
        let result = orchestrator.run(ScenarioId(42)).await;

        assert!(matches!(result, Err(BotReplayError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_locale_and_bot_key_reach_the_driver() {
        let repository = Arc::new(MemoryRepository::new());
        let scenario = seed(&repository, vec![Turn::user("bonjour")]).await;

        let mut driver = MockBotSessionDriver::new();
        driver
            .expect_send()
            .withf(|_, text, bot_key, locale| {
                text == "bonjour" && bot_key == "echo" && locale == "fr"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        driver
            .expect_transcript()
            .withf(|_, bot_key, locale| bot_key == "echo" && locale == "fr")
            .returning(|_, _, _| Ok(vec![Post::user("bonjour")]));

        let orchestrator = ReplayOrchestrator::new(repository, Arc::new(driver));
        let result = orchestrator.run_in_locale(scenario.id, "fr").await.unwrap();
        assert!(result.passed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_one_scenario_are_serialized() {
        let repository = Arc::new(MemoryRepository::new());
        let scenario = seed(&repository, echo_reference()).await;
        let bot = Arc::new(EchoBot::default());
        let orchestrator = ReplayOrchestrator::new(repository.clone(), bot.clone());

        let (first, second) = tokio::join!(orchestrator.run(scenario.id), orchestrator.run(scenario.id));

        assert!(first.unwrap().passed());
        assert!(second.unwrap().passed());
        assert_eq!(bot.peak.load(Ordering::SeqCst), 1);
        assert_eq!(repository.list_replays(scenario.id).await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_on_different_scenarios_overlap() {
        let repository = Arc::new(MemoryRepository::new());
        let first = seed(&repository, echo_reference()).await;
        let second = seed(&repository, echo_reference()).await;
        let bot = Arc::new(EchoBot::default());
        let orchestrator = ReplayOrchestrator::new(repository, bot.clone());

        let (a, b) = tokio::join!(orchestrator.run(first.id), orchestrator.run(second.id));

        assert!(a.unwrap().passed());
        assert!(b.unwrap().passed());
        assert_eq!(bot.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_diff_presentation_uses_replay_version() {
        let repository = Arc::new(MemoryRepository::new());
        let scenario = seed(&repository, vec![Turn::user("hi"), Turn::bot("hello")]).await;
        let orchestrator = ReplayOrchestrator::new(repository.clone(), Arc::new(EchoBot::default()));

        let result = orchestrator.run(scenario.id).await.unwrap();
        let rows = orchestrator
            .diff_presentation(scenario.id, result.replay.id)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "hi");
        assert_eq!(rows[0].reference_answer.as_deref(), Some("hello"));
        assert_eq!(rows[0].current_answer.as_deref(), Some("echo: hi"));
        assert_eq!(rows[0].status, TurnStatus::Mismatched);
    }

    #[tokio::test(start_paused = true)]
    async fn test_diff_presentation_rejects_foreign_replay() {
        let repository = Arc::new(MemoryRepository::new());
        let owner = seed(&repository, echo_reference()).await;
        let other = seed(&repository, echo_reference()).await;
        let orchestrator = ReplayOrchestrator::new(repository, Arc::new(EchoBot::default()));

        let result = orchestrator.run(owner.id).await.unwrap();

        let foreign = orchestrator.diff_presentation(other.id, result.replay.id).await;
        assert!(matches!(foreign, Err(BotReplayError::InvalidArgument(_))));

        let missing = orchestrator.diff_presentation(owner.id, ReplayId(99)).await;
        assert!(matches!(missing, Err(BotReplayError::InvalidArgument(_))));
    }
}
