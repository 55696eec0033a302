//! The local repository survives a restart

use std::sync::Arc;

use botreplay_core::model::{NewReplay, NewScenario, ReplayTurn};
use botreplay_core::{
    Outcome, Repository, ScenarioFilter, ScenarioManager, Turn, TurnStatus, Version,
    VersionManager,
};
use botreplay_store::LocalRepository;
use chrono::Utc;
use tempfile::TempDir;

#[tokio::test]
async fn reopened_store_keeps_everything() {
    let temp = TempDir::new().unwrap();

    let (scenario_id, replay_id) = {
        let repo = LocalRepository::open(temp.path()).await.unwrap();
        let scenario = repo
            .create_scenario(NewScenario::new("Lost card", "bank").with_description("card blocking"))
            .await
            .unwrap();
        repo.append_turns(
            scenario.id,
            Version::INITIAL,
            vec![Turn::user("I lost my card"), Turn::bot("I blocked it")],
        )
        .await
        .unwrap();

        let mut answer = ReplayTurn::new(Turn::bot("please call us"));
        answer.status = TurnStatus::Mismatched;
        let replay = repo
            .create_replay(
                NewReplay {
                    scenario_id: scenario.id,
                    version: Version::INITIAL,
                    last_run: Utc::now(),
                    status: Outcome::Fail,
                    error_count: 1,
                },
                vec![ReplayTurn::new(Turn::user("I lost my card")), answer],
            )
            .await
            .unwrap();
        (scenario.id, replay.id)
    };

    let repo = LocalRepository::open(temp.path()).await.unwrap();

    let scenario = repo.load_scenario(scenario_id).await.unwrap().unwrap();
    assert_eq!(scenario.name, "Lost card");
    assert_eq!(scenario.description, "card blocking");

    let turns = repo.load_turns(scenario_id, Version::INITIAL).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].turn, Turn::bot("I blocked it"));

    let replay_turns = repo.load_replay_turns(replay_id).await.unwrap();
    assert_eq!(replay_turns[1].status, TurnStatus::Mismatched);
    assert_eq!(repo.list_replays(scenario_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn ids_and_sequences_continue_after_reopen() {
    let temp = TempDir::new().unwrap();

    let first_id = {
        let repo = LocalRepository::open(temp.path()).await.unwrap();
        let scenario = repo
            .create_scenario(NewScenario::new("First", "bank"))
            .await
            .unwrap();
        repo.append_turns(scenario.id, Version::INITIAL, vec![Turn::user("a")])
            .await
            .unwrap();
        scenario.id
    };

    let repo = LocalRepository::open(temp.path()).await.unwrap();
    let second = repo
        .create_scenario(NewScenario::new("Second", "bank"))
        .await
        .unwrap();
    assert!(second.id > first_id);

    let appended = repo
        .append_turns(first_id, Version::INITIAL, vec![Turn::bot("b")])
        .await
        .unwrap();
    assert_eq!(appended[0].seq, 1);

    let all = repo.list_scenarios(&ScenarioFilter::new()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn promote_and_remove_through_local_store() {
    let temp = TempDir::new().unwrap();
    let repo = Arc::new(LocalRepository::open(temp.path()).await.unwrap());

    let scenario = repo
        .create_scenario(NewScenario::new("Balance", "bank"))
        .await
        .unwrap();
    repo.append_turns(
        scenario.id,
        Version::INITIAL,
        vec![Turn::user("balance?"), Turn::bot("100 EUR")],
    )
    .await
    .unwrap();
    let replay = repo
        .create_replay(
            NewReplay {
                scenario_id: scenario.id,
                version: Version::INITIAL,
                last_run: Utc::now(),
                status: Outcome::Fail,
                error_count: 1,
            },
            vec![
                ReplayTurn::new(Turn::user("balance?")),
                ReplayTurn::new(Turn::bot("120 EUR")),
            ],
        )
        .await
        .unwrap();

    let promoted = VersionManager::new(repo.clone())
        .promote(replay.id)
        .await
        .unwrap();
    assert_eq!(promoted.version, Version::from(replay.id));

    let reopened = LocalRepository::open(temp.path()).await.unwrap();
    let stored = reopened.load_scenario(scenario.id).await.unwrap().unwrap();
    assert_eq!(stored.version, Version::from(replay.id));
    assert_eq!(reopened.list_versions(scenario.id).await.unwrap().len(), 2);

    ScenarioManager::new(repo.clone())
        .remove(scenario.id)
        .await
        .unwrap();
    let reopened = LocalRepository::open(temp.path()).await.unwrap();
    assert!(reopened.load_scenario(scenario.id).await.unwrap().is_none());
    assert!(reopened.load_replay(replay.id).await.unwrap().is_none());
}
