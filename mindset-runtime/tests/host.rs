//! Session host tests on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use mindset_core::catalog::{Element, HintLadder, Phase, Scenario, ScenarioCatalog};
use mindset_core::config::TimingConfig;
use mindset_core::profile::{InMemoryProfileStore, JsonFileProfileStore, ProfileId, ProfileStore};
use mindset_core::session::{GameSession, ScenarioSelection, SessionEvent};
use mindset_core::types::{ElementId, GamePhase, PhaseId, ScenarioId};
use mindset_runtime::{HostConfig, PlayerCommand, RuntimeError, SessionHandle, SessionHost};

fn phase(id: &str) -> Phase {
    Phase {
        id: PhaseId::from(id),
        narrative: "The red van is parked by the blue shed.".to_string(),
        prompt: "What's wrong?".to_string(),
        elements: vec![
            Element::target("van", "Red Van", "that van should be blue"),
            Element::new("shed", "Blue Shed", "the shed is fine"),
        ],
        success_message: "Well spotted, {name}!".to_string(),
        hints: HintLadder::new("Look at colours.", "Vehicles.", "The van."),
        variant: None,
    }
}

fn catalog(scenarios: u32) -> Arc<ScenarioCatalog> {
    let scenarios = (1..=scenarios)
        .map(|i| Scenario {
            id: ScenarioId(i),
            title: format!("Case {i}"),
            setting: "street".to_string(),
            description: String::new(),
            icon: String::new(),
            difficulty: 1,
            phases: vec![phase("street")],
        })
        .collect();
    Arc::new(ScenarioCatalog::new(scenarios).expect("catalog"))
}

fn spawn(scenarios: u32, store: Arc<dyn ProfileStore>, profile_id: ProfileId) -> SessionHandle {
    let session = GameSession::new(catalog(scenarios), ScenarioSelection::All, TimingConfig::default())
        .expect("session");
    let config = HostConfig {
        player_name: "Ada".to_string(),
        profile_id,
        ..HostConfig::default()
    };
    SessionHost::spawn(session, store, config)
}

async fn wait_phase(handle: &SessionHandle, phase: GamePhase) {
    handle
        .wait_for(|s| s.state.game_phase == phase)
        .await
        .expect("host running");
}

#[tokio::test(start_paused = true)]
async fn host_paces_story_and_speak() {
    let store = Arc::new(InMemoryProfileStore::new());
    let handle = spawn(1, store, ProfileId::new());
    let started = tokio::time::Instant::now();

    wait_phase(&handle, GamePhase::Speak).await;
    assert!(started.elapsed() >= Duration::from_millis(5_000));

    wait_phase(&handle, GamePhase::Touch).await;
    assert!(started.elapsed() >= Duration::from_millis(20_000));

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn correct_spoken_answer_moves_to_touch() {
    let store = Arc::new(InMemoryProfileStore::new());
    let handle = spawn(1, store, ProfileId::new());

    handle.send(PlayerCommand::StoryComplete).await.expect("send");
    wait_phase(&handle, GamePhase::Speak).await;
    handle
        .send(PlayerCommand::SubmitAnswer("the van is the wrong colour".into()))
        .await
        .expect("send");
    let snapshot = handle
        .wait_for(|s| s.state.game_phase == GamePhase::Touch)
        .await
        .expect("touch");
    assert_eq!(snapshot.state.speak_attempts, 1);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn full_run_flushes_profile_once() {
    let store = Arc::new(InMemoryProfileStore::new());
    let id = ProfileId::new();
    let handle = spawn(2, store.clone(), id);
    let mut events = handle.subscribe_events();

    for _ in 0..2 {
        wait_phase(&handle, GamePhase::Touch).await;
        handle
            .send(PlayerCommand::Tap(ElementId::new("van")))
            .await
            .expect("send");
        wait_phase(&handle, GamePhase::Celebrate).await;
        handle.send(PlayerCommand::CelebrationComplete).await.expect("send");
    }

    let done = handle.wait_for(|s| s.state.is_complete).await.expect("complete");
    assert_eq!(done.state.stats.scenarios_completed, 2);

    let profile = store.load(id).expect("load").expect("profile written");
    assert_eq!(profile.total_sessions, 1);
    assert_eq!(profile.display_name, "Ada");
    assert_eq!(handle.profile().map(|p| p.total_targets_found), Some(2));

    // Nothing after completion writes the profile again.
    handle.send(PlayerCommand::CelebrationComplete).await.expect("send");
    tokio::time::sleep(Duration::from_secs(30)).await;
    let profile = store.load(id).expect("load").expect("profile");
    assert_eq!(profile.total_sessions, 1);

    let mut completions = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, SessionEvent::SessionCompleted(_)) {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn wrong_tap_flash_expires_on_real_time() {
    let store = Arc::new(InMemoryProfileStore::new());
    let handle = spawn(1, store, ProfileId::new());
    handle.send(PlayerCommand::StoryComplete).await.expect("send");
    handle.send(PlayerCommand::SpeakComplete).await.expect("send");
    handle
        .send(PlayerCommand::Tap(ElementId::new("shed")))
        .await
        .expect("send");

    let flashed = handle
        .wait_for(|s| !s.state.incorrect_taps.is_empty())
        .await
        .expect("flash");
    assert_eq!(flashed.state.wrong_attempts, 1);

    let cleared = handle
        .wait_for(|s| s.state.incorrect_taps.is_empty())
        .await
        .expect("expiry");
    assert_eq!(cleared.state.game_phase, GamePhase::Touch);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn commands_after_shutdown_fail() {
    let store = Arc::new(InMemoryProfileStore::new());
    let handle = spawn(1, store, ProfileId::new());
    handle.shutdown().await.expect("shutdown");
    let err = handle
        .send(PlayerCommand::UseHint)
        .await
        .expect_err("host stopped");
    assert!(matches!(err, RuntimeError::HostClosed));
}

#[tokio::test(start_paused = true)]
async fn collaborator_strings_reach_snapshots() {
    let store = Arc::new(InMemoryProfileStore::new());
    let handle = spawn(1, store, ProfileId::new());
    handle
        .send(PlayerCommand::CollaboratorError(Some("microphone blocked".into())))
        .await
        .expect("send");
    let snapshot = handle
        .wait_for(|s| s.state.collaborator_error.is_some())
        .await
        .expect("error shown");
    assert_eq!(snapshot.state.collaborator_error.as_deref(), Some("microphone blocked"));

    handle.send(PlayerCommand::CollaboratorError(None)).await.expect("send");
    handle
        .wait_for(|s| s.state.collaborator_error.is_none())
        .await
        .expect("error cleared");
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn json_store_receives_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonFileProfileStore::open(dir.path()).expect("store"));
    let id = ProfileId::new();
    let handle = spawn(1, store.clone(), id);

    handle.send(PlayerCommand::StoryComplete).await.expect("send");
    handle.send(PlayerCommand::SpeakComplete).await.expect("send");
    handle.send(PlayerCommand::UseHint).await.expect("send");
    handle.send(PlayerCommand::DismissHint).await.expect("send");
    handle
        .send(PlayerCommand::Tap(ElementId::new("van")))
        .await
        .expect("send");
    wait_phase(&handle, GamePhase::Celebrate).await;
    handle.send(PlayerCommand::CelebrationComplete).await.expect("send");
    handle.wait_for(|s| s.state.is_complete).await.expect("complete");

    let profile = store.load(id).expect("load").expect("written");
    assert_eq!(profile.total_hints_used, 1);
    assert_eq!(profile.best_star_rating.map(|s| s.stars()), Some(2));
    handle.shutdown().await.expect("shutdown");
}
