//! End-to-end walkthroughs of the game session controller.

use std::sync::Arc;
use std::time::Duration;

use mindset_core::catalog::{Element, HintLadder, Phase, Scenario, ScenarioCatalog};
use mindset_core::config::{MindsetConfig, TimingConfig};
use mindset_core::judge::{AnswerJudge, AnswerVerdict, KeywordJudge};
use mindset_core::pacing::host_cue;
use mindset_core::profile::{InMemoryProfileStore, ProfileId, ProfileStore, record_session};
use mindset_core::scoring::StarRating;
use mindset_core::session::{GameSession, ScenarioSelection, SessionEvent};
use mindset_core::types::{ElementId, GamePhase, PhaseId, ScenarioId};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Targets `{a, c}`, non-targets `{b, d}`.
fn abc_phase(id: &str) -> Phase {
    Phase {
        id: PhaseId::from(id),
        narrative: "Something is off here.".to_string(),
        prompt: "What's wrong?".to_string(),
        elements: vec![
            Element::target("a", "Alpha", "found alpha"),
            Element::new("b", "Bravo", "bravo is fine"),
            Element::target("c", "Charlie", "found charlie"),
            Element::new("d", "Delta", "delta is fine"),
        ],
        success_message: "Great work, {name}!".to_string(),
        hints: HintLadder::new("Look closer.", "Check the letters.", "Alpha and Charlie."),
        variant: None,
    }
}

fn catalog(shape: &[usize]) -> Arc<ScenarioCatalog> {
    let scenarios = shape
        .iter()
        .enumerate()
        .map(|(i, &phases)| Scenario {
            id: ScenarioId(i as u32 + 1),
            title: format!("Case {}", i + 1),
            setting: "test".to_string(),
            description: String::new(),
            icon: String::new(),
            difficulty: 1,
            phases: (0..phases).map(|p| abc_phase(&format!("phase-{p}"))).collect(),
        })
        .collect();
    Arc::new(ScenarioCatalog::new(scenarios).expect("valid catalog"))
}

fn session(shape: &[usize]) -> GameSession {
    GameSession::new(catalog(shape), ScenarioSelection::All, TimingConfig::default())
        .expect("session")
}

fn tap(s: &mut GameSession, id: &str) -> bool {
    s.on_element_tap(&ElementId::new(id))
}

fn enter_touch(s: &mut GameSession) {
    assert!(s.on_story_complete());
    assert!(s.on_speak_complete());
}

/// Find every target of the current phase and let the celebration fire.
fn solve_current_phase(s: &mut GameSession) {
    enter_touch(s);
    let targets: Vec<ElementId> = s
        .current_phase()
        .expect("phase")
        .targets()
        .map(|e| e.id.clone())
        .collect();
    for id in &targets {
        assert!(s.on_element_tap(id));
    }
    s.flush_timers();
    assert_eq!(s.state().game_phase, GamePhase::Celebrate);
}

// ---------------------------------------------------------------------------
// Walkthroughs
// ---------------------------------------------------------------------------

#[test]
fn targets_a_and_c_with_wrong_b() {
    let mut s = session(&[2, 1]);
    enter_touch(&mut s);

    assert!(tap(&mut s, "b"));
    assert_eq!(s.state().wrong_attempts, 1);
    assert_eq!(s.hint_tier().level(), 1);
    assert!(s.state().incorrect_taps.contains_key(&ElementId::new("b")));
    s.advance_time(ms(600));
    assert!(s.state().incorrect_taps.is_empty());

    assert!(tap(&mut s, "a"));
    assert_eq!(s.state().found_targets.len(), 1);
    assert_eq!(s.state().stats.targets_found, 1);

    assert!(tap(&mut s, "c"));
    s.advance_time(ms(800));
    assert_eq!(s.state().game_phase, GamePhase::Celebrate);

    // More phases remain in the first scenario.
    assert!(s.on_celebration_complete());
    let state = s.state();
    assert_eq!(state.game_phase, GamePhase::Story);
    assert_eq!((state.scenario_index, state.phase_index), (0, 1));
    assert!(state.found_targets.is_empty());
    assert!(state.incorrect_taps.is_empty());
    assert_eq!(state.wrong_attempts, 0);
    assert_eq!(state.hint_tier.level(), 0);
    assert_eq!(state.stats.scenarios_completed, 0);

    // Last phase of the first scenario: next scenario via transition.
    solve_current_phase(&mut s);
    assert!(s.on_celebration_complete());
    assert_eq!(s.state().game_phase, GamePhase::Transition);
    assert_eq!(s.state().stats.scenarios_completed, 1);
    assert!(s.on_transition_complete());
    assert_eq!(s.state().game_phase, GamePhase::Story);
    assert_eq!((s.state().scenario_index, s.state().phase_index), (1, 0));

    // Nothing left after the second scenario.
    solve_current_phase(&mut s);
    assert!(s.on_celebration_complete());
    assert!(s.state().is_complete);
    assert_eq!(s.state().stats.scenarios_completed, 2);
    assert_eq!(s.state().stats.targets_found, 6);
}

#[test]
fn three_wrong_taps_auto_highlight_an_unfound_target() {
    let mut s = session(&[1]);
    enter_touch(&mut s);
    tap(&mut s, "a");
    tap(&mut s, "b");
    tap(&mut s, "d");
    tap(&mut s, "b");
    assert_eq!(s.hint_tier().level(), 3);
    assert_eq!(s.state().highlighted, Some(ElementId::new("a")));

    s.advance_time(ms(500));
    let highlighted = s.state().highlighted.clone().expect("auto-highlight");
    assert_eq!(highlighted, ElementId::new("c"));
    assert!(!s.state().found_targets.contains(&highlighted));
    assert!(
        s.drain_events()
            .contains(&SessionEvent::AutoHighlighted { element: ElementId::new("c") })
    );
}

#[test]
fn overlapping_flashes_expire_independently() {
    let mut s = session(&[1]);
    enter_touch(&mut s);
    tap(&mut s, "b");
    s.advance_time(ms(300));
    tap(&mut s, "d");

    s.advance_time(ms(300));
    assert!(!s.state().incorrect_taps.contains_key(&ElementId::new("b")));
    assert!(s.state().incorrect_taps.contains_key(&ElementId::new("d")));

    s.advance_time(ms(300));
    assert!(s.state().incorrect_taps.is_empty());
}

#[test]
fn stale_timers_never_touch_the_next_phase() {
    let timing = TimingConfig {
        incorrect_flash_ms: 5_000,
        ..TimingConfig::default()
    };
    let mut s = GameSession::new(catalog(&[2]), ScenarioSelection::All, timing).expect("session");
    enter_touch(&mut s);
    tap(&mut s, "b");
    tap(&mut s, "a");
    tap(&mut s, "c");
    s.advance_time(ms(800));
    assert_eq!(s.state().game_phase, GamePhase::Celebrate);
    // The flash of "b" outlives the phase.
    assert_eq!(s.pending_timers(), 1);

    assert!(s.on_celebration_complete());
    assert_eq!(s.pending_timers(), 0);

    enter_touch(&mut s);
    tap(&mut s, "d");
    s.advance_time(ms(4_999));
    assert!(s.state().incorrect_taps.contains_key(&ElementId::new("d")));
    assert_eq!(s.state().game_phase, GamePhase::Touch);
}

#[test]
fn reset_cancels_pending_celebration() {
    let mut s = session(&[1]);
    enter_touch(&mut s);
    tap(&mut s, "a");
    tap(&mut s, "c");
    let epoch = s.epoch();
    s.reset_game();
    assert!(s.epoch() > epoch);
    assert_eq!(s.pending_timers(), 0);

    s.advance_time(ms(5_000));
    assert_eq!(s.state().game_phase, GamePhase::Story);
    assert_eq!(s.state().stats.targets_found, 0);
    assert_eq!(s.snapshot().phase_id, Some(PhaseId::from("phase-0")));
}

#[test]
fn completed_session_ignores_everything_but_reset() {
    let mut s = session(&[1]);
    solve_current_phase(&mut s);
    s.on_celebration_complete();
    assert!(s.state().is_complete);
    let before = s.state().clone();

    assert!(!tap(&mut s, "a"));
    assert!(!s.use_hint());
    assert!(!s.on_story_complete());
    assert!(!s.on_celebration_complete());
    assert!(!s.on_transition_complete());
    assert!(!s.submit_answer(AnswerVerdict::Correct));
    assert_eq!(s.advance_time(ms(10_000)), 0);
    assert_eq!(s.state(), &before);

    let completions = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::SessionCompleted(_)))
        .count();
    assert_eq!(completions, 1);

    s.reset_game();
    assert!(!s.state().is_complete);
    assert!(s.summary().is_none());
}

// ---------------------------------------------------------------------------
// Built-in content
// ---------------------------------------------------------------------------

#[test]
fn full_builtin_run_earns_three_stars() {
    let catalog = Arc::new(ScenarioCatalog::builtin(7).expect("builtin"));
    let scenario_count = catalog.len();
    let mut s = GameSession::new(catalog, ScenarioSelection::All, TimingConfig::default())
        .expect("session");

    let mut guard = 0;
    while !s.state().is_complete {
        guard += 1;
        assert!(guard < 100, "run did not terminate");
        if s.state().game_phase == GamePhase::Transition {
            assert!(s.on_transition_complete());
        }
        solve_current_phase(&mut s);
        assert!(s.on_celebration_complete());
    }

    let summary = s.summary().expect("summary");
    assert_eq!(summary.stats.scenarios_completed as usize, scenario_count);
    assert_eq!(summary.stars, StarRating::Three);
    assert!(summary.is_perfect());

    let store = InMemoryProfileStore::new();
    let id = ProfileId::new();
    record_session(&store, id, "Ada", summary).expect("record");
    let profile = store.load(id).expect("load").expect("saved");
    assert_eq!(profile.total_targets_found, summary.stats.targets_found);
}

#[test]
fn single_builtin_scenario_with_hints_earns_two_stars() {
    let config = MindsetConfig::from_toml("[session]\nscenario = 4\n").expect("config");
    let catalog = Arc::new(ScenarioCatalog::builtin(1).expect("builtin"));
    let mut s = GameSession::from_config(catalog, &config).expect("session");
    assert_eq!(s.active_len(), 1);

    enter_touch(&mut s);
    for _ in 0..2 {
        assert!(s.use_hint());
        assert!(s.dismiss_hint());
    }
    let targets: Vec<ElementId> = s
        .current_phase()
        .expect("phase")
        .targets()
        .map(|e| e.id.clone())
        .collect();
    for id in &targets {
        s.on_element_tap(id);
    }
    s.flush_timers();
    assert!(s.on_celebration_complete());
    assert_eq!(s.summary().map(|sum| sum.stars), Some(StarRating::Two));
}

#[test]
fn seeded_builds_are_reproducible() {
    let a = ScenarioCatalog::builtin(42).expect("builtin");
    let b = ScenarioCatalog::builtin(42).expect("builtin");
    assert_eq!(a, b);
}

#[test]
fn speak_phase_with_keyword_judge_and_host_pacing() {
    let mut s = session(&[1]);
    let timing = s.timing().clone();
    let cue = host_cue(s.state(), s.current_phase().expect("phase"), &timing).expect("story cue");
    assert!(cue.cue.apply(&mut s));
    assert_eq!(s.state().game_phase, GamePhase::Speak);

    let judge = KeywordJudge::default();
    let phase = s.current_phase().expect("phase").clone();
    s.submit_answer(judge.judge("the bravo one", &phase));
    assert_eq!(s.state().game_phase, GamePhase::Speak);
    s.submit_answer(judge.judge("charlie is wrong", &phase));
    assert_eq!(s.state().game_phase, GamePhase::Touch);
    assert!(host_cue(s.state(), &phase, &timing).is_none());
}
