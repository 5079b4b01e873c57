//! Property-based tests for the game session controller.
//!
//! Random sequences of player and clock events are replayed against a small
//! catalog; the invariants below must hold after every single step.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use mindset_core::catalog::{Element, HintLadder, Phase, Scenario, ScenarioCatalog};
use mindset_core::config::TimingConfig;
use mindset_core::hint::HintTier;
use mindset_core::judge::AnswerVerdict;
use mindset_core::session::{GameSession, ScenarioSelection, SessionEvent};
use mindset_core::types::{ElementId, GamePhase, PhaseId, ScenarioId};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

const IDS: [&str; 5] = ["a", "b", "c", "d", "ghost"];

#[derive(Debug, Clone)]
enum Action {
    Tap(usize),
    Hint,
    Dismiss,
    Story,
    Speak,
    Answer(bool),
    Celebrated,
    Transition,
    Advance(u64),
    Reset,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (0..IDS.len()).prop_map(Action::Tap),
        1 => Just(Action::Hint),
        1 => Just(Action::Dismiss),
        2 => Just(Action::Story),
        2 => Just(Action::Speak),
        1 => any::<bool>().prop_map(Action::Answer),
        2 => Just(Action::Celebrated),
        1 => Just(Action::Transition),
        3 => (0..1_500u64).prop_map(Action::Advance),
        1 => Just(Action::Reset),
    ]
}

fn phase(id: &str) -> Phase {
    Phase {
        id: PhaseId::from(id),
        narrative: "n".to_string(),
        prompt: "p".to_string(),
        elements: vec![
            Element::target("a", "A", ""),
            Element::new("b", "B", ""),
            Element::target("c", "C", ""),
            Element::new("d", "D", ""),
        ],
        success_message: "s".to_string(),
        hints: HintLadder::new("1", "2", "3"),
        variant: None,
    }
}

fn session() -> GameSession {
    let scenarios = (1..=2)
        .map(|i| Scenario {
            id: ScenarioId(i),
            title: format!("S{i}"),
            setting: "test".to_string(),
            description: String::new(),
            icon: String::new(),
            difficulty: 1,
            phases: vec![phase("p0"), phase("p1")],
        })
        .collect();
    let catalog = Arc::new(ScenarioCatalog::new(scenarios).expect("catalog"));
    GameSession::new(catalog, ScenarioSelection::All, TimingConfig::default()).expect("session")
}

fn apply(s: &mut GameSession, action: &Action) {
    match action {
        Action::Tap(i) => {
            s.on_element_tap(&ElementId::new(IDS[*i]));
        }
        Action::Hint => {
            s.use_hint();
        }
        Action::Dismiss => {
            s.dismiss_hint();
        }
        Action::Story => {
            s.on_story_complete();
        }
        Action::Speak => {
            s.on_speak_complete();
        }
        Action::Answer(correct) => {
            s.submit_answer(AnswerVerdict::from(*correct));
        }
        Action::Celebrated => {
            s.on_celebration_complete();
        }
        Action::Transition => {
            s.on_transition_complete();
        }
        Action::Advance(millis) => {
            s.advance_time(Duration::from_millis(*millis));
        }
        Action::Reset => s.reset_game(),
    }
}

// ---------------------------------------------------------------------------
// Property: hint tier stays in range and only drops on a phase change
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn hint_tier_is_clamped_and_monotonic(actions in prop::collection::vec(arb_action(), 0..200)) {
        let mut s = session();
        for action in &actions {
            let before = (s.state().scenario_index, s.state().phase_index, s.hint_tier());
            apply(&mut s, action);
            let tier = s.hint_tier();
            prop_assert!(tier <= HintTier::MAX);
            let same_phase = (s.state().scenario_index, s.state().phase_index) == (before.0, before.1)
                && !matches!(action, Action::Celebrated | Action::Reset);
            if same_phase {
                prop_assert!(tier >= before.2, "tier dropped within a phase: {:?}", action);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: found set is idempotent and matches the counter
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn targets_are_counted_once(taps in prop::collection::vec(0..IDS.len(), 1..60)) {
        let mut s = session();
        s.on_story_complete();
        s.on_speak_complete();
        for i in taps {
            s.on_element_tap(&ElementId::new(IDS[i]));
            let state = s.state();
            prop_assert_eq!(state.stats.targets_found as usize, state.found_targets.len());
            prop_assert!(state.found_targets.len() <= 2);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: celebrate is entered exactly once per solved phase
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn celebrate_fires_once(
        extra_taps in prop::collection::vec(0..IDS.len(), 0..20),
        wait in 0..2_000u64,
    ) {
        let mut s = session();
        s.on_story_complete();
        s.on_speak_complete();
        s.on_element_tap(&ElementId::new("a"));
        s.on_element_tap(&ElementId::new("c"));
        for i in extra_taps {
            s.on_element_tap(&ElementId::new(IDS[i]));
            s.on_element_tap(&ElementId::new("c"));
        }
        s.advance_time(Duration::from_millis(wait));
        s.flush_timers();
        s.advance_time(Duration::from_secs(10));

        let celebrations = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::CelebrationStarted { .. }))
            .count();
        prop_assert_eq!(celebrations, 1);
        prop_assert_eq!(s.state().game_phase, GamePhase::Celebrate);
        prop_assert_eq!(s.state().wrong_attempts, 0);
    }
}

// ---------------------------------------------------------------------------
// Property: per-phase fields are reset at every phase boundary
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn boundary_resets_phase_fields(actions in prop::collection::vec(arb_action(), 0..300)) {
        let mut s = session();
        for action in &actions {
            let was_celebrating = s.state().game_phase == GamePhase::Celebrate;
            apply(&mut s, action);
            let advanced = was_celebrating
                && matches!(action, Action::Celebrated)
                && !s.state().is_complete;
            if advanced {
                let state = s.state();
                prop_assert!(matches!(state.game_phase, GamePhase::Story | GamePhase::Transition));
                prop_assert!(state.found_targets.is_empty());
                prop_assert!(state.incorrect_taps.is_empty());
                prop_assert_eq!(state.wrong_attempts, 0);
                prop_assert_eq!(state.hint_tier, HintTier::NONE);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: a completed session is frozen until reset
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn completed_session_is_stable(actions in prop::collection::vec(arb_action(), 0..100)) {
        let mut s = session();
        while !s.state().is_complete {
            s.on_transition_complete();
            s.on_story_complete();
            s.on_speak_complete();
            s.on_element_tap(&ElementId::new("a"));
            s.on_element_tap(&ElementId::new("c"));
            s.flush_timers();
            s.on_celebration_complete();
        }
        let frozen = s.state().clone();
        s.drain_events();

        for action in actions.iter().filter(|a| !matches!(a, Action::Reset)) {
            apply(&mut s, action);
            prop_assert_eq!(s.state(), &frozen);
        }
        prop_assert!(s.drain_events().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property: same seed, same catalog
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn builtin_catalog_is_deterministic(seed in any::<u64>()) {
        let a = ScenarioCatalog::builtin(seed).expect("builtin");
        let b = ScenarioCatalog::builtin(seed).expect("builtin");
        prop_assert_eq!(a, b);
    }
}
