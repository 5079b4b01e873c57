//! The game session controller.
//!
//! [`GameSession`] owns every piece of mutable state for one run through
//! the active scenarios. The presentation layer reads [`SessionState`] (or
//! an owned [`SessionSnapshot`]) and calls one method per player or timer
//! event; it never mutates state itself.
//!
//! ## Phase cycle
//!
//! | From        | Event                        | To                          |
//! |-------------|------------------------------|-----------------------------|
//! | `story`     | [`GameSession::on_story_complete`]   | `speak`              |
//! | `speak`     | [`GameSession::on_speak_complete`] / correct answer / budget spent | `touch` |
//! | `touch`     | tap, found target or wrong tap | `touch`                   |
//! | `touch`     | last target found (+800ms)   | `celebrate`                 |
//! | `touch`     | [`GameSession::use_hint`]    | `hint`                      |
//! | `hint`      | [`GameSession::dismiss_hint`] | `touch`                    |
//! | `celebrate` | [`GameSession::on_celebration_complete`] | `story`, `transition` or complete |
//! | `transition`| [`GameSession::on_transition_complete`] | `story`          |
//!
//! Every event arriving in a state that does not accept it is a no-op, as
//! is every event after the run is complete (except [`GameSession::reset_game`]).
//!
//! ## Timers
//!
//! The three delayed mutations are deferred actions on the session's own
//! logical clock (see [`crate::timer`]). The epoch moves on whenever the
//! phase changes, so nothing scheduled for one phase can land in the next.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Phase, Scenario, ScenarioCatalog};
use crate::config::{MindsetConfig, TimingConfig};
use crate::error::{MindsetError, Result};
use crate::hint::{self, HintTier, FALLBACK_HINT};
use crate::judge::AnswerVerdict;
use crate::scoring::SessionSummary;
use crate::timer::{Epoch, Fired, Scheduler, TimerId};
use crate::types::{ElementId, GamePhase, PhaseId, ScenarioId, SessionStats};

// ---------------------------------------------------------------------------
// Construction inputs
// ---------------------------------------------------------------------------

/// Which scenarios of the catalog a session runs. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSelection {
    /// Every scenario, in catalog order.
    #[default]
    All,
    /// Only the scenario at this catalog index.
    Single(usize),
}

impl From<Option<usize>> for ScenarioSelection {
    fn from(index: Option<usize>) -> Self {
        index.map_or(Self::All, Self::Single)
    }
}

fn resolve_active(catalog: &ScenarioCatalog, selection: ScenarioSelection) -> Result<Vec<usize>> {
    if catalog.is_empty() {
        return Err(MindsetError::EmptyCatalog);
    }
    match selection {
        ScenarioSelection::All => Ok((0..catalog.len()).collect()),
        ScenarioSelection::Single(index) if index < catalog.len() => Ok(vec![index]),
        ScenarioSelection::Single(index) => Err(MindsetError::ScenarioOutOfRange {
            index,
            len: catalog.len(),
        }),
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// All mutable state of one run. Only [`GameSession`] writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Cursor into the active scenario list.
    pub scenario_index: usize,
    /// Cursor into the current scenario's phases.
    pub phase_index: usize,
    /// Position in the phase cycle.
    pub game_phase: GamePhase,
    /// Targets found in the current phase.
    pub found_targets: BTreeSet<ElementId>,
    /// Non-targets currently flashing, each tagged with its expiry timer.
    pub incorrect_taps: BTreeMap<ElementId, TimerId>,
    /// Element currently highlighted, if any.
    pub highlighted: Option<ElementId>,
    /// Hint escalation level for the current phase.
    pub hint_tier: HintTier,
    /// Wrong taps in the current phase.
    pub wrong_attempts: u32,
    /// Answers submitted in the current speak phase.
    pub speak_attempts: u32,
    /// Target taps in a row without a miss or hint.
    pub consecutive_successes: u32,
    /// Misses and hint requests in a row without a find.
    pub consecutive_hints: u32,
    /// Latest companion reply from the voice collaborator (display only).
    pub companion_reply: Option<String>,
    /// Latest collaborator failure message (display only).
    pub collaborator_error: Option<String>,
    /// Run-wide counters.
    pub stats: SessionStats,
    /// Set once the last phase of the last active scenario is done.
    pub is_complete: bool,
}

impl SessionState {
    /// Ids currently flashing as wrong.
    pub fn incorrect_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.incorrect_taps.keys()
    }
}

/// Owned, serializable view handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Copy of the session state.
    pub state: SessionState,
    /// Current scenario id.
    pub scenario_id: Option<ScenarioId>,
    /// Current scenario title.
    pub scenario_title: Option<String>,
    /// Current phase id.
    pub phase_id: Option<PhaseId>,
    /// 1-based phase number within the scenario. Equals `phase_count` once
    /// the run is complete, since only the last phase can finish it.
    pub phase_number: usize,
    /// Phases in the current scenario.
    pub phase_count: usize,
    /// Hint text for the current tier.
    pub hint_text: String,
    /// Epoch the snapshot was taken in.
    pub epoch: Epoch,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Something that happened in the session, for observers and the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The cursors moved to a new phase.
    PhaseStarted {
        /// Scenario of the new phase.
        scenario: ScenarioId,
        /// The new phase.
        phase: PhaseId,
    },
    /// An answer was submitted in the speak phase.
    AnswerJudged {
        /// The collaborator's verdict.
        verdict: AnswerVerdict,
        /// Answers submitted so far in this phase.
        attempts: u32,
    },
    /// A target was found.
    TargetFound {
        /// The target.
        element: ElementId,
        /// Targets still hidden in this phase.
        remaining: usize,
    },
    /// A non-target was tapped.
    WrongTap {
        /// The tapped element.
        element: ElementId,
        /// Hint tier after escalation.
        tier: HintTier,
    },
    /// The hint overlay was opened.
    HintShown {
        /// Tier after escalation.
        tier: HintTier,
    },
    /// An unfound target was highlighted as an errorless-learning aid.
    AutoHighlighted {
        /// The highlighted target.
        element: ElementId,
    },
    /// The last target of the phase was found.
    PhaseSolved {
        /// The solved phase.
        phase: PhaseId,
    },
    /// The session entered `celebrate`.
    CelebrationStarted {
        /// The solved phase.
        phase: PhaseId,
    },
    /// Every phase of a scenario was solved.
    ScenarioCompleted {
        /// The scenario.
        scenario: ScenarioId,
    },
    /// The run is over. Emitted once per run.
    SessionCompleted(SessionSummary),
    /// The session was reset to its initial state.
    SessionReset,
}

/// Delayed mutations owned by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Move from `touch`/`hint` to `celebrate` after the last find settles.
    EnterCelebrate,
    /// Highlight an unfound target (tier-3 aid after a wrong tap).
    AutoHighlight,
    /// Stop flashing a wrong tap.
    ExpireIncorrect(ElementId),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Finite-state machine for one run through the active scenarios.
#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: Arc<ScenarioCatalog>,
    selection: ScenarioSelection,
    active: Vec<usize>,
    timing: TimingConfig,
    speak_budget: u32,
    state: SessionState,
    scheduler: Scheduler<DeferredAction>,
    celebration_scheduled: bool,
    auto_highlight: Option<TimerId>,
    wrong_attempts_total: u32,
    summary: Option<SessionSummary>,
    outbox: Vec<SessionEvent>,
}

impl GameSession {
    /// Answers accepted in the speak phase when no budget is configured.
    pub const DEFAULT_SPEAK_BUDGET: u32 = 3;

    /// Start a run over `catalog`.
    ///
    /// # Errors
    /// Returns [`MindsetError::EmptyCatalog`] for an empty catalog and
    /// [`MindsetError::ScenarioOutOfRange`] for a bad single selection.
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        selection: ScenarioSelection,
        timing: TimingConfig,
    ) -> Result<Self> {
        let active = resolve_active(&catalog, selection)?;
        let mut session = Self {
            catalog,
            selection,
            active,
            timing,
            speak_budget: Self::DEFAULT_SPEAK_BUDGET,
            state: SessionState::default(),
            scheduler: Scheduler::new(),
            celebration_scheduled: false,
            auto_highlight: None,
            wrong_attempts_total: 0,
            summary: None,
            outbox: Vec::new(),
        };
        session.announce_phase();
        info!(
            scenarios = session.active.len(),
            selection = ?selection,
            "Game session started"
        );
        Ok(session)
    }

    /// Start a run using the selection, timing and speak budget from `config`.
    ///
    /// # Errors
    /// Same as [`GameSession::new`].
    pub fn from_config(catalog: Arc<ScenarioCatalog>, config: &MindsetConfig) -> Result<Self> {
        Ok(Self::new(catalog, config.session.scenario.into(), config.timing.clone())?
            .with_speak_budget(config.session.speak_submission_budget))
    }

    /// Override how many answers the speak phase accepts before moving on.
    #[must_use]
    pub fn with_speak_budget(mut self, budget: u32) -> Self {
        self.speak_budget = budget.max(1);
        self
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The catalog this session runs over.
    #[must_use]
    pub fn catalog(&self) -> &Arc<ScenarioCatalog> {
        &self.catalog
    }

    /// The fixed scenario selection.
    #[must_use]
    pub fn selection(&self) -> ScenarioSelection {
        self.selection
    }

    /// Timing in use.
    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Number of scenarios in this run.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Scenario under the cursor.
    #[must_use]
    pub fn current_scenario(&self) -> Option<&Scenario> {
        scenario_at(&self.catalog, &self.active, &self.state)
    }

    /// Phase under the cursor.
    #[must_use]
    pub fn current_phase(&self) -> Option<&Phase> {
        phase_at(&self.catalog, &self.active, &self.state)
    }

    /// Current hint tier.
    #[must_use]
    pub fn hint_tier(&self) -> HintTier {
        self.state.hint_tier
    }

    /// Hint text for the current tier. Pure; safe to call on every render.
    #[must_use]
    pub fn hint_text(&self) -> &str {
        self.current_phase()
            .map_or(FALLBACK_HINT, |p| hint::select_hint(&p.hints, self.state.hint_tier))
    }

    /// Current epoch.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.scheduler.epoch()
    }

    /// Logical time since the session was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Time until the next deferred action is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Deferred actions still waiting.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Run summary, available once the session is complete.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Owned view for observers.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let scenario = self.current_scenario();
        SessionSnapshot {
            state: self.state.clone(),
            scenario_id: scenario.map(|s| s.id),
            scenario_title: scenario.map(|s| s.title.clone()),
            phase_id: self.current_phase().map(|p| p.id.clone()),
            phase_number: self.state.phase_index + 1,
            phase_count: scenario.map_or(0, |s| s.phases.len()),
            hint_text: self.hint_text().to_string(),
            epoch: self.epoch(),
        }
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Phase advances
    // ------------------------------------------------------------------

    /// Narration finished: `story → speak`. Returns whether it applied.
    pub fn on_story_complete(&mut self) -> bool {
        self.advance_from(GamePhase::Story, GamePhase::Speak)
    }

    /// Speak phase skipped or finished: `speak → touch`. Returns whether it applied.
    pub fn on_speak_complete(&mut self) -> bool {
        self.advance_from(GamePhase::Speak, GamePhase::Touch)
    }

    /// Interlude over: `transition → story`. Returns whether it applied.
    pub fn on_transition_complete(&mut self) -> bool {
        self.advance_from(GamePhase::Transition, GamePhase::Story)
    }

    /// Record a judged answer. Moves to `touch` when the answer is correct
    /// or the submission budget is spent. Returns whether it applied.
    pub fn submit_answer(&mut self, verdict: AnswerVerdict) -> bool {
        if !self.accepts(GamePhase::Speak) {
            return false;
        }
        self.state.speak_attempts += 1;
        let attempts = self.state.speak_attempts;
        self.outbox.push(SessionEvent::AnswerJudged { verdict, attempts });
        debug!(?verdict, attempts, budget = self.speak_budget, "Answer judged");

        if verdict.is_correct() || attempts >= self.speak_budget {
            self.state.game_phase = GamePhase::Touch;
        }
        true
    }

    // ------------------------------------------------------------------
    // Touch phase
    // ------------------------------------------------------------------

    /// Handle a tap on `element`. Returns whether it changed anything.
    ///
    /// Unknown ids (stale callbacks), already-found targets, taps outside
    /// `touch` and taps after the phase is solved are ignored.
    pub fn on_element_tap(&mut self, element: &ElementId) -> bool {
        if !self.accepts(GamePhase::Touch) || self.celebration_scheduled {
            return false;
        }
        let catalog = Arc::clone(&self.catalog);
        let Some(phase) = phase_at(&catalog, &self.active, &self.state) else {
            return false;
        };
        let Some(tapped) = phase.element(element) else {
            debug!(element = %element, phase = %phase.id, "Ignoring tap on unknown element");
            return false;
        };

        if tapped.is_target {
            self.on_target_tap(phase, element)
        } else {
            self.on_wrong_tap(phase, element);
            true
        }
    }

    fn on_target_tap(&mut self, phase: &Phase, element: &ElementId) -> bool {
        if !self.state.found_targets.insert(element.clone()) {
            return false;
        }
        self.state.stats.targets_found += 1;
        self.state.highlighted = Some(element.clone());
        self.state.consecutive_successes += 1;
        self.state.consecutive_hints = 0;

        let remaining = phase
            .targets()
            .filter(|t| !self.state.found_targets.contains(&t.id))
            .count();
        debug!(element = %element, remaining, "Target found");
        self.outbox.push(SessionEvent::TargetFound {
            element: element.clone(),
            remaining,
        });

        if phase.is_solved_by(&self.state.found_targets) {
            self.celebration_scheduled = true;
            if let Some(id) = self.auto_highlight.take() {
                self.scheduler.cancel(id);
            }
            self.scheduler
                .schedule(self.timing.celebrate_delay(), DeferredAction::EnterCelebrate);
            self.outbox.push(SessionEvent::PhaseSolved {
                phase: phase.id.clone(),
            });
            info!(phase = %phase.id, "Phase solved");
        }
        true
    }

    fn on_wrong_tap(&mut self, phase: &Phase, element: &ElementId) {
        let expiry = self.scheduler.schedule(
            self.timing.incorrect_flash(),
            DeferredAction::ExpireIncorrect(element.clone()),
        );
        if let Some(previous) = self.state.incorrect_taps.insert(element.clone(), expiry) {
            self.scheduler.cancel(previous);
        }

        self.state.wrong_attempts += 1;
        self.wrong_attempts_total += 1;
        self.state.hint_tier = self.state.hint_tier.escalated();
        self.state.consecutive_successes = 0;
        self.state.consecutive_hints += 1;

        let tier = self.state.hint_tier;
        debug!(element = %element, tier = %tier, wrong_attempts = self.state.wrong_attempts, "Wrong tap");
        self.outbox.push(SessionEvent::WrongTap {
            element: element.clone(),
            tier,
        });

        if tier.is_max() && phase.first_unfound_target(&self.state.found_targets).is_some() {
            let id = self
                .scheduler
                .schedule(self.timing.auto_highlight_delay(), DeferredAction::AutoHighlight);
            if let Some(previous) = self.auto_highlight.replace(id) {
                self.scheduler.cancel(previous);
            }
        }
    }

    /// Open the hint overlay: `touch → hint`. Returns whether it applied.
    pub fn use_hint(&mut self) -> bool {
        if !self.accepts(GamePhase::Touch) || self.celebration_scheduled {
            return false;
        }
        self.state.hint_tier = self.state.hint_tier.escalated();
        self.state.stats.hints_used += 1;
        self.state.consecutive_hints += 1;
        self.state.consecutive_successes = 0;
        self.state.game_phase = GamePhase::Hint;

        let tier = self.state.hint_tier;
        debug!(tier = %tier, hints_used = self.state.stats.hints_used, "Hint shown");
        self.outbox.push(SessionEvent::HintShown { tier });
        true
    }

    /// Close the hint overlay: `hint → touch`. At tier 3 an unfound target
    /// is highlighted. Returns whether it applied.
    pub fn dismiss_hint(&mut self) -> bool {
        if !self.accepts(GamePhase::Hint) {
            return false;
        }
        self.state.game_phase = GamePhase::Touch;
        if self.state.hint_tier.is_max() {
            self.highlight_unfound_target();
        }
        true
    }

    // ------------------------------------------------------------------
    // Celebration and progression
    // ------------------------------------------------------------------

    /// Celebration finished: move to the next phase, the next scenario, or
    /// finish the run. Returns whether it applied.
    pub fn on_celebration_complete(&mut self) -> bool {
        if !self.accepts(GamePhase::Celebrate) {
            return false;
        }
        let scenario_len = self.current_scenario().map_or(0, |s| s.phases.len());
        self.clear_phase_state();

        if self.state.phase_index + 1 < scenario_len {
            self.state.phase_index += 1;
            self.state.game_phase = GamePhase::Story;
            self.announce_phase();
            return true;
        }

        self.state.stats.scenarios_completed += 1;
        if let Some(scenario) = self.current_scenario() {
            let scenario = scenario.id;
            info!(scenario = %scenario, "Scenario completed");
            self.outbox.push(SessionEvent::ScenarioCompleted { scenario });
        }

        if self.state.scenario_index + 1 < self.active.len() {
            self.state.scenario_index += 1;
            self.state.phase_index = 0;
            self.state.game_phase = GamePhase::Transition;
            self.announce_phase();
        } else {
            self.finish();
        }
        true
    }

    fn finish(&mut self) {
        self.state.is_complete = true;
        self.scheduler.clear();
        let summary = SessionSummary::new(
            self.state.stats,
            self.wrong_attempts_total,
            self.active.len(),
        );
        info!(
            scenarios_completed = summary.stats.scenarios_completed,
            targets_found = summary.stats.targets_found,
            hints_used = summary.stats.hints_used,
            stars = summary.stars.stars(),
            "Game session complete"
        );
        self.outbox.push(SessionEvent::SessionCompleted(summary.clone()));
        self.summary = Some(summary);
    }

    /// Return to the initial state, cancelling every pending timer.
    pub fn reset_game(&mut self) {
        // `active` was resolved from the immutable catalog and the fixed
        // selection at construction; re-deriving it yields the same list.
        self.state = SessionState::default();
        self.scheduler.clear();
        self.scheduler.bump_epoch();
        self.celebration_scheduled = false;
        self.auto_highlight = None;
        self.wrong_attempts_total = 0;
        self.summary = None;
        self.outbox.push(SessionEvent::SessionReset);
        self.announce_phase();
        info!("Game session reset");
    }

    // ------------------------------------------------------------------
    // Collaborator pass-through
    // ------------------------------------------------------------------

    /// Store the companion's latest reply for display.
    pub fn set_companion_reply(&mut self, reply: impl Into<String>) {
        if !self.state.is_complete {
            self.state.companion_reply = Some(reply.into());
        }
    }

    /// Store a collaborator failure message for display. Never acted upon.
    pub fn report_collaborator_error(&mut self, message: impl Into<String>) {
        if !self.state.is_complete {
            self.state.collaborator_error = Some(message.into());
        }
    }

    /// Clear the displayed collaborator failure.
    pub fn clear_collaborator_error(&mut self) {
        self.state.collaborator_error = None;
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    /// Advance the logical clock by `elapsed`, applying every deferred
    /// action that falls due. Returns how many were applied.
    pub fn advance_time(&mut self, elapsed: Duration) -> usize {
        let until = self.scheduler.now().saturating_add(elapsed);
        let mut applied = 0;
        while let Some(fired) = self.scheduler.pop_due(until) {
            if self.apply_deferred(fired) {
                applied += 1;
            }
        }
        applied
    }

    /// Advance exactly far enough to fire every pending action.
    pub fn flush_timers(&mut self) -> usize {
        let mut applied = 0;
        while let Some(wait) = self.scheduler.next_deadline() {
            applied += self.advance_time(wait);
        }
        applied
    }

    fn apply_deferred(&mut self, fired: Fired<DeferredAction>) -> bool {
        if self.state.is_complete {
            return false;
        }
        match fired.action {
            DeferredAction::EnterCelebrate => {
                if !matches!(self.state.game_phase, GamePhase::Touch | GamePhase::Hint) {
                    return false;
                }
                self.state.game_phase = GamePhase::Celebrate;
                if let Some(phase) = self.current_phase() {
                    let phase = phase.id.clone();
                    info!(phase = %phase, "Celebration started");
                    self.outbox.push(SessionEvent::CelebrationStarted { phase });
                }
                true
            }
            DeferredAction::AutoHighlight => {
                if self.auto_highlight != Some(fired.id) {
                    return false;
                }
                self.auto_highlight = None;
                self.highlight_unfound_target()
            }
            DeferredAction::ExpireIncorrect(element) => {
                if self.state.incorrect_taps.get(&element) != Some(&fired.id) {
                    return false;
                }
                self.state.incorrect_taps.remove(&element);
                true
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn accepts(&self, phase: GamePhase) -> bool {
        !self.state.is_complete && self.state.game_phase == phase
    }

    fn advance_from(&mut self, from: GamePhase, to: GamePhase) -> bool {
        if !self.accepts(from) {
            return false;
        }
        self.state.game_phase = to;
        debug!(from = %from, to = %to, "Game phase advanced");
        true
    }

    fn highlight_unfound_target(&mut self) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let Some(target) = phase_at(&catalog, &self.active, &self.state)
            .and_then(|p| p.first_unfound_target(&self.state.found_targets))
        else {
            return false;
        };
        self.state.highlighted = Some(target.id.clone());
        debug!(element = %target.id, "Auto-highlighted unfound target");
        self.outbox.push(SessionEvent::AutoHighlighted {
            element: target.id.clone(),
        });
        true
    }

    /// Per-phase fields back to their initial values; stale timers dropped.
    fn clear_phase_state(&mut self) {
        self.state.found_targets.clear();
        self.state.incorrect_taps.clear();
        self.state.highlighted = None;
        self.state.hint_tier = HintTier::NONE;
        self.state.wrong_attempts = 0;
        self.state.speak_attempts = 0;
        self.state.companion_reply = None;
        self.celebration_scheduled = false;
        self.auto_highlight = None;
        self.scheduler.bump_epoch();
    }

    fn announce_phase(&mut self) {
        let Some(scenario) = self.current_scenario() else {
            return;
        };
        let Some(phase) = scenario.phases.get(self.state.phase_index) else {
            return;
        };
        let (scenario, phase) = (scenario.id, phase.id.clone());
        info!(scenario = %scenario, phase = %phase, "Phase started");
        self.outbox.push(SessionEvent::PhaseStarted { scenario, phase });
    }
}

fn scenario_at<'c>(
    catalog: &'c ScenarioCatalog,
    active: &[usize],
    state: &SessionState,
) -> Option<&'c Scenario> {
    active
        .get(state.scenario_index)
        .and_then(|&index| catalog.get(index))
}

fn phase_at<'c>(
    catalog: &'c ScenarioCatalog,
    active: &[usize],
    state: &SessionState,
) -> Option<&'c Phase> {
    scenario_at(catalog, active, state).and_then(|s| s.phases.get(state.phase_index))
}
