//! Host-owned pacing.
//!
//! Three advances are driven by timers that live outside the session:
//! narration read time, the speak-phase skip and the scenario interlude.
//! [`host_cue`] tells the host which one applies right now and how long to
//! wait; the host re-asks whenever the session's epoch or game phase
//! changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Phase;
use crate::config::TimingConfig;
use crate::session::{GameSession, SessionState};
use crate::types::GamePhase;

/// Advance the host should make once its timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostCue {
    /// Narration read time is over.
    StoryElapsed,
    /// Nobody answered in time.
    SpeakSkipped,
    /// The interlude between scenarios is over.
    TransitionElapsed,
}

impl HostCue {
    /// Apply the cue to `session`. Returns whether it took effect.
    pub fn apply(self, session: &mut GameSession) -> bool {
        match self {
            Self::StoryElapsed => session.on_story_complete(),
            Self::SpeakSkipped => session.on_speak_complete(),
            Self::TransitionElapsed => session.on_transition_complete(),
        }
    }
}

/// A cue and how long after entering the current game phase it is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingCue {
    /// What to do.
    pub cue: HostCue,
    /// When, measured from entering the game phase.
    pub after: Duration,
}

/// The host timer that applies to `state`, if any.
#[must_use]
pub fn host_cue(state: &SessionState, phase: &Phase, timing: &TimingConfig) -> Option<PacingCue> {
    if state.is_complete {
        return None;
    }
    let (cue, after) = match state.game_phase {
        GamePhase::Story => (
            HostCue::StoryElapsed,
            timing.story_read_time(phase.narrative.chars().count()),
        ),
        GamePhase::Speak => (HostCue::SpeakSkipped, timing.speak_skip_timeout()),
        GamePhase::Transition => (HostCue::TransitionElapsed, timing.transition_delay()),
        GamePhase::Touch | GamePhase::Hint | GamePhase::Celebrate => return None,
    };
    Some(PacingCue { cue, after })
}
