//! Core type definitions for the MINDSET session engine.
//!
//! All types are serializable so a presentation layer can receive them
//! as plain data.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Identifier of a tappable element within a phase (e.g. `"spare-battery"`).
///
/// Ids are only unique inside one phase; the same id may appear in several
/// phases (the kitchen's `"kettle"` exists in every kitchen variant).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    /// Create an element id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a phase within a scenario (e.g. `"kit-audit"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseId(pub String);

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhaseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Numeric identifier of a scenario, stable across catalog builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u32);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Game phase
// ---------------------------------------------------------------------------

/// Where the session currently is within a phase cycle.
///
/// ```text
/// story ─► speak ─► touch ◄─► hint
///                     │
///                     ▼
///                 celebrate ─► story (next phase)
///                     │
///                     └──────► transition ─► story (next scenario)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// The companion narrates the situation.
    #[default]
    Story,
    /// The player answers the prompt by voice or text.
    Speak,
    /// The player taps the elements they think are wrong.
    Touch,
    /// A hint overlay is shown.
    Hint,
    /// All targets found; the success animation plays.
    Celebrate,
    /// Short interlude between two scenarios.
    Transition,
}

impl GamePhase {
    /// Short lowercase name, used in logs and snapshots.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Speak => "speak",
            Self::Touch => "touch",
            Self::Hint => "hint",
            Self::Celebrate => "celebrate",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Cumulative counters for one run. Never reset mid-run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Scenarios fully solved.
    pub scenarios_completed: u32,
    /// Target elements found across all phases.
    pub targets_found: u32,
    /// Explicit hint requests.
    pub hints_used: u32,
}

/// The companion's facial expression for the current game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionMood {
    /// Default expression.
    Neutral,
    /// While narrating.
    Thinking,
    /// While celebrating.
    Happy,
}
