//! End-of-run scoring.
//!
//! Stars reward independence rather than speed: a run without hint
//! requests earns three stars, a few hints two, anything else one. Wrong
//! taps are never penalised.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionStats;

/// Most hints that still earn two stars.
pub const TWO_STAR_HINT_LIMIT: u32 = 3;

/// One to three stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StarRating {
    /// Finished with plenty of help.
    One,
    /// Finished with a little help.
    Two,
    /// Finished without asking for a hint.
    Three,
}

impl StarRating {
    /// Rating for a run that used `hints_used` hints.
    #[must_use]
    pub fn from_hints_used(hints_used: u32) -> Self {
        match hints_used {
            0 => Self::Three,
            n if n <= TWO_STAR_HINT_LIMIT => Self::Two,
            _ => Self::One,
        }
    }

    /// Number of stars.
    #[must_use]
    pub fn stars(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Title shown on the summary screen.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Three => "Master Detective!",
            Self::Two => "Sharp Investigator!",
            Self::One => "Good Work, Rookie!",
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.stars()
    }
}

impl TryFrom<u8> for StarRating {
    type Error = String;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        match stars {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(format!("star rating {other} out of range 1..=3")),
        }
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "⭐".repeat(usize::from(self.stars())))
    }
}

/// Everything the summary screen and the profile store need about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Final counters.
    pub stats: SessionStats,
    /// Rating derived from `stats.hints_used`.
    pub stars: StarRating,
    /// Wrong taps across the whole run (informational only).
    pub wrong_attempts: u32,
    /// Scenarios that were part of the run.
    pub scenarios_played: usize,
    /// When the last phase was finished.
    pub completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Summarise a finished run.
    #[must_use]
    pub fn new(stats: SessionStats, wrong_attempts: u32, scenarios_played: usize) -> Self {
        Self {
            stats,
            stars: StarRating::from_hints_used(stats.hints_used),
            wrong_attempts,
            scenarios_played,
            completed_at: Utc::now(),
        }
    }

    /// Whether the run needed no hints and no wrong taps.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.stats.hints_used == 0 && self.wrong_attempts == 0
    }
}
