//! Hint escalation for errorless learning.
//!
//! The player is never allowed to fail indefinitely: every wrong tap and
//! every explicit hint request moves the tier up by one, and at tier 3 the
//! session points at the answer. Both triggers share the same counter.
//!
//! | Tier | Text shown        | Extra aid                        |
//! |------|-------------------|----------------------------------|
//! | 0    | subtle (if asked) | none                             |
//! | 1    | subtle            | none                             |
//! | 2    | stronger          | none                             |
//! | 3    | explicit          | an unfound target is highlighted |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::HintLadder;

/// Text shown when there is no current phase to take a hint from.
pub const FALLBACK_HINT: &str = "Take another look around...";

/// Hint escalation level, always within `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HintTier(u8);

impl HintTier {
    /// No hint given yet.
    pub const NONE: Self = Self(0);
    /// Highest tier: the answer is pointed out.
    pub const MAX: Self = Self(3);

    /// Build a tier, clamping anything above 3.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    /// Numeric level.
    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    /// One tier up, saturating at [`HintTier::MAX`].
    #[must_use]
    pub fn escalated(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Whether the answer should be pointed out.
    #[must_use]
    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl fmt::Display for HintTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<HintTier> for u8 {
    fn from(tier: HintTier) -> Self {
        tier.0
    }
}

impl TryFrom<u8> for HintTier {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > Self::MAX.0 {
            return Err(format!("hint tier {level} out of range 0..=3"));
        }
        Ok(Self(level))
    }
}

/// Pick the ladder text for `tier`: tiers 0 and 1 share the subtle text.
#[must_use]
pub fn select_hint(ladder: &HintLadder, tier: HintTier) -> &str {
    match tier.level() {
        0 | 1 => &ladder.subtle,
        2 => &ladder.stronger,
        _ => &ladder.explicit,
    }
}
