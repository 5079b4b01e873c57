//! Judging free-text answers in the speak phase.
//!
//! The voice collaborator normally asks an AI model whether the player's
//! answer names the mistake and hands back a verdict. [`KeywordJudge`] is
//! the rule-based fallback used when no model is available: an answer is
//! correct when it mentions a word that singles out a target element.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Element, Phase};

/// Outcome of judging one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerVerdict {
    /// The answer identifies a mistake.
    Correct,
    /// It does not (or could not be judged).
    Incorrect,
}

impl AnswerVerdict {
    /// `true` for [`AnswerVerdict::Correct`].
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl From<bool> for AnswerVerdict {
    fn from(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Anything that can decide whether an answer names a phase's mistake.
pub trait AnswerJudge: Send + Sync {
    /// Judge `answer` against the targets of `phase`.
    fn judge(&self, answer: &str, phase: &Phase) -> AnswerVerdict;

    /// Human-readable name, for logs.
    fn name(&self) -> &str;
}

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "was", "are", "not", "but", "has", "have",
    "from", "its", "one", "there", "here", "what", "wrong", "think", "looks", "look", "should",
    "you", "your", "all", "just", "kit", "slot",
];

/// Rule-based judge matching distinctive keywords of target elements.
#[derive(Debug, Clone)]
pub struct KeywordJudge {
    min_word_len: usize,
}

impl Default for KeywordJudge {
    fn default() -> Self {
        Self { min_word_len: 3 }
    }
}

impl KeywordJudge {
    /// Judge that ignores words shorter than `min_word_len`.
    #[must_use]
    pub fn new(min_word_len: usize) -> Self {
        Self {
            min_word_len: min_word_len.max(1),
        }
    }

    fn words(&self, text: &str) -> BTreeSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= self.min_word_len)
            .map(str::to_lowercase)
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
            .collect()
    }

    fn element_words(&self, element: &Element) -> BTreeSet<String> {
        let mut words = self.words(&strip_parenthesized(&element.label));
        words.extend(self.words(element.id.as_str()));
        if let Some(detail) = &element.detail {
            words.extend(self.words(detail));
        }
        words
    }

    /// Keywords that identify each target, minus anything shared with a
    /// non-target. Falls back to all of a target's words when nothing is
    /// distinctive.
    fn target_keywords(&self, phase: &Phase) -> Vec<BTreeSet<String>> {
        let shared: BTreeSet<String> = phase
            .elements
            .iter()
            .filter(|e| !e.is_target)
            .flat_map(|e| self.element_words(e))
            .collect();

        phase
            .targets()
            .map(|t| {
                let all = self.element_words(t);
                let distinctive: BTreeSet<String> = all.difference(&shared).cloned().collect();
                if distinctive.is_empty() { all } else { distinctive }
            })
            .collect()
    }
}

impl AnswerJudge for KeywordJudge {
    fn judge(&self, answer: &str, phase: &Phase) -> AnswerVerdict {
        let said = self.words(answer);
        if said.is_empty() {
            return AnswerVerdict::Incorrect;
        }
        self.target_keywords(phase)
            .iter()
            .any(|keywords| !keywords.is_disjoint(&said))
            .into()
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Remove `(...)` sections; they describe context rather than the item.
fn strip_parenthesized(label: &str) -> String {
    let mut depth = 0usize;
    label
        .chars()
        .filter(|&c| match c {
            '(' => {
                depth += 1;
                false
            }
            ')' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}
