//! Error types for the MINDSET core library.
//!
//! The session controller itself never fails: stale taps, redundant hint
//! requests and exhausted content are all resolved as no-ops or normal
//! termination. Errors only arise at the edges: catalog validation,
//! configuration parsing and profile persistence.

use thiserror::Error;

/// Top-level error type for all MINDSET operations.
#[derive(Error, Debug)]
pub enum MindsetError {
    /// Authored content violates a catalog invariant.
    #[error("Invalid catalog: {scenario}/{phase}: {reason}")]
    Catalog {
        /// Scenario the problem was found in.
        scenario: String,
        /// Phase the problem was found in (empty for scenario-level problems).
        phase: String,
        /// What is wrong.
        reason: String,
    },

    /// A session was requested over a catalog with no scenarios.
    #[error("Scenario catalog is empty")]
    EmptyCatalog,

    /// A single-scenario session named an index the catalog does not have.
    #[error("Scenario index {index} out of range (catalog has {len} scenarios)")]
    ScenarioOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of scenarios in the catalog.
        len: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The profile store rejected a read or write.
    #[error("Profile store error: {0}")]
    Profile(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MindsetError {
    /// Shorthand for a catalog invariant violation.
    pub(crate) fn catalog(
        scenario: impl Into<String>,
        phase: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Catalog {
            scenario: scenario.into(),
            phase: phase.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MindsetError>;
