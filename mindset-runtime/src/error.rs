//! Runtime error types.

use thiserror::Error;

use mindset_core::MindsetError;

/// Errors surfaced by the session host.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The host task has stopped; no more commands are accepted.
    #[error("Session host is no longer running")]
    HostClosed,

    /// The host task panicked or was aborted.
    #[error("Session host task failed: {0}")]
    HostFailed(String),

    /// An error from the session engine.
    #[error(transparent)]
    Core(#[from] MindsetError),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, RuntimeError>;
