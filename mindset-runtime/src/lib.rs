//! # mindset-runtime: Async Host for MINDSET Sessions
//!
//! Wraps a [`mindset_core::GameSession`] in a single tokio task so it can be
//! driven from anywhere: UI callbacks, a voice collaborator, timers.
//!
//! ## Modules
//!
//! - `host`: the actor, its handle and host settings
//! - `commands`: inbound commands and the terminal line parser
//! - `error`: runtime error type

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]

pub mod commands;
pub mod error;
pub mod host;

pub use commands::{PlayerCommand, TerminalInput, parse_terminal_line};
pub use error::RuntimeError;
pub use host::{HostConfig, SessionHandle, SessionHost};
