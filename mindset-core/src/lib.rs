//! # MINDSET Core Library
//!
//! Session engine for a "spot the mistake" cognitive-training game. A
//! companion narrates a short detective scenario; the player answers by
//! voice or text and then taps the elements of the scene that are wrong.
//!
//! - **Catalog**: scenarios, phases and elements, instantiated from
//!   templates with a seeded choice of error variant ([`catalog`], [`content`])
//! - **Session**: the finite-state machine owning all mutable run state
//!   ([`session::GameSession`])
//! - **Hints**: errorless-learning escalation in three tiers ([`hint`])
//! - **Timers**: epoch-keyed deferred actions on a logical clock ([`timer`])
//! - **Scoring**: star ratings and run summaries ([`scoring`])
//! - **Profiles**: cross-run totals behind a persistence port ([`profile`])
//!
//! ## Phase cycle
//!
//! ```text
//! story ─► speak ─► touch ◄─► hint
//!                     │
//!                     ▼ (all targets found, +800ms)
//!                 celebrate ─► story       next phase
//!                     ├──────► transition  next scenario
//!                     └──────► complete    nothing left
//! ```
//!
//! The engine performs no I/O of its own beyond the optional file-backed
//! profile store and TOML loaders. Narration, speech and rendering are
//! collaborators that call into [`session::GameSession`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod hint;
pub mod judge;
pub mod narration;
pub mod pacing;
pub mod profile;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod types;

pub use catalog::{CatalogTemplate, Element, HintLadder, Phase, Scenario, ScenarioCatalog};
pub use config::MindsetConfig;
pub use error::MindsetError;
pub use hint::HintTier;
pub use judge::{AnswerJudge, AnswerVerdict, KeywordJudge};
pub use profile::{Profile, ProfileId, ProfileStore};
pub use scoring::{SessionSummary, StarRating};
pub use session::{GameSession, ScenarioSelection, SessionEvent, SessionSnapshot, SessionState};
pub use types::*;
