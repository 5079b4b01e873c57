//! Configuration for the MINDSET session engine.
//!
//! Maps directly to `mindset.toml`. Every field has a default, so an empty
//! file (or no file at all) yields the timings the game was tuned with.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level MINDSET configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindsetConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Delays for deferred transitions and host pacing.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Which scenarios to run and how content is instantiated.
    #[serde(default)]
    pub session: SessionConfig,
    /// Player identity and profile storage.
    #[serde(default)]
    pub player: PlayerConfig,
}

impl MindsetConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MindsetError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::MindsetError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: `"text"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Delays, in milliseconds, for every timed transition.
///
/// The first three are owned by the session controller (deferred actions);
/// the rest are owned by the host and only computed by [`crate::pacing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between finding the last target and entering `celebrate`.
    #[serde(default = "default_celebrate_delay_ms")]
    pub celebrate_delay_ms: u64,
    /// Delay before the tier-3 auto-highlight after a wrong tap.
    #[serde(default = "default_auto_highlight_delay_ms")]
    pub auto_highlight_delay_ms: u64,
    /// How long a wrong tap keeps flashing.
    #[serde(default = "default_incorrect_flash_ms")]
    pub incorrect_flash_ms: u64,
    /// Minimum narration time for the story phase.
    #[serde(default = "default_story_min_ms")]
    pub story_min_ms: u64,
    /// Narration time per character of narrative text.
    #[serde(default = "default_story_per_char_ms")]
    pub story_per_char_ms: u64,
    /// Speak phase auto-skips to touch after this long.
    #[serde(default = "default_speak_skip_timeout_ms")]
    pub speak_skip_timeout_ms: u64,
    /// Length of the interlude between scenarios.
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
}

impl TimingConfig {
    /// Celebrate delay as a [`Duration`].
    #[must_use]
    pub fn celebrate_delay(&self) -> Duration {
        Duration::from_millis(self.celebrate_delay_ms)
    }

    /// Auto-highlight delay as a [`Duration`].
    #[must_use]
    pub fn auto_highlight_delay(&self) -> Duration {
        Duration::from_millis(self.auto_highlight_delay_ms)
    }

    /// Incorrect-tap flash duration as a [`Duration`].
    #[must_use]
    pub fn incorrect_flash(&self) -> Duration {
        Duration::from_millis(self.incorrect_flash_ms)
    }

    /// Story read time for a narrative of `chars` characters.
    #[must_use]
    pub fn story_read_time(&self, chars: usize) -> Duration {
        let per_char = self.story_per_char_ms.saturating_mul(chars as u64);
        Duration::from_millis(per_char.max(self.story_min_ms))
    }

    /// Speak skip timeout as a [`Duration`].
    #[must_use]
    pub fn speak_skip_timeout(&self) -> Duration {
        Duration::from_millis(self.speak_skip_timeout_ms)
    }

    /// Transition interlude as a [`Duration`].
    #[must_use]
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            celebrate_delay_ms: 800,
            auto_highlight_delay_ms: 500,
            incorrect_flash_ms: 600,
            story_min_ms: 5_000,
            story_per_char_ms: 60,
            speak_skip_timeout_ms: 15_000,
            transition_delay_ms: 1_500,
        }
    }
}

/// Scenario selection and content instantiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Run only this catalog index. `None` runs the whole catalog.
    #[serde(default)]
    pub scenario: Option<usize>,
    /// Seed for variant selection. `None` draws a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Answers accepted in the speak phase before moving on regardless.
    #[serde(default = "default_speak_budget")]
    pub speak_submission_budget: u32,
    /// Load the catalog from this TOML file instead of the built-in content.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scenario: None,
            seed: None,
            speak_submission_budget: default_speak_budget(),
            catalog_path: None,
        }
    }
}

/// Player identity and profile storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Name used in success messages.
    #[serde(default = "default_player_name")]
    pub name: String,
    /// Directory for the JSON profile store.
    #[serde(default = "default_profile_dir")]
    pub profile_dir: PathBuf,
    /// Existing profile to continue; a new one is created when absent.
    #[serde(default)]
    pub profile_id: Option<uuid::Uuid>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: default_player_name(),
            profile_dir: default_profile_dir(),
            profile_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_celebrate_delay_ms() -> u64 {
    800
}
fn default_auto_highlight_delay_ms() -> u64 {
    500
}
fn default_incorrect_flash_ms() -> u64 {
    600
}
fn default_story_min_ms() -> u64 {
    5_000
}
fn default_story_per_char_ms() -> u64 {
    60
}
fn default_speak_skip_timeout_ms() -> u64 {
    15_000
}
fn default_transition_delay_ms() -> u64 {
    1_500
}
fn default_speak_budget() -> u32 {
    3
}

/// Fallback player name when none is configured.
pub const DEFAULT_PLAYER_NAME: &str = "Detective";

fn default_player_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}
fn default_profile_dir() -> PathBuf {
    PathBuf::from("profiles")
}
