//! What the companion says and how it looks.
//!
//! Pure helpers over the session state; the presentation layer and the
//! voice collaborator call these instead of assembling strings themselves.

use crate::catalog::{Phase, Scenario};
use crate::config::DEFAULT_PLAYER_NAME;
use crate::session::SessionState;
use crate::types::{CompanionMood, GamePhase};

const NAME_PLACEHOLDER: &str = "{name}";
const TRANSITION_LINE: &str = "On to the next challenge...";

/// Substitute the player's name into `template`. Blank names fall back to
/// the default detective name.
#[must_use]
pub fn personalize(template: &str, name: &str) -> String {
    let name = match name.trim() {
        "" => DEFAULT_PLAYER_NAME,
        trimmed => trimmed,
    };
    template.replace(NAME_PLACEHOLDER, name)
}

/// The companion's line for the current game phase.
#[must_use]
pub fn companion_line(state: &SessionState, phase: &Phase, name: &str) -> String {
    let reply = state.companion_reply.as_deref();
    match state.game_phase {
        GamePhase::Story => phase.narrative.clone(),
        GamePhase::Speak => reply.unwrap_or(phase.prompt.as_str()).to_string(),
        GamePhase::Touch => reply.map_or_else(
            || personalize("Now show me, tap on what's wrong, {name}!", name),
            str::to_string,
        ),
        GamePhase::Celebrate => personalize(&phase.success_message, name),
        GamePhase::Transition => TRANSITION_LINE.to_string(),
        GamePhase::Hint => phase.prompt.clone(),
    }
}

/// The companion's expression for `phase`.
#[must_use]
pub fn companion_mood(phase: GamePhase) -> CompanionMood {
    match phase {
        GamePhase::Celebrate => CompanionMood::Happy,
        GamePhase::Story => CompanionMood::Thinking,
        _ => CompanionMood::Neutral,
    }
}

/// Context handed to the voice collaborator when it judges an answer.
#[must_use]
pub fn scenario_context(scenario: &Scenario, phase: &Phase) -> String {
    let targets: Vec<&str> = phase.targets().map(|e| e.label.as_str()).collect();
    format!(
        "Scenario: {}. Phase: {}. Prompt: {}. Wrong elements: {}.",
        scenario.title,
        phase.id,
        phase.prompt,
        targets.join(", ")
    )
}
