//! Commands accepted by the session host.
//!
//! Every inbound controller event has a command, plus a few that only the
//! host understands: free-text answers (judged by the host's
//! [`mindset_core::AnswerJudge`]) and collaborator display strings.

use mindset_core::judge::AnswerVerdict;
use mindset_core::types::{ElementId, GamePhase};

/// One message for the session host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Narration finished early.
    StoryComplete,
    /// Skip the speak phase.
    SpeakComplete,
    /// Free-text answer; judged by the host.
    SubmitAnswer(String),
    /// Answer already judged by an external collaborator.
    SubmitVerdict(AnswerVerdict),
    /// Tap on an element.
    Tap(ElementId),
    /// Open the hint overlay.
    UseHint,
    /// Close the hint overlay.
    DismissHint,
    /// Celebration animation finished.
    CelebrationComplete,
    /// Interlude finished early.
    TransitionComplete,
    /// Start over.
    Reset,
    /// Companion reply from the voice collaborator.
    CompanionReply(String),
    /// Collaborator failure message, or `None` to clear it.
    CollaboratorError(Option<String>),
    /// Stop the host.
    Shutdown,
}

/// A parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalInput {
    /// Forward to the host.
    Command(PlayerCommand),
    /// Print the current snapshot.
    Status,
    /// Print the command list.
    Help,
    /// Leave the game.
    Quit,
}

/// Command list shown by `help`.
pub const TERMINAL_HELP: &str = "\
commands:
  tap <id>    tap an element
  hint        ask for a hint
  ok          close the hint / continue after a celebration
  say <text>  answer the companion's question
  skip        skip the current narration, question or interlude
  status      show where you are
  reset       start over
  quit        leave";

/// Parse one line typed in the terminal driver. `ok` and `skip` depend on
/// the current game phase. Returns `None` for anything unrecognised.
#[must_use]
pub fn parse_terminal_line(line: &str, phase: GamePhase) -> Option<TerminalInput> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match (word.to_ascii_lowercase().as_str(), rest) {
        ("tap", id) if !id.is_empty() => PlayerCommand::Tap(ElementId::new(id)),
        ("say", text) if !text.is_empty() => PlayerCommand::SubmitAnswer(text.to_string()),
        ("hint", "") => PlayerCommand::UseHint,
        ("ok", "") => match phase {
            GamePhase::Hint => PlayerCommand::DismissHint,
            GamePhase::Celebrate => PlayerCommand::CelebrationComplete,
            _ => return None,
        },
        ("skip", "") => match phase {
            GamePhase::Story => PlayerCommand::StoryComplete,
            GamePhase::Speak => PlayerCommand::SpeakComplete,
            GamePhase::Transition => PlayerCommand::TransitionComplete,
            _ => return None,
        },
        ("reset", "") => PlayerCommand::Reset,
        ("status", "") => return Some(TerminalInput::Status),
        ("help" | "?", "") => return Some(TerminalInput::Help),
        ("quit" | "exit", "") => return Some(TerminalInput::Quit),
        _ => return None,
    };
    Some(TerminalInput::Command(command))
}
