//! Classification of `|error|` lines
//!
//! The simulator reports a rejected choice as free text with a bracketed tag,
//! e.g. `[Unavailable choice] Can't switch: The active Pokémon is trapped`.
//! The tag gives the category, the sentence prefix gives the subtype.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceErrorCategory {
    /// `[Invalid choice]`: the choice can never be legal in this state
    InvalidChoice,
    /// `[Unavailable choice]`: legal in general, blocked right now
    UnavailableChoice,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceErrorKind {
    Trapped,
    WrongRequestState,
    ChoiceOverflow,
    InvalidMove,
    InvalidSwitch,
    InvalidTeam,
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceError {
    pub category: ChoiceErrorCategory,
    pub kind: ChoiceErrorKind,
    /// Message text without the bracketed tag
    pub message: String,
}

impl ChoiceError {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (category, message) = if let Some(rest) = text.strip_prefix("[Invalid choice]") {
            (ChoiceErrorCategory::InvalidChoice, rest.trim_start())
        } else if let Some(rest) = text.strip_prefix("[Unavailable choice]") {
            (ChoiceErrorCategory::UnavailableChoice, rest.trim_start())
        } else {
            (ChoiceErrorCategory::Other, text)
        };

        ChoiceError {
            category,
            kind: classify(message),
            message: message.to_string(),
        }
    }
}

fn classify(message: &str) -> ChoiceErrorKind {
    // Order matters: "Can't switch: ... trapped" is a switch error, but trapped wins.
    if message.contains("trapped") {
        ChoiceErrorKind::Trapped
    } else if message.contains("more choices than") {
        ChoiceErrorKind::ChoiceOverflow
    } else if message.starts_with("There's nothing to choose")
        || message.starts_with("Can't do anything")
        || message.starts_with("Can't undo")
        || message.contains("You need a")
        || message.contains("not your turn")
    {
        ChoiceErrorKind::WrongRequestState
    } else if message.contains("Team Preview") || message.starts_with("Can't choose for Team") {
        ChoiceErrorKind::InvalidTeam
    } else if message.starts_with("Can't move") {
        ChoiceErrorKind::InvalidMove
    } else if message.starts_with("Can't switch") {
        ChoiceErrorKind::InvalidSwitch
    } else {
        ChoiceErrorKind::Unclassified
    }
}

impl fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}: {}", self.category, self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trapped_switch() {
        let err = ChoiceError::parse("[Unavailable choice] Can't switch: The active Pokémon is trapped");
        assert_eq!(err.category, ChoiceErrorCategory::UnavailableChoice);
        assert_eq!(err.kind, ChoiceErrorKind::Trapped);
        assert_eq!(err.message, "Can't switch: The active Pokémon is trapped");
    }

    #[test]
    fn test_wrong_request_state() {
        let err = ChoiceError::parse("[Invalid choice] Can't move: You need a switch response");
        assert_eq!(err.category, ChoiceErrorCategory::InvalidChoice);
        assert_eq!(err.kind, ChoiceErrorKind::WrongRequestState);

        let nothing = ChoiceError::parse("[Invalid choice] There's nothing to choose");
        assert_eq!(nothing.kind, ChoiceErrorKind::WrongRequestState);
    }

    #[test]
    fn test_overflow() {
        let err = ChoiceError::parse("[Invalid choice] You sent more choices than unfainted Pokémon.");
        assert_eq!(err.kind, ChoiceErrorKind::ChoiceOverflow);
    }

    #[test]
    fn test_invalid_move_and_switch() {
        let mv = ChoiceError::parse("[Invalid choice] Can't move: Pikachu doesn't have a move matching flamethrower");
        assert_eq!(mv.kind, ChoiceErrorKind::InvalidMove);

        let sw = ChoiceError::parse("[Invalid choice] Can't switch: You can't switch to an active Pokémon");
        assert_eq!(sw.kind, ChoiceErrorKind::InvalidSwitch);
    }

    #[test]
    fn test_untagged() {
        let err = ChoiceError::parse("Something odd happened");
        assert_eq!(err.category, ChoiceErrorCategory::Other);
        assert_eq!(err.kind, ChoiceErrorKind::Unclassified);
    }
}
