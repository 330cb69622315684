use serde::Serialize;
use tandem_battle::DecodeError;
use tandem_protocol::ChoiceError;
use thiserror::Error;

use crate::participant::{BattleParticipant, ClientState};

/// Why a negotiation message was refused outright
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NegotiationError {
    #[error("Cannot challenge yourself")]
    SelfChallenge,

    #[error("{participant} is already in a match")]
    Busy { participant: BattleParticipant },

    #[error("Slot {slot} is out of range")]
    InvalidSlot { slot: u8 },

    #[error("Team rejected: {reason}")]
    InvalidTeam { reason: String },

    #[error("Not valid while {state:?}")]
    WrongState { state: ClientState },
}

/// Why a battle choice never reached the simulator
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChoiceRejection {
    #[error("Not in a match")]
    NoMatch,

    #[error("No decision has been requested")]
    NotRequested,

    #[error("Already waiting on the other side")]
    Waiting,

    #[error("A switch is required")]
    SwitchRequired,

    #[error("Move {index} is not available")]
    InvalidMove { index: u8 },

    #[error("Cannot switch to slot {slot}")]
    InvalidSwitch { slot: u8 },

    #[error("The active Pokemon is trapped")]
    Trapped,

    #[error("The simulator is not accepting input")]
    Undelivered,

    #[error("Simulator refused the choice: {}", .error.message)]
    Simulator { error: ChoiceError },
}

/// Failures that end a match from inside the bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to start simulator: {0}")]
    Launch(String),

    #[error("Simulator I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Simulator exited")]
    SimulatorExited,

    #[error("Malformed simulator output: {0}")]
    Malformed(String),

    #[error("No {side} Pokemon named {name:?}")]
    UnknownPokemon { side: tandem_protocol::Player, name: String },

    #[error("Unrecognized {kind}: {name:?}")]
    Unrecognized { kind: &'static str, name: String },

    #[error("Action buffer rejected: {0}")]
    Decode(#[from] DecodeError),
}

impl BridgeError {
    pub(crate) fn unrecognized(kind: &'static str, name: &str) -> Self {
        BridgeError::Unrecognized {
            kind,
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_protocol::ChoiceError;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            ChoiceRejection::InvalidMove { index: 5 }.to_string(),
            "Move 5 is not available"
        );
        let error = ChoiceError::parse("[Unavailable choice] Can't switch: The active Pokémon is trapped");
        let text = ChoiceRejection::Simulator { error }.to_string();
        assert!(text.contains("trapped"));
    }

    #[test]
    fn test_negotiation_error_json() {
        let json = serde_json::to_value(NegotiationError::InvalidSlot { slot: 9 }).unwrap();
        assert_eq!(json["kind"], "invalid_slot");
        assert_eq!(json["slot"], 9);
    }
}
