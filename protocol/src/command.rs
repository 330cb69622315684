//! Commands written to the simulator's input stream

use serde::Serialize;
use serde_json::json;

use crate::sim::Player;

/// One player's entry in the start directive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOptions {
    pub name: String,
    /// Packed team string
    pub team: String,
}

/// Everything the simulator needs to begin a battle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartOptions {
    pub formatid: String,
    pub p1: PlayerOptions,
    pub p2: PlayerOptions,
}

/// A decision answering a `|request|`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// `move N`, 1-based index into the active Pokemon's moves
    Move { index: u8, terastallize: bool },

    /// `switch N`, 1-based position in the side's current team order
    Switch(u8),

    /// `default`, lets the simulator pick the first legal option
    Default,
}

impl Choice {
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::Move {
                index,
                terastallize: false,
            } => format!("move {}", index),
            Self::Move {
                index,
                terastallize: true,
            } => format!("move {} terastallize", index),
            Self::Switch(position) => format!("switch {}", position),
            Self::Default => "default".to_string(),
        }
    }
}

/// Commands that are written to the simulator, one per line
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// >start {"formatid":FORMAT,"p1":{...},"p2":{...}}
    Start(StartOptions),

    /// >p1 CHOICE
    Choose { player: Player, choice: Choice },
}

impl SimCommand {
    /// Serialize command to protocol format (without the trailing newline)
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::Start(options) => format!(">start {}", json!(options)),
            Self::Choose { player, choice } => {
                format!(">{} {}", player.as_str(), choice.to_protocol_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_strings() {
        assert_eq!(
            Choice::Move {
                index: 2,
                terastallize: false
            }
            .to_protocol_string(),
            "move 2"
        );
        assert_eq!(
            Choice::Move {
                index: 1,
                terastallize: true
            }
            .to_protocol_string(),
            "move 1 terastallize"
        );
        assert_eq!(
            Choice::Switch(3).to_protocol_string(),
            "switch 3"
        );
        assert_eq!(Choice::Default.to_protocol_string(), "default");
    }

    #[test]
    fn test_choose_command() {
        let cmd = SimCommand::Choose {
            player: Player::P2,
            choice: Choice::Default,
        };
        assert_eq!(cmd.to_protocol_string(), ">p2 default");
    }

    #[test]
    fn test_start_command_is_single_line_json() {
        let cmd = SimCommand::Start(StartOptions {
            formatid: "gen9customgame".into(),
            p1: PlayerOptions {
                name: "p1".into(),
                team: "Bulbasaur|||||||||||".into(),
            },
            p2: PlayerOptions {
                name: "p2".into(),
                team: "Charmander|||||||||||".into(),
            },
        });

        let line = cmd.to_protocol_string();
        assert!(line.starts_with(">start {"));
        assert!(!line.contains('\n'));

        let json: serde_json::Value = serde_json::from_str(&line[">start ".len()..]).unwrap();
        assert_eq!(json["formatid"], "gen9customgame");
        assert_eq!(json["p2"]["team"], "Charmander|||||||||||");
    }
}
