//! Negotiation messages exchanged through the mediator

use serde::{Deserialize, Serialize};

use crate::participant::BattleParticipant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieKind {
    /// Reported by the simulator
    Regular,
    /// Both participants asked for a tie
    Agreed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageBody {
    ChallengeQuestion,
    ChallengeAnswer(bool),
    ChallengeTakeback,
    SlotChoice(u8),
    TeamQuestion,
    /// Packed team string
    TeamAnswer(String),
    TieQuestion,
    TieTakeback,
    TieStatement(TieKind),
    ForfeitOrder,
    /// The sender gave up
    ForfeitStatement,
    WinStatement(BattleParticipant),
    ResetEverythingStatement,
}

impl MessageBody {
    /// Ends the match it refers to
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MessageBody::TieStatement(_)
                | MessageBody::ForfeitStatement
                | MessageBody::WinStatement(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationMessage {
    pub sender: BattleParticipant,
    pub recipient: BattleParticipant,
    pub body: MessageBody,
}

impl NegotiationMessage {
    pub fn new(sender: BattleParticipant, recipient: BattleParticipant, body: MessageBody) -> Self {
        NegotiationMessage {
            sender,
            recipient,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_json_shape() {
        let msg = NegotiationMessage::new(
            BattleParticipant::player(1),
            BattleParticipant::computer(2),
            MessageBody::SlotChoice(3),
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["body"]["slot_choice"], 3);
        assert_eq!(json["recipient"]["kind"], "computer");

        let question: NegotiationMessage = serde_json::from_str(
            r#"{"sender":{"id":1,"kind":"player"},"recipient":{"id":2,"kind":"player"},"body":"challenge_question"}"#,
        )
        .unwrap();
        assert_eq!(question.body, MessageBody::ChallengeQuestion);
    }

    #[test]
    fn test_terminal_bodies() {
        assert!(MessageBody::TieStatement(TieKind::Agreed).is_terminal());
        assert!(MessageBody::ForfeitStatement.is_terminal());
        assert!(!MessageBody::ForfeitOrder.is_terminal());
        assert!(!MessageBody::TieQuestion.is_terminal());
    }
}
