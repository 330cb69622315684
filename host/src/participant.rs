//! Who takes part in a match and where they are in negotiation

use std::fmt;

use serde::{Deserialize, Serialize};
use tandem_battle::BattleField;
use tandem_protocol::Player;

/// What drives a participant's decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Player,
    Computer,
}

/// Lookup key for one participant. Carries no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleParticipant {
    pub id: u64,
    pub kind: ProviderKind,
}

impl BattleParticipant {
    pub fn player(id: u64) -> Self {
        BattleParticipant {
            id,
            kind: ProviderKind::Player,
        }
    }

    pub fn computer(id: u64) -> Self {
        BattleParticipant {
            id,
            kind: ProviderKind::Computer,
        }
    }
}

impl fmt::Display for BattleParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProviderKind::Player => write!(f, "player-{}", self.id),
            ProviderKind::Computer => write!(f, "computer-{}", self.id),
        }
    }
}

/// Negotiation phase of one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientState {
    #[default]
    None,
    /// A challenge was sent or received and is unanswered
    Requested,
    PollingSlot,
    SetSlot,
    PollingTeam,
    SetTeam,
    Ongoing,
}

impl ClientState {
    /// Anything but `None` ties the participant to a match
    pub fn is_engaged(&self) -> bool {
        *self != ClientState::None
    }
}

/// Per-participant match session. Never removed, only reset.
#[derive(Debug, Clone, Default)]
pub struct BattleClient {
    pub state: ClientState,
    pub foe: Option<BattleParticipant>,
    /// Team slot chosen to lead
    pub pick: Option<u8>,
    pub tie_requested: bool,
    /// Packed team as submitted
    pub team: Option<String>,
    pub side: Option<Player>,
    /// The participant's own replica of the battle
    pub field: Option<BattleField>,
}

impl BattleClient {
    pub fn reset(&mut self) {
        *self = BattleClient::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_display() {
        assert_eq!(BattleParticipant::player(7).to_string(), "player-7");
        assert_eq!(BattleParticipant::computer(2).to_string(), "computer-2");
    }

    #[test]
    fn test_participant_serde() {
        let p = BattleParticipant::computer(3);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"id":3,"kind":"computer"}"#);
        assert_eq!(serde_json::from_str::<BattleParticipant>(&json).unwrap(), p);
    }

    #[test]
    fn test_client_reset() {
        let mut client = BattleClient {
            state: ClientState::Ongoing,
            foe: Some(BattleParticipant::player(1)),
            pick: Some(2),
            tie_requested: true,
            team: Some("Bulbasaur|||||||||||".into()),
            side: Some(Player::P2),
            field: Some(BattleField::omniscient()),
        };
        client.reset();
        assert_eq!(client.state, ClientState::None);
        assert!(client.foe.is_none());
        assert!(client.field.is_none());
        assert!(!client.tie_requested);
    }
}
