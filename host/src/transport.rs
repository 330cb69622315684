//! Outbound delivery to participants

use serde::Serialize;
use tandem_battle::RequestKind;
use tandem_protocol::{BattleRequest, Player};
use tokio::sync::mpsc;

use crate::error::{ChoiceRejection, NegotiationError};
use crate::message::NegotiationMessage;
use crate::participant::BattleParticipant;

/// Everything the host sends to a participant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Negotiation {
        message: NegotiationMessage,
    },
    MatchStarted {
        side: Player,
        foe: BattleParticipant,
    },
    /// One encoded action buffer, already redacted for the recipient
    Actions {
        buffer: Vec<u8>,
    },
    Request {
        request: Box<BattleRequest>,
        kind: RequestKind,
    },
    ChoiceRejected {
        reason: ChoiceRejection,
    },
    /// A negotiation message was refused without changing any state
    Rejected {
        message: NegotiationMessage,
        reason: NegotiationError,
    },
    /// The match was stopped by a failure
    Terminated {
        reason: String,
    },
}

/// Seam between the mediator and whatever carries messages to participants
pub trait Transport: Send {
    fn deliver(&self, to: BattleParticipant, message: Outbound);
}

/// Forwards every delivery into a channel
#[derive(Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<(BattleParticipant, Outbound)>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(BattleParticipant, Outbound)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn deliver(&self, to: BattleParticipant, message: Outbound) {
        if self.tx.send((to, message)).is_err() {
            tracing::warn!(participant = %to, "Outbound receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_transport_delivers_in_order() {
        let (transport, mut rx) = ChannelTransport::new();
        let p = BattleParticipant::player(1);
        transport.deliver(p, Outbound::Actions { buffer: vec![9, 0, 1, 0, 0] });
        transport.deliver(p, Outbound::Terminated { reason: "gone".into() });

        let (to, first) = rx.try_recv().unwrap();
        assert_eq!(to, p);
        assert!(matches!(first, Outbound::Actions { .. }));
        assert!(matches!(rx.try_recv().unwrap().1, Outbound::Terminated { .. }));
    }

    #[test]
    fn test_outbound_json_tag() {
        let json = serde_json::to_value(Outbound::MatchStarted {
            side: Player::P2,
            foe: BattleParticipant::computer(4),
        })
        .unwrap();
        assert_eq!(json["type"], "match_started");
        assert_eq!(json["side"], "p2");
    }
}
