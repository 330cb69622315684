//! One task per match between the simulator and the mediator.
//!
//! The bridge is the only reader of a simulator's output. Each chunk is
//! translated into action buffers and handed to the mediator's inbox as a
//! [`BridgeEvent`]; the task ends after the battle's result or a failure.

mod translate;

pub use translate::{Broadcast, Outcome, Translator};

use tandem_protocol::{BattleRequest, ChoiceError, Player, SimChunk, SimMessage};
use tokio::sync::mpsc;

use crate::error::BridgeError;
use crate::manager::ManagerInput;
use crate::registry::MatchId;
use crate::simulator::ChunkResult;

#[derive(Debug)]
pub enum BridgeEvent {
    Broadcast(Broadcast),
    /// Private to `side`
    Request {
        side: Player,
        request: Box<BattleRequest>,
    },
    /// The simulator refused a choice from `side`
    ChoiceError {
        side: Player,
        error: ChoiceError,
    },
    Finished(Outcome),
    Failed(BridgeError),
}

impl BridgeEvent {
    fn is_final(&self) -> bool {
        matches!(self, BridgeEvent::Finished(_) | BridgeEvent::Failed(_))
    }
}

/// Drive one match until it finishes, fails, or the mediator goes away
pub(crate) async fn run(
    match_id: MatchId,
    mut chunks: mpsc::Receiver<ChunkResult>,
    mut translator: Translator,
    inbox: mpsc::Sender<ManagerInput>,
) {
    while let Some(chunk) = chunks.recv().await {
        let events = match chunk.and_then(|chunk| handle_chunk(&mut translator, chunk)) {
            Ok(events) => events,
            Err(error) => vec![BridgeEvent::Failed(error)],
        };

        let done = events.iter().any(BridgeEvent::is_final);
        for event in events {
            if inbox
                .send(ManagerInput::Bridge { match_id, event })
                .await
                .is_err()
            {
                return;
            }
        }
        if done {
            return;
        }
    }

    let _ = inbox
        .send(ManagerInput::Bridge {
            match_id,
            event: BridgeEvent::Failed(BridgeError::SimulatorExited),
        })
        .await;
}

fn handle_chunk(translator: &mut Translator, chunk: SimChunk) -> Result<Vec<BridgeEvent>, BridgeError> {
    match chunk {
        SimChunk::Update(lines) => {
            let broadcast = translator.translate_update(&lines)?;
            let mut events = Vec::new();
            if !broadcast.is_empty() {
                events.push(BridgeEvent::Broadcast(broadcast));
            }
            if let Some(outcome) = translator.outcome() {
                events.push(BridgeEvent::Finished(outcome));
            }
            Ok(events)
        }
        SimChunk::SideUpdate { player, messages } => Ok(messages
            .into_iter()
            .filter_map(|message| match message {
                SimMessage::Request(request) => Some(BridgeEvent::Request {
                    side: player,
                    request,
                }),
                SimMessage::Error(error) => Some(BridgeEvent::ChoiceError {
                    side: player,
                    error,
                }),
                _ => None,
            })
            .collect()),
        SimChunk::End(_) => match translator.outcome() {
            Some(_) => Ok(Vec::new()),
            None => Err(BridgeError::Malformed(
                "battle ended without a result".to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tandem_battle::{Dex, TableDex};
    use tandem_protocol::{ChoiceErrorKind, parse_sim_chunk};

    fn translator() -> Translator {
        let dex: Arc<dyn Dex> = Arc::new(TableDex::new(&["Bulbasaur"], &["Tackle"], &[], &[]));
        Translator::new(
            dex,
            ["player-1".to_string(), "player-2".to_string()],
            [vec!["Bulbasaur".to_string()], vec!["Bulbasaur".to_string()]],
        )
    }

    async fn next_event(inbox: &mut mpsc::Receiver<ManagerInput>) -> BridgeEvent {
        match inbox.recv().await {
            Some(ManagerInput::Bridge { match_id, event }) => {
                assert_eq!(match_id, MatchId(4));
                event
            }
            _ => panic!("expected a bridge event"),
        }
    }

    #[tokio::test]
    async fn test_bridge_forwards_chunks_in_order() {
        let (chunk_tx, chunk_rx) = mpsc::channel(2);
        let (inbox_tx, mut inbox) = mpsc::channel(8);
        let task = tokio::spawn(run(MatchId(4), chunk_rx, translator(), inbox_tx));

        let chunk = |text: &str| Ok(parse_sim_chunk(text).unwrap());
        chunk_tx
            .send(chunk("sideupdate\np2\n|request|{\"wait\":true,\"rqid\":1}"))
            .await
            .unwrap();
        chunk_tx
            .send(chunk("update\n|switch|p1a: Bulbasaur|Bulbasaur, L5|20/20"))
            .await
            .unwrap();
        chunk_tx
            .send(chunk("sideupdate\np1\n|error|[Invalid choice] Can't do anything: It's not your turn"))
            .await
            .unwrap();
        chunk_tx.send(chunk("update\n|win|player-1")).await.unwrap();

        assert!(matches!(
            next_event(&mut inbox).await,
            BridgeEvent::Request { side: Player::P2, .. }
        ));
        assert!(matches!(next_event(&mut inbox).await, BridgeEvent::Broadcast(_)));
        match next_event(&mut inbox).await {
            BridgeEvent::ChoiceError { side, error } => {
                assert_eq!(side, Player::P1);
                assert_eq!(error.kind, ChoiceErrorKind::WrongRequestState);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            next_event(&mut inbox).await,
            BridgeEvent::Finished(Outcome::Win(Player::P1))
        ));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_output_is_a_failure() {
        let (chunk_tx, chunk_rx) = mpsc::channel(1);
        let (inbox_tx, mut inbox) = mpsc::channel(4);
        let task = tokio::spawn(run(MatchId(4), chunk_rx, translator(), inbox_tx));
        drop(chunk_tx);

        assert!(matches!(
            next_event(&mut inbox).await,
            BridgeEvent::Failed(BridgeError::SimulatorExited)
        ));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_translation_error_stops_the_bridge() {
        let (chunk_tx, chunk_rx) = mpsc::channel(2);
        let (inbox_tx, mut inbox) = mpsc::channel(4);
        let task = tokio::spawn(run(MatchId(4), chunk_rx, translator(), inbox_tx));

        chunk_tx
            .send(Ok(parse_sim_chunk("update\n|-start|p1a: Bulbasaur|Unheard Of").unwrap()))
            .await
            .unwrap();

        assert!(matches!(
            next_event(&mut inbox).await,
            BridgeEvent::Failed(BridgeError::Unrecognized { kind: "volatile", .. })
        ));
        task.await.unwrap();
        assert!(chunk_tx.is_closed());
    }
}
