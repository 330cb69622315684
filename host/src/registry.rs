//! Live matches, keyed by the participant who issued the challenge

use std::collections::HashMap;
use std::fmt;

use tandem_battle::BattleField;
use tandem_protocol::{BattleRequest, Player, SimCommand};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::BridgeError;
use crate::participant::BattleParticipant;

/// Tags bridge events so late ones from a finished match can be ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

/// Simulator-side state of a started match
pub struct RunningBattle {
    input: mpsc::UnboundedSender<String>,
    bridge: JoinHandle<()>,
    /// Everything both sides have seen
    pub field: BattleField,
    /// Last request per side, used to validate choices and to re-ask
    pub requests: [Option<Box<BattleRequest>>; 2],
    /// Team names in the order the simulator knows them
    pub names: [Vec<String>; 2],
}

impl RunningBattle {
    pub(crate) fn new(
        input: mpsc::UnboundedSender<String>,
        bridge: JoinHandle<()>,
        names: [Vec<String>; 2],
    ) -> Self {
        RunningBattle {
            input,
            bridge,
            field: BattleField::omniscient(),
            requests: [None, None],
            names,
        }
    }

    pub fn submit(&self, command: &SimCommand) -> Result<(), BridgeError> {
        let line = command.to_protocol_string();
        tracing::debug!(line = %line, "Simulator command");
        self.input
            .send(line)
            .map_err(|_| BridgeError::SimulatorExited)
    }

    pub fn request(&self, side: Player) -> Option<&BattleRequest> {
        self.requests[side.index()].as_deref()
    }
}

impl Drop for RunningBattle {
    fn drop(&mut self) {
        self.bridge.abort();
    }
}

impl fmt::Debug for RunningBattle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningBattle")
            .field("turn", &self.field.turn)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

/// One pairing from challenge to result
#[derive(Debug)]
pub struct BattleInstance {
    pub id: MatchId,
    /// Always plays p1
    pub challenger: BattleParticipant,
    pub recipient: BattleParticipant,
    pub accepted: bool,
    pub battle: Option<RunningBattle>,
}

impl BattleInstance {
    pub fn side_of(&self, participant: BattleParticipant) -> Option<Player> {
        if participant == self.challenger {
            Some(Player::P1)
        } else if participant == self.recipient {
            Some(Player::P2)
        } else {
            None
        }
    }

    pub fn participant(&self, side: Player) -> BattleParticipant {
        match side {
            Player::P1 => self.challenger,
            Player::P2 => self.recipient,
        }
    }

    pub fn players(&self) -> [BattleParticipant; 2] {
        [self.challenger, self.recipient]
    }

    pub fn is_running(&self) -> bool {
        self.battle.is_some()
    }
}

/// Every live match. Owned by the mediator and passed in at construction.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    matches: HashMap<BattleParticipant, BattleInstance>,
    /// Both members of every match, pointing at its challenger
    members: HashMap<BattleParticipant, BattleParticipant>,
    next_id: u64,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a pending match. `None` if either side is already in one.
    pub fn open(&mut self, challenger: BattleParticipant, recipient: BattleParticipant) -> Option<MatchId> {
        if challenger == recipient || self.contains(challenger) || self.contains(recipient) {
            return None;
        }

        self.next_id += 1;
        let id = MatchId(self.next_id);
        self.matches.insert(
            challenger,
            BattleInstance {
                id,
                challenger,
                recipient,
                accepted: false,
                battle: None,
            },
        );
        self.members.insert(challenger, challenger);
        self.members.insert(recipient, challenger);
        Some(id)
    }

    pub fn get(&self, challenger: BattleParticipant) -> Option<&BattleInstance> {
        self.matches.get(&challenger)
    }

    pub fn get_mut(&mut self, challenger: BattleParticipant) -> Option<&mut BattleInstance> {
        self.matches.get_mut(&challenger)
    }

    /// The match `participant` takes part in, from either side
    pub fn find(&self, participant: BattleParticipant) -> Option<&BattleInstance> {
        self.members
            .get(&participant)
            .and_then(|challenger| self.matches.get(challenger))
    }

    pub fn find_mut(&mut self, participant: BattleParticipant) -> Option<&mut BattleInstance> {
        let challenger = *self.members.get(&participant)?;
        self.matches.get_mut(&challenger)
    }

    pub fn challenger_of(&self, id: MatchId) -> Option<BattleParticipant> {
        self.matches
            .values()
            .find(|instance| instance.id == id)
            .map(|instance| instance.challenger)
    }

    pub fn contains(&self, participant: BattleParticipant) -> bool {
        self.members.contains_key(&participant)
    }

    pub fn remove(&mut self, challenger: BattleParticipant) -> Option<BattleInstance> {
        let instance = self.matches.remove(&challenger)?;
        self.members.remove(&instance.challenger);
        self.members.remove(&instance.recipient);
        Some(instance)
    }

    pub fn challengers(&self) -> Vec<BattleParticipant> {
        self.matches.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_protocol::Choice;

    fn pair() -> (BattleParticipant, BattleParticipant) {
        (BattleParticipant::player(1), BattleParticipant::computer(2))
    }

    #[test]
    fn test_open_and_find_from_both_sides() {
        let (a, b) = pair();
        let mut registry = MatchRegistry::new();
        let id = registry.open(a, b).unwrap();

        assert_eq!(registry.find(a).unwrap().id, id);
        assert_eq!(registry.find(b).unwrap().challenger, a);
        assert!(registry.get(b).is_none());
        assert_eq!(registry.challenger_of(id), Some(a));

        let instance = registry.get(a).unwrap();
        assert_eq!(instance.side_of(a), Some(Player::P1));
        assert_eq!(instance.side_of(b), Some(Player::P2));
        assert_eq!(instance.participant(Player::P2), b);
        assert_eq!(instance.side_of(BattleParticipant::player(9)), None);
    }

    #[test]
    fn test_one_match_per_participant() {
        let (a, b) = pair();
        let c = BattleParticipant::player(3);
        let mut registry = MatchRegistry::new();

        assert!(registry.open(a, a).is_none());
        assert!(registry.open(a, b).is_some());
        assert!(registry.open(c, b).is_none());
        assert!(registry.open(a, c).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_frees_both_members() {
        let (a, b) = pair();
        let mut registry = MatchRegistry::new();
        let first = registry.open(a, b).unwrap();

        assert!(registry.remove(b).is_none());
        assert!(registry.remove(a).is_some());
        assert!(!registry.contains(a));
        assert!(!registry.contains(b));
        assert!(registry.is_empty());

        let second = registry.open(b, a).unwrap();
        assert_ne!(first, second);
        assert_eq!(registry.challengers(), vec![b]);
    }

    #[tokio::test]
    async fn test_running_battle_submit_and_drop() {
        let (input, mut lines) = mpsc::unbounded_channel();
        let bridge = tokio::spawn(std::future::pending::<()>());
        let battle = RunningBattle::new(input, bridge, [Vec::new(), Vec::new()]);

        battle
            .submit(&SimCommand::Choose {
                player: Player::P2,
                choice: Choice::Default,
            })
            .unwrap();
        assert_eq!(lines.recv().await.as_deref(), Some(">p2 default"));

        drop(battle);
        assert!(lines.recv().await.is_none());
    }
}
