//! The negotiation mediator.
//!
//! [`BattleManager`] is a single task owning every [`BattleClient`] and the
//! [`MatchRegistry`]. Negotiation messages, battle choices and bridge events
//! all arrive on one inbox, so every change to a match happens in order.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tandem_battle::{BattleField, BattlePokemon, Dex, Observer, RequestKind};
use tandem_protocol::{
    BattleRequest, Choice, ChoiceError, Player, PlayerOptions, SimCommand, StartOptions,
};
use tandem_team::{PackedSet, lead_order, pack_team, reorder_for_lead, unpack_team};
use tokio::sync::{mpsc, oneshot};

use crate::bridge::{self, Broadcast, BridgeEvent, Outcome, Translator};
use crate::config::HostConfig;
use crate::error::{BridgeError, ChoiceRejection, NegotiationError};
use crate::handle::{ManagerHandle, SessionState};
use crate::message::{MessageBody, NegotiationMessage, TieKind};
use crate::participant::{BattleClient, BattleParticipant, ClientState};
use crate::registry::{MatchId, MatchRegistry, RunningBattle};
use crate::roster::RosterProvider;
use crate::simulator::SimulatorLauncher;
use crate::transport::{Outbound, Transport};

/// Team slots a participant may pick from
const TEAM_SLOTS: u8 = 6;

/// A battle decision from a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerChoice {
    /// 1-based index into the active Pokemon's moves
    Move {
        index: u8,
        #[serde(default)]
        terastallize: bool,
    },
    /// Team slot in the order the battle started with
    Switch { slot: u8 },
    Default,
    Forfeit,
}

pub enum ManagerInput {
    Register(Arc<dyn RosterProvider>),
    Negotiation(NegotiationMessage),
    Choice {
        participant: BattleParticipant,
        choice: PlayerChoice,
    },
    Bridge {
        match_id: MatchId,
        event: BridgeEvent,
    },
    /// Answered once every earlier input has been handled
    Flush(oneshot::Sender<()>),
    Shutdown,
}

impl fmt::Debug for ManagerInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerInput::Register(provider) => {
                f.debug_tuple("Register").field(&provider.participant()).finish()
            }
            ManagerInput::Negotiation(message) => {
                f.debug_tuple("Negotiation").field(message).finish()
            }
            ManagerInput::Choice { participant, choice } => f
                .debug_struct("Choice")
                .field("participant", participant)
                .field("choice", choice)
                .finish(),
            ManagerInput::Bridge { match_id, event } => f
                .debug_struct("Bridge")
                .field("match_id", match_id)
                .field("event", event)
                .finish(),
            ManagerInput::Flush(_) => f.write_str("Flush"),
            ManagerInput::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// How a match came to an end
enum Ending {
    /// Announced to both participants as a negotiation message from `sender`
    Statement {
        sender: BattleParticipant,
        body: MessageBody,
    },
    Failed(String),
}

impl Ending {
    fn notice(&self, recipient: BattleParticipant) -> Outbound {
        match self {
            Ending::Statement { sender, body } => Outbound::Negotiation {
                message: NegotiationMessage::new(*sender, recipient, body.clone()),
            },
            Ending::Failed(reason) => Outbound::Terminated {
                reason: reason.clone(),
            },
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ending::Statement { sender, body } => write!(f, "{:?} from {}", body, sender),
            Ending::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Forwards a replica's active-slot changes on its own side to the provider,
/// translated back to the order the team was submitted in
struct ProviderObserver<'a> {
    side: Player,
    order: Vec<usize>,
    provider: Option<&'a dyn RosterProvider>,
}

impl Observer for ProviderObserver<'_> {
    fn on_active_changed(&mut self, side: Player, slot: u8) {
        if side != self.side {
            return;
        }
        let Some(provider) = self.provider else {
            return;
        };
        let submitted = self
            .order
            .get(usize::from(slot))
            .and_then(|&i| u8::try_from(i).ok())
            .unwrap_or(slot);
        provider.on_active_changed(submitted);
    }
}

pub struct BattleManager<T: Transport> {
    config: HostConfig,
    registry: MatchRegistry,
    clients: HashMap<BattleParticipant, BattleClient>,
    providers: HashMap<BattleParticipant, Arc<dyn RosterProvider>>,
    launcher: Arc<dyn SimulatorLauncher>,
    dex: Arc<dyn Dex>,
    transport: T,
    inbox: mpsc::Receiver<ManagerInput>,
    /// Upgraded for each bridge so the inbox closes once every handle is gone
    inbox_tx: mpsc::WeakSender<ManagerInput>,
    sessions: Arc<SessionState>,
    /// Clients changed since the last publish
    dirty: HashSet<BattleParticipant>,
}

impl<T: Transport> BattleManager<T> {
    pub fn new(
        config: HostConfig,
        registry: MatchRegistry,
        launcher: Arc<dyn SimulatorLauncher>,
        dex: Arc<dyn Dex>,
        transport: T,
    ) -> (Self, ManagerHandle) {
        let (tx, inbox) = mpsc::channel(config.inbox_capacity.max(1));
        let sessions = Arc::new(SessionState::new());
        let manager = BattleManager {
            config,
            registry,
            clients: HashMap::new(),
            providers: HashMap::new(),
            launcher,
            dex,
            transport,
            inbox,
            inbox_tx: tx.downgrade(),
            sessions: sessions.clone(),
            dirty: HashSet::new(),
        };
        (manager, ManagerHandle::new(tx, sessions))
    }

    /// Handle inputs until shut down or every sender is gone
    pub async fn run(mut self) {
        while let Some(input) = self.inbox.recv().await {
            let stop = matches!(input, ManagerInput::Shutdown);
            self.handle_input(input);
            self.publish();
            if stop {
                tracing::info!("Mediator shut down");
                return;
            }
        }

        self.stop_all(|| Ending::Failed("host stopped".to_string()));
        self.publish();
    }

    fn handle_input(&mut self, input: ManagerInput) {
        match input {
            ManagerInput::Register(provider) => self.register(provider),
            ManagerInput::Negotiation(message) => self.on_negotiation(message),
            ManagerInput::Choice { participant, choice } => self.on_choice(participant, choice),
            ManagerInput::Bridge { match_id, event } => self.on_bridge(match_id, event),
            ManagerInput::Flush(done) => {
                self.publish();
                let _ = done.send(());
            }
            ManagerInput::Shutdown => {
                self.stop_all(|| Ending::Failed("host shutting down".to_string()));
            }
        }
    }

    fn register(&mut self, provider: Arc<dyn RosterProvider>) {
        let participant = provider.participant();
        tracing::debug!(participant = %participant, "Provider registered");
        if let Ok(mut providers) = self.sessions.providers.write() {
            providers.insert(participant, provider.clone());
        }
        self.providers.insert(participant, provider);
        self.client_mut(participant);
    }

    /// Copy every changed client into the shared session state
    fn publish(&mut self) {
        if self.dirty.is_empty() {
            return;
        }
        let Ok(mut sessions) = self.sessions.clients.write() else {
            return;
        };
        for participant in self.dirty.drain() {
            if let Some(client) = self.clients.get(&participant) {
                sessions.insert(participant, client.clone());
            }
        }
    }

    fn client_mut(&mut self, participant: BattleParticipant) -> &mut BattleClient {
        self.dirty.insert(participant);
        self.clients.entry(participant).or_default()
    }

    fn state(&self, participant: BattleParticipant) -> ClientState {
        self.clients
            .get(&participant)
            .map(|client| client.state)
            .unwrap_or_default()
    }

    fn foe(&self, participant: BattleParticipant) -> Option<BattleParticipant> {
        self.clients.get(&participant).and_then(|client| client.foe)
    }

    fn provider(&self, participant: BattleParticipant) -> Option<&dyn RosterProvider> {
        self.providers.get(&participant).map(|p| p.as_ref())
    }

    fn forward(&self, message: NegotiationMessage) {
        let to = message.recipient;
        self.transport.deliver(to, Outbound::Negotiation { message });
    }

    fn reject(&self, message: NegotiationMessage, reason: NegotiationError) {
        tracing::debug!(
            sender = %message.sender,
            body = ?message.body,
            reason = %reason,
            "Negotiation message rejected"
        );
        let to = message.sender;
        self.transport.deliver(to, Outbound::Rejected { message, reason });
    }

    fn drop_stale(&self, message: &NegotiationMessage) {
        tracing::debug!(
            sender = %message.sender,
            recipient = %message.recipient,
            body = ?message.body,
            state = ?self.state(message.sender),
            "Dropped stale negotiation message"
        );
    }

    /// Sender is in `state` and the recipient is its foe
    fn expects(&self, message: &NegotiationMessage, state: ClientState) -> bool {
        self.state(message.sender) == state && self.foe(message.sender) == Some(message.recipient)
    }

    fn on_negotiation(&mut self, message: NegotiationMessage) {
        match &message.body {
            MessageBody::ChallengeQuestion => self.on_challenge(message),
            MessageBody::ChallengeTakeback => self.on_takeback(message),
            MessageBody::ChallengeAnswer(accept) => {
                let accept = *accept;
                self.on_answer(message, accept)
            }
            MessageBody::SlotChoice(slot) => {
                let slot = *slot;
                self.on_slot(message, slot)
            }
            MessageBody::TeamAnswer(team) => {
                let team = team.clone();
                self.on_team(message, team)
            }
            MessageBody::TieQuestion | MessageBody::TieTakeback => self.on_tie(message),
            MessageBody::ForfeitOrder => self.on_forfeit(message),
            MessageBody::ForfeitStatement
            | MessageBody::WinStatement(_)
            | MessageBody::TieStatement(_) => self.on_statement(message),
            MessageBody::ResetEverythingStatement => {
                let sender = message.sender;
                tracing::info!(sender = %sender, "Resetting every match");
                self.stop_all(|| Ending::Statement {
                    sender,
                    body: MessageBody::ResetEverythingStatement,
                });
            }
            // Only the mediator asks for teams
            MessageBody::TeamQuestion => self.drop_stale(&message),
        }
    }

    fn on_challenge(&mut self, message: NegotiationMessage) {
        let NegotiationMessage {
            sender, recipient, ..
        } = message;

        if sender == recipient {
            return self.reject(message, NegotiationError::SelfChallenge);
        }
        for participant in [sender, recipient] {
            if self.registry.contains(participant) || self.state(participant).is_engaged() {
                return self.reject(message, NegotiationError::Busy { participant });
            }
        }
        let Some(id) = self.registry.open(sender, recipient) else {
            return self.reject(message, NegotiationError::Busy { participant: recipient });
        };

        for (participant, foe) in [(sender, recipient), (recipient, sender)] {
            let client = self.client_mut(participant);
            client.state = ClientState::Requested;
            client.foe = Some(foe);
        }
        tracing::debug!(match_id = %id, challenger = %sender, recipient = %recipient, "Challenge opened");
        self.forward(message);
    }

    fn on_takeback(&mut self, message: NegotiationMessage) {
        let pending = self
            .registry
            .get(message.sender)
            .is_some_and(|instance| !instance.accepted && instance.recipient == message.recipient);
        if !pending || !self.expects(&message, ClientState::Requested) {
            return self.drop_stale(&message);
        }

        self.registry.remove(message.sender);
        self.client_mut(message.sender).reset();
        self.client_mut(message.recipient).reset();
        tracing::debug!(challenger = %message.sender, "Challenge taken back");
        self.forward(message);
    }

    fn on_answer(&mut self, message: NegotiationMessage, accept: bool) {
        let NegotiationMessage {
            sender, recipient, ..
        } = message;
        let pending = self.registry.get(recipient).is_some_and(|instance| {
            !instance.accepted && instance.recipient == sender
        });
        if !pending || !self.expects(&message, ClientState::Requested) {
            return self.drop_stale(&message);
        }

        if accept {
            if let Some(instance) = self.registry.get_mut(recipient) {
                instance.accepted = true;
            }
            self.client_mut(sender).state = ClientState::PollingSlot;
            self.client_mut(recipient).state = ClientState::PollingSlot;
            tracing::debug!(challenger = %recipient, recipient = %sender, "Challenge accepted");
        } else {
            self.registry.remove(recipient);
            self.client_mut(sender).reset();
            self.client_mut(recipient).reset();
            tracing::debug!(challenger = %recipient, recipient = %sender, "Challenge declined");
        }
        self.forward(message);
    }

    fn on_slot(&mut self, message: NegotiationMessage, slot: u8) {
        if !self.expects(&message, ClientState::PollingSlot) {
            return self.drop_stale(&message);
        }
        if slot >= TEAM_SLOTS {
            return self.reject(message, NegotiationError::InvalidSlot { slot });
        }

        let NegotiationMessage {
            sender, recipient, ..
        } = message;
        let client = self.client_mut(sender);
        client.pick = Some(slot);
        client.state = ClientState::SetSlot;
        tracing::debug!(participant = %sender, slot, "Lead picked");

        if self.state(recipient) == ClientState::SetSlot {
            for (participant, foe) in [(sender, recipient), (recipient, sender)] {
                self.client_mut(participant).state = ClientState::PollingTeam;
                self.forward(NegotiationMessage::new(
                    foe,
                    participant,
                    MessageBody::TeamQuestion,
                ));
            }
        }
    }

    fn on_team(&mut self, message: NegotiationMessage, team: String) {
        if !self.expects(&message, ClientState::PollingTeam) {
            return self.drop_stale(&message);
        }

        let NegotiationMessage {
            sender, recipient, ..
        } = message;
        let pick = self.clients.get(&sender).and_then(|c| c.pick).unwrap_or(0);
        if let Err(e) = lead_team(&team, pick) {
            return self.reject(
                message,
                NegotiationError::InvalidTeam {
                    reason: e.to_string(),
                },
            );
        }

        let client = self.client_mut(sender);
        client.team = Some(team);
        client.state = ClientState::SetTeam;
        tracing::debug!(participant = %sender, "Team submitted");

        if self.state(recipient) == ClientState::SetTeam
            && let Some(challenger) = self.registry.find(sender).map(|i| i.challenger)
            && let Err(e) = self.launch(challenger)
        {
            tracing::error!(challenger = %challenger, error = %e, "Failed to start battle");
            self.terminate(challenger, Ending::Failed(e.to_string()));
        }
    }

    fn launch(&mut self, challenger: BattleParticipant) -> Result<(), BridgeError> {
        let Some(instance) = self.registry.get(challenger) else {
            return Ok(());
        };
        let id = instance.id;
        let players = instance.players();

        let mut names: [Vec<String>; 2] = [Vec::new(), Vec::new()];
        let mut options = Vec::with_capacity(2);
        for (index, participant) in players.into_iter().enumerate() {
            let client = self.clients.get(&participant);
            let team = client.and_then(|c| c.team.as_deref()).unwrap_or_default();
            let pick = client.and_then(|c| c.pick).unwrap_or(0);
            let sets = lead_team(team, pick).map_err(|e| BridgeError::Launch(e.to_string()))?;
            names[index] = sets.iter().map(|set| set.name().to_string()).collect();
            options.push(PlayerOptions {
                name: participant.to_string(),
                team: pack_team(&sets),
            });
        }
        let [p1, p2]: [PlayerOptions; 2] = options
            .try_into()
            .map_err(|_| BridgeError::Launch("missing team".to_string()))?;

        let inbox = self
            .inbox_tx
            .upgrade()
            .ok_or_else(|| BridgeError::Launch("mediator is stopping".to_string()))?;
        let io = self.launcher.launch(self.config.chunk_capacity)?;
        let translator = Translator::new(
            self.dex.clone(),
            players.map(|p| p.to_string()),
            names.clone(),
        );
        let task = tokio::spawn(bridge::run(id, io.chunks, translator, inbox));
        let battle = RunningBattle::new(io.input, task, names);
        battle.submit(&SimCommand::Start(StartOptions {
            formatid: self.config.format_id.clone(),
            p1,
            p2,
        }))?;

        if let Some(instance) = self.registry.get_mut(challenger) {
            instance.battle = Some(battle);
        }

        for (side, participant) in [Player::P1, Player::P2].into_iter().zip(players) {
            let foe = players[side.opponent().index()];
            let roster = self
                .provider(participant)
                .map(|p| p.roster())
                .unwrap_or_default();
            let client = self.client_mut(participant);
            let pick = usize::from(client.pick.unwrap_or(0));
            let party = reorder_for_lead(&roster, pick).unwrap_or(roster);
            client.state = ClientState::Ongoing;
            client.side = Some(side);
            client.field = Some(BattleField::for_player(side, &party));

            self.transport
                .deliver(participant, Outbound::MatchStarted { side, foe });
            if let Some(provider) = self.provider(participant) {
                provider.on_battle_start(side);
            }
        }

        tracing::info!(
            match_id = %id,
            p1 = %players[0],
            p2 = %players[1],
            format = %self.config.format_id,
            "Battle started"
        );
        Ok(())
    }

    fn on_tie(&mut self, message: NegotiationMessage) {
        if !self.expects(&message, ClientState::Ongoing) {
            return self.drop_stale(&message);
        }

        let NegotiationMessage {
            sender, recipient, ..
        } = message;
        let asking = message.body == MessageBody::TieQuestion;
        self.client_mut(sender).tie_requested = asking;

        let agreed = asking
            && self
                .clients
                .get(&recipient)
                .is_some_and(|foe| foe.tie_requested);
        if !agreed {
            return self.forward(message);
        }

        if let Some(challenger) = self.registry.find(sender).map(|i| i.challenger) {
            self.terminate(
                challenger,
                Ending::Statement {
                    sender,
                    body: MessageBody::TieStatement(TieKind::Agreed),
                },
            );
        }
    }

    fn on_forfeit(&mut self, message: NegotiationMessage) {
        let Some(challenger) = self
            .registry
            .find(message.sender)
            .filter(|instance| instance.accepted)
            .map(|instance| instance.challenger)
        else {
            return self.drop_stale(&message);
        };

        self.terminate(
            challenger,
            Ending::Statement {
                sender: message.sender,
                body: MessageBody::ForfeitStatement,
            },
        );
    }

    fn on_statement(&mut self, message: NegotiationMessage) {
        let Some(challenger) = self
            .registry
            .find(message.sender)
            .filter(|instance| instance.accepted)
            .filter(|instance| {
                message.recipient != message.sender
                    && instance.side_of(message.recipient).is_some()
            })
            .map(|instance| instance.challenger)
        else {
            return self.drop_stale(&message);
        };
        self.terminate(
            challenger,
            Ending::Statement {
                sender: message.sender,
                body: message.body,
            },
        );
    }

    fn stop_all(&mut self, ending: impl Fn() -> Ending) {
        for challenger in self.registry.challengers() {
            self.terminate(challenger, ending());
        }
    }

    /// Remove a match and return both participants to `None`. Dropping the
    /// instance stops its bridge and closes the simulator's input.
    fn terminate(&mut self, challenger: BattleParticipant, ending: Ending) {
        let Some(instance) = self.registry.remove(challenger) else {
            return;
        };
        let running = instance.is_running();

        for participant in instance.players() {
            self.client_mut(participant).reset();
            if running && let Some(provider) = self.provider(participant) {
                provider.on_battle_stop();
            }
            self.transport.deliver(participant, ending.notice(participant));
        }

        tracing::info!(
            match_id = %instance.id,
            challenger = %instance.challenger,
            recipient = %instance.recipient,
            ending = %ending,
            "Match ended"
        );
    }

    fn on_choice(&mut self, participant: BattleParticipant, choice: PlayerChoice) {
        if choice == PlayerChoice::Forfeit {
            let recipient = self.foe(participant).unwrap_or(participant);
            return self.on_forfeit(NegotiationMessage::new(
                participant,
                recipient,
                MessageBody::ForfeitOrder,
            ));
        }

        if let Err(reason) = self.submit_choice(participant, &choice) {
            tracing::debug!(participant = %participant, choice = ?choice, reason = %reason, "Choice rejected");
            self.transport
                .deliver(participant, Outbound::ChoiceRejected { reason });
        }
    }

    fn submit_choice(
        &mut self,
        participant: BattleParticipant,
        choice: &PlayerChoice,
    ) -> Result<(), ChoiceRejection> {
        let instance = self
            .registry
            .find_mut(participant)
            .ok_or(ChoiceRejection::NoMatch)?;
        let side = instance
            .side_of(participant)
            .ok_or(ChoiceRejection::NoMatch)?;
        let battle = instance.battle.as_mut().ok_or(ChoiceRejection::NoMatch)?;

        let choice = validate_choice(battle, side, choice)?;
        if let Err(e) = battle.submit(&SimCommand::Choose {
            player: side,
            choice,
        }) {
            // The bridge reports the exit and ends the match
            tracing::warn!(participant = %participant, error = %e, "Choice not delivered");
            return Err(ChoiceRejection::Undelivered);
        }
        battle.field.side_mut(side).request = RequestKind::Wait;

        if let Some(field) = self.client_mut(participant).field.as_mut() {
            field.side_mut(side).request = RequestKind::Wait;
        }
        Ok(())
    }

    fn on_bridge(&mut self, match_id: MatchId, event: BridgeEvent) {
        let Some(challenger) = self.registry.challenger_of(match_id) else {
            tracing::debug!(match_id = %match_id, event = ?event, "Event for a finished match");
            return;
        };

        match event {
            BridgeEvent::Broadcast(broadcast) => self.on_broadcast(challenger, broadcast),
            BridgeEvent::Request { side, request } => self.on_request(challenger, side, request),
            BridgeEvent::ChoiceError { side, error } => {
                self.on_choice_error(challenger, side, error)
            }
            BridgeEvent::Finished(outcome) => {
                let Some(instance) = self.registry.get(challenger) else {
                    return;
                };
                let ending = match outcome {
                    Outcome::Win(side) => {
                        let winner = instance.participant(side);
                        Ending::Statement {
                            sender: winner,
                            body: MessageBody::WinStatement(winner),
                        }
                    }
                    Outcome::Tie => Ending::Statement {
                        sender: challenger,
                        body: MessageBody::TieStatement(TieKind::Regular),
                    },
                };
                self.terminate(challenger, ending);
            }
            BridgeEvent::Failed(error) => {
                tracing::error!(match_id = %match_id, error = %error, "Bridge failed");
                self.terminate(challenger, Ending::Failed(error.to_string()));
            }
        }
    }

    fn on_broadcast(&mut self, challenger: BattleParticipant, broadcast: Broadcast) {
        let Some(instance) = self.registry.get_mut(challenger) else {
            return;
        };
        let players = instance.players();
        let Some(battle) = instance.battle.as_mut() else {
            return;
        };
        let team_sizes = battle.names.each_ref().map(Vec::len);

        if !broadcast.omniscient.is_empty()
            && let Err(e) = battle.field.apply(&broadcast.omniscient, &mut ())
        {
            tracing::error!(challenger = %challenger, error = %e, "Omniscient replica rejected a buffer");
            return self.terminate(challenger, Ending::Failed(BridgeError::from(e).to_string()));
        }

        for (side, participant) in [Player::P1, Player::P2].into_iter().zip(players) {
            let buffer = &broadcast.sides[side.index()];
            if buffer.is_empty() {
                continue;
            }

            let provider = self.providers.get(&participant).map(|p| p.as_ref());
            self.dirty.insert(participant);
            let client = self.clients.entry(participant).or_default();
            let order = client
                .pick
                .and_then(|pick| lead_order(team_sizes[side.index()], usize::from(pick)).ok())
                .unwrap_or_default();
            let mut observer = ProviderObserver {
                side,
                order,
                provider,
            };

            if let Some(field) = client.field.as_mut()
                && let Err(e) = field.apply(buffer, &mut observer)
            {
                tracing::error!(participant = %participant, error = %e, "Replica rejected a buffer");
                return self.terminate(challenger, Ending::Failed(BridgeError::from(e).to_string()));
            }

            self.transport.deliver(
                participant,
                Outbound::Actions {
                    buffer: buffer.clone(),
                },
            );
        }
    }

    fn on_request(&mut self, challenger: BattleParticipant, side: Player, request: Box<BattleRequest>) {
        let Some(instance) = self.registry.get_mut(challenger) else {
            return;
        };
        let participant = instance.participant(side);
        let Some(battle) = instance.battle.as_mut() else {
            return;
        };

        let kind = RequestKind::from_request(&request);
        battle.field.side_mut(side).request = kind;
        battle.requests[side.index()] = Some(request.clone());

        if let Some(field) = self.client_mut(participant).field.as_mut() {
            field.side_mut(side).request = kind;
        }
        tracing::debug!(participant = %participant, kind = ?kind, rqid = ?request.rqid, "Request");
        self.transport
            .deliver(participant, Outbound::Request { request, kind });
    }

    /// The simulator refused a choice; ask again with the last request
    fn on_choice_error(&mut self, challenger: BattleParticipant, side: Player, error: ChoiceError) {
        let Some(instance) = self.registry.get_mut(challenger) else {
            return;
        };
        let participant = instance.participant(side);
        let Some(battle) = instance.battle.as_mut() else {
            return;
        };

        tracing::debug!(participant = %participant, error = %error, "Simulator refused a choice");
        let request = battle.requests[side.index()].clone();
        let kind = request
            .as_deref()
            .map(RequestKind::from_request)
            .unwrap_or_default();
        battle.field.side_mut(side).request = kind;

        if let Some(field) = self.client_mut(participant).field.as_mut() {
            field.side_mut(side).request = kind;
        }
        self.transport.deliver(
            participant,
            Outbound::ChoiceRejected {
                reason: ChoiceRejection::Simulator { error },
            },
        );
        if let Some(request) = request {
            self.transport
                .deliver(participant, Outbound::Request { request, kind });
        }
    }
}

/// Unpack a submitted team and move the picked lead to the front
fn lead_team(team: &str, pick: u8) -> Result<Vec<PackedSet>, tandem_team::TeamError> {
    let sets = unpack_team(team)?;
    reorder_for_lead(&sets, usize::from(pick))
}

/// Check a choice against the side's current request before it reaches the simulator
fn validate_choice(
    battle: &RunningBattle,
    side: Player,
    choice: &PlayerChoice,
) -> Result<Choice, ChoiceRejection> {
    let mirror = battle.field.side(side);
    let kind = mirror.request;
    match kind {
        RequestKind::None => return Err(ChoiceRejection::NotRequested),
        RequestKind::Wait => return Err(ChoiceRejection::Waiting),
        RequestKind::Any | RequestKind::ForcedSwitch => {}
    }
    let request = battle.request(side).ok_or(ChoiceRejection::NotRequested)?;

    match *choice {
        PlayerChoice::Move {
            index,
            terastallize,
        } => {
            if kind == RequestKind::ForcedSwitch {
                return Err(ChoiceRejection::SwitchRequired);
            }
            if index == 0 || usize::from(index) > request.move_count() {
                return Err(ChoiceRejection::InvalidMove { index });
            }
            Ok(Choice::Move {
                index,
                terastallize,
            })
        }
        PlayerChoice::Switch { slot } => {
            if kind == RequestKind::Any && request.is_trapped() {
                return Err(ChoiceRejection::Trapped);
            }
            let unavailable = usize::from(slot) >= battle.names[side.index()].len()
                || mirror.active_slot() == Some(slot)
                || mirror
                    .pokemon(usize::from(slot))
                    .is_some_and(BattlePokemon::is_fainted);
            if unavailable {
                return Err(ChoiceRejection::InvalidSwitch { slot });
            }
            let position = mirror
                .position_of(slot)
                .ok_or(ChoiceRejection::InvalidSwitch { slot })?;
            Ok(Choice::Switch(position as u8 + 1))
        }
        PlayerChoice::Default => Ok(Choice::Default),
        // Routed to a forfeit before validation
        PlayerChoice::Forfeit => Err(ChoiceRejection::NotRequested),
    }
}
