use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use tokio::sync::{mpsc, oneshot};

use crate::manager::{ManagerInput, PlayerChoice};
use crate::message::NegotiationMessage;
use crate::participant::{BattleClient, BattleParticipant, ClientState};
use crate::roster::RosterProvider;

/// Snapshot of every session, written by the mediator after each input
pub struct SessionState {
    pub clients: RwLock<HashMap<BattleParticipant, BattleClient>>,
    pub providers: RwLock<HashMap<BattleParticipant, Arc<dyn RosterProvider>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            providers: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of one participant's session
#[derive(Clone)]
pub struct SessionView {
    pub participant: BattleParticipant,
    pub provider: Option<Arc<dyn RosterProvider>>,
    pub client: BattleClient,
}

/// Cloneable handle to a running [`BattleManager`](crate::BattleManager)
#[derive(Clone)]
pub struct ManagerHandle {
    tx: mpsc::Sender<ManagerInput>,
    sessions: Arc<SessionState>,
}

impl ManagerHandle {
    pub fn new(tx: mpsc::Sender<ManagerInput>, sessions: Arc<SessionState>) -> Self {
        Self { tx, sessions }
    }

    async fn send(&self, input: ManagerInput) -> Result<()> {
        self.tx
            .send(input)
            .await
            .map_err(|_| anyhow!("Mediator stopped"))
    }

    pub async fn register(&self, provider: Arc<dyn RosterProvider>) -> Result<()> {
        self.send(ManagerInput::Register(provider)).await
    }

    pub async fn negotiate(&self, message: NegotiationMessage) -> Result<()> {
        self.send(ManagerInput::Negotiation(message)).await
    }

    pub async fn choose(&self, participant: BattleParticipant, choice: PlayerChoice) -> Result<()> {
        self.send(ManagerInput::Choice { participant, choice }).await
    }

    /// Resolves once everything sent before it has been handled
    pub async fn flush(&self) -> Result<()> {
        let (done, wait) = oneshot::channel();
        self.send(ManagerInput::Flush(done)).await?;
        wait.await.map_err(|_| anyhow!("Mediator stopped"))
    }

    /// Stop every match and the mediator itself
    pub async fn shutdown(&self) -> Result<()> {
        self.send(ManagerInput::Shutdown).await
    }

    pub fn session(&self, participant: BattleParticipant) -> Option<SessionView> {
        let client = self.sessions.clients.read().ok()?.get(&participant).cloned()?;
        let provider = self
            .sessions
            .providers
            .read()
            .ok()
            .and_then(|p| p.get(&participant).cloned());
        Some(SessionView {
            participant,
            provider,
            client,
        })
    }

    pub fn state(&self, participant: BattleParticipant) -> ClientState {
        self.sessions
            .clients
            .read()
            .ok()
            .and_then(|c| c.get(&participant).map(|client| client.state))
            .unwrap_or_default()
    }

    pub fn in_match(&self, participant: BattleParticipant) -> bool {
        self.state(participant).is_engaged()
    }

    pub fn participants(&self) -> Vec<BattleParticipant> {
        self.sessions
            .clients
            .read()
            .map(|c| c.keys().copied().collect())
            .unwrap_or_default()
    }
}
