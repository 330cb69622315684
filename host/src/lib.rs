//! Match negotiation and simulator bridging for two-participant battles.
//!
//! # Overview
//!
//! ```text
//! participants ──negotiation / choices──▶ BattleManager ──▶ Transport
//!                                             │  ▲
//!                              >start, >p1 …  │  │ BridgeEvent
//!                                             ▼  │
//!                                    simulator ──▶ bridge task (one per match)
//! ```
//!
//! The [`BattleManager`] runs as a single task and owns every session and
//! the [`MatchRegistry`]. Once both participants have picked a lead and
//! submitted a team it launches a simulator and a bridge task; the bridge
//! turns simulator output into action buffers for each audience, and the
//! manager applies them to the replicas and delivers them.
//!
//! # Main Types
//!
//! - [`BattleManager`] / [`ManagerHandle`] - the mediator and its cloneable handle
//! - [`NegotiationMessage`] - challenge, slot, team, tie and forfeit traffic
//! - [`RosterProvider`] - supplies a participant's roster and battle hooks
//! - [`Transport`] - where outbound [`Outbound`] messages go
//! - [`SimulatorLauncher`] - [`ProcessSimulator`] for real, [`MemoryLauncher`] in tests
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tandem_host::{BattleManager, ChannelTransport, HostConfig, MatchRegistry, ProcessSimulator};
//!
//! let config = HostConfig::load("host.json")?;
//! let dex = Arc::new(config.load_dex()?);
//! let launcher = Arc::new(ProcessSimulator::new(config.simulator.clone()));
//! let (transport, mut outbound) = ChannelTransport::new();
//!
//! let (manager, handle) = BattleManager::new(config, MatchRegistry::new(), launcher, dex, transport);
//! tokio::spawn(manager.run());
//!
//! handle.negotiate(challenge).await?;
//! while let Some((to, message)) = outbound.recv().await {
//!     println!("{} <- {:?}", to, message);
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod handle;
pub mod manager;
pub mod message;
pub mod participant;
pub mod registry;
pub mod roster;
pub mod simulator;
pub mod transport;

pub use bridge::{Broadcast, BridgeEvent, Outcome, Translator};
pub use config::{HostConfig, SimulatorConfig};
pub use error::{BridgeError, ChoiceRejection, NegotiationError};
pub use handle::{ManagerHandle, SessionState, SessionView};
pub use manager::{BattleManager, ManagerInput, PlayerChoice};
pub use message::{MessageBody, NegotiationMessage, TieKind};
pub use participant::{BattleClient, BattleParticipant, ClientState, ProviderKind};
pub use registry::{BattleInstance, MatchId, MatchRegistry, RunningBattle};
pub use roster::RosterProvider;
pub use simulator::{
    ChunkAssembler, MemoryLauncher, MemorySimulator, ProcessSimulator, SimulatorIo,
    SimulatorLauncher,
};
pub use transport::{ChannelTransport, Outbound, Transport};
