//! Compact battle actions and the replicas that consume them.
//!
//! # Overview
//!
//! `tandem-battle` sits between the simulator's text protocol and the
//! participants of a match:
//!
//! ```text
//! tandem-protocol (simulator lines)
//!        │
//!        ▼
//! tandem-host (translation, one buffer per audience)
//!        │ action buffers
//!        ▼
//! tandem-battle (codec + replicas) ← THIS CRATE
//! ```
//!
//! # Main Types
//!
//! ## Wire
//! - [`Action`], [`ActionWriter`], [`decode_actions`] - the action stream
//! - [`PokemonRef`], [`CompactDetails`], [`CompactHp`] - payload encodings
//! - [`PackedBoosts`] - six stat stages in 24 bits
//!
//! ## Replication
//! - [`BattleField`] - two [`BattleSide`]s plus weather and field conditions
//! - [`BattlePokemon`] - a mirror over a [`MirrorSource`]
//! - [`Observer`] - hook for rendering applied actions
//!
//! ## Lookup
//! - [`Dex`], [`TableDex`] - names to wire ids
//!
//! # Example Usage
//!
//! ```ignore
//! use tandem_battle::{BattleField, Player};
//!
//! let mut field = BattleField::for_player(Player::P1, &party);
//! field.apply(&buffer, &mut ())?;
//!
//! if let Some(active) = field.me().and_then(|side| side.active()) {
//!     println!("HP {:?}", active.hp());
//! }
//! ```

pub mod codec;
pub mod dex;
pub mod roster;
pub mod tracking;
pub mod types;
pub mod wire;

pub use codec::{
    decode_actions, encode_actions, Action, ActionId, ActionReader, ActionWriter, BulkBoostOp,
    BulkTarget, DecodeError,
};
pub use dex::{to_id, Dex, TableDex};
pub use roster::{RosterEntry, RosterHandle};
pub use tracking::{
    BattleField, BattlePokemon, BattleSide, MirrorSource, Observer, RecordingObserver,
    RequestKind, TransientPokemon,
};
pub use types::{
    BoostStat, FieldCondition, PackedBoosts, SideCondition, SideConditionState, Status, Type,
    Volatile, Weather, ALL_LANES,
};
pub use wire::{CompactDetails, CompactHp, PokemonPairRef, PokemonRef, MAX_SPECIES_ID, SIDE_SLOTS};

pub use tandem_protocol::{Player, Stat};
