//! Compact battle action stream
//!
//! A buffer is a sequence of `(action id: u8, flags: u8, payload)` records
//! closed by a lone `End` id. Multi-byte integers are little-endian.
//!
//! | id | action          | flags                                   | payload                        |
//! |----|-----------------|-----------------------------------------|--------------------------------|
//! | 0  | End             |                                         |                                |
//! | 1  | PokemonDetails  | permanent                               | ref, details u32               |
//! | 2  | SetHp           | direct, heal                            | ref, hp u8, max u8             |
//! | 3  | MoveAnimation   | has target, miss, still                 | user ref, [target ref], move u16 |
//! | 4  | SwitchPokemon   | drag                                    | ref, details u32               |
//! | 5  | ActionFail      | miss                                    | ref                            |
//! | 6  | SetStatus       | cure, whole team                        | ref, status u8                 |
//! | 7  | Boost           | set, swap, copy                         | see [`Action`]                 |
//! | 8  | BulkBoost       | op (2 bits), all actives                | [ref]                          |
//! | 9  | Turn            |                                         | turn u16                       |
//! | 10 | Weather         |                                         | weather u8                     |
//! | 11 | FieldCondition  | end                                     | condition u8                   |
//! | 12 | SideCondition   | end, swap sides                         | side u8, condition u8          |
//! | 13 | Volatile        | end                                     | ref, volatile u8               |
//! | 14 | ItemReveal      | consumed                                | ref, item u16                  |
//! | 15 | AbilityReveal   |                                         | ref, ability u16               |
//! | 16 | Transform       | reserved, never produced                |                                |

mod reader;
mod tests;
mod writer;

pub use reader::{decode_actions, ActionReader};
pub use writer::{encode_actions, ActionWriter};

use tandem_protocol::Player;
use thiserror::Error;

use crate::types::{FieldCondition, PackedBoosts, SideCondition, Status, Volatile, Weather};
use crate::wire::{CompactDetails, CompactHp, PokemonPairRef, PokemonRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionId {
    End = 0,
    PokemonDetails = 1,
    SetHp = 2,
    MoveAnimation = 3,
    SwitchPokemon = 4,
    ActionFail = 5,
    SetStatus = 6,
    Boost = 7,
    BulkBoost = 8,
    Turn = 9,
    Weather = 10,
    FieldCondition = 11,
    SideCondition = 12,
    Volatile = 13,
    ItemReveal = 14,
    AbilityReveal = 15,
    Transform = 16,
}

impl ActionId {
    pub fn from_byte(byte: u8) -> Option<Self> {
        let id = match byte {
            0 => ActionId::End,
            1 => ActionId::PokemonDetails,
            2 => ActionId::SetHp,
            3 => ActionId::MoveAnimation,
            4 => ActionId::SwitchPokemon,
            5 => ActionId::ActionFail,
            6 => ActionId::SetStatus,
            7 => ActionId::Boost,
            8 => ActionId::BulkBoost,
            9 => ActionId::Turn,
            10 => ActionId::Weather,
            11 => ActionId::FieldCondition,
            12 => ActionId::SideCondition,
            13 => ActionId::Volatile,
            14 => ActionId::ItemReveal,
            15 => ActionId::AbilityReveal,
            16 => ActionId::Transform,
            _ => return None,
        };
        Some(id)
    }
}

/// Flag bits, grouped by the action they belong to
pub mod flags {
    pub const DETAILS_PERMANENT: u8 = 1 << 0;

    pub const HP_DIRECT: u8 = 1 << 0;
    pub const HP_HEAL: u8 = 1 << 1;

    pub const MOVE_HAS_TARGET: u8 = 1 << 0;
    pub const MOVE_MISS: u8 = 1 << 1;
    pub const MOVE_STILL: u8 = 1 << 2;

    pub const SWITCH_DRAG: u8 = 1 << 0;

    pub const FAIL_MISS: u8 = 1 << 0;

    pub const STATUS_CURE: u8 = 1 << 0;
    pub const STATUS_TEAM: u8 = 1 << 1;

    pub const BOOST_SET: u8 = 1 << 0;
    pub const BOOST_SWAP: u8 = 1 << 1;
    pub const BOOST_COPY: u8 = 1 << 2;

    pub const BULK_OP_MASK: u8 = 0b11;
    pub const BULK_ALL_ACTIVE: u8 = 1 << 2;

    pub const CONDITION_END: u8 = 1 << 0;
    pub const SIDE_SWAP: u8 = 1 << 1;

    pub const ITEM_CONSUMED: u8 = 1 << 0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BulkBoostOp {
    Clear = 0,
    Invert = 1,
    ClearPositive = 2,
    ClearNegative = 3,
}

impl BulkBoostOp {
    fn from_bits(bits: u8) -> Self {
        match bits & flags::BULK_OP_MASK {
            0 => BulkBoostOp::Clear,
            1 => BulkBoostOp::Invert,
            2 => BulkBoostOp::ClearPositive,
            _ => BulkBoostOp::ClearNegative,
        }
    }

    pub fn apply(self, boosts: &mut PackedBoosts) {
        match self {
            BulkBoostOp::Clear => boosts.clear(),
            BulkBoostOp::Invert => boosts.invert(),
            BulkBoostOp::ClearPositive => boosts.clear_positive(),
            BulkBoostOp::ClearNegative => boosts.clear_negative(),
        }
    }
}

/// Whom a bulk boost operation affects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkTarget {
    One(PokemonRef),
    AllActive,
}

/// One replicated state change
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Appearance change. Temporary unless `permanent`.
    PokemonDetails {
        pokemon: PokemonRef,
        details: CompactDetails,
        permanent: bool,
    },
    /// `direct` marks damage not caused by an attack, `heal` a recovery
    SetHp {
        pokemon: PokemonRef,
        hp: CompactHp,
        direct: bool,
        heal: bool,
    },
    MoveAnimation {
        user: PokemonRef,
        target: Option<PokemonRef>,
        move_id: u16,
        miss: bool,
        still: bool,
    },
    SwitchPokemon {
        pokemon: PokemonRef,
        details: CompactDetails,
        drag: bool,
    },
    ActionFail {
        pokemon: PokemonRef,
        miss: bool,
    },
    /// `team` applies the status to every Pokemon on the side that has not fainted
    SetStatus {
        pokemon: PokemonRef,
        status: Option<Status>,
        team: bool,
    },
    /// Add `boosts` to the lanes in `mask`
    BoostDelta {
        pokemon: PokemonRef,
        mask: u8,
        boosts: PackedBoosts,
    },
    /// Overwrite the lanes in `mask`
    BoostSet {
        pokemon: PokemonRef,
        mask: u8,
        boosts: PackedBoosts,
    },
    BoostSwap {
        pair: PokemonPairRef,
        mask: u8,
    },
    /// Copy every lane from `pair.source` to `pair.target`
    BoostCopy {
        pair: PokemonPairRef,
    },
    BulkBoost {
        op: BulkBoostOp,
        target: BulkTarget,
    },
    Turn(u16),
    Weather(Option<Weather>),
    FieldCondition {
        condition: FieldCondition,
        active: bool,
    },
    SideCondition {
        side: Player,
        condition: SideCondition,
        active: bool,
    },
    /// Court Change: every side condition trades sides
    SwapSideConditions,
    Volatile {
        pokemon: PokemonRef,
        volatile: Volatile,
        active: bool,
    },
    ItemReveal {
        pokemon: PokemonRef,
        item: u16,
        consumed: bool,
    },
    AbilityReveal {
        pokemon: PokemonRef,
        ability: u16,
    },
}

impl Action {
    pub fn id(&self) -> ActionId {
        match self {
            Action::PokemonDetails { .. } => ActionId::PokemonDetails,
            Action::SetHp { .. } => ActionId::SetHp,
            Action::MoveAnimation { .. } => ActionId::MoveAnimation,
            Action::SwitchPokemon { .. } => ActionId::SwitchPokemon,
            Action::ActionFail { .. } => ActionId::ActionFail,
            Action::SetStatus { .. } => ActionId::SetStatus,
            Action::BoostDelta { .. }
            | Action::BoostSet { .. }
            | Action::BoostSwap { .. }
            | Action::BoostCopy { .. } => ActionId::Boost,
            Action::BulkBoost { .. } => ActionId::BulkBoost,
            Action::Turn(_) => ActionId::Turn,
            Action::Weather(_) => ActionId::Weather,
            Action::FieldCondition { .. } => ActionId::FieldCondition,
            Action::SideCondition { .. } | Action::SwapSideConditions => ActionId::SideCondition,
            Action::Volatile { .. } => ActionId::Volatile,
            Action::ItemReveal { .. } => ActionId::ItemReveal,
            Action::AbilityReveal { .. } => ActionId::AbilityReveal,
        }
    }

    /// Pokemon the action is about, when it is about exactly one
    pub fn subject(&self) -> Option<PokemonRef> {
        match self {
            Action::PokemonDetails { pokemon, .. }
            | Action::SetHp { pokemon, .. }
            | Action::SwitchPokemon { pokemon, .. }
            | Action::ActionFail { pokemon, .. }
            | Action::SetStatus { pokemon, .. }
            | Action::BoostDelta { pokemon, .. }
            | Action::BoostSet { pokemon, .. }
            | Action::Volatile { pokemon, .. }
            | Action::ItemReveal { pokemon, .. }
            | Action::AbilityReveal { pokemon, .. } => Some(*pokemon),
            Action::MoveAnimation { user, .. } => Some(*user),
            Action::BulkBoost {
                target: BulkTarget::One(pokemon),
                ..
            } => Some(*pokemon),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown action id {0}")]
    UnknownAction(u8),

    #[error("{0:?} actions are reserved and cannot be decoded")]
    Unsupported(ActionId),

    #[error("{action:?} payload truncated: needed {needed} more bytes, {remaining} left")]
    Truncated {
        action: ActionId,
        needed: usize,
        remaining: usize,
    },

    #[error("buffer ended without an End action")]
    MissingEnd,

    #[error("{0} bytes after the End action")]
    TrailingBytes(usize),

    #[error("invalid side {0}")]
    InvalidSide(u8),

    #[error("invalid team slot {0}")]
    InvalidSlot(u8),

    #[error("invalid details word {0:#010x}")]
    InvalidDetails(u32),

    #[error("invalid flags {flags:#04x} for {action:?}")]
    InvalidFlags { action: ActionId, flags: u8 },

    #[error("move animation without a move id")]
    UnmappedMove,

    #[error("unknown status {0}")]
    UnknownStatus(u8),

    #[error("unknown volatile {0}")]
    UnknownVolatile(u8),

    #[error("unknown weather {0}")]
    UnknownWeather(u8),

    #[error("unknown field condition {0}")]
    UnknownFieldCondition(u8),

    #[error("unknown side condition {0}")]
    UnknownSideCondition(u8),

    #[error("unknown type {0}")]
    UnknownType(u8),
}
