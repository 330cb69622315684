//! Team submission format for the battle simulator.
//!
//! A team is submitted as a packed string: one entry per roster member,
//! entries joined with `]`, fields within an entry joined with `|`.
//!
//! ```text
//! NICKNAME|SPECIES|ITEM|ABILITY|MOVES|NATURE|EVS|GENDER|IVS|SHINY|LEVEL|HAPPINESS,HPTYPE,BALL,GMAX,DMAXLEVEL,TERATYPE
//! ```
//!
//! Blank fields take the simulator defaults, so the common case stays short.

mod order;
mod packed;

use thiserror::Error;

pub use order::{lead_order, reorder_for_lead};
pub use packed::{PackedSet, StatSpread, pack_team, unpack_team};

/// Largest roster the simulator accepts
pub const MAX_TEAM_SIZE: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeamError {
    #[error("Team string is empty")]
    Empty,

    #[error("Team has {0} entries, at most {MAX_TEAM_SIZE} are allowed")]
    TooManyEntries(usize),

    #[error("Entry {index} has {found} fields, expected 11 or 12")]
    FieldCount { index: usize, found: usize },

    #[error("Entry {index} has an invalid {field}: {value:?}")]
    InvalidField {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Lead slot {slot} is outside a team of {len}")]
    LeadOutOfRange { slot: usize, len: usize },
}
