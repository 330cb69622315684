//! Value types shared by the codec and the replicas

mod conditions;
mod pokemon_type;
mod stats;
mod status;

pub use conditions::{FieldCondition, SideCondition, SideConditionState, Weather};
pub use pokemon_type::Type;
pub use stats::{lanes, BoostStat, PackedBoosts, ALL_LANES, BOOST_MAX, BOOST_MIN};
pub use status::{Status, Volatile};
