//! Client-side replication: state rebuilt from action buffers

mod field;
mod observer;
mod pokemon;
mod side;

pub use field::BattleField;
pub use observer::{Observer, RecordingObserver};
pub use pokemon::{BattlePokemon, MirrorSource, TransientPokemon};
pub use side::{BattleSide, RequestKind};
