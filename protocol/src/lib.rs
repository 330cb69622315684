use thiserror::Error;

pub mod command;
pub mod sim;

pub use command::{Choice, PlayerOptions, SimCommand, StartOptions};
pub use sim::{
    ActivePokemon, BattleRequest, ChoiceError, ChoiceErrorCategory, ChoiceErrorKind, HpStatus,
    MoveSlot, Player, Pokemon, PokemonDetails, Side, SideInfo, SidePokemon, SimChunk,
    SimMessage, Stat, UpdateLine, parse_sim_chunk, parse_sim_message,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}
