use super::{flags, Action, ActionId, BulkTarget};
use crate::types::{Status, Weather};

/// Accumulates actions into a buffer. `finish` appends the `End` marker.
#[derive(Debug, Default, Clone)]
pub struct ActionWriter {
    buf: Vec<u8>,
    count: usize,
}

impl ActionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn push(&mut self, action: &Action) {
        self.count += 1;
        match action {
            Action::PokemonDetails {
                pokemon,
                details,
                permanent,
            } => {
                self.header(ActionId::PokemonDetails, bit(*permanent, flags::DETAILS_PERMANENT));
                self.u8(pokemon.to_byte());
                self.u32(details.pack());
            }
            Action::SetHp {
                pokemon,
                hp,
                direct,
                heal,
            } => {
                self.header(
                    ActionId::SetHp,
                    bit(*direct, flags::HP_DIRECT) | bit(*heal, flags::HP_HEAL),
                );
                self.u8(pokemon.to_byte());
                self.u8(hp.hp);
                self.u8(hp.max);
            }
            Action::MoveAnimation {
                user,
                target,
                move_id,
                miss,
                still,
            } => {
                self.header(
                    ActionId::MoveAnimation,
                    bit(target.is_some(), flags::MOVE_HAS_TARGET)
                        | bit(*miss, flags::MOVE_MISS)
                        | bit(*still, flags::MOVE_STILL),
                );
                self.u8(user.to_byte());
                if let Some(target) = target {
                    self.u8(target.to_byte());
                }
                self.u16(*move_id);
            }
            Action::SwitchPokemon {
                pokemon,
                details,
                drag,
            } => {
                self.header(ActionId::SwitchPokemon, bit(*drag, flags::SWITCH_DRAG));
                self.u8(pokemon.to_byte());
                self.u32(details.pack());
            }
            Action::ActionFail { pokemon, miss } => {
                self.header(ActionId::ActionFail, bit(*miss, flags::FAIL_MISS));
                self.u8(pokemon.to_byte());
            }
            Action::SetStatus {
                pokemon,
                status,
                team,
            } => {
                self.header(
                    ActionId::SetStatus,
                    bit(status.is_none(), flags::STATUS_CURE) | bit(*team, flags::STATUS_TEAM),
                );
                self.u8(pokemon.to_byte());
                self.u8(Status::wire_id(*status));
            }
            Action::BoostDelta {
                pokemon,
                mask,
                boosts,
            } => {
                self.header(ActionId::Boost, 0);
                self.u8(pokemon.to_byte());
                self.u8(*mask);
                self.u24(boosts.raw());
            }
            Action::BoostSet {
                pokemon,
                mask,
                boosts,
            } => {
                self.header(ActionId::Boost, flags::BOOST_SET);
                self.u8(pokemon.to_byte());
                self.u8(*mask);
                self.u24(boosts.raw());
            }
            Action::BoostSwap { pair, mask } => {
                self.header(ActionId::Boost, flags::BOOST_SWAP);
                self.u8(pair.to_byte());
                self.u8(*mask);
            }
            Action::BoostCopy { pair } => {
                self.header(ActionId::Boost, flags::BOOST_COPY);
                self.u8(pair.to_byte());
            }
            Action::BulkBoost { op, target } => match target {
                BulkTarget::One(pokemon) => {
                    self.header(ActionId::BulkBoost, *op as u8);
                    self.u8(pokemon.to_byte());
                }
                BulkTarget::AllActive => {
                    self.header(ActionId::BulkBoost, *op as u8 | flags::BULK_ALL_ACTIVE);
                }
            },
            Action::Turn(turn) => {
                self.header(ActionId::Turn, 0);
                self.u16(*turn);
            }
            Action::Weather(weather) => {
                self.header(ActionId::Weather, 0);
                self.u8(Weather::wire_id(*weather));
            }
            Action::FieldCondition { condition, active } => {
                self.header(ActionId::FieldCondition, bit(!active, flags::CONDITION_END));
                self.u8(*condition as u8);
            }
            Action::SideCondition {
                side,
                condition,
                active,
            } => {
                self.header(ActionId::SideCondition, bit(!active, flags::CONDITION_END));
                self.u8(side.index() as u8 + 1);
                self.u8(*condition as u8);
            }
            Action::SwapSideConditions => {
                self.header(ActionId::SideCondition, flags::SIDE_SWAP);
            }
            Action::Volatile {
                pokemon,
                volatile,
                active,
            } => {
                self.header(ActionId::Volatile, bit(!active, flags::CONDITION_END));
                self.u8(pokemon.to_byte());
                self.u8(volatile.wire_id());
            }
            Action::ItemReveal {
                pokemon,
                item,
                consumed,
            } => {
                self.header(ActionId::ItemReveal, bit(*consumed, flags::ITEM_CONSUMED));
                self.u8(pokemon.to_byte());
                self.u16(*item);
            }
            Action::AbilityReveal { pokemon, ability } => {
                self.header(ActionId::AbilityReveal, 0);
                self.u8(pokemon.to_byte());
                self.u16(*ability);
            }
        }
    }

    /// Terminate the stream and hand back the bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.push(ActionId::End as u8);
        self.buf
    }

    fn header(&mut self, id: ActionId, flags: u8) {
        self.buf.push(id as u8);
        self.buf.push(flags);
    }

    fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn u24(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes()[..3]);
    }

    fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }
}

fn bit(set: bool, flag: u8) -> u8 {
    if set {
        flag
    } else {
        0
    }
}

pub fn encode_actions<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Vec<u8> {
    let mut writer = ActionWriter::new();
    for action in actions {
        writer.push(action);
    }
    writer.finish()
}
