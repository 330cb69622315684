use tandem_protocol::Player;

use super::{flags, Action, ActionId, BulkBoostOp, BulkTarget, DecodeError};
use crate::types::{FieldCondition, PackedBoosts, SideCondition, Status, Volatile, Weather};
use crate::wire::{CompactDetails, CompactHp, PokemonPairRef, PokemonRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    Ended,
    Failed,
}

/// Streaming decoder. Yields actions until `End`, then `None`.
/// After the first error the reader yields nothing more.
#[derive(Debug, Clone)]
pub struct ActionReader<'a> {
    buf: &'a [u8],
    pos: usize,
    state: State,
}

impl<'a> ActionReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ActionReader {
            buf,
            pos: 0,
            state: State::Reading,
        }
    }

    /// Whether the `End` marker has been consumed
    pub fn is_finished(&self) -> bool {
        self.state == State::Ended
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    fn take(&mut self, action: ActionId, n: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.buf.len() - self.pos;
        if remaining < n {
            return Err(DecodeError::Truncated {
                action,
                needed: n,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn u8(&mut self, action: ActionId) -> Result<u8, DecodeError> {
        Ok(self.take(action, 1)?[0])
    }

    fn u16(&mut self, action: ActionId) -> Result<u16, DecodeError> {
        let b = self.take(action, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u24(&mut self, action: ActionId) -> Result<u32, DecodeError> {
        let b = self.take(action, 3)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], 0]))
    }

    fn u32(&mut self, action: ActionId) -> Result<u32, DecodeError> {
        let b = self.take(action, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn pokemon(&mut self, action: ActionId) -> Result<PokemonRef, DecodeError> {
        PokemonRef::from_byte(self.u8(action)?)
    }

    fn pair(&mut self, action: ActionId) -> Result<PokemonPairRef, DecodeError> {
        PokemonPairRef::from_byte(self.u8(action)?)
    }

    fn details(&mut self, action: ActionId) -> Result<CompactDetails, DecodeError> {
        CompactDetails::unpack(self.u32(action)?)
    }

    fn next_action(&mut self) -> Result<Option<Action>, DecodeError> {
        let Some(&id_byte) = self.buf.get(self.pos) else {
            return Err(DecodeError::MissingEnd);
        };
        self.pos += 1;

        let id = ActionId::from_byte(id_byte).ok_or(DecodeError::UnknownAction(id_byte))?;
        if id == ActionId::End {
            return Ok(None);
        }
        if id == ActionId::Transform {
            return Err(DecodeError::Unsupported(id));
        }

        let flag_byte = self.u8(id)?;
        check_flags(id, flag_byte)?;
        let has = |flag: u8| flag_byte & flag != 0;

        let action = match id {
            ActionId::PokemonDetails => Action::PokemonDetails {
                pokemon: self.pokemon(id)?,
                details: self.details(id)?,
                permanent: has(flags::DETAILS_PERMANENT),
            },
            ActionId::SetHp => {
                let pokemon = self.pokemon(id)?;
                let hp = self.u8(id)?;
                let max = self.u8(id)?;
                Action::SetHp {
                    pokemon,
                    hp: CompactHp::new(hp, max),
                    direct: has(flags::HP_DIRECT),
                    heal: has(flags::HP_HEAL),
                }
            }
            ActionId::MoveAnimation => {
                let user = self.pokemon(id)?;
                let target = if has(flags::MOVE_HAS_TARGET) {
                    Some(self.pokemon(id)?)
                } else {
                    None
                };
                let move_id = self.u16(id)?;
                if move_id == 0 {
                    return Err(DecodeError::UnmappedMove);
                }
                Action::MoveAnimation {
                    user,
                    target,
                    move_id,
                    miss: has(flags::MOVE_MISS),
                    still: has(flags::MOVE_STILL),
                }
            }
            ActionId::SwitchPokemon => Action::SwitchPokemon {
                pokemon: self.pokemon(id)?,
                details: self.details(id)?,
                drag: has(flags::SWITCH_DRAG),
            },
            ActionId::ActionFail => Action::ActionFail {
                pokemon: self.pokemon(id)?,
                miss: has(flags::FAIL_MISS),
            },
            ActionId::SetStatus => {
                let pokemon = self.pokemon(id)?;
                let byte = self.u8(id)?;
                let status = Status::from_wire(byte).map_err(DecodeError::UnknownStatus)?;
                if has(flags::STATUS_CURE) != status.is_none() {
                    return Err(DecodeError::InvalidFlags {
                        action: id,
                        flags: flag_byte,
                    });
                }
                Action::SetStatus {
                    pokemon,
                    status,
                    team: has(flags::STATUS_TEAM),
                }
            }
            ActionId::Boost => self.boost(flag_byte)?,
            ActionId::BulkBoost => {
                let target = if has(flags::BULK_ALL_ACTIVE) {
                    BulkTarget::AllActive
                } else {
                    BulkTarget::One(self.pokemon(id)?)
                };
                Action::BulkBoost {
                    op: BulkBoostOp::from_bits(flag_byte),
                    target,
                }
            }
            ActionId::Turn => Action::Turn(self.u16(id)?),
            ActionId::Weather => {
                let byte = self.u8(id)?;
                Action::Weather(Weather::from_wire(byte).map_err(DecodeError::UnknownWeather)?)
            }
            ActionId::FieldCondition => {
                let byte = self.u8(id)?;
                Action::FieldCondition {
                    condition: FieldCondition::from_wire(byte)
                        .ok_or(DecodeError::UnknownFieldCondition(byte))?,
                    active: !has(flags::CONDITION_END),
                }
            }
            ActionId::SideCondition if has(flags::SIDE_SWAP) => Action::SwapSideConditions,
            ActionId::SideCondition => {
                let side_byte = self.u8(id)?;
                let side = side_byte
                    .checked_sub(1)
                    .and_then(|i| Player::from_index(usize::from(i)))
                    .ok_or(DecodeError::InvalidSide(side_byte))?;
                let byte = self.u8(id)?;
                Action::SideCondition {
                    side,
                    condition: SideCondition::from_wire(byte)
                        .ok_or(DecodeError::UnknownSideCondition(byte))?,
                    active: !has(flags::CONDITION_END),
                }
            }
            ActionId::Volatile => {
                let pokemon = self.pokemon(id)?;
                let byte = self.u8(id)?;
                Action::Volatile {
                    pokemon,
                    volatile: Volatile::from_wire(byte).ok_or(DecodeError::UnknownVolatile(byte))?,
                    active: !has(flags::CONDITION_END),
                }
            }
            ActionId::ItemReveal => Action::ItemReveal {
                pokemon: self.pokemon(id)?,
                item: self.u16(id)?,
                consumed: has(flags::ITEM_CONSUMED),
            },
            ActionId::AbilityReveal => Action::AbilityReveal {
                pokemon: self.pokemon(id)?,
                ability: self.u16(id)?,
            },
            ActionId::End | ActionId::Transform => return Err(DecodeError::Unsupported(id)),
        };

        Ok(Some(action))
    }

    fn boost(&mut self, flag_byte: u8) -> Result<Action, DecodeError> {
        let id = ActionId::Boost;
        let action = match flag_byte {
            0 | flags::BOOST_SET => {
                let pokemon = self.pokemon(id)?;
                let mask = self.u8(id)?;
                let boosts = PackedBoosts::from_raw(self.u24(id)?);
                if flag_byte == flags::BOOST_SET {
                    Action::BoostSet {
                        pokemon,
                        mask,
                        boosts,
                    }
                } else {
                    Action::BoostDelta {
                        pokemon,
                        mask,
                        boosts,
                    }
                }
            }
            flags::BOOST_SWAP => Action::BoostSwap {
                pair: self.pair(id)?,
                mask: self.u8(id)?,
            },
            flags::BOOST_COPY => Action::BoostCopy {
                pair: self.pair(id)?,
            },
            _ => {
                return Err(DecodeError::InvalidFlags {
                    action: id,
                    flags: flag_byte,
                })
            }
        };
        Ok(action)
    }
}

fn check_flags(id: ActionId, flag_byte: u8) -> Result<(), DecodeError> {
    let allowed = match id {
        ActionId::PokemonDetails => flags::DETAILS_PERMANENT,
        ActionId::SetHp => flags::HP_DIRECT | flags::HP_HEAL,
        ActionId::MoveAnimation => flags::MOVE_HAS_TARGET | flags::MOVE_MISS | flags::MOVE_STILL,
        ActionId::SwitchPokemon => flags::SWITCH_DRAG,
        ActionId::ActionFail => flags::FAIL_MISS,
        ActionId::SetStatus => flags::STATUS_CURE | flags::STATUS_TEAM,
        ActionId::Boost => flags::BOOST_SET | flags::BOOST_SWAP | flags::BOOST_COPY,
        ActionId::BulkBoost => flags::BULK_OP_MASK | flags::BULK_ALL_ACTIVE,
        ActionId::FieldCondition | ActionId::Volatile => flags::CONDITION_END,
        ActionId::SideCondition => flags::CONDITION_END | flags::SIDE_SWAP,
        ActionId::ItemReveal => flags::ITEM_CONSUMED,
        _ => 0,
    };
    if flag_byte & !allowed != 0 {
        return Err(DecodeError::InvalidFlags {
            action: id,
            flags: flag_byte,
        });
    }
    Ok(())
}

impl Iterator for ActionReader<'_> {
    type Item = Result<Action, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Reading {
            return None;
        }
        match self.next_action() {
            Ok(Some(action)) => Some(Ok(action)),
            Ok(None) => {
                self.state = State::Ended;
                None
            }
            Err(e) => {
                self.state = State::Failed;
                Some(Err(e))
            }
        }
    }
}

/// Decode a whole buffer. Fails unless it holds exactly one `End`-terminated stream.
pub fn decode_actions(buf: &[u8]) -> Result<Vec<Action>, DecodeError> {
    let mut reader = ActionReader::new(buf);
    let actions = reader.by_ref().collect::<Result<Vec<_>, _>>()?;

    let trailing = reader.remaining().len();
    if trailing > 0 {
        return Err(DecodeError::TrailingBytes(trailing));
    }
    Ok(actions)
}
