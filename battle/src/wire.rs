//! Fixed-width encodings used inside action payloads

use tandem_protocol::Player;

use crate::codec::DecodeError;
use crate::types::Type;

/// Slots per side
pub const SIDE_SLOTS: usize = 6;

/// Largest species id a details word can carry (11 bits)
pub const MAX_SPECIES_ID: u16 = (1 << 11) - 1;

/// Largest level a details word can carry (7 bits)
pub const MAX_LEVEL: u8 = (1 << 7) - 1;

fn side_from_number(n: u8) -> Result<Player, DecodeError> {
    match n {
        1 => Ok(Player::P1),
        2 => Ok(Player::P2),
        other => Err(DecodeError::InvalidSide(other)),
    }
}

fn side_number(player: Player) -> u8 {
    player.index() as u8 + 1
}

/// One Pokemon: side in the high nibble (1 or 2), team slot in the low nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PokemonRef {
    pub side: Player,
    pub slot: u8,
}

impl PokemonRef {
    pub fn new(side: Player, slot: usize) -> Option<Self> {
        (slot < SIDE_SLOTS).then_some(PokemonRef {
            side,
            slot: slot as u8,
        })
    }

    pub fn to_byte(self) -> u8 {
        (side_number(self.side) << 4) | (self.slot & 0x0f)
    }

    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let side = side_from_number(byte >> 4)?;
        let slot = byte & 0x0f;
        if usize::from(slot) >= SIDE_SLOTS {
            return Err(DecodeError::InvalidSlot(slot));
        }
        Ok(PokemonRef { side, slot })
    }

    fn to_nibble(self) -> u8 {
        ((self.side.index() as u8) << 3) | (self.slot & 0x07)
    }

    fn from_nibble(nibble: u8) -> Result<Self, DecodeError> {
        let side = if nibble & 0x08 == 0 {
            Player::P1
        } else {
            Player::P2
        };
        let slot = nibble & 0x07;
        if usize::from(slot) >= SIDE_SLOTS {
            return Err(DecodeError::InvalidSlot(slot));
        }
        Ok(PokemonRef { side, slot })
    }
}

/// Two Pokemon in one byte, each nibble `side_bit << 3 | slot`.
/// `source` sits in the high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PokemonPairRef {
    pub source: PokemonRef,
    pub target: PokemonRef,
}

impl PokemonPairRef {
    pub fn to_byte(self) -> u8 {
        (self.source.to_nibble() << 4) | self.target.to_nibble()
    }

    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        Ok(PokemonPairRef {
            source: PokemonRef::from_nibble(byte >> 4)?,
            target: PokemonRef::from_nibble(byte & 0x0f)?,
        })
    }
}

/// HP as two bytes. Values above 255 saturate, so totals past that are lossy.
///
/// `max == 0` leaves the receiver's maximum untouched, which is how a
/// bare "0 fnt" is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CompactHp {
    pub hp: u8,
    pub max: u8,
}

impl CompactHp {
    pub fn new(hp: u8, max: u8) -> Self {
        CompactHp { hp, max }
    }

    pub fn from_values(current: u32, max: u32) -> Self {
        CompactHp {
            hp: saturate(current),
            max: saturate(max),
        }
    }

    pub fn fainted() -> Self {
        CompactHp { hp: 0, max: 0 }
    }

    /// Whether `hp` may stand for a larger real value
    pub fn is_saturated(&self) -> bool {
        self.hp == u8::MAX
    }
}

fn saturate(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// Species, gender, shininess, level and Tera type in one little-endian u32.
///
/// | bits  | field                           |
/// |-------|---------------------------------|
/// | 0-10  | species id                      |
/// | 11-12 | gender (0 none, 1 male, 2 female) |
/// | 13    | shiny                           |
/// | 14-20 | level                           |
/// | 21-25 | Tera type id (0 none)           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactDetails {
    pub species: u16,
    pub gender: Option<char>,
    pub shiny: bool,
    pub level: u8,
    pub tera_type: Option<Type>,
}

impl Default for CompactDetails {
    fn default() -> Self {
        CompactDetails {
            species: 0,
            gender: None,
            shiny: false,
            level: 100,
            tera_type: None,
        }
    }
}

const GENDER_SHIFT: u32 = 11;
const SHINY_SHIFT: u32 = 13;
const LEVEL_SHIFT: u32 = 14;
const TERA_SHIFT: u32 = 21;
const USED_BITS: u32 = 26;

impl CompactDetails {
    /// Fields that do not fit are truncated; callers check `MAX_SPECIES_ID`.
    pub fn pack(&self) -> u32 {
        let gender = match self.gender {
            Some('M') => 1,
            Some('F') => 2,
            _ => 0,
        };
        u32::from(self.species & MAX_SPECIES_ID)
            | (gender << GENDER_SHIFT)
            | (u32::from(self.shiny) << SHINY_SHIFT)
            | (u32::from(self.level.min(MAX_LEVEL)) << LEVEL_SHIFT)
            | (u32::from(Type::wire_id(self.tera_type)) << TERA_SHIFT)
    }

    pub fn unpack(raw: u32) -> Result<Self, DecodeError> {
        if raw >> USED_BITS != 0 {
            return Err(DecodeError::InvalidDetails(raw));
        }
        let gender = match (raw >> GENDER_SHIFT) & 0b11 {
            0 => None,
            1 => Some('M'),
            2 => Some('F'),
            _ => return Err(DecodeError::InvalidDetails(raw)),
        };
        let tera = ((raw >> TERA_SHIFT) & 0x1f) as u8;
        Ok(CompactDetails {
            species: (raw & u32::from(MAX_SPECIES_ID)) as u16,
            gender,
            shiny: (raw >> SHINY_SHIFT) & 1 == 1,
            level: ((raw >> LEVEL_SHIFT) & u32::from(MAX_LEVEL)) as u8,
            tera_type: Type::from_wire(tera).map_err(DecodeError::UnknownType)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_ref() -> Vec<PokemonRef> {
        [Player::P1, Player::P2]
            .into_iter()
            .flat_map(|side| (0..SIDE_SLOTS).map(move |slot| PokemonRef::new(side, slot).unwrap()))
            .collect()
    }

    #[test]
    fn test_pokemon_ref_byte() {
        let r = PokemonRef::new(Player::P2, 3).unwrap();
        assert_eq!(r.to_byte(), 0x23);

        let refs = every_ref();
        assert_eq!(refs.len(), 12);
        for r in refs {
            assert_eq!(r.to_byte() >> 4, r.side.index() as u8 + 1);
            assert_eq!(PokemonRef::from_byte(r.to_byte()).unwrap(), r);
        }
        for slot in SIDE_SLOTS..20 {
            assert!(PokemonRef::new(Player::P1, slot).is_none());
            assert!(PokemonRef::new(Player::P2, slot).is_none());
        }
    }

    #[test]
    fn test_pokemon_ref_rejects_bad_bytes() {
        for slot in 0..16u8 {
            assert_eq!(PokemonRef::from_byte(slot), Err(DecodeError::InvalidSide(0)));
            assert_eq!(
                PokemonRef::from_byte(0x30 | slot),
                Err(DecodeError::InvalidSide(3))
            );
        }
        for side in [0x10, 0x20] {
            for slot in 6..16u8 {
                assert_eq!(
                    PokemonRef::from_byte(side | slot),
                    Err(DecodeError::InvalidSlot(slot))
                );
            }
        }
    }

    #[test]
    fn test_pair_ref_byte() {
        let pair = PokemonPairRef {
            source: PokemonRef::new(Player::P1, 2).unwrap(),
            target: PokemonRef::new(Player::P2, 5).unwrap(),
        };
        assert_eq!(pair.to_byte(), 0x2d);

        let refs = every_ref();
        let mut seen = std::collections::HashSet::new();
        for &source in &refs {
            for &target in &refs {
                let pair = PokemonPairRef { source, target };
                let byte = pair.to_byte();
                assert_eq!(PokemonPairRef::from_byte(byte).unwrap(), pair);
                assert!(seen.insert(byte), "{:?} collides", pair);
            }
        }
        assert_eq!(seen.len(), 144);
    }

    #[test]
    fn test_pair_ref_rejects_bad_slots() {
        for good in [0x0, 0x5, 0x8, 0xd] {
            for bad in [0x6, 0x7, 0xe, 0xf] {
                assert_eq!(
                    PokemonPairRef::from_byte((bad << 4) | good),
                    Err(DecodeError::InvalidSlot(bad & 0x07))
                );
                assert_eq!(
                    PokemonPairRef::from_byte((good << 4) | bad),
                    Err(DecodeError::InvalidSlot(bad & 0x07))
                );
            }
        }
    }

    #[test]
    fn test_compact_hp() {
        assert_eq!(CompactHp::from_values(20, 20), CompactHp::new(20, 20));
        assert_eq!(CompactHp::from_values(40, 120), CompactHp::new(40, 120));
        assert_eq!(CompactHp::from_values(300, 400), CompactHp::new(255, 255));
        assert_eq!(CompactHp::from_values(200, 400), CompactHp::new(200, 255));
        assert!(CompactHp::from_values(300, 400).is_saturated());
    }

    #[test]
    fn test_details_layout() {
        let details = CompactDetails {
            species: 25,
            gender: Some('F'),
            shiny: true,
            level: 50,
            tera_type: Some(Type::Electric),
        };
        let raw = details.pack();
        assert_eq!(raw & 0x7ff, 25);
        assert_eq!((raw >> 11) & 0b11, 2);
        assert_eq!((raw >> 13) & 1, 1);
        assert_eq!((raw >> 14) & 0x7f, 50);
        assert_eq!((raw >> 21) & 0x1f, Type::Electric as u32);
        assert_eq!(CompactDetails::unpack(raw).unwrap(), details);
    }

    #[test]
    fn test_details_rejects_garbage() {
        assert!(CompactDetails::unpack(1 << 30).is_err());
        assert!(CompactDetails::unpack(0b11 << 11).is_err());
        assert!(matches!(
            CompactDetails::unpack(25 << 21),
            Err(DecodeError::UnknownType(25))
        ));
    }
}
