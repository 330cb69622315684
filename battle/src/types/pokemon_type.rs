//! Types, as far as replication needs them: the Tera type in a details word

use serde::{Deserialize, Serialize};

/// Discriminants are the 5-bit wire ids; 0 is reserved for "no Tera type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Type {
    Normal = 1,
    Fire = 2,
    Water = 3,
    Electric = 4,
    Grass = 5,
    Ice = 6,
    Fighting = 7,
    Poison = 8,
    Ground = 9,
    Flying = 10,
    Psychic = 11,
    Bug = 12,
    Rock = 13,
    Ghost = 14,
    Dragon = 15,
    Dark = 16,
    Steel = 17,
    Fairy = 18,
    Stellar = 19,
}

impl Type {
    pub const ALL: [Type; 19] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
        Type::Stellar,
    ];

    /// Parse from protocol string (case-insensitive)
    pub fn from_protocol(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
            Type::Stellar => "Stellar",
        }
    }

    pub fn wire_id(ty: Option<Type>) -> u8 {
        ty.map_or(0, |t| t as u8)
    }

    pub fn from_wire(byte: u8) -> Result<Option<Type>, u8> {
        if byte == 0 {
            return Ok(None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|t| *t as u8 == byte)
            .map(Some)
            .ok_or(byte)
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_protocol() {
        assert_eq!(Type::from_protocol("Fire"), Some(Type::Fire));
        assert_eq!(Type::from_protocol("fairy"), Some(Type::Fairy));
        assert_eq!(Type::from_protocol("Stellar"), Some(Type::Stellar));
        assert_eq!(Type::from_protocol("???"), None);
    }

    #[test]
    fn test_type_wire_ids_fit_five_bits() {
        for ty in Type::ALL {
            let id = Type::wire_id(Some(ty));
            assert!(id > 0 && id < 32);
            assert_eq!(Type::from_wire(id), Ok(Some(ty)));
        }
        assert_eq!(Type::from_wire(0), Ok(None));
        assert_eq!(Type::from_wire(20), Err(20));
    }
}
