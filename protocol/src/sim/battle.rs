//! Shared value types appearing inside simulator lines

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Side of a two-player battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
        }
    }

    /// 0 for p1, 1 for p2
    pub fn index(&self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::P1),
            1 => Some(Player::P2),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pokemon identifier in the form "POSITION: NAME" (e.g., "p1a: Pikachu")
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    pub player: Player,
    /// Position letter for active Pokemon, None when the ident has no position ("p1: Pikachu")
    pub position: Option<char>,
    pub name: String,
}

impl Pokemon {
    pub fn parse(s: &str) -> Option<Self> {
        let (pos_part, name) = s.split_once(": ")?;
        let player = Player::parse(pos_part.get(..2)?)?;
        let position = pos_part.chars().nth(2);

        Some(Pokemon {
            player,
            position,
            name: name.to_string(),
        })
    }
}

/// Pokemon details string (species, level, gender, shiny, tera)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PokemonDetails {
    pub species: String,
    pub level: Option<u8>,
    pub gender: Option<char>,
    pub shiny: bool,
    pub tera_type: Option<String>,
}

impl PokemonDetails {
    /// Parse a details string like "Pikachu, L50, M, shiny, tera:Electric"
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split(", ");
        let mut details = PokemonDetails {
            species: parts.next().unwrap_or_default().to_string(),
            ..Default::default()
        };

        for part in parts {
            match part {
                "M" => details.gender = Some('M'),
                "F" => details.gender = Some('F'),
                "shiny" => details.shiny = true,
                _ => {
                    if let Some(level) = part.strip_prefix('L') {
                        details.level = level.parse().ok();
                    } else if let Some(tera) = part.strip_prefix("tera:") {
                        details.tera_type = Some(tera.to_string());
                    }
                }
            }
        }

        details
    }
}

/// HP and status condition (e.g., "100/100", "50/100 slp", "0 fnt")
#[derive(Debug, Clone, PartialEq)]
pub struct HpStatus {
    pub current: u32,
    /// Absent for fainted Pokemon ("0 fnt")
    pub max: Option<u32>,
    pub status: Option<String>,
}

impl HpStatus {
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let hp_part = parts.next()?;
        let status = parts.next().map(str::to_string);

        let (current, max) = match hp_part.split_once('/') {
            Some((current, max)) => (current.parse().ok()?, Some(max.parse().ok()?)),
            None => (hp_part.parse().ok()?, None),
        };

        Some(HpStatus {
            current,
            max,
            status,
        })
    }

    pub fn is_fainted(&self) -> bool {
        self.status.as_deref() == Some("fnt")
    }
}

/// Boostable stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }
}

/// Side of the field in side-condition lines ("p1: Alice")
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub player: Player,
    pub raw: String,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        Some(Side {
            player: Player::parse(s.get(..2)?)?,
            raw: s.to_string(),
        })
    }
}

pub fn parse_pokemon(parts: &[&str], index: usize) -> Result<Pokemon, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| Pokemon::parse(s))
        .ok_or_else(|| ParseError::MissingField("pokemon".to_string()).into())
}

pub fn parse_player(parts: &[&str], index: usize) -> Result<Player, anyhow::Error> {
    parts
        .get(index)
        .and_then(|s| Player::parse(s))
        .ok_or_else(|| ParseError::MissingField("player".to_string()).into())
}

pub fn parse_details(parts: &[&str], index: usize) -> PokemonDetails {
    parts
        .get(index)
        .map(|s| PokemonDetails::parse(s))
        .unwrap_or_default()
}

pub fn parse_hp_status(parts: &[&str], index: usize) -> Option<HpStatus> {
    parts.get(index).and_then(|s| HpStatus::parse(s))
}

/// Value of the first `[from] EFFECT` tag, if any
pub fn parse_from_tag(parts: &[&str]) -> Option<String> {
    parts
        .iter()
        .find_map(|p| p.strip_prefix("[from] ").map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_ident() {
        let p = Pokemon::parse("p2a: Mr. Mime").unwrap();
        assert_eq!(p.player, Player::P2);
        assert_eq!(p.position, Some('a'));
        assert_eq!(p.name, "Mr. Mime");

        let inactive = Pokemon::parse("p1: Pikachu").unwrap();
        assert_eq!(inactive.position, None);

        assert!(Pokemon::parse("p3a: Pikachu").is_none());
        assert!(Pokemon::parse("Pikachu").is_none());
    }

    #[test]
    fn test_details() {
        let d = PokemonDetails::parse("Garchomp, L50, F, shiny, tera:Ground");
        assert_eq!(d.species, "Garchomp");
        assert_eq!(d.level, Some(50));
        assert_eq!(d.gender, Some('F'));
        assert!(d.shiny);
        assert_eq!(d.tera_type.as_deref(), Some("Ground"));

        let plain = PokemonDetails::parse("Bulbasaur");
        assert_eq!(plain.level, None);
        assert!(!plain.shiny);
    }

    #[test]
    fn test_hp_status() {
        let hp = HpStatus::parse("20/20").unwrap();
        assert_eq!((hp.current, hp.max, hp.status), (20, Some(20), None));

        let par = HpStatus::parse("43/100 par").unwrap();
        assert_eq!(par.status.as_deref(), Some("par"));

        let fainted = HpStatus::parse("0 fnt").unwrap();
        assert!(fainted.is_fainted());
        assert_eq!(fainted.max, None);

        assert!(HpStatus::parse("").is_none());
        assert!(HpStatus::parse("abc/20").is_none());
    }

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::P1.opponent(), Player::P2);
        assert_eq!(Player::from_index(1), Some(Player::P2));
        assert_eq!(Player::from_index(2), None);
    }
}
