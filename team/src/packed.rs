//! Packed set encoding and decoding

use serde::{Deserialize, Serialize};

use crate::{MAX_TEAM_SIZE, TeamError};

const DEFAULT_IV: u8 = 31;
const DEFAULT_LEVEL: u8 = 100;
const DEFAULT_HAPPINESS: u8 = 255;
const DEFAULT_DYNAMAX_LEVEL: u8 = 10;

/// Six-stat spread in HP/Atk/Def/SpA/SpD/Spe order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatSpread {
    pub hp: u8,
    pub atk: u8,
    pub def: u8,
    pub spa: u8,
    pub spd: u8,
    pub spe: u8,
}

impl StatSpread {
    /// Every stat set to the same value
    pub const fn uniform(value: u8) -> Self {
        Self {
            hp: value,
            atk: value,
            def: value,
            spa: value,
            spd: value,
            spe: value,
        }
    }

    fn values(&self) -> [u8; 6] {
        [self.hp, self.atk, self.def, self.spa, self.spd, self.spe]
    }

    fn from_values(v: [u8; 6]) -> Self {
        Self {
            hp: v[0],
            atk: v[1],
            def: v[2],
            spa: v[3],
            spd: v[4],
            spe: v[5],
        }
    }

    /// Pack as comma-separated values, blank where the value equals `default`.
    /// The whole field is blank when every stat is the default.
    fn pack(&self, default: u8) -> String {
        if self.values().iter().all(|v| *v == default) {
            return String::new();
        }
        self.values()
            .iter()
            .map(|v| if *v == default { String::new() } else { v.to_string() })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn unpack(s: &str, default: u8, index: usize, field: &'static str) -> Result<Self, TeamError> {
        if s.is_empty() {
            return Ok(Self::uniform(default));
        }

        let mut values = [default; 6];
        for (slot, part) in s.split(',').enumerate() {
            if slot >= 6 {
                return Err(invalid(index, field, s));
            }
            if !part.is_empty() {
                values[slot] = part.parse().map_err(|_| invalid(index, field, s))?;
            }
        }
        Ok(Self::from_values(values))
    }
}

/// One roster entry in the simulator's packed team format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedSet {
    pub nickname: String,
    pub species: String,
    pub item: String,
    pub ability: String,
    pub moves: Vec<String>,
    pub nature: String,
    pub evs: StatSpread,
    pub gender: Option<char>,
    pub ivs: StatSpread,
    pub shiny: bool,
    pub level: u8,
    pub happiness: u8,
    pub hidden_power_type: String,
    pub ball: String,
    pub gigantamax: bool,
    pub dynamax_level: u8,
    pub tera_type: String,
}

impl Default for PackedSet {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            species: String::new(),
            item: String::new(),
            ability: String::new(),
            moves: Vec::new(),
            nature: String::new(),
            evs: StatSpread::default(),
            gender: None,
            ivs: StatSpread::uniform(DEFAULT_IV),
            shiny: false,
            level: DEFAULT_LEVEL,
            happiness: DEFAULT_HAPPINESS,
            hidden_power_type: String::new(),
            ball: String::new(),
            gigantamax: false,
            dynamax_level: DEFAULT_DYNAMAX_LEVEL,
            tera_type: String::new(),
        }
    }
}

impl PackedSet {
    /// Create a set for a species with every other field at its default
    pub fn new(species: impl Into<String>) -> Self {
        let species = species.into();
        Self {
            nickname: species.clone(),
            species,
            ..Self::default()
        }
    }

    /// Name the simulator uses in `p1a: NAME` identifiers
    pub fn name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.species
        } else {
            &self.nickname
        }
    }

    /// Serialize to one packed entry (no trailing `]`)
    pub fn pack(&self) -> String {
        let species = if self.species == self.nickname {
            ""
        } else {
            self.species.as_str()
        };

        let mut fields: Vec<String> = vec![
            self.nickname.clone(),
            species.to_string(),
            self.item.clone(),
            self.ability.clone(),
            self.moves.join(","),
            self.nature.clone(),
            self.evs.pack(0),
            self.gender.map(String::from).unwrap_or_default(),
            self.ivs.pack(DEFAULT_IV),
            if self.shiny { "S".to_string() } else { String::new() },
            if self.level == DEFAULT_LEVEL {
                String::new()
            } else {
                self.level.to_string()
            },
        ];

        let mut misc = if self.happiness == DEFAULT_HAPPINESS {
            String::new()
        } else {
            self.happiness.to_string()
        };
        if self.has_extended_misc() {
            let dmax = if self.dynamax_level == DEFAULT_DYNAMAX_LEVEL {
                String::new()
            } else {
                self.dynamax_level.to_string()
            };
            misc.push_str(&format!(
                ",{},{},{},{},{}",
                self.hidden_power_type,
                self.ball,
                if self.gigantamax { "G" } else { "" },
                dmax,
                self.tera_type
            ));
        }
        fields.push(misc);

        fields.join("|")
    }

    fn has_extended_misc(&self) -> bool {
        !self.hidden_power_type.is_empty()
            || !self.ball.is_empty()
            || self.gigantamax
            || self.dynamax_level != DEFAULT_DYNAMAX_LEVEL
            || !self.tera_type.is_empty()
    }

    /// Parse one packed entry. `index` is only used for error reporting.
    pub fn unpack(s: &str, index: usize) -> Result<Self, TeamError> {
        let fields: Vec<&str> = s.split('|').collect();
        if fields.len() != 11 && fields.len() != 12 {
            return Err(TeamError::FieldCount {
                index,
                found: fields.len(),
            });
        }

        let nickname = fields[0].to_string();
        let species = if fields[1].is_empty() {
            nickname.clone()
        } else {
            fields[1].to_string()
        };
        if species.is_empty() {
            return Err(invalid(index, "species", fields[1]));
        }

        let moves = if fields[4].is_empty() {
            Vec::new()
        } else {
            fields[4].split(',').map(str::to_string).collect()
        };

        let gender = match fields[7] {
            "" => None,
            "M" => Some('M'),
            "F" => Some('F'),
            "N" => None,
            other => return Err(invalid(index, "gender", other)),
        };

        let level = if fields[10].is_empty() {
            DEFAULT_LEVEL
        } else {
            fields[10]
                .parse()
                .map_err(|_| invalid(index, "level", fields[10]))?
        };

        let mut set = PackedSet {
            nickname,
            species,
            item: fields[2].to_string(),
            ability: fields[3].to_string(),
            moves,
            nature: fields[5].to_string(),
            evs: StatSpread::unpack(fields[6], 0, index, "evs")?,
            gender,
            ivs: StatSpread::unpack(fields[8], DEFAULT_IV, index, "ivs")?,
            shiny: !fields[9].is_empty(),
            level,
            ..PackedSet::default()
        };

        if let Some(misc) = fields.get(11) {
            set.apply_misc(misc, index)?;
        }

        Ok(set)
    }

    fn apply_misc(&mut self, misc: &str, index: usize) -> Result<(), TeamError> {
        let parts: Vec<&str> = misc.splitn(6, ',').collect();

        if let Some(happiness) = parts.first().filter(|s| !s.is_empty()) {
            self.happiness = happiness
                .parse()
                .map_err(|_| invalid(index, "happiness", happiness))?;
        }
        if let Some(hp_type) = parts.get(1) {
            self.hidden_power_type = hp_type.to_string();
        }
        if let Some(ball) = parts.get(2) {
            self.ball = ball.to_string();
        }
        if let Some(gmax) = parts.get(3) {
            self.gigantamax = !gmax.is_empty();
        }
        if let Some(dmax) = parts.get(4).filter(|s| !s.is_empty()) {
            self.dynamax_level = dmax
                .parse()
                .map_err(|_| invalid(index, "dynamax level", dmax))?;
        }
        if let Some(tera) = parts.get(5) {
            self.tera_type = tera.to_string();
        }

        Ok(())
    }
}

fn invalid(index: usize, field: &'static str, value: &str) -> TeamError {
    TeamError::InvalidField {
        index,
        field,
        value: value.to_string(),
    }
}

/// Join sets into a packed team string
pub fn pack_team(sets: &[PackedSet]) -> String {
    sets.iter().map(PackedSet::pack).collect::<Vec<_>>().join("]")
}

/// Split a packed team string into its sets
pub fn unpack_team(team: &str) -> Result<Vec<PackedSet>, TeamError> {
    let team = team.trim();
    if team.is_empty() {
        return Err(TeamError::Empty);
    }

    let sets = team
        .split(']')
        .enumerate()
        .map(|(index, entry)| PackedSet::unpack(entry, index))
        .collect::<Result<Vec<_>, _>>()?;

    if sets.len() > MAX_TEAM_SIZE {
        return Err(TeamError::TooManyEntries(sets.len()));
    }

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GARCHOMP: &str =
        "Chompy|Garchomp|Choice Scarf|Rough Skin|Earthquake,Outrage,Stone Edge,Fire Fang|Jolly|,252,,,4,252|M||S|50|,,,,,Ground";

    #[test]
    fn test_unpack_full_entry() {
        let set = PackedSet::unpack(GARCHOMP, 0).unwrap();

        assert_eq!(set.nickname, "Chompy");
        assert_eq!(set.species, "Garchomp");
        assert_eq!(set.item, "Choice Scarf");
        assert_eq!(set.moves.len(), 4);
        assert_eq!(set.moves[1], "Outrage");
        assert_eq!(set.evs.atk, 252);
        assert_eq!(set.evs.hp, 0);
        assert_eq!(set.evs.spd, 4);
        assert_eq!(set.ivs, StatSpread::uniform(31));
        assert_eq!(set.gender, Some('M'));
        assert!(set.shiny);
        assert_eq!(set.level, 50);
        assert_eq!(set.happiness, 255);
        assert_eq!(set.tera_type, "Ground");
    }

    #[test]
    fn test_blank_species_takes_nickname() {
        let set = PackedSet::unpack("Pikachu||Light Ball|Static|Thunderbolt|Timid|||||", 0).unwrap();

        assert_eq!(set.species, "Pikachu");
        assert_eq!(set.name(), "Pikachu");
        assert_eq!(set.level, 100);
        assert!(!set.shiny);
    }

    #[test]
    fn test_pack_omits_defaults() {
        let set = PackedSet::new("Bulbasaur");
        assert_eq!(set.pack(), "Bulbasaur|||||||||||");
    }

    #[test]
    fn test_pack_then_unpack_preserves_set() {
        let set = PackedSet::unpack(GARCHOMP, 0).unwrap();
        let again = PackedSet::unpack(&set.pack(), 0).unwrap();

        assert_eq!(set, again);
    }

    #[test]
    fn test_partial_ivs() {
        let set = PackedSet::unpack("Ferrothorn||||Gyro Ball|Relaxed||F|,,,,,0|||", 0).unwrap();
        assert_eq!(set.ivs.spe, 0);
        assert_eq!(set.ivs.hp, 31);
        assert_eq!(set.gender, Some('F'));
    }

    #[test]
    fn test_unpack_team() {
        let team = format!("{}]Pikachu|||Static|Thunderbolt|||||||", GARCHOMP);
        let sets = unpack_team(&team).unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].species, "Pikachu");
        assert_eq!(pack_team(&sets), team);
    }

    #[test]
    fn test_unpack_team_empty() {
        assert_eq!(unpack_team("  "), Err(TeamError::Empty));
    }

    #[test]
    fn test_unpack_team_too_many() {
        let entry = "Pikachu||||||||||";
        let team = vec![entry; 7].join("]");

        assert_eq!(unpack_team(&team), Err(TeamError::TooManyEntries(7)));
    }

    #[test]
    fn test_unpack_bad_field_count() {
        let result = PackedSet::unpack("Pikachu|Pikachu", 3);
        assert_eq!(result, Err(TeamError::FieldCount { index: 3, found: 2 }));
    }

    #[test]
    fn test_unpack_bad_level() {
        let result = PackedSet::unpack("Pikachu||||||||||abc", 0);
        assert!(matches!(
            result,
            Err(TeamError::InvalidField { field: "level", .. })
        ));
    }

    #[test]
    fn test_set_serializes_with_serde() {
        let set = PackedSet::new("Eevee");
        let json = serde_json::to_string(&set).unwrap();
        let back: PackedSet = serde_json::from_str(&json).unwrap();

        assert_eq!(set, back);
    }
}
