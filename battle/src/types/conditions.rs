//! Weather, field-wide and per-side conditions
//!
//! Each enum's discriminant is its wire byte. For weather, 0 on the wire
//! means clear skies.

use serde::{Deserialize, Serialize};

use crate::dex::to_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weather {
    Sun = 1,
    Rain = 2,
    Sand = 3,
    Hail = 4,
    Snow = 5,
    HarshSun = 6,
    HeavyRain = 7,
    StrongWinds = 8,
}

impl Weather {
    /// Parse the effect of a `-weather` line. `none` and unknown names are `None`.
    pub fn from_protocol(s: &str) -> Option<Self> {
        match to_id(s).as_str() {
            "sunnyday" | "sun" => Some(Weather::Sun),
            "raindance" | "rain" => Some(Weather::Rain),
            "sandstorm" | "sand" => Some(Weather::Sand),
            "hail" => Some(Weather::Hail),
            "snow" | "snowscape" => Some(Weather::Snow),
            "desolateland" => Some(Weather::HarshSun),
            "primordialsea" => Some(Weather::HeavyRain),
            "deltastream" => Some(Weather::StrongWinds),
            _ => None,
        }
    }

    pub fn wire_id(weather: Option<Weather>) -> u8 {
        weather.map_or(0, |w| w as u8)
    }

    pub fn from_wire(byte: u8) -> Result<Option<Weather>, u8> {
        let weather = match byte {
            0 => return Ok(None),
            1 => Weather::Sun,
            2 => Weather::Rain,
            3 => Weather::Sand,
            4 => Weather::Hail,
            5 => Weather::Snow,
            6 => Weather::HarshSun,
            7 => Weather::HeavyRain,
            8 => Weather::StrongWinds,
            other => return Err(other),
        };
        Ok(Some(weather))
    }

    pub fn is_primal(&self) -> bool {
        matches!(
            self,
            Weather::HarshSun | Weather::HeavyRain | Weather::StrongWinds
        )
    }
}

/// Conditions that affect the whole field (`-fieldstart`/`-fieldend`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FieldCondition {
    ElectricTerrain = 1,
    GrassyTerrain = 2,
    MistyTerrain = 3,
    PsychicTerrain = 4,
    TrickRoom = 5,
    MagicRoom = 6,
    WonderRoom = 7,
    Gravity = 8,
    MudSport = 9,
    WaterSport = 10,
    FairyLock = 11,
    IonDeluge = 12,
}

impl FieldCondition {
    pub fn from_protocol(s: &str) -> Option<Self> {
        let clean = s.strip_prefix("move: ").unwrap_or(s);
        match to_id(clean).as_str() {
            "electricterrain" => Some(FieldCondition::ElectricTerrain),
            "grassyterrain" => Some(FieldCondition::GrassyTerrain),
            "mistyterrain" => Some(FieldCondition::MistyTerrain),
            "psychicterrain" => Some(FieldCondition::PsychicTerrain),
            "trickroom" => Some(FieldCondition::TrickRoom),
            "magicroom" => Some(FieldCondition::MagicRoom),
            "wonderroom" => Some(FieldCondition::WonderRoom),
            "gravity" => Some(FieldCondition::Gravity),
            "mudsport" => Some(FieldCondition::MudSport),
            "watersport" => Some(FieldCondition::WaterSport),
            "fairylock" => Some(FieldCondition::FairyLock),
            "iondeluge" => Some(FieldCondition::IonDeluge),
            _ => None,
        }
    }

    pub fn is_terrain(&self) -> bool {
        matches!(
            self,
            FieldCondition::ElectricTerrain
                | FieldCondition::GrassyTerrain
                | FieldCondition::MistyTerrain
                | FieldCondition::PsychicTerrain
        )
    }

    pub fn from_wire(byte: u8) -> Option<Self> {
        let condition = match byte {
            1 => FieldCondition::ElectricTerrain,
            2 => FieldCondition::GrassyTerrain,
            3 => FieldCondition::MistyTerrain,
            4 => FieldCondition::PsychicTerrain,
            5 => FieldCondition::TrickRoom,
            6 => FieldCondition::MagicRoom,
            7 => FieldCondition::WonderRoom,
            8 => FieldCondition::Gravity,
            9 => FieldCondition::MudSport,
            10 => FieldCondition::WaterSport,
            11 => FieldCondition::FairyLock,
            12 => FieldCondition::IonDeluge,
            _ => return None,
        };
        Some(condition)
    }
}

/// Side conditions (hazards, screens, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SideCondition {
    Reflect = 1,
    LightScreen = 2,
    AuroraVeil = 3,
    Spikes = 4,
    ToxicSpikes = 5,
    StealthRock = 6,
    StickyWeb = 7,
    Tailwind = 8,
    Safeguard = 9,
    Mist = 10,
    LuckyChant = 11,
    WideGuard = 12,
    QuickGuard = 13,
    MatBlock = 14,
    CraftyShield = 15,
}

impl SideCondition {
    pub fn from_protocol(s: &str) -> Option<Self> {
        let clean = s.strip_prefix("move: ").unwrap_or(s);
        match to_id(clean).as_str() {
            "reflect" => Some(SideCondition::Reflect),
            "lightscreen" => Some(SideCondition::LightScreen),
            "auroraveil" => Some(SideCondition::AuroraVeil),
            "spikes" => Some(SideCondition::Spikes),
            "toxicspikes" => Some(SideCondition::ToxicSpikes),
            "stealthrock" => Some(SideCondition::StealthRock),
            "stickyweb" => Some(SideCondition::StickyWeb),
            "tailwind" => Some(SideCondition::Tailwind),
            "safeguard" => Some(SideCondition::Safeguard),
            "mist" => Some(SideCondition::Mist),
            "luckychant" => Some(SideCondition::LuckyChant),
            "wideguard" => Some(SideCondition::WideGuard),
            "quickguard" => Some(SideCondition::QuickGuard),
            "matblock" => Some(SideCondition::MatBlock),
            "craftyshield" => Some(SideCondition::CraftyShield),
            _ => None,
        }
    }

    pub fn max_layers(&self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }

    pub fn from_wire(byte: u8) -> Option<Self> {
        let condition = match byte {
            1 => SideCondition::Reflect,
            2 => SideCondition::LightScreen,
            3 => SideCondition::AuroraVeil,
            4 => SideCondition::Spikes,
            5 => SideCondition::ToxicSpikes,
            6 => SideCondition::StealthRock,
            7 => SideCondition::StickyWeb,
            8 => SideCondition::Tailwind,
            9 => SideCondition::Safeguard,
            10 => SideCondition::Mist,
            11 => SideCondition::LuckyChant,
            12 => SideCondition::WideGuard,
            13 => SideCondition::QuickGuard,
            14 => SideCondition::MatBlock,
            15 => SideCondition::CraftyShield,
            _ => return None,
        };
        Some(condition)
    }
}

/// Layer count of an active side condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConditionState {
    pub layers: u8,
}

impl SideConditionState {
    pub fn new() -> Self {
        Self { layers: 1 }
    }

    /// Add a layer, capped at the condition's maximum. Returns whether it grew.
    pub fn add_layer(&mut self, condition: SideCondition) -> bool {
        if self.layers < condition.max_layers() {
            self.layers += 1;
            true
        } else {
            false
        }
    }
}

impl Default for SideConditionState {
    fn default() -> Self {
        Self::new()
    }
}
