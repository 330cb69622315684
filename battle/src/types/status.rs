//! Status conditions (volatile and non-volatile)

use serde::{Deserialize, Serialize};

use crate::dex::to_id;

/// Non-volatile status. `Fainted` is carried alongside the real statuses
/// because the simulator reports it in the same position ("0 fnt").
///
/// The discriminant is the wire byte; 0 means "no status".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    Burn = 1,
    Freeze = 2,
    Paralysis = 3,
    Poison = 4,
    BadPoison = 5,
    Sleep = 6,
    Fainted = 7,
}

impl Status {
    /// Parse from protocol string ("brn", "frz", "par", "psn", "tox", "slp", "fnt")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::BadPoison),
            "slp" => Some(Status::Sleep),
            "fnt" => Some(Status::Fainted),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
            Status::Fainted => "fnt",
        }
    }

    pub fn wire_id(status: Option<Status>) -> u8 {
        status.map_or(0, |s| s as u8)
    }

    /// `Ok(None)` for byte 0, `Err(byte)` for anything unassigned
    pub fn from_wire(byte: u8) -> Result<Option<Status>, u8> {
        let status = match byte {
            0 => return Ok(None),
            1 => Status::Burn,
            2 => Status::Freeze,
            3 => Status::Paralysis,
            4 => Status::Poison,
            5 => Status::BadPoison,
            6 => Status::Sleep,
            7 => Status::Fainted,
            other => return Err(other),
        };
        Ok(Some(status))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_protocol())
    }
}

/// Volatile conditions that can be replicated.
///
/// Every variant has a fixed wire id (its discriminant). There is no
/// catch-all: a volatile that does not map here is not sent at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Volatile {
    Confusion = 1,
    Taunt = 2,
    Encore = 3,
    Disable = 4,
    Torment = 5,
    Attract = 6,
    FocusEnergy = 7,
    LaserFocus = 8,
    LeechSeed = 9,
    Curse = 10,
    PerishSong = 11,
    Nightmare = 12,
    Substitute = 13,
    Yawn = 14,
    Bide = 15,
    Uproar = 16,
    MagnetRise = 17,
    Telekinesis = 18,
    SmackDown = 19,
    Ingrain = 20,
    AquaRing = 21,
    FlashFire = 22,
    SlowStart = 23,
    GastroAcid = 24,
    Imprison = 25,
    Stockpile = 26,
    PowerTrick = 27,
    Autotomize = 28,
    Electrify = 29,
    Embargo = 30,
    HealBlock = 31,
    Foresight = 32,
    MiracleEye = 33,
    TypeChange = 34,
    Octolock = 35,
    TarShot = 36,
    NoRetreat = 37,
    SaltCure = 38,
    SyrupBomb = 39,
    ThroatChop = 40,
    Charge = 41,
    Protosynthesis = 42,
    QuarkDrive = 43,
    Dynamax = 44,
    PartialTrap = 45,
}

impl Volatile {
    pub const ALL: [Volatile; 45] = [
        Volatile::Confusion,
        Volatile::Taunt,
        Volatile::Encore,
        Volatile::Disable,
        Volatile::Torment,
        Volatile::Attract,
        Volatile::FocusEnergy,
        Volatile::LaserFocus,
        Volatile::LeechSeed,
        Volatile::Curse,
        Volatile::PerishSong,
        Volatile::Nightmare,
        Volatile::Substitute,
        Volatile::Yawn,
        Volatile::Bide,
        Volatile::Uproar,
        Volatile::MagnetRise,
        Volatile::Telekinesis,
        Volatile::SmackDown,
        Volatile::Ingrain,
        Volatile::AquaRing,
        Volatile::FlashFire,
        Volatile::SlowStart,
        Volatile::GastroAcid,
        Volatile::Imprison,
        Volatile::Stockpile,
        Volatile::PowerTrick,
        Volatile::Autotomize,
        Volatile::Electrify,
        Volatile::Embargo,
        Volatile::HealBlock,
        Volatile::Foresight,
        Volatile::MiracleEye,
        Volatile::TypeChange,
        Volatile::Octolock,
        Volatile::TarShot,
        Volatile::NoRetreat,
        Volatile::SaltCure,
        Volatile::SyrupBomb,
        Volatile::ThroatChop,
        Volatile::Charge,
        Volatile::Protosynthesis,
        Volatile::QuarkDrive,
        Volatile::Dynamax,
        Volatile::PartialTrap,
    ];

    /// Map a `-start`/`-end` effect string. Returns `None` for effects the
    /// wire format has no id for.
    pub fn from_protocol(effect: &str) -> Option<Self> {
        let clean = effect
            .strip_prefix("move: ")
            .or_else(|| effect.strip_prefix("ability: "))
            .or_else(|| effect.strip_prefix("item: "))
            .unwrap_or(effect);
        let id = to_id(clean);

        // Counters and boosted-stat suffixes
        if id.starts_with("perish") {
            return Some(Volatile::PerishSong);
        }
        if id.starts_with("stockpile") {
            return Some(Volatile::Stockpile);
        }
        if id.starts_with("protosynthesis") {
            return Some(Volatile::Protosynthesis);
        }
        if id.starts_with("quarkdrive") {
            return Some(Volatile::QuarkDrive);
        }

        let volatile = match id.as_str() {
            "confusion" => Volatile::Confusion,
            "taunt" => Volatile::Taunt,
            "encore" => Volatile::Encore,
            "disable" => Volatile::Disable,
            "torment" => Volatile::Torment,
            "attract" => Volatile::Attract,
            "focusenergy" => Volatile::FocusEnergy,
            "laserfocus" => Volatile::LaserFocus,
            "leechseed" => Volatile::LeechSeed,
            "curse" => Volatile::Curse,
            "nightmare" => Volatile::Nightmare,
            "substitute" => Volatile::Substitute,
            "yawn" => Volatile::Yawn,
            "bide" => Volatile::Bide,
            "uproar" => Volatile::Uproar,
            "magnetrise" => Volatile::MagnetRise,
            "telekinesis" => Volatile::Telekinesis,
            "smackdown" => Volatile::SmackDown,
            "ingrain" => Volatile::Ingrain,
            "aquaring" => Volatile::AquaRing,
            "flashfire" => Volatile::FlashFire,
            "slowstart" => Volatile::SlowStart,
            "gastroacid" => Volatile::GastroAcid,
            "imprison" => Volatile::Imprison,
            "powertrick" => Volatile::PowerTrick,
            "autotomize" => Volatile::Autotomize,
            "electrify" => Volatile::Electrify,
            "embargo" => Volatile::Embargo,
            "healblock" => Volatile::HealBlock,
            "foresight" | "odorsleuth" => Volatile::Foresight,
            "miracleeye" => Volatile::MiracleEye,
            "typechange" => Volatile::TypeChange,
            "octolock" => Volatile::Octolock,
            "tarshot" => Volatile::TarShot,
            "noretreat" => Volatile::NoRetreat,
            "saltcure" => Volatile::SaltCure,
            "syrupbomb" => Volatile::SyrupBomb,
            "throatchop" => Volatile::ThroatChop,
            "charge" => Volatile::Charge,
            "dynamax" => Volatile::Dynamax,
            "bind" | "wrap" | "firespin" | "clamp" | "whirlpool" | "sandtomb" | "magmastorm"
            | "infestation" | "snaptrap" | "thundercage" => Volatile::PartialTrap,
            _ => return None,
        };
        Some(volatile)
    }

    pub fn wire_id(self) -> u8 {
        self as u8
    }

    pub fn from_wire(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.wire_id() == byte)
    }
}
