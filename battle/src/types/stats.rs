//! Stat stages packed into six signed 4-bit lanes

use serde::{Deserialize, Serialize};
use tandem_protocol::Stat;

pub const BOOST_MIN: i8 = -7;
pub const BOOST_MAX: i8 = 7;

/// A replicated boost lane. Evasion has no lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BoostStat {
    Atk = 0,
    Def = 1,
    Spa = 2,
    Spd = 3,
    Spe = 4,
    Accuracy = 5,
}

impl BoostStat {
    pub const ALL: [BoostStat; 6] = [
        BoostStat::Atk,
        BoostStat::Def,
        BoostStat::Spa,
        BoostStat::Spd,
        BoostStat::Spe,
        BoostStat::Accuracy,
    ];

    /// Bit for this lane in a lane mask
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn from_stat(stat: Stat) -> Option<Self> {
        match stat {
            Stat::Atk => Some(BoostStat::Atk),
            Stat::Def => Some(BoostStat::Def),
            Stat::Spa => Some(BoostStat::Spa),
            Stat::Spd => Some(BoostStat::Spd),
            Stat::Spe => Some(BoostStat::Spe),
            Stat::Accuracy => Some(BoostStat::Accuracy),
            Stat::Evasion => None,
        }
    }
}

/// Mask selecting every lane
pub const ALL_LANES: u8 = 0b0011_1111;

/// Six boost stages in the low 24 bits, lane `n` at bits `4n..4n+4`.
///
/// Values are kept in `BOOST_MIN..=BOOST_MAX`, so the raw nibble `0b1000`
/// never appears in a table built through this API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedBoosts(u32);

impl PackedBoosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the low 24 bits. A lane holding -8 is read back as -7.
    pub fn from_raw(raw: u32) -> Self {
        let mut boosts = PackedBoosts(raw & 0x00ff_ffff);
        for stat in BoostStat::ALL {
            let value = boosts.get(stat);
            boosts.set(stat, value);
        }
        boosts
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn get(&self, stat: BoostStat) -> i8 {
        let nibble = ((self.0 >> (stat as u32 * 4)) & 0xf) as i8;
        if nibble & 0x8 != 0 {
            nibble - 16
        } else {
            nibble
        }
    }

    /// Set a lane, saturating to the representable range
    pub fn set(&mut self, stat: BoostStat, value: i8) {
        let clamped = value.clamp(BOOST_MIN, BOOST_MAX);
        let shift = stat as u32 * 4;
        self.0 = (self.0 & !(0xf << shift)) | (((clamped as u8 & 0xf) as u32) << shift);
    }

    pub fn with(mut self, stat: BoostStat, value: i8) -> Self {
        self.set(stat, value);
        self
    }

    /// Add to a lane, returns the change actually applied
    pub fn boost(&mut self, stat: BoostStat, amount: i8) -> i8 {
        let current = self.get(stat);
        let next = current.saturating_add(amount).clamp(BOOST_MIN, BOOST_MAX);
        self.set(stat, next);
        next - current
    }

    /// Add `deltas` lane-wise for every lane in `mask`
    pub fn apply_delta(&mut self, deltas: PackedBoosts, mask: u8) {
        for stat in lanes(mask) {
            self.boost(stat, deltas.get(stat));
        }
    }

    /// Overwrite every lane in `mask` with the value from `values`
    pub fn assign(&mut self, values: PackedBoosts, mask: u8) {
        for stat in lanes(mask) {
            self.set(stat, values.get(stat));
        }
    }

    /// Exchange the lanes in `mask` with `other`
    pub fn swap_lanes(&mut self, other: &mut PackedBoosts, mask: u8) {
        for stat in lanes(mask) {
            let mine = self.get(stat);
            self.set(stat, other.get(stat));
            other.set(stat, mine);
        }
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn clear_positive(&mut self) {
        for stat in BoostStat::ALL {
            if self.get(stat) > 0 {
                self.set(stat, 0);
            }
        }
    }

    pub fn clear_negative(&mut self) {
        for stat in BoostStat::ALL {
            if self.get(stat) < 0 {
                self.set(stat, 0);
            }
        }
    }

    /// Topsy-Turvy
    pub fn invert(&mut self) {
        for stat in BoostStat::ALL {
            let value = self.get(stat);
            self.set(stat, -value);
        }
    }

    pub fn is_clear(&self) -> bool {
        self.0 == 0
    }

    /// Lanes holding a non-zero value
    pub fn nonzero_mask(&self) -> u8 {
        BoostStat::ALL
            .iter()
            .filter(|s| self.get(**s) != 0)
            .fold(0, |mask, s| mask | s.bit())
    }
}

/// Lanes selected by a mask, in lane order
pub fn lanes(mask: u8) -> impl Iterator<Item = BoostStat> {
    BoostStat::ALL
        .into_iter()
        .filter(move |s| mask & s.bit() != 0)
}
