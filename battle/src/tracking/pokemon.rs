//! One Pokemon as a replica sees it

use std::collections::HashSet;

use crate::roster::RosterHandle;
use crate::types::{PackedBoosts, Status, Volatile};
use crate::wire::{CompactDetails, CompactHp};

/// What a replica knows about a Pokemon it does not own
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientPokemon {
    /// `species == 0` until the Pokemon has been seen
    pub details: CompactDetails,
    pub hp: CompactHp,
    pub status: Option<Status>,
    /// `None` until revealed; `Some(0)` once known to hold nothing
    pub item: Option<u16>,
    pub ability: Option<u16>,
}

/// Where a mirror reads and writes its persistent fields
#[derive(Debug, Clone)]
pub enum MirrorSource {
    /// One of the replica owner's own Pokemon
    Owned(RosterHandle),
    /// An opposing Pokemon, or any Pokemon in an omniscient replica
    Transient(TransientPokemon),
}

/// A Pokemon in a replicated battle.
///
/// Persistent fields go through [`MirrorSource`]; battle-only state
/// (boosts, volatiles, a temporary forme) lives here and is dropped on switch-out.
#[derive(Debug, Clone)]
pub struct BattlePokemon {
    source: MirrorSource,
    forme: Option<CompactDetails>,
    boosts: PackedBoosts,
    volatiles: HashSet<Volatile>,
}

impl BattlePokemon {
    pub fn owned(handle: RosterHandle) -> Self {
        Self::with_source(MirrorSource::Owned(handle))
    }

    pub fn transient() -> Self {
        Self::with_source(MirrorSource::Transient(TransientPokemon::default()))
    }

    fn with_source(source: MirrorSource) -> Self {
        BattlePokemon {
            source,
            forme: None,
            boosts: PackedBoosts::new(),
            volatiles: HashSet::new(),
        }
    }

    pub fn source(&self) -> &MirrorSource {
        &self.source
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.source, MirrorSource::Owned(_))
    }

    /// Current appearance, including a temporary forme
    pub fn details(&self) -> CompactDetails {
        if let Some(forme) = self.forme {
            return forme;
        }
        self.base_details()
    }

    /// Appearance without any temporary forme
    pub fn base_details(&self) -> CompactDetails {
        match &self.source {
            MirrorSource::Owned(handle) => handle.read(|e| e.details()),
            MirrorSource::Transient(t) => t.details,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.base_details().species != 0
    }

    /// A temporary change is forgotten on switch-out; a permanent one is stored.
    pub fn set_details(&mut self, details: CompactDetails, permanent: bool) {
        if !permanent {
            self.forme = Some(details);
            return;
        }
        self.forme = None;
        match &mut self.source {
            MirrorSource::Owned(handle) => handle.update(|e| e.set_details(details)),
            MirrorSource::Transient(t) => t.details = details,
        }
    }

    /// `(hp, max)`; for owned Pokemon these are real values, otherwise the
    /// compact ones as received
    pub fn hp(&self) -> (u16, u16) {
        match &self.source {
            MirrorSource::Owned(handle) => handle.read(|e| (e.hp, e.max_hp)),
            MirrorSource::Transient(t) => (u16::from(t.hp.hp), u16::from(t.hp.max)),
        }
    }

    pub fn set_hp(&mut self, hp: CompactHp) {
        match &mut self.source {
            MirrorSource::Owned(handle) => handle.update(|e| {
                e.hp = merge_hp(hp, e.hp, e.max_hp);
            }),
            MirrorSource::Transient(t) => {
                t.hp.hp = hp.hp;
                if hp.max != 0 {
                    t.hp.max = hp.max;
                }
            }
        }
    }

    pub fn status(&self) -> Option<Status> {
        match &self.source {
            MirrorSource::Owned(handle) => handle.read(|e| e.status),
            MirrorSource::Transient(t) => t.status,
        }
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        match &mut self.source {
            MirrorSource::Owned(handle) => handle.update(|e| e.status = status),
            MirrorSource::Transient(t) => t.status = status,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.status() == Some(Status::Fainted)
    }

    pub fn item(&self) -> Option<u16> {
        match &self.source {
            MirrorSource::Owned(handle) => Some(handle.read(|e| e.item)),
            MirrorSource::Transient(t) => t.item,
        }
    }

    pub fn set_item(&mut self, item: u16) {
        match &mut self.source {
            MirrorSource::Owned(handle) => handle.update(|e| e.item = item),
            MirrorSource::Transient(t) => t.item = Some(item),
        }
    }

    pub fn ability(&self) -> Option<u16> {
        match &self.source {
            MirrorSource::Owned(handle) => Some(handle.read(|e| e.ability)),
            MirrorSource::Transient(t) => t.ability,
        }
    }

    pub fn set_ability(&mut self, ability: u16) {
        match &mut self.source {
            MirrorSource::Owned(handle) => handle.update(|e| e.ability = ability),
            MirrorSource::Transient(t) => t.ability = Some(ability),
        }
    }

    pub fn boosts(&self) -> PackedBoosts {
        self.boosts
    }

    pub fn boosts_mut(&mut self) -> &mut PackedBoosts {
        &mut self.boosts
    }

    pub fn volatiles(&self) -> &HashSet<Volatile> {
        &self.volatiles
    }

    pub fn has_volatile(&self, volatile: Volatile) -> bool {
        self.volatiles.contains(&volatile)
    }

    pub fn set_volatile(&mut self, volatile: Volatile, active: bool) {
        if active {
            self.volatiles.insert(volatile);
        } else {
            self.volatiles.remove(&volatile);
        }
    }

    /// Forget everything that only lasts while on the field
    pub fn clear_battle_state(&mut self) {
        self.forme = None;
        self.boosts.clear();
        self.volatiles.clear();
    }
}

/// Fold a compact HP reading into a record. A saturated reading says only
/// "at least 255", so a record already at or above that keeps its value.
fn merge_hp(hp: CompactHp, current: u16, real_max: u16) -> u16 {
    let value = u16::from(hp.hp);
    if hp.is_saturated() && current >= value {
        return current;
    }
    value.min(real_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterEntry;

    #[test]
    fn test_transient_defaults_unrevealed() {
        let pokemon = BattlePokemon::transient();
        assert!(!pokemon.is_revealed());
        assert!(!pokemon.is_owned());
        assert_eq!(pokemon.item(), None);
        assert_eq!(pokemon.ability(), None);
    }

    #[test]
    fn test_owned_writes_through_to_record() {
        let handle = RosterHandle::new(RosterEntry::new("Bulbasaur", 1, 5, 20));
        let mut pokemon = BattlePokemon::owned(handle.clone());

        pokemon.set_hp(CompactHp::new(12, 20));
        pokemon.set_status(Some(Status::Poison));
        pokemon.set_item(0);

        let entry = handle.snapshot();
        assert_eq!(entry.hp, 12);
        assert_eq!(entry.status, Some(Status::Poison));
        assert_eq!(entry.item, 0);
        assert_eq!(pokemon.hp(), (12, 20));
    }

    #[test]
    fn test_owned_hp_above_byte_range() {
        let handle = RosterHandle::new(RosterEntry::new("Blissey", 242, 100, 714));
        let mut pokemon = BattlePokemon::owned(handle.clone());

        pokemon.set_hp(CompactHp::from_values(600, 714));
        assert_eq!(handle.read(|e| e.hp), 714);

        pokemon.set_hp(CompactHp::from_values(100, 714));
        assert_eq!(handle.read(|e| e.hp), 100);

        pokemon.set_hp(CompactHp::fainted());
        assert_eq!(handle.read(|e| e.hp), 0);
    }

    #[test]
    fn test_transient_keeps_max_on_bare_faint() {
        let mut pokemon = BattlePokemon::transient();
        pokemon.set_hp(CompactHp::new(60, 100));
        pokemon.set_hp(CompactHp::fainted());
        assert_eq!(pokemon.hp(), (0, 100));
    }

    #[test]
    fn test_temporary_forme_cleared_on_switch_out() {
        let mut pokemon = BattlePokemon::transient();
        let base = CompactDetails {
            species: 10,
            level: 50,
            ..Default::default()
        };
        let forme = CompactDetails { species: 11, ..base };
        pokemon.set_details(base, true);
        pokemon.set_details(forme, false);
        assert_eq!(pokemon.details().species, 11);
        assert_eq!(pokemon.base_details().species, 10);

        pokemon.set_volatile(Volatile::Confusion, true);
        pokemon.boosts_mut().boost(crate::types::BoostStat::Atk, 2);
        pokemon.clear_battle_state();
        assert_eq!(pokemon.details().species, 10);
        assert!(pokemon.volatiles().is_empty());
        assert!(pokemon.boosts().is_clear());
    }
}
