//! Persistent party records shared with a replica
//!
//! A client's own Pokemon outlive any single battle. The replica writes HP,
//! status and revealed details straight into these records, so whatever
//! owns the party sees the result once the battle is over.

use std::sync::{Arc, PoisonError, RwLock};

use crate::types::{Status, Type};
use crate::wire::CompactDetails;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Nickname, or the species name when there is none
    pub name: String,
    pub species: u16,
    pub level: u8,
    pub gender: Option<char>,
    pub shiny: bool,
    pub tera_type: Option<Type>,
    pub hp: u16,
    pub max_hp: u16,
    pub status: Option<Status>,
    /// Dex item id, 0 for none
    pub item: u16,
    pub ability: u16,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, species: u16, level: u8, max_hp: u16) -> Self {
        RosterEntry {
            name: name.into(),
            species,
            level,
            gender: None,
            shiny: false,
            tera_type: None,
            hp: max_hp,
            max_hp,
            status: None,
            item: 0,
            ability: 0,
        }
    }

    pub fn details(&self) -> CompactDetails {
        CompactDetails {
            species: self.species,
            gender: self.gender,
            shiny: self.shiny,
            level: self.level,
            tera_type: self.tera_type,
        }
    }

    pub fn set_details(&mut self, details: CompactDetails) {
        self.species = details.species;
        self.gender = details.gender;
        self.shiny = details.shiny;
        self.level = details.level;
        self.tera_type = details.tera_type;
    }

    pub fn is_fainted(&self) -> bool {
        self.status == Some(Status::Fainted)
    }
}

/// Shared handle to one [`RosterEntry`]. Clones point at the same record.
#[derive(Debug, Clone)]
pub struct RosterHandle(Arc<RwLock<RosterEntry>>);

impl RosterHandle {
    pub fn new(entry: RosterEntry) -> Self {
        RosterHandle(Arc::new(RwLock::new(entry)))
    }

    /// Copy of the current record
    pub fn snapshot(&self) -> RosterEntry {
        self.read(RosterEntry::clone)
    }

    pub fn read<R>(&self, f: impl FnOnce(&RosterEntry) -> R) -> R {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut RosterEntry) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn ptr_eq(&self, other: &RosterHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_record() {
        let handle = RosterHandle::new(RosterEntry::new("Bulbasaur", 1, 5, 20));
        let other = handle.clone();
        other.update(|e| e.hp = 7);
        assert_eq!(handle.read(|e| e.hp), 7);
        assert!(handle.ptr_eq(&other));
    }

    #[test]
    fn test_details_roundtrip() {
        let mut entry = RosterEntry::new("Sparky", 25, 50, 110);
        let details = CompactDetails {
            species: 26,
            gender: Some('M'),
            shiny: true,
            level: 51,
            tera_type: Some(Type::Electric),
        };
        entry.set_details(details);
        assert_eq!(entry.details(), details);
        assert_eq!(entry.name, "Sparky");
    }
}
