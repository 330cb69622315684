//! Name to numeric id lookup for species, moves, items and abilities
//!
//! Ids are what the action codec puts on the wire, so both ends of a
//! connection must load the same tables. Id 0 is never assigned: for items
//! it means "nothing held", for moves it marks a name the table lacks.

use std::collections::HashMap;

use serde::Deserialize;

/// Showdown-style id: lowercase ASCII letters and digits only.
///
/// `"Mr. Mime"` becomes `"mrmime"`, `"King's Shield"` becomes `"kingsshield"`.
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub trait Dex: Send + Sync {
    fn species_id(&self, name: &str) -> Option<u16>;
    fn move_id(&self, name: &str) -> Option<u16>;
    fn item_id(&self, name: &str) -> Option<u16>;
    fn ability_id(&self, name: &str) -> Option<u16>;

    fn species_name(&self, id: u16) -> Option<&str>;
    fn move_name(&self, id: u16) -> Option<&str>;
    fn item_name(&self, id: u16) -> Option<&str>;
    fn ability_name(&self, id: u16) -> Option<&str>;
}

#[derive(Debug, Default)]
struct IdTable {
    names: Vec<String>,
    ids: HashMap<String, u16>,
}

impl IdTable {
    fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = IdTable::default();
        for name in names {
            let name = name.into();
            let key = to_id(&name);
            if key.is_empty() || table.ids.contains_key(&key) {
                continue;
            }
            if table.names.len() >= usize::from(u16::MAX) {
                break;
            }
            table.names.push(name);
            table.ids.insert(key, table.names.len() as u16);
        }
        table
    }

    fn id(&self, name: &str) -> Option<u16> {
        self.ids.get(&to_id(name)).copied()
    }

    fn name(&self, id: u16) -> Option<&str> {
        let index = usize::from(id).checked_sub(1)?;
        self.names.get(index).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Lists as stored on disk, e.g.
/// `{"species": ["Bulbasaur", ...], "moves": [...], "items": [...], "abilities": [...]}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DexFile {
    species: Vec<String>,
    moves: Vec<String>,
    items: Vec<String>,
    abilities: Vec<String>,
}

/// A [`Dex`] backed by ordered name lists. A name's id is its position
/// in the list plus one; duplicates (after normalization) keep the first id.
#[derive(Debug, Default)]
pub struct TableDex {
    species: IdTable,
    moves: IdTable,
    items: IdTable,
    abilities: IdTable,
}

impl TableDex {
    pub fn new(species: &[&str], moves: &[&str], items: &[&str], abilities: &[&str]) -> Self {
        TableDex {
            species: IdTable::new(species.iter().copied()),
            moves: IdTable::new(moves.iter().copied()),
            items: IdTable::new(items.iter().copied()),
            abilities: IdTable::new(abilities.iter().copied()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: DexFile = serde_json::from_str(json)?;
        Ok(TableDex {
            species: IdTable::new(file.species),
            moves: IdTable::new(file.moves),
            items: IdTable::new(file.items),
            abilities: IdTable::new(file.abilities),
        })
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }
}

impl Dex for TableDex {
    fn species_id(&self, name: &str) -> Option<u16> {
        self.species.id(name)
    }

    fn move_id(&self, name: &str) -> Option<u16> {
        self.moves.id(name)
    }

    fn item_id(&self, name: &str) -> Option<u16> {
        self.items.id(name)
    }

    fn ability_id(&self, name: &str) -> Option<u16> {
        self.abilities.id(name)
    }

    fn species_name(&self, id: u16) -> Option<&str> {
        self.species.name(id)
    }

    fn move_name(&self, id: u16) -> Option<&str> {
        self.moves.name(id)
    }

    fn item_name(&self, id: u16) -> Option<&str> {
        self.items.name(id)
    }

    fn ability_name(&self, id: u16) -> Option<&str> {
        self.abilities.name(id)
    }
}
