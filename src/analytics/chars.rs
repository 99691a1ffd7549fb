//! Supported-character table
//!
//! Maps every character a layout can type to the keys struck to type it:
//! one key for direct characters, the dead key then the base key for
//! characters composed with one dead key.

use crate::keyboard::{is_dead_key, DeadKeyTable, KeyMap};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedChars {
    table: IndexMap<String, Vec<String>>,
}

impl SupportedChars {
    /// Build the table: direct characters first (first key wins), then
    /// characters composed from a directly typed base.
    pub fn build(keymap: &KeyMap, deadkeys: &DeadKeyTable) -> Self {
        let mut table: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut dead_key_keys: HashMap<&str, &str> = HashMap::new();

        for (key_id, values) in keymap {
            for value in values {
                if table.contains_key(value) {
                    continue;
                }
                if value.chars().count() == 1 {
                    table.insert(value.clone(), vec![key_id.clone()]);
                } else if is_dead_key(value) {
                    dead_key_keys.entry(value.as_str()).or_insert(key_id.as_str());
                }
            }
        }

        let direct_count = table.len();
        for (tag, compositions) in deadkeys {
            let Some(dead_key) = dead_key_keys.get(tag.as_str()) else {
                continue;
            };
            for (base, composed) in compositions {
                if composed.is_empty() || table.contains_key(composed) {
                    continue;
                }
                // only directly typed base characters
                let base_keys = match table.get_index_of(base) {
                    Some(i) if i < direct_count => table[i].clone(),
                    _ => continue,
                };
                let mut keys = Vec::with_capacity(base_keys.len() + 1);
                keys.push(dead_key.to_string());
                keys.extend(base_keys);
                table.insert(composed.clone(), keys);
            }
        }

        Self { table }
    }

    /// Keys struck to type `c`
    pub fn keys_for(&self, c: &str) -> Option<&[String]> {
        self.table.get(c).map(Vec::as_slice)
    }

    /// Whether the layout can type `c`
    pub fn contains(&self, c: &str) -> bool {
        self.table.contains_key(c)
    }

    /// Number of typeable characters
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the layout types nothing
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Characters with their keys, direct characters first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.table
            .iter()
            .map(|(c, keys)| (c.as_str(), keys.as_slice()))
    }

    /// Every key used by at least one character, in first-use order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.table.values().flatten() {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        keys
    }
}
