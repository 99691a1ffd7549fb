//! Key lookup in both directions
//!
//! Forward: (key map, shift level, key id) to the produced value.
//! Reverse: a value (character or dead-key tag) to the keys that produce it.

use super::deadkey::is_dead_key;
use super::keymap::KeyMap;
use serde::{Deserialize, Serialize};

/// One key press at a given shift level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPress {
    /// Physical key identifier
    pub key_id: String,
    /// Shift level, `0..=3`
    pub level: u8,
}

impl KeyPress {
    /// Press `key_id` at `level`
    pub fn new(key_id: impl Into<String>, level: u8) -> Self {
        Self {
            key_id: key_id.into(),
            level,
        }
    }
}

/// Every key that can produce `value`, least-modified level first.
///
/// Keys tied on level keep the key map order.
pub fn key_list(keymap: &KeyMap, value: &str) -> Vec<KeyPress> {
    if value.is_empty() {
        return Vec::new();
    }
    let mut presses: Vec<KeyPress> = keymap
        .iter()
        .filter_map(|(key_id, values)| {
            values
                .iter()
                .position(|v| v == value)
                .map(|level| KeyPress::new(key_id.as_str(), level as u8))
        })
        .collect();
    // stable: ties stay in key map order
    presses.sort_by_key(|press| press.level);
    presses
}

/// Best key to produce `value`, if any
pub fn find_key(keymap: &KeyMap, value: &str) -> Option<KeyPress> {
    key_list(keymap, value).into_iter().next()
}

/// Outcome of reading one key at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The key is not in the key map
    NoKey,
    /// The key exists but nothing is defined at this level
    Undefined,
    /// A literal value
    Char(&'a str),
    /// A dead-key tag
    DeadKey(&'a str),
}

impl<'a> Resolved<'a> {
    /// The raw stored value, if any
    pub fn value(&self) -> Option<&'a str> {
        match self {
            Self::Char(value) | Self::DeadKey(value) => Some(value),
            Self::NoKey | Self::Undefined => None,
        }
    }
}

/// Value produced by `key_id` at `level`
pub fn resolve<'a>(keymap: &'a KeyMap, level: u8, key_id: &str) -> Resolved<'a> {
    let Some(values) = keymap.get(key_id) else {
        return Resolved::NoKey;
    };
    match values.get(level as usize).map(String::as_str) {
        None | Some("") => Resolved::Undefined,
        Some(value) if is_dead_key(value) => Resolved::DeadKey(value),
        Some(value) => Resolved::Char(value),
    }
}
