//! Dead-key tags and the reverse composition index
//!
//! A dead-key tag is a two-character value whose first character is `*`,
//! e.g. `*´` (acute) or `**` (the multi-purpose "1dk" key).

use super::keymap::{DeadKeyTable, KeyMap};
use super::resolver::find_key;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// First character of every dead-key tag
pub const DEAD_KEY_SENTINEL: char = '*';

/// Whether a key value is a dead-key tag
pub fn is_dead_key(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next() == Some(DEAD_KEY_SENTINEL) && chars.next().is_some() && chars.next().is_none()
}

/// How to compose a character: press the dead key, then the base character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeadKeyCandidate {
    /// Dead-key tag
    pub dead_key: String,
    /// Character typed after the dead key
    pub base: String,
}

/// Composed character to the dead-key sequence producing it.
///
/// Built once per layout, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadKeyIndex {
    entries: IndexMap<String, DeadKeyCandidate>,
}

impl DeadKeyIndex {
    /// Index every composed character reachable with one dead key.
    ///
    /// A candidate is recorded only when both the dead key and the base
    /// character can be typed directly. The first candidate seen (dead-key
    /// table order, then base order) wins among those.
    ///
    /// Tables whose dead key sits on no key are skipped before that rule
    /// applies: when an unreachable `*´` and a reachable `**` both compose
    /// `x`, the index records `**` even though `*´` comes first. The same
    /// holds for a base character that sits on no key.
    pub fn build(keymap: &KeyMap, deadkeys: &DeadKeyTable) -> Self {
        let mut entries = IndexMap::new();
        for (tag, table) in deadkeys {
            if find_key(keymap, tag).is_none() {
                log::debug!("dead key {} is not on any key", tag);
                continue;
            }
            for (base, composed) in table {
                if composed.is_empty() || entries.contains_key(composed) {
                    continue;
                }
                if find_key(keymap, base).is_some() {
                    entries.insert(
                        composed.clone(),
                        DeadKeyCandidate {
                            dead_key: tag.clone(),
                            base: base.clone(),
                        },
                    );
                }
            }
        }
        Self { entries }
    }

    /// Dead-key sequence composing `composed`
    pub fn get(&self, composed: &str) -> Option<&DeadKeyCandidate> {
        self.entries.get(composed)
    }

    /// Whether `composed` can be typed with one dead key
    pub fn contains(&self, composed: &str) -> bool {
        self.entries.contains_key(composed)
    }

    /// Number of composable characters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no character can be composed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Composed characters with their candidates, in build order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeadKeyCandidate)> {
        self.entries
            .iter()
            .map(|(composed, candidate)| (composed.as_str(), candidate))
    }
}
