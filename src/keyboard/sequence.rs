//! Character to key-press planning
//!
//! Each character is typed with a single press when a key produces it
//! directly, or with a dead key followed by the base character otherwise.

use super::deadkey::DeadKeyIndex;
use super::keymap::KeyMap;
use super::resolver::{find_key, KeyPress};
use serde::{Deserialize, Serialize};
use std::str::Chars;

/// One step of a planned key sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySequenceEntry {
    /// A key to press at a shift level
    Press(KeyPress),
    /// No key or dead-key composition produces this character
    Unresolved(char),
}

impl KeySequenceEntry {
    /// The key press, `None` for an unresolved character
    pub fn press(&self) -> Option<&KeyPress> {
        match self {
            Self::Press(press) => Some(press),
            Self::Unresolved(_) => None,
        }
    }

    /// Whether this entry presses a key
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Press(_))
    }
}

/// Planned key presses for a string.
///
/// Planning is lazy and independent of any live modifier state; calling
/// [`KeySequence::iter`] again restarts from the first character.
#[derive(Debug, Clone, Copy)]
pub struct KeySequence<'a> {
    keymap: &'a KeyMap,
    index: &'a DeadKeyIndex,
    text: &'a str,
}

impl<'a> KeySequence<'a> {
    /// Plan `text` on a key map and its dead-key index
    pub fn new(keymap: &'a KeyMap, index: &'a DeadKeyIndex, text: &'a str) -> Self {
        Self {
            keymap,
            index,
            text,
        }
    }

    /// Iterate the plan from the first character
    pub fn iter(&self) -> KeySequenceIter<'a> {
        KeySequenceIter {
            keymap: self.keymap,
            index: self.index,
            chars: self.text.chars(),
            queued: None,
        }
    }

    /// Whether every character of the text can be typed
    pub fn is_fully_resolved(&self) -> bool {
        self.iter().all(|entry| entry.is_resolved())
    }

    /// Characters with no key sequence, in text order
    pub fn unresolved(&self) -> Vec<char> {
        self.iter()
            .filter_map(|entry| match entry {
                KeySequenceEntry::Unresolved(c) => Some(c),
                KeySequenceEntry::Press(_) => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for KeySequence<'a> {
    type Item = KeySequenceEntry;
    type IntoIter = KeySequenceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &KeySequence<'a> {
    type Item = KeySequenceEntry;
    type IntoIter = KeySequenceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`KeySequence`]
#[derive(Debug, Clone)]
pub struct KeySequenceIter<'a> {
    keymap: &'a KeyMap,
    index: &'a DeadKeyIndex,
    chars: Chars<'a>,
    // base key of a dead-key pair, emitted after the dead key
    queued: Option<KeyPress>,
}

impl Iterator for KeySequenceIter<'_> {
    type Item = KeySequenceEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(press) = self.queued.take() {
            return Some(KeySequenceEntry::Press(press));
        }
        let c = self.chars.next()?;
        let mut buf = [0u8; 4];
        let value: &str = c.encode_utf8(&mut buf);

        if let Some(press) = find_key(self.keymap, value) {
            return Some(KeySequenceEntry::Press(press));
        }

        let composed = self.index.get(value).and_then(|candidate| {
            let dead_key = find_key(self.keymap, &candidate.dead_key)?;
            let base = find_key(self.keymap, &candidate.base)?;
            Some((dead_key, base))
        });
        match composed {
            Some((dead_key, base)) => {
                self.queued = Some(base);
                Some(KeySequenceEntry::Press(dead_key))
            }
            None => {
                log::warn!("unresolvable character {:?}", c);
                Some(KeySequenceEntry::Unresolved(c))
            }
        }
    }
}

/// Plan the key presses that type `text`
pub fn key_sequence<'a>(
    keymap: &'a KeyMap,
    index: &'a DeadKeyIndex,
    text: &'a str,
) -> KeySequence<'a> {
    KeySequence::new(keymap, index, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keymap::{deadkeys_from, keymap_from};

    fn fixture() -> (KeyMap, DeadKeyIndex) {
        let keymap = keymap_from([("KeyA", vec!["a", "A"]), ("Quote", vec!["*´", "*¨"])]);
        let deadkeys = deadkeys_from([("*´", vec![("a", "á")])]);
        let index = DeadKeyIndex::build(&keymap, &deadkeys);
        (keymap, index)
    }

    fn plan(keymap: &KeyMap, index: &DeadKeyIndex, text: &str) -> Vec<KeySequenceEntry> {
        key_sequence(keymap, index, text).iter().collect()
    }

    #[test]
    fn direct_character_is_one_press() {
        let (keymap, index) = fixture();
        assert_eq!(
            plan(&keymap, &index, "a"),
            vec![KeySequenceEntry::Press(KeyPress::new("KeyA", 0))]
        );
    }

    #[test]
    fn composed_character_is_dead_key_then_base() {
        let (keymap, index) = fixture();
        assert_eq!(
            plan(&keymap, &index, "á"),
            vec![
                KeySequenceEntry::Press(KeyPress::new("Quote", 0)),
                KeySequenceEntry::Press(KeyPress::new("KeyA", 0)),
            ]
        );
    }

    #[test]
    fn unknown_character_is_unresolved_and_planning_continues() {
        let (keymap, index) = fixture();
        assert_eq!(
            plan(&keymap, &index, "zA"),
            vec![
                KeySequenceEntry::Unresolved('z'),
                KeySequenceEntry::Press(KeyPress::new("KeyA", 1)),
            ]
        );
    }

    #[test]
    fn sequence_is_restartable() {
        let (keymap, index) = fixture();
        let sequence = key_sequence(&keymap, &index, "aá");
        let first: Vec<_> = sequence.iter().collect();
        let second: Vec<_> = sequence.iter().collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_text_plans_nothing() {
        let (keymap, index) = fixture();
        assert!(plan(&keymap, &index, "").is_empty());
        assert!(key_sequence(&keymap, &index, "").is_fully_resolved());
    }

    #[test]
    fn collects_unresolved_characters() {
        let (keymap, index) = fixture();
        let sequence = key_sequence(&keymap, &index, "xaý");
        assert!(!sequence.is_fully_resolved());
        assert_eq!(sequence.unresolved(), vec!['x', 'ý']);
    }
}
