//! Key strike counts and finger load

use super::chars::SupportedChars;
use super::corpus::FrequencyTable;
use crate::keyboard::{FingerMap, Hand};
use crate::utils::{percent, FrequencyTableExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Strikes per key for a corpus, plus the characters the layout cannot type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyCounts {
    /// Strikes per key id
    pub counts: IndexMap<String, f64>,
    /// Symbols with no key sequence, in corpus order
    pub unsupported: Vec<String>,
    /// Corpus frequency carried by the unsupported symbols
    pub unsupported_total: f64,
}

impl KeyCounts {
    /// Count key strikes. Every key of the character table starts at zero.
    pub fn count(chars: &SupportedChars, symbols: &FrequencyTable) -> Self {
        let mut counts: IndexMap<String, f64> = chars
            .keys()
            .into_iter()
            .map(|key| (key.to_string(), 0.0))
            .collect();
        let mut unsupported = Vec::new();
        let mut unsupported_total = 0.0;

        for (symbol, count) in symbols {
            match chars.keys_for(symbol) {
                Some(keys) => {
                    for key in keys {
                        counts.add(key, *count);
                    }
                }
                None => {
                    unsupported.push(symbol.clone());
                    unsupported_total += *count;
                }
            }
        }
        if !unsupported.is_empty() {
            log::debug!("{} unsupported symbols", unsupported.len());
        }

        Self {
            counts,
            unsupported,
            unsupported_total,
        }
    }

    /// Strikes on a key, zero for keys no character uses
    pub fn get(&self, key_id: &str) -> f64 {
        self.counts.get(key_id).copied().unwrap_or(0.0)
    }
}

/// Share of keystrokes per finger and per hand, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerLoad {
    pub fingers: IndexMap<String, f64>,
    pub left: f64,
    pub right: f64,
    /// Keystrokes on assigned keys
    pub keystrokes: f64,
}

impl FingerLoad {
    /// Load of every finger of `fingers`. Each key counts for the finger
    /// that owns it (see [`FingerMap::finger_of`]); keys without a finger
    /// are not part of the total.
    pub fn compute(counts: &KeyCounts, fingers: &FingerMap) -> Self {
        let mut per_finger: IndexMap<String, f64> = fingers
            .fingers()
            .map(|finger| (finger.to_string(), 0.0))
            .collect();
        for (key_id, strikes) in &counts.counts {
            if let Some(finger) = fingers.finger_of(key_id) {
                per_finger.add(finger, *strikes);
            }
        }
        let keystrokes = per_finger.total();

        let loads: IndexMap<String, f64> = per_finger
            .into_iter()
            .map(|(finger, strikes)| (finger, percent(strikes, keystrokes)))
            .collect();
        let hand_total = |hand: Hand| -> f64 {
            loads
                .iter()
                .filter(|(finger, _)| Hand::of_finger(finger) == Some(hand))
                .map(|(_, load)| load)
                .sum()
        };
        let left = hand_total(Hand::Left);
        let right = hand_total(Hand::Right);

        Self {
            fingers: loads,
            left,
            right,
            keystrokes,
        }
    }

    /// Load of one finger, in percent
    pub fn get(&self, finger: &str) -> f64 {
        self.fingers.get(finger).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keymap::{deadkeys_from, keymap_from};

    fn fingers(json: &str) -> FingerMap {
        FingerMap::from_json(json).unwrap()
    }

    fn symbols(entries: &[(&str, f64)]) -> FrequencyTable {
        entries.iter().map(|(s, f)| (s.to_string(), *f)).collect()
    }

    #[test]
    fn finger_load_is_share_of_keystrokes() {
        let keymap = keymap_from([("KeyA", vec!["a"]), ("KeyB", vec!["b"])]);
        let chars = SupportedChars::build(&keymap, &Default::default());
        let counts = KeyCounts::count(&chars, &symbols(&[("a", 10.0), ("b", 5.0)]));
        let load = FingerLoad::compute(&counts, &fingers(r#"{ "l2": ["KeyA"], "l3": ["KeyB"] }"#));

        assert!((load.get("l2") - 66.67).abs() < 0.01);
        assert!((load.get("l3") - 33.33).abs() < 0.01);
        assert!((load.left - 100.0).abs() < 1e-9);
        assert_eq!(load.right, 0.0);
        assert_eq!(load.keystrokes, 15.0);
    }

    #[test]
    fn dead_key_strokes_count_on_both_keys() {
        let keymap = keymap_from([("KeyE", vec!["e"]), ("Quote", vec!["*´"])]);
        let deadkeys = deadkeys_from([("*´", vec![("e", "é")])]);
        let chars = SupportedChars::build(&keymap, &deadkeys);
        let counts = KeyCounts::count(&chars, &symbols(&[("e", 3.0), ("é", 2.0)]));
        assert_eq!(counts.get("KeyE"), 5.0);
        assert_eq!(counts.get("Quote"), 2.0);
    }

    #[test]
    fn unsupported_symbols_are_listed_not_counted() {
        let keymap = keymap_from([("KeyA", vec!["a"])]);
        let chars = SupportedChars::build(&keymap, &Default::default());
        let counts = KeyCounts::count(&chars, &symbols(&[("a", 4.0), ("ж", 9.0)]));
        assert_eq!(counts.unsupported, vec!["ж"]);
        assert_eq!(counts.unsupported_total, 9.0);
        let load = FingerLoad::compute(&counts, &fingers(r#"{ "l5": ["KeyA"] }"#));
        assert_eq!(load.keystrokes, 4.0);
        assert_eq!(load.get("l5"), 100.0);
    }

    #[test]
    fn key_listed_twice_counts_for_its_first_finger() {
        let keymap = keymap_from([("KeyA", vec!["a"]), ("KeyB", vec!["b"])]);
        let chars = SupportedChars::build(&keymap, &Default::default());
        let counts = KeyCounts::count(&chars, &symbols(&[("a", 10.0), ("b", 10.0)]));
        let fingers = fingers(r#"{ "l2": ["KeyA"], "l3": ["KeyB", "KeyA"] }"#);
        assert_eq!(fingers.finger_of("KeyA"), Some("l2"));

        let load = FingerLoad::compute(&counts, &fingers);
        assert_eq!(load.keystrokes, 20.0);
        assert_eq!(load.get("l2"), 50.0);
        assert_eq!(load.get("l3"), 50.0);
    }

    #[test]
    fn keys_without_finger_are_excluded() {
        let keymap = keymap_from([("KeyA", vec!["a"]), ("Space", vec![" "])]);
        let chars = SupportedChars::build(&keymap, &Default::default());
        let counts = KeyCounts::count(&chars, &symbols(&[("a", 1.0), (" ", 3.0)]));
        let load = FingerLoad::compute(&counts, &fingers(r#"{ "l5": ["KeyA"], "r5": [] }"#));
        assert_eq!(load.get("l5"), 100.0);
        assert_eq!(load.get("r5"), 0.0);
    }

    #[test]
    fn empty_corpus_has_zero_load() {
        let counts = KeyCounts::default();
        let load = FingerLoad::compute(&counts, &fingers(r#"{ "l5": ["KeyA"] }"#));
        assert_eq!(load.get("l5"), 0.0);
        assert_eq!(load.left, 0.0);
    }
}
