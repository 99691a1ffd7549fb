//! Physical geometry and finger assignment
//!
//! The geometry tag only selects which physical key-shape variant applies.
//! It matters to the core in one place: the finger used for the digit row
//! differs between ANSI-style and ISO-style boards.

use super::keymap::LayoutError;
use super::resolver::KeyPress;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Physical keyboard geometry variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// US ANSI (default)
    #[default]
    Ansi,
    /// ISO: ANSI + IntlBackslash, L-shaped Enter
    Iso,
    /// Russian-style Enter: ANSI - Backslash + IntlYen
    Alt,
    /// Brazilian: ISO + IntlRo + NumpadComma
    Abnt,
    /// Japanese: ISO + IntlRo + IntlYen - IntlBackslash, plus conversion keys
    Jis,
    /// Korean: ALT + Lang1 + Lang2
    Ks,
    /// Ortholinear, TypeMatrix 2030 style
    Ol60,
    /// Ortholinear, Preonic style
    Ol50,
    /// Ortholinear, Planck style
    Ol40,
}

impl Geometry {
    /// Every supported geometry
    pub fn all() -> &'static [Geometry] {
        &[
            Self::Ansi,
            Self::Iso,
            Self::Alt,
            Self::Abnt,
            Self::Jis,
            Self::Ks,
            Self::Ol60,
            Self::Ol50,
            Self::Ol40,
        ]
    }

    /// Parse a geometry tag, case-insensitively. The legacy `ergo` tag is an
    /// alias of `ol60`. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ansi" => Some(Self::Ansi),
            "iso" => Some(Self::Iso),
            "alt" => Some(Self::Alt),
            "abnt" => Some(Self::Abnt),
            "jis" => Some(Self::Jis),
            "ks" => Some(Self::Ks),
            "ol60" | "ergo" => Some(Self::Ol60),
            "ol50" => Some(Self::Ol50),
            "ol40" => Some(Self::Ol40),
            _ => None,
        }
    }

    /// Lowercase tag, as found in layout files
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::Iso => "iso",
            Self::Alt => "alt",
            Self::Abnt => "abnt",
            Self::Jis => "jis",
            Self::Ks => "ks",
            Self::Ol60 => "ol60",
            Self::Ol50 => "ol50",
            Self::Ol40 => "ol40",
        }
    }

    /// Display name for the geometry
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ansi => "ANSI (US)",
            Self::Iso => "ISO (EU)",
            Self::Alt => "ALT (Russian-style Enter)",
            Self::Abnt => "ABNT (BR)",
            Self::Jis => "JIS (JP)",
            Self::Ks => "KS (KR)",
            Self::Ol60 => "Ortholinear 60",
            Self::Ol50 => "Ortholinear 50",
            Self::Ol40 => "Ortholinear 40",
        }
    }

    /// Euro-style Enter key (ISO, ABNT, JIS)
    pub fn is_iso_style(&self) -> bool {
        matches!(self, Self::Iso | Self::Abnt | Self::Jis)
    }

    /// Keys in straight columns (OL60, OL50, OL40)
    pub fn is_ortholinear(&self) -> bool {
        matches!(self, Self::Ol60 | Self::Ol50 | Self::Ol40)
    }

    /// Whether the board has a key between left shift and Z
    pub fn has_intl_backslash(&self) -> bool {
        matches!(self, Self::Iso | Self::Abnt)
    }

    /// Whether the board has the IntlYen key on the number row
    pub fn has_intl_yen(&self) -> bool {
        matches!(self, Self::Alt | Self::Ks | Self::Jis)
    }

    /// Whether the board has the IntlRo key left of right shift
    pub fn has_intl_ro(&self) -> bool {
        matches!(self, Self::Jis | Self::Abnt)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Hand a finger belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Hand of a finger id: `l*` fingers are left, `r*` fingers are right.
    /// Center ids such as `m1` (thumbs on the space bar) have no hand.
    pub fn of_finger(finger: &str) -> Option<Self> {
        match finger.chars().next() {
            Some('l') => Some(Self::Left),
            Some('r') => Some(Self::Right),
            _ => None,
        }
    }
}

/// Digit row fingers, `Digit1` to `Digit0`
const ANSI_DIGIT_FINGERS: [&str; 10] = ["l5", "l4", "l3", "l2", "l2", "r2", "r2", "r3", "r4", "r5"];
const ISO_DIGIT_FINGERS: [&str; 10] = ["l5", "l5", "l4", "l3", "l2", "l2", "r2", "r2", "r3", "r4"];

/// Conventional finger for every physical key but the digit row
const STANDARD_FINGERS: &[(&str, &str)] = &[
    // Number row
    ("Escape", "l5"),
    ("Backquote", "l5"),
    ("Minus", "r5"),
    ("Equal", "r5"),
    ("IntlYen", "r5"),
    ("Backspace", "r5"),
    // Top letter row
    ("Tab", "l5"),
    ("KeyQ", "l5"),
    ("KeyW", "l4"),
    ("KeyE", "l3"),
    ("KeyR", "l2"),
    ("KeyT", "l2"),
    ("KeyY", "r2"),
    ("KeyU", "r2"),
    ("KeyI", "r3"),
    ("KeyO", "r4"),
    ("KeyP", "r5"),
    ("BracketLeft", "r5"),
    ("BracketRight", "r5"),
    ("Backslash", "r5"),
    // Home row
    ("CapsLock", "l5"),
    ("KeyA", "l5"),
    ("KeyS", "l4"),
    ("KeyD", "l3"),
    ("KeyF", "l2"),
    ("KeyG", "l2"),
    ("KeyH", "r2"),
    ("KeyJ", "r2"),
    ("KeyK", "r3"),
    ("KeyL", "r4"),
    ("Semicolon", "r5"),
    ("Quote", "r5"),
    ("Enter", "r5"),
    // Bottom letter row
    ("ShiftLeft", "l5"),
    ("IntlBackslash", "l5"),
    ("KeyZ", "l5"),
    ("KeyX", "l4"),
    ("KeyC", "l3"),
    ("KeyV", "l2"),
    ("KeyB", "l2"),
    ("KeyN", "r2"),
    ("KeyM", "r2"),
    ("Comma", "r3"),
    ("Period", "r4"),
    ("Slash", "r5"),
    ("IntlRo", "r5"),
    ("ShiftRight", "r5"),
    // Base row
    ("ControlLeft", "l5"),
    ("MetaLeft", "l1"),
    ("AltLeft", "l1"),
    ("Lang2", "l1"),
    ("NonConvert", "l1"),
    ("Space", "m1"),
    ("Convert", "r1"),
    ("KanaMode", "r1"),
    ("Lang1", "r1"),
    ("AltRight", "r1"),
    ("MetaRight", "r1"),
    ("ContextMenu", "r5"),
    ("ControlRight", "r5"),
];

/// Conventional finger for a physical key on the given geometry
pub fn standard_finger(key_id: &str, geometry: Geometry) -> Option<&'static str> {
    if let Some(digit) = key_id.strip_prefix("Digit") {
        let n: usize = digit.parse().ok().filter(|n| *n <= 9)?;
        // Digit1..Digit9 then Digit0
        let index = (n + 9) % 10;
        let fingers = if geometry.is_iso_style() {
            &ISO_DIGIT_FINGERS
        } else {
            &ANSI_DIGIT_FINGERS
        };
        return Some(fingers[index]);
    }
    STANDARD_FINGERS
        .iter()
        .find(|(id, _)| *id == key_id)
        .map(|(_, finger)| *finger)
}

/// Fingers the typing-load statistics are computed over (thumbs excluded)
pub const TYPING_FINGERS: [&str; 8] = ["l5", "l4", "l3", "l2", "r2", "r3", "r4", "r5"];

/// Finger assignment: finger id to the physical keys it presses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Vec<String>>", into = "IndexMap<String, Vec<String>>")]
pub struct FingerMap {
    fingers: IndexMap<String, Vec<String>>,
    by_key: HashMap<String, String>,
}

impl From<IndexMap<String, Vec<String>>> for FingerMap {
    fn from(fingers: IndexMap<String, Vec<String>>) -> Self {
        Self::new(fingers)
    }
}

impl From<FingerMap> for IndexMap<String, Vec<String>> {
    fn from(map: FingerMap) -> Self {
        map.fingers
    }
}

impl FingerMap {
    /// Build a finger map. A key listed under several fingers belongs to the
    /// first one.
    pub fn new(fingers: IndexMap<String, Vec<String>>) -> Self {
        let mut by_key = HashMap::new();
        for (finger, keys) in &fingers {
            for key in keys {
                by_key
                    .entry(key.clone())
                    .or_insert_with(|| finger.clone());
            }
        }
        Self { fingers, by_key }
    }

    /// Standard typing-finger assignment for a geometry
    pub fn standard(geometry: Geometry) -> Self {
        let mut fingers: IndexMap<String, Vec<String>> = TYPING_FINGERS
            .iter()
            .map(|finger| (finger.to_string(), Vec::new()))
            .collect();

        let digits = (0..10).map(|n| format!("Digit{}", n));
        let others = STANDARD_FINGERS.iter().map(|(id, _)| id.to_string());
        for key in digits.chain(others) {
            if let Some(finger) = standard_finger(&key, geometry) {
                if let Some(keys) = fingers.get_mut(finger) {
                    keys.push(key);
                }
            }
        }
        Self::new(fingers)
    }

    /// Parse a finger map from JSON (`{"l5": ["KeyQ", "KeyA"], ...}`)
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a finger map from a JSON file
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Finger assigned to a key
    pub fn finger_of(&self, key_id: &str) -> Option<&str> {
        self.by_key.get(key_id).map(String::as_str)
    }

    /// Keys assigned to a finger
    pub fn keys_of(&self, finger: &str) -> &[String] {
        self.fingers.get(finger).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finger ids, in assignment order
    pub fn fingers(&self) -> impl Iterator<Item = &str> {
        self.fingers.keys().map(String::as_str)
    }

    /// Fingers with their keys, in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fingers
            .iter()
            .map(|(finger, keys)| (finger.as_str(), keys.as_slice()))
    }

    /// Whether no finger is assigned
    pub fn is_empty(&self) -> bool {
        self.fingers.is_empty()
    }
}

/// Physical keys to hold down to produce one key press.
/// An empty chord presses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    /// The pressed key first, then the modifiers
    pub keys: Vec<String>,
}

impl KeyChord {
    /// Chord for a press: AltGr (`AltRight`) for levels 2 and 3, and the
    /// Shift key of the opposite hand for odd levels.
    pub fn for_press(press: &KeyPress, geometry: Geometry) -> Self {
        let mut keys = vec![press.key_id.clone()];
        if press.level > 1 {
            keys.push("AltRight".to_string());
        }
        if press.level % 2 == 1 {
            let hand = standard_finger(&press.key_id, geometry).and_then(Hand::of_finger);
            let shift = if hand == Some(Hand::Left) {
                "ShiftRight"
            } else {
                "ShiftLeft"
            };
            keys.push(shift.to_string());
        }
        Self { keys }
    }

    /// Whether the chord holds `key_id`
    pub fn contains(&self, key_id: &str) -> bool {
        self.keys.iter().any(|key| key == key_id)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.keys.iter().rev();
        if let Some(first) = keys.next() {
            write!(f, "{}", first)?;
        }
        for key in keys {
            write!(f, "+{}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key_id: &str, level: u8) -> KeyPress {
        KeyPress {
            key_id: key_id.to_string(),
            level,
        }
    }

    #[test]
    fn default_is_ansi() {
        assert_eq!(Geometry::default(), Geometry::Ansi);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Geometry::parse("ISO"), Some(Geometry::Iso));
        assert_eq!(Geometry::parse(" ol40 "), Some(Geometry::Ol40));
        assert_eq!(Geometry::parse("Ergo"), Some(Geometry::Ol60));
        assert_eq!(Geometry::parse(""), None);
        assert_eq!(Geometry::parse("split"), None);
    }

    #[test]
    fn every_geometry_round_trips_its_tag() {
        for geometry in Geometry::all() {
            assert_eq!(Geometry::parse(geometry.tag()), Some(*geometry));
        }
    }

    #[test]
    fn iso_style_geometries() {
        assert!(Geometry::Iso.is_iso_style());
        assert!(Geometry::Abnt.is_iso_style());
        assert!(Geometry::Jis.is_iso_style());
        assert!(!Geometry::Ansi.is_iso_style());
        assert!(!Geometry::Ks.is_iso_style());
        assert!(!Geometry::Ol60.is_iso_style());
    }

    #[test]
    fn intl_keys_per_geometry() {
        assert!(Geometry::Iso.has_intl_backslash());
        assert!(!Geometry::Jis.has_intl_backslash());
        assert!(Geometry::Jis.has_intl_yen());
        assert!(Geometry::Abnt.has_intl_ro());
        assert!(!Geometry::Ansi.has_intl_ro());
    }

    #[test]
    fn digit_row_depends_on_geometry() {
        assert_eq!(standard_finger("Digit1", Geometry::Ansi), Some("l5"));
        assert_eq!(standard_finger("Digit2", Geometry::Ansi), Some("l4"));
        assert_eq!(standard_finger("Digit2", Geometry::Iso), Some("l5"));
        assert_eq!(standard_finger("Digit6", Geometry::Ansi), Some("r2"));
        assert_eq!(standard_finger("Digit0", Geometry::Ansi), Some("r5"));
        assert_eq!(standard_finger("Digit0", Geometry::Iso), Some("r4"));
        assert_eq!(standard_finger("Digit10", Geometry::Ansi), None);
    }

    #[test]
    fn letter_fingers() {
        assert_eq!(standard_finger("KeyF", Geometry::Ansi), Some("l2"));
        assert_eq!(standard_finger("KeyJ", Geometry::Ansi), Some("r2"));
        assert_eq!(standard_finger("Space", Geometry::Ansi), Some("m1"));
        assert_eq!(standard_finger("F13", Geometry::Ansi), None);
    }

    #[test]
    fn standard_map_excludes_thumbs() {
        let map = FingerMap::standard(Geometry::Ansi);
        let fingers: Vec<&str> = map.fingers().collect();
        assert_eq!(fingers, TYPING_FINGERS.to_vec());
        assert_eq!(map.finger_of("Space"), None);
        assert_eq!(map.finger_of("KeyA"), Some("l5"));
        assert!(map.keys_of("l2").contains(&"KeyF".to_string()));
        assert!(map.keys_of("l1").is_empty());
    }

    #[test]
    fn finger_map_from_json() {
        let map = FingerMap::from_json(r#"{ "l2": ["KeyA"], "l3": ["KeyB", "KeyA"] }"#).unwrap();
        assert_eq!(map.finger_of("KeyA"), Some("l2"));
        assert_eq!(map.finger_of("KeyB"), Some("l3"));
        assert_eq!(map.finger_of("KeyC"), None);
    }

    #[test]
    fn hand_of_finger() {
        assert_eq!(Hand::of_finger("l4"), Some(Hand::Left));
        assert_eq!(Hand::of_finger("r1"), Some(Hand::Right));
        assert_eq!(Hand::of_finger("m1"), None);
    }

    #[test]
    fn chord_for_base_level_is_the_key_alone() {
        let chord = KeyChord::for_press(&press("KeyA", 0), Geometry::Ansi);
        assert_eq!(chord.keys, vec!["KeyA"]);
    }

    #[test]
    fn chord_uses_opposite_shift() {
        let left = KeyChord::for_press(&press("KeyA", 1), Geometry::Ansi);
        assert_eq!(left.keys, vec!["KeyA", "ShiftRight"]);

        let right = KeyChord::for_press(&press("KeyL", 1), Geometry::Ansi);
        assert_eq!(right.keys, vec!["KeyL", "ShiftLeft"]);
    }

    #[test]
    fn chord_for_shift_altgr() {
        let chord = KeyChord::for_press(&press("KeyE", 3), Geometry::Iso);
        assert_eq!(chord.keys, vec!["KeyE", "AltRight", "ShiftRight"]);
        assert_eq!(chord.to_string(), "ShiftRight+AltRight+KeyE");
        assert!(chord.contains("AltRight"));
    }
}
