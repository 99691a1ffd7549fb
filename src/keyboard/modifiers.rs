//! Modifier key tracking and shift-level derivation
//!
//! The eight physical modifier keys form the whole state. Everything else
//! (shift, AltGr, level) is computed from it by pure functions, since the
//! AltGr convention depends on the platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical modifier key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    MetaLeft,
    MetaRight,
}

impl Modifier {
    /// Every modifier, in bit order
    pub fn all() -> &'static [Modifier] {
        &[
            Self::ShiftLeft,
            Self::ShiftRight,
            Self::ControlLeft,
            Self::ControlRight,
            Self::AltLeft,
            Self::AltRight,
            Self::MetaLeft,
            Self::MetaRight,
        ]
    }

    /// Modifier named by a normalized key code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ShiftLeft" => Some(Self::ShiftLeft),
            "ShiftRight" => Some(Self::ShiftRight),
            "ControlLeft" => Some(Self::ControlLeft),
            "ControlRight" => Some(Self::ControlRight),
            "AltLeft" => Some(Self::AltLeft),
            "AltRight" => Some(Self::AltRight),
            "MetaLeft" => Some(Self::MetaLeft),
            "MetaRight" => Some(Self::MetaRight),
            _ => None,
        }
    }

    /// Key code of the modifier
    pub fn code(&self) -> &'static str {
        match self {
            Self::ShiftLeft => "ShiftLeft",
            Self::ShiftRight => "ShiftRight",
            Self::ControlLeft => "ControlLeft",
            Self::ControlRight => "ControlRight",
            Self::AltLeft => "AltLeft",
            Self::AltRight => "AltRight",
            Self::MetaLeft => "MetaLeft",
            Self::MetaRight => "MetaRight",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Host platform, selecting the AltGr convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// AltRight, or ControlLeft + AltLeft
    #[serde(rename = "win")]
    Windows,
    /// AltRight or AltLeft (Option)
    Mac,
    /// AltRight only
    Linux,
    /// AltRight only
    #[default]
    Other,
}

impl Platform {
    /// Parse a platform name. Unknown names map to `Other`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "win" | "windows" => Self::Windows,
            "mac" | "macos" => Self::Mac,
            "linux" | "gnu" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Short name, as used in config files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Mac => "mac",
            Self::Linux => "linux",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Held/released state of the eight modifier keys, one bit each
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet {
    bits: u8,
}

impl ModifierSet {
    /// All modifiers released
    pub const RELEASED: ModifierSet = ModifierSet { bits: 0 };

    /// Whether `modifier` is down
    pub fn is_held(&self, modifier: Modifier) -> bool {
        self.bits & modifier.bit() != 0
    }

    /// Mark `modifier` as held
    pub fn press(&mut self, modifier: Modifier) {
        self.bits |= modifier.bit();
    }

    /// Mark `modifier` as released
    pub fn release(&mut self, modifier: Modifier) {
        self.bits &= !modifier.bit();
    }

    /// Mark the modifier named by `code` as held.
    /// Returns whether `code` names a modifier.
    pub fn key_down(&mut self, code: &str) -> bool {
        match Modifier::from_code(code) {
            Some(modifier) => {
                self.press(modifier);
                true
            }
            None => false,
        }
    }

    /// Mark the modifier named by `code` as released. Releasing a modifier
    /// that is not held leaves the set unchanged.
    pub fn key_up(&mut self, code: &str) -> bool {
        match Modifier::from_code(code) {
            Some(modifier) => {
                self.release(modifier);
                true
            }
            None => false,
        }
    }

    /// Currently held modifiers
    pub fn held(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::all()
            .iter()
            .copied()
            .filter(move |modifier| self.is_held(*modifier))
    }

    /// Whether every modifier is released
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Either Shift key is held
    pub fn shift(&self) -> bool {
        shift_state(self)
    }

    /// AltGr is active under the platform convention
    pub fn altgr(&self, platform: Platform) -> bool {
        altgr_state(self, platform)
    }

    /// Shift level in `0..=3`
    pub fn level(&self, platform: Platform) -> u8 {
        modifier_level(self, platform)
    }

    /// Whether Control, Alt or Meta is held
    pub fn has_command_modifier(&self) -> bool {
        [
            Modifier::ControlLeft,
            Modifier::ControlRight,
            Modifier::AltLeft,
            Modifier::AltRight,
            Modifier::MetaLeft,
            Modifier::MetaRight,
        ]
        .iter()
        .any(|modifier| self.is_held(*modifier))
    }
}

/// Either Shift key is held
pub fn shift_state(modifiers: &ModifierSet) -> bool {
    modifiers.is_held(Modifier::ShiftLeft) || modifiers.is_held(Modifier::ShiftRight)
}

/// AltGr is active under the platform's convention
pub fn altgr_state(modifiers: &ModifierSet, platform: Platform) -> bool {
    let alt_right = modifiers.is_held(Modifier::AltRight);
    match platform {
        Platform::Windows => {
            alt_right
                || (modifiers.is_held(Modifier::ControlLeft) && modifiers.is_held(Modifier::AltLeft))
        }
        Platform::Mac => alt_right || modifiers.is_held(Modifier::AltLeft),
        Platform::Linux | Platform::Other => alt_right,
    }
}

/// Shift level in `0..=3`: `shift * 1 + altgr * 2`
pub fn modifier_level(modifiers: &ModifierSet, platform: Platform) -> u8 {
    u8::from(shift_state(modifiers)) + 2 * u8::from(altgr_state(modifiers, platform))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(modifiers: &[Modifier]) -> ModifierSet {
        let mut set = ModifierSet::default();
        for modifier in modifiers {
            set.press(*modifier);
        }
        set
    }

    #[test]
    fn default_is_all_released() {
        let set = ModifierSet::default();
        assert_eq!(set, ModifierSet::RELEASED);
        assert!(set.is_empty());
        assert_eq!(set.level(Platform::Windows), 0);
    }

    #[test]
    fn key_down_and_up_track_modifiers() {
        let mut set = ModifierSet::default();
        assert!(set.key_down("ShiftLeft"));
        assert!(set.is_held(Modifier::ShiftLeft));
        assert!(set.key_up("ShiftLeft"));
        assert!(!set.is_held(Modifier::ShiftLeft));
    }

    #[test]
    fn non_modifier_codes_are_ignored() {
        let mut set = ModifierSet::default();
        assert!(!set.key_down("KeyA"));
        assert!(!set.key_up("OSLeft"));
        assert!(set.is_empty());
    }

    #[test]
    fn releasing_a_released_modifier_is_a_no_op() {
        let mut set = held(&[Modifier::AltRight]);
        let before = set;
        set.key_up("ShiftRight");
        assert_eq!(set, before);
    }

    #[test]
    fn either_shift_sets_level_one() {
        assert_eq!(held(&[Modifier::ShiftLeft]).level(Platform::Linux), 1);
        assert_eq!(held(&[Modifier::ShiftRight]).level(Platform::Linux), 1);
    }

    #[test]
    fn windows_altgr_conventions() {
        assert!(held(&[Modifier::ControlLeft, Modifier::AltLeft]).altgr(Platform::Windows));
        assert!(held(&[Modifier::AltRight]).altgr(Platform::Windows));
        assert!(!held(&[Modifier::AltLeft]).altgr(Platform::Windows));
        assert!(!held(&[Modifier::ControlRight, Modifier::AltLeft]).altgr(Platform::Windows));
    }

    #[test]
    fn mac_altgr_conventions() {
        assert!(held(&[Modifier::AltLeft]).altgr(Platform::Mac));
        assert!(held(&[Modifier::AltRight]).altgr(Platform::Mac));
    }

    #[test]
    fn linux_altgr_is_alt_right_only() {
        assert!(held(&[Modifier::AltRight]).altgr(Platform::Linux));
        assert!(!held(&[Modifier::AltLeft]).altgr(Platform::Linux));
        assert!(!held(&[Modifier::ControlLeft, Modifier::AltLeft]).altgr(Platform::Other));
    }

    #[test]
    fn shift_altgr_is_level_three() {
        let set = held(&[Modifier::ShiftLeft, Modifier::AltRight]);
        assert_eq!(modifier_level(&set, Platform::Linux), 3);
        assert_eq!(modifier_level(&held(&[Modifier::AltRight]), Platform::Linux), 2);
    }

    #[test]
    fn command_modifiers() {
        assert!(!held(&[Modifier::ShiftLeft]).has_command_modifier());
        assert!(held(&[Modifier::ControlRight]).has_command_modifier());
        assert!(held(&[Modifier::MetaLeft]).has_command_modifier());
    }

    #[test]
    fn held_lists_modifiers_in_order() {
        let set = held(&[Modifier::MetaRight, Modifier::ShiftLeft]);
        let codes: Vec<&str> = set.held().map(|m| m.code()).collect();
        assert_eq!(codes, vec!["ShiftLeft", "MetaRight"]);
    }

    #[test]
    fn platform_parsing() {
        assert_eq!(Platform::parse("win"), Platform::Windows);
        assert_eq!(Platform::parse("MAC"), Platform::Mac);
        assert_eq!(Platform::parse("linux"), Platform::Linux);
        assert_eq!(Platform::parse(""), Platform::Other);
        assert_eq!(Platform::Windows.to_string(), "win");
    }
}
