//! Key-cap labels
//!
//! Which characters to print on a key cap when its base and shift values are
//! the lower and upper case of the same letter. Most of the time only the
//! uppercase letter is shown, but case mapping is not symmetric everywhere:
//!
//! ```text
//! 'ß' upper -> "SS"     'ẞ' lower -> 'ß'
//! 'ς' upper -> 'Σ'      'σ' upper -> 'Σ'     'Σ' lower -> 'σ'
//! 'µ' upper -> 'Μ'      'Μ' lower -> 'μ'     (micro sign vs. small mu)
//! ```
//!
//! When the lowercase of the shift value does not give back the base value,
//! the base character is shown instead (e.g. Greek final sigma).

use super::deadkey::is_dead_key;
use serde::Serialize;

/// Labels for the four levels of a key cap. Empty strings are not drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyCapLabels {
    pub base: String,
    pub shift: String,
    pub altgr: String,
    pub altgr_shift: String,
}

/// Compute the labels of a key from its level values
pub fn key_cap_labels(values: &[String]) -> KeyCapLabels {
    let level = |i: usize| values.get(i).map(String::as_str).unwrap_or("");
    let (l1, l2, l3, l4) = (level(0), level(1), level(2), level(3));

    let base = if l1.to_uppercase() != l2 { l1 } else { "" };
    let shift = if !base.is_empty() || l2.to_lowercase() == l1 {
        l2
    } else {
        l1
    };

    KeyCapLabels {
        base: base.to_string(),
        shift: shift.to_string(),
        altgr: l3.to_string(),
        altgr_shift: alt_upper_char(l3, l4).to_string(),
    }
}

/// The shifted character of an AltGr or dead-key pair, hidden when it is
/// just the uppercase of `base`.
pub fn alt_upper_char<'a>(base: &str, shift: &'a str) -> &'a str {
    if !shift.is_empty() && base != shift.to_lowercase() {
        shift
    } else {
        ""
    }
}

/// Presentation glyph for a dead key: a space plus the combining diacritic,
/// or a star for the multi-purpose dead key.
pub fn dead_key_symbol(tag: &str) -> Option<&'static str> {
    let symbol = match tag {
        "*`" => " \u{300}",  // grave
        "*´" => " \u{301}",  // acute
        "*^" => " \u{302}",  // circumflex
        "*~" => " \u{303}",  // tilde
        "*¯" => " \u{304}",  // macron
        "*˘" => " \u{306}",  // breve
        "*˙" => " \u{307}",  // dot above
        "*¨" => " \u{308}",  // diaeresis
        "*˚" => " \u{30a}",  // ring above
        "*”" => " \u{30b}",  // double acute
        "*ˇ" => " \u{30c}",  // caron
        "*‟" => " \u{30f}",  // double grave
        "*⁻" => " \u{311}",  // inverted breve
        "*." => " \u{323}",  // dot below
        "*," => " \u{326}",  // comma below
        "*¸" => " \u{327}",  // cedilla
        "*˛" => " \u{328}",  // ogonek
        "**" => "\u{2605}", // one dead key
        _ => return None,
    };
    Some(symbol)
}

/// Text drawn for a single key value: the dead-key glyph when known,
/// otherwise the last character of the value.
pub fn display_label(value: &str) -> String {
    if is_dead_key(value) {
        if let Some(symbol) = dead_key_symbol(value) {
            return symbol.to_string();
        }
    }
    value.chars().last().map(String::from).unwrap_or_default()
}
