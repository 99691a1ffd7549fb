//! Same-finger and same-key usage
//!
//! Each digram is planned character by character; only the transition
//! between the last press of the first character and the first press of the
//! second one is compared.

use super::corpus::FrequencyTable;
use crate::keyboard::{FingerMap, KeyPress, Layout};
use crate::utils::FrequencyTableExt;
use serde::{Deserialize, Serialize};

/// How two consecutive characters are typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Both presses hit the same key
    SameKey,
    /// Different keys, same finger
    SameFinger,
    /// Anything else, including keys with no finger
    Other,
    /// One of the characters cannot be typed
    Unsupported,
}

/// Digram frequencies grouped by transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigramUsage {
    /// Same-finger digrams, most frequent first
    pub same_finger: FrequencyTable,
    /// Same-key digrams, most frequent first
    pub same_key: FrequencyTable,
    pub unsupported: Vec<String>,
}

impl DigramUsage {
    /// Group digram frequencies by transition class
    pub fn analyze(layout: &Layout, fingers: &FingerMap, digrams: &FrequencyTable) -> Self {
        let mut usage = Self::default();
        for (digram, freq) in digrams {
            match transition(layout, fingers, digram) {
                Transition::SameKey => usage.same_key.add(digram, *freq),
                Transition::SameFinger => usage.same_finger.add(digram, *freq),
                Transition::Other => {}
                Transition::Unsupported => usage.unsupported.push(digram.clone()),
            }
        }
        usage.same_finger.sort_by_frequency();
        usage.same_key.sort_by_frequency();
        usage
    }

    /// Total same-finger frequency
    pub fn sfu(&self) -> f64 {
        self.same_finger.total()
    }

    /// Total same-key frequency
    pub fn sku(&self) -> f64 {
        self.same_key.total()
    }
}

/// Classify the transition inside a two-character digram
pub fn transition(layout: &Layout, fingers: &FingerMap, digram: &str) -> Transition {
    let mut chars = digram.chars();
    let (Some(first), Some(second), None) = (chars.next(), chars.next(), chars.next()) else {
        log::debug!("skipping malformed digram {:?}", digram);
        return Transition::Unsupported;
    };

    let (Some(from), Some(to)) = (last_press(layout, first), first_press(layout, second)) else {
        return Transition::Unsupported;
    };
    if from.key_id == to.key_id {
        return Transition::SameKey;
    }
    match (fingers.finger_of(&from.key_id), fingers.finger_of(&to.key_id)) {
        (Some(a), Some(b)) if a == b => Transition::SameFinger,
        _ => Transition::Other,
    }
}

fn presses(layout: &Layout, c: char) -> Option<Vec<KeyPress>> {
    let mut buf = [0u8; 4];
    let text: &str = c.encode_utf8(&mut buf);
    layout
        .key_sequence(text)
        .iter()
        .map(|entry| entry.press().cloned())
        .collect()
}

fn first_press(layout: &Layout, c: char) -> Option<KeyPress> {
    presses(layout, c)?.into_iter().next()
}

fn last_press(layout: &Layout, c: char) -> Option<KeyPress> {
    presses(layout, c)?.pop()
}
