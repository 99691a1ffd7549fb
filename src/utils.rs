//! Shared utility functions and traits

use indexmap::IndexMap;
use std::cmp::Ordering;

/// Round to a number of decimal places.
///
/// # Example
///
/// ```
/// use keyboard_emulator::utils::round_to;
///
/// assert_eq!(round_to(66.6666, 2), 66.67);
/// assert_eq!(round_to(0.0049, 2), 0.0);
/// assert_eq!(round_to(12.5, 0), 13.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage of `part` in `total`, zero when `total` is zero
pub fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        100.0 * part / total
    } else {
        0.0
    }
}

/// Extension trait for frequency tables (`key -> count` in insertion order).
///
/// # Example
///
/// ```
/// use indexmap::IndexMap;
/// use keyboard_emulator::utils::FrequencyTableExt;
///
/// let mut table: IndexMap<String, f64> = IndexMap::new();
/// table.add("a", 1.0);
/// table.add("b", 3.0);
/// table.add("a", 1.0);
/// assert_eq!(table.total(), 5.0);
///
/// table.sort_by_frequency();
/// let keys: Vec<&str> = table.keys().map(String::as_str).collect();
/// assert_eq!(keys, vec!["b", "a"]);
/// ```
pub trait FrequencyTableExt {
    /// Add `amount` to the entry for `key`, creating it at zero if missing.
    fn add(&mut self, key: &str, amount: f64);

    /// Sum of all entries
    fn total(&self) -> f64;

    /// Sort by decreasing frequency. Ties keep their current order.
    fn sort_by_frequency(&mut self);
}

impl FrequencyTableExt for IndexMap<String, f64> {
    fn add(&mut self, key: &str, amount: f64) {
        match self.get_mut(key) {
            Some(count) => *count += amount,
            None => {
                self.insert(key.to_string(), amount);
            }
        }
    }

    fn total(&self) -> f64 {
        self.values().sum()
    }

    fn sort_by_frequency(&mut self) {
        self.sort_by(|_, a, _, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    }
}
