//! Corpus analytics for a layout: key strikes, finger load and
//! same-finger/same-key usage

mod chars;
mod corpus;
mod digrams;
mod load;

pub use chars::SupportedChars;
pub use corpus::{Corpus, CorpusError, FrequencyTable, IGNORED_CHARS};
pub use digrams::{transition, DigramUsage, Transition};
pub use load::{FingerLoad, KeyCounts};

use crate::keyboard::{FingerMap, Layout, LayoutTable};
use crate::utils::round_to;
use indexmap::IndexMap;
use std::borrow::Cow;

/// Values the Enter key produces when mapped for analysis
const ENTER_VALUES: [&str; 2] = ["\r", "\n"];

/// Most decimal places an f64 percentage can carry
pub const MAX_PRECISION: u32 = 15;

/// Runs a corpus against a layout
pub struct Analyzer<'a> {
    layout: &'a Layout,
    fingers: FingerMap,
    map_enter_key: bool,
    precision: u32,
}

impl<'a> Analyzer<'a> {
    /// Analyzer with Enter mapped and two-decimal precision
    pub fn new(layout: &'a Layout, fingers: FingerMap) -> Self {
        Self {
            layout,
            fingers,
            map_enter_key: true,
            precision: 2,
        }
    }

    /// Count line breaks as Enter strokes
    pub fn map_enter_key(mut self, enabled: bool) -> Self {
        self.map_enter_key = enabled;
        self
    }

    /// Decimal places of reported percentages, at most [`MAX_PRECISION`]
    pub fn precision(mut self, decimals: u32) -> Self {
        if decimals > MAX_PRECISION {
            log::warn!("precision {} capped to {}", decimals, MAX_PRECISION);
        }
        self.precision = decimals.min(MAX_PRECISION);
        self
    }

    /// Finger assignment the load is computed over
    pub fn fingers(&self) -> &FingerMap {
        &self.fingers
    }

    /// Layout the corpus is typed on: the analyzed layout, plus an Enter
    /// key producing line breaks when Enter is mapped.
    pub fn typing_layout(&self) -> Cow<'a, Layout> {
        if !self.map_enter_key {
            return Cow::Borrowed(self.layout);
        }
        let table = self.layout.table();
        let mut keymap = table.keymap.clone();
        keymap.insert(
            "Enter".to_string(),
            ENTER_VALUES.iter().map(|v| v.to_string()).collect(),
        );
        Cow::Owned(Layout::new(LayoutTable::new(
            keymap,
            table.deadkeys.clone(),
            table.geometry,
        )))
    }

    /// Character table used for key strikes
    pub fn supported_chars(&self) -> SupportedChars {
        let layout = self.typing_layout();
        SupportedChars::build(layout.keymap(), layout.deadkeys())
    }

    /// Key strikes, finger load and digram usage of `corpus`
    pub fn analyze(&self, corpus: &Corpus) -> Analysis {
        let layout = self.typing_layout();
        let chars = SupportedChars::build(layout.keymap(), layout.deadkeys());
        let key_counts = KeyCounts::count(&chars, &corpus.symbols);
        let load = FingerLoad::compute(&key_counts, &self.fingers);
        let digrams = DigramUsage::analyze(&layout, &self.fingers, &corpus.digrams);
        if !key_counts.unsupported.is_empty() {
            log::warn!(
                "{} symbols of the corpus cannot be typed on this layout",
                key_counts.unsupported.len()
            );
        }

        let p = self.precision;
        let round_table = |table: &IndexMap<String, f64>| -> IndexMap<String, f64> {
            table
                .iter()
                .map(|(key, value)| (key.clone(), round_to(*value, p)))
                .collect()
        };

        Analysis {
            key_counts: round_table(&key_counts.counts),
            finger_load: round_table(&load.fingers),
            left_hand: round_to(load.left, p),
            right_hand: round_to(load.right, p),
            same_finger: round_table(&digrams.same_finger),
            same_key: round_table(&digrams.same_key),
            sfu_total: round_to(digrams.sfu(), p),
            sku_total: round_to(digrams.sku(), p),
            unsupported_total: round_to(key_counts.unsupported_total, p),
            unsupported_chars: key_counts.unsupported,
            unsupported_digrams: digrams.unsupported,
        }
    }
}

/// Analytics of one corpus on one layout. Percentages are rounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Strikes per key, in corpus frequency units
    pub key_counts: IndexMap<String, f64>,
    /// Percent of keystrokes per finger
    pub finger_load: IndexMap<String, f64>,
    pub left_hand: f64,
    pub right_hand: f64,
    /// Same-finger digrams, most frequent first
    pub same_finger: IndexMap<String, f64>,
    /// Same-key digrams, most frequent first
    pub same_key: IndexMap<String, f64>,
    pub sfu_total: f64,
    pub sku_total: f64,
    pub unsupported_chars: Vec<String>,
    /// Corpus frequency of the unsupported characters
    pub unsupported_total: f64,
    pub unsupported_digrams: Vec<String>,
}

impl Analysis {
    /// Summary lines for display
    pub fn results(&self) -> Vec<AnalysisResult> {
        let mut results = Vec::new();
        for (finger, load) in &self.finger_load {
            results.push(AnalysisResult::info(format!("Finger {}", finger), format!("{}%", load)));
        }
        results.push(AnalysisResult::info("Left hand", format!("{}%", self.left_hand)));
        results.push(AnalysisResult::info("Right hand", format!("{}%", self.right_hand)));
        results.push(AnalysisResult::info("Same finger usage", format!("{}%", self.sfu_total)));
        results.push(AnalysisResult::info("Same key usage", format!("{}%", self.sku_total)));

        let top: Vec<&str> = self.same_finger.keys().take(10).map(String::as_str).collect();
        if !top.is_empty() {
            results.push(AnalysisResult::info("Top SFU digrams", top.join(" ")));
        }

        if self.unsupported_chars.is_empty() {
            results.push(AnalysisResult::ok("Unsupported characters", "none"));
        } else {
            results.push(AnalysisResult::warning(
                "Unsupported characters",
                format!("{:?} ({}%)", self.unsupported_chars, self.unsupported_total),
            ));
        }
        if !self.unsupported_digrams.is_empty() {
            results.push(AnalysisResult::warning(
                "Unsupported digrams",
                self.unsupported_digrams.len().to_string(),
            ));
        }
        results
    }
}

/// A single analysis result line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub label: String,
    pub value: String,
    pub status: ResultStatus,
}

impl AnalysisResult {
    /// Create a result line
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    /// Passing result line
    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Ok)
    }

    /// Result line pointing at a problem
    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Warning)
    }

    /// Informational result line
    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Info)
    }
}

/// Status of a result line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Warning,
    Info,
}
