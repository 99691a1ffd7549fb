//! Corpus frequency tables
//!
//! A corpus is stored as percentages of the symbol total:
//!
//! ```text
//! {
//!   "corpus": "fr.txt",
//!   "symbols":  { "e": 12.1, "s": 6.42, ... },
//!   "digrams":  { "es": 2.874, ... },
//!   "trigrams": { "les": 1.05, ... }
//! }
//! ```

use crate::utils::{round_to, FrequencyTableExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Characters skipped when building a corpus. They also break n-gram chains.
pub const IGNORED_CHARS: &str = "1234567890 \t\r\n\u{feff}";

/// Smallest frequency kept in a built corpus
const MIN_FREQUENCY: f64 = 0.01;

/// Frequency table: n-gram to frequency
pub type FrequencyTable = IndexMap<String, f64>;

/// Error type for corpus loading
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Symbol, digram and trigram frequencies of a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// Source name
    #[serde(default)]
    pub corpus: String,
    #[serde(default)]
    pub symbols: FrequencyTable,
    #[serde(default)]
    pub digrams: FrequencyTable,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub trigrams: FrequencyTable,
}

impl Corpus {
    /// Parse a corpus dictionary
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a corpus dictionary from a JSON file
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let contents = fs::read_to_string(path)?;
        let corpus = Self::from_json(&contents)?;
        log::info!(
            "loaded corpus {} ({} symbols, {} digrams)",
            path.display(),
            corpus.symbols.len(),
            corpus.digrams.len()
        );
        Ok(corpus)
    }

    /// Count the symbols and n-grams of a text.
    ///
    /// Symbols are lowercased. Digits and whitespace are skipped and end the
    /// current n-gram chain.
    pub fn from_text(name: &str, text: &str) -> Self {
        let mut symbols = FrequencyTable::new();
        let mut digrams = FrequencyTable::new();
        let mut trigrams = FrequencyTable::new();
        let mut char_count = 0u64;
        let mut prev: Option<String> = None;
        let mut prev_prev: Option<String> = None;

        for c in text.chars() {
            if IGNORED_CHARS.contains(c) {
                prev = None;
                prev_prev = None;
                continue;
            }
            let symbol: String = c.to_lowercase().collect();
            char_count += 1;
            symbols.add(&symbol, 1.0);
            if let Some(p) = &prev {
                let digram = format!("{}{}", p, symbol);
                if let Some(pp) = &prev_prev {
                    trigrams.add(&format!("{}{}", pp, digram), 1.0);
                }
                digrams.add(&digram, 1.0);
            }
            prev_prev = prev.replace(symbol);
        }

        let total = char_count as f64;
        Self {
            corpus: name.to_string(),
            symbols: frequencies(symbols, total, 2),
            digrams: frequencies(digrams, total, 3),
            trigrams: frequencies(trigrams, total, 3),
        }
    }

    /// Load a text file and count it
    pub fn from_text_file(path: &Path) -> Result<Self, CorpusError> {
        let text = fs::read_to_string(path)?;
        let corpus = Self::from_text(&path.display().to_string(), &text);
        log::info!(
            "counted {} symbols in {}",
            corpus.symbols.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Average several corpora. Symbols and digrams are kept, rounded to two
    /// decimals, zero entries dropped.
    pub fn merge(corpora: &[Corpus]) -> Self {
        let n = corpora.len() as f64;
        let mut symbols = FrequencyTable::new();
        let mut digrams = FrequencyTable::new();
        for corpus in corpora {
            for (symbol, freq) in &corpus.symbols {
                symbols.add(symbol, freq / n);
            }
            for (digram, freq) in &corpus.digrams {
                digrams.add(digram, freq / n);
            }
        }
        Self {
            corpus: String::new(),
            symbols: rounded(symbols, 2),
            digrams: rounded(digrams, 2),
            trigrams: FrequencyTable::new(),
        }
    }

    /// Pretty JSON, tables in frequency order
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether the corpus has no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn frequencies(mut counts: FrequencyTable, total: f64, precision: u32) -> FrequencyTable {
    counts.sort_by_frequency();
    counts
        .into_iter()
        .map(|(key, count)| (key, round_to(100.0 * count / total, precision)))
        .filter(|(_, freq)| *freq >= MIN_FREQUENCY)
        .collect()
}

fn rounded(mut table: FrequencyTable, precision: u32) -> FrequencyTable {
    table.sort_by_frequency();
    table
        .into_iter()
        .map(|(key, freq)| (key, round_to(freq, precision)))
        .filter(|(_, freq)| *freq > 0.0)
        .collect()
}
