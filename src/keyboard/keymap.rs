//! Layout tables: per-key character maps and dead-key composition tables
//!
//! A layout is described by three pieces of data:
//!
//! ```text
//! {
//!   "keymap":   { "KeyQ": ["q", "Q"], "Quote": ["*´", "*¨"], ... },
//!   "deadkeys": { "*´": { "a": "á", "A": "Á" }, ... },
//!   "geometry": "iso"
//! }
//! ```
//!
//! Each key lists up to four values: base, shift, AltGr and Shift+AltGr.
//! Iteration order of both maps follows the source document and is significant
//! for every lookup that returns "the first match".

use super::layout::Geometry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Maximum number of values a key can hold (base, shift, AltGr, Shift+AltGr)
pub const MAX_LEVELS: usize = 4;

/// Key identifier to level values. Empty strings mark undefined slots.
pub type KeyMap = IndexMap<String, Vec<String>>;

/// Dead-key tag to `base -> composed` table.
pub type DeadKeyTable = IndexMap<String, IndexMap<String, String>>;

/// Error type for layout loading
#[derive(Debug, Error)]
pub enum LayoutError {
    /// IO error reading the layout file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The layout document is not valid JSON
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable description of a keyboard layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLayout")]
pub struct LayoutTable {
    /// Key identifier to produced values
    pub keymap: KeyMap,
    /// Dead-key composition tables
    pub deadkeys: DeadKeyTable,
    /// Physical geometry, `None` when missing or unrecognized
    pub geometry: Option<Geometry>,
}

/// Lenient wire shape: accepts both `keymap`/`deadkeys` and the
/// `layout`/`dead_keys` spelling, and tolerates `null` slots.
#[derive(Deserialize)]
struct RawLayout {
    #[serde(default, alias = "layout")]
    keymap: IndexMap<String, Vec<Option<String>>>,
    #[serde(default, alias = "dead_keys")]
    deadkeys: DeadKeyTable,
    #[serde(default)]
    geometry: Option<String>,
}

impl From<RawLayout> for LayoutTable {
    fn from(raw: RawLayout) -> Self {
        let keymap = raw
            .keymap
            .into_iter()
            .map(|(key, values)| {
                let values = values
                    .into_iter()
                    .take(MAX_LEVELS)
                    .map(Option::unwrap_or_default)
                    .collect();
                (key, values)
            })
            .collect();

        let geometry = raw.geometry.as_deref().and_then(Geometry::parse);
        if geometry.is_none() {
            log::debug!("layout geometry {:?} not recognized", raw.geometry);
        }

        Self {
            keymap,
            deadkeys: raw.deadkeys,
            geometry,
        }
    }
}

impl LayoutTable {
    /// Create a layout table from already-built maps
    pub fn new(keymap: KeyMap, deadkeys: DeadKeyTable, geometry: Option<Geometry>) -> Self {
        Self {
            keymap,
            deadkeys,
            geometry,
        }
    }

    /// Parse a layout from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let table: LayoutTable = serde_json::from_str(json)?;
        if table.keymap.is_empty() {
            log::warn!("layout has an empty key map, every character will be unsupported");
        }
        Ok(table)
    }

    /// Load a layout from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path)?;
        let table = Self::from_json(&contents)?;
        log::info!(
            "loaded layout {} ({} keys, {} dead keys)",
            path.display(),
            table.keymap.len(),
            table.deadkeys.len()
        );
        Ok(table)
    }

    /// Values of a key, if the key exists
    pub fn key(&self, key_id: &str) -> Option<&[String]> {
        self.keymap.get(key_id).map(Vec::as_slice)
    }

    /// Value stored at `level` for a key. Undefined slots yield `None`.
    pub fn value_at(&self, key_id: &str, level: usize) -> Option<&str> {
        self.keymap
            .get(key_id)
            .and_then(|values| values.get(level))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Composition table of a dead key
    pub fn dead_key_table(&self, tag: &str) -> Option<&IndexMap<String, String>> {
        self.deadkeys.get(tag)
    }

    /// Geometry to use: an explicit choice wins, then the layout's own tag,
    /// then ANSI.
    pub fn geometry_or(&self, explicit: Option<Geometry>) -> Geometry {
        explicit.or(self.geometry).unwrap_or_default()
    }
}

/// Build a key map from `(key, values)` pairs, keeping their order.
pub fn keymap_from<'a, I, V>(entries: I) -> KeyMap
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: IntoIterator<Item = &'a str>,
{
    entries
        .into_iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

/// Build a dead-key table from `(tag, [(base, composed)])` pairs.
pub fn deadkeys_from<'a, I, P>(entries: I) -> DeadKeyTable
where
    I: IntoIterator<Item = (&'a str, P)>,
    P: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(tag, pairs)| {
            let table = pairs
                .into_iter()
                .map(|(base, composed)| (base.to_string(), composed.to_string()))
                .collect();
            (tag.to_string(), table)
        })
        .collect()
}
