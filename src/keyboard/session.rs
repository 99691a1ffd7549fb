//! Keyboard emulation session
//!
//! A [`Layout`] bundles the immutable layout tables with their dead-key index.
//! A [`Session`] types on a layout: it tracks modifiers and at most one
//! pending dead key, and turns key-down events into text.

use super::deadkey::{is_dead_key, DeadKeyIndex};
use super::keymap::{DeadKeyTable, KeyMap, LayoutError, LayoutTable};
use super::labels::alt_upper_char;
use super::layout::Geometry;
use super::modifiers::{ModifierSet, Platform};
use super::playback::{KeyPlayback, PlaybackHandle, PlaybackStep};
use super::resolver::{find_key, key_list, KeyPress};
use super::sequence::{key_sequence, KeySequence};
use indexmap::IndexMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout tables plus the dead-key index derived from them
#[derive(Debug, Clone, Default)]
pub struct Layout {
    table: LayoutTable,
    index: DeadKeyIndex,
}

impl Layout {
    /// Wrap a layout table and index its dead keys
    pub fn new(table: LayoutTable) -> Self {
        let index = DeadKeyIndex::build(&table.keymap, &table.deadkeys);
        log::debug!("indexed {} dead-key compositions", index.len());
        Self { table, index }
    }

    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(Self::new(LayoutTable::from_json(json)?))
    }

    /// Load a layout from a JSON file
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        Ok(Self::new(LayoutTable::load(path)?))
    }

    /// Underlying layout table
    pub fn table(&self) -> &LayoutTable {
        &self.table
    }

    /// Key map of the layout
    pub fn keymap(&self) -> &KeyMap {
        &self.table.keymap
    }

    /// Dead-key composition tables
    pub fn deadkeys(&self) -> &DeadKeyTable {
        &self.table.deadkeys
    }

    /// Composed character to dead-key sequence
    pub fn dead_key_index(&self) -> &DeadKeyIndex {
        &self.index
    }

    /// Effective geometry (ANSI when the layout does not say)
    pub fn geometry(&self) -> Geometry {
        self.table.geometry_or(None)
    }

    /// Best key to type a character directly
    pub fn get_key(&self, c: char) -> Option<KeyPress> {
        find_key(&self.table.keymap, c.encode_utf8(&mut [0u8; 4]))
    }

    /// Every key typing a character directly, least-modified first
    pub fn key_list(&self, c: char) -> Vec<KeyPress> {
        key_list(&self.table.keymap, c.encode_utf8(&mut [0u8; 4]))
    }

    /// Plan the key presses typing `text`
    pub fn key_sequence<'a>(&'a self, text: &'a str) -> KeySequence<'a> {
        key_sequence(&self.table.keymap, &self.index, text)
    }
}

impl From<LayoutTable> for Layout {
    fn from(table: LayoutTable) -> Self {
        Self::new(table)
    }
}

/// How a key-down changed the dead-key state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadKeyTransition {
    /// No dead key was involved
    None,
    /// This key latched the given dead key
    Latched(String),
    /// A pending dead key was consumed by this key
    Released,
}

/// Result of a key-down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDownOutcome {
    /// Produced text, possibly empty
    pub text: String,
    /// AltGr is active after this event
    pub altgr: bool,
    pub dead_key: DeadKeyTransition,
    /// Control, Alt or Meta is held without AltGr
    pub is_shortcut: bool,
}

impl KeyDownOutcome {
    /// Text to insert: nothing while a shortcut chord is held
    pub fn input_text(&self) -> &str {
        if self.is_shortcut {
            ""
        } else {
            &self.text
        }
    }
}

/// Composed characters a key leads to while a dead key is pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadKeyHint {
    pub key_id: String,
    /// Composed from the base value
    pub base: String,
    /// Composed from the shifted value, hidden when it is the uppercase of `base`
    pub shift: String,
}

/// Live emulation state over one layout
#[derive(Debug, Clone)]
pub struct Session {
    layout: Layout,
    platform: Platform,
    modifiers: ModifierSet,
    // tag of the latched dead key
    pending: Option<String>,
    playback: Option<KeyPlayback>,
    next_handle: u64,
}

impl Session {
    /// Session with every modifier released and no pending dead key
    pub fn new(layout: Layout, platform: Platform) -> Self {
        Self {
            layout,
            platform,
            modifiers: ModifierSet::RELEASED,
            pending: None,
            playback: None,
            next_handle: 1,
        }
    }

    /// Layout being typed on
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Switch layouts. Modifiers, the pending dead key and any playback are dropped.
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.reset();
        self.cancel_playback();
    }

    /// Platform selecting the AltGr convention
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Switch the AltGr convention. Held modifiers are kept.
    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    /// Currently held modifiers
    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    /// Either Shift key is held
    pub fn shift(&self) -> bool {
        self.modifiers.shift()
    }

    /// AltGr is active
    pub fn altgr(&self) -> bool {
        self.modifiers.altgr(self.platform)
    }

    /// Current shift level in `0..=3`
    pub fn level(&self) -> u8 {
        self.modifiers.level(self.platform)
    }

    /// Tag of the latched dead key
    pub fn pending_dead_key(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Release every modifier and drop the pending dead key
    pub fn reset(&mut self) {
        self.modifiers = ModifierSet::RELEASED;
        self.pending = None;
    }

    /// Text produced by pressing `code`
    pub fn key_down(&mut self, code: &str) -> String {
        self.modifiers.key_down(code);

        let Some(values) = self.layout.table.keymap.get(code) else {
            log::debug!("key {} is not in the layout", code);
            return String::new();
        };
        let level = self.modifiers.level(self.platform) as usize;
        let value = values.get(level).map(String::as_str).unwrap_or("");

        if let Some(tag) = self.pending.take() {
            let composed = self
                .layout
                .table
                .deadkeys
                .get(&tag)
                .and_then(|table| table.get(value))
                .cloned()
                .unwrap_or_default();
            log::debug!("dead key {} released by {}: {:?}", tag, code, composed);
            return composed;
        }

        if is_dead_key(value) {
            if self.layout.table.deadkeys.contains_key(value) {
                log::debug!("dead key {} latched", value);
                self.pending = Some(value.to_string());
            } else {
                log::debug!("dead key {} has no composition table", value);
            }
            return String::new();
        }

        value.to_string()
    }

    /// Key-down with the UI feedback an input adapter needs
    pub fn key_down_event(&mut self, code: &str) -> KeyDownOutcome {
        let was_pending = self.pending.is_some();
        let text = self.key_down(code);
        let altgr = self.altgr();

        let dead_key = match (was_pending, &self.pending) {
            (true, None) => DeadKeyTransition::Released,
            (false, Some(tag)) => DeadKeyTransition::Latched(tag.clone()),
            _ => DeadKeyTransition::None,
        };
        let is_shortcut = !altgr && self.modifiers.has_command_modifier();

        KeyDownOutcome {
            text,
            altgr,
            dead_key,
            is_shortcut,
        }
    }

    /// Release `code`. Only modifier state changes.
    pub fn key_up(&mut self, code: &str) {
        self.modifiers.key_up(code);
    }

    /// For every key, the characters it composes with the pending dead key.
    /// Empty when no dead key is pending.
    pub fn dead_key_hints(&self) -> Vec<DeadKeyHint> {
        let Some(table) = self
            .pending
            .as_ref()
            .and_then(|tag| self.layout.table.deadkeys.get(tag))
        else {
            return Vec::new();
        };
        let composed = |values: &[String], level: usize| -> String {
            values
                .get(level)
                .and_then(|value| table.get(value))
                .cloned()
                .unwrap_or_default()
        };

        self.layout
            .table
            .keymap
            .iter()
            .filter_map(|(key_id, values)| {
                let base = composed(values, 0);
                let shift = composed(values, 1);
                let shift = alt_upper_char(&base, &shift).to_string();
                if base.is_empty() && shift.is_empty() {
                    return None;
                }
                Some(DeadKeyHint {
                    key_id: key_id.clone(),
                    base,
                    shift,
                })
            })
            .collect()
    }

    /// Dead-key hints keyed by key id
    pub fn dead_key_hint_map(&self) -> IndexMap<String, DeadKeyHint> {
        self.dead_key_hints()
            .into_iter()
            .map(|hint| (hint.key_id.clone(), hint))
            .collect()
    }

    /// Best key to type a character directly
    pub fn get_key(&self, c: char) -> Option<KeyPress> {
        self.layout.get_key(c)
    }

    /// Plan the key presses typing `text`
    pub fn key_sequence<'a>(&'a self, text: &'a str) -> KeySequence<'a> {
        self.layout.key_sequence(text)
    }

    /// Start playing back the key presses typing `text`, replacing any
    /// playback already running.
    pub fn press_keys(&mut self, text: &str, interval: Duration, now: Instant) -> PlaybackHandle {
        self.cancel_playback();
        let handle = PlaybackHandle(self.next_handle);
        self.next_handle += 1;

        let entries: Vec<_> = self.layout.key_sequence(text).iter().collect();
        let geometry = self.layout.geometry();
        log::debug!("playback {} started ({} steps)", handle.id(), entries.len());
        self.playback = Some(KeyPlayback::new(handle, entries, geometry, interval, now));
        handle
    }

    /// Stop the running playback. Returns whether one was running.
    pub fn cancel_playback(&mut self) -> bool {
        match self.playback.take() {
            Some(playback) => {
                log::debug!("playback {} cancelled", playback.handle().id());
                true
            }
            None => false,
        }
    }

    /// Handle of the running playback
    pub fn active_playback(&self) -> Option<PlaybackHandle> {
        self.playback.as_ref().map(KeyPlayback::handle)
    }

    /// Drive the running playback
    pub fn poll_playback(&mut self, now: Instant) -> PlaybackStep {
        let Some(playback) = self.playback.as_mut() else {
            return PlaybackStep::Idle;
        };
        let step = playback.poll(now);
        if step == PlaybackStep::Finished {
            self.playback = None;
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keymap::{deadkeys_from, keymap_from};
    use crate::keyboard::modifiers::Modifier;

    fn layout() -> Layout {
        let keymap = keymap_from([
            ("KeyA", vec!["a", "A", "æ", "Æ"]),
            ("KeyE", vec!["e", "E", "€"]),
            ("KeyX", vec!["x", "X"]),
            ("Quote", vec!["*´", "*¨"]),
            ("Backquote", vec!["*`", "~"]),
            ("Space", vec![" ", " "]),
        ]);
        let deadkeys = deadkeys_from([
            ("*´", vec![("a", "á"), ("A", "Á"), ("e", "é"), (" ", "´")]),
            ("*¨", vec![("a", "ä"), ("e", "ë")]),
        ]);
        Layout::new(LayoutTable::new(keymap, deadkeys, None))
    }

    fn session(platform: Platform) -> Session {
        Session::new(layout(), platform)
    }

    #[test]
    fn new_session_starts_released() {
        let s = session(Platform::Linux);
        assert!(s.modifiers().is_empty());
        assert_eq!(s.pending_dead_key(), None);
        assert_eq!(s.level(), 0);
    }

    #[test]
    fn types_each_level() {
        let mut s = session(Platform::Linux);
        assert_eq!(s.key_down("KeyA"), "a");
        s.key_down("ShiftLeft");
        assert_eq!(s.key_down("KeyA"), "A");
        s.key_down("AltRight");
        assert_eq!(s.key_down("KeyA"), "Æ");
        s.key_up("ShiftLeft");
        assert_eq!(s.key_down("KeyA"), "æ");
    }

    #[test]
    fn undefined_slot_is_empty() {
        let mut s = session(Platform::Linux);
        s.key_down("ShiftLeft");
        s.key_down("AltRight");
        assert_eq!(s.key_down("KeyE"), "");
        assert_eq!(s.key_down("KeyX"), "");
    }

    #[test]
    fn unknown_key_is_empty_but_tracks_modifiers() {
        let mut s = session(Platform::Linux);
        assert_eq!(s.key_down("F13"), "");
        assert_eq!(s.key_down("ShiftRight"), "");
        assert!(s.modifiers().is_held(Modifier::ShiftRight));
    }

    #[test]
    fn dead_key_composes_with_next_key() {
        let mut s = session(Platform::Linux);
        assert_eq!(s.key_down("Quote"), "");
        assert_eq!(s.pending_dead_key(), Some("*´"));
        assert_eq!(s.key_down("KeyE"), "é");
        assert_eq!(s.pending_dead_key(), None);
        assert_eq!(s.key_down("KeyE"), "e");
    }

    #[test]
    fn modifier_presses_do_not_consume_the_dead_key() {
        let mut s = session(Platform::Linux);
        s.key_down("Quote");
        s.key_down("ShiftLeft");
        assert_eq!(s.pending_dead_key(), Some("*´"));
        assert_eq!(s.key_down("KeyA"), "Á");
    }

    #[test]
    fn non_combining_key_is_swallowed() {
        let mut s = session(Platform::Linux);
        s.key_down("Quote");
        assert_eq!(s.key_down("KeyX"), "");
        assert_eq!(s.pending_dead_key(), None);
        assert_eq!(s.key_down("KeyX"), "x");
    }

    #[test]
    fn second_dead_key_collapses() {
        let mut s = session(Platform::Linux);
        s.key_down("Quote");
        // `*´` has no entry for the `*´` tag itself
        assert_eq!(s.key_down("Quote"), "");
        assert_eq!(s.pending_dead_key(), None);
        assert_eq!(s.key_down("KeyA"), "a");
    }

    #[test]
    fn dead_key_without_table_latches_nothing() {
        let mut s = session(Platform::Linux);
        assert_eq!(s.key_down("Backquote"), "");
        assert_eq!(s.pending_dead_key(), None);
        assert_eq!(s.key_down("KeyA"), "a");
    }

    #[test]
    fn reset_clears_pending_and_modifiers() {
        let mut s = session(Platform::Linux);
        s.key_down("ShiftLeft");
        s.key_down("Quote");
        s.reset();
        assert!(s.modifiers().is_empty());
        assert_eq!(s.pending_dead_key(), None);
    }

    #[test]
    fn windows_ctrl_alt_is_altgr() {
        let mut s = session(Platform::Windows);
        s.key_down("ControlLeft");
        s.key_down("AltLeft");
        let outcome = s.key_down_event("KeyE");
        assert_eq!(outcome.text, "€");
        assert!(outcome.altgr);
        assert!(!outcome.is_shortcut);
        assert_eq!(outcome.input_text(), "€");
    }

    #[test]
    fn set_platform_keeps_held_modifiers() {
        let mut s = session(Platform::Windows);
        s.key_down("ControlLeft");
        s.key_down("AltLeft");
        assert!(s.altgr());

        s.set_platform(Platform::Linux);
        assert_eq!(s.platform(), Platform::Linux);
        assert!(s.modifiers().is_held(Modifier::AltLeft));
        assert!(!s.altgr());
        assert_eq!(s.level(), 0);
        assert_eq!(s.layout().keymap().len(), 6);
    }

    #[test]
    fn control_shortcut_is_not_typed() {
        let mut s = session(Platform::Linux);
        s.key_down("ControlLeft");
        let outcome = s.key_down_event("KeyA");
        assert_eq!(outcome.text, "a");
        assert!(outcome.is_shortcut);
        assert_eq!(outcome.input_text(), "");
    }

    #[test]
    fn outcome_reports_dead_key_transitions() {
        let mut s = session(Platform::Linux);
        let latched = s.key_down_event("Quote");
        assert_eq!(latched.dead_key, DeadKeyTransition::Latched("*´".to_string()));
        let released = s.key_down_event("KeyA");
        assert_eq!(released.dead_key, DeadKeyTransition::Released);
        assert_eq!(released.text, "á");
        assert_eq!(s.key_down_event("KeyA").dead_key, DeadKeyTransition::None);
    }

    #[test]
    fn hints_follow_the_pending_dead_key() {
        let mut s = session(Platform::Linux);
        assert!(s.dead_key_hints().is_empty());
        s.key_down("Quote");
        let hints = s.dead_key_hint_map();
        assert_eq!(hints["KeyA"].base, "á");
        // "Á" is the uppercase of "á"
        assert_eq!(hints["KeyA"].shift, "");
        assert_eq!(hints["KeyE"].base, "é");
        assert_eq!(hints["Space"].base, "´");
        assert!(!hints.contains_key("KeyX"));
    }

    #[test]
    fn layout_lookups() {
        let layout = layout();
        assert_eq!(layout.get_key('A'), Some(KeyPress::new("KeyA", 1)));
        assert_eq!(layout.key_list('~'), vec![KeyPress::new("Backquote", 1)]);
        assert_eq!(layout.geometry(), Geometry::Ansi);
        assert!(layout.dead_key_index().contains("ë"));
    }

    #[test]
    fn press_keys_replaces_running_playback() {
        let mut s = session(Platform::Linux);
        let start = Instant::now();
        let tick = Duration::from_millis(100);

        let first = s.press_keys("ab", tick, start);
        let second = s.press_keys("á", tick, start);
        assert_ne!(first, second);
        assert_eq!(s.active_playback(), Some(second));

        let mut pressed = Vec::new();
        let mut now = start;
        loop {
            now += tick;
            match s.poll_playback(now) {
                PlaybackStep::Press(chord) => pressed.push(chord.to_string()),
                PlaybackStep::Finished => break,
                PlaybackStep::Idle => panic!("playback stalled"),
            }
        }
        assert_eq!(pressed, vec!["Quote", "KeyA"]);
        assert_eq!(s.active_playback(), None);
        assert_eq!(s.poll_playback(now + tick), PlaybackStep::Idle);
    }

    #[test]
    fn cancel_playback_stops_it() {
        let mut s = session(Platform::Linux);
        let start = Instant::now();
        s.press_keys("a", Duration::from_millis(10), start);
        assert!(s.cancel_playback());
        assert!(!s.cancel_playback());
        assert_eq!(s.poll_playback(start + Duration::from_secs(1)), PlaybackStep::Idle);
    }

    #[test]
    fn set_layout_resets_state() {
        let mut s = session(Platform::Linux);
        s.key_down("ShiftLeft");
        s.key_down("Quote");
        s.set_layout(Layout::default());
        assert!(s.modifiers().is_empty());
        assert_eq!(s.pending_dead_key(), None);
        assert_eq!(s.key_down("KeyA"), "");
    }
}
