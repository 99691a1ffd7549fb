//! Keyboard layout emulation: layout tables, modifier tracking, dead keys
//! and character-to-key planning

pub mod deadkey;
mod event;
pub mod keymap;
pub mod labels;
pub mod layout;
pub mod modifiers;
mod playback;
pub mod resolver;
pub mod sequence;
mod session;

pub use deadkey::{is_dead_key, DeadKeyCandidate, DeadKeyIndex, DEAD_KEY_SENTINEL};
pub use event::{normalize_code, EventParseError, KeyEvent, KeyEventType};
pub use keymap::{DeadKeyTable, KeyMap, LayoutError, LayoutTable, MAX_LEVELS};
pub use labels::{alt_upper_char, dead_key_symbol, display_label, key_cap_labels, KeyCapLabels};
pub use layout::{standard_finger, FingerMap, Geometry, Hand, KeyChord, TYPING_FINGERS};
pub use modifiers::{altgr_state, modifier_level, shift_state, Modifier, ModifierSet, Platform};
pub use playback::{KeyPlayback, PlaybackHandle, PlaybackStep};
pub use resolver::{find_key, key_list, resolve, KeyPress, Resolved};
pub use sequence::{key_sequence, KeySequence, KeySequenceEntry};
pub use session::{DeadKeyHint, DeadKeyTransition, KeyDownOutcome, Layout, Session};
