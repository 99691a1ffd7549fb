//! Keyboard Emulator - keyboard layout emulation and typing analytics
//!
//! Emulates what a keyboard layout types for a stream of physical key
//! events (modifier levels, AltGr conventions, dead keys), plans the key
//! presses needed to type a string, and measures finger load and
//! same-finger usage of a text corpus on a layout.

pub mod analytics;
pub mod config;
pub mod keyboard;
pub mod report;
pub mod utils;

pub use config::Config;
pub use keyboard::{Layout, Platform, Session};
