//! Normalized keyboard events
//!
//! Input adapters hand the session physical key codes (`KeyA`, `ShiftLeft`,
//! ...). Some sources still report the Meta keys under their legacy `OS`
//! name; [`normalize_code`] folds those into `MetaLeft`/`MetaRight`.

use std::fmt;
use thiserror::Error;

/// Type of keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    /// Key was pressed down
    Press,
    /// Key was released
    Release,
}

/// A key event carrying a normalized key code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key code
    pub code: String,
    /// Type of event (press/release)
    pub event_type: KeyEventType,
}

/// Error parsing a textual event script
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventParseError {
    #[error("empty key code in event {0:?}")]
    EmptyCode(String),
}

impl KeyEvent {
    /// Create an event, normalizing the key code
    pub fn new(code: &str, event_type: KeyEventType) -> Self {
        Self {
            code: normalize_code(code),
            event_type,
        }
    }

    /// Key-down event
    pub fn press(code: &str) -> Self {
        Self::new(code, KeyEventType::Press)
    }

    /// Key-up event
    pub fn release(code: &str) -> Self {
        Self::new(code, KeyEventType::Release)
    }

    /// Parse one event token: `+Code` presses, `-Code` releases, a bare
    /// `Code` taps (press then release).
    pub fn parse(token: &str) -> Result<Vec<KeyEvent>, EventParseError> {
        let token = token.trim();
        const PRESS: &[KeyEventType] = &[KeyEventType::Press];
        const RELEASE: &[KeyEventType] = &[KeyEventType::Release];
        const TAP: &[KeyEventType] = &[KeyEventType::Press, KeyEventType::Release];

        let (code, events) = if let Some(code) = token.strip_prefix('+') {
            (code, PRESS)
        } else if let Some(code) = token.strip_prefix('-') {
            (code, RELEASE)
        } else {
            (token, TAP)
        };
        if code.is_empty() {
            return Err(EventParseError::EmptyCode(token.to_string()));
        }
        Ok(events
            .iter()
            .map(|event_type| KeyEvent::new(code, *event_type))
            .collect())
    }

    /// Parse a whole event script, one token per item
    pub fn parse_all<'a, I>(tokens: I) -> Result<Vec<KeyEvent>, EventParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut events = Vec::new();
        for token in tokens {
            events.extend(Self::parse(token)?);
        }
        Ok(events)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event_type {
            KeyEventType::Press => write!(f, "+{}", self.code),
            KeyEventType::Release => write!(f, "-{}", self.code),
        }
    }
}

/// Fold the legacy `OSLeft`/`OSRight` codes into `MetaLeft`/`MetaRight`
pub fn normalize_code(code: &str) -> String {
    match code.strip_prefix("OS") {
        Some(rest) => format!("Meta{}", rest),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_keys_become_meta() {
        assert_eq!(normalize_code("OSLeft"), "MetaLeft");
        assert_eq!(normalize_code("OSRight"), "MetaRight");
        assert_eq!(normalize_code("KeyO"), "KeyO");
        assert_eq!(KeyEvent::press("OSLeft").code, "MetaLeft");
    }

    #[test]
    fn parse_press_release_and_tap() {
        assert_eq!(KeyEvent::parse("+ShiftLeft").unwrap(), vec![KeyEvent::press("ShiftLeft")]);
        assert_eq!(KeyEvent::parse("-ShiftLeft").unwrap(), vec![KeyEvent::release("ShiftLeft")]);
        assert_eq!(
            KeyEvent::parse("KeyA").unwrap(),
            vec![KeyEvent::press("KeyA"), KeyEvent::release("KeyA")]
        );
    }

    #[test]
    fn parse_rejects_empty_codes() {
        assert_eq!(
            KeyEvent::parse("+"),
            Err(EventParseError::EmptyCode("+".to_string()))
        );
        assert!(KeyEvent::parse("").is_err());
    }

    #[test]
    fn parse_all_keeps_order() {
        let events = KeyEvent::parse_all(["+ShiftLeft", "KeyA", "-ShiftLeft"]).unwrap();
        let script: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        assert_eq!(script, vec!["+ShiftLeft", "+KeyA", "-KeyA", "-ShiftLeft"]);
    }
}
