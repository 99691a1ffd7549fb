//! Timed key-press playback
//!
//! Plays a planned key sequence back one chord per interval, e.g. to animate
//! how a string is typed. Playback is plain state (a cursor plus the next due
//! instant) driven by the caller's clock through [`KeyPlayback::poll`]; no
//! timer thread is involved.

use super::layout::{Geometry, KeyChord};
use super::sequence::KeySequenceEntry;
use std::time::{Duration, Instant};

/// Identifies one playback started on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(pub(crate) u64);

impl PlaybackHandle {
    /// Numeric id, unique within a session
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Result of polling a playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStep {
    /// Press this chord now (an empty chord releases everything)
    Press(KeyChord),
    /// The sequence is over; reported exactly once
    Finished,
    /// Nothing is due
    Idle,
}

/// A running playback
#[derive(Debug, Clone)]
pub struct KeyPlayback {
    handle: PlaybackHandle,
    chords: Vec<KeyChord>,
    cursor: usize,
    interval: Duration,
    next_due: Instant,
    finished: bool,
}

impl KeyPlayback {
    /// Start a playback at `now`. The first chord is due one interval later.
    pub fn new(
        handle: PlaybackHandle,
        entries: impl IntoIterator<Item = KeySequenceEntry>,
        geometry: Geometry,
        interval: Duration,
        now: Instant,
    ) -> Self {
        let chords = entries
            .into_iter()
            .map(|entry| match entry.press() {
                Some(press) => KeyChord::for_press(press, geometry),
                None => KeyChord::default(),
            })
            .collect();
        Self {
            handle,
            chords,
            cursor: 0,
            interval,
            next_due: now + interval,
            finished: false,
        }
    }

    /// Handle returned when the playback started
    pub fn handle(&self) -> PlaybackHandle {
        self.handle
    }

    /// Delay between two chords
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next step is due
    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Chords not yet played
    pub fn remaining(&self) -> usize {
        self.chords.len() - self.cursor
    }

    /// Whether `Finished` has been reported
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by at most one step if it is due at `now`
    pub fn poll(&mut self, now: Instant) -> PlaybackStep {
        if self.finished || now < self.next_due {
            return PlaybackStep::Idle;
        }
        self.next_due += self.interval;
        match self.chords.get(self.cursor) {
            Some(chord) => {
                self.cursor += 1;
                PlaybackStep::Press(chord.clone())
            }
            None => {
                self.finished = true;
                PlaybackStep::Finished
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::resolver::KeyPress;

    const TICK: Duration = Duration::from_millis(250);

    fn playback(now: Instant) -> KeyPlayback {
        let entries = vec![
            KeySequenceEntry::Press(KeyPress::new("KeyA", 0)),
            KeySequenceEntry::Unresolved('z'),
            KeySequenceEntry::Press(KeyPress::new("KeyA", 1)),
        ];
        KeyPlayback::new(PlaybackHandle(1), entries, Geometry::Ansi, TICK, now)
    }

    #[test]
    fn nothing_is_due_before_the_first_interval() {
        let start = Instant::now();
        let mut playback = playback(start);
        assert_eq!(playback.poll(start), PlaybackStep::Idle);
        assert_eq!(playback.poll(start + TICK / 2), PlaybackStep::Idle);
        assert_eq!(playback.remaining(), 3);
    }

    #[test]
    fn plays_one_chord_per_interval_then_finishes_once() {
        let start = Instant::now();
        let mut playback = playback(start);

        let step = playback.poll(start + TICK);
        assert_eq!(step, PlaybackStep::Press(KeyChord { keys: vec!["KeyA".into()] }));
        // same instant, next step is not due yet
        assert_eq!(playback.poll(start + TICK), PlaybackStep::Idle);

        assert_eq!(playback.poll(start + TICK * 2), PlaybackStep::Press(KeyChord::default()));
        match playback.poll(start + TICK * 3) {
            PlaybackStep::Press(chord) => assert!(chord.contains("ShiftRight")),
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(playback.poll(start + TICK * 4), PlaybackStep::Finished);
        assert!(playback.is_finished());
        assert_eq!(playback.poll(start + TICK * 10), PlaybackStep::Idle);
    }

    #[test]
    fn late_polls_advance_one_step_at_a_time() {
        let start = Instant::now();
        let mut playback = playback(start);
        let late = start + TICK * 10;
        assert!(matches!(playback.poll(late), PlaybackStep::Press(_)));
        assert!(matches!(playback.poll(late), PlaybackStep::Press(_)));
        assert_eq!(playback.remaining(), 1);
    }
}
