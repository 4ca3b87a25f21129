//! Recording key emulator for unit testing.
//!
//! # Why a mock emulator?
//!
//! The real emulator makes OS API calls that:
//!
//! - Require a desktop session to run.
//! - Actually press arrow keys on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! The `RecordingKeyEmulator` replaces the OS call with in-memory recording.
//! Each press and release is pushed into a `Mutex<Vec<...>>` so assertions
//! can inspect exactly what was emitted and in what order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to simulate OS injection failures. This lets you
//! test the warn-and-continue path in the remapper without a broken OS.

use std::sync::Mutex;

use rn04_core::DirectionKey;

use super::{KeyEmulator, SynthError};

/// A key emulator that records all calls without touching the OS.
///
/// Records are stored in `Mutex<Vec<...>>` fields so tests can share the
/// emulator across threads (e.g., when wrapping it in an `Arc`).
#[derive(Default)]
pub struct RecordingKeyEmulator {
    /// Records each (key, pressed) pair in call order. `true` is a press.
    pub events: Mutex<Vec<(DirectionKey, bool)>>,
    /// When `true`, every method immediately returns a `SynthError::Platform`.
    pub should_fail: bool,
}

impl RecordingKeyEmulator {
    /// Creates a new recorder with empty records and `should_fail = false`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded (key, pressed) pairs.
    pub fn recorded(&self) -> Vec<(DirectionKey, bool)> {
        self.events.lock().unwrap().clone()
    }

    /// The set of keys currently held according to the recording.
    pub fn held_keys(&self) -> Vec<DirectionKey> {
        let events = self.events.lock().unwrap();
        DirectionKey::ALL
            .into_iter()
            .filter(|key| {
                events
                    .iter()
                    .rev()
                    .find(|(k, _)| k == key)
                    .map(|(_, pressed)| *pressed)
                    .unwrap_or(false)
            })
            .collect()
    }
}

impl KeyEmulator for RecordingKeyEmulator {
    /// Records the press, or returns an error if `should_fail` is set.
    fn emit_key_down(&self, key: DirectionKey) -> Result<(), SynthError> {
        if self.should_fail {
            return Err(SynthError::Platform("mock failure".into()));
        }
        self.events.lock().unwrap().push((key, true));
        Ok(())
    }

    /// Records the release, or returns an error if `should_fail` is set.
    fn emit_key_up(&self, key: DirectionKey) -> Result<(), SynthError> {
        if self.should_fail {
            return Err(SynthError::Platform("mock failure".into()));
        }
        self.events.lock().unwrap().push((key, false));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_preserves_call_order() {
        // Arrange
        let emulator = RecordingKeyEmulator::new();

        // Act
        emulator.emit_key_down(DirectionKey::Left).unwrap();
        emulator.emit_key_up(DirectionKey::Left).unwrap();
        emulator.emit_key_down(DirectionKey::Up).unwrap();

        // Assert
        assert_eq!(
            emulator.recorded(),
            vec![
                (DirectionKey::Left, true),
                (DirectionKey::Left, false),
                (DirectionKey::Up, true),
            ]
        );
    }

    #[test]
    fn test_held_keys_tracks_latest_state_per_key() {
        let emulator = RecordingKeyEmulator::new();
        emulator.emit_key_down(DirectionKey::Left).unwrap();
        emulator.emit_key_down(DirectionKey::Down).unwrap();
        emulator.emit_key_up(DirectionKey::Left).unwrap();

        assert_eq!(emulator.held_keys(), vec![DirectionKey::Down]);
    }

    #[test]
    fn test_should_fail_returns_platform_error() {
        let emulator = RecordingKeyEmulator {
            should_fail: true,
            ..Default::default()
        };

        let result = emulator.emit_key_down(DirectionKey::Right);

        assert!(matches!(result, Err(SynthError::Platform(_))));
        assert!(emulator.recorded().is_empty());
    }
}
