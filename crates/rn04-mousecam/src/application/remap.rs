//! RemapSession: translates hook events into arrow-key holds.
//!
//! This use case sits at the application layer and delegates to a
//! [`KeyEmulator`] trait object for OS-level key injection. It owns the
//! [`CameraPan`] state machine; the hook thread stays free of remapping
//! logic.
//!
//! Synthesis failures are logged and skipped rather than propagated: a
//! failed press or release must never prevent the remaining transitions of
//! the same event from being attempted, or keys could be left stuck down.

use std::sync::Arc;

use tracing::warn;

use rn04_core::{CameraPan, KeyTransition};

use crate::infrastructure::hook::MouseEvent;
use crate::infrastructure::key_emulation::KeyEmulator;

/// The remap use case.
///
/// Consumes [`MouseEvent`]s from the hook channel and drives the platform
/// key emulator.
pub struct RemapSession {
    pan: CameraPan,
    keys: Arc<dyn KeyEmulator>,
}

impl RemapSession {
    /// Creates a new session with no active pan.
    pub fn new(keys: Arc<dyn KeyEmulator>) -> Self {
        Self {
            pan: CameraPan::new(),
            keys,
        }
    }

    /// `true` while a middle-button pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan.is_active()
    }

    /// Handles one event from the hook channel.
    pub fn handle_event(&mut self, event: MouseEvent) {
        match event {
            MouseEvent::MiddleDown { x, y, .. } => {
                self.pan.begin(x, y);
            }
            MouseEvent::Move { x, y, .. } => {
                let transitions = self.pan.motion(x, y);
                self.apply(&transitions);
            }
            MouseEvent::MiddleUp { .. } => {
                let transitions = self.pan.end();
                self.apply(&transitions);
            }
        }
    }

    /// Releases every arrow key, whether or not a pan is in progress.
    ///
    /// Called on shutdown so the process never exits with a key held down.
    pub fn shutdown(&mut self) {
        let transitions = self.pan.end();
        self.apply(&transitions);
    }

    /// Applies transitions in order, logging and skipping failures.
    fn apply(&self, transitions: &[KeyTransition]) {
        for transition in transitions {
            let result = match *transition {
                KeyTransition::Down(key) => self.keys.emit_key_down(key),
                KeyTransition::Up(key) => self.keys.emit_key_up(key),
            };
            if let Err(e) = result {
                warn!("arrow key synthesis failed: {}", e);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
