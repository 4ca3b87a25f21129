//! Synthetic arrow-key injection.
//!
//! The remapper turns pan offsets into arrow-key holds. This module owns the
//! platform seam for pressing and releasing those keys: the production
//! implementation injects input through the OS, tests record calls with
//! [`mock::RecordingKeyEmulator`]. The correct implementation is selected at
//! compile time via `#[cfg(target_os = ...)]`.

use rn04_core::DirectionKey;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for key synthesis.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The OS rejected the injected input.
    #[error("key synthesis failed: {0}")]
    Platform(String),
}

/// Trait abstracting synthetic arrow-key presses and releases.
///
/// Implementations must hold a key down until the matching `emit_key_up`,
/// exactly like a physical keyboard would.
pub trait KeyEmulator: Send + Sync {
    /// Presses (and holds) the arrow key for `key`.
    fn emit_key_down(&self, key: DirectionKey) -> Result<(), SynthError>;

    /// Releases the arrow key for `key`.
    fn emit_key_up(&self, key: DirectionKey) -> Result<(), SynthError>;
}
