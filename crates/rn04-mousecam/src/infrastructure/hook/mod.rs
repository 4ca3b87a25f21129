//! Mouse hook infrastructure for the hook runtime.
//!
//! On Windows, this installs a low-level mouse hook (WH_MOUSE_LL) on a
//! dedicated Win32 message loop thread. The events the remapper cares about
//! are placed into an `mpsc` channel and consumed by a single worker thread.
//!
//! # Windows-Specific Implementation
//!
//! The hook callback must complete within ~300ms or Windows will remove the
//! hook. The callback therefore only updates atomics, decides swallow vs
//! forward, and pushes onto the channel; all remapping work is deferred to
//! the consumer.
//!
//! # Testability
//!
//! The `MouseHook` trait allows unit tests to inject synthetic events without
//! requiring Windows hooks.

use std::sync::mpsc;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// An event forwarded by the mouse hook.
///
/// Only what the remapper needs crosses the channel: middle-button edges,
/// always, and cursor positions while a pan is active. Moves outside a pan
/// are forwarded to the OS untouched and never reach the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
    /// The middle button went down (this event was swallowed).
    MiddleDown {
        /// Absolute X in virtual screen coordinates (multi-monitor aware).
        x: i32,
        /// Absolute Y in virtual screen coordinates.
        y: i32,
        /// Milliseconds since system start (from the hook struct).
        time_ms: u32,
    },
    /// The middle button went up (this event was swallowed).
    MiddleUp { x: i32, y: i32, time_ms: u32 },
    /// The cursor moved while the middle button was held.
    Move { x: i32, y: i32, time_ms: u32 },
}

/// Error type for hook operations.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to install mouse hook: {0}")]
    InstallFailed(String),
    #[error("hook has already been installed")]
    AlreadyInstalled,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting the global mouse hook.
///
/// The production implementation uses a Windows hook; tests use
/// [`mock::MockMouseHook`].
pub trait MouseHook: Send {
    /// Installs the hook and returns a receiver for forwarded events.
    fn install(&self) -> Result<mpsc::Receiver<MouseEvent>, HookError>;
    /// Uninstalls the hook and releases all OS resources.
    ///
    /// The event sender is dropped as part of uninstalling, so the consumer
    /// sees the channel disconnect once queued events drain.
    fn uninstall(&self);
}
