//! rn04-mousecam library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does rn04-mousecam do? (for beginners)
//!
//! The *hook runtime* is a small helper process the launcher shell spawns to
//! host the global low-level mouse hook.  Windows silently uninstalls a hook
//! whose callback is slow, and a buggy hook can degrade input for the whole
//! desktop — so the hook lives in its own process where the worst it can do
//! is get itself killed and relaunched by the shell.
//!
//! The runtime:
//!
//! 1. Reads its launch configuration from the artifact file the shell wrote
//!    (or falls back to defaults when started by hand).
//! 2. Installs a `WH_MOUSE_LL` hook on a dedicated message-loop thread.
//! 3. Swallows middle-button presses and releases; while the middle button
//!    is held, streams throttled move events to the remap worker.
//! 4. The worker maps each cursor offset to arrow-key transitions and injects
//!    them with `SendInput`.
//! 5. On stop (stdin line, stdin EOF, or Ctrl-C) it releases every synthetic
//!    key, uninstalls the hook, and exits.

/// Application layer: the remap worker.
pub mod application;

/// Infrastructure layer: the OS hook and key synthesis adapters.
pub mod infrastructure;
