//! # rn04-core
//!
//! Shared library for the RN04 Launcher containing the directional remapping
//! logic, the launcher's timer and zoom domain rules, and the control protocol
//! spoken between the shell and the hook runtime.
//!
//! This crate is used by both the shell and the mousecam runtime.
//! It has zero dependencies on OS APIs, UI frameworks, or process spawning.
//!
//! # Architecture overview (for beginners)
//!
//! The RN04 Launcher is a desktop shell around a browser game.  Its flagship
//! convenience is "mousecam": while the middle mouse button is held, moving
//! the mouse steers the game camera by synthesizing held arrow keys.  The
//! global mouse hook that makes this work runs in a separate OS process (the
//! "hook runtime") so a misbehaving hook can never freeze the launcher.
//!
//! This crate (`rn04-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure business logic with no OS dependencies.  The most
//!   important piece is the directional mapper: the state machine that turns
//!   a cursor offset from the press point into edge-triggered arrow-key
//!   presses and releases.  The timer engine, zoom ladder, version ordering,
//!   and screenshot naming rules live here too.
//!
//! - **`protocol`** – How the shell and the hook runtime talk.  Messages are
//!   newline-delimited JSON objects tagged with a `type` field, carried over
//!   the child process's standard pipes.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `rn04_core::CameraPan` instead of `rn04_core::domain::pan::CameraPan`.
pub use domain::mapper::{DirectionKey, DirectionalMapper, KeyState, KeyTransition};
pub use domain::pan::CameraPan;
pub use domain::timer::{TimerEngine, TimerMode, TimerUpdate};
pub use protocol::messages::{ControlMessage, ProtocolError, StatusMessage};
