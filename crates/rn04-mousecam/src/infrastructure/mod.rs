//! Infrastructure layer for the hook runtime.
//!
//! Contains the OS-facing adapters: the global mouse hook and the synthetic
//! key injection API.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `rn04_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`hook`** – The `MouseHook` capability trait and its implementations.
//!   On Windows this is a `WH_MOUSE_LL` hook running its own message-loop
//!   thread; a `MockMouseHook` is provided for tests and non-Windows builds.
//!
//! - **`key_emulation`** – The `KeyEmulator` trait and its implementations.
//!   On Windows keys are injected with `SendInput`; a recording mock is
//!   provided for tests.

pub mod hook;
pub mod key_emulation;
