//! Infrastructure layer for the launcher shell.
//!
//! Contains OS-facing adapters: settings file storage, the hook runtime
//! process launcher, and the UI command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `rn04_core`, but MUST NOT be imported by the `application` or domain
//! layers — with one deliberate exception: the traits defined at this
//! layer's seams (`SettingsStore`, `RuntimeLauncher`) are what the
//! application services are injected with.

pub mod hook_runtime;
pub mod storage;
pub mod ui_bridge;
