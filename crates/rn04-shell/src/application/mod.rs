//! Application layer use cases for the launcher shell.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules, here mostly in `rn04-core`) and the infrastructure
//! (files, child processes, the UI bridge).
//!
//! Services in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "run the
//!   title-bar timer" or "keep exactly one hook runtime alive").
//! - **Depend on abstractions** (traits) rather than concrete
//!   implementations, so persistence and process spawning can be mocked in
//!   tests.
//! - **Contain no OS calls of their own** beyond the clock.
//!
//! # Sub-modules
//!
//! - **`settings`** – In-memory settings state with debounced writes to the
//!   settings file, so a burst of UI changes becomes one disk write.
//!
//! - **`timers`** – Drives the `rn04_core` timer engine on a wall-clock
//!   ticker and publishes per-second updates for the title bar.
//!
//! - **`mousecam`** – Supervises the hook runtime child process: at most one
//!   session at a time, graceful stop with a kill fallback, artifact
//!   cleanup, and crash detection.

pub mod mousecam;
pub mod settings;
pub mod timers;
