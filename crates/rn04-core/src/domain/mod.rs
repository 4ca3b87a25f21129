//! Domain logic for the RN04 Launcher.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from OS APIs, process spawning, file systems, or UI
//!   frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//! - Defines the data types and operations that make the system uniquely what
//!   it is: in this case, the rule that a middle-button drag holds arrow keys
//!   according to which side of the press point the cursor is on.
//!
//! Code in outer layers (infrastructure, application, UI) depends on the
//! domain, but the domain never depends on them.  This makes the domain easy
//! to unit-test in isolation.

/// Directional mapper — the core domain concept.
///
/// See [`mapper::DirectionalMapper`] for the main type.
pub mod mapper;
/// One middle-drag session: anchor lifecycle on top of the mapper.
pub mod pan;
/// Timestamped screenshot file naming.
pub mod screenshot;
/// AFK / countdown / stopwatch engine behind the title-bar timer.
pub mod timer;
/// Dotted-version ordering for the update check.
pub mod version;
/// The 50%–300% zoom step ladder.
pub mod zoom;
