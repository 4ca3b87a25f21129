//! Application layer use cases for the hook runtime.
//!
//! # What use cases does the runtime have?
//!
//! - **`remap`** – Consumes the hook's event stream and drives the pan
//!   session: anchor on middle-down, offset mapping on move, unconditional
//!   key release on middle-up and on shutdown.  The actual OS key injection
//!   is made by a `KeyEmulator` implementation injected at construction time.

pub mod remap;
