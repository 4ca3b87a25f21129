//! Protocol module: the messages exchanged between the shell and the hook
//! runtime, and the launch-artifact schema the shell hands the runtime at
//! spawn time.

pub mod launch;
pub mod messages;

pub use launch::RuntimeLaunchConfig;
pub use messages::*;
