//! Launch-artifact schema.
//!
//! The shell materializes a small TOML file in the system temporary directory
//! for each runtime session and passes its path as the runtime's single CLI
//! argument.  The file carries everything the runtime needs to configure
//! itself; the shell deletes it when the session ends.
//!
//! The schema lives here so the writer (shell) and the reader (runtime) can
//! never drift apart.  Serialization format is the caller's choice — both
//! sides use TOML, tests use JSON — which is why this module depends only on
//! serde.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Move events are forwarded to the remapper at most once per this many
/// milliseconds while a pan is active (roughly one per 60 Hz frame).
pub const DEFAULT_MOVE_THROTTLE_MS: u32 = 16;

fn default_session_id() -> Uuid {
    Uuid::new_v4()
}

fn default_move_throttle_ms() -> u32 {
    DEFAULT_MOVE_THROTTLE_MS
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Everything the hook runtime reads at startup.
///
/// Every field has a default so the runtime also works standalone, launched
/// by hand with no artifact at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeLaunchConfig {
    /// Identity of this runtime session; echoed back in the `started`
    /// status so shell and runtime logs can be correlated.
    #[serde(default = "default_session_id")]
    pub session_id: Uuid,

    /// Minimum interval between forwarded move events while panning.
    #[serde(default = "default_move_throttle_ms")]
    pub move_throttle_ms: u32,

    /// Default `tracing` filter for the runtime process, e.g. `"info"` or
    /// `"rn04_mousecam=debug"`.  The `RUST_LOG` environment variable still
    /// wins when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for RuntimeLaunchConfig {
    fn default() -> Self {
        Self {
            session_id: default_session_id(),
            move_throttle_ms: default_move_throttle_ms(),
            log_filter: default_log_filter(),
        }
    }
}

/// File name of the launch artifact for a given session.
///
/// The session id is part of the name so cleanup of a dying session can
/// never race the artifact of its replacement.
pub fn artifact_file_name(session_id: Uuid) -> String {
    format!("rn04-mousecam-{session_id}.toml")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
