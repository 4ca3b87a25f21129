//! Launching and controlling the rn04-mousecam hook runtime process.
//!
//! The hook runtime is a separate executable: it installs the global mouse
//! hook and synthesizes arrow keys, and the shell only supervises it.  This
//! module defines the seam between the two:
//!
//! - [`RuntimeLauncher`] – spawns one runtime session and hands back a
//!   [`LaunchedRuntime`].
//! - [`RuntimeProcess`] – the control surface of a spawned session: ask it
//!   to stop, wait for it to exit, or kill it.
//!
//! The production implementation in [`process`] spawns the real binary via
//! `tokio::process`; [`mock`] provides scripted stand-ins so the supervisor
//! can be tested without any child processes.
//!
//! # Stop handshake
//!
//! A polite stop writes `{"type":"stop"}` to the runtime's stdin and closes
//! the pipe.  The runtime releases held keys, uninstalls the hook, and exits.
//! Only when it overruns its grace period does the supervisor fall back to
//! killing it.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::infrastructure::storage::config::MousecamConfig;

pub mod mock;
pub mod process;

/// Errors that can occur while launching a runtime session.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The global mouse hook only exists on Windows.
    #[error("camera remapping requires Windows (running on {0})")]
    UnsupportedPlatform(String),

    /// The runtime binary location could not be resolved.
    #[error("could not resolve the rn04-mousecam binary path: {0}")]
    BinaryPath(#[source] std::io::Error),

    /// The launch artifact could not be serialized.
    #[error("could not encode launch artifact: {0}")]
    ArtifactEncode(#[from] toml::ser::Error),

    /// The launch artifact could not be written.
    #[error("could not write launch artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The runtime process could not be spawned.
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Control surface of one spawned runtime session.
///
/// Implementations own the OS process handle; the supervisor drives the
/// lifecycle exclusively through this trait.
#[async_trait]
pub trait RuntimeProcess: Send {
    /// Requests a graceful stop by sending the stop message and closing the
    /// runtime's stdin.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the pipe write fails; the
    /// caller falls back to [`kill`](Self::kill) in that case.
    async fn signal_stop(&mut self) -> std::io::Result<()>;

    /// Waits for the process to exit.
    ///
    /// Returns the exit code, or `None` when the process was terminated by
    /// a signal (or the platform reports no code).
    async fn wait(&mut self) -> std::io::Result<Option<i32>>;

    /// Forcibly terminates the process and reaps it.
    async fn kill(&mut self) -> std::io::Result<()>;

    /// OS process id, while the process is still running.
    fn id(&self) -> Option<u32>;
}

/// A successfully launched runtime session.
pub struct LaunchedRuntime {
    /// Identity of this session; also part of the artifact file name.
    pub session_id: Uuid,
    /// The launch artifact on disk; deleted when the session ends.
    pub artifact_path: PathBuf,
    /// Control surface for the spawned process.
    pub process: Box<dyn RuntimeProcess>,
}

impl std::fmt::Debug for LaunchedRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedRuntime")
            .field("session_id", &self.session_id)
            .field("artifact_path", &self.artifact_path)
            .field("pid", &self.process.id())
            .finish()
    }
}

/// Spawns runtime sessions.
///
/// One launcher serves the whole shell lifetime; each call to
/// [`launch`](Self::launch) creates an independent session.
#[async_trait]
pub trait RuntimeLauncher: Send + Sync {
    /// Launches one runtime session configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] describing which launch step failed; no
    /// process is left running on error.
    async fn launch(&self, config: &MousecamConfig) -> Result<LaunchedRuntime, LaunchError>;
}
