//! Production [`RuntimeLauncher`] backed by `tokio::process`.
//!
//! Launching a session is a four-step sequence:
//!
//! 1. Resolve the runtime binary (configured path, or the executable named
//!    `rn04-mousecam` next to the shell binary).
//! 2. Write the launch artifact (a TOML file in the system temp directory)
//!    carrying the session id and hook settings.
//! 3. Spawn the binary with the artifact path as its only argument, stdin
//!    and stdout piped.
//! 4. Attach a reader task that decodes the runtime's status lines into the
//!    shell's log.
//!
//! The child is spawned with `kill_on_drop`, so even a supervisor bug cannot
//! leave an orphaned global hook behind the shell's own exit.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use uuid::Uuid;

use rn04_core::protocol::launch::{artifact_file_name, RuntimeLaunchConfig};
use rn04_core::protocol::messages::{decode_status, encode_control};
use rn04_core::{ControlMessage, ProtocolError, StatusMessage};

use crate::infrastructure::storage::config::MousecamConfig;

use super::{LaunchError, LaunchedRuntime, RuntimeLauncher, RuntimeProcess};

/// Keeps the console-subsystem runtime from opening a terminal window.
#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Launches the real rn04-mousecam binary.
pub struct ProcessRuntimeLauncher;

impl ProcessRuntimeLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessRuntimeLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuntimeLauncher for ProcessRuntimeLauncher {
    async fn launch(&self, config: &MousecamConfig) -> Result<LaunchedRuntime, LaunchError> {
        // The low-level mouse hook is a Win32 facility; on any other OS the
        // launch is refused before touching the file system.
        if !cfg!(target_os = "windows") {
            return Err(LaunchError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ));
        }

        let binary = resolve_binary(config)?;
        let session_id = Uuid::new_v4();

        let launch = RuntimeLaunchConfig {
            session_id,
            move_throttle_ms: config.move_throttle_ms,
            log_filter: current_log_filter(),
        };
        let artifact_path = std::env::temp_dir().join(artifact_file_name(session_id));
        let content = toml::to_string_pretty(&launch)?;
        tokio::fs::write(&artifact_path, content)
            .await
            .map_err(|source| LaunchError::ArtifactWrite {
                path: artifact_path.clone(),
                source,
            })?;

        let mut command = tokio::process::Command::new(&binary);
        command
            .arg(&artifact_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
            binary: binary.clone(),
            source,
        })?;

        let stdin = child.stdin.take();
        if let Some(stdout) = child.stdout.take() {
            spawn_status_logger(session_id, stdout);
        }

        info!(
            "launched mousecam session {session_id} (pid {:?}) from {}",
            child.id(),
            binary.display()
        );

        Ok(LaunchedRuntime {
            session_id,
            artifact_path,
            process: Box::new(ChildRuntimeProcess { child, stdin }),
        })
    }
}

/// Picks the runtime binary: the configured path when set, otherwise the
/// platform-named executable in the shell's own directory.
fn resolve_binary(config: &MousecamConfig) -> Result<PathBuf, LaunchError> {
    if let Some(path) = &config.binary_path {
        return Ok(path.clone());
    }

    let exe = std::env::current_exe().map_err(LaunchError::BinaryPath)?;
    let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
    let name = if cfg!(target_os = "windows") {
        "rn04-mousecam.exe"
    } else {
        "rn04-mousecam"
    };
    Ok(dir.join(name))
}

/// The log filter handed to the runtime: the shell's own `RUST_LOG` when
/// set, so both processes filter alike.
fn current_log_filter() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

/// Reads the runtime's stdout until EOF, translating status lines into log
/// entries.  Purely diagnostic; the session works even if this task dies.
fn spawn_status_logger(session_id: Uuid, stdout: tokio::process::ChildStdout) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match decode_status(&line) {
                Ok(StatusMessage::Started {
                    session_id: reported,
                }) => {
                    if reported == session_id {
                        info!("mousecam session {session_id} reported started");
                    } else {
                        warn!(
                            "mousecam reported session {reported}, expected {session_id}"
                        );
                    }
                }
                Ok(StatusMessage::Error { message }) => {
                    warn!("mousecam session {session_id} reported error: {message}");
                }
                Err(ProtocolError::EmptyLine) => {}
                Err(e) => warn!("unreadable mousecam status line: {e}"),
            }
        }
    });
}

/// [`RuntimeProcess`] over a real child process.
struct ChildRuntimeProcess {
    child: tokio::process::Child,
    stdin: Option<tokio::process::ChildStdin>,
}

#[async_trait]
impl RuntimeProcess for ChildRuntimeProcess {
    async fn signal_stop(&mut self) -> std::io::Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            let line = encode_control(&ControlMessage::Stop).map_err(std::io::Error::other)?;
            stdin.write_all(line.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.shutdown().await?;
        }
        // Dropping stdin closes the pipe; the runtime treats end-of-input
        // as a stop as well, so a second call is a no-op rather than an error.
        Ok(())
    }

    async fn wait(&mut self) -> std::io::Result<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }

    async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }

    fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
