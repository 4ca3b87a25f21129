//! Supervision of the hook runtime child process.
//!
//! The shell keeps at most one rn04-mousecam session alive.  This service
//! owns that invariant: it launches the runtime through an injected
//! [`RuntimeLauncher`], watches the process from a monitor task, and tears
//! it down politely before falling back to a kill.
//!
//! # Session lifecycle (for beginners)
//!
//! ```text
//! start ──► launching ──► running ──► stop requested ──► stop signal
//!                            │                               │
//!                            │                        exits in time?
//!                            │                          yes │ no
//!                            │                              ▼
//!                        (crashes)                        killed
//!                            │
//!                            ▼
//!                     slot cleared, restart allowed
//! ```
//!
//! - The slot lock is held across the launch await, so two concurrent
//!   starts can never both spawn a process.
//! - The monitor task owns the process handle.  Stopping only flips it into
//!   shutdown mode; the supervisor never touches the process directly.
//! - Every exit path deletes the session's launch artifact.
//! - All public operations are infallible: failures are logged, never
//!   thrown, because a broken mousecam must not take the launcher down.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::infrastructure::hook_runtime::{
    LaunchError, LaunchedRuntime, RuntimeLauncher, RuntimeProcess,
};
use crate::infrastructure::storage::config::MousecamConfig;

/// One running runtime session, as seen from the supervisor.
struct ActiveSession {
    session_id: Uuid,
    /// Flips the monitor into shutdown mode.  Dropping it unsent has the
    /// same effect, so a dropped supervisor still shuts its child down.
    stop_tx: oneshot::Sender<()>,
    monitor: JoinHandle<()>,
}

/// The hook runtime supervisor.
pub struct Mousecam {
    launcher: Arc<dyn RuntimeLauncher>,
    /// Shared with each session's monitor task, which clears its own entry
    /// when the process dies unexpectedly.
    active: Arc<Mutex<Option<ActiveSession>>>,
}

impl Mousecam {
    pub fn new(launcher: Arc<dyn RuntimeLauncher>) -> Arc<Self> {
        Arc::new(Self {
            launcher,
            active: Arc::new(Mutex::new(None)),
        })
    }

    /// Launches a session unless one is already running.
    ///
    /// A platform that cannot host the hook is logged once at info level
    /// and otherwise ignored; real launch failures are warnings.  Neither
    /// leaves a session behind.
    pub async fn start(&self, config: &MousecamConfig) {
        let mut active = self.active.lock().await;
        if let Some(session) = active.as_ref() {
            debug!("mousecam session {} already running", session.session_id);
            return;
        }

        match self.launcher.launch(config).await {
            Ok(runtime) => {
                let session_id = runtime.session_id;
                let stop_grace = Duration::from_millis(config.stop_grace_ms);
                let (stop_tx, stop_rx) = oneshot::channel();
                let monitor = tokio::spawn(monitor_session(
                    Arc::clone(&self.active),
                    runtime,
                    stop_rx,
                    stop_grace,
                ));
                *active = Some(ActiveSession {
                    session_id,
                    stop_tx,
                    monitor,
                });
                info!("mousecam session {session_id} started");
            }
            Err(e @ LaunchError::UnsupportedPlatform(_)) => {
                info!("mousecam unavailable: {e}");
            }
            Err(e) => {
                warn!("could not start mousecam: {e}");
            }
        }
    }

    /// Requests a stop and returns the monitor's join handle, so callers
    /// that need to outwait the shutdown (only [`destroy`](Self::destroy)
    /// today) can do so.  Everyone else fires and forgets.
    pub async fn stop(&self) -> Option<JoinHandle<()>> {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(session) => {
                let _ = session.stop_tx.send(());
                info!("mousecam session {} stop requested", session.session_id);
                Some(session.monitor)
            }
            None => {
                debug!("mousecam stop requested but nothing is running");
                None
            }
        }
    }

    /// Stops any running session and waits for the shutdown to finish.
    /// Called on shell exit so the hook process never outlives the shell.
    pub async fn destroy(&self) {
        if let Some(monitor) = self.stop().await {
            if let Err(e) = monitor.await {
                warn!("mousecam monitor ended abnormally: {e}");
            }
        }
    }

    /// `true` while a session occupies the slot.
    pub async fn is_running(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Id of the running session, if any.
    pub async fn current_session(&self) -> Option<Uuid> {
        self.active.lock().await.as_ref().map(|s| s.session_id)
    }
}

/// Watches one session until it ends, through either path: a requested
/// stop, or the process exiting on its own.
async fn monitor_session(
    active: Arc<Mutex<Option<ActiveSession>>>,
    runtime: LaunchedRuntime,
    stop_rx: oneshot::Receiver<()>,
    stop_grace: Duration,
) {
    let LaunchedRuntime {
        session_id,
        artifact_path,
        mut process,
    } = runtime;

    tokio::select! {
        // Either a real stop request or the supervisor being dropped.
        _ = stop_rx => {
            shut_down(session_id, stop_grace, &mut process).await;
        }
        exit = process.wait() => {
            match exit {
                Ok(code) => warn!(
                    "mousecam session {session_id} exited on its own with code {code:?}"
                ),
                Err(e) => warn!("mousecam session {session_id} wait failed: {e}"),
            }
            clear_if_current(&active, session_id).await;
        }
    }

    remove_artifact(&artifact_path).await;
}

/// Polite stop with a kill fallback once the grace period runs out.
async fn shut_down(session_id: Uuid, stop_grace: Duration, process: &mut Box<dyn RuntimeProcess>) {
    if let Err(e) = process.signal_stop().await {
        warn!("could not signal mousecam session {session_id} to stop: {e}");
    }

    match tokio::time::timeout(stop_grace, process.wait()).await {
        Ok(Ok(code)) => {
            info!("mousecam session {session_id} exited with code {code:?}");
        }
        Ok(Err(e)) => {
            warn!("could not reap mousecam session {session_id}: {e}");
        }
        Err(_) => {
            warn!("mousecam session {session_id} missed its stop grace, killing it");
            if let Err(e) = process.kill().await {
                warn!("could not kill mousecam session {session_id}: {e}");
            }
        }
    }
}

/// Clears the slot, but only while it still holds this session.  A
/// replacement started after a stop must survive a stale monitor finishing
/// late.
async fn clear_if_current(active: &Mutex<Option<ActiveSession>>, session_id: Uuid) {
    let mut guard = active.lock().await;
    if guard.as_ref().is_some_and(|s| s.session_id == session_id) {
        guard.take();
    }
}

/// Deletes a session's launch artifact.  A missing file is fine; both a
/// crashed launch and a tidy runtime may have removed it already.
async fn remove_artifact(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("could not remove launch artifact {}: {e}", path.display());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::hook_runtime::mock::{
        scripted_runtime, MockRuntimeLauncher, MockRuntimeProcess,
    };

    fn make_supervisor() -> (Arc<MockRuntimeLauncher>, Arc<Mousecam>) {
        let launcher = Arc::new(MockRuntimeLauncher::new());
        let mousecam = Mousecam::new(Arc::clone(&launcher) as Arc<dyn RuntimeLauncher>);
        (launcher, mousecam)
    }

    #[tokio::test]
    async fn test_second_start_is_a_noop_while_a_session_runs() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, _handle) = MockRuntimeProcess::well_behaved(1);
        launcher.push_success(scripted_runtime(process));
        let config = MousecamConfig::default();

        // Act
        mousecam.start(&config).await;
        mousecam.start(&config).await;

        // Assert – one launch, one session
        assert_eq!(launcher.launch_count(), 1);
        assert!(mousecam.is_running().await);
    }

    #[tokio::test]
    async fn test_stop_signals_politely_without_killing() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, handle) = MockRuntimeProcess::well_behaved(2);
        launcher.push_success(scripted_runtime(process));
        mousecam.start(&MousecamConfig::default()).await;

        // Act
        let monitor = mousecam.stop().await.expect("a running session");
        monitor.await.unwrap();

        // Assert
        assert!(handle.was_stop_signalled());
        assert!(!handle.was_killed(), "a polite exit must not be killed");
        assert!(!mousecam.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stubborn_session_is_killed_after_the_grace_period() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, handle) = MockRuntimeProcess::stubborn(3);
        launcher.push_success(scripted_runtime(process));

        let mut config = MousecamConfig::default();
        config.stop_grace_ms = 500;
        mousecam.start(&config).await;

        // Act
        let monitor = mousecam.stop().await.expect("a running session");
        monitor.await.unwrap();

        // Assert – stop was tried first, then the kill fallback
        assert!(handle.was_stop_signalled());
        assert!(handle.was_killed());
        assert!(!mousecam.is_running().await);
    }

    #[tokio::test]
    async fn test_crash_clears_the_slot_and_allows_a_restart() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, handle) = MockRuntimeProcess::well_behaved(4);
        launcher.push_success(scripted_runtime(process));
        let config = MousecamConfig::default();
        mousecam.start(&config).await;

        // Act – the process dies on its own
        handle.exit_with(Some(9));
        for _ in 0..100 {
            if !mousecam.is_running().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        // Assert
        assert!(!mousecam.is_running().await, "crash must clear the session");

        // ...and a fresh start launches again
        let (replacement, _handle) = MockRuntimeProcess::well_behaved(5);
        launcher.push_success(scripted_runtime(replacement));
        mousecam.start(&config).await;
        assert_eq!(launcher.launch_count(), 2);
        assert!(mousecam.is_running().await);
    }

    #[tokio::test]
    async fn test_launch_failure_leaves_no_session_and_allows_retry() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        launcher.push_failure(LaunchError::Spawn {
            binary: "rn04-mousecam".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing binary"),
        });
        let config = MousecamConfig::default();

        // Act
        mousecam.start(&config).await;

        // Assert
        assert!(!mousecam.is_running().await);

        // Retry succeeds
        let (process, _handle) = MockRuntimeProcess::well_behaved(6);
        launcher.push_success(scripted_runtime(process));
        mousecam.start(&config).await;
        assert!(mousecam.is_running().await);
    }

    #[tokio::test]
    async fn test_unsupported_platform_is_skipped_quietly() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        launcher.push_failure(LaunchError::UnsupportedPlatform("linux".into()));

        // Act
        mousecam.start(&MousecamConfig::default()).await;

        // Assert – no session, no panic, launch was attempted once
        assert!(!mousecam.is_running().await);
        assert_eq!(launcher.launch_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_and_restart_use_fresh_sessions() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (first, _h1) = MockRuntimeProcess::well_behaved(7);
        launcher.push_success(scripted_runtime(first));
        let config = MousecamConfig::default();
        mousecam.start(&config).await;
        let first_id = mousecam.current_session().await.expect("first session");

        // Act
        let monitor = mousecam.stop().await.expect("a running session");
        let (second, _h2) = MockRuntimeProcess::well_behaved(8);
        launcher.push_success(scripted_runtime(second));
        mousecam.start(&config).await;
        let second_id = mousecam.current_session().await.expect("second session");

        // The first monitor finishing late must not disturb the new session.
        monitor.await.unwrap();

        // Assert
        assert_ne!(first_id, second_id);
        assert!(mousecam.is_running().await);
    }

    #[tokio::test]
    async fn test_stop_removes_the_launch_artifact() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, _handle) = MockRuntimeProcess::well_behaved(9);
        let runtime = scripted_runtime(process);
        let artifact = runtime.artifact_path.clone();
        std::fs::write(&artifact, "move_throttle_ms = 16\n").unwrap();
        launcher.push_success(runtime);
        mousecam.start(&MousecamConfig::default()).await;

        // Act
        let monitor = mousecam.stop().await.expect("a running session");
        monitor.await.unwrap();

        // Assert
        assert!(!artifact.exists(), "artifact must be deleted on shutdown");
    }

    #[tokio::test]
    async fn test_stop_with_nothing_running_is_a_noop() {
        // Arrange
        let (_launcher, mousecam) = make_supervisor();

        // Act / Assert
        assert!(mousecam.stop().await.is_none());
        assert!(!mousecam.is_running().await);
    }

    #[tokio::test]
    async fn test_destroy_waits_for_the_shutdown() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, handle) = MockRuntimeProcess::well_behaved(10);
        launcher.push_success(scripted_runtime(process));
        mousecam.start(&MousecamConfig::default()).await;

        // Act
        mousecam.destroy().await;

        // Assert – by the time destroy returns, the session is fully gone
        assert!(handle.was_stop_signalled());
        assert!(!mousecam.is_running().await);

        // Destroy with nothing running is also fine
        mousecam.destroy().await;
    }

    #[tokio::test]
    async fn test_launcher_receives_the_configured_throttle() {
        // Arrange
        let (launcher, mousecam) = make_supervisor();
        let (process, _handle) = MockRuntimeProcess::well_behaved(11);
        launcher.push_success(scripted_runtime(process));

        let mut config = MousecamConfig::default();
        config.move_throttle_ms = 33;

        // Act
        mousecam.start(&config).await;

        // Assert
        let seen = launcher.last_config().expect("launch config recorded");
        assert_eq!(seen.move_throttle_ms, 33);
    }
}
