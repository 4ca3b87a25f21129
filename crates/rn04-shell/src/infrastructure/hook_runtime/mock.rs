//! Scripted launcher and process stand-ins for supervisor tests.
//!
//! # Why a mock runtime?
//!
//! The real launcher spawns an OS process, which a unit test can neither
//! observe nor schedule deterministically.  [`MockRuntimeLauncher`] returns
//! pre-scripted launch outcomes, and [`MockRuntimeProcess`] is a process
//! whose exit the test controls: it can exit politely on the stop signal,
//! ignore it until killed, or "crash" whenever the test decides.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use rn04_core::protocol::launch::artifact_file_name;

use crate::infrastructure::storage::config::MousecamConfig;

use super::{LaunchError, LaunchedRuntime, RuntimeLauncher, RuntimeProcess};

type ExitSender = Arc<Mutex<Option<oneshot::Sender<Option<i32>>>>>;

/// A scripted process whose exit is driven by the test.
pub struct MockRuntimeProcess {
    id: u32,
    /// When true, `signal_stop` completes the exit with code 0.
    exits_on_stop: bool,
    stop_signalled: Arc<AtomicBool>,
    killed: Arc<AtomicBool>,
    exit_tx: ExitSender,
    exit_rx: Option<oneshot::Receiver<Option<i32>>>,
}

/// Test-side view of a [`MockRuntimeProcess`].
///
/// Lets the test observe which control calls the supervisor made and force
/// an exit at any time.
#[derive(Clone)]
pub struct MockProcessHandle {
    stop_signalled: Arc<AtomicBool>,
    killed: Arc<AtomicBool>,
    exit_tx: ExitSender,
}

impl MockRuntimeProcess {
    /// A process that exits with code 0 as soon as it is asked to stop.
    pub fn well_behaved(id: u32) -> (Self, MockProcessHandle) {
        Self::new(id, true)
    }

    /// A process that ignores the stop signal and only exits when killed
    /// or when the test fires [`MockProcessHandle::exit_with`].
    pub fn stubborn(id: u32) -> (Self, MockProcessHandle) {
        Self::new(id, false)
    }

    fn new(id: u32, exits_on_stop: bool) -> (Self, MockProcessHandle) {
        let (exit_tx, exit_rx) = oneshot::channel();
        let exit_tx: ExitSender = Arc::new(Mutex::new(Some(exit_tx)));
        let stop_signalled = Arc::new(AtomicBool::new(false));
        let killed = Arc::new(AtomicBool::new(false));

        let handle = MockProcessHandle {
            stop_signalled: Arc::clone(&stop_signalled),
            killed: Arc::clone(&killed),
            exit_tx: Arc::clone(&exit_tx),
        };
        let process = Self {
            id,
            exits_on_stop,
            stop_signalled,
            killed,
            exit_tx,
            exit_rx: Some(exit_rx),
        };
        (process, handle)
    }
}

impl MockProcessHandle {
    /// `true` once the supervisor has sent the stop signal.
    pub fn was_stop_signalled(&self) -> bool {
        self.stop_signalled.load(Ordering::SeqCst)
    }

    /// `true` once the supervisor has killed the process.
    pub fn was_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    /// Makes the process exit with the given code, as if it crashed or
    /// finished on its own.
    pub fn exit_with(&self, code: Option<i32>) {
        if let Some(tx) = self.exit_tx.lock().expect("exit lock poisoned").take() {
            let _ = tx.send(code);
        }
    }
}

fn complete_exit(exit_tx: &ExitSender, code: Option<i32>) {
    if let Some(tx) = exit_tx.lock().expect("exit lock poisoned").take() {
        let _ = tx.send(code);
    }
}

#[async_trait]
impl RuntimeProcess for MockRuntimeProcess {
    async fn signal_stop(&mut self) -> std::io::Result<()> {
        self.stop_signalled.store(true, Ordering::SeqCst);
        if self.exits_on_stop {
            complete_exit(&self.exit_tx, Some(0));
        }
        Ok(())
    }

    async fn wait(&mut self) -> std::io::Result<Option<i32>> {
        // Awaiting through `as_mut` keeps the receiver in place if the
        // caller's timeout cancels this future; only a completed receiver
        // is discarded.
        match self.exit_rx.as_mut() {
            Some(rx) => {
                let code = rx.await.unwrap_or(None);
                self.exit_rx = None;
                Ok(code)
            }
            None => Ok(None),
        }
    }

    async fn kill(&mut self) -> std::io::Result<()> {
        self.killed.store(true, Ordering::SeqCst);
        complete_exit(&self.exit_tx, None);
        Ok(())
    }

    fn id(&self) -> Option<u32> {
        Some(self.id)
    }
}

/// Wraps a scripted process in a [`LaunchedRuntime`] with a fresh session
/// id and a temp-directory artifact path (the file itself is not created).
pub fn scripted_runtime(process: MockRuntimeProcess) -> LaunchedRuntime {
    let session_id = Uuid::new_v4();
    LaunchedRuntime {
        session_id,
        artifact_path: std::env::temp_dir().join(artifact_file_name(session_id)),
        process: Box::new(process),
    }
}

/// A [`RuntimeLauncher`] that pops pre-scripted outcomes, one per call.
///
/// Panics if launched with no outcome scripted; that is always a test bug.
pub struct MockRuntimeLauncher {
    outcomes: Mutex<VecDeque<Result<LaunchedRuntime, LaunchError>>>,
    launch_count: AtomicUsize,
    last_config: Mutex<Option<MousecamConfig>>,
}

impl MockRuntimeLauncher {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            launch_count: AtomicUsize::new(0),
            last_config: Mutex::new(None),
        }
    }

    /// Scripts the next launch to succeed with `runtime`.
    pub fn push_success(&self, runtime: LaunchedRuntime) {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .push_back(Ok(runtime));
    }

    /// Scripts the next launch to fail with `error`.
    pub fn push_failure(&self, error: LaunchError) {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .push_back(Err(error));
    }

    /// Number of launch calls observed so far.
    pub fn launch_count(&self) -> usize {
        self.launch_count.load(Ordering::SeqCst)
    }

    /// The config passed to the most recent launch call.
    pub fn last_config(&self) -> Option<MousecamConfig> {
        self.last_config
            .lock()
            .expect("config lock poisoned")
            .clone()
    }
}

impl Default for MockRuntimeLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuntimeLauncher for MockRuntimeLauncher {
    async fn launch(&self, config: &MousecamConfig) -> Result<LaunchedRuntime, LaunchError> {
        self.launch_count.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().expect("config lock poisoned") = Some(config.clone());
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .pop_front()
            .expect("MockRuntimeLauncher launched with no scripted outcome")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
