//! RN04 mousecam runtime entry point.
//!
//! Wires together the launch configuration, the global mouse hook, and the
//! remap worker, then runs until asked to stop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_launch_config()        -- artifact path from argv[1], else defaults
//!  └─ WindowsMouseHook::install() -- hook thread + event channel
//!  └─ remap worker (blocking)     -- drains the channel, drives SendInput
//!  └─ stop watcher                -- stdin stop line / stdin EOF / Ctrl-C
//! ```
//!
//! # Process contract (for beginners)
//!
//! The launcher shell spawns this binary with piped stdin and stdout:
//!
//! - **stdout** carries status: one `{"type":"started",...}` line once the
//!   hook is live, or one `{"type":"error",...}` line when it cannot be.
//!   Logs therefore go to **stderr**.
//! - **stdin** carries control: a `{"type":"stop"}` line asks the runtime to
//!   shut down, and closing the pipe means the same thing (a crashed shell
//!   must not leave the hook installed).
//!
//! On shutdown the runtime releases every synthetic key before exiting, so
//! the game is never left with a stuck arrow key.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rn04_core::protocol::messages::encode_status;
use rn04_core::protocol::RuntimeLaunchConfig;
use rn04_core::StatusMessage;

#[cfg(target_os = "windows")]
use rn04_mousecam::application::remap::RemapSession;
#[cfg(target_os = "windows")]
use rn04_mousecam::infrastructure::hook::{windows::WindowsMouseHook, MouseHook};
#[cfg(target_os = "windows")]
use rn04_mousecam::infrastructure::key_emulation::{windows::WindowsKeyEmulator, KeyEmulator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cfg, config_warning) = load_launch_config();

    // Initialise structured logging. stdout is the status channel, so all
    // log output is written to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(message) = config_warning {
        warn!("{message}");
    }
    info!("RN04 mousecam runtime starting (session {})", cfg.session_id);

    run(cfg).await
}

/// Reads the launch artifact named by argv[1], if any.
///
/// A missing argument means the runtime was started by hand; an unreadable or
/// malformed artifact falls back to defaults so a stray file can never keep
/// the runtime from starting. The warning is returned rather than logged
/// because logging is not initialised until the filter is known.
fn load_launch_config() -> (RuntimeLaunchConfig, Option<String>) {
    let Some(path) = std::env::args().nth(1) else {
        return (RuntimeLaunchConfig::default(), None);
    };
    match std::fs::read_to_string(&path) {
        Ok(raw) => match toml::from_str(&raw) {
            Ok(cfg) => (cfg, None),
            Err(e) => (
                RuntimeLaunchConfig::default(),
                Some(format!("malformed launch artifact {path}: {e}")),
            ),
        },
        Err(e) => (
            RuntimeLaunchConfig::default(),
            Some(format!("unreadable launch artifact {path}: {e}")),
        ),
    }
}

#[cfg(target_os = "windows")]
async fn run(cfg: RuntimeLaunchConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    let hook = WindowsMouseHook::new(cfg.move_throttle_ms);
    let events = match hook.install() {
        Ok(events) => events,
        Err(e) => {
            let message = e.to_string();
            if let Ok(line) = encode_status(&StatusMessage::Error { message }) {
                println!("{line}");
            }
            return Err(e.into());
        }
    };

    let started = encode_status(&StatusMessage::Started {
        session_id: cfg.session_id,
    })?;
    println!("{started}");
    info!("hook installed; camera remapping active");

    // The hook channel is a blocking std receiver, so the remap worker runs
    // on the blocking pool. It exits when uninstall() closes the channel.
    let emulator: Arc<dyn KeyEmulator> = Arc::new(WindowsKeyEmulator::new());
    let worker = tokio::task::spawn_blocking(move || {
        let mut session = RemapSession::new(emulator);
        while let Ok(event) = events.recv() {
            session.handle_event(event);
        }
        // Channel closed: release everything, whatever state the pan was in.
        session.shutdown();
    });

    wait_for_stop().await;

    hook.uninstall();
    match tokio::time::timeout(std::time::Duration::from_secs(2), worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("remap worker ended abnormally: {e}"),
        Err(_) => warn!("remap worker did not drain within 2s"),
    }

    info!("RN04 mousecam runtime stopped");
    Ok(())
}

#[cfg(not(target_os = "windows"))]
async fn run(_cfg: RuntimeLaunchConfig) -> anyhow::Result<()> {
    let message = format!(
        "mouse hook requires Windows (running on {})",
        std::env::consts::OS
    );
    if let Ok(line) = encode_status(&StatusMessage::Error {
        message: message.clone(),
    }) {
        println!("{line}");
    }
    anyhow::bail!(message)
}

/// Resolves when a stop has been requested.
///
/// A stop is a `{"type":"stop"}` line on stdin, stdin reaching EOF, or
/// Ctrl-C. Malformed control lines are logged and skipped.
#[cfg(target_os = "windows")]
async fn wait_for_stop() {
    use tokio::io::{AsyncBufReadExt, BufReader};

    use rn04_core::protocol::messages::decode_control;
    use rn04_core::{ControlMessage, ProtocolError};

    let stdin_stop = async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match decode_control(&line) {
                    Ok(ControlMessage::Stop) => {
                        info!("stop requested over stdin");
                        break;
                    }
                    Err(ProtocolError::EmptyLine) => continue,
                    Err(e) => warn!("ignoring malformed control line: {e}"),
                },
                Ok(None) => {
                    info!("stdin closed; treating as stop");
                    break;
                }
                Err(e) => {
                    warn!("stdin read error: {e}");
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = stdin_stop => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }
}
