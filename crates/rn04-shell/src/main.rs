//! RN04 Launcher shell entry point.
//!
//! Wires together all services and starts the Tokio async runtime.  The
//! webview window is created here in a full desktop build; bridge commands
//! are routed to the [`AppState`] via the `infrastructure::ui_bridge`
//! module.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ AppState::new()        -- loads settings, wires services
//!  └─ start services
//!       ├─ TimerService      (ticker task, publishes title updates)
//!       ├─ Mousecam          (hook runtime supervisor, if enabled)
//!       └─ SettingsService   (debounced writes, flushed on exit)
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rn04_shell::application::timers::TimerEvent;
use rn04_shell::infrastructure::ui_bridge::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("RN04 Launcher starting");

    // Load settings and initialise shared state.
    let state = AppState::new();

    // Shutdown flag shared across all background services.
    let running = Arc::new(AtomicBool::new(true));

    // ── Timer event pump ──────────────────────────────────────────────────────
    let mut timer_events = Arc::clone(&state.timers).start(Arc::clone(&running));
    tokio::spawn(async move {
        while let Some(event) = timer_events.recv().await {
            // In the full desktop build these are emitted to the webview so
            // it can retitle the window and flash the alert.
            match event {
                TimerEvent::Tick { label, update } => {
                    if update.alert {
                        info!("timer alert: {label} {}", update.title);
                    }
                    if update.finished {
                        info!("countdown finished");
                    }
                    debug!("title update: {label} {}", update.title);
                }
                TimerEvent::Cleared => debug!("timer cleared"),
            }
        }
    });

    // ── Mousecam autostart ────────────────────────────────────────────────────
    let settings = state.settings.current();
    if settings.mousecam.enabled {
        state.mousecam.start(&settings.mousecam).await;
    } else {
        info!("mousecam disabled in settings");
    }

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    info!("RN04 Launcher ready.  Press Ctrl-C to exit.");

    // In a full desktop build the webview window would open here, at the
    // persisted window size, with the bridge commands registered.  For the
    // CLI/headless variant we simply block until the shutdown flag clears.
    loop {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if !running.load(Ordering::Relaxed) {
            break;
        }
    }

    // Orderly teardown: the hook process first, so no synthetic keys can
    // outlive the shell, then the last settings write.
    state.mousecam.destroy().await;
    state.settings.flush();

    info!("RN04 Launcher stopped");
    Ok(())
}
