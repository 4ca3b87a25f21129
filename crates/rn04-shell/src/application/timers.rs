//! Drives the title-bar timer on the wall clock.
//!
//! The actual counting rules live in `rn04_core::domain::timer`; this
//! service owns the one live [`TimerEngine`], polls it four times a second,
//! and publishes an event whenever a new second has been counted.  Polling
//! faster than once per second keeps the title within 250 ms of the true
//! boundary without the engine ever reporting a second twice.
//!
//! All commands take the current timestamp explicitly, mirroring the engine
//! API, so tests can script time instead of sleeping through it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use rn04_core::domain::timer::{format_title_time, AFK_CYCLE_SECS};
use rn04_core::{TimerEngine, TimerMode, TimerUpdate};

/// How often the ticker polls the engine.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Current wall-clock time in Unix milliseconds.
pub fn unix_now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// One published timer event for the title bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A new counted second (or the synthetic zero-second update published
    /// the moment a timer starts).
    Tick {
        /// Mode label for the title: `AFK`, `CNT`, or `TMR`.
        label: &'static str,
        update: TimerUpdate,
    },
    /// The timer stopped; the title reverts to the plain app name.
    Cleared,
}

/// Owns the live timer engine and its event stream.
pub struct TimerService {
    engine: Mutex<Option<TimerEngine>>,
    events_tx: Mutex<Option<mpsc::Sender<TimerEvent>>>,
}

impl TimerService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            engine: Mutex::new(None),
            events_tx: Mutex::new(None),
        })
    }

    /// Spawns the ticker task and returns the event stream for the UI.
    ///
    /// The task polls until `running` goes false or the receiver is dropped.
    pub fn start(self: Arc<Self>, running: Arc<AtomicBool>) -> mpsc::Receiver<TimerEvent> {
        let (tx, rx) = mpsc::channel(32);
        *self.events_tx.lock().expect("events lock poisoned") = Some(tx.clone());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            loop {
                ticker.tick().await;
                if !running.load(Ordering::Relaxed) {
                    debug!("timer ticker stopping");
                    break;
                }
                if let Some(event) = self.tick_at(unix_now_ms()) {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
        });

        rx
    }

    /// Starts the 90-second AFK watchdog.
    pub fn start_afk(&self, alert_threshold_secs: u32, now_ms: u64) {
        self.start_mode(TimerMode::Afk, alert_threshold_secs, now_ms);
    }

    /// Starts a countdown of `total_secs`, optionally restarting itself on
    /// expiry.
    pub fn start_countdown(
        &self,
        total_secs: u32,
        auto_loop: bool,
        alert_threshold_secs: u32,
        now_ms: u64,
    ) {
        self.start_mode(
            TimerMode::Countdown {
                total_secs,
                auto_loop,
            },
            alert_threshold_secs,
            now_ms,
        );
    }

    /// Starts the count-up stopwatch.
    pub fn start_stopwatch(&self, now_ms: u64) {
        self.start_mode(TimerMode::Stopwatch, 0, now_ms);
    }

    fn start_mode(&self, mode: TimerMode, alert_threshold_secs: u32, now_ms: u64) {
        // Starting replaces any running timer.
        *self.engine.lock().expect("engine lock poisoned") =
            Some(TimerEngine::start(mode, alert_threshold_secs, now_ms));
        self.publish(TimerEvent::Tick {
            label: mode.label(),
            update: initial_update(mode),
        });
    }

    /// Freezes the clock; the title keeps showing the paused value.
    pub fn pause(&self) {
        if let Some(engine) = self.engine.lock().expect("engine lock poisoned").as_mut() {
            engine.pause();
        }
    }

    /// Unfreezes the clock, continuing from the paused count.
    pub fn resume(&self, now_ms: u64) {
        if let Some(engine) = self.engine.lock().expect("engine lock poisoned").as_mut() {
            engine.resume(now_ms);
        }
    }

    /// Rewinds the running timer to zero.
    pub fn reset(&self, now_ms: u64) {
        let mut guard = self.engine.lock().expect("engine lock poisoned");
        if let Some(engine) = guard.as_mut() {
            let mode = engine.mode();
            engine.reset(now_ms);
            drop(guard);
            self.publish(TimerEvent::Tick {
                label: mode.label(),
                update: initial_update(mode),
            });
        }
    }

    /// Stops and discards the timer.
    pub fn stop(&self) {
        let had_engine = self
            .engine
            .lock()
            .expect("engine lock poisoned")
            .take()
            .is_some();
        if had_engine {
            self.publish(TimerEvent::Cleared);
        }
    }

    /// `true` while a timer engine exists (running or paused).
    pub fn is_running(&self) -> bool {
        self.engine.lock().expect("engine lock poisoned").is_some()
    }

    /// `true` while the running timer is paused.
    pub fn is_paused(&self) -> bool {
        self.engine
            .lock()
            .expect("engine lock poisoned")
            .as_ref()
            .is_some_and(TimerEngine::is_paused)
    }

    /// Mode of the running timer, if any.
    pub fn mode(&self) -> Option<TimerMode> {
        self.engine
            .lock()
            .expect("engine lock poisoned")
            .as_ref()
            .map(TimerEngine::mode)
    }

    /// Advances the engine to `now_ms`, returning the event to publish if a
    /// new second was counted.  Called by the ticker task; public so tests
    /// can script timestamps.
    pub fn tick_at(&self, now_ms: u64) -> Option<TimerEvent> {
        let mut guard = self.engine.lock().expect("engine lock poisoned");
        let engine = guard.as_mut()?;
        let label = engine.mode().label();
        let update = engine.tick(now_ms)?;
        Some(TimerEvent::Tick { label, update })
    }

    fn publish(&self, event: TimerEvent) {
        if let Some(tx) = self.events_tx.lock().expect("events lock poisoned").as_ref() {
            // A full channel means the UI is hopelessly behind; dropping one
            // title update is harmless.
            let _ = tx.try_send(event);
        }
    }
}

/// The zero-second update shown the instant a timer starts.
fn initial_update(mode: TimerMode) -> TimerUpdate {
    let display_secs = match mode {
        TimerMode::Afk => AFK_CYCLE_SECS as i64,
        TimerMode::Countdown { total_secs, .. } => i64::from(total_secs),
        TimerMode::Stopwatch => 0,
    };
    TimerUpdate {
        counted_secs: 0,
        display_secs,
        title: format_title_time(display_secs),
        alert: false,
        finished: false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
