//! Timer engine behind the title-bar timer display.
//!
//! One engine drives three modes: the 90-second AFK watchdog, a configurable
//! countdown, and a plain stopwatch.  The engine is timestamp-driven rather
//! than tick-counting: the caller supplies `now_ms` on every tick, and the
//! elapsed time is recomputed from the start timestamp.  A coarse or delayed
//! tick (event-loop stall, laptop sleep) therefore never loses time; the
//! count simply jumps forward and at most one update is reported per counted
//! second.

const MS_PER_SEC: u64 = 1000;

/// Length of one AFK cycle in seconds.
pub const AFK_CYCLE_SECS: u64 = 90;

/// Alert threshold used when the configured value is absent or zero.
pub const DEFAULT_ALERT_THRESHOLD_SECS: u32 = 10;

/// Clamps a configured alert threshold into the usable range.
///
/// The threshold is "seconds before expiry", so it must leave at least one
/// second on both sides of the 90-second AFK cycle: valid values are 1..=89.
/// Zero (the unset marker in older settings files) maps to the default.
pub fn clamp_alert_threshold(secs: u32) -> u32 {
    if secs == 0 {
        DEFAULT_ALERT_THRESHOLD_SECS
    } else {
        secs.clamp(1, 89)
    }
}

/// Formats a (possibly negative) second count as `MM:SS` for the title bar.
///
/// Negative values render with a leading minus: `format_title_time(-83)`
/// is `"-01:23"`.  Minutes are not capped at 59.
pub fn format_title_time(total_secs: i64) -> String {
    let mins = total_secs.unsigned_abs() / 60;
    let secs = total_secs.unsigned_abs() % 60;
    let sign = if total_secs < 0 { "-" } else { "" };
    format!("{sign}{mins:02}:{secs:02}")
}

/// What a timer counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Fixed 90-second cycle; alerts shortly before expiry and keeps
    /// counting past it so the display goes negative.
    Afk,
    /// Counts down from `total_secs`; optionally restarts itself on expiry.
    Countdown { total_secs: u32, auto_loop: bool },
    /// Counts up indefinitely; never alerts.
    Stopwatch,
}

impl TimerMode {
    /// Short label shown next to the time in the window title.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Afk => "AFK",
            TimerMode::Countdown { .. } => "CNT",
            TimerMode::Stopwatch => "TMR",
        }
    }
}

/// One reported engine update, at most one per counted second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerUpdate {
    /// Whole seconds elapsed since the cycle started.
    pub counted_secs: u64,
    /// The value the title displays: remaining time for AFK/countdown
    /// (negative once expired), elapsed time for the stopwatch.
    pub display_secs: i64,
    /// `display_secs` formatted as `MM:SS`.
    pub title: String,
    /// `true` exactly once per cycle, when the alert threshold is crossed.
    pub alert: bool,
    /// `true` exactly once when a non-looping countdown expires.
    pub finished: bool,
}

/// The timer state machine.
///
/// Constructed when a timer starts and dropped when it stops; pausing keeps
/// the engine but freezes the clock.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: TimerMode,
    started_at_ms: u64,
    counted_secs: u64,
    alert_threshold_secs: u32,
    alert_fired: bool,
    finish_reported: bool,
    paused: bool,
}

impl TimerEngine {
    /// Starts a timer at `now_ms`.  The alert threshold is clamped via
    /// [`clamp_alert_threshold`].
    pub fn start(mode: TimerMode, alert_threshold_secs: u32, now_ms: u64) -> Self {
        Self {
            mode,
            started_at_ms: now_ms,
            counted_secs: 0,
            alert_threshold_secs: clamp_alert_threshold(alert_threshold_secs),
            alert_fired: false,
            finish_reported: false,
            paused: false,
        }
    }

    /// The mode this engine was started with.
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// `true` while the clock is frozen.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes the clock.  The current count is kept for `resume`.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreezes the clock, rebasing the start timestamp so the count
    /// continues from where it paused.
    pub fn resume(&mut self, now_ms: u64) {
        if !self.paused {
            return;
        }
        self.started_at_ms = now_ms.saturating_sub(self.counted_secs * MS_PER_SEC);
        self.paused = false;
    }

    /// Rewinds the cycle to zero and re-arms the alert.
    pub fn reset(&mut self, now_ms: u64) {
        self.started_at_ms = now_ms;
        self.counted_secs = 0;
        self.alert_fired = false;
        self.finish_reported = false;
    }

    /// Advances the engine to `now_ms`.
    ///
    /// Returns `None` while paused or until a full second has passed since
    /// the last reported count; otherwise returns the update for the new
    /// count.  Alert detection uses `>=` so a jumped-over threshold second
    /// still fires.
    pub fn tick(&mut self, now_ms: u64) -> Option<TimerUpdate> {
        if self.paused {
            return None;
        }

        let elapsed = now_ms.saturating_sub(self.started_at_ms) / MS_PER_SEC;
        if elapsed <= self.counted_secs {
            return None;
        }
        self.counted_secs = elapsed;

        let mut alert = false;
        let mut finished = false;
        let display_secs = match self.mode {
            TimerMode::Afk => {
                let threshold_at = AFK_CYCLE_SECS.saturating_sub(u64::from(self.alert_threshold_secs));
                if !self.alert_fired && self.counted_secs >= threshold_at {
                    self.alert_fired = true;
                    alert = true;
                }
                // Count continues past 90 so the display shows time since expiry.
                AFK_CYCLE_SECS as i64 - self.counted_secs as i64
            }
            TimerMode::Countdown { total_secs, auto_loop } => {
                let total = u64::from(total_secs);
                let remaining = total as i64 - self.counted_secs as i64;
                let threshold_at = total.saturating_sub(u64::from(self.alert_threshold_secs));
                if !self.alert_fired && self.counted_secs >= threshold_at && remaining > 0 {
                    self.alert_fired = true;
                    alert = true;
                }
                if self.counted_secs >= total {
                    if auto_loop {
                        self.counted_secs = 0;
                        self.started_at_ms = now_ms;
                        self.alert_fired = false;
                    } else if !self.finish_reported {
                        self.finish_reported = true;
                        finished = true;
                    }
                }
                remaining
            }
            TimerMode::Stopwatch => self.counted_secs as i64,
        };

        Some(TimerUpdate {
            counted_secs: elapsed,
            display_secs,
            title: format_title_time(display_secs),
            alert,
            finished,
        })
    }
}
