//! Desktop command bridge: exposes application-layer operations to the UI.
//!
//! All frontend-invokable command functions live here and delegate to the
//! shared [`AppState`].  The presentation layer (the webview shell) is the
//! only consumer of this module; it must NOT be imported by the Application
//! or Domain layers.
//!
//! # How commands work (for beginners)
//!
//! The frontend calls Rust functions by name:
//! ```js
//! const result = await invoke("zoom_in");
//! ```
//!
//! The shell routes `"zoom_in"` to the `pub async fn zoom_in(...)` below.
//! The function receives the `AppState` via dependency injection and returns
//! a value that is serialised to JSON for the frontend.
//!
//! # Data Transfer Objects (DTOs)
//!
//! The Rust backend uses internal types (e.g., `LauncherConfig`, `Uuid`)
//! that the frontend should not depend on directly.  DTOs are flat structs
//! that:
//!
//! - Contain only JSON-friendly fields (`String`, `f64`, `u32`, `bool`).
//! - Are defined with `#[derive(Serialize, Deserialize)]` so the bridge can
//!   convert them automatically.
//! - Mirror the TypeScript interfaces on the frontend side.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`.  Every
//! response then has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`, and the
//! frontend can always safely check `result.success` without a try/catch
//! around the `invoke` call.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use rn04_core::domain::screenshot::{file_name, DEFAULT_SCREENSHOT_FOLDER};
use rn04_core::domain::version::compare_versions;
use rn04_core::domain::zoom::{self, ZoomDirection};

use crate::application::mousecam::Mousecam;
use crate::application::settings::SettingsService;
use crate::application::timers::{unix_now_ms, TimerService};
use crate::infrastructure::hook_runtime::process::ProcessRuntimeLauncher;
use crate::infrastructure::storage::config::{
    platform_pictures_dir, LauncherConfig, TomlSettingsStore,
};

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between commands.
///
/// Unlike state that needs a mutex around every field, this is a bundle of
/// services which each guard their own interior state.  Commands therefore
/// never hold a lock across an await of another service.
pub struct AppState {
    /// Live settings with debounced persistence.
    pub settings: Arc<SettingsService>,
    /// The title-bar timer.
    pub timers: Arc<TimerService>,
    /// The hook runtime supervisor.
    pub mousecam: Arc<Mousecam>,
}

impl AppState {
    /// Wires the production services: TOML settings storage and the real
    /// process launcher.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            settings: SettingsService::load(Arc::new(TomlSettingsStore)),
            timers: TimerService::new(),
            mousecam: Mousecam::new(Arc::new(ProcessRuntimeLauncher::new())),
        })
    }
}

// ── Data Transfer Objects (Presentation layer) ────────────────────────────────

/// DTO carrying every UI-visible setting, flattened for the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsDto {
    pub zoom_factor: f64,
    pub window_width: u32,
    pub window_height: u32,
    pub alert_threshold_secs: u32,
    pub sound_alert: bool,
    pub sound_volume: u8,
    pub screenshot_folder: Option<String>,
    pub mousecam_enabled: bool,
}

impl From<&LauncherConfig> for SettingsDto {
    fn from(cfg: &LauncherConfig) -> Self {
        Self {
            zoom_factor: cfg.zoom_factor,
            window_width: cfg.window.width,
            window_height: cfg.window.height,
            alert_threshold_secs: cfg.timer.alert_threshold_secs,
            sound_alert: cfg.timer.sound_alert,
            sound_volume: cfg.timer.sound_volume,
            screenshot_folder: cfg
                .screenshot
                .folder
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            mousecam_enabled: cfg.mousecam.enabled,
        }
    }
}

/// DTO describing the timer for the status strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatusDto {
    pub running: bool,
    pub paused: bool,
    /// `AFK`, `CNT`, or `TMR` while a timer runs.
    pub mode: Option<String>,
}

/// DTO describing the hook runtime for the status strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MousecamStatusDto {
    pub enabled: bool,
    pub running: bool,
    pub session_id: Option<String>,
}

/// DTO for the update check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCheckDto {
    pub current_version: String,
    pub latest_version: String,
    pub update_available: bool,
}

/// Unified response wrapper used by bridge commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Settings commands ─────────────────────────────────────────────────────────

/// Returns the current settings.
///
/// # Example (frontend)
/// ```ts
/// const settings = await invoke<SettingsDto>('get_settings');
/// ```
pub async fn get_settings(state: Arc<AppState>) -> CommandResult<SettingsDto> {
    CommandResult::ok(SettingsDto::from(&state.settings.current()))
}

/// Applies a settings change from the UI and schedules the debounced save.
///
/// The zoom factor is snapped to the ladder and the volume capped at 100;
/// the returned DTO reflects what was actually stored.  Toggling the
/// mousecam here only changes the preference; `set_mousecam_enabled` is the
/// command that starts or stops the runtime.
pub async fn update_settings(state: Arc<AppState>, dto: SettingsDto) -> CommandResult<SettingsDto> {
    let updated = state.settings.mutate(|cfg| {
        cfg.zoom_factor = zoom::snap(dto.zoom_factor);
        cfg.window.width = dto.window_width;
        cfg.window.height = dto.window_height;
        cfg.timer.alert_threshold_secs = dto.alert_threshold_secs;
        cfg.timer.sound_alert = dto.sound_alert;
        cfg.timer.sound_volume = dto.sound_volume.min(100);
        cfg.screenshot.folder = dto.screenshot_folder.as_ref().map(PathBuf::from);
        cfg.mousecam.enabled = dto.mousecam_enabled;
    });
    CommandResult::ok(SettingsDto::from(&updated))
}

// ── Zoom commands ─────────────────────────────────────────────────────────────

/// Steps the zoom one ladder notch in and persists the result.
pub async fn zoom_in(state: Arc<AppState>) -> CommandResult<f64> {
    CommandResult::ok(step_zoom(&state, ZoomDirection::In))
}

/// Steps the zoom one ladder notch out and persists the result.
pub async fn zoom_out(state: Arc<AppState>) -> CommandResult<f64> {
    CommandResult::ok(step_zoom(&state, ZoomDirection::Out))
}

/// Returns the zoom to 100%.
pub async fn zoom_reset(state: Arc<AppState>) -> CommandResult<f64> {
    let updated = state.settings.mutate(|cfg| cfg.zoom_factor = 1.0);
    CommandResult::ok(updated.zoom_factor)
}

fn step_zoom(state: &AppState, direction: ZoomDirection) -> f64 {
    let updated = state
        .settings
        .mutate(|cfg| cfg.zoom_factor = zoom::next_step(cfg.zoom_factor, direction));
    updated.zoom_factor
}

// ── Timer commands ────────────────────────────────────────────────────────────

/// Starts the 90-second AFK watchdog with the configured alert threshold.
pub async fn start_afk_timer(state: Arc<AppState>) -> CommandResult<()> {
    let threshold = state.settings.current().timer.alert_threshold_secs;
    state.timers.start_afk(threshold, unix_now_ms());
    CommandResult::ok(())
}

/// Starts a countdown.  `total_secs` must be at least one second.
pub async fn start_countdown_timer(
    state: Arc<AppState>,
    total_secs: u32,
    auto_loop: bool,
) -> CommandResult<()> {
    if total_secs == 0 {
        return CommandResult::err("countdown duration must be at least one second");
    }
    let threshold = state.settings.current().timer.alert_threshold_secs;
    state
        .timers
        .start_countdown(total_secs, auto_loop, threshold, unix_now_ms());
    CommandResult::ok(())
}

/// Starts the count-up stopwatch.
pub async fn start_stopwatch_timer(state: Arc<AppState>) -> CommandResult<()> {
    state.timers.start_stopwatch(unix_now_ms());
    CommandResult::ok(())
}

/// Pauses the running timer; a no-op when nothing runs.
pub async fn pause_timer(state: Arc<AppState>) -> CommandResult<()> {
    state.timers.pause();
    CommandResult::ok(())
}

/// Resumes a paused timer; a no-op otherwise.
pub async fn resume_timer(state: Arc<AppState>) -> CommandResult<()> {
    state.timers.resume(unix_now_ms());
    CommandResult::ok(())
}

/// Rewinds the running timer to zero.
pub async fn reset_timer(state: Arc<AppState>) -> CommandResult<()> {
    state.timers.reset(unix_now_ms());
    CommandResult::ok(())
}

/// Stops and discards the running timer.
pub async fn stop_timer(state: Arc<AppState>) -> CommandResult<()> {
    state.timers.stop();
    CommandResult::ok(())
}

/// Returns whether a timer runs, whether it is paused, and its mode label.
pub async fn get_timer_status(state: Arc<AppState>) -> CommandResult<TimerStatusDto> {
    CommandResult::ok(TimerStatusDto {
        running: state.timers.is_running(),
        paused: state.timers.is_paused(),
        mode: state.timers.mode().map(|m| m.label().to_string()),
    })
}

// ── Screenshot commands ───────────────────────────────────────────────────────

/// Resolves the full path the next screenshot should be written to.
///
/// Uses the configured folder, or `Pictures/RN04 Screenshots` by default.
/// The folder is created on demand; if that fails the Pictures root is used
/// instead, so a capture never dies on a bad folder setting.
pub async fn screenshot_target_path(state: Arc<AppState>) -> CommandResult<String> {
    let configured = state.settings.current().screenshot.folder;
    let dir = match configured {
        Some(dir) => dir,
        None => {
            let Some(pictures) = platform_pictures_dir() else {
                return CommandResult::err("could not determine the Pictures directory");
            };
            pictures.join(DEFAULT_SCREENSHOT_FOLDER)
        }
    };

    let dir = match std::fs::create_dir_all(&dir) {
        Ok(()) => dir,
        Err(e) => {
            warn!("could not create screenshot folder {}: {e}", dir.display());
            match platform_pictures_dir() {
                Some(pictures) => pictures,
                None => {
                    return CommandResult::err(format!(
                        "could not create screenshot folder: {e}"
                    ))
                }
            }
        }
    };

    let path = dir.join(file_name(chrono::Utc::now()));
    CommandResult::ok(path.to_string_lossy().into_owned())
}

// ── Mousecam commands ─────────────────────────────────────────────────────────

/// Enables or disables camera remapping, starting or stopping the hook
/// runtime to match, and persists the preference.
pub async fn set_mousecam_enabled(
    state: Arc<AppState>,
    enabled: bool,
) -> CommandResult<MousecamStatusDto> {
    let updated = state.settings.mutate(|cfg| cfg.mousecam.enabled = enabled);

    if enabled {
        state.mousecam.start(&updated.mousecam).await;
    } else {
        // Fire and forget; the monitor task finishes the shutdown.
        let _ = state.mousecam.stop().await;
    }

    get_mousecam_status(state).await
}

/// Returns the mousecam preference and the live session state.
pub async fn get_mousecam_status(state: Arc<AppState>) -> CommandResult<MousecamStatusDto> {
    CommandResult::ok(MousecamStatusDto {
        enabled: state.settings.current().mousecam.enabled,
        running: state.mousecam.is_running().await,
        session_id: state
            .mousecam
            .current_session()
            .await
            .map(|id| id.to_string()),
    })
}

// ── Update commands ───────────────────────────────────────────────────────────

/// Compares the shell's version against the latest published one.
///
/// Fetching the published version string is the frontend's job; this
/// command only applies the numeric part-by-part ordering.
pub async fn check_for_update(
    _state: Arc<AppState>,
    latest_version: String,
) -> CommandResult<UpdateCheckDto> {
    let current_version = env!("CARGO_PKG_VERSION").to_string();
    let update_available = compare_versions(&current_version, &latest_version) == Ordering::Less;
    CommandResult::ok(UpdateCheckDto {
        current_version,
        latest_version,
        update_available,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
