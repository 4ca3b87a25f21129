//! TOML-based settings persistence for the launcher shell.
//!
//! Reads and writes [`LauncherConfig`] to the platform-appropriate file:
//! - Windows:  `%APPDATA%\RN04\settings.toml`
//! - Linux:    `~/.config/rn04/settings.toml`
//! - macOS:    `~/Library/Application Support/RN04/settings.toml`
//!
//! # Serde default values
//!
//! Every field carries a `#[serde(default = "some_fn")]` annotation, so the
//! launcher works on first run (before a settings file exists), and a file
//! written by an older version simply gains the new defaults.  Whole missing
//! tables fall back the same way via `#[serde(default)]`.
//!
//! # Zoom snapping on load
//!
//! A hand-edited `zoom_factor` is snapped to the zoom ladder when loaded, so
//! the rest of the app can assume the factor is always a ladder step.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rn04_core::domain::zoom;
use rn04_core::protocol::launch::DEFAULT_MOVE_THROTTLE_MS;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level launcher settings stored on disk.
///
/// `zoom_factor` is declared before the tables so TOML serialization emits
/// it at the top of the file; a scalar after a table is invalid TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LauncherConfig {
    /// Page zoom for the embedded game view. Always a ladder step.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub screenshot: ScreenshotConfig,
    #[serde(default)]
    pub mousecam: MousecamConfig,
}

/// Remembered main-window size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// Timer behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerConfig {
    /// Seconds of warning before a cycle or countdown ends.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold_secs: u32,
    /// Whether the alert plays a sound in addition to the title flash.
    #[serde(default)]
    pub sound_alert: bool,
    /// Alert sound volume, 0–100.
    #[serde(default = "default_sound_volume")]
    pub sound_volume: u8,
}

/// Screenshot destination settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScreenshotConfig {
    /// Destination folder. `None` means `Pictures/RN04 Screenshots`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
}

/// Mousecam (camera remapper) settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MousecamConfig {
    /// Whether the hook runtime is started with the launcher.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum interval between remapped cursor moves, in milliseconds.
    #[serde(default = "default_move_throttle")]
    pub move_throttle_ms: u32,
    /// How long a stop request may take before the runtime is killed.
    #[serde(default = "default_stop_grace")]
    pub stop_grace_ms: u64,
    /// Explicit path to the rn04-mousecam binary. `None` means "next to the
    /// shell executable".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_zoom_factor() -> f64 {
    1.0
}
fn default_window_width() -> u32 {
    1100
}
fn default_window_height() -> u32 {
    920
}
fn default_alert_threshold() -> u32 {
    10
}
fn default_sound_volume() -> u8 {
    60
}
fn default_true() -> bool {
    true
}
fn default_move_throttle() -> u32 {
    DEFAULT_MOVE_THROTTLE_MS
}
fn default_stop_grace() -> u64 {
    500
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            zoom_factor: default_zoom_factor(),
            window: WindowConfig::default(),
            timer: TimerConfig::default(),
            screenshot: ScreenshotConfig::default(),
            mousecam: MousecamConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            alert_threshold_secs: default_alert_threshold(),
            sound_alert: false,
            sound_volume: default_sound_volume(),
        }
    }
}

impl Default for MousecamConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            move_throttle_ms: default_move_throttle(),
            stop_grace_ms: default_stop_grace(),
            binary_path: None,
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory
/// cannot be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Parses settings text and snaps the zoom factor to the ladder.
///
/// # Errors
///
/// Returns [`SettingsError::Parse`] if the TOML is malformed.
pub fn settings_from_str(raw: &str) -> Result<LauncherConfig, SettingsError> {
    let mut cfg: LauncherConfig = toml::from_str(raw)?;
    cfg.zoom_factor = zoom::snap(cfg.zoom_factor);
    Ok(cfg)
}

/// Loads [`LauncherConfig`] from disk, returning `LauncherConfig::default()`
/// if the file does not yet exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings() -> Result<LauncherConfig, SettingsError> {
    let path = settings_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => settings_from_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LauncherConfig::default()),
        Err(e) => Err(SettingsError::Io { path, source: e }),
    }
}

/// Persists `config` to disk.
///
/// Creates the settings directory and file if they do not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings(config: &LauncherConfig) -> Result<(), SettingsError> {
    let path = settings_file_path()?;

    // Ensure directory exists before writing.
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Abstraction over settings persistence so services can be tested without
/// touching the real platform settings file.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore: Send + Sync {
    /// Loads the settings, or defaults when no file exists yet.
    fn load(&self) -> Result<LauncherConfig, SettingsError>;
    /// Writes the settings to disk.
    fn save(&self, config: &LauncherConfig) -> Result<(), SettingsError>;
}

/// The production [`SettingsStore`] backed by the platform settings file.
pub struct TomlSettingsStore;

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<LauncherConfig, SettingsError> {
        load_settings()
    }

    fn save(&self, config: &LauncherConfig) -> Result<(), SettingsError> {
        save_settings(config)
    }
}

// ── Platform directories ──────────────────────────────────────────────────────

/// Resolves the platform config base directory including the `RN04` folder.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("RN04"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("rn04"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/RN04
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RN04")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

/// Resolves the user's Pictures directory, where the default screenshot
/// folder lives.
pub fn platform_pictures_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %USERPROFILE%\Pictures
        std::env::var_os("USERPROFILE").map(|p| PathBuf::from(p).join("Pictures"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        // ~/Pictures
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join("Pictures"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
