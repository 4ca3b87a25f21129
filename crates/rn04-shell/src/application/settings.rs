//! In-memory settings state with debounced persistence.
//!
//! The UI fires a settings change for every slider notch and checkbox
//! toggle.  Writing the TOML file on each of those would hammer the disk,
//! so the service keeps the authoritative copy in memory and schedules one
//! write 500 ms after the most recent change.  `flush` forces the write
//! immediately; the shell calls it on shutdown so the last burst of changes
//! is never lost.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::warn;

use crate::infrastructure::storage::config::{LauncherConfig, SettingsStore};

/// Delay between the last settings change and the disk write.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Owns the live [`LauncherConfig`] and its persistence schedule.
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    current: Mutex<LauncherConfig>,
    /// The pending debounced save, if any.  Replaced (and the old task
    /// aborted) on every change.
    pending_save: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl SettingsService {
    /// Loads settings through `store` and wraps them in a service.
    ///
    /// A load failure is downgraded to defaults: a corrupt settings file
    /// must not keep the launcher from starting.
    pub fn load(store: Arc<dyn SettingsStore>) -> Arc<Self> {
        let current = store.load().unwrap_or_else(|e| {
            warn!("could not load settings, using defaults: {e}");
            LauncherConfig::default()
        });
        Arc::new(Self {
            store,
            current: Mutex::new(current),
            pending_save: Mutex::new(None),
        })
    }

    /// A snapshot of the current settings.
    pub fn current(&self) -> LauncherConfig {
        self.current.lock().expect("settings lock poisoned").clone()
    }

    /// Replaces the settings wholesale and schedules a debounced save.
    pub fn update(&self, config: LauncherConfig) {
        *self.current.lock().expect("settings lock poisoned") = config;
        self.schedule_save();
    }

    /// Applies `f` to the settings, schedules a debounced save, and returns
    /// the updated snapshot.
    pub fn mutate(&self, f: impl FnOnce(&mut LauncherConfig)) -> LauncherConfig {
        let updated = {
            let mut guard = self.current.lock().expect("settings lock poisoned");
            f(&mut guard);
            guard.clone()
        };
        self.schedule_save();
        updated
    }

    /// Cancels any pending debounce and writes the current settings now.
    ///
    /// A save already in flight is not interrupted; this write simply
    /// follows it with the same or newer data.
    pub fn flush(&self) {
        if let Some(pending) = self
            .pending_save
            .lock()
            .expect("pending save lock poisoned")
            .take()
        {
            pending.abort();
        }
        self.save_now();
    }

    fn schedule_save(&self) {
        // The task carries its own snapshot: any later change replaces the
        // task, so the snapshot that eventually fires is always the newest.
        let store = Arc::clone(&self.store);
        let snapshot = self.current.lock().expect("settings lock poisoned").clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(SAVE_DEBOUNCE).await;
            if let Err(e) = store.save(&snapshot) {
                warn!("could not save settings: {e}");
            }
        });

        let mut pending = self.pending_save.lock().expect("pending save lock poisoned");
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    fn save_now(&self) {
        let snapshot = self.current.lock().expect("settings lock poisoned").clone();
        if let Err(e) = self.store.save(&snapshot) {
            warn!("could not save settings: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::config::{MockSettingsStore, SettingsError};

    /// Records every save so tests can count debounced writes.
    struct CountingStore {
        saves: Mutex<Vec<LauncherConfig>>,
    }

    impl CountingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                saves: Mutex::new(Vec::new()),
            })
        }

        fn saved(&self) -> Vec<LauncherConfig> {
            self.saves.lock().unwrap().clone()
        }
    }

    impl SettingsStore for CountingStore {
        fn load(&self) -> Result<LauncherConfig, SettingsError> {
            Ok(LauncherConfig::default())
        }

        fn save(&self, config: &LauncherConfig) -> Result<(), SettingsError> {
            self.saves.lock().unwrap().push(config.clone());
            Ok(())
        }
    }

    #[test]
    fn test_load_failure_falls_back_to_defaults() {
        // Arrange
        let mut store = MockSettingsStore::new();
        store
            .expect_load()
            .returning(|| Err(SettingsError::NoPlatformConfigDir));

        // Act
        let service = SettingsService::load(Arc::new(store));

        // Assert
        assert_eq!(service.current(), LauncherConfig::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_collapse_into_one_save() {
        // Arrange
        let store = CountingStore::new();
        let service = SettingsService::load(Arc::clone(&store) as Arc<dyn SettingsStore>);

        // Act – three changes in quick succession
        service.mutate(|cfg| cfg.zoom_factor = 1.10);
        service.mutate(|cfg| cfg.zoom_factor = 1.15);
        service.mutate(|cfg| cfg.zoom_factor = 1.20);

        // Nothing is written before the debounce expires
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(store.saved().is_empty());

        // ...and exactly one write lands afterwards, with the final value
        tokio::time::sleep(Duration::from_millis(200)).await;
        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert!((saved[0].zoom_factor - 1.20).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately_and_cancels_the_debounce() {
        // Arrange
        let store = CountingStore::new();
        let service = SettingsService::load(Arc::clone(&store) as Arc<dyn SettingsStore>);
        service.mutate(|cfg| cfg.timer.sound_alert = true);

        // Act
        service.flush();

        // Assert – one immediate write
        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].timer.sound_alert);

        // ...and the debounced task was cancelled, not merely delayed
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_after_flush_schedules_a_new_save() {
        // Arrange
        let store = CountingStore::new();
        let service = SettingsService::load(Arc::clone(&store) as Arc<dyn SettingsStore>);
        service.mutate(|cfg| cfg.window.width = 1280);
        service.flush();

        // Act
        service.mutate(|cfg| cfg.window.width = 1440);
        tokio::time::sleep(Duration::from_millis(600)).await;

        // Assert
        let saved = store.saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].window.width, 1440);
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_reflects_changes_before_any_save() {
        // Arrange
        let store = CountingStore::new();
        let service = SettingsService::load(Arc::clone(&store) as Arc<dyn SettingsStore>);

        // Act
        let updated = service.mutate(|cfg| cfg.mousecam.enabled = false);

        // Assert – in-memory state is current even though no write happened
        assert!(!updated.mousecam.enabled);
        assert!(!service.current().mousecam.enabled);
        assert!(store.saved().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_errors_are_tolerated() {
        // Arrange
        let mut store = MockSettingsStore::new();
        store.expect_load().returning(|| Ok(LauncherConfig::default()));
        store
            .expect_save()
            .returning(|_| Err(SettingsError::NoPlatformConfigDir));

        let service = SettingsService::load(Arc::new(store));
        service.mutate(|cfg| cfg.zoom_factor = 2.0);

        // Act – the failed save must not panic or poison anything
        service.flush();

        // Assert
        assert!((service.current().zoom_factor - 2.0).abs() < 1e-9);
    }
}
