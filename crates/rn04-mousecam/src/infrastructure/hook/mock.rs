//! Mock mouse hook for unit testing.
//!
//! Allows tests to inject synthetic [`MouseEvent`]s without requiring a
//! running Windows message loop or OS hooks.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use super::{HookError, MouseEvent, MouseHook};

/// A mock implementation of [`MouseHook`] that allows tests to inject events.
pub struct MockMouseHook {
    sender: Arc<Mutex<Option<Sender<MouseEvent>>>>,
}

impl MockMouseHook {
    /// Creates a new mock hook.
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Injects a synthetic event, as if observed by the OS hook.
    ///
    /// Panics if `install()` has not been called or if `uninstall()` has
    /// been called.
    pub fn inject_event(&self, event: MouseEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(event)
                .expect("receiver has been dropped; call install() first");
        } else {
            panic!("MockMouseHook::inject_event called before install()");
        }
    }

    /// `true` while the hook is installed (a sender exists).
    pub fn is_installed(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }
}

impl Default for MockMouseHook {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseHook for MockMouseHook {
    fn install(&self) -> Result<mpsc::Receiver<MouseEvent>, HookError> {
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(HookError::AlreadyInstalled);
        }
        let (tx, rx) = mpsc::channel();
        *guard = Some(tx);
        Ok(rx)
    }

    fn uninstall(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_hook_installs_and_receives_events() {
        // Arrange
        let hook = MockMouseHook::new();
        let rx = hook.install().expect("install should succeed");

        // Act
        hook.inject_event(MouseEvent::MiddleDown { x: 100, y: 200, time_ms: 0 });

        // Assert
        let event = rx.recv().expect("should receive event");
        assert!(matches!(event, MouseEvent::MiddleDown { x: 100, .. }));
    }

    #[test]
    fn test_mock_hook_rejects_double_install() {
        let hook = MockMouseHook::new();
        let _rx = hook.install().expect("install should succeed");

        let second = hook.install();

        assert!(matches!(second, Err(HookError::AlreadyInstalled)));
    }

    #[test]
    fn test_mock_hook_uninstall_closes_channel() {
        // Arrange
        let hook = MockMouseHook::new();
        let rx = hook.install().expect("install should succeed");

        // Act
        hook.uninstall();

        // Assert – channel should be disconnected
        let result = rx.recv();
        assert!(result.is_err(), "channel should be closed after uninstall()");
        assert!(!hook.is_installed());
    }

    #[test]
    fn test_mock_hook_preserves_event_order() {
        // Arrange
        let hook = MockMouseHook::new();
        let rx = hook.install().expect("install should succeed");

        // Act
        hook.inject_event(MouseEvent::MiddleDown { x: 10, y: 10, time_ms: 1 });
        hook.inject_event(MouseEvent::Move { x: 40, y: 10, time_ms: 2 });
        hook.inject_event(MouseEvent::MiddleUp { x: 40, y: 10, time_ms: 3 });

        // Assert
        assert!(matches!(rx.recv().unwrap(), MouseEvent::MiddleDown { .. }));
        assert!(matches!(rx.recv().unwrap(), MouseEvent::Move { x: 40, .. }));
        assert!(matches!(rx.recv().unwrap(), MouseEvent::MiddleUp { .. }));
    }
}
