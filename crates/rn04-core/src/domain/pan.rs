//! One middle-drag pan session.
//!
//! A session begins when the middle button goes down (the cursor position at
//! that moment becomes the **anchor**) and ends when it goes up.  While the
//! session is active, every cursor position is interpreted relative to the
//! anchor and fed through the [`DirectionalMapper`]; while inactive, motion
//! is ignored entirely.

use tracing::debug;

use crate::domain::mapper::{DirectionalMapper, KeyTransition};

/// Anchor lifecycle plus the mapper it drives.
///
/// The session is active exactly when the anchor is set.  `end` is the single
/// convergence point for releasing keys: it resets the mapper unconditionally
/// whether or not a session is active, so callers can use it as the final
/// cleanup step on any shutdown path.
#[derive(Debug, Default)]
pub struct CameraPan {
    anchor: Option<(i32, i32)>,
    mapper: DirectionalMapper,
}

impl CameraPan {
    /// Creates an inactive session with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a middle-drag is in progress.
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// The press position the current session is anchored to, if any.
    pub fn anchor(&self) -> Option<(i32, i32)> {
        self.anchor
    }

    /// Starts a session anchored at the given cursor position.
    ///
    /// A second press without an intervening release simply re-anchors: any
    /// held keys stay held until the next motion re-evaluates them against
    /// the new anchor.
    pub fn begin(&mut self, x: i32, y: i32) {
        debug!(x, y, "pan session started");
        self.anchor = Some((x, y));
    }

    /// Feeds one cursor position through the mapper.
    ///
    /// Returns the resulting key transitions, or an empty vector when no
    /// session is active (inactive motion does no computation at all).
    pub fn motion(&mut self, x: i32, y: i32) -> Vec<KeyTransition> {
        match self.anchor {
            Some((ax, ay)) => self.mapper.map_offset(x - ax, y - ay),
            None => Vec::new(),
        }
    }

    /// Ends the session: clears the anchor and releases all four keys
    /// unconditionally.
    pub fn end(&mut self) -> [KeyTransition; 4] {
        if self.anchor.take().is_some() {
            debug!("pan session ended");
        }
        self.mapper.reset()
    }
}
