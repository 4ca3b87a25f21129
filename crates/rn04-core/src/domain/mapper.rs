//! Directional mapper domain entity.
//!
//! The mapper maintains the held/released state of the four arrow keys and
//! translates a cursor offset from the pan anchor into key transitions.
//! Screen coordinates grow rightward and downward, so a cursor to the right
//! of the anchor (`dx > 0`) holds Left (the camera orbits left), and a cursor
//! below the anchor (`dy > 0`) holds Up.
//!
//! All mutations are edge transitions: a press is emitted only when the key
//! goes from released to held, a release only on the opposite edge.  Redundant
//! transitions are suppressed so the OS never sees auto-repeat storms.

/// The four synthetic arrow keys the mapper can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionKey {
    Left,
    Right,
    Up,
    Down,
}

impl DirectionKey {
    /// All four keys, in the order transitions are emitted.
    pub const ALL: [DirectionKey; 4] = [
        DirectionKey::Left,
        DirectionKey::Right,
        DirectionKey::Down,
        DirectionKey::Up,
    ];
}

/// A single edge transition of one arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    /// The key went from released to held.
    Down(DirectionKey),
    /// The key went from held to released.
    Up(DirectionKey),
}

/// Held/released flags for the four arrow keys.
///
/// Each flag tracks what the mapper believes the OS-visible key state is.
/// [`KeyState::press`] and [`KeyState::release`] are edge-filtered;
/// [`KeyState::release_all`] deliberately is not (see its docs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl KeyState {
    /// Creates a state with all four keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the given key is currently held.
    pub fn is_held(&self, key: DirectionKey) -> bool {
        match key {
            DirectionKey::Left => self.left,
            DirectionKey::Right => self.right,
            DirectionKey::Up => self.up,
            DirectionKey::Down => self.down,
        }
    }

    /// Returns `true` if any of the four keys is currently held.
    pub fn any_held(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    fn flag_mut(&mut self, key: DirectionKey) -> &mut bool {
        match key {
            DirectionKey::Left => &mut self.left,
            DirectionKey::Right => &mut self.right,
            DirectionKey::Up => &mut self.up,
            DirectionKey::Down => &mut self.down,
        }
    }

    /// Marks the key held.  Returns the transition, or `None` if it was
    /// already held (debounce).
    pub fn press(&mut self, key: DirectionKey) -> Option<KeyTransition> {
        let flag = self.flag_mut(key);
        if *flag {
            return None;
        }
        *flag = true;
        Some(KeyTransition::Down(key))
    }

    /// Marks the key released.  Returns the transition, or `None` if it was
    /// already released (debounce).
    pub fn release(&mut self, key: DirectionKey) -> Option<KeyTransition> {
        let flag = self.flag_mut(key);
        if !*flag {
            return None;
        }
        *flag = false;
        Some(KeyTransition::Up(key))
    }

    /// Releases all four keys and returns a release transition for each,
    /// **regardless of the tracked flags**.
    ///
    /// This is the stuck-key belt: if the flags ever disagree with the real
    /// OS key state (a dropped injection, an interleaved physical press), an
    /// edge-filtered release would strand the key held forever.  A spurious
    /// key-up for an already-released key is harmless, so every release path
    /// emits all four unconditionally.
    pub fn release_all(&mut self) -> [KeyTransition; 4] {
        self.left = false;
        self.right = false;
        self.up = false;
        self.down = false;
        [
            KeyTransition::Up(DirectionKey::Left),
            KeyTransition::Up(DirectionKey::Right),
            KeyTransition::Up(DirectionKey::Down),
            KeyTransition::Up(DirectionKey::Up),
        ]
    }
}

/// Translates anchor-relative cursor offsets into arrow-key transitions.
///
/// The rules, per axis and independent of each other:
///
/// | Condition | Held key |
/// |-----------|----------|
/// | `dx > 0`  | Left     |
/// | `dx < 0`  | Right    |
/// | `dy > 0`  | Up       |
/// | `dy < 0`  | Down     |
///
/// `dx == 0` releases both horizontal keys; `dy == 0` both vertical keys.
/// Diagonals hold one key per axis (`dx > 0 && dy > 0` holds Left and Up).
#[derive(Debug, Clone, Default)]
pub struct DirectionalMapper {
    state: KeyState,
}

impl DirectionalMapper {
    /// Creates a mapper with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the tracked key flags.
    pub fn state(&self) -> &KeyState {
        &self.state
    }

    /// Applies the directional rules for one cursor offset.
    ///
    /// Each of the four keys is driven toward its target state for (dx, dy);
    /// only the keys that actually change state produce a transition.  The
    /// emission order is fixed (Left, Right, Down, Up) so callers and tests
    /// see deterministic sequences.
    pub fn map_offset(&mut self, dx: i32, dy: i32) -> Vec<KeyTransition> {
        let targets = [
            (DirectionKey::Left, dx > 0),
            (DirectionKey::Right, dx < 0),
            (DirectionKey::Down, dy < 0),
            (DirectionKey::Up, dy > 0),
        ];

        let mut transitions = Vec::new();
        for (key, held) in targets {
            let transition = if held {
                self.state.press(key)
            } else {
                self.state.release(key)
            };
            if let Some(t) = transition {
                transitions.push(t);
            }
        }
        transitions
    }

    /// Unconditionally releases all four keys.  See [`KeyState::release_all`].
    pub fn reset(&mut self) -> [KeyTransition; 4] {
        self.state.release_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DirectionKey::{Down, Left, Right, Up};

    fn downs(transitions: &[KeyTransition]) -> Vec<DirectionKey> {
        transitions
            .iter()
            .filter_map(|t| match t {
                KeyTransition::Down(k) => Some(*k),
                KeyTransition::Up(_) => None,
            })
            .collect()
    }

    fn ups(transitions: &[KeyTransition]) -> Vec<DirectionKey> {
        transitions
            .iter()
            .filter_map(|t| match t {
                KeyTransition::Up(k) => Some(*k),
                KeyTransition::Down(_) => None,
            })
            .collect()
    }

    // ── KeyState edges ────────────────────────────────────────────────────────

    #[test]
    fn test_press_emits_transition_only_on_first_call() {
        let mut state = KeyState::new();

        assert_eq!(state.press(Left), Some(KeyTransition::Down(Left)));
        assert_eq!(state.press(Left), None);
        assert!(state.is_held(Left));
    }

    #[test]
    fn test_release_emits_transition_only_when_held() {
        let mut state = KeyState::new();

        assert_eq!(state.release(Left), None);

        state.press(Left);
        assert_eq!(state.release(Left), Some(KeyTransition::Up(Left)));
        assert_eq!(state.release(Left), None);
    }

    #[test]
    fn test_release_all_emits_four_ups_even_when_nothing_is_held() {
        let mut state = KeyState::new();

        let transitions = state.release_all();

        assert_eq!(transitions.len(), 4);
        assert_eq!(ups(&transitions), vec![Left, Right, Down, Up]);
        assert!(!state.any_held());
    }

    #[test]
    fn test_release_all_clears_held_keys_and_is_repeatable() {
        let mut state = KeyState::new();
        state.press(Left);
        state.press(Up);

        state.release_all();
        assert!(!state.any_held());

        // Repeating still emits all four releases.
        let again = state.release_all();
        assert_eq!(again.len(), 4);
    }

    // ── Directional rules ─────────────────────────────────────────────────────

    #[test]
    fn test_positive_dx_holds_left_only() {
        let mut mapper = DirectionalMapper::new();

        let transitions = mapper.map_offset(30, 0);

        assert_eq!(transitions, vec![KeyTransition::Down(Left)]);
    }

    #[test]
    fn test_negative_dx_holds_right_only() {
        let mut mapper = DirectionalMapper::new();

        let transitions = mapper.map_offset(-30, 0);

        assert_eq!(transitions, vec![KeyTransition::Down(Right)]);
    }

    #[test]
    fn test_negative_dy_holds_down_and_positive_dy_holds_up() {
        let mut mapper = DirectionalMapper::new();
        assert_eq!(mapper.map_offset(0, -10), vec![KeyTransition::Down(Down)]);

        let mut mapper = DirectionalMapper::new();
        assert_eq!(mapper.map_offset(0, 10), vec![KeyTransition::Down(Up)]);
    }

    #[test]
    fn test_diagonal_offset_holds_one_key_per_axis() {
        let mut mapper = DirectionalMapper::new();

        let transitions = mapper.map_offset(15, 20);

        assert_eq!(downs(&transitions), vec![Left, Up]);
    }

    #[test]
    fn test_zero_dx_releases_both_horizontal_keys() {
        let mut mapper = DirectionalMapper::new();
        mapper.map_offset(10, 5);

        let transitions = mapper.map_offset(0, 5);

        assert_eq!(transitions, vec![KeyTransition::Up(Left)]);
        assert!(!mapper.state().is_held(Left));
        assert!(!mapper.state().is_held(Right));
        assert!(mapper.state().is_held(Up));
    }

    #[test]
    fn test_sign_flip_releases_old_key_and_presses_opposite() {
        let mut mapper = DirectionalMapper::new();
        mapper.map_offset(25, 0);

        let transitions = mapper.map_offset(-25, 0);

        assert_eq!(
            transitions,
            vec![KeyTransition::Up(Left), KeyTransition::Down(Right)]
        );
    }

    #[test]
    fn test_sweep_in_one_direction_presses_exactly_once() {
        let mut mapper = DirectionalMapper::new();

        let mut press_count = 0;
        for dx in 1..=50 {
            press_count += downs(&mapper.map_offset(dx, 0)).len();
        }

        assert_eq!(press_count, 1);
        assert!(mapper.state().is_held(Left));
    }

    #[test]
    fn test_opposite_keys_are_never_held_together() {
        let mut mapper = DirectionalMapper::new();
        let offsets = [
            (10, 10),
            (-10, 10),
            (-10, -10),
            (10, -10),
            (0, 0),
            (100, -3),
            (-1, 0),
            (1, 1),
        ];

        for (dx, dy) in offsets {
            mapper.map_offset(dx, dy);
            let state = mapper.state();
            assert!(
                !(state.is_held(Left) && state.is_held(Right)),
                "left and right both held after ({dx}, {dy})"
            );
            assert!(
                !(state.is_held(Up) && state.is_held(Down)),
                "up and down both held after ({dx}, {dy})"
            );
        }
    }

    #[test]
    fn test_reset_after_diagonal_releases_everything() {
        let mut mapper = DirectionalMapper::new();
        mapper.map_offset(40, 40);
        assert!(mapper.state().any_held());

        let transitions = mapper.reset();

        assert_eq!(transitions.len(), 4);
        assert!(!mapper.state().any_held());
    }

    #[test]
    fn test_mapping_after_reset_starts_from_clean_state() {
        let mut mapper = DirectionalMapper::new();
        mapper.map_offset(40, 0);
        mapper.reset();

        // The same offset presses again: reset cleared the edge filter.
        let transitions = mapper.map_offset(40, 0);

        assert_eq!(transitions, vec![KeyTransition::Down(Left)]);
    }
}
