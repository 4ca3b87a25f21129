//! Integration tests for the pan session and directional mapper.
//!
//! These tests drive whole middle-drag interactions through the public API,
//! exercising the anchor lifecycle, the edge filter, and the unconditional
//! release together the way the hook runtime does.

use rn04_core::{CameraPan, DirectionKey, KeyTransition};

/// Applies a scripted drag and returns every transition in order.
fn run_drag(pan: &mut CameraPan, anchor: (i32, i32), path: &[(i32, i32)]) -> Vec<KeyTransition> {
    let mut transitions = Vec::new();
    pan.begin(anchor.0, anchor.1);
    for &(x, y) in path {
        transitions.extend(pan.motion(x, y));
    }
    transitions.extend(pan.end());
    transitions
}

#[test]
fn test_full_drag_emits_balanced_press_release_pairs() {
    let mut pan = CameraPan::new();

    let transitions = run_drag(
        &mut pan,
        (100, 100),
        &[(130, 100), (70, 100), (70, 140), (100, 100)],
    );

    // Every press must be matched by at least one release of the same key
    // by the time the drag ends.
    for key in DirectionKey::ALL {
        let downs = transitions
            .iter()
            .filter(|t| **t == KeyTransition::Down(key))
            .count();
        if downs > 0 {
            let ups = transitions
                .iter()
                .filter(|t| **t == KeyTransition::Up(key))
                .count();
            assert!(ups >= downs, "{key:?} pressed {downs}x but released {ups}x");
        }
    }
}

#[test]
fn test_drag_never_holds_opposite_keys_simultaneously() {
    let mut pan = CameraPan::new();
    pan.begin(0, 0);

    // A spiral crossing both axes repeatedly.
    let mut held: Vec<DirectionKey> = Vec::new();
    for i in 0..200i32 {
        let x = (i % 41) - 20;
        let y = 20 - (i % 37);
        for transition in pan.motion(x, y) {
            match transition {
                KeyTransition::Down(k) => held.push(k),
                KeyTransition::Up(k) => held.retain(|h| *h != k),
            }
        }
        let horizontal = held
            .iter()
            .filter(|k| matches!(k, DirectionKey::Left | DirectionKey::Right))
            .count();
        let vertical = held
            .iter()
            .filter(|k| matches!(k, DirectionKey::Up | DirectionKey::Down))
            .count();
        assert!(horizontal <= 1, "both horizontal keys held at step {i}");
        assert!(vertical <= 1, "both vertical keys held at step {i}");
    }
}

#[test]
fn test_jitter_around_the_anchor_does_not_spam_transitions() {
    let mut pan = CameraPan::new();
    pan.begin(500, 500);

    let mut transitions = Vec::new();
    // Hand tremor: tiny movements that stay strictly right of the anchor.
    for x in [503, 505, 502, 508, 501, 509] {
        transitions.extend(pan.motion(x, 500));
    }

    assert_eq!(
        transitions,
        vec![KeyTransition::Down(DirectionKey::Left)],
        "steady-side jitter must produce exactly one press"
    );
}

#[test]
fn test_release_mid_motion_leaves_no_keys_behind() {
    let mut pan = CameraPan::new();
    pan.begin(100, 100);
    pan.motion(180, 40); // Left + Down held

    let released = pan.end();

    assert_eq!(released.len(), 4);
    for key in DirectionKey::ALL {
        assert!(
            released.contains(&KeyTransition::Up(key)),
            "{key:?} missing from the final release"
        );
    }
}

#[test]
fn test_consecutive_drags_do_not_leak_state_into_each_other() {
    let mut pan = CameraPan::new();

    run_drag(&mut pan, (100, 100), &[(200, 100)]);

    // Second drag from a different anchor: first motion behaves exactly as
    // it would on a fresh session.
    pan.begin(300, 300);
    assert_eq!(
        pan.motion(250, 300),
        vec![KeyTransition::Down(DirectionKey::Right)]
    );
    pan.end();
}
