//! The zoom step ladder.
//!
//! Zoom factors are kept on a ladder of clean steps, 50% to 300% in 5%
//! increments, so repeated zooming lands on round percentages instead of
//! drifting through floating-point residue.  Persisted factors are snapped
//! back onto the ladder at load time.

/// Tolerance used when comparing a factor against a ladder step.
pub const ZOOM_EPSILON: f64 = 0.001;

/// Which way the user is zooming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// The ladder: 0.50, 0.55, …, 3.00.
pub fn zoom_steps() -> Vec<f64> {
    (50..=300u32)
        .step_by(5)
        .map(|pct| f64::from(pct) / 100.0)
        .collect()
}

/// Returns the next ladder step from `current` in the given direction.
///
/// Zooming in picks the first step more than [`ZOOM_EPSILON`] above the
/// current factor; zooming out picks the last step more than the epsilon
/// below it.  At the ends of the ladder the boundary step is returned.
pub fn next_step(current: f64, direction: ZoomDirection) -> f64 {
    let steps = zoom_steps();
    match direction {
        ZoomDirection::In => steps
            .iter()
            .copied()
            .find(|step| *step > current + ZOOM_EPSILON)
            .unwrap_or_else(|| steps[steps.len() - 1]),
        ZoomDirection::Out => steps
            .iter()
            .rev()
            .copied()
            .find(|step| *step < current - ZOOM_EPSILON)
            .unwrap_or(steps[0]),
    }
}

/// Snaps an arbitrary factor to the nearest ladder step.
pub fn snap(factor: f64) -> f64 {
    let steps = zoom_steps();
    let mut closest = steps[0];
    let mut min_diff = (factor - closest).abs();
    for step in steps.into_iter().skip(1) {
        let diff = (factor - step).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = step;
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_factor(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_ladder_spans_50_to_300_percent() {
        let steps = zoom_steps();

        assert_eq!(steps.len(), 51);
        assert_factor(steps[0], 0.5);
        assert_factor(steps[50], 3.0);
    }

    #[test]
    fn test_next_step_in_moves_up_one_step() {
        assert_factor(next_step(1.0, ZoomDirection::In), 1.05);
        assert_factor(next_step(1.05, ZoomDirection::In), 1.1);
    }

    #[test]
    fn test_next_step_out_moves_down_one_step() {
        assert_factor(next_step(1.0, ZoomDirection::Out), 0.95);
    }

    #[test]
    fn test_next_step_from_between_steps_finds_the_adjacent_one() {
        assert_factor(next_step(1.02, ZoomDirection::In), 1.05);
        assert_factor(next_step(1.02, ZoomDirection::Out), 1.0);
    }

    #[test]
    fn test_next_step_saturates_at_the_ladder_ends() {
        assert_factor(next_step(3.0, ZoomDirection::In), 3.0);
        assert_factor(next_step(0.5, ZoomDirection::Out), 0.5);
        assert_factor(next_step(10.0, ZoomDirection::In), 3.0);
    }

    #[test]
    fn test_snap_picks_the_nearest_step() {
        assert_factor(snap(1.06), 1.05);
        assert_factor(snap(1.09), 1.1);
        assert_factor(snap(1.0), 1.0);
    }

    #[test]
    fn test_snap_clamps_values_outside_the_ladder() {
        assert_factor(snap(0.2), 0.5);
        assert_factor(snap(5.0), 3.0);
    }
}
