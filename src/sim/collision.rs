//! Contact resolution between neighbouring balls
//!
//! Balls only ever touch their neighbours, so every pass is a left-to-right
//! sweep over adjacent pairs working on horizontal centers. Both passes run a
//! fixed number of sweeps rather than iterating to convergence; the counts are
//! tuned for visual stability.

use serde::{Deserialize, Serialize};

use crate::consts::IMPACT_FULL_SCALE_SPEED;

/// A velocity exchange between two neighbouring balls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// Left ball of the pair
    pub left: usize,
    /// Right ball of the pair (always `left + 1`)
    pub right: usize,
    /// Closing speed before the exchange (px/s)
    pub relative_speed: f32,
    /// Loudness hint in [0, 1]
    pub intensity: f32,
}

/// Map a closing speed to a sound intensity in [0, 1]
#[inline]
pub fn impact_intensity(relative_speed: f32) -> f32 {
    (relative_speed / IMPACT_FULL_SCALE_SPEED).clamp(0.0, 1.0)
}

/// Impact pass: push overlapping pairs apart and exchange velocities
///
/// Each overlapping pair moves half the overlap apart. If the left ball is
/// closing on the right one the two velocities are swapped, which is the
/// equal-mass elastic collision. Corrections ripple along the row within a
/// sweep, so a hit at one end reaches the far end in the same step.
pub fn resolve_impacts(
    xs: &mut [f32],
    vels: &mut [f32],
    min_separation: f32,
    passes: usize,
) -> Vec<Collision> {
    debug_assert_eq!(xs.len(), vels.len());
    let mut collisions = Vec::new();

    for _ in 0..passes {
        for left in 0..xs.len().saturating_sub(1) {
            let right = left + 1;
            let overlap = min_separation - (xs[right] - xs[left]);
            if overlap <= 0.0 {
                continue;
            }

            xs[left] -= overlap * 0.5;
            xs[right] += overlap * 0.5;

            if vels[left] > vels[right] {
                let relative_speed = vels[left] - vels[right];
                vels.swap(left, right);
                collisions.push(Collision {
                    left,
                    right,
                    relative_speed,
                    intensity: impact_intensity(relative_speed),
                });
            }
        }
    }

    collisions
}

/// Separation pass: push overlapping pairs apart without touching velocities
///
/// The held ball (if any) never moves; its neighbour takes the full correction.
pub fn enforce_separation(
    xs: &mut [f32],
    held: Option<usize>,
    min_separation: f32,
    passes: usize,
) {
    for _ in 0..passes {
        for left in 0..xs.len().saturating_sub(1) {
            let right = left + 1;
            let overlap = min_separation - (xs[right] - xs[left]);
            if overlap <= 0.0 {
                continue;
            }

            if held == Some(left) {
                xs[right] += overlap;
            } else if held == Some(right) {
                xs[left] -= overlap;
            } else {
                xs[left] -= overlap * 0.5;
                xs[right] += overlap * 0.5;
            }
        }
    }
}

/// Smallest gap between neighbouring centers minus the allowed minimum
///
/// Negative values are overlaps. Returns `f32::INFINITY` for fewer than two balls.
pub fn worst_clearance(xs: &[f32], min_separation: f32) -> f32 {
    xs.windows(2)
        .map(|pair| pair[1] - pair[0] - min_separation)
        .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_intensity_caps_at_full_scale() {
        assert_eq!(impact_intensity(0.0), 0.0);
        assert!((impact_intensity(250.0) - 0.5).abs() < 1e-6);
        assert_eq!(impact_intensity(500.0), 1.0);
        assert_eq!(impact_intensity(2000.0), 1.0);
    }

    #[test]
    fn test_impact_swaps_velocities() {
        let mut xs = [0.0, 44.0];
        let mut vels = [300.0, -100.0];

        let collisions = resolve_impacts(&mut xs, &mut vels, 48.0, 3);

        assert_eq!(collisions.len(), 1);
        assert_eq!(vels, [-100.0, 300.0]);
        assert!((collisions[0].relative_speed - 400.0).abs() < 1e-4);
        assert!((collisions[0].intensity - 0.8).abs() < 1e-6);
        assert!((xs[1] - xs[0] - 48.0).abs() < 1e-4);
    }

    #[test]
    fn test_separating_pair_keeps_velocities() {
        let mut xs = [0.0, 44.0];
        let mut vels = [-50.0, 50.0];

        let collisions = resolve_impacts(&mut xs, &mut vels, 48.0, 3);

        assert!(collisions.is_empty());
        assert_eq!(vels, [-50.0, 50.0]);
        assert!((xs[1] - xs[0] - 48.0).abs() < 1e-4);
    }

    #[test]
    fn test_impact_ripples_down_the_row() {
        // Ball 0 has just pushed into a resting row of touching balls
        let mut xs = [4.0, 48.0, 96.0, 144.0];
        let mut vels = [400.0, 0.0, 0.0, 0.0];

        let collisions = resolve_impacts(&mut xs, &mut vels, 48.0, 3);

        assert_eq!(collisions.len(), 3);
        assert_eq!(vels, [0.0, 0.0, 0.0, 400.0]);
    }

    #[test]
    fn test_held_ball_does_not_move() {
        let mut xs = [0.0, 30.0, 80.0];
        enforce_separation(&mut xs, Some(1), 48.0, 12);

        assert_eq!(xs[1], 30.0);
        assert!((xs[1] - xs[0] - 48.0).abs() < 1e-4);
        assert!(xs[2] - xs[1] >= 48.0 - 1e-4);
    }

    #[test]
    fn test_worst_clearance() {
        assert_eq!(worst_clearance(&[0.0], 48.0), f32::INFINITY);
        assert!((worst_clearance(&[0.0, 50.0, 96.0], 48.0) + 2.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_swap_preserves_velocity_sum(
            v1 in 0.0f32..800.0,
            v2 in -800.0f32..0.0,
            overlap in 0.1f32..10.0,
        ) {
            let mut xs = [0.0, 48.0 - overlap];
            let mut vels = [v1, v2];

            let collisions = resolve_impacts(&mut xs, &mut vels, 48.0, 3);

            prop_assert_eq!(collisions.len(), 1);
            prop_assert!((vels[0] - v2).abs() < 1e-4);
            prop_assert!((vels[1] - v1).abs() < 1e-4);
            prop_assert!(((vels[0] + vels[1]) - (v1 + v2)).abs() < 1e-3);
        }

        #[test]
        fn prop_two_balls_always_separate(
            x0 in -100.0f32..100.0,
            offset in -60.0f32..60.0,
        ) {
            let mut xs = [x0, x0 + offset];
            enforce_separation(&mut xs, None, 48.0, 4);
            prop_assert!(xs[1] - xs[0] >= 48.0 - 1e-3);
        }
    }
}
