//! Cradle state and simulation parameters
//!
//! A `CradleState` is a plain snapshot: `step` consumes one and produces the next.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CradleError;
use crate::{angle_from_offset, bob_offset};

/// One pendulum of the cradle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    /// Angle from vertical (radians, 0 = hanging straight down, positive = right)
    pub angle: f32,
    /// Angular velocity (rad/s)
    pub angular_vel: f32,
    /// Held by the pointer
    pub dragging: bool,
    /// Target angle while held; mirrors `angle` after release
    pub drag_angle: f32,
}

impl Ball {
    /// A ball hanging at rest
    pub fn at_rest() -> Self {
        Self::default()
    }

    /// Grab the ball and aim it at `angle` (clamped to the drag range)
    pub fn grab(&mut self, angle: f32) {
        self.dragging = true;
        self.drag_angle = angle.clamp(-DRAG_ANGLE_LIMIT, DRAG_ANGLE_LIMIT);
    }

    /// Let go: the held angle becomes the real angle, motion restarts from rest
    pub fn release(&mut self) {
        self.dragging = false;
        self.angle = self.drag_angle;
        self.angular_vel = 0.0;
    }
}

/// Structural and physical parameters, constant during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CradleParams {
    /// Number of balls
    pub ball_count: usize,
    /// String length from anchor to ball center (px)
    pub rope_length: f32,
    /// Ball radius (px)
    pub ball_radius: f32,
    /// Extra space between neighbouring balls at rest (px)
    pub gap: f32,
    /// Gravity magnitude (px/s²)
    pub gravity: f32,
    /// Angular velocity kept per substep (0 < damping <= 1)
    pub damping: f32,
}

impl Default for CradleParams {
    fn default() -> Self {
        Self {
            ball_count: 5,
            rope_length: 170.0,
            ball_radius: BALL_RADIUS,
            gap: 0.0,
            gravity: 2000.0,
            damping: DAMPING,
        }
    }
}

impl CradleParams {
    /// Check every value lies in its physical domain
    pub fn validate(&self) -> Result<(), CradleError> {
        if self.ball_count == 0 {
            return Err(CradleError::InvalidParameter {
                name: "ball_count",
                value: 0.0,
            });
        }
        let checks = [
            ("rope_length", self.rope_length, self.rope_length > 0.0),
            ("ball_radius", self.ball_radius, self.ball_radius > 0.0),
            ("gap", self.gap, self.gap >= 0.0),
            ("gravity", self.gravity, self.gravity >= 0.0),
            (
                "damping",
                self.damping,
                self.damping > 0.0 && self.damping <= 1.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(CradleError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Horizontal distance between neighbouring anchors
    #[inline]
    pub fn spacing(&self) -> f32 {
        2.0 * self.ball_radius + self.gap
    }

    /// Smallest allowed distance between neighbouring ball centers
    #[inline]
    pub fn min_separation(&self) -> f32 {
        2.0 * self.ball_radius
    }

    /// Anchor x for ball `index` (row centered on x = 0)
    #[inline]
    pub fn anchor_x(&self, index: usize) -> f32 {
        (index as f32 - (self.ball_count as f32 - 1.0) / 2.0) * self.spacing()
    }

    /// Anchor point for ball `index` (anchors sit on y = 0)
    #[inline]
    pub fn anchor(&self, index: usize) -> Vec2 {
        Vec2::new(self.anchor_x(index), 0.0)
    }

    /// Horizontal ball center for an angle
    #[inline]
    pub fn ball_x(&self, index: usize, angle: f32) -> f32 {
        self.anchor_x(index) + angle.sin() * self.rope_length
    }

    /// Angle recovered from a horizontal ball center
    #[inline]
    pub fn angle_at(&self, index: usize, x: f32) -> f32 {
        angle_from_offset(x - self.anchor_x(index), self.rope_length)
    }
}

/// Snapshot of the whole pendulum array
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CradleState {
    /// Balls ordered left to right
    pub balls: Vec<Ball>,
}

impl CradleState {
    /// `count` balls hanging at rest
    pub fn at_rest(count: usize) -> Self {
        Self {
            balls: vec![Ball::at_rest(); count],
        }
    }

    /// Index of the held ball, if any
    pub fn dragged_index(&self) -> Option<usize> {
        self.balls.iter().position(|b| b.dragging)
    }

    /// True while any ball is held (the drag lock)
    pub fn drag_active(&self) -> bool {
        self.balls.iter().any(|b| b.dragging)
    }

    /// Ball centers in simulation space
    pub fn positions(&self, params: &CradleParams) -> Vec<Vec2> {
        self.balls
            .iter()
            .enumerate()
            .map(|(i, ball)| params.anchor(i) + bob_offset(ball.angle, params.rope_length))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors_are_centered_and_evenly_spaced() {
        let params = CradleParams {
            ball_count: 4,
            gap: 10.0,
            ..Default::default()
        };
        let xs: Vec<f32> = (0..4).map(|i| params.anchor_x(i)).collect();
        assert!((xs[0] + xs[3]).abs() < 1e-4);
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - params.spacing()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_release_commits_drag_angle() {
        let mut ball = Ball::at_rest();
        ball.angular_vel = 3.0;
        ball.grab(2.5);
        assert!(ball.dragging);
        assert_eq!(ball.drag_angle, DRAG_ANGLE_LIMIT);

        ball.release();
        assert!(!ball.dragging);
        assert_eq!(ball.angle, DRAG_ANGLE_LIMIT);
        assert_eq!(ball.angular_vel, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_length = CradleParams {
            rope_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_length.validate(),
            Err(CradleError::InvalidParameter { name: "rope_length", .. })
        ));

        let bad_damping = CradleParams {
            damping: 1.5,
            ..Default::default()
        };
        assert!(bad_damping.validate().is_err());

        let nan_gravity = CradleParams {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(nan_gravity.validate().is_err());

        assert!(CradleParams::default().validate().is_ok());
    }

    #[test]
    fn test_positions_at_rest_hang_below_anchors() {
        let params = CradleParams::default();
        let state = CradleState::at_rest(params.ball_count);
        for (i, pos) in state.positions(&params).iter().enumerate() {
            assert!((pos.x - params.anchor_x(i)).abs() < 1e-4);
            assert!((pos.y - params.rope_length).abs() < 1e-4);
        }
    }
}
