//! Pointer input translation
//!
//! Turns pointer positions (already in simulation space) into drag commands:
//! grab the nearest ball under the pointer, steer it by the angle of the
//! pointer around its anchor, release it on pointer up.

use glam::Vec2;

use crate::consts::{DRAG_ANGLE_LIMIT, PICK_RADIUS_SCALE};
use crate::error::CradleError;
use crate::sim::Cradle;

/// Nearest ball whose center lies within `PICK_RADIUS_SCALE` radii of `point`
pub fn pick_ball(positions: &[Vec2], point: Vec2, radius: f32) -> Option<usize> {
    let reach = radius * PICK_RADIUS_SCALE;
    positions
        .iter()
        .enumerate()
        .map(|(i, pos)| (i, pos.distance(point)))
        .filter(|&(_, dist)| dist <= reach)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// Pendulum angle pointing from `anchor` toward `point`, clamped to the drag range
///
/// Straight below the anchor is 0; to the right is positive.
#[inline]
pub fn drag_angle_for(anchor: Vec2, point: Vec2) -> f32 {
    let d = point - anchor;
    d.x.atan2(d.y).clamp(-DRAG_ANGLE_LIMIT, DRAG_ANGLE_LIMIT)
}

/// Tracks which ball (if any) the pointer is holding
#[derive(Debug, Clone, Default)]
pub struct DragController {
    held: Option<usize>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ball currently held
    pub fn held(&self) -> Option<usize> {
        self.held
    }

    /// Grab the ball under the pointer; returns its index if one was hit
    pub fn pointer_down(&mut self, cradle: &mut Cradle, point: Vec2) -> Result<Option<usize>, CradleError> {
        if let Some(prev) = self.held.take() {
            cradle.set_drag_state(prev, None)?;
        }

        let Some(index) = cradle.hit_test(point) else {
            return Ok(None);
        };

        // Hold at the current angle; the pointer takes over on the next move
        let angle = cradle.state().balls[index].angle;
        cradle.set_drag_state(index, Some(angle))?;
        self.held = Some(index);
        log::info!("grabbed ball {}", index);
        Ok(Some(index))
    }

    /// Steer the held ball toward the pointer
    pub fn pointer_move(&mut self, cradle: &mut Cradle, point: Vec2) -> Result<(), CradleError> {
        if let Some(index) = self.held {
            let angle = drag_angle_for(cradle.params().anchor(index), point);
            cradle.set_drag_state(index, Some(angle))?;
        }
        Ok(())
    }

    /// Let go of the held ball
    pub fn pointer_up(&mut self, cradle: &mut Cradle) -> Result<(), CradleError> {
        if let Some(index) = self.held.take() {
            cradle.set_drag_state(index, None)?;
            log::info!("released ball {}", index);
        }
        Ok(())
    }

    /// Forget the held ball without touching the cradle (after a rebuild)
    pub fn cancel(&mut self) {
        self.held = None;
    }
}
