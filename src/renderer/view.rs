//! Mapping between simulation pixels, canvas pixels and NDC
//!
//! The simulation puts the anchor bar on y = 0 with the row centered on
//! x = 0 and y growing downward. The view fits a world rectangle into the
//! canvas with uniform scale, letterboxing the spare axis.

use glam::Vec2;

use crate::consts::DRAG_ANGLE_LIMIT;
use crate::sim::CradleParams;

/// Margin around the scene bounds (simulation px)
const MARGIN: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// World rectangle to show (min corner, max corner)
    pub min: Vec2,
    pub max: Vec2,
    /// Canvas size in pixels
    pub viewport: Vec2,
}

impl ViewTransform {
    pub fn new(min: Vec2, max: Vec2, viewport: Vec2) -> Self {
        Self { min, max, viewport }
    }

    /// A view showing the whole reachable cradle for `params`
    pub fn fit(params: &CradleParams, viewport: Vec2) -> Self {
        let (min, max) = scene_bounds(params);
        Self::new(min, max, viewport)
    }

    /// Canvas pixels per simulation pixel
    pub fn scale(&self) -> f32 {
        let size = (self.max - self.min).max(Vec2::splat(1.0));
        let viewport = self.viewport.max(Vec2::splat(1.0));
        (viewport.x / size.x).min(viewport.y / size.y)
    }

    fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Simulation point to normalized device coordinates (y up)
    pub fn to_ndc(&self, world: Vec2) -> Vec2 {
        let half_viewport = self.viewport.max(Vec2::splat(1.0)) * 0.5;
        let canvas = (world - self.center()) * self.scale();
        Vec2::new(canvas.x / half_viewport.x, -canvas.y / half_viewport.y)
    }

    /// Canvas pixel (origin top-left) to simulation point
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let offset = screen - self.viewport * 0.5;
        self.center() + offset / self.scale()
    }
}

/// World rectangle covering the bar, every reachable ball position and shadows
pub fn scene_bounds(params: &CradleParams) -> (Vec2, Vec2) {
    let n = params.ball_count.max(1);
    let half_row = params.anchor_x(n - 1).abs();
    let reach = DRAG_ANGLE_LIMIT.sin() * params.rope_length;
    let r = params.ball_radius;

    let min = Vec2::new(-(half_row + reach + r + MARGIN), -(r + MARGIN));
    let max = Vec2::new(
        half_row + reach + r + MARGIN,
        params.rope_length + 3.0 * r + MARGIN,
    );
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewTransform {
        ViewTransform::new(Vec2::new(-100.0, -50.0), Vec2::new(100.0, 50.0), Vec2::new(400.0, 200.0))
    }

    #[test]
    fn test_center_maps_to_origin() {
        let ndc = view().to_ndc(Vec2::ZERO);
        assert!(ndc.length() < 1e-6);
    }

    #[test]
    fn test_y_flips_for_ndc() {
        let v = view();
        let ndc = v.to_ndc(Vec2::new(100.0, 50.0));
        assert!((ndc.x - 1.0).abs() < 1e-5);
        assert!((ndc.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_screen_roundtrip() {
        let v = ViewTransform::new(Vec2::new(-300.0, -40.0), Vec2::new(300.0, 260.0), Vec2::new(800.0, 600.0));
        let world = Vec2::new(42.0, 120.0);
        let screen = {
            let canvas = (world - v.center()) * v.scale();
            canvas + v.viewport * 0.5
        };
        let back = v.screen_to_world(screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn test_bounds_contain_extreme_swings() {
        let params = CradleParams::default();
        let (min, max) = scene_bounds(&params);
        let last = params.ball_count - 1;
        let far_right = params.ball_x(last, DRAG_ANGLE_LIMIT) + params.ball_radius;
        let far_left = params.ball_x(0, -DRAG_ANGLE_LIMIT) - params.ball_radius;
        assert!(far_right < max.x);
        assert!(far_left > min.x);
        assert!(params.rope_length + params.ball_radius < max.y);
        assert!(min.y < 0.0);
    }
}
