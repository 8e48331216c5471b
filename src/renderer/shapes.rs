//! Shape generation for the cradle scene
//!
//! Everything is built in simulation pixels; the pipeline maps to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};

/// Bar thickness (px)
const BAR_THICKNESS: f32 = 10.0;
/// String thickness (px)
const STRING_WIDTH: f32 = 1.5;
/// Circle tessellation
const BALL_SEGMENTS: u32 = 32;

/// What the scene builder needs to know about one frame
#[derive(Debug, Clone, Copy)]
pub struct SceneFrame<'a> {
    pub anchors: &'a [Vec2],
    pub positions: &'a [Vec2],
    pub ball_radius: f32,
    pub rope_length: f32,
    /// Ball currently held by the pointer
    pub held: Option<usize>,
}

/// Build all triangles for one frame, back to front
pub fn cradle_scene(frame: &SceneFrame<'_>) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let r = frame.ball_radius;
    let floor_y = frame.rope_length + 2.5 * r;

    // Shadows on the floor, squashed and fading as the ball rises
    for pos in frame.positions {
        let height = (floor_y - pos.y).max(0.0);
        let fade = (1.0 - height / (3.0 * r + frame.rope_length)).clamp(0.2, 1.0);
        let mut color = colors::SHADOW;
        color[3] *= fade;
        vertices.extend(ellipse(
            Vec2::new(pos.x, floor_y),
            Vec2::new(r * (1.2 - 0.3 * fade), r * 0.25),
            color,
            BALL_SEGMENTS,
        ));
    }

    // Top bar spanning all anchors
    if let (Some(first), Some(last)) = (frame.anchors.first(), frame.anchors.last()) {
        let left = first.x - 2.0 * r;
        let right = last.x + 2.0 * r;
        vertices.extend(rect(
            Vec2::new(left, first.y - BAR_THICKNESS),
            Vec2::new(right, first.y),
            colors::BAR,
        ));
        vertices.extend(rect(
            Vec2::new(left, first.y - BAR_THICKNESS),
            Vec2::new(right, first.y - BAR_THICKNESS * 0.7),
            colors::BAR_HIGHLIGHT,
        ));
    }

    for (anchor, pos) in frame.anchors.iter().zip(frame.positions) {
        vertices.extend(line(*anchor, *pos, STRING_WIDTH, colors::STRING));
        vertices.extend(circle(*anchor, 3.0, colors::ANCHOR, 12));
    }

    for (i, pos) in frame.positions.iter().enumerate() {
        let body = if frame.held == Some(i) {
            colors::BALL_HELD
        } else {
            colors::BALL_BODY
        };
        vertices.extend(shaded_ball(*pos, r, body));
    }

    vertices
}

/// A ball with a dark rim, body and offset highlight
pub fn shaded_ball(center: Vec2, radius: f32, body: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = circle(center, radius, colors::BALL_RIM, BALL_SEGMENTS);
    vertices.extend(circle(
        center + Vec2::new(-0.08, -0.08) * radius,
        radius * 0.86,
        body,
        BALL_SEGMENTS,
    ));
    // Light comes from the top left
    vertices.extend(circle(
        center + Vec2::new(-0.35, -0.35) * radius,
        radius * 0.22,
        colors::BALL_SHINE,
        BALL_SEGMENTS / 2,
    ));
    vertices
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}
