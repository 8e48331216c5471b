//! Newton's Cradle - an interactive pendulum array
//!
//! Core modules:
//! - `sim`: Deterministic fixed-timestep pendulum simulation
//! - `input`: Pointer drag translation (hit testing, drag angles)
//! - `audio`: Collision sound gating and Web Audio synthesis
//! - `renderer`: Scene geometry and WebGPU pipeline
//! - `settings`: Slider-backed configuration and persistence

pub mod audio;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::CradleError;
pub use settings::Settings;
pub use sim::{Cradle, CradleParams, CradleState};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Largest frame delta fed to the accumulator (prevents runaway catch-up)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Ball radius in pixels
    pub const BALL_RADIUS: f32 = 24.0;
    /// Angular velocity kept per fixed substep
    pub const DAMPING: f32 = 0.9995;

    /// Drag targets are clamped to ±this angle (radians)
    pub const DRAG_ANGLE_LIMIT: f32 = 1.2;
    /// Pointer must land within this multiple of the radius to grab a ball
    pub const PICK_RADIUS_SCALE: f32 = 1.2;

    /// Impact passes (position correction + velocity exchange)
    pub const IMPACT_PASSES: usize = 3;
    /// Separation passes while the cradle swings freely
    pub const SEPARATION_PASSES: usize = 4;
    /// Separation passes while a ball is held (stiffer against the held ball)
    pub const DRAG_SEPARATION_PASSES: usize = 12;

    /// Smallest |cos(angle)| used when converting linear to angular velocity
    pub const MIN_COS: f32 = 0.08;
    /// Relative speed (px/s) that maps to full collision intensity
    pub const IMPACT_FULL_SCALE_SPEED: f32 = 500.0;

    /// Minimum wall time between two collision sounds (seconds)
    pub const SOUND_MIN_INTERVAL: f64 = 0.028;
}

/// Offset of a bob from its anchor for a given angle (y grows downward)
#[inline]
pub fn bob_offset(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.sin() * length, angle.cos() * length)
}

/// Recover a pendulum angle from a horizontal offset, clamping the ratio
#[inline]
pub fn angle_from_offset(dx: f32, length: f32) -> f32 {
    (dx / length).clamp(-1.0, 1.0).asin()
}
