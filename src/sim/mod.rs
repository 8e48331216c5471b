//! Deterministic simulation module
//!
//! All pendulum physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable left-to-right iteration order
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod cradle;
pub mod state;
pub mod step;

pub use clock::FixedTimestep;
pub use collision::{Collision, enforce_separation, impact_intensity, resolve_impacts};
pub use cradle::Cradle;
pub use state::{Ball, CradleParams, CradleState};
pub use step::{StepResult, step};
