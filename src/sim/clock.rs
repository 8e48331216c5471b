//! Fixed timestep accumulator
//!
//! Display frames arrive at whatever rate the browser likes; physics runs at
//! `SIM_DT`. Frame deltas are capped so a stalled tab never floods the
//! integrator with catch-up steps.

use crate::consts::{MAX_FRAME_DT, SIM_DT};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_frame_dt: f32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_FRAME_DT)
    }
}

impl FixedTimestep {
    pub fn new(step: f32, max_frame_dt: f32) -> Self {
        Self {
            step,
            max_frame_dt,
            accumulator: 0.0,
        }
    }

    /// Fixed step length (seconds)
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add elapsed frame time and drain whole steps; returns how many are due
    pub fn push(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(self.max_frame_dt);

        let mut due = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            due += 1;
        }
        due
    }

    /// Fraction of a step left in the accumulator (0..1), for interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    /// Drop any pending time (after a reset or a long pause)
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_frames_drain_fully() {
        let mut clock = FixedTimestep::new(0.01, 0.05);
        assert_eq!(clock.push(0.02), 2);
        assert!(clock.alpha() < 1e-3);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut clock = FixedTimestep::new(0.01, 0.05);
        assert_eq!(clock.push(0.015), 1);
        assert!((clock.alpha() - 0.5).abs() < 1e-3);
        assert_eq!(clock.push(0.006), 1);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut clock = FixedTimestep::default();
        // A 2 second hitch only yields the capped 0.05 s worth of steps
        let due = clock.push(2.0);
        assert!((5..=6).contains(&due), "got {} steps", due);
        let consumed = (due as f32 + clock.alpha()) * clock.step();
        assert!((consumed - MAX_FRAME_DT).abs() < 1e-5);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = FixedTimestep::default();
        assert_eq!(clock.push(-1.0), 0);
        assert_eq!(clock.push(f32::NAN), 0);
        assert_eq!(clock.push(f32::INFINITY), 0);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_clear_drops_pending_time() {
        let mut clock = FixedTimestep::new(0.01, 0.05);
        clock.push(0.005);
        clock.clear();
        assert_eq!(clock.alpha(), 0.0);
    }
}
