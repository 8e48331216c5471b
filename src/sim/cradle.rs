//! The cradle engine
//!
//! Thin mutable shell around the pure `step`: owns the current snapshot, the
//! parameters and the fixed timestep clock, and applies drag commands.

use glam::Vec2;

use super::clock::FixedTimestep;
use super::collision::Collision;
use super::state::{CradleParams, CradleState};
use super::step::step;
use crate::consts::SIM_DT;
use crate::error::CradleError;
use crate::input::pick_ball;

#[derive(Debug, Clone)]
pub struct Cradle {
    params: CradleParams,
    state: CradleState,
    clock: FixedTimestep,
    /// Fixed steps taken since the last reset
    ticks: u64,
}

impl Cradle {
    /// Build a cradle with every ball at rest
    pub fn new(params: CradleParams) -> Result<Self, CradleError> {
        params.validate()?;
        log::info!(
            "cradle: {} balls, rope {} px, gap {} px, gravity {} px/s²",
            params.ball_count,
            params.rope_length,
            params.gap,
            params.gravity
        );
        Ok(Self {
            state: CradleState::at_rest(params.ball_count),
            params,
            clock: FixedTimestep::default(),
            ticks: 0,
        })
    }

    pub fn params(&self) -> &CradleParams {
        &self.params
    }

    pub fn state(&self) -> &CradleState {
        &self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Interpolation fraction left in the clock
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    /// Put every ball back at rest
    pub fn reset(&mut self) {
        self.state = CradleState::at_rest(self.params.ball_count);
        self.clock.clear();
        self.ticks = 0;
        log::info!("cradle reset");
    }

    /// Apply new parameters; a count change rebuilds the row at rest
    ///
    /// Returns true when the row was rebuilt.
    pub fn set_params(&mut self, params: CradleParams) -> Result<bool, CradleError> {
        params.validate()?;
        let rebuild = params.ball_count != self.params.ball_count;
        self.params = params;
        if rebuild {
            log::info!("ball count -> {}", params.ball_count);
            self.reset();
        } else {
            log::debug!("cradle reparametrized: {:?}", params);
        }
        Ok(rebuild)
    }

    /// Hold ball `index` at `angle`, or release it with `None`
    ///
    /// Releasing commits the held angle and starts the ball from rest.
    pub fn set_drag_state(&mut self, index: usize, angle: Option<f32>) -> Result<(), CradleError> {
        let len = self.state.balls.len();
        let ball = self
            .state
            .balls
            .get_mut(index)
            .ok_or(CradleError::InvalidIndex { index, len })?;

        match angle {
            Some(angle) => ball.grab(angle),
            None => ball.release(),
        }
        Ok(())
    }

    /// Advance one fixed step
    pub fn step_fixed(&mut self) -> Vec<Collision> {
        let result = step(&self.state, &self.params, SIM_DT);
        self.state = result.state;
        self.ticks += 1;
        result.collisions
    }

    /// Feed one display frame's elapsed time and run the steps that fell due
    pub fn advance(&mut self, frame_dt: f32) -> Vec<Collision> {
        let due = self.clock.push(frame_dt);
        let mut collisions = Vec::new();
        for _ in 0..due {
            collisions.extend(self.step_fixed());
        }
        collisions
    }

    /// Ball centers in simulation space
    pub fn positions(&self) -> Vec<Vec2> {
        self.state.positions(&self.params)
    }

    /// Anchor points on the bar
    pub fn anchors(&self) -> Vec<Vec2> {
        (0..self.state.balls.len())
            .map(|i| self.params.anchor(i))
            .collect()
    }

    /// Ball under `point`, if any
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        pick_ball(&self.positions(), point, self.params.ball_radius)
    }
}
