//! Collision audio
//!
//! `ImpactSoundGate` decides *whether* and *how loud* a batch of collisions
//! should sound; it is plain data and runs anywhere. `AudioManager` turns a
//! gated intensity into a procedurally generated clack with the Web Audio API.

use crate::consts::SOUND_MIN_INTERVAL;
use crate::sim::Collision;

/// Intensities below this are not worth a sound (resting contact jitter)
pub const MIN_AUDIBLE_INTENSITY: f32 = 0.02;

/// Rate limiter between the simulation and the speaker
///
/// A cradle swing produces a burst of collisions within a single step (one
/// per ball in the row). Only the loudest one of a batch plays, and never more
/// often than once per `SOUND_MIN_INTERVAL`.
#[derive(Debug, Clone)]
pub struct ImpactSoundGate {
    min_interval: f64,
    last_trigger: Option<f64>,
    master_volume: f32,
    muted: bool,
}

impl Default for ImpactSoundGate {
    fn default() -> Self {
        Self::new(SOUND_MIN_INTERVAL)
    }
}

impl ImpactSoundGate {
    pub fn new(min_interval: f64) -> Self {
        Self {
            min_interval,
            last_trigger: None,
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Offer a batch of collisions at wall time `now` (seconds)
    ///
    /// Returns the gain to play at, or `None` when the batch is silent or
    /// arrives inside the rate-limit window.
    pub fn offer(&mut self, collisions: &[Collision], now: f64) -> Option<f32> {
        if self.muted || self.master_volume <= 0.0 {
            return None;
        }

        let loudest = collisions
            .iter()
            .map(|c| c.intensity)
            .fold(0.0_f32, f32::max);
        if loudest < MIN_AUDIBLE_INTENSITY {
            return None;
        }

        if let Some(last) = self.last_trigger {
            if now - last < self.min_interval {
                return None;
            }
        }

        self.last_trigger = Some(now);
        Some(loudest * self.master_volume)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    /// Web Audio output for collision clacks
    pub struct AudioManager {
        ctx: Option<AudioContext>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play one steel-on-steel clack at `gain` (0.0 - 1.0)
        pub fn play_clack(&self, gain: f32) {
            if gain <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let t = ctx.current_time();
            // Harder hits ring slightly higher and longer
            let pitch = 1800.0 + 1400.0 * gain;
            let ring = 0.04 + 0.06 * gain as f64;

            // Bright metallic strike
            if let Some((osc, env)) = create_osc(ctx, pitch, OscillatorType::Triangle) {
                env.gain().set_value_at_time(gain * 0.5, t).ok();
                env.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + ring)
                    .ok();
                osc.frequency().set_value_at_time(pitch, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(pitch * 0.7, t + ring)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + ring + 0.02).ok();
            }

            // Inharmonic partial for the steel colour
            if let Some((osc, env)) = create_osc(ctx, pitch * 2.76, OscillatorType::Sine) {
                env.gain().set_value_at_time(gain * 0.2, t).ok();
                env.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + ring * 0.6)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + ring).ok();
            }

            // Low knock for body
            if let Some((osc, env)) = create_osc(ctx, 220.0, OscillatorType::Sine) {
                env.gain().set_value_at_time(gain * 0.25, t).ok();
                env.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.03)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.05).ok();
            }
        }
    }

    /// Create an oscillator routed through its own gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
