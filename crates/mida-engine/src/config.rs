//! Engine tunables and the step grid arithmetic derived from them.

use crate::envelope::{Adsr, AttackDecay};

/// Every free parameter of playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Tempo in quarter notes per minute
    pub bpm: f64,
    /// Gain applied to every pitched voice
    pub voice_gain: f64,
    /// Pitched voice envelope
    pub envelope: Adsr,
    /// Percussion hit envelope
    pub drum_envelope: AttackDecay,
    /// Seconds a pitched voice may sound before it is released automatically
    pub max_sustain: f64,
    /// Capacity of the dispatcher → renderer command queue
    pub command_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            bpm: 200.0,
            voice_gain: 0.15,
            envelope: Adsr::default(),
            drum_envelope: AttackDecay::default(),
            max_sustain: 10.0,
            command_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// Duration of one grid unit (a sixteenth note) in seconds.
    pub fn step_seconds(&self) -> f64 {
        60.0 / self.bpm / 4.0
    }

    /// Sample index of grid unit `step`.
    pub fn step_to_sample(&self, step: usize) -> u64 {
        libm::round(step as f64 * self.step_seconds() * self.sample_rate as f64) as u64
    }

    /// Samples needed to cover `units` grid units, rounded up.
    pub fn total_samples(&self, units: usize) -> u64 {
        libm::ceil(units as f64 * self.step_seconds() * self.sample_rate as f64) as u64
    }

    /// Length of the pitched release tail in samples.
    pub fn release_samples(&self) -> u64 {
        (self.envelope.release * self.sample_rate as f64) as u64
    }

    /// Convert a sample count to seconds.
    pub fn seconds(&self, samples: u64) -> f64 {
        samples as f64 / self.sample_rate as f64
    }
}
