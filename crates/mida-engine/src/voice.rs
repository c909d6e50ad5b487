//! Pitched and percussion voices.

use rand::Rng;

use crate::config::EngineConfig;
use crate::envelope::{EnvelopeStage, ReleasePoint};
use crate::oscillator::Oscillator;
use crate::percussion::HitKind;

/// One sounding pitched note.
#[derive(Clone, Debug)]
pub struct PitchedVoice {
    /// Owning audicle index
    pub audicle: usize,
    pub midi: u8,
    pub frequency: f64,
    /// Per-voice gain
    pub gain: f64,
    /// Sample index the voice starts at
    pub start: u64,
    /// Set once, by a NoteOff or the forced release.
    pub release: Option<ReleasePoint>,
    /// Cleared when the envelope has run out.
    pub active: bool,
    oscillator: Oscillator,
}

impl PitchedVoice {
    pub fn new(audicle: usize, midi: u8, frequency: f64, start: u64, config: &EngineConfig) -> Self {
        Self {
            audicle,
            midi,
            frequency,
            gain: config.voice_gain,
            start,
            release: None,
            active: true,
            oscillator: Oscillator::new(frequency, config.sample_rate),
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.is_some()
    }

    /// Release at sample `at`, capturing the envelope level there.
    ///
    /// Has no effect on a voice that is already released.
    pub fn release_at(&mut self, at: u64, config: &EngineConfig) {
        if self.release.is_none() {
            let elapsed = config.seconds(at.saturating_sub(self.start));
            self.release = Some(config.envelope.release_at(elapsed));
        }
    }

    /// Envelope level at sample `now`.
    pub fn envelope(&self, now: u64, config: &EngineConfig) -> f64 {
        if now < self.start {
            return 0.0;
        }
        config.envelope.level(config.seconds(now - self.start), self.release)
    }

    /// Render sample `now`. Returns silence before the voice's start.
    pub fn render(&mut self, now: u64, config: &EngineConfig) -> f64 {
        if !self.active || now < self.start {
            return 0.0;
        }
        let elapsed = config.seconds(now - self.start);
        let envelope = &config.envelope;
        let level = envelope.level(elapsed, self.release);
        let out = self.oscillator.next_sample() * self.gain * level;

        if self.release.is_none() && elapsed > config.max_sustain {
            self.release = Some(envelope.release_at(elapsed));
        }

        let finished = match envelope.stage(elapsed, self.release) {
            EnvelopeStage::Finished => true,
            // Sustain level 0 ends the voice without a release
            EnvelopeStage::Decay | EnvelopeStage::Sustain => level <= 0.0,
            EnvelopeStage::Attack | EnvelopeStage::Release => false,
        };
        if finished {
            self.active = false;
        }
        out
    }
}

/// One percussion hit. Decays to silence on its own; never released.
#[derive(Clone, Copy, Debug)]
pub struct DrumVoice {
    pub audicle: usize,
    pub hit: HitKind,
    pub start: u64,
    pub active: bool,
}

impl DrumVoice {
    pub fn new(audicle: usize, hit: HitKind, start: u64) -> Self {
        Self { audicle, hit, start, active: true }
    }

    pub fn render<R: Rng + ?Sized>(&mut self, now: u64, config: &EngineConfig, rng: &mut R) -> f64 {
        if !self.active || now < self.start {
            return 0.0;
        }
        let elapsed = config.seconds(now - self.start);
        let env = config.drum_envelope.level(elapsed);
        let out = self.hit.timbre().sample(elapsed, env, rng);
        if config.drum_envelope.is_finished(elapsed) {
            self.active = false;
        }
        out
    }
}
