//! Linear envelopes for pitched and percussion voices.
//!
//! Both are pure functions of the time elapsed since the voice started, so
//! the level at any instant (including a future release point) can be
//! computed without stepping the envelope sample by sample.

/// Pitched envelope stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Ramp 0 → 1
    Attack,
    /// Ramp 1 → sustain level
    Decay,
    /// Constant sustain level
    Sustain,
    /// Ramp from the captured level → 0
    Release,
    /// Silent; the voice can be reaped
    Finished,
}

/// Where a voice entered its release stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleasePoint {
    /// Seconds since the voice started
    pub at: f64,
    /// Envelope level at that instant
    pub level: f64,
}

/// Attack / decay / sustain / release shape for pitched voices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adsr {
    /// Attack time in seconds
    pub attack: f64,
    /// Decay time in seconds
    pub decay: f64,
    /// Sustain level (0.0–1.0)
    pub sustain: f64,
    /// Release time in seconds
    pub release: f64,
}

impl Default for Adsr {
    fn default() -> Self {
        Self { attack: 0.01, decay: 0.07, sustain: 0.7, release: 0.2 }
    }
}

impl Adsr {
    /// Stage at `elapsed` seconds, given an optional release point.
    pub fn stage(&self, elapsed: f64, release: Option<ReleasePoint>) -> EnvelopeStage {
        if let Some(point) = release.filter(|p| elapsed >= p.at) {
            let since = elapsed - point.at;
            return if self.release <= 0.0 || point.level <= 0.0 || since >= self.release {
                EnvelopeStage::Finished
            } else {
                EnvelopeStage::Release
            };
        }
        if elapsed < self.attack {
            EnvelopeStage::Attack
        } else if elapsed < self.attack + self.decay {
            EnvelopeStage::Decay
        } else {
            EnvelopeStage::Sustain
        }
    }

    /// Envelope level at `elapsed` seconds.
    pub fn level(&self, elapsed: f64, release: Option<ReleasePoint>) -> f64 {
        match self.stage(elapsed, release) {
            EnvelopeStage::Attack => elapsed / self.attack,
            EnvelopeStage::Decay => {
                1.0 - (1.0 - self.sustain) * ((elapsed - self.attack) / self.decay)
            }
            EnvelopeStage::Sustain => self.sustain,
            EnvelopeStage::Release => match release {
                Some(point) => {
                    let ramp = 1.0 - (elapsed - point.at) / self.release;
                    point.level * ramp.max(0.0)
                }
                None => 0.0,
            },
            EnvelopeStage::Finished => 0.0,
        }
    }

    /// Release point for a release starting at `at` seconds.
    ///
    /// The captured level is the un-released envelope at that instant, so
    /// the release ramp starts without a discontinuity.
    pub fn release_at(&self, at: f64) -> ReleasePoint {
        ReleasePoint { at, level: self.level(at, None) }
    }
}

/// Attack / decay shape for percussion hits. No sustain, no release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackDecay {
    pub attack: f64,
    pub decay: f64,
}

impl Default for AttackDecay {
    fn default() -> Self {
        Self { attack: 0.002, decay: 0.09 }
    }
}

impl AttackDecay {
    pub fn level(&self, elapsed: f64) -> f64 {
        if elapsed < self.attack {
            elapsed / self.attack
        } else if elapsed < self.attack + self.decay {
            1.0 - (elapsed - self.attack) / self.decay
        } else {
            0.0
        }
    }

    pub fn is_finished(&self, elapsed: f64) -> bool {
        elapsed >= self.attack + self.decay
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.attack + self.decay
    }
}
