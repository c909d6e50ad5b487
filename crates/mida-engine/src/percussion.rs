//! Percussion timbres: uniform noise mixed with a fixed-frequency sine click.

use core::f64::consts::TAU;

use rand::Rng;

/// Hit type selected by a percussion symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// `*|`, and any symbol without a timbre of its own
    #[default]
    Regular,
    /// `^|`
    Accent,
    /// `v|`
    Ghost,
}

impl HitKind {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "^|" => HitKind::Accent,
            "v|" => HitKind::Ghost,
            _ => HitKind::Regular,
        }
    }

    pub fn timbre(self) -> Timbre {
        match self {
            HitKind::Regular => Timbre {
                gain: 1.0,
                noise_gain: 1.0,
                noise_mix: 0.6,
                click_frequency: 200.0,
                click_gain: 0.5,
                click_mix: 0.4,
            },
            HitKind::Accent => Timbre {
                gain: 1.6,
                noise_gain: 1.5,
                noise_mix: 0.7,
                click_frequency: 320.0,
                click_gain: 0.8,
                click_mix: 0.6,
            },
            HitKind::Ghost => Timbre {
                gain: 0.5,
                noise_gain: 0.5,
                noise_mix: 0.8,
                click_frequency: 120.0,
                click_gain: 0.2,
                click_mix: 0.2,
            },
        }
    }
}

/// Noise / click mix of one hit type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timbre {
    /// Overall hit gain, applied to the envelope
    pub gain: f64,
    pub noise_gain: f64,
    pub noise_mix: f64,
    /// Click sine frequency in Hz
    pub click_frequency: f64,
    pub click_gain: f64,
    pub click_mix: f64,
}

impl Timbre {
    /// One sample at `elapsed` seconds with envelope level `env`.
    ///
    /// Noise is drawn fresh from `rng` for every sample.
    pub fn sample<R: Rng + ?Sized>(&self, elapsed: f64, env: f64, rng: &mut R) -> f64 {
        let env = env * self.gain;
        let noise = rng.gen_range(-1.0..1.0) * env * self.noise_gain;
        let click = libm::sin(TAU * self.click_frequency * elapsed) * env * self.click_gain;
        noise * self.noise_mix + click * self.click_mix
    }
}
