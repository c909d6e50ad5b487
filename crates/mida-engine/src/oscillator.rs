//! Phase-locked sine / triangle / saw blend for pitched voices.

use core::f64::consts::TAU;

/// Sine, triangle and saw from one phase in radians, mixed 0.6 / 0.2 / 0.2.
pub fn blend(phase: f64) -> f64 {
    let sine = libm::sin(phase);
    let cycle = phase / TAU;
    let saw = 2.0 * (cycle - libm::floor(cycle + 0.5));
    let triangle = 2.0 * libm::fabs(saw) - 1.0;
    0.6 * sine + 0.2 * triangle + 0.2 * saw
}

/// Phase accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    phase: f64,
    increment: f64,
}

impl Oscillator {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self { phase: 0.0, increment: TAU * frequency / sample_rate as f64 }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Output at the current phase, then advance one sample.
    pub fn next_sample(&mut self) -> f64 {
        let out = blend(self.phase);
        self.phase += self.increment;
        // Keep the phase small so long notes don't lose precision
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_at_zero_phase() {
        // sine 0, saw 0, triangle -1
        assert!((blend(0.0) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn blend_at_quarter_cycle() {
        // sine 1, saw 0.5, triangle 0
        assert!((blend(TAU / 4.0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn blend_is_periodic() {
        for i in 0..16 {
            let phase = i as f64 * 0.37;
            assert!((blend(phase) - blend(phase + TAU)).abs() < 1e-9);
        }
    }

    #[test]
    fn blend_is_bounded() {
        for i in 0..1000 {
            let v = blend(i as f64 * 0.0123);
            assert!(v.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn phase_wraps() {
        let mut osc = Oscillator::new(12_000.0, 48_000);
        for _ in 0..10 {
            osc.next_sample();
            assert!(osc.phase() >= 0.0 && osc.phase() < TAU);
        }
    }
}
