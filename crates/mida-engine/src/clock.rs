//! Shared playhead in samples.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

/// Count of samples rendered so far in one playback session.
///
/// Cloning shares the counter. Only the renderer advances it; everyone
/// else reads.
#[derive(Clone, Debug, Default)]
pub struct SampleClock {
    samples: Arc<AtomicU64>,
}

impl SampleClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples rendered so far.
    pub fn now(&self) -> u64 {
        self.samples.load(Ordering::Acquire)
    }

    /// Publish `samples` more rendered samples.
    pub fn advance(&self, samples: u64) {
        self.samples.fetch_add(samples, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_counter() {
        let clock = SampleClock::new();
        let reader = clock.clone();
        assert_eq!(reader.now(), 0);
        clock.advance(256);
        clock.advance(256);
        assert_eq!(reader.now(), 512);
    }

    #[test]
    fn sessions_are_independent() {
        let a = SampleClock::new();
        let b = SampleClock::new();
        a.advance(10);
        assert_eq!(b.now(), 0);
    }
}
