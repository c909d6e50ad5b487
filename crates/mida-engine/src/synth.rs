//! Real-time renderer.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use ringbuf::traits::Consumer;

use crate::clock::SampleClock;
use crate::command::CommandReceiver;
use crate::config::EngineConfig;
use crate::voice_pool::VoicePool;

/// Owns the voice pools and renders mono blocks.
///
/// Called once per audio block. Drains pending voice commands, renders every
/// sample of the block, publishes the new playhead on the clock and reaps
/// finished voices. Nothing here blocks or allocates.
pub struct Synth {
    pool: VoicePool,
    commands: CommandReceiver,
    clock: SampleClock,
    /// Local copy of the playhead; the clock is published per block.
    position: u64,
    rng: SmallRng,
}

impl Synth {
    /// `seed` drives the percussion noise.
    pub fn new(config: EngineConfig, commands: CommandReceiver, clock: SampleClock, seed: u64) -> Self {
        let position = clock.now();
        Self {
            pool: VoicePool::new(config),
            commands,
            clock,
            position,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Render one block of mono samples into `out`, overwriting it.
    pub fn render(&mut self, out: &mut [f32]) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.render_block(out));
        #[cfg(not(feature = "alloc_check"))]
        self.render_block(out);
    }

    fn render_block(&mut self, out: &mut [f32]) {
        while let Some(command) = self.commands.try_pop() {
            self.pool.apply(command);
        }

        for sample in out.iter_mut() {
            *sample = self.pool.render_sample(self.position, &mut self.rng) as f32;
            self.position += 1;
        }

        self.clock.advance(out.len() as u64);
        self.pool.reap();
    }

    /// Samples rendered so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn config(&self) -> &EngineConfig {
        self.pool.config()
    }
}
