//! Headless controller for the MIDA step sequencer.
//!
//! A [`Session`] owns one parsed and scheduled program. It can render the
//! program offline to PCM or WAV, or play it through the default audio
//! device while a [`RowSink`] reports progress.

mod error;
mod grid;
mod wav;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use mida_audio::{AudioOutput, CpalOutput};
use mida_engine::{command_queue, schedule, Dispatcher, SampleClock, ScheduleResult, Synth};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

// Re-export common types so callers don't need the lower crates directly.
pub use mida_audio::AudioError;
pub use mida_engine::{EngineConfig, NullSink, RowSink};
pub use mida_formats::{FormatError, ParseWarning};
pub use mida_ir::Audicle;

pub use error::MasterError;
pub use grid::GridPrinter;
pub use wav::{samples_to_wav, to_pcm16, write_wav};

/// Block size for offline rendering.
const RENDER_BLOCK: usize = 512;

/// How often the live dispatcher checks the clock.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// One program, ready to render or play.
pub struct Session {
    audicles: Vec<Audicle>,
    warnings: Vec<ParseWarning>,
    config: EngineConfig,
    schedule: ScheduleResult,
}

/// Output of an offline render.
pub struct Rendered<S> {
    /// Mono samples, unclipped
    pub samples: Vec<f32>,
    /// The row sink, after every row was delivered
    pub sink: S,
    /// Voices evicted because a pool was full
    pub steals: u64,
    /// Pitched and percussion voices still sounding when rendering stopped
    pub voices_remaining: usize,
}

impl Session {
    /// Schedule `audicles` with `config`.
    pub fn new(audicles: Vec<Audicle>, config: EngineConfig) -> Self {
        let schedule = schedule(&audicles, &config);
        info!(
            "Session: {} audicles, {} grid units, {:.2}s at {} BPM",
            audicles.len(),
            schedule.grid_len,
            config.seconds(schedule.total_samples),
            config.bpm
        );
        Self { audicles, warnings: Vec::new(), config, schedule }
    }

    /// Parse notation text and schedule it. Parse warnings are logged and kept.
    pub fn from_text(text: &str, config: EngineConfig) -> Self {
        let parsed = mida_formats::parse_mida(text);
        for warning in &parsed.warnings {
            warn!("{}", warning);
        }
        let mut session = Self::new(parsed.audicles, config);
        session.warnings = parsed.warnings;
        session
    }

    /// Load a notation file.
    pub fn load(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self, MasterError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded {}", path.as_ref().display());
        Ok(Self::from_text(&text, config))
    }

    pub fn audicles(&self) -> &[Audicle] {
        &self.audicles
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schedule(&self) -> &ScheduleResult {
        &self.schedule
    }

    /// Program length in samples, without the release tail.
    pub fn total_samples(&self) -> u64 {
        self.schedule.total_samples
    }

    /// Samples to render for the program plus its release tail.
    pub fn tail_end(&self) -> u64 {
        self.schedule.total_samples + self.config.release_samples()
    }

    // --- Offline rendering ---

    /// Render the whole program to mono samples. `seed` drives percussion noise.
    pub fn render(&self, seed: u64) -> Vec<f32> {
        self.render_with(seed, NullSink).samples
    }

    /// Render the whole program, delivering display rows to `sink`.
    ///
    /// Dispatcher and renderer run in lock-step on this thread: events due
    /// within the next block are sent, then the block is rendered. Rendering
    /// stops once the release tail is covered and every voice has finished.
    pub fn render_with<S: RowSink>(&self, seed: u64, sink: S) -> Rendered<S> {
        let clock = SampleClock::new();
        let (tx, rx) = command_queue(self.config.command_capacity);
        let mut dispatcher =
            Dispatcher::new(self.schedule.clone(), &self.config, tx, clock.clone(), sink);
        let mut synth = Synth::new(self.config, rx, clock.clone(), seed);

        let target = dispatcher.tail_end();
        // Ceiling for voices that outlive the tail
        let limit = target + self.config.sample_rate as u64 * 60;
        let mut samples = Vec::with_capacity(target as usize);
        let mut block = [0.0f32; RENDER_BLOCK];

        loop {
            let now = clock.now();
            let tail_done = dispatcher.is_done() && synth.pool().is_silent();
            if tail_done || now >= limit {
                break;
            }
            dispatcher.poll_until(now + RENDER_BLOCK as u64 - 1);
            let len = if target > now {
                RENDER_BLOCK.min((target - now) as usize)
            } else {
                RENDER_BLOCK
            };
            synth.render(&mut block[..len]);
            samples.extend_from_slice(&block[..len]);
        }

        let pool = synth.pool();
        debug!(
            "Rendered {} samples ({} steals, {} stalls)",
            samples.len(),
            pool.steals(),
            dispatcher.stalls()
        );
        Rendered {
            samples,
            steals: pool.steals(),
            voices_remaining: pool.active_count() + pool.drum_count(),
            sink: dispatcher.into_sink(),
        }
    }

    /// Render to 16-bit mono WAV bytes.
    pub fn render_to_wav(&self, seed: u64) -> Vec<u8> {
        samples_to_wav(&self.render(seed), self.config.sample_rate)
    }

    /// Render and write a WAV file.
    pub fn write_wav_file(&self, path: impl AsRef<Path>, seed: u64) -> Result<(), MasterError> {
        std::fs::write(path.as_ref(), self.render_to_wav(seed))?;
        info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    // --- Real-time playback ---

    /// Play through the default output device.
    ///
    /// The renderer moves into the device callback and the dispatcher runs on
    /// its own thread, delivering rows to `sink`.
    pub fn play<S: RowSink + Send + 'static>(&self, sink: S) -> Result<PlaybackHandle<S>, MasterError> {
        let clock = SampleClock::new();
        let (tx, rx) = command_queue(self.config.command_capacity);
        let synth = Synth::new(self.config, rx, clock.clone(), entropy_seed());

        let mut output = CpalOutput::new(self.config.sample_rate)?;
        output.start(synth)?;

        let mut dispatcher =
            Dispatcher::new(self.schedule.clone(), &self.config, tx, clock.clone(), sink);
        let finished = Arc::new(AtomicBool::new(false));
        let done = finished.clone();

        let thread = std::thread::Builder::new()
            .name("mida-dispatch".into())
            .spawn(move || {
                dispatcher.run(POLL_INTERVAL);
                done.store(true, Ordering::Release);
                dispatcher.into_sink()
            })?;

        info!("Playback started");
        Ok(PlaybackHandle { output, clock, finished, thread: Some(thread) })
    }
}

/// A live playback in progress. Dropping it stops the audio stream.
pub struct PlaybackHandle<S> {
    output: CpalOutput,
    clock: SampleClock,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<S>>,
}

impl<S> PlaybackHandle<S> {
    /// Samples rendered so far.
    pub fn position(&self) -> u64 {
        self.clock.now()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Wait for the program and its release tail, then stop the stream.
    pub fn join(mut self) -> Result<S, MasterError> {
        let thread = self.thread.take().ok_or(MasterError::DispatcherPanicked)?;
        let sink = thread.join().map_err(|_| MasterError::DispatcherPanicked)?;
        self.output.stop()?;
        info!("Playback finished");
        Ok(sink)
    }
}

impl<S> Drop for PlaybackHandle<S> {
    fn drop(&mut self) {
        let _ = self.output.stop();
    }
}

/// Noise seed for live playback.
fn entropy_seed() -> u64 {
    SmallRng::from_entropy().gen()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_keeps_warnings() {
        let session = Session::from_text("* C4 Z9 *\nnonsense\n( *| )", EngineConfig::default());
        assert_eq!(session.audicles().len(), 2);
        assert_eq!(session.warnings().len(), 2);
        assert_eq!(session.schedule().track_count, 2);
    }

    #[test]
    fn render_covers_release_tail() {
        let config = EngineConfig::default();
        let session = Session::from_text("* A4 - . *", config);
        let samples = session.render(1);
        assert!(samples.len() as u64 >= session.tail_end());
        assert!(samples.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn empty_session_renders_only_the_tail() {
        let session = Session::from_text("", EngineConfig::default());
        assert_eq!(session.total_samples(), 0);
        let samples = session.render(0);
        assert_eq!(samples.len() as u64, session.tail_end());
        assert!(samples.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn entropy_seeds_differ() {
        assert_ne!(entropy_seed(), entropy_seed());
    }

    #[test]
    fn wav_length_matches_render() {
        let session = Session::from_text("( *| ^| )", EngineConfig::default());
        let samples = session.render(9);
        let wav = session.render_to_wav(9);
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }
}
