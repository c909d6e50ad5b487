//! Audio output trait and error types.

use mida_engine::Synth;

/// Error type for audio operations.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// No audio device available
    #[error("no audio output device available")]
    NoDevice,
    /// Failed to initialize audio device
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("playback error: {0}")]
    Playback(String),
}

/// An output that pulls audio from a [`Synth`] once per device block.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Hand the renderer to the device and start the stream.
    fn start(&mut self, synth: Synth) -> Result<(), AudioError>;

    /// Stop playback. The renderer is dropped with the stream.
    fn stop(&mut self) -> Result<(), AudioError>;
}
