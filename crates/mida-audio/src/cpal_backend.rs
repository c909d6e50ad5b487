//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use mida_engine::Synth;
use tracing::{debug, error, info};

use crate::traits::{AudioError, AudioOutput};

/// Largest block the renderer is asked for in one call. Device buffers
/// larger than this are rendered in several chunks.
pub const MAX_BLOCK_FRAMES: usize = 4096;

/// CPAL-based audio output.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl CpalOutput {
    /// Open the default output device at `sample_rate`.
    pub fn new(sample_rate: u32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = config.into();
        // Voice timing is computed at the engine rate, so the device must match it
        config.sample_rate = SampleRate(sample_rate);

        info!(
            "Audio device: {} ({} Hz, {} channels)",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate,
            config.channels
        );

        Ok(Self { device, config, stream: None })
    }

    pub fn channels(&self) -> usize {
        self.config.channels as usize
    }

    /// Build the stream; the callback owns `synth` from here on.
    fn build_stream(&mut self, mut synth: Synth) -> Result<Stream, AudioError> {
        let channels = self.channels().max(1);
        let mut scratch = vec![0.0f32; MAX_BLOCK_FRAMES];

        self.device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Render mono in chunks, then copy each sample to every channel
                    for block in data.chunks_mut(MAX_BLOCK_FRAMES * channels) {
                        let frames = block.len() / channels;
                        let mono = &mut scratch[..frames];
                        synth.render(mono);
                        for (frame, &sample) in block.chunks_mut(channels).zip(mono.iter()) {
                            frame.fill(sample);
                        }
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn start(&mut self, synth: Synth) -> Result<(), AudioError> {
        let stream = self.build_stream(synth)?;
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        debug!("Audio stream started");
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(stream) = self.stream.take() {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
            debug!("Audio stream stopped");
        }
        Ok(())
    }
}
