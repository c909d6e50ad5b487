use mida_audio::AudioError;
use mida_formats::FormatError;

/// Error type for the controller.
#[derive(Debug, thiserror::Error)]
pub enum MasterError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dispatcher thread panicked")]
    DispatcherPanicked,
}
