//! Format support for the MIDA step sequencer.
//!
//! Reads and writes MIDA notation and imports Standard MIDI Files into the IR.

mod lexer;
mod mida_format;
mod midi_import;
mod writer;

pub use mida_format::{load_mida, parse_mida, ParseOutput, ParseWarning};
pub use midi_import::{import_midi, load_midi};
pub use writer::{write_audicle, write_mida};

/// Error type for loading and converting files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed MIDI file
    #[error("invalid MIDI file: {0}")]
    Midi(String),
    /// SMPTE timecode timing has no beat grid
    #[error("unsupported MIDI timing: timecode files have no beat grid")]
    UnsupportedTiming,
}

impl From<midly::Error> for FormatError {
    fn from(err: midly::Error) -> Self {
        FormatError::Midi(err.to_string())
    }
}
