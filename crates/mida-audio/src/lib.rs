//! Audio output backends for the MIDA step sequencer.

mod cpal_backend;
mod traits;

pub use cpal_backend::{CpalOutput, MAX_BLOCK_FRAMES};
pub use traits::{AudioError, AudioOutput};
