//! Dispatcher → renderer voice commands.
//!
//! The dispatcher never touches the voice pools directly. It pushes commands
//! into a bounded single-producer / single-consumer ring buffer and the
//! renderer drains it at the start of every block.

use ringbuf::traits::Split;
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::percussion::HitKind;

/// An immutable request to start or release a voice.
///
/// `at` is the sample index of the scheduled event that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceCommand {
    NoteOn { audicle: usize, midi: u8, frequency: f64, at: u64 },
    NoteOff { audicle: usize, midi: u8, at: u64 },
    DrumOn { audicle: usize, hit: HitKind, at: u64 },
}

impl VoiceCommand {
    pub fn at(&self) -> u64 {
        match *self {
            VoiceCommand::NoteOn { at, .. }
            | VoiceCommand::NoteOff { at, .. }
            | VoiceCommand::DrumOn { at, .. } => at,
        }
    }
}

/// Producer half, owned by the dispatcher.
pub type CommandSender = HeapProd<VoiceCommand>;

/// Consumer half, owned by the renderer.
pub type CommandReceiver = HeapCons<VoiceCommand>;

/// Create a command queue holding up to `capacity` pending commands.
pub fn command_queue(capacity: usize) -> (CommandSender, CommandReceiver) {
    HeapRb::<VoiceCommand>::new(capacity.max(1)).split()
}
