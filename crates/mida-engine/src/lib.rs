//! Playback engine for the MIDA step sequencer.
//!
//! The scheduler turns audicles into a sorted event stream. During playback
//! the [`Dispatcher`] walks that stream against the shared [`SampleClock`]
//! and sends [`VoiceCommand`]s over a lock-free queue to the [`Synth`],
//! which owns every voice and renders mono blocks.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod clock;
mod command;
mod config;
mod dispatcher;
mod display;
mod envelope;
mod event_queue;
mod oscillator;
mod percussion;
pub mod scheduler;
mod synth;
mod voice;
mod voice_pool;

pub use clock::SampleClock;
pub use command::{command_queue, CommandReceiver, CommandSender, VoiceCommand};
pub use config::EngineConfig;
pub use dispatcher::Dispatcher;
pub use display::{NullSink, RowSink};
pub use envelope::{Adsr, AttackDecay, EnvelopeStage, ReleasePoint};
pub use event_queue::EventQueue;
pub use oscillator::{blend, Oscillator};
pub use percussion::{HitKind, Timbre};
pub use scheduler::{schedule, ScheduleResult};
pub use synth::Synth;
pub use voice::{DrumVoice, PitchedVoice};
pub use voice_pool::{DrumKey, VoiceKey, VoicePool, MAX_DRUM_VOICES, MAX_VOICES};
