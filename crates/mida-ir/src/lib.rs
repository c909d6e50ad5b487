//! Core IR types for the MIDA step sequencer.
//!
//! The notation parser emits audicles, the scheduler turns them into
//! scheduled events, and the playback engine consumes those events.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod audicle;
mod event;
mod note;

pub use audicle::{
    resolve_chord, Audicle, AudicleKind, Step, Timeline, DRUM_REST, LEGATO_MARKER, PITCHED_REST,
};
pub use event::{sort_events, EventKind, EventPayload, ScheduledEvent};
pub use note::{midi_to_frequency, note_name, pitch_class, resolve_note, MIDI_MAX, PITCH_CLASS_NAMES};
