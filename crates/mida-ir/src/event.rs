//! Scheduled events for sample-accurate playback.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// Event kind, in tie-break priority order.
///
/// At a shared sample index new notes start before old ones are released,
/// and display rows come after everything that affects audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    DrumOn,
    LogRow,
}

/// What an event does.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// Start a pitched voice
    NoteOn { audicle: usize, midi: u8, frequency: f64 },
    /// Release the pitched voice started by the matching NoteOn
    NoteOff { audicle: usize, midi: u8, frequency: f64 },
    /// Fire a percussion hit
    DrumOn { audicle: usize, symbol: String },
    /// One display row: one cell per audicle
    LogRow(Vec<String>),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::NoteOn { .. } => EventKind::NoteOn,
            EventPayload::NoteOff { .. } => EventKind::NoteOff,
            EventPayload::DrumOn { .. } => EventKind::DrumOn,
            EventPayload::LogRow(_) => EventKind::LogRow,
        }
    }
}

/// An event fixed to an absolute sample position.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent {
    /// Absolute sample position from the start of playback
    pub sample_index: u64,
    /// What the event does
    pub payload: EventPayload,
}

impl ScheduledEvent {
    /// Create a new event.
    pub fn new(sample_index: u64, payload: EventPayload) -> Self {
        Self { sample_index, payload }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Stream order: sample index, then kind priority.
    pub fn stream_order(&self, other: &Self) -> Ordering {
        self.sample_index
            .cmp(&other.sample_index)
            .then(self.kind().cmp(&other.kind()))
    }
}

/// Sort events into stream order. Stable, so equal keys keep emission order.
pub fn sort_events(events: &mut [ScheduledEvent]) {
    events.sort_by(ScheduledEvent::stream_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn note_on(at: u64, midi: u8) -> ScheduledEvent {
        ScheduledEvent::new(at, EventPayload::NoteOn { audicle: 0, midi, frequency: 0.0 })
    }

    fn note_off(at: u64, midi: u8) -> ScheduledEvent {
        ScheduledEvent::new(at, EventPayload::NoteOff { audicle: 0, midi, frequency: 0.0 })
    }

    #[test]
    fn kind_priority() {
        assert!(EventKind::NoteOn < EventKind::NoteOff);
        assert!(EventKind::NoteOff < EventKind::DrumOn);
        assert!(EventKind::DrumOn < EventKind::LogRow);
    }

    #[test]
    fn sort_by_index_then_kind() {
        let mut events = vec![
            ScheduledEvent::new(10, EventPayload::LogRow(vec![])),
            note_off(10, 60),
            ScheduledEvent::new(10, EventPayload::DrumOn { audicle: 1, symbol: String::from("*|") }),
            note_on(10, 62),
            note_on(5, 64),
        ];
        sort_events(&mut events);
        let kinds: Vec<(u64, EventKind)> = events.iter().map(|e| (e.sample_index, e.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                (5, EventKind::NoteOn),
                (10, EventKind::NoteOn),
                (10, EventKind::NoteOff),
                (10, EventKind::DrumOn),
                (10, EventKind::LogRow),
            ]
        );
    }

    #[test]
    fn sort_is_stable_within_kind() {
        let mut events = vec![note_off(0, 67), note_on(0, 64), note_off(0, 60), note_on(0, 62)];
        sort_events(&mut events);
        let midis: Vec<u8> = events
            .iter()
            .map(|e| match e.payload {
                EventPayload::NoteOn { midi, .. } | EventPayload::NoteOff { midi, .. } => midi,
                _ => 0,
            })
            .collect();
        assert_eq!(midis, vec![64, 62, 67, 60]);
    }
}
