//! Stream-ordered queue of scheduled events.

use alloc::vec::Vec;

use mida_ir::{sort_events, ScheduledEvent};

/// Scheduled events in stream order.
///
/// Playback consumes events through a cursor that only moves forward, so
/// nothing is removed or reallocated once playback starts.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<ScheduledEvent>,
    cursor: usize,
}

impl EventQueue {
    /// Build a queue from events in any order.
    pub fn from_events(mut events: Vec<ScheduledEvent>) -> Self {
        sort_events(&mut events);
        Self { events, cursor: 0 }
    }

    /// Next event if it is due at or before `now`.
    pub fn peek_due(&self, now: u64) -> Option<&ScheduledEvent> {
        self.events.get(self.cursor).filter(|e| e.sample_index <= now)
    }

    /// Step past the event returned by `peek_due`.
    pub fn advance(&mut self) {
        if self.cursor < self.events.len() {
            self.cursor += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}
