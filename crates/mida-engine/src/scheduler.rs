//! Audicle-to-event scheduling.
//!
//! Walks every audicle on the sixteenth-note grid and produces one flat,
//! stream-ordered `Vec<ScheduledEvent>`: note on/off diffs for pitched
//! tracks, hits for percussion tracks, and one display row per grid unit.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use mida_ir::{
    midi_to_frequency, resolve_chord, sort_events, Audicle, AudicleKind, EventPayload,
    ScheduledEvent, Step, DRUM_REST,
};

use crate::config::EngineConfig;

/// Result of scheduling, including program length.
#[derive(Clone, Debug, Default)]
pub struct ScheduleResult {
    /// Every event in stream order.
    pub events: Vec<ScheduledEvent>,
    /// Program length in samples (release tail not included).
    pub total_samples: u64,
    /// Number of audicles, i.e. cells per display row.
    pub track_count: usize,
    /// Program length in grid units.
    pub grid_len: usize,
}

/// Schedule every audicle.
pub fn schedule(audicles: &[Audicle], config: &EngineConfig) -> ScheduleResult {
    let grid_len = audicles.iter().map(Audicle::grid_len).max().unwrap_or(0);
    let mut grid = vec![vec![String::new(); audicles.len()]; grid_len];
    let mut events = Vec::new();

    for (index, audicle) in audicles.iter().enumerate() {
        match audicle.kind {
            AudicleKind::Pitched => schedule_pitched(index, audicle, config, &mut grid, &mut events),
            AudicleKind::Drum => schedule_drum(index, audicle, config, &mut grid, &mut events),
        }
    }

    for (step, cells) in grid.into_iter().enumerate() {
        events.push(ScheduledEvent::new(config.step_to_sample(step), EventPayload::LogRow(cells)));
    }
    sort_events(&mut events);

    ScheduleResult {
        events,
        total_samples: config.total_samples(grid_len),
        track_count: audicles.len(),
        grid_len,
    }
}

/// Diff each step's resolved pitch set against the previous one.
fn schedule_pitched(
    index: usize,
    audicle: &Audicle,
    config: &EngineConfig,
    grid: &mut [Vec<String>],
    events: &mut Vec<ScheduledEvent>,
) {
    let mut held: BTreeSet<u8> = BTreeSet::new();
    // Names of the last chord onset; legato steps re-resolve these.
    let mut prev_notes: &[String] = &[];

    for (step, cells) in grid.iter_mut().enumerate() {
        cells[index] = audicle.cell(step);
        let Some(current) = audicle.timeline.get(step) else {
            continue;
        };

        let midi: BTreeSet<u8> = match current {
            Step::Legato => resolve_chord(prev_notes).into_iter().collect(),
            Step::Onset(names) => {
                prev_notes = names;
                resolve_chord(names).into_iter().collect()
            }
            Step::Rest => BTreeSet::new(),
        };

        let at = config.step_to_sample(step);
        for &note in midi.difference(&held) {
            events.push(note_on(index, note, at));
        }
        for &note in held.difference(&midi) {
            events.push(note_off(index, note, at));
        }
        held = midi;
    }

    // Anything still sounding stops one step past the end of the track
    if !audicle.timeline.is_empty() {
        let at = config.step_to_sample(audicle.timeline.len());
        for &note in &held {
            events.push(note_off(index, note, at));
        }
    }
}

/// One hit per symbol at the first of the two grid units a step spans.
fn schedule_drum(
    index: usize,
    audicle: &Audicle,
    config: &EngineConfig,
    grid: &mut [Vec<String>],
    events: &mut Vec<ScheduledEvent>,
) {
    for (step, current) in audicle.timeline.iter().enumerate() {
        let cell = audicle.cell(step);
        let row = 2 * step;
        grid[row][index] = cell.clone();
        grid[row + 1][index] = cell;

        let at = config.step_to_sample(row);
        for symbol in current.tokens().iter().filter(|s| s.as_str() != DRUM_REST) {
            events.push(ScheduledEvent::new(
                at,
                EventPayload::DrumOn { audicle: index, symbol: symbol.clone() },
            ));
        }
    }

    for cells in grid.iter_mut().skip(audicle.grid_len()) {
        cells[index] = String::from(DRUM_REST);
    }
}

fn note_on(audicle: usize, midi: u8, at: u64) -> ScheduledEvent {
    ScheduledEvent::new(
        at,
        EventPayload::NoteOn { audicle, midi, frequency: midi_to_frequency(midi) },
    )
}

fn note_off(audicle: usize, midi: u8, at: u64) -> ScheduledEvent {
    ScheduledEvent::new(
        at,
        EventPayload::NoteOff { audicle, midi, frequency: midi_to_frequency(midi) },
    )
}
