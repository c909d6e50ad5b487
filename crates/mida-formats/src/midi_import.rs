//! Standard MIDI File to MIDA conversion.
//!
//! Percussion (MIDI channel 10) becomes one drum audicle per key on an
//! eighth-note grid, which lines up with the two-unit percussion steps.
//! Every other track becomes a pitched audicle on a sixteenth-note grid.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use midly::{MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::debug;

use mida_ir::{note_name, Audicle, Step, Timeline};

use crate::FormatError;

/// Zero-based General MIDI percussion channel.
const DRUM_CHANNEL: u8 = 9;

/// Velocity at or above which a hit is accented.
const ACCENT_VELOCITY: u8 = 110;

/// Velocity at or below which a hit is a ghost note.
const GHOST_VELOCITY: u8 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyEvent {
    On { key: u8, velocity: u8 },
    Off { key: u8 },
}

#[derive(Clone, Copy, Debug)]
struct TimedKey {
    tick: u64,
    channel: u8,
    event: KeyEvent,
}

/// Load and convert a MIDI file from disk.
pub fn load_midi(path: impl AsRef<Path>) -> Result<Vec<Audicle>, FormatError> {
    let data = std::fs::read(path.as_ref())?;
    import_midi(&data)
}

/// Convert MIDI file bytes into audicles: percussion first, then pitched tracks.
pub fn import_midi(data: &[u8]) -> Result<Vec<Audicle>, FormatError> {
    let smf = Smf::parse(data)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => tpb.as_int() as u64,
        Timing::Timecode(_, _) => return Err(FormatError::UnsupportedTiming),
    };

    let tracks: Vec<Vec<TimedKey>> = smf.tracks.iter().map(|t| key_events(t)).collect();

    let mut audicles = drum_audicles(&tracks, ticks_per_beat);
    let drum_count = audicles.len();
    for track in &tracks {
        if track.iter().any(|k| k.channel == DRUM_CHANNEL) {
            continue;
        }
        if let Some(audicle) = pitched_audicle(track, ticks_per_beat) {
            audicles.push(audicle);
        }
    }

    debug!(
        "Imported MIDI: {} tracks, {} ticks per beat -> {} drum and {} pitched audicles",
        smf.tracks.len(),
        ticks_per_beat,
        drum_count,
        audicles.len() - drum_count
    );
    Ok(audicles)
}

/// Note on/off messages of one track with absolute tick times.
fn key_events(track: &[TrackEvent]) -> Vec<TimedKey> {
    let mut events = Vec::new();
    let mut tick = 0u64;

    for event in track {
        tick += event.delta.as_int() as u64;
        if let TrackEventKind::Midi { channel, message } = event.kind {
            let event = match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    KeyEvent::On { key: key.as_int(), velocity: vel.as_int() }
                }
                // Velocity 0 is a note off
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    KeyEvent::Off { key: key.as_int() }
                }
                _ => continue,
            };
            events.push(TimedKey { tick, channel: channel.as_int(), event });
        }
    }

    events
}

/// Number of grid slots needed to cover `last_tick`.
fn slot_count(last_tick: u64, slot_ticks: u64) -> usize {
    (last_tick.div_ceil(slot_ticks) + 1) as usize
}

fn hit_symbol(velocity: u8) -> &'static str {
    if velocity >= ACCENT_VELOCITY {
        "^|"
    } else if velocity <= GHOST_VELOCITY {
        "v|"
    } else {
        "*|"
    }
}

fn trim_trailing_rests(timeline: &mut Timeline) {
    while timeline.last().is_some_and(Step::is_rest) {
        timeline.pop();
    }
}

/// One drum audicle per percussion key, ascending by key.
fn drum_audicles(tracks: &[Vec<TimedKey>], ticks_per_beat: u64) -> Vec<Audicle> {
    let mut hits: BTreeMap<u8, Vec<(u64, u8)>> = BTreeMap::new();
    for key in tracks.iter().flatten().filter(|k| k.channel == DRUM_CHANNEL) {
        if let KeyEvent::On { key: note, velocity } = key.event {
            hits.entry(note).or_default().push((key.tick, velocity));
        }
    }

    let Some(last_tick) = hits.values().flatten().map(|&(tick, _)| tick).max() else {
        return Vec::new();
    };
    let eighth = (ticks_per_beat / 2).max(1);
    let slots = slot_count(last_tick, eighth);

    let mut audicles = Vec::new();
    for events in hits.values() {
        let mut velocities: Vec<Vec<u8>> = vec![Vec::new(); slots];
        for &(tick, velocity) in events {
            velocities[(tick / eighth) as usize].push(velocity);
        }

        let mut timeline: Timeline = velocities
            .iter()
            .map(|slot| {
                let mut symbols: Vec<String> = Vec::new();
                for symbol in slot.iter().map(|&v| hit_symbol(v)) {
                    if !symbols.iter().any(|s| s == symbol) {
                        symbols.push(symbol.to_string());
                    }
                }
                if symbols.is_empty() {
                    Step::Rest
                } else {
                    Step::Onset(symbols)
                }
            })
            .collect();
        trim_trailing_rests(&mut timeline);

        if !timeline.is_empty() {
            audicles.push(Audicle::drum(timeline));
        }
    }
    audicles
}

/// Sixteenth-grid snapshot of the keys held on a melodic track.
fn pitched_audicle(track: &[TimedKey], ticks_per_beat: u64) -> Option<Audicle> {
    let last_tick = track.iter().map(|k| k.tick).max()?;
    let sixteenth = (ticks_per_beat / 4).max(1);

    let mut timeline = Timeline::new();
    let mut held: BTreeSet<u8> = BTreeSet::new();
    let mut previous: BTreeSet<u8> = BTreeSet::new();
    let mut cursor = 0;

    for slot in 0..slot_count(last_tick, sixteenth) {
        let slot_end = (slot as u64 + 1) * sixteenth;
        while let Some(event) = track.get(cursor).filter(|e| e.tick < slot_end) {
            match event.event {
                KeyEvent::On { key, .. } => {
                    held.insert(key);
                }
                KeyEvent::Off { key } => {
                    held.remove(&key);
                }
            }
            cursor += 1;
        }

        let step = if held.is_empty() {
            Step::Rest
        } else if held == previous {
            Step::Legato
        } else {
            Step::Onset(held.iter().map(|&k| note_name(k)).collect())
        };
        timeline.push(step);
        previous.clone_from(&held);
    }
    trim_trailing_rests(&mut timeline);

    if timeline.is_empty() {
        None
    } else {
        Some(Audicle::pitched(timeline))
    }
}
