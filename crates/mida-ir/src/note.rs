//! Note names and pitch conversion.
//!
//! A note name is `<letter>[#]<octave>`, e.g. `C4`, `F#3`, `A-1`.
//! Letters are uppercase; only sharps are recognised.

use alloc::format;
use alloc::string::String;

/// Pitch-class names, indexed by semitone above C.
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// MIDI number of concert A (440 Hz).
const A4_MIDI: i32 = 69;

/// Highest MIDI note number.
pub const MIDI_MAX: u8 = 127;

/// Look up the semitone (0-11) for a pitch-class name.
pub fn pitch_class(name: &str) -> Option<u8> {
    PITCH_CLASS_NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| i as u8)
}

/// Resolve a note name to its MIDI number: `12 * (octave + 1) + pitch_class`.
///
/// Returns `None` for malformed names and for anything outside 1..=127.
/// MIDI 0 (`C-1`) counts as "no note".
pub fn resolve_note(name: &str) -> Option<u8> {
    let name = name.trim();
    let first = name.chars().next()?;
    if !first.is_ascii() {
        return None;
    }

    // An accidental only counts when an octave follows it.
    let split = match name.as_bytes().get(1) {
        Some(b'#') | Some(b'b') if name.len() > 2 => 2,
        _ => 1,
    };
    let (base, octave) = name.split_at(split);

    let semitone = pitch_class(base)? as i32;
    let octave: i32 = octave.parse().ok()?;
    let midi = octave.checked_add(1)?.checked_mul(12)?.checked_add(semitone)?;

    if midi > 0 && midi <= MIDI_MAX as i32 {
        Some(midi as u8)
    } else {
        None
    }
}

/// Equal-tempered frequency in Hz: `440 * 2^((midi - 69) / 12)`.
pub fn midi_to_frequency(midi: u8) -> f64 {
    440.0 * libm::pow(2.0, (midi as i32 - A4_MIDI) as f64 / 12.0)
}

/// Format a MIDI number as a note name (octave = midi / 12 - 1).
pub fn note_name(midi: u8) -> String {
    let octave = midi as i32 / 12 - 1;
    format!("{}{}", PITCH_CLASS_NAMES[(midi % 12) as usize], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_naturals_and_sharps() {
        assert_eq!(resolve_note("C4"), Some(60));
        assert_eq!(resolve_note("A4"), Some(69));
        assert_eq!(resolve_note("C#4"), Some(61));
        assert_eq!(resolve_note("B3"), Some(59));
        assert_eq!(resolve_note("G9"), Some(127));
    }

    #[test]
    fn negative_octaves() {
        assert_eq!(resolve_note("C#-1"), Some(1));
        // C-1 is MIDI 0, treated as no note
        assert_eq!(resolve_note("C-1"), None);
    }

    #[test]
    fn malformed_names_resolve_to_none() {
        assert_eq!(resolve_note(""), None);
        assert_eq!(resolve_note("H4"), None);
        assert_eq!(resolve_note("c4"), None);
        assert_eq!(resolve_note("C"), None);
        assert_eq!(resolve_note("C#"), None);
        assert_eq!(resolve_note("C4x"), None);
        assert_eq!(resolve_note("Db4"), None);
        assert_eq!(resolve_note("G#9"), None);
    }

    #[test]
    fn a4_is_exactly_440() {
        assert_eq!(midi_to_frequency(69), 440.0);
    }

    #[test]
    fn c4_frequency() {
        assert!((midi_to_frequency(60) - 261.63).abs() < 0.01);
    }

    #[test]
    fn octave_doubles_frequency() {
        let low = midi_to_frequency(57);
        let high = midi_to_frequency(69);
        assert!((high / low - 2.0).abs() < 1e-12);
    }

    #[test]
    fn note_name_round_trips_through_resolve() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(70), "A#4");
        assert_eq!(note_name(11), "B-1");
        for midi in 1..=MIDI_MAX {
            assert_eq!(resolve_note(&note_name(midi)), Some(midi));
        }
    }
}
