//! Audicles: one notation track and its step timeline.

use alloc::string::String;
use alloc::vec::Vec;

use crate::note::resolve_note;

/// Marker token for a legato step in pitched notation.
pub const LEGATO_MARKER: &str = "-";

/// Marker token for a rest in pitched notation.
pub const PITCHED_REST: &str = ".";

/// Marker token for a rest in percussion notation.
pub const DRUM_REST: &str = "_";

/// What kind of voices a track drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudicleKind {
    /// Pitched oscillator voices, one grid unit per step.
    Pitched,
    /// Percussion hits, two grid units per step.
    Drum,
}

/// One step of a timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Step {
    /// Silence. Releases anything held on a pitched track.
    #[default]
    Rest,
    /// Keep the previously started chord sounding (pitched only).
    Legato,
    /// Note names (pitched) or hit symbols (drum) starting together.
    Onset(Vec<String>),
}

impl Step {
    /// Returns true for a rest step.
    pub fn is_rest(&self) -> bool {
        matches!(self, Step::Rest)
    }

    /// Tokens of an onset step, empty otherwise.
    pub fn tokens(&self) -> &[String] {
        match self {
            Step::Onset(tokens) => tokens,
            _ => &[],
        }
    }
}

/// Ordered steps of a track.
pub type Timeline = Vec<Step>;

/// One notation track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Audicle {
    /// Pitched or percussive
    pub kind: AudicleKind,
    /// Steps in playing order
    pub timeline: Timeline,
    /// 1-based source line (0 when built in code)
    pub line: usize,
}

impl Audicle {
    /// Create a pitched audicle.
    pub fn pitched(timeline: Timeline) -> Self {
        Self { kind: AudicleKind::Pitched, timeline, line: 0 }
    }

    /// Create a percussion audicle.
    pub fn drum(timeline: Timeline) -> Self {
        Self { kind: AudicleKind::Drum, timeline, line: 0 }
    }

    /// Set the source line.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn is_drum(&self) -> bool {
        self.kind == AudicleKind::Drum
    }

    /// Length in grid units. Percussion steps span two units each.
    pub fn grid_len(&self) -> usize {
        match self.kind {
            AudicleKind::Pitched => self.timeline.len(),
            AudicleKind::Drum => self.timeline.len() * 2,
        }
    }

    /// Display cell for a step, as printed in the progress grid.
    pub fn cell(&self, step: usize) -> String {
        let rest = match self.kind {
            AudicleKind::Pitched => PITCHED_REST,
            AudicleKind::Drum => DRUM_REST,
        };
        match self.timeline.get(step) {
            None | Some(Step::Rest) => String::from(rest),
            Some(Step::Legato) => String::from(LEGATO_MARKER),
            Some(Step::Onset(tokens)) => match self.kind {
                AudicleKind::Pitched => tokens.join("~"),
                AudicleKind::Drum if tokens.len() == 1 => tokens[0].clone(),
                AudicleKind::Drum => {
                    let mut cell = String::from("{");
                    cell.push_str(&tokens.join(" "));
                    cell.push('}');
                    cell
                }
            },
        }
    }
}

/// Distinct valid MIDI numbers for a set of note names, ascending.
pub fn resolve_chord(names: &[String]) -> Vec<u8> {
    let mut midi: Vec<u8> = names.iter().filter_map(|n| resolve_note(n)).collect();
    midi.sort_unstable();
    midi.dedup();
    midi
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn onset(tokens: &[&str]) -> Step {
        Step::Onset(tokens.iter().map(|t| String::from(*t)).collect())
    }

    #[test]
    fn drum_grid_len_is_doubled() {
        let drum = Audicle::drum(vec![onset(&["*|"]), Step::Rest, onset(&["^|"])]);
        assert_eq!(drum.grid_len(), 6);
        let pitched = Audicle::pitched(vec![onset(&["C4"]), Step::Legato]);
        assert_eq!(pitched.grid_len(), 2);
    }

    #[test]
    fn pitched_cells() {
        let a = Audicle::pitched(vec![onset(&["C4", "E4"]), Step::Legato, Step::Rest]);
        assert_eq!(a.cell(0), "C4~E4");
        assert_eq!(a.cell(1), "-");
        assert_eq!(a.cell(2), ".");
        assert_eq!(a.cell(7), ".");
    }

    #[test]
    fn drum_cells() {
        let a = Audicle::drum(vec![onset(&["*|"]), onset(&["*|", "^|"]), Step::Rest]);
        assert_eq!(a.cell(0), "*|");
        assert_eq!(a.cell(1), "{*| ^|}");
        assert_eq!(a.cell(2), "_");
    }

    #[test]
    fn resolve_chord_drops_invalid_and_duplicates() {
        let names: Vec<String> = ["E4", "C4", "X9", "C4", ""].iter().map(|s| String::from(*s)).collect();
        assert_eq!(resolve_chord(&names), vec![60, 64]);
    }
}
