//! MIDA notation parser.
//!
//! One audicle per line:
//! - `* C4~E4 - . | G4 *` is a pitched track: `.` rest, `-` legato,
//!   `|` bar separator (no step), anything else a `~`-joined chord.
//! - `( *| {*| ^|} _ )` is a percussion track: whitespace-separated hit
//!   symbols, `{…}` groups hits into one step, `_` is a rest.
//!
//! Lines starting with `/` are comments. Parsing never fails; anything
//! it cannot use is skipped and reported as a [`ParseWarning`].

use core::fmt;
use std::fs;
use std::path::Path;

use mida_ir::{resolve_note, Audicle, Step, Timeline, DRUM_REST, LEGATO_MARKER, PITCHED_REST};

use crate::lexer::{split_trimmed, strip_delimiters, trim};
use crate::FormatError;

/// Bar separator in pitched notation.
const BAR: &str = "|";

/// Something the parser skipped or will be dropped at scheduling time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    /// Line is neither `*…*` nor `(…)`
    UnrecognizedLine { line: usize },
    /// Chord member that does not resolve to a MIDI note
    InvalidNote { line: usize, token: String },
    /// `{` without a closing `}`; the partial group is discarded
    UnterminatedGroup { line: usize },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnrecognizedLine { line } => {
                write!(f, "line {}: not an audicle, ignored", line)
            }
            ParseWarning::InvalidNote { line, token } => {
                write!(f, "line {}: invalid note name {:?}", line, token)
            }
            ParseWarning::UnterminatedGroup { line } => {
                write!(f, "line {}: unterminated hit group", line)
            }
        }
    }
}

/// Parsed notation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseOutput {
    /// Tracks in source order
    pub audicles: Vec<Audicle>,
    /// Diagnostics for skipped or unusable content
    pub warnings: Vec<ParseWarning>,
}

/// Parse MIDA notation text.
pub fn parse_mida(text: &str) -> ParseOutput {
    let mut out = ParseOutput::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = trim(raw);
        if line.is_empty() || line.starts_with('/') {
            continue;
        }

        if let Some(body) = strip_delimiters(line, '*', '*') {
            let timeline = parse_pitched(body, line_no, &mut out.warnings);
            out.audicles.push(Audicle::pitched(timeline).at_line(line_no));
        } else if let Some(body) = strip_delimiters(line, '(', ')') {
            let timeline = parse_drum(body, line_no, &mut out.warnings);
            out.audicles.push(Audicle::drum(timeline).at_line(line_no));
        } else {
            out.warnings.push(ParseWarning::UnrecognizedLine { line: line_no });
        }
    }

    out
}

/// Read and parse a notation file.
pub fn load_mida(path: impl AsRef<Path>) -> Result<ParseOutput, FormatError> {
    let text = fs::read_to_string(path.as_ref())?;
    let parsed = parse_mida(&text);
    tracing::debug!(
        "Parsed {}: {} audicles, {} warnings",
        path.as_ref().display(),
        parsed.audicles.len(),
        parsed.warnings.len()
    );
    Ok(parsed)
}

/// Parse the body of a `*…*` line.
fn parse_pitched(body: &str, line: usize, warnings: &mut Vec<ParseWarning>) -> Timeline {
    let mut timeline = Vec::new();
    // Whether a chord is available for a following legato marker
    let mut holding = false;

    for token in body.split_whitespace() {
        match token {
            BAR => {}
            PITCHED_REST => {
                timeline.push(Step::Rest);
                holding = false;
            }
            LEGATO_MARKER => {
                timeline.push(if holding { Step::Legato } else { Step::Rest });
            }
            chord => {
                let mut names: Vec<String> = Vec::new();
                for name in split_trimmed(chord, '~').filter(|n| !n.is_empty()) {
                    if names.iter().any(|n| n == name) {
                        continue;
                    }
                    if resolve_note(name).is_none() {
                        warnings.push(ParseWarning::InvalidNote { line, token: name.to_string() });
                    }
                    names.push(name.to_string());
                }
                holding = !names.is_empty();
                timeline.push(if holding { Step::Onset(names) } else { Step::Rest });
            }
        }
    }

    timeline
}

/// Parse the body of a `(…)` line.
fn parse_drum(body: &str, line: usize, warnings: &mut Vec<ParseWarning>) -> Timeline {
    let mut timeline = Vec::new();
    let mut symbol = String::new();
    let mut group: Option<String> = None;

    for c in body.chars() {
        match group.take() {
            Some(content) if c == '}' => timeline.push(hit_step(content.split_whitespace())),
            // A nested opening brace restarts the group
            Some(_) if c == '{' => group = Some(String::new()),
            Some(mut content) => {
                content.push(c);
                group = Some(content);
            }
            None if c == '{' => {
                flush_symbol(&mut symbol, &mut timeline);
                group = Some(String::new());
            }
            None if c.is_whitespace() => flush_symbol(&mut symbol, &mut timeline),
            // Stray closing brace
            None if c == '}' => {}
            None => symbol.push(c),
        }
    }
    flush_symbol(&mut symbol, &mut timeline);

    if group.is_some() {
        warnings.push(ParseWarning::UnterminatedGroup { line });
    }
    timeline
}

fn flush_symbol(symbol: &mut String, timeline: &mut Timeline) {
    if !symbol.is_empty() {
        timeline.push(hit_step(core::iter::once(symbol.as_str())));
        symbol.clear();
    }
}

/// Build a percussion step from hit symbols; repeats are dropped.
///
/// Rests stay in a group that also carries a hit, so the grid shows the
/// group as written. A step of rests only is a rest.
fn hit_step<'a>(symbols: impl Iterator<Item = &'a str>) -> Step {
    let mut distinct: Vec<String> = Vec::new();
    for s in symbols {
        if !distinct.iter().any(|h| h == s) {
            distinct.push(s.to_string());
        }
    }
    if distinct.iter().all(|s| s == DRUM_REST) {
        Step::Rest
    } else {
        Step::Onset(distinct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mida_ir::AudicleKind;

    fn onset(tokens: &[&str]) -> Step {
        Step::Onset(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn legato_example() {
        let out = parse_mida("* C4~E4 - . *");
        assert_eq!(out.audicles.len(), 1);
        assert_eq!(out.audicles[0].kind, AudicleKind::Pitched);
        assert_eq!(
            out.audicles[0].timeline,
            vec![onset(&["C4", "E4"]), Step::Legato, Step::Rest]
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn legato_without_chord_degrades_to_rest() {
        let out = parse_mida("* - C4 . - *");
        assert_eq!(
            out.audicles[0].timeline,
            vec![Step::Rest, onset(&["C4"]), Step::Rest, Step::Rest]
        );
    }

    #[test]
    fn bar_separator_consumes_no_step() {
        let out = parse_mida("* C4 | D4 - | . *");
        assert_eq!(
            out.audicles[0].timeline,
            vec![onset(&["C4"]), onset(&["D4"]), Step::Legato, Step::Rest]
        );
    }

    #[test]
    fn chord_names_are_unique() {
        let out = parse_mida("* C4~E4~C4 *");
        assert_eq!(out.audicles[0].timeline, vec![onset(&["C4", "E4"])]);
    }

    #[test]
    fn drum_example() {
        let out = parse_mida("( *| {*| ^|} _ )");
        let a = &out.audicles[0];
        assert_eq!(a.kind, AudicleKind::Drum);
        assert_eq!(a.timeline, vec![onset(&["*|"]), onset(&["*|", "^|"]), Step::Rest]);
    }

    #[test]
    fn drum_group_adjacent_to_symbol() {
        let out = parse_mida("(v|{*| v|}^|)");
        assert_eq!(
            out.audicles[0].timeline,
            vec![onset(&["v|"]), onset(&["*|", "v|"]), onset(&["^|"])]
        );
    }

    #[test]
    fn drum_group_of_rests_is_rest() {
        let out = parse_mida("( {_ _} {_ *|} )");
        assert_eq!(out.audicles[0].timeline, vec![Step::Rest, onset(&["_", "*|"])]);
        assert_eq!(out.audicles[0].cell(1), "{_ *|}");
    }

    #[test]
    fn nested_open_brace_restarts_group() {
        let out = parse_mida("( {*| {^|} v| )");
        assert_eq!(out.audicles[0].timeline, vec![onset(&["^|"]), onset(&["v|"])]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn unterminated_group_is_dropped_with_warning() {
        let out = parse_mida("( *| {^| v| )");
        assert_eq!(out.audicles[0].timeline, vec![onset(&["*|"])]);
        assert_eq!(out.warnings, vec![ParseWarning::UnterminatedGroup { line: 1 }]);
    }

    #[test]
    fn comments_blank_and_unknown_lines() {
        let text = "\n// a comment\n   \nhello\n* C4 *\n";
        let out = parse_mida(text);
        assert_eq!(out.audicles.len(), 1);
        assert_eq!(out.audicles[0].line, 5);
        assert_eq!(out.warnings, vec![ParseWarning::UnrecognizedLine { line: 4 }]);
    }

    #[test]
    fn invalid_notes_are_kept_and_reported() {
        let out = parse_mida("* C4~H2 *");
        assert_eq!(out.audicles[0].timeline, vec![onset(&["C4", "H2"])]);
        assert_eq!(
            out.warnings,
            vec![ParseWarning::InvalidNote { line: 1, token: "H2".to_string() }]
        );
    }

    #[test]
    fn empty_bodies_yield_empty_timelines() {
        let out = parse_mida("**\n()");
        assert_eq!(out.audicles.len(), 2);
        assert!(out.audicles.iter().all(|a| a.timeline.is_empty()));
    }

    #[test]
    fn mixed_tracks_keep_source_order() {
        let out = parse_mida("( *| )\n* A4 *\r\n( ^| )");
        let kinds: Vec<AudicleKind> = out.audicles.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AudicleKind::Drum, AudicleKind::Pitched, AudicleKind::Drum]);
    }
}
