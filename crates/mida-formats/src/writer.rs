//! Serialize audicles back to MIDA notation.

use mida_ir::{Audicle, AudicleKind, Step, DRUM_REST, LEGATO_MARKER, PITCHED_REST};

/// Write one audicle as a single notation line.
pub fn write_audicle(audicle: &Audicle) -> String {
    let tokens: Vec<String> = audicle
        .timeline
        .iter()
        .map(|step| step_token(audicle.kind, step))
        .collect();

    let (open, close) = match audicle.kind {
        AudicleKind::Pitched => ('*', '*'),
        AudicleKind::Drum => ('(', ')'),
    };
    format!("{}{}{}", open, tokens.join(" "), close)
}

/// Write audicles as notation text, one line each.
pub fn write_mida(audicles: &[Audicle]) -> String {
    let mut out = String::new();
    for audicle in audicles {
        out.push_str(&write_audicle(audicle));
        out.push('\n');
    }
    out
}

fn step_token(kind: AudicleKind, step: &Step) -> String {
    match (kind, step) {
        (AudicleKind::Pitched, Step::Rest) => PITCHED_REST.to_string(),
        (AudicleKind::Pitched, Step::Legato) => LEGATO_MARKER.to_string(),
        (AudicleKind::Pitched, Step::Onset(names)) => names.join("~"),
        // Percussion has no legato; it never reaches here from the parser.
        (AudicleKind::Drum, Step::Rest | Step::Legato) => DRUM_REST.to_string(),
        (AudicleKind::Drum, Step::Onset(hits)) if hits.len() == 1 => hits[0].clone(),
        (AudicleKind::Drum, Step::Onset(hits)) => format!("{{{}}}", hits.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_mida;

    #[test]
    fn writes_pitched_line() {
        let parsed = parse_mida("* C4~E4 - . | G4 *");
        assert_eq!(write_audicle(&parsed.audicles[0]), "*C4~E4 - . G4*");
    }

    #[test]
    fn writes_drum_line() {
        let parsed = parse_mida("( *| {*| ^|} _ )");
        assert_eq!(write_audicle(&parsed.audicles[0]), "(*| {*| ^|} _)");
    }

    #[test]
    fn reparse_preserves_timelines() {
        let text = "* C4~E4 - . D#3 - - *\n( v| _ {*| ^|} ^| )\n* . . A4 *\n";
        let first = parse_mida(text);
        let second = parse_mida(&write_mida(&first.audicles));
        let timelines = |p: &crate::ParseOutput| -> Vec<_> {
            p.audicles.iter().map(|a| (a.kind, a.timeline.clone())).collect()
        };
        assert_eq!(timelines(&first), timelines(&second));
    }
}
