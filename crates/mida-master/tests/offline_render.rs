//! Offline rendering through the controller.

use mida_master::{EngineConfig, GridPrinter, NullSink, Session};

const GROOVE: &str = "\
// two bars
* C4~E4 - - - . . G3 - *
( *| _ {*| ^|} _ )
";

#[test]
fn same_seed_renders_identical_audio() {
    let session = Session::from_text(GROOVE, EngineConfig::default());
    assert_eq!(session.render(42), session.render(42));
}

#[test]
fn different_seeds_change_only_the_noise() {
    let session = Session::from_text(GROOVE, EngineConfig::default());
    let a = session.render(1);
    let b = session.render(2);
    assert_eq!(a.len(), b.len());
    assert_ne!(a, b);
}

#[test]
fn pitched_only_program_is_seed_independent() {
    let session = Session::from_text("* A4 C5 - . *", EngineConfig::default());
    assert_eq!(session.render(1), session.render(2));
}

#[test]
fn grid_is_printed_during_render() {
    let session = Session::from_text(GROOVE, EngineConfig::default());
    let rendered = session.render_with(0, GridPrinter::new(Vec::new()));
    let text = String::from_utf8(rendered.sink.finish().unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "A1 A2 ");
    // one line per grid unit
    assert_eq!(lines.len(), 1 + 8);
    assert_eq!(lines[1], "C4~E4 *| <");
    assert_eq!(lines[2], "  - *| <");
    assert_eq!(lines[3], "  -{*| ^|} <");
    assert_eq!(lines[5], "  .  _ <");
    assert_eq!(lines[7], " G3  _ <");
}

#[test]
fn every_voice_finishes() {
    let session = Session::from_text(GROOVE, EngineConfig::default());
    let rendered = session.render_with(0, NullSink);
    assert_eq!(rendered.voices_remaining, 0);
    assert_eq!(rendered.steals, 0);
    assert!(rendered.samples.len() as u64 >= session.tail_end());
}

#[test]
fn tempo_scales_length() {
    let slow = Session::from_text(GROOVE, EngineConfig { bpm: 100.0, ..EngineConfig::default() });
    let fast = Session::from_text(GROOVE, EngineConfig::default());
    assert_eq!(slow.total_samples(), 2 * fast.total_samples());
}

#[test]
fn wav_file_round_trip() {
    let session = Session::from_text(GROOVE, EngineConfig::default());
    let path = std::env::temp_dir().join(format!("mida-render-{}.wav", std::process::id()));
    session.write_wav_file(&path, 5).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(bytes, session.render_to_wav(5));
}
