//! mida CLI: play MIDA notation, render it to WAV, or import MIDI.
//!
//! Usage:
//!   mida path/to/song.mida
//!   mida path/to/song.mida --bpm 140 --wav output.wav --seed 7
//!   mida import path/to/song.mid > song.mida

use std::io::{self, Write};
use std::{env, process};

use mida_master::{EngineConfig, GridPrinter, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: mida <file.mida> [--bpm N] [--wav output.wav] [--seed N]\n       mida import <file.mid>";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let first = args.get(1).unwrap_or_else(|| fail(USAGE));

    if first == "import" {
        let path = args.get(2).unwrap_or_else(|| fail(USAGE));
        import_midi(path);
        return;
    }

    let mut config = EngineConfig::default();
    if let Some(bpm) = flag_value(&args, "--bpm") {
        config.bpm = bpm
            .parse()
            .ok()
            .filter(|bpm: &f64| *bpm > 0.0)
            .unwrap_or_else(|| fail(&format!("Invalid --bpm value: {}", bpm)));
    }
    let seed: u64 = match flag_value(&args, "--seed") {
        Some(seed) => seed
            .parse()
            .unwrap_or_else(|_| fail(&format!("Invalid --seed value: {}", seed))),
        None => 0,
    };

    let session = Session::load(first, config)
        .unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", first, e)));
    info!("Loaded {} ({} warnings)", first, session.warnings().len());

    let pitched = session.audicles().iter().filter(|a| !a.is_drum()).count();
    println!("Audicles: {} pitched, {} percussion", pitched, session.audicles().len() - pitched);
    println!("Tempo:    {} BPM", config.bpm);
    println!("Length:   {:.2}s", config.seconds(session.total_samples()));
    for warning in session.warnings() {
        eprintln!("warning: {}", warning);
    }
    println!();

    match flag_value(&args, "--wav") {
        Some(wav) => render_to_wav(&session, wav, seed),
        None => play_audio(&session),
    }
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn play_audio(session: &Session) {
    let playback = session
        .play(GridPrinter::new(io::stdout()))
        .unwrap_or_else(|e| fail(&format!("Playback failed: {}", e)));

    match playback.join() {
        Ok(grid) => {
            if let Err(e) = grid.finish() {
                fail(&format!("Failed to print progress: {}", e));
            }
        }
        Err(e) => fail(&format!("Playback failed: {}", e)),
    }
    info!("Played {} samples", session.tail_end());
    println!("Done.");
}

fn render_to_wav(session: &Session, path: &str, seed: u64) {
    println!("Rendering to {} at {} Hz...", path, session.config().sample_rate);
    session
        .write_wav_file(path, seed)
        .unwrap_or_else(|e| fail(&format!("Failed to write {}: {}", path, e)));
    info!("Rendered {} with seed {}", path, seed);
    println!("Done.");
}

fn import_midi(path: &str) {
    let audicles = mida_formats::load_midi(path)
        .unwrap_or_else(|e| fail(&format!("Failed to import {}: {}", path, e)));
    info!("Imported {} audicles from {}", audicles.len(), path);
    let text = mida_formats::write_mida(&audicles);

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
        fail(&format!("Failed to write notation: {}", e));
    }
}
