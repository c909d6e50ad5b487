use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mida_engine::{
    command_queue, schedule, Dispatcher, EngineConfig, NullSink, SampleClock, Synth,
};
use mida_ir::{Audicle, Step};

const BLOCK: usize = 512;

fn onset(tokens: &[&str]) -> Step {
    Step::Onset(tokens.iter().map(|t| t.to_string()).collect())
}

/// Four bars of chords over a busy drum line.
fn score() -> Vec<Audicle> {
    let chords = ["C4~E4~G4", "A3~C4~E4", "F3~A3~C4", "G3~B3~D4"];
    let mut pitched = Vec::new();
    for chord in chords {
        let names: Vec<&str> = chord.split('~').collect();
        pitched.push(onset(&names));
        pitched.extend(std::iter::repeat(Step::Legato).take(15));
    }
    let drums: Vec<Step> = (0..32)
        .map(|i| match i % 4 {
            0 => onset(&["^|"]),
            2 => onset(&["*|", "v|"]),
            _ => onset(&["v|"]),
        })
        .collect();
    vec![Audicle::pitched(pitched), Audicle::drum(drums)]
}

fn bench_schedule(c: &mut Criterion) {
    let audicles = score();
    let config = EngineConfig::default();
    c.bench_function("schedule", |b| b.iter(|| schedule(black_box(&audicles), &config)));
}

fn bench_render(c: &mut Criterion) {
    let config = EngineConfig::default();
    let result = schedule(&score(), &config);

    c.bench_function("render_full_score", |b| {
        b.iter(|| {
            let clock = SampleClock::new();
            let (tx, rx) = command_queue(config.command_capacity);
            let mut dispatcher = Dispatcher::new(result.clone(), &config, tx, clock.clone(), NullSink);
            let mut synth = Synth::new(config, rx, clock.clone(), 1);
            let mut block = [0.0f32; BLOCK];
            while !dispatcher.is_done() {
                dispatcher.poll_until(clock.now() + BLOCK as u64 - 1);
                synth.render(&mut block);
            }
            black_box(block[0])
        })
    });
}

criterion_group!(benches, bench_schedule, bench_render);
criterion_main!(benches);
