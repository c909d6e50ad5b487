//! Dispatch loop: turns due events into voice commands and display rows.

use ringbuf::traits::Producer;

use mida_ir::EventPayload;

use crate::clock::SampleClock;
use crate::command::{CommandSender, VoiceCommand};
use crate::config::EngineConfig;
use crate::display::RowSink;
use crate::event_queue::EventQueue;
use crate::percussion::HitKind;
use crate::scheduler::ScheduleResult;

/// Walks the event stream against the sample clock.
///
/// Audio events become [`VoiceCommand`]s for the renderer; display rows go
/// to the [`RowSink`]. The dispatcher owns no voices.
pub struct Dispatcher<S: RowSink> {
    queue: EventQueue,
    commands: CommandSender,
    clock: SampleClock,
    sink: S,
    track_count: usize,
    /// Clock value after which the release tail has been rendered.
    tail_end: u64,
    header_sent: bool,
    /// Polls that stopped early because the command queue was full.
    stalls: u64,
}

impl<S: RowSink> Dispatcher<S> {
    pub fn new(
        schedule: ScheduleResult,
        config: &EngineConfig,
        commands: CommandSender,
        clock: SampleClock,
        sink: S,
    ) -> Self {
        Self {
            queue: EventQueue::from_events(schedule.events),
            commands,
            clock,
            sink,
            track_count: schedule.track_count,
            tail_end: schedule.total_samples + config.release_samples(),
            header_sent: false,
            stalls: 0,
        }
    }

    /// Apply every event due at the current clock. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        self.poll_until(now)
    }

    /// Apply every event with `sample_index <= horizon`.
    ///
    /// Stops early, without losing the event, if the command queue is full;
    /// the next poll retries it.
    pub fn poll_until(&mut self, horizon: u64) -> usize {
        if !self.header_sent {
            self.sink.header(self.track_count);
            self.header_sent = true;
        }

        let mut applied = 0;
        while let Some(event) = self.queue.peek_due(horizon) {
            let at = event.sample_index;
            let command = match &event.payload {
                EventPayload::NoteOn { audicle, midi, frequency } => Some(VoiceCommand::NoteOn {
                    audicle: *audicle,
                    midi: *midi,
                    frequency: *frequency,
                    at,
                }),
                EventPayload::NoteOff { audicle, midi, .. } => {
                    Some(VoiceCommand::NoteOff { audicle: *audicle, midi: *midi, at })
                }
                EventPayload::DrumOn { audicle, symbol } => Some(VoiceCommand::DrumOn {
                    audicle: *audicle,
                    hit: HitKind::from_symbol(symbol),
                    at,
                }),
                EventPayload::LogRow(cells) => {
                    self.sink.row(cells);
                    None
                }
            };

            if let Some(command) = command {
                if self.commands.try_push(command).is_err() {
                    self.stalls += 1;
                    break;
                }
            }
            self.queue.advance();
            applied += 1;
        }
        applied
    }

    /// True once every event has been applied.
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_exhausted()
    }

    /// True once every event has been applied and the release tail rendered.
    pub fn is_done(&self) -> bool {
        self.is_exhausted() && self.clock.now() >= self.tail_end
    }

    /// Clock value at which playback is complete.
    pub fn tail_end(&self) -> u64 {
        self.tail_end
    }

    pub fn stalls(&self) -> u64 {
        self.stalls
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Poll every `interval` until the stream is exhausted, then wait for
    /// the release tail to be rendered.
    #[cfg(feature = "std")]
    pub fn run(&mut self, interval: std::time::Duration) {
        loop {
            self.poll();
            if self.is_exhausted() {
                break;
            }
            std::thread::sleep(interval);
        }
        while self.clock.now() < self.tail_end {
            std::thread::sleep(interval * 10);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::command_queue;
    use crate::scheduler::schedule;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use mida_ir::{Audicle, Step};
    use ringbuf::traits::Consumer;

    #[derive(Default)]
    struct Rows {
        header: Option<usize>,
        rows: Vec<Vec<String>>,
    }

    impl RowSink for Rows {
        fn header(&mut self, track_count: usize) {
            self.header = Some(track_count);
        }

        fn row(&mut self, cells: &[String]) {
            self.rows.push(cells.to_vec());
        }
    }

    fn onset(tokens: &[&str]) -> Step {
        Step::Onset(tokens.iter().map(|t| String::from(*t)).collect())
    }

    fn program() -> ScheduleResult {
        let pitched = Audicle::pitched(vec![onset(&["C4", "E4"]), Step::Legato, Step::Rest]);
        let drum = Audicle::drum(vec![onset(&["^|"])]);
        schedule(&[pitched, drum], &EngineConfig::default())
    }

    #[test]
    fn applies_only_due_events() {
        let config = EngineConfig::default();
        let (tx, mut rx) = command_queue(16);
        let clock = SampleClock::new();
        let mut dispatcher = Dispatcher::new(program(), &config, tx, clock.clone(), Rows::default());

        // Two NoteOns, a DrumOn and the first row
        assert_eq!(dispatcher.poll(), 4);
        assert_eq!(dispatcher.sink().header, Some(2));
        assert_eq!(dispatcher.sink().rows, vec![vec!["C4~E4", "^|"]]);

        let commands: Vec<VoiceCommand> = core::iter::from_fn(|| rx.try_pop()).collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[2], VoiceCommand::DrumOn { hit: HitKind::Accent, at: 0, .. }));

        clock.advance(3599);
        assert_eq!(dispatcher.poll(), 0);
        clock.advance(1);
        assert_eq!(dispatcher.poll(), 1);
        assert!(!dispatcher.is_exhausted());
    }

    #[test]
    fn full_queue_defers_without_loss() {
        let config = EngineConfig::default();
        let (tx, mut rx) = command_queue(1);
        let clock = SampleClock::new();
        let mut dispatcher = Dispatcher::new(program(), &config, tx, clock, Rows::default());

        assert_eq!(dispatcher.poll(), 1);
        assert_eq!(dispatcher.stalls(), 1);
        let mut seen = Vec::new();
        while let Some(command) = rx.try_pop() {
            seen.push(command);
            dispatcher.poll();
        }
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], VoiceCommand::NoteOn { midi: 60, .. }));
        assert!(matches!(seen[1], VoiceCommand::NoteOn { midi: 64, .. }));
        assert!(matches!(seen[2], VoiceCommand::DrumOn { .. }));
    }

    #[test]
    fn done_after_release_tail() {
        let config = EngineConfig::default();
        let (tx, _rx) = command_queue(64);
        let clock = SampleClock::new();
        let result = program();
        let total = result.total_samples;
        let mut dispatcher = Dispatcher::new(result, &config, tx, clock.clone(), Rows::default());

        dispatcher.poll_until(u64::MAX);
        assert!(dispatcher.is_exhausted());
        assert_eq!(dispatcher.sink().rows.len(), 3);
        assert!(!dispatcher.is_done());

        assert_eq!(dispatcher.tail_end(), total + config.release_samples());
        clock.advance(dispatcher.tail_end());
        assert!(dispatcher.is_done());
    }
}
