//! VoicePool: bounded voice arenas and their lifecycle.

use rand::Rng;
use slotmap::{new_key_type, SlotMap};

use crate::command::VoiceCommand;
use crate::config::EngineConfig;
use crate::percussion::HitKind;
use crate::voice::{DrumVoice, PitchedVoice};

new_key_type! {
    /// Stable identifier of a pitched voice slot.
    pub struct VoiceKey;
    /// Stable identifier of a percussion voice slot.
    pub struct DrumKey;
}

/// Maximum number of simultaneous pitched voices.
pub const MAX_VOICES: usize = 64;

/// Maximum number of simultaneous percussion voices.
pub const MAX_DRUM_VOICES: usize = 32;

/// Pitched and percussion voices owned by the renderer.
///
/// Capacity is reserved up front, so starting, releasing and reaping voices
/// never reallocates while rendering. When a pool is full a new voice
/// steals a slot (see [`VoicePool::note_on`] and [`VoicePool::drum_on`]).
pub struct VoicePool {
    config: EngineConfig,
    voices: SlotMap<VoiceKey, PitchedVoice>,
    drums: SlotMap<DrumKey, DrumVoice>,
    steals: u64,
}

impl VoicePool {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            voices: SlotMap::with_capacity_and_key(MAX_VOICES),
            drums: SlotMap::with_capacity_and_key(MAX_DRUM_VOICES),
            steals: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one command from the dispatcher.
    pub fn apply(&mut self, command: VoiceCommand) {
        match command {
            VoiceCommand::NoteOn { audicle, midi, frequency, at } => {
                self.note_on(audicle, midi, frequency, at);
            }
            VoiceCommand::NoteOff { audicle, midi, at } => {
                self.release(audicle, midi, at);
            }
            VoiceCommand::DrumOn { audicle, hit, at } => {
                self.drum_on(audicle, hit, at);
            }
        }
    }

    /// Start a pitched voice at sample `at`.
    ///
    /// A full pool steals the released voice that started first, or failing
    /// that the oldest voice.
    pub fn note_on(&mut self, audicle: usize, midi: u8, frequency: f64, at: u64) -> VoiceKey {
        if self.voices.len() >= MAX_VOICES {
            if let Some(victim) = self.pitched_steal_candidate() {
                self.voices.remove(victim);
                self.steals += 1;
            }
        }
        let voice = PitchedVoice::new(audicle, midi, frequency, at, &self.config);
        self.voices.insert(voice)
    }

    fn pitched_steal_candidate(&self) -> Option<VoiceKey> {
        self.voices
            .iter()
            .min_by_key(|(_, v)| (!v.is_released(), v.start))
            .map(|(key, _)| key)
    }

    /// Release every sounding, not-yet-released voice of `midi` on `audicle`.
    ///
    /// Returns how many voices were released; zero means the NoteOff was
    /// unroutable and nothing changed.
    pub fn release(&mut self, audicle: usize, midi: u8, at: u64) -> usize {
        let config = self.config;
        let mut released = 0;
        for (_, voice) in self.voices.iter_mut() {
            if voice.active && !voice.is_released() && voice.audicle == audicle && voice.midi == midi {
                voice.release_at(at, &config);
                released += 1;
            }
        }
        released
    }

    /// Fire a percussion hit at sample `at`. A full pool steals the oldest hit.
    pub fn drum_on(&mut self, audicle: usize, hit: HitKind, at: u64) -> DrumKey {
        if self.drums.len() >= MAX_DRUM_VOICES {
            let oldest = self.drums.iter().min_by_key(|(_, d)| d.start).map(|(key, _)| key);
            if let Some(victim) = oldest {
                self.drums.remove(victim);
                self.steals += 1;
            }
        }
        self.drums.insert(DrumVoice::new(audicle, hit, at))
    }

    /// Sum of every voice at sample `now`, unclipped.
    pub fn render_sample<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) -> f64 {
        let config = &self.config;
        let mut sample = 0.0;
        for (_, voice) in self.voices.iter_mut() {
            sample += voice.render(now, config);
        }
        for (_, drum) in self.drums.iter_mut() {
            sample += drum.render(now, config, rng);
        }
        sample
    }

    /// Drop every voice whose envelope has run out.
    pub fn reap(&mut self) {
        self.voices.retain(|_, v| v.active);
        self.drums.retain(|_, d| d.active);
    }

    pub fn get(&self, key: VoiceKey) -> Option<&PitchedVoice> {
        self.voices.get(key)
    }

    pub fn voices(&self) -> impl Iterator<Item = &PitchedVoice> {
        self.voices.values()
    }

    pub fn drums(&self) -> impl Iterator<Item = &DrumVoice> {
        self.drums.values()
    }

    /// Count of occupied pitched slots.
    pub fn active_count(&self) -> usize {
        self.voices.len()
    }

    /// Count of occupied percussion slots.
    pub fn drum_count(&self) -> usize {
        self.drums.len()
    }

    /// Voices evicted because a pool was full.
    pub fn steals(&self) -> u64 {
        self.steals
    }

    pub fn is_silent(&self) -> bool {
        self.voices.is_empty() && self.drums.is_empty()
    }
}
