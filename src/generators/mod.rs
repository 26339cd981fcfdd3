// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generative engines for lyric-driven song creation.
//!
//! This module provides the seeded RNG and the rhythm, melody, and chord
//! generators. Every generator takes the run's RNG by `&mut` so a single
//! caller-owned stream drives the whole song.

pub mod chord;
pub mod melody;
pub mod rhythm;
pub mod rng;

pub use chord::{ChordEvent, ChordProgression, ProgressionStyle};
pub use melody::MelodyGenerator;
pub use rhythm::{RhythmGenerator, RhythmStep};
pub use rng::SongRng;

use serde::{Deserialize, Serialize};

use crate::music::scale::Scale;
use crate::timing::{self, TimeSignature};

/// Default centre of the vocal window (E4)
pub const DEFAULT_VOCAL_CENTER: u8 = 64;

/// Default width of the vocal window in semitones
pub const DEFAULT_VOCAL_RANGE: u8 = 14;

/// Narrowest window that still holds every pitch class
pub const MIN_VOCAL_RANGE: u8 = 12;

/// Widest window accepted
pub const MAX_VOCAL_RANGE: u8 = 48;

/// A timed note produced by the melody generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Absolute start time in seconds
    pub start_time_seconds: f64,
    /// Duration in seconds (always > 0)
    pub duration_seconds: f64,
    /// MIDI note number (0-127)
    pub pitch_midi: u8,
    /// Lyric sung on this note (empty for ornaments)
    pub lyric: String,
    /// Velocity (0.0 - 1.0)
    pub velocity: f64,
    /// Grace note preceding a lyric-carrying note
    pub is_ornament: bool,
}

impl NoteEvent {
    /// End time in seconds
    pub fn end_time_seconds(&self) -> f64 {
        self.start_time_seconds + self.duration_seconds
    }
}

/// Inclusive MIDI pitch window a melody must stay inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocalRange {
    pub low: u8,
    pub high: u8,
}

impl VocalRange {
    /// Window of `width` semitones centred on `center`, kept inside 0-127.
    /// The width is clamped to 12-48.
    pub fn around(center: u8, width: u8) -> Self {
        let width = width.clamp(MIN_VOCAL_RANGE, MAX_VOCAL_RANGE) as i32;
        let mut low = center.min(127) as i32 - width / 2;
        low = low.clamp(0, 127 - width);
        Self {
            low: low as u8,
            high: (low + width) as u8,
        }
    }

    /// Middle of the window
    pub fn center(&self) -> i32 {
        (self.low as i32 + self.high as i32) / 2
    }

    /// Width in semitones
    pub fn width(&self) -> i32 {
        self.high as i32 - self.low as i32
    }

    pub fn contains(&self, pitch: i32) -> bool {
        (self.low as i32..=self.high as i32).contains(&pitch)
    }
}

impl Default for VocalRange {
    fn default() -> Self {
        Self::around(DEFAULT_VOCAL_CENTER, DEFAULT_VOCAL_RANGE)
    }
}

/// Context shared by the generators for one run
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    /// Tempo in BPM (quarter notes per minute)
    pub tempo: f64,
    /// Time signature
    pub time_signature: TimeSignature,
    /// Scale used for snapping and harmony
    pub scale: Scale,
    /// Complexity (0.0 = plain, 1.0 = busy)
    pub complexity: f64,
    /// Allowed melody pitches
    pub vocal_range: VocalRange,
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            time_signature: TimeSignature::default(),
            scale: Scale::default(),
            complexity: 0.5,
            vocal_range: VocalRange::default(),
        }
    }
}

impl GeneratorContext {
    /// Sub-beats per bar
    pub fn sub_beats_per_bar(&self) -> u32 {
        self.time_signature.sub_beats_per_bar()
    }

    /// Sub-beats per beat
    pub fn sub_beats_per_beat(&self) -> u32 {
        self.time_signature.sub_beats_per_beat()
    }

    /// Absolute seconds of a sub-beat position
    pub fn seconds_at(&self, sub_beats: u64) -> f64 {
        timing::sub_beats_to_seconds(sub_beats, self.tempo)
    }
}
