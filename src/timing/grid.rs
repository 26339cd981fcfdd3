// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Time signatures and the sub-beat grid.
//!
//! All rhythmic bookkeeping happens in integer sub-beats (sixteenth notes).
//! Seconds are derived from sub-beats and tempo only at the edges, and MIDI
//! ticks are derived from seconds by the encoder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sub-beats per quarter note (the grid is sixteenth notes)
pub const SUB_BEATS_PER_QUARTER: u32 = 4;

/// Beat units the grid can express exactly
const VALID_BEAT_UNITS: [u8; 5] = [1, 2, 4, 8, 16];

/// Time signature (beats per bar over beat unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats_per_bar: u8,
    pub beat_unit: u8,
}

impl TimeSignature {
    /// Create a time signature, returning None if the grid can't express it
    pub fn new(beats_per_bar: u8, beat_unit: u8) -> Option<Self> {
        let signature = Self {
            beats_per_bar,
            beat_unit,
        };
        signature.is_valid().then_some(signature)
    }

    /// Whether the grid can express this signature (deserialized values
    /// never pass through `new`)
    pub fn is_valid(&self) -> bool {
        (1..=32).contains(&self.beats_per_bar) && VALID_BEAT_UNITS.contains(&self.beat_unit)
    }

    /// Parse "N/D" (e.g., "3/4", "6/8")
    pub fn parse(s: &str) -> Option<Self> {
        let (num, den) = s.trim().split_once('/')?;
        let num = num.trim().parse::<u8>().ok()?;
        let den = den.trim().parse::<u8>().ok()?;
        Self::new(num, den)
    }

    /// Parse, falling back to 4/4 when the string is unusable
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(time_signature = s, "unusable time signature, falling back to 4/4");
            Self::default()
        })
    }

    /// Sub-beats in one beat
    pub fn sub_beats_per_beat(&self) -> u32 {
        SUB_BEATS_PER_QUARTER * 4 / self.beat_unit as u32
    }

    /// Sub-beats in one bar
    pub fn sub_beats_per_bar(&self) -> u32 {
        self.sub_beats_per_beat() * self.beats_per_bar as u32
    }

    /// Beat unit as a power of two, as stored in a time-signature meta event
    pub fn beat_unit_power(&self) -> u8 {
        self.beat_unit.trailing_zeros() as u8
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats_per_bar: 4,
            beat_unit: 4,
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats_per_bar, self.beat_unit)
    }
}

/// Seconds covered by one sub-beat at the given tempo (quarter notes per minute)
pub fn seconds_per_sub_beat(tempo_bpm: f64) -> f64 {
    60.0 / tempo_bpm / SUB_BEATS_PER_QUARTER as f64
}

/// Absolute seconds of a sub-beat position
pub fn sub_beats_to_seconds(sub_beats: u64, tempo_bpm: f64) -> f64 {
    sub_beats as f64 * seconds_per_sub_beat(tempo_bpm)
}

/// Convert seconds to ticks: `round(seconds * tempo * ppq / 60)`
pub fn seconds_to_ticks(seconds: f64, tempo_bpm: f64, ppq: u16) -> u64 {
    (seconds * tempo_bpm * ppq as f64 / 60.0).round().max(0.0) as u64
}

/// Tempo meta value: microseconds per quarter note
pub fn micros_per_quarter(tempo_bpm: f64) -> u32 {
    (60_000_000.0 / tempo_bpm).round() as u32
}

/// Round a sub-beat position up to the next bar boundary
pub fn round_up_to_bar(sub_beats: u64, time_signature: TimeSignature) -> u64 {
    let bar = time_signature.sub_beats_per_bar() as u64;
    sub_beats.div_ceil(bar) * bar
}
