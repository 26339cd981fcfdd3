// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melodic generator driven by lyric rhythm.
//!
//! Walks from the previous pitch by a complexity-weighted signed interval,
//! snaps the result to the scale, and folds it into the vocal window by
//! octaves. At high complexity a grace note a scale-third away may steal the
//! first quarter of a note's duration. Grace notes never carry lyrics, and a
//! rest step swallows its token silently.

use rand::Rng;

use super::rhythm::RhythmStep;
use super::rng::SongRng;
use super::{GeneratorContext, NoteEvent};
use crate::lyrics::Token;
use crate::music::scale::Scale;

/// Complexity above which ornaments may appear
const ORNAMENT_THRESHOLD: f64 = 0.6;

/// Ornament probability at full complexity
const MAX_ORNAMENT_PROBABILITY: f64 = 0.4;

/// Scale steps between an ornament and its host
const ORNAMENT_STEPS: i32 = 2;

/// Base note velocity
const BASE_VELOCITY: f64 = 0.75;

/// Extra velocity on a bar's downbeat
const DOWNBEAT_ACCENT: f64 = 0.1;

/// Velocity scale applied to ornaments
const ORNAMENT_VELOCITY_SCALE: f64 = 0.7;

/// Interval magnitudes in semitones
const INTERVALS: [i32; 9] = [0, 1, 2, 3, 4, 5, 7, 9, 12];

/// Interval transition probabilities for a complexity in [0, 1].
///
/// Steps dominate; leaps gain weight as complexity rises.
fn interval_weights(complexity: f64) -> [f64; 9] {
    let c = complexity.clamp(0.0, 1.0);
    let step = 1.0 - 0.4 * c;
    [
        0.12,              // repeat
        0.22 * step,       // semitone
        0.30 * step,       // whole tone
        0.14,              // minor third
        0.12,              // major third
        0.04 + 0.10 * c,   // fourth
        0.03 + 0.10 * c,   // fifth
        0.01 + 0.05 * c,   // sixth
        0.005 + 0.05 * c,  // octave
    ]
}

/// Probability that a note receives a grace note
pub fn ornament_probability(complexity: f64) -> f64 {
    let c = complexity.clamp(0.0, 1.0);
    if c <= ORNAMENT_THRESHOLD {
        0.0
    } else {
        (c - ORNAMENT_THRESHOLD) / (1.0 - ORNAMENT_THRESHOLD) * MAX_ORNAMENT_PROBABILITY
    }
}

/// Melody generator
///
/// Holds the previous pitch so consecutive phrases connect smoothly.
#[derive(Debug, Clone)]
pub struct MelodyGenerator {
    context: GeneratorContext,
    weights: [f64; 9],
    previous_pitch: i32,
}

impl MelodyGenerator {
    /// Create a melody generator. The walk starts at the centre of the
    /// vocal window.
    pub fn new(context: GeneratorContext) -> Self {
        let weights = interval_weights(context.complexity);
        let previous_pitch = context.vocal_range.center();
        Self {
            context,
            weights,
            previous_pitch,
        }
    }

    /// The pitch the next interval is measured from
    pub fn previous_pitch(&self) -> i32 {
        self.previous_pitch
    }

    /// Choose a signed interval, leaning back toward the window's centre
    fn choose_interval(&mut self, rng: &mut SongRng) -> i32 {
        let magnitude = INTERVALS[rng.weighted_index(&self.weights)];

        let range = &self.context.vocal_range;
        let half_width = (range.width() as f64 / 2.0).max(1.0);
        let offset = ((self.previous_pitch - range.center()) as f64 / half_width).clamp(-1.0, 1.0);
        let down_probability = 0.5 + 0.35 * offset;

        if rng.chance(down_probability) {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Snap to the scale and fold into the vocal window
    fn place(&self, raw: i32) -> i32 {
        let range = &self.context.vocal_range;
        let snapped = self.context.scale.nearest_member(raw);
        Scale::fold_into_range(snapped, range.low as i32, range.high as i32)
    }

    /// Pick the next melody pitch
    fn next_pitch(&mut self, rng: &mut SongRng) -> i32 {
        let interval = self.choose_interval(rng);
        let pitch = self.place(self.previous_pitch + interval);
        self.previous_pitch = pitch;
        pitch
    }

    /// Velocity for a note starting at `position`
    fn velocity(&self, position: u64, rng: &mut SongRng) -> f64 {
        let bar = self.context.sub_beats_per_bar() as u64;
        let accent = if position % bar == 0 { DOWNBEAT_ACCENT } else { 0.0 };
        let spread = 0.02 + 0.08 * self.context.complexity;
        let jitter = (rng.next_f64() * 2.0 - 1.0) * spread;
        (BASE_VELOCITY + accent + jitter).clamp(0.05, 1.0)
    }

    /// Generate notes for one phrase.
    ///
    /// `tokens` and `steps` are consumed pairwise; `start` is the absolute
    /// sub-beat the phrase begins on. Notes come back in start order.
    pub fn generate(
        &mut self,
        tokens: &[Token],
        steps: &[RhythmStep],
        start: u64,
        rng: &mut SongRng,
    ) -> Vec<NoteEvent> {
        let ornament_p = ornament_probability(self.context.complexity);
        let mut notes = Vec::with_capacity(steps.len());
        let mut position = start;

        for (token, step) in tokens.iter().zip(steps) {
            let mut duration = step.duration_sub_beats as u64;
            if step.is_rest {
                position += duration;
                continue;
            }

            let pitch = self.next_pitch(rng);
            let velocity = self.velocity(position, rng);

            if duration >= 2 && ornament_p > 0.0 && rng.chance(ornament_p) {
                let grace_duration = (duration / 4).max(1);
                let direction = if rng.gen_bool(0.5) { 1 } else { -1 };
                let range = &self.context.vocal_range;
                let neighbor = self.context.scale.step(pitch, direction * ORNAMENT_STEPS);
                let grace_pitch =
                    Scale::fold_into_range(neighbor, range.low as i32, range.high as i32);

                notes.push(self.note(
                    position,
                    grace_duration,
                    grace_pitch,
                    String::new(),
                    velocity * ORNAMENT_VELOCITY_SCALE,
                    true,
                ));
                position += grace_duration;
                duration -= grace_duration;
            }

            notes.push(self.note(position, duration, pitch, token.text.clone(), velocity, false));
            position += duration;
        }

        tracing::trace!(notes = notes.len(), start, end = position, "phrase melody");
        notes
    }

    fn note(
        &self,
        position: u64,
        duration: u64,
        pitch: i32,
        lyric: String,
        velocity: f64,
        is_ornament: bool,
    ) -> NoteEvent {
        let start = self.context.seconds_at(position);
        let end = self.context.seconds_at(position + duration);
        NoteEvent {
            start_time_seconds: start,
            duration_seconds: end - start,
            pitch_midi: pitch.clamp(0, 127) as u8,
            lyric,
            velocity,
            is_ornament,
        }
    }
}
