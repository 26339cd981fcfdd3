// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rhythm generator for lyric phrases.
//!
//! Draws one duration per token from a complexity-weighted table of note
//! values on the sixteenth-note grid. Steps never cross a bar line: a
//! duration that would overrun the bar is cut at the bar line and the next
//! step starts with a whole bar free.

use serde::{Deserialize, Serialize};

use super::rng::SongRng;
use crate::timing::TimeSignature;

/// Note values in sub-beats: half, dotted quarter, quarter, eighth, sixteenth
const DURATION_CHOICES: [u32; 5] = [8, 6, 4, 2, 1];

/// Complexity above which rests may appear
const REST_THRESHOLD: f64 = 0.5;

/// Rest probability at full complexity
const MAX_REST_PROBABILITY: f64 = 0.15;

/// One rhythmic slot, consumed 1:1 against a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmStep {
    /// Duration on the sub-beat grid (always >= 1)
    pub duration_sub_beats: u32,
    /// The token's syllable is swallowed by a rest
    pub is_rest: bool,
}

impl RhythmStep {
    pub fn new(duration_sub_beats: u32, is_rest: bool) -> Self {
        Self {
            duration_sub_beats: duration_sub_beats.max(1),
            is_rest,
        }
    }
}

/// Total length of a step list in sub-beats
pub fn total_sub_beats(steps: &[RhythmStep]) -> u64 {
    steps.iter().map(|s| s.duration_sub_beats as u64).sum()
}

/// Weights over [`DURATION_CHOICES`] for a complexity in [0, 1].
///
/// Zero complexity yields quarter notes only; higher values shift weight
/// toward eighths and sixteenths.
fn duration_weights(complexity: f64) -> [f64; 5] {
    let c = complexity.clamp(0.0, 1.0);
    [
        0.6 * c * (1.0 - c), // half
        0.1 * c,             // dotted quarter
        1.0 - 0.8 * c,       // quarter
        0.6 * c,             // eighth
        0.4 * c * c,         // sixteenth
    ]
}

/// Probability that a (non-initial) step is a rest
pub fn rest_probability(complexity: f64) -> f64 {
    let c = complexity.clamp(0.0, 1.0);
    if c <= REST_THRESHOLD {
        0.0
    } else {
        (c - REST_THRESHOLD) / (1.0 - REST_THRESHOLD) * MAX_REST_PROBABILITY
    }
}

/// Rhythm generator
#[derive(Debug, Clone)]
pub struct RhythmGenerator {
    time_signature: TimeSignature,
    complexity: f64,
    weights: [f64; 5],
}

impl RhythmGenerator {
    /// Create a rhythm generator
    pub fn new(time_signature: TimeSignature, complexity: f64) -> Self {
        let complexity = complexity.clamp(0.0, 1.0);
        Self {
            time_signature,
            complexity,
            weights: duration_weights(complexity),
        }
    }

    /// Generate one step per token for a phrase starting at absolute
    /// sub-beat `start`. The first step of a phrase is never a rest.
    pub fn generate(&self, token_count: usize, start: u64, rng: &mut SongRng) -> Vec<RhythmStep> {
        let bar = self.time_signature.sub_beats_per_bar();
        let mut remaining = bar - (start % bar as u64) as u32;
        let rest_p = rest_probability(self.complexity);

        let mut steps = Vec::with_capacity(token_count);
        for i in 0..token_count {
            let mut duration = DURATION_CHOICES[rng.weighted_index(&self.weights)];
            let is_rest = i > 0 && rng.chance(rest_p);

            // Cut at the bar line; the next step opens a new bar
            if duration > remaining {
                duration = remaining;
            }
            remaining -= duration;
            if remaining == 0 {
                remaining = bar;
            }

            steps.push(RhythmStep::new(duration, is_rest));
        }

        steps
    }
}
