// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides time signatures and the conversions between
//! sub-beats, seconds, and MIDI ticks.

pub mod grid;

pub use grid::{
    micros_per_quarter, round_up_to_bar, seconds_per_sub_beat, seconds_to_ticks,
    sub_beats_to_seconds, TimeSignature, SUB_BEATS_PER_QUARTER,
};
