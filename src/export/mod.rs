// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Binary export.
//!
//! This module provides:
//! - SMF: Standard MIDI File encoding of a song timeline
//! - Inspect: reading a MIDI file back for a summary

pub mod inspect;
pub mod smf;

pub use inspect::{summarize, summarize_file, InspectError, SmfSummary};
pub use smf::{encode, EncodeError, SmfEncoder, TICKS_PER_QUARTER};
