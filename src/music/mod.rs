// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for lyricseq.
//!
//! This module provides scale definitions, scale snapping, and note
//! manipulation utilities for melody and harmony generation.

pub mod scale;

pub use scale::{KeySummary, Note, Scale, ScaleType};
