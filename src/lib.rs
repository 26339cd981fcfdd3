// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! lyricseq - procedural songs from lyrics.
//!
//! Lyrics are tokenized into syllables, given a rhythm and a melody inside a
//! key and vocal range, harmonized with a chord progression, laid out into
//! sections, and written as a Standard MIDI File. Everything is driven by
//! one seeded RNG per run, so the same inputs always give the same song.
//!
//! ```no_run
//! use lyricseq::{encode, generate, GenerationParams};
//!
//! let params = GenerationParams::new("twinkle twinkle little star")
//!     .with_seed(7)
//!     .with_key("G", "major");
//! let timeline = generate(&params);
//! let bytes = encode(&timeline).unwrap();
//! std::fs::write("star.mid", bytes).unwrap();
//! ```

pub mod arrangement;
pub mod config;
pub mod export;
pub mod generators;
pub mod lyrics;
pub mod music;
pub mod timing;

pub use arrangement::{generate, Section, SongTimeline};
pub use config::{GenerationParams, SongFile};
pub use export::{encode, EncodeError, SmfEncoder};
pub use generators::{ChordEvent, NoteEvent};
