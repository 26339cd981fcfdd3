// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lyric text handling.
//!
//! Turns raw lyric text into blocks of lines of sung tokens.

pub mod tokenizer;

pub use tokenizer::{tokenize, tokenize_line, LyricBlock, LyricLine, Lyrics, ScriptKind, Token, PLACEHOLDER};
