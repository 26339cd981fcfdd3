// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song arrangement.
//!
//! This module provides:
//! - Structure: section label templates and their lyric block mapping
//! - Composer: lays sections out on the bar grid and drives the generators
//! - Song: the finished timeline and the builder that produces it

pub mod composer;
pub mod song;
pub mod structure;

pub use composer::{generate, SectionComposer};
pub use song::{Section, SongTimeline, TimelineBuilder};
pub use structure::{ResolvedSection, Structure, StructureLabel};
