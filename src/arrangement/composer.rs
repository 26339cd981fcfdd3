// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Section composer.
//!
//! Walks the structure template, sings each mapped lyric block line by line,
//! and lays sections end to end on bar boundaries. Harmony is generated last,
//! once the total bar count is known, so there is always one chord per bar.

use super::song::{SongTimeline, TimelineBuilder};
use super::structure::INSTRUMENTAL_BARS;
use crate::config::GenerationParams;
use crate::generators::rhythm::total_sub_beats;
use crate::generators::{
    ChordProgression, GeneratorContext, MelodyGenerator, RhythmGenerator, SongRng,
};
use crate::lyrics::{tokenize, LyricLine};
use crate::timing;

/// Rest between two lines of a block, in beats
pub const BREATH_BEATS: u64 = 1;

/// Minimum rest after a section's last note before rounding to the bar, in beats
pub const SECTION_GAP_BEATS: u64 = 2;

/// Assembles a [`SongTimeline`] from generation parameters
#[derive(Debug, Clone)]
pub struct SectionComposer {
    params: GenerationParams,
}

impl SectionComposer {
    pub fn new(params: GenerationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    fn context(&self) -> GeneratorContext {
        GeneratorContext {
            tempo: self.params.tempo_bpm(),
            time_signature: self.params.time_signature(),
            scale: self.params.scale().clone(),
            complexity: self.params.complexity(),
            vocal_range: self.params.vocal_range(),
        }
    }

    /// Compose the song. Each call owns a fresh RNG seeded from the
    /// parameters, so repeated calls give identical timelines.
    pub fn compose(&self) -> SongTimeline {
        let params = &self.params;
        let context = self.context();
        let time_signature = context.time_signature;
        let bar = time_signature.sub_beats_per_bar() as u64;
        let beat = time_signature.sub_beats_per_beat() as u64;

        let lyrics = tokenize(params.lyrics());
        let sections = params.structure().resolve(lyrics.blocks.len());

        let mut rng = SongRng::new(params.seed());
        let rhythm = RhythmGenerator::new(time_signature, context.complexity);
        let mut melody = MelodyGenerator::new(context.clone());
        let mut builder =
            TimelineBuilder::new(context.tempo, time_signature, params.scale().summary());

        let mut cursor = 0u64;
        for section in &sections {
            let section_start = cursor;

            match section.block.and_then(|index| lyrics.blocks.get(index)) {
                Some(block) => {
                    for (i, line) in block.lines.iter().enumerate() {
                        if i > 0 {
                            cursor += BREATH_BEATS * beat;
                        }
                        cursor = self.sing_line(line, cursor, &rhythm, &mut melody, &mut rng, &mut builder);
                    }
                    cursor += SECTION_GAP_BEATS * beat;
                }
                None => cursor += INSTRUMENTAL_BARS as u64 * bar,
            }

            let end = timing::round_up_to_bar(cursor, time_signature).max(section_start + bar);
            let bar_count = ((end - section_start) / bar) as u32;
            let placed = builder.push_section(section.name.clone(), bar_count);
            tracing::debug!(
                section = %placed.name,
                start_bar = placed.start_bar,
                bars = placed.bar_count,
                "section placed"
            );
            cursor = end;
        }

        let chords = ChordProgression::new(params.style(), params.scale().clone())
            .generate(builder.total_bars(), &mut rng);
        let timeline = builder.build(chords);

        tracing::info!(
            seed = params.seed(),
            sections = timeline.sections().len(),
            bars = timeline.total_bars(),
            notes = timeline.notes().len(),
            duration = timeline.total_duration_seconds(),
            "song composed"
        );
        timeline
    }

    /// Rhythm and melody for one line; returns the cursor after its last step
    fn sing_line(
        &self,
        line: &LyricLine,
        cursor: u64,
        rhythm: &RhythmGenerator,
        melody: &mut MelodyGenerator,
        rng: &mut SongRng,
        builder: &mut TimelineBuilder,
    ) -> u64 {
        let steps = rhythm.generate(line.tokens.len(), cursor, rng);
        let notes = melody.generate(&line.tokens, &steps, cursor, rng);
        tracing::debug!(tokens = line.tokens.len(), notes = notes.len(), start = cursor, "line sung");
        builder.push_notes(notes);
        cursor + total_sub_beats(&steps)
    }
}

/// Generate a song from parameters
pub fn generate(params: &GenerationParams) -> SongTimeline {
    SectionComposer::new(params.clone()).compose()
}
