// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song timeline and its builder.
//!
//! A [`SongTimeline`] is only ever produced by [`TimelineBuilder::build`], so
//! consumers never see a half-assembled song. Sections are appended back to
//! back, which keeps them a partition of `[0, total_bars)`.

use serde::{Deserialize, Serialize};

use crate::generators::{ChordEvent, NoteEvent};
use crate::music::KeySummary;
use crate::timing::{self, TimeSignature};

/// A named, bar-bounded region of the song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start_bar: u32,
    pub bar_count: u32,
}

impl Section {
    /// First bar after this section
    pub fn end_bar(&self) -> u32 {
        self.start_bar + self.bar_count
    }
}

/// A fully generated song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongTimeline {
    tempo_bpm: f64,
    time_signature: TimeSignature,
    key: KeySummary,
    sections: Vec<Section>,
    chords: Vec<ChordEvent>,
    notes: Vec<NoteEvent>,
    total_duration_seconds: f64,
}

impl SongTimeline {
    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn key(&self) -> &KeySummary {
        &self.key
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// One chord per bar, indexed by bar
    pub fn chords(&self) -> &[ChordEvent] {
        &self.chords
    }

    /// Audible notes in start order
    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.total_duration_seconds
    }

    /// Bars covered by all sections
    pub fn total_bars(&self) -> u32 {
        self.sections.last().map(Section::end_bar).unwrap_or(0)
    }

    /// Length of one bar in seconds
    pub fn bar_duration_seconds(&self) -> f64 {
        timing::sub_beats_to_seconds(self.time_signature.sub_beats_per_bar() as u64, self.tempo_bpm)
    }

    /// Section containing a bar, if any
    pub fn section_at_bar(&self, bar: u32) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| bar >= s.start_bar && bar < s.end_bar())
    }

    /// The sung text, one syllable per lyric-carrying note
    pub fn lyric_syllables(&self) -> Vec<&str> {
        self.notes
            .iter()
            .filter(|n| !n.is_ornament && !n.lyric.is_empty())
            .map(|n| n.lyric.as_str())
            .collect()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Read back a timeline written by [`SongTimeline::to_json`]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Accumulates sections and notes while a song is composed
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    tempo_bpm: f64,
    time_signature: TimeSignature,
    key: KeySummary,
    sections: Vec<Section>,
    notes: Vec<NoteEvent>,
    total_bars: u32,
}

impl TimelineBuilder {
    pub fn new(tempo_bpm: f64, time_signature: TimeSignature, key: KeySummary) -> Self {
        Self {
            tempo_bpm,
            time_signature,
            key,
            sections: Vec::new(),
            notes: Vec::new(),
            total_bars: 0,
        }
    }

    /// Append a section directly after the previous one
    pub fn push_section(&mut self, name: impl Into<String>, bar_count: u32) -> &Section {
        let section = Section {
            name: name.into(),
            start_bar: self.total_bars,
            bar_count,
        };
        self.total_bars += bar_count;
        self.sections.push(section);
        &self.sections[self.sections.len() - 1]
    }

    /// Append notes. Callers hand them over in start order.
    pub fn push_notes(&mut self, notes: impl IntoIterator<Item = NoteEvent>) {
        for note in notes {
            debug_assert!(
                self.notes
                    .last()
                    .map_or(true, |prev| prev.start_time_seconds <= note.start_time_seconds),
                "notes must arrive in start order"
            );
            self.notes.push(note);
        }
    }

    pub fn total_bars(&self) -> u32 {
        self.total_bars
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Finish the song. `chords` must hold one chord per bar.
    pub fn build(self, chords: Vec<ChordEvent>) -> SongTimeline {
        debug_assert_eq!(chords.len(), self.total_bars as usize);

        let total_duration_seconds = match self.notes.last() {
            Some(last) => last.end_time_seconds(),
            None => {
                let bar = self.time_signature.sub_beats_per_bar() as u64;
                timing::sub_beats_to_seconds(self.total_bars as u64 * bar, self.tempo_bpm)
            }
        };

        SongTimeline {
            tempo_bpm: self.tempo_bpm,
            time_signature: self.time_signature,
            key: self.key,
            sections: self.sections,
            chords,
            notes: self.notes,
            total_duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Scale;

    fn note(start: f64, duration: f64, lyric: &str) -> NoteEvent {
        NoteEvent {
            start_time_seconds: start,
            duration_seconds: duration,
            pitch_midi: 64,
            lyric: lyric.to_string(),
            velocity: 0.8,
            is_ornament: false,
        }
    }

    fn chords(scale: &Scale, bars: u32) -> Vec<ChordEvent> {
        (0..bars).map(|b| ChordEvent::on_degree(b, scale, 0)).collect()
    }

    #[test]
    fn test_sections_are_contiguous() {
        let scale = Scale::default();
        let mut builder = TimelineBuilder::new(120.0, TimeSignature::default(), scale.summary());
        assert_eq!(builder.push_section("A", 2).start_bar, 0);
        assert_eq!(builder.push_section("B", 3).start_bar, 2);
        assert_eq!(builder.push_section("A", 1).start_bar, 5);
        assert_eq!(builder.total_bars(), 6);

        let timeline = builder.build(chords(&scale, 6));
        assert_eq!(timeline.total_bars(), 6);
        assert_eq!(timeline.section_at_bar(4).map(|s| s.name.as_str()), Some("B"));
        assert!(timeline.section_at_bar(6).is_none());
    }

    #[test]
    fn test_duration_is_last_note_end() {
        let scale = Scale::default();
        let mut builder = TimelineBuilder::new(120.0, TimeSignature::default(), scale.summary());
        builder.push_section("A", 1);
        builder.push_notes(vec![note(0.0, 0.5, "la"), note(0.5, 0.25, "la")]);
        let timeline = builder.build(chords(&scale, 1));
        assert_eq!(timeline.total_duration_seconds(), 0.75);
        assert_eq!(timeline.lyric_syllables(), vec!["la", "la"]);
    }

    #[test]
    fn test_duration_without_notes_is_bar_boundary() {
        let scale = Scale::default();
        let ts = TimeSignature::new(3, 4).unwrap();
        let mut builder = TimelineBuilder::new(120.0, ts, scale.summary());
        builder.push_section("intro", 2);
        let timeline = builder.build(chords(&scale, 2));
        // Two bars of 3/4 at 120 BPM
        assert_eq!(timeline.total_duration_seconds(), 3.0);
        assert_eq!(timeline.bar_duration_seconds(), 1.5);
    }

    #[test]
    fn test_json_round_trip() {
        let scale = Scale::default();
        let mut builder = TimelineBuilder::new(96.0, TimeSignature::default(), scale.summary());
        builder.push_section("A", 1);
        builder.push_notes(vec![note(0.0, 0.625, "hi")]);
        let timeline = builder.build(chords(&scale, 1));

        let json = timeline.to_json().unwrap();
        assert!(json.contains("\"total_duration_seconds\""));
        assert_eq!(SongTimeline::from_json(&json).unwrap(), timeline);
    }
}
