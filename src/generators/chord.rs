// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord generator for harmonic progressions.
//!
//! Produces one chord per bar, either by cycling a fixed scale-degree
//! template or by a random walk over degrees. Each degree is stacked into a
//! triad from the scale (degree, degree + 2, degree + 4) and labelled major
//! or minor from its root-to-third interval.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::SongRng;
use crate::music::scale::Scale;

/// Roman numerals for scale degrees (up to eight-note scales)
const NUMERALS: [&str; 8] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII"];

/// Progression template selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStyle {
    /// I-V-vi-IV
    Pop,
    /// I-vi-IV-V
    Ballad,
    /// ii-V-I-I
    Jazz,
    /// I-IV-I-V
    Folk,
    /// I-V-vi-iii-IV-I-IV-V
    Canon,
    /// Twelve-bar blues
    Blues,
    /// Random walk over scale degrees
    Random,
}

impl ProgressionStyle {
    /// Zero-based scale degrees for template styles
    pub fn template(self) -> Option<&'static [usize]> {
        match self {
            ProgressionStyle::Pop => Some(&[0, 4, 5, 3]),
            ProgressionStyle::Ballad => Some(&[0, 5, 3, 4]),
            ProgressionStyle::Jazz => Some(&[1, 4, 0, 0]),
            ProgressionStyle::Folk => Some(&[0, 3, 0, 4]),
            ProgressionStyle::Canon => Some(&[0, 4, 5, 2, 3, 0, 3, 4]),
            ProgressionStyle::Blues => Some(&[0, 0, 0, 0, 3, 3, 0, 0, 4, 3, 0, 4]),
            ProgressionStyle::Random => None,
        }
    }

    /// Parse a style name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pop" => Some(ProgressionStyle::Pop),
            "ballad" => Some(ProgressionStyle::Ballad),
            "jazz" => Some(ProgressionStyle::Jazz),
            "folk" => Some(ProgressionStyle::Folk),
            "canon" => Some(ProgressionStyle::Canon),
            "blues" => Some(ProgressionStyle::Blues),
            "random" => Some(ProgressionStyle::Random),
            _ => None,
        }
    }

    /// Parse, falling back to pop for unknown names
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            tracing::warn!(style = s, "unknown progression style, falling back to pop");
            Self::default()
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ProgressionStyle::Pop => "pop",
            ProgressionStyle::Ballad => "ballad",
            ProgressionStyle::Jazz => "jazz",
            ProgressionStyle::Folk => "folk",
            ProgressionStyle::Canon => "canon",
            ProgressionStyle::Blues => "blues",
            ProgressionStyle::Random => "random",
        }
    }
}

impl Default for ProgressionStyle {
    fn default() -> Self {
        ProgressionStyle::Pop
    }
}

impl fmt::Display for ProgressionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Triad quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
}

impl ChordQuality {
    /// Three semitones from root to third is minor; anything else is major
    pub fn from_third(root: u8, third: u8) -> Self {
        if (third as i16 - root as i16).rem_euclid(12) == 3 {
            ChordQuality::Minor
        } else {
            ChordQuality::Major
        }
    }
}

/// Chord sounding for one bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Bar this chord covers (contiguous from 0)
    pub bar_index: u32,
    /// Roman numeral, lowercase for minor
    pub roman_or_name: String,
    /// Root, third, fifth pitch classes
    pub pitch_classes: [u8; 3],
    pub quality: ChordQuality,
}

impl ChordEvent {
    /// Build the triad on a zero-based scale degree
    pub fn on_degree(bar_index: u32, scale: &Scale, degree: usize) -> Self {
        let degree = degree % scale.len();
        let root = scale.pitch_class_at(degree);
        let third = scale.pitch_class_at(degree + 2);
        let fifth = scale.pitch_class_at(degree + 4);
        let quality = ChordQuality::from_third(root, third);

        let numeral = NUMERALS[degree % NUMERALS.len()];
        let roman_or_name = match quality {
            ChordQuality::Major => numeral.to_string(),
            ChordQuality::Minor => numeral.to_lowercase(),
        };

        Self {
            bar_index,
            roman_or_name,
            pitch_classes: [root, third, fifth],
            quality,
        }
    }
}

/// Chord progression generator
#[derive(Debug, Clone)]
pub struct ChordProgression {
    style: ProgressionStyle,
    scale: Scale,
}

impl ChordProgression {
    /// Create a progression generator
    pub fn new(style: ProgressionStyle, scale: Scale) -> Self {
        Self { style, scale }
    }

    pub fn style(&self) -> ProgressionStyle {
        self.style
    }

    /// Generate exactly one chord per bar for `bar_count` bars
    pub fn generate(&self, bar_count: u32, rng: &mut SongRng) -> Vec<ChordEvent> {
        let degrees = match self.style.template() {
            Some(template) => (0..bar_count as usize)
                .map(|bar| template[bar % template.len()])
                .collect(),
            None => self.random_walk(bar_count, rng),
        };

        degrees
            .into_iter()
            .enumerate()
            .map(|(bar, degree)| ChordEvent::on_degree(bar as u32, &self.scale, degree))
            .collect()
    }

    /// Start on the tonic, wander by up to three degrees per bar, and come
    /// home on the final bar
    fn random_walk(&self, bar_count: u32, rng: &mut SongRng) -> Vec<usize> {
        let len = self.scale.len() as i32;
        let mut degree = 0i32;
        let mut degrees = Vec::with_capacity(bar_count as usize);

        for bar in 0..bar_count {
            if bar > 0 {
                degree = (degree + rng.gen_range(-3..=3)).rem_euclid(len);
            }
            if bar_count > 1 && bar == bar_count - 1 {
                degree = 0;
            }
            degrees.push(degree as usize);
        }

        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::{Note, ScaleType};

    #[test]
    fn test_pop_progression_in_c() {
        let prog = ChordProgression::new(ProgressionStyle::Pop, Scale::default());
        let chords = prog.generate(4, &mut SongRng::new(1));
        let names: Vec<&str> = chords.iter().map(|c| c.roman_or_name.as_str()).collect();
        assert_eq!(names, vec!["I", "V", "vi", "IV"]);
        assert_eq!(chords[0].pitch_classes, [0, 4, 7]);
        assert_eq!(chords[2].pitch_classes, [9, 0, 4]);
        assert_eq!(chords[2].quality, ChordQuality::Minor);
    }

    #[test]
    fn test_one_chord_per_bar() {
        for style in [
            ProgressionStyle::Pop,
            ProgressionStyle::Canon,
            ProgressionStyle::Blues,
            ProgressionStyle::Random,
        ] {
            let prog = ChordProgression::new(style, Scale::default());
            let chords = prog.generate(37, &mut SongRng::new(9));
            assert_eq!(chords.len(), 37);
            for (i, chord) in chords.iter().enumerate() {
                assert_eq!(chord.bar_index, i as u32);
            }
        }
    }

    #[test]
    fn test_minor_key_qualities() {
        // A minor: i ii(dim, minor third) III iv v VI VII
        let scale = Scale::new(Note::A, ScaleType::NaturalMinor);
        let tonic = ChordEvent::on_degree(0, &scale, 0);
        assert_eq!(tonic.roman_or_name, "i");
        assert_eq!(tonic.pitch_classes, [9, 0, 4]);

        let mediant = ChordEvent::on_degree(0, &scale, 2);
        assert_eq!(mediant.roman_or_name, "III");
        assert_eq!(mediant.quality, ChordQuality::Major);
    }

    #[test]
    fn test_random_walk_resolves_and_is_deterministic() {
        let prog = ChordProgression::new(ProgressionStyle::Random, Scale::default());
        let a = prog.generate(16, &mut SongRng::new(21));
        let b = prog.generate(16, &mut SongRng::new(21));
        assert_eq!(a, b);
        assert_eq!(a[0].roman_or_name, "I");
        assert_eq!(a[15].roman_or_name, "I");
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(ProgressionStyle::from_name("Jazz"), Some(ProgressionStyle::Jazz));
        assert_eq!(ProgressionStyle::from_name("polka"), None);
        assert_eq!(ProgressionStyle::parse_or_default("polka"), ProgressionStyle::Pop);
    }

    #[test]
    fn test_zero_bars() {
        let prog = ChordProgression::new(ProgressionStyle::Pop, Scale::default());
        assert!(prog.generate(0, &mut SongRng::new(1)).is_empty());
    }
}
