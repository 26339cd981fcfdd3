// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Validated generation parameters.
//!
//! Every setter clamps or falls back instead of failing, so any input,
//! including raw user text, produces a usable parameter set.

use super::SongConfig;
use crate::arrangement::Structure;
use crate::generators::{
    ProgressionStyle, VocalRange, DEFAULT_VOCAL_CENTER, DEFAULT_VOCAL_RANGE,
};
use crate::generators::rng::FALLBACK_SEED;
use crate::music::Scale;
use crate::timing::TimeSignature;

/// Slowest accepted tempo
pub const MIN_TEMPO: f64 = 20.0;

/// Fastest accepted tempo
pub const MAX_TEMPO: f64 = 300.0;

/// Tempo used when none (or an unusable one) is given
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Complexity used when none (or an unusable one) is given
pub const DEFAULT_COMPLEXITY: f64 = 0.5;

/// Everything one generation run depends on
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    lyrics: String,
    seed: u32,
    tempo_bpm: f64,
    time_signature: TimeSignature,
    scale: Scale,
    complexity: f64,
    vocal_range: VocalRange,
    style: ProgressionStyle,
    structure: Structure,
}

impl GenerationParams {
    /// Defaults: seed 1, 120 BPM, 4/4, C major, complexity 0.5, pop, `A`
    pub fn new(lyrics: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
            seed: FALLBACK_SEED,
            tempo_bpm: DEFAULT_TEMPO,
            time_signature: TimeSignature::default(),
            scale: Scale::default(),
            complexity: DEFAULT_COMPLEXITY,
            vocal_range: VocalRange::default(),
            style: ProgressionStyle::default(),
            structure: Structure::default(),
        }
    }

    /// Build from a song file section, logging every fallback
    pub fn from_config(config: &SongConfig) -> Self {
        Self::new(config.lyrics.clone())
            .with_seed(config.seed)
            .with_tempo(config.tempo)
            .with_time_signature(&config.time_signature)
            .with_key(&config.key, &config.mode)
            .with_complexity(config.complexity)
            .with_vocal_range(config.vocal_center, config.vocal_range)
            .with_style(&config.style)
            .with_structure(&config.structure)
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = lyrics.into();
        self
    }

    /// Seed 0 would lock xorshift at zero; it becomes 1
    pub fn with_seed(mut self, seed: u32) -> Self {
        if seed == 0 {
            tracing::warn!("seed 0 is not usable, using {}", FALLBACK_SEED);
        }
        self.seed = if seed == 0 { FALLBACK_SEED } else { seed };
        self
    }

    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo_bpm = if bpm.is_finite() {
            let clamped = bpm.clamp(MIN_TEMPO, MAX_TEMPO);
            if clamped != bpm {
                tracing::warn!(tempo = bpm, clamped, "tempo out of range");
            }
            clamped
        } else {
            tracing::warn!(tempo = bpm, "tempo is not a number, using {}", DEFAULT_TEMPO);
            DEFAULT_TEMPO
        };
        self
    }

    pub fn with_time_signature(mut self, signature: &str) -> Self {
        self.time_signature = TimeSignature::parse_or_default(signature);
        self
    }

    pub fn with_key(mut self, tonic: &str, mode: &str) -> Self {
        self.scale = Scale::parse_or_default(tonic, mode);
        self
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = if complexity.is_finite() {
            let clamped = complexity.clamp(0.0, 1.0);
            if clamped != complexity {
                tracing::warn!(complexity, clamped, "complexity out of range");
            }
            clamped
        } else {
            tracing::warn!(complexity, "complexity is not a number, using {}", DEFAULT_COMPLEXITY);
            DEFAULT_COMPLEXITY
        };
        self
    }

    /// Window of `width` semitones (clamped to 12-48) around `center`
    pub fn with_vocal_range(mut self, center: u8, width: u8) -> Self {
        let range = VocalRange::around(center, width);
        if range.width() != width as i32 || range.center() != center as i32 {
            tracing::warn!(
                center,
                width,
                low = range.low,
                high = range.high,
                "vocal range adjusted"
            );
        }
        self.vocal_range = range;
        self
    }

    pub fn with_style(mut self, style: &str) -> Self {
        self.style = ProgressionStyle::parse_or_default(style);
        self
    }

    pub fn with_structure(mut self, structure: &str) -> Self {
        if structure.trim().is_empty() {
            tracing::warn!("empty structure, using a single A section");
        }
        self.structure = Structure::parse(structure);
        self
    }

    pub fn lyrics(&self) -> &str {
        &self.lyrics
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    pub fn vocal_range(&self) -> VocalRange {
        self.vocal_range
    }

    pub fn style(&self) -> ProgressionStyle {
        self.style
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new("")
    }
}

/// Vocal window defaults as config values
pub(crate) fn default_vocal_center() -> u8 {
    DEFAULT_VOCAL_CENTER
}

pub(crate) fn default_vocal_range() -> u8 {
    DEFAULT_VOCAL_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Note, ScaleType};

    #[test]
    fn test_defaults() {
        let params = GenerationParams::new("la");
        assert_eq!(params.seed(), 1);
        assert_eq!(params.tempo_bpm(), 120.0);
        assert_eq!(params.time_signature(), TimeSignature::default());
        assert_eq!(params.scale(), &Scale::default());
        assert_eq!(params.complexity(), 0.5);
        assert_eq!(params.vocal_range(), VocalRange::default());
        assert_eq!(params.style(), ProgressionStyle::Pop);
        assert_eq!(params.structure(), &Structure::default());
    }

    #[test]
    fn test_clamping() {
        let params = GenerationParams::new("")
            .with_seed(0)
            .with_tempo(1000.0)
            .with_complexity(-3.0)
            .with_vocal_range(60, 2);
        assert_eq!(params.seed(), 1);
        assert_eq!(params.tempo_bpm(), MAX_TEMPO);
        assert_eq!(params.complexity(), 0.0);
        assert_eq!(params.vocal_range().width(), 12);
    }

    #[test]
    fn test_non_finite_values_fall_back() {
        let params = GenerationParams::new("")
            .with_tempo(f64::NAN)
            .with_complexity(f64::INFINITY);
        assert_eq!(params.tempo_bpm(), DEFAULT_TEMPO);
        assert_eq!(params.complexity(), DEFAULT_COMPLEXITY);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let params = GenerationParams::new("")
            .with_key("H", "klingon")
            .with_style("polka")
            .with_time_signature("seven");
        assert_eq!(params.scale(), &Scale::default());
        assert_eq!(params.style(), ProgressionStyle::Pop);
        assert_eq!(params.time_signature(), TimeSignature::default());
    }

    #[test]
    fn test_from_config() {
        let config = SongConfig {
            lyrics: "hello world".to_string(),
            seed: 7,
            tempo: 90.0,
            time_signature: "3/4".to_string(),
            key: "D".to_string(),
            mode: "dorian".to_string(),
            complexity: 0.8,
            vocal_range: 20,
            vocal_center: 60,
            style: "ballad".to_string(),
            structure: "A B".to_string(),
            ..Default::default()
        };
        let params = GenerationParams::from_config(&config);
        assert_eq!(params.lyrics(), "hello world");
        assert_eq!(params.seed(), 7);
        assert_eq!(params.tempo_bpm(), 90.0);
        assert_eq!(params.time_signature().beats_per_bar, 3);
        assert_eq!(params.scale(), &Scale::new(Note::D, ScaleType::Dorian));
        assert_eq!(params.vocal_range(), VocalRange { low: 50, high: 70 });
        assert_eq!(params.style(), ProgressionStyle::Ballad);
        assert_eq!(params.structure().labels().len(), 2);
    }
}
