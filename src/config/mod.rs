// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for lyricseq.
//!
//! Song files are YAML or TOML, chosen by extension. A file holds the song
//! parameters and the export settings; [`GenerationParams`] is the validated
//! form the composer consumes.

pub mod params;
pub mod watcher;

pub use params::GenerationParams;
pub use watcher::{is_song_file, validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use params::{default_vocal_center, default_vocal_range};

/// Root of a song file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SongFile {
    /// Generation settings
    pub song: SongConfig,
    /// Binary file settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl SongFile {
    /// Load a song file. `.toml` files are read as TOML, anything else as
    /// YAML. A `lyrics_file` is read relative to the song file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read song file: {:?}", path))?;

        let mut file = if has_extension(path, &["toml"]) {
            Self::from_toml(&contents)?
        } else {
            Self::from_yaml(&contents)?
        };

        if let Some(lyrics_file) = &file.song.lyrics_file {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let lyrics_path = base.join(lyrics_file);
            file.song.lyrics = fs::read_to_string(&lyrics_path)
                .with_context(|| format!("Failed to read lyrics file: {:?}", lyrics_path))?;
        }

        Ok(file)
    }

    /// Parse a song file from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML song file")
    }

    /// Parse a song file from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        toml::from_str(toml).context("Failed to parse TOML song file")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize song file to YAML")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize song file to TOML")
    }

    /// Save, choosing the format from the extension like [`SongFile::load`]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if has_extension(path, &["toml"]) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, text).with_context(|| format!("Failed to write song file: {:?}", path))
    }

    /// Validated generation parameters for this song
    pub fn params(&self) -> GenerationParams {
        GenerationParams::from_config(&self.song)
    }
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Song generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongConfig {
    /// Song title
    #[serde(default = "default_title")]
    pub title: String,
    /// Lyric text; blank lines separate blocks
    #[serde(default)]
    pub lyrics: String,
    /// Lyric text file, relative to the song file (replaces `lyrics`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics_file: Option<String>,
    /// RNG seed (0 becomes 1)
    #[serde(default = "default_seed")]
    pub seed: u32,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Time signature as "N/D"
    #[serde(default = "default_time_signature")]
    pub time_signature: String,
    /// Key tonic (e.g., "C", "F#", "Bb")
    #[serde(default = "default_key")]
    pub key: String,
    /// Mode (e.g., "major", "minor", "dorian")
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Complexity (0.0 - 1.0)
    #[serde(default = "default_complexity")]
    pub complexity: f64,
    /// Vocal window width in semitones
    #[serde(default = "default_vocal_range")]
    pub vocal_range: u8,
    /// Vocal window centre as a MIDI note
    #[serde(default = "default_vocal_center")]
    pub vocal_center: u8,
    /// Chord progression style
    #[serde(default = "default_style")]
    pub style: String,
    /// Section order (e.g., "A A B A")
    #[serde(default = "default_structure")]
    pub structure: String,
}

fn default_title() -> String {
    "Untitled".to_string()
}
fn default_seed() -> u32 {
    1
}
fn default_tempo() -> f64 {
    params::DEFAULT_TEMPO
}
fn default_time_signature() -> String {
    "4/4".to_string()
}
fn default_key() -> String {
    "C".to_string()
}
fn default_mode() -> String {
    "major".to_string()
}
fn default_complexity() -> f64 {
    params::DEFAULT_COMPLEXITY
}
fn default_style() -> String {
    "pop".to_string()
}
fn default_structure() -> String {
    "A".to_string()
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            lyrics: String::new(),
            lyrics_file: None,
            seed: default_seed(),
            tempo: default_tempo(),
            time_signature: default_time_signature(),
            key: default_key(),
            mode: default_mode(),
            complexity: default_complexity(),
            vocal_range: default_vocal_range(),
            vocal_center: default_vocal_center(),
            style: default_style(),
            structure: default_structure(),
        }
    }
}

/// Binary file settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExportConfig {
    /// General MIDI program (0-127)
    #[serde(default)]
    pub program: u8,
    /// MIDI channel (0-15)
    #[serde(default)]
    pub channel: u8,
    /// Emit lyric meta events before note-ons
    #[serde(default)]
    pub lyric_events: bool,
}
