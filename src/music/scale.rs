// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale and key system for melody and harmony generation.
//!
//! Provides note names, scale types, scale snapping (nearest member with a
//! fixed lower-pitch tie-break), octave folding into a vocal window, and
//! stepwise motion through a scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        Note::ALL.iter().position(|&n| n == self).unwrap_or(0) as u8
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse a note name ("C", "C#", "Db", "f#") or a pitch class ("0".."11")
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        if let Ok(pc) = s.parse::<u8>() {
            return (pc < 12).then(|| Note::from_pitch_class(pc));
        }
        match s.as_str() {
            "C" | "B#" | "BS" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Scale types supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    // Major scale and modes
    Major,        // Ionian
    Dorian,       // Minor with raised 6th
    Phrygian,     // Minor with lowered 2nd
    Lydian,       // Major with raised 4th
    Mixolydian,   // Major with lowered 7th
    NaturalMinor, // Aeolian

    // Other minor scales
    HarmonicMinor,
    MelodicMinor, // Ascending form

    // Pentatonic scales
    MajorPentatonic,
    MinorPentatonic,

    Blues,
}

impl ScaleType {
    /// Get the intervals (semitones from root) for this scale type
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleType::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleType::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleType::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleType::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            ScaleType::MajorPentatonic => &[0, 2, 4, 7, 9],
            ScaleType::MinorPentatonic => &[0, 3, 5, 7, 10],
            ScaleType::Blues => &[0, 3, 5, 6, 7, 10],
        }
    }

    /// Parse scale type from string
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" | "ionian" | "maj" => Some(ScaleType::Major),
            "dorian" => Some(ScaleType::Dorian),
            "phrygian" => Some(ScaleType::Phrygian),
            "lydian" => Some(ScaleType::Lydian),
            "mixolydian" => Some(ScaleType::Mixolydian),
            "minor" | "naturalminor" | "aeolian" | "min" => Some(ScaleType::NaturalMinor),
            "harmonicminor" => Some(ScaleType::HarmonicMinor),
            "melodicminor" => Some(ScaleType::MelodicMinor),
            "majorpentatonic" | "pentatonicmajor" | "pentatonic" => Some(ScaleType::MajorPentatonic),
            "minorpentatonic" | "pentatonicminor" => Some(ScaleType::MinorPentatonic),
            "blues" | "minorblues" => Some(ScaleType::Blues),
            _ => None,
        }
    }

    /// Get a machine-friendly name for this scale type
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Dorian => "dorian",
            ScaleType::Phrygian => "phrygian",
            ScaleType::Lydian => "lydian",
            ScaleType::Mixolydian => "mixolydian",
            ScaleType::NaturalMinor => "minor",
            ScaleType::HarmonicMinor => "harmonic_minor",
            ScaleType::MelodicMinor => "melodic_minor",
            ScaleType::MajorPentatonic => "major_pentatonic",
            ScaleType::MinorPentatonic => "minor_pentatonic",
            ScaleType::Blues => "blues",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A complete scale with root and type
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: Note,
    scale_type: ScaleType,
    /// Pitch classes in degree order, starting at the root
    members: Vec<u8>,
}

impl Scale {
    /// Create a new scale from root and type
    pub fn new(root: Note, scale_type: ScaleType) -> Self {
        let members = scale_type
            .intervals()
            .iter()
            .map(|&i| (root.pitch_class() + i) % 12)
            .collect();

        Self {
            root,
            scale_type,
            members,
        }
    }

    /// Parse a scale from strings (e.g., "C", "major")
    pub fn parse(root_str: &str, scale_str: &str) -> Option<Self> {
        let root = Note::from_name(root_str)?;
        let scale_type = ScaleType::from_name(scale_str)?;
        Some(Scale::new(root, scale_type))
    }

    /// Parse a scale, falling back to C major when either part is unrecognized
    pub fn parse_or_default(root_str: &str, scale_str: &str) -> Self {
        Self::parse(root_str, scale_str).unwrap_or_else(|| {
            tracing::warn!(
                tonic = root_str,
                mode = scale_str,
                "unrecognized key, falling back to C major"
            );
            Self::default()
        })
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the scale type
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Pitch classes of the scale in degree order
    pub fn members(&self) -> &[u8] {
        &self.members
    }

    /// Get the number of notes in this scale
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check if a MIDI pitch belongs to this scale
    pub fn contains_midi(&self, pitch: i32) -> bool {
        self.members.contains(&(pitch.rem_euclid(12) as u8))
    }

    /// Zero-based scale degree of a pitch class, if it is a member
    pub fn degree_of(&self, pitch: i32) -> Option<usize> {
        let pc = pitch.rem_euclid(12) as u8;
        self.members.iter().position(|&m| m == pc)
    }

    /// Pitch class of a zero-based degree, wrapping past the octave
    pub fn pitch_class_at(&self, degree: usize) -> u8 {
        self.members[degree % self.members.len()]
    }

    /// Snap a pitch to the nearest scale member.
    ///
    /// Candidates are taken from the pitch's own octave and the octaves
    /// directly above and below. On an exact tie the lower pitch wins.
    pub fn nearest_member(&self, pitch: i32) -> i32 {
        let base = pitch - pitch.rem_euclid(12);
        let mut best = pitch;
        let mut best_distance = i32::MAX;

        for octave in [-12, 0, 12] {
            for &member in &self.members {
                let candidate = base + octave + member as i32;
                let distance = (candidate - pitch).abs();
                if distance < best_distance || (distance == best_distance && candidate < best) {
                    best = candidate;
                    best_distance = distance;
                }
            }
        }

        best
    }

    /// Move a pitch by whole octaves until it lies in `[low, high]`.
    ///
    /// The window must span at least 11 semitones for every pitch class to
    /// have a representative inside it.
    pub fn fold_into_range(pitch: i32, low: i32, high: i32) -> i32 {
        let mut folded = pitch;
        while folded > high {
            folded -= 12;
        }
        while folded < low {
            folded += 12;
        }
        folded
    }

    /// Move a pitch by scale degrees (positive = up, negative = down).
    ///
    /// Pitches outside the scale are snapped first.
    pub fn step(&self, pitch: i32, degrees: i32) -> i32 {
        let snapped = self.nearest_member(pitch);
        let degree = self.degree_of(snapped).unwrap_or(0) as i32;
        let len = self.len() as i32;

        let target = degree + degrees;
        let octave_change = target.div_euclid(len);
        let new_pc = self.members[target.rem_euclid(len) as usize] as i32;
        let old_pc = self.members[degree as usize] as i32;

        // Interval from the current member up/down to the new one within the
        // scale's own octave ordering, which starts at the root.
        let root_pc = self.root.pitch_class() as i32;
        let rel_old = (old_pc - root_pc).rem_euclid(12);
        let rel_new = (new_pc - root_pc).rem_euclid(12);

        snapped + (rel_new - rel_old) + octave_change * 12
    }

    /// Summary carried by a generated timeline
    pub fn summary(&self) -> KeySummary {
        KeySummary {
            tonic_pitch_class: self.root.pitch_class(),
            tonic: self.root.to_string(),
            mode: self.scale_type.name().to_string(),
            members: self.members.clone(),
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::new(Note::C, ScaleType::Major)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale_type)
    }
}

/// Serializable key description attached to a song timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySummary {
    pub tonic_pitch_class: u8,
    pub tonic: String,
    pub mode: String,
    pub members: Vec<u8>,
}
