// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song structure templates.
//!
//! A structure is an ordered list of section labels such as `A A B A`,
//! `1 2 1`, or `intro verse chorus verse outro`. Labels are resolved against
//! the lyric blocks actually available, so every label maps to something
//! playable.

use std::fmt;

/// Bars given to an instrumental (intro/outro) section
pub const INSTRUMENTAL_BARS: u32 = 2;

/// What a structure label asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Lyric block by letter (A = 0)
    Letter(usize),
    /// Lyric block by 1-based number
    Number(usize),
    /// Verse: first block
    Verse,
    /// Chorus: second block if present
    Chorus,
    /// Bridge: third block if present
    Bridge,
    /// Harmony only, no lyrics
    Instrumental,
}

/// One label of a structure template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureLabel {
    /// The label as written (used as the section name)
    pub name: String,
    pub kind: LabelKind,
}

impl StructureLabel {
    fn parse(word: &str) -> Vec<Self> {
        let lower = word.to_lowercase();
        let named = match lower.as_str() {
            "verse" => Some(LabelKind::Verse),
            "chorus" | "refrain" => Some(LabelKind::Chorus),
            "bridge" => Some(LabelKind::Bridge),
            "intro" | "outro" | "interlude" | "instrumental" => Some(LabelKind::Instrumental),
            _ => None,
        };
        if let Some(kind) = named {
            return vec![Self { name: lower, kind }];
        }

        if let Ok(n) = word.parse::<usize>() {
            return vec![Self {
                name: word.to_string(),
                kind: LabelKind::Number(n),
            }];
        }

        // "A", or a compact run like "AABA"
        if word.chars().all(|c| c.is_ascii_alphabetic())
            && (word.len() == 1 || word.chars().all(|c| c.is_ascii_uppercase()))
        {
            return word
                .chars()
                .map(|c| {
                    let upper = c.to_ascii_uppercase();
                    Self {
                        name: upper.to_string(),
                        kind: LabelKind::Letter((upper as u8 - b'A') as usize),
                    }
                })
                .collect();
        }

        tracing::warn!(label = word, "unknown structure label, using the first lyric block");
        vec![Self {
            name: word.to_string(),
            kind: LabelKind::Letter(0),
        }]
    }
}

/// A section after its label has been matched to the available lyric blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSection {
    pub name: String,
    /// Lyric block to sing, or None for an instrumental section
    pub block: Option<usize>,
}

/// Ordered section labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    labels: Vec<StructureLabel>,
}

impl Structure {
    /// Parse a template. Labels are separated by whitespace or commas.
    /// An empty template means a single `A`.
    pub fn parse(template: &str) -> Self {
        let labels: Vec<StructureLabel> = template
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .flat_map(StructureLabel::parse)
            .collect();

        if labels.is_empty() {
            return Self::default();
        }
        Self { labels }
    }

    pub fn labels(&self) -> &[StructureLabel] {
        &self.labels
    }

    /// Match every label to a lyric block index in `0..block_count`
    pub fn resolve(&self, block_count: usize) -> Vec<ResolvedSection> {
        let count = block_count.max(1);
        let pick = |index: usize| if index < count { index } else { 0 };

        self.labels
            .iter()
            .map(|label| {
                let block = match label.kind {
                    LabelKind::Letter(index) => Some(pick(index)),
                    LabelKind::Number(n) => Some(n.max(1).min(count) - 1),
                    LabelKind::Verse => Some(0),
                    LabelKind::Chorus => Some(pick(1)),
                    LabelKind::Bridge => Some(pick(2)),
                    LabelKind::Instrumental => None,
                };
                ResolvedSection {
                    name: label.name.clone(),
                    block,
                }
            })
            .collect()
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self {
            labels: vec![StructureLabel {
                name: "A".to_string(),
                kind: LabelKind::Letter(0),
            }],
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.labels.iter().map(|l| l.name.as_str()).collect();
        write!(f, "{}", names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(structure: &str, count: usize) -> Vec<Option<usize>> {
        Structure::parse(structure)
            .resolve(count)
            .into_iter()
            .map(|s| s.block)
            .collect()
    }

    #[test]
    fn test_letters() {
        assert_eq!(blocks("A A B A", 2), vec![Some(0), Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_missing_b_reuses_first_block() {
        assert_eq!(blocks("A B", 1), vec![Some(0), Some(0)]);
        assert_eq!(blocks("C", 2), vec![Some(0)]);
    }

    #[test]
    fn test_compact_letters() {
        assert_eq!(blocks("AABA", 2), vec![Some(0), Some(0), Some(1), Some(0)]);
        let names: Vec<String> = Structure::parse("AB")
            .labels()
            .iter()
            .map(|l| l.name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_numbers_are_clamped() {
        assert_eq!(blocks("1 2 3 9 0", 3), vec![Some(0), Some(1), Some(2), Some(2), Some(0)]);
    }

    #[test]
    fn test_named_sections() {
        assert_eq!(
            blocks("intro verse chorus bridge outro", 2),
            vec![None, Some(0), Some(1), Some(0), None]
        );
        assert_eq!(blocks("Verse, Chorus", 3), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_empty_structure_is_single_a() {
        assert_eq!(Structure::parse(""), Structure::default());
        assert_eq!(Structure::parse("  , "), Structure::default());
        assert_eq!(Structure::default().to_string(), "A");
    }

    #[test]
    fn test_unknown_word_uses_first_block() {
        assert_eq!(blocks("hook", 3), vec![Some(0)]);
    }

    #[test]
    fn test_zero_blocks_treated_as_one() {
        assert_eq!(blocks("B 2", 0), vec![Some(0), Some(0)]);
    }
}
