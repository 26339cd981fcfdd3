// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lyric tokenizer.
//!
//! Splits raw lyric text into blocks (separated by blank lines), lines, and
//! sung tokens. Lines containing whitespace are split into words; dense
//! scripts without spaces are split per character, with modifier characters
//! (combining marks, dependent vowel signs, small kana, and similar) merged
//! onto the unit before them.

use serde::{Deserialize, Serialize};

/// Token used when the input has nothing singable
pub const PLACEHOLDER: &str = "la";

/// One sung unit of lyric text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    fn placeholder() -> Self {
        Self::new(PLACEHOLDER)
    }
}

/// A lyric line: an ordered, non-empty list of tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub tokens: Vec<Token>,
}

impl LyricLine {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Consecutive non-blank lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricBlock {
    pub lines: Vec<LyricLine>,
}

/// Tokenized lyrics. Always holds at least one block with one line and one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub blocks: Vec<LyricBlock>,
}

impl Lyrics {
    /// Total number of tokens across all blocks
    pub fn token_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(LyricLine::len)
            .sum()
    }

    /// Whether the lyrics are just the fallback token
    pub fn is_placeholder(&self) -> bool {
        self.blocks.len() == 1
            && self.blocks[0].lines.len() == 1
            && self.blocks[0].lines[0].tokens == vec![Token::placeholder()]
    }
}

/// How a line is split into tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Words separated by whitespace
    WordDelimited,
    /// Dense script without spaces, split per character
    CharacterGrouped,
}

impl ScriptKind {
    /// Judge a (trimmed) line's script
    pub fn detect(line: &str) -> Self {
        if line.trim().chars().any(char::is_whitespace) {
            ScriptKind::WordDelimited
        } else if line.chars().any(is_dense_script) {
            ScriptKind::CharacterGrouped
        } else {
            // A single Latin word
            ScriptKind::WordDelimited
        }
    }
}

/// Tokenize raw lyric text
pub fn tokenize(text: &str) -> Lyrics {
    let mut blocks = Vec::new();
    let mut current: Vec<LyricLine> = Vec::new();

    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(LyricBlock {
                    lines: std::mem::take(&mut current),
                });
            }
            continue;
        }

        let tokens = tokenize_line(raw_line);
        if !tokens.is_empty() {
            current.push(LyricLine { tokens });
        }
    }

    if !current.is_empty() {
        blocks.push(LyricBlock { lines: current });
    }

    if blocks.is_empty() {
        tracing::debug!("no singable lyric text, using placeholder token");
        blocks.push(LyricBlock {
            lines: vec![LyricLine {
                tokens: vec![Token::placeholder()],
            }],
        });
    }

    Lyrics { blocks }
}

/// Tokenize a single line. May return an empty list for punctuation-only input.
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let line = line.trim();
    match ScriptKind::detect(line) {
        ScriptKind::WordDelimited => line
            .split_whitespace()
            .flat_map(split_word)
            .collect(),
        ScriptKind::CharacterGrouped => group_characters(line),
    }
}

/// Strip punctuation from a whitespace-delimited word. Dense-script runs
/// inside a mixed line are grouped per character.
fn split_word(word: &str) -> Vec<Token> {
    if word.chars().any(is_dense_script) {
        return group_characters(word);
    }

    let stripped = strip_punctuation(word);
    if stripped.is_empty() {
        Vec::new()
    } else {
        vec![Token::new(stripped)]
    }
}

/// Drop punctuation, keeping apostrophes and hyphens between letters
fn strip_punctuation(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || is_modifier(c) {
            out.push(c);
        } else if matches!(c, '\'' | '\u{2019}' | '-') {
            let before = i > 0 && chars[i - 1].is_alphanumeric();
            let after = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if before && after {
                out.push(c);
            }
        }
    }

    out
}

/// Split a dense-script run into per-character units, attaching modifiers
fn group_characters(text: &str) -> Vec<Token> {
    let mut units: Vec<String> = Vec::new();

    for c in text.chars() {
        if is_modifier(c) {
            match units.last_mut() {
                Some(last) => last.push(c),
                // A leading modifier has nothing to attach to; drop it
                None => continue,
            }
        } else if c.is_alphanumeric() {
            units.push(c.to_string());
        }
    }

    units.into_iter().map(Token::new).collect()
}

/// Characters that never stand alone as a sung unit
pub fn is_modifier(c: char) -> bool {
    matches!(c,
        // Combining diacritical marks
        '\u{0300}'..='\u{036F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        // Devanagari signs and dependent vowels
        | '\u{0900}'..='\u{0903}'
        | '\u{093A}'..='\u{094F}'
        | '\u{0951}'..='\u{0957}'
        | '\u{0962}'..='\u{0963}'
        // Thai vowel signs and tone marks
        | '\u{0E31}'
        | '\u{0E33}'..='\u{0E3A}'
        | '\u{0E47}'..='\u{0E4E}'
        // Kana voicing marks, small kana, prolonged sound mark
        | '\u{3099}'..='\u{309C}'
        | '\u{3041}' | '\u{3043}' | '\u{3045}' | '\u{3047}' | '\u{3049}'
        | '\u{3063}' | '\u{3083}' | '\u{3085}' | '\u{3087}' | '\u{308E}'
        | '\u{30A1}' | '\u{30A3}' | '\u{30A5}' | '\u{30A7}' | '\u{30A9}'
        | '\u{30C3}' | '\u{30E3}' | '\u{30E5}' | '\u{30E7}' | '\u{30EE}'
        | '\u{30FC}'
        // Variation selectors and zero-width joiner
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{200D}'
    )
}

/// Scripts conventionally written without spaces between words
fn is_dense_script(c: char) -> bool {
    matches!(c,
        '\u{0E00}'..='\u{0E7F}'     // Thai
        | '\u{0E80}'..='\u{0EFF}'   // Lao
        | '\u{1000}'..='\u{109F}'   // Myanmar
        | '\u{1780}'..='\u{17FF}'   // Khmer
        | '\u{3040}'..='\u{30FF}'   // Hiragana, Katakana
        | '\u{3400}'..='\u{4DBF}'   // CJK extension A
        | '\u{4E00}'..='\u{9FFF}'   // CJK unified ideographs
        | '\u{AC00}'..='\u{D7AF}'   // Hangul syllables
        | '\u{F900}'..='\u{FAFF}'   // CJK compatibility ideographs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_latin_words() {
        let tokens = tokenize_line("Hello, world! Don't stop-ing.");
        assert_eq!(texts(&tokens), vec!["Hello", "world", "Don't", "stop-ing"]);
    }

    #[test]
    fn test_punctuation_only_words_are_dropped() {
        let tokens = tokenize_line("la -- la ... la");
        assert_eq!(texts(&tokens), vec!["la", "la", "la"]);
    }

    #[test]
    fn test_blocks_split_on_blank_lines() {
        let lyrics = tokenize("one two\nthree four\n\n\nfive six\n");
        assert_eq!(lyrics.blocks.len(), 2);
        assert_eq!(lyrics.blocks[0].lines.len(), 2);
        assert_eq!(lyrics.blocks[1].lines.len(), 1);
        assert_eq!(lyrics.token_count(), 6);
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        for input in ["", "\n\n", "   ", "?!"] {
            let lyrics = tokenize(input);
            assert!(lyrics.is_placeholder(), "input {:?}", input);
            assert_eq!(lyrics.token_count(), 1);
            assert_eq!(lyrics.blocks[0].lines[0].tokens[0].text, PLACEHOLDER);
        }
    }

    #[test]
    fn test_script_detection() {
        assert_eq!(ScriptKind::detect("hello there"), ScriptKind::WordDelimited);
        assert_eq!(ScriptKind::detect("hello"), ScriptKind::WordDelimited);
        assert_eq!(ScriptKind::detect("こんにちは"), ScriptKind::CharacterGrouped);
    }

    #[test]
    fn test_cjk_characters() {
        let tokens = tokenize_line("我爱你");
        assert_eq!(texts(&tokens), vec!["我", "爱", "你"]);
    }

    #[test]
    fn test_small_kana_attach_to_previous() {
        // "kyou" written き + small ょ + う
        let tokens = tokenize_line("きょう");
        assert_eq!(texts(&tokens), vec!["きょ", "う"]);

        // Prolonged sound mark attaches too
        let tokens = tokenize_line("ラーメン");
        assert_eq!(texts(&tokens), vec!["ラー", "メ", "ン"]);
    }

    #[test]
    fn test_thai_marks_attach_to_previous() {
        // ก + mai ek tone mark + า: the tone mark must not stand alone
        let tokens = tokenize_line("ก่า");
        assert_eq!(texts(&tokens), vec!["ก่", "า"]);
    }

    #[test]
    fn test_leading_modifier_is_dropped() {
        let tokens = tokenize_line("\u{30FC}ア");
        assert_eq!(texts(&tokens), vec!["ア"]);
    }

    #[test]
    fn test_combining_accent_stays_in_word() {
        let tokens = tokenize_line("cafe\u{0301} noir");
        assert_eq!(texts(&tokens), vec!["cafe\u{0301}", "noir"]);
    }

    #[test]
    fn test_mixed_line() {
        let tokens = tokenize_line("sing 歌う now");
        assert_eq!(texts(&tokens), vec!["sing", "歌", "う", "now"]);
    }
}
