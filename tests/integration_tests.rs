// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for lyricseq
//!
//! These tests run the whole pipeline, from lyric text to MIDI bytes, and
//! read the bytes back with `midly`.

use std::collections::HashSet;
use std::fs;

use midly::num::u15;
use midly::{MetaMessage, Smf, Timing, TrackEventKind};
use tempfile::tempdir;

use lyricseq::config::SongFile;
use lyricseq::export::{summarize, SmfEncoder, TICKS_PER_QUARTER};
use lyricseq::generators::VocalRange;
use lyricseq::{encode, generate, GenerationParams, SongTimeline};

const VERSE: &str = "the river runs beneath the silver moon
and carries every secret to the sea

oh sing it loud, sing it clear
the morning light is almost here

in the quiet of the valley
we remember what was said";

/// A spread of parameter sets covering keys, meters and complexities
fn parameter_grid() -> Vec<GenerationParams> {
    let mut grid = Vec::new();
    for (i, (key, mode)) in [("C", "major"), ("F#", "minor"), ("Bb", "dorian"), ("E", "blues")]
        .iter()
        .enumerate()
    {
        for (j, signature) in ["4/4", "3/4", "6/8", "5/4"].iter().enumerate() {
            for complexity in [0.0, 0.35, 0.7, 1.0] {
                grid.push(
                    GenerationParams::new(VERSE)
                        .with_seed((i * 31 + j * 7 + 1) as u32)
                        .with_key(key, mode)
                        .with_time_signature(signature)
                        .with_complexity(complexity)
                        .with_structure("intro A B A C outro")
                        .with_style(["pop", "random", "canon", "blues"][j]),
                );
            }
        }
    }
    grid
}

fn pitches_and_durations(timeline: &SongTimeline) -> Vec<(u8, f64)> {
    timeline
        .notes()
        .iter()
        .map(|n| (n.pitch_midi, n.duration_seconds))
        .collect()
}

#[test]
fn test_determinism() {
    for params in parameter_grid().into_iter().step_by(5) {
        let a = generate(&params);
        let b = generate(&params);
        assert_eq!(a, b);
        assert_eq!(encode(&a).unwrap(), encode(&b).unwrap());
    }
}

#[test]
fn test_monotonic_timeline() {
    for params in parameter_grid() {
        let timeline = generate(&params);
        for pair in timeline.notes().windows(2) {
            assert!(pair[0].start_time_seconds <= pair[1].start_time_seconds);
            assert!(pair[0].end_time_seconds() <= pair[1].start_time_seconds + 1e-9);
        }
    }
}

#[test]
fn test_pitch_containment_and_scale_membership() {
    for params in parameter_grid() {
        let range = params.vocal_range();
        let members = params.scale().members().to_vec();
        let timeline = generate(&params);
        assert_eq!(timeline.key().members, members);

        for note in timeline.notes() {
            assert!(range.contains(note.pitch_midi as i32), "pitch {} outside {:?}", note.pitch_midi, range);
            assert!(note.duration_seconds > 0.0);
            if !note.is_ornament {
                assert!(members.contains(&(note.pitch_midi % 12)));
                assert!(!note.lyric.is_empty());
            } else {
                assert!(note.lyric.is_empty());
            }
        }
    }
}

#[test]
fn test_section_partition() {
    for params in parameter_grid() {
        let timeline = generate(&params);
        let sections = timeline.sections();
        assert_eq!(sections[0].start_bar, 0);
        for pair in sections.windows(2) {
            assert_eq!(pair[1].start_bar, pair[0].start_bar + pair[0].bar_count);
        }
        assert!(sections.iter().all(|s| s.bar_count > 0));
        assert_eq!(timeline.chords().len(), timeline.total_bars() as usize);
        for (bar, chord) in timeline.chords().iter().enumerate() {
            assert_eq!(chord.bar_index, bar as u32);
        }
    }
}

#[test]
fn test_total_duration_is_last_note_end() {
    for params in parameter_grid() {
        let timeline = generate(&params);
        let last = timeline.notes().last().unwrap();
        assert_eq!(timeline.total_duration_seconds(), last.end_time_seconds());
        assert!(timeline.total_duration_seconds() <= timeline.total_bars() as f64 * timeline.bar_duration_seconds() + 1e-9);
    }
}

#[test]
fn test_every_syllable_is_sung_or_rested() {
    let params = GenerationParams::new(VERSE).with_complexity(0.5).with_structure("A B C");
    let timeline = generate(&params);
    let expected: Vec<&str> = VERSE.split_whitespace().collect();
    let sung = timeline.lyric_syllables();
    // Complexity 0.5 has no rests, so every word is sung once, in order
    let expected: Vec<String> = expected
        .iter()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .collect();
    assert_eq!(sung, expected);
}

#[test]
fn test_binary_well_formedness() {
    for params in parameter_grid().into_iter().step_by(3) {
        let timeline = generate(&params);
        let bytes = SmfEncoder::new().with_lyric_events(true).encode(&timeline).unwrap();

        // Header chunk
        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 6]);
        assert_eq!(&bytes[10..12], &[0, 1]);
        assert_eq!(u16::from_be_bytes([bytes[12], bytes[13]]), TICKS_PER_QUARTER);

        // Exactly one track chunk whose length covers the rest of the file
        assert_eq!(&bytes[14..18], b"MTrk");
        let declared = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
        assert_eq!(declared, bytes.len() - 22);

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(TICKS_PER_QUARTER)));
        let track = &smf.tracks[0];
        assert!(matches!(
            track.last().map(|e| e.kind),
            Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
        ));

        let summary = summarize(&bytes).unwrap();
        assert_eq!(summary.note_count, timeline.notes().len());
        let lyric_notes = timeline.notes().iter().filter(|n| !n.lyric.is_empty()).count();
        assert_eq!(summary.lyric_count, lyric_notes);
    }
}

#[test]
fn scenario_a_la_la_la() {
    let params = GenerationParams::new("la la la")
        .with_seed(1)
        .with_tempo(120.0)
        .with_time_signature("4/4")
        .with_key("C", "major")
        .with_complexity(0.5)
        .with_style("pop")
        .with_structure("A");

    let timeline = generate(&params);
    assert_eq!(timeline.notes().len(), 3);
    assert_eq!(timeline.notes()[0].start_time_seconds, 0.0);

    let range = VocalRange::default();
    assert!(timeline.notes().iter().all(|n| range.contains(n.pitch_midi as i32)));

    let again = generate(&params);
    assert_eq!(pitches_and_durations(&timeline), pitches_and_durations(&again));
}

#[test]
fn scenario_b_empty_lyrics() {
    // Default complexity has no rests, so the placeholder is always sung
    for lyrics in ["", "   \n\n  \n"] {
        let timeline = generate(&GenerationParams::new(lyrics));
        assert_eq!(timeline.notes().len(), 1);
        assert_eq!(timeline.lyric_syllables(), vec!["la"]);
        assert!(timeline.total_duration_seconds() > 0.0);
        assert!(encode(&timeline).is_ok());
    }
}

#[test]
fn scenario_c_seed_changes_output() {
    let base = GenerationParams::new(VERSE).with_complexity(0.6);
    let two = generate(&base.clone().with_seed(2));
    let three = generate(&base.with_seed(3));
    assert_ne!(pitches_and_durations(&two), pitches_and_durations(&three));
}

#[test]
fn scenario_d_complexity_adds_variety() {
    for seed in [1, 5, 9, 13] {
        let simple = generate(&GenerationParams::new(VERSE).with_seed(seed).with_complexity(0.0));
        let busy = generate(&GenerationParams::new(VERSE).with_seed(seed).with_complexity(1.0));

        let subdivisions = |t: &SongTimeline| {
            t.notes()
                .iter()
                .map(|n| (n.duration_seconds * 1000.0).round() as i64)
                .collect::<HashSet<_>>()
                .len()
        };
        let ornaments = |t: &SongTimeline| t.notes().iter().filter(|n| n.is_ornament).count();

        assert!(subdivisions(&busy) >= subdivisions(&simple));
        assert!(ornaments(&busy) >= ornaments(&simple));
        assert_eq!(ornaments(&simple), 0);
    }
}

#[test]
fn scenario_e_three_four_header() {
    // One short line in 3/4 fills two bars once the section gap is added
    let params = GenerationParams::new("sing a song")
        .with_tempo(90.0)
        .with_time_signature("3/4")
        .with_complexity(0.0);
    let timeline = generate(&params);
    assert_eq!(timeline.total_bars(), 2);

    let bytes = encode(&timeline).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let mut numerator = None;
    let mut tempo = None;
    for event in &smf.tracks[0] {
        match event.kind {
            TrackEventKind::Meta(MetaMessage::TimeSignature(num, _, _, _)) => numerator = Some(num),
            TrackEventKind::Meta(MetaMessage::Tempo(micros)) => tempo = Some(micros.as_int()),
            _ => {}
        }
    }
    assert_eq!(numerator, Some(3));
    assert_eq!(tempo, Some((60_000_000.0f64 / 90.0).round() as u32));
}

#[test]
fn test_song_file_to_midi_file() {
    let dir = tempdir().unwrap();
    let song_path = dir.path().join("song.yaml");
    fs::write(
        &song_path,
        r#"
song:
  title: "Lullaby"
  lyrics: |
    hush now baby don't you cry

    close your eyes
  seed: 12
  tempo: 72
  key: "Eb"
  mode: "major"
  structure: "intro A B A"
export:
  program: 11
  lyric_events: true
"#,
    )
    .unwrap();

    let file = SongFile::load(&song_path).unwrap();
    let timeline = generate(&file.params());
    let out = dir.path().join("song.mid");
    SmfEncoder::from_config(&file.export).export(&timeline, &out).unwrap();

    let summary = summarize(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(summary.program, Some(11));
    assert_eq!(summary.tempo_micros_per_quarter, Some(833_333));
    assert_eq!(summary.note_count, timeline.notes().len());
    assert!(summary.ends_with_end_of_track);

    let names: Vec<&str> = timeline.sections().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["intro", "A", "B", "A"]);
    assert_eq!(timeline.key().tonic_pitch_class, 3);
}

#[test]
fn test_timeline_json_round_trip() {
    let timeline = generate(&GenerationParams::new(VERSE).with_complexity(0.9).with_seed(4));
    let json = timeline.to_json().unwrap();
    let back = SongTimeline::from_json(&json).unwrap();
    assert_eq!(back, timeline);
    assert_eq!(encode(&back).unwrap(), encode(&timeline).unwrap());
}

#[test]
fn test_unicode_lyrics() {
    let params = GenerationParams::new("さくら さくら\n\n桜が咲いた\n\nสวัสดีครับ").with_structure("A B C");
    let timeline = generate(&params);
    assert!(!timeline.notes().is_empty());
    let bytes = SmfEncoder::new().with_lyric_events(true).encode(&timeline).unwrap();
    assert!(summarize(&bytes).unwrap().lyric_count > 0);
}
