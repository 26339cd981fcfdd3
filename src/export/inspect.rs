// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Reads a MIDI file back with `midly` and reports what it holds.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use serde::Serialize;

/// Errors reading a MIDI file
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("MIDI parse error: {0}")]
    Parse(#[from] midly::Error),

    #[error("unsupported timing: only ticks-per-quarter files can be summarized")]
    UnsupportedTiming,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Overview of a Standard MIDI File
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmfSummary {
    /// 0, 1 or 2
    pub format: u16,
    pub ticks_per_quarter: u16,
    pub track_count: usize,
    /// First tempo meta event
    pub tempo_micros_per_quarter: Option<u32>,
    /// First time signature as (numerator, denominator)
    pub time_signature: Option<(u8, u8)>,
    /// First program change
    pub program: Option<u8>,
    /// Note-ons with non-zero velocity
    pub note_count: usize,
    pub lyric_count: usize,
    /// Length of the longest track in ticks
    pub length_ticks: u64,
    /// Every track's last event is end-of-track
    pub ends_with_end_of_track: bool,
}

impl SmfSummary {
    /// Tempo in BPM, if the file sets one
    pub fn tempo_bpm(&self) -> Option<f64> {
        self.tempo_micros_per_quarter
            .filter(|&micros| micros > 0)
            .map(|micros| 60_000_000.0 / micros as f64)
    }
}

impl fmt::Display for SmfSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "format:          {}", self.format)?;
        writeln!(f, "ticks/quarter:   {}", self.ticks_per_quarter)?;
        writeln!(f, "tracks:          {}", self.track_count)?;
        match (self.tempo_micros_per_quarter, self.tempo_bpm()) {
            (Some(micros), Some(bpm)) => writeln!(f, "tempo:           {} us/quarter ({:.2} BPM)", micros, bpm)?,
            _ => writeln!(f, "tempo:           (none)")?,
        }
        match self.time_signature {
            Some((num, den)) => writeln!(f, "time signature:  {}/{}", num, den)?,
            None => writeln!(f, "time signature:  (none)")?,
        }
        match self.program {
            Some(program) => writeln!(f, "program:         {}", program)?,
            None => writeln!(f, "program:         (none)")?,
        }
        writeln!(f, "notes:           {}", self.note_count)?;
        writeln!(f, "lyrics:          {}", self.lyric_count)?;
        writeln!(f, "length:          {} ticks", self.length_ticks)?;
        write!(f, "end of track:    {}", if self.ends_with_end_of_track { "yes" } else { "missing" })
    }
}

/// Summarize an in-memory MIDI file
pub fn summarize(bytes: &[u8]) -> Result<SmfSummary, InspectError> {
    let smf = Smf::parse(bytes)?;

    let format = match smf.header.format {
        Format::SingleTrack => 0,
        Format::Parallel => 1,
        Format::Sequential => 2,
    };
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(..) => return Err(InspectError::UnsupportedTiming),
    };

    let mut summary = SmfSummary {
        format,
        ticks_per_quarter,
        track_count: smf.tracks.len(),
        tempo_micros_per_quarter: None,
        time_signature: None,
        program: None,
        note_count: 0,
        lyric_count: 0,
        length_ticks: 0,
        ends_with_end_of_track: !smf.tracks.is_empty(),
    };

    for track in &smf.tracks {
        let mut tick = 0u64;
        for event in track {
            tick += event.delta.as_int() as u64;
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(micros)) => {
                    summary.tempo_micros_per_quarter.get_or_insert(micros.as_int());
                }
                TrackEventKind::Meta(MetaMessage::TimeSignature(num, den_power, _, _)) => {
                    summary
                        .time_signature
                        .get_or_insert((num, 1u8.checked_shl(den_power as u32).unwrap_or(0)));
                }
                TrackEventKind::Meta(MetaMessage::Lyric(_)) => summary.lyric_count += 1,
                TrackEventKind::Midi { message, .. } => match message {
                    MidiMessage::NoteOn { vel, .. } if vel.as_int() > 0 => summary.note_count += 1,
                    MidiMessage::ProgramChange { program } => {
                        summary.program.get_or_insert(program.as_int());
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        summary.length_ticks = summary.length_ticks.max(tick);

        let closed = matches!(
            track.last().map(|e| e.kind),
            Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
        );
        summary.ends_with_end_of_track &= closed;
    }

    Ok(summary)
}

/// Summarize a MIDI file on disk
pub fn summarize_file<P: AsRef<Path>>(path: P) -> Result<SmfSummary, InspectError> {
    let bytes = fs::read(path)?;
    summarize(&bytes)
}
