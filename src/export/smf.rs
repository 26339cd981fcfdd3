// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes a song timeline as a format 0 file: one header chunk and one track
//! holding tempo, time signature, program change, the notes, and an
//! end-of-track marker. Note-offs sort ahead of note-ons on the same tick.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::arrangement::SongTimeline;
use crate::config::ExportConfig;
use crate::generators::NoteEvent;
use crate::timing::{self, TimeSignature};

/// Ticks per quarter note for every file
pub const TICKS_PER_QUARTER: u16 = 480;

/// Largest delta a four-byte variable-length quantity can hold
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// Largest value the three-byte tempo meta event can hold
pub const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// Errors that stop a timeline from being encoded
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("note {index} has a non-positive duration ({duration} s)")]
    NonPositiveDuration { index: usize, duration: f64 },

    #[error("note {index} has an invalid start time ({start} s)")]
    InvalidStart { index: usize, start: f64 },

    #[error("note {index} starts before the note preceding it")]
    OutOfOrder { index: usize },

    #[error("note {index} has pitch {pitch}, outside 0-127")]
    PitchOutOfRange { index: usize, pitch: u8 },

    #[error("note {index} has an invalid velocity ({velocity})")]
    InvalidVelocity { index: usize, velocity: f64 },

    #[error("invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    #[error("invalid time signature: {0}")]
    InvalidTimeSignature(TimeSignature),

    #[error("event at tick {tick} comes before the previous event at tick {previous}")]
    NegativeDelta { tick: u64, previous: u64 },

    #[error("delta of {0} ticks is too large for a variable-length quantity")]
    DeltaTooLarge(u64),

    #[error("track of {0} bytes is too long for a track chunk")]
    TrackTooLong(usize),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Serialization rank of events sharing a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventRank {
    Setup,
    NoteOff,
    Lyric,
    NoteOn,
}

/// One track event at an absolute tick
#[derive(Debug, Clone)]
struct MidiExportEvent {
    tick: u64,
    rank: EventRank,
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            rank: EventRank::NoteOn,
            data: vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            rank: EventRank::NoteOff,
            data: vec![0x80 | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn program_change(channel: u8, program: u8) -> Self {
        Self {
            tick: 0,
            rank: EventRank::Setup,
            data: vec![0xC0 | (channel & 0x0F), program & 0x7F],
        }
    }

    fn tempo(bpm: f64) -> Self {
        let micros = timing::micros_per_quarter(bpm);
        Self {
            tick: 0,
            rank: EventRank::Setup,
            data: vec![
                0xFF, 0x51, 0x03,
                ((micros >> 16) & 0xFF) as u8,
                ((micros >> 8) & 0xFF) as u8,
                (micros & 0xFF) as u8,
            ],
        }
    }

    fn time_signature(signature: TimeSignature) -> Self {
        // MIDI clocks per metronome click: 24 per quarter, one click per beat
        let clocks = (96 / signature.beat_unit as u32).max(1) as u8;
        Self {
            tick: 0,
            rank: EventRank::Setup,
            data: vec![
                0xFF, 0x58, 0x04,
                signature.beats_per_bar,
                signature.beat_unit_power(),
                clocks,
                8, // 32nd notes per MIDI quarter note
            ],
        }
    }

    fn lyric(tick: u64, text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut data = vec![0xFF, 0x05];
        write_variable_length(&mut data, bytes.len() as u32);
        data.extend_from_slice(bytes);
        Self {
            tick,
            rank: EventRank::Lyric,
            data,
        }
    }
}

/// Append a variable-length quantity: seven bits per byte, most significant
/// group first, continuation bit on every byte but the last
pub fn write_variable_length(buffer: &mut Vec<u8>, mut value: u32) {
    let mut bytes = [0u8; 5];
    let mut i = bytes.len() - 1;
    bytes[i] = (value & 0x7F) as u8;
    value >>= 7;

    while value > 0 {
        i -= 1;
        bytes[i] = (value & 0x7F) as u8 | 0x80;
        value >>= 7;
    }

    buffer.extend_from_slice(&bytes[i..]);
}

/// Check notes before any bytes are produced
pub fn validate_notes(notes: &[NoteEvent]) -> Result<(), EncodeError> {
    let mut previous_start = 0.0;
    for (index, note) in notes.iter().enumerate() {
        if !note.start_time_seconds.is_finite() || note.start_time_seconds < 0.0 {
            return Err(EncodeError::InvalidStart {
                index,
                start: note.start_time_seconds,
            });
        }
        if !note.duration_seconds.is_finite() || note.duration_seconds <= 0.0 {
            return Err(EncodeError::NonPositiveDuration {
                index,
                duration: note.duration_seconds,
            });
        }
        if !note.velocity.is_finite() {
            return Err(EncodeError::InvalidVelocity {
                index,
                velocity: note.velocity,
            });
        }
        if note.pitch_midi > 127 {
            return Err(EncodeError::PitchOutOfRange {
                index,
                pitch: note.pitch_midi,
            });
        }
        if note.start_time_seconds < previous_start {
            return Err(EncodeError::OutOfOrder { index });
        }
        previous_start = note.start_time_seconds;
    }
    Ok(())
}

/// MIDI velocity for a 0.0 - 1.0 level (never 0, which would read as note-off)
fn midi_velocity(level: f64) -> u8 {
    (level * 127.0).round().clamp(1.0, 127.0) as u8
}

/// Standard MIDI file encoder
#[derive(Debug, Clone)]
pub struct SmfEncoder {
    /// Program change sent at tick 0
    program: u8,
    /// MIDI channel (0-15)
    channel: u8,
    /// Emit lyric meta events before note-ons
    lyric_events: bool,
}

impl SmfEncoder {
    /// Channel 0, program 0, no lyric events
    pub fn new() -> Self {
        Self {
            program: 0,
            channel: 0,
            lyric_events: false,
        }
    }

    /// Encoder for a song file's export settings
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new()
            .with_program(config.program)
            .with_channel(config.channel)
            .with_lyric_events(config.lyric_events)
    }

    pub fn with_program(mut self, program: u8) -> Self {
        if program > 127 {
            tracing::warn!(program, "program out of range, using 127");
        }
        self.program = program.min(127);
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        if channel > 15 {
            tracing::warn!(channel, "channel out of range, using 15");
        }
        self.channel = channel.min(15);
        self
    }

    pub fn with_lyric_events(mut self, enabled: bool) -> Self {
        self.lyric_events = enabled;
        self
    }

    pub fn program(&self) -> u8 {
        self.program
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn lyric_events(&self) -> bool {
        self.lyric_events
    }

    /// Encode to bytes
    pub fn encode(&self, timeline: &SongTimeline) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = Vec::new();
        self.write(timeline, &mut buffer)?;
        Ok(buffer)
    }

    /// Export to a file
    pub fn export<P: AsRef<Path>>(&self, timeline: &SongTimeline, path: P) -> Result<(), EncodeError> {
        let bytes = self.encode(timeline)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Write MIDI data to a writer. Nothing is written if the timeline is
    /// rejected.
    pub fn write<W: Write>(&self, timeline: &SongTimeline, writer: &mut W) -> Result<(), EncodeError> {
        let tempo = timeline.tempo_bpm();
        if !tempo.is_finite() || tempo <= 0.0 || timing::micros_per_quarter(tempo) > MAX_TEMPO_MICROS {
            return Err(EncodeError::InvalidTempo(tempo));
        }
        let signature = timeline.time_signature();
        if !signature.is_valid() {
            return Err(EncodeError::InvalidTimeSignature(signature));
        }
        validate_notes(timeline.notes())?;

        let events = self.collect_events(timeline);
        let end_tick = timing::seconds_to_ticks(timeline.total_duration_seconds(), tempo, TICKS_PER_QUARTER);
        let track_data = self.track_data(&events, end_tick)?;
        let length =
            u32::try_from(track_data.len()).map_err(|_| EncodeError::TrackTooLong(track_data.len()))?;

        self.write_header(writer)?;
        writer.write_all(b"MTrk")?;
        writer.write_all(&length.to_be_bytes())?;
        writer.write_all(&track_data)?;

        tracing::debug!(
            notes = timeline.notes().len(),
            events = events.len(),
            bytes = 14 + 8 + track_data.len(),
            "encoded song"
        );
        Ok(())
    }

    /// All track events sorted by tick, then rank
    fn collect_events(&self, timeline: &SongTimeline) -> Vec<MidiExportEvent> {
        let tempo = timeline.tempo_bpm();
        let mut events = vec![
            MidiExportEvent::tempo(tempo),
            MidiExportEvent::time_signature(timeline.time_signature()),
            MidiExportEvent::program_change(self.channel, self.program),
        ];

        for note in timeline.notes() {
            let start = timing::seconds_to_ticks(note.start_time_seconds, tempo, TICKS_PER_QUARTER);
            let end = timing::seconds_to_ticks(note.end_time_seconds(), tempo, TICKS_PER_QUARTER)
                .max(start + 1);

            if self.lyric_events && !note.lyric.is_empty() {
                events.push(MidiExportEvent::lyric(start, &note.lyric));
            }
            events.push(MidiExportEvent::note_on(
                start,
                self.channel,
                note.pitch_midi,
                midi_velocity(note.velocity),
            ));
            events.push(MidiExportEvent::note_off(end, self.channel, note.pitch_midi));
        }

        // Stable: lyric/note-on pairs keep their order
        events.sort_by_key(|e| (e.tick, e.rank));
        events
    }

    /// Delta-encoded track bytes, closed by end-of-track at `end_tick` or
    /// the last event, whichever is later
    fn track_data(&self, events: &[MidiExportEvent], end_tick: u64) -> Result<Vec<u8>, EncodeError> {
        let mut track_data = Vec::new();
        let mut last_tick = 0u64;

        for event in events {
            push_delta(&mut track_data, event.tick, last_tick)?;
            track_data.extend_from_slice(&event.data);
            last_tick = event.tick;
        }

        let end_tick = end_tick.max(last_tick);
        push_delta(&mut track_data, end_tick, last_tick)?;
        track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);

        Ok(track_data)
    }

    /// Write MIDI file header chunk
    fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"MThd")?;
        writer.write_all(&6u32.to_be_bytes())?;
        // Format 0, one track
        writer.write_all(&0u16.to_be_bytes())?;
        writer.write_all(&1u16.to_be_bytes())?;
        writer.write_all(&TICKS_PER_QUARTER.to_be_bytes())?;
        Ok(())
    }
}

impl Default for SmfEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn push_delta(buffer: &mut Vec<u8>, tick: u64, previous: u64) -> Result<(), EncodeError> {
    let delta = tick
        .checked_sub(previous)
        .ok_or(EncodeError::NegativeDelta { tick, previous })?;
    if delta > MAX_VLQ as u64 {
        return Err(EncodeError::DeltaTooLarge(delta));
    }
    write_variable_length(buffer, delta as u32);
    Ok(())
}

/// Encode with default export settings
pub fn encode(timeline: &SongTimeline) -> Result<Vec<u8>, EncodeError> {
    SmfEncoder::new().encode(timeline)
}
