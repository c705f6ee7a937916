//! Frame decoding.
//!
//! Decoding of one frame is a small state machine:
//!
//! ```text
//! AwaitOffsetLine ──► ReadingObjectLines ──► Done
//!   (frames only)        (loops per line)
//! ```
//!
//! `ReadingObjectLines` stops as soon as the next byte is a frame marker or
//! the input is exhausted. The header's initial frame starts directly in
//! `ReadingObjectLines`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::BufRead;

use crate::constants::{FRAME_MARKER, KEY_VALUE_SEPARATOR, LINE_TERMINATOR};
use crate::stream::framing::escape::{has_continuation, split_property_tokens};
use crate::stream::framing::grammar::parse_object_line;
use crate::stream::framing::types::{FrameError, Object, TimeFrame};
use crate::telemetry::TelemetryCounters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    AwaitOffsetLine,
    ReadingObjectLines,
    Done,
}

/// Decode one frame segment produced by the chunker.
///
/// The segment must begin with its `#<offset>` line.
pub fn decode_segment(wire: &[u8]) -> Result<TimeFrame, FrameError> {
    decode_segment_with(wire, &mut TelemetryCounters::default())
}

pub fn decode_segment_with(
    wire: &[u8],
    counters: &mut TelemetryCounters,
) -> Result<TimeFrame, FrameError> {
    let mut reader = wire;
    decode_time_frame_with(&mut reader, true, counters)
}

/// Decode a single frame from `reader`.
///
/// With `parse_offset = false` no `#` line is expected (header mode). The
/// reader is left positioned on the next frame marker, or at end of input.
pub fn decode_time_frame<R: BufRead>(
    reader: &mut R,
    parse_offset: bool,
) -> Result<TimeFrame, FrameError> {
    decode_time_frame_with(reader, parse_offset, &mut TelemetryCounters::default())
}

pub fn decode_time_frame_with<R: BufRead>(
    reader: &mut R,
    parse_offset: bool,
    counters: &mut TelemetryCounters,
) -> Result<TimeFrame, FrameError> {
    let mut frame = TimeFrame::new();
    // id -> position in `frame.objects`; lives for this call only
    let mut seen: HashMap<u64, usize> = HashMap::new();

    let mut state = if parse_offset {
        DecodeState::AwaitOffsetLine
    } else {
        DecodeState::ReadingObjectLines
    };

    while state != DecodeState::Done {
        state = match state {
            DecodeState::AwaitOffsetLine => {
                frame.offset = read_offset_line(reader)?;
                DecodeState::ReadingObjectLines
            }
            DecodeState::ReadingObjectLines => {
                if at_frame_boundary(reader)? {
                    DecodeState::Done
                } else {
                    let line = read_logical_line(reader, counters)?;
                    apply_object_line(&mut frame, &mut seen, &line, counters)?;
                    DecodeState::ReadingObjectLines
                }
            }
            DecodeState::Done => DecodeState::Done,
        };
    }

    counters.frames_decoded += 1;
    Ok(frame)
}

/// Read one physical line without its `\n`. `None` at end of input.
///
/// A `\r` before the terminator is value text, not part of the terminator.
fn read_physical_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, FrameError> {
    let mut raw = Vec::new();
    if reader.read_until(LINE_TERMINATOR, &mut raw)? == 0 {
        return Ok(None);
    }
    if raw.last() == Some(&LINE_TERMINATOR) {
        raw.pop();
    }
    String::from_utf8(raw)
        .map(Some)
        .map_err(|e| FrameError::MalformedLine(String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

fn read_offset_line<R: BufRead>(reader: &mut R) -> Result<f64, FrameError> {
    let line = read_physical_line(reader)?.unwrap_or_default();

    let Some(raw) = line.strip_prefix(FRAME_MARKER as char) else {
        return Err(FrameError::MissingOffset(line.clone()));
    };

    raw.trim()
        .parse::<f64>()
        .map_err(|_| FrameError::MissingOffset(line.clone()))
}

/// Peek the next byte: end of input or a frame marker closes the frame.
fn at_frame_boundary<R: BufRead>(reader: &mut R) -> Result<bool, FrameError> {
    let buf = reader.fill_buf()?;
    Ok(buf.first().map_or(true, |b| *b == FRAME_MARKER))
}

/// Join physical lines while they end in an unescaped backslash.
///
/// The backslash is replaced by a literal newline, so the logical line
/// carries the multi-line value as-is.
fn read_logical_line<R: BufRead>(
    reader: &mut R,
    counters: &mut TelemetryCounters,
) -> Result<String, FrameError> {
    let mut buffer = read_physical_line(reader)?
        .ok_or_else(|| FrameError::MalformedLine(String::new()))?;

    while has_continuation(&buffer) {
        buffer.pop();
        buffer.push('\n');
        counters.continuation_lines += 1;

        match read_physical_line(reader)? {
            Some(next) => buffer.push_str(&next),
            None => return Err(FrameError::MalformedEscape),
        }
    }

    Ok(buffer)
}

fn apply_object_line(
    frame: &mut TimeFrame,
    seen: &mut HashMap<u64, usize>,
    line: &str,
    counters: &mut TelemetryCounters,
) -> Result<(), FrameError> {
    let parsed = parse_object_line(line)?;

    let index = match seen.entry(parsed.id) {
        Entry::Occupied(entry) => *entry.get(),
        Entry::Vacant(entry) => {
            let object = if parsed.deleted {
                Object::deleted(parsed.id)
            } else {
                Object::new(parsed.id)
            };
            frame.objects.push(object);
            counters.objects_decoded += 1;
            if parsed.deleted {
                counters.objects_deleted += 1;
            }
            *entry.insert(frame.objects.len() - 1)
        }
    };
    let object = &mut frame.objects[index];

    if parsed.deleted {
        if !object.deleted {
            object.deleted = true;
            counters.objects_deleted += 1;
        }
        return Ok(());
    }

    let Some(blob) = parsed.blob else {
        return Ok(());
    };

    for token in split_property_tokens(blob)? {
        if token.is_empty() {
            continue;
        }
        let Some((key, value)) = token.split_once(KEY_VALUE_SEPARATOR) else {
            return Err(FrameError::MalformedProperty(token.clone()));
        };
        object.push(key, value);
        counters.properties_decoded += 1;
    }

    Ok(())
}
