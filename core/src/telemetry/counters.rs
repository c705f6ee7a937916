//! telemetry/counters.rs
//! Mutable counters collected while decoding or encoding a stream.
//!
//! Converted into an immutable `TelemetrySnapshot` at the end of a run.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::stream::framing::TimeFrame;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// Raw frame segments cut by the chunker.
    pub segments: u64,
    pub frames_decoded: u64,
    pub frames_encoded: u64,
    /// Distinct objects per frame (repeated ids are merged, not recounted).
    pub objects_decoded: u64,
    pub objects_encoded: u64,
    pub objects_deleted: u64,
    pub properties_decoded: u64,
    /// Physical lines folded into a logical line by a trailing escape.
    pub continuation_lines: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl TelemetryCounters {
    /// Record one encoded frame and its wire size.
    pub fn add_encoded_frame(&mut self, frame: &TimeFrame, wire_len: usize) {
        self.frames_encoded += 1;
        self.objects_encoded += frame.objects.len() as u64;
        self.bytes_written += wire_len as u64;
    }

    /// Per-worker counters are merged once, at the end, by the consumer.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.segments += other.segments;
        self.frames_decoded += other.frames_decoded;
        self.frames_encoded += other.frames_encoded;
        self.objects_decoded += other.objects_decoded;
        self.objects_encoded += other.objects_encoded;
        self.objects_deleted += other.objects_deleted;
        self.properties_decoded += other.properties_decoded;
        self.continuation_lines += other.continuation_lines;
        self.bytes_read += other.bytes_read;
        self.bytes_written += other.bytes_written;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
