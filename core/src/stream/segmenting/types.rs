use bytes::Bytes;

use crate::constants::FRAME_MARKER;

/// Raw bytes of one frame, as cut by the chunker.
///
/// `bytes` normally begins with the `#<offset>` line. Segments are
/// numbered from 0 in stream order so decoded frames can be re-sequenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSegment {
    pub segment_index: u64,
    pub bytes: Bytes, // shared, sliceable
}

impl FrameSegment {
    pub fn new(segment_index: u64, bytes: Bytes) -> Self {
        Self { segment_index, bytes }
    }

    /// True when the segment opens with a frame-marker line.
    pub fn starts_with_marker(&self) -> bool {
        self.bytes.first() == Some(&FRAME_MARKER)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Produce a concise debug summary of the segment
    pub fn summary(&self) -> String {
        let first_line = self
            .bytes
            .split(|b| *b == b'\n')
            .next()
            .map(String::from_utf8_lossy)
            .unwrap_or_default();
        format!(
            "FrameSegment {{ index: {}, len: {}, first_line: {:?} }}",
            self.segment_index,
            self.bytes.len(),
            first_line,
        )
    }
}

/// Message on the producer → worker channel.
#[derive(Debug, Clone)]
pub enum SegmentMessage {
    Segment(FrameSegment),
    /// One per worker; the receiving worker exits.
    Shutdown,
}
