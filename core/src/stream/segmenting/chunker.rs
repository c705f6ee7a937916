use std::io::BufRead;

use bytes::Bytes;

use crate::constants::{ESCAPE, FRAME_MARKER, LINE_TERMINATOR};
use crate::stream::segmenting::types::FrameSegment;
use crate::types::StreamError;

/// Splits a byte stream into per-frame segments.
///
/// Works on physical lines only: every line starting with `#` closes the
/// segment in progress and opens a new one, unless the previous line ended
/// in an unescaped backslash: a continuation line is part of its value even
/// when it starts with `#`. Property escapes are not interpreted here.
#[derive(Debug)]
pub struct FrameChunker<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    next_index: u64,
    bytes_read: u64,
    // previous physical line continues onto the next one
    continues: bool,
    finished: bool,
}

impl<R: BufRead> FrameChunker<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            next_index: 0,
            bytes_read: 0,
            continues: false,
            finished: false,
        }
    }

    /// Total bytes consumed from the reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Number of segments emitted so far.
    pub fn segments_emitted(&self) -> u64 {
        self.next_index
    }

    fn take_segment(&mut self) -> FrameSegment {
        let bytes = Bytes::from(std::mem::take(&mut self.buffer));
        let segment = FrameSegment::new(self.next_index, bytes);
        self.next_index += 1;
        segment
    }

    /// Read physical lines until a segment is complete.
    pub fn next_segment(&mut self) -> Result<Option<FrameSegment>, StreamError> {
        if self.finished {
            return Ok(None);
        }

        let mut line = Vec::new();
        loop {
            line.clear();
            let n = self.reader.read_until(LINE_TERMINATOR, &mut line)?;

            if n == 0 {
                self.finished = true;
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.take_segment()));
            }
            self.bytes_read += n as u64;

            let continuation = self.continues;
            self.continues = ends_with_escape(&line);

            if continuation || line[0] != FRAME_MARKER {
                self.buffer.extend_from_slice(&line);
                continue;
            }

            // Marker line: flush what we have and start over with this line.
            if self.buffer.is_empty() {
                self.buffer.extend_from_slice(&line);
                continue;
            }

            let segment = self.take_segment();
            self.buffer.extend_from_slice(&line);
            return Ok(Some(segment));
        }
    }
}

/// Odd number of trailing backslashes, ignoring the `\n` terminator.
fn ends_with_escape(line: &[u8]) -> bool {
    let mut end = line.len();
    if end > 0 && line[end - 1] == LINE_TERMINATOR {
        end -= 1;
    }
    let trailing = line[..end]
        .iter()
        .rev()
        .take_while(|b| **b == ESCAPE as u8)
        .count();
    trailing % 2 == 1
}

impl<R: BufRead> Iterator for FrameChunker<R> {
    type Item = Result<FrameSegment, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_segment() {
            Ok(Some(segment)) => Some(Ok(segment)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
