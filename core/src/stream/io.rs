// Normalized I/O, ACMI reader/writer and ordered frame collection

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use crossbeam::channel::Sender;

use crate::constants::BOM;
use crate::headers::{Header, read_header, write_header};
use crate::stream::frame_worker::{DecodedFrame, FrameWorkerError};
use crate::stream::framing::decode::decode_time_frame_with;
use crate::stream::framing::{TimeFrame, encode_time_frame};
use crate::stream::pipeline::{PipelineConfig, run_decode_pipeline};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Collect the encoded stream in memory; see `SinkWriter::into_memory`.
    Memory,
}

/// Normalize input source into a buffered reader
pub fn open_input(src: InputSource) -> Result<Box<dyn BufRead + Send>, StreamError> {
    let reader: Box<dyn BufRead + Send> = match src {
        InputSource::Reader(r) => Box::new(BufReader::new(r)),
        InputSource::File(p) => Box::new(BufReader::new(File::open(p)?)),
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Writer behind an `OutputSink`.
pub enum SinkWriter {
    Boxed(Box<dyn Write + Send>),
    Memory(Vec<u8>),
}

impl SinkWriter {
    /// The collected bytes for `OutputSink::Memory`, `None` otherwise.
    pub fn into_memory(self) -> Option<Vec<u8>> {
        match self {
            SinkWriter::Memory(buf) => Some(buf),
            SinkWriter::Boxed(_) => None,
        }
    }
}

impl Write for SinkWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            SinkWriter::Boxed(w) => w.write(data),
            SinkWriter::Memory(buf) => {
                buf.extend_from_slice(data);
                Ok(data.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkWriter::Boxed(w) => w.flush(),
            SinkWriter::Memory(_) => Ok(()),
        }
    }
}

/// Normalize output sink into a writer
pub fn open_output(sink: OutputSink) -> Result<SinkWriter, StreamError> {
    let writer = match sink {
        OutputSink::Writer(w) => SinkWriter::Boxed(w),
        OutputSink::File(p) => SinkWriter::Boxed(Box::new(BufWriter::new(File::create(p)?))),
        OutputSink::Memory => SinkWriter::Memory(Vec::new()),
    };
    Ok(writer)
}

/// Skip a leading UTF-8 BOM. Returns whether one was present.
///
/// Only looks at what the first `fill_buf` returns, so a BOM split across
/// two underlying reads is not recognised.
pub fn strip_bom<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let buf = reader.fill_buf()?;
    if buf.starts_with(&BOM) {
        reader.consume(BOM.len());
        return Ok(true);
    }
    Ok(false)
}

// ================= Reader =================

/// ACMI stream reader.
///
/// Construction strips the BOM and reads the header. The remaining frames
/// can then be decoded either sequentially (via `Iterator`) or on a worker
/// pool with `process_time_frames`.
#[derive(Debug)]
pub struct AcmiReader<R: BufRead> {
    reader: R,
    header: Header,
    counters: TelemetryCounters,
    finished: bool,
}

impl<R: BufRead> AcmiReader<R> {
    pub fn new(mut reader: R) -> Result<Self, StreamError> {
        if strip_bom(&mut reader)? {
            log::debug!("[READER] BOM stripped");
        }
        let header = read_header(&mut reader)?;

        Ok(Self {
            reader,
            header,
            counters: TelemetryCounters::default(),
            finished: false,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Counters of the sequential decode so far.
    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    /// Decode the next frame on the calling thread. `None` at end of input.
    pub fn next_time_frame(&mut self) -> Result<Option<TimeFrame>, StreamError> {
        if self.finished {
            return Ok(None);
        }

        let at_end = self.reader.fill_buf()?.is_empty();
        if at_end {
            self.finished = true;
            return Ok(None);
        }

        let frame = decode_time_frame_with(&mut self.reader, true, &mut self.counters)?;
        self.counters.segments += 1;
        Ok(Some(frame))
    }

    /// Decode the rest of the stream on a worker pool, sending each frame
    /// (or the first error) to `tx`. See `run_decode_pipeline` for ordering
    /// and shutdown behaviour.
    pub fn process_time_frames(
        self,
        config: &PipelineConfig,
        tx: Sender<Result<DecodedFrame, FrameWorkerError>>,
    ) -> Result<TelemetrySnapshot, StreamError>
    where
        R: Send,
    {
        run_decode_pipeline(self.reader, config, tx)
    }
}

impl<R: BufRead> Iterator for AcmiReader<R> {
    type Item = Result<TimeFrame, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_time_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

// ================= Writer =================

/// ACMI stream writer. Writes the BOM and header on construction.
#[derive(Debug)]
pub struct AcmiWriter<W: Write> {
    out: W,
    scratch: Vec<u8>,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<W: Write> AcmiWriter<W> {
    pub fn new(mut out: W, header: &Header) -> Result<Self, StreamError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        let start = Instant::now();
        let mut scratch = Vec::with_capacity(256);
        scratch.extend_from_slice(&BOM);
        write_header(&mut scratch, header)?;
        timer.add_stage_time(Stage::Encode, start.elapsed());

        let start = Instant::now();
        out.write_all(&scratch)?;
        timer.add_stage_time(Stage::Write, start.elapsed());
        counters.bytes_written += scratch.len() as u64;

        log::debug!("[WRITER] header written ({} bytes)", scratch.len());

        Ok(Self { out, scratch, counters, timer })
    }

    /// Append one frame: its `#<offset>` line, then every object line.
    pub fn write_time_frame(&mut self, frame: &TimeFrame) -> Result<(), StreamError> {
        self.scratch.clear();

        let start = Instant::now();
        encode_time_frame(&mut self.scratch, frame, true)?;
        self.timer.add_stage_time(Stage::Encode, start.elapsed());

        let start = Instant::now();
        self.out.write_all(&self.scratch)?;
        self.timer.add_stage_time(Stage::Write, start.elapsed());

        self.counters.add_encoded_frame(frame, self.scratch.len());
        Ok(())
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    /// Flush and hand back the inner writer.
    pub fn finish(mut self) -> Result<W, StreamError> {
        self.out.flush()?;
        log::debug!("[WRITER] finished after {} frames", self.counters.frames_encoded);
        Ok(self.out)
    }
}

// ================= Ordered collection =================

/// Re-sequences pool output by segment index.
///
/// Frames are released as soon as every lower index has arrived.
#[derive(Debug, Default)]
pub struct OrderedFrameCollector {
    next: u64,
    pending: BTreeMap<u64, TimeFrame>,
    ready: Vec<TimeFrame>,
}

impl OrderedFrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, decoded: DecodedFrame) {
        self.pending.insert(decoded.segment_index, decoded.frame);
        while let Some(frame) = self.pending.remove(&self.next) {
            self.ready.push(frame);
            self.next += 1;
        }
    }

    /// Frames still waiting for a lower index.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn finish(self) -> Result<Vec<TimeFrame>, StreamError> {
        if let Some(first) = self.pending.keys().next() {
            return Err(StreamError::Validation(format!(
                "missing segment {} (next buffered: {first})",
                self.next
            )));
        }
        Ok(self.ready)
    }
}
