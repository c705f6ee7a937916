// Stable public API

use std::thread;
use std::time::Instant;

use crossbeam::channel::bounded;

use crate::constants::{DEFAULT_QUEUE_CAP, DEFAULT_WORKERS, MAX_QUEUE_CAP, MAX_WORKERS};
use crate::headers::Header;
use crate::stream::framing::TimeFrame;
use crate::stream::io::{
    AcmiReader, AcmiWriter, InputSource, OrderedFrameCollector, OutputSink, open_input,
    open_output,
};
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::pipeline::PipelineConfig;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot};
use crate::types::StreamError;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Decode workers. `None` → `DEFAULT_WORKERS`.
    pub workers: Option<usize>,

    /// Capacity of the segment and frame channels. `None` → `DEFAULT_QUEUE_CAP`.
    pub queue_cap: Option<usize>,

    /// Return decoded frames in stream order even with several workers.
    pub ordered: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            workers: None,
            queue_cap: None,
            ordered: true,
        }
    }
}

impl ApiConfig {
    pub fn new(workers: Option<usize>, queue_cap: Option<usize>, ordered: bool) -> Self {
        Self { workers, queue_cap, ordered }
    }

    pub fn single_threaded() -> Self {
        Self { workers: Some(1), queue_cap: Some(1), ordered: true }
    }

    pub fn profile(&self) -> ParallelismProfile {
        ParallelismProfile::new(
            self.workers.unwrap_or(DEFAULT_WORKERS),
            self.queue_cap.unwrap_or(DEFAULT_QUEUE_CAP),
        )
    }
}

pub fn validate_api_config(config: &ApiConfig) -> Result<(), StreamError> {
    let w = config.workers.unwrap_or(DEFAULT_WORKERS);
    let q = config.queue_cap.unwrap_or(DEFAULT_QUEUE_CAP);

    if !(1..=MAX_WORKERS).contains(&w) {
        return Err(StreamError::Validation(format!(
            "invalid workers count: {w}, must be within 1..={MAX_WORKERS}"
        )));
    }
    if !(1..=MAX_QUEUE_CAP).contains(&q) {
        return Err(StreamError::Validation(format!(
            "invalid queue capacity: {q}, must be within 1..={MAX_QUEUE_CAP}"
        )));
    }
    Ok(())
}

/// A fully decoded stream.
#[derive(Debug, Clone)]
pub struct DecodedStream {
    pub header: Header,
    /// Frames after the header. In stream order when `ApiConfig::ordered`
    /// is set or a single worker ran, in completion order otherwise.
    pub frames: Vec<TimeFrame>,
    pub telemetry: TelemetrySnapshot,
}

#[derive(Debug, Clone)]
pub struct EncodedStream {
    /// Encoded bytes for `OutputSink::Memory`.
    pub output: Option<Vec<u8>>,
    pub telemetry: TelemetrySnapshot,
}

/// Decode a whole ACMI stream: header on the calling thread, frames on the
/// worker pool. Stops at the first decode error.
pub fn decode_stream(input: InputSource, config: ApiConfig) -> Result<DecodedStream, StreamError> {
    validate_api_config(&config)?;
    let started = Instant::now();

    let reader = open_input(input)?;

    let read_start = Instant::now();
    let acmi = AcmiReader::new(reader)?;
    let read_time = read_start.elapsed();
    let header = acmi.header().clone();

    let pipeline_config = PipelineConfig::new(config.profile());
    let (out_tx, out_rx) = bounded(pipeline_config.profile.inflight_segments);

    let mut worker_counters = TelemetryCounters::default();
    let mut worker_times = StageTimes::default();
    worker_times.add(Stage::Read, read_time);

    let (frames, producer_result) = thread::scope(|scope| {
        let producer = scope.spawn(|| acmi.process_time_frames(&pipeline_config, out_tx));

        let mut ordered = config.ordered.then(OrderedFrameCollector::new);
        let mut unordered = Vec::new();
        let mut first_error = None;

        for result in out_rx.iter() {
            match result {
                Ok(decoded) => {
                    worker_counters.merge(&decoded.telemetry);
                    worker_times.merge(&decoded.stage_times);
                    match ordered.as_mut() {
                        Some(collector) => collector.push(decoded),
                        None => unordered.push(decoded.frame),
                    }
                }
                Err(e) => {
                    first_error = Some(e);
                    break;
                }
            }
        }
        // Remaining workers see a closed channel and stop.
        drop(out_rx);

        let producer_result = producer
            .join()
            .unwrap_or(Err(StreamError::PipelineError("decode producer panicked")));

        let frames = match (first_error, ordered) {
            (Some(e), _) => Err(StreamError::from(e)),
            (None, Some(collector)) => collector.finish(),
            (None, None) => Ok(unordered),
        };
        (frames, producer_result)
    });

    // A worker error explains any producer-side channel failure.
    let frames = frames?;
    let mut telemetry = producer_result?;
    telemetry.absorb(&worker_counters, &worker_times);
    telemetry.set_elapsed(started.elapsed());

    log::info!(
        "[PIPELINE] decoded {} frames from {} segments",
        telemetry.counters.frames_decoded,
        telemetry.counters.segments
    );

    Ok(DecodedStream { header, frames, telemetry })
}

/// Encode a header and frames to `output`, sequentially.
pub fn encode_stream(
    output: OutputSink,
    header: &Header,
    frames: &[TimeFrame],
    config: ApiConfig,
) -> Result<EncodedStream, StreamError> {
    validate_api_config(&config)?;
    let started = Instant::now();

    let sink = open_output(output)?;
    let mut writer = AcmiWriter::new(sink, header)?;
    for frame in frames {
        writer.write_time_frame(frame)?;
    }

    let mut telemetry = writer.telemetry();
    let sink = writer.finish()?;
    telemetry.set_elapsed(started.elapsed());

    Ok(EncodedStream {
        output: sink.into_memory(),
        telemetry,
    })
}
