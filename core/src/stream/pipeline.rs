// Pure pipeline wiring (no grammar logic)

use std::io::BufRead;
use std::thread;
use std::time::Instant;

use crossbeam::channel::{Sender, bounded};

use crate::stream::frame_worker::{DecodedFrame, FrameDecodeWorker, FrameWorkerError};
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::segmenting::{FrameChunker, SegmentMessage};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub profile: ParallelismProfile,
}

impl PipelineConfig {
    pub fn new(profile: ParallelismProfile) -> Self {
        Self { profile }
    }

    pub fn single_threaded() -> Self {
        Self { profile: ParallelismProfile::single_threaded() }
    }
}

// ============================================================
// Decode pipeline
// ============================================================

/// Chunk `reader` into frame segments and decode them on a worker pool.
///
/// The chunker runs on the calling thread; `worker_count` scoped threads
/// decode. Results go to `out_tx` as soon as each worker finishes, so frames
/// arrive out of stream order when more than one worker runs. `out_tx`'s
/// receiver must be drained on another thread.
///
/// `out_tx` disconnects once every worker has exited. A worker that fails
/// sends its error and stops; consumers should stop reading at the first
/// error and drop the receiver, which winds down the remaining workers.
///
/// The returned snapshot covers the producer side (segments, bytes read,
/// chunk time). Per-frame counters travel with each `DecodedFrame`.
pub fn run_decode_pipeline<R>(
    reader: R,
    config: &PipelineConfig,
    out_tx: Sender<Result<DecodedFrame, FrameWorkerError>>,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: BufRead + Send,
{
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let worker_count = config.profile.worker_count.max(1);

    log::debug!("[PIPELINE] Start decode pipeline with {worker_count} workers");

    // ---- Channels ----
    let (seg_tx, seg_rx) = bounded::<SegmentMessage>(config.profile.inflight_segments.max(1));

    let produced = thread::scope(|scope| {
        // ---- Workers ----
        for i in 0..worker_count {
            let worker = FrameDecodeWorker::new(i);
            let rx = seg_rx.clone();
            let tx = out_tx.clone();
            scope.spawn(move || worker.run(rx, tx));
        }

        // Workers now own every receiver / output sender.
        drop(seg_rx);
        drop(out_tx);
        log::debug!("[PIPELINE] dropped out_tx in producer thread");

        // ---- Producer (chunker) ----
        let result = produce_segments(reader, &seg_tx, &mut counters, &mut timer);

        // One shutdown token per worker, even after a producer error.
        for _ in 0..worker_count {
            if seg_tx.send(SegmentMessage::Shutdown).is_err() {
                // every worker is already gone
                break;
            }
        }
        log::debug!("[READER] Finished, shutdown tokens sent");

        result
    });

    timer.finish();
    produced?;

    Ok(TelemetrySnapshot::from(&counters, &timer))
}

fn produce_segments<R: BufRead>(
    reader: R,
    seg_tx: &Sender<SegmentMessage>,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
) -> Result<(), StreamError> {
    let mut chunker = FrameChunker::new(reader);

    let outcome = loop {
        let start = Instant::now();
        let next = chunker.next_segment();
        timer.add_stage_time(Stage::Chunk, start.elapsed());

        let segment = match next {
            Ok(Some(segment)) => segment,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };

        log::debug!("[READER] Dispatching segment {}", segment.segment_index);
        counters.segments += 1;

        if seg_tx.send(SegmentMessage::Segment(segment)).is_err() {
            break Err(StreamError::PipelineError("segment channel closed"));
        }
    };

    counters.bytes_read += chunker.bytes_read();
    outcome
}
