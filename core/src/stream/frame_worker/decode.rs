use std::time::Instant;

use crossbeam::channel::{Receiver, Sender};

use crate::stream::frame_worker::types::{DecodedFrame, FrameWorkerError};
use crate::stream::framing::decode::decode_segment_with;
use crate::stream::segmenting::{FrameSegment, SegmentMessage};
use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes};

/// Stateless decode worker.
///
/// Each segment is decoded on its own; the id lookup table a decode builds
/// is dropped with the call, so nothing is shared between segments.
#[derive(Debug, Clone)]
pub struct FrameDecodeWorker {
    id: usize,
}

impl FrameDecodeWorker {
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Run the decode loop on the current thread.
    ///
    /// Exits on `Shutdown`, when the segment channel disconnects, when the
    /// output receiver is gone, or after reporting the first decode error.
    pub fn run(
        &self,
        rx: Receiver<SegmentMessage>,
        tx: Sender<Result<DecodedFrame, FrameWorkerError>>,
    ) {
        let id = self.id;
        log::debug!("[WORKER-{id}] starting");

        while let Ok(message) = rx.recv() {
            let segment = match message {
                SegmentMessage::Segment(segment) => segment,
                SegmentMessage::Shutdown => {
                    log::debug!("[WORKER-{id}] shutdown token received");
                    break;
                }
            };

            let result = process_segment(&segment);
            let failed = result.is_err();

            if let Err(e) = &result {
                log::error!("[WORKER-{id}] failed to process {}: {e}", segment.summary());
            }

            if tx.send(result).is_err() {
                log::debug!("[WORKER-{id}] tx send failed, receiver gone");
                return;
            }

            if failed {
                // abort this worker; the consumer tears down the rest
                return;
            }
        }

        log::debug!("[WORKER-{id}] finished");
    }
}

/// Decode a single segment into a frame.
///
/// Segment and byte counts are the producer's; the returned counters only
/// cover what the decode itself saw.
pub fn process_segment(segment: &FrameSegment) -> Result<DecodedFrame, FrameWorkerError> {
    let mut telemetry = TelemetryCounters::default();
    let mut stage_times = StageTimes::default();

    let start = Instant::now();
    let frame = decode_segment_with(&segment.bytes, &mut telemetry).map_err(|source| {
        FrameWorkerError::Decode {
            segment_index: segment.segment_index,
            source,
        }
    })?;
    stage_times.add(Stage::Decode, start.elapsed());

    Ok(DecodedFrame {
        segment_index: segment.segment_index,
        frame,
        telemetry,
        stage_times,
    })
}
