use thiserror::Error;

use crate::stream::framing::{FrameError, TimeFrame};
use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::StageTimes;

#[derive(Debug, Error)]
pub enum FrameWorkerError {
    /// Segment failed to decode; the worker that hit it has stopped.
    #[error("segment {segment_index} failed to decode: {source}")]
    Decode {
        segment_index: u64,
        #[source]
        source: FrameError,
    },
}

/// Output of one decode worker for one segment.
#[derive(Debug)]
pub struct DecodedFrame {
    /// Index of the source segment, for re-sequencing.
    pub segment_index: u64,
    pub frame: TimeFrame,
    pub telemetry: TelemetryCounters,
    pub stage_times: StageTimes,
}
