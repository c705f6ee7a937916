//! telemetry/snapshot.rs
//! Immutable telemetry snapshot, serialisable to JSON for reporting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Counters, throughput, stage timings and elapsed wall time of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(flatten)]
    pub counters: TelemetryCounters,
    /// Bytes read plus bytes written, per second of wall time.
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let mut snapshot = Self {
            counters: counters.clone(),
            throughput_bytes_per_sec: 0.0,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        };
        snapshot.recompute_throughput();
        snapshot
    }

    /// Fold worker-side counters and stage times into this snapshot.
    pub fn absorb(&mut self, counters: &TelemetryCounters, stage_times: &StageTimes) {
        self.counters.merge(counters);
        self.stage_times.merge(stage_times);
        self.recompute_throughput();
    }

    /// Replace the elapsed time, e.g. with the wall time of the whole call.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
        self.recompute_throughput();
    }

    fn recompute_throughput(&mut self) {
        let secs = self.elapsed.as_secs_f64();
        let bytes = self.counters.bytes_read + self.counters.bytes_written;
        self.throughput_bytes_per_sec = if secs > 0.0 { bytes as f64 / secs } else { 0.0 };
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants of a finished run.
    pub fn sanity_check(&self) -> bool {
        self.counters.objects_deleted <= self.counters.objects_decoded
            && self.counters.frames_decoded <= self.counters.segments
            && self.throughput_bytes_per_sec >= 0.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
