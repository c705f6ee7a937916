use crate::constants::{ASSUMED_SEGMENT_SIZE, DEFAULT_QUEUE_CAP, DEFAULT_WORKERS};

/// Parallelism configuration for the decode pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelismProfile {
    /// Decode workers pulling from the segment channel (>= 1).
    pub worker_count: usize,
    /// Capacity of the segment and frame channels.
    pub inflight_segments: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS, DEFAULT_QUEUE_CAP)
    }
}

impl ParallelismProfile {
    /// Zero values are clamped to 1.
    pub fn new(worker_count: usize, inflight_segments: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
            inflight_segments: inflight_segments.max(1),
        }
    }

    /// One worker: frames come out in stream order.
    pub fn single_threaded() -> Self {
        Self {
            worker_count: 1,
            inflight_segments: 1,
        }
    }

    /// Size the pool from the machine: one worker per core minus the
    /// producer's, and as many in-flight segments as `mem_fraction` of the
    /// available memory holds, capped at `hard_cap`.
    pub fn dynamic(max_segment_size: u64, mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get();
        let worker_count = cores.saturating_sub(1).max(1); // leave one core to the chunker

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_bytes = sys.available_memory();

        // Budget = fraction of available memory
        let budget = (avail_bytes as f64 * mem_fraction) as u64;
        let segment_size = if max_segment_size == 0 { ASSUMED_SEGMENT_SIZE } else { max_segment_size };
        let max_segments = budget / segment_size;

        let inflight_segments = max_segments.min(hard_cap as u64).max(1) as usize;

        log::debug!(
            "[PROFILE] worker_count={}, inflight_segments={}",
            worker_count,
            inflight_segments
        );

        Self {
            worker_count,
            inflight_segments,
        }
    }
}
