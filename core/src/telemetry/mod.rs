//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for the codec pipelines.
//!
//! Workers keep their own counters and stage times; the consumer merges them
//! into a single snapshot at the end of a run, so no locks or atomics sit on
//! the decode path.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
