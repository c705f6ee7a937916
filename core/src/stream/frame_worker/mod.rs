//! Frame decode workers.
//!
//! Workers:
//! - pull raw segments from a shared channel
//! - decode each one independently
//! - push decoded frames (or the first error) to a shared output channel
//!
//! They are:
//! - CPU-bound
//! - Stateless between segments
//! - Not order-preserving as a pool

pub mod types;
pub mod decode;

pub use types::{
    DecodedFrame,
    FrameWorkerError,
};

pub use decode::{
    FrameDecodeWorker,
    process_segment,
};
