//! Frame segmenting.
//!
//! Responsibilities:
//! - Cut the stream into one byte segment per frame
//! - Number segments in stream order
//!
//! Non-responsibilities:
//! - Property escapes (only line continuations are tracked)
//! - Decoding
//! - Parallelism

pub mod types;
pub mod chunker;

pub use types::{
    FrameSegment,
    SegmentMessage,
};
pub use chunker::FrameChunker;
