use std::io;
use thiserror::Error;

use crate::{
    headers::HeaderError,
    stream::{frame_worker::FrameWorkerError, framing::FrameError},
};

/// Unified stream error covering I/O, header, frame, worker, and generic validation.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Messages aim to be stable and contextual for logs.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header bootstrap failed; no partial header is usable.
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// Frame-level error (grammar, escape, offset).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A decode worker reported a failure.
    #[error("frame worker error: {0}")]
    FrameWorker(#[from] FrameWorkerError),

    /// Pipeline wiring failure (channel closed early).
    #[error("pipeline error: {0}")]
    PipelineError(&'static str),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
