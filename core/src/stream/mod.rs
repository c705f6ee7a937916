//! stream: ACMI time-frame codec.
//!
//! Layers, bottom-up: `framing` (one frame ⇄ text), `segmenting` (stream →
//! per-frame byte segments), `frame_worker` + `pipeline` (parallel decode),
//! `io` (reader, writer, ordering), `core` (stable public API).

pub mod parallelism;
pub mod pipeline;
pub mod io;
pub mod core;

pub mod segmenting;
pub mod framing;
pub mod frame_worker;

pub use self::io::{
    AcmiReader,
    AcmiWriter,
    InputSource,
    OrderedFrameCollector,
    OutputSink,
    strip_bom,
};

pub use self::core::{
    ApiConfig,
    DecodedStream,
    EncodedStream,
    decode_stream,
    encode_stream,
    validate_api_config,
};

pub use pipeline::{PipelineConfig, run_decode_pipeline};
pub use parallelism::ParallelismProfile;
