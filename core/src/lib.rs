//! acmi-core
//!
//! Pure Rust codec for ACMI (Tacview) flight-recording streams: header
//! bootstrap, time-frame decode/encode and a parallel frame decoder.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod headers;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::headers::Header;
    pub use crate::stream::framing::{Object, Property, TimeFrame};
    pub use crate::stream::{
        AcmiReader, AcmiWriter, ApiConfig, InputSource, OutputSink, decode_stream, encode_stream,
    };
    pub use crate::types::StreamError;
}
