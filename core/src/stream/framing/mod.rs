//! Wire framing for ACMI time frames.
//!
//! Responsibilities:
//! - Define the time-frame / object / property model
//! - Tokenize escaped property blobs
//! - Match object lines
//! - Decode one frame segment, encode one frame
//!
//! Non-responsibilities:
//! - Chunking the stream into segments
//! - Header bootstrap
//! - Parallelism

pub mod types;
pub mod escape;
pub mod grammar;
pub mod encode;
pub mod decode;

pub use types::{
    FrameError,
    Object,
    Property,
    TimeFrame,
};
pub use escape::{
    escape_value,
    split_property_tokens,
};
pub use grammar::{
    ObjectLine,
    parse_object_line,
};
pub use encode::{
    encode_object,
    encode_time_frame,
    encode_time_frame_to_vec,
    is_valid_key,
};
pub use decode::{
    decode_segment,
    decode_time_frame,
};
