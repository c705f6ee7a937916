//! headers/mod.rs
//! ACMI stream header: format tags plus the initial (offset-less) frame.
//!
//! Responsibilities:
//! - Read the `FileType` / `FileVersion` lines and the initial frame
//! - Extract and validate the global `ReferenceTime`
//! - Write a header back out
//!
//! Non-responsibilities:
//! - BOM handling (see `stream::io`)
//! - Frames after the header

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
