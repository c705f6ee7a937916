//! headers/types.rs
//!
//! Header model and header errors.

use std::io;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_FILE_TYPE, DEFAULT_FILE_VERSION, GLOBAL_OBJECT_ID, REFERENCE_TIME_FORMAT,
    REFERENCE_TIME_KEY,
};
use crate::stream::framing::{FrameError, Object, TimeFrame};

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Stream ended (or the initial frame lacked object 0 / `ReferenceTime`)
    /// before the header was complete.
    #[error("header incomplete: {0}")]
    HeaderIncomplete(String),

    #[error("invalid reference time: {0:?}")]
    InvalidReferenceTime(String),

    /// A header line without `=`.
    #[error("malformed header line: {0:?}")]
    MalformedKeyValue(String),

    #[error("initial frame: {0}")]
    Frame(#[from] FrameError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Parsed stream header.
///
/// `initial_time_frame` is frame zero: the global object (id 0) and any other
/// objects declared before the first `#` line. Its offset is always 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub file_type: String,
    pub file_version: String,
    pub reference_time: DateTime<Utc>,
    pub initial_time_frame: TimeFrame,
}

impl Header {
    /// Header with the default format tags and an initial frame holding only
    /// the global object with its `ReferenceTime`.
    pub fn new(reference_time: DateTime<Utc>) -> Self {
        let mut global = Object::new(GLOBAL_OBJECT_ID);
        global.set(REFERENCE_TIME_KEY, format_reference_time(&reference_time));

        let mut initial_time_frame = TimeFrame::new();
        initial_time_frame.objects.push(global);

        Self {
            file_type: DEFAULT_FILE_TYPE.to_string(),
            file_version: DEFAULT_FILE_VERSION.to_string(),
            reference_time,
            initial_time_frame,
        }
    }

    /// The global object, if the initial frame declares one.
    pub fn global_object(&self) -> Option<&Object> {
        self.initial_time_frame.get(GLOBAL_OBJECT_ID)
    }
}

pub fn format_reference_time(time: &DateTime<Utc>) -> String {
    time.format(REFERENCE_TIME_FORMAT).to_string()
}
