//! Time-frame data model.
//!
//! A `TimeFrame` is a pure delta container: it holds only the objects that
//! changed inside one frame segment and is never merged with other frames.

use std::io;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One `key=value` entry of an object line.
///
/// `value` holds the unescaped text and may contain raw newlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Delta for a single object within one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub id: u64,
    pub properties: Vec<Property>,
    pub deleted: bool,
}

impl Object {
    pub fn new(id: u64) -> Self {
        Self { id, properties: Vec::new(), deleted: false }
    }

    pub fn deleted(id: u64) -> Self {
        Self { id, properties: Vec::new(), deleted: true }
    }

    /// First property with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Update the first property with `key` in place, or append a new one.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.key == key) {
            Some(property) => property.value = value,
            None => self.properties.push(Property::new(key, value)),
        }
    }

    /// Append without looking for an existing key (decode path).
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.push(Property::new(key, value));
    }
}

/// All object deltas observed in one frame, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeFrame {
    /// Seconds relative to the header's reference time.
    pub offset: f64,
    pub objects: Vec<Object>,
}

impl TimeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: f64) -> Self {
        Self { offset, objects: Vec::new() }
    }

    pub fn get(&self, id: u64) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Object> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    /// Input ended while an escape (or a continuation) was still open.
    #[error("malformed escape: input ends inside an escape sequence")]
    MalformedEscape,

    /// Object line does not match `[-]<hex-id>[,<properties>]`.
    #[error("malformed object line: `{0}`")]
    MalformedLine(String),

    /// Property token without a `=` separator.
    #[error("malformed property: `{0}`")]
    MalformedProperty(String),

    /// Property key that cannot be written: it contains `,`, `=`, `\` or a newline.
    #[error("invalid property key: `{0}`")]
    InvalidKey(String),

    /// Expected a `#<offset>` line and found something else.
    #[error("missing frame offset, found `{0}`")]
    MissingOffset(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
