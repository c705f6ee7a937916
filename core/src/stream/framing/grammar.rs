//! Object line grammar: `[-]<hex-id>[,<property blob>]`.

use crate::constants::{DELETE_MARKER, PROPERTY_SEPARATOR};
use crate::stream::framing::types::FrameError;

/// Borrowed view of one matched object line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectLine<'a> {
    pub id: u64,
    pub deleted: bool,
    /// Raw, still-escaped text after the first `,` (None when absent).
    pub blob: Option<&'a str>,
}

/// Match one logical line (continuations already joined).
///
/// The blob is not split here; commas and newlines inside it belong to the
/// tokenizer.
pub fn parse_object_line(line: &str) -> Result<ObjectLine<'_>, FrameError> {
    let malformed = || FrameError::MalformedLine(line.to_string());

    let (deleted, rest) = match line.strip_prefix(DELETE_MARKER) {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let hex_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    if hex_len == 0 {
        return Err(malformed());
    }

    let (hex, tail) = rest.split_at(hex_len);
    let id = u64::from_str_radix(hex, 16).map_err(|_| malformed())?;

    let blob = if tail.is_empty() {
        None
    } else {
        match tail.strip_prefix(PROPERTY_SEPARATOR) {
            Some(blob) => Some(blob),
            None => return Err(malformed()),
        }
    };

    Ok(ObjectLine { id, deleted, blob })
}
