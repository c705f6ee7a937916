//! Backslash escaping for property blobs.

use crate::constants::{ESCAPE, PROPERTY_SEPARATOR};
use crate::stream::framing::types::FrameError;

/// Split a property blob on unescaped commas.
///
/// A backslash is consumed and the character after it is copied literally,
/// whatever it is. An empty blob yields a single empty token.
pub fn split_property_tokens(blob: &str) -> Result<Vec<String>, FrameError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_escape = false;

    for c in blob.chars() {
        if in_escape {
            current.push(c);
            in_escape = false;
        } else if c == ESCAPE {
            in_escape = true;
        } else if c == PROPERTY_SEPARATOR {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    if in_escape {
        return Err(FrameError::MalformedEscape);
    }

    tokens.push(current);
    Ok(tokens)
}

/// Escape a property value for the wire.
///
/// Backslashes are doubled first, then each newline becomes `\`+newline and
/// each comma becomes `\,`. The newline pass runs before the comma pass; it
/// introduces no commas.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }

    let out = out.replace('\n', "\\\n");
    out.replace(PROPERTY_SEPARATOR, "\\,")
}

/// True when `line` ends in a backslash that is not itself escaped.
///
/// Only an odd run of trailing backslashes marks a continuation.
pub fn has_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == ESCAPE).count();
    trailing % 2 == 1
}
