use std::io::Write;

use crate::constants::{DELETE_MARKER, ESCAPE, FRAME_MARKER, KEY_VALUE_SEPARATOR, PROPERTY_SEPARATOR};
use crate::stream::framing::escape::escape_value;
use crate::stream::framing::types::{FrameError, Object, TimeFrame};

/// Encode one object line.
///
/// Layout:
///
/// ```text
/// -<hex-id>                      deleted (properties are never looked at)
/// <hex-id>,                      no properties
/// <hex-id>,<k1>=<v1>,<k2>=<v2>   values escaped
/// ```
pub fn encode_object<W: Write>(w: &mut W, object: &Object) -> Result<(), FrameError> {
    if object.deleted {
        writeln!(w, "{}{:x}", DELETE_MARKER, object.id)?;
        return Ok(());
    }

    // nothing is written for an object with an unwritable key
    if let Some(bad) = object.properties.iter().find(|p| !is_valid_key(&p.key)) {
        return Err(FrameError::InvalidKey(bad.key.clone()));
    }

    write!(w, "{:x}", object.id)?;

    if object.properties.is_empty() {
        writeln!(w, "{}", PROPERTY_SEPARATOR)?;
        return Ok(());
    }

    for property in &object.properties {
        write!(
            w,
            "{}{}{}{}",
            PROPERTY_SEPARATOR,
            property.key,
            KEY_VALUE_SEPARATOR,
            escape_value(&property.value),
        )?;
    }

    writeln!(w)?;
    Ok(())
}

/// Keys are written unescaped, so they may not contain anything the
/// tokenizer or the line reader would interpret.
pub fn is_valid_key(key: &str) -> bool {
    !key.contains([PROPERTY_SEPARATOR, KEY_VALUE_SEPARATOR, ESCAPE, '\n'])
}

/// Encode a frame, optionally preceded by its `#<offset>` marker line.
///
/// The header's initial frame is written without the marker.
pub fn encode_time_frame<W: Write>(
    w: &mut W,
    frame: &TimeFrame,
    include_offset: bool,
) -> Result<(), FrameError> {
    if include_offset {
        writeln!(w, "{}{:.6}", FRAME_MARKER as char, frame.offset)?;
    }

    for object in &frame.objects {
        encode_object(w, object)?;
    }

    Ok(())
}

/// Encode a frame into a fresh buffer.
pub fn encode_time_frame_to_vec(frame: &TimeFrame, include_offset: bool) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::new();
    encode_time_frame(&mut out, frame, include_offset)?;
    Ok(out)
}
