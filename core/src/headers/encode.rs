//! headers/encode.rs

use std::io::Write;

use crate::constants::{FILE_TYPE_KEY, FILE_VERSION_KEY, KEY_VALUE_SEPARATOR};
use crate::headers::types::{Header, HeaderError};
use crate::stream::framing::encode_time_frame;

/// Write the two tag lines and the initial frame (no offset line).
///
/// The BOM is the writer's job; this only produces the header text.
pub fn write_header<W: Write>(w: &mut W, header: &Header) -> Result<(), HeaderError> {
    writeln!(w, "{}{}{}", FILE_TYPE_KEY, KEY_VALUE_SEPARATOR, header.file_type)?;
    writeln!(w, "{}{}{}", FILE_VERSION_KEY, KEY_VALUE_SEPARATOR, header.file_version)?;
    encode_time_frame(w, &header.initial_time_frame, false)?;
    Ok(())
}
