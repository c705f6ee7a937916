//! headers/decode.rs
//!
//! Header bootstrap: two `Key=Value` lines, then the initial frame.

use std::io::BufRead;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{
    FILE_TYPE_KEY, FILE_VERSION_KEY, GLOBAL_OBJECT_ID, KEY_VALUE_SEPARATOR, LINE_TERMINATOR,
    REFERENCE_TIME_FORMAT, REFERENCE_TIME_KEY,
};
use crate::headers::types::{Header, HeaderError};
use crate::stream::framing::decode_time_frame;

/// Read the header from a BOM-free reader.
///
/// Lines are split at the last `=`. Keys other than `FileType` and
/// `FileVersion` are skipped until both have been seen. The reader is left
/// on the first `#` line (or at end of input).
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<Header, HeaderError> {
    let mut file_type: Option<String> = None;
    let mut file_version: Option<String> = None;

    while file_type.is_none() || file_version.is_none() {
        let mut raw = Vec::new();
        if reader.read_until(LINE_TERMINATOR, &mut raw)? == 0 {
            return Err(HeaderError::HeaderIncomplete(format!(
                "stream ended before {} and {}",
                FILE_TYPE_KEY, FILE_VERSION_KEY
            )));
        }
        let line = String::from_utf8(raw).map_err(|e| {
            HeaderError::MalformedKeyValue(String::from_utf8_lossy(e.as_bytes()).into_owned())
        })?;

        let line = line.trim_end_matches(['\n', '\r']);
        let Some((key, value)) = line.rsplit_once(KEY_VALUE_SEPARATOR) else {
            return Err(HeaderError::MalformedKeyValue(line.to_string()));
        };

        match key {
            // first occurrence wins
            FILE_TYPE_KEY if file_type.is_none() => file_type = Some(value.to_string()),
            FILE_VERSION_KEY if file_version.is_none() => file_version = Some(value.to_string()),
            other => log::debug!("[HEADER] skipping key {other:?}"),
        }
    }

    let initial_time_frame = decode_time_frame(reader, false)?;

    let global = initial_time_frame.get(GLOBAL_OBJECT_ID).ok_or_else(|| {
        HeaderError::HeaderIncomplete("initial frame has no global object (id 0)".to_string())
    })?;
    let raw_time = global.get(REFERENCE_TIME_KEY).ok_or_else(|| {
        HeaderError::HeaderIncomplete(format!("global object has no {REFERENCE_TIME_KEY}"))
    })?;
    let reference_time = parse_reference_time(&raw_time.value)?;

    // Both loop exits above set these.
    let (Some(file_type), Some(file_version)) = (file_type, file_version) else {
        return Err(HeaderError::HeaderIncomplete("missing format tags".to_string()));
    };

    log::debug!("[HEADER] {file_type} v{file_version}, reference time {reference_time}");

    Ok(Header {
        file_type,
        file_version,
        reference_time,
        initial_time_frame,
    })
}

/// Trailing whitespace (e.g. the `\r` of a CRLF line) is ignored.
pub fn parse_reference_time(raw: &str) -> Result<DateTime<Utc>, HeaderError> {
    NaiveDateTime::parse_from_str(raw.trim_end(), REFERENCE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| HeaderError::InvalidReferenceTime(raw.to_string()))
}
