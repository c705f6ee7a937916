//! Grammar and configuration constants for the ACMI codec.
//!
//! Every pattern the decoder matches against lives here as an immutable
//! constant; nothing is compiled or allocated per call.

/// UTF-8 byte-order mark some writers place at the start of the stream.
pub const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// First byte of a frame-marker line (`#<offset>`).
pub const FRAME_MARKER: u8 = b'#';

/// Leading character of a deletion line (`-<hex-id>`).
pub const DELETE_MARKER: char = '-';

/// Escapes the following character inside a property blob.
pub const ESCAPE: char = '\\';

/// Separates properties on an object line.
pub const PROPERTY_SEPARATOR: char = ',';

/// Separates a property key from its value (first occurrence wins).
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Line terminator.
pub const LINE_TERMINATOR: u8 = b'\n';

// ================= Header =================

pub const FILE_TYPE_KEY: &str = "FileType";
pub const FILE_VERSION_KEY: &str = "FileVersion";

/// Values written by `AcmiWriter` when a header does not override them.
pub const DEFAULT_FILE_TYPE: &str = "text/acmi/tacview";
pub const DEFAULT_FILE_VERSION: &str = "2.2";

/// Reserved id of the global (session metadata) object.
pub const GLOBAL_OBJECT_ID: u64 = 0;

/// Property of the global object holding the reference timestamp.
pub const REFERENCE_TIME_KEY: &str = "ReferenceTime";

/// `YYYY-MM-DDTHH:MM:SSZ`, always UTC.
pub const REFERENCE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ================= Pipeline =================

/// Defaults when Option<T> is None
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_QUEUE_CAP: usize = 16;

/// Upper bounds accepted by `validate_api_config`.
pub const MAX_WORKERS: usize = 256;
pub const MAX_QUEUE_CAP: usize = 4096;

/// Size assumed for one frame segment when budgeting in-flight memory.
pub const ASSUMED_SEGMENT_SIZE: u64 = 64 * 1024; // 64 KiB
