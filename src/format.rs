//! Defines the physical binary layout of the log IR wire format.
//!
//! This module is the version-fixed protocol table: magic numbers, tag
//! bytes, placeholder bytes, and the metadata key names. Every other module
//! imports its constants from here; nothing redeclares them.
//!
//! ## Stream Overview
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │ Magic Number (4 bytes)           │  selects Four-byte or Eight-byte
//! ├──────────────────────────────────┤
//! │ Preamble Metadata                │  type tag + length + JSON blob
//! ├──────────────────────────────────┤
//! │ Message Frame 0                  │
//! ├──────────────────────────────────┤
//! │ Message Frame 1                  │
//! ├──────────────────────────────────┤
//! │ ...                              │
//! ├──────────────────────────────────┤
//! │ EOF Tag (1 byte, 0x00)           │
//! └──────────────────────────────────┘
//! ```
//!
//! ## Frame Anatomy
//!
//! Each message frame carries its variables first, then the logtype
//! template, then the timestamp:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Variable Records (0 or more)                            │
//! │   - Encoded var:    var_tag(1) · int(4 or 8, BE signed) │
//! │   - Dictionary var: len_tag(1) · len(1|2|4) · bytes     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Logtype Record                                          │
//! │   - len_tag(1) · len(1|2|4) · template bytes            │
//! ├─────────────────────────────────────────────────────────┤
//! │ Timestamp Record                                        │
//! │   - Eight-byte: ts_tag(1) · epoch_ms(8, BE signed)      │
//! │   - Four-byte:  ts_tag(1) · delta(1|2|4, BE signed)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All multi-byte integers on the wire are big-endian. The three
//! length-prefix widths exist purely to save bytes for short strings;
//! decoders accept any width form at any length.
//!
//! ## Logtype Templates
//!
//! A logtype is the static text of a log message with each variable
//! replaced by a single placeholder byte ([`placeholder`]). The escape byte
//! forces the byte that follows it to be read as literal static text, never
//! as a placeholder or another escape.

use serde::{Deserialize, Serialize};

/// Length of the stream magic number in bytes.
pub const MAGIC_NUMBER_LENGTH: usize = 4;

/// Magic number opening a stream in the four-byte encoding.
pub const FOUR_BYTE_MAGIC_NUMBER: [u8; MAGIC_NUMBER_LENGTH] = [0xFD, 0x2F, 0xB5, 0x29];

/// Magic number opening a stream in the eight-byte encoding.
pub const EIGHT_BYTE_MAGIC_NUMBER: [u8; MAGIC_NUMBER_LENGTH] = [0xFD, 0x2F, 0xB5, 0x30];

/// The stream terminator tag. A frame boundary followed by this byte is a
/// clean end of stream.
pub const EOF_TAG: u8 = 0x00;

/// Tags used only inside the preamble.
pub mod metadata {
    /// Metadata-type tag declaring a JSON-encoded metadata blob.
    pub const JSON_ENCODING: u8 = 0x01;

    /// Metadata length is a u8.
    pub const LENGTH_U8: u8 = 0x11;
    /// Metadata length is a u16.
    pub const LENGTH_U16: u8 = 0x12;

    /// Required key: protocol version string.
    pub const VERSION_KEY: &str = "VERSION";
    /// Optional key: IANA timezone identifier of the producer.
    pub const TIMEZONE_ID_KEY: &str = "TZ_ID";
    /// Optional key: millisecond epoch the four-byte deltas accumulate from,
    /// as a stringified integer.
    pub const REFERENCE_TIMESTAMP_KEY: &str = "REFERENCE_TIMESTAMP";
    /// Optional key: strftime-style pattern the producer stripped from the
    /// raw log text.
    pub const TIMESTAMP_PATTERN_KEY: &str = "TIMESTAMP_PATTERN";
    /// Optional key: syntax family of [`TIMESTAMP_PATTERN_KEY`].
    pub const TIMESTAMP_PATTERN_SYNTAX_KEY: &str = "TIMESTAMP_PATTERN_SYNTAX";
}

/// Tags appearing inside message frames.
pub mod payload {
    /// Encoded variable, 4-byte signed payload (four-byte streams only).
    pub const VAR_FOUR_BYTE: u8 = 0x18;
    /// Encoded variable, 8-byte signed payload (eight-byte streams only).
    pub const VAR_EIGHT_BYTE: u8 = 0x19;

    /// Dictionary variable with a u8 length prefix.
    pub const VAR_STR_LEN_U8: u8 = 0x11;
    /// Dictionary variable with a u16 length prefix.
    pub const VAR_STR_LEN_U16: u8 = 0x12;
    /// Dictionary variable with an i32 length prefix. Negative lengths are
    /// a corrupted stream.
    pub const VAR_STR_LEN_I32: u8 = 0x13;

    /// Logtype with a u8 length prefix.
    pub const LOGTYPE_LEN_U8: u8 = 0x21;
    /// Logtype with a u16 length prefix.
    pub const LOGTYPE_LEN_U16: u8 = 0x22;
    /// Logtype with an i32 length prefix. Negative lengths are a corrupted
    /// stream.
    pub const LOGTYPE_LEN_I32: u8 = 0x23;

    /// Absolute millisecond timestamp, 8-byte signed (eight-byte streams).
    pub const TS_ABSOLUTE: u8 = 0x30;
    /// Timestamp delta, 1-byte signed (four-byte streams).
    pub const TS_DELTA_I8: u8 = 0x31;
    /// Timestamp delta, 2-byte signed (four-byte streams).
    pub const TS_DELTA_I16: u8 = 0x32;
    /// Timestamp delta, 4-byte signed (four-byte streams).
    pub const TS_DELTA_I32: u8 = 0x33;
}

/// The distinguished bytes inside logtype templates.
///
/// Placeholder values are protocol-global and shared with the encoder side.
pub mod placeholder {
    /// Marks the position of a float variable.
    pub const FLOAT: u8 = 0x11;
    /// Marks the position of an integer variable.
    pub const INTEGER: u8 = 0x12;
    /// Marks the position of a dictionary variable.
    pub const DICTIONARY: u8 = 0x13;
    /// The byte after an escape is literal static text.
    pub const ESCAPE: u8 = 0x5C;
}

/// The two wire variants of the IR.
///
/// The variant is fixed by the magic number for the life of a stream. It
/// selects the encoded-variable width, the timestamp encoding, and the tag
/// set accepted for variable and timestamp records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingType {
    /// 32-bit encoded variables, delta-encoded timestamps.
    FourByte,
    /// 64-bit encoded variables, absolute millisecond timestamps.
    EightByte,
}

impl EncodingType {
    /// The magic number that opens a stream of this variant.
    pub fn magic_number(&self) -> &'static [u8; MAGIC_NUMBER_LENGTH] {
        match self {
            Self::FourByte => &FOUR_BYTE_MAGIC_NUMBER,
            Self::EightByte => &EIGHT_BYTE_MAGIC_NUMBER,
        }
    }

    /// Classifies a magic number. Returns `None` for anything that is not
    /// exactly one of the two fixed octet strings.
    pub fn from_magic_number(bytes: &[u8]) -> Option<Self> {
        if bytes == FOUR_BYTE_MAGIC_NUMBER {
            Some(Self::FourByte)
        } else if bytes == EIGHT_BYTE_MAGIC_NUMBER {
            Some(Self::EightByte)
        } else {
            None
        }
    }
}

impl std::fmt::Display for EncodingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FourByte => write!(f, "four-byte"),
            Self::EightByte => write!(f, "eight-byte"),
        }
    }
}
