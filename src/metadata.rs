//! Typed view of the preamble metadata.
//!
//! Streams declare their metadata encoding with the metadata-type tag; the
//! standard encoding is a JSON document
//! ([`JSON_ENCODING`](crate::format::metadata::JSON_ENCODING)) describing
//! the producer: protocol version, timezone, and how timestamps were
//! stripped from the raw text. This module decodes that document. Streams
//! with other metadata-type tags are opaque to it; their blobs stay with
//! the caller.

use serde::{Deserialize, Serialize};

use crate::decode::Preamble;
use crate::encoding::EpochTimeMs;
use crate::error::{LogirError, Result};
use crate::format::metadata;

/// The standard JSON metadata carried by a stream preamble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMetadata {
    /// Protocol version of the producer.
    #[serde(rename = "VERSION")]
    pub version: String,

    /// IANA timezone identifier of the producer, when known.
    #[serde(rename = "TZ_ID", default, skip_serializing_if = "Option::is_none")]
    pub timezone_id: Option<String>,

    /// Millisecond epoch the four-byte deltas accumulate from, as a
    /// stringified integer.
    #[serde(
        rename = "REFERENCE_TIMESTAMP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_timestamp: Option<String>,

    /// Pattern the producer used to strip timestamps out of the raw text.
    #[serde(
        rename = "TIMESTAMP_PATTERN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp_pattern: Option<String>,

    /// Syntax family of [`timestamp_pattern`](Self::timestamp_pattern).
    #[serde(
        rename = "TIMESTAMP_PATTERN_SYNTAX",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp_pattern_syntax: Option<String>,
}

impl StreamMetadata {
    /// Parses the standard JSON metadata out of a decoded preamble.
    ///
    /// The preamble's metadata-type must be
    /// [`JSON_ENCODING`](metadata::JSON_ENCODING); other metadata
    /// encodings are rejected as corrupted here because this helper cannot
    /// interpret them.
    pub fn from_preamble(preamble: &Preamble) -> Result<Self> {
        if preamble.metadata_type != metadata::JSON_ENCODING {
            return Err(LogirError::CorruptedStream(format!(
                "metadata type 0x{:02X} is not the JSON encoding",
                preamble.metadata_type
            )));
        }
        serde_json::from_slice(&preamble.metadata)
            .map_err(|e| LogirError::CorruptedStream(format!("invalid JSON metadata: {e}")))
    }

    /// The reference timestamp as a millisecond epoch, when present and
    /// well formed.
    pub fn reference_timestamp_ms(&self) -> Option<EpochTimeMs> {
        self.reference_timestamp.as_deref()?.parse().ok()
    }
}
