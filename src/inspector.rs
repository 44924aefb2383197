//! Tools for inspecting the physical structure of IR streams.
//!
//! Useful for debugging encoders and diagnosing damaged streams: the
//! inspector walks every frame without rendering messages and reports what
//! it saw. Structural failures mid-walk do not abort the report; the walk
//! stops and the failure is recorded in-band, so partial reports stay
//! available for truncated or corrupted streams.

use serde::Serialize;

use crate::codec::read_int;
use crate::decode::{
    classify_variable_tag, decode_preamble, get_encoding_type, parse_dictionary_var,
    parse_logtype, VariableKind,
};
use crate::encoding::{EightByteEncoding, EpochTimeMs, FourByteEncoding, IrEncoding};
use crate::error::{LogirError, Result};
use crate::format::{EncodingType, EOF_TAG};
use crate::reader::IrReader;

/// A structural report of an IR stream.
#[derive(Debug, Serialize)]
pub struct StreamReport {
    /// The wire variant selected by the magic number.
    pub encoding: EncodingType,
    /// The opaque metadata-type tag byte.
    pub metadata_type: u8,
    /// Size of the metadata blob in bytes.
    pub metadata_size: usize,
    /// One entry per message frame, in wire order.
    pub frames: Vec<FrameInfo>,
    /// How the walk ended.
    pub status: StreamStatus,
}

/// Structure of a single message frame.
#[derive(Debug, Serialize)]
pub struct FrameInfo {
    /// Absolute offset of the frame's first tag byte.
    pub position: u64,
    /// Number of encoded-variable records.
    pub encoded_var_count: usize,
    /// Number of dictionary-variable records.
    pub dict_var_count: usize,
    /// Length of the logtype template in bytes.
    pub logtype_len: usize,
    /// Raw timestamp field: absolute epoch or delta, depending on the
    /// variant.
    pub timestamp: EpochTimeMs,
}

/// Terminal state of an inspection walk.
#[derive(Debug, Serialize)]
pub enum StreamStatus {
    /// The EOF tag was reached cleanly.
    Complete,
    /// The stream ended mid-frame.
    Truncated {
        /// What was being read when the bytes ran out.
        detail: String,
    },
    /// The stream violates the wire format.
    Corrupted {
        /// The violation observed.
        detail: String,
    },
    /// The byte source itself failed.
    SourceError {
        /// The underlying failure.
        detail: String,
    },
}

impl From<LogirError> for StreamStatus {
    fn from(err: LogirError) -> Self {
        match err {
            LogirError::IncompleteStream(detail) => Self::Truncated { detail },
            LogirError::CorruptedStream(detail) | LogirError::Decode(detail) => {
                Self::Corrupted { detail }
            }
            LogirError::Io(e) => Self::SourceError {
                detail: e.to_string(),
            },
        }
    }
}

/// The stream inspector tool.
#[derive(Debug)]
pub struct StreamInspector;

impl StreamInspector {
    /// Walks a whole stream and returns its structural report.
    ///
    /// The reader must be positioned at the magic number. Errors are
    /// returned only for the preamble; frame-level failures are recorded
    /// in [`StreamReport::status`].
    pub fn inspect<R: IrReader + ?Sized>(reader: &mut R) -> Result<StreamReport> {
        let encoding = get_encoding_type(reader)?;
        let preamble = decode_preamble(reader)?;

        let mut frames = Vec::new();
        let status = match encoding {
            EncodingType::FourByte => walk::<FourByteEncoding, R>(reader, &mut frames),
            EncodingType::EightByte => walk::<EightByteEncoding, R>(reader, &mut frames),
        };

        Ok(StreamReport {
            encoding,
            metadata_type: preamble.metadata_type,
            metadata_size: preamble.metadata.len(),
            frames,
            status,
        })
    }
}

/// Walks frames until EOF or a failure, appending one [`FrameInfo`] per
/// complete frame.
fn walk<E, R>(reader: &mut R, frames: &mut Vec<FrameInfo>) -> StreamStatus
where
    E: IrEncoding,
    R: IrReader + ?Sized,
{
    loop {
        let position = reader.position();
        match walk_frame::<E, R>(reader, position) {
            Ok(Some(frame)) => frames.push(frame),
            Ok(None) => return StreamStatus::Complete,
            Err(e) => return e.into(),
        }
    }
}

/// Reads one frame structurally. `Ok(None)` is the EOF tag.
fn walk_frame<E, R>(reader: &mut R, position: u64) -> Result<Option<FrameInfo>>
where
    E: IrEncoding,
    R: IrReader + ?Sized,
{
    let mut tag = read_int::<u8, R>(reader)?;
    if tag == EOF_TAG {
        return Ok(None);
    }

    let mut encoded_var_count = 0;
    let mut dict_var_count = 0;
    while let Some(kind) = classify_variable_tag::<E>(tag) {
        match kind {
            VariableKind::Encoded => {
                E::read_var(reader)?;
                encoded_var_count += 1;
            }
            VariableKind::Dictionary => {
                parse_dictionary_var(reader, tag)?;
                dict_var_count += 1;
            }
        }
        tag = read_int::<u8, R>(reader)?;
    }

    let logtype = parse_logtype(reader, tag)?;

    tag = read_int::<u8, R>(reader)?;
    let timestamp = E::parse_timestamp(reader, tag)?;

    Ok(Some(FrameInfo {
        position,
        encoded_var_count,
        dict_var_count,
        logtype_len: logtype.len(),
        timestamp,
    }))
}

impl std::fmt::Display for StreamReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== LOGIR STREAM REPORT ===")?;
        writeln!(f, "Encoding:      {}", self.encoding)?;
        writeln!(
            f,
            "Metadata:      type 0x{:02X}, {} bytes",
            self.metadata_type, self.metadata_size
        )?;
        writeln!(f, "Frames:        {}", self.frames.len())?;
        writeln!(f, "\n[FRAME LAYOUT]")?;
        for (i, frame) in self.frames.iter().enumerate() {
            let connector = if i == self.frames.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            writeln!(
                f,
                "{}@{:#010x} vars: {} encoded + {} dict | logtype: {}b | ts: {}",
                connector,
                frame.position,
                frame.encoded_var_count,
                frame.dict_var_count,
                frame.logtype_len,
                frame.timestamp
            )?;
        }
        match &self.status {
            StreamStatus::Complete => writeln!(f, "Status: complete"),
            StreamStatus::Truncated { detail } => writeln!(f, "Status: TRUNCATED ({detail})"),
            StreamStatus::Corrupted { detail } => writeln!(f, "Status: CORRUPTED ({detail})"),
            StreamStatus::SourceError { detail } => writeln!(f, "Status: SOURCE ERROR ({detail})"),
        }
    }
}
