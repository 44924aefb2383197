//! Stream decoding: preamble parsing and the per-message state machine.
//!
//! A stream opens with a magic number fixing the wire variant, followed by
//! a typed, length-prefixed metadata blob, followed by message frames until
//! the EOF tag. This module drives that sequence:
//!
//! 1. [`get_encoding_type`] reads the magic number once per stream.
//! 2. [`decode_preamble`] (copy form) or [`decode_preamble_span`] (seek
//!    form) consumes the metadata.
//! 3. [`four_byte::decode_next_message`] / [`eight_byte::decode_next_message`]
//!    decode one frame at a time.
//!
//! The two variant modules are thin instantiations of one generic
//! assembler; the state machine is written once, parameterized by
//! [`IrEncoding`].
//!
//! ## Per-frame state machine
//!
//! ```text
//! read tag ──► EOF tag?        ──► clean end of stream (Ok(None))
//!          ──► variable tag?   ──► read variable, loop
//!          ──► logtype tag?    ──► read logtype
//!          ──► anything else   ──► corrupted stream
//! read tag ──► timestamp tag?  ──► read timestamp ──► render message
//!          ──► anything else   ──► corrupted stream
//! ```
//!
//! Errors are never recovered locally. A corrupted stream is poisoned; an
//! incomplete stream may be retried only if the underlying reader supports
//! resumption. The reader is left wherever the failing read stopped.

use crate::codec::read_int;
use crate::encoding::{EightByteEncoding, EpochTimeMs, FourByteEncoding, IrEncoding};
use crate::error::{LogirError, Result};
use crate::format::{metadata, payload, EncodingType, EOF_TAG, MAGIC_NUMBER_LENGTH};
use crate::reader::IrReader;
use crate::render::decode_message;

/// A fully reconstructed log message.
///
/// For eight-byte streams `timestamp` is an absolute millisecond epoch; for
/// four-byte streams it is the signed delta against the previous message
/// (accumulation is the caller's job, or use [`IrStream`](crate::IrStream)
/// which does it for you).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// The rendered message text.
    pub message: String,
    /// Absolute timestamp or timestamp delta, depending on the variant.
    pub timestamp: EpochTimeMs,
}

/// Location of the metadata blob, as returned by the seek form of preamble
/// decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSpan {
    /// The opaque metadata-type tag byte.
    pub metadata_type: u8,
    /// Absolute offset of the first metadata byte.
    pub start: u64,
    /// Size of the blob in bytes.
    pub size: u16,
}

/// The preamble metadata, read into a caller-owned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// The opaque metadata-type tag byte.
    pub metadata_type: u8,
    /// The metadata blob.
    pub metadata: Vec<u8>,
}

/// Reads the stream's magic number and returns the wire variant it selects.
///
/// Exactly one of the two fixed magic numbers must match; anything else is
/// a corrupted stream.
pub fn get_encoding_type<R: IrReader + ?Sized>(reader: &mut R) -> Result<EncodingType> {
    let mut magic = [0u8; MAGIC_NUMBER_LENGTH];
    reader.try_read_exact(&mut magic)?;
    EncodingType::from_magic_number(&magic).ok_or_else(|| {
        LogirError::CorruptedStream(format!("unknown magic number {magic:02X?}"))
    })
}

/// Reads the metadata-type tag and the length of the blob that follows.
fn read_metadata_info<R: IrReader + ?Sized>(reader: &mut R) -> Result<(u8, u16)> {
    let metadata_type = read_int::<u8, R>(reader)?;
    let length_tag = read_int::<u8, R>(reader)?;
    let size = match length_tag {
        metadata::LENGTH_U8 => u16::from(read_int::<u8, R>(reader)?),
        metadata::LENGTH_U16 => read_int::<u16, R>(reader)?,
        other => {
            return Err(LogirError::CorruptedStream(format!(
                "tag 0x{other:02X} is not a metadata-length tag"
            )))
        }
    };
    Ok((metadata_type, size))
}

/// Decodes the preamble, seeking past the metadata blob instead of reading
/// it.
///
/// Requires a seekable reader; fails with an incomplete-stream error when
/// the post-blob position cannot be reached. Use [`decode_preamble`] to
/// read the blob into memory instead.
pub fn decode_preamble_span<R: IrReader + ?Sized>(reader: &mut R) -> Result<MetadataSpan> {
    let (metadata_type, size) = read_metadata_info(reader)?;
    let start = reader.position();
    reader.try_seek_from_begin(start + u64::from(size))?;
    Ok(MetadataSpan {
        metadata_type,
        start,
        size,
    })
}

/// Decodes the preamble, reading the metadata blob into a caller-owned
/// buffer.
pub fn decode_preamble<R: IrReader + ?Sized>(reader: &mut R) -> Result<Preamble> {
    let (metadata_type, size) = read_metadata_info(reader)?;
    let mut blob = vec![0u8; usize::from(size)];
    reader.try_read_exact(&mut blob)?;
    Ok(Preamble {
        metadata_type,
        metadata: blob,
    })
}

/// The two shapes a variable record can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VariableKind {
    /// Fixed-width integer token.
    Encoded,
    /// Length-prefixed string.
    Dictionary,
}

/// Classifies `tag` as a variable tag of the given variant, or `None` when
/// it opens no variable record (and the assembler should move on to the
/// logtype).
pub(crate) fn classify_variable_tag<E: IrEncoding>(tag: u8) -> Option<VariableKind> {
    match tag {
        payload::VAR_STR_LEN_U8 | payload::VAR_STR_LEN_U16 | payload::VAR_STR_LEN_I32 => {
            Some(VariableKind::Dictionary)
        }
        t if t == E::VAR_TAG => Some(VariableKind::Encoded),
        _ => None,
    }
}

/// Reads a length in one of the three prefix widths and then that many
/// bytes as a UTF-8 string. `tags` lists the accepted u8/u16/i32 length
/// tags for the record kind named by `what`.
fn parse_string_record<R: IrReader + ?Sized>(
    reader: &mut R,
    tag: u8,
    tags: [u8; 3],
    what: &str,
) -> Result<String> {
    let length = if tag == tags[0] {
        usize::from(read_int::<u8, R>(reader)?)
    } else if tag == tags[1] {
        usize::from(read_int::<u16, R>(reader)?)
    } else if tag == tags[2] {
        let length = read_int::<i32, R>(reader)?;
        usize::try_from(length).map_err(|_| {
            LogirError::CorruptedStream(format!("negative {what} length {length}"))
        })?
    } else {
        return Err(LogirError::CorruptedStream(format!(
            "tag 0x{tag:02X} does not open a {what} record"
        )));
    };
    reader.try_read_string(length)
}

/// Parses a logtype record whose length tag has already been read.
pub(crate) fn parse_logtype<R: IrReader + ?Sized>(reader: &mut R, tag: u8) -> Result<String> {
    parse_string_record(
        reader,
        tag,
        [
            payload::LOGTYPE_LEN_U8,
            payload::LOGTYPE_LEN_U16,
            payload::LOGTYPE_LEN_I32,
        ],
        "logtype",
    )
}

/// Parses a dictionary-variable record whose length tag has already been
/// read.
pub(crate) fn parse_dictionary_var<R: IrReader + ?Sized>(reader: &mut R, tag: u8) -> Result<String> {
    parse_string_record(
        reader,
        tag,
        [
            payload::VAR_STR_LEN_U8,
            payload::VAR_STR_LEN_U16,
            payload::VAR_STR_LEN_I32,
        ],
        "dictionary variable",
    )
}

/// The shared per-frame state machine. `Ok(None)` is a clean end of
/// stream.
fn generic_decode_next_message<E, R>(reader: &mut R) -> Result<Option<DecodedMessage>>
where
    E: IrEncoding,
    R: IrReader + ?Sized,
{
    let mut tag = read_int::<u8, R>(reader)?;
    if tag == EOF_TAG {
        return Ok(None);
    }

    // Variable records come first, in wire order per list.
    let mut encoded_vars: Vec<E::Var> = Vec::new();
    let mut dictionary_vars: Vec<String> = Vec::new();
    while let Some(kind) = classify_variable_tag::<E>(tag) {
        match kind {
            VariableKind::Encoded => encoded_vars.push(E::read_var(reader)?),
            VariableKind::Dictionary => dictionary_vars.push(parse_dictionary_var(reader, tag)?),
        }
        tag = read_int::<u8, R>(reader)?;
    }

    // The first non-variable tag must open the logtype record.
    let logtype = parse_logtype(reader, tag)?;

    // The timestamp record closes the frame.
    tag = read_int::<u8, R>(reader)?;
    let timestamp = E::parse_timestamp(reader, tag)?;

    let message = decode_message::<E>(&logtype, &encoded_vars, &dictionary_vars)?;
    Ok(Some(DecodedMessage { message, timestamp }))
}

/// Decoding operations for four-byte streams.
pub mod four_byte {
    use super::*;

    /// Decodes the next message frame of a four-byte stream.
    ///
    /// Returns `Ok(None)` at a clean end of stream. The returned
    /// timestamp is a signed delta against the previous message.
    pub fn decode_next_message<R: IrReader + ?Sized>(
        reader: &mut R,
    ) -> Result<Option<DecodedMessage>> {
        generic_decode_next_message::<FourByteEncoding, R>(reader)
    }
}

/// Decoding operations for eight-byte streams.
pub mod eight_byte {
    use super::*;

    /// Decodes the next message frame of an eight-byte stream.
    ///
    /// Returns `Ok(None)` at a clean end of stream. The returned
    /// timestamp is an absolute millisecond epoch.
    pub fn decode_next_message<R: IrReader + ?Sized>(
        reader: &mut R,
    ) -> Result<Option<DecodedMessage>> {
        generic_decode_next_message::<EightByteEncoding, R>(reader)
    }
}
