//! High-level stream API.
//!
//! [`IrStream`] wraps a reader, consumes the magic number and preamble on
//! construction, and then yields fully reconstructed messages with
//! absolute timestamps regardless of the wire variant: for four-byte
//! streams it accumulates the per-message deltas onto a running timestamp
//! seeded from the metadata's reference timestamp. Callers that need the
//! raw deltas use the variant modules in [`crate::decode`] directly.

use std::path::Path;

use crate::decode::{decode_preamble, eight_byte, four_byte, get_encoding_type, Preamble};
use crate::encoding::EpochTimeMs;
use crate::error::Result;
use crate::format::EncodingType;
use crate::metadata::StreamMetadata;
use crate::reader::{BufferReader, IrReader};

/// A decoded log message with an absolute timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    /// The rendered message text.
    pub text: String,
    /// Millisecond epoch timestamp.
    pub timestamp: EpochTimeMs,
}

/// A log IR stream being decoded message by message.
///
/// Construction fixes the wire variant and consumes the preamble; the
/// stream then decodes one frame per [`next_message`](Self::next_message)
/// call, in wire order, until the EOF tag.
#[derive(Debug)]
pub struct IrStream<R: IrReader = BufferReader> {
    reader: R,
    encoding: EncodingType,
    preamble: Preamble,
    current_timestamp: EpochTimeMs,
}

impl IrStream<BufferReader> {
    /// Opens a stream from a file.
    ///
    /// With the `mmap` feature the file is memory-mapped; otherwise it is
    /// read into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        #[cfg(feature = "mmap")]
        let reader = BufferReader::map_file(path)?;
        #[cfg(not(feature = "mmap"))]
        let reader = BufferReader::from_vec(std::fs::read(path)?);
        Self::new(reader)
    }

    /// Opens a stream over an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(BufferReader::from_vec(bytes))
    }
}

impl<R: IrReader> IrStream<R> {
    /// Opens a stream over any reader positioned at the magic number.
    pub fn new(mut reader: R) -> Result<Self> {
        let encoding = get_encoding_type(&mut reader)?;
        let preamble = decode_preamble(&mut reader)?;

        // Four-byte deltas accumulate from the metadata's reference
        // timestamp; streams without one start at zero.
        let current_timestamp = match encoding {
            EncodingType::FourByte => StreamMetadata::from_preamble(&preamble)
                .ok()
                .and_then(|m| m.reference_timestamp_ms())
                .unwrap_or(0),
            EncodingType::EightByte => 0,
        };

        Ok(Self {
            reader,
            encoding,
            preamble,
            current_timestamp,
        })
    }

    /// The wire variant fixed by the magic number.
    pub fn encoding_type(&self) -> EncodingType {
        self.encoding
    }

    /// The opaque metadata-type tag byte.
    pub fn metadata_type(&self) -> u8 {
        self.preamble.metadata_type
    }

    /// The raw metadata blob.
    pub fn metadata(&self) -> &[u8] {
        &self.preamble.metadata
    }

    /// The metadata parsed as the standard JSON document.
    ///
    /// Fails for streams whose metadata-type is not the JSON encoding.
    pub fn parsed_metadata(&self) -> Result<StreamMetadata> {
        StreamMetadata::from_preamble(&self.preamble)
    }

    /// Decodes the next message. `Ok(None)` is a clean end of stream.
    pub fn next_message(&mut self) -> Result<Option<LogMessage>> {
        let decoded = match self.encoding {
            EncodingType::FourByte => four_byte::decode_next_message(&mut self.reader)?,
            EncodingType::EightByte => eight_byte::decode_next_message(&mut self.reader)?,
        };

        Ok(decoded.map(|d| {
            let timestamp = match self.encoding {
                EncodingType::FourByte => {
                    self.current_timestamp = self.current_timestamp.saturating_add(d.timestamp);
                    self.current_timestamp
                }
                EncodingType::EightByte => d.timestamp,
            };
            LogMessage {
                text: d.message,
                timestamp,
            }
        }))
    }

    /// Iterates over the remaining messages.
    ///
    /// Yields `Err` once and then stops if the stream fails mid-frame.
    pub fn messages(&mut self) -> Messages<'_, R> {
        Messages {
            stream: self,
            done: false,
        }
    }
}

/// Iterator over the messages of an [`IrStream`].
#[derive(Debug)]
pub struct Messages<'a, R: IrReader> {
    stream: &'a mut IrStream<R>,
    done: bool,
}

impl<R: IrReader> Iterator for Messages<'_, R> {
    type Item = Result<LogMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.next_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
