//! # Logir
//!
//! A decoder for the compact, tag-driven intermediate representation (IR)
//! of structured log streams.
//!
//! ## Overview
//!
//! The IR decomposes every log message into three parts: a *logtype*
//! template (the static text, with one placeholder byte per variable), a
//! list of *encoded variables* (numeric tokens packed into fixed-width
//! integers), and a list of *dictionary variables* (arbitrary strings kept
//! verbatim). Logir reads the framed byte stream back and interpolates the
//! variables into the template, reproducing the original message text and
//! its timestamp.
//!
//! Two wire variants exist, selected once per stream by the magic number:
//!
//! - **Eight-byte encoding**: absolute millisecond timestamps, 64-bit
//!   encoded variables.
//! - **Four-byte encoding**: delta-encoded timestamps, 32-bit encoded
//!   variables. Smaller streams, at the cost of a running timestamp.
//!
//! ## Key Features
//!
//! - **Strict validation:** every structural violation is a typed error;
//!   the decoder never panics on malformed input and never resynchronizes
//!   past corruption.
//! - **Pluggable byte sources:** decode from memory, a buffered file, or a
//!   memory-mapped file (feature `mmap`) through the small
//!   [`IrReader`] trait.
//! - **One state machine:** the two variants share a single generic
//!   assembler parameterized by [`IrEncoding`]; there is no duplicated
//!   decoding logic.
//! - **Structural inspection:** [`StreamInspector`] walks damaged streams
//!   and reports frame layout without rendering messages.
//!
//! ## Architecture
//!
//! ```text
//! bytes ──► reader ──► codec ──► tag dispatch ──► field parsers
//!                                                     │
//!               logtype + variables + timestamp ◄─────┘
//!                          │
//!                      renderer ──► message text + timestamp
//! ```
//!
//! The [`format`] module is the version-fixed protocol table (magic
//! numbers, tags, placeholder bytes); [`decode`] drives the per-message
//! state machine; [`render`] interpolates variables back into the logtype;
//! [`api`] wraps it all into an iterator-style stream.
//!
//! ## Quick Start
//!
//! ```rust
//! use logir::IrStream;
//!
//! // A minimal eight-byte stream: magic, metadata, one message, EOF.
//! let mut bytes = vec![0xFD, 0x2F, 0xB5, 0x30];
//! bytes.extend([0x01, 0x11, 0x02]); // JSON metadata, u8 length, 2 bytes
//! bytes.extend(b"{}");
//! bytes.extend([0x21, 0x05]); // logtype record, u8 length, 5 bytes
//! bytes.extend(b"hello");
//! bytes.push(0x30); // absolute timestamp record
//! bytes.extend(1_700_000_000_000i64.to_be_bytes());
//! bytes.push(0x00); // EOF
//!
//! let mut stream = IrStream::from_bytes(bytes)?;
//! while let Some(message) = stream.next_message()? {
//!     println!("{} {}", message.timestamp, message.text);
//! }
//! # Ok::<(), logir::LogirError>(())
//! ```
//!
//! Lower-level entry points mirror the wire format directly:
//! [`get_encoding_type`], [`decode_preamble`] / [`decode_preamble_span`],
//! and per-variant [`four_byte::decode_next_message`] /
//! [`eight_byte::decode_next_message`].
//!
//! ## Safety and Error Handling
//!
//! - **No Panics:** no `unwrap()` or `panic!()` in the library (enforced
//!   by clippy lints).
//! - **Encapsulated Unsafe:** `unsafe` appears only in the `mmap` file
//!   mapping inside [`reader`].
//! - **Comprehensive Errors:** all failures correspond to a
//!   [`LogirError`] variant; a clean end of stream is `Ok(None)`.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod api;
pub mod codec;
pub mod decode;
pub mod encoding;
pub mod error;
pub mod format;
pub mod inspector;
pub mod metadata;
pub mod reader;
pub mod render;

// --- RE-EXPORTS ---

pub use api::{IrStream, LogMessage, Messages};
pub use decode::{
    decode_preamble, decode_preamble_span, eight_byte, four_byte, get_encoding_type,
    DecodedMessage, MetadataSpan, Preamble,
};
pub use encoding::{EightByteEncoding, EpochTimeMs, FourByteEncoding, IrEncoding};
pub use error::{LogirError, Result};
pub use format::EncodingType;
pub use inspector::{StreamInspector, StreamReport};
pub use metadata::StreamMetadata;
pub use reader::{BufferReader, DataSource, FileReader, IrReader};
