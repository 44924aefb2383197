//! Centralized error handling for Logir.
//!
//! All failure conditions are propagated through the `Result` type; the
//! library never panics on malformed input.
//!
//! ## Error Categories
//!
//! The decoder distinguishes four failure domains:
//!
//! - **I/O Errors** ([`LogirError::Io`]): failures of the underlying byte
//!   source (file system, permissions, hardware).
//! - **Incomplete Streams** ([`LogirError::IncompleteStream`]): the source
//!   ran out of bytes in the middle of a frame. If the source supports
//!   resumption, retrying after more bytes arrive may succeed.
//! - **Corrupted Streams** ([`LogirError::CorruptedStream`]): a structural
//!   violation of the wire format. A stream that produced this error is
//!   poisoned; the decoder performs no resynchronization.
//! - **Decode Errors** ([`LogirError::Decode`]): the framing was well formed
//!   but the message could not be reconstructed (variable count mismatch,
//!   trailing escape, malformed numeric token).
//!
//! A clean end of stream is not an error: `decode_next_message` returns
//! `Ok(None)` when the EOF tag is read at a frame boundary.
//!
//! ## Error Propagation with `?`
//!
//! ```rust
//! use logir::IrStream;
//!
//! fn count_messages(bytes: Vec<u8>) -> logir::Result<usize> {
//!     let mut stream = IrStream::from_bytes(bytes)?;
//!     let mut count = 0;
//!     while stream.next_message()?.is_some() {
//!         count += 1;
//!     }
//!     Ok(count)
//! }
//! # let _ = count_messages;
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for Logir operations.
pub type Result<T> = std::result::Result<T, LogirError>;

/// The master error enum covering all failure domains in Logir.
///
/// I/O errors wrap the underlying `io::Error` in an `Arc` so the type stays
/// `Clone`, allowing errors to be stored or shared across threads.
#[derive(Debug, Clone)]
pub enum LogirError {
    /// Low-level failure of the byte source (disk, permissions, etc.).
    Io(Arc<io::Error>),

    /// The stream ended in the middle of a frame.
    ///
    /// The message names the record that was being read when the source
    /// was exhausted.
    IncompleteStream(String),

    /// The stream violates the wire format.
    ///
    /// Unknown magic number, a tag outside its permitted position, a
    /// negative length, or a wire string that is not valid UTF-8. The
    /// decoder treats the stream as poisoned after this error.
    CorruptedStream(String),

    /// The framing was valid but the message could not be reconstructed.
    ///
    /// Raised when the logtype's placeholders do not line up with the
    /// variables carried by the frame, or when a numeric token cannot be
    /// rendered back into text.
    Decode(String),
}

impl LogirError {
    /// Returns true for [`LogirError::IncompleteStream`].
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteStream(_))
    }

    /// Returns true for [`LogirError::CorruptedStream`].
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::CorruptedStream(_))
    }

    /// Returns true for [`LogirError::Decode`].
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl fmt::Display for LogirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O Error: {e}"),
            Self::IncompleteStream(s) => write!(f, "Incomplete Stream: {s}"),
            Self::CorruptedStream(s) => write!(f, "Corrupted Stream: {s}"),
            Self::Decode(s) => write!(f, "Decode Error: {s}"),
        }
    }
}

impl std::error::Error for LogirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LogirError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::IncompleteStream("byte source exhausted".into())
        } else {
            Self::Io(Arc::new(err))
        }
    }
}
