//! Byte sources consumed by the decoder.
//!
//! The decoder reads from any type implementing [`IrReader`]: a sequential,
//! seekable source of bytes. The trait is deliberately small so that
//! callers can plug in their own transport (a decompression stream, a
//! network buffer) while the crate ships two ready-made sources:
//!
//! - [`BufferReader`]: a cursor over an in-memory buffer or a memory-mapped
//!   file (feature `mmap`). Opening a mapped file is O(1) regardless of
//!   size; the operating system pages bytes in on demand.
//! - [`FileReader`]: a buffered sequential file reader for streams that
//!   should not be mapped.
//!
//! ## Error Mapping
//!
//! A source that runs out of bytes mid-read reports
//! [`IncompleteStream`](LogirError::IncompleteStream); the decoder treats
//! that as fatal for the current frame. Readers leave their position
//! wherever the failing read stopped.
//!
//! ## Safety
//!
//! Memory mapping is the one place this crate uses `unsafe`: `mmap` is
//! unsound if the file is modified while mapped. Streams are assumed
//! immutable for the lifetime of the reader.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

use crate::error::{LogirError, Result};

/// A sequential, seekable source of IR bytes.
///
/// Positions are absolute byte offsets from the start of the stream. All
/// reads advance the position on success; a failed read leaves the
/// position wherever the underlying source stopped.
pub trait IrReader {
    /// Reads exactly `buf.len()` bytes or fails with
    /// [`IncompleteStream`](LogirError::IncompleteStream).
    fn try_read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// The current absolute offset.
    fn position(&self) -> u64;

    /// Seeks to an absolute offset. Fails with
    /// [`IncompleteStream`](LogirError::IncompleteStream) when the offset
    /// lies beyond the end of the stream.
    fn try_seek_from_begin(&mut self, pos: u64) -> Result<()>;

    /// Reads exactly `len` bytes as a UTF-8 string.
    ///
    /// Wire strings (logtypes, dictionary variables) must be valid UTF-8;
    /// anything else is a [`CorruptedStream`](LogirError::CorruptedStream)
    /// error.
    fn try_read_string(&mut self, len: usize) -> Result<String> {
        let mut buf = vec![0u8; len];
        self.try_read_exact(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|_| LogirError::CorruptedStream("wire string is not valid UTF-8".into()))
    }
}

/// Where the bytes of a [`BufferReader`] live.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A memory-mapped file, shared via `Arc`.
    #[cfg(feature = "mmap")]
    Mmap(Arc<Mmap>),
    /// An owned in-memory buffer, shared via `Arc`.
    Memory(Arc<Vec<u8>>),
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            #[cfg(feature = "mmap")]
            Self::Mmap(mmap) => mmap.as_ref(),
            Self::Memory(vec) => vec.as_slice(),
        }
    }
}

/// A cursor over an in-memory or memory-mapped byte buffer.
///
/// Cheap to clone; clones share the underlying bytes but carry independent
/// positions, so two streams over the same buffer do not interfere.
#[derive(Debug, Clone)]
pub struct BufferReader {
    source: DataSource,
    pos: usize,
}

impl BufferReader {
    /// Wraps an owned byte buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            source: DataSource::Memory(Arc::new(bytes)),
            pos: 0,
        }
    }

    /// Copies a slice into an owned buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Memory-maps a file and positions the cursor at its start.
    #[cfg(feature = "mmap")]
    pub fn map_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the stream is assumed
        // immutable while mapped.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            source: DataSource::Mmap(Arc::new(mmap)),
            pos: 0,
        })
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    fn remaining(&self) -> usize {
        self.source.len().saturating_sub(self.pos)
    }
}

impl IrReader for BufferReader {
    fn try_read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let available = self.remaining();
        if available < buf.len() {
            // Consume what is left so the position reflects the stall point.
            self.pos = self.source.len();
            return Err(LogirError::IncompleteStream(format!(
                "needed {} bytes, buffer has {available}",
                buf.len()
            )));
        }
        let end = self.pos + buf.len();
        buf.copy_from_slice(&self.source[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn try_seek_from_begin(&mut self, pos: u64) -> Result<()> {
        if pos > self.source.len() as u64 {
            return Err(LogirError::IncompleteStream(format!(
                "seek target {pos} beyond buffer end {}",
                self.source.len()
            )));
        }
        self.pos = pos as usize;
        Ok(())
    }
}

/// A buffered sequential reader over a file on disk.
///
/// Useful when mapping is undesirable (very large streams on 32-bit
/// targets, files on filesystems without mmap support).
#[derive(Debug)]
pub struct FileReader {
    inner: BufReader<File>,
    pos: u64,
    file_len: u64,
}

impl FileReader {
    /// Opens a file for sequential decoding.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        Ok(Self {
            inner: BufReader::new(file),
            pos: 0,
            file_len,
        })
    }
}

impl IrReader for FileReader {
    fn try_read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(e) => {
                // The position is now indeterminate within the frame; pin
                // it to the end of what the file could supply.
                self.pos = self.file_len.min(self.pos + buf.len() as u64);
                Err(e.into())
            }
        }
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn try_seek_from_begin(&mut self, pos: u64) -> Result<()> {
        if pos > self.file_len {
            return Err(LogirError::IncompleteStream(format!(
                "seek target {pos} beyond file end {}",
                self.file_len
            )));
        }
        self.inner.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }
}
