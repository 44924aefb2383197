//! Big-endian fixed-width integer decoding.
//!
//! Every multi-byte integer on the wire is big-endian. [`read_int`] reads
//! exactly the width of the requested type and performs no partial commit:
//! if the source cannot supply enough bytes the read fails as an incomplete
//! stream and the frame is abandoned.

use crate::error::Result;
use crate::reader::IrReader;

/// A fixed-width integer that can be decoded from the wire.
///
/// Implemented for the eight signed and unsigned widths the protocol uses
/// (1, 2, 4 and 8 bytes).
pub trait WireInt: Copy {
    /// Width of the encoded form in bytes.
    const WIDTH: usize;

    /// Interprets `bytes` (exactly [`WIDTH`](Self::WIDTH) of them) as a
    /// big-endian integer.
    fn from_be_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_wire_int {
    ($($ty:ty),* $(,)?) => {$(
        impl WireInt for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn from_be_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_be_bytes(raw)
            }
        }
    )*};
}

impl_wire_int!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Reads a big-endian integer of type `T` from the reader.
///
/// Returns [`IncompleteStream`](crate::LogirError::IncompleteStream) when
/// the source is exhausted before `T::WIDTH` bytes were read.
pub fn read_int<T, R>(reader: &mut R) -> Result<T>
where
    T: WireInt,
    R: IrReader + ?Sized,
{
    let mut buf = [0u8; 8];
    let buf = &mut buf[..T::WIDTH];
    reader.try_read_exact(buf)?;
    Ok(T::from_be_slice(buf))
}
