//! The two wire variants and their encoded-variable semantics.
//!
//! The four-byte and eight-byte decoders share one state machine; they
//! differ only in the encoded-variable width, the timestamp encoding, and
//! the tag accepted for encoded-variable records. [`IrEncoding`] captures
//! those differences so the assembler in [`crate::decode`] is written once
//! and instantiated twice. The trait is sealed: the protocol defines
//! exactly two variants.
//!
//! ## Encoded Variable Tokens
//!
//! An encoded variable packs the textual form of a numeric literal into a
//! fixed-width signed integer. Integers are packed as their value, so
//! rendering is plain decimal formatting. Floats pack their textual shape
//! bit by bit (MSB to LSB):
//!
//! ```text
//! four-byte (32 bits): ┌1┐┌────25────┐┌─3─┐┌─3─┐
//! eight-byte (64 bits): ┌1┐┌────54────┐┌─4─┐┌─5─┐
//!                        │      │        │    └─ decimal point position - 1
//!                        │      │        └────── digit count - 1
//!                        │      └─────────────── digits, without the point
//!                        └────────────────────── is negative
//! ```
//!
//! The decimal point position counts digits from the right; digit strings
//! are zero-padded back to the recorded digit count, so `0.25` survives the
//! round trip. A token whose digits overflow its digit count, or whose
//! point position lies outside the digit string, was not produced by a
//! correct encoder and renders as a decode error.

use crate::codec::{read_int, WireInt};
use crate::error::{LogirError, Result};
use crate::format::{payload, EncodingType};
use crate::reader::IrReader;

/// Millisecond epoch timestamp, or a signed delta between two of them.
pub type EpochTimeMs = i64;

mod private {
    pub trait Sealed {}
    impl Sealed for super::FourByteEncoding {}
    impl Sealed for super::EightByteEncoding {}
}

/// A wire variant of the IR: the pieces of the decoder that depend on the
/// encoded-variable width.
///
/// Sealed; implemented only by [`FourByteEncoding`] and
/// [`EightByteEncoding`].
pub trait IrEncoding: private::Sealed {
    /// The encoded-variable integer type (`i32` or `i64`).
    type Var: WireInt + Copy + std::fmt::Debug;

    /// The [`EncodingType`] this variant corresponds to.
    const ENCODING_TYPE: EncodingType;

    /// The tag opening an encoded-variable record in this variant.
    const VAR_TAG: u8;

    /// Parses the timestamp record payload selected by `tag`.
    ///
    /// Eight-byte streams carry a single absolute-timestamp form;
    /// four-byte streams carry a signed delta in one of three widths. A
    /// tag outside the variant's timestamp set is a corrupted stream.
    fn parse_timestamp<R: IrReader + ?Sized>(reader: &mut R, tag: u8) -> Result<EpochTimeMs>;

    /// Renders an integer token back into its textual form.
    fn format_integer(var: Self::Var) -> String;

    /// Renders a float token back into its textual form.
    ///
    /// Total over tokens produced by a correct encoder; fails with a
    /// [`Decode`](LogirError::Decode) error for anything else.
    fn format_float(var: Self::Var) -> Result<String>;

    /// Reads one encoded variable of this variant's width.
    fn read_var<R: IrReader + ?Sized>(reader: &mut R) -> Result<Self::Var> {
        read_int::<Self::Var, R>(reader)
    }
}

/// The four-byte variant: 32-bit encoded variables, delta timestamps.
#[derive(Debug)]
pub enum FourByteEncoding {}

/// The eight-byte variant: 64-bit encoded variables, absolute timestamps.
#[derive(Debug)]
pub enum EightByteEncoding {}

impl IrEncoding for FourByteEncoding {
    type Var = i32;

    const ENCODING_TYPE: EncodingType = EncodingType::FourByte;
    const VAR_TAG: u8 = payload::VAR_FOUR_BYTE;

    fn parse_timestamp<R: IrReader + ?Sized>(reader: &mut R, tag: u8) -> Result<EpochTimeMs> {
        match tag {
            payload::TS_DELTA_I8 => Ok(EpochTimeMs::from(read_int::<i8, R>(reader)?)),
            payload::TS_DELTA_I16 => Ok(EpochTimeMs::from(read_int::<i16, R>(reader)?)),
            payload::TS_DELTA_I32 => Ok(EpochTimeMs::from(read_int::<i32, R>(reader)?)),
            other => Err(LogirError::CorruptedStream(format!(
                "tag 0x{other:02X} is not a four-byte timestamp tag"
            ))),
        }
    }

    fn format_integer(var: i32) -> String {
        var.to_string()
    }

    fn format_float(var: i32) -> Result<String> {
        let bits = var as u32;
        render_float(
            bits >> 31 == 1,
            u64::from((bits >> 6) & 0x1FF_FFFF),
            ((bits >> 3) & 0x7) + 1,
            (bits & 0x7) + 1,
        )
    }
}

impl IrEncoding for EightByteEncoding {
    type Var = i64;

    const ENCODING_TYPE: EncodingType = EncodingType::EightByte;
    const VAR_TAG: u8 = payload::VAR_EIGHT_BYTE;

    fn parse_timestamp<R: IrReader + ?Sized>(reader: &mut R, tag: u8) -> Result<EpochTimeMs> {
        if tag != payload::TS_ABSOLUTE {
            return Err(LogirError::CorruptedStream(format!(
                "tag 0x{tag:02X} is not the absolute-timestamp tag"
            )));
        }
        read_int::<i64, R>(reader)
    }

    fn format_integer(var: i64) -> String {
        var.to_string()
    }

    fn format_float(var: i64) -> Result<String> {
        let bits = var as u64;
        render_float(
            bits >> 63 == 1,
            (bits >> 9) & 0x3F_FFFF_FFFF_FFFF,
            (((bits >> 5) & 0xF) + 1) as u32,
            ((bits & 0x1F) + 1) as u32,
        )
    }
}

/// Reassembles the textual form of a float from its unpacked properties.
fn render_float(
    is_negative: bool,
    digits: u64,
    num_digits: u32,
    decimal_point_pos: u32,
) -> Result<String> {
    if decimal_point_pos > num_digits {
        return Err(LogirError::Decode(format!(
            "float token places the decimal point {decimal_point_pos} digits from the right \
             but carries only {num_digits} digits"
        )));
    }
    let limit = 10u64
        .checked_pow(num_digits)
        .ok_or_else(|| LogirError::Decode("float token digit count out of range".into()))?;
    if digits >= limit {
        return Err(LogirError::Decode(format!(
            "float token digits {digits} overflow its digit count {num_digits}"
        )));
    }

    let digit_str = format!("{digits:0width$}", width = num_digits as usize);
    let split = (num_digits - decimal_point_pos) as usize;

    let mut out = String::with_capacity(digit_str.len() + 2);
    if is_negative {
        out.push('-');
    }
    out.push_str(&digit_str[..split]);
    out.push('.');
    out.push_str(&digit_str[split..]);
    Ok(out)
}
