//! Shared helpers for assembling IR byte streams by hand.

#![allow(dead_code)] // each test binary uses a subset of the helpers

use logir::format::{metadata, payload, EncodingType, EOF_TAG};
use logir::BufferReader;

/// Placeholder bytes as chars, for building logtype templates inline.
pub const FLOAT_PH: char = '\u{11}';
pub const INTEGER_PH: char = '\u{12}';
pub const DICTIONARY_PH: char = '\u{13}';
pub const ESCAPE: char = '\\';

/// A metadata blob every well-formed stream can carry.
pub const STANDARD_METADATA: &str = r#"{"VERSION":"0.3.0"}"#;

/// Byte-level stream assembler. Produces exactly the record layouts the
/// decoder expects, or deliberately broken ones via [`raw`](Self::raw).
pub struct StreamBuilder {
    bytes: Vec<u8>,
    encoding: EncodingType,
}

impl StreamBuilder {
    /// Starts a full stream: magic number first.
    pub fn stream(encoding: EncodingType) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(encoding.magic_number());
        Self { bytes, encoding }
    }

    /// Starts a bare byte sequence (no magic number), for feeding the
    /// frame-level entry points directly.
    pub fn bare(encoding: EncodingType) -> Self {
        Self {
            bytes: Vec::new(),
            encoding,
        }
    }

    /// Appends a JSON metadata record (u8 or u16 length, whichever fits).
    pub fn json_metadata(self, json: &str) -> Self {
        let blob = json.as_bytes().to_vec();
        self.metadata(metadata::JSON_ENCODING, &blob)
    }

    /// Appends a metadata record of an arbitrary type.
    pub fn metadata(mut self, metadata_type: u8, blob: &[u8]) -> Self {
        self.bytes.push(metadata_type);
        if let Ok(len) = u8::try_from(blob.len()) {
            self.bytes.push(metadata::LENGTH_U8);
            self.bytes.push(len);
        } else {
            let len = u16::try_from(blob.len()).expect("metadata blob too large for u16");
            self.bytes.push(metadata::LENGTH_U16);
            self.bytes.extend_from_slice(&len.to_be_bytes());
        }
        self.bytes.extend_from_slice(blob);
        self
    }

    /// Appends a metadata record forcing the u16 length form.
    pub fn metadata_u16_len(mut self, metadata_type: u8, blob: &[u8]) -> Self {
        self.bytes.push(metadata_type);
        self.bytes.push(metadata::LENGTH_U16);
        let len = u16::try_from(blob.len()).expect("metadata blob too large for u16");
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(blob);
        self
    }

    /// Appends an encoded-variable record of the stream's width.
    pub fn encoded_var(mut self, value: i64) -> Self {
        match self.encoding {
            EncodingType::FourByte => {
                self.bytes.push(payload::VAR_FOUR_BYTE);
                let value = i32::try_from(value).expect("value out of four-byte range");
                self.bytes.extend_from_slice(&value.to_be_bytes());
            }
            EncodingType::EightByte => {
                self.bytes.push(payload::VAR_EIGHT_BYTE);
                self.bytes.extend_from_slice(&value.to_be_bytes());
            }
        }
        self
    }

    /// Appends a dictionary-variable record with a u8 length prefix.
    pub fn dict_var(mut self, value: &str) -> Self {
        self.bytes.push(payload::VAR_STR_LEN_U8);
        self.bytes
            .push(u8::try_from(value.len()).expect("string too long for u8 length"));
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    /// Appends a dictionary-variable record with a u16 length prefix.
    pub fn dict_var_u16(mut self, value: &str) -> Self {
        self.bytes.push(payload::VAR_STR_LEN_U16);
        let len = u16::try_from(value.len()).expect("string too long for u16 length");
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    /// Appends a dictionary-variable record with an i32 length prefix.
    pub fn dict_var_i32(mut self, value: &str) -> Self {
        self.bytes.push(payload::VAR_STR_LEN_I32);
        let len = i32::try_from(value.len()).expect("string too long for i32 length");
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    /// Appends a logtype record with a u8 length prefix.
    pub fn logtype(mut self, template: &str) -> Self {
        self.bytes.push(payload::LOGTYPE_LEN_U8);
        self.bytes
            .push(u8::try_from(template.len()).expect("logtype too long for u8 length"));
        self.bytes.extend_from_slice(template.as_bytes());
        self
    }

    /// Appends a logtype record with a u16 length prefix.
    pub fn logtype_u16(mut self, template: &str) -> Self {
        self.bytes.push(payload::LOGTYPE_LEN_U16);
        let len = u16::try_from(template.len()).expect("logtype too long for u16 length");
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(template.as_bytes());
        self
    }

    /// Appends a logtype record with an i32 length prefix.
    pub fn logtype_i32(mut self, template: &str) -> Self {
        self.bytes.push(payload::LOGTYPE_LEN_I32);
        let len = i32::try_from(template.len()).expect("logtype too long for i32 length");
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(template.as_bytes());
        self
    }

    /// Appends a timestamp record: absolute for eight-byte streams, the
    /// narrowest fitting delta for four-byte streams.
    pub fn timestamp(mut self, value: i64) -> Self {
        match self.encoding {
            EncodingType::EightByte => {
                self.bytes.push(payload::TS_ABSOLUTE);
                self.bytes.extend_from_slice(&value.to_be_bytes());
                self
            }
            EncodingType::FourByte => {
                if let Ok(v) = i8::try_from(value) {
                    self.delta_i8(v)
                } else if let Ok(v) = i16::try_from(value) {
                    self.delta_i16(v)
                } else {
                    self.delta_i32(i32::try_from(value).expect("delta out of i32 range"))
                }
            }
        }
    }

    /// Appends a 1-byte delta timestamp record.
    pub fn delta_i8(mut self, value: i8) -> Self {
        self.bytes.push(payload::TS_DELTA_I8);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a 2-byte delta timestamp record.
    pub fn delta_i16(mut self, value: i16) -> Self {
        self.bytes.push(payload::TS_DELTA_I16);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a 4-byte delta timestamp record.
    pub fn delta_i32(mut self, value: i32) -> Self {
        self.bytes.push(payload::TS_DELTA_I32);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends arbitrary bytes, valid or not.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Appends the stream terminator.
    pub fn eof(mut self) -> Self {
        self.bytes.push(EOF_TAG);
        self
    }

    /// Finishes the stream.
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes the stream and wraps it in a reader.
    pub fn into_reader(self) -> BufferReader {
        BufferReader::from_vec(self.bytes)
    }
}
