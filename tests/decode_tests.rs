//! Frame-level decoding tests against hand-assembled byte streams.

mod common;

use common::*;
use logir::format::{payload, EncodingType};
use logir::{eight_byte, four_byte, IrReader};

// --- WELL-FORMED FRAMES ---

#[test]
fn empty_static_logtype_single_integer() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .encoded_var(42)
        .logtype(&INTEGER_PH.to_string())
        .delta_i8(0)
        .into_reader();

    let msg = four_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, "42");
    assert_eq!(msg.timestamp, 0);
}

#[test]
fn dictionary_vars_with_surrounding_text() {
    let logtype = format!("[{DICTIONARY_PH}] {DICTIONARY_PH}");
    assert_eq!(logtype.len(), 5);

    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .dict_var("WARN")
        .dict_var("hello")
        .logtype(&logtype)
        .delta_i16(5)
        .into_reader();

    let msg = four_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, "[WARN] hello");
    assert_eq!(msg.timestamp, 5);
}

#[test]
fn escaped_placeholder_is_static_text() {
    let logtype = format!("A{ESCAPE}{INTEGER_PH}B");

    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .logtype(&logtype)
        .delta_i8(0)
        .into_reader();

    let msg = four_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, format!("A{INTEGER_PH}B"));
}

#[test]
fn eight_byte_absolute_timestamp() {
    let ts = 0x0000_0183_07F9_5C00_i64;
    let mut reader = StreamBuilder::bare(EncodingType::EightByte)
        .logtype("static text only")
        .timestamp(ts)
        .into_reader();

    let msg = eight_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, "static text only");
    assert_eq!(msg.timestamp, ts);
}

#[test]
fn interleaved_variable_lists_pair_by_placeholder_kind() {
    // Wire order: encoded, dictionary, encoded. The logtype pairs each
    // placeholder with the next variable of its own kind.
    let logtype = format!("{INTEGER_PH} {DICTIONARY_PH} {INTEGER_PH}");

    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .encoded_var(1)
        .dict_var("mid")
        .encoded_var(2)
        .logtype(&logtype)
        .delta_i8(0)
        .into_reader();

    let msg = four_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, "1 mid 2");
}

#[test]
fn float_token_renders_through_frame() {
    // "3.14": digits 314, three digits, decimal point two from the right.
    let token = (314 << 6) | (2 << 3) | 1;
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .encoded_var(token)
        .logtype(&FLOAT_PH.to_string())
        .delta_i8(0)
        .into_reader();

    let msg = four_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, "3.14");
}

#[test]
fn delta_widths_sign_extend() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .logtype("a")
        .delta_i8(-1)
        .logtype("b")
        .delta_i16(-300)
        .logtype("c")
        .delta_i32(-100_000)
        .into_reader();

    let deltas: Vec<i64> = (0..3)
        .map(|_| {
            four_byte::decode_next_message(&mut reader)
                .unwrap()
                .unwrap()
                .timestamp
        })
        .collect();
    assert_eq!(deltas, vec![-1, -300, -100_000]);
}

#[test]
fn all_logtype_length_forms_accepted() {
    let mut reader = StreamBuilder::bare(EncodingType::EightByte)
        .logtype("u8 form")
        .timestamp(1)
        .logtype_u16("u16 form")
        .timestamp(2)
        .logtype_i32("i32 form")
        .timestamp(3)
        .into_reader();

    for expected in ["u8 form", "u16 form", "i32 form"] {
        let msg = eight_byte::decode_next_message(&mut reader)
            .unwrap()
            .unwrap();
        assert_eq!(msg.message, expected);
    }
}

#[test]
fn all_dictionary_length_forms_accepted() {
    let logtype = format!("{DICTIONARY_PH}{DICTIONARY_PH}{DICTIONARY_PH}");
    let mut reader = StreamBuilder::bare(EncodingType::EightByte)
        .dict_var("one")
        .dict_var_u16("two")
        .dict_var_i32("three")
        .logtype(&logtype)
        .timestamp(0)
        .into_reader();

    let msg = eight_byte::decode_next_message(&mut reader)
        .unwrap()
        .unwrap();
    assert_eq!(msg.message, "onetwothree");
}

// --- END OF STREAM ---

#[test]
fn eof_tag_returns_none_without_reading_past_it() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .eof()
        .raw(&[0xAA, 0xBB])
        .into_reader();

    let result = four_byte::decode_next_message(&mut reader).unwrap();
    assert!(result.is_none());
    assert_eq!(reader.position(), 1);
}

#[test]
fn empty_input_is_incomplete_not_eof() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte).into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_incomplete());
}

// --- CORRUPTED FRAMES ---

#[test]
fn unexpected_leading_tag_is_corrupted() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .raw(&[0xFF])
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

#[test]
fn eof_tag_after_variables_is_corrupted() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .encoded_var(7)
        .eof()
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

#[test]
fn eight_byte_rejects_four_byte_var_tag() {
    let mut reader = StreamBuilder::bare(EncodingType::EightByte)
        .raw(&[payload::VAR_FOUR_BYTE, 0, 0, 0, 42])
        .into_reader();
    let err = eight_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

#[test]
fn four_byte_rejects_absolute_timestamp_tag() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .logtype("x")
        .raw(&[payload::TS_ABSOLUTE, 0, 0, 0, 0, 0, 0, 0, 0])
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

#[test]
fn negative_i32_logtype_length_is_corrupted() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .raw(&[payload::LOGTYPE_LEN_I32])
        .raw(&(-1_i32).to_be_bytes())
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

#[test]
fn negative_i32_dictionary_length_is_corrupted() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .raw(&[payload::VAR_STR_LEN_I32])
        .raw(&(-5_i32).to_be_bytes())
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

#[test]
fn invalid_utf8_logtype_is_corrupted() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .raw(&[payload::LOGTYPE_LEN_U8, 2, 0xFF, 0xFE])
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_corrupted());
}

// --- DECODE ERRORS ---

#[test]
fn too_few_encoded_vars_is_decode_error() {
    let logtype = format!("{INTEGER_PH}{INTEGER_PH}");
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .encoded_var(1)
        .logtype(&logtype)
        .delta_i8(0)
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_decode_error());
}

#[test]
fn trailing_escape_is_decode_error() {
    let logtype = format!("boom{ESCAPE}");
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .logtype(&logtype)
        .delta_i8(0)
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_decode_error());
}

#[test]
fn surplus_encoded_vars_is_decode_error() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .encoded_var(1)
        .encoded_var(2)
        .logtype(&INTEGER_PH.to_string())
        .delta_i8(0)
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_decode_error());
}

#[test]
fn surplus_dictionary_vars_is_decode_error() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .dict_var("unused")
        .logtype("no placeholders here")
        .delta_i8(0)
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_decode_error());
}

// --- TRUNCATION ---

#[test]
fn truncated_encoded_var_is_incomplete() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .raw(&[payload::VAR_FOUR_BYTE, 0, 0])
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn truncated_logtype_body_is_incomplete() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .raw(&[payload::LOGTYPE_LEN_U8, 10, b'h', b'i'])
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn missing_timestamp_record_is_incomplete() {
    let mut reader = StreamBuilder::bare(EncodingType::FourByte)
        .logtype("almost there")
        .into_reader();
    let err = four_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn truncated_timestamp_payload_is_incomplete() {
    let mut reader = StreamBuilder::bare(EncodingType::EightByte)
        .logtype("x")
        .raw(&[payload::TS_ABSOLUTE, 0, 0, 0])
        .into_reader();
    let err = eight_byte::decode_next_message(&mut reader).unwrap_err();
    assert!(err.is_incomplete());
}
