//! Message reconstruction: interpolating variables into a logtype.
//!
//! A logtype template is static text with one placeholder byte per
//! variable. Rendering walks the template once, left to right, copying
//! static text and substituting each placeholder with the next variable of
//! the matching kind. The escape byte forces the byte after it into the
//! static text, so log lines that contain placeholder byte values survive
//! encoding.
//!
//! Placeholder order inside the logtype drives the pairing: float and
//! integer placeholders consume encoded variables, dictionary placeholders
//! consume dictionary variables, each strictly in wire order. A frame whose
//! variable lists do not match its placeholders exactly (too few *or* left
//! over) fails with a [`Decode`](crate::LogirError::Decode) error.

use crate::encoding::IrEncoding;
use crate::error::{LogirError, Result};
use crate::format::placeholder;

/// Renders a message from its logtype and variable lists.
///
/// `encoded_vars` and `dictionary_vars` are consumed in order as their
/// placeholders appear in `logtype`. Count mismatches in either direction
/// and an escape byte with nothing after it are decode errors.
pub fn decode_message<E: IrEncoding>(
    logtype: &str,
    encoded_vars: &[E::Var],
    dictionary_vars: &[String],
) -> Result<String> {
    let bytes = logtype.as_bytes();
    let mut message = String::with_capacity(logtype.len());

    // Start of the static text run that is pending an append.
    let mut static_begin = 0;
    let mut encoded_ix = 0;
    let mut dict_ix = 0;

    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            placeholder::FLOAT => {
                message.push_str(&logtype[static_begin..pos]);
                static_begin = pos + 1;
                let var = encoded_vars.get(encoded_ix).ok_or_else(|| {
                    LogirError::Decode("logtype references more encoded variables than the frame carries".into())
                })?;
                message.push_str(&E::format_float(*var)?);
                encoded_ix += 1;
            }
            placeholder::INTEGER => {
                message.push_str(&logtype[static_begin..pos]);
                static_begin = pos + 1;
                let var = encoded_vars.get(encoded_ix).ok_or_else(|| {
                    LogirError::Decode("logtype references more encoded variables than the frame carries".into())
                })?;
                message.push_str(&E::format_integer(*var));
                encoded_ix += 1;
            }
            placeholder::DICTIONARY => {
                message.push_str(&logtype[static_begin..pos]);
                static_begin = pos + 1;
                let var = dictionary_vars.get(dict_ix).ok_or_else(|| {
                    LogirError::Decode("logtype references more dictionary variables than the frame carries".into())
                })?;
                message.push_str(var);
                dict_ix += 1;
            }
            placeholder::ESCAPE => {
                if pos == bytes.len() - 1 {
                    return Err(LogirError::Decode(
                        "logtype ends with an escape byte and nothing to escape".into(),
                    ));
                }
                message.push_str(&logtype[static_begin..pos]);
                // Drop the escape itself; the byte after it joins the next
                // static run and is never re-examined as a placeholder.
                static_begin = pos + 1;
                pos += 1;
            }
            _ => {}
        }
        pos += 1;
    }
    message.push_str(&logtype[static_begin..]);

    if encoded_ix != encoded_vars.len() {
        return Err(LogirError::Decode(format!(
            "frame carries {} encoded variables but the logtype consumed {encoded_ix}",
            encoded_vars.len()
        )));
    }
    if dict_ix != dictionary_vars.len() {
        return Err(LogirError::Decode(format!(
            "frame carries {} dictionary variables but the logtype consumed {dict_ix}",
            dictionary_vars.len()
        )));
    }
    Ok(message)
}
