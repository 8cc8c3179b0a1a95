//! Request frame encoder.
//!
//! One chat turn goes upstream as a single length-prefixed frame:
//!
//! ```text
//! +--------------+------+--------------+------+-------------+--------+---------+
//! | total length | tag  | outer length | sep  | text length | text   | trailer |
//! | u32 BE       | 0x12 | varint       | 0x0A | varint      | UTF-8  |         |
//! +--------------+------+--------------+------+-------------+--------+---------+
//! ```
//!
//! The total length covers every byte after the 4-byte prefix. The outer
//! length is the text byte length plus a fixed 0x2A of protocol overhead;
//! the inner one is the raw byte length. The trailer interleaves the
//! length-prefixed model name between two constant token runs (see
//! [`crate::trailer`]).

use crate::error::{Result, WireError};
use crate::trailer;
use crate::varint;

/// Frame tag byte that opens the message body.
const TAG: u8 = 0x12;

/// Separator between the outer and raw text length fields.
const SEPARATOR: u8 = 0x0A;

/// Fixed protocol overhead folded into the outer text length field.
const TEXT_FIELD_OVERHEAD: usize = 0x2A;

/// Fixed bytes counted by the total-length formula ahead of the length
/// fields. Together with the lone separator byte this over-counts the
/// emitted header by one, which covers the model-name length byte emitted
/// in the trailer.
const FIXED_HEADER: usize = 2;
const SEPARATOR_LEN: usize = 1;

/// Encode one chat turn for the upstream.
///
/// `text` is the flattened transcript; `model` is sent verbatim in the
/// trailer. Byte length, not character count, drives every length field.
/// The output always satisfies `out.len() == 4 + total`, where `total` is
/// the big-endian value of the first four bytes.
pub fn encode_chat_request(text: &str, model: &str) -> Result<Vec<u8>> {
    let text_bytes = text.as_bytes();
    let model_bytes = model.as_bytes();

    if model_bytes.len() > u8::MAX as usize {
        return Err(WireError::ModelTooLong {
            len: model_bytes.len(),
        });
    }

    let raw_len = varint::encode(text_bytes.len())?;
    let outer_len = varint::encode(text_bytes.len() + TEXT_FIELD_OVERHEAD)?;

    let total = FIXED_HEADER
        + outer_len.as_slice().len()
        + SEPARATOR_LEN
        + raw_len.as_slice().len()
        + text_bytes.len()
        + trailer::FIXED_SUFFIX_BASE
        + model_bytes.len();

    let mut out = Vec::with_capacity(4 + total);
    out.extend_from_slice(&(total as u32).to_be_bytes());
    out.push(TAG);
    out.extend_from_slice(outer_len.as_slice());
    out.push(SEPARATOR);
    out.extend_from_slice(raw_len.as_slice());
    out.extend_from_slice(text_bytes);
    out.extend_from_slice(&trailer::PRE_MODEL);
    out.push(model_bytes.len() as u8);
    out.extend_from_slice(model_bytes);
    out.extend_from_slice(&trailer::POST_MODEL);

    debug_assert_eq!(out.len(), 4 + total);
    Ok(out)
}
