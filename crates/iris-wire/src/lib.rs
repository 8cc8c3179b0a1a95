//! Binary wire codec for the upstream chat service.
//!
//! The upstream speaks a proprietary length-prefixed binary format over
//! chunked HTTP (`application/connect+proto`). This crate implements the two
//! halves that have to be bit-correct:
//!
//! - [`encode_chat_request`] packs a flattened chat transcript and a model
//!   identifier into the exact byte layout the upstream expects.
//! - [`extract_text`] scans one received transport chunk and pulls out the
//!   embedded UTF-8 text fragments.
//!
//! No I/O happens here; the proxy crate owns the transport.

pub mod decode;
pub mod encode;
pub mod error;
pub mod trailer;
pub mod varint;

pub use decode::{extract_text, is_content_chunk};
pub use encode::encode_chat_request;
pub use error::{FrameDecodeError, WireError};
