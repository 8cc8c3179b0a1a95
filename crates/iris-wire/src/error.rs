use thiserror::Error;

/// Errors from the request frame encoder.
///
/// Both variants mean the input cannot be represented in the upstream's
/// length fields at all; the request must be rejected before dispatch,
/// never truncated.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("length {value} exceeds the 14-bit wire limit")]
    LengthOverflow { value: usize },

    #[error("model name of {len} bytes does not fit a one-byte length prefix")]
    ModelTooLong { len: usize },
}

/// A content frame carried bytes that are not valid UTF-8.
///
/// Decoding is chunk-scoped, so the relay drops the offending chunk and
/// keeps consuming the stream.
#[derive(Debug, Error)]
#[error("frame content at offset {offset} is not valid UTF-8: {source}")]
pub struct FrameDecodeError {
    pub offset: usize,
    #[source]
    pub source: std::str::Utf8Error,
}

pub type Result<T, E = WireError> = std::result::Result<T, E>;
