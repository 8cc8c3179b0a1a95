//! Response frame decoder.
//!
//! The upstream streams variably framed chunks. Within a content chunk,
//! text sits in small frames shaped `length, separator, content length,
//! content bytes`, padded with zero bytes. The scan mirrors the upstream's
//! own client: zeros are skipped, the two framing bytes are stepped over
//! without interpretation, and a one-byte content length delimits each
//! fragment.
//!
//! Decoding is deliberately chunk-scoped: a frame split across two
//! transport chunks loses its truncated tail, and no state is carried
//! between calls. There is no end-of-message frame; termination comes from
//! transport closure.

use crate::error::FrameDecodeError;

/// Leading marker of a chunk that carries decodable content frames.
const CONTENT_PREFIX: [u8; 4] = [0, 0, 0, 0];

/// True when the chunk's first four bytes mark it as a content chunk.
///
/// Chunks with any other prefix (connect metadata, keepalives) carry no
/// text and are ignored by the relay rather than treated as an error.
pub fn is_content_chunk(chunk: &[u8]) -> bool {
    chunk.len() >= CONTENT_PREFIX.len() && chunk[..4] == CONTENT_PREFIX
}

/// Extract every complete text fragment embedded in `chunk`, concatenated
/// in scan order.
///
/// A truncated final frame yields only the complete leading fragments.
/// Invalid UTF-8 inside a frame fails the whole chunk; the caller skips it
/// and moves on.
pub fn extract_text(chunk: &[u8]) -> Result<String, FrameDecodeError> {
    let mut out = String::new();
    let mut i = 0;

    while i < chunk.len() {
        while i < chunk.len() && chunk[i] == 0 {
            i += 1;
        }
        if i >= chunk.len() {
            break;
        }

        // Frame length byte and newline separator, neither interpreted on
        // its own.
        i += 2;
        if i >= chunk.len() {
            break;
        }

        let content_len = chunk[i] as usize;
        i += 1;

        if i + content_len <= chunk.len() {
            let text = std::str::from_utf8(&chunk[i..i + content_len])
                .map_err(|source| FrameDecodeError { offset: i, source })?;
            if !text.is_empty() {
                out.push_str(text);
            }
        }
        // A truncated tail still advances past the declared length; the
        // loop then exits at the bounds check.
        i += content_len;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build one frame the way the upstream lays it out: a nonzero frame
    /// length byte, the separator, then the length-prefixed content.
    fn frame(text: &str) -> Vec<u8> {
        let mut out = vec![0x01, 0x0A, text.len() as u8];
        out.extend_from_slice(text.as_bytes());
        out
    }

    #[test]
    fn single_frame_chunk() {
        let mut chunk = vec![0, 0, 0, 0];
        chunk.extend(frame("hello"));
        assert_eq!(extract_text(&chunk).unwrap(), "hello");
    }

    #[test]
    fn multiple_frames_concatenate_in_order() {
        let mut chunk = vec![0, 0, 0, 0];
        chunk.extend(frame("one "));
        chunk.extend([0, 0]);
        chunk.extend(frame("two "));
        chunk.extend(frame("three"));
        assert_eq!(extract_text(&chunk).unwrap(), "one two three");
    }

    #[test]
    fn truncated_tail_frame_keeps_leading_fragments() {
        let mut chunk = vec![0, 0, 0, 0];
        chunk.extend(frame("kept"));
        // Declares 10 content bytes but carries only 3.
        chunk.extend([0x01, 0x0A, 10, b'c', b'u', b't']);
        assert_eq!(extract_text(&chunk).unwrap(), "kept");
    }

    #[test]
    fn all_zero_chunk_is_empty() {
        assert_eq!(extract_text(&[0; 16]).unwrap(), "");
        assert_eq!(extract_text(&[]).unwrap(), "");
    }

    #[test]
    fn multibyte_utf8_fragment() {
        let mut chunk = vec![0, 0, 0, 0];
        chunk.extend(frame("\u{3053}\u{3093}"));
        assert_eq!(extract_text(&chunk).unwrap(), "\u{3053}\u{3093}");
    }

    #[test]
    fn invalid_utf8_fails_the_chunk() {
        let mut chunk = vec![0, 0, 0, 0];
        chunk.extend([0x01, 0x0A, 2, 0xFF, 0xFE]);
        let err = extract_text(&chunk).unwrap_err();
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn chunk_ending_inside_framing_bytes() {
        // Scan steps over the two framing bytes and runs out of buffer
        // before a content length exists.
        assert_eq!(extract_text(&[0, 0, 0, 0, 0x01, 0x0A]).unwrap(), "");
        assert_eq!(extract_text(&[0, 0, 0, 0, 0x01]).unwrap(), "");
    }

    #[test]
    fn content_chunk_marker() {
        assert!(is_content_chunk(&[0, 0, 0, 0, 1]));
        assert!(is_content_chunk(&[0, 0, 0, 0]));
        assert!(!is_content_chunk(&[0, 0, 0, 1]));
        assert!(!is_content_chunk(&[0, 0, 0]));
        assert!(!is_content_chunk(b"HTTP"));
    }
}
