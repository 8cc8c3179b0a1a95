//! Streaming relay: pumps upstream bytes to the caller.
//!
//! The relay consumes the upstream's chunked byte stream one chunk at a
//! time. Chunks whose first four bytes are not all zero carry no content
//! and are ignored outright. Content chunks run through the wire decoder;
//! a failed decode drops that chunk and the stream keeps going. There is
//! no end-of-message frame: the relay is done when the transport closes.

use crate::types::{completion_id, unix_timestamp};
use anyhow::anyhow;
use async_stream::stream;
use futures::{Stream, StreamExt};
use iris_wire::{extract_text, is_content_chunk};
use serde_json::json;
use tracing::warn;

/// SSE relay for `stream: true` callers.
///
/// Yields `data: {chunk}\n\n` frames followed by one terminal
/// `data: [DONE]\n\n`. A transport failure mid-stream ends the output with
/// no terminal marker; a missing `[DONE]` is the caller's failure signal.
pub fn relay_sse<S, B, E>(upstream: S, model: String) -> impl Stream<Item = String>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let response_id = completion_id();

    stream! {
        futures::pin_mut!(upstream);

        loop {
            match upstream.next().await {
                // Normal transport close: the only terminal marker the
                // protocol has.
                None => {
                    yield "data: [DONE]\n\n".to_string();
                    break;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "upstream transport failed mid-stream");
                    break;
                }
                Some(Ok(chunk)) => {
                    let Some(text) = decode_chunk(chunk.as_ref()) else {
                        continue;
                    };
                    let payload = json!({
                        "id": response_id,
                        "object": "chat.completion.chunk",
                        "created": unix_timestamp(),
                        "model": model,
                        "choices": [{
                            "index": 0,
                            "delta": {"content": text}
                        }]
                    });
                    yield format!("data: {}\n\n", payload);
                }
            }
        }
    }
}

/// Accumulating relay for `stream: false` callers.
///
/// Concatenates every decoded fragment in arrival order. A transport
/// failure here happens before anything was written to the caller, so it
/// surfaces as an error response.
pub async fn relay_aggregate<S, B, E>(upstream: S) -> anyhow::Result<String>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    futures::pin_mut!(upstream);

    let mut text = String::new();
    while let Some(chunk) = upstream.next().await {
        let chunk = chunk.map_err(|e| anyhow!("upstream transport failed: {}", e))?;
        if let Some(fragment) = decode_chunk(chunk.as_ref()) {
            text.push_str(&fragment);
        }
    }
    Ok(text)
}

/// Decode one transport chunk, or `None` when it contributes no text:
/// wrong leading marker, empty after decoding, or undecodable (logged and
/// skipped).
fn decode_chunk(chunk: &[u8]) -> Option<String> {
    if !is_content_chunk(chunk) {
        return None;
    }
    match extract_text(chunk) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "skipping undecodable chunk");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// A content chunk carrying the given fragments, framed the way the
    /// upstream frames them.
    fn content_chunk(fragments: &[&str]) -> Vec<u8> {
        let mut chunk = vec![0u8, 0, 0, 0];
        for fragment in fragments {
            chunk.extend([0x01, 0x0A, fragment.len() as u8]);
            chunk.extend_from_slice(fragment.as_bytes());
        }
        chunk
    }

    fn ok_stream(
        chunks: Vec<Vec<u8>>,
    ) -> impl Stream<Item = Result<Vec<u8>, Infallible>> {
        futures::stream::iter(chunks.into_iter().map(Ok))
    }

    fn delta_content(event: &str) -> Option<String> {
        let data = event.strip_prefix("data: ")?.trim_end();
        let v: serde_json::Value = serde_json::from_str(data).ok()?;
        v["choices"][0]["delta"]["content"]
            .as_str()
            .map(|s| s.to_string())
    }

    #[tokio::test]
    async fn aggregate_concatenates_in_arrival_order() {
        let chunks = vec![
            content_chunk(&["Hello", ", "]),
            content_chunk(&["world"]),
            content_chunk(&["!"]),
        ];
        let text = relay_aggregate(ok_stream(chunks)).await.unwrap();
        assert_eq!(text, "Hello, world!");
    }

    #[tokio::test]
    async fn non_content_chunks_are_ignored() {
        let chunks = vec![
            b"\x02\x00\x00\x00junk".to_vec(),
            content_chunk(&["kept"]),
            b"gzip-metadata".to_vec(),
        ];
        let text = relay_aggregate(ok_stream(chunks)).await.unwrap();
        assert_eq!(text, "kept");
    }

    #[tokio::test]
    async fn undecodable_chunk_is_skipped_not_fatal() {
        let mut bad = vec![0u8, 0, 0, 0];
        bad.extend([0x01, 0x0A, 2, 0xFF, 0xFE]);

        let chunks = vec![content_chunk(&["before "]), bad, content_chunk(&["after"])];
        let text = relay_aggregate(ok_stream(chunks)).await.unwrap();
        assert_eq!(text, "before after");
    }

    #[tokio::test]
    async fn sse_and_aggregate_agree() {
        let chunks = || {
            vec![
                content_chunk(&["one "]),
                content_chunk(&["two "]),
                content_chunk(&["three"]),
            ]
        };

        let aggregate = relay_aggregate(ok_stream(chunks())).await.unwrap();

        let events: Vec<String> = relay_sse(ok_stream(chunks()), "test".to_string())
            .collect()
            .await;
        let streamed: String = events.iter().filter_map(|e| delta_content(e)).collect();

        assert_eq!(streamed, aggregate);
        assert_eq!(events.last().map(|s| s.as_str()), Some("data: [DONE]\n\n"));
        assert_eq!(
            events.iter().filter(|e| *e == "data: [DONE]\n\n").count(),
            1
        );
    }

    #[tokio::test]
    async fn sse_events_carry_the_requested_model() {
        let events: Vec<String> = relay_sse(
            ok_stream(vec![content_chunk(&["hi"])]),
            "claude-3-sonnet".to_string(),
        )
        .collect()
        .await;

        let data = events[0].strip_prefix("data: ").unwrap();
        let v: serde_json::Value = serde_json::from_str(data).unwrap();
        assert_eq!(v["model"], "claude-3-sonnet");
        assert_eq!(v["object"], "chat.completion.chunk");
        assert!(v["id"].as_str().unwrap().starts_with("chatcmpl-"));
    }

    #[tokio::test]
    async fn transport_error_mid_stream_ends_without_done() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![
            Ok(content_chunk(&["partial"])),
            Err("connection reset".to_string()),
        ];
        let events: Vec<String> =
            relay_sse(futures::stream::iter(chunks), "test".to_string())
                .collect()
                .await;

        assert_eq!(events.len(), 1);
        assert_eq!(delta_content(&events[0]).as_deref(), Some("partial"));
    }

    #[tokio::test]
    async fn aggregate_surfaces_transport_errors() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![
            Ok(content_chunk(&["partial"])),
            Err("connection reset".to_string()),
        ];
        let err = relay_aggregate(futures::stream::iter(chunks))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
