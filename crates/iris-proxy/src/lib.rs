//! Iris Proxy - OpenAI-compatible facade for a binary-protocol chat
//! upstream.
//!
//! Callers speak the conventional `/v1/chat/completions` JSON shape. The
//! upstream speaks a proprietary length-prefixed binary format over
//! chunked HTTP. This crate bridges the two:
//!
//! - Accept OpenAI-style traffic and flatten the transcript.
//! - Encode it with [`iris_wire`] and dispatch it with a rotated key from
//!   [`iris_keys`].
//! - Decode the streamed binary frames back into text and re-emit them as
//!   SSE deltas or one aggregated completion object.

pub mod config;
pub mod relay;
pub mod server;
pub mod types;
pub mod upstream;

pub use config::ProxyConfig;
pub use server::serve;
