//! Outbound leg: the binary call to the upstream chat service.
//!
//! The upstream speaks Connect-framed protobuf over HTTPS. This module
//! owns the endpoint and the opaque client-identification headers, and
//! dispatches one encoded request frame per completion. None of the
//! header values are computed here; they identify a pinned client build
//! the upstream accepts and pass through verbatim.

use crate::config::ProxyConfig;
use anyhow::{Context, Result};
use uuid::Uuid;

/// Production chat endpoint.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api2.cursor.sh/aiserver.v1.AiService/StreamChat";

/// Pinned client build markers the upstream validates.
const CLIENT_CHECKSUM: &str = "zo6Qjequ9b9734d1f13c3438ba25ea31ac93d9287248b9d30434934e9fcbfa6b3b22029e/7e4af391f67188693b722eff0090e8e6608bca8fa320ef20a0ccb5d7d62dfdef";
const CLIENT_VERSION: &str = "0.42.3";
const CLIENT_TIMEZONE: &str = "Asia/Shanghai";
const USER_AGENT: &str = "connect-es/1.4.0";

/// POST one encoded request frame; returns the streaming response.
///
/// A fresh trace id and request id are generated per call. No timeout is
/// set: a hung upstream keeps the caller's connection open, which is this
/// proxy's documented behavior.
pub async fn send_chat_request(
    client: &reqwest::Client,
    config: &ProxyConfig,
    token: &str,
    body: Vec<u8>,
) -> Result<reqwest::Response> {
    client
        .post(&config.upstream_url)
        .header("content-type", "application/connect+proto")
        .header("authorization", format!("Bearer {}", token))
        .header("connect-accept-encoding", "gzip,br")
        .header("connect-protocol-version", "1")
        .header("user-agent", USER_AGENT)
        .header("x-amzn-trace-id", format!("Root={}", Uuid::new_v4()))
        .header("x-cursor-checksum", CLIENT_CHECKSUM)
        .header("x-cursor-client-version", CLIENT_VERSION)
        .header("x-cursor-timezone", CLIENT_TIMEZONE)
        .header("x-ghost-mode", "false")
        .header("x-request-id", Uuid::new_v4().to_string())
        .body(body)
        .send()
        .await
        .context("upstream request failed")
}
