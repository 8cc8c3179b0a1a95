//! Configuration from environment variables.
//!
//! - `PORT`: listen port (default: 3000)
//! - `UPSTREAM_URL`: chat endpoint override (default: the pinned
//!   production endpoint)
//! - `KEYS_FILE`: key store path (default: `<data-dir>/iris/keys.json`)

use crate::upstream::DEFAULT_UPSTREAM_URL;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub upstream_url: String,
    pub keys_file: PathBuf,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string()),
            keys_file: env::var("KEYS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_keys_file()),
        }
    }
}

fn default_keys_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("iris")
        .join("keys.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_file_lands_in_the_iris_dir() {
        let path = default_keys_file();
        assert!(path.ends_with("iris/keys.json"));
    }
}
