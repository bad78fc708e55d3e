//! Configuration module
//!
//! Settings for reaching the agent backend. Values come from the environment
//! (optionally seeded from a `.env` file) and fall back to local-development
//! defaults.

use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_UPLOAD_CHUNK_BYTES};

/// HTTP client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the agent backend, without trailing slash (e.g. `http://localhost:3001/api`).
    pub base_url: String,
    /// Timeout applied to every request, including byte transfers.
    pub timeout: Duration,
    /// Size of the body chunks streamed to signed URLs; progress is reported per chunk.
    pub upload_chunk_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            upload_chunk_bytes: DEFAULT_UPLOAD_CHUNK_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_upload_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.upload_chunk_bytes = chunk_bytes.max(1);
        self
    }

    /// Load from VOXAGENT_API_URL (or API_URL), VOXAGENT_API_TIMEOUT_SECS and
    /// VOXAGENT_UPLOAD_CHUNK_BYTES.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let base_url = env::var("VOXAGENT_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match env::var("VOXAGENT_API_TIMEOUT_SECS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("VOXAGENT_API_TIMEOUT_SECS must be a whole number of seconds")
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let upload_chunk_bytes = match env::var("VOXAGENT_UPLOAD_CHUNK_BYTES") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("VOXAGENT_UPLOAD_CHUNK_BYTES must be a positive number")
                })?,
            Err(_) => DEFAULT_UPLOAD_CHUNK_BYTES,
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout_secs),
            upload_chunk_bytes,
        })
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3001/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.upload_chunk_bytes, 64 * 1024);
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ClientConfig::new("https://agents.example.com/api/");
        assert_eq!(config.base_url, "https://agents.example.com/api");
        assert_eq!(
            config.endpoint("/attachments/upload-url"),
            "https://agents.example.com/api/attachments/upload-url"
        );
        assert_eq!(
            config.endpoint("agents"),
            "https://agents.example.com/api/agents"
        );
    }

    #[test]
    fn test_chunk_size_never_zero() {
        let config = ClientConfig::default().with_upload_chunk_bytes(0);
        assert_eq!(config.upload_chunk_bytes, 1);
    }
}
