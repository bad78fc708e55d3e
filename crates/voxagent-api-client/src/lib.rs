//! Shared HTTP client for the VoxAgent backend.
//!
//! Provides a minimal JSON client (GET/POST/PUT helpers with the backend's
//! error mapping), a streaming PUT for signed-URL transfers with progress
//! reporting, and domain methods for attachments, agents and catalog lists.
//! The client implements the service traits from `voxagent-core`.

pub mod api;
mod transfer;

use anyhow::Context;
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use voxagent_core::constants::DEFAULT_MIME_TYPE;
use voxagent_core::{ApiError, ApiResult, ClientConfig, ProgressFn};

/// HTTP client for the VoxAgent backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Build(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create client from environment: VOXAGENT_API_URL (or API_URL),
    /// VOXAGENT_API_TIMEOUT_SECS, VOXAGENT_UPLOAD_CHUNK_BYTES.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env().context("Invalid client configuration")?;
        Self::new(config).context("Failed to create API client")
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path);
        tracing::debug!(method = "GET", url = %url, "Sending API request");
        self.send_json(self.client.get(&url)).await
    }

    /// POST without a body and deserialize response.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path);
        tracing::debug!(method = "POST", url = %url, "Sending API request");
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json");
        self.send_json(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        tracing::debug!(method = "POST", url = %url, "Sending API request");
        self.send_json(self.client.post(&url).json(body)).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        tracing::debug!(method = "PUT", url = %url, "Sending API request");
        self.send_json(self.client.put(&url).json(body)).await
    }

    /// PUT raw bytes to an absolute URL (a signed storage URL), streaming the
    /// body in chunks and reporting bytes handed to the transport.
    pub async fn put_bytes(
        &self,
        url: &str,
        data: Bytes,
        progress: Option<ProgressFn>,
    ) -> ApiResult<()> {
        let url = reqwest::Url::parse(url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let total = data.len() as u64;
        tracing::debug!(
            host = url.host_str().unwrap_or_default(),
            bytes = total,
            "Transferring bytes to signed URL"
        );

        let body = transfer::progress_body(data, self.config.upload_chunk_bytes, progress);
        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, DEFAULT_MIME_TYPE)
            .header(CONTENT_LENGTH, total)
            .body(body);

        let response = request.send().await.map_err(map_send_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Turn a non-2xx response into `ApiError::Status`, keeping the server's
/// `message` when the body carries one.
async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body);
    tracing::warn!(
        status = status.as_u16(),
        message = message.as_deref().unwrap_or(""),
        "API request failed"
    );

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Extract `message` from a JSON error body. Validation errors that carry a
/// list of messages are joined.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message")? {
        serde_json::Value::String(message) => message.trim().to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };

    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::Build(err.to_string())
    } else {
        tracing::warn!(error = %err, "API request did not complete");
        ApiError::Network(err.to_string())
    }
}

// Re-export domain types for convenience.
pub use voxagent_core::models::{
    Agent, AgentData, AttachmentResponse, Language, Model, Prompt, RegisterAttachmentRequest,
    TestCallData, TestCallResponse, UploadUrlResponse, Voice,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_string() {
        assert_eq!(
            server_message(r#"{"message":"Agent name already taken"}"#),
            Some("Agent name already taken".to_string())
        );
    }

    #[test]
    fn test_server_message_list() {
        assert_eq!(
            server_message(r#"{"message":["name should not be empty","voice must be a string"]}"#),
            Some("name should not be empty, voice must be a string".to_string())
        );
    }

    #[test]
    fn test_server_message_absent() {
        assert_eq!(server_message(r#"{"error":"Bad Request"}"#), None);
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
        assert_eq!(server_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(server_message(""), None);
    }

    #[test]
    fn test_build_url() {
        let client = ApiClient::new(ClientConfig::new("http://localhost:3001/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001/api");
        assert_eq!(
            client.build_url("/languages"),
            "http://localhost:3001/api/languages"
        );
    }
}
