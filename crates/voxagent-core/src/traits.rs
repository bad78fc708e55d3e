//! Remote service traits
//!
//! The upload orchestrator and the form services talk to the backend only
//! through these traits. `voxagent-api-client` implements them over HTTP;
//! tests implement them in memory.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::models::{
    Agent, AgentData, AttachmentResponse, Language, Model, Prompt, RegisterAttachmentRequest,
    TestCallData, TestCallResponse, UploadUrlResponse, Voice,
};

/// Transfer progress side-channel, called with `(bytes_sent, total_bytes)`.
///
/// Calls for one transfer are made in non-decreasing `bytes_sent` order.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Remote Attachment Service: slot allocation, byte transfer, registration.
#[async_trait]
pub trait AttachmentService: Send + Sync {
    /// Obtain a storage key and a signed URL to PUT the bytes to.
    async fn allocate_upload_slot(&self) -> ApiResult<UploadUrlResponse>;

    /// PUT the bytes to a signed URL, reporting progress through `progress`.
    async fn transfer(
        &self,
        signed_url: &str,
        data: Bytes,
        progress: Option<ProgressFn>,
    ) -> ApiResult<()>;

    /// Finalize a transferred blob into an attachment record.
    async fn register_attachment(
        &self,
        request: &RegisterAttachmentRequest,
    ) -> ApiResult<AttachmentResponse>;
}

/// Agent Service: create, update and test-call agents.
#[async_trait]
pub trait AgentService: Send + Sync {
    async fn create_agent(&self, data: &AgentData) -> ApiResult<Agent>;

    async fn update_agent(&self, id: &str, data: &AgentData) -> ApiResult<Agent>;

    async fn start_test_call(&self, agent_id: &str, data: &TestCallData)
        -> ApiResult<TestCallResponse>;
}

/// Catalog Service: the option lists behind the agent form's dropdowns.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn languages(&self) -> ApiResult<Vec<Language>>;

    async fn voices(&self) -> ApiResult<Vec<Voice>>;

    async fn prompts(&self) -> ApiResult<Vec<Prompt>>;

    async fn models(&self) -> ApiResult<Vec<Model>>;
}
