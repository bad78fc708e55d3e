//! Domain methods for the VoxAgent API client.
//!
//! Attachments follow the backend's three-step contract: request an upload
//! URL, PUT the bytes to it, then register the stored blob. The service
//! traits from `voxagent-core` are implemented here by delegation.

use async_trait::async_trait;
use bytes::Bytes;

use crate::ApiClient;
use voxagent_core::{
    Agent, AgentData, AgentService, ApiResult, AttachmentResponse, AttachmentService,
    CandidateFile, CatalogService, Language, Model, ProgressFn, Prompt, RegisterAttachmentRequest,
    TestCallData, TestCallResponse, UploadUrlResponse, Voice,
};

impl ApiClient {
    /// Request a storage key and a signed URL for a new upload.
    pub async fn request_upload_url(&self) -> ApiResult<UploadUrlResponse> {
        self.post("/attachments/upload-url").await
    }

    /// PUT bytes to a signed URL obtained from [`ApiClient::request_upload_url`].
    pub async fn upload_to_signed_url(
        &self,
        signed_url: &str,
        data: Bytes,
        progress: Option<ProgressFn>,
    ) -> ApiResult<()> {
        self.put_bytes(signed_url, data, progress).await
    }

    /// Register a transferred blob as an attachment.
    pub async fn create_attachment(
        &self,
        request: &RegisterAttachmentRequest,
    ) -> ApiResult<AttachmentResponse> {
        self.post_json("/attachments", request).await
    }

    /// Run the three upload steps for one file and return the registered attachment.
    pub async fn upload_attachment(
        &self,
        file: &CandidateFile,
        progress: Option<ProgressFn>,
    ) -> ApiResult<AttachmentResponse> {
        let slot = self.request_upload_url().await?;
        self.upload_to_signed_url(&slot.signed_url, file.data.clone(), progress)
            .await?;

        let mime_type = file
            .mime_type
            .clone()
            .filter(|mime| !mime.trim().is_empty())
            .unwrap_or_else(|| voxagent_core::constants::DEFAULT_MIME_TYPE.to_string());

        self.create_attachment(&RegisterAttachmentRequest {
            key: slot.key,
            file_name: file.name.clone(),
            file_size: file.size(),
            mime_type,
        })
        .await
    }

    pub async fn create_agent(&self, data: &AgentData) -> ApiResult<Agent> {
        self.post_json("/agents", data).await
    }

    pub async fn update_agent(&self, id: &str, data: &AgentData) -> ApiResult<Agent> {
        self.put_json(&format!("/agents/{}", urlencoding::encode(id)), data)
            .await
    }

    /// Ask the backend to place a test call from an agent.
    pub async fn test_call(
        &self,
        agent_id: &str,
        data: &TestCallData,
    ) -> ApiResult<TestCallResponse> {
        self.post_json(
            &format!("/agents/{}/test-call", urlencoding::encode(agent_id)),
            data,
        )
        .await
    }

    pub async fn get_languages(&self) -> ApiResult<Vec<Language>> {
        self.get("/languages").await
    }

    pub async fn get_voices(&self) -> ApiResult<Vec<Voice>> {
        self.get("/voices").await
    }

    pub async fn get_prompts(&self) -> ApiResult<Vec<Prompt>> {
        self.get("/prompts").await
    }

    pub async fn get_models(&self) -> ApiResult<Vec<Model>> {
        self.get("/models").await
    }
}

#[async_trait]
impl AttachmentService for ApiClient {
    async fn allocate_upload_slot(&self) -> ApiResult<UploadUrlResponse> {
        self.request_upload_url().await
    }

    async fn transfer(
        &self,
        signed_url: &str,
        data: Bytes,
        progress: Option<ProgressFn>,
    ) -> ApiResult<()> {
        self.upload_to_signed_url(signed_url, data, progress).await
    }

    async fn register_attachment(
        &self,
        request: &RegisterAttachmentRequest,
    ) -> ApiResult<AttachmentResponse> {
        self.create_attachment(request).await
    }
}

#[async_trait]
impl AgentService for ApiClient {
    async fn create_agent(&self, data: &AgentData) -> ApiResult<Agent> {
        ApiClient::create_agent(self, data).await
    }

    async fn update_agent(&self, id: &str, data: &AgentData) -> ApiResult<Agent> {
        ApiClient::update_agent(self, id, data).await
    }

    async fn start_test_call(
        &self,
        agent_id: &str,
        data: &TestCallData,
    ) -> ApiResult<TestCallResponse> {
        self.test_call(agent_id, data).await
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    async fn languages(&self) -> ApiResult<Vec<Language>> {
        self.get_languages().await
    }

    async fn voices(&self) -> ApiResult<Vec<Voice>> {
        self.get_voices().await
    }

    async fn prompts(&self) -> ApiResult<Vec<Prompt>> {
        self.get_prompts().await
    }

    async fn models(&self) -> ApiResult<Vec<Model>> {
        self.get_models().await
    }
}
