//! Test helpers: in-memory implementations of the remote service traits.
//!
//! Run from workspace root: `cargo test -p voxagent-services`.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use voxagent_core::{
    Agent, AgentData, AgentService, ApiError, ApiResult, AttachmentResponse, AttachmentService,
    CandidateFile, CatalogService, JobId, JobStatus, JobView, Language, Model, ProgressFn, Prompt,
    RegisterAttachmentRequest, TestCallData, TestCallResponse, UploadUrlResponse, Voice,
};
use voxagent_services::UploadOrchestrator;

/// Upper bound for any wait in these tests.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

pub fn candidate(name: &str, size: usize) -> CandidateFile {
    CandidateFile::new(name, vec![7u8; size])
}

/// Remote id the fake registers for a file name.
pub fn remote_id_for(file_name: &str) -> String {
    format!("att-{}", file_name)
}

/// Attachment service with switchable failures and an optional transfer gate.
#[derive(Default)]
pub struct FakeAttachmentService {
    slots: AtomicUsize,
    allocation_error: Option<ApiError>,
    transfer_error: Option<ApiError>,
    registration_errors: HashMap<String, ApiError>,
    gate: Option<Arc<Semaphore>>,
    registered: Mutex<Vec<RegisterAttachmentRequest>>,
}

impl FakeAttachmentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_allocation(mut self, error: ApiError) -> Self {
        self.allocation_error = Some(error);
        self
    }

    pub fn failing_transfer(mut self, error: ApiError) -> Self {
        self.transfer_error = Some(error);
        self
    }

    /// Fail registration of `file_name`, with `message` as the server message.
    pub fn failing_registration_for(mut self, file_name: &str, message: Option<&str>) -> Self {
        let status = if message.is_some() { 400 } else { 500 };
        self.registration_errors.insert(
            file_name.to_string(),
            ApiError::Status {
                status,
                message: message.map(str::to_string),
            },
        );
        self
    }

    /// Hold every transfer until a permit is added to `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn allocations(&self) -> usize {
        self.slots.load(Ordering::SeqCst)
    }

    pub fn registered(&self) -> Vec<RegisterAttachmentRequest> {
        self.registered
            .lock()
            .expect("registered lock poisoned")
            .clone()
    }
}

#[async_trait]
impl AttachmentService for FakeAttachmentService {
    async fn allocate_upload_slot(&self) -> ApiResult<UploadUrlResponse> {
        if let Some(error) = &self.allocation_error {
            return Err(error.clone());
        }
        let slot = self.slots.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadUrlResponse {
            key: format!("uploads/{}", slot),
            signed_url: format!("https://storage.test/uploads/{}?signature=abc", slot),
        })
    }

    async fn transfer(
        &self,
        _signed_url: &str,
        data: Bytes,
        progress: Option<ProgressFn>,
    ) -> ApiResult<()> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            permit.forget();
        }

        let total = data.len() as u64;
        if let Some(progress) = &progress {
            for quarter in 1..=4u64 {
                let sent = total * quarter / 4;
                progress(sent, total);
                tokio::task::yield_now().await;
                if let Some(error) = &self.transfer_error {
                    if quarter == 2 {
                        return Err(error.clone());
                    }
                }
            }
        }
        match &self.transfer_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn register_attachment(
        &self,
        request: &RegisterAttachmentRequest,
    ) -> ApiResult<AttachmentResponse> {
        if let Some(error) = self.registration_errors.get(&request.file_name) {
            return Err(error.clone());
        }
        self.registered
            .lock()
            .expect("registered lock poisoned")
            .push(request.clone());
        Ok(AttachmentResponse {
            id: remote_id_for(&request.file_name),
        })
    }
}

/// Agent service recording every call.
#[derive(Default)]
pub struct FakeAgentService {
    create_error: Option<ApiError>,
    test_call_error: Option<ApiError>,
    created: Mutex<Vec<AgentData>>,
    updated: Mutex<Vec<(String, AgentData)>>,
    test_calls: Mutex<Vec<(String, TestCallData)>>,
}

impl FakeAgentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create(mut self, error: ApiError) -> Self {
        self.create_error = Some(error);
        self
    }

    pub fn failing_test_call(mut self, error: ApiError) -> Self {
        self.test_call_error = Some(error);
        self
    }

    pub fn created(&self) -> Vec<AgentData> {
        self.created.lock().expect("created lock poisoned").clone()
    }

    pub fn updated(&self) -> Vec<(String, AgentData)> {
        self.updated.lock().expect("updated lock poisoned").clone()
    }

    pub fn test_calls(&self) -> Vec<(String, TestCallData)> {
        self.test_calls
            .lock()
            .expect("test_calls lock poisoned")
            .clone()
    }
}

#[async_trait]
impl AgentService for FakeAgentService {
    async fn create_agent(&self, data: &AgentData) -> ApiResult<Agent> {
        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }
        let mut created = self.created.lock().expect("created lock poisoned");
        created.push(data.clone());
        Ok(Agent {
            id: format!("agent-{}", created.len()),
            data: data.clone(),
        })
    }

    async fn update_agent(&self, id: &str, data: &AgentData) -> ApiResult<Agent> {
        self.updated
            .lock()
            .expect("updated lock poisoned")
            .push((id.to_string(), data.clone()));
        Ok(Agent {
            id: id.to_string(),
            data: data.clone(),
        })
    }

    async fn start_test_call(
        &self,
        agent_id: &str,
        data: &TestCallData,
    ) -> ApiResult<TestCallResponse> {
        if let Some(error) = &self.test_call_error {
            return Err(error.clone());
        }
        self.test_calls
            .lock()
            .expect("test_calls lock poisoned")
            .push((agent_id.to_string(), data.clone()));
        Ok(TestCallResponse {
            success: true,
            call_id: "call-1".to_string(),
            agent_id: agent_id.to_string(),
            status: "queued".to_string(),
        })
    }
}

/// Catalog with one entry per list; `voices_error` makes the voices list fail.
#[derive(Default)]
pub struct FakeCatalogService {
    pub voices_error: Option<ApiError>,
}

#[async_trait]
impl CatalogService for FakeCatalogService {
    async fn languages(&self) -> ApiResult<Vec<Language>> {
        Ok(vec![Language {
            id: "lang-1".to_string(),
            name: "English".to_string(),
            code: "en-US".to_string(),
        }])
    }

    async fn voices(&self) -> ApiResult<Vec<Voice>> {
        if let Some(error) = &self.voices_error {
            return Err(error.clone());
        }
        Ok(vec![Voice {
            id: "voice-1".to_string(),
            name: "Ava".to_string(),
            tag: "warm".to_string(),
            language: "en-US".to_string(),
        }])
    }

    async fn prompts(&self) -> ApiResult<Vec<Prompt>> {
        Ok(vec![Prompt {
            id: "prompt-1".to_string(),
            name: "Receptionist".to_string(),
            description: "Answers inbound calls".to_string(),
        }])
    }

    async fn models(&self) -> ApiResult<Vec<Model>> {
        Ok(vec![Model {
            id: "model-1".to_string(),
            name: "Fast".to_string(),
            description: "Low latency".to_string(),
        }])
    }
}

/// Wait until the views satisfy `predicate`, panicking after [`WAIT_LIMIT`].
pub async fn wait_for_views<F>(orchestrator: &UploadOrchestrator, predicate: F) -> Vec<JobView>
where
    F: FnMut(&Vec<JobView>) -> bool,
{
    let mut views = orchestrator.subscribe();
    let snapshot = tokio::time::timeout(WAIT_LIMIT, views.wait_for(predicate))
        .await
        .expect("timed out waiting for upload views")
        .expect("orchestrator dropped")
        .clone();
    snapshot
}

/// Wait until job `id` is uploading and holds a storage key.
pub async fn wait_until_transferring(orchestrator: &UploadOrchestrator, id: JobId) {
    wait_for_views(orchestrator, |views| {
        views.iter().any(|view| {
            view.id == id && view.status == JobStatus::Uploading && view.storage_key.is_some()
        })
    })
    .await;
}

pub async fn wait_idle(orchestrator: &UploadOrchestrator) {
    tokio::time::timeout(WAIT_LIMIT, orchestrator.wait_idle())
        .await
        .expect("timed out waiting for uploads to finish");
}
