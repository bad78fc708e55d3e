//! VoxAgent Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! service traits shared by the API client, the upload orchestrator and the CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, UploadError, UploadStep};
pub use models::{
    Agent, AgentData, AgentTools, AttachmentResponse, CandidateFile, JobId, JobState, JobStatus,
    JobView, Language, Model, Prompt, RegisterAttachmentRequest, TestCallData, TestCallResponse,
    UploadJob, UploadUrlResponse, Voice,
};
pub use traits::{AgentService, AttachmentService, CatalogService, ProgressFn};
pub use validation::{
    check_file_name, file_extension, is_accepted_file_name, mime_type_for_extension,
};
