//! Shared constants: accepted attachment types, defaults and user-facing messages.

/// File extensions (lowercase, without the dot) accepted as agent attachments.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "csv", "xlsx", "xls"];

/// Media type sent at registration when the source reports none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Default latency (seconds) of a new agent.
pub const DEFAULT_LATENCY: f64 = 0.5;
/// Default speaking speed (percent) of a new agent.
pub const DEFAULT_SPEED: f64 = 110.0;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const ALLOCATION_FAILED_MESSAGE: &str = "Could not allocate upload slot";
pub const TRANSFER_FAILED_MESSAGE: &str = "File transfer failed";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Could not register attachment";

pub const AGENT_CREATED_MESSAGE: &str = "Agent created successfully!";
pub const AGENT_UPDATED_MESSAGE: &str = "Agent updated successfully!";
pub const AGENT_SAVE_FAILED_MESSAGE: &str = "Failed to save agent";
pub const TEST_CALL_STARTED_MESSAGE: &str = "Test call initiated successfully!";
pub const TEST_CALL_STARTED_DESCRIPTION: &str = "You will receive a call shortly.";
pub const TEST_CALL_FAILED_MESSAGE: &str = "Test call failed";
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const REQUIRED_FIELDS_BEFORE_TEST_MESSAGE: &str =
    "Please fill in all required fields before testing";
pub const PHONE_NUMBER_REQUIRED_MESSAGE: &str = "Please enter a phone number";
pub const UNSAVED_CHANGES_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to leave?";
