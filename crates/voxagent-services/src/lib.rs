//! VoxAgent Services Layer
//!
//! This crate is the **client-side service layer** behind the agent form: the
//! attachment upload orchestrator, agent save and test-call coordination,
//! unsaved-change tracking and dropdown loading. It talks to the backend only
//! through the service traits of `voxagent-core`, so the HTTP client and the
//! in-memory fakes used in tests are interchangeable.

pub mod agent_form;
pub mod agent_save;
pub mod dropdowns;
pub mod notifications;
pub mod test_call;
pub mod unsaved;
pub mod uploads;

pub use agent_form::AgentForm;
pub use agent_save::{AgentSaver, SaveOutcome};
pub use dropdowns::{load_dropdowns, DropdownOptions, LoadedDropdowns};
pub use notifications::{MemoryNotifier, Notification, Notifier, TracingNotifier};
pub use test_call::TestCaller;
pub use unsaved::UnsavedChanges;
pub use uploads::{JobCollection, UploadOrchestrator};
