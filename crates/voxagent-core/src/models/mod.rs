//! Data models for the application
//!
//! Upload jobs and their render snapshots, the attachment wire contracts,
//! agent payloads and the catalog items offered by the form's dropdowns.

mod agent;
mod attachment;
mod catalog;
mod upload;

// Re-export all models for convenient imports
pub use agent::*;
pub use attachment::*;
pub use catalog::*;
pub use upload::*;
