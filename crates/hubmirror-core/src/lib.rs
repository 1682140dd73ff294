//! hubmirror Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP clients
//! - The async runtime
//!
//! It covers the image reference grammar and canonicalization, the
//! per-request correlation id, and the records read back from the remote
//! CI system while a mirror run is tracked.

pub mod error;
pub mod ids;
pub mod reference;
pub mod status;
pub mod workflow;

// Re-export commonly used types
pub use error::ReferenceError;
pub use ids::CorrelationId;
pub use reference::{ImageReference, DEFAULT_DOMAIN, OFFICIAL_NAMESPACE};
pub use status::{RunStatus, StepStatus};
pub use workflow::{Job, JobsResponse, Step, WorkflowRun, WorkflowRunsResponse};
