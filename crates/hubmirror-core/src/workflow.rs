//! Records read back from the remote CI system.
//!
//! These mirror the subset of the GitHub Actions REST payloads the tracker
//! needs. Unknown fields are ignored so the API can grow without breaking
//! decoding.

use serde::{Deserialize, Serialize};

use crate::status::{RunStatus, StepStatus};

/// A workflow run. Owned by the CI system and only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Run identifier.
    pub id: u64,
    /// Current run status.
    #[serde(default)]
    pub status: RunStatus,
    /// Endpoint listing the jobs of this run.
    pub jobs_url: String,
}

/// A job inside a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier.
    pub id: u64,
    /// Display name of the job.
    pub name: String,
    /// Run this job belongs to.
    pub run_id: u64,
    /// Job status. Shares the run status vocabulary.
    #[serde(default)]
    pub status: RunStatus,
    /// Steps in declaration order. Empty until a runner picks the job up,
    /// and for good when the job is skipped.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Job {
    /// Returns true if any step of this job carries the given name.
    pub fn has_step_named(&self, name: &str) -> bool {
        self.steps.iter().any(|step| step.name == name)
    }
}

/// Smallest unit of remote progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: StepStatus,
}

/// Body of `GET /repos/{org_repo}/actions/runs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowRunsResponse {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Body of `GET {jobs_url}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
}
