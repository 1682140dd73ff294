//! Status enums for remote workflow runs and steps.

use serde::{Deserialize, Serialize};

/// Status of a workflow run as reported by the CI system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run has been requested but not yet queued.
    Requested,
    /// Run is waiting for a runner.
    #[default]
    Queued,
    /// Run is waiting on a deployment protection rule.
    Waiting,
    /// Run is pending.
    Pending,
    /// Run is executing.
    InProgress,
    /// Run finished, whatever its conclusion.
    Completed,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Returns true if the run has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Status of a single step inside a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step is waiting for earlier steps.
    #[default]
    Pending,
    /// Step is queued.
    Queued,
    /// Step is executing.
    InProgress,
    /// Step finished, whatever its conclusion.
    Completed,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl StepStatus {
    /// Returns true if the step has finished.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_status_decodes_github_values() {
        let status: StepStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, StepStatus::InProgress);

        let status: StepStatus = serde_json::from_str("\"completed\"").unwrap();
        assert!(status.is_completed());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: StepStatus = serde_json::from_str("\"action_required\"").unwrap();
        assert_eq!(status, StepStatus::Unknown);
        assert!(!status.is_completed());

        let status: RunStatus = serde_json::from_str("\"stale\"").unwrap();
        assert_eq!(status, RunStatus::Unknown);
        assert!(!status.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
    }
}
