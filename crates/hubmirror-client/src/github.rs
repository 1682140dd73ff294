//! GitHub Actions REST client.
//!
//! Covers the three calls the mirror flow needs: dispatching the mirror
//! workflow, listing recently created runs, and listing the jobs of a run.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use hubmirror_core::{CorrelationId, Job, JobsResponse, WorkflowRun, WorkflowRunsResponse};

use crate::error::ClientError;

/// Public GitHub REST endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Remote CI operations used by the dispatcher and the tracker.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Trigger the mirror workflow for `image_name` tagged with `correlation_id`.
    async fn dispatch_workflow(
        &self,
        image_name: &str,
        correlation_id: &CorrelationId,
    ) -> Result<(), ClientError>;

    /// List runs created after `created_after`.
    async fn list_recent_runs(
        &self,
        created_after: DateTime<Utc>,
    ) -> Result<Vec<WorkflowRun>, ClientError>;

    /// List the jobs behind a run's `jobs_url`.
    async fn list_jobs(&self, jobs_url: &str) -> Result<Vec<Job>, ClientError>;

    /// Browser link for a run.
    fn run_html_url(&self, run_id: u64) -> String;
}

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Token sent as a bearer credential.
    pub token: String,

    /// `owner/repo` hosting the mirror workflow.
    pub org_repo: String,

    /// Workflow file name, e.g. `mirror.yml`.
    pub workflow_file: String,

    /// Git ref the workflow is dispatched on.
    pub workflow_ref: String,

    /// REST API base URL.
    pub api_url: String,

    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            org_repo: "1mgr/images-mirror".to_string(),
            workflow_file: "mirror.yml".to_string(),
            workflow_ref: "main".to_string(),
            api_url: GITHUB_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Body of the `workflow_dispatch` call.
#[derive(Debug, Serialize)]
struct DispatchRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    inputs: DispatchInputs<'a>,
}

#[derive(Debug, Serialize)]
struct DispatchInputs<'a> {
    image_name: &'a str,
    id: &'a str,
}

/// Authenticated GitHub Actions client.
pub struct GitHubClient {
    inner: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    /// Create a new client. Every request carries the bearer token and the
    /// configured timeout.
    pub fn new(config: GitHubConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| ClientError::Build(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("hubmirror"));

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        let config = GitHubConfig {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { inner, config })
    }

    fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/actions/workflows/{}/dispatches",
            self.config.api_url, self.config.org_repo, self.config.workflow_file
        )
    }

    fn runs_url(&self, created_after: DateTime<Utc>) -> String {
        format!(
            "{}/repos/{}/actions/runs?created={}",
            self.config.api_url,
            self.config.org_repo,
            created_filter(created_after)
        )
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        debug!(url = %url, "GET request");

        let response = self.inner.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl WorkflowApi for GitHubClient {
    async fn dispatch_workflow(
        &self,
        image_name: &str,
        correlation_id: &CorrelationId,
    ) -> Result<(), ClientError> {
        let url = self.dispatch_url();
        let body = DispatchRequest {
            git_ref: &self.config.workflow_ref,
            inputs: DispatchInputs {
                image_name,
                id: correlation_id.as_str(),
            },
        };
        debug!(url = %url, image = %image_name, id = %correlation_id, "POST workflow dispatch");

        let response = self.inner.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status, url });
        }
        Ok(())
    }

    async fn list_recent_runs(
        &self,
        created_after: DateTime<Utc>,
    ) -> Result<Vec<WorkflowRun>, ClientError> {
        let runs: WorkflowRunsResponse = self.get_json(&self.runs_url(created_after)).await?;
        Ok(runs.workflow_runs)
    }

    async fn list_jobs(&self, jobs_url: &str) -> Result<Vec<Job>, ClientError> {
        let jobs: JobsResponse = self.get_json(jobs_url).await?;
        Ok(jobs.jobs)
    }

    fn run_html_url(&self, run_id: u64) -> String {
        format!(
            "https://github.com/{}/actions/runs/{}",
            self.config.org_repo, run_id
        )
    }
}

/// Value of the `created` query parameter: an url-encoded `>` followed by
/// the minute-resolution UTC timestamp.
pub fn created_filter(created_after: DateTime<Utc>) -> String {
    format!("%3E{}", created_after.format("%Y-%m-%dT%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> GitHubClient {
        GitHubClient::new(GitHubConfig {
            token: "test-token".to_string(),
            org_repo: "acme/mirrors".to_string(),
            api_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_created_filter() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap();
        assert_eq!(created_filter(at), "%3E2024-03-09T07:05");
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.dispatch_url(),
            "http://localhost:9999/repos/acme/mirrors/actions/workflows/mirror.yml/dispatches"
        );

        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        assert_eq!(
            client.runs_url(at),
            "http://localhost:9999/repos/acme/mirrors/actions/runs?created=%3E2024-03-09T07:05"
        );
        assert_eq!(
            client.run_html_url(42),
            "https://github.com/acme/mirrors/actions/runs/42"
        );
    }

    #[test]
    fn test_dispatch_body_shape() {
        let body = DispatchRequest {
            git_ref: "main",
            inputs: DispatchInputs {
                image_name: "postgres:16",
                id: "aB3dE6gH",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ref": "main",
                "inputs": {"image_name": "postgres:16", "id": "aB3dE6gH"}
            })
        );
    }

    #[test]
    fn test_rejects_unprintable_token() {
        let result = GitHubClient::new(GitHubConfig {
            token: "bad\ntoken".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ClientError::Build(_))));
    }
}
