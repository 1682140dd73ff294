//! Server configuration.

use std::time::Duration;

use hubmirror_client::{DockerHubConfig, GitHubConfig};
use hubmirror_client::github::GITHUB_API_URL;
use hubmirror_client::hub::DOCKER_HUB_URL;

use crate::tracker::TrackerConfig;

/// Server configuration.
///
/// Built once at startup and split into the per-component configs each
/// client and the tracker receive at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address.
    pub http_addr: String,

    /// GitHub token used to dispatch and read workflow runs.
    pub github_token: String,

    /// `owner/repo` hosting the mirror workflow.
    pub org_repo: String,

    /// Workflow file dispatched for every request.
    pub workflow_file: String,

    /// Git ref the workflow runs on.
    pub workflow_ref: String,

    /// GitHub REST API base URL.
    pub github_api_url: String,

    /// Timeout for each GitHub request.
    pub request_timeout: Duration,

    /// Delay between two polls of the run list or the job list.
    pub poll_interval: Duration,

    /// How far back the run list is searched for the dispatched run.
    pub run_lookback: Duration,

    /// Docker Hub API base URL.
    pub docker_hub_url: String,

    /// Timeout for the Docker Hub existence lookup.
    pub registry_timeout: Duration,

    /// Registry prefix images are mirrored under, e.g. `ghcr.io/1mgr`.
    pub mirror_registry: String,

    /// Page browsers are redirected to.
    pub homepage_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            github_token: String::new(),
            org_repo: "1mgr/images-mirror".to_string(),
            workflow_file: "mirror.yml".to_string(),
            workflow_ref: "main".to_string(),
            github_api_url: GITHUB_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            run_lookback: Duration::from_secs(5 * 60),
            docker_hub_url: DOCKER_HUB_URL.to_string(),
            registry_timeout: Duration::from_secs(10),
            mirror_registry: "ghcr.io/1mgr".to_string(),
            homepage_url: "https://github.com/1mgr/image-mirrors".to_string(),
        }
    }
}

impl Config {
    /// GitHub client settings.
    pub fn github(&self) -> GitHubConfig {
        GitHubConfig {
            token: self.github_token.clone(),
            org_repo: self.org_repo.clone(),
            workflow_file: self.workflow_file.clone(),
            workflow_ref: self.workflow_ref.clone(),
            api_url: self.github_api_url.clone(),
            timeout: self.request_timeout,
        }
    }

    /// Docker Hub client settings.
    pub fn docker_hub(&self) -> DockerHubConfig {
        DockerHubConfig {
            base_url: self.docker_hub_url.clone(),
            timeout: self.registry_timeout,
        }
    }

    /// Tracker settings.
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            poll_interval: self.poll_interval,
            run_lookback: self.run_lookback,
        }
    }
}
