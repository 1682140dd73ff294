//! Docker Hub metadata client used to confirm an image exists upstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use hubmirror_core::ImageReference;

use crate::error::ClientError;

/// Public Docker Hub endpoint.
pub const DOCKER_HUB_URL: &str = "https://hub.docker.com";

/// Confirms a canonicalized reference exists in the upstream registry.
#[async_trait]
pub trait RegistryProbe: Send + Sync {
    /// Look the tag up. `Ok(false)` means the registry answered that the tag
    /// does not exist; transport failures and unexpected statuses are errors.
    async fn check(&self, reference: &ImageReference) -> Result<bool, ClientError>;

    /// Returns true only if the registry confirmed the tag. Every failure,
    /// including a network error, reads as "does not exist".
    async fn exists(&self, reference: &ImageReference) -> bool {
        match self.check(reference).await {
            Ok(found) => found,
            Err(e) => {
                warn!(image = %reference, error = %e, "Registry lookup failed");
                false
            }
        }
    }
}

/// Docker Hub client configuration.
#[derive(Debug, Clone)]
pub struct DockerHubConfig {
    /// Hub API base URL.
    pub base_url: String,

    /// Timeout applied to every lookup.
    pub timeout: Duration,
}

impl Default for DockerHubConfig {
    fn default() -> Self {
        Self {
            base_url: DOCKER_HUB_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Read-only Docker Hub client.
pub struct DockerHubClient {
    inner: reqwest::Client,
    base_url: String,
}

impl DockerHubClient {
    /// Create a new client.
    pub fn new(config: DockerHubConfig) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Metadata URL for a tag.
    pub fn tag_url(&self, reference: &ImageReference) -> String {
        format!(
            "{}/v2/repositories/{}/tags/{}",
            self.base_url,
            reference.repository(),
            reference.tag()
        )
    }
}

#[async_trait]
impl RegistryProbe for DockerHubClient {
    async fn check(&self, reference: &ImageReference) -> Result<bool, ClientError> {
        let url = self.tag_url(reference);
        debug!(url = %url, "Checking tag on Docker Hub");

        let response = self.inner.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClientError::Status { status, url }),
        }
    }
}
