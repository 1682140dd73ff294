//! hubmirror Server
//!
//! HTTP front end that mirrors Docker Hub images through a GitHub Actions
//! workflow and streams the workflow's progress back to `curl`/`wget`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hubmirror_client::{DockerHubClient, GitHubClient};
use hubmirror_server::{
    http, AppState, Config, MirrorSession, SystemClock, WorkflowDispatcher, WorkflowTracker,
};

/// Docker Hub mirror service.
#[derive(Parser, Debug)]
#[command(name = "hubmirror-server", about = "Mirror Docker Hub images through GitHub Actions")]
struct Args {
    /// HTTP server address
    #[arg(long, env = "MIRROR_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,

    /// GitHub token allowed to dispatch and read the mirror workflow
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Repository hosting the mirror workflow (owner/repo)
    #[arg(long, env = "MIRROR_ORG_REPO", default_value = "1mgr/images-mirror")]
    org_repo: String,

    /// Workflow file to dispatch
    #[arg(long, env = "MIRROR_WORKFLOW_FILE", default_value = "mirror.yml")]
    workflow_file: String,

    /// Git ref the workflow runs on
    #[arg(long, env = "MIRROR_WORKFLOW_REF", default_value = "main")]
    workflow_ref: String,

    /// GitHub API base URL
    #[arg(long, env = "MIRROR_GITHUB_API_URL", default_value = hubmirror_client::github::GITHUB_API_URL)]
    github_api_url: String,

    /// Timeout of each GitHub request, in seconds
    #[arg(long, env = "MIRROR_REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    /// Delay between two polls of the workflow, in milliseconds
    #[arg(long, env = "MIRROR_POLL_INTERVAL_MS", default_value = "1000")]
    poll_interval_ms: u64,

    /// How far back to search for the dispatched run, in seconds
    #[arg(long, env = "MIRROR_RUN_LOOKBACK_SECS", default_value = "300")]
    run_lookback_secs: u64,

    /// Docker Hub API base URL
    #[arg(long, env = "MIRROR_DOCKER_HUB_URL", default_value = hubmirror_client::hub::DOCKER_HUB_URL)]
    docker_hub_url: String,

    /// Timeout of the Docker Hub existence check, in seconds
    #[arg(long, env = "MIRROR_REGISTRY_TIMEOUT_SECS", default_value = "10")]
    registry_timeout_secs: u64,

    /// Registry prefix mirrored images are pulled from
    #[arg(long, env = "MIRROR_REGISTRY", default_value = "ghcr.io/1mgr")]
    mirror_registry: String,

    /// Page browsers are redirected to
    #[arg(long, env = "MIRROR_HOMEPAGE_URL", default_value = "https://github.com/1mgr/image-mirrors")]
    homepage_url: String,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            http_addr: self.http_addr,
            github_token: self.github_token,
            org_repo: self.org_repo,
            workflow_file: self.workflow_file,
            workflow_ref: self.workflow_ref,
            github_api_url: self.github_api_url,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            run_lookback: Duration::from_secs(self.run_lookback_secs),
            docker_hub_url: self.docker_hub_url,
            registry_timeout: Duration::from_secs(self.registry_timeout_secs),
            mirror_registry: self.mirror_registry,
            homepage_url: self.homepage_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hubmirror=info".parse()?))
        .init();

    if config.github_token.trim().is_empty() {
        return Err("GITHUB_TOKEN must not be empty".into());
    }
    let http_addr: SocketAddr = config.http_addr.parse()?;

    let github = Arc::new(GitHubClient::new(config.github())?);
    let docker_hub = Arc::new(DockerHubClient::new(config.docker_hub())?);

    let session = MirrorSession::new(
        WorkflowDispatcher::new(github.clone()),
        WorkflowTracker::new(github, Arc::new(SystemClock), config.tracker()),
        config.mirror_registry.clone(),
    );
    let state = AppState::new(docker_hub, session, config.homepage_url.clone());
    let router = http::create_router(state);

    info!(
        http_addr = %http_addr,
        org_repo = %config.org_repo,
        workflow = %config.workflow_file,
        mirror_registry = %config.mirror_registry,
        "Starting hubmirror server"
    );

    let listener = TcpListener::bind(http_addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("hubmirror server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
