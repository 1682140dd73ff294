//! HTTP clients for the two remote services hubmirror talks to.
//!
//! - [`GitHubClient`] dispatches the mirror workflow and reads back its runs
//!   and jobs through the GitHub Actions REST API.
//! - [`DockerHubClient`] checks that an image tag exists upstream.
//!
//! Both are exposed behind traits ([`WorkflowApi`], [`RegistryProbe`]) so the
//! server can be exercised against in-memory fakes.

pub mod error;
pub mod github;
pub mod hub;

pub use error::ClientError;
pub use github::{GitHubClient, GitHubConfig, WorkflowApi};
pub use hub::{DockerHubClient, DockerHubConfig, RegistryProbe};
