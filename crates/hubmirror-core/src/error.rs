//! Core domain errors.

use thiserror::Error;

/// Reasons an image reference is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// Nothing was supplied.
    #[error("Image reference is empty")]
    Empty,

    /// The string does not match the image reference grammar.
    #[error("Malformed image reference: {0}")]
    Malformed(String),

    /// The reference is pinned by digest rather than by tag.
    #[error("Digest references are not supported: {0}")]
    DigestNotSupported(String),

    /// The reference names a registry other than Docker Hub.
    #[error("Registry '{domain}' is not supported, only docker.io images can be mirrored")]
    UnsupportedRegistry { domain: String },
}
