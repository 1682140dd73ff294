//! Docker image reference parsing and canonicalization.
//!
//! Users hand us anything from `alpine` to `index.docker.io/library/alpine:3`.
//! Everything is reduced to a canonical `(domain, repository, tag)` triple
//! following Docker Hub's own conventions:
//!
//! - a first path segment is only a registry host if it contains a `.` or a
//!   `:` or is exactly `localhost`, otherwise the whole string is a repository
//!   on Docker Hub;
//! - `index.docker.io` and `registry-1.docker.io` are aliases of `docker.io`;
//! - single-segment Docker Hub repositories live in the `library` namespace;
//! - a missing tag means `latest`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;

/// Canonical Docker Hub domain.
pub const DEFAULT_DOMAIN: &str = "docker.io";

/// Legacy hostname for Docker Hub.
const LEGACY_DEFAULT_DOMAIN: &str = "index.docker.io";

/// Registry API hostname for Docker Hub.
const REGISTRY_DOMAIN: &str = "registry-1.docker.io";

/// Namespace holding Docker's official images.
pub const OFFICIAL_NAMESPACE: &str = "library";

/// Tag used when none is given.
pub const DEFAULT_TAG: &str = "latest";

/// A canonicalized Docker Hub image reference.
///
/// Only constructed through [`ImageReference::parse`], so `domain` is always
/// [`DEFAULT_DOMAIN`] and `repository` is always `namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    domain: String,
    repository: String,
    tag: String,
}

impl ImageReference {
    /// Parse and canonicalize a user supplied image string.
    ///
    /// The string must match the reference grammar, must resolve to Docker
    /// Hub and must not be pinned by digest.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let (captures, name_domain) =
            match_reference(raw).ok_or_else(|| ReferenceError::Malformed(raw.to_string()))?;
        if captures.get(3).is_some() {
            return Err(ReferenceError::DigestNotSupported(raw.to_string()));
        }
        if !is_docker_hub(&name_domain) {
            return Err(ReferenceError::UnsupportedRegistry {
                domain: name_domain,
            });
        }

        let (domain, repository, tag) = split_image_parts(raw);
        if repository.chars().any(|c| c.is_ascii_uppercase())
            || repository.matches('/').count() != 1
        {
            return Err(ReferenceError::Malformed(raw.to_string()));
        }
        Ok(Self {
            domain,
            repository,
            tag,
        })
    }

    /// Registry domain, always [`DEFAULT_DOMAIN`].
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Repository path including its namespace, e.g. `library/postgres`.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Image tag, `latest` when none was given.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Repository with the official namespace stripped back off.
    pub fn short_repository(&self) -> &str {
        shorten_repository(&self.repository)
    }

    /// `repository:tag` in the short form Docker users type, e.g. `postgres:16`.
    pub fn short_name(&self) -> String {
        format!("{}:{}", self.short_repository(), self.tag)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.domain, self.repository, self.tag)
    }
}

impl FromStr for ImageReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns true if `raw` matches the reference grammar and does not name a
/// registry other than Docker Hub.
pub fn is_valid(raw: &str) -> bool {
    match_reference(raw).is_some_and(|(_, domain)| is_docker_hub(&domain))
}

/// Match `raw` against the grammar and resolve the domain of its name part.
fn match_reference(raw: &str) -> Option<(Captures<'_>, String)> {
    let captures = reference_regex().captures(raw)?;
    let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let (domain, _, _) = split_image_parts(name);
    Some((captures, domain))
}

fn is_docker_hub(domain: &str) -> bool {
    domain.is_empty() || domain == DEFAULT_DOMAIN
}

/// Split an image string into `(domain, repository, tag)`.
///
/// No validation happens here; callers are expected to have checked the
/// string against the grammar first.
pub fn split_image_parts(name: &str) -> (String, String, String) {
    let (mut domain, mut remainder) = match name.split_once('/') {
        Some((prefix, rest))
            if prefix.contains(['.', ':']) || prefix == "localhost" =>
        {
            (prefix.to_string(), rest.to_string())
        }
        _ => (DEFAULT_DOMAIN.to_string(), name.to_string()),
    };

    if domain == LEGACY_DEFAULT_DOMAIN || domain == REGISTRY_DOMAIN {
        domain = DEFAULT_DOMAIN.to_string();
    }
    if domain == DEFAULT_DOMAIN && !remainder.contains('/') {
        remainder = format!("{}/{}", OFFICIAL_NAMESPACE, remainder);
    }

    let tag = match remainder.rfind(':') {
        Some(i) => {
            let tag = remainder[i + 1..].to_string();
            remainder.truncate(i);
            tag
        }
        None => DEFAULT_TAG.to_string(),
    };

    (domain, remainder, tag)
}

/// Strip the official namespace prefix from a repository path.
pub fn shorten_repository(repository: &str) -> &str {
    repository
        .strip_prefix(OFFICIAL_NAMESPACE)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(repository)
}

/// The distribution reference grammar.
///
/// Capture 1 is the name (optional domain plus path), 2 the tag and 3 the
/// digest.
fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| {
        let alphanumeric = "[a-z0-9]+";
        let separator = "(?:[._]|__|[-]+)";
        let path_component = format!("{alphanumeric}(?:{separator}{alphanumeric})*");

        let domain_component = "(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
        let domain_name = format!(r"{domain_component}(?:\.{domain_component})*");
        let ipv6 = r"\[[a-fA-F0-9:]+\]";
        let domain_and_port = format!("(?:{domain_name}|{ipv6})(?::[0-9]+)?");

        let tag = "[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
        let digest = "[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";

        let name = format!("(?:{domain_and_port}/)?{path_component}(?:/{path_component})*");
        let pattern = format!("^({name})(?::({tag}))?(?:@({digest}))?$");

        // Constant pattern, a failure here is a programming error.
        Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid reference grammar: {e}"))
    })
}
