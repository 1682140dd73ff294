//! Property-based tests for image reference canonicalization.
//!
//! Uses `proptest` to check the canonical form across many generated names.

use proptest::prelude::*;

use hubmirror_core::reference::is_valid;
use hubmirror_core::{ImageReference, DEFAULT_DOMAIN};

/// Single path component: lowercase alphanumerics joined by separators.
fn path_component() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,10}([._-][a-z0-9]{1,8}){0,2}"
}

fn tag() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_][A-Za-z0-9_.-]{0,20}"
}

proptest! {
    /// Unqualified names land in the official namespace with the latest tag.
    #[test]
    fn prop_unqualified_name_is_official_latest(name in path_component()) {
        let reference = ImageReference::parse(&name).unwrap();
        prop_assert_eq!(reference.domain(), DEFAULT_DOMAIN);
        prop_assert_eq!(reference.repository(), format!("library/{}", name));
        prop_assert_eq!(reference.tag(), "latest");
    }

    /// Formatting a parsed, fully qualified reference and parsing it again is stable.
    #[test]
    fn prop_qualified_parse_is_idempotent(
        namespace in path_component(),
        name in path_component(),
        tag in tag(),
    ) {
        let raw = format!("docker.io/{}/{}:{}", namespace, name, tag);
        let first = ImageReference::parse(&raw).unwrap();
        let second = ImageReference::parse(&first.to_string()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Any explicit third-party registry host is refused.
    #[test]
    fn prop_third_party_registry_rejected(
        host in "[a-z]{2,8}\\.(io|com|net|dev)",
        name in path_component(),
    ) {
        prop_assume!(host != "docker.io");
        let raw = format!("{}/{}", host, name);
        prop_assert!(!is_valid(&raw), "accepted foreign registry: {}", raw);
        prop_assert!(ImageReference::parse(&raw).is_err());
    }

    /// Docker Hub references are accepted with or without an explicit domain.
    #[test]
    fn prop_docker_hub_accepted(
        domain in prop_oneof![
            Just(""),
            Just("docker.io/"),
            Just("index.docker.io/"),
            Just("registry-1.docker.io/"),
        ],
        name in path_component(),
        tag in tag(),
    ) {
        let raw = format!("{}{}:{}", domain, name, tag);
        prop_assert!(is_valid(&raw), "rejected docker hub reference: {}", raw);
        let reference = ImageReference::parse(&raw).unwrap();
        prop_assert_eq!(reference.short_name(), format!("{}:{}", name, tag));
    }
}
