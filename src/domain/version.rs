//! Semantic version helpers layered over the `semver` crate.
//!
//! Parsing here is tolerant: a leading `v`/`V`, surrounding whitespace,
//! missing minor/patch components and leading zeros in the numeric core are
//! all accepted and normalized before strict parsing.

use crate::error::{Result, SweetReleaseError};
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;

/// Build identifier marking a snapshot build
pub const SNAPSHOT: &str = "SNAPSHOT";

/// Build identifier preceding the build ordinal
pub const REVISION: &str = "rev";

/// Parse a version string tolerantly (e.g., "v1.2" -> 1.2.0, " 01.2.3 " -> 1.2.3)
pub fn parse_tolerant(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix(|c| c == 'v' || c == 'V')
        .unwrap_or(trimmed);

    let core_end = trimmed
        .find(|c| c == '-' || c == '+')
        .unwrap_or(trimmed.len());
    let (core, metadata) = trimmed.split_at(core_end);

    let mut parts: Vec<&str> = core
        .split('.')
        .map(|part| {
            let stripped = part.trim_start_matches('0');
            if stripped.is_empty() && !part.is_empty() {
                "0"
            } else {
                stripped
            }
        })
        .collect();

    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(SweetReleaseError::version(format!(
            "'{}' is not a semantic version - expected MAJOR[.MINOR[.PATCH]]",
            input
        )));
    }

    while parts.len() < 3 {
        parts.push("0");
    }

    let normalized = format!("{}{}", parts.join("."), metadata);
    Version::parse(&normalized).map_err(|e| {
        SweetReleaseError::version(format!("'{}' is not a semantic version: {}", input, e))
    })
}

/// Compare two versions by semver precedence, ignoring build metadata
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    a.cmp_precedence(b)
}

/// Append a pre-release identifier after any identifiers already present
pub fn append_prerelease(mut version: Version, identifier: &str) -> Result<Version> {
    let combined = if version.pre.is_empty() {
        identifier.to_string()
    } else {
        format!("{}.{}", version.pre.as_str(), identifier)
    };

    version.pre = Prerelease::new(&combined).map_err(|e| {
        SweetReleaseError::version(format!("Invalid pre-release '{}': {}", combined, e))
    })?;

    Ok(version)
}

/// Build metadata carrying the build ordinal and, for snapshots, the
/// number of commits since the version commit: `rev.<id>[.SNAPSHOT.<n>]`
pub fn build_metadata(build_id: u64, snapshot_commits: Option<u64>) -> Result<BuildMetadata> {
    let mut identifiers = vec![REVISION.to_string(), build_id.to_string()];
    if let Some(count) = snapshot_commits {
        identifiers.push(SNAPSHOT.to_string());
        identifiers.push(count.to_string());
    }

    let joined = identifiers.join(".");
    BuildMetadata::new(&joined).map_err(|e| {
        SweetReleaseError::version(format!("Invalid build metadata '{}': {}", joined, e))
    })
}
