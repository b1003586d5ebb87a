//! Individual resolution steps.
//!
//! Each step is a plain function over facts already gathered from the
//! repository, so it can be exercised without one.

use crate::domain::{append_prerelease, build_metadata, cmp_precedence, parse_tolerant, Tag, TreeState};
use crate::error::{Result, SweetReleaseError};
use chrono::{DateTime, Utc};
use git2::Oid;
use semver::Version;
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, warn};

pub const SECONDS_PER_YEAR: u64 = 60 * 60 * 24 * 365;

/// Outcome of matching tags against the target commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// A version tag points at the target commit
    Exact(Version),
    /// No version tag on the target; the highest version tag elsewhere
    Latest { version: Version, commit: Oid },
    /// No tag parses as a semantic version
    NotFound,
}

/// Fail on a dirty tree unless snapshots are allowed; returns whether the
/// result is a snapshot candidate.
pub fn gate_cleanliness(state: TreeState, allow_snapshot: bool) -> Result<bool> {
    match (state, allow_snapshot) {
        (TreeState::Clean, _) => Ok(false),
        (TreeState::Dirty, true) => {
            debug!("dirty working tree, marking as snapshot");
            Ok(true)
        }
        (TreeState::Dirty, false) => Err(SweetReleaseError::DirtyTreeNotAllowed),
    }
}

/// Parse version file contents.
///
/// Absent contents are not an error. Unparseable contents are an error only
/// when the file is the required version source; otherwise they are skipped.
pub fn parse_version_file(
    path: &Path,
    contents: Option<Vec<u8>>,
    required: bool,
) -> Result<Option<Version>> {
    let Some(bytes) = contents else {
        return Ok(None);
    };

    let parsed = String::from_utf8(bytes)
        .map_err(|e| e.to_string())
        .and_then(|text| parse_tolerant(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(version) => {
            debug!(path = %path.display(), %version, "version file");
            Ok(Some(version))
        }
        Err(reason) if required => Err(SweetReleaseError::InvalidVersionFile {
            path: path.display().to_string(),
            reason,
        }),
        Err(reason) => {
            warn!(path = %path.display(), %reason, "ignoring unparseable version file");
            Ok(None)
        }
    }
}

/// Match tags against the target commit.
///
/// Tags on the target that parse as versions are an exact match (highest
/// precedence wins if there are several). Otherwise the highest-precedence
/// version tag anywhere is picked; equal precedence on different commits is
/// settled by the smallest commit hash, then the smallest tag name.
pub fn match_tags(tags: impl Iterator<Item = Tag>, target: Oid) -> TagMatch {
    let mut exact: Option<(Version, String)> = None;
    let mut latest: Option<(Version, Oid, String)> = None;

    for tag in tags {
        let Some(version) = tag.version() else {
            debug!(tag = %tag.name, "tag is not a semantic version");
            continue;
        };

        if tag.target == target {
            let better = match &exact {
                None => true,
                Some((current, name)) => match cmp_precedence(&version, current) {
                    Ordering::Greater => true,
                    Ordering::Equal => tag.name < *name,
                    Ordering::Less => false,
                },
            };
            if better {
                exact = Some((version.clone(), tag.name.clone()));
            }
        }

        let better = match &latest {
            None => true,
            Some((current, commit, name)) => match cmp_precedence(&version, current) {
                Ordering::Greater => true,
                Ordering::Equal => (tag.target, &tag.name) < (*commit, name),
                Ordering::Less => false,
            },
        };
        if better {
            latest = Some((version, tag.target, tag.name));
        }
    }

    match (exact, latest) {
        (Some((version, name)), _) => {
            debug!(tag = %name, "exact tag match");
            TagMatch::Exact(version)
        }
        (None, Some((version, commit, name))) => {
            debug!(tag = %name, %commit, "latest version tag");
            TagMatch::Latest { version, commit }
        }
        (None, None) => TagMatch::NotFound,
    }
}

/// Build ordinal: reachable commits plus `multiplier` units per year
/// elapsed between the root and target commits.
pub fn build_ordinal(
    total_commits: u64,
    root_time: DateTime<Utc>,
    target_time: DateTime<Utc>,
    time_multiplier: u64,
) -> u64 {
    let elapsed = (target_time - root_time).num_seconds().max(0) as u64;
    let time_units = elapsed.saturating_mul(time_multiplier) / SECONDS_PER_YEAR;
    total_commits.saturating_add(time_units)
}

/// Attach the pre-release channel and build metadata to the base version
pub fn finalize_version(
    base: Version,
    channel: Option<&str>,
    build_id: u64,
    snapshot_commits: Option<u64>,
) -> Result<Version> {
    let mut version = match channel {
        Some(channel) => append_prerelease(base, channel)?,
        None => base,
    };
    version.build = build_metadata(build_id, snapshot_commits)?;
    Ok(version)
}
