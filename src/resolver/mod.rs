//! Version resolution
//!
//! Turns repository facts into a single [ResolvedVersion]:
//!
//! 1. dirty working tree: fail, or mark as snapshot
//! 2. classify the current branch as stable or pre-release
//! 3. resolve the target revision
//! 4. pick the base version from the version file and/or tags
//! 5. append the branch as a pre-release identifier on non-stable branches
//! 6. compute the build ordinal from commit count and elapsed time
//! 7. add `rev.<id>` and, for snapshots, `SNAPSHOT.<commits since version>`
//!
//! Any failure aborts the whole resolution.

pub mod steps;

pub use steps::TagMatch;

use crate::config::{Config, VersionSource};
use crate::domain::{BranchContext, CommitInfo, ResolvedVersion};
use crate::error::{Result, SweetReleaseError};
use crate::git::Repository;
use chrono::{DateTime, Utc};
use semver::Version;
use tracing::{debug, info, instrument};

/// The base version and the facts it came with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseVersion {
    pub version: Version,
    /// Committer date of the commit carrying the version, when known
    pub version_date: Option<DateTime<Utc>>,
    /// The target commit is not tagged with this version
    pub snapshot: bool,
}

/// Resolve the version of the configured revision
#[instrument(skip_all, fields(revision = %config.revision))]
pub fn resolve<R: Repository + ?Sized>(repo: &R, config: &Config) -> Result<ResolvedVersion> {
    let dirty_snapshot =
        steps::gate_cleanliness(repo.working_tree_status()?, config.allow_snapshot)?;

    let branch = BranchContext::classify(repo.current_branch()?, &config.stable_branches);
    debug!(branch = %branch.name, stable = branch.is_stable, "classified branch");

    let target = repo.resolve_commit(&config.revision)?;

    let base = resolve_base(repo, config, &target)?;
    let snapshot = dirty_snapshot || base.snapshot;

    let channel = branch.prerelease_channel()?;

    let root = repo.root_commit()?;
    let build_id = steps::build_ordinal(
        root.total_commits,
        root.commit.time,
        target.time,
        config.time_multiplier,
    );

    let snapshot_commits = if snapshot {
        let since = base.version_date.unwrap_or(root.commit.time);
        Some(repo.commit_count_since(since)?)
    } else {
        None
    };

    let semver = steps::finalize_version(base.version, channel.as_deref(), build_id, snapshot_commits)?;
    info!(%semver, build_id, snapshot, "resolved version");

    Ok(ResolvedVersion {
        branch: branch.name,
        commit: target.oid.to_string(),
        short_commit: target.short_hash(),
        semver,
        build_id,
        commit_date: target.time,
        snapshot,
        prerelease: channel.is_some(),
    })
}

/// Pick the base version according to the configured version source
pub fn resolve_base<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    target: &CommitInfo,
) -> Result<BaseVersion> {
    let source = config.version_source();

    let file_version = if source.reads_file() {
        let contents = if config.version_file_from_commit {
            repo.read_committed_file(target.oid, &config.version_file)?
        } else {
            repo.read_tracked_file(&config.version_file)?
        };
        steps::parse_version_file(&config.version_file, contents, source.file_required())?
    } else {
        None
    };

    if !source.tag_required() {
        if let Some(version) = file_version {
            return Ok(BaseVersion {
                version,
                version_date: None,
                snapshot: false,
            });
        }
        if source == VersionSource::File {
            return Err(SweetReleaseError::NoVersionSource);
        }
    }

    match steps::match_tags(repo.tags()?, target.oid) {
        TagMatch::Exact(version) => Ok(BaseVersion {
            version,
            version_date: Some(target.time),
            snapshot: false,
        }),
        TagMatch::Latest { version, commit } => {
            if source.tag_required() && !config.allow_snapshot {
                return Err(SweetReleaseError::NoVersionTagFound(format!(
                    "commit {} is not tagged with a version and snapshots are not allowed",
                    target.oid
                )));
            }
            let version_commit = repo.find_commit(commit)?;
            Ok(BaseVersion {
                version,
                version_date: Some(version_commit.time),
                snapshot: true,
            })
        }
        TagMatch::NotFound if source.tag_required() => Err(SweetReleaseError::NoVersionTagFound(
            "no tag parses as a semantic version".to_string(),
        )),
        TagMatch::NotFound => Err(SweetReleaseError::NoVersionSource),
    }
}
