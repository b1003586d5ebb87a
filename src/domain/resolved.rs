use chrono::{DateTime, Utc};
use semver::Version;
use serde::Serialize;

/// The outcome of version resolution for one commit.
///
/// Produced once per run and never mutated afterwards; renderers only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    /// Short name of the branch HEAD pointed at
    pub branch: String,
    /// Full hash of the resolved commit
    pub commit: String,
    /// First 7 characters of `commit`
    pub short_commit: String,
    /// Final version including pre-release and build metadata
    pub semver: Version,
    /// Build ordinal: reachable commits plus time-scaled offset since the root commit
    pub build_id: u64,
    /// Committer date of the resolved commit
    pub commit_date: DateTime<Utc>,
    /// Whether the version carries `SNAPSHOT` build metadata
    pub snapshot: bool,
    /// Whether the branch name was attached as a pre-release identifier
    pub prerelease: bool,
}
