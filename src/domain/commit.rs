use chrono::{DateTime, TimeZone, Utc};
use git2::Oid;

/// Working tree cleanliness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Clean,
    Dirty,
}

impl TreeState {
    pub fn is_dirty(self) -> bool {
        self == TreeState::Dirty
    }
}

/// A commit reduced to what version resolution needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The commit hash
    pub oid: Oid,
    /// Committer timestamp, normalized to UTC
    pub time: DateTime<Utc>,
}

impl CommitInfo {
    pub fn new(oid: Oid, time: DateTime<Utc>) -> Self {
        CommitInfo { oid, time }
    }

    /// Build from a raw committer timestamp in seconds since the epoch
    pub fn from_seconds(oid: Oid, seconds: i64) -> Self {
        let time = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .unwrap_or_default();
        CommitInfo { oid, time }
    }

    /// Ordering used to pick one root out of disconnected histories:
    /// earlier committer time first, then the smaller hash
    pub fn precedes(&self, other: &CommitInfo) -> bool {
        (self.time, self.oid) < (other.time, other.oid)
    }

    /// Abbreviated 7-character hash
    pub fn short_hash(&self) -> String {
        let full = self.oid.to_string();
        full[..7].to_string()
    }
}

/// The earliest root commit of the reachable history, plus the size of that history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCommit {
    pub commit: CommitInfo,
    /// Number of commits reachable from any reference
    pub total_commits: u64,
}
