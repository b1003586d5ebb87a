//! Repository inspection layer
//!
//! This module isolates version resolution from the storage engine. The
//! [Repository] trait lists the facts the resolver asks for; it is
//! implemented by:
//!
//! - [repository::Git2Repository]: a real repository opened through the `git2` crate
//! - [mock::MockRepository]: synthetic history for tests
//!
//! # Usage
//!
//! ```rust,no_run
//! # use sweet_release::git::{Git2Repository, Repository};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Git2Repository::open(".", false)?;
//! let head = repo.resolve_commit("HEAD")?;
//! let root = repo.root_commit()?;
//! println!("{} commits since {}", root.total_commits, root.commit.oid);
//! # let _ = head;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitInfo, RootCommit, Tag, TreeState};
use crate::error::Result;
use chrono::{DateTime, Utc};
use git2::Oid;
use std::path::Path;

/// Read-only queries version resolution needs from a repository
///
/// ## Error Handling
///
/// Every failure is returned to the caller as-is, except the conditions the
/// resolver is built to tolerate: an absent file is `Ok(None)`, and a tag
/// that cannot be read is left out of [Repository::tags].
pub trait Repository {
    /// Clean or dirty working tree, counting untracked files as dirty
    fn working_tree_status(&self) -> Result<TreeState>;

    /// Short name of the branch HEAD points to
    ///
    /// # Returns
    /// * `Ok(String)` - e.g. "main" or "feature/login"
    /// * `Err(DetachedOrUnresolvedHead)` - HEAD is detached or unborn
    fn current_branch(&self) -> Result<String>;

    /// Resolve a revision expression (e.g. "HEAD", "v1.2.0~2", a hash) to a commit
    fn resolve_commit(&self, revision: &str) -> Result<CommitInfo>;

    /// Look up a commit by hash
    fn find_commit(&self, oid: Oid) -> Result<CommitInfo>;

    /// Walk every commit reachable from any branch, remote or tag reference
    /// and return the earliest parentless commit with the walk's commit count.
    ///
    /// With several roots the earliest committer time wins; equal times
    /// fall back to the smallest hash.
    fn root_commit(&self) -> Result<RootCommit>;

    /// Count commits reachable from HEAD committed at or after `since`
    fn commit_count_since(&self, since: DateTime<Utc>) -> Result<u64>;

    /// Read a file from the working tree, relative to the repository root
    fn read_tracked_file(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Read a file from the tree of a commit
    fn read_committed_file(&self, commit: Oid, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Lazily enumerate tags with the commits they point at
    fn tags(&self) -> Result<Box<dyn Iterator<Item = Tag> + '_>>;
}
