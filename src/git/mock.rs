use crate::domain::{CommitInfo, RootCommit, Tag, TreeState};
use crate::error::{Result, SweetReleaseError};
use crate::git::Repository;
use chrono::{DateTime, Utc};
use git2::Oid;
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations.
///
/// History is linear: every added commit is reachable from HEAD, the first
/// one added is the root.
pub struct MockRepository {
    tree_state: TreeState,
    branch: Option<String>,
    commits: Vec<CommitInfo>,
    revisions: HashMap<String, Oid>,
    working_files: HashMap<PathBuf, Vec<u8>>,
    committed_files: HashMap<(Oid, PathBuf), Vec<u8>>,
    tags: Vec<Tag>,
    tag_queries: Cell<usize>,
}

impl MockRepository {
    /// Create a new empty mock repository on a clean `main` branch
    pub fn new() -> Self {
        MockRepository {
            tree_state: TreeState::Clean,
            branch: Some("main".to_string()),
            commits: Vec::new(),
            revisions: HashMap::new(),
            working_files: HashMap::new(),
            committed_files: HashMap::new(),
            tags: Vec::new(),
            tag_queries: Cell::new(0),
        }
    }

    /// Append a commit; the latest one becomes HEAD
    pub fn add_commit(&mut self, oid: Oid, seconds: i64) {
        self.commits.push(CommitInfo::from_seconds(oid, seconds));
        self.revisions.insert("HEAD".to_string(), oid);
    }

    /// Point a revision expression at a commit
    pub fn set_revision(&mut self, revision: impl Into<String>, oid: Oid) {
        self.revisions.insert(revision.into(), oid);
    }

    /// Set the checked-out branch, `None` for a detached HEAD
    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = branch.map(str::to_string);
    }

    pub fn set_tree_state(&mut self, state: TreeState) {
        self.tree_state = state;
    }

    /// Add a file to the working tree
    pub fn add_working_file(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.working_files.insert(path.into(), content.into());
    }

    /// Add a file to a commit's tree
    pub fn add_committed_file(
        &mut self,
        commit: Oid,
        path: impl Into<PathBuf>,
        content: impl Into<Vec<u8>>,
    ) {
        self.committed_files
            .insert((commit, path.into()), content.into());
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.push(Tag::new(name, oid));
    }

    /// How many times tags were enumerated
    pub fn tag_queries(&self) -> usize {
        self.tag_queries.get()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn working_tree_status(&self) -> Result<TreeState> {
        Ok(self.tree_state)
    }

    fn current_branch(&self) -> Result<String> {
        self.branch.clone().ok_or_else(|| {
            SweetReleaseError::DetachedOrUnresolvedHead("HEAD is detached".to_string())
        })
    }

    fn resolve_commit(&self, revision: &str) -> Result<CommitInfo> {
        let oid = self.revisions.get(revision).copied().ok_or_else(|| {
            SweetReleaseError::RevisionNotFound {
                revision: revision.to_string(),
                source: git2::Error::from_str("revision not found"),
            }
        })?;
        self.find_commit(oid)
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        self.commits
            .iter()
            .find(|c| c.oid == oid)
            .cloned()
            .ok_or_else(|| {
                SweetReleaseError::walk(
                    format!("reading commit {}", oid),
                    git2::Error::from_str("object not found"),
                )
            })
    }

    fn root_commit(&self) -> Result<RootCommit> {
        let commit = self.commits.first().cloned().ok_or_else(|| {
            SweetReleaseError::walk(
                "locating the root commit",
                git2::Error::from_str("no commits reachable from any reference"),
            )
        })?;

        Ok(RootCommit {
            commit,
            total_commits: self.commits.len() as u64,
        })
    }

    fn commit_count_since(&self, since: DateTime<Utc>) -> Result<u64> {
        Ok(self.commits.iter().filter(|c| c.time >= since).count() as u64)
    }

    fn read_tracked_file(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        Ok(self.working_files.get(path).cloned())
    }

    fn read_committed_file(&self, commit: Oid, path: &Path) -> Result<Option<Vec<u8>>> {
        Ok(self
            .committed_files
            .get(&(commit, path.to_path_buf()))
            .cloned())
    }

    fn tags(&self) -> Result<Box<dyn Iterator<Item = Tag> + '_>> {
        self.tag_queries.set(self.tag_queries.get() + 1);
        Ok(Box::new(self.tags.iter().cloned()))
    }
}
