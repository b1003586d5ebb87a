use crate::domain::{CommitInfo, RootCommit, Tag, TreeState};
use crate::error::{Result, SweetReleaseError};
use chrono::{DateTime, Utc};
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Sort, StatusOptions};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info, instrument};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    // Declared after `repo` so the handle is closed before the clone is removed
    _checkout: Option<TempDir>,
}

impl Git2Repository {
    /// Open the repository rooted at `location`.
    ///
    /// When `clone` is set and `location` is a remote URL, the repository is
    /// cloned into a temporary directory that lives as long as the handle.
    pub fn open(location: &str, clone: bool) -> Result<Self> {
        if clone && is_remote_url(location) {
            return Self::clone_remote(location);
        }

        let repo = Git2Repo::open(location).map_err(|source| {
            SweetReleaseError::RepositoryNotFound {
                path: location.to_string(),
                source,
            }
        })?;
        debug!(path = location, "opened repository");

        Ok(Git2Repository {
            repo,
            _checkout: None,
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            _checkout: None,
        }
    }

    #[instrument]
    fn clone_remote(url: &str) -> Result<Self> {
        let checkout = tempfile::Builder::new()
            .prefix("sweet-release-")
            .tempdir()?;
        info!(dest = %checkout.path().display(), "cloning remote repository");

        let repo = Git2Repo::clone(url, checkout.path()).map_err(|source| {
            SweetReleaseError::Clone {
                url: url.to_string(),
                source,
            }
        })?;

        Ok(Git2Repository {
            repo,
            _checkout: Some(checkout),
        })
    }

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| SweetReleaseError::walk(format!("reading commit {}", oid), e))?;
        Ok(CommitInfo::from_seconds(oid, commit.time().seconds()))
    }
}

/// Whether a repository location is a URL (`scheme://...` or scp-like `user@host:path`)
pub fn is_remote_url(location: &str) -> bool {
    if location.contains("://") {
        return true;
    }
    Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9._-]+:")
        .map(|scp| scp.is_match(location))
        .unwrap_or(false)
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn working_tree_status(&self) -> Result<TreeState> {
        if self.repo.is_bare() {
            debug!("bare repository has no working tree");
            return Ok(TreeState::Clean);
        }

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        let state = if statuses.is_empty() {
            TreeState::Clean
        } else {
            TreeState::Dirty
        };
        debug!(?state, changed = statuses.len(), "working tree status");

        Ok(state)
    }

    #[instrument(skip(self))]
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| {
            SweetReleaseError::DetachedOrUnresolvedHead(format!("cannot resolve HEAD: {}", e))
        })?;

        if !head.is_branch() {
            return Err(SweetReleaseError::DetachedOrUnresolvedHead(
                "HEAD is detached".to_string(),
            ));
        }

        let branch = head.shorthand().ok_or_else(|| {
            SweetReleaseError::DetachedOrUnresolvedHead(
                "branch name is not valid UTF-8".to_string(),
            )
        })?;
        debug!(branch, "current branch");

        Ok(branch.to_string())
    }

    #[instrument(skip(self))]
    fn resolve_commit(&self, revision: &str) -> Result<CommitInfo> {
        let not_found = |source| SweetReleaseError::RevisionNotFound {
            revision: revision.to_string(),
            source,
        };

        let commit = self
            .repo
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(not_found)?;

        let info = CommitInfo::from_seconds(commit.id(), commit.time().seconds());
        debug!(commit = %info.oid, time = %info.time, "resolved revision");

        Ok(info)
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        self.commit_info(oid)
    }

    #[instrument(skip(self))]
    fn root_commit(&self) -> Result<RootCommit> {
        let walk_err = |e| SweetReleaseError::walk("walking the full history", e);

        let mut revwalk = self.repo.revwalk().map_err(walk_err)?;
        revwalk.set_sorting(Sort::TIME).map_err(walk_err)?;

        for reference in self.repo.references().map_err(walk_err)? {
            let reference = match reference {
                Ok(reference) => reference,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable reference");
                    continue;
                }
            };

            if !(reference.is_branch() || reference.is_remote() || reference.is_tag()) {
                continue;
            }

            match reference.peel_to_commit() {
                Ok(commit) => revwalk.push(commit.id()).map_err(walk_err)?,
                Err(e) => debug!(
                    reference = reference.name().unwrap_or("<invalid>"),
                    error = %e,
                    "reference does not point at a commit"
                ),
            }
        }

        // Detached HEAD is not covered by any branch
        if let Ok(head) = self.repo.head().and_then(|head| head.peel_to_commit()) {
            revwalk.push(head.id()).map_err(walk_err)?;
        }

        let mut total_commits = 0u64;
        let mut root: Option<CommitInfo> = None;

        for oid in revwalk {
            let oid = oid.map_err(walk_err)?;
            total_commits += 1;

            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| SweetReleaseError::walk(format!("reading commit {}", oid), e))?;
            if commit.parent_count() > 0 {
                continue;
            }

            let candidate = CommitInfo::from_seconds(oid, commit.time().seconds());
            root = match root {
                Some(current) if current.precedes(&candidate) => Some(current),
                _ => Some(candidate),
            };
        }

        let commit = root.ok_or_else(|| {
            SweetReleaseError::walk(
                "locating the root commit",
                git2::Error::from_str("no commits reachable from any reference"),
            )
        })?;
        debug!(root = %commit.oid, total_commits, "located root commit");

        Ok(RootCommit {
            commit,
            total_commits,
        })
    }

    #[instrument(skip(self))]
    fn commit_count_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let walk_err = |e| SweetReleaseError::walk("counting commits since the version commit", e);

        let mut revwalk = self.repo.revwalk().map_err(walk_err)?;
        revwalk.push_head().map_err(walk_err)?;

        let threshold = since.timestamp();
        let mut count = 0u64;
        for oid in revwalk {
            let commit = self.repo.find_commit(oid.map_err(walk_err)?).map_err(walk_err)?;
            if commit.time().seconds() >= threshold {
                count += 1;
            }
        }
        debug!(count, "commits since");

        Ok(count)
    }

    fn read_tracked_file(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let Some(workdir) = self.repo.workdir() else {
            debug!("bare repository, no working tree file to read");
            return Ok(None);
        };

        let full_path = workdir.join(path);
        match fs::read(&full_path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %full_path.display(), "version file not present");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_committed_file(&self, commit: Oid, path: &Path) -> Result<Option<Vec<u8>>> {
        let read_err = |e| SweetReleaseError::walk(format!("reading tree of {}", commit), e);

        let tree = self
            .repo
            .find_commit(commit)
            .and_then(|c| c.tree())
            .map_err(read_err)?;

        let entry = match tree.get_path(path) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!(path = %path.display(), %commit, "version file not in commit");
                return Ok(None);
            }
            Err(e) => return Err(read_err(e)),
        };

        if entry.kind() != Some(ObjectType::Blob) {
            debug!(path = %path.display(), "version file entry is not a blob");
            return Ok(None);
        }

        let blob = self.repo.find_blob(entry.id()).map_err(read_err)?;
        Ok(Some(blob.content().to_vec()))
    }

    fn tags(&self) -> Result<Box<dyn Iterator<Item = Tag> + '_>> {
        let references = self
            .repo
            .references_glob("refs/tags/*")
            .map_err(|e| SweetReleaseError::walk("listing tags", e))?;

        Ok(Box::new(references.filter_map(|reference| {
            let reference = match reference {
                Ok(reference) => reference,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable tag reference");
                    return None;
                }
            };

            let name = reference.shorthand()?.to_string();
            match reference.peel_to_commit() {
                Ok(commit) => Some(Tag::new(name, commit.id())),
                Err(e) => {
                    debug!(tag = %name, error = %e, "tag does not point at a commit");
                    None
                }
            }
        })))
    }
}
