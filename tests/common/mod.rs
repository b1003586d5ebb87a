// Shared helpers for building throwaway repositories with fixed timestamps.
#![allow(dead_code)]

use git2::{Commit, Oid, Repository, RepositoryInitOptions, Signature, Time};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const T0: i64 = 1_600_000_000;
pub const DAY: i64 = 86_400;
pub const YEAR: i64 = 31_536_000;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Empty repository whose HEAD points at `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).expect("Could not init git repo");
        TestRepo { dir, repo }
    }

    pub fn path(&self) -> &str {
        self.dir.path().to_str().expect("temp path is UTF-8")
    }

    fn signature(seconds: i64) -> Signature<'static> {
        Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))
            .expect("Could not create signature")
    }

    fn write_tree(&self, file: &str, content: &str) -> Oid {
        fs::write(self.dir.path().join(file), content).expect("Could not write file");
        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new(file))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
        index.write_tree().expect("Could not write tree")
    }

    /// Commit `file` with `content` on top of HEAD at the given committer time
    pub fn commit(&self, file: &str, content: &str, seconds: i64) -> Oid {
        let tree_id = self.write_tree(file, content);
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let sig = Self::signature(seconds);

        let parents: Vec<Commit> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().expect("HEAD is a commit")],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&Commit> = parents.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, "commit", &tree, &parent_refs)
            .expect("Could not create commit")
    }

    /// Parentless commit on its own branch, leaving HEAD alone
    pub fn orphan_commit(&self, branch: &str, seconds: i64) -> Oid {
        let mut builder = self.repo.treebuilder(None).expect("Could not get treebuilder");
        let blob = self.repo.blob(b"orphan\n").expect("Could not write blob");
        builder
            .insert("ORPHAN", blob, 0o100644)
            .expect("Could not insert entry");
        let tree_id = builder.write().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let sig = Self::signature(seconds);

        self.repo
            .commit(
                Some(&format!("refs/heads/{}", branch)),
                &sig,
                &sig,
                "orphan",
                &tree,
                &[],
            )
            .expect("Could not create orphan commit")
    }

    pub fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("Could not find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    pub fn annotated_tag(&self, name: &str, oid: Oid, seconds: i64) {
        let object = self.repo.find_object(oid, None).expect("Could not find object");
        self.repo
            .tag(name, &object, &Self::signature(seconds), "release", false)
            .expect("Could not create annotated tag");
    }

    /// Create a branch at HEAD and switch to it
    pub fn switch_to_new_branch(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("HEAD is a commit");
        self.repo
            .branch(name, &head, false)
            .expect("Could not create branch");
        self.repo
            .set_head(&format!("refs/heads/{}", name))
            .expect("Could not switch branch");
    }

    pub fn write_file(&self, file: &str, content: &str) {
        fs::write(self.dir.path().join(file), content).expect("Could not write file");
    }
}
