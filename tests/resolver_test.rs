// tests/resolver_test.rs
mod common;

use common::{TestRepo, DAY, T0, YEAR};
use sweet_release::config::Config;
use sweet_release::domain::TreeState;
use sweet_release::git::{Git2Repository, Repository};
use sweet_release::{resolve, SweetReleaseError};

fn config_for(repo: &TestRepo) -> Config {
    Config {
        repo_path: repo.path().to_string(),
        ..Config::default()
    }
}

fn open(repo: &TestRepo) -> Git2Repository {
    Git2Repository::open(repo.path(), false).expect("Could not open test repo")
}

#[test]
fn test_exact_tag_on_clean_main() {
    let test = TestRepo::new();
    test.commit("README.md", "initial\n", T0);
    let head = test.commit("README.md", "release\n", T0 + YEAR);
    test.tag("v1.0.0", head);

    let resolved = resolve(&open(&test), &config_for(&test)).unwrap();

    assert_eq!(resolved.branch, "main");
    assert_eq!(resolved.commit, head.to_string());
    assert_eq!(resolved.short_commit, &head.to_string()[..7]);
    assert_eq!(resolved.build_id, 2 + 1000);
    assert_eq!(resolved.semver.to_string(), "1.0.0+rev.1002");
    assert!(!resolved.snapshot);
    assert!(!resolved.prerelease);
}

#[test]
fn test_repeated_resolution_is_stable() {
    let test = TestRepo::new();
    test.commit("README.md", "initial\n", T0);
    let head = test.commit("README.md", "release\n", T0 + 40 * DAY);
    test.annotated_tag("v2.1.0", head, T0 + 41 * DAY);

    let config = config_for(&test);
    let first = resolve(&open(&test), &config).unwrap();
    let second = resolve(&open(&test), &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.semver.major, 2);
    assert!(!first.snapshot);
}

#[test]
fn test_annotated_tag_matches_exactly() {
    let test = TestRepo::new();
    let root = test.commit("README.md", "initial\n", T0);
    test.annotated_tag("v0.3.0", root, T0 + DAY);

    let resolved = resolve(&open(&test), &config_for(&test)).unwrap();
    assert_eq!(resolved.semver.to_string(), "0.3.0+rev.1");
    assert!(!resolved.snapshot);
}

#[test]
fn test_untagged_head_uses_highest_tag_as_snapshot() {
    let test = TestRepo::new();
    let first = test.commit("README.md", "one\n", T0);
    let second = test.commit("README.md", "two\n", T0 + DAY);
    test.commit("README.md", "three\n", T0 + 2 * DAY);
    test.commit("README.md", "four\n", T0 + YEAR);
    test.tag("v1.3.0", second);
    test.tag("v1.2.0", first);

    let mut config = config_for(&test);
    config.from_tag = true;

    let resolved = resolve(&open(&test), &config).unwrap();
    assert!(resolved.snapshot);
    // second, third and fourth commits are at or after v1.3.0
    assert_eq!(resolved.semver.to_string(), "1.3.0+rev.1004.SNAPSHOT.3");
}

#[test]
fn test_tag_required_without_version_tags() {
    let test = TestRepo::new();
    let head = test.commit("README.md", "one\n", T0);
    test.tag("nightly", head);

    let mut config = config_for(&test);
    config.from_tag = true;
    config.allow_snapshot = false;

    let result = resolve(&open(&test), &config);
    assert!(
        matches!(result, Err(SweetReleaseError::NoVersionTagFound(_))),
        "got {:?}",
        result
    );
}

#[test]
fn test_dirty_tree_rejected_without_snapshots() {
    let test = TestRepo::new();
    let head = test.commit("README.md", "one\n", T0);
    test.tag("v1.0.0", head);
    test.write_file("scratch.txt", "untracked\n");

    let mut config = config_for(&test);
    config.allow_snapshot = false;

    let result = resolve(&open(&test), &config);
    assert!(matches!(result, Err(SweetReleaseError::DirtyTreeNotAllowed)));
}

#[test]
fn test_dirty_tree_produces_snapshot() {
    let test = TestRepo::new();
    let head = test.commit("README.md", "one\n", T0);
    test.tag("v1.0.0", head);
    test.write_file("README.md", "modified\n");

    let repo = open(&test);
    assert_eq!(repo.working_tree_status().unwrap(), TreeState::Dirty);

    let resolved = resolve(&repo, &config_for(&test)).unwrap();
    assert!(resolved.snapshot);
    assert_eq!(resolved.semver.to_string(), "1.0.0+rev.1.SNAPSHOT.1");
}

#[test]
fn test_feature_branch_is_prerelease() {
    let test = TestRepo::new();
    test.commit("VERSION", "2.0.0-beta\n", T0);
    test.switch_to_new_branch("feature/login");
    test.commit("README.md", "work\n", T0 + DAY);

    let resolved = resolve(&open(&test), &config_for(&test)).unwrap();
    assert_eq!(resolved.branch, "feature/login");
    assert!(resolved.prerelease);
    assert_eq!(resolved.semver.pre.as_str(), "beta.feature-login");
}

#[test]
fn test_configured_stable_branch() {
    let test = TestRepo::new();
    test.commit("VERSION", "1.1.0\n", T0);
    test.switch_to_new_branch("Trunk");

    let mut config = config_for(&test);
    config.stable_branches = vec!["trunk".to_string()];

    let resolved = resolve(&open(&test), &config).unwrap();
    assert!(!resolved.prerelease);
    assert_eq!(resolved.semver.to_string(), "1.1.0+rev.1");
}

#[test]
fn test_working_tree_version_file() {
    let test = TestRepo::new();
    test.commit("VERSION", "2.0.0-beta\n", T0);
    let head = test.commit("README.md", "docs\n", T0 + DAY);
    test.tag("v9.0.0", head);

    let resolved = resolve(&open(&test), &config_for(&test)).unwrap();
    // two commits plus one day of a year at 1000 units per year
    assert_eq!(resolved.semver.to_string(), "2.0.0-beta+rev.4");
}

#[test]
fn test_committed_version_file_ignores_working_copy() {
    let test = TestRepo::new();
    test.commit("VERSION", "1.4.0\n", T0);
    test.write_file("VERSION", "7.0.0\n");

    let mut config = config_for(&test);
    config.version_file_from_commit = true;

    let resolved = resolve(&open(&test), &config).unwrap();
    assert_eq!(resolved.semver.major, 1);
    assert_eq!(resolved.semver.minor, 4);
    // the modified working copy still makes it a snapshot
    assert!(resolved.snapshot);
}

#[test]
fn test_build_id_grows_with_later_commits() {
    let test = TestRepo::new();
    test.commit("VERSION", "1.0.0\n", T0);
    let middle = test.commit("README.md", "a\n", T0 + 100 * DAY);
    test.commit("README.md", "b\n", T0 + 300 * DAY);
    test.tag("middle", middle);

    let repo = open(&test);
    let mut config = config_for(&test);
    config.revision = "middle".to_string();
    let earlier = resolve(&repo, &config).unwrap();

    config.revision = "HEAD".to_string();
    let later = resolve(&repo, &config).unwrap();

    assert!(later.build_id > earlier.build_id);
    assert_eq!(earlier.commit, middle.to_string());
}

#[test]
fn test_unknown_revision() {
    let test = TestRepo::new();
    test.commit("VERSION", "1.0.0\n", T0);

    let mut config = config_for(&test);
    config.revision = "no-such-ref".to_string();

    match resolve(&open(&test), &config) {
        Err(SweetReleaseError::RevisionNotFound { revision, .. }) => {
            assert_eq!(revision, "no-such-ref")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_detached_head() {
    let test = TestRepo::new();
    let head = test.commit("VERSION", "1.0.0\n", T0);
    test.repo.set_head_detached(head).unwrap();

    let result = resolve(&open(&test), &config_for(&test));
    assert!(matches!(
        result,
        Err(SweetReleaseError::DetachedOrUnresolvedHead(_))
    ));
}

#[test]
fn test_not_a_repository() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = Git2Repository::open(dir.path().to_str().unwrap(), false);
    assert!(matches!(
        result,
        Err(SweetReleaseError::RepositoryNotFound { .. })
    ));
}

#[test]
fn test_root_commit_with_disconnected_history() {
    let test = TestRepo::new();
    let main_root = test.commit("README.md", "one\n", T0 + DAY);
    test.commit("README.md", "two\n", T0 + 2 * DAY);
    let orphan = test.orphan_commit("imported", T0);

    let root = open(&test).root_commit().unwrap();
    assert_eq!(root.commit.oid, orphan);
    assert_ne!(root.commit.oid, main_root);
    assert_eq!(root.total_commits, 3);
}

#[test]
fn test_commit_count_since() {
    let test = TestRepo::new();
    test.commit("README.md", "one\n", T0);
    let second = test.commit("README.md", "two\n", T0 + DAY);
    test.commit("README.md", "three\n", T0 + 2 * DAY);

    let repo = open(&test);
    let since = repo.find_commit(second).unwrap().time;
    assert_eq!(repo.commit_count_since(since).unwrap(), 2);
}

#[test]
fn test_tags_skip_non_commit_targets() {
    let test = TestRepo::new();
    let head = test.commit("README.md", "one\n", T0);
    test.tag("v1.0.0", head);
    let blob = test.repo.blob(b"not a commit").unwrap();
    test.tag("v2.0.0", blob);

    let repo = open(&test);
    let tags: Vec<_> = repo.tags().unwrap().collect();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "v1.0.0");
    assert_eq!(tags[0].target, head);
}

#[test]
fn test_missing_version_file_is_not_an_error() {
    let test = TestRepo::new();
    let head = test.commit("README.md", "one\n", T0);

    let repo = open(&test);
    assert_eq!(
        repo.read_tracked_file(std::path::Path::new("VERSION")).unwrap(),
        None
    );
    assert_eq!(
        repo.read_committed_file(head, std::path::Path::new("VERSION"))
            .unwrap(),
        None
    );
}

#[test]
fn test_clone_from_url() {
    let test = TestRepo::new();
    let head = test.commit("README.md", "one\n", T0);
    test.tag("v3.0.0", head);

    let url = format!("file://{}", test.path());
    let mut config = config_for(&test);
    config.repo_path = url.clone();
    config.clone = true;

    let repo = Git2Repository::open(&url, true).unwrap();
    let resolved = resolve(&repo, &config).unwrap();
    assert_eq!(resolved.semver.to_string(), "3.0.0+rev.1");
    assert_eq!(resolved.branch, "main");
}
