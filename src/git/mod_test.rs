use super::*;
use std::fs;

const ALICE: (&str, &str) = ("Alice", "alice@test.com");
const BOB: (&str, &str) = ("Bob", "bob@test.com");

fn create_test_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    // Configure identity for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    (dir, repo)
}

fn stage(repo: &Repository, files: &[(&str, &str)]) -> git2::Oid {
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }
    index.write().unwrap();
    index.write_tree().unwrap()
}

fn make_commit_as(
    repo: &Repository,
    author: (&str, &str),
    files: &[(&str, &str)],
    message: &str,
) -> git2::Oid {
    let sig =
        git2::Signature::new(author.0, author.1, &git2::Time::new(1_700_000_000, 0)).unwrap();
    let tree = repo.find_tree(stage(repo, files)).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn make_commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> git2::Oid {
    make_commit_as(repo, ("Test", "test@test.com"), files, message)
}

fn range_from(base: git2::Oid) -> String {
    format!("{base}..HEAD")
}

#[test]
fn open_repo() {
    let (dir, _repo) = create_test_repo();
    assert!(GitRepo::open(dir.path()).is_ok());
}

#[test]
fn open_not_repo() {
    let dir = tempfile::tempdir().unwrap();
    // Plain directory without git init
    let sub = dir.path().join("not_a_repo");
    fs::create_dir_all(&sub).unwrap();
    assert!(GitRepo::open(&sub).is_err());
}

#[test]
fn range_files_and_commits() {
    let (dir, repo) = create_test_repo();
    let base = make_commit(&repo, &[("a.rs", "1\n2\n3\n")], "base");

    make_commit_as(&repo, ALICE, &[("a.rs", "1\n2\n3\n4\n5\n")], "extend a");
    make_commit_as(
        &repo,
        BOB,
        &[("b.rs", "x\ny\n"), ("a.rs", "1\n3\n4\n5\n")],
        "add b\n\nCo-authored-by: Claude <noreply@anthropic.com>",
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.range_changes(&range_from(base)).unwrap();

    let a = changes.files.iter().find(|f| f.path == "a.rs").unwrap();
    assert_eq!((a.additions, a.deletions), (2, 1));
    let b = changes.files.iter().find(|f| f.path == "b.rs").unwrap();
    assert_eq!((b.additions, b.deletions), (2, 0));

    assert_eq!(changes.commits.len(), 2);
    assert_eq!(changes.commits[0].identity(), "Alice");
    assert_eq!(changes.commits[1].identity(), "Bob");
    assert_eq!(
        changes.commits[1].author_email.as_deref(),
        Some("bob@test.com")
    );
    assert_eq!(changes.commits[1].co_authors.len(), 1);

    assert_eq!(changes.touched["a.rs"], vec![0, 1]);
    assert_eq!(changes.touched["b.rs"], vec![1]);
}

#[test]
fn range_with_nested_and_deleted_files() {
    let (dir, repo) = create_test_repo();
    let base = make_commit(
        &repo,
        &[("src/lib.rs", "a\nb\n"), ("old.txt", "1\n2\n3\n")],
        "base",
    );

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new("old.txt")).unwrap();
    index.write().unwrap();
    make_commit_as(&repo, ALICE, &[("src/lib.rs", "a\nb\nc\n")], "drop old");

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.range_changes(&range_from(base)).unwrap();

    let old = changes.files.iter().find(|f| f.path == "old.txt").unwrap();
    assert_eq!((old.additions, old.deletions), (0, 3));
    let lib = changes.files.iter().find(|f| f.path == "src/lib.rs").unwrap();
    assert_eq!((lib.additions, lib.deletions), (1, 0));
    assert_eq!(changes.touched["old.txt"], vec![0]);
}

#[test]
fn binary_files_are_skipped() {
    let (dir, repo) = create_test_repo();
    let base = make_commit(&repo, &[("a.txt", "a\n")], "base");
    make_commit_as(
        &repo,
        ALICE,
        &[("logo.bin", "\u{0}\u{1}\u{2}binary\u{0}"), ("a.txt", "a\nb\n")],
        "add logo",
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.range_changes(&range_from(base)).unwrap();

    assert_eq!(changes.files.len(), 1);
    assert_eq!(changes.files[0].path, "a.txt");
}

#[test]
fn merge_commits_are_skipped() {
    let (dir, repo) = create_test_repo();
    let base = make_commit(&repo, &[("main.txt", "m\n")], "base");
    let base_commit = repo.find_commit(base).unwrap();
    let alice = git2::Signature::new(ALICE.0, ALICE.1, &git2::Time::new(1_700_000_100, 0)).unwrap();

    // Side branch commit, not on HEAD.
    let side_tree = repo.find_tree(stage(&repo, &[("side.txt", "s\n")])).unwrap();
    let side = repo
        .commit(None, &alice, &alice, "side work", &side_tree, &[&base_commit])
        .unwrap();
    let mut index = repo.index().unwrap();
    index.remove_path(Path::new("side.txt")).unwrap();
    index.write().unwrap();

    let main = make_commit_as(&repo, BOB, &[("main.txt", "m\nn\n")], "main work");

    // Merge both lines of work.
    let merged_tree = repo.find_tree(stage(&repo, &[("side.txt", "s\n")])).unwrap();
    let main_commit = repo.find_commit(main).unwrap();
    let side_commit = repo.find_commit(side).unwrap();
    repo.commit(
        Some("HEAD"),
        &alice,
        &alice,
        "merge side",
        &merged_tree,
        &[&main_commit, &side_commit],
    )
    .unwrap();

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.range_changes(&range_from(base)).unwrap();

    assert_eq!(changes.commits.len(), 2);
    assert!(changes.commits.iter().all(|c| c.message != "merge side"));
    assert_eq!(changes.files.len(), 2);
    assert_eq!(changes.touched["side.txt"].len(), 1);
    assert_eq!(changes.touched["main.txt"].len(), 1);
}

#[test]
fn empty_range() {
    let (dir, repo) = create_test_repo();
    make_commit(&repo, &[("a.rs", "v1")], "only");

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.range_changes("HEAD..HEAD").unwrap();
    assert!(changes.files.is_empty());
    assert!(changes.commits.is_empty());
}

#[test]
fn open_ended_range_defaults_to_head() {
    let (dir, repo) = create_test_repo();
    let base = make_commit(&repo, &[("a.rs", "v1\n")], "first");
    make_commit(&repo, &[("a.rs", "v1\nv2\n")], "second");

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let changes = git_repo.range_changes(&format!("{base}..")).unwrap();
    assert_eq!(changes.commits.len(), 1);
}

#[test]
fn invalid_ranges() {
    let (dir, repo) = create_test_repo();
    make_commit(&repo, &[("a.rs", "v1")], "only");
    let git_repo = GitRepo::open(dir.path()).unwrap();

    for range in ["HEAD", "..HEAD", "HEAD...HEAD", "nope..HEAD"] {
        assert!(
            git_repo.range_changes(range).is_err(),
            "{range:?} should be rejected"
        );
    }
}

#[test]
fn default_range_needs_remote() {
    let (dir, repo) = create_test_repo();
    make_commit(&repo, &[("a.rs", "v1")], "only");
    let git_repo = GitRepo::open(dir.path()).unwrap();

    let err = git_repo.range_changes(DEFAULT_RANGE).unwrap_err();
    assert!(err.to_string().contains("origin/main"), "got: {err}");
}
