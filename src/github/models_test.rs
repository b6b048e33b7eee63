use super::*;

const COMMIT_JSON: &str = r#"{
  "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
  "commit": {
    "author": { "name": "Monalisa Octocat", "email": "mona@github.com", "date": "2024-04-14T16:00:49Z" },
    "message": "Fix all the bugs\n\nCo-authored-by: Claude <noreply@anthropic.com>"
  },
  "author": { "login": "octocat", "id": 1 },
  "committer": { "login": "web-flow", "id": 19864447 }
}"#;

#[test]
fn commit_with_linked_account() {
    let api: ApiCommit = serde_json::from_str(COMMIT_JSON).unwrap();
    assert_eq!(api.sha, "6dcb09b5b57875f334f61aebed695e2e4193db5e");

    let record = CommitRecord::from(api);
    assert_eq!(record.identity(), "octocat");
    assert_eq!(record.author_name.as_deref(), Some("Monalisa Octocat"));
    assert_eq!(record.author_email.as_deref(), Some("mona@github.com"));
    assert_eq!(record.co_authors.len(), 1);
    assert_eq!(
        record.co_authors[0].email.as_deref(),
        Some("noreply@anthropic.com")
    );
}

#[test]
fn commit_without_linked_account_uses_name() {
    let json = r#"{
      "sha": "abc",
      "commit": { "author": { "name": "Local Dev", "email": "dev@laptop" }, "message": "wip" },
      "author": null
    }"#;
    let record = CommitRecord::from(serde_json::from_str::<ApiCommit>(json).unwrap());
    assert_eq!(record.identity(), "Local Dev");
    assert!(record.co_authors.is_empty());
}

#[test]
fn commit_without_any_author_is_unknown() {
    let json = r#"{ "sha": "abc", "commit": { "author": null, "message": "" }, "author": null }"#;
    let record = CommitRecord::from(serde_json::from_str::<ApiCommit>(json).unwrap());
    assert_eq!(record.identity(), crate::attribution::UNKNOWN_IDENTITY);
    assert_eq!(record.author_email, None);
}

#[test]
fn file_conversion() {
    let json = r#"[
      { "sha": "1", "filename": "src/lib.rs", "status": "modified", "additions": 10, "deletions": 2, "changes": 12 },
      { "sha": "2", "filename": "old.txt", "status": "removed", "additions": 0, "deletions": 40, "changes": 40 },
      { "sha": "3", "filename": "logo.png", "status": "added" }
    ]"#;
    let files: Vec<ApiFile> = serde_json::from_str(json).unwrap();
    let changes: Vec<FileChange> = files.into_iter().map(FileChange::from).collect();
    assert_eq!(changes[0], FileChange::new("src/lib.rs", 10, 2));
    assert_eq!(changes[1], FileChange::new("old.txt", 0, 40));
    assert_eq!(changes[2], FileChange::new("logo.png", 0, 0));
}

#[test]
fn pull_request_conversion() {
    let json = r#"{
      "number": 1347,
      "title": "Amazing new feature",
      "html_url": "https://github.com/octocat/Hello-World/pull/1347",
      "merged_at": "2024-01-26T19:01:12Z",
      "state": "closed"
    }"#;
    let pr = PullRequest::from(serde_json::from_str::<ApiPullRequest>(json).unwrap());
    assert_eq!(pr.number, 1347);
    assert_eq!(pr.title, "Amazing new feature");
    assert!(pr.merged_at.is_some());
}

#[test]
fn open_pull_request_has_no_merge_time() {
    let json = r#"{ "number": 7, "title": "draft", "html_url": "u", "merged_at": null }"#;
    let pr = PullRequest::from(serde_json::from_str::<ApiPullRequest>(json).unwrap());
    assert_eq!(pr.merged_at, None);
}

#[test]
fn search_response() {
    let json = r#"{ "total_count": 2, "incomplete_results": false,
                    "items": [ { "number": 5, "title": "a" }, { "number": 9, "title": "b" } ] }"#;
    let resp: SearchResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.total_count, 2);
    let numbers: Vec<u64> = resp.items.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![5, 9]);
}
