use super::*;
use std::collections::HashMap;

const FULL: &str = r#"
[github]
api_url = "https://ghe.example.com/api/v3"
token = "from-file"

[attribution]
ai_emails = ["noreply@anthropic.com"]
exclude_users = ["dependabot[bot]"]
exclude_emails = ["bot@example.com"]
exclude_files = ["**/*.lock", "dist/**"]
exclude_messages = ["[skip-attribution]"]
"#;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn parse_full_file() {
    let config = parse(FULL).unwrap();
    assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.github.token.as_deref(), Some("from-file"));
    assert_eq!(config.attribution.ai_emails, vec!["noreply@anthropic.com"]);
    assert_eq!(config.attribution.exclude_users, vec!["dependabot[bot]"]);
    assert_eq!(config.attribution.exclude_files.len(), 2);
    assert_eq!(
        config.attribution.exclude_messages,
        vec!["[skip-attribution]"]
    );
}

#[test]
fn parse_partial_file_fills_defaults() {
    let config = parse("[attribution]\nai_emails = [\"ai@x.dev\"]\n").unwrap();
    assert_eq!(config.github.api_url, DEFAULT_API_URL);
    assert_eq!(config.github.token, None);
    assert!(config.attribution.exclude_users.is_empty());

    assert_eq!(parse("").unwrap(), Config::default());
}

#[test]
fn parse_rejects_wrong_types() {
    assert!(parse("[attribution]\nai_emails = \"not-a-list\"\n").is_err());
    assert!(parse("[github\n").is_err());
}

#[test]
fn load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prlines.toml");
    fs::write(&path, FULL).unwrap();

    let config = load(Some(&path)).unwrap();
    assert_eq!(config.attribution.exclude_emails, vec!["bot@example.com"]);
}

#[test]
fn load_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let err = load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("not found"), "got: {err}");
}

#[test]
fn load_malformed_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[attribution]\nexclude_files = [1, 2]\n").unwrap();

    let err = load(Some(&path)).unwrap_err().to_string();
    assert!(err.contains("bad.toml"), "got: {err}");
}

#[test]
fn default_path_location() {
    let path = default_path();
    assert!(path.ends_with(".config/prlines/config.toml"));
}

#[test]
fn token_precedence() {
    let config = parse(FULL).unwrap();

    let env = env_from(&[("GITHUB_TOKEN", "gh-env"), ("GH_TOKEN", "gh-cli")]);
    assert_eq!(config.resolve_token_with(env).as_deref(), Some("gh-env"));

    let env = env_from(&[("GH_TOKEN", "gh-cli")]);
    assert_eq!(config.resolve_token_with(env).as_deref(), Some("gh-cli"));

    let env = env_from(&[]);
    assert_eq!(config.resolve_token_with(env).as_deref(), Some("from-file"));
}

#[test]
fn blank_tokens_are_skipped() {
    let config = Config::default();
    let env = env_from(&[("GITHUB_TOKEN", "  "), ("GH_TOKEN", "")]);
    assert_eq!(config.resolve_token_with(env), None);
}
