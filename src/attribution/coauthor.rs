use std::sync::LazyLock;

use regex::Regex;

use super::CoAuthor;

/// `Co-authored-by: Display Name <email>` on a line of its own.
static TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*co-authored-by:\s*(?P<name>[^<>]*?)\s*<(?P<email>[^<>\s]+)>\s*$")
        .expect("co-author trailer pattern is valid")
});

/// Extract co-author trailers from a commit message, in message order.
///
/// Both a display name and an email are required; anything else on a
/// line means the line is ignored.
pub fn extract(message: &str) -> Vec<CoAuthor> {
    message
        .lines()
        .filter_map(|line| TRAILER.captures(line))
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str().trim();
            let email = caps.name("email")?.as_str().trim();
            if name.is_empty() || email.is_empty() {
                return None;
            }
            Some(CoAuthor {
                name: Some(name.to_string()),
                email: Some(email.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "coauthor_test.rs"]
mod tests;
