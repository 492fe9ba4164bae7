use std::sync::OnceLock;

use regex::Regex;

const HEADS_PREFIX: &str = "refs/heads/";

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new("[^a-zA-Z0-9]+").expect("separator regex is valid"))
}

fn work_prefix_regex() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| Regex::new("^(feature|hotfix)-").expect("prefix regex is valid"))
}

/// Turn a branch name into a string safe for a prerelease label
///
/// Every run of characters outside `[A-Za-z0-9]` becomes a single `-`.
/// With `trim_prefix`, a leading `feature-` or `hotfix-` is removed after
/// that replacement, so `feature/ABC-123` becomes `ABC-123`.
pub fn sanitize_branch_name(name: &str, trim_prefix: bool) -> String {
    let sanitized = separator_regex().replace_all(name, "-");
    if !trim_prefix {
        return sanitized.into_owned();
    }
    work_prefix_regex().replace(&sanitized, "").into_owned()
}

/// Short form of a local branch reference (`refs/heads/main` -> `main`)
pub fn short_branch_name(reference: &str) -> &str {
    reference.strip_prefix(HEADS_PREFIX).unwrap_or(reference)
}

/// Full reference for a branch given either a bare or full name
pub fn full_branch_reference(name: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("{}{}", HEADS_PREFIX, name)
    }
}

pub fn is_local_branch(reference: &str) -> bool {
    reference.starts_with(HEADS_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize_branch_name("feature/ABC-123", false), "feature-ABC-123");
    }

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize_branch_name("fix//weird__name", false), "fix-weird-name");
    }

    #[test]
    fn test_sanitize_trims_feature_prefix() {
        assert_eq!(sanitize_branch_name("feature/ABC-123", true), "ABC-123");
    }

    #[test]
    fn test_sanitize_trims_hotfix_prefix() {
        assert_eq!(sanitize_branch_name("hotfix/urgent.fix", true), "urgent-fix");
    }

    #[test]
    fn test_sanitize_keeps_other_prefixes() {
        assert_eq!(sanitize_branch_name("bugfix/thing", true), "bugfix-thing");
        assert_eq!(sanitize_branch_name("my-feature-x", true), "my-feature-x");
    }

    #[test]
    fn test_short_branch_name() {
        assert_eq!(short_branch_name("refs/heads/feature/x"), "feature/x");
        assert_eq!(short_branch_name("main"), "main");
    }

    #[test]
    fn test_full_branch_reference() {
        assert_eq!(full_branch_reference("main"), "refs/heads/main");
        assert_eq!(full_branch_reference("refs/heads/master"), "refs/heads/master");
    }
}
