use std::sync::OnceLock;

use git2::Oid;
use regex::Regex;

use super::version::{Version, VersionBump};

/// How a single commit affects the version
///
/// A solid commit already carries a resolved version and never carries a
/// bump of its own; bumps belong to the commits that come after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Solid(Version),
    Bump(VersionBump),
    Unchanged,
}

/// Classification of one visited commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub commit: Oid,
    pub classification: Classification,
}

impl CommitRecord {
    pub fn new(commit: Oid, classification: Classification) -> Self {
        CommitRecord {
            commit,
            classification,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self.classification, Classification::Solid(_))
    }

    /// The tagged version, present only for solid commits
    pub fn resolved_version(&self) -> Option<&Version> {
        match &self.classification {
            Classification::Solid(version) => Some(version),
            _ => None,
        }
    }

    /// The bump carried by this commit, if any
    pub fn bump(&self) -> Option<VersionBump> {
        match self.classification {
            Classification::Bump(bump) => Some(bump),
            _ => None,
        }
    }
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^([a-z]+)(?:\(([^)]+)\))?(!)?:\s*(.*)").expect("header regex is valid")
    })
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message according to conventional commits spec
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// Returns `None` for non-conventional text.
    pub fn parse(message: &str) -> Option<Self> {
        let captures = header_regex().captures(message)?;

        let r#type = captures.get(1)?.as_str().to_string();
        let scope = captures.get(2).map(|m| m.as_str().to_string());
        let has_exclamation = captures.get(3).is_some();
        let description = captures
            .get(4)
            .map(|m| m.as_str().lines().next().unwrap_or_default().to_string())
            .unwrap_or_default();

        let is_breaking_change = has_exclamation
            || message.contains("BREAKING CHANGE:")
            || message.contains("BREAKING-CHANGE:");

        Some(ParsedCommit {
            r#type,
            scope,
            description,
            is_breaking_change,
        })
    }

    /// The version effect implied by this commit's type
    pub fn bump(&self) -> Option<VersionBump> {
        if self.is_breaking_change {
            return Some(VersionBump::Major);
        }
        match self.r#type.as_str() {
            "feat" | "feature" => Some(VersionBump::Minor),
            "fix" | "perf" => Some(VersionBump::Patch),
            _ => None,
        }
    }
}
