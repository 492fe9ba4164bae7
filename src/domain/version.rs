use crate::error::{GitverError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation with an optional prerelease label
///
/// Ordering is lexicographic over `(major, minor, patch)`. The prerelease
/// label only breaks ties: a version without a label sorts above one with a
/// label, and two labels compare as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl Version {
    /// Create a new version without a prerelease label
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parse a version from a tag name (e.g., "v1.2.3" -> Version(1,2,3))
    ///
    /// `prefix` is removed first when present; a leading `v` or `V` is
    /// tolerated either way. Build metadata is discarded, a prerelease
    /// suffix is kept as the label.
    pub fn parse_tag(tag: &str, prefix: &str) -> Result<Self> {
        let without_prefix = if prefix.is_empty() {
            tag
        } else {
            tag.strip_prefix(prefix).unwrap_or(tag)
        };
        let clean = without_prefix
            .strip_prefix(['v', 'V'])
            .unwrap_or(without_prefix);

        let parsed = semver::Version::parse(clean).map_err(|e| {
            GitverError::version(format!("Invalid version in tag '{}': {}", tag, e))
        })?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(parsed.pre.to_string())
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
        })
    }

    /// Numeric part of the version, ignoring any prerelease label
    pub fn numeric(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Whether this version's numeric part orders strictly below `other`'s
    pub fn is_behind(&self, other: &Version) -> bool {
        self.numeric() < other.numeric()
    }

    /// Bump version according to bump type
    ///
    /// Lower components are reset and any prerelease label is dropped:
    /// 1.4.3 bumped by minor is 1.5.0.
    pub fn bump(&self, bump_type: &VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version::new(self.major + 1, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor + 1, 0),
            VersionBump::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// Copy of this version carrying `label` as its prerelease
    pub fn with_prerelease(&self, label: impl Into<String>) -> Self {
        Version {
            prerelease: Some(label.into()),
            ..self.clone()
        }
    }
}

impl FromStr for Version {
    type Err = GitverError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse_tag(s.trim(), "")
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric()
            .cmp(&other.numeric())
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}
