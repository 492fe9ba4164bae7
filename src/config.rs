use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::branch::full_branch_reference;
use crate::domain::Version;
use crate::error::{GitverError, Result};

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "./.gitver.toml";

/// Branch treated as the default when nothing else is configured
pub const CONVENTIONAL_DEFAULT_BRANCH: &str = "refs/heads/master";

fn default_initial_version() -> String {
    "0.0.0".to_string()
}

fn default_major_pattern() -> String {
    r"\+semver:\s?(breaking|major)".to_string()
}

fn default_minor_pattern() -> String {
    r"\+semver:\s?(feature|minor)".to_string()
}

fn default_patch_pattern() -> String {
    r"\+semver:\s?(fix|patch)".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// On-disk representation of the settings file.
///
/// Every key is optional; missing keys fall back to the built-in defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    #[serde(default = "default_major_pattern")]
    pub major_version_bump_message: String,

    #[serde(default = "default_minor_pattern")]
    pub minor_version_bump_message: String,

    #[serde(default = "default_patch_pattern")]
    pub patch_version_bump_message: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default)]
    pub conventional_commits: bool,
}

impl Default for SettingsFile {
    fn default() -> Self {
        SettingsFile {
            initial_version: default_initial_version(),
            major_version_bump_message: default_major_pattern(),
            minor_version_bump_message: default_minor_pattern(),
            patch_version_bump_message: default_patch_pattern(),
            tag_prefix: default_tag_prefix(),
            conventional_commits: false,
        }
    }
}

/// Validated repository settings used by the commit classifier.
///
/// Patterns are compiled once here; the engine only reads them.
#[derive(Debug, Clone)]
pub struct Settings {
    pub initial_version: Version,
    pub major_pattern: Regex,
    pub minor_pattern: Regex,
    pub patch_pattern: Regex,
    pub tag_prefix: String,
    pub conventional_commits: bool,
}

fn compile_pattern(key: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| GitverError::config(format!("invalid pattern for '{}': {}", key, e)))
}

impl TryFrom<SettingsFile> for Settings {
    type Error = GitverError;

    fn try_from(file: SettingsFile) -> Result<Self> {
        let initial_version = file.initial_version.parse::<Version>().map_err(|e| {
            GitverError::config(format!(
                "invalid initial-version '{}': {}",
                file.initial_version, e
            ))
        })?;

        Ok(Settings {
            initial_version,
            major_pattern: compile_pattern(
                "major-version-bump-message",
                &file.major_version_bump_message,
            )?,
            minor_pattern: compile_pattern(
                "minor-version-bump-message",
                &file.minor_version_bump_message,
            )?,
            patch_pattern: compile_pattern(
                "patch-version-bump-message",
                &file.patch_version_bump_message,
            )?,
            tag_prefix: file.tag_prefix,
            conventional_commits: file.conventional_commits,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        // The built-in patterns and version are constants known to be valid.
        Settings::try_from(SettingsFile::default()).expect("built-in settings are valid")
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(text)
            .map_err(|e| GitverError::config(format!("cannot parse settings: {}", e)))?;
        Settings::try_from(file)
    }

    /// Loads settings from file or returns defaults.
    ///
    /// An explicitly given path must exist. Without one, `./.gitver.toml`
    /// is used when present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let text = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                GitverError::config(format!(
                    "cannot open settings file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                fs::read_to_string(DEFAULT_SETTINGS_FILE)?
            }
            None => return Ok(Settings::default()),
        };

        Settings::from_toml_str(&text)
    }
}

/// Flags that determine how branches are handled when calculating versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSettings {
    pub forbid_behind_default_branch: bool,
    pub trim_branch_prefix: bool,
    /// Full reference name of the preferred default branch
    pub default_branch: String,
}

impl BranchSettings {
    pub fn new(default_branch: &str) -> Self {
        BranchSettings {
            forbid_behind_default_branch: false,
            trim_branch_prefix: false,
            default_branch: full_branch_reference(default_branch),
        }
    }
}

impl Default for BranchSettings {
    fn default() -> Self {
        BranchSettings::new(CONVENTIONAL_DEFAULT_BRANCH)
    }
}

/// CI provider signals captured once at the process boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Tag being built (`TRAVIS_TAG`)
    pub tag: Option<String>,
    /// Source branch of a pull request build (`TRAVIS_PULL_REQUEST_BRANCH`)
    pub pull_request_branch: Option<String>,
    /// Branch being built (`TRAVIS_BRANCH`)
    pub branch: Option<String>,
    /// Branch or tag being built (`CI_COMMIT_REF_NAME`)
    pub ref_name: Option<String>,
    /// Disable every override
    pub ignore: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl EnvOverrides {
    /// Read the known CI variables from the process environment
    pub fn from_env(ignore: bool) -> Self {
        let var = |name: &str| std::env::var(name).ok();
        EnvOverrides {
            tag: var("TRAVIS_TAG"),
            pull_request_branch: var("TRAVIS_PULL_REQUEST_BRANCH"),
            branch: var("TRAVIS_BRANCH"),
            ref_name: var("CI_COMMIT_REF_NAME"),
            ignore,
        }
    }

    /// Overrides that are all disabled
    pub fn ignored() -> Self {
        EnvOverrides {
            ignore: true,
            ..Default::default()
        }
    }

    /// The tag of a tagged build, if any
    pub fn tag(&self) -> Option<&str> {
        if self.ignore {
            return None;
        }
        non_empty(&self.tag)
    }

    /// First non-empty branch signal, in provider priority order
    pub fn branch_name(&self) -> Option<&str> {
        if self.ignore {
            return None;
        }
        non_empty(&self.pull_request_branch)
            .or_else(|| non_empty(&self.branch))
            .or_else(|| non_empty(&self.ref_name))
    }
}
