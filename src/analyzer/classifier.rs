use tracing::debug;

use crate::config::Settings;
use crate::domain::{Classification, CommitRecord, ParsedCommit, TagMap, Version, VersionBump};
use crate::error::Result;
use crate::git::CommitInfo;

/// Decides how each commit affects the version
pub struct CommitClassifier<'a> {
    tags: &'a TagMap,
    settings: &'a Settings,
}

impl<'a> CommitClassifier<'a> {
    pub fn new(tags: &'a TagMap, settings: &'a Settings) -> Self {
        CommitClassifier { tags, settings }
    }

    /// Classify one commit
    ///
    /// A tagged commit is solid and carries the tag's version. Otherwise the
    /// message is matched against the major, minor and patch patterns in
    /// that order; the first match wins.
    ///
    /// # Errors
    /// A tag on the commit that does not parse as a version.
    pub fn classify(&self, commit: &CommitInfo) -> Result<CommitRecord> {
        if let Some(tag) = self.tags.get(&commit.id) {
            let version = Version::parse_tag(tag, &self.settings.tag_prefix)?;
            debug!(commit = %commit.id, %tag, %version, "solid commit");
            return Ok(CommitRecord::new(commit.id, Classification::Solid(version)));
        }

        let classification = match self.message_bump(&commit.message) {
            Some(bump) => Classification::Bump(bump),
            None => Classification::Unchanged,
        };
        debug!(commit = %commit.id, ?classification, "classified commit");
        Ok(CommitRecord::new(commit.id, classification))
    }

    fn message_bump(&self, message: &str) -> Option<VersionBump> {
        if self.settings.major_pattern.is_match(message) {
            return Some(VersionBump::Major);
        }
        if self.settings.minor_pattern.is_match(message) {
            return Some(VersionBump::Minor);
        }
        if self.settings.patch_pattern.is_match(message) {
            return Some(VersionBump::Patch);
        }

        if self.settings.conventional_commits {
            return ParsedCommit::parse(message).and_then(|parsed| parsed.bump());
        }
        None
    }
}
