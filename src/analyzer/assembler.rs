use git2::Oid;
use tracing::debug;

use crate::domain::{CommitRecord, Version};
use crate::error::{GitverError, Result};

/// Length of the commit hash embedded in prerelease labels
pub const SHORT_HASH_LEN: usize = 4;

/// Fold the bumps of newest-first `records` onto `base`, oldest first
pub fn apply_bumps(base: Version, records: &[CommitRecord]) -> Version {
    records
        .iter()
        .rev()
        .filter_map(CommitRecord::bump)
        .fold(base, |version, bump| version.bump(&bump))
}

/// Inputs describing the branch being assembled
#[derive(Debug, Clone)]
pub struct BranchContext<'a> {
    /// Sanitized branch name used in the prerelease label
    pub name: &'a str,
    /// The commit being versioned
    pub head: Oid,
    pub forbid_behind_default_branch: bool,
}

/// Combine a branch's traversal with the default branch's version
///
/// The oldest record is the traversal boundary. When it is solid its version
/// is the base and it is consumed; otherwise the default version is the base
/// and the boundary is folded along with every newer record. The prerelease
/// label always counts the records newer than the boundary.
///
/// # Errors
/// * An empty traversal
/// * A version behind the default branch when that is forbidden
pub fn assemble(
    records: &[CommitRecord],
    default_version: &Version,
    branch: &BranchContext<'_>,
) -> Result<Version> {
    let (boundary, newer) = records.split_last().ok_or_else(|| {
        GitverError::empty_history(format!("no commits to assemble for '{}'", branch.name))
    })?;

    let (base, folded) = match boundary.resolved_version() {
        Some(solid) => (solid.clone(), newer),
        None => (default_version.clone(), records),
    };

    if folded.is_empty() {
        debug!(%base, "no commits since solid boundary");
        return Ok(base);
    }

    let head = branch.head.to_string();
    let short_hash = &head[..SHORT_HASH_LEN.min(head.len())];
    let label = format!("{}-{}-{}", branch.name, newer.len(), short_hash);
    let version = apply_bumps(base, folded).with_prerelease(label);
    debug!(%version, commits = newer.len(), "assembled branch version");

    if branch.forbid_behind_default_branch && version.is_behind(default_version) {
        return Err(GitverError::BehindDefault {
            version: version.to_string(),
            default: default_version.to_string(),
        });
    }

    Ok(version)
}
