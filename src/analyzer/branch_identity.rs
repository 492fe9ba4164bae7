use tracing::debug;

use crate::config::EnvOverrides;
use crate::domain::branch::{is_local_branch, sanitize_branch_name, short_branch_name};
use crate::error::{GitverError, Result};
use crate::git::{ReferenceInfo, Repository};

/// Name of the branch being versioned, sanitized for use in a label
///
/// A CI branch signal in `overrides` wins. Otherwise the checked-out branch
/// is used, and for a detached HEAD the first local branch (by name) that
/// points at the HEAD commit.
pub fn current_branch_name<R: Repository>(
    repo: &R,
    head: &ReferenceInfo,
    overrides: &EnvOverrides,
    trim_prefix: bool,
) -> Result<String> {
    if let Some(name) = overrides.branch_name() {
        debug!(branch = name, "branch taken from CI environment");
        return Ok(sanitize_branch_name(name, trim_prefix));
    }

    if is_local_branch(&head.name) {
        return Ok(sanitize_branch_name(short_branch_name(&head.name), trim_prefix));
    }

    let mut candidates: Vec<String> = repo
        .references()?
        .into_iter()
        .filter(|reference| is_local_branch(&reference.name) && reference.target == head.target)
        .map(|reference| reference.name)
        .collect();
    candidates.sort();

    let name = candidates.first().ok_or_else(|| {
        GitverError::branch(format!("no local branch points at {}", head.target))
    })?;
    debug!(branch = %name, "branch found by scanning references");
    Ok(sanitize_branch_name(short_branch_name(name), trim_prefix))
}
