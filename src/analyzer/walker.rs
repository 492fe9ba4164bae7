use std::collections::HashSet;

use git2::Oid;
use tracing::{debug, trace};

use super::assembler::apply_bumps;
use super::classifier::CommitClassifier;
use crate::domain::{CommitRecord, Version};
use crate::error::{GitverError, Result};
use crate::git::Repository;

/// Walks first-parent ancestry and classifies each commit
pub struct BranchWalker<'a, R: Repository> {
    repo: &'a R,
    classifier: CommitClassifier<'a>,
}

impl<'a, R: Repository> BranchWalker<'a, R> {
    pub fn new(repo: &'a R, classifier: CommitClassifier<'a>) -> Self {
        BranchWalker { repo, classifier }
    }

    /// Classify commits from `start` back along first parents
    ///
    /// The walk stops after the first solid commit, after `stop_at`, or when
    /// the root commit is reached. The returned records are newest-first and
    /// include the commit the walk stopped at.
    ///
    /// # Errors
    /// * Repository access failures
    /// * An unparseable tag on a visited commit
    /// * A commit visited twice
    pub fn walk(&self, start: Oid, stop_at: Option<Oid>) -> Result<Vec<CommitRecord>> {
        let mut records = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(start);

        while let Some(id) = next {
            if !visited.insert(id) {
                return Err(GitverError::empty_history(format!(
                    "commit {} reached twice while walking from {}",
                    id, start
                )));
            }

            let commit = self.repo.commit(id)?;
            let record = self.classifier.classify(&commit)?;
            let stop = record.is_solid() || Some(id) == stop_at;
            trace!(commit = %id, stop, "visited commit");
            records.push(record);

            if stop {
                break;
            }
            next = commit.parents.first().copied();
        }

        if records.is_empty() {
            return Err(GitverError::empty_history(format!(
                "no commits found from {}",
                start
            )));
        }

        debug!(%start, commits = records.len(), "walked ancestry");
        Ok(records)
    }

    /// Walk from `start` to the nearest solid commit and resolve a version
    ///
    /// Without any solid commit in the ancestry, every visited commit is
    /// folded onto `initial`.
    pub fn resolve(&self, start: Oid, initial: &Version) -> Result<Version> {
        let records = self.walk(start, None)?;
        Ok(resolve_records(&records, initial))
    }
}

/// Reduce a newest-first traversal to a single version
pub fn resolve_records(records: &[CommitRecord], initial: &Version) -> Version {
    match records.split_last() {
        Some((last, rest)) if last.is_solid() => {
            let base = last.resolved_version().cloned().unwrap_or_else(|| initial.clone());
            apply_bumps(base, rest)
        }
        _ => apply_bumps(initial.clone(), records),
    }
}
