use crate::domain::TagKind;
use crate::error::Result;
use crate::git::{CommitInfo, ReferenceInfo, TagInfo};
use git2::{ErrorCode, Oid, Reference, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// `None` for tags with a non-UTF-8 name or whose target is not a commit
    fn tag_info(&self, reference: &Reference<'_>) -> Result<Option<TagInfo>> {
        let Some(ref_name) = reference.name() else {
            return Ok(None);
        };
        let commit = match reference.peel_to_commit() {
            Ok(commit) => commit.id(),
            Err(e) if e.code() == ErrorCode::Peel || e.code() == ErrorCode::InvalidSpec => {
                debug!(tag = ref_name, "tag does not point at a commit, skipping");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let annotated = reference
            .target()
            .and_then(|oid| self.repo.find_tag(oid).ok());

        let info = match annotated {
            Some(tag) => TagInfo {
                name: tag.name().unwrap_or(ref_name).to_string(),
                commit,
                kind: TagKind::Annotated,
            },
            None => TagInfo {
                name: ref_name.trim_start_matches("refs/tags/").to_string(),
                commit,
                kind: TagKind::Lightweight,
            },
        };
        Ok(Some(info))
    }
}

impl super::Repository for Git2Repository {
    fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();
        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            if let Some(info) = self.tag_info(&reference)? {
                tags.push(info);
            }
        }
        Ok(tags)
    }

    fn resolve_reference(&self, name: &str) -> Result<ReferenceInfo> {
        let reference = self.repo.find_reference(name)?;
        let resolved = reference.resolve()?;
        let target = resolved.peel_to_commit()?.id();

        Ok(ReferenceInfo {
            name: resolved.name().unwrap_or(name).to_string(),
            target,
        })
    }

    fn commit(&self, id: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(id)?;

        Ok(CommitInfo {
            id,
            message: commit.message().unwrap_or_default().to_string(),
            parents: commit.parent_ids().collect(),
        })
    }

    fn references(&self) -> Result<Vec<ReferenceInfo>> {
        let mut references = Vec::new();
        for reference in self.repo.references()? {
            let reference = reference?;
            if reference.symbolic_target().is_some() {
                continue;
            }
            let (Some(name), Ok(commit)) = (reference.name(), reference.peel_to_commit()) else {
                continue;
            };
            references.push(ReferenceInfo {
                name: name.to_string(),
                target: commit.id(),
            });
        }
        Ok(references)
    }

    fn head(&self) -> Result<ReferenceInfo> {
        let head = self.repo.head()?;
        let target = head.peel_to_commit()?.id();
        let name = if self.repo.head_detached()? {
            "HEAD".to_string()
        } else {
            head.name().unwrap_or("HEAD").to_string()
        };

        Ok(ReferenceInfo { name, target })
    }

    fn remote_fetch_refspecs(&self, remote: &str) -> Result<Option<Vec<String>>> {
        let remote = match self.repo.find_remote(remote) {
            Ok(remote) => remote,
            Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::InvalidSpec => {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        let specs = remote.fetch_refspecs()?;
        Ok(Some(specs.iter().flatten().map(str::to_string).collect()))
    }
}
