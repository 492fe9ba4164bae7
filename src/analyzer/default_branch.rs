use tracing::{debug, info};

use crate::config::CONVENTIONAL_DEFAULT_BRANCH;
use crate::error::{GitverError, Result};
use crate::git::{ReferenceInfo, Repository};

const ORIGIN: &str = "origin";
const ORIGIN_HEAD: &str = "refs/remotes/origin/HEAD";

/// A fetch refspec such as `+refs/heads/*:refs/remotes/origin/*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRefspec {
    pub src: String,
    pub dst: String,
}

impl FetchRefspec {
    /// The leading `+` (forced update) is irrelevant for name mapping
    pub fn parse(spec: &str) -> Option<Self> {
        let body = spec.strip_prefix('+').unwrap_or(spec);
        let (src, dst) = body.split_once(':')?;
        Some(FetchRefspec {
            src: src.to_string(),
            dst: dst.to_string(),
        })
    }

    /// Map a destination-side name back to the source-side name
    ///
    /// `refs/remotes/origin/main` maps to `refs/heads/main` for the default
    /// fetch refspec. Returns `None` when `name` doesn't match `dst`.
    pub fn reverse(&self, name: &str) -> Option<String> {
        match (self.dst.split_once('*'), self.src.split_once('*')) {
            (Some((dst_pre, dst_post)), Some((src_pre, src_post))) => {
                let middle = name.strip_prefix(dst_pre)?.strip_suffix(dst_post)?;
                Some(format!("{}{}{}", src_pre, middle, src_post))
            }
            (None, None) if self.dst == name => Some(self.src.clone()),
            _ => None,
        }
    }
}

fn try_resolve<R: Repository>(repo: &R, name: &str) -> Option<ReferenceInfo> {
    debug!(reference = name, "attempting to resolve");
    match repo.resolve_reference(name) {
        Ok(reference) => Some(reference),
        Err(e) => {
            debug!(reference = name, error = %e, "could not resolve");
            None
        }
    }
}

fn from_origin_head<R: Repository>(repo: &R) -> Option<ReferenceInfo> {
    let refspecs = match repo.remote_fetch_refspecs(ORIGIN) {
        Ok(Some(refspecs)) => refspecs,
        Ok(None) => {
            debug!("no remote named origin");
            return None;
        }
        Err(e) => {
            debug!(error = %e, "cannot read origin configuration");
            return None;
        }
    };

    let origin_head = try_resolve(repo, ORIGIN_HEAD)?;
    refspecs
        .iter()
        .filter_map(|spec| FetchRefspec::parse(spec))
        .filter_map(|spec| spec.reverse(&origin_head.name))
        .find_map(|local| try_resolve(repo, &local))
}

/// Find the reference to treat as the default branch
///
/// Tries, in order: `preferred`, the conventional default branch, and the
/// local branch that `origin/HEAD` maps to through origin's fetch refspecs.
///
/// # Errors
/// Every candidate failed to resolve.
pub fn locate_default_branch<R: Repository>(repo: &R, preferred: &str) -> Result<ReferenceInfo> {
    let found = try_resolve(repo, preferred)
        .or_else(|| {
            if preferred != CONVENTIONAL_DEFAULT_BRANCH {
                try_resolve(repo, CONVENTIONAL_DEFAULT_BRANCH)
            } else {
                None
            }
        })
        .or_else(|| from_origin_head(repo));

    match found {
        Some(reference) => {
            info!(branch = %reference.name, commit = %reference.target, "resolved default branch");
            Ok(reference)
        }
        None => Err(GitverError::default_branch(format!(
            "'{}' does not exist and no fallback could be resolved",
            preferred
        ))),
    }
}
