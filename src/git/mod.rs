//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only git
//! operations the version engine needs, allowing for a real repository
//! implementation and an in-memory one for tests.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A scripted commit graph for testing
//!
//! # Usage
//!
//! Engine code depends on the [Repository] trait only.
//!
//! ```rust
//! # use gitver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitver::Result<()> {
//! let head = repo.head()?;
//! let commit = repo.commit(head.target)?;
//! println!("{} {}", commit.id, commit.message);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagKind;
use crate::error::Result;
use git2::Oid;

/// Commit metadata needed for classification and traversal
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: Oid,
    /// The full commit message
    pub message: String,
    /// Parent commits, first parent first
    pub parents: Vec<Oid>,
}

/// A tag and the commit it ultimately points at
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
    pub name: String,
    pub commit: Oid,
    pub kind: TagKind,
}

/// A reference resolved to a commit
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceInfo {
    /// Full reference name after following symbolic references
    /// (`HEAD` when HEAD is detached)
    pub name: String,
    pub target: Oid,
}

/// Read-only repository access used by the version engine
///
/// No method mutates the repository or touches the network.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying failures (like `git2::Error`) onto [crate::error::GitverError].
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation with a scripted history
pub trait Repository {
    /// List every tag, lightweight and annotated
    ///
    /// Annotated tags report the tag object's name and are peeled to the
    /// commit they eventually point at. Tags that do not lead to a commit
    /// are left out.
    fn tags(&self) -> Result<Vec<TagInfo>>;

    /// Resolve a reference by full name, following symbolic references
    ///
    /// # Arguments
    /// * `name` - Full reference name (e.g., "refs/heads/main", "refs/remotes/origin/HEAD")
    ///
    /// # Returns
    /// * `Ok(ReferenceInfo)` - The final reference name and the commit it points at
    /// * `Err` - If the reference doesn't exist or doesn't lead to a commit
    fn resolve_reference(&self, name: &str) -> Result<ReferenceInfo>;

    /// Fetch a commit's message and parents
    fn commit(&self, id: Oid) -> Result<CommitInfo>;

    /// List every direct reference that leads to a commit
    fn references(&self) -> Result<Vec<ReferenceInfo>>;

    /// The current HEAD, resolved to its branch when it is attached
    fn head(&self) -> Result<ReferenceInfo>;

    /// Configured fetch refspecs of a remote, `None` if the remote doesn't exist
    ///
    /// # Example
    /// ```rust
    /// # use gitver::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> gitver::Result<()> {
    /// if let Some(specs) = repo.remote_fetch_refspecs("origin")? {
    ///     for spec in specs {
    ///         println!("origin fetches {}", spec);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn remote_fetch_refspecs(&self, remote: &str) -> Result<Option<Vec<String>>>;
}
