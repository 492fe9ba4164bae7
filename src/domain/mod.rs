//! Domain logic - pure value types independent of git operations

pub mod branch;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::{sanitize_branch_name, short_branch_name};
pub use commit::{Classification, CommitRecord, ParsedCommit};
pub use tag::{TagKind, TagMap};
pub use version::{Version, VersionBump};
