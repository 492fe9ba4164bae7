//! Version resolution engine

pub mod assembler;
pub mod branch_identity;
pub mod classifier;
pub mod default_branch;
pub mod walker;

pub use assembler::{assemble, BranchContext};
pub use branch_identity::current_branch_name;
pub use classifier::CommitClassifier;
pub use default_branch::locate_default_branch;
pub use walker::BranchWalker;
