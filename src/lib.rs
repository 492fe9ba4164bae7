pub mod analyzer;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod observability;
pub mod resolver;
pub mod ui;

pub use error::{GitverError, Result};
pub use resolver::{current_version, prerelease_label};
