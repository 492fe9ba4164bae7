use std::fmt;

use thiserror::Error;

/// The stage of a resolution that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPhase {
    Tags,
    DefaultBranch,
    DefaultWalk,
    BranchIdentity,
    BranchWalk,
    Assembly,
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionPhase::Tags => "tag collection",
            ResolutionPhase::DefaultBranch => "default branch lookup",
            ResolutionPhase::DefaultWalk => "default branch walk",
            ResolutionPhase::BranchIdentity => "branch identification",
            ResolutionPhase::BranchWalk => "branch walk",
            ResolutionPhase::Assembly => "version assembly",
        };
        f.write_str(name)
    }
}

/// Unified error type for gitver operations
#[derive(Error, Debug)]
pub enum GitverError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Cannot determine default branch: {0}")]
    DefaultBranch(String),

    #[error("Cannot determine branch: {0}")]
    Branch(String),

    #[error("Cannot determine version in branch: {0}")]
    EmptyHistory(String),

    #[error("Branch has calculated version '{version}' whose version is less than default branch '{default}'")]
    BehindDefault { version: String, default: String },

    #[error("{phase} failed: {source}")]
    Phase {
        phase: ResolutionPhase,
        #[source]
        source: Box<GitverError>,
    },
}

/// Convenience type alias for Results in gitver
pub type Result<T> = std::result::Result<T, GitverError>;

impl GitverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitverError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitverError::Version(msg.into())
    }

    pub fn default_branch(msg: impl Into<String>) -> Self {
        GitverError::DefaultBranch(msg.into())
    }

    pub fn branch(msg: impl Into<String>) -> Self {
        GitverError::Branch(msg.into())
    }

    pub fn empty_history(msg: impl Into<String>) -> Self {
        GitverError::EmptyHistory(msg.into())
    }

    /// Wrap this error with the phase it occurred in
    pub fn in_phase(self, phase: ResolutionPhase) -> Self {
        GitverError::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any phase wrappers
    pub fn root(&self) -> &GitverError {
        match self {
            GitverError::Phase { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach a [`ResolutionPhase`] to the error side of a result
pub trait ResultExt<T> {
    fn phase(self, phase: ResolutionPhase) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn phase(self, phase: ResolutionPhase) -> Result<T> {
        self.map_err(|e| e.in_phase(phase))
    }
}
