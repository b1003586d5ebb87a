use thiserror::Error;

/// Unified error type for sweet-release operations
#[derive(Error, Debug)]
pub enum SweetReleaseError {
    #[error("Repository not found at '{path}': {source}")]
    RepositoryNotFound {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to clone '{url}': {source}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Revision '{revision}' could not be resolved: {source}")]
    RevisionNotFound {
        revision: String,
        #[source]
        source: git2::Error,
    },

    #[error("HEAD does not point to a named branch: {0}")]
    DetachedOrUnresolvedHead(String),

    #[error("Working tree is dirty and snapshots are not allowed")]
    DirtyTreeNotAllowed,

    #[error("No version tag found: {0}")]
    NoVersionTagFound(String),

    #[error("No version source produced a version (checked version file and tags)")]
    NoVersionSource,

    #[error("History walk failed while {context}: {source}")]
    HistoryWalkFailed {
        context: String,
        #[source]
        source: git2::Error,
    },

    #[error("Invalid version file '{path}': {reason}")]
    InvalidVersionFile { path: String, reason: String },

    #[error("Version error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in sweet-release
pub type Result<T> = std::result::Result<T, SweetReleaseError>;

impl SweetReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SweetReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SweetReleaseError::Version(msg.into())
    }

    /// Wrap a git2 failure that happened while walking history
    pub fn walk(context: impl Into<String>, source: git2::Error) -> Self {
        SweetReleaseError::HistoryWalkFailed {
            context: context.into(),
            source,
        }
    }
}
