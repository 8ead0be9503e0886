//! Error types for the API timeline

use std::path::PathBuf;

use thiserror::Error;

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// API timeline errors
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("unknown element kind `{kind}` on element `{name}`")]
    UnknownKind { kind: String, name: String },

    #[error("top-level element `{name}` of kind {kind} has no enclosing package")]
    OrphanElement { kind: String, name: String },

    #[error("cannot attach {child_kind} `{child}` to {parent_kind} `{parent}`")]
    InvalidChild {
        parent_kind: &'static str,
        parent: String,
        child_kind: &'static str,
        child: String,
    },

    #[error("failed to read snapshot document for version {version} at {}", path.display())]
    SnapshotRead {
        version: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot document for version {version}: {source}")]
    SnapshotParse {
        version: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("since resolution requires at least one version")]
    NoVersions,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
