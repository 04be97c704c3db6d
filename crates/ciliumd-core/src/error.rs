//! Shared error type across ciliumd crates.

use thiserror::Error;

/// API-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Path does not start with the namespace prefix.
    InvalidPrefix,
    /// A path segment does not exist in the tree.
    MissingChild,
    /// Node name conflicts with the path it is added at.
    NameMismatch,
    /// Label identifier space exhausted.
    CapacityExceeded,
    /// No label set registered under an identifier.
    UnknownLabelsId,
    /// Invalid input / malformed document.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in API responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidPrefix => "INVALID_PREFIX",
            ErrorCode::MissingChild => "MISSING_CHILD",
            ErrorCode::NameMismatch => "NAME_MISMATCH",
            ErrorCode::CapacityExceeded => "CAPACITY_EXCEEDED",
            ErrorCode::UnknownLabelsId => "UNKNOWN_LABELS_ID",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CiliumError>;

/// Unified error type used by core and daemon.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CiliumError {
    #[error("invalid path {path}: must start with {prefix}")]
    InvalidPrefix { path: String, prefix: String },
    #[error("unable to find child {segment} of node {node} in path {path}")]
    MissingChild {
        segment: String,
        node: String,
        path: String,
    },
    #[error("node name {name} does not match path segment {segment}")]
    NameMismatch { name: String, segment: String },
    #[error("reached maximum set of labels available ({max})")]
    CapacityExceeded { max: u32 },
    #[error("no labels registered for id {0}")]
    UnknownLabelsId(u32),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl CiliumError {
    /// Map internal error to a stable API-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CiliumError::InvalidPrefix { .. } => ErrorCode::InvalidPrefix,
            CiliumError::MissingChild { .. } => ErrorCode::MissingChild,
            CiliumError::NameMismatch { .. } => ErrorCode::NameMismatch,
            CiliumError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            CiliumError::UnknownLabelsId(_) => ErrorCode::UnknownLabelsId,
            CiliumError::BadRequest(_) => ErrorCode::BadRequest,
            CiliumError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            CiliumError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the label identifier space is exhausted.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, CiliumError::CapacityExceeded { .. })
    }
}
