//! Error taxonomy for scanning and reconciliation.
//!
//! Traversal failures are fatal and abort a scan. Everything else is
//! scoped to a single marker: a failed issue creation or write-back is
//! logged and reported without stopping the rest of the batch.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure while walking the source tree.
///
/// The walker has all-or-nothing semantics: any filesystem error aborts
/// the whole scan and the caller gets no partial results.
#[derive(Debug, Error)]
#[error("traversal failed at {path}: {message}")]
pub struct TraversalError {
    /// The path being visited when the failure occurred.
    pub path: PathBuf,
    /// Description of the underlying filesystem failure.
    pub message: String,
}

/// Category of a remote tracker API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Authentication or authorization was rejected (401/403).
    Auth,
    /// The requested resource does not exist (404).
    NotFound,
    /// The request was well-formed but semantically invalid (422).
    Validation,
    /// The tracker is throttling requests (429).
    RateLimited,
    /// A conditional write was rejected because the revision is stale (409).
    Conflict,
    /// Any other failure, including transport errors.
    Other,
}

/// A failed call against the remote issue tracker.
#[derive(Debug, Error)]
#[error("tracker API error ({kind:?}): {message}")]
pub struct ApiError {
    /// Coarse failure category callers can branch on.
    pub kind: ApiErrorKind,
    /// HTTP status code, when the request reached the server.
    pub status: Option<u16>,
    /// Human-readable detail, recovered from the error body when possible.
    pub message: String,
}

impl ApiError {
    /// Builds an error for a failure that never produced an HTTP status
    /// (connection refused, timeout, malformed response).
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Other, status: None, message: message.into() }
    }

    /// Builds an error from an HTTP status and response body, mapping the
    /// status onto a category.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 | 403 => ApiErrorKind::Auth,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            422 => ApiErrorKind::Validation,
            429 => ApiErrorKind::RateLimited,
            _ => ApiErrorKind::Other,
        };
        Self { kind, status: Some(status), message: message.into() }
    }
}

/// Per-marker failure while writing a tracking reference back to a
/// remote file. Never fatal to the batch.
#[derive(Debug, Error)]
pub enum WriteBackError {
    /// The source file no longer exists on the target branch.
    #[error("{path} not found on the target branch")]
    NotFound {
        /// Path of the missing file.
        path: PathBuf,
    },
    /// The file changed between fetch and commit; the conditional write
    /// was rejected. Not retried.
    #[error("{path} changed since it was fetched; write-back aborted")]
    Conflict {
        /// Path of the contended file.
        path: PathBuf,
    },
    /// The marker's recorded line no longer exists in the fetched file.
    #[error("line {line} is out of range for {path} ({line_count} lines)")]
    OutOfRange {
        /// Path of the edited file.
        path: PathBuf,
        /// The marker's 1-based line number.
        line: usize,
        /// Line count of the file as fetched.
        line_count: usize,
    },
    /// The file's language has no line-comment token, so no reference
    /// line can be synthesized.
    #[error("{path} has no line-comment syntax; cannot write a reference")]
    Unsupported {
        /// Path of the file.
        path: PathBuf,
    },
    /// Any other tracker failure during fetch or commit.
    #[error(transparent)]
    Api(#[from] ApiError),
}
