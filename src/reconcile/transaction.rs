//! Optimistic read-transform-conditional-write against the remote store.

use crate::error::{ApiErrorKind, WriteBackError};
use crate::ports::tracker::IssueTracker;

/// Outcome of a transform callback: new content to commit, or nothing.
pub enum Transform {
    /// Commit this full replacement text.
    Replace(String),
    /// The file already has the desired shape; commit nothing.
    Keep,
}

/// Fetches a file at `branch`, applies `transform` to its text, and
/// commits the replacement conditioned on the fetched revision.
///
/// Returns `true` if a commit happened, `false` if the transform kept
/// the file as-is.
///
/// # Errors
///
/// `NotFound` if the file does not exist at `branch`, `Conflict` if the
/// file changed between fetch and commit (never retried), any transform
/// error verbatim, and `Api` for other tracker failures.
pub async fn update_file(
    tracker: &dyn IssueTracker,
    path: &str,
    branch: &str,
    message: &str,
    transform: impl FnOnce(&str) -> Result<Transform, WriteBackError>,
) -> Result<bool, WriteBackError> {
    let file = tracker.file_content(path, branch).await.map_err(|e| {
        if e.kind == ApiErrorKind::NotFound {
            WriteBackError::NotFound { path: path.into() }
        } else {
            WriteBackError::Api(e)
        }
    })?;

    match transform(&file.text)? {
        Transform::Keep => Ok(false),
        Transform::Replace(new_text) => {
            tracker
                .commit_file(path, &new_text, &file.revision, branch, message)
                .await
                .map_err(|e| {
                    if e.kind == ApiErrorKind::Conflict {
                        WriteBackError::Conflict { path: path.into() }
                    } else {
                        WriteBackError::Api(e)
                    }
                })?;
            Ok(true)
        }
    }
}
