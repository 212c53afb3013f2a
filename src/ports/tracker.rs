//! Issue tracker port: the four remote operations the core consumes.

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;

/// Boxed future type alias used by [`IssueTracker`] to keep the trait
/// dyn-compatible.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// A freshly created tracking issue.
#[derive(Debug, Clone)]
pub struct CreatedIssue {
    /// Canonical browser URL of the issue. This is what gets written
    /// back into the source as the tracking reference.
    pub url: String,
    /// Numeric issue id assigned by the tracker.
    pub number: u64,
}

/// A remote file's content together with its revision identifier.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Decoded file text.
    pub text: String,
    /// Opaque revision id of this content; a conditional commit is
    /// rejected when it no longer matches.
    pub revision: String,
}

/// Merge state of a pull request, used to gate reconciliation.
#[derive(Debug, Clone)]
pub struct MergeState {
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// The branch the pull request targets.
    pub base_branch: String,
}

/// Remote issue tracker with a versioned file store.
///
/// All calls are request/response with no client-side retry; error
/// categories are carried in [`ApiError`] so callers can branch on
/// conflict versus not-found without string matching.
pub trait IssueTracker: Send + Sync {
    /// Creates a tracking issue and returns its reference.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on auth, validation, rate-limit, or
    /// transport failure.
    fn create_issue<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
        labels: &'a [String],
    ) -> TrackerFuture<'a, CreatedIssue>;

    /// Fetches a file's current content and revision at a branch or ref.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] with kind `NotFound` if the file does not
    /// exist at that ref.
    fn file_content<'a>(&'a self, path: &'a str, reference: &'a str)
        -> TrackerFuture<'a, RemoteFile>;

    /// Commits new file content, conditioned on the revision the caller
    /// last observed.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] with kind `Conflict` when
    /// `expected_revision` is stale; the commit is never retried.
    fn commit_file<'a>(
        &'a self,
        path: &'a str,
        new_text: &'a str,
        expected_revision: &'a str,
        branch: &'a str,
        message: &'a str,
    ) -> TrackerFuture<'a, ()>;

    /// Looks up a pull request's merge state.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] with kind `NotFound` for an unknown
    /// pull request number.
    fn pr_merge_state(&self, number: u64) -> TrackerFuture<'_, MergeState>;
}
