//! Reconciliation: create tracking issues for new markers and write the
//! resulting references back into remote source files.
//!
//! Both halves process markers independently and sequentially. One
//! failed issue creation or one rejected commit never stops the rest of
//! the batch; per-marker failures are collected into the report.

pub mod transaction;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::error::{ApiError, WriteBackError};
use crate::lang::LanguageRegistry;
use crate::marker::{Location, Marker};
use crate::parser::ISSUE_DIRECTIVE;
use crate::ports::tracker::IssueTracker;
use transaction::Transform;

/// Outcome of one marker's write-back.
#[derive(Debug)]
pub enum WriteBack {
    /// A reference line was inserted and committed.
    Committed {
        /// Location of the marker that was annotated.
        location: Location,
    },
    /// The target line already carries an `Issue:` directive; nothing
    /// was committed (idempotent success).
    AlreadyPresent {
        /// Location of the already-annotated marker.
        location: Location,
    },
    /// This marker's write-back failed; others still proceed.
    Failed {
        /// Location of the marker whose write-back failed.
        location: Location,
        /// What went wrong.
        error: WriteBackError,
    },
}

/// A marker whose issue creation failed; it stays untracked this run.
#[derive(Debug)]
pub struct SkippedCreation {
    /// Location of the marker that was skipped.
    pub location: Location,
    /// The tracker failure that caused the skip.
    pub error: ApiError,
}

/// Result of the issue-creation half of reconciliation.
#[derive(Debug, Default)]
pub struct CreatedIssues {
    /// Markers that now carry a tracking reference.
    pub tracked: Vec<Marker>,
    /// Markers dropped from the batch, with their failures.
    pub skipped: Vec<SkippedCreation>,
}

/// Summary of a reconciliation run.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Total markers found by the scan.
    pub found: usize,
    /// Markers that already carried a tracking reference.
    pub already_tracked: usize,
    /// Markers for which issue creation was attempted.
    pub attempted: usize,
    /// Issues successfully created.
    pub created: usize,
    /// Markers whose issue creation failed.
    pub skipped: Vec<SkippedCreation>,
    /// Per-marker write-back outcomes.
    pub write_backs: Vec<WriteBack>,
}

impl ReconcileReport {
    /// Renders the user-facing summary: counts first, then one
    /// diagnostic line per failure naming the file and line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Markers found: {} ({} already tracked)",
            self.found, self.already_tracked
        );
        let _ = writeln!(out, "Issues created: {} of {}", self.created, self.attempted);
        for skipped in &self.skipped {
            let _ = writeln!(
                out,
                "  failed {}:{}: {}",
                skipped.location.path.display(),
                skipped.location.line,
                skipped.error
            );
        }

        let committed = self
            .write_backs
            .iter()
            .filter(|w| matches!(w, WriteBack::Committed { .. }))
            .count();
        let present = self
            .write_backs
            .iter()
            .filter(|w| matches!(w, WriteBack::AlreadyPresent { .. }))
            .count();
        let _ = writeln!(
            out,
            "References written back: {committed} ({present} already present)"
        );

        for write_back in &self.write_backs {
            if let WriteBack::Failed { location, error } = write_back {
                let _ = writeln!(
                    out,
                    "  failed {}:{}: {error}",
                    location.path.display(),
                    location.line
                );
            }
        }
        out
    }
}

/// Drives marker reconciliation against an issue tracker.
pub struct Reconciler<'a> {
    tracker: &'a dyn IssueTracker,
    registry: &'a LanguageRegistry,
    title_prefix: Option<String>,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler. `title_prefix`, when set, is prepended to
    /// every synthesized issue title.
    #[must_use]
    pub fn new(
        tracker: &'a dyn IssueTracker,
        registry: &'a LanguageRegistry,
        title_prefix: Option<String>,
    ) -> Self {
        Self { tracker, registry, title_prefix }
    }

    /// Creates one tracking issue per untracked marker, sequentially.
    ///
    /// A failed creation never aborts the batch: its marker moves to the
    /// `skipped` list with the failure, so the tracked set may be
    /// smaller than the input.
    pub async fn create_tracking_issues(&self, markers: Vec<Marker>) -> CreatedIssues {
        let mut result = CreatedIssues::default();
        for mut marker in markers {
            if marker.is_tracked() {
                continue;
            }
            let title = self.issue_title(&marker);
            let body = issue_body(&marker);
            let labels = clean_labels(&marker.labels);

            match self.tracker.create_issue(&title, &body, &labels).await {
                Ok(issue) => {
                    tracing::debug!(
                        url = %issue.url,
                        file = %marker.location.path.display(),
                        line = marker.location.line,
                        "created tracking issue"
                    );
                    marker.tracking_ref = Some(issue.url);
                    result.tracked.push(marker);
                }
                Err(error) => {
                    tracing::warn!(
                        file = %marker.location.path.display(),
                        line = marker.location.line,
                        %error,
                        "skipping marker: issue creation failed"
                    );
                    result
                        .skipped
                        .push(SkippedCreation { location: marker.location.clone(), error });
                }
            }
        }
        result
    }

    /// Writes each tracked marker's reference into its source file on
    /// `branch`, one optimistic transaction per marker.
    ///
    /// Every failure is scoped to its own marker; the returned outcomes
    /// always cover the full input.
    pub async fn write_back_references(
        &self,
        markers: &[Marker],
        branch: &str,
    ) -> Vec<WriteBack> {
        let mut outcomes = Vec::new();
        for marker in markers {
            let Some(reference) = marker.tracking_ref.as_deref() else {
                continue;
            };
            let outcome = match self.write_back_one(marker, reference, branch).await {
                Ok(true) => WriteBack::Committed { location: marker.location.clone() },
                Ok(false) => WriteBack::AlreadyPresent { location: marker.location.clone() },
                Err(error) => {
                    tracing::warn!(
                        file = %marker.location.path.display(),
                        line = marker.location.line,
                        %error,
                        "write-back failed"
                    );
                    WriteBack::Failed { location: marker.location.clone(), error }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn write_back_one(
        &self,
        marker: &Marker,
        reference: &str,
        branch: &str,
    ) -> Result<bool, WriteBackError> {
        let path = marker.location.path.to_string_lossy().into_owned();
        let token = self
            .registry
            .lookup(&path)
            .and_then(|lang| lang.line_comment)
            .ok_or_else(|| WriteBackError::Unsupported { path: PathBuf::from(&path) })?;

        let message = format!("Update TODO comment with issue URL in {path}");
        let line = marker.location.line;
        transaction::update_file(self.tracker, &path, branch, &message, |text| {
            insert_reference(text, &path, line, token, reference)
        })
        .await
    }

    fn issue_title(&self, marker: &Marker) -> String {
        match &self.title_prefix {
            Some(prefix) => format!("{prefix} {}", marker.title),
            None => marker.title.clone(),
        }
    }
}

/// Builds the issue body: a preamble naming the source location, then
/// the marker's description lines.
fn issue_body(marker: &Marker) -> String {
    format!(
        "Created from TODO comment in `{}` (line {}):\n\n{}",
        marker.location.path.display(),
        marker.location.line,
        marker.description.join("\n")
    )
}

/// Deduplicates labels (order-preserving) and drops empty strings.
fn clean_labels(labels: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for label in labels {
        if !label.is_empty() && !cleaned.iter().any(|seen| seen == label) {
            cleaned.push(label.clone());
        }
    }
    cleaned
}

/// Produces the transformed file text with a reference line inserted
/// directly beneath the marker's opening line.
///
/// Keeps the file untouched when the target line already carries an
/// `Issue:` directive. Fails with `OutOfRange` when the marker's line
/// no longer exists in the fetched content.
fn insert_reference(
    text: &str,
    path: &str,
    line: usize,
    token: &str,
    reference: &str,
) -> Result<Transform, WriteBackError> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if line == 0 || line > lines.len() {
        return Err(WriteBackError::OutOfRange {
            path: PathBuf::from(path),
            line,
            line_count: lines.len(),
        });
    }
    if lines[line - 1].contains(ISSUE_DIRECTIVE) {
        return Ok(Transform::Keep);
    }
    let reference_line = format!("{token} Issue: {reference}");
    lines.insert(line, &reference_line);
    Ok(Transform::Replace(lines.join("\n")))
}
