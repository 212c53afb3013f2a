//! In-memory `IssueTracker` fake shared by reconciliation tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::ApiError;
use crate::ports::tracker::{CreatedIssue, IssueTracker, MergeState, RemoteFile, TrackerFuture};

/// A recorded `create_issue` call.
#[derive(Debug, Clone)]
pub(crate) struct IssueRecord {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// A recorded `commit_file` call.
#[derive(Debug, Clone)]
pub(crate) struct CommitRecord {
    pub path: String,
    pub new_text: String,
    pub expected_revision: String,
    pub branch: String,
    pub message: String,
}

/// Programmable in-memory tracker with a versioned file map.
pub(crate) struct FakeTracker {
    issues: Mutex<Vec<IssueRecord>>,
    files: Mutex<HashMap<String, RemoteFile>>,
    commits: Mutex<Vec<CommitRecord>>,
    fail_titles: HashSet<String>,
    conflict_paths: HashSet<String>,
    merge_state: Option<MergeState>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            issues: Mutex::new(Vec::new()),
            files: Mutex::new(HashMap::new()),
            commits: Mutex::new(Vec::new()),
            fail_titles: HashSet::new(),
            conflict_paths: HashSet::new(),
            merge_state: None,
        }
    }

    /// Seeds a remote file at the given revision.
    pub fn with_file(self, path: &str, text: &str, revision: &str) -> Self {
        self.files.lock().unwrap().insert(
            path.to_string(),
            RemoteFile { text: text.to_string(), revision: revision.to_string() },
        );
        self
    }

    /// Makes `create_issue` fail for this exact title.
    pub fn fail_on_title(mut self, title: &str) -> Self {
        self.fail_titles.insert(title.to_string());
        self
    }

    /// Makes every commit against this path fail with a conflict.
    pub fn conflict_on(mut self, path: &str) -> Self {
        self.conflict_paths.insert(path.to_string());
        self
    }

    /// Fixes the merge state returned for any pull request number.
    pub fn with_merge_state(mut self, merged: bool, base_branch: &str) -> Self {
        self.merge_state = Some(MergeState { merged, base_branch: base_branch.to_string() });
        self
    }

    pub fn created_issues(&self) -> Vec<IssueRecord> {
        self.issues.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<CommitRecord> {
        self.commits.lock().unwrap().clone()
    }

    /// Returns the current text of a seeded file.
    pub fn file_text(&self, path: &str) -> String {
        self.files.lock().unwrap().get(path).map(|f| f.text.clone()).unwrap_or_default()
    }
}

impl IssueTracker for FakeTracker {
    fn create_issue<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
        labels: &'a [String],
    ) -> TrackerFuture<'a, CreatedIssue> {
        let result = if self.fail_titles.contains(title) {
            Err(ApiError::from_status(422, format!("rejected title: {title}")))
        } else {
            let mut issues = self.issues.lock().unwrap();
            issues.push(IssueRecord {
                title: title.to_string(),
                body: body.to_string(),
                labels: labels.to_vec(),
            });
            let number = issues.len() as u64;
            Ok(CreatedIssue {
                url: format!("https://tracker.example/issues/{number}"),
                number,
            })
        };
        Box::pin(async move { result })
    }

    fn file_content<'a>(
        &'a self,
        path: &'a str,
        _reference: &'a str,
    ) -> TrackerFuture<'a, RemoteFile> {
        let result = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::from_status(404, format!("no file at {path}")));
        Box::pin(async move { result })
    }

    fn commit_file<'a>(
        &'a self,
        path: &'a str,
        new_text: &'a str,
        expected_revision: &'a str,
        branch: &'a str,
        message: &'a str,
    ) -> TrackerFuture<'a, ()> {
        let result = (|| {
            if self.conflict_paths.contains(path) {
                return Err(ApiError::from_status(409, format!("{path} is contended")));
            }
            let mut files = self.files.lock().unwrap();
            let Some(file) = files.get_mut(path) else {
                return Err(ApiError::from_status(404, format!("no file at {path}")));
            };
            if file.revision != expected_revision {
                return Err(ApiError::from_status(409, format!("{path} revision is stale")));
            }
            file.text = new_text.to_string();
            file.revision = format!("{expected_revision}+1");
            self.commits.lock().unwrap().push(CommitRecord {
                path: path.to_string(),
                new_text: new_text.to_string(),
                expected_revision: expected_revision.to_string(),
                branch: branch.to_string(),
                message: message.to_string(),
            });
            Ok(())
        })();
        Box::pin(async move { result })
    }

    fn pr_merge_state(&self, number: u64) -> TrackerFuture<'_, MergeState> {
        let result = self
            .merge_state
            .clone()
            .ok_or_else(|| ApiError::from_status(404, format!("no pull request {number}")));
        Box::pin(async move { result })
    }
}
