//! Live adapter for the `IssueTracker` port using the GitHub REST API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::ports::tracker::{CreatedIssue, IssueTracker, MergeState, RemoteFile, TrackerFuture};

const GITHUB_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("snag/", env!("CARGO_PKG_VERSION"));

/// Live issue tracker backed by the GitHub REST API.
pub struct GitHubTracker {
    client: Client,
    base_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GitHubTracker {
    /// Creates a tracker for `owner/repo`. Without a token, only public
    /// reads will succeed.
    #[must_use]
    pub fn new(owner: String, repo: String, token: Option<String>) -> Self {
        Self::with_base_url(GITHUB_API_URL.to_string(), owner, repo, token)
    }

    /// Creates a tracker pointed at an alternate API root (GitHub
    /// Enterprise, or a local test server).
    #[must_use]
    pub fn with_base_url(
        base_url: String,
        owner: String,
        repo: String,
        token: Option<String>,
    ) -> Self {
        Self { client: Client::new(), base_url, owner, repo, token }
    }

    fn repo_url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.base_url, self.owner, self.repo, tail)
    }

    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Request body for issue creation.
#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    labels: &'a [String],
}

/// Issue fields we read back after creation.
#[derive(Deserialize)]
struct IssueResponse {
    html_url: String,
    number: u64,
}

/// Contents-API response for a file fetch.
#[derive(Deserialize)]
struct ContentsResponse {
    /// Base64-encoded file content, wrapped with newlines by the API.
    content: String,
    sha: String,
}

/// Request body for a contents-API commit.
#[derive(Serialize)]
struct CommitRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

/// Pull request fields relevant to the merge gate.
#[derive(Deserialize)]
struct PullResponse {
    merged: bool,
    base: PullBase,
}

/// The base side of a pull request.
#[derive(Deserialize)]
struct PullBase {
    #[serde(rename = "ref")]
    ref_name: String,
}

/// Error body shape GitHub returns alongside non-2xx statuses.
#[derive(Deserialize)]
struct GitHubError {
    message: String,
}

/// Reads a response body, mapping non-success statuses onto [`ApiError`]
/// with the API's own error message when it can be recovered.
async fn read_checked(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::transport(format!("failed to read API response: {e}")))?;
    if status.is_success() {
        return Ok(text);
    }
    let message =
        serde_json::from_str::<GitHubError>(&text).map(|e| e.message).unwrap_or(text);
    Err(ApiError::from_status(status.as_u16(), message))
}

fn parse_body<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text)
        .map_err(|e| ApiError::transport(format!("failed to parse API response: {e}")))
}

impl IssueTracker for GitHubTracker {
    fn create_issue<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
        labels: &'a [String],
    ) -> TrackerFuture<'a, CreatedIssue> {
        Box::pin(async move {
            let request = CreateIssueRequest { title, body, labels };
            let response = self
                .decorate(self.client.post(self.repo_url("issues")))
                .json(&request)
                .send()
                .await
                .map_err(|e| ApiError::transport(format!("issue creation failed: {e}")))?;
            let issue: IssueResponse = parse_body(&read_checked(response).await?)?;
            Ok(CreatedIssue { url: issue.html_url, number: issue.number })
        })
    }

    fn file_content<'a>(
        &'a self,
        path: &'a str,
        reference: &'a str,
    ) -> TrackerFuture<'a, RemoteFile> {
        Box::pin(async move {
            let url = self.repo_url(&format!("contents/{path}"));
            let response = self
                .decorate(self.client.get(url).query(&[("ref", reference)]))
                .send()
                .await
                .map_err(|e| ApiError::transport(format!("content fetch failed: {e}")))?;
            let contents: ContentsResponse = parse_body(&read_checked(response).await?)?;

            // The contents API wraps the base64 payload across lines.
            let packed: String =
                contents.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = STANDARD
                .decode(packed)
                .map_err(|e| ApiError::transport(format!("invalid base64 content: {e}")))?;
            let text = String::from_utf8(bytes)
                .map_err(|e| ApiError::transport(format!("file is not valid UTF-8: {e}")))?;
            Ok(RemoteFile { text, revision: contents.sha })
        })
    }

    fn commit_file<'a>(
        &'a self,
        path: &'a str,
        new_text: &'a str,
        expected_revision: &'a str,
        branch: &'a str,
        message: &'a str,
    ) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let request = CommitRequest {
                message,
                content: STANDARD.encode(new_text),
                sha: expected_revision,
                branch,
            };
            let url = self.repo_url(&format!("contents/{path}"));
            let response = self
                .decorate(self.client.put(url))
                .json(&request)
                .send()
                .await
                .map_err(|e| ApiError::transport(format!("commit failed: {e}")))?;
            read_checked(response).await?;
            Ok(())
        })
    }

    fn pr_merge_state(&self, number: u64) -> TrackerFuture<'_, MergeState> {
        Box::pin(async move {
            let url = self.repo_url(&format!("pulls/{number}"));
            let response = self
                .decorate(self.client.get(url))
                .send()
                .await
                .map_err(|e| ApiError::transport(format!("pull request fetch failed: {e}")))?;
            let pull: PullResponse = parse_body(&read_checked(response).await?)?;
            Ok(MergeState { merged: pull.merged, base_branch: pull.base.ref_name })
        })
    }
}
