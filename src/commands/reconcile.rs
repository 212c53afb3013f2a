//! `snag reconcile` command: the full scan, create, write-back pipeline.

use std::path::PathBuf;

use crate::adapters::live::github::GitHubTracker;
use crate::context::ServiceContext;
use crate::marker::unprocessed;
use crate::ports::tracker::IssueTracker;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::walk;

/// Settings for one reconcile invocation.
pub struct Options {
    /// Target repository as `OWNER/NAME`.
    pub repo: String,
    /// Branch the reference commits target.
    pub branch: String,
    /// Directory to scan.
    pub root: PathBuf,
    /// Path prefixes pruned from the walk.
    pub exclude: Vec<PathBuf>,
    /// When set, reconcile only if this pull request is merged to
    /// `branch`.
    pub pr: Option<u64>,
    /// Prefix prepended to every created issue title.
    pub title_prefix: Option<String>,
    /// Print planned creations and stop before any mutation.
    pub dry_run: bool,
}

/// Execute the `reconcile` command.
///
/// The GitHub token is read from `GITHUB_TOKEN` when present.
///
/// # Errors
///
/// Returns an error string on bad arguments, a failed directory walk, or
/// a failed merge-state check. Per-marker tracker failures are reported
/// in the summary instead.
pub fn run(options: &Options) -> Result<(), String> {
    let (owner, repo) = split_repo(&options.repo)?;
    let token = std::env::var("GITHUB_TOKEN").ok();
    let tracker = GitHubTracker::new(owner, repo, token);
    let ctx = ServiceContext::live();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    runtime.block_on(run_with(&ctx, &tracker, options))
}

/// Execute the pipeline against explicit collaborators.
///
/// # Errors
///
/// Returns an error string on a failed walk or merge-state check.
pub async fn run_with(
    ctx: &ServiceContext,
    tracker: &dyn IssueTracker,
    options: &Options,
) -> Result<(), String> {
    if let Some(number) = options.pr {
        let state = tracker
            .pr_merge_state(number)
            .await
            .map_err(|e| format!("failed to check PR #{number}: {e}"))?;
        if !state.merged || state.base_branch != options.branch {
            println!("PR #{number} is not merged to {}; nothing to do.", options.branch);
            return Ok(());
        }
    }

    let markers =
        walk::walk(ctx, &options.root, &options.exclude).map_err(|e| e.to_string())?;
    let found = markers.len();
    let new_markers = unprocessed(markers);
    let already_tracked = found - new_markers.len();
    let attempted = new_markers.len();

    if options.dry_run {
        println!("Dry run; would create {attempted} issues:");
        for marker in &new_markers {
            println!(
                "  {}:{}: {}",
                marker.location.path.display(),
                marker.location.line,
                marker.title
            );
        }
        return Ok(());
    }

    let reconciler = Reconciler::new(tracker, &ctx.registry, options.title_prefix.clone());
    let outcome = reconciler.create_tracking_issues(new_markers).await;
    let created = outcome.tracked.len();
    let write_backs = reconciler.write_back_references(&outcome.tracked, &options.branch).await;

    let report = ReconcileReport {
        found,
        already_tracked,
        attempted,
        created,
        skipped: outcome.skipped,
        write_backs,
    };
    print!("{}", report.render());
    Ok(())
}

/// Splits `OWNER/NAME` into its two parts.
fn split_repo(repo: &str) -> Result<(String, String), String> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(format!("invalid --repo '{repo}': expected OWNER/NAME")),
    }
}
