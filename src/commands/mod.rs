//! Command dispatch and handlers.

pub mod reconcile;
pub mod scan;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Scan { root, exclude } => scan::run(&root, &exclude),
        Command::Reconcile { repo, branch, root, exclude, pr, title_prefix, dry_run } => {
            reconcile::run(&reconcile::Options {
                repo,
                branch,
                root,
                exclude,
                pr,
                title_prefix,
                dry_run,
            })
        }
    }
}
