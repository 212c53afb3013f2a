//! `snag scan` command.

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::marker::Marker;
use crate::walk;

/// Execute the `scan` command.
///
/// # Errors
///
/// Returns an error string if the directory walk fails.
pub fn run(root: &Path, exclude: &[PathBuf]) -> Result<(), String> {
    let ctx = ServiceContext::live();
    run_with_context(&ctx, root, exclude)
}

/// Execute the `scan` command with an explicit context.
///
/// # Errors
///
/// Returns an error string if the directory walk fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    root: &Path,
    exclude: &[PathBuf],
) -> Result<(), String> {
    let markers = walk::walk(ctx, root, exclude).map_err(|e| e.to_string())?;

    for marker in &markers {
        println!("{}", describe(marker));
    }
    let untracked = markers.iter().filter(|m| !m.is_tracked()).count();
    println!("{} markers found, {} untracked.", markers.len(), untracked);
    Ok(())
}

/// One listing line per marker: location, title, labels, tracking state.
fn describe(marker: &Marker) -> String {
    let labels = if marker.labels.is_empty() {
        String::new()
    } else {
        format!(" [{}]", marker.labels.join(","))
    };
    let state = if marker.is_tracked() { " (tracked)" } else { "" };
    format!(
        "{}:{}: {}{labels}{state}",
        marker.location.path.display(),
        marker.location.line,
        marker.title
    )
}
