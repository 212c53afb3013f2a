//! Recursive directory walker feeding files to the marker parser.

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::error::TraversalError;
use crate::marker::Marker;
use crate::parser;

/// Walks the tree under `root` and parses every file whose extension the
/// registry recognizes.
///
/// Directories whose path starts with any prefix in `exclude` are pruned
/// entirely. Unrecognized files are skipped silently.
///
/// # Errors
///
/// Returns a [`TraversalError`] on the first filesystem failure; the
/// walk is all-or-nothing and never yields partial results.
pub fn walk(
    ctx: &ServiceContext,
    root: &Path,
    exclude: &[PathBuf],
) -> Result<Vec<Marker>, TraversalError> {
    let mut markers = Vec::new();
    if is_excluded(root, exclude) {
        return Ok(markers);
    }
    visit(ctx, root, exclude, &mut markers)?;
    Ok(markers)
}

fn visit(
    ctx: &ServiceContext,
    dir: &Path,
    exclude: &[PathBuf],
    out: &mut Vec<Marker>,
) -> Result<(), TraversalError> {
    let entries = ctx.fs.list_dir(dir).map_err(|e| TraversalError {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    for name in entries {
        let path = child_path(dir, &name);
        if ctx.fs.is_dir(&path) {
            if is_excluded(&path, exclude) {
                continue;
            }
            visit(ctx, &path, exclude, out)?;
        } else {
            let Some(language) = ctx.registry.lookup(&path.to_string_lossy()) else {
                continue;
            };
            let text = ctx.fs.read_to_string(&path).map_err(|e| TraversalError {
                path: path.clone(),
                message: e.to_string(),
            })?;
            out.extend(parser::parse(&path, &text, language));
        }
    }
    Ok(())
}

/// Joins a directory entry onto its parent, keeping paths clean when the
/// walk starts at `.` so that recorded locations are repo-relative.
fn child_path(dir: &Path, name: &str) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

fn is_excluded(path: &Path, exclude: &[PathBuf]) -> bool {
    exclude.iter().any(|prefix| path.starts_with(prefix))
}
