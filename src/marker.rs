//! Marker records extracted from structured TODO comment blocks.

use std::path::PathBuf;

/// Where a marker's opening `TODO:` line lives in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path of the file containing the marker, relative to the scan root.
    pub path: PathBuf,
    /// 1-based line number of the opening line. This is where the
    /// tracking reference gets written back.
    pub line: usize,
}

/// One parsed TODO block.
///
/// Mutable only while the parser is collecting it; once a scan finalizes
/// a marker it is never touched again until reconciliation assigns its
/// tracking reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// File and line of the opening `TODO:` directive.
    pub location: Location,
    /// Title text from the opening line.
    pub title: String,
    /// Free-text lines following the opening line, in source order.
    pub description: Vec<String>,
    /// Tags from a `Labels:` directive. Order preserved, semantically a set.
    pub labels: Vec<String>,
    /// External issue reference from an `Issue:` directive. `None` means
    /// the marker has not been tracked yet; presence is the sole
    /// "processed" signal.
    pub tracking_ref: Option<String>,
}

impl Marker {
    /// Creates an empty marker opened at the given location.
    #[must_use]
    pub fn open(path: PathBuf, line: usize, title: String) -> Self {
        Self {
            location: Location { path, line },
            title,
            description: Vec::new(),
            labels: Vec::new(),
            tracking_ref: None,
        }
    }

    /// Returns `true` once the marker carries a tracking reference.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracking_ref.is_some()
    }
}

/// Keeps only the markers that have no tracking reference yet.
///
/// Order-preserving; already-tracked markers are dropped.
#[must_use]
pub fn unprocessed(markers: Vec<Marker>) -> Vec<Marker> {
    markers.into_iter().filter(|m| !m.is_tracked()).collect()
}
