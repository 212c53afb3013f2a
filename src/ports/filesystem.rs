//! Filesystem port for local tree traversal.

use std::path::Path;

/// Provides read-only filesystem access for the directory walker.
///
/// Abstracting the filesystem keeps the walker testable on synthetic
/// trees without depending on the real disk layout.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists the entry names in a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;
}
