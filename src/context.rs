//! Service context bundling the ambient collaborators for a local scan.

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::lang::LanguageRegistry;
use crate::ports::filesystem::FileSystem;

/// Bundles the filesystem port and the language registry.
///
/// The issue tracker is deliberately not part of the context: it needs
/// per-invocation repository and token configuration, so commands build
/// it themselves and pass it explicitly.
pub struct ServiceContext {
    /// Filesystem for local tree traversal.
    pub fs: Box<dyn FileSystem>,
    /// Comment-syntax registry, constructed once.
    pub registry: LanguageRegistry,
}

impl ServiceContext {
    /// Creates a live context with real disk I/O and the built-in
    /// language table.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem), registry: LanguageRegistry::builtin() }
    }

    /// Creates a context around an arbitrary filesystem implementation.
    #[must_use]
    pub fn with_fs(fs: Box<dyn FileSystem>) -> Self {
        Self { fs, registry: LanguageRegistry::builtin() }
    }
}
