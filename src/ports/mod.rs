//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (local filesystem, remote issue tracker).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod tracker;

pub use filesystem::FileSystem;
pub use tracker::{CreatedIssue, IssueTracker, MergeState, RemoteFile, TrackerFuture};
