//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `snag`.
#[derive(Debug, Parser)]
#[command(name = "snag", version, about = "Turn TODO comments into tracked issues")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the TODO markers under a directory. Local only, no network.
    Scan {
        /// Directory to scan.
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Path prefix to prune from the walk; repeatable.
        #[arg(long = "exclude")]
        exclude: Vec<PathBuf>,
    },
    /// Create issues for new markers and write the references back.
    Reconcile {
        /// Target repository as OWNER/NAME.
        #[arg(long)]
        repo: String,
        /// Branch the references are committed to.
        #[arg(long)]
        branch: String,
        /// Directory to scan.
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Path prefix to prune from the walk; repeatable.
        #[arg(long = "exclude")]
        exclude: Vec<PathBuf>,
        /// Only reconcile if this pull request is merged to --branch.
        #[arg(long)]
        pr: Option<u64>,
        /// Prefix prepended to every created issue title.
        #[arg(long)]
        title_prefix: Option<String>,
        /// Print what would be created without calling the tracker.
        #[arg(long)]
        dry_run: bool,
    },
}
