//! Core library entry for the `snag` CLI.
//!
//! `snag` scans a source tree for structured TODO comment blocks, opens
//! a tracking issue for each untracked block, and commits the issue URL
//! back into the source as an `Issue:` directive line.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod lang;
pub mod marker;
pub mod parser;
pub mod ports;
pub mod reconcile;
pub mod walk;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command
/// execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(cli.command)
}
