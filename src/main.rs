//! Binary entrypoint for the `snag` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Pick up GITHUB_TOKEN and friends from a local .env, if any.
    dotenvy::dotenv().ok();
    // Warnings stay visible even without RUST_LOG set.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match snag::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
