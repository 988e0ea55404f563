//! parqlite CLI
//!
//! Command-line entry point for the JSON to columnar file converter.

use clap::Parser;
use parqlite::cli::{Cli, Runner};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);
    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
