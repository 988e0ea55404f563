//! Command-line interface
//!
//! Argument parsing and command execution for the `parqlite` binary.

mod commands;
mod runner;

pub use commands::{Cli, Commands, CompressionArg};
pub use runner::Runner;
