//! CLI commands and argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// JSON to columnar file converter
#[derive(Parser, Debug)]
#[command(name = "parqlite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a JSON file (array of objects or NDJSON) to a columnar file
    Convert {
        /// Path to the input JSON file
        input: PathBuf,

        /// Path to the output columnar file
        output: PathBuf,

        /// Flush a row group after this many rows
        #[arg(long)]
        row_group_rows: Option<usize>,

        /// Flush a row group after this many estimated bytes
        #[arg(long)]
        row_group_bytes: Option<usize>,

        /// Page compression codec
        #[arg(long, default_value = "lz4")]
        compression: CompressionArg,

        /// Disable dictionary encoding for low-cardinality columns
        #[arg(long)]
        no_dictionary: bool,
    },

    /// Infer and print the unified schema of a JSON file
    Schema {
        /// Path to the input JSON file
        input: PathBuf,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Print footer metadata of an existing columnar file
    Inspect {
        /// Path to the columnar file
        file: PathBuf,
    },

    /// Decode a columnar file back to NDJSON on stdout
    Cat {
        /// Path to the columnar file
        file: PathBuf,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Page compression codec choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    /// Store pages uncompressed
    None,
    /// LZ4 block compression
    Lz4,
}

impl From<CompressionArg> for crate::config::Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => crate::config::Compression::None,
            CompressionArg::Lz4 => crate::config::Compression::Lz4,
        }
    }
}
