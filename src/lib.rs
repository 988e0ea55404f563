//! # parqlite
//!
//! Converts collections of JSON records (a JSON array of objects, or
//! newline-delimited objects) into a single typed, compressed columnar
//! storage file.
//!
//! ## Features
//!
//! - **Schema Inference**: One unified column schema across heterogeneous
//!   records, with a widening type lattice and string fallback
//! - **Columnar Building**: Typed column arrays with validity bitmaps,
//!   nested lists and structs included
//! - **Binary Encoding**: Row groups, column chunks and pages with
//!   dictionary or plain encoding, LZ4 compression and per-chunk statistics
//! - **Round Trip**: A conforming reader decodes files back to JSON records
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parqlite::{Converter, ConverterConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let report = Converter::new().convert_file("events.json", "events.col")?;
//!     println!("wrote {} rows", report.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! JSON value tree ──► schema inference ──► columnar builder ──► file encoder
//!   (serde_json)       (type lattice)      (typed columns +      (row groups,
//!                                           validity bitmaps)     pages, footer)
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the converter
pub mod error;

/// Converter configuration
pub mod config;

/// Input loading and top-level shape validation
pub mod input;

/// Schema inference from JSON data
pub mod schema;

/// Row-oriented to columnar transposition
pub mod columnar;

/// Binary columnar file format
pub mod format;

/// Conversion pipeline orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{Compression, ConverterConfig};
pub use engine::{ConversionReport, Converter};
pub use error::{Error, Result};
pub use schema::{Field, FieldType, Schema};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
