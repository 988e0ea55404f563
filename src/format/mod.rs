//! Columnar file format module
//!
//! Serializes row groups into the binary file layout and reads them
//! back.
//!
//! # Overview
//!
//! - `layout` - magic markers, page headers and footer metadata
//! - `encode` - per-chunk page encoding (plain/dictionary, compression)
//! - `stats` - single-pass min/max/null-count statistics
//! - `FileWriter` - appends row groups, writes footer and trailer
//! - `FileReader` - the conforming read path back to JSON records

mod encode;
mod layout;
mod reader;
mod stats;
mod writer;

pub use encode::{encode_column, EncodedChunk};
pub use layout::{
    CodecKind, ColumnChunkMeta, EncodingKind, FileFooter, PageHeader, RowGroupMeta,
    FORMAT_VERSION, MAGIC,
};
pub use reader::{is_columnar_file, FileReader};
pub use stats::{ColumnStats, ScalarValue, StatsAccumulator};
pub use writer::{FileSummary, FileWriter};
