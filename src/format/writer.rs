//! Columnar file writer
//!
//! Appends row groups to a sink in arrival order and finishes the
//! file with a footer and trailer. Column chunks within one row group
//! are encoded on rayon worker threads, each owning its column's
//! memory, and joined back in schema-field order before any byte is
//! appended.
//!
//! If any write fails the trailer is never emitted, so a partial file
//! has no closing magic and readers detect the truncation.

use crate::columnar::RowGroup;
use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::format::encode::{encode_column, EncodedChunk};
use crate::format::layout::{ColumnChunkMeta, FileFooter, RowGroupMeta, FORMAT_VERSION, MAGIC};
use crate::schema::Schema;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Summary of a finished file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub rows: u64,
    pub bytes_written: u64,
    pub row_groups: usize,
}

/// Streaming writer for the columnar file format
pub struct FileWriter<W: Write> {
    sink: W,
    config: ConverterConfig,
    schema: Schema,
    row_groups: Vec<RowGroupMeta>,
    offset: u64,
    total_rows: u64,
}

impl FileWriter<BufWriter<File>> {
    /// Create a writer over a new file at `path`
    pub fn create(path: impl AsRef<Path>, schema: Schema, config: ConverterConfig) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), schema, config)
    }
}

impl<W: Write> FileWriter<W> {
    /// Create a writer over an arbitrary sink. Writes the opening
    /// magic immediately.
    pub fn new(mut sink: W, schema: Schema, config: ConverterConfig) -> Result<Self> {
        sink.write_all(&MAGIC)?;
        Ok(Self {
            sink,
            config,
            schema,
            row_groups: Vec::new(),
            offset: MAGIC.len() as u64,
            total_rows: 0,
        })
    }

    /// The schema this writer encodes against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows written so far
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Encode and append one row group. Groups land in the file in
    /// call order, preserving the row order of the input.
    pub fn write_row_group(&mut self, group: &RowGroup) -> Result<()> {
        if group.rows == 0 {
            return Ok(());
        }
        if group.columns.len() != self.schema.len() {
            return Err(Error::encoding(format!(
                "row group has {} columns, schema has {}",
                group.columns.len(),
                self.schema.len()
            )));
        }
        for column in &group.columns {
            if column.len() != group.rows {
                return Err(Error::encoding(format!(
                    "column '{}' has {} rows, row group has {}",
                    column.field.name,
                    column.len(),
                    group.rows
                )));
            }
        }

        let group_offset = self.offset;

        // Columns are independent once the schema is fixed; encode
        // them in parallel and join in schema-field order.
        let encoded: Vec<EncodedChunk> = group
            .columns
            .par_iter()
            .map(|column| encode_column(column, &self.config))
            .collect::<Result<_>>()?;

        let mut columns = Vec::with_capacity(encoded.len());
        for (column, chunk) in group.columns.iter().zip(encoded) {
            self.sink.write_all(&chunk.bytes)?;
            columns.push(ColumnChunkMeta {
                name: column.field.name.clone(),
                offset: self.offset,
                byte_size: chunk.bytes.len() as u64,
                stats: chunk.stats,
            });
            self.offset += chunk.bytes.len() as u64;
        }

        self.row_groups.push(RowGroupMeta {
            offset: group_offset,
            byte_size: self.offset - group_offset,
            rows: group.rows as u64,
            columns,
        });
        self.total_rows += group.rows as u64;

        debug!(
            rows = group.rows,
            bytes = self.offset - group_offset,
            "row group flushed"
        );
        Ok(())
    }

    /// Serialize the footer, write the trailer and flush the sink.
    pub fn finish(mut self) -> Result<FileSummary> {
        let footer = FileFooter {
            version: FORMAT_VERSION,
            schema: self.schema,
            row_groups: self.row_groups,
            total_rows: self.total_rows,
        };

        let footer_bytes = bincode::serialize(&footer)
            .map_err(|e| Error::encoding(format!("footer serialization failed: {e}")))?;
        let footer_len = u32::try_from(footer_bytes.len())
            .map_err(|_| Error::encoding("footer exceeds the 4 GiB limit"))?;

        self.sink.write_all(&footer_bytes)?;
        self.sink.write_all(&footer_len.to_le_bytes())?;
        self.sink.write_all(&MAGIC)?;
        self.sink.flush()?;

        let bytes_written = self.offset + footer_bytes.len() as u64 + 4 + MAGIC.len() as u64;
        Ok(FileSummary {
            rows: footer.total_rows,
            bytes_written,
            row_groups: footer.row_groups.len(),
        })
    }
}
