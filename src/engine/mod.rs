//! Conversion pipeline orchestration
//!
//! Two passes over the record sequence: schema inference first, then
//! columnar building against the finalized schema, with row groups
//! flushed to the writer as the configured thresholds are reached.
//! Inference must fully complete before any column is finalized; that
//! is the one synchronization point of the pipeline.

use crate::columnar::RowGroupBuilder;
use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::format::{FileSummary, FileWriter};
use crate::input;
use crate::schema::{infer_schema, json_kind, Schema};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Result of a completed conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Rows written, equal to the input record count
    pub rows: u64,
    /// Row groups in the output file
    pub row_groups: usize,
    /// Total output size in bytes
    pub bytes_written: u64,
    /// The inferred schema the file was written under
    pub schema: Schema,
}

/// JSON-to-columnar converter
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with the given configuration
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// The configuration this converter runs under
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a JSON file (array of objects or NDJSON) into a
    /// columnar file at `output`.
    ///
    /// On any fatal error the partial output file is removed, so a
    /// file at `output` after an error never looks complete.
    pub fn convert_file(
        &self,
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionReport> {
        let records = input::read_records(input_path.as_ref())?;
        info!(
            records = records.len(),
            input = %input_path.as_ref().display(),
            "input loaded"
        );

        let result = self.convert_records(&records, output_path.as_ref());
        if result.is_err() {
            let _ = std::fs::remove_file(output_path.as_ref());
        }
        result
    }

    /// Convert an in-memory record sequence into a columnar file.
    pub fn convert_records(
        &self,
        records: &[Value],
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionReport> {
        // Pass 1: inference over the full sequence.
        let schema = infer_schema(records)?;
        debug!(fields = schema.len(), "schema inferred");

        // Pass 2: replay records into row groups and flush.
        let mut writer =
            FileWriter::create(output_path.as_ref(), schema.clone(), self.config.clone())?;
        let mut builder = RowGroupBuilder::new(&schema);

        for (idx, record) in records.iter().enumerate() {
            let map = record.as_object().ok_or_else(|| {
                Error::input_shape(format!(
                    "record {idx} is not an object (found {})",
                    json_kind(record)
                ))
            })?;
            builder.append_record(map, idx)?;

            if builder.should_flush(&self.config) {
                writer.write_row_group(&builder.take())?;
                info!(records = idx + 1, "processed records");
            }
        }
        if !builder.is_empty() {
            writer.write_row_group(&builder.take())?;
        }

        let FileSummary {
            rows,
            bytes_written,
            row_groups,
        } = writer.finish()?;

        info!(
            rows,
            row_groups,
            bytes = bytes_written,
            output = %output_path.as_ref().display(),
            "conversion complete"
        );

        Ok(ConversionReport {
            rows,
            row_groups,
            bytes_written,
            schema,
        })
    }

    /// Infer and return the unified schema for a record sequence
    /// without writing anything.
    pub fn infer(&self, records: &[Value]) -> Result<Schema> {
        infer_schema(records)
    }
}

#[cfg(test)]
mod tests;
