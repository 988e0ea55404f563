//! Row group builder
//!
//! Replays JSON records against a finalized schema, producing aligned
//! typed columns. Every record contributes exactly one entry
//! (value-or-null) to every column, so row alignment holds across the
//! whole row group by construction.

use super::column::{Column, ColumnData};
use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::schema::{json_kind, Schema};
use serde_json::{Map, Value};

/// A bounded batch of aligned columns, flushed to the file as a unit
#[derive(Debug)]
pub struct RowGroup {
    pub columns: Vec<Column>,
    pub rows: usize,
}

/// Accumulates records into a row group
#[derive(Debug)]
pub struct RowGroupBuilder {
    schema: Schema,
    columns: Vec<Column>,
    rows: usize,
    estimated_bytes: usize,
}

impl RowGroupBuilder {
    /// Create an empty builder for the given schema
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            columns: schema.fields().iter().cloned().map(Column::new).collect(),
            rows: 0,
            estimated_bytes: 0,
        }
    }

    /// Append one record. `record_idx` is the absolute index in the
    /// input, used only for error reporting.
    pub fn append_record(&mut self, record: &Map<String, Value>, record_idx: usize) -> Result<()> {
        for column in &mut self.columns {
            let value = record.get(&column.field.name);
            append_value(column, value, record_idx)?;
            if let Some(v) = value {
                self.estimated_bytes += estimate_value_size(v);
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Rows accumulated so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Check whether the builder holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Rough in-memory size of the accumulated values
    pub fn estimated_bytes(&self) -> usize {
        self.estimated_bytes
    }

    /// Check whether the configured flush thresholds have been reached
    pub fn should_flush(&self, config: &ConverterConfig) -> bool {
        self.rows >= config.row_group_max_rows()
            || self.estimated_bytes >= config.row_group_max_bytes()
    }

    /// Finish the batch and hand the columns over, leaving the builder
    /// empty and ready for the next row group.
    pub fn take(&mut self) -> RowGroup {
        let columns = std::mem::replace(
            &mut self.columns,
            self.schema.fields().iter().cloned().map(Column::new).collect(),
        );
        let rows = std::mem::take(&mut self.rows);
        self.estimated_bytes = 0;
        RowGroup { columns, rows }
    }
}

/// Append a value (or null, for absent fields) to a column, coercing
/// it to the column's widened type.
fn append_value(column: &mut Column, value: Option<&Value>, record_idx: usize) -> Result<()> {
    match value {
        None | Some(Value::Null) => {
            append_null(column);
            Ok(())
        }
        Some(value) => append_typed(column, value, record_idx),
    }
}

/// Append a null row: clear the validity bit and store a placeholder
/// slot so columns stay row-aligned.
fn append_null(column: &mut Column) {
    column.validity.push(false);
    match &mut column.data {
        ColumnData::Boolean(values) => values.push(false),
        ColumnData::Int64(values) => values.push(0),
        ColumnData::Double(values) => values.push(0.0),
        ColumnData::Utf8(values) => values.push(String::new()),
        ColumnData::List { offsets, .. } => {
            let end = *offsets.last().unwrap_or(&0);
            offsets.push(end);
        }
        ColumnData::Struct { children } => {
            for child in children {
                append_null(child);
            }
        }
    }
}

/// Append a non-null value, coercing along the lattice edges.
///
/// Coercion is lossless where the lattice promises it (Int64 stored
/// into a Double column is an exact widen for the representable
/// range). A value whose shape the inferred type cannot absorb is
/// stringified when the column is utf8 and a `TypeMismatch` otherwise;
/// with whole-input inference that mismatch only occurs when the
/// schema came from a sample.
fn append_typed(column: &mut Column, value: &Value, record_idx: usize) -> Result<()> {
    let field_name = column.field.name.clone();
    match &mut column.data {
        ColumnData::Boolean(values) => match value.as_bool() {
            Some(b) => {
                values.push(b);
                column.validity.push(true);
                Ok(())
            }
            None => Err(mismatch(&field_name, record_idx, "boolean", value)),
        },
        ColumnData::Int64(values) => match value.as_i64() {
            Some(i) => {
                values.push(i);
                column.validity.push(true);
                Ok(())
            }
            None => Err(mismatch(&field_name, record_idx, "int64", value)),
        },
        ColumnData::Double(values) => {
            // Integers widen exactly; integers beyond 2^53 store the
            // nearest double, consistent with the lattice having
            // already chosen Double for the column.
            match value.as_f64() {
                Some(f) => {
                    values.push(f);
                    column.validity.push(true);
                    Ok(())
                }
                None => Err(mismatch(&field_name, record_idx, "double", value)),
            }
        }
        ColumnData::Utf8(values) => {
            // String fallback column: any value is representable.
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            values.push(text);
            column.validity.push(true);
            Ok(())
        }
        ColumnData::List { offsets, items } => match value {
            Value::Array(elements) => {
                for element in elements {
                    append_value(items, Some(element), record_idx)?;
                }
                offsets.push(items.len() as u32);
                column.validity.push(true);
                Ok(())
            }
            other => Err(mismatch(&field_name, record_idx, "list", other)),
        },
        ColumnData::Struct { children } => match value {
            Value::Object(map) => {
                for child in children {
                    append_value(child, map.get(&child.field.name), record_idx)?;
                }
                column.validity.push(true);
                Ok(())
            }
            other => Err(mismatch(&field_name, record_idx, "struct", other)),
        },
    }
}

fn mismatch(field: &str, record_idx: usize, expected: &str, value: &Value) -> Error {
    Error::type_mismatch(
        field,
        record_idx,
        format!("expected {expected}, found {}", json_kind(value)),
    )
}

/// Rough serialized size of a JSON value, used only for row-group
/// flush decisions.
fn estimate_value_size(value: &Value) -> usize {
    match value {
        Value::Null | Value::Bool(_) => 1,
        Value::Number(_) => 8,
        Value::String(s) => s.len() + 4,
        Value::Array(items) => 4 + items.iter().map(estimate_value_size).sum::<usize>(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| k.len() + estimate_value_size(v))
            .sum(),
    }
}
