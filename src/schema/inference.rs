//! Schema inference from generic JSON values
//!
//! Scans a sequence of JSON object records and produces one unified
//! `Schema` under which every record is representable. Type conflicts
//! between records are resolved by widening on the type lattice, never
//! by rejecting the input.

use super::types::{Field, FieldType, Schema};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Running schema accumulator over a record stream
#[derive(Debug, Default)]
pub struct SchemaInferrer {
    /// Accumulated fields in first-seen order
    fields: Vec<Field>,
    /// Field name -> index into `fields`
    index: HashMap<String, usize>,
    /// Records observed so far
    record_count: usize,
    /// Per-field occurrence counts, for absent-field nullability
    field_counts: HashMap<String, usize>,
}

impl SchemaInferrer {
    /// Create a new empty inferrer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records observed so far
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Fold one record into the running schema.
    pub fn observe(&mut self, record: &Map<String, Value>) {
        self.record_count += 1;

        for (name, value) in record {
            *self.field_counts.entry(name.clone()).or_insert(0) += 1;

            let observed = Field::new(name.clone(), natural_type(value), value.is_null());
            match self.index.get(name) {
                Some(&i) => {
                    self.fields[i] = self.fields[i].merge(&observed);
                }
                None => {
                    // Seen for the first time; if earlier records exist
                    // the field was absent from them and is nullable.
                    let mut field = observed;
                    field.nullable |= self.record_count > 1;
                    self.index.insert(name.clone(), self.fields.len());
                    self.fields.push(field);
                }
            }
        }
    }

    /// Finalize the accumulated schema.
    ///
    /// Fields absent from at least one record become nullable, and
    /// fields that never carried a typed value resolve to nullable
    /// `Utf8` rather than being omitted.
    pub fn finish(self) -> Schema {
        let record_count = self.record_count;
        let field_counts = self.field_counts;

        let fields = self
            .fields
            .into_iter()
            .map(|mut field| {
                let seen = field_counts.get(&field.name).copied().unwrap_or(0);
                field.nullable |= seen < record_count;
                field.field_type = field.field_type.resolve_unknown();
                field
            })
            .collect();

        Schema::new(fields)
    }
}

/// Infer a schema from a full record sequence.
///
/// Every top-level value must be a JSON object; anything else is an
/// input shape error.
pub fn infer_schema(records: &[Value]) -> Result<Schema> {
    let mut inferrer = SchemaInferrer::new();

    for (idx, record) in records.iter().enumerate() {
        match record {
            Value::Object(map) => inferrer.observe(map),
            other => {
                return Err(Error::input_shape(format!(
                    "record {idx} is not an object (found {})",
                    json_kind(other)
                )));
            }
        }
    }

    Ok(inferrer.finish())
}

/// The natural lattice type of a single JSON value.
///
/// Nulls and empty arrays contribute `Unknown`; integral numbers map
/// to `Int64` and all other numbers (including integers wider than
/// i64) to `Double`.
pub fn natural_type(value: &Value) -> FieldType {
    match value {
        Value::Null => FieldType::Unknown,
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                FieldType::Int64
            } else {
                FieldType::Double
            }
        }
        Value::String(_) => FieldType::Utf8,
        Value::Array(items) => {
            let element = items
                .iter()
                .map(natural_type)
                .fold(FieldType::Unknown, |acc, t| acc.unify(&t));
            FieldType::List(Box::new(element))
        }
        Value::Object(map) => FieldType::Struct(
            map.iter()
                .map(|(k, v)| Field::new(k.clone(), natural_type(v), v.is_null()))
                .collect(),
        ),
    }
}

/// Human-readable JSON value kind, for error messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
