//! Schema inference module
//!
//! Produces one unified column schema from heterogeneous JSON records.
//!
//! # Features
//!
//! - **Type Inference**: Maps JSON values onto a typed column lattice
//! - **Widening**: Merges conflicting types to their least upper bound
//! - **Nullable Detection**: Nulls and absent fields mark nullability
//! - **Nested Support**: Lists and structs are inferred recursively
//! - **String Fallback**: Unrepresentable conflicts become utf8, never errors

mod inference;
mod types;

pub use inference::{infer_schema, json_kind, natural_type, SchemaInferrer};
pub use types::{Field, FieldType, Schema};
