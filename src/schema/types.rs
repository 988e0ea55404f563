//! Schema types
//!
//! The column schema model: a widening type lattice over JSON values,
//! named fields with nullability, and the finalized `Schema`.

use serde::{Deserialize, Serialize};

/// Logical column type. Forms a lattice used for widening.
///
/// `Unknown` is the lattice bottom: it is contributed by JSON nulls and
/// by empty arrays, which carry no type information. A finalized schema
/// never contains `Unknown`; fields that stayed untyped across every
/// record are resolved to nullable `Utf8`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Unknown,
    Boolean,
    Int64,
    Double,
    Utf8,
    List(Box<FieldType>),
    Struct(Vec<Field>),
}

impl FieldType {
    /// Check whether this is a nested (non-leaf) type
    pub fn is_nested(&self) -> bool {
        matches!(self, FieldType::List(_) | FieldType::Struct(_))
    }

    /// Widen two types to their least upper bound on the lattice.
    ///
    /// The operation is commutative and associative, so the widened
    /// type of a field does not depend on record order. Types with no
    /// common shape (boolean vs. number, scalar vs. nested) widen to
    /// `Utf8`: schema inference never rejects the input over one
    /// record's shape.
    pub fn unify(&self, other: &FieldType) -> FieldType {
        match (self, other) {
            (a, b) if a == b => a.clone(),
            (FieldType::Unknown, t) | (t, FieldType::Unknown) => t.clone(),
            (FieldType::Int64, FieldType::Double) | (FieldType::Double, FieldType::Int64) => {
                FieldType::Double
            }
            (FieldType::List(a), FieldType::List(b)) => FieldType::List(Box::new(a.unify(b))),
            (FieldType::Struct(a), FieldType::Struct(b)) => {
                FieldType::Struct(unify_struct_fields(a, b))
            }
            // No implicit bool/number coercion, and no common shape for
            // nested-vs-scalar conflicts: stringify instead.
            _ => FieldType::Utf8,
        }
    }

    /// Resolve any remaining `Unknown` to the string fallback type.
    pub(crate) fn resolve_unknown(self) -> FieldType {
        match self {
            FieldType::Unknown => FieldType::Utf8,
            FieldType::List(inner) => FieldType::List(Box::new(inner.resolve_unknown())),
            FieldType::Struct(fields) => FieldType::Struct(
                fields
                    .into_iter()
                    .map(|f| Field {
                        field_type: f.field_type.resolve_unknown(),
                        ..f
                    })
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Union of two struct field sets, preserving left-side order and
/// appending fields only the right side has. A field present on one
/// side only becomes nullable.
fn unify_struct_fields(a: &[Field], b: &[Field]) -> Vec<Field> {
    let mut merged: Vec<Field> = Vec::with_capacity(a.len().max(b.len()));

    for field in a {
        match b.iter().find(|f| f.name == field.name) {
            Some(other) => merged.push(field.merge(other)),
            None => merged.push(Field {
                nullable: true,
                ..field.clone()
            }),
        }
    }

    for field in b {
        if !a.iter().any(|f| f.name == field.name) {
            merged.push(Field {
                nullable: true,
                ..field.clone()
            });
        }
    }

    merged
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Unknown => write!(f, "unknown"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Int64 => write!(f, "int64"),
            FieldType::Double => write!(f, "double"),
            FieldType::Utf8 => write!(f, "utf8"),
            FieldType::List(inner) => write!(f, "list<{inner}>"),
            FieldType::Struct(fields) => {
                write!(f, "struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.field_type)?;
                }
                write!(f, ">")
            }
        }
    }
}

/// A named, typed, nullable column slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, field_type: FieldType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable,
        }
    }

    /// Merge with another observation of the same field
    pub fn merge(&self, other: &Field) -> Field {
        Field {
            name: self.name.clone(),
            field_type: self.field_type.unify(&other.field_type),
            nullable: self.nullable || other.nullable,
        }
    }
}

/// Finalized column schema. Immutable once inference completes; field
/// names are unique at every nesting level and field order follows
/// first-seen order across the input records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from a field list
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Create an empty schema
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get all fields in column order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to a JSON description of the schema
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
