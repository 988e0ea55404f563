//! Typed column storage
//!
//! A `Column` holds one typed value slot per row plus a validity
//! bitmap. Nested types recurse: a list column owns an offsets array
//! and a child column of items, a struct column owns one child column
//! per field.

use crate::schema::{Field, FieldType};

/// Validity bitmap, one bit per row, LSB-first within each byte.
/// A set bit means the value at that position is present (not null).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    bits: Vec<u8>,
    len: usize,
}

impl Bitmap {
    /// Create an empty bitmap
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit
    pub fn push(&mut self, set: bool) {
        let byte = self.len / 8;
        if byte == self.bits.len() {
            self.bits.push(0);
        }
        if set {
            self.bits[byte] |= 1 << (self.len % 8);
        }
        self.len += 1;
    }

    /// Read the bit at `index`
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the bitmap is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set (non-null) bits
    pub fn count_set(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Raw packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Rebuild a bitmap from packed bytes
    pub fn from_bytes(bytes: &[u8], len: usize) -> Self {
        Self {
            bits: bytes.to_vec(),
            len,
        }
    }

    /// Packed byte length for `len` bits
    pub fn byte_len(len: usize) -> usize {
        len.div_ceil(8)
    }
}

/// Typed value storage for one column.
///
/// Null rows occupy a default placeholder slot so that
/// `values.len() == validity.len()` holds for every layout; the
/// validity bitmap is the only source of truth for presence.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Boolean(Vec<bool>),
    Int64(Vec<i64>),
    Double(Vec<f64>),
    Utf8(Vec<String>),
    List {
        /// Exclusive-end prefix sums into `items`, length = rows + 1
        offsets: Vec<u32>,
        items: Box<Column>,
    },
    Struct {
        children: Vec<Column>,
    },
}

/// One column of a row group: a field, its typed values, and a
/// validity bitmap of equal length.
#[derive(Debug, Clone)]
pub struct Column {
    pub field: Field,
    pub data: ColumnData,
    pub validity: Bitmap,
}

impl Column {
    /// Create an empty column for a schema field, recursing into
    /// nested types.
    pub fn new(field: Field) -> Self {
        let data = match &field.field_type {
            FieldType::Boolean => ColumnData::Boolean(Vec::new()),
            FieldType::Int64 => ColumnData::Int64(Vec::new()),
            FieldType::Double => ColumnData::Double(Vec::new()),
            // Unknown never survives schema finalization; treat it as
            // the string fallback if a caller hands one in anyway.
            FieldType::Utf8 | FieldType::Unknown => ColumnData::Utf8(Vec::new()),
            FieldType::List(element) => ColumnData::List {
                offsets: vec![0],
                items: Box::new(Column::new(Field::new(
                    "item",
                    element.as_ref().clone(),
                    true,
                ))),
            },
            FieldType::Struct(fields) => ColumnData::Struct {
                children: fields.iter().cloned().map(Column::new).collect(),
            },
        };

        Self {
            field,
            data,
            validity: Bitmap::new(),
        }
    }

    /// Number of rows in this column
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    /// Check whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.validity.is_empty()
    }

    /// Number of null rows
    pub fn null_count(&self) -> usize {
        self.len() - self.validity.count_set()
    }
}
