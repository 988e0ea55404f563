//! Per-column-chunk statistics
//!
//! Min, max and null count are gathered in the same pass that encodes
//! the chunk; nothing is rescanned. Doubles order by `f64::total_cmp`
//! so statistics stay deterministic in the presence of NaN.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A typed scalar captured in statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Boolean(bool),
    Int64(i64),
    Double(f64),
    Utf8(String),
}

impl ScalarValue {
    /// Natural ordering within one scalar type. Cross-type comparison
    /// never happens for a well-formed chunk.
    fn cmp_same_type(&self, other: &ScalarValue) -> Ordering {
        match (self, other) {
            (ScalarValue::Boolean(a), ScalarValue::Boolean(b)) => a.cmp(b),
            (ScalarValue::Int64(a), ScalarValue::Int64(b)) => a.cmp(b),
            (ScalarValue::Double(a), ScalarValue::Double(b)) => a.total_cmp(b),
            (ScalarValue::Utf8(a), ScalarValue::Utf8(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Boolean(b) => write!(f, "{b}"),
            ScalarValue::Int64(i) => write!(f, "{i}"),
            ScalarValue::Double(d) => write!(f, "{d}"),
            ScalarValue::Utf8(s) => write!(f, "{s:?}"),
        }
    }
}

/// Statistics for one column chunk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnStats {
    pub null_count: u64,
    /// Distinct non-null value count, known when the encoder
    /// deduplicated the chunk (leaf scalar columns)
    pub distinct_count: Option<u64>,
    /// Smallest non-null value; absent for all-null or nested chunks
    pub min: Option<ScalarValue>,
    /// Largest non-null value; absent for all-null or nested chunks
    pub max: Option<ScalarValue>,
}

/// Single-pass min/max/null-count accumulator
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    null_count: u64,
    min: Option<ScalarValue>,
    max: Option<ScalarValue>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_null(&mut self) {
        self.null_count += 1;
    }

    pub fn observe(&mut self, value: ScalarValue) {
        match &mut self.min {
            Some(min) if value.cmp_same_type(min) == Ordering::Less => *min = value.clone(),
            Some(_) => {}
            None => self.min = Some(value.clone()),
        }
        match &mut self.max {
            Some(max) if value.cmp_same_type(max) == Ordering::Greater => *max = value,
            Some(_) => {}
            None => self.max = Some(value),
        }
    }

    pub fn finish(self, distinct_count: Option<u64>) -> ColumnStats {
        ColumnStats {
            null_count: self.null_count,
            distinct_count,
            min: self.min,
            max: self.max,
        }
    }
}
