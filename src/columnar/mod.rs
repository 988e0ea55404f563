//! Columnar builder module
//!
//! Transposes row-oriented JSON records into typed column arrays with
//! validity bitmaps, one column per schema field.
//!
//! # Overview
//!
//! - `Column` / `ColumnData` - typed per-field storage, nested types recurse
//! - `Bitmap` - one validity bit per row
//! - `RowGroupBuilder` - accumulates records until a flush threshold
//! - `RowGroup` - an aligned batch of columns handed to the encoder

mod builder;
mod column;

pub use builder::{RowGroup, RowGroupBuilder};
pub use column::{Bitmap, Column, ColumnData};

#[cfg(test)]
mod tests;
