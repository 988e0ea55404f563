//! Column chunk encoding
//!
//! Encodes one column into its chunk bytes: a page for the column
//! itself (validity bitmap plus values), followed recursively by the
//! pages of child columns for nested types. Encoding choice and
//! dictionary order are deterministic, so identical columns under the
//! same configuration always produce identical bytes.

use crate::columnar::{Column, ColumnData};
use crate::config::{Compression, ConverterConfig};
use crate::error::{Error, Result};
use crate::format::layout::{CodecKind, EncodingKind, PageHeader};
use crate::format::stats::{ColumnStats, ScalarValue, StatsAccumulator};
use lz4_flex::block::compress_prepend_size;
use std::collections::HashMap;

/// One encoded column chunk plus its statistics
#[derive(Debug)]
pub struct EncodedChunk {
    pub bytes: Vec<u8>,
    pub stats: ColumnStats,
}

/// Encode a column into chunk bytes.
///
/// Statistics are gathered in the same pass that walks the values;
/// nothing is rescanned. The returned statistics describe the column
/// itself; child columns of nested types contribute pages but not
/// separate footer statistics.
pub fn encode_column(column: &Column, config: &ConverterConfig) -> Result<EncodedChunk> {
    let mut bytes = Vec::new();
    let stats = encode_into(column, config, &mut bytes)?;
    Ok(EncodedChunk { bytes, stats })
}

fn encode_into(column: &Column, config: &ConverterConfig, out: &mut Vec<u8>) -> Result<ColumnStats> {
    let rows = column.len();
    if rows > u32::MAX as usize {
        return Err(Error::encoding(format!(
            "column '{}' exceeds the per-chunk row limit",
            column.field.name
        )));
    }

    let (values, encoding, stats) = encode_values(column, config);

    // Page body: validity bitmap, then the values section.
    let mut body = Vec::with_capacity(column.validity.as_bytes().len() + values.len());
    body.extend_from_slice(column.validity.as_bytes());
    body.extend_from_slice(&values);

    write_page(out, &body, encoding, rows as u32, config.compression())?;

    // Child pages follow the parent page directly.
    match &column.data {
        ColumnData::List { items, .. } => {
            encode_into(items, config, out)?;
        }
        ColumnData::Struct { children } => {
            for child in children {
                encode_into(child, config, out)?;
            }
        }
        _ => {}
    }

    Ok(stats)
}

fn write_page(
    out: &mut Vec<u8>,
    body: &[u8],
    encoding: EncodingKind,
    row_count: u32,
    compression: Compression,
) -> Result<()> {
    let (codec, payload) = match compression {
        Compression::None => (CodecKind::None, body.to_vec()),
        Compression::Lz4 => (CodecKind::Lz4, compress_prepend_size(body)),
    };

    if body.len() > u32::MAX as usize || payload.len() > u32::MAX as usize {
        return Err(Error::encoding("page exceeds the 4 GiB page limit"));
    }

    PageHeader {
        encoding,
        codec,
        row_count,
        uncompressed_len: body.len() as u32,
        compressed_len: payload.len() as u32,
    }
    .write_to(out);
    out.extend_from_slice(&payload);
    Ok(())
}

/// Encode the values section of one column and gather its statistics.
fn encode_values(column: &Column, config: &ConverterConfig) -> (Vec<u8>, EncodingKind, ColumnStats) {
    let validity = &column.validity;
    let rows = column.len();
    let mut acc = StatsAccumulator::new();

    match &column.data {
        // Booleans have at most two distinct values; a dictionary
        // would never pay for itself.
        ColumnData::Boolean(values) => {
            let mut bytes = Vec::with_capacity(rows);
            for (i, v) in values.iter().enumerate() {
                if validity.get(i) {
                    acc.observe(ScalarValue::Boolean(*v));
                } else {
                    acc.observe_null();
                }
                bytes.push(u8::from(*v));
            }
            (bytes, EncodingKind::Plain, acc.finish(None))
        }
        ColumnData::Int64(values) => encode_scalar(
            values,
            validity,
            config,
            |v| *v,
            |v| ScalarValue::Int64(*v),
            |v, bytes| bytes.extend_from_slice(&v.to_le_bytes()),
            &mut acc,
        ),
        ColumnData::Double(values) => encode_scalar(
            values,
            validity,
            config,
            |v| v.to_bits(),
            |v| ScalarValue::Double(*v),
            |v, bytes| bytes.extend_from_slice(&v.to_le_bytes()),
            &mut acc,
        ),
        ColumnData::Utf8(values) => encode_scalar(
            values,
            validity,
            config,
            Clone::clone,
            |v| ScalarValue::Utf8(v.clone()),
            |v, bytes| {
                bytes.extend_from_slice(&(v.len() as u32).to_le_bytes());
                bytes.extend_from_slice(v.as_bytes());
            },
            &mut acc,
        ),
        ColumnData::List { offsets, .. } => {
            for i in 0..rows {
                if !validity.get(i) {
                    acc.observe_null();
                }
            }
            let mut bytes = Vec::with_capacity(offsets.len() * 4);
            for offset in offsets {
                bytes.extend_from_slice(&offset.to_le_bytes());
            }
            (bytes, EncodingKind::Plain, acc.finish(None))
        }
        ColumnData::Struct { .. } => {
            for i in 0..rows {
                if !validity.get(i) {
                    acc.observe_null();
                }
            }
            (Vec::new(), EncodingKind::Plain, acc.finish(None))
        }
    }
}

/// Encode a leaf scalar column, choosing dictionary encoding when the
/// distinct non-null count stays below the configured fraction of the
/// row count, plain encoding otherwise.
///
/// Dictionary entries are numbered in first-occurrence order. Null
/// rows carry index 0 (any value: the validity bitmap masks them) and
/// a plain-encoded placeholder slot, so both layouts stay one slot per
/// row.
fn encode_scalar<T, K>(
    values: &[T],
    validity: &crate::columnar::Bitmap,
    config: &ConverterConfig,
    key_of: impl Fn(&T) -> K,
    scalar_of: impl Fn(&T) -> ScalarValue,
    write_plain: impl Fn(&T, &mut Vec<u8>),
    acc: &mut StatsAccumulator,
) -> (Vec<u8>, EncodingKind, ColumnStats)
where
    K: std::hash::Hash + Eq,
{
    let rows = values.len();
    let mut dictionary: HashMap<K, u32> = HashMap::new();
    let mut dict_order: Vec<usize> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(rows);

    for (i, value) in values.iter().enumerate() {
        if validity.get(i) {
            acc.observe(scalar_of(value));
            let next = dict_order.len() as u32;
            let index = *dictionary.entry(key_of(value)).or_insert_with(|| {
                dict_order.push(i);
                next
            });
            indices.push(index);
        } else {
            acc.observe_null();
            indices.push(0);
        }
    }

    let distinct = dict_order.len();
    let use_dictionary = config.is_dictionary_enabled()
        && distinct > 0
        && (distinct as f64) < (rows as f64) * config.max_dictionary_fraction();

    let stats = std::mem::take(acc).finish(Some(distinct as u64));

    if use_dictionary {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(distinct as u32).to_le_bytes());
        for &value_idx in &dict_order {
            write_plain(&values[value_idx], &mut bytes);
        }
        for index in &indices {
            bytes.extend_from_slice(&index.to_le_bytes());
        }
        (bytes, EncodingKind::Dictionary, stats)
    } else {
        let mut bytes = Vec::new();
        for value in values {
            write_plain(value, &mut bytes);
        }
        (bytes, EncodingKind::Plain, stats)
    }
}
