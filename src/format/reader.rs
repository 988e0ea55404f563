//! Columnar file reader
//!
//! The conforming read path: verifies both magic markers, decodes the
//! footer, then reconstructs JSON records from the encoded pages.
//! This is what the `cat` and `inspect` commands and the round-trip
//! tests run against.

use crate::columnar::Bitmap;
use crate::error::{Error, Result};
use crate::format::layout::{CodecKind, EncodingKind, FileFooter, PageHeader, MAGIC};
use crate::schema::{FieldType, Schema};
use lz4_flex::block::decompress_size_prepended;
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Little-endian cursor over a byte slice
struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(Error::corrupt("unexpected end of chunk data"));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Reader over a complete columnar file
pub struct FileReader {
    data: Vec<u8>,
    footer: FileFooter,
}

impl FileReader {
    /// Open a file, verify its magic markers and decode the footer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Build a reader over in-memory file bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let trailer_len = MAGIC.len() + 4;
        if data.len() < MAGIC.len() + trailer_len {
            return Err(Error::corrupt("file too short to hold magic and trailer"));
        }
        if data[..MAGIC.len()] != MAGIC {
            return Err(Error::corrupt("missing opening magic marker"));
        }
        if data[data.len() - MAGIC.len()..] != MAGIC {
            return Err(Error::corrupt(
                "missing closing magic marker (truncated or incomplete file)",
            ));
        }

        let len_at = data.len() - trailer_len;
        let footer_len = u32::from_le_bytes([
            data[len_at],
            data[len_at + 1],
            data[len_at + 2],
            data[len_at + 3],
        ]) as usize;
        if footer_len + trailer_len + MAGIC.len() > data.len() {
            return Err(Error::corrupt("footer length exceeds file size"));
        }

        let footer_start = len_at - footer_len;
        let footer: FileFooter = bincode::deserialize(&data[footer_start..len_at])
            .map_err(|e| Error::corrupt(format!("footer decode failed: {e}")))?;

        Ok(Self { data, footer })
    }

    /// File footer metadata
    pub fn footer(&self) -> &FileFooter {
        &self.footer
    }

    /// The schema recorded in the footer
    pub fn schema(&self) -> &Schema {
        &self.footer.schema
    }

    /// Total row count across all row groups
    pub fn total_rows(&self) -> u64 {
        self.footer.total_rows
    }

    /// Decode every row group back into JSON records, in row order.
    pub fn read_all(&self) -> Result<Vec<Value>> {
        let mut records = Vec::with_capacity(self.footer.total_rows as usize);
        for idx in 0..self.footer.row_groups.len() {
            records.extend(self.read_row_group(idx)?);
        }
        Ok(records)
    }

    /// Decode one row group back into JSON records.
    pub fn read_row_group(&self, index: usize) -> Result<Vec<Value>> {
        let meta = self
            .footer
            .row_groups
            .get(index)
            .ok_or_else(|| Error::corrupt(format!("row group {index} out of range")))?;
        let rows = meta.rows as usize;

        let mut columns: Vec<Vec<Value>> = Vec::with_capacity(meta.columns.len());
        for (field, chunk) in self.footer.schema.fields().iter().zip(&meta.columns) {
            let start = chunk.offset as usize;
            let end = start + chunk.byte_size as usize;
            if end > self.data.len() {
                return Err(Error::corrupt(format!(
                    "column chunk '{}' extends past end of file",
                    chunk.name
                )));
            }
            let mut cursor = ByteReader::new(&self.data[start..end]);
            let values = decode_column(&field.field_type, &mut cursor)?;
            if values.len() != rows {
                return Err(Error::corrupt(format!(
                    "column chunk '{}' decoded {} rows, expected {rows}",
                    chunk.name,
                    values.len()
                )));
            }
            columns.push(values);
        }

        let mut records = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut record = Map::new();
            for (field, values) in self.footer.schema.fields().iter().zip(&columns) {
                record.insert(field.name.clone(), values[row].clone());
            }
            records.push(Value::Object(record));
        }
        Ok(records)
    }
}

/// Decode one column (page plus child pages) into one JSON value per
/// row, with `Value::Null` for cleared validity bits.
fn decode_column(field_type: &FieldType, cursor: &mut ByteReader<'_>) -> Result<Vec<Value>> {
    let header = PageHeader::read_from(cursor.take(PageHeader::LEN)?)?;
    let payload = cursor.take(header.compressed_len as usize)?;

    let body: Vec<u8> = match header.codec {
        CodecKind::None => payload.to_vec(),
        CodecKind::Lz4 => decompress_size_prepended(payload)
            .map_err(|e| Error::corrupt(format!("page decompression failed: {e}")))?,
    };
    if body.len() != header.uncompressed_len as usize {
        return Err(Error::corrupt("page length does not match header"));
    }

    let rows = header.row_count as usize;
    let validity_len = Bitmap::byte_len(rows);
    if body.len() < validity_len {
        return Err(Error::corrupt("page too short for validity bitmap"));
    }
    let validity = Bitmap::from_bytes(&body[..validity_len], rows);
    let mut section = ByteReader::new(&body[validity_len..]);

    match field_type {
        FieldType::Boolean | FieldType::Int64 | FieldType::Double | FieldType::Utf8 => {
            decode_scalar(field_type, header.encoding, rows, &validity, &mut section)
        }
        FieldType::List(element) => {
            let mut offsets = Vec::with_capacity(rows + 1);
            for _ in 0..=rows {
                offsets.push(section.read_u32()? as usize);
            }
            let items = decode_column(element, cursor)?;

            let mut values = Vec::with_capacity(rows);
            for row in 0..rows {
                if !validity.get(row) {
                    values.push(Value::Null);
                    continue;
                }
                let (start, end) = (offsets[row], offsets[row + 1]);
                if start > end || end > items.len() {
                    return Err(Error::corrupt("list offsets out of range"));
                }
                values.push(Value::Array(items[start..end].to_vec()));
            }
            Ok(values)
        }
        FieldType::Struct(fields) => {
            let mut children: Vec<Vec<Value>> = Vec::with_capacity(fields.len());
            for field in fields {
                let child = decode_column(&field.field_type, cursor)?;
                if child.len() != rows {
                    return Err(Error::corrupt("struct child row count mismatch"));
                }
                children.push(child);
            }

            let mut values = Vec::with_capacity(rows);
            for row in 0..rows {
                if !validity.get(row) {
                    values.push(Value::Null);
                    continue;
                }
                let mut object = Map::new();
                for (field, child) in fields.iter().zip(&children) {
                    object.insert(field.name.clone(), child[row].clone());
                }
                values.push(Value::Object(object));
            }
            Ok(values)
        }
        FieldType::Unknown => Err(Error::corrupt("schema contains an unresolved unknown type")),
    }
}

fn decode_scalar(
    field_type: &FieldType,
    encoding: EncodingKind,
    rows: usize,
    validity: &Bitmap,
    section: &mut ByteReader<'_>,
) -> Result<Vec<Value>> {
    match encoding {
        EncodingKind::Plain => {
            let mut values = Vec::with_capacity(rows);
            for row in 0..rows {
                let value = decode_plain_slot(field_type, section)?;
                values.push(if validity.get(row) { value } else { Value::Null });
            }
            Ok(values)
        }
        EncodingKind::Dictionary => {
            let dict_len = section.read_u32()? as usize;
            let mut dictionary = Vec::with_capacity(dict_len);
            for _ in 0..dict_len {
                dictionary.push(decode_plain_slot(field_type, section)?);
            }

            let mut values = Vec::with_capacity(rows);
            for row in 0..rows {
                let index = section.read_u32()? as usize;
                if !validity.get(row) {
                    values.push(Value::Null);
                    continue;
                }
                let value = dictionary
                    .get(index)
                    .ok_or_else(|| Error::corrupt("dictionary index out of range"))?;
                values.push(value.clone());
            }
            Ok(values)
        }
    }
}

/// Decode one plain-encoded value slot.
fn decode_plain_slot(field_type: &FieldType, section: &mut ByteReader<'_>) -> Result<Value> {
    match field_type {
        FieldType::Boolean => Ok(Value::Bool(section.take(1)?[0] != 0)),
        FieldType::Int64 => {
            let bytes = section.take(8)?;
            let mut word = [0u8; 8];
            word.copy_from_slice(bytes);
            Ok(Value::Number(Number::from(i64::from_le_bytes(word))))
        }
        FieldType::Double => {
            let bytes = section.take(8)?;
            let mut word = [0u8; 8];
            word.copy_from_slice(bytes);
            let v = f64::from_le_bytes(word);
            // JSON has no NaN/Inf; non-finite doubles decode to null.
            Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
        }
        FieldType::Utf8 => {
            let len = section.read_u32()? as usize;
            let bytes = section.take(len)?;
            let text = std::str::from_utf8(bytes)
                .map_err(|_| Error::corrupt("invalid utf8 in string page"))?;
            Ok(Value::String(text.to_string()))
        }
        _ => Err(Error::corrupt("nested type in scalar page")),
    }
}

/// Quick integrity check: both magic markers present.
pub fn is_columnar_file(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() * 2 + 4
        && data[..MAGIC.len()] == MAGIC
        && data[data.len() - MAGIC.len()..] == MAGIC
}
