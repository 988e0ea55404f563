//! On-disk layout
//!
//! File layout:
//!
//! ```text
//! +-------+------------------+-----+------------------+--------+------------+-------+
//! | magic | row group 0      | ... | row group N-1    | footer | footer len | magic |
//! +-------+------------------+-----+------------------+--------+------------+-------+
//! ```
//!
//! A row group is one column chunk per schema field, in schema order.
//! A column chunk is one or more pages; nested chunks place child
//! pages directly after the parent's page. Each page starts with a
//! fixed-size `PageHeader`. The footer is a bincode-encoded
//! `FileFooter` and the trailer is its byte length (u32 LE) followed
//! by the closing magic, so truncation is detectable without reading
//! the footer.

use crate::error::{Error, Result};
use crate::format::stats::ColumnStats;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// 4-byte marker opening and closing every file
pub const MAGIC: [u8; 4] = *b"JCF1";

/// Current format version, recorded in the footer
pub const FORMAT_VERSION: u32 = 1;

/// Page value encoding
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingKind {
    /// Fixed-width or length-prefixed values, one slot per row
    Plain = 0,
    /// Deduplicated value list plus one u32 index per row
    Dictionary = 1,
}

impl TryFrom<u8> for EncodingKind {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(EncodingKind::Plain),
            1 => Ok(EncodingKind::Dictionary),
            other => Err(Error::corrupt(format!("unknown encoding id {other}"))),
        }
    }
}

/// Page compression codec id
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    None = 0,
    Lz4 = 1,
}

impl TryFrom<u8> for CodecKind {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(CodecKind::None),
            1 => Ok(CodecKind::Lz4),
            other => Err(Error::corrupt(format!("unknown codec id {other}"))),
        }
    }
}

/// Fixed-size header in front of every page body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    pub encoding: EncodingKind,
    pub codec: CodecKind,
    pub row_count: u32,
    pub uncompressed_len: u32,
    pub compressed_len: u32,
}

impl PageHeader {
    pub const LEN: usize = 1 + 1 + 4 + 4 + 4;

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.encoding as u8);
        buf.push(self.codec as u8);
        buf.extend_from_slice(&self.row_count.to_le_bytes());
        buf.extend_from_slice(&self.uncompressed_len.to_le_bytes());
        buf.extend_from_slice(&self.compressed_len.to_le_bytes());
    }

    pub fn read_from(slice: &[u8]) -> Result<Self> {
        if slice.len() < Self::LEN {
            return Err(Error::corrupt("truncated page header"));
        }
        let mut word = [0u8; 4];
        word.copy_from_slice(&slice[2..6]);
        let row_count = u32::from_le_bytes(word);
        word.copy_from_slice(&slice[6..10]);
        let uncompressed_len = u32::from_le_bytes(word);
        word.copy_from_slice(&slice[10..14]);
        let compressed_len = u32::from_le_bytes(word);
        Ok(Self {
            encoding: EncodingKind::try_from(slice[0])?,
            codec: CodecKind::try_from(slice[1])?,
            row_count,
            uncompressed_len,
            compressed_len,
        })
    }
}

/// Metadata for one column chunk within a row group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnChunkMeta {
    /// Top-level field name this chunk belongs to
    pub name: String,
    /// Absolute byte offset of the chunk's first page
    pub offset: u64,
    /// Total encoded size of the chunk, child pages included
    pub byte_size: u64,
    /// Statistics gathered while encoding
    pub stats: ColumnStats,
}

/// Metadata for one row group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowGroupMeta {
    /// Absolute byte offset of the row group
    pub offset: u64,
    /// Total encoded size of the row group
    pub byte_size: u64,
    /// Row count, identical across all chunks of the group
    pub rows: u64,
    pub columns: Vec<ColumnChunkMeta>,
}

/// Trailing file metadata, written once after all row groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFooter {
    pub version: u32,
    pub schema: Schema,
    pub row_groups: Vec<RowGroupMeta>,
    pub total_rows: u64,
}
