//! Converter configuration
//!
//! An explicit, immutable configuration value threaded through the
//! builder and the encoder. No process-wide mutable state.

/// Byte-level compression applied to encoded pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression, pages stored raw
    None,
    /// LZ4 block compression
    #[default]
    Lz4,
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Lz4 => write!(f, "lz4"),
        }
    }
}

/// Configuration for the conversion pipeline
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Flush a row group once it holds this many rows
    row_group_max_rows: usize,
    /// Flush a row group once its estimated size reaches this many bytes
    row_group_max_bytes: usize,
    /// Page compression codec
    compression: Compression,
    /// Consider dictionary encoding for low-cardinality columns
    dictionary_enabled: bool,
    /// Use dictionary encoding when distinct count < row count * fraction
    max_dictionary_fraction: f64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            row_group_max_rows: 128 * 1024,
            row_group_max_bytes: 128 * 1024 * 1024,
            compression: Compression::default(),
            dictionary_enabled: true,
            max_dictionary_fraction: 0.5,
        }
    }
}

impl ConverterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row threshold for flushing a row group
    #[must_use]
    pub fn with_row_group_max_rows(mut self, rows: usize) -> Self {
        self.row_group_max_rows = rows.max(1);
        self
    }

    /// Set the byte threshold for flushing a row group
    #[must_use]
    pub fn with_row_group_max_bytes(mut self, bytes: usize) -> Self {
        self.row_group_max_bytes = bytes.max(1);
        self
    }

    /// Set the page compression codec
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Set the distinct-value fraction below which dictionary encoding is used
    #[must_use]
    pub fn with_max_dictionary_fraction(mut self, fraction: f64) -> Self {
        self.max_dictionary_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Get the row-group row threshold
    #[must_use]
    pub fn row_group_max_rows(&self) -> usize {
        self.row_group_max_rows
    }

    /// Get the row-group byte threshold
    #[must_use]
    pub fn row_group_max_bytes(&self) -> usize {
        self.row_group_max_bytes
    }

    /// Get the page compression codec
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Get dictionary encoding enabled
    #[must_use]
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Get the dictionary distinct-value fraction
    #[must_use]
    pub fn max_dictionary_fraction(&self) -> f64 {
        self.max_dictionary_fraction
    }
}
