//! Error types for parqlite
//!
//! This module defines the error hierarchy for the whole conversion
//! pipeline. All public APIs return `Result<T, Error>` where Error is
//! defined here. Every error is fatal for the conversion that raised
//! it; there is no partial or resumable output.

use thiserror::Error;

/// The main error type for parqlite
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Input shape error: {message}")]
    InputShape { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse JSON at line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    // ============================================================================
    // Builder Errors
    // ============================================================================
    #[error("Type mismatch for field '{field}' at record {record}: {message}")]
    TypeMismatch {
        field: String,
        record: usize,
        message: String,
    },

    // ============================================================================
    // Encoder Errors
    // ============================================================================
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Corrupt columnar file: {message}")]
    CorruptFile { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an input shape error
    pub fn input_shape(message: impl Into<String>) -> Self {
        Self::InputShape {
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        record: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            record,
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a corrupt file error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptFile {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for parqlite
pub type Result<T> = std::result::Result<T, Error>;
