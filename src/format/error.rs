//! Error types for annotation table operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, validating or writing a table.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
    },

    /// A row does not have one cell per header column
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based data row index
        row: usize,
        /// Number of header columns
        expected: usize,
        /// Number of cells in the row
        found: usize,
    },

    /// File not found at expected path
    #[error("File not found: {path:?}")]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },
}

impl FormatError {
    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}
