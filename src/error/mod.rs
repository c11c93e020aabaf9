//! Error handling for birth-record odds-ratio analysis.
//!
//! Only structural failures surface here (unreadable input, missing columns,
//! invalid configuration). Per-comparison degeneracies such as zero cells are
//! not errors; they are carried as outcomes in the result table.

use std::io;
use std::path::PathBuf;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the analysis
#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Error raised by an Arrow kernel or reader
    #[error("Arrow error: {0}")]
    ArrowError(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    ParquetError(#[from] ParquetError),

    /// Error (de)serializing JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error writing a spreadsheet workbook
    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    /// Invalid null-token pattern for the CSV reader
    #[error("Pattern error: {0}")]
    RegexError(#[from] regex::Error),

    /// A column required by the analysis is absent from the input
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A column exists but does not hold integer codes
    #[error("Column '{column}' is not an integer-coded column (found {data_type})")]
    ColumnType {
        /// Column name
        column: String,
        /// Type found in the input
        data_type: DataType,
    },

    /// Two masks, or a mask and a record set, disagree in length
    #[error("Mask length ({mask}) doesn't match row count ({rows})")]
    MaskLength {
        /// Length of the offending mask
        mask: usize,
        /// Expected number of rows
        rows: usize,
    },

    /// Invalid analysis configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input or output file whose format cannot be inferred
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl OddsError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, OddsError>;
