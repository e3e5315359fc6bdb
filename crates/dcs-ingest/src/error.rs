//! Error types for table ingestion and export.

use std::path::PathBuf;

use dcs_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading or writing tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write an output file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is too large ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File uses an unsupported text encoding.
    #[error("unsupported encoding {encoding} in {path}; save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Extension not handled by any reader.
    #[error("unsupported file format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open or read a spreadsheet.
    #[error("failed to read spreadsheet {path}: {message}")]
    Excel { path: PathBuf, message: String },

    /// Spreadsheet has no worksheet.
    #[error("no worksheet found in {path}")]
    NoWorksheet { path: PathBuf },

    /// JSON is not an array of flat records.
    #[error("invalid JSON records in {path}: {message}")]
    Json { path: PathBuf, message: String },

    /// Loaded dataset has no rows.
    #[error("dataset is empty: {path}")]
    EmptyDataFrame { path: PathBuf },

    /// Header with an empty column name.
    #[error("empty column name in {path}")]
    EmptyColumnName { path: PathBuf },

    // === Export Errors ===
    /// Failed to serialize output.
    #[error("failed to write {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    // === Table Errors ===
    /// Loaded columns do not form a valid table.
    #[error(transparent)]
    Table(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
