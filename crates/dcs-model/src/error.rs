//! Error types for the tabular data model.

use thiserror::Error;

/// Errors raised when a table or configuration is structurally invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    // === Table Structure Errors ===
    /// Two columns share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// Column not present in the table.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// Column length differs from the table height.
    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Row mask does not line up with the table.
    #[error("row mask has {found} entries, table has {expected} rows")]
    MaskLength { expected: usize, found: usize },

    /// Column names must not be blank.
    #[error("column name must not be empty")]
    EmptyColumnName,

    // === Currency Format Errors ===
    /// Separator character outside the supported set.
    #[error("unsupported {kind} separator '{value}'")]
    InvalidSeparator { kind: &'static str, value: char },

    /// Decimal and thousands separators are the same character.
    #[error("decimal and thousands separators must differ (both '{separator}')")]
    ConflictingSeparators { separator: char },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
