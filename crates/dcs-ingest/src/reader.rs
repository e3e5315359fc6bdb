//! Format detection and the single entry point for loading tables.

use std::path::Path;

use dcs_model::Table;

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};
use crate::excel::read_excel_table;
use crate::json::read_json_table;

/// Input formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
    Json,
}

impl TableFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Excel),
            "json" => Ok(Self::Json),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Load a table, choosing the reader from the file extension.
pub fn read_table(path: &Path) -> Result<Table> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv_table(path),
        TableFormat::Excel => read_excel_table(path),
        TableFormat::Json => read_json_table(path),
    }
}
