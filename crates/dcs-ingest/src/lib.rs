//! Table ingestion and export.
//!
//! Reads CSV (through Polars), spreadsheets (through calamine) and JSON
//! records into [`dcs_model::Table`]s, and writes cleaned tables and audit
//! logs back out.
//!
//! - [`read_table`] picks the reader from the file extension
//! - [`write_table`] writes CSV, pretty-printed JSON records or an `.xlsx`
//!   workbook
//! - [`write_audit_log`] writes a session's audit trail as CSV

mod convert;
mod csv_table;
mod error;
mod excel;
mod export;
mod file;
mod json;
mod reader;

// Error type
pub use error::{IngestError, Result};

// File checks
pub use file::{MAX_FILE_SIZE, check_file_size, check_file_size_with_limit, validate_encoding};

// Readers
pub use csv_table::{
    CSV_NULL_TOKENS, INFER_SCHEMA_ROWS, read_csv_frame, read_csv_table, validate_dataframe_shape,
};
pub use excel::{
    EXCEL_SHEET_NAME, excel_cell, read_excel_table, unique_headers, write_excel_table,
};
pub use json::{json_cell, read_json_table};
pub use reader::{TableFormat, read_table};

// Writers
pub use export::{ExportFormat, write_audit_log, write_csv_table, write_table};
pub use json::write_json_table;

// DataFrame conversion
pub use convert::{any_to_cell, dataframe_to_table, storage_for_dtype, table_to_dataframe};
