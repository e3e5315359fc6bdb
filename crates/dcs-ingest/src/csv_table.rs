//! CSV loading through Polars.

use std::path::Path;

use dcs_model::Table;
use polars::prelude::*;
use tracing::{info, warn};

use crate::convert::dataframe_to_table;
use crate::error::{IngestError, Result};
use crate::file::{check_file_size, validate_encoding};

/// Rows scanned when inferring the CSV schema.
pub const INFER_SCHEMA_ROWS: usize = 100;

/// Field values read as null, matching the usual dataframe defaults.
pub const CSV_NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Validate DataFrame shape after loading.
///
/// Rejects frames without rows and headers with blank names; warns about
/// very wide datasets.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::EmptyDataFrame {
            path: path.to_path_buf(),
        });
    }

    if df.width() > 500 {
        warn!(
            path = %path.display(),
            columns = df.width(),
            "Dataset has more than 500 columns - may impact performance"
        );
    }

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Reads a CSV file (first row is the header) into a Polars DataFrame.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;
    validate_encoding(path)?;

    let null_values = NullValues::AllColumns(CSV_NULL_TOKENS.iter().map(|t| (*t).into()).collect());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_dataframe_shape(&df, path)?;
    Ok(df)
}

/// Reads a CSV file into a table.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let df = read_csv_frame(path)?;
    let table = dataframe_to_table(&df)?;
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "loaded CSV"
    );
    Ok(table)
}
