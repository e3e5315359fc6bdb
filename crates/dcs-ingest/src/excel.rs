//! Spreadsheets: loading through calamine, export through rust_xlsxwriter.
//!
//! Reads the first worksheet of `.xlsx`, `.xlsm`, `.xls` and `.ods` files. The
//! first row is the header; fully blank rows are skipped. Exports are `.xlsx`
//! workbooks with a single [`EXCEL_SHEET_NAME`] sheet.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use dcs_model::{CellValue, Column, Table};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, XlsxError};
use tracing::info;

use crate::error::{IngestError, Result};
use crate::file::check_file_size;

/// Converts a spreadsheet cell.
///
/// Integral floats become integers, since spreadsheets store every number as
/// a float. Error cells (`#DIV/0!`, ...) keep their display text.
pub fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => float_cell(*v),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map_or_else(|| CellValue::Text(cell.to_string()), CellValue::DateTime),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn float_cell(v: f64) -> CellValue {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        CellValue::Int(v as i64)
    } else {
        CellValue::Float(v)
    }
}

/// Header names with blanks filled in and duplicates suffixed (`a`, `a.1`).
pub fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

/// Reads the first worksheet of a spreadsheet into a table.
pub fn read_excel_table(path: &Path) -> Result<Table> {
    check_file_size(path)?;

    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Excel {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| IngestError::Excel {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| IngestError::EmptyDataFrame {
        path: path.to_path_buf(),
    })?;
    let headers = unique_headers(
        header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
    );

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        for (idx, values) in columns.iter_mut().enumerate() {
            values.push(row.get(idx).map_or(CellValue::Null, excel_cell));
        }
    }

    let table = Table::new(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )?;
    if table.height() == 0 {
        return Err(IngestError::EmptyDataFrame {
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "loaded spreadsheet"
    );
    Ok(table)
}

/// Name of the worksheet written by [`write_excel_table`].
pub const EXCEL_SHEET_NAME: &str = "Cleaned Data";

/// Writes a table as a single-sheet workbook with a header row.
///
/// Numbers and booleans keep their cell type; datetimes and text are written
/// as their text form. Null and NaN cells stay empty.
pub fn write_excel_table(table: &Table, path: &Path) -> Result<()> {
    let serialize_error = |e: XlsxError| IngestError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(EXCEL_SHEET_NAME)
        .map_err(serialize_error)?;
    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = ColNum::try_from(col_idx).map_err(|_| too_large(path, "columns"))?;
        worksheet
            .write_string(0, col, column.name())
            .map_err(serialize_error)?;
        for (row_idx, value) in column.values().iter().enumerate() {
            let row = RowNum::try_from(row_idx + 1).map_err(|_| too_large(path, "rows"))?;
            match value {
                CellValue::Null => {}
                CellValue::Float(v) if v.is_nan() => {}
                CellValue::Float(v) if v.is_finite() => {
                    worksheet
                        .write_number(row, col, *v)
                        .map_err(serialize_error)?;
                }
                CellValue::Int(v) => {
                    worksheet
                        .write_number(row, col, *v as f64)
                        .map_err(serialize_error)?;
                }
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row, col, *b)
                        .map_err(serialize_error)?;
                }
                CellValue::Text(text) => {
                    worksheet
                        .write_string(row, col, text)
                        .map_err(serialize_error)?;
                }
                CellValue::Float(_) | CellValue::DateTime(_) => {
                    worksheet
                        .write_string(row, col, value.text_form())
                        .map_err(serialize_error)?;
                }
            }
        }
    }
    workbook.save(path).map_err(serialize_error)?;

    info!(path = %path.display(), rows = table.height(), "wrote spreadsheet");
    Ok(())
}

fn too_large(path: &Path, what: &str) -> IngestError {
    IngestError::Serialize {
        path: path.to_path_buf(),
        message: format!("too many {what} for a worksheet"),
    }
}
