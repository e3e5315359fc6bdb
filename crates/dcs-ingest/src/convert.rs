//! Conversion between Polars DataFrames and [`Table`]s.

use dcs_model::{CellValue, Column as TableColumn, StorageKind, Table};
use polars::prelude::*;

use crate::error::Result;

/// Converts a Polars `AnyValue` to a cell.
///
/// Integers widen to `i64`; `u64` values beyond `i64::MAX` become floats.
/// Types without a cell counterpart fall back to their display text.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Bool(b),
        AnyValue::Int8(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int16(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int32(v) => CellValue::Int(i64::from(v)),
        AnyValue::Int64(v) => CellValue::Int(v),
        AnyValue::UInt8(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => CellValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int),
        AnyValue::Float32(v) => CellValue::Float(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Float(v),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        other => {
            let s = other.to_string();
            // Strip surrounding quotes that might come from formatting
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                CellValue::Text(s[1..s.len() - 1].to_string())
            } else {
                CellValue::Text(s)
            }
        }
    }
}

/// Storage kind for a Polars dtype.
///
/// All-null columns (`DataType::Null`) are float, the way a dataframe stores
/// a column of missing values.
pub fn storage_for_dtype(dtype: &DataType) -> StorageKind {
    if dtype.is_bool() {
        StorageKind::Boolean
    } else if dtype.is_integer() {
        StorageKind::Integer
    } else if dtype.is_float() || matches!(dtype, DataType::Null) {
        StorageKind::Float
    } else {
        StorageKind::Text
    }
}

/// Converts a DataFrame to a table, keeping the dtype of each column.
pub fn dataframe_to_table(df: &DataFrame) -> Result<Table> {
    let mut columns = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let values = (0..col.len())
            .map(|idx| col.get(idx).map(any_to_cell))
            .collect::<PolarsResult<Vec<_>>>()?;
        columns.push(TableColumn::with_storage(
            col.name().as_str(),
            values,
            storage_for_dtype(col.dtype()),
        ));
    }
    Ok(Table::new(columns)?)
}

/// Converts a table to a DataFrame.
///
/// Datetime columns are written as `YYYY-MM-DD HH:MM:SS` strings; NaN
/// becomes null.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|col| column_to_series(col).into())
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn column_to_series(col: &TableColumn) -> Series {
    let name: PlSmallStr = col.name().into();
    let values = col.values();
    match col.storage() {
        StorageKind::Boolean => {
            let data: Vec<Option<bool>> = values
                .iter()
                .map(|v| match v {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name, data)
        }
        StorageKind::Integer => {
            let data: Vec<Option<i64>> = values
                .iter()
                .map(|v| match v {
                    CellValue::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Series::new(name, data)
        }
        StorageKind::Float => {
            let data: Vec<Option<f64>> = values
                .iter()
                .map(|v| if v.is_null() { None } else { v.as_f64() })
                .collect();
            Series::new(name, data)
        }
        StorageKind::DateTime | StorageKind::Text => {
            let data: Vec<Option<String>> = values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.text_form()))
                .collect();
            Series::new(name, data)
        }
    }
}
