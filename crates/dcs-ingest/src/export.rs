//! Writing cleaned tables and audit logs.

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use dcs_clean::AuditLog;
use dcs_model::Table;
use polars::prelude::{CsvWriter, SerWriter};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::convert::table_to_dataframe;
use crate::error::{IngestError, Result};
use crate::excel::write_excel_table;
use crate::json::write_json_table;

/// Output format for cleaned tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    #[serde(rename = "xlsx", alias = "excel")]
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xlsx" | "excel" => Ok(Self::Excel),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Writes a table as CSV with a header row and no index column.
pub fn write_csv_table(table: &Table, path: &Path) -> Result<()> {
    let mut df = table_to_dataframe(table)?;
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| IngestError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(path = %path.display(), rows = table.height(), "wrote CSV");
    Ok(())
}

/// Writes a table in the given format.
pub fn write_table(table: &Table, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv_table(table, path),
        ExportFormat::Json => write_json_table(table, path),
        ExportFormat::Excel => write_excel_table(table, path),
    }
}

/// Writes the rendered audit log as a one-column CSV (`Action`).
pub fn write_audit_log(log: &AuditLog, path: &Path) -> Result<()> {
    let serialize_error = |e: csv::Error| IngestError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(serialize_error)?;
    writer.write_record(["Action"]).map_err(serialize_error)?;
    for entry in log {
        writer
            .write_record([entry.to_string()])
            .map_err(serialize_error)?;
    }
    writer.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), entries = log.len(), "wrote audit log");
    Ok(())
}
