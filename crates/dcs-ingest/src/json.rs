//! JSON records: an array of flat objects, one per row.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use dcs_model::{CellValue, Column, Table};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::file::{check_file_size, open_error};

/// One JSON object with its keys in document order.
struct Record(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Record, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    fields.push((key, value));
                }
                Ok(Record(fields))
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Converts a JSON scalar to a cell; nested values keep their JSON text.
pub fn json_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => n.as_f64().map_or(CellValue::Null, CellValue::Float),
        },
        Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}

/// Builds a table from records; columns appear in first-seen key order and
/// absent keys are null.
fn records_to_table(records: Vec<Record>) -> Result<Table> {
    let height = records.len();
    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<CellValue>> = Vec::new();

    for (row, record) in records.into_iter().enumerate() {
        for (key, value) in record.0 {
            let idx = match names.iter().position(|n| *n == key) {
                Some(idx) => idx,
                None => {
                    names.push(key);
                    columns.push(vec![CellValue::Null; height]);
                    names.len() - 1
                }
            };
            columns[idx][row] = json_cell(value);
        }
    }

    Ok(Table::new(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )?)
}

/// Reads a records-oriented JSON file into a table.
pub fn read_json_table(path: &Path) -> Result<Table> {
    check_file_size(path)?;
    let file = File::open(path).map_err(|e| open_error(path, e))?;

    let records: Vec<Record> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| IngestError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    if records.is_empty() {
        return Err(IngestError::EmptyDataFrame {
            path: path.to_path_buf(),
        });
    }

    let table = records_to_table(records)?;
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "loaded JSON"
    );
    Ok(table)
}

/// Serializes a table as an array of objects in column order.
struct Records<'a>(&'a Table);

struct RowRef<'a> {
    table: &'a Table,
    index: usize,
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let height = self.0.height();
        let mut seq = serializer.serialize_seq(Some(height))?;
        for index in 0..height {
            seq.serialize_element(&RowRef {
                table: self.0,
                index,
            })?;
        }
        seq.end()
    }
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.table.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for column in columns {
            map.serialize_entry(column.name(), &column.values()[self.index])?;
        }
        map.end()
    }
}

/// Writes a table as pretty-printed JSON records (two-space indent).
pub fn write_json_table(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &Records(table)).map_err(|e| {
        IngestError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    writer.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = table.height(), "wrote JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_records_keep_key_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"zeta": 1, "alpha": "$5"}}, {{"alpha": null, "mid": true}}]"#
        )
        .unwrap();

        let table = read_json_table(file.path()).unwrap();
        assert_eq!(table.column_names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            table.column("zeta").unwrap().values(),
            &[CellValue::Int(1), CellValue::Null]
        );
        assert_eq!(
            table.column("mid").unwrap().values(),
            &[CellValue::Null, CellValue::Bool(true)]
        );
    }

    #[test]
    fn test_rejects_non_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"a": [1, 2]}}"#).unwrap();
        assert!(matches!(
            read_json_table(file.path()),
            Err(IngestError::Json { .. })
        ));
    }

    #[test]
    fn test_write_pretty_records() {
        let table = Table::new(vec![
            Column::new("b", vec![Some(1.5), None]),
            Column::new("a", vec!["x", "y"]),
        ])
        .unwrap();
        let file = NamedTempFile::new().unwrap();
        write_json_table(&table, file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"b\": 1.5,\n    \"a\": \"x\"\n  },\n  {\n    \"b\": null,\n    \"a\": \"y\"\n  }\n]"
        );
    }
}
