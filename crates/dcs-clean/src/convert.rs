//! Explicit column type conversion.

use std::fmt;
use std::str::FromStr;

use dcs_infer::datetime::parse_datetime;
use dcs_model::{CellValue, Column, SemanticType, StorageKind};
use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result};

/// Storage a column can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    #[serde(rename = "int", alias = "integer")]
    Integer,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "str", alias = "text", alias = "string")]
    Text,
    #[serde(rename = "datetime")]
    DateTime,
    /// Text storage, recorded as categorical.
    #[serde(rename = "category")]
    Category,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Float => "float",
            Self::Text => "str",
            Self::DateTime => "datetime",
            Self::Category => "category",
        }
    }

    pub fn storage(&self) -> StorageKind {
        match self {
            Self::Integer => StorageKind::Integer,
            Self::Float => StorageKind::Float,
            Self::Text | Self::Category => StorageKind::Text,
            Self::DateTime => StorageKind::DateTime,
        }
    }

    /// Semantic type implied by the conversion; `None` when the column should
    /// be reclassified instead.
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Self::Integer | Self::Float => Some(SemanticType::Numerical),
            Self::DateTime => Some(SemanticType::DateTime),
            Self::Category => Some(SemanticType::Categorical),
            Self::Text => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" | "int64" => Ok(Self::Integer),
            "float" | "float64" | "double" => Ok(Self::Float),
            "str" | "string" | "text" => Ok(Self::Text),
            "datetime" | "date" => Ok(Self::DateTime),
            "category" | "categorical" => Ok(Self::Category),
            other => Err(format!("unknown target type '{other}'")),
        }
    }
}

/// Convert every non-null cell of `column` to `target`.
///
/// Nulls stay null. Fails on the first cell that cannot be converted.
pub fn convert_column(column: &Column, target: TargetType) -> Result<Column> {
    let values = column
        .values()
        .iter()
        .enumerate()
        .map(|(row, value)| {
            if value.is_null() {
                return Ok(CellValue::Null);
            }
            convert_cell(value, target).ok_or_else(|| CleanError::Conversion {
                column: column.name().to_string(),
                target,
                row,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Column::with_storage(column.name(), values, target.storage()))
}

fn convert_cell(value: &CellValue, target: TargetType) -> Option<CellValue> {
    match target {
        TargetType::Integer => to_integer(value).map(CellValue::Int),
        TargetType::Float => to_float(value).map(CellValue::Float),
        TargetType::Text | TargetType::Category => Some(CellValue::Text(value.text_form())),
        TargetType::DateTime => match value {
            CellValue::DateTime(dt) => Some(CellValue::DateTime(*dt)),
            CellValue::Text(text) => parse_datetime(text).map(CellValue::DateTime),
            _ => None,
        },
    }
}

/// Floats truncate toward zero; non-finite floats fail.
fn to_integer(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Int(v) => Some(*v),
        CellValue::Bool(b) => Some(i64::from(*b)),
        CellValue::Float(v) if v.is_finite() => {
            let truncated = v.trunc();
            (truncated >= i64::MIN as f64 && truncated < i64::MAX as f64)
                .then_some(truncated as i64)
        }
        CellValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Int(v) => Some(*v as f64),
        CellValue::Float(v) => Some(*v),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_integer() {
        let col = Column::new("age", vec![Some(" 42"), None, Some("7")]);
        let out = convert_column(&col, TargetType::Integer).unwrap();
        assert_eq!(out.storage(), StorageKind::Integer);
        assert_eq!(
            out.values(),
            &[CellValue::Int(42), CellValue::Null, CellValue::Int(7)]
        );
    }

    #[test]
    fn test_float_truncates_to_integer() {
        let col = Column::new("x", vec![1.9, -2.5]);
        let out = convert_column(&col, TargetType::Integer).unwrap();
        assert_eq!(out.values(), &[CellValue::Int(1), CellValue::Int(-2)]);
    }

    #[test]
    fn test_conversion_reports_first_bad_row() {
        let col = Column::new("x", vec!["1", "2", "three", "four"]);
        let err = convert_column(&col, TargetType::Float).unwrap_err();
        assert!(matches!(
            err,
            CleanError::Conversion { row: 2, target: TargetType::Float, .. }
        ));
    }

    #[test]
    fn test_to_text_keeps_nulls() {
        let col = Column::new("x", vec![Some(1.5), None]);
        let out = convert_column(&col, TargetType::Text).unwrap();
        assert_eq!(out.values(), &[CellValue::text("1.5"), CellValue::Null]);
        assert_eq!(out.storage(), StorageKind::Text);
    }

    #[test]
    fn test_to_category_keeps_text_storage() {
        let col = Column::new("grade", vec![Some(1i64), None, Some(2)]);
        let out = convert_column(&col, TargetType::Category).unwrap();
        assert_eq!(out.storage(), StorageKind::Text);
        assert_eq!(
            out.values(),
            &[CellValue::text("1"), CellValue::Null, CellValue::text("2")]
        );
        assert_eq!(
            TargetType::Category.semantic_type(),
            Some(SemanticType::Categorical)
        );
    }

    #[test]
    fn test_to_datetime() {
        let col = Column::new("d", vec!["2024-01-15", "03/01/2024"]);
        let out = convert_column(&col, TargetType::DateTime).unwrap();
        assert_eq!(out.storage(), StorageKind::DateTime);
        assert_eq!(out.values()[0].text_form(), "2024-01-15 00:00:00");

        let ints = Column::new("d", vec![20240115i64]);
        assert!(convert_column(&ints, TargetType::DateTime).is_err());
    }

    #[test]
    fn test_target_names() {
        assert_eq!("Integer".parse::<TargetType>(), Ok(TargetType::Integer));
        assert_eq!("str".parse::<TargetType>(), Ok(TargetType::Text));
        assert_eq!("Category".parse::<TargetType>(), Ok(TargetType::Category));
        assert!("decimal".parse::<TargetType>().is_err());
        assert_eq!(TargetType::Text.to_string(), "str");
    }
}
