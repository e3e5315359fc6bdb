//! Scalar cell values.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Display layout for datetime cells.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single raw value inside a column.
///
/// `Null` and NaN floats are both treated as the native "no value" marker;
/// see [`CellValue::is_null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

/// Hashable identity of a cell, used for distinct counts and row dedupe.
///
/// Values of different kinds never compare equal (`Int(1)` vs `Text("1")`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Construct a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Returns true for the native null marker (`Null` or a NaN float).
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns true for `Int` and `Float` cells (NaN included).
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// Numeric view of the cell, if it holds a non-NaN number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Borrow the text of a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The cell rendered as text.
    ///
    /// Integral floats keep a trailing `.0` so that `1.0` and `1` stay
    /// distinguishable after conversion to text.
    pub fn text_form(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) => format_float(*v),
            CellValue::Text(s) => s.clone(),
            CellValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        }
    }

    /// Hashable identity of this value.
    pub fn key(&self) -> CellKey {
        match self {
            CellValue::Null => CellKey::Null,
            CellValue::Bool(b) => CellKey::Bool(*b),
            CellValue::Int(v) => CellKey::Int(*v),
            CellValue::Float(v) if v.is_nan() => CellKey::Null,
            // -0.0 and 0.0 are the same value
            CellValue::Float(v) if *v == 0.0 => CellKey::Float(0f64.to_bits()),
            CellValue::Float(v) => CellKey::Float(v.to_bits()),
            CellValue::Text(s) => CellKey::Text(s.clone()),
            CellValue::DateTime(dt) => CellKey::DateTime(*dt),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text_form())
    }
}

/// Cells serialize as plain scalars: `Null` and non-finite floats as null,
/// datetimes in [`DATETIME_FORMAT`].
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Int(v) => serializer.serialize_i64(*v),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Float(_) => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::DateTime(dt) => {
                serializer.collect_str(&dt.format(DATETIME_FORMAT))
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// Format a float the way a dataframe would print it.
///
/// ```
/// use dcs_model::format_float;
///
/// assert_eq!(format_float(1.0), "1.0");
/// assert_eq!(format_float(1000.5), "1000.5");
/// assert_eq!(format_float(-3.0), "-3.0");
/// assert_eq!(format_float(f64::NAN), "NaN");
/// ```
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = v.to_string();
    if s.contains('.') { s } else { format!("{s}.0") }
}
