//! Columns, storage kinds and missing masks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// Native storage representation of a column.
///
/// This is the raw representation the values arrived in, distinct from the
/// semantic type the classifier infers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Boolean,
    Integer,
    Float,
    DateTime,
    Text,
}

impl StorageKind {
    /// Returns true for integer and float storage.
    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageKind::Integer | StorageKind::Float)
    }

    /// Returns true for free-form text storage.
    pub fn is_text(&self) -> bool {
        matches!(self, StorageKind::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Boolean => "bool",
            StorageKind::Integer => "int64",
            StorageKind::Float => "float64",
            StorageKind::DateTime => "datetime",
            StorageKind::Text => "str",
        }
    }

    /// Infer the storage kind from the non-null values.
    ///
    /// Any text, or a mix of kinds that is not purely numeric, yields `Text`.
    /// An all-null column is stored as `Float`.
    pub fn infer(values: &[CellValue]) -> StorageKind {
        let mut bools = false;
        let mut ints = false;
        let mut floats = false;
        let mut datetimes = false;

        for value in values {
            match value {
                CellValue::Null => {}
                CellValue::Bool(_) => bools = true,
                CellValue::Int(_) => ints = true,
                CellValue::Float(_) => floats = true,
                CellValue::DateTime(_) => datetimes = true,
                CellValue::Text(_) => return StorageKind::Text,
            }
        }

        match (bools, ints || floats, datetimes) {
            (false, false, false) => StorageKind::Float,
            (true, false, false) => StorageKind::Boolean,
            (false, false, true) => StorageKind::DateTime,
            (false, true, false) if floats => StorageKind::Float,
            (false, true, false) => StorageKind::Integer,
            _ => StorageKind::Text,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<CellValue>,
    storage: StorageKind,
}

impl Column {
    /// Create a column, inferring its storage kind from the values.
    pub fn new<V: Into<CellValue>>(name: impl Into<String>, values: Vec<V>) -> Self {
        let values: Vec<CellValue> = values.into_iter().map(Into::into).collect();
        let storage = StorageKind::infer(&values);
        Self {
            name: name.into(),
            values,
            storage,
        }
    }

    /// Create a column with an explicit storage kind.
    pub fn with_storage(
        name: impl Into<String>,
        values: Vec<CellValue>,
        storage: StorageKind,
    ) -> Self {
        Self {
            name: name.into(),
            values,
            storage,
        }
    }

    /// Anonymous column, for callers that only hold a sequence of values.
    pub fn from_values(values: Vec<CellValue>) -> Self {
        Self::new(String::new(), values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// Iterate over non-null values (native null check only).
    pub fn non_null(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Number of native nulls.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Replace all values and re-infer storage.
    pub fn replace_values(&mut self, values: Vec<CellValue>) {
        self.storage = StorageKind::infer(&values);
        self.values = values;
    }

    /// Replace all values, keeping an explicit storage kind.
    pub fn replace_values_with_storage(&mut self, values: Vec<CellValue>, storage: StorageKind) {
        self.values = values;
        self.storage = storage;
    }

    /// Keep only the cells whose mask entry is true.
    pub(crate) fn retain_by(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.values.retain(|_| flags.next().copied().unwrap_or(false));
    }

    pub fn into_values(self) -> Vec<CellValue> {
        self.values
    }
}

/// Per-cell missing flags aligned 1:1 with a column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MissingMask(Vec<bool>);

impl MissingMask {
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// Number of missing cells.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|m| **m).count()
    }

    /// Fraction of cells that are missing; 0.0 for an empty mask.
    pub fn ratio(&self) -> f64 {
        if self.0.is_empty() {
            0.0
        } else {
            self.count() as f64 / self.0.len() as f64
        }
    }

    pub fn is_missing(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|m| *m)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, bool>> {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Flags inverted: true where the cell holds a value.
    pub fn present(&self) -> Vec<bool> {
        self.0.iter().map(|m| !m).collect()
    }
}

impl From<MissingMask> for Vec<bool> {
    fn from(mask: MissingMask) -> Self {
        mask.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_storage() {
        assert_eq!(
            StorageKind::infer(&[CellValue::Int(1), CellValue::Null]),
            StorageKind::Integer
        );
        assert_eq!(
            StorageKind::infer(&[CellValue::Int(1), CellValue::Float(2.5)]),
            StorageKind::Float
        );
        assert_eq!(
            StorageKind::infer(&[CellValue::Int(1), CellValue::text("a")]),
            StorageKind::Text
        );
        assert_eq!(
            StorageKind::infer(&[CellValue::Bool(true), CellValue::Int(1)]),
            StorageKind::Text
        );
        assert_eq!(StorageKind::infer(&[CellValue::Null]), StorageKind::Float);
        assert_eq!(StorageKind::infer(&[]), StorageKind::Float);
    }

    #[test]
    fn test_column_new_infers_storage() {
        let col = Column::new("age", vec![25i64, 30, 35]);
        assert_eq!(col.storage(), StorageKind::Integer);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_non_null_skips_nan() {
        let col = Column::new("x", vec![Some(1.0), None, Some(f64::NAN)]);
        assert_eq!(col.non_null().count(), 1);
        assert_eq!(col.null_count(), 2);
    }

    #[test]
    fn test_missing_mask_stats() {
        let mask = MissingMask::new(vec![true, false, true, false]);
        assert_eq!(mask.count(), 2);
        assert!((mask.ratio() - 0.5).abs() < f64::EPSILON);
        assert!(mask.is_missing(0));
        assert!(!mask.is_missing(10));
        assert_eq!(mask.present(), vec![false, true, false, true]);
    }

    #[test]
    fn test_missing_mask_iter_reverses() {
        let mask = MissingMask::new(vec![true, false, false]);
        let values = ["a", "b", "c"];
        let last_present: Vec<(&&str, bool)> = values.iter().zip(mask.iter()).rev().collect();
        assert_eq!(last_present, vec![(&"c", false), (&"b", false), (&"a", true)]);
    }
}
