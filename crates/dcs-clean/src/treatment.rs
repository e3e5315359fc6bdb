//! Missing-value treatments.
//!
//! Which methods a column accepts depends on its semantic type
//! ([`treatment_options`]). Fill methods only touch the cells flagged by the
//! missing mask; the structural methods (`DropRows`, `DropColumn`) are applied
//! to the table by the session.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use dcs_model::{CellKey, CellValue, Column, MissingMask, SemanticType};
use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result};

/// Fill value for [`TreatmentMethod::ReplaceUnknown`].
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Default text for [`TreatmentMethod::Placeholder`].
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// Treatment method without its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentKind {
    Mean,
    Median,
    Mode,
    Constant,
    ForwardFill,
    BackwardFill,
    ReplaceUnknown,
    ReplaceEmpty,
    Placeholder,
    DropRows,
    DropColumn,
}

impl TreatmentKind {
    /// Human-readable label, as shown to users and written to the audit log.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mean => "Mean",
            Self::Median => "Median",
            Self::Mode => "Mode",
            Self::Constant => "Constant Value",
            Self::ForwardFill => "Forward Fill",
            Self::BackwardFill => "Backward Fill",
            Self::ReplaceUnknown => "Replace with \"Unknown\"",
            Self::ReplaceEmpty => "Replace with Empty String",
            Self::Placeholder => "Replace with Placeholder",
            Self::DropRows => "Drop Rows",
            Self::DropColumn => "Drop Column",
        }
    }

    /// Whether the method changes the table shape instead of filling cells.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DropRows | Self::DropColumn)
    }
}

impl fmt::Display for TreatmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A treatment with its parameter, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreatmentMethod {
    Mean,
    Median,
    Mode,
    Constant(String),
    ForwardFill,
    BackwardFill,
    ReplaceUnknown,
    ReplaceEmpty,
    Placeholder(String),
    DropRows,
    DropColumn,
}

impl TreatmentMethod {
    /// Build a method from its kind and optional parameter.
    ///
    /// A missing constant is the empty string; a missing placeholder is
    /// [`DEFAULT_PLACEHOLDER`].
    pub fn from_kind(kind: TreatmentKind, value: Option<String>) -> Self {
        match kind {
            TreatmentKind::Mean => Self::Mean,
            TreatmentKind::Median => Self::Median,
            TreatmentKind::Mode => Self::Mode,
            TreatmentKind::Constant => Self::Constant(value.unwrap_or_default()),
            TreatmentKind::ForwardFill => Self::ForwardFill,
            TreatmentKind::BackwardFill => Self::BackwardFill,
            TreatmentKind::ReplaceUnknown => Self::ReplaceUnknown,
            TreatmentKind::ReplaceEmpty => Self::ReplaceEmpty,
            TreatmentKind::Placeholder => {
                Self::Placeholder(value.unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()))
            }
            TreatmentKind::DropRows => Self::DropRows,
            TreatmentKind::DropColumn => Self::DropColumn,
        }
    }

    pub fn kind(&self) -> TreatmentKind {
        match self {
            Self::Mean => TreatmentKind::Mean,
            Self::Median => TreatmentKind::Median,
            Self::Mode => TreatmentKind::Mode,
            Self::Constant(_) => TreatmentKind::Constant,
            Self::ForwardFill => TreatmentKind::ForwardFill,
            Self::BackwardFill => TreatmentKind::BackwardFill,
            Self::ReplaceUnknown => TreatmentKind::ReplaceUnknown,
            Self::ReplaceEmpty => TreatmentKind::ReplaceEmpty,
            Self::Placeholder(_) => TreatmentKind::Placeholder,
            Self::DropRows => TreatmentKind::DropRows,
            Self::DropColumn => TreatmentKind::DropColumn,
        }
    }
}

impl fmt::Display for TreatmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}

const NUMERICAL_OPTIONS: &[TreatmentKind] = &[
    TreatmentKind::Mean,
    TreatmentKind::Median,
    TreatmentKind::Mode,
    TreatmentKind::Constant,
    TreatmentKind::ForwardFill,
    TreatmentKind::BackwardFill,
    TreatmentKind::DropRows,
    TreatmentKind::DropColumn,
];

const CATEGORICAL_OPTIONS: &[TreatmentKind] = &[
    TreatmentKind::Mode,
    TreatmentKind::ReplaceUnknown,
    TreatmentKind::DropRows,
    TreatmentKind::DropColumn,
];

const DATETIME_OPTIONS: &[TreatmentKind] = &[
    TreatmentKind::ForwardFill,
    TreatmentKind::BackwardFill,
    TreatmentKind::DropRows,
    TreatmentKind::DropColumn,
];

const TEXT_OPTIONS: &[TreatmentKind] = &[
    TreatmentKind::ReplaceEmpty,
    TreatmentKind::Placeholder,
    TreatmentKind::DropRows,
    TreatmentKind::DropColumn,
];

const CURRENCY_OPTIONS: &[TreatmentKind] = &[
    TreatmentKind::Mean,
    TreatmentKind::Median,
    TreatmentKind::Mode,
    TreatmentKind::Constant,
    TreatmentKind::DropRows,
    TreatmentKind::DropColumn,
];

const BOOLEAN_OPTIONS: &[TreatmentKind] = &[
    TreatmentKind::Mode,
    TreatmentKind::Constant,
    TreatmentKind::DropRows,
    TreatmentKind::DropColumn,
];

const STRUCTURAL_OPTIONS: &[TreatmentKind] = &[TreatmentKind::DropRows, TreatmentKind::DropColumn];

/// Methods offered for a semantic type, in display order.
pub fn treatment_options(semantic_type: SemanticType) -> &'static [TreatmentKind] {
    match semantic_type {
        SemanticType::Numerical => NUMERICAL_OPTIONS,
        SemanticType::Categorical => CATEGORICAL_OPTIONS,
        SemanticType::DateTime => DATETIME_OPTIONS,
        SemanticType::Text => TEXT_OPTIONS,
        SemanticType::Currency => CURRENCY_OPTIONS,
        SemanticType::Boolean => BOOLEAN_OPTIONS,
        SemanticType::Empty => STRUCTURAL_OPTIONS,
    }
}

/// Result of a fill method over one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledColumn {
    pub values: Vec<CellValue>,
    /// Cells whose value changed.
    pub filled: usize,
}

/// Apply a fill method to the cells flagged in `mask`.
///
/// Structural methods return the values unchanged.
pub fn fill_missing(
    column: &Column,
    mask: &MissingMask,
    method: &TreatmentMethod,
) -> Result<FilledColumn> {
    let values = column.values();
    let filled = match method {
        TreatmentMethod::Mean => {
            let mean = mean(&numeric_present(values, mask)).ok_or_else(|| no_numeric(column))?;
            fill_with(values, mask, &CellValue::Float(mean))
        }
        TreatmentMethod::Median => {
            let median =
                median(numeric_present(values, mask)).ok_or_else(|| no_numeric(column))?;
            fill_with(values, mask, &CellValue::Float(median))
        }
        TreatmentMethod::Mode => match mode(values, mask) {
            Some(value) => fill_with(values, mask, &value),
            None => unchanged(values),
        },
        TreatmentMethod::Constant(text) | TreatmentMethod::Placeholder(text) => {
            let value = constant_value(column, text)?;
            fill_with(values, mask, &value)
        }
        TreatmentMethod::ForwardFill => forward_fill(values, mask),
        TreatmentMethod::BackwardFill => backward_fill(values, mask),
        TreatmentMethod::ReplaceUnknown => fill_with(values, mask, &CellValue::text(UNKNOWN_LABEL)),
        TreatmentMethod::ReplaceEmpty => fill_with(values, mask, &CellValue::text("")),
        TreatmentMethod::DropRows | TreatmentMethod::DropColumn => unchanged(values),
    };
    Ok(filled)
}

fn no_numeric(column: &Column) -> CleanError {
    CleanError::NoNumericValues {
        column: column.name().to_string(),
    }
}

fn unchanged(values: &[CellValue]) -> FilledColumn {
    FilledColumn {
        values: values.to_vec(),
        filled: 0,
    }
}

fn fill_with(values: &[CellValue], mask: &MissingMask, fill: &CellValue) -> FilledColumn {
    let mut filled = 0;
    let values = values
        .iter()
        .zip(mask.iter())
        .map(|(value, missing)| {
            if missing {
                filled += 1;
                fill.clone()
            } else {
                value.clone()
            }
        })
        .collect();
    FilledColumn { values, filled }
}

fn forward_fill(values: &[CellValue], mask: &MissingMask) -> FilledColumn {
    let mut filled = 0;
    let mut last: Option<&CellValue> = None;
    let mut out = Vec::with_capacity(values.len());
    for (value, missing) in values.iter().zip(mask.iter()) {
        match (missing, last) {
            (true, Some(previous)) => {
                filled += 1;
                out.push(previous.clone());
            }
            (true, None) => out.push(value.clone()),
            (false, _) => {
                last = Some(value);
                out.push(value.clone());
            }
        }
    }
    FilledColumn {
        values: out,
        filled,
    }
}

fn backward_fill(values: &[CellValue], mask: &MissingMask) -> FilledColumn {
    let mut filled = 0;
    let mut next: Option<&CellValue> = None;
    let mut out = Vec::with_capacity(values.len());
    for (value, missing) in values.iter().zip(mask.iter()).rev() {
        match (missing, next) {
            (true, Some(following)) => {
                filled += 1;
                out.push(following.clone());
            }
            (true, None) => out.push(value.clone()),
            (false, _) => {
                next = Some(value);
                out.push(value.clone());
            }
        }
    }
    out.reverse();
    FilledColumn {
        values: out,
        filled,
    }
}

/// Numeric (`Int`/`Float`) cells not flagged missing.
fn numeric_present(values: &[CellValue], mask: &MissingMask) -> Vec<f64> {
    values
        .iter()
        .zip(mask.iter())
        .filter(|(value, missing)| !missing && value.is_numeric())
        .filter_map(|(value, _)| value.as_f64())
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent non-missing value; ties go to the smallest text form, then
/// to the smallest [`CellKey`].
fn mode(values: &[CellValue], mask: &MissingMask) -> Option<CellValue> {
    let mut counts: HashMap<CellKey, (usize, &CellValue)> = HashMap::new();
    for (value, missing) in values.iter().zip(mask.iter()) {
        if missing {
            continue;
        }
        counts.entry(value.key()).or_insert((0, value)).0 += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(key, (count, value))| (*count, Reverse((value.text_form(), key.clone()))))
        .map(|(_, (_, value))| value.clone())
}

/// Parse a user constant for the column: a number for numeric storage, text
/// otherwise.
fn constant_value(column: &Column, text: &str) -> Result<CellValue> {
    if !column.storage().is_numeric() {
        return Ok(CellValue::text(text));
    }
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(CellValue::Int(int));
    }
    trimmed
        .parse::<f64>()
        .map(CellValue::Float)
        .map_err(|_| CleanError::InvalidConstant {
            column: column.name().to_string(),
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcs_infer::detect_missing;
    use dcs_model::StorageKind;

    fn apply(column: &Column, method: &TreatmentMethod) -> FilledColumn {
        fill_missing(column, &detect_missing(column), method).unwrap()
    }

    #[test]
    fn test_options_per_type() {
        assert_eq!(treatment_options(SemanticType::Numerical).len(), 8);
        assert_eq!(
            treatment_options(SemanticType::Categorical),
            &[
                TreatmentKind::Mode,
                TreatmentKind::ReplaceUnknown,
                TreatmentKind::DropRows,
                TreatmentKind::DropColumn
            ]
        );
        assert!(!treatment_options(SemanticType::Currency).contains(&TreatmentKind::ForwardFill));
        assert_eq!(
            treatment_options(SemanticType::Empty),
            &[TreatmentKind::DropRows, TreatmentKind::DropColumn]
        );
        for semantic_type in [
            SemanticType::Empty,
            SemanticType::Boolean,
            SemanticType::Currency,
            SemanticType::DateTime,
            SemanticType::Numerical,
            SemanticType::Categorical,
            SemanticType::Text,
        ] {
            let options = treatment_options(semantic_type);
            assert!(options.ends_with(&[TreatmentKind::DropRows, TreatmentKind::DropColumn]));
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(TreatmentKind::Constant.to_string(), "Constant Value");
        assert_eq!(
            TreatmentMethod::ReplaceUnknown.to_string(),
            "Replace with \"Unknown\""
        );
    }

    #[test]
    fn test_from_kind_defaults() {
        assert_eq!(
            TreatmentMethod::from_kind(TreatmentKind::Placeholder, None),
            TreatmentMethod::Placeholder("N/A".to_string())
        );
        assert_eq!(
            TreatmentMethod::from_kind(TreatmentKind::Constant, Some("0".into())),
            TreatmentMethod::Constant("0".to_string())
        );
    }

    #[test]
    fn test_mean_and_median() {
        let col = Column::new("x", vec![Some(1i64), None, Some(2), Some(9)]);
        let mean = apply(&col, &TreatmentMethod::Mean);
        assert_eq!(mean.values[1], CellValue::Float(4.0));
        assert_eq!(mean.filled, 1);

        let median = apply(&col, &TreatmentMethod::Median);
        assert_eq!(median.values[1], CellValue::Float(2.0));

        let even = Column::new("x", vec![Some(1.0), Some(4.0), None]);
        assert_eq!(
            apply(&even, &TreatmentMethod::Median).values[2],
            CellValue::Float(2.5)
        );
    }

    #[test]
    fn test_mean_without_numbers() {
        let col = Column::new("x", vec!["a", "NA"]);
        let err = fill_missing(&col, &detect_missing(&col), &TreatmentMethod::Mean).unwrap_err();
        assert!(matches!(err, CleanError::NoNumericValues { .. }));
    }

    #[test]
    fn test_mode_tie_break() {
        let col = Column::new("x", vec!["b", "a", "b", "a", "NA"]);
        assert_eq!(apply(&col, &TreatmentMethod::Mode).values[4], CellValue::text("a"));

        let col = Column::new("x", vec!["b", "a", "b", ""]);
        assert_eq!(apply(&col, &TreatmentMethod::Mode).values[3], CellValue::text("b"));
    }

    #[test]
    fn test_mode_tie_between_kinds_is_stable() {
        let col = Column::with_storage(
            "x",
            vec![CellValue::Int(1), CellValue::text("1"), CellValue::Null],
            StorageKind::Text,
        );
        for _ in 0..50 {
            assert_eq!(apply(&col, &TreatmentMethod::Mode).values[2], CellValue::Int(1));
        }
    }

    #[test]
    fn test_mode_without_candidates() {
        let col = Column::new("x", vec!["NA", "?"]);
        let out = apply(&col, &TreatmentMethod::Mode);
        assert_eq!(out.filled, 0);
        assert_eq!(out.values, col.values());
    }

    #[test]
    fn test_constant_parsing() {
        let ints = Column::new("x", vec![Some(1i64), None]);
        assert_eq!(
            apply(&ints, &TreatmentMethod::Constant(" 7 ".into())).values[1],
            CellValue::Int(7)
        );
        assert_eq!(
            apply(&ints, &TreatmentMethod::Constant("7.5".into())).values[1],
            CellValue::Float(7.5)
        );
        let err = fill_missing(
            &ints,
            &detect_missing(&ints),
            &TreatmentMethod::Constant("seven".into()),
        )
        .unwrap_err();
        assert!(matches!(err, CleanError::InvalidConstant { .. }));

        let text = Column::new("x", vec!["a", "NA"]);
        assert_eq!(
            apply(&text, &TreatmentMethod::Placeholder("none given".into())).values[1],
            CellValue::text("none given")
        );
    }

    #[test]
    fn test_forward_fill_keeps_leading_gap() {
        let col = Column::new("x", vec!["NA", "a", "", "?", "b", "NA"]);
        let out = apply(&col, &TreatmentMethod::ForwardFill);
        assert_eq!(
            out.values,
            vec![
                CellValue::text("NA"),
                CellValue::text("a"),
                CellValue::text("a"),
                CellValue::text("a"),
                CellValue::text("b"),
                CellValue::text("b"),
            ]
        );
        assert_eq!(out.filled, 3);
    }

    #[test]
    fn test_backward_fill_keeps_trailing_gap() {
        let col = Column::new("x", vec![None, Some(1i64), None, Some(2), None]);
        let out = apply(&col, &TreatmentMethod::BackwardFill);
        assert_eq!(
            out.values,
            vec![
                CellValue::Int(1),
                CellValue::Int(1),
                CellValue::Int(2),
                CellValue::Int(2),
                CellValue::Null,
            ]
        );
        assert_eq!(out.filled, 2);
    }

    #[test]
    fn test_replace_labels() {
        let col = Column::new("x", vec![Some("red"), None]);
        assert_eq!(
            apply(&col, &TreatmentMethod::ReplaceUnknown).values[1],
            CellValue::text("Unknown")
        );
        assert_eq!(
            apply(&col, &TreatmentMethod::ReplaceEmpty).values[1],
            CellValue::text("")
        );
    }
}
