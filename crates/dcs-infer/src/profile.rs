//! Column profiles: classification plus null, missing and cardinality counts.

use std::collections::HashSet;

use dcs_model::{CellKey, ClassificationResult, Column, StorageKind, Table};
use serde::Serialize;

use crate::classify::classify;
use crate::missing::detect_missing;

/// Summary statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub storage: StorageKind,
    pub classification: ClassificationResult,
    /// Cells that are not native nulls.
    pub non_null: usize,
    /// Native nulls only.
    pub null: usize,
    /// Native nulls plus sentinel tokens and blank text.
    pub missing: usize,
    /// Distinct non-null values.
    pub unique: usize,
}

impl ColumnProfile {
    /// Share of missing cells (0.0 to 1.0).
    pub fn missing_ratio(&self) -> f64 {
        let total = self.non_null + self.null;
        if total == 0 {
            0.0
        } else {
            self.missing as f64 / total as f64
        }
    }
}

/// Profile a single column.
pub fn profile_column(column: &Column) -> ColumnProfile {
    let null = column.null_count();
    let unique = column
        .non_null()
        .map(|v| v.key())
        .collect::<HashSet<CellKey>>()
        .len();

    ColumnProfile {
        name: column.name().to_string(),
        storage: column.storage(),
        classification: classify(column),
        non_null: column.len() - null,
        null,
        missing: detect_missing(column).count(),
        unique,
    }
}

/// Profile every column of a table, in column order.
pub fn profile_table(table: &Table) -> Vec<ColumnProfile> {
    table.columns().iter().map(profile_column).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcs_model::SemanticType;

    #[test]
    fn test_profile_counts() {
        let col = Column::new("city", vec![Some("Kigali"), None, Some("NA"), Some("Kigali")]);
        let profile = profile_column(&col);

        assert_eq!(profile.non_null, 3);
        assert_eq!(profile.null, 1);
        assert_eq!(profile.missing, 2);
        assert_eq!(profile.unique, 2);
        assert_eq!(profile.classification.semantic_type, SemanticType::Categorical);
        assert!((profile.missing_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_profile_table_order() {
        let table = Table::new(vec![
            Column::new("b", vec![1i64, 2]),
            Column::new("a", vec!["x", "y"]),
        ])
        .unwrap();
        let names: Vec<String> = profile_table(&table).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
