//! Cleaning session: the working table, its detected types and the audit log.

use std::collections::{BTreeMap, HashSet};

use dcs_infer::{CurrencyNormalizer, classify, detect_missing};
use dcs_model::{
    CellKey, CellValue, ClassificationResult, Column, CurrencyFormatConfig, SemanticType,
    StorageKind, Table,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::audit::AuditLog;
use crate::convert::{self, TargetType};
use crate::error::{CleanError, Result};
use crate::treatment::{TreatmentKind, TreatmentMethod, fill_missing, treatment_options};

/// Number of cells kept in before/after previews.
pub const PREVIEW_ROWS: usize = 10;

/// Missing-value counts for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingSummary {
    pub column: String,
    pub missing_count: usize,
    /// Share of missing cells in percent, rounded to two decimals.
    pub missing_percent: f64,
    pub semantic_type: SemanticType,
}

/// What a missing-value treatment did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreatmentOutcome {
    pub column: String,
    pub method: TreatmentKind,
    pub filled: usize,
    pub rows_removed: usize,
    pub column_removed: bool,
}

/// What currency cleaning did to a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyOutcome {
    pub column: String,
    pub before: Vec<CellValue>,
    pub after: Vec<Option<f64>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Cells that held a value before and are null after.
    pub new_nulls: usize,
}

/// Shape of the dataset before and after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub source: String,
    pub original_rows: usize,
    pub original_columns: usize,
    pub rows: usize,
    pub columns: usize,
    pub actions: usize,
}

/// Owns one dataset through a cleaning run.
#[derive(Debug, Clone)]
pub struct CleaningSession {
    source: String,
    original: Table,
    working: Table,
    column_types: BTreeMap<String, ClassificationResult>,
    log: AuditLog,
}

impl CleaningSession {
    /// Start a session: snapshot the table and classify every column.
    pub fn load(source: impl Into<String>, table: Table) -> Self {
        let source = source.into();
        let mut session = Self {
            source,
            original: table.clone(),
            working: table,
            column_types: BTreeMap::new(),
            log: AuditLog::new(),
        };
        session
            .log
            .record(format!("Dataset loaded: {}", session.source));
        session.redetect_types();
        session.log.record("Column types auto-detected");
        info!(
            source = %session.source,
            rows = session.working.height(),
            columns = session.working.width(),
            "dataset loaded"
        );
        session
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn original(&self) -> &Table {
        &self.original
    }

    pub fn working(&self) -> &Table {
        &self.working
    }

    /// Consume the session, keeping the cleaned table and the audit log.
    pub fn into_parts(self) -> (Table, AuditLog) {
        (self.working, self.log)
    }

    pub fn column_types(&self) -> &BTreeMap<String, ClassificationResult> {
        &self.column_types
    }

    pub fn column_type(&self, name: &str) -> Option<ClassificationResult> {
        self.column_types.get(name).copied()
    }

    pub fn log(&self) -> &AuditLog {
        &self.log
    }

    /// Reclassify every column of the working table.
    pub fn redetect_types(&mut self) {
        self.column_types = self
            .working
            .columns()
            .iter()
            .map(|column| (column.name().to_string(), classify(column)))
            .collect();
    }

    /// Override the detected type of a column.
    pub fn set_column_type(&mut self, name: &str, result: ClassificationResult) -> Result<()> {
        self.working.column(name)?;
        self.column_types.insert(name.to_string(), result);
        Ok(())
    }

    /// Columns with at least one missing cell, in column order.
    pub fn missing_summary(&self) -> Vec<MissingSummary> {
        let height = self.working.height();
        self.working
            .columns()
            .iter()
            .filter_map(|column| {
                let missing_count = detect_missing(column).count();
                if missing_count == 0 {
                    return None;
                }
                let percent = missing_count as f64 / height as f64 * 100.0;
                Some(MissingSummary {
                    column: column.name().to_string(),
                    missing_count,
                    missing_percent: (percent * 100.0).round() / 100.0,
                    semantic_type: self.semantic_type_of(column),
                })
            })
            .collect()
    }

    /// Treat the missing cells of one column.
    pub fn apply_treatment(
        &mut self,
        column: &str,
        method: &TreatmentMethod,
    ) -> Result<TreatmentOutcome> {
        let kind = method.kind();
        let target = self.working.column(column)?;
        let semantic_type = self.semantic_type_of(target);
        if !treatment_options(semantic_type).contains(&kind) {
            return Err(CleanError::TreatmentNotApplicable {
                column: column.to_string(),
                method: kind,
                semantic_type,
            });
        }

        let mask = detect_missing(target);
        let mut outcome = TreatmentOutcome {
            column: column.to_string(),
            method: kind,
            filled: 0,
            rows_removed: 0,
            column_removed: false,
        };
        match method {
            TreatmentMethod::DropRows => {
                outcome.rows_removed = self.working.retain_rows(&mask.present())?;
            }
            TreatmentMethod::DropColumn => {
                self.working.remove_column(column)?;
                self.column_types.remove(column);
                outcome.column_removed = true;
            }
            _ => {
                let filled = fill_missing(target, &mask, method)?;
                outcome.filled = filled.filled;
                self.working.column_mut(column)?.replace_values(filled.values);
            }
        }

        debug!(
            column,
            method = %kind,
            filled = outcome.filled,
            rows_removed = outcome.rows_removed,
            "applied treatment"
        );
        self.log.record(format!(
            "Applied {kind} to '{column}' - Affected rows: {}",
            outcome.rows_removed
        ));
        Ok(outcome)
    }

    /// Replace a monetary text column with parsed numbers.
    pub fn clean_currency(
        &mut self,
        column: &str,
        config: &CurrencyFormatConfig,
    ) -> Result<CurrencyOutcome> {
        let target = self.working.column(column)?;
        let parsed = CurrencyNormalizer::new(config.clone()).normalize(target);

        let new_nulls = target
            .values()
            .iter()
            .zip(&parsed)
            .filter(|(before, after)| !before.is_null() && after.is_none())
            .count();
        let numbers: Vec<f64> = parsed.iter().flatten().copied().collect();
        let outcome = CurrencyOutcome {
            column: column.to_string(),
            before: target.values().iter().take(PREVIEW_ROWS).cloned().collect(),
            after: parsed.iter().take(PREVIEW_ROWS).copied().collect(),
            min: numbers.iter().copied().reduce(f64::min),
            max: numbers.iter().copied().reduce(f64::max),
            mean: (!numbers.is_empty())
                .then(|| numbers.iter().sum::<f64>() / numbers.len() as f64),
            new_nulls,
        };

        let values = parsed.into_iter().map(CellValue::from).collect();
        self.working.replace_column(Column::with_storage(
            column,
            values,
            StorageKind::Float,
        ))?;
        self.column_types.insert(
            column.to_string(),
            ClassificationResult::high(SemanticType::Numerical),
        );
        self.log
            .record(format!("Cleaned currency column '{column}'"));
        Ok(outcome)
    }

    /// Drop repeated rows, keeping the first occurrence.
    pub fn remove_duplicates(&mut self) -> Result<usize> {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(self.working.height());
        let keep: Vec<bool> = (0..self.working.height())
            .map(|index| {
                let key: Vec<CellKey> = self
                    .working
                    .columns()
                    .iter()
                    .map(|column| column.values()[index].key())
                    .collect();
                seen.insert(key)
            })
            .collect();
        let removed = self.working.retain_rows(&keep)?;
        if removed > 0 {
            self.log.record(format!("Removed {removed} duplicate rows"));
        }
        Ok(removed)
    }

    /// Trim surrounding whitespace from the text cells of text columns.
    ///
    /// Returns the number of text columns visited.
    pub fn trim_whitespace(&mut self) -> Result<usize> {
        let names: Vec<String> = self
            .working
            .columns()
            .iter()
            .filter(|column| column.storage().is_text())
            .map(|column| column.name().to_string())
            .collect();
        for name in &names {
            let column = self.working.column_mut(name)?;
            let values = column
                .values()
                .iter()
                .map(|value| match value {
                    CellValue::Text(text) => CellValue::text(text.trim()),
                    other => other.clone(),
                })
                .collect();
            column.replace_values_with_storage(values, StorageKind::Text);
        }
        if !names.is_empty() {
            self.log
                .record(format!("Trimmed whitespace from {} columns", names.len()));
        }
        Ok(names.len())
    }

    /// Rename a column, carrying its detected type along.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        self.working.rename_column(old, new)?;
        if old == new {
            return Ok(());
        }
        if let Some(result) = self.column_types.remove(old) {
            self.column_types.insert(new.to_string(), result);
        }
        self.log.record(format!("Renamed '{old}' to '{new}'"));
        Ok(())
    }

    /// Convert a column to an explicit storage type.
    pub fn convert_column(&mut self, name: &str, target: TargetType) -> Result<()> {
        let converted = convert::convert_column(self.working.column(name)?, target)?;
        let result = match target.semantic_type() {
            Some(semantic_type) => ClassificationResult::high(semantic_type),
            None => classify(&converted),
        };
        self.working.replace_column(converted)?;
        self.column_types.insert(name.to_string(), result);
        self.log.record(format!("Converted '{name}' to {target}"));
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        self.working.remove_column(name)?;
        self.column_types.remove(name);
        self.log.record(format!("Dropped column '{name}'"));
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            source: self.source.clone(),
            original_rows: self.original.height(),
            original_columns: self.original.width(),
            rows: self.working.height(),
            columns: self.working.width(),
            actions: self.log.len(),
        }
    }

    /// Recorded type, or a fresh classification when none is recorded.
    fn semantic_type_of(&self, column: &Column) -> SemanticType {
        self.column_types
            .get(column.name())
            .map_or_else(|| classify(column).semantic_type, |r| r.semantic_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcs_model::Confidence;

    fn sales() -> Table {
        Table::new(vec![
            Column::new("id", vec![1i64, 2, 3, 3]),
            Column::new("price", vec!["$1,000.50", "N/A", "$20.00", "$20.00"]),
            Column::new("region", vec![" north", "south ", "NA", "NA"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_load_classifies_and_logs() {
        let session = CleaningSession::load("sales.csv", sales());
        assert_eq!(
            session.column_type("price"),
            Some(ClassificationResult::high(SemanticType::Currency))
        );
        let actions: Vec<&str> = session.log().iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["Dataset loaded: sales.csv", "Column types auto-detected"]
        );
    }

    #[test]
    fn test_missing_summary() {
        let session = CleaningSession::load("sales.csv", sales());
        let summary = session.missing_summary();
        let columns: Vec<&str> = summary.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["price", "region"]);
        assert_eq!(summary[0].missing_count, 1);
        assert!((summary[0].missing_percent - 25.0).abs() < 1e-9);
        assert_eq!(summary[1].missing_count, 2);
    }

    #[test]
    fn test_treatment_must_match_type() {
        let mut session = CleaningSession::load("sales.csv", sales());
        let err = session
            .apply_treatment("region", &TreatmentMethod::Mean)
            .unwrap_err();
        assert!(matches!(err, CleanError::TreatmentNotApplicable { .. }));
        assert_eq!(session.log().len(), 2);
    }

    #[test]
    fn test_drop_rows_logs_removed_count() {
        let mut session = CleaningSession::load("sales.csv", sales());
        let outcome = session
            .apply_treatment("region", &TreatmentMethod::DropRows)
            .unwrap();
        assert_eq!(outcome.rows_removed, 2);
        assert_eq!(session.working().height(), 2);
        assert_eq!(
            session.log().entries().last().unwrap().action,
            "Applied Drop Rows to 'region' - Affected rows: 2"
        );
    }

    #[test]
    fn test_drop_column_treatment_removes_type() {
        let mut session = CleaningSession::load("sales.csv", sales());
        session
            .apply_treatment("region", &TreatmentMethod::DropColumn)
            .unwrap();
        assert!(!session.working().has_column("region"));
        assert!(session.column_type("region").is_none());
    }

    #[test]
    fn test_clean_currency() {
        let mut session = CleaningSession::load("sales.csv", sales());
        let outcome = session
            .clean_currency("price", &CurrencyFormatConfig::us())
            .unwrap();

        assert_eq!(outcome.after, vec![Some(1000.5), None, Some(20.0), Some(20.0)]);
        assert_eq!(outcome.new_nulls, 1);
        assert_eq!(outcome.min, Some(20.0));
        assert_eq!(outcome.max, Some(1000.5));
        assert_eq!(
            session.column_type("price"),
            Some(ClassificationResult::new(SemanticType::Numerical, Confidence::High))
        );
        assert_eq!(
            session.working().column("price").unwrap().storage(),
            StorageKind::Float
        );
    }

    #[test]
    fn test_remove_duplicates() {
        let mut session = CleaningSession::load("sales.csv", sales());
        assert_eq!(session.remove_duplicates().unwrap(), 1);
        assert_eq!(session.working().height(), 3);
        assert_eq!(session.remove_duplicates().unwrap(), 0);
        assert_eq!(
            session.log().entries().last().unwrap().action,
            "Removed 1 duplicate rows"
        );
    }

    #[test]
    fn test_trim_whitespace() {
        let mut session = CleaningSession::load("sales.csv", sales());
        assert_eq!(session.trim_whitespace().unwrap(), 2);
        let region = session.working().column("region").unwrap();
        assert_eq!(region.values()[0], CellValue::text("north"));
        assert_eq!(region.values()[1], CellValue::text("south"));
    }

    #[test]
    fn test_rename_moves_type() {
        let mut session = CleaningSession::load("sales.csv", sales());
        session.rename_column("price", "amount").unwrap();
        assert!(session.column_type("price").is_none());
        assert_eq!(
            session.column_type("amount").map(|r| r.semantic_type),
            Some(SemanticType::Currency)
        );
        assert!(session.rename_column("amount", "id").is_err());
        assert!(session.rename_column("amount", "").is_err());

        let before = session.log().len();
        session.rename_column("amount", "amount").unwrap();
        assert_eq!(session.log().len(), before);
    }

    #[test]
    fn test_convert_sets_type() {
        let mut session = CleaningSession::load("sales.csv", sales());
        session.convert_column("id", TargetType::Float).unwrap();
        assert_eq!(
            session.working().column("id").unwrap().storage(),
            StorageKind::Float
        );
        assert_eq!(
            session.log().entries().last().unwrap().action,
            "Converted 'id' to float"
        );
        assert!(session.convert_column("price", TargetType::Integer).is_err());
    }

    #[test]
    fn test_convert_to_category_records_categorical() {
        let mut session = CleaningSession::load("sales.csv", sales());
        session.convert_column("id", TargetType::Category).unwrap();
        assert_eq!(
            session.working().column("id").unwrap().storage(),
            StorageKind::Text
        );
        assert_eq!(
            session.column_type("id"),
            Some(ClassificationResult::high(SemanticType::Categorical))
        );
        assert_eq!(
            session.log().entries().last().unwrap().action,
            "Converted 'id' to category"
        );
    }

    #[test]
    fn test_summary() {
        let mut session = CleaningSession::load("sales.csv", sales());
        session.drop_column("region").unwrap();
        let summary = session.summary();
        assert_eq!(summary.original_columns, 3);
        assert_eq!(summary.columns, 2);
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.actions, 3);
    }
}
