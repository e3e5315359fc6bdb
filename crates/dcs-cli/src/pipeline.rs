//! Load, profile and clean one dataset file.
//!
//! Each command of the `dcs` binary is a function here returning a report
//! that the binary renders; nothing in this module prints.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use dcs_clean::{
    CleaningRecipe, CleaningSession, CurrencyOutcome, MissingSummary, SessionSummary,
    TreatmentKind, treatment_options,
};
use dcs_infer::{ColumnProfile, profile_table};
use dcs_ingest::{ExportFormat, read_table, write_audit_log, write_table};
use dcs_model::{CurrencyFormatConfig, Table};

/// Display name of a dataset: its file name, or the whole path as a fallback.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Per-column profile of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub source: String,
    pub rows: usize,
    pub columns: usize,
    pub profiles: Vec<ColumnProfile>,
}

impl ProfileReport {
    pub fn from_table(source: impl Into<String>, table: &Table) -> Self {
        Self {
            source: source.into(),
            rows: table.height(),
            columns: table.width(),
            profiles: profile_table(table),
        }
    }

    /// Missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.profiles.iter().map(|p| p.missing).sum()
    }
}

/// A column with missing cells and the treatments it accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingColumn {
    #[serde(flatten)]
    pub summary: MissingSummary,
    pub options: Vec<TreatmentKind>,
}

/// Missing-value overview of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingReport {
    pub source: String,
    pub rows: usize,
    pub columns: Vec<MissingColumn>,
}

impl MissingReport {
    pub fn from_session(session: &CleaningSession) -> Self {
        let columns = session
            .missing_summary()
            .into_iter()
            .map(|summary| MissingColumn {
                options: treatment_options(summary.semantic_type).to_vec(),
                summary,
            })
            .collect();
        Self {
            source: session.source().to_string(),
            rows: session.working().height(),
            columns,
        }
    }
}

/// Everything a `clean` run needs to know.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub recipe: Option<PathBuf>,
    pub currency_columns: Vec<String>,
    pub currency_format: CurrencyFormatConfig,
    pub dedupe: bool,
    pub trim: bool,
    pub audit_log: Option<PathBuf>,
}

/// Outcome of a `clean` run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanResult {
    pub summary: SessionSummary,
    pub duplicates_removed: Option<usize>,
    pub text_columns_trimmed: Option<usize>,
    pub currency: Vec<CurrencyOutcome>,
    pub recipe_steps: usize,
    pub output: PathBuf,
    pub audit_log: Option<PathBuf>,
    /// Rendered audit trail, oldest first.
    pub actions: Vec<String>,
}

/// Read a dataset and profile every column.
pub fn profile_file(path: &Path) -> Result<ProfileReport> {
    let table = read_table(path).with_context(|| format!("load {}", path.display()))?;
    Ok(ProfileReport::from_table(source_name(path), &table))
}

/// Read a dataset and summarize its missing values.
pub fn missing_file(path: &Path) -> Result<MissingReport> {
    let table = read_table(path).with_context(|| format!("load {}", path.display()))?;
    let session = CleaningSession::load(source_name(path), table);
    Ok(MissingReport::from_session(&session))
}

/// Run a cleaning session and write its outputs.
///
/// Steps run in a fixed order: de-duplication, whitespace trimming, currency
/// columns, then the recipe. The first failing step aborts the run before
/// anything is written.
pub fn clean_file(options: &CleanOptions) -> Result<CleanResult> {
    let source = source_name(&options.input);
    let span = info_span!("clean", source = %source);
    let _guard = span.enter();

    let recipe = match &options.recipe {
        Some(path) => Some(
            CleaningRecipe::from_path(path)
                .with_context(|| format!("load recipe {}", path.display()))?,
        ),
        None => None,
    };
    let table = read_table(&options.input)
        .with_context(|| format!("load {}", options.input.display()))?;
    let mut session = CleaningSession::load(source, table);

    let duplicates_removed = if options.dedupe {
        Some(session.remove_duplicates().context("remove duplicates")?)
    } else {
        None
    };
    let text_columns_trimmed = if options.trim {
        Some(session.trim_whitespace().context("trim whitespace")?)
    } else {
        None
    };

    let mut currency = Vec::with_capacity(options.currency_columns.len());
    for column in &options.currency_columns {
        let outcome = session
            .clean_currency(column, &options.currency_format)
            .with_context(|| format!("clean currency column '{column}'"))?;
        currency.push(outcome);
    }

    let recipe_steps = match &recipe {
        Some(recipe) => session.apply_recipe(recipe).context("apply recipe")?,
        None => 0,
    };

    write_table(session.working(), &options.output, options.format)
        .with_context(|| format!("write {}", options.output.display()))?;
    if let Some(path) = &options.audit_log {
        write_audit_log(session.log(), path)
            .with_context(|| format!("write audit log {}", path.display()))?;
    }

    let summary = session.summary();
    info!(
        rows = summary.rows,
        columns = summary.columns,
        actions = summary.actions,
        "cleaning finished"
    );
    Ok(CleanResult {
        summary,
        duplicates_removed,
        text_columns_trimmed,
        currency,
        recipe_steps,
        output: options.output.clone(),
        audit_log: options.audit_log.clone(),
        actions: session.log().lines(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name() {
        assert_eq!(source_name(Path::new("data/sales.csv")), "sales.csv");
        assert_eq!(source_name(Path::new("/")), "/");
    }
}
