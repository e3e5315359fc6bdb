//! Error types for cleaning sessions.

use std::path::PathBuf;

use dcs_infer::InferError;
use dcs_model::{ModelError, SemanticType};
use thiserror::Error;

use crate::convert::TargetType;
use crate::treatment::TreatmentKind;

/// Errors raised by session operations and recipes.
#[derive(Debug, Error)]
pub enum CleanError {
    // === Table Errors ===
    /// Column lookup, rename or shape error from the table model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Invalid currency configuration.
    #[error(transparent)]
    Infer(#[from] InferError),

    // === Treatment Errors ===
    /// Method not offered for the column's detected type.
    #[error("{method} is not available for {semantic_type} column '{column}'")]
    TreatmentNotApplicable {
        column: String,
        method: TreatmentKind,
        semantic_type: SemanticType,
    },

    /// Mean or median requested on a column without numeric cells.
    #[error("column '{column}' has no numeric values")]
    NoNumericValues { column: String },

    /// Constant could not be parsed for a numeric column.
    #[error("constant '{value}' is not a number for numeric column '{column}'")]
    InvalidConstant { column: String, value: String },

    // === Conversion Errors ===
    /// A non-null cell could not be converted to the target type.
    #[error("cannot convert row {row} of column '{column}' to {target}")]
    Conversion {
        column: String,
        target: TargetType,
        row: usize,
    },

    // === Recipe Errors ===
    /// Failed to read a recipe file.
    #[error("failed to read recipe {path}: {source}")]
    RecipeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recipe text is not valid TOML for a cleaning recipe.
    #[error("invalid recipe: {message}")]
    RecipeParse { message: String },

    /// A recipe step failed; later steps were not run.
    #[error("recipe step {index} ({step}) failed: {source}")]
    RecipeStep {
        index: usize,
        step: &'static str,
        #[source]
        source: Box<CleanError>,
    },
}

impl From<toml::de::Error> for CleanError {
    fn from(err: toml::de::Error) -> Self {
        Self::RecipeParse {
            message: err.to_string(),
        }
    }
}

/// Result type for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;
