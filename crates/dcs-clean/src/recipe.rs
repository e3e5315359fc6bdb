//! Cleaning recipes: ordered session steps stored as TOML.
//!
//! ```toml
//! [[steps]]
//! step = "remove_duplicates"
//!
//! [[steps]]
//! step = "clean_currency"
//! column = "price"
//! format = { symbol = "€", decimal_separator = "," }
//!
//! [[steps]]
//! step = "treat_missing"
//! column = "region"
//! method = "replace_unknown"
//! ```
//!
//! A currency format without `thousand_separator` groups with `.` after a
//! decimal comma and with `,` otherwise.

use std::path::Path;

use dcs_model::CurrencyFormatConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::TargetType;
use crate::error::{CleanError, Result};
use crate::session::CleaningSession;
use crate::treatment::{TreatmentKind, TreatmentMethod};

/// One recipe step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RecipeStep {
    RemoveDuplicates,
    TrimWhitespace,
    CleanCurrency {
        column: String,
        #[serde(default)]
        format: CurrencyFormatConfig,
    },
    TreatMissing {
        column: String,
        method: TreatmentKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Rename {
        from: String,
        to: String,
    },
    Convert {
        column: String,
        target: TargetType,
    },
    DropColumn {
        column: String,
    },
}

impl RecipeStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "remove_duplicates",
            Self::TrimWhitespace => "trim_whitespace",
            Self::CleanCurrency { .. } => "clean_currency",
            Self::TreatMissing { .. } => "treat_missing",
            Self::Rename { .. } => "rename",
            Self::Convert { .. } => "convert",
            Self::DropColumn { .. } => "drop_column",
        }
    }
}

/// Ordered list of steps applied to a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningRecipe {
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
}

impl CleaningRecipe {
    pub fn new(steps: Vec<RecipeStep>) -> Self {
        Self { steps }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CleanError::RecipeRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl CleaningSession {
    /// Run one step against the session.
    pub fn apply_step(&mut self, step: &RecipeStep) -> Result<()> {
        match step {
            RecipeStep::RemoveDuplicates => {
                self.remove_duplicates()?;
            }
            RecipeStep::TrimWhitespace => {
                self.trim_whitespace()?;
            }
            RecipeStep::CleanCurrency { column, format } => {
                self.clean_currency(column, format)?;
            }
            RecipeStep::TreatMissing {
                column,
                method,
                value,
            } => {
                let method = TreatmentMethod::from_kind(*method, value.clone());
                self.apply_treatment(column, &method)?;
            }
            RecipeStep::Rename { from, to } => self.rename_column(from, to)?,
            RecipeStep::Convert { column, target } => self.convert_column(column, *target)?,
            RecipeStep::DropColumn { column } => self.drop_column(column)?,
        }
        Ok(())
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Returns the number of steps applied.
    pub fn apply_recipe(&mut self, recipe: &CleaningRecipe) -> Result<usize> {
        for (index, step) in recipe.steps.iter().enumerate() {
            debug!(index, step = step.name(), "applying recipe step");
            self.apply_step(step)
                .map_err(|source| CleanError::RecipeStep {
                    index,
                    step: step.name(),
                    source: Box::new(source),
                })?;
        }
        Ok(recipe.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcs_model::{DecimalSeparator, ThousandSeparator};

    #[test]
    fn test_parse_recipe() {
        let recipe = CleaningRecipe::from_toml_str(
            r#"
            [[steps]]
            step = "remove_duplicates"

            [[steps]]
            step = "clean_currency"
            column = "price"
            format = { symbol = "€", decimal_separator = ",", thousand_separator = "." }

            [[steps]]
            step = "treat_missing"
            column = "age"
            method = "constant"
            value = "0"

            [[steps]]
            step = "convert"
            column = "age"
            target = "int"
            "#,
        )
        .unwrap();

        assert_eq!(recipe.len(), 4);
        match &recipe.steps[1] {
            RecipeStep::CleanCurrency { column, format } => {
                assert_eq!(column, "price");
                assert_eq!(format.decimal_separator(), DecimalSeparator::Comma);
                assert_eq!(format.thousand_separator(), ThousandSeparator::Dot);
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(
            recipe.steps[3],
            RecipeStep::Convert {
                column: "age".to_string(),
                target: TargetType::Integer
            }
        );
    }

    #[test]
    fn test_currency_format_defaults() {
        let recipe = CleaningRecipe::from_toml_str(
            r#"
            [[steps]]
            step = "clean_currency"
            column = "price"
            "#,
        )
        .unwrap();
        assert_eq!(
            recipe.steps[0],
            RecipeStep::CleanCurrency {
                column: "price".to_string(),
                format: CurrencyFormatConfig::us()
            }
        );
    }

    #[test]
    fn test_rejects_unknown_step() {
        let err = CleaningRecipe::from_toml_str("[[steps]]\nstep = \"shuffle\"\n").unwrap_err();
        assert!(matches!(err, CleanError::RecipeParse { .. }));
    }

    #[test]
    fn test_decimal_comma_defaults_to_dot_grouping() {
        let recipe = CleaningRecipe::from_toml_str(
            r#"
            [[steps]]
            step = "clean_currency"
            column = "price"
            format = { decimal_separator = "," }
            "#,
        )
        .unwrap();
        match &recipe.steps[0] {
            RecipeStep::CleanCurrency { format, .. } => {
                assert_eq!(format.thousand_separator(), ThousandSeparator::Dot);
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_rejects_conflicting_separators() {
        let err = CleaningRecipe::from_toml_str(
            r#"
            [[steps]]
            step = "clean_currency"
            column = "price"
            format = { decimal_separator = ".", thousand_separator = "." }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CleanError::RecipeParse { .. }));
    }

    #[test]
    fn test_empty_recipe() {
        let recipe = CleaningRecipe::from_toml_str("").unwrap();
        assert!(recipe.is_empty());
    }
}
