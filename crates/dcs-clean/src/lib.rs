//! Cleaning sessions over a loaded table.
//!
//! A [`CleaningSession`] owns the working copy of a dataset, the semantic type
//! detected for each column and an [`AuditLog`] of every action taken:
//!
//! - missing-value treatments chosen per semantic type ([`treatment_options`])
//! - currency cleaning that turns monetary text into numbers
//! - general operations: de-duplication, whitespace trimming, renaming, type
//!   conversion and column removal
//! - [`CleaningRecipe`]s that replay a list of steps from a TOML file
//!
//! # Example
//!
//! ```
//! use dcs_clean::{CleaningSession, TreatmentMethod};
//! use dcs_model::{Column, CurrencyFormatConfig, Table};
//!
//! let table = Table::new(vec![
//!     Column::new("price", vec!["$1,000.50", "$20.00", "N/A"]),
//! ])
//! .unwrap();
//!
//! let mut session = CleaningSession::load("prices.csv", table);
//! session.clean_currency("price", &CurrencyFormatConfig::us()).unwrap();
//! session.apply_treatment("price", &TreatmentMethod::Median).unwrap();
//!
//! assert_eq!(session.missing_summary().len(), 0);
//! assert_eq!(session.log().len(), 4);
//! ```

mod audit;
mod convert;
mod error;
mod recipe;
mod session;
mod treatment;

// Error type
pub use error::{CleanError, Result};

// Audit trail
pub use audit::{AUDIT_TIMESTAMP_FORMAT, AuditEntry, AuditLog};

// Session
pub use session::{
    CleaningSession, CurrencyOutcome, MissingSummary, PREVIEW_ROWS, SessionSummary,
    TreatmentOutcome,
};

// Treatments
pub use treatment::{
    DEFAULT_PLACEHOLDER, FilledColumn, TreatmentKind, TreatmentMethod, UNKNOWN_LABEL,
    fill_missing, treatment_options,
};

// Conversion
pub use convert::{TargetType, convert_column};

// Recipes
pub use recipe::{CleaningRecipe, RecipeStep};
