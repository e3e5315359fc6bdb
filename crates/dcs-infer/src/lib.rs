//! Type inference and normalization engine.
//!
//! Three pure operations over in-memory columns:
//!
//! - **Missing-value detection**: [`detect_missing`] flags native nulls,
//!   sentinel tokens (`"NA"`, `"n/a"`, `"?"`, ...) and blank text
//! - **Type classification**: [`classify`] assigns a semantic type and a
//!   confidence through an ordered rule chain ([`rule_chain`])
//! - **Currency normalization**: [`CurrencyNormalizer`] turns monetary text
//!   into numbers under a separator convention
//!
//! # Example
//!
//! ```
//! use dcs_infer::{classify, detect_missing, CurrencyNormalizer};
//! use dcs_model::{Column, CurrencyFormatConfig, SemanticType};
//!
//! let prices = Column::new("price", vec!["$1,000.50", "N/A", "$20.00"]);
//!
//! assert_eq!(classify(&prices).semantic_type, SemanticType::Currency);
//! assert_eq!(detect_missing(&prices).as_slice(), &[false, true, false]);
//!
//! let parsed = CurrencyNormalizer::new(CurrencyFormatConfig::us()).normalize(&prices);
//! assert_eq!(parsed, vec![Some(1000.5), None, Some(20.0)]);
//! ```
//!
//! # Design Principles
//!
//! - **Stateless functions**: results depend only on the column passed in
//! - **Total over messy data**: bad cells become nulls, never errors
//! - **Fail fast on bad configuration**: invalid separators are rejected

mod classify;
mod currency;
mod error;
mod missing;
mod profile;

pub mod datetime;

// Error type
pub use error::{InferError, Result};

// Missing-value detection
pub use missing::{
    MISSING_TOKENS, detect_missing, detect_missing_values, is_missing_cell, is_sentinel,
};

// Classification
pub use classify::{
    BOOLEAN_TOKENS, CATEGORICAL_MAX_DISTINCT, CATEGORICAL_UNIQUE_RATIO, ClassificationRule,
    ColumnSample, NUMERIC_MATCH_THRESHOLD, classify, classify_values, rule_chain, rule_for,
};

// Currency normalization
pub use currency::{
    CURRENCY_CODES, CURRENCY_SYMBOLS, CurrencyNormalizer, REMOVED_SYMBOLS,
    contains_currency_marker, normalize_currency,
};

// Profiling
pub use profile::{ColumnProfile, profile_column, profile_table};
