//! Error types for the inference engine.

use dcs_model::ModelError;
use thiserror::Error;

/// Errors raised for structurally invalid calls.
///
/// Messy cell data never produces an error; unparseable cells become nulls.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InferError {
    /// Invalid currency format configuration.
    #[error("invalid currency format: {0}")]
    CurrencyFormat(#[from] ModelError),
}

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferError>;
