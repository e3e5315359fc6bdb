//! Semantic types and classification results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inferred meaning of a column's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// No non-null values.
    Empty,
    Boolean,
    /// Monetary text carrying a currency symbol or code.
    Currency,
    DateTime,
    Numerical,
    /// Low-cardinality values.
    Categorical,
    /// Free text (fallback).
    Text,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Empty => "empty",
            SemanticType::Boolean => "boolean",
            SemanticType::Currency => "currency",
            SemanticType::DateTime => "datetime",
            SemanticType::Numerical => "numerical",
            SemanticType::Categorical => "categorical",
            SemanticType::Text => "text",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(SemanticType::Empty),
            "boolean" | "bool" => Ok(SemanticType::Boolean),
            "currency" => Ok(SemanticType::Currency),
            "datetime" | "date" => Ok(SemanticType::DateTime),
            "numerical" | "numeric" => Ok(SemanticType::Numerical),
            "categorical" | "category" => Ok(SemanticType::Categorical),
            "text" => Ok(SemanticType::Text),
            other => Err(format!("unknown semantic type '{other}'")),
        }
    }
}

/// How certain the classifier is about a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one column.
///
/// # Example
///
/// ```
/// use dcs_model::{ClassificationResult, Confidence, SemanticType};
///
/// let result = ClassificationResult::high(SemanticType::Currency);
/// assert_eq!(result.confidence, Confidence::High);
/// assert_eq!(result.to_string(), "currency (high)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub confidence: Confidence,
}

impl ClassificationResult {
    pub fn new(semantic_type: SemanticType, confidence: Confidence) -> Self {
        Self {
            semantic_type,
            confidence,
        }
    }

    pub fn high(semantic_type: SemanticType) -> Self {
        Self::new(semantic_type, Confidence::High)
    }

    pub fn medium(semantic_type: SemanticType) -> Self {
        Self::new(semantic_type, Confidence::Medium)
    }

    /// Result for a column without non-null values.
    pub fn empty() -> Self {
        Self::high(SemanticType::Empty)
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.semantic_type, self.confidence)
    }
}
