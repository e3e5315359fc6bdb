//! Semantic type classification.
//!
//! Classification runs an ordered chain of rules over the non-null values of
//! a column; the first rule that matches decides the result. Priority order
//! (highest to lowest):
//!
//! 0. Empty: no non-null values
//! 1. Boolean: at most two distinct tokens from the boolean vocabulary
//! 2. Currency: any value carries a currency symbol or code
//! 3. DateTime: every value parses as a date (high), or any value contains a
//!    date-shaped substring (medium)
//! 4. Numerical: more than 80% of values look numeric, or numeric storage
//! 5. Categorical: low cardinality
//! 6. Text (fallback, medium)
//!
//! Non-null means the native null check only; sentinel tokens such as `"NA"`
//! take part in classification like any other value.

use std::collections::HashSet;
use std::sync::LazyLock;

use dcs_model::{
    CellKey, CellValue, ClassificationResult, Column, Confidence, SemanticType, StorageKind,
};
use regex::Regex;
use tracing::debug;

use crate::currency::contains_currency_marker;
use crate::datetime::{has_date_pattern, parse_cell};

/// Tokens accepted as boolean values after lower-casing.
pub const BOOLEAN_TOKENS: [&str; 10] = ["true", "false", "yes", "no", "1", "0", "t", "f", "y", "n"];

/// Share of numeric-looking values above which a column is numerical.
pub const NUMERIC_MATCH_THRESHOLD: f64 = 0.8;

/// Unique-ratio below which a column is categorical.
pub const CATEGORICAL_UNIQUE_RATIO: f64 = 0.05;

/// Distinct-count below which a column is categorical.
pub const CATEGORICAL_MAX_DISTINCT: usize = 20;

static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.?\d*$").expect("Invalid numeric regex"));

/// Non-null view of a column, shared by every rule.
#[derive(Debug)]
pub struct ColumnSample<'a> {
    storage: StorageKind,
    values: Vec<&'a CellValue>,
    texts: Vec<String>,
}

impl<'a> ColumnSample<'a> {
    pub fn new(column: &'a Column) -> Self {
        let values: Vec<&CellValue> = column.non_null().collect();
        let texts = values.iter().map(|v| v.text_form()).collect();
        Self {
            storage: column.storage(),
            values,
            texts,
        }
    }

    /// Number of non-null values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn values(&self) -> &[&'a CellValue] {
        &self.values
    }

    /// Text forms of the non-null values.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Number of distinct non-null values (kinds kept apart).
    pub fn distinct_count(&self) -> usize {
        self.values
            .iter()
            .map(|v| v.key())
            .collect::<HashSet<CellKey>>()
            .len()
    }
}

/// One guarded step of the classification chain.
#[derive(Clone, Copy)]
pub struct ClassificationRule {
    name: &'static str,
    semantic_type: SemanticType,
    check: fn(&ColumnSample<'_>) -> Option<Confidence>,
}

impl ClassificationRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }

    /// Evaluate this rule alone.
    pub fn evaluate(&self, sample: &ColumnSample<'_>) -> Option<ClassificationResult> {
        (self.check)(sample).map(|confidence| ClassificationResult::new(self.semantic_type, confidence))
    }
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("name", &self.name)
            .field("semantic_type", &self.semantic_type)
            .finish()
    }
}

static RULE_CHAIN: [ClassificationRule; 7] = [
    ClassificationRule {
        name: "empty",
        semantic_type: SemanticType::Empty,
        check: empty_rule,
    },
    ClassificationRule {
        name: "boolean",
        semantic_type: SemanticType::Boolean,
        check: boolean_rule,
    },
    ClassificationRule {
        name: "currency",
        semantic_type: SemanticType::Currency,
        check: currency_rule,
    },
    ClassificationRule {
        name: "datetime",
        semantic_type: SemanticType::DateTime,
        check: datetime_rule,
    },
    ClassificationRule {
        name: "numerical",
        semantic_type: SemanticType::Numerical,
        check: numerical_rule,
    },
    ClassificationRule {
        name: "categorical",
        semantic_type: SemanticType::Categorical,
        check: categorical_rule,
    },
    ClassificationRule {
        name: "text",
        semantic_type: SemanticType::Text,
        check: text_rule,
    },
];

/// The classification rules in priority order.
pub fn rule_chain() -> &'static [ClassificationRule] {
    &RULE_CHAIN
}

/// Look up a rule by semantic type.
pub fn rule_for(semantic_type: SemanticType) -> Option<&'static ClassificationRule> {
    RULE_CHAIN.iter().find(|r| r.semantic_type == semantic_type)
}

/// Classify a column.
///
/// ```
/// use dcs_infer::classify;
/// use dcs_model::{Column, Confidence, SemanticType};
///
/// let result = classify(&Column::new("paid", vec!["$10", "$12.50"]));
/// assert_eq!(result.semantic_type, SemanticType::Currency);
/// assert_eq!(result.confidence, Confidence::High);
/// ```
pub fn classify(column: &Column) -> ClassificationResult {
    let sample = ColumnSample::new(column);
    let (rule, result) = RULE_CHAIN
        .iter()
        .find_map(|rule| rule.evaluate(&sample).map(|result| (rule.name, result)))
        .unwrap_or(("text", ClassificationResult::medium(SemanticType::Text)));

    debug!(
        column = column.name(),
        rule,
        semantic_type = %result.semantic_type,
        confidence = %result.confidence,
        non_null = sample.len(),
        "classified column"
    );
    result
}

/// Classify a bare value sequence, inferring its storage kind.
pub fn classify_values(values: &[CellValue]) -> ClassificationResult {
    classify(&Column::from_values(values.to_vec()))
}

fn empty_rule(sample: &ColumnSample<'_>) -> Option<Confidence> {
    sample.is_empty().then_some(Confidence::High)
}

fn boolean_rule(sample: &ColumnSample<'_>) -> Option<Confidence> {
    let distinct: HashSet<String> = sample.texts().iter().map(|t| t.to_lowercase()).collect();
    let matches =
        distinct.len() <= 2 && distinct.iter().all(|t| BOOLEAN_TOKENS.contains(&t.as_str()));
    matches.then_some(Confidence::High)
}

fn currency_rule(sample: &ColumnSample<'_>) -> Option<Confidence> {
    sample
        .texts()
        .iter()
        .any(|t| contains_currency_marker(t))
        .then_some(Confidence::High)
}

fn datetime_rule(sample: &ColumnSample<'_>) -> Option<Confidence> {
    if sample.values().iter().all(|v| parse_cell(v).is_some()) {
        return Some(Confidence::High);
    }
    sample
        .texts()
        .iter()
        .any(|t| has_date_pattern(t))
        .then_some(Confidence::Medium)
}

fn numerical_rule(sample: &ColumnSample<'_>) -> Option<Confidence> {
    let matched = sample
        .texts()
        .iter()
        .filter(|t| NUMERIC_PATTERN.is_match(t))
        .count();
    let share = matched as f64 / sample.len() as f64;
    (share > NUMERIC_MATCH_THRESHOLD || sample.storage().is_numeric()).then_some(Confidence::High)
}

fn categorical_rule(sample: &ColumnSample<'_>) -> Option<Confidence> {
    let distinct = sample.distinct_count();
    let unique_ratio = distinct as f64 / sample.len() as f64;
    (unique_ratio < CATEGORICAL_UNIQUE_RATIO || distinct < CATEGORICAL_MAX_DISTINCT)
        .then_some(Confidence::High)
}

fn text_rule(_sample: &ColumnSample<'_>) -> Option<Confidence> {
    Some(Confidence::Medium)
}
