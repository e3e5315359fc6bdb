//! Currency normalization.
//!
//! Converts monetary text such as `$1,000.50`, `€1.000,50` or `1 000,50 EUR`
//! into numbers. Each cell goes through a fixed pipeline:
//!
//! 1. remove every known currency symbol and code,
//! 2. apply the configured separator convention,
//! 3. drop anything that is not a digit, `.` or `-`,
//! 4. parse; failures become `None`.
//!
//! Step 3 is best-effort: stray letters or punctuation are discarded
//! silently, so badly malformed text may parse to an unexpected number.

use dcs_model::{CellValue, Column, CurrencyFormatConfig, DecimalSeparator, ThousandSeparator};
use tracing::{debug, warn};

use crate::error::Result;

/// Single-character currency symbols recognized by the classifier.
pub const CURRENCY_SYMBOLS: [char; 21] = [
    '$', '€', '£', '¥', '₹', '₽', '₦', '₨', '₪', '₫', '₩', '₴', '₸', '₵', '₲', '₱', '₡', '₺', '₼',
    '₾', '₿',
];

/// ISO codes recognized by the classifier.
pub const CURRENCY_CODES: [&str; 4] = ["RWF", "USD", "EUR", "GBP"];

/// Symbols and codes stripped before separator handling.
pub const REMOVED_SYMBOLS: [&str; 12] = [
    "$", "€", "£", "¥", "₹", "₽", "₦", "₨", "RWF", "USD", "EUR", "GBP",
];

/// Returns true if the text carries a currency symbol or code.
pub fn contains_currency_marker(text: &str) -> bool {
    text.contains(&CURRENCY_SYMBOLS[..]) || CURRENCY_CODES.iter().any(|code| text.contains(code))
}

/// Parses monetary text under one separator convention.
#[derive(Debug, Clone, Default)]
pub struct CurrencyNormalizer {
    config: CurrencyFormatConfig,
}

impl CurrencyNormalizer {
    pub fn new(config: CurrencyFormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CurrencyFormatConfig {
        &self.config
    }

    /// Normalize one piece of monetary text.
    ///
    /// ```
    /// use dcs_infer::CurrencyNormalizer;
    /// use dcs_model::CurrencyFormatConfig;
    ///
    /// let us = CurrencyNormalizer::new(CurrencyFormatConfig::us());
    /// assert_eq!(us.normalize_text("$1,000.50"), Some(1000.50));
    ///
    /// let eu = CurrencyNormalizer::new(CurrencyFormatConfig::european());
    /// assert_eq!(eu.normalize_text("€1.000,50"), Some(1000.50));
    /// assert_eq!(eu.normalize_text("n/a"), None);
    /// ```
    pub fn normalize_text(&self, text: &str) -> Option<f64> {
        let mut cleaned = text.to_string();
        for symbol in REMOVED_SYMBOLS {
            cleaned = cleaned.replace(symbol, "");
        }

        let decimal = self.config.decimal_separator();
        let thousands = self.config.thousand_separator();
        let cleaned = match (decimal, thousands) {
            (DecimalSeparator::Comma, ThousandSeparator::Dot) => {
                cleaned.replace('.', "").replace(',', ".")
            }
            (DecimalSeparator::Comma, ThousandSeparator::Space) => {
                cleaned.replace(' ', "").replace(',', ".")
            }
            (_, ThousandSeparator::Space) => cleaned.replace(' ', ""),
            _ => cleaned.replace(',', ""),
        };

        let digits: String = cleaned
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        digits.parse().ok()
    }

    /// Normalize one cell. Native nulls stay null.
    pub fn normalize_cell(&self, value: &CellValue) -> Option<f64> {
        if value.is_null() {
            return None;
        }
        self.normalize_text(&value.text_form())
    }

    /// Normalize a bare value sequence; output is aligned with the input.
    pub fn normalize_values(&self, values: &[CellValue]) -> Vec<Option<f64>> {
        values.iter().map(|v| self.normalize_cell(v)).collect()
    }

    /// Normalize a column; output is aligned with the column.
    pub fn normalize(&self, column: &Column) -> Vec<Option<f64>> {
        let output = self.normalize_values(column.values());
        let failed = column
            .values()
            .iter()
            .zip(&output)
            .filter(|(input, parsed)| !input.is_null() && parsed.is_none())
            .count();

        if failed > 0 {
            warn!(
                column = column.name(),
                failed,
                total = column.len(),
                "currency values could not be parsed"
            );
        } else {
            debug!(column = column.name(), rows = column.len(), "normalized currency column");
        }
        output
    }
}

/// Normalize monetary values with raw separator characters.
///
/// Rejects separator characters outside the supported set and identical
/// decimal/thousands separators instead of guessing.
///
/// ```
/// use dcs_infer::normalize_currency;
/// use dcs_model::CellValue;
///
/// let values = vec![CellValue::text("$1,000.50"), CellValue::text("$2,000.00")];
/// let parsed = normalize_currency(&values, "$", '.', Some(',')).unwrap();
/// assert_eq!(parsed, vec![Some(1000.50), Some(2000.00)]);
///
/// assert!(normalize_currency(&values, "$", ';', Some(',')).is_err());
/// ```
pub fn normalize_currency(
    values: &[CellValue],
    symbol: &str,
    decimal_sep: char,
    thousand_sep: Option<char>,
) -> Result<Vec<Option<f64>>> {
    let config = CurrencyFormatConfig::from_chars(symbol, decimal_sep, thousand_sep)?;
    Ok(CurrencyNormalizer::new(config).normalize_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferError;
    use dcs_model::ModelError;

    fn with(decimal: char, thousands: Option<char>) -> CurrencyNormalizer {
        CurrencyNormalizer::new(CurrencyFormatConfig::from_chars("$", decimal, thousands).unwrap())
    }

    #[test]
    fn test_us_format() {
        let n = with('.', Some(','));
        assert_eq!(n.normalize_text("$1,000.50"), Some(1000.5));
        assert_eq!(n.normalize_text("USD 12,345"), Some(12345.0));
        assert_eq!(n.normalize_text("-$3.25"), Some(-3.25));
    }

    #[test]
    fn test_european_format() {
        let n = with(',', Some('.'));
        assert_eq!(n.normalize_text("€1.000,50"), Some(1000.5));
        assert_eq!(n.normalize_text("1.234.567,89 EUR"), Some(1234567.89));
    }

    #[test]
    fn test_space_grouping() {
        assert_eq!(with('.', Some(' ')).normalize_text("$1 000.50"), Some(1000.5));
        assert_eq!(with(',', Some(' ')).normalize_text("1 000,50 £"), Some(1000.5));
    }

    #[test]
    fn test_no_grouping_drops_commas() {
        // Without a thousands separator the default branch still removes commas.
        assert_eq!(with('.', None).normalize_text("$1,000.5"), Some(1000.5));
        assert_eq!(with(',', None).normalize_text("1,50"), Some(150.0));
    }

    #[test]
    fn test_codes_removed_regardless_of_symbol() {
        let n = CurrencyNormalizer::new(CurrencyFormatConfig::us());
        assert_eq!(n.normalize_text("RWF 5,000"), Some(5000.0));
        assert_eq!(n.normalize_text("GBP7"), Some(7.0));
        assert_eq!(n.normalize_text("¥300"), Some(300.0));
    }

    #[test]
    fn test_unlisted_symbols_dropped_by_final_pass() {
        let n = CurrencyNormalizer::new(CurrencyFormatConfig::us());
        assert_eq!(n.normalize_text("₩1,500"), Some(1500.0));
        assert_eq!(n.normalize_text("approx 12"), Some(12.0));
    }

    #[test]
    fn test_unparseable_becomes_none() {
        let n = CurrencyNormalizer::new(CurrencyFormatConfig::us());
        assert_eq!(n.normalize_text("free"), None);
        assert_eq!(n.normalize_text("$"), None);
        assert_eq!(n.normalize_text("1.2.3"), None);
        assert_eq!(n.normalize_text("10-20"), None);
        assert_eq!(n.normalize_cell(&CellValue::Null), None);
        assert_eq!(n.normalize_cell(&CellValue::Float(f64::NAN)), None);
    }

    #[test]
    fn test_numeric_cells_pass_through() {
        let n = CurrencyNormalizer::new(CurrencyFormatConfig::us());
        assert_eq!(n.normalize_cell(&CellValue::Int(42)), Some(42.0));
        assert_eq!(n.normalize_cell(&CellValue::Float(2000.0)), Some(2000.0));
    }

    #[test]
    fn test_length_preserved() {
        let col = Column::new("price", vec![Some("$1"), None, Some("bad"), Some("$4")]);
        let out = CurrencyNormalizer::default().normalize(&col);
        assert_eq!(out, vec![Some(1.0), None, None, Some(4.0)]);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let values = vec![CellValue::text("$1")];
        assert_eq!(
            normalize_currency(&values, "$", ',', Some(',')),
            Err(InferError::CurrencyFormat(
                ModelError::ConflictingSeparators { separator: ',' }
            ))
        );
        assert!(normalize_currency(&values, "$", '.', Some('_')).is_err());
    }

    #[test]
    fn test_currency_markers() {
        assert!(contains_currency_marker("₿0.5"));
        assert!(contains_currency_marker("100 USD"));
        assert!(!contains_currency_marker("100 usd"));
        assert!(!contains_currency_marker("1,000.50"));
    }
}
