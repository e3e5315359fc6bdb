//! Monetary format configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Character separating the integer part from the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DecimalSeparator {
    #[default]
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = ",")]
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            DecimalSeparator::Dot => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

impl TryFrom<char> for DecimalSeparator {
    type Error = ModelError;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '.' => Ok(DecimalSeparator::Dot),
            ',' => Ok(DecimalSeparator::Comma),
            other => Err(ModelError::InvalidSeparator {
                kind: "decimal",
                value: other,
            }),
        }
    }
}

/// Digit-grouping character, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThousandSeparator {
    #[default]
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = " ")]
    Space,
    #[serde(rename = "none")]
    None,
}

impl ThousandSeparator {
    pub fn as_char(&self) -> Option<char> {
        match self {
            ThousandSeparator::Comma => Some(','),
            ThousandSeparator::Dot => Some('.'),
            ThousandSeparator::Space => Some(' '),
            ThousandSeparator::None => None,
        }
    }

    /// Grouping that pairs with `decimal`: `.` after a decimal comma, `,`
    /// otherwise.
    pub fn default_for(decimal: DecimalSeparator) -> Self {
        match decimal {
            DecimalSeparator::Comma => ThousandSeparator::Dot,
            DecimalSeparator::Dot => ThousandSeparator::Comma,
        }
    }

    /// Parse an optional separator character; `None` means no grouping.
    pub fn from_char(value: Option<char>) -> Result<Self> {
        match value {
            None => Ok(ThousandSeparator::None),
            Some(',') => Ok(ThousandSeparator::Comma),
            Some('.') => Ok(ThousandSeparator::Dot),
            Some(' ') => Ok(ThousandSeparator::Space),
            Some(other) => Err(ModelError::InvalidSeparator {
                kind: "thousands",
                value: other,
            }),
        }
    }
}

impl TryFrom<char> for ThousandSeparator {
    type Error = ModelError;

    fn try_from(value: char) -> Result<Self> {
        Self::from_char(Some(value))
    }
}

/// Punctuation convention of a monetary text format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCurrencyFormat")]
pub struct CurrencyFormatConfig {
    symbol: String,
    decimal_separator: DecimalSeparator,
    thousand_separator: ThousandSeparator,
}

impl CurrencyFormatConfig {
    /// Build a configuration; identical separators are rejected.
    pub fn new(
        symbol: impl Into<String>,
        decimal_separator: DecimalSeparator,
        thousand_separator: ThousandSeparator,
    ) -> Result<Self> {
        if thousand_separator.as_char() == Some(decimal_separator.as_char()) {
            return Err(ModelError::ConflictingSeparators {
                separator: decimal_separator.as_char(),
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            decimal_separator,
            thousand_separator,
        })
    }

    /// Build a configuration from raw separator characters.
    pub fn from_chars(
        symbol: impl Into<String>,
        decimal_separator: char,
        thousand_separator: Option<char>,
    ) -> Result<Self> {
        Self::new(
            symbol,
            DecimalSeparator::try_from(decimal_separator)?,
            ThousandSeparator::from_char(thousand_separator)?,
        )
    }

    /// `$1,000.50`
    pub fn us() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_separator: DecimalSeparator::Dot,
            thousand_separator: ThousandSeparator::Comma,
        }
    }

    /// `€1.000,50`
    pub fn european() -> Self {
        Self {
            symbol: "€".to_string(),
            decimal_separator: DecimalSeparator::Comma,
            thousand_separator: ThousandSeparator::Dot,
        }
    }

    /// `$1 000.50`
    pub fn space_grouped() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_separator: DecimalSeparator::Dot,
            thousand_separator: ThousandSeparator::Space,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimal_separator(&self) -> DecimalSeparator {
        self.decimal_separator
    }

    pub fn thousand_separator(&self) -> ThousandSeparator {
        self.thousand_separator
    }
}

impl Default for CurrencyFormatConfig {
    fn default() -> Self {
        Self::us()
    }
}

impl fmt::Display for CurrencyFormatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thousands = match self.thousand_separator.as_char() {
            Some(' ') => "space".to_string(),
            Some(c) => c.to_string(),
            None => "none".to_string(),
        };
        write!(
            f,
            "symbol '{}', decimal '{}', thousands {}",
            self.symbol,
            self.decimal_separator.as_char(),
            thousands
        )
    }
}

/// Unvalidated wire form, checked through [`CurrencyFormatConfig::new`].
///
/// A missing thousands separator follows [`ThousandSeparator::default_for`].
#[derive(Deserialize)]
struct RawCurrencyFormat {
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default)]
    decimal_separator: DecimalSeparator,
    #[serde(default)]
    thousand_separator: Option<ThousandSeparator>,
}

fn default_symbol() -> String {
    "$".to_string()
}

impl TryFrom<RawCurrencyFormat> for CurrencyFormatConfig {
    type Error = ModelError;

    fn try_from(raw: RawCurrencyFormat) -> Result<Self> {
        let thousands = raw
            .thousand_separator
            .unwrap_or_else(|| ThousandSeparator::default_for(raw.decimal_separator));
        Self::new(raw.symbol, raw.decimal_separator, thousands)
    }
}
