//! Tabular data model for Data Cleaning Studio.
//!
//! This crate provides the types shared by the inference engine, the cleaning
//! session and the ingestion layer:
//!
//! - [`CellValue`]: a single raw value (null, bool, int, float, text, datetime)
//! - [`Column`] / [`StorageKind`]: named value sequences and their native representation
//! - [`Table`]: equally long, uniquely named columns
//! - [`ClassificationResult`]: semantic type plus confidence
//! - [`MissingMask`]: per-cell missing flags
//! - [`CurrencyFormatConfig`]: separator convention for monetary text
//!
//! # Example
//!
//! ```
//! use dcs_model::{CellValue, Column, StorageKind, Table};
//!
//! let table = Table::new(vec![
//!     Column::new("price", vec!["$1,000.50", "$20.00"]),
//!     Column::new("qty", vec![3i64, 4]),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.height(), 2);
//! assert_eq!(table.column("qty").unwrap().storage(), StorageKind::Integer);
//! assert_eq!(table.column("price").unwrap().values()[1], CellValue::text("$20.00"));
//! ```

mod cell;
mod column;
mod currency;
mod error;
mod semantic;
mod table;

pub use cell::{CellKey, CellValue, DATETIME_FORMAT, format_float};
pub use column::{Column, MissingMask, StorageKind};
pub use currency::{CurrencyFormatConfig, DecimalSeparator, ThousandSeparator};
pub use error::{ModelError, Result};
pub use semantic::{ClassificationResult, Confidence, SemanticType};
pub use table::Table;
