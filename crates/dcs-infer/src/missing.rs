//! Missing-value detection.
//!
//! A cell is missing when it is a native null, when its text form is one of
//! [`MISSING_TOKENS`] exactly, or when it sits in a text column and is blank
//! after trimming. Matching is an exact allow-list: `"N.A"` or `"missing"`
//! are regular values.

use dcs_model::{CellValue, Column, MissingMask, StorageKind};

/// Literal tokens that stand for "no value".
pub const MISSING_TOKENS: [&str; 16] = [
    "", " ", "NA", "N/A", "na", "n/a", "NaN", "nan", "NULL", "null", "None", "none", "?", "-",
    "--", "n.a.",
];

/// Returns true if `text` is exactly one of the sentinel tokens.
pub fn is_sentinel(text: &str) -> bool {
    MISSING_TOKENS.contains(&text)
}

/// Check a single cell given the storage kind of its column.
pub fn is_missing_cell(value: &CellValue, storage: StorageKind) -> bool {
    if value.is_null() {
        return true;
    }
    let text = value.text_form();
    if is_sentinel(&text) {
        return true;
    }
    storage.is_text() && text.trim().is_empty()
}

/// Detect missing cells of a column.
pub fn detect_missing(column: &Column) -> MissingMask {
    mask_for(column.values(), column.storage())
}

/// Detect missing cells of a bare value sequence, inferring its storage kind.
pub fn detect_missing_values(values: &[CellValue]) -> MissingMask {
    mask_for(values, StorageKind::infer(values))
}

fn mask_for(values: &[CellValue], storage: StorageKind) -> MissingMask {
    MissingMask::new(
        values
            .iter()
            .map(|value| is_missing_cell(value, storage))
            .collect(),
    )
}
