//! In-memory tables of equally long, uniquely named columns.

use std::collections::BTreeSet;

use crate::cell::CellValue;
use crate::column::Column;
use crate::error::{ModelError, Result};

/// Ordered collection of columns sharing one height.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let height = columns.first().map_or(0, Column::len);

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ModelError::DuplicateColumn {
                    name: column.name().to_string(),
                });
            }
            if column.len() != height {
                return Err(ModelError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: height,
                    found: column.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Append a column; it must match the current height unless the table is empty.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(column.name()) {
            return Err(ModelError::DuplicateColumn {
                name: column.name().to_string(),
            });
        }
        if !self.columns.is_empty() && column.len() != self.height() {
            return Err(ModelError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.height(),
                found: column.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replace the values of an existing column, keeping its position.
    pub fn replace_column(&mut self, column: Column) -> Result<()> {
        let height = self.height();
        if column.len() != height {
            return Err(ModelError::LengthMismatch {
                column: column.name().to_string(),
                expected: height,
                found: column.len(),
            });
        }
        let slot = self.column_mut(column.name())?;
        *slot = column;
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let index = self
            .columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                name: name.to_string(),
            })?;
        Ok(self.columns.remove(index))
    }

    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        if new.trim().is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        if old == new {
            return self.column(old).map(|_| ());
        }
        if self.has_column(new) {
            return Err(ModelError::DuplicateColumn {
                name: new.to_string(),
            });
        }
        self.column_mut(old)?.set_name(new.to_string());
        Ok(())
    }

    /// Keep the rows whose flag is true; returns the number of rows removed.
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<usize> {
        let height = self.height();
        if keep.len() != height {
            return Err(ModelError::MaskLength {
                expected: height,
                found: keep.len(),
            });
        }
        for column in &mut self.columns {
            column.retain_by(keep);
        }
        Ok(height - self.height())
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.height() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values()[index]).collect())
    }
}
