//! Exclusion ledger: which rows the reviewer has marked as potential errors.

use std::collections::BTreeSet;

use crate::error::{AuditError, Result};

/// Tracks the set of excluded row indices for one sheet.
///
/// Membership is bounds-checked against the sheet's row count; toggling is
/// its own inverse, so a second toggle on the same index reverses the first.
#[derive(Debug, Clone)]
pub struct ExclusionLedger {
    row_count: usize,
    excluded: BTreeSet<usize>,
}

impl ExclusionLedger {
    /// Create an empty ledger for a sheet with `row_count` rows.
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            excluded: BTreeSet::new(),
        }
    }

    /// Flip the exclusion state of a row. Returns the new state.
    pub fn toggle(&mut self, row_index: usize) -> Result<bool> {
        self.check_bounds(row_index)?;

        if self.excluded.remove(&row_index) {
            Ok(false)
        } else {
            self.excluded.insert(row_index);
            Ok(true)
        }
    }

    /// Set the exclusion state of a row directly. Returns whether the
    /// ledger changed.
    pub fn set_excluded(&mut self, row_index: usize, excluded: bool) -> Result<bool> {
        self.check_bounds(row_index)?;

        let changed = if excluded {
            self.excluded.insert(row_index)
        } else {
            self.excluded.remove(&row_index)
        };
        Ok(changed)
    }

    /// Whether a row is currently excluded.
    pub fn is_excluded(&self, row_index: usize) -> bool {
        self.excluded.contains(&row_index)
    }

    /// Number of excluded rows.
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    /// Read-only view of the exclusion mask.
    pub fn snapshot(&self) -> &BTreeSet<usize> {
        &self.excluded
    }

    fn check_bounds(&self, row_index: usize) -> Result<()> {
        if row_index >= self.row_count {
            return Err(AuditError::InvalidRowIndex {
                index: row_index,
                row_count: self.row_count,
            });
        }
        Ok(())
    }
}
