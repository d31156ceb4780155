//! Sheet representation and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

use super::cell::Cell;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the sheet was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a loaded file.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// One table of data: ordered headers and rows of tagged cells.
///
/// Immutable once constructed; the audit engine records exclusions
/// separately and never mutates the sheet itself.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet identifier (file stem or worksheet name).
    pub name: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order), one cell per column.
    pub rows: Vec<Vec<Cell>>,
    /// The delimiter of the source file, preserved for write-back.
    pub delimiter: u8,
}

impl Sheet {
    /// Create a sheet, validating its shape.
    ///
    /// Fails with [`AuditError::UnsupportedInputShape`] when there are no
    /// columns or a row's length differs from the header count.
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<Cell>>,
        delimiter: u8,
    ) -> Result<Self> {
        let sheet = Self {
            name: name.into(),
            headers,
            rows,
            delimiter,
        };
        sheet.check_shape()?;
        Ok(sheet)
    }

    /// Validate the shape contract: at least one column, uniform row
    /// lengths.
    pub fn check_shape(&self) -> Result<()> {
        if self.headers.is_empty() {
            return Err(AuditError::UnsupportedInputShape(
                "sheet has no columns".to_string(),
            ));
        }

        for (idx, row) in self.rows.iter().enumerate() {
            if row.len() != self.headers.len() {
                return Err(AuditError::UnsupportedInputShape(format!(
                    "row {} has {} cells but the sheet has {} columns",
                    idx,
                    row.len(),
                    self.headers.len()
                )));
            }
        }

        Ok(())
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all cells of a column by index.
    pub fn column_cells(&self, index: usize) -> Vec<&Cell> {
        self.rows.iter().filter_map(|row| row.get(index)).collect()
    }

    /// Get a column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}
