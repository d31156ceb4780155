//! Persistence writer: annotated copy and summary report.
//!
//! Both artifacts for a sheet are committed atomically: they are first
//! written to `.tmp` siblings in the output directory and only renamed into
//! place once both writes succeed.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::input::Sheet;
use crate::session::OverallStatistics;
use crate::stats::{ColumnSummary, DateSummary, IdentifierSummary, NumericSummary, TextSummary};

/// Name of the exclusion flag column appended to the annotated copy.
pub const EXCLUDED_COLUMN: &str = "excluded";

/// Paths of the artifact pair produced by a save.
#[derive(Debug, Clone)]
pub struct SavedArtifacts {
    /// The annotated copy of the sheet.
    pub annotated_path: PathBuf,
    /// The JSON summary report.
    pub report_path: PathBuf,
}

/// The summary report: one record set per column kind, keyed by column
/// name, plus sheet-level counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Sheet identifier.
    pub sheet: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Total row count.
    pub row_count: usize,
    /// Number of excluded rows at save time.
    pub excluded_count: usize,
    /// Excluded row indices, ascending.
    pub excluded_rows: Vec<usize>,
    /// Identifier column summaries.
    pub identifier: IndexMap<String, IdentifierSummary>,
    /// Date column summaries.
    pub date: IndexMap<String, DateSummary>,
    /// Numeric column summaries.
    pub numeric: IndexMap<String, NumericSummary>,
    /// Text column summaries.
    pub text: IndexMap<String, TextSummary>,
}

impl SummaryReport {
    /// Partition overall statistics into the per-kind report maps.
    pub fn from_statistics(sheet_name: &str, statistics: &OverallStatistics) -> Self {
        let mut report = Self {
            sheet: sheet_name.to_string(),
            generated_at: Utc::now(),
            row_count: statistics.row_count,
            excluded_count: statistics.excluded_count,
            excluded_rows: statistics.excluded_rows.clone(),
            identifier: IndexMap::new(),
            date: IndexMap::new(),
            numeric: IndexMap::new(),
            text: IndexMap::new(),
        };

        for column in &statistics.columns {
            let name = column.column.clone();
            match &column.summary {
                ColumnSummary::Identifier(s) => {
                    report.identifier.insert(name, s.clone());
                }
                ColumnSummary::Date(s) => {
                    report.date.insert(name, s.clone());
                }
                ColumnSummary::Numeric(s) => {
                    report.numeric.insert(name, s.clone());
                }
                ColumnSummary::Text(s) => {
                    report.text.insert(name, s.clone());
                }
            }
        }

        report
    }
}

/// Write the annotated copy and summary report for a sheet.
///
/// Either both files are committed or neither is.
pub fn write_artifacts(
    sheet: &Sheet,
    statistics: &OverallStatistics,
    mask: &BTreeSet<usize>,
    output_dir: &Path,
) -> Result<SavedArtifacts> {
    fs::create_dir_all(output_dir).map_err(|e| {
        AuditError::Persistence(format!(
            "failed to create output directory '{}': {}",
            output_dir.display(),
            e
        ))
    })?;

    let extension = if sheet.delimiter == b'\t' { "tsv" } else { "csv" };
    let annotated_path = output_dir.join(format!("{}_audit.{}", sheet.name, extension));
    let report_path = output_dir.join(format!("{}_summary.json", sheet.name));

    let annotated_tmp = tmp_path(&annotated_path);
    let report_tmp = tmp_path(&report_path);

    let written = write_annotated(sheet, mask, &annotated_tmp)
        .and_then(|()| write_report(sheet, statistics, &report_tmp));

    if let Err(e) = written {
        let _ = fs::remove_file(&annotated_tmp);
        let _ = fs::remove_file(&report_tmp);
        return Err(e);
    }

    fs::rename(&report_tmp, &report_path).map_err(|e| {
        let _ = fs::remove_file(&annotated_tmp);
        let _ = fs::remove_file(&report_tmp);
        AuditError::Persistence(format!(
            "failed to commit '{}': {}",
            report_path.display(),
            e
        ))
    })?;

    fs::rename(&annotated_tmp, &annotated_path).map_err(|e| {
        // Keep the pair consistent: withdraw the report we just committed.
        let _ = fs::remove_file(&report_path);
        let _ = fs::remove_file(&annotated_tmp);
        AuditError::Persistence(format!(
            "failed to commit '{}': {}",
            annotated_path.display(),
            e
        ))
    })?;

    Ok(SavedArtifacts {
        annotated_path,
        report_path,
    })
}

/// Write the sheet's raw cells plus the exclusion flag column.
fn write_annotated(sheet: &Sheet, mask: &BTreeSet<usize>, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        AuditError::Persistence(format!("failed to create '{}': {}", path.display(), e))
    })?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(sheet.delimiter)
        .from_writer(BufWriter::new(file));

    let mut header: Vec<&str> = sheet.headers.iter().map(String::as_str).collect();
    header.push(EXCLUDED_COLUMN);
    writer.write_record(&header)?;

    for (idx, row) in sheet.rows.iter().enumerate() {
        let mut record: Vec<&str> = row.iter().map(|cell| cell.raw()).collect();
        let flag = if mask.contains(&idx) { "true" } else { "false" };
        record.push(flag);
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| {
        AuditError::Persistence(format!("failed to write '{}': {}", path.display(), e))
    })?;

    Ok(())
}

/// Serialize the summary report as pretty JSON.
fn write_report(sheet: &Sheet, statistics: &OverallStatistics, path: &Path) -> Result<()> {
    let report = SummaryReport::from_statistics(&sheet.name, statistics);

    let file = File::create(path).map_err(|e| {
        AuditError::Persistence(format!("failed to create '{}': {}", path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).map_err(|e| {
        AuditError::Persistence(format!("failed to serialize summary report: {}", e))
    })?;

    writer.flush().map_err(|e| {
        AuditError::Persistence(format!("failed to write '{}': {}", path.display(), e))
    })?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use crate::input::Parser;
    use crate::session::AuditSession;

    const DATA: &[u8] = b"id,amount,note\nA1,10,ok\nB2,20,fine\nC3,30,\nD4,1000,odd one\n";

    fn saved_session(dir: &Path) -> (AuditSession, SavedArtifacts) {
        let parser = Parser::new();
        let sheet = parser.parse_bytes("orders", DATA, b',').unwrap();
        let config = AuditConfig::default().with_output_dir(dir);
        let mut session = AuditSession::load(sheet, config).unwrap();
        session.mark_excluded(3).unwrap();

        let artifacts = session.save().unwrap();
        (session, artifacts)
    }

    #[test]
    fn test_annotated_copy_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (session, artifacts) = saved_session(dir.path());

        let bytes = fs::read(&artifacts.annotated_path).unwrap();
        let reloaded = Parser::new()
            .parse_bytes("orders_audit", &bytes, b',')
            .unwrap();

        // One appended column
        assert_eq!(
            reloaded.column_count(),
            session.sheet().column_count() + 1
        );
        assert_eq!(reloaded.headers.last().map(String::as_str), Some("excluded"));

        // Original cells reproduced cell-for-cell
        for (r, row) in session.sheet().rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                assert_eq!(reloaded.get(r, c).unwrap().raw(), cell.raw());
            }
        }

        // Exclusion flags aligned by row index
        let flag_col = reloaded.column_count() - 1;
        assert_eq!(reloaded.get(0, flag_col).unwrap().raw(), "false");
        assert_eq!(reloaded.get(3, flag_col).unwrap().raw(), "true");
    }

    #[test]
    fn test_summary_report_contents() {
        let dir = tempfile::tempdir().unwrap();
        let (_, artifacts) = saved_session(dir.path());

        let file = fs::File::open(&artifacts.report_path).unwrap();
        let report: SummaryReport = serde_json::from_reader(file).unwrap();

        assert_eq!(report.sheet, "orders");
        assert_eq!(report.row_count, 4);
        assert_eq!(report.excluded_count, 1);
        assert_eq!(report.excluded_rows, vec![3]);
        assert!(report.identifier.contains_key("id"));
        assert!(report.numeric.contains_key("amount"));
        assert!(report.text.contains_key("note"));

        // Statistics reflect the exclusion
        let amount = &report.numeric["amount"];
        assert_eq!(amount.count, 3);
        assert_eq!(amount.mean, 20.0);
    }

    #[test]
    fn test_save_twice_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, first) = saved_session(dir.path());

        session.unmark_excluded(3).unwrap();
        let second = session.save().unwrap();

        assert_eq!(first.report_path, second.report_path);
        let file = fs::File::open(&second.report_path).unwrap();
        let report: SummaryReport = serde_json::from_reader(file).unwrap();
        assert_eq!(report.excluded_count, 0);
    }

    #[test]
    fn test_failed_save_leaves_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the output directory should be
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();

        let parser = Parser::new();
        let sheet = parser.parse_bytes("orders", DATA, b',').unwrap();
        let config = AuditConfig::default().with_output_dir(&blocker);
        let session = AuditSession::load(sheet, config).unwrap();

        let err = session.save().unwrap_err();
        assert!(matches!(err, AuditError::Persistence(_)));
        assert!(!blocker.join("orders_audit.csv").exists());
        assert!(!blocker.join("orders_summary.json").exists());
    }
}
