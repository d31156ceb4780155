//! Audit session: orchestrates one sheet end-to-end.

mod ledger;

pub use ledger::ExclusionLedger;

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, ColumnKind};
use crate::config::AuditConfig;
use crate::error::Result;
use crate::input::Sheet;
use crate::output::{self, SavedArtifacts};
use crate::stats::{ColumnSummary, Summarizer};

/// Kind and summary for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnReport {
    /// Column name.
    pub column: String,
    /// Classified kind.
    pub kind: ColumnKind,
    /// Kind-specific statistics, scoped to non-excluded rows.
    pub summary: ColumnSummary,
}

/// Aggregate view of one sheet under the current exclusion mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallStatistics {
    /// Total row count (excluded rows included).
    pub row_count: usize,
    /// Number of rows currently excluded.
    pub excluded_count: usize,
    /// Excluded row indices, ascending.
    pub excluded_rows: Vec<usize>,
    /// One report per column, in sheet column order.
    pub columns: Vec<ColumnReport>,
}

impl OverallStatistics {
    /// Iterate the reports of one kind.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &ColumnReport> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    /// Look up a column's report by name.
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Orchestrates the audit of one sheet.
///
/// Columns are classified once at load; statistics are recomputed eagerly
/// after every ledger mutation, so [`overall_statistics`] is never stale.
/// One session owns one sheet; independent sheets get independent sessions
/// and may be processed in parallel.
///
/// [`overall_statistics`]: AuditSession::overall_statistics
#[derive(Debug)]
pub struct AuditSession {
    config: AuditConfig,
    sheet: Sheet,
    kinds: Vec<ColumnKind>,
    ledger: ExclusionLedger,
    statistics: OverallStatistics,
}

impl AuditSession {
    /// Load a sheet: validate its shape, classify every column, start with
    /// an empty exclusion mask.
    pub fn load(sheet: Sheet, config: AuditConfig) -> Result<Self> {
        sheet.check_shape()?;

        let classifier = Classifier::with_config(config.classifier.clone());
        let kinds: Vec<ColumnKind> = (0..sheet.column_count())
            .map(|i| classifier.classify(&sheet.column_cells(i)))
            .collect();

        let ledger = ExclusionLedger::new(sheet.row_count());
        let statistics = compute_statistics(&sheet, &kinds, &ledger, &config);

        Ok(Self {
            config,
            sheet,
            kinds,
            ledger,
            statistics,
        })
    }

    /// The loaded sheet.
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Classified kinds, in column order.
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Current aggregate statistics. Always reflects the current mask.
    pub fn overall_statistics(&self) -> &OverallStatistics {
        &self.statistics
    }

    /// Mark a row as excluded. No-op if already excluded.
    pub fn mark_excluded(&mut self, row_index: usize) -> Result<()> {
        if self.ledger.set_excluded(row_index, true)? {
            self.refresh();
        }
        Ok(())
    }

    /// Clear a row's exclusion. No-op if not excluded.
    pub fn unmark_excluded(&mut self, row_index: usize) -> Result<()> {
        if self.ledger.set_excluded(row_index, false)? {
            self.refresh();
        }
        Ok(())
    }

    /// Flip a row's exclusion state. Returns the new state.
    pub fn toggle_excluded(&mut self, row_index: usize) -> Result<bool> {
        let excluded = self.ledger.toggle(row_index)?;
        self.refresh();
        Ok(excluded)
    }

    /// Whether a row is currently excluded.
    pub fn is_excluded(&self, row_index: usize) -> bool {
        self.ledger.is_excluded(row_index)
    }

    /// Number of excluded rows.
    pub fn excluded_count(&self) -> usize {
        self.ledger.excluded_count()
    }

    /// Write the annotated copy and summary report to the configured
    /// output directory. All-or-nothing; does not mutate session state.
    /// Repeated saves each produce a fresh artifact pair.
    pub fn save(&self) -> Result<SavedArtifacts> {
        output::write_artifacts(
            &self.sheet,
            &self.statistics,
            self.ledger.snapshot(),
            &self.config.output_dir,
        )
    }

    /// Recompute all summaries against the current mask. Every summary
    /// depends on the mask, so a toggle invalidates all of them.
    fn refresh(&mut self) {
        self.statistics = compute_statistics(&self.sheet, &self.kinds, &self.ledger, &self.config);
    }
}

fn compute_statistics(
    sheet: &Sheet,
    kinds: &[ColumnKind],
    ledger: &ExclusionLedger,
    config: &AuditConfig,
) -> OverallStatistics {
    let summarizer = Summarizer::with_config(config.stats.clone());
    let mask = ledger.snapshot();

    let columns = sheet
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnReport {
            column: name.clone(),
            kind: kinds[i],
            summary: summarizer.summarize(&sheet.column_cells(i), kinds[i], mask),
        })
        .collect();

    OverallStatistics {
        row_count: sheet.row_count(),
        excluded_count: ledger.excluded_count(),
        excluded_rows: mask.iter().copied().collect(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use crate::input::Cell;
    use proptest::prelude::*;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            "test",
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| Cell::parse(v)).collect())
                .collect(),
            b',',
        )
        .unwrap()
    }

    fn amounts_session() -> AuditSession {
        let sheet = sheet(
            &["id", "amount"],
            &[
                &["1", "10"],
                &["2", "20"],
                &["2", "30"],
                &["3", "1000"],
            ],
        );
        AuditSession::load(sheet, AuditConfig::default()).unwrap()
    }

    #[test]
    fn test_load_classifies_columns() {
        let session = amounts_session();
        assert_eq!(session.kinds(), &[ColumnKind::Identifier, ColumnKind::Numeric]);
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_overall_statistics_reflect_exclusions() {
        let mut session = amounts_session();

        let stats = session.overall_statistics();
        let ColumnSummary::Numeric(ref s) = stats.column("amount").unwrap().summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 4);
        assert_eq!(s.outlier_rows, vec![3]);

        session.mark_excluded(3).unwrap();

        let stats = session.overall_statistics();
        assert_eq!(stats.excluded_count, 1);
        assert_eq!(stats.excluded_rows, vec![3]);
        let ColumnSummary::Numeric(ref s) = stats.column("amount").unwrap().summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 20.0);
        assert_eq!(s.max, 30.0);
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut session = amounts_session();
        session.mark_excluded(1).unwrap();
        session.mark_excluded(1).unwrap();
        assert_eq!(session.excluded_count(), 1);

        session.unmark_excluded(1).unwrap();
        session.unmark_excluded(1).unwrap();
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_toggle_pair_restores_statistics() {
        let mut session = amounts_session();
        session.mark_excluded(0).unwrap();

        let before = serde_json::to_value(session.overall_statistics()).unwrap();
        session.toggle_excluded(2).unwrap();
        session.toggle_excluded(2).unwrap();
        let after = serde_json::to_value(session.overall_statistics()).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_invalid_row_index_leaves_state_unchanged() {
        let mut session = amounts_session();
        let before = serde_json::to_value(session.overall_statistics()).unwrap();

        let err = session.mark_excluded(10).unwrap_err();
        assert!(matches!(err, AuditError::InvalidRowIndex { index: 10, .. }));

        let after = serde_json::to_value(session.overall_statistics()).unwrap();
        assert_eq!(before, after);
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn test_zero_column_sheet_rejected_at_load() {
        let bad = Sheet {
            name: "empty".to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
            delimiter: b',',
        };
        let err = AuditSession::load(bad, AuditConfig::default()).unwrap_err();
        assert!(matches!(err, AuditError::UnsupportedInputShape(_)));
    }

    #[test]
    fn test_excluded_count_matches_numeric_count() {
        let mut session = amounts_session();
        session.mark_excluded(0).unwrap();
        session.mark_excluded(3).unwrap();

        let stats = session.overall_statistics();
        let ColumnSummary::Numeric(ref s) = stats.column("amount").unwrap().summary else {
            panic!("expected numeric summary");
        };
        // count = row_count - excluded_count - unparsed_count
        assert_eq!(
            s.count,
            stats.row_count - stats.excluded_count - s.unparsed_count
        );
    }

    proptest! {
        #[test]
        fn prop_double_toggles_cancel(indices in prop::collection::vec(0usize..4, 0..16)) {
            let mut session = amounts_session();
            let before = serde_json::to_value(session.overall_statistics()).unwrap();

            for &idx in &indices {
                session.toggle_excluded(idx).unwrap();
            }
            for &idx in indices.iter().rev() {
                session.toggle_excluded(idx).unwrap();
            }

            let after = serde_json::to_value(session.overall_statistics()).unwrap();
            prop_assert_eq!(before, after);
            prop_assert_eq!(session.excluded_count(), 0);
        }
    }
}
