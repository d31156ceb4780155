//! Per-kind column statistics, scoped to non-excluded rows.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::ColumnKind;
use crate::input::Cell;

/// Statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// IQR multiplier for outlier candidate detection. A value is a
    /// candidate when it falls outside `[q1 - k*IQR, q3 + k*IQR]`.
    /// Default 1.5.
    pub iqr_multiplier: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
        }
    }
}

/// Summary for an identifier column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierSummary {
    /// Number of non-empty values.
    pub non_null_count: usize,
    /// Number of distinct non-empty values.
    pub distinct_count: usize,
    /// Number of distinct values shared by more than one row.
    pub duplicate_count: usize,
    /// The duplicated values themselves.
    pub duplicate_values: Vec<String>,
    /// Histogram of value lengths (length -> occurrences).
    pub length_counts: IndexMap<usize, usize>,
    /// Whether every value consists of digits only.
    pub all_numeric: bool,
    /// Whether every value is alphanumeric.
    pub all_alphanumeric: bool,
}

/// Summary for a date column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateSummary {
    /// Number of values that parsed as dates.
    pub count: usize,
    /// Earliest date.
    pub min: Option<NaiveDate>,
    /// Latest date.
    pub max: Option<NaiveDate>,
    /// Median date (lower median for even counts).
    pub median: Option<NaiveDate>,
    /// Number of empty or unparsable values.
    pub unparsed_count: usize,
    /// Distribution bucketed by month (`YYYY-MM` -> occurrences),
    /// chronologically ordered.
    pub month_counts: IndexMap<String, usize>,
    /// Row indices of IQR outlier candidates (dates mapped to day offsets).
    pub outlier_rows: Vec<usize>,
}

/// Summary for a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Number of values that parsed as numbers.
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation; 0.0 for fewer than two values.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Number of empty or unparsable values.
    pub unparsed_count: usize,
    /// Row indices of IQR outlier candidates. Candidates are surfaced for
    /// review, never auto-excluded.
    pub outlier_rows: Vec<usize>,
}

impl NumericSummary {
    /// The interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Summary for a text column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSummary {
    /// Number of non-empty values.
    pub count: usize,
    /// Number of distinct non-empty values.
    pub distinct_count: usize,
    /// The most frequent value(s); ties are all reported.
    pub most_frequent: Vec<String>,
    /// Occurrence count of the most frequent value(s).
    pub most_frequent_count: usize,
    /// Number of empty values.
    pub empty_count: usize,
}

/// Kind-specific statistics for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Identifier(IdentifierSummary),
    Date(DateSummary),
    Numeric(NumericSummary),
    Text(TextSummary),
}

/// Computes column summaries over rows not in the exclusion mask.
pub struct Summarizer {
    config: StatsConfig,
}

impl Summarizer {
    /// Create a summarizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(StatsConfig::default())
    }

    /// Create a summarizer with custom configuration.
    pub fn with_config(config: StatsConfig) -> Self {
        Self { config }
    }

    /// Summarize a column for its kind, skipping rows in `mask`.
    ///
    /// Never fails: malformed values are counted, not propagated.
    pub fn summarize(
        &self,
        cells: &[&Cell],
        kind: ColumnKind,
        mask: &BTreeSet<usize>,
    ) -> ColumnSummary {
        let included: Vec<(usize, &Cell)> = cells
            .iter()
            .copied()
            .enumerate()
            .filter(|(idx, _)| !mask.contains(idx))
            .collect();

        match kind {
            ColumnKind::Identifier => ColumnSummary::Identifier(summarize_identifier(&included)),
            ColumnKind::Date => ColumnSummary::Date(self.summarize_date(&included)),
            ColumnKind::Numeric => ColumnSummary::Numeric(self.summarize_numeric(&included)),
            ColumnKind::Text => ColumnSummary::Text(summarize_text(&included)),
        }
    }

    fn summarize_date(&self, included: &[(usize, &Cell)]) -> DateSummary {
        let parsed: Vec<(usize, NaiveDate)> = included
            .iter()
            .filter_map(|(idx, cell)| cell.as_date().map(|d| (*idx, d)))
            .collect();

        let unparsed_count = included.len() - parsed.len();

        let mut dates: Vec<NaiveDate> = parsed.iter().map(|(_, d)| *d).collect();
        dates.sort_unstable();

        let min = dates.first().copied();
        let max = dates.last().copied();
        let median = if dates.is_empty() {
            None
        } else {
            Some(dates[(dates.len() - 1) / 2])
        };

        let mut month_counts: IndexMap<String, usize> = IndexMap::new();
        for date in &dates {
            let bucket = format!("{:04}-{:02}", date.year(), date.month());
            *month_counts.entry(bucket).or_insert(0) += 1;
        }

        // Outlier detection over day offsets, same IQR rule as numerics.
        let day_values: Vec<f64> = dates.iter().map(|d| f64::from(d.num_days_from_ce())).collect();
        let outlier_rows = if day_values.is_empty() {
            Vec::new()
        } else {
            let (lower, upper) = self.outlier_bounds(&day_values);
            parsed
                .iter()
                .filter(|(_, d)| {
                    let v = f64::from(d.num_days_from_ce());
                    v < lower || v > upper
                })
                .map(|(idx, _)| *idx)
                .collect()
        };

        DateSummary {
            count: dates.len(),
            min,
            max,
            median,
            unparsed_count,
            month_counts,
            outlier_rows,
        }
    }

    fn summarize_numeric(&self, included: &[(usize, &Cell)]) -> NumericSummary {
        let parsed: Vec<(usize, f64)> = included
            .iter()
            .filter_map(|(idx, cell)| cell.as_number().map(|v| (*idx, v)))
            .collect();

        let unparsed_count = included.len() - parsed.len();

        let mut values: Vec<f64> = parsed.iter().map(|(_, v)| *v).collect();
        values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if values.is_empty() {
            return NumericSummary {
                count: 0,
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
                q1: 0.0,
                median: 0.0,
                q3: 0.0,
                unparsed_count,
                outlier_rows: Vec::new(),
            };
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            0.0
        } else {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64).sqrt()
        };

        let (lower, upper) = self.outlier_bounds(&values);
        let outlier_rows: Vec<usize> = parsed
            .iter()
            .filter(|(_, v)| *v < lower || *v > upper)
            .map(|(idx, _)| *idx)
            .collect();

        NumericSummary {
            count,
            mean,
            std,
            min: values[0],
            max: values[count - 1],
            q1: percentile(&values, 25.0),
            median: percentile(&values, 50.0),
            q3: percentile(&values, 75.0),
            unparsed_count,
            outlier_rows,
        }
    }

    /// IQR fence for a sorted sample.
    fn outlier_bounds(&self, sorted: &[f64]) -> (f64, f64) {
        let q1 = percentile(sorted, 25.0);
        let q3 = percentile(sorted, 75.0);
        let iqr = q3 - q1;
        (
            q1 - self.config.iqr_multiplier * iqr,
            q3 + self.config.iqr_multiplier * iqr,
        )
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize_identifier(included: &[(usize, &Cell)]) -> IdentifierSummary {
    let values: Vec<&str> = included
        .iter()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(_, cell)| cell.raw().trim())
        .collect();

    let mut value_counts: IndexMap<&str, usize> = IndexMap::new();
    let mut length_counts: IndexMap<usize, usize> = IndexMap::new();
    for &v in &values {
        *value_counts.entry(v).or_insert(0) += 1;
        *length_counts.entry(v.len()).or_insert(0) += 1;
    }
    length_counts.sort_keys();

    let duplicate_values: Vec<String> = value_counts
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(v, _)| v.to_string())
        .collect();

    let all_numeric = !values.is_empty()
        && values.iter().all(|v| v.chars().all(|c| c.is_ascii_digit()));
    let all_alphanumeric = !values.is_empty()
        && values.iter().all(|v| v.chars().all(char::is_alphanumeric));

    IdentifierSummary {
        non_null_count: values.len(),
        distinct_count: value_counts.len(),
        duplicate_count: duplicate_values.len(),
        duplicate_values,
        length_counts,
        all_numeric,
        all_alphanumeric,
    }
}

fn summarize_text(included: &[(usize, &Cell)]) -> TextSummary {
    let empty_count = included.iter().filter(|(_, cell)| cell.is_empty()).count();

    let mut value_counts: IndexMap<&str, usize> = IndexMap::new();
    for (_, cell) in included {
        if !cell.is_empty() {
            *value_counts.entry(cell.raw().trim()).or_insert(0) += 1;
        }
    }

    let most_frequent_count = value_counts.values().copied().max().unwrap_or(0);
    let most_frequent: Vec<String> = value_counts
        .iter()
        .filter(|(_, &count)| count == most_frequent_count && count > 0)
        .map(|(v, _)| v.to_string())
        .collect();

    TextSummary {
        count: included.len() - empty_count,
        distinct_count: value_counts.len(),
        most_frequent,
        most_frequent_count,
        empty_count,
    }
}

/// Nearest-rank percentile over a sorted sample.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::parse(v)).collect()
    }

    fn summarize(values: &[&str], kind: ColumnKind, mask: &BTreeSet<usize>) -> ColumnSummary {
        let owned = cells(values);
        let refs: Vec<&Cell> = owned.iter().collect();
        Summarizer::new().summarize(&refs, kind, mask)
    }

    #[test]
    fn test_identifier_duplicates() {
        let summary = summarize(&["1", "2", "2", "3"], ColumnKind::Identifier, &BTreeSet::new());
        let ColumnSummary::Identifier(s) = summary else {
            panic!("expected identifier summary");
        };

        assert_eq!(s.non_null_count, 4);
        assert_eq!(s.distinct_count, 3);
        assert_eq!(s.duplicate_count, 1);
        assert_eq!(s.duplicate_values, vec!["2"]);
        assert!(s.all_numeric);
        assert!(s.all_alphanumeric);
        assert_eq!(s.length_counts.get(&1), Some(&4));
    }

    #[test]
    fn test_numeric_outlier_candidate() {
        let summary = summarize(
            &["10", "20", "30", "1000"],
            ColumnKind::Numeric,
            &BTreeSet::new(),
        );
        let ColumnSummary::Numeric(s) = summary else {
            panic!("expected numeric summary");
        };

        assert_eq!(s.count, 4);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 1000.0);
        assert_eq!(s.mean, 265.0);
        assert_eq!(s.outlier_rows, vec![3]);
    }

    #[test]
    fn test_numeric_respects_exclusion_mask() {
        let mask: BTreeSet<usize> = [3].into_iter().collect();
        let summary = summarize(&["10", "20", "30", "1000"], ColumnKind::Numeric, &mask);
        let ColumnSummary::Numeric(s) = summary else {
            panic!("expected numeric summary");
        };

        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 20.0);
        assert_eq!(s.max, 30.0);
        assert!(s.outlier_rows.is_empty());
    }

    #[test]
    fn test_numeric_unparsed_counted_not_raised() {
        let summary = summarize(
            &["1", "oops", "3", "NA"],
            ColumnKind::Numeric,
            &BTreeSet::new(),
        );
        let ColumnSummary::Numeric(s) = summary else {
            panic!("expected numeric summary");
        };

        assert_eq!(s.count, 2);
        assert_eq!(s.unparsed_count, 2);
        assert_eq!(s.mean, 2.0);
    }

    #[test]
    fn test_numeric_degenerate_std() {
        let single = summarize(&["42"], ColumnKind::Numeric, &BTreeSet::new());
        let ColumnSummary::Numeric(s) = single else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.std, 0.0);
        assert_eq!(s.mean, 42.0);

        let empty = summarize(&[], ColumnKind::Numeric, &BTreeSet::new());
        let ColumnSummary::Numeric(s) = empty else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 0);
        assert_eq!(s.std, 0.0);
    }

    #[test]
    fn test_date_summary() {
        let summary = summarize(
            &["2024-01-10", "2024-01-20", "2024-03-05", "garbage", ""],
            ColumnKind::Date,
            &BTreeSet::new(),
        );
        let ColumnSummary::Date(s) = summary else {
            panic!("expected date summary");
        };

        assert_eq!(s.count, 3);
        assert_eq!(s.unparsed_count, 2);
        assert_eq!(s.min, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(s.max, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(s.month_counts.get("2024-01"), Some(&2));
        assert_eq!(s.month_counts.get("2024-03"), Some(&1));
    }

    #[test]
    fn test_date_outlier() {
        let summary = summarize(
            &["2024-01-01", "2024-01-02", "2024-01-03", "1970-01-01"],
            ColumnKind::Date,
            &BTreeSet::new(),
        );
        let ColumnSummary::Date(s) = summary else {
            panic!("expected date summary");
        };
        assert_eq!(s.outlier_rows, vec![3]);
    }

    #[test]
    fn test_text_summary() {
        let summary = summarize(
            &["red", "blue", "red", "", "green"],
            ColumnKind::Text,
            &BTreeSet::new(),
        );
        let ColumnSummary::Text(s) = summary else {
            panic!("expected text summary");
        };

        assert_eq!(s.count, 4);
        assert_eq!(s.distinct_count, 3);
        assert_eq!(s.empty_count, 1);
        assert_eq!(s.most_frequent, vec!["red"]);
        assert_eq!(s.most_frequent_count, 2);
    }

    #[test]
    fn test_text_most_frequent_ties() {
        let summary = summarize(&["a", "b", "a", "b"], ColumnKind::Text, &BTreeSet::new());
        let ColumnSummary::Text(s) = summary else {
            panic!("expected text summary");
        };

        assert_eq!(s.most_frequent, vec!["a", "b"]);
        assert_eq!(s.most_frequent_count, 2);
    }

    #[test]
    fn test_empty_column_text_summary() {
        let summary = summarize(&["", "NA"], ColumnKind::Text, &BTreeSet::new());
        let ColumnSummary::Text(s) = summary else {
            panic!("expected text summary");
        };

        assert_eq!(s.count, 0);
        assert_eq!(s.empty_count, 2);
        assert!(s.most_frequent.is_empty());
        assert_eq!(s.most_frequent_count, 0);
    }
}
