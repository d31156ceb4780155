//! Report command - print per-column summaries without saving.

use std::path::PathBuf;

use colored::Colorize;
use tabaudit::{AuditConfig, AuditSession, ColumnSummary};

use super::load_sheet;

pub fn run(
    file: PathBuf,
    delimiter: Option<char>,
    json: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (sheet, metadata) = load_sheet(&file, delimiter, None)?;
    let session = AuditSession::load(sheet, AuditConfig::default())?;
    let stats = session.overall_statistics();

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Report for".cyan().bold(),
        metadata.file.white()
    );
    println!(
        "Dataset contains {} rows and {} columns.",
        stats.row_count.to_string().white().bold(),
        stats.columns.len().to_string().white().bold()
    );
    println!();

    for report in &stats.columns {
        println!(
            "{} ({})",
            report.column.white().bold(),
            report.kind.to_string().cyan()
        );

        match &report.summary {
            ColumnSummary::Identifier(s) => {
                println!("  non-null values: {}", s.non_null_count);
                println!("  distinct values: {}", s.distinct_count);
                println!(
                    "  duplicated values: {}{}",
                    s.duplicate_count,
                    if s.duplicate_values.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", s.duplicate_values.join(", "))
                    }
                );
                println!("  only numeric values: {}", s.all_numeric);
                println!("  only alphanumeric values: {}", s.all_alphanumeric);
            }
            ColumnSummary::Date(s) => {
                match (s.min, s.max) {
                    (Some(min), Some(max)) => println!("  dates from {} to {}", min, max),
                    _ => println!("  no parsable dates"),
                }
                if let Some(median) = s.median {
                    println!("  median: {}", median);
                }
                println!("  unparsed values: {}", s.unparsed_count);
                if !s.outlier_rows.is_empty() {
                    println!(
                        "  {} {:?}",
                        "potential outlier rows:".yellow(),
                        s.outlier_rows
                    );
                }
            }
            ColumnSummary::Numeric(s) => {
                println!("  values: {} (unparsed: {})", s.count, s.unparsed_count);
                println!(
                    "  min: {:.2}  max: {:.2}  mean: {:.2}  std: {:.2}",
                    s.min, s.max, s.mean, s.std
                );
                println!(
                    "  q1: {:.2}  median: {:.2}  q3: {:.2}",
                    s.q1, s.median, s.q3
                );
                if !s.outlier_rows.is_empty() {
                    println!(
                        "  {} {:?}",
                        "potential outlier rows:".yellow(),
                        s.outlier_rows
                    );
                }
            }
            ColumnSummary::Text(s) => {
                println!("  non-empty values: {} (empty: {})", s.count, s.empty_count);
                println!("  distinct values: {}", s.distinct_count);
                if !s.most_frequent.is_empty() {
                    println!(
                        "  most frequent: {} ({} occurrences)",
                        s.most_frequent.join(", "),
                        s.most_frequent_count
                    );
                }
            }
        }
        println!();
    }

    Ok(())
}
