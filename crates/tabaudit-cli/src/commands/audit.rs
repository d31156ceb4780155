//! Audit command - classify, apply exclusions, save artifacts.

use std::path::PathBuf;

use colored::Colorize;
use tabaudit::{AuditConfig, AuditSession};

use super::{load_sheet, print_kinds};

pub fn run(
    file: PathBuf,
    out: Option<PathBuf>,
    exclude: Vec<usize>,
    delimiter: Option<char>,
    max_rows: Option<usize>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (sheet, metadata) = load_sheet(&file, delimiter, max_rows)?;

    println!(
        "{} {} ({} rows, {} columns, {})",
        "Auditing".cyan().bold(),
        metadata.file.white(),
        metadata.row_count,
        metadata.column_count,
        metadata.format
    );

    let mut config = AuditConfig::default();
    if let Some(dir) = out {
        config = config.with_output_dir(dir);
    }

    let mut session = AuditSession::load(sheet, config)?;

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        print_kinds(&session);
        println!();
    }

    for row in exclude {
        session.mark_excluded(row)?;
    }

    let stats = session.overall_statistics();
    println!(
        "{} rows excluded from statistics",
        stats.excluded_count.to_string().white().bold()
    );

    let artifacts = session.save()?;

    println!();
    println!(
        "{} {}",
        "Annotated copy:".green().bold(),
        artifacts.annotated_path.display().to_string().white()
    );
    println!(
        "{} {}",
        "Summary report:".green().bold(),
        artifacts.report_path.display().to_string().white()
    );

    Ok(())
}
