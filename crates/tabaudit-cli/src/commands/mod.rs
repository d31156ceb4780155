//! Command implementations.

pub mod audit;
pub mod report;

use std::path::PathBuf;

use tabaudit::{AuditSession, Parser, ParserConfig, Sheet, SourceMetadata};

/// Parse a data file with an optional delimiter override.
pub fn load_sheet(
    file: &PathBuf,
    delimiter: Option<char>,
    max_rows: Option<usize>,
) -> Result<(Sheet, SourceMetadata), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = ParserConfig {
        delimiter: delimiter.map(|c| c as u8),
        max_rows,
        ..ParserConfig::default()
    };

    Ok(Parser::with_config(config).parse_file(file)?)
}

/// One-line classification overview for the loaded session.
pub fn print_kinds(session: &AuditSession) {
    use colored::Colorize;

    for (header, kind) in session.sheet().headers.iter().zip(session.kinds()) {
        println!("  {:24} {}", header.white(), kind.to_string().cyan());
    }
}
