//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{AuditError, Result};

use super::cell::Cell;
use super::source::{Sheet, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses tabular data files into sheets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the sheet and its source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Sheet, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| AuditError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| AuditError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheet".to_string());

        let sheet = self.parse_bytes(&name, &contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            sheet.row_count(),
            sheet.column_count(),
        );

        Ok((sheet, metadata))
    }

    /// Parse raw bytes into a sheet.
    pub fn parse_bytes(&self, name: &str, bytes: &[u8], delimiter: u8) -> Result<Sheet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            match reader.records().next() {
                Some(Ok(record)) => (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Err(AuditError::UnsupportedInputShape(
                        "no data found".to_string(),
                    ))
                }
            }
        };

        // Re-create the reader; header extraction may have consumed records.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        // Sheet construction enforces the shape contract (non-zero columns,
        // uniform row lengths).
        Sheet::new(name, headers, rows, delimiter)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by looking for a candidate that splits the first
/// few lines into a consistent, non-trivial number of fields.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(AuditError::UnsupportedInputShape(
            "no lines to analyze".to_string(),
        ));
    }

    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delim as char))
            .collect();

        let first = counts[0];
        if first == 0 {
            continue;
        }

        // Consistent field counts across lines beat raw frequency; tabs get
        // a small bonus since they rarely occur inside values.
        let consistent = counts.iter().all(|&c| c == first);
        let score = if consistent {
            first * 1000 + usize::from(delim == b'\t') * 100
        } else {
            first
        };

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    Ok(best)
}

/// Count delimiter occurrences in a line, ignoring quoted sections.
fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
