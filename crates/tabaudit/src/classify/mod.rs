//! Column kind classification.
//!
//! Columns are assigned one of four semantic kinds from their values alone.
//! The classifier is deliberately column-name-agnostic: an `id` column full
//! of temperatures is numeric, and a `notes` column full of codes is an
//! identifier.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::input::Cell;

/// Alphanumeric token, used by the fixed-width identifier rule.
static ID_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

/// Semantic kind assigned to every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Row-identifying codes, detected by structure and uniqueness.
    Identifier,
    /// Date or datetime values.
    Date,
    /// Integer or floating-point values.
    Numeric,
    /// Default fallback for everything else.
    Text,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Identifier => write!(f, "identifier"),
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// Classification thresholds.
///
/// These are the documented defaults; all of them are injectable through
/// [`AuditConfig`](crate::AuditConfig).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum distinct fraction of non-empty values for the
    /// uniqueness-based identifier rule. Default 0.95.
    pub identifier_uniqueness_threshold: f64,
    /// Minimum fraction of non-empty values that must parse as dates.
    /// Default 0.90.
    pub date_parse_threshold: f64,
    /// Minimum fraction of non-empty values that must parse as numbers.
    /// Default 0.90.
    pub numeric_parse_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            identifier_uniqueness_threshold: 0.95,
            date_parse_threshold: 0.90,
            numeric_parse_threshold: 0.90,
        }
    }
}

/// Assigns a [`ColumnKind`] to a column of cells.
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with default thresholds.
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    /// Create a classifier with custom thresholds.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a column. Never fails; the worst case is a Text fallback.
    ///
    /// Rules are tried in fixed priority order: Identifier, Date, Numeric,
    /// Text. An all-empty column is Text.
    pub fn classify(&self, cells: &[&Cell]) -> ColumnKind {
        let non_empty: Vec<&Cell> = cells.iter().copied().filter(|c| !c.is_empty()).collect();
        if non_empty.is_empty() {
            return ColumnKind::Text;
        }

        let total = non_empty.len() as f64;
        let numeric_fraction =
            non_empty.iter().filter(|c| c.as_number().is_some()).count() as f64 / total;
        let date_fraction =
            non_empty.iter().filter(|c| c.as_date().is_some()).count() as f64 / total;

        if self.is_identifier(&non_empty) {
            return ColumnKind::Identifier;
        }

        if date_fraction >= self.config.date_parse_threshold {
            return ColumnKind::Date;
        }

        if numeric_fraction >= self.config.numeric_parse_threshold {
            return ColumnKind::Numeric;
        }

        ColumnKind::Text
    }

    /// Identifier detection: either every value is a fixed-width
    /// alphanumeric code, or the values are near-unique opaque tokens.
    fn is_identifier(&self, non_empty: &[&Cell]) -> bool {
        if is_fixed_width_code(non_empty) {
            return true;
        }

        // The uniqueness rule applies to opaque single tokens only: a value
        // that parses as a number or date, or that contains whitespace
        // (sentences, addresses), disqualifies the whole column.
        if non_empty.iter().any(|c| {
            c.as_number().is_some()
                || c.as_date().is_some()
                || c.raw().trim().contains(char::is_whitespace)
        }) {
            return false;
        }

        let distinct: HashSet<&str> = non_empty.iter().map(|c| c.raw().trim()).collect();
        let distinct_fraction = distinct.len() as f64 / non_empty.len() as f64;

        distinct_fraction >= self.config.identifier_uniqueness_threshold
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// All values are alphanumeric tokens of one shared width, each containing
/// a digit. The digit requirement keeps short letter-only categorical codes
/// (`A`/`B`/`C`) out of the identifier kind.
fn is_fixed_width_code(non_empty: &[&Cell]) -> bool {
    let mut width = None;

    for cell in non_empty {
        let token = cell.raw().trim();
        if !ID_TOKEN.is_match(token) || !token.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        match width {
            None => width = Some(token.len()),
            Some(w) if w != token.len() => return false,
            Some(_) => {}
        }
    }

    width.is_some()
}
