//! Tagged cell values parsed once at ingestion.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date formats accepted when tagging a cell as date-like.
///
/// Day-first formats come before month-first so ambiguous values such as
/// `03/04/2020` resolve consistently.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
];

/// Datetime formats accepted; the time component is dropped after parsing.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A single cell value, typed once at ingestion.
///
/// Every variant retains the raw source text so an annotated copy of the
/// sheet reproduces the input cell-for-cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    /// Missing value (empty string or a recognized null token).
    Empty { raw: String },
    /// Value that parses as a finite number.
    Number { raw: String, value: f64 },
    /// Value that parses under one of the accepted date formats.
    DateLike { raw: String, value: NaiveDate },
    /// Anything else.
    Text { raw: String },
}

impl Cell {
    /// Parse a raw cell string into a tagged value.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if is_null_token(trimmed) {
            return Cell::Empty {
                raw: raw.to_string(),
            };
        }

        if let Some(value) = parse_number(trimmed) {
            return Cell::Number {
                raw: raw.to_string(),
                value,
            };
        }

        if let Some(value) = parse_date(trimmed) {
            return Cell::DateLike {
                raw: raw.to_string(),
                value,
            };
        }

        Cell::Text {
            raw: raw.to_string(),
        }
    }

    /// The original source text of this cell.
    pub fn raw(&self) -> &str {
        match self {
            Cell::Empty { raw }
            | Cell::Number { raw, .. }
            | Cell::DateLike { raw, .. }
            | Cell::Text { raw } => raw,
        }
    }

    /// Whether this cell is a missing value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty { .. })
    }

    /// Numeric value, if this cell parsed as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Date value, if this cell parsed as date-like.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::DateLike { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Check whether a trimmed value is a recognized missing-value token.
pub fn is_null_token(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("na")
        || value.eq_ignore_ascii_case("n/a")
        || value.eq_ignore_ascii_case("null")
        || value.eq_ignore_ascii_case("none")
        || value.eq_ignore_ascii_case("nil")
        || value == "."
        || value == "-"
}

/// Parse a number, tolerating a comma decimal separator (`3,14`).
fn parse_number(value: &str) -> Option<f64> {
    let parsed = if value.contains(',') && !value.contains('.') {
        value.replacen(',', ".", 1).parse::<f64>()
    } else {
        value.parse::<f64>()
    };

    // Reject inf/NaN so they cannot poison aggregates.
    parsed.ok().filter(|v| v.is_finite())
}

/// Parse a date under the fixed set of accepted formats.
fn parse_date(value: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    None
}
