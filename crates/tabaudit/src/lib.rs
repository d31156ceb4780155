//! Tabaudit: column classification, statistics, and row-exclusion engine
//! for auditing tabular data.
//!
//! Every column of a loaded sheet is classified into one of four semantic
//! kinds (identifier, date, numeric, text), summarized with kind-specific
//! statistics, and a reviewer can mark individual rows as potential errors.
//! Statistics always reflect the current exclusions, and saving produces an
//! annotated copy of the data plus a summary report.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the loaded sheet is never mutated; exclusions are
//!   recorded separately and written to an annotated copy.
//! - **Name-agnostic**: columns are classified from their values only,
//!   never from their headers.
//! - **Counted, not raised**: unparsable dates and numbers are reported as
//!   statistics, never as errors.
//!
//! # Example
//!
//! ```no_run
//! use tabaudit::{AuditConfig, AuditSession, Parser};
//!
//! let (sheet, _meta) = Parser::new().parse_file("orders.csv").unwrap();
//! let mut session = AuditSession::load(sheet, AuditConfig::default()).unwrap();
//!
//! session.mark_excluded(3).unwrap();
//! let stats = session.overall_statistics();
//! println!("{} rows, {} excluded", stats.row_count, stats.excluded_count);
//!
//! let artifacts = session.save().unwrap();
//! println!("report: {}", artifacts.report_path.display());
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod session;
pub mod stats;

pub use classify::{Classifier, ClassifierConfig, ColumnKind};
pub use config::AuditConfig;
pub use error::{AuditError, Result};
pub use input::{Cell, Parser, ParserConfig, Sheet, SourceMetadata};
pub use output::{SavedArtifacts, SummaryReport, EXCLUDED_COLUMN};
pub use session::{AuditSession, ColumnReport, ExclusionLedger, OverallStatistics};
pub use stats::{
    ColumnSummary, DateSummary, IdentifierSummary, NumericSummary, StatsConfig, Summarizer,
    TextSummary,
};
