//! Input layer: tagged cells, sheets, and tabular file parsing.

mod cell;
mod parser;
mod source;

pub use cell::{is_null_token, Cell, DATETIME_FORMATS, DATE_FORMATS};
pub use parser::{Parser, ParserConfig};
pub use source::{Sheet, SourceMetadata};
