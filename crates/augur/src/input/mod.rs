//! Input decoding and data source handling.

mod parser;
mod source;

pub use parser::{FileKind, Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
