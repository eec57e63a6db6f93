//! Input parsing for delimited record files.

mod parser;
mod source;

pub(crate) use parser::read_source;
pub use parser::{Parser, ParserConfig};
pub use source::{RecordSet, SourceMetadata};
