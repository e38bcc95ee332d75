//! Recursive-descent parser for ABC notation.
//!
//! The parser consumes the scanner's token stream and produces the AST
//! defined in `reel_ast`. It never fails: productions that cannot be
//! recognized collect their tokens into `ErrorExpr` nodes and parsing
//! resumes at the next synchronization point (end of line, bar line, or
//! section break), reporting into the shared parse context.

mod parser;
mod values;

pub use parser::{parse, parse_source, Parser};
pub use values::parse_values;

pub use reel_ast::*;
