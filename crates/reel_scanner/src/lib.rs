//! Mode-sensitive scanner for ABC notation.
//!
//! The scanner walks UTF-8 text with an explicit stack of lexical modes
//! (file, tune header, tune body, info line, key info, lyric, symbol line,
//! directive). The same glyph produces different tokens in different modes;
//! the mode stack is the disambiguation mechanism.
//!
//! Every byte of the input lands in exactly one token: concatenating the
//! lexemes of a scan, in order, reproduces the source. Unrecognized bytes
//! are collected into INVALID tokens that end at the next recovery point;
//! the scanner itself never fails.

mod modes;
mod scanner;

pub use scanner::{scan, Scanner};
