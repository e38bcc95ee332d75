//! Formatter for ABC notation trees.
//!
//! Two modes: verbatim emission, which reproduces an unedited tree's
//! source byte-for-byte, and formatted emission, which applies a small
//! set of spacing rules (one space after field headers, one space
//! between music and bar lines, sorted chord notes). The formatter never
//! mutates the tree it prints.

mod config;
mod formatter;

pub use config::FormatOptions;
pub use formatter::{format, format_source, FormatTarget};
