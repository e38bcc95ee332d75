//! Formatter options.

use serde::{Deserialize, Serialize};

/// Options controlling the formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Emit every token exactly as stored. Overrides all other options.
    pub verbatim: bool,
    /// Keep chord contents in their written order instead of sorting
    /// notes by ascending pitch.
    pub no_format: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            verbatim: false,
            no_format: false,
        }
    }
}

impl FormatOptions {
    /// Lossless passthrough: print the tree exactly as stored.
    pub fn passthrough() -> Self {
        Self {
            verbatim: true,
            no_format: true,
        }
    }
}
