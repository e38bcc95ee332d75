use serde::{Deserialize, Serialize};

use crate::TokenKind;

/// A scanned token.
///
/// Tokens own their lexeme; concatenating the lexemes of a scan in order
/// reproduces the source byte-for-byte. `line` is 0-based, `column` is the
/// 0-based byte offset of the lexeme's first byte within its line. `id` is
/// unique within a parse and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
    pub id: u32,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32, id: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
            id,
        }
    }

    /// Returns true for whitespace, newline, and comment tokens.
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Byte length of the lexeme.
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    /// Returns true if the lexeme is empty (EOF only).
    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.kind, self.lexeme)
    }
}
