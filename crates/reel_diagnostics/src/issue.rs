use serde::{Deserialize, Serialize};

/// The pipeline stage that produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Byte-level tokenization problems (INVALID runs).
    Scanner,
    /// A production could not be recognized (ErrorExpr sites).
    Parser,
    /// Structured-value parsing inside an info line or directive failed.
    Analyzer,
    /// A field or directive is not valid in its surrounding context.
    Interpreter,
}

impl Origin {
    /// Returns a lowercase name for display.
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Scanner => "scanner",
            Origin::Parser => "parser",
            Origin::Analyzer => "analyzer",
            Origin::Interpreter => "interpreter",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single structured issue record.
///
/// `line` and `column` are 0-based; `column` is a byte offset within the
/// line, matching the position data carried by tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The stage that reported this issue.
    pub origin: Origin,
    /// Human-readable description.
    pub message: String,
    /// 0-based source line.
    pub line: u32,
    /// 0-based byte column within the line.
    pub column: u32,
    /// The offending lexeme, when one exists.
    pub lexeme: Option<String>,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(origin: Origin, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            origin,
            message: message.into(),
            line,
            column,
            lexeme: None,
        }
    }

    /// Creates a scanner-origin issue.
    pub fn scanner(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(Origin::Scanner, message, line, column)
    }

    /// Creates a parser-origin issue.
    pub fn parser(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(Origin::Parser, message, line, column)
    }

    /// Creates an analyzer-origin issue.
    pub fn analyzer(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(Origin::Analyzer, message, line, column)
    }

    /// Creates an interpreter-origin issue.
    pub fn interpreter(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(Origin::Interpreter, message, line, column)
    }

    /// Attaches the offending lexeme.
    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = Some(lexeme.into());
        self
    }

    /// Returns 1-based line for display.
    pub fn line_display(&self) -> u32 {
        self.line + 1
    }

    /// Returns 1-based column for display.
    pub fn column_display(&self) -> u32 {
        self.column + 1
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.origin,
            self.line_display(),
            self.column_display(),
            self.message
        )?;
        if let Some(lexeme) = &self.lexeme {
            write!(f, " ({:?})", lexeme)?;
        }
        Ok(())
    }
}
