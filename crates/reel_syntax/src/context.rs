use reel_diagnostics::{Issue, IssueBag, Reporter};

use crate::{Token, TokenKind};

/// Per-document parse context.
///
/// Owns the monotonically increasing id counter shared by tokens, AST
/// nodes, and CST nodes, plus the issue sink every stage reports into.
/// Create one per input document and pass it (mutably) to the scanner,
/// parser, transforms, and formatter; never share one between two
/// concurrent parses.
#[derive(Debug, Default)]
pub struct ParseContext {
    next_id: u32,
    issues: IssueBag,
}

impl ParseContext {
    /// Creates a fresh context with an empty issue sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused id.
    pub fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Creates a token, drawing its id from this context.
    pub fn token(
        &mut self,
        kind: TokenKind,
        lexeme: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Token {
        let id = self.fresh_id();
        Token::new(kind, lexeme, line, column, id)
    }

    /// Records an issue.
    pub fn report(&mut self, issue: Issue) {
        self.issues.report(issue);
    }

    /// Returns the collected issues.
    pub fn issues(&self) -> &IssueBag {
        &self.issues
    }

    /// Returns true if any stage has reported an issue.
    pub fn has_issues(&self) -> bool {
        self.issues.has_issues()
    }

    /// Consumes the context and returns the collected issues.
    pub fn into_issues(self) -> IssueBag {
        self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ctx = ParseContext::new();
        let a = ctx.fresh_id();
        let b = ctx.fresh_id();
        let t = ctx.token(TokenKind::NOTE_LETTER, "C", 0, 0);
        assert!(a < b);
        assert!(b < t.id);
    }

    #[test]
    fn test_issue_sink() {
        let mut ctx = ParseContext::new();
        assert!(!ctx.has_issues());
        ctx.report(Issue::parser("expected note", 0, 3));
        assert!(ctx.has_issues());
        assert_eq!(ctx.into_issues().len(), 1);
    }
}
