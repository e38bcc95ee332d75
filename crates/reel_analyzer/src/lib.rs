//! Post-parse checks for ABC files.
//!
//! The analyzer inspects the AST after parsing and reports issues that
//! are not syntax errors: fields that are malformed for their meaning,
//! and fields or directives that are not valid where they appear. It
//! never changes the tree. Missing `M:` and `L:` fields are implied by
//! the ABC standard and produce no diagnostic.

pub mod rules;

use reel_ast::FileStructure;
use reel_diagnostics::Issue;

/// Runs all rules over a parsed file.
pub fn analyze(ast: &FileStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    rules::reference_number::check(ast, &mut issues);
    rules::header_placement::check(ast, &mut issues);
    rules::directive_name::check(ast, &mut issues);
    rules::unknown_symbol::check(ast, &mut issues);
    rules::suspicious_rhythm::check(ast, &mut issues);
    issues
}

/// Result of analysis.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub issues: Vec<Issue>,
}

impl AnalysisResult {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
