//! Fields that only make sense inside a tune must not sit in the file
//! header.

use reel_ast::{FileStructure, HeaderItem};
use reel_diagnostics::Issue;
use reel_syntax::TokenKind;

/// Header letters that bind to a specific tune.
const TUNE_ONLY: &[char] = &['X', 'K', 'M', 'L', 'Q', 'P', 'V'];

pub fn check(ast: &FileStructure, issues: &mut Vec<Issue>) {
    let header = match &ast.file_header {
        Some(header) => header,
        None => return,
    };
    for item in &header.items {
        let line = match item {
            HeaderItem::InfoLine(line) => line,
            _ => continue,
        };
        let letter = match line.header_letter() {
            Some(letter) => letter,
            None => continue,
        };
        if line.header.kind == TokenKind::LY_HDR || line.header.kind == TokenKind::SY_HDR {
            issues.push(
                Issue::interpreter(
                    "lyric and symbol lines belong under a music line, not the file header",
                    line.header.line,
                    line.header.column,
                )
                .with_lexeme(line.header.lexeme.clone()),
            );
            continue;
        }
        if TUNE_ONLY.contains(&letter) {
            issues.push(
                Issue::interpreter(
                    format!("field '{}:' is only valid inside a tune", letter),
                    line.header.line,
                    line.header.column,
                )
                .with_lexeme(line.header.lexeme.clone()),
            );
        }
    }
}
