//! `X:` fields must carry a positive integer, once per tune.

use reel_ast::{FileItem, FileStructure, HeaderItem, InfoLine};
use reel_diagnostics::Issue;

pub fn check(ast: &FileStructure, issues: &mut Vec<Issue>) {
    for item in &ast.items {
        let tune = match item {
            FileItem::Tune(t) => t,
            _ => continue,
        };
        let mut seen = false;
        for header_item in &tune.header.items {
            let line = match header_item {
                HeaderItem::InfoLine(line) if line.header_letter() == Some('X') => line,
                _ => continue,
            };
            if seen {
                issues.push(
                    Issue::interpreter(
                        "duplicate reference number field in tune header",
                        line.header.line,
                        line.header.column,
                    )
                    .with_lexeme(line.header.lexeme.clone()),
                );
            }
            seen = true;
            check_value(line, issues);
        }
    }
}

fn check_value(line: &InfoLine, issues: &mut Vec<Issue>) {
    let value = line.text();
    let value = value.trim();
    if value.is_empty() || value.parse::<u32>().is_err() {
        issues.push(
            Issue::analyzer(
                format!(
                    "invalid reference number {:?} (must be a positive integer)",
                    value
                ),
                line.header.line,
                line.header.column,
            )
            .with_lexeme(line.header.lexeme.clone()),
        );
    }
}
