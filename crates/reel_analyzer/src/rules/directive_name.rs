//! `%%` must be followed by a directive name.

use reel_ast::{Directive, FileItem, FileStructure, HeaderItem, MusicItem};
use reel_diagnostics::Issue;

pub fn check(ast: &FileStructure, issues: &mut Vec<Issue>) {
    let mut directives: Vec<&Directive> = Vec::new();

    if let Some(header) = &ast.file_header {
        collect_header(&header.items, &mut directives);
    }
    for item in &ast.items {
        if let FileItem::Tune(tune) = item {
            collect_header(&tune.header.items, &mut directives);
            if let Some(body) = &tune.body {
                for system in &body.systems {
                    for music in &system.items {
                        if let MusicItem::Directive(d) = music {
                            directives.push(d);
                        }
                    }
                }
            }
        }
    }

    for directive in directives {
        if directive.name.is_none() {
            issues.push(
                Issue::interpreter(
                    "stylesheet directive without a name",
                    directive.marker.line,
                    directive.marker.column,
                )
                .with_lexeme(directive.marker.lexeme.clone()),
            );
        }
    }
}

fn collect_header<'a>(items: &'a [HeaderItem], out: &mut Vec<&'a Directive>) {
    for item in items {
        if let HeaderItem::Directive(d) = item {
            out.push(d);
        }
    }
}
