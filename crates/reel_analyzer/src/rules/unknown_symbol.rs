//! Symbol names (`!trill!`, `+fermata+`) should be standard ABC 2.1
//! decorations.

use reel_ast::{FileItem, FileStructure, MusicItem, Symbol};
use reel_diagnostics::Issue;

/// Standard ABC 2.1 decoration names.
const STANDARD_SYMBOLS: &[&str] = &[
    // Dynamics
    "p", "pp", "ppp", "pppp",
    "f", "ff", "fff", "ffff",
    "mp", "mf", "sfz",
    "crescendo", "crescendo(", "crescendo)",
    "diminuendo", "diminuendo(", "diminuendo)",
    "<(", "<)", ">(", ">)",
    // Articulation
    "accent", "emphasis", ">",
    "staccato", "staccatissimo",
    "tenuto", "marcato",
    "fermata", "shortfermata", "longfermata", "invertedfermata",
    "breath",
    // Ornaments
    "trill", "trill(", "trill)",
    "mordent", "pralltriller",
    "lowermordent", "uppermordent",
    "turn", "turnx", "invertedturn", "invertedturnx",
    "roll", "snap", "slide",
    // Bowing and instrumental
    "upbow", "downbow",
    "open", "plus", "wedge", "thumb",
    "arpeggio",
    // Segno and coda
    "coda", "segno",
    "D.S.", "D.C.", "dacoda", "dacapo", "fine",
    // Phrase marks
    "shortphrase", "mediumphrase", "longphrase",
    // Fingering
    "0", "1", "2", "3", "4", "5",
];

pub fn check(ast: &FileStructure, issues: &mut Vec<Issue>) {
    for item in &ast.items {
        let tune = match item {
            FileItem::Tune(t) => t,
            _ => continue,
        };
        let body = match &tune.body {
            Some(body) => body,
            None => continue,
        };
        for system in &body.systems {
            for music in &system.items {
                check_item(music, issues);
            }
        }
    }
}

fn check_item(item: &MusicItem, issues: &mut Vec<Issue>) {
    match item {
        MusicItem::Symbol(symbol) => check_symbol(symbol, issues),
        MusicItem::Beam(beam) => {
            for inner in &beam.items {
                check_item(inner, issues);
            }
        }
        _ => {}
    }
}

fn check_symbol(symbol: &Symbol, issues: &mut Vec<Issue>) {
    let name = symbol
        .token
        .lexeme
        .trim_start_matches(|c| c == '!' || c == '+')
        .trim_end_matches(|c| c == '!' || c == '+');
    if !STANDARD_SYMBOLS.contains(&name) {
        issues.push(
            Issue::interpreter(
                format!("unknown decoration name {:?}", name),
                symbol.token.line,
                symbol.token.column,
            )
            .with_lexeme(symbol.token.lexeme.clone()),
        );
    }
}
