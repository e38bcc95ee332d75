//! Very long notated lengths are usually typos.

use reel_ast::{FileItem, FileStructure, MusicItem, Rhythm};
use reel_diagnostics::Issue;

/// Effective length at or above this many unit notes is reported.
const LONG_LENGTH: u64 = 16;

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
        MusicItem::Note(note) => check_rhythm(note.rhythm.as_ref(), issues),
        MusicItem::Rest(rest) => check_rhythm(rest.rhythm.as_ref(), issues),
        MusicItem::Chord(chord) => {
            check_rhythm(chord.rhythm.as_ref(), issues);
            for note in chord.notes() {
                check_rhythm(note.rhythm.as_ref(), issues);
            }
        }
        MusicItem::Beam(beam) => {
            for inner in &beam.items {
                check_item(inner, issues);
            }
        }
        _ => {}
    }
}

fn check_rhythm(rhythm: Option<&Rhythm>, issues: &mut Vec<Issue>) {
    let rhythm = match rhythm {
        Some(r) => r,
        None => return,
    };
    let numerator: u64 = rhythm
        .numerator
        .as_ref()
        .and_then(|t| t.lexeme.parse().ok())
        .unwrap_or(1);
    let denominator: u64 = rhythm
        .denominator
        .as_ref()
        .and_then(|t| t.lexeme.parse().ok())
        .unwrap_or(1);
    if rhythm.separator.is_none() && numerator / denominator.max(1) >= LONG_LENGTH {
        let at = rhythm
            .numerator
            .as_ref()
            .map(|t| (t.line, t.column))
            .unwrap_or((0, 0));
        issues.push(Issue::interpreter(
            format!("unusually long note ({} unit notes)", numerator),
            at.0,
            at.1,
        ));
    }
}
