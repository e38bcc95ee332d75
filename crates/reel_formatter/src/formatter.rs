//! Core formatter implementation.

use reel_ast::FileStructure;
use reel_cst::{from_ast, print_cst, CsNode};
use reel_parser::parse_source;
use reel_syntax::{NodeTag, ParseContext, TokenKind};
use reel_transforms::{pitch_to_midi, PitchParts};

use crate::FormatOptions;

/// What to print: an AST or a CST root.
pub enum FormatTarget<'a> {
    Ast(&'a FileStructure),
    Cst(&'a CsNode),
}

/// Formats a tree according to the options.
pub fn format(target: FormatTarget<'_>, options: &FormatOptions) -> String {
    match target {
        FormatTarget::Cst(cst) => format_cst(cst, options),
        FormatTarget::Ast(ast) => {
            let cst = from_ast(ast);
            format_cst(&cst, options)
        }
    }
}

/// Parses and formats a source string in one step.
pub fn format_source(source: &str, options: &FormatOptions) -> String {
    let mut ctx = ParseContext::new();
    let ast = parse_source(source, &mut ctx);
    format(FormatTarget::Ast(&ast), options)
}

fn format_cst(cst: &CsNode, options: &FormatOptions) -> String {
    if options.verbatim {
        return print_cst(cst);
    }
    let mut formatter = Formatter {
        options,
        out: String::new(),
    };
    formatter.node(cst);
    formatter.out
}

struct Formatter<'a> {
    options: &'a FormatOptions,
    out: String,
}

impl<'a> Formatter<'a> {
    fn node(&mut self, node: &CsNode) {
        match node.tag {
            NodeTag::System => self.system(node),
            NodeTag::InfoLine | NodeTag::MacroDecl | NodeTag::UserSymbolDecl => {
                self.field_line(node)
            }
            NodeTag::LyricLine | NodeTag::SymbolLine => self.aligned_line(node),
            NodeTag::Chord => self.chord(node),
            _ => self.verbatim_children(node),
        }
    }

    fn verbatim_children(&mut self, node: &CsNode) {
        if let Some(token) = &node.token {
            self.out.push_str(&token.lexeme);
        }
        for child in node.children() {
            self.node(child);
        }
    }

    /// Info lines and declarations: normalized header, one space, then
    /// the content.
    fn field_line(&mut self, node: &CsNode) {
        let mut children = node.children();
        let header = match children.next() {
            Some(h) => h,
            None => return,
        };
        if let Some(token) = &header.token {
            // Drop any spaces the user put before the colon.
            let normalized: String =
                token.lexeme.chars().filter(|c| *c != ' ' && *c != '\t').collect();
            self.out.push_str(&normalized);
        }

        let rest: Vec<&CsNode> = children.collect();
        let mut started = false;
        for child in &rest {
            if !started {
                if child.token_kind() == Some(TokenKind::WS) {
                    continue;
                }
                self.out.push(' ');
                started = true;
            }
            self.node(child);
        }
    }

    /// Lyric and symbol lines: one space after the header, whitespace
    /// runs inside collapsed to a single space so star and text columns
    /// stay tight.
    fn aligned_line(&mut self, node: &CsNode) {
        let mut children = node.children();
        if let Some(header) = children.next() {
            if let Some(token) = &header.token {
                let normalized: String =
                    token.lexeme.chars().filter(|c| *c != ' ' && *c != '\t').collect();
                self.out.push_str(&normalized);
            }
        }
        let rest: Vec<&CsNode> = children.collect();
        let mut started = false;
        for child in &rest {
            match child.token_kind() {
                Some(TokenKind::WS) => {
                    if started {
                        self.ensure_single_space();
                    }
                }
                _ => {
                    if !started {
                        self.out.push(' ');
                        started = true;
                    }
                    self.node(child);
                }
            }
        }
    }

    /// One line of music: exactly one space between music and bar lines;
    /// everything else keeps its spacing. Newlines pass through, so
    /// system boundaries survive formatting.
    fn system(&mut self, node: &CsNode) {
        let items: Vec<&CsNode> = node.children().collect();

        for (i, item) in items.iter().enumerate() {
            if item.token_kind() == Some(TokenKind::WS) {
                let prev = prev_significant(&items, i);
                let next = next_significant(&items, i);
                let around_bar = matches!((prev, next), (Some(p), Some(n))
                    if (p.tag == NodeTag::BarLine && is_music(n))
                        || (is_music(p) && n.tag == NodeTag::BarLine));
                if around_bar {
                    // The bar-line rule inserts the single space itself.
                    continue;
                }
                self.verbatim_children(item);
                continue;
            }

            if item.tag == NodeTag::BarLine {
                if prev_significant(&items, i).map(is_music).unwrap_or(false) {
                    self.ensure_single_space();
                }
                self.verbatim_children(item);
                if next_significant(&items, i).map(is_music).unwrap_or(false) {
                    self.out.push(' ');
                }
                continue;
            }

            self.node(item);
        }
    }

    /// Chords print with their notes in ascending pitch order; tokens
    /// preceding a note (decorations, annotations) travel with it.
    fn chord(&mut self, node: &CsNode) {
        if self.options.no_format {
            self.verbatim_children(node);
            return;
        }

        let mut prefix: Vec<&CsNode> = Vec::new();
        let mut units: Vec<(Vec<&CsNode>, &CsNode)> = Vec::new();
        let mut head: Vec<&CsNode> = Vec::new();
        let mut tail: Vec<&CsNode> = Vec::new();
        let mut after_notes = false;

        for child in node.children() {
            match child.token_kind() {
                Some(TokenKind::CHRD_LEFT_BRKT) => head.push(child),
                Some(TokenKind::CHRD_RIGHT_BRKT) => {
                    after_notes = true;
                    tail.push(child);
                }
                _ if after_notes => tail.push(child),
                _ => match child.tag {
                    NodeTag::Note => {
                        units.push((std::mem::take(&mut prefix), child));
                    }
                    _ => prefix.push(child),
                },
            }
        }
        // Anything left before the closing bracket joins the tail.
        tail.splice(0..0, prefix);

        units.sort_by_key(|(_, note)| note_midi(note));

        for child in head {
            self.verbatim_children(child);
        }
        for (prefix, note) in &units {
            for child in prefix {
                self.node(child);
            }
            self.verbatim_children(note);
        }
        for child in tail {
            self.node(child);
        }
    }

    fn ensure_single_space(&mut self) {
        while self.out.ends_with(' ') || self.out.ends_with('\t') {
            self.out.pop();
        }
        self.out.push(' ');
    }
}

fn prev_significant<'a>(items: &[&'a CsNode], i: usize) -> Option<&'a CsNode> {
    items[..i]
        .iter()
        .rev()
        .find(|n| n.token_kind() != Some(TokenKind::WS))
        .copied()
}

fn next_significant<'a>(items: &[&'a CsNode], i: usize) -> Option<&'a CsNode> {
    items[i + 1..]
        .iter()
        .find(|n| n.token_kind() != Some(TokenKind::WS))
        .copied()
}

fn is_music(node: &CsNode) -> bool {
    matches!(
        node.tag,
        NodeTag::Beam
            | NodeTag::Note
            | NodeTag::Chord
            | NodeTag::Rest
            | NodeTag::MultiMeasureRest
            | NodeTag::GraceGroup
            | NodeTag::Tuplet
            | NodeTag::Decoration
            | NodeTag::Symbol
            | NodeTag::Annotation
            | NodeTag::ChordSymbol
    )
}

/// Sort key for a chord note; notes that fail to decode keep their
/// relative position at the end.
fn note_midi(note: &CsNode) -> i32 {
    let pitch = note.find_child_by_tag(NodeTag::Pitch);
    let decoded = pitch.and_then(|p| {
        let letter = p
            .find_child_token(TokenKind::NOTE_LETTER)
            .and_then(|n| n.token.as_ref())?;
        let accidental = p
            .find_child_token(TokenKind::ACCIDENTAL)
            .and_then(|n| n.token.as_ref())
            .map(|t| t.lexeme.as_str());
        let octave = p
            .find_child_token(TokenKind::OCTAVE)
            .and_then(|n| n.token.as_ref())
            .map(|t| t.lexeme.as_str());
        PitchParts::from_lexemes(accidental, &letter.lexeme, octave)
    });
    decoded.map(|p| pitch_to_midi(&p)).unwrap_or(i32::MAX)
}
