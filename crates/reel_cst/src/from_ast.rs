//! AST → CST conversion.
//!
//! Builds the child/sibling tree for an AST subtree, appending children
//! in source emit order. Node ids are carried over from the AST nodes and
//! tokens they mirror, so converting back and forth is id-stable.

use reel_ast::*;
use reel_syntax::{NodeTag, Token};

use crate::CsNode;

/// Converts a parsed file into its CST.
pub fn from_ast(ast: &FileStructure) -> CsNode {
    let mut children = Vec::new();
    if let Some(header) = &ast.file_header {
        children.push(from_file_header(header));
    }
    for item in &ast.items {
        match item {
            FileItem::Tune(tune) => children.push(from_tune(tune)),
            FileItem::SystemBreak(b) => children.push(CsNode::with_children(
                NodeTag::SystemBreak,
                b.id,
                vec![leaf(&b.token)],
            )),
            FileItem::Stray(t) => children.push(leaf(t)),
        }
    }
    CsNode::with_children(NodeTag::FileStructure, ast.id, children)
}

fn leaf(token: &Token) -> CsNode {
    CsNode::leaf(token.clone())
}

fn leaves(tokens: &[Token]) -> Vec<CsNode> {
    tokens.iter().map(leaf).collect()
}

fn from_file_header(header: &FileHeader) -> CsNode {
    let children = header.items.iter().map(from_header_item).collect();
    CsNode::with_children(NodeTag::FileHeader, header.id, children)
}

fn from_tune(tune: &Tune) -> CsNode {
    let mut children = vec![from_tune_header(&tune.header)];
    if let Some(body) = &tune.body {
        children.push(from_tune_body(body));
    }
    CsNode::with_children(NodeTag::Tune, tune.id, children)
}

fn from_tune_header(header: &TuneHeader) -> CsNode {
    let children = header.items.iter().map(from_header_item).collect();
    CsNode::with_children(NodeTag::TuneHeader, header.id, children)
}

fn from_header_item(item: &HeaderItem) -> CsNode {
    match item {
        HeaderItem::InfoLine(line) => from_info_line(line),
        HeaderItem::Directive(d) => from_directive(d),
        HeaderItem::Comment(c) => {
            CsNode::with_children(NodeTag::Comment, c.id, vec![leaf(&c.token)])
        }
        HeaderItem::MacroDecl(m) => {
            let mut children = vec![leaf(&m.header)];
            children.extend(leaves(&m.tokens));
            CsNode::with_children(NodeTag::MacroDecl, m.id, children)
        }
        HeaderItem::UserSymbolDecl(u) => {
            let mut children = vec![leaf(&u.header)];
            children.extend(leaves(&u.tokens));
            CsNode::with_children(NodeTag::UserSymbolDecl, u.id, children)
        }
        HeaderItem::Stray(t) => leaf(t),
    }
}

fn from_tune_body(body: &TuneBody) -> CsNode {
    let children = body
        .systems
        .iter()
        .map(|system| {
            let items = system.items.iter().map(from_music_item).collect();
            CsNode::with_children(NodeTag::System, system.id, items)
        })
        .collect();
    CsNode::with_children(NodeTag::TuneBody, body.id, children)
}

/// Converts one music element. Public because transforms rebuild elements
/// (rests, chords) while editing.
pub fn from_music_item(item: &MusicItem) -> CsNode {
    match item {
        MusicItem::Beam(b) => {
            let children = b.items.iter().map(from_music_item).collect();
            CsNode::with_children(NodeTag::Beam, b.id, children)
        }
        MusicItem::Note(n) => from_note(n),
        MusicItem::Rest(r) => {
            let mut children = vec![leaf(&r.rest)];
            if let Some(rhythm) = &r.rhythm {
                children.push(from_rhythm(rhythm));
            }
            CsNode::with_children(NodeTag::Rest, r.id, children)
        }
        MusicItem::MultiMeasureRest(r) => {
            let mut children = vec![leaf(&r.rest)];
            if let Some(length) = &r.length {
                children.push(leaf(length));
            }
            CsNode::with_children(NodeTag::MultiMeasureRest, r.id, children)
        }
        MusicItem::Chord(c) => from_chord(c),
        MusicItem::GraceGroup(g) => from_grace_group(g),
        MusicItem::Tuplet(t) => from_tuplet(t),
        MusicItem::BarLine(b) => from_barline(b),
        MusicItem::InlineField(i) => from_inline_field(i),
        MusicItem::Annotation(a) => {
            CsNode::with_children(NodeTag::Annotation, a.id, vec![leaf(&a.token)])
        }
        MusicItem::ChordSymbol(c) => {
            CsNode::with_children(NodeTag::ChordSymbol, c.id, vec![leaf(&c.token)])
        }
        MusicItem::Decoration(d) => {
            CsNode::with_children(NodeTag::Decoration, d.id, vec![leaf(&d.token)])
        }
        MusicItem::Symbol(s) => {
            CsNode::with_children(NodeTag::Symbol, s.id, vec![leaf(&s.token)])
        }
        MusicItem::VoiceOverlay(v) => {
            CsNode::with_children(NodeTag::VoiceOverlay, v.id, vec![leaf(&v.token)])
        }
        MusicItem::YSpacer(y) => {
            let mut children = vec![leaf(&y.token)];
            if let Some(rhythm) = &y.rhythm {
                children.push(from_rhythm(rhythm));
            }
            CsNode::with_children(NodeTag::YSpacer, y.id, children)
        }
        MusicItem::LineContinuation(l) => {
            CsNode::with_children(NodeTag::LineContinuation, l.id, vec![leaf(&l.token)])
        }
        MusicItem::Comment(c) => {
            CsNode::with_children(NodeTag::Comment, c.id, vec![leaf(&c.token)])
        }
        MusicItem::InfoLine(line) => from_info_line(line),
        MusicItem::LyricLine(l) => {
            let mut children = vec![leaf(&l.header)];
            children.extend(leaves(&l.tokens));
            CsNode::with_children(NodeTag::LyricLine, l.id, children)
        }
        MusicItem::SymbolLine(l) => {
            let mut children = vec![leaf(&l.header)];
            children.extend(leaves(&l.tokens));
            CsNode::with_children(NodeTag::SymbolLine, l.id, children)
        }
        MusicItem::Directive(d) => from_directive(d),
        MusicItem::MacroInvocation(m) => {
            CsNode::with_children(NodeTag::MacroInvocation, m.id, vec![leaf(&m.token)])
        }
        MusicItem::UserSymbolInvocation(u) => {
            CsNode::with_children(NodeTag::UserSymbolInvocation, u.id, vec![leaf(&u.token)])
        }
        MusicItem::ErrorExpr(e) => {
            CsNode::with_children(NodeTag::ErrorExpr, e.id, leaves(&e.tokens))
        }
        MusicItem::Stray(t) => leaf(t),
    }
}

/// Converts one note.
pub fn from_note(note: &Note) -> CsNode {
    let mut children = vec![from_pitch(&note.pitch)];
    if let Some(rhythm) = &note.rhythm {
        children.push(from_rhythm(rhythm));
    }
    if let Some(tie) = &note.tie {
        children.push(leaf(tie));
    }
    CsNode::with_children(NodeTag::Note, note.id, children)
}

fn from_pitch(pitch: &Pitch) -> CsNode {
    let mut children = Vec::new();
    if let Some(acc) = &pitch.accidental {
        children.push(leaf(acc));
    }
    children.push(leaf(&pitch.letter));
    if let Some(octave) = &pitch.octave {
        children.push(leaf(octave));
    }
    CsNode::with_children(NodeTag::Pitch, pitch.id, children)
}

fn from_rhythm(rhythm: &Rhythm) -> CsNode {
    let mut children = Vec::new();
    for part in [
        &rhythm.numerator,
        &rhythm.separator,
        &rhythm.denominator,
        &rhythm.broken,
    ]
    .into_iter()
    .flatten()
    {
        children.push(leaf(part));
    }
    CsNode::with_children(NodeTag::Rhythm, rhythm.id, children)
}

fn from_chord(chord: &Chord) -> CsNode {
    let mut children = vec![leaf(&chord.left_bracket)];
    for item in &chord.items {
        match item {
            ChordItem::Note(n) => children.push(from_note(n)),
            ChordItem::Annotation(a) => children.push(CsNode::with_children(
                NodeTag::Annotation,
                a.id,
                vec![leaf(&a.token)],
            )),
            ChordItem::Stray(t) => children.push(leaf(t)),
        }
    }
    if let Some(right) = &chord.right_bracket {
        children.push(leaf(right));
    }
    if let Some(rhythm) = &chord.rhythm {
        children.push(from_rhythm(rhythm));
    }
    if let Some(tie) = &chord.tie {
        children.push(leaf(tie));
    }
    CsNode::with_children(NodeTag::Chord, chord.id, children)
}

fn from_grace_group(grace: &GraceGroup) -> CsNode {
    let mut children = vec![leaf(&grace.left_brace)];
    if let Some(slash) = &grace.slash {
        children.push(leaf(slash));
    }
    for item in &grace.items {
        match item {
            GraceItem::Note(n) => children.push(from_note(n)),
            GraceItem::Stray(t) => children.push(leaf(t)),
        }
    }
    if let Some(right) = &grace.right_brace {
        children.push(leaf(right));
    }
    CsNode::with_children(NodeTag::GraceGroup, grace.id, children)
}

fn from_tuplet(tuplet: &Tuplet) -> CsNode {
    let mut children = vec![leaf(&tuplet.lparen), leaf(&tuplet.p)];
    for value in [&tuplet.q, &tuplet.r].into_iter().flatten() {
        children.push(leaf(&value.colon));
        if let Some(v) = &value.value {
            children.push(leaf(v));
        }
    }
    CsNode::with_children(NodeTag::Tuplet, tuplet.id, children)
}

fn from_barline(bar: &BarLine) -> CsNode {
    let mut children = vec![leaf(&bar.bar)];
    children.extend(leaves(&bar.repeat_numbers));
    CsNode::with_children(NodeTag::BarLine, bar.id, children)
}

fn from_inline_field(field: &InlineField) -> CsNode {
    let mut children = vec![leaf(&field.left_bracket), leaf(&field.header)];
    match &field.values {
        Some(values) => children.extend(values.iter().map(from_value)),
        None => children.extend(leaves(&field.tokens)),
    }
    if let Some(right) = &field.right_bracket {
        children.push(leaf(right));
    }
    CsNode::with_children(NodeTag::InlineField, field.id, children)
}

fn from_info_line(line: &InfoLine) -> CsNode {
    let mut children = vec![leaf(&line.header)];
    match &line.values {
        Some(values) => children.extend(values.iter().map(from_value)),
        None => children.extend(leaves(&line.tokens)),
    }
    CsNode::with_children(NodeTag::InfoLine, line.id, children)
}

fn from_directive(directive: &Directive) -> CsNode {
    let mut children = vec![leaf(&directive.marker)];
    if let Some(name) = &directive.name {
        children.push(leaf(name));
    }
    children.extend(directive.values.iter().map(from_value));
    children.extend(leaves(&directive.tail));
    CsNode::with_children(NodeTag::Directive, directive.id, children)
}

fn from_value(value: &ValueExpr) -> CsNode {
    match value {
        ValueExpr::KV(kv) => CsNode::with_children(
            NodeTag::KV,
            kv.id,
            vec![from_value(&kv.key), leaf(&kv.eq), from_value(&kv.value)],
        ),
        ValueExpr::Binary(b) => CsNode::with_children(
            NodeTag::Binary,
            b.id,
            vec![from_value(&b.lhs), leaf(&b.op), from_value(&b.rhs)],
        ),
        ValueExpr::Unary(u) => CsNode::with_children(
            NodeTag::Unary,
            u.id,
            vec![leaf(&u.op), from_value(&u.operand)],
        ),
        ValueExpr::Grouping(g) => {
            let mut children = vec![leaf(&g.lparen)];
            children.extend(g.items.iter().map(from_value));
            if let Some(rparen) = &g.rparen {
                children.push(leaf(rparen));
            }
            CsNode::with_children(NodeTag::Grouping, g.id, children)
        }
        ValueExpr::Rational(r) => CsNode::with_children(
            NodeTag::Rational,
            r.id,
            vec![leaf(&r.numerator), leaf(&r.slash), leaf(&r.denominator)],
        ),
        ValueExpr::Measurement(m) => CsNode::with_children(
            NodeTag::Measurement,
            m.id,
            vec![leaf(&m.number), leaf(&m.unit)],
        ),
        ValueExpr::AbsolutePitch(p) => {
            let mut children = vec![leaf(&p.letter)];
            if let Some(acc) = &p.accidental {
                children.push(leaf(acc));
            }
            if let Some(octave) = &p.octave {
                children.push(leaf(octave));
            }
            CsNode::with_children(NodeTag::AbsolutePitch, p.id, children)
        }
        ValueExpr::Token(t) => leaf(t),
    }
}
