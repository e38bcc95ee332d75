//! AST types for ABC notation.
//!
//! This crate defines the abstract syntax tree produced by the parser. It
//! contains only data types with no parsing or analysis logic. Every node
//! carries the id it was assigned by the parse context, and leaves own
//! their tokens: printing a tree's tokens in emit order reproduces the
//! source text the tree was parsed from.

use reel_syntax::Token;
use serde::{Deserialize, Serialize};

/// A parsed ABC file: an optional file header followed by tunes and
/// whatever stray text sits between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStructure {
    pub id: u32,
    pub file_header: Option<FileHeader>,
    pub items: Vec<FileItem>,
}

/// A top-level item after the file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileItem {
    Tune(Tune),
    SystemBreak(SystemBreak),
    /// Free text, stray newlines, comments between tunes.
    Stray(Token),
}

/// Everything before the first tune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub id: u32,
    pub items: Vec<HeaderItem>,
}

/// A blank-line break between top-level sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemBreak {
    pub id: u32,
    pub token: Token,
}

/// A single tune: header plus optional body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tune {
    pub id: u32,
    pub header: TuneHeader,
    pub body: Option<TuneBody>,
}

/// The metadata block of a tune, from `X:` through `K:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneHeader {
    pub id: u32,
    pub items: Vec<HeaderItem>,
}

/// An item inside a file header or tune header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderItem {
    InfoLine(InfoLine),
    Directive(Directive),
    Comment(Comment),
    MacroDecl(MacroDecl),
    UserSymbolDecl(UserSymbolDecl),
    /// Whitespace, newlines, and unrecognized runs.
    Stray(Token),
}

/// The music part of a tune: a sequence of systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneBody {
    pub id: u32,
    pub systems: Vec<System>,
}

/// One line of music. Systems are delimited by end-of-line; a line
/// continuation suppresses the break so the system spans several source
/// lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub id: u32,
    pub items: Vec<MusicItem>,
}

impl System {
    /// Returns true when the system holds nothing but whitespace and
    /// newline tokens.
    pub fn is_empty_of_music(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item, MusicItem::Stray(t) if t.is_trivia()))
    }
}

/// An element of a system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicItem {
    Beam(Beam),
    Note(Note),
    Rest(Rest),
    MultiMeasureRest(MultiMeasureRest),
    Chord(Chord),
    GraceGroup(GraceGroup),
    Tuplet(Tuplet),
    BarLine(BarLine),
    InlineField(InlineField),
    Annotation(Annotation),
    ChordSymbol(ChordSymbol),
    Decoration(Decoration),
    Symbol(Symbol),
    VoiceOverlay(VoiceOverlay),
    YSpacer(YSpacer),
    LineContinuation(LineContinuation),
    Comment(Comment),
    InfoLine(InfoLine),
    LyricLine(LyricLine),
    SymbolLine(SymbolLine),
    Directive(Directive),
    MacroInvocation(MacroInvocation),
    UserSymbolInvocation(UserSymbolInvocation),
    ErrorExpr(ErrorExpr),
    /// Whitespace, newlines, and anything else carried through verbatim.
    Stray(Token),
}

/// A run of notes, chords, grace groups, and their ornaments with no
/// whitespace or bar line between them. Single elements are not wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    pub id: u32,
    pub items: Vec<MusicItem>,
}

/// A single note: pitch, optional rhythm, optional tie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    pub pitch: Pitch,
    pub rhythm: Option<Rhythm>,
    pub tie: Option<Token>,
}

/// A pitch: optional accidental, mandatory letter, optional octave marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub id: u32,
    pub accidental: Option<Token>,
    pub letter: Token,
    pub octave: Option<Token>,
}

/// A notated rhythm: `2`, `/`, `3/2`, `//`, with an optional broken-rhythm
/// marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rhythm {
    pub id: u32,
    pub numerator: Option<Token>,
    pub separator: Option<Token>,
    pub denominator: Option<Token>,
    pub broken: Option<Token>,
}

impl Rhythm {
    /// Returns true when no component is present.
    pub fn is_empty(&self) -> bool {
        self.numerator.is_none()
            && self.separator.is_none()
            && self.denominator.is_none()
            && self.broken.is_none()
    }
}

/// A rest (z or x) with an optional rhythm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rest {
    pub id: u32,
    pub rest: Token,
    pub rhythm: Option<Rhythm>,
}

/// A multi-measure rest (Z or X) with an optional measure count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiMeasureRest {
    pub id: u32,
    pub rest: Token,
    pub length: Option<Token>,
}

/// A chord: bracketed notes with an optional chord-level rhythm and tie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub id: u32,
    pub left_bracket: Token,
    pub items: Vec<ChordItem>,
    pub right_bracket: Option<Token>,
    pub rhythm: Option<Rhythm>,
    pub tie: Option<Token>,
}

impl Chord {
    /// Iterates the notes of the chord.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.items.iter().filter_map(|item| match item {
            ChordItem::Note(n) => Some(n),
            _ => None,
        })
    }
}

/// Chord contents: notes, annotations, or stray tokens kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordItem {
    Note(Note),
    Annotation(Annotation),
    Stray(Token),
}

/// A grace group: `{ab}`, `{/ab}` for an acciaccatura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraceGroup {
    pub id: u32,
    pub left_brace: Token,
    pub slash: Option<Token>,
    pub items: Vec<GraceItem>,
    pub right_brace: Option<Token>,
}

impl GraceGroup {
    /// Returns true for acciaccatura groups.
    pub fn is_acciaccatura(&self) -> bool {
        self.slash.is_some()
    }

    /// Iterates the notes of the group.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.items.iter().filter_map(|item| match item {
            GraceItem::Note(n) => Some(n),
            _ => None,
        })
    }
}

/// Grace group contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraceItem {
    Note(Note),
    Stray(Token),
}

/// A tuplet opener: `(p`, `(p:q`, `(p:q:r`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuplet {
    pub id: u32,
    pub lparen: Token,
    pub p: Token,
    pub q: Option<TupletValue>,
    pub r: Option<TupletValue>,
}

/// One `:value` part of a tuplet; the value may be omitted (`(3::2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupletValue {
    pub colon: Token,
    pub value: Option<Token>,
}

/// A bar line plus any repeat numbers directly after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarLine {
    pub id: u32,
    pub bar: Token,
    pub repeat_numbers: Vec<Token>,
}

/// A mid-body field change, `[K:G]`, `[M:3/4]`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineField {
    pub id: u32,
    pub left_bracket: Token,
    pub header: Token,
    /// Flat content tokens, kept even when `values` parsed.
    pub tokens: Vec<Token>,
    /// Structured reading of `tokens`, when value parsing succeeded.
    pub values: Option<Vec<ValueExpr>>,
    pub right_bracket: Option<Token>,
}

/// A header field: `X:1`, `K:G`, `T:Title`, ...
///
/// The flat token list is always retained; the structured value list is
/// present when the content parsed as expressions. Consumers prefer the
/// structured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoLine {
    pub id: u32,
    pub header: Token,
    pub tokens: Vec<Token>,
    pub values: Option<Vec<ValueExpr>>,
}

impl InfoLine {
    /// The field letter of the header (`K` for `K:`).
    pub fn header_letter(&self) -> Option<char> {
        self.header.lexeme.chars().next()
    }

    /// Returns true for `K:` lines.
    pub fn is_key(&self) -> bool {
        self.header_letter() == Some('K')
    }

    /// The field content as plain text.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }
}

/// A stylesheet directive: `%%name values` or a free-text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub id: u32,
    pub marker: Token,
    pub name: Option<Token>,
    pub values: Vec<ValueExpr>,
    /// Free-text payload and closing marker tokens for text directives.
    pub tail: Vec<Token>,
}

impl Directive {
    /// The directive name, when present.
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().map(|t| t.lexeme.as_str())
    }
}

/// A `%` comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u32,
    pub token: Token,
}

/// A macro declaration line (`m:`), carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDecl {
    pub id: u32,
    pub header: Token,
    pub tokens: Vec<Token>,
}

/// A user symbol declaration line (`U:`), carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSymbolDecl {
    pub id: u32,
    pub header: Token,
    pub tokens: Vec<Token>,
}

/// A body token that matches a declared macro name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroInvocation {
    pub id: u32,
    pub token: Token,
}

/// A body letter that matches a declared user symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSymbolInvocation {
    pub id: u32,
    pub token: Token,
}

/// A quoted free-text annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u32,
    pub token: Token,
}

impl Annotation {
    /// The annotation text without its quotes.
    pub fn text(&self) -> &str {
        self.token
            .lexeme
            .trim_start_matches('"')
            .trim_end_matches('"')
    }
}

/// A quoted chord name ("Am7", "C/E").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordSymbol {
    pub id: u32,
    pub token: Token,
}

/// A single-character decoration shorthand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: u32,
    pub token: Token,
}

/// A delimited symbol: `!trill!`, `+fermata+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: u32,
    pub token: Token,
}

/// A voice overlay marker (`&`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceOverlay {
    pub id: u32,
    pub token: Token,
}

/// A vertical spacer (`y`), optionally sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YSpacer {
    pub id: u32,
    pub token: Token,
    pub rhythm: Option<Rhythm>,
}

/// A backslash-newline that joins two source lines into one system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineContinuation {
    pub id: u32,
    pub token: Token,
}

/// A lyric line (`w:` / `W:`) with its content tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub id: u32,
    pub header: Token,
    pub tokens: Vec<Token>,
}

/// A symbol line (`s:`) with its content tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolLine {
    pub id: u32,
    pub header: Token,
    pub tokens: Vec<Token>,
}

/// An invalid run the parser could not shape; the tokens reproduce the
/// user's typing untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExpr {
    pub id: u32,
    pub tokens: Vec<Token>,
}

// === Structured values (info lines, inline fields, directives) ===

/// An expression inside an info line, inline field, or directive value
/// list. Tokens that fit no expression shape pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueExpr {
    KV(KV),
    Binary(Binary),
    Unary(Unary),
    Grouping(Grouping),
    Rational(Rational),
    Measurement(Measurement),
    AbsolutePitch(AbsolutePitch),
    Token(Token),
}

/// `key=value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KV {
    pub id: u32,
    pub key: Box<ValueExpr>,
    pub eq: Token,
    pub value: Box<ValueExpr>,
}

/// `lhs op rhs` for `+` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binary {
    pub id: u32,
    pub lhs: Box<ValueExpr>,
    pub op: Token,
    pub rhs: Box<ValueExpr>,
}

/// A signed operand: `-8`, `+2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unary {
    pub id: u32,
    pub op: Token,
    pub operand: Box<ValueExpr>,
}

/// A parenthesized expression list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub id: u32,
    pub lparen: Token,
    pub items: Vec<ValueExpr>,
    pub rparen: Option<Token>,
}

/// `numerator/denominator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub id: u32,
    pub numerator: Token,
    pub slash: Token,
    pub denominator: Token,
}

/// A number with a unit: `21cm`, `0.5in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: u32,
    pub number: Token,
    pub unit: Token,
}

/// An absolute pitch in field values: `A`, `Bb`, `c4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsolutePitch {
    pub id: u32,
    pub letter: Token,
    pub accidental: Option<Token>,
    pub octave: Option<Token>,
}

// === Token traversal ===

/// Visits every token of a subtree in source emit order.
///
/// Since leaves own their tokens, walking a parsed tree and concatenating
/// lexemes reproduces the source text of that tree.
pub trait TokenWalk {
    /// Calls `f` once per token, in emit order.
    fn each_token(&self, f: &mut dyn FnMut(&Token));

    /// The source text of this subtree.
    fn source(&self) -> String {
        let mut out = String::new();
        self.each_token(&mut |t| out.push_str(&t.lexeme));
        out
    }

    /// Clones this subtree's tokens in emit order.
    fn tokens(&self) -> Vec<Token> {
        let mut out = Vec::new();
        self.each_token(&mut |t| out.push(t.clone()));
        out
    }
}

fn walk_opt(token: &Option<Token>, f: &mut dyn FnMut(&Token)) {
    if let Some(t) = token {
        f(t);
    }
}

impl TokenWalk for FileStructure {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        if let Some(header) = &self.file_header {
            header.each_token(f);
        }
        for item in &self.items {
            match item {
                FileItem::Tune(t) => t.each_token(f),
                FileItem::SystemBreak(b) => f(&b.token),
                FileItem::Stray(t) => f(t),
            }
        }
    }
}

impl TokenWalk for FileHeader {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        for item in &self.items {
            item.each_token(f);
        }
    }
}

impl TokenWalk for HeaderItem {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        match self {
            HeaderItem::InfoLine(l) => l.each_token(f),
            HeaderItem::Directive(d) => d.each_token(f),
            HeaderItem::Comment(c) => f(&c.token),
            HeaderItem::MacroDecl(m) => {
                f(&m.header);
                m.tokens.iter().for_each(&mut *f);
            }
            HeaderItem::UserSymbolDecl(u) => {
                f(&u.header);
                u.tokens.iter().for_each(&mut *f);
            }
            HeaderItem::Stray(t) => f(t),
        }
    }
}

impl TokenWalk for Tune {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        self.header.each_token(f);
        if let Some(body) = &self.body {
            body.each_token(f);
        }
    }
}

impl TokenWalk for TuneHeader {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        for item in &self.items {
            item.each_token(f);
        }
    }
}

impl TokenWalk for TuneBody {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        for system in &self.systems {
            system.each_token(f);
        }
    }
}

impl TokenWalk for System {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        for item in &self.items {
            item.each_token(f);
        }
    }
}

impl TokenWalk for MusicItem {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        match self {
            MusicItem::Beam(b) => {
                for item in &b.items {
                    item.each_token(f);
                }
            }
            MusicItem::Note(n) => n.each_token(f),
            MusicItem::Rest(r) => {
                f(&r.rest);
                if let Some(rhythm) = &r.rhythm {
                    rhythm.each_token(f);
                }
            }
            MusicItem::MultiMeasureRest(r) => {
                f(&r.rest);
                walk_opt(&r.length, f);
            }
            MusicItem::Chord(c) => c.each_token(f),
            MusicItem::GraceGroup(g) => g.each_token(f),
            MusicItem::Tuplet(t) => t.each_token(f),
            MusicItem::BarLine(b) => b.each_token(f),
            MusicItem::InlineField(i) => i.each_token(f),
            MusicItem::Annotation(a) => f(&a.token),
            MusicItem::ChordSymbol(c) => f(&c.token),
            MusicItem::Decoration(d) => f(&d.token),
            MusicItem::Symbol(s) => f(&s.token),
            MusicItem::VoiceOverlay(v) => f(&v.token),
            MusicItem::YSpacer(y) => {
                f(&y.token);
                if let Some(rhythm) = &y.rhythm {
                    rhythm.each_token(f);
                }
            }
            MusicItem::LineContinuation(l) => f(&l.token),
            MusicItem::Comment(c) => f(&c.token),
            MusicItem::InfoLine(l) => l.each_token(f),
            MusicItem::LyricLine(l) => {
                f(&l.header);
                l.tokens.iter().for_each(&mut *f);
            }
            MusicItem::SymbolLine(l) => {
                f(&l.header);
                l.tokens.iter().for_each(&mut *f);
            }
            MusicItem::Directive(d) => d.each_token(f),
            MusicItem::MacroInvocation(m) => f(&m.token),
            MusicItem::UserSymbolInvocation(u) => f(&u.token),
            MusicItem::ErrorExpr(e) => e.tokens.iter().for_each(&mut *f),
            MusicItem::Stray(t) => f(t),
        }
    }
}

impl TokenWalk for Note {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        self.pitch.each_token(f);
        if let Some(rhythm) = &self.rhythm {
            rhythm.each_token(f);
        }
        walk_opt(&self.tie, f);
    }
}

impl TokenWalk for Pitch {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        walk_opt(&self.accidental, f);
        f(&self.letter);
        walk_opt(&self.octave, f);
    }
}

impl TokenWalk for Rhythm {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        walk_opt(&self.numerator, f);
        walk_opt(&self.separator, f);
        walk_opt(&self.denominator, f);
        walk_opt(&self.broken, f);
    }
}

impl TokenWalk for Chord {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.left_bracket);
        for item in &self.items {
            match item {
                ChordItem::Note(n) => n.each_token(f),
                ChordItem::Annotation(a) => f(&a.token),
                ChordItem::Stray(t) => f(t),
            }
        }
        walk_opt(&self.right_bracket, f);
        if let Some(rhythm) = &self.rhythm {
            rhythm.each_token(f);
        }
        walk_opt(&self.tie, f);
    }
}

impl TokenWalk for GraceGroup {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.left_brace);
        walk_opt(&self.slash, f);
        for item in &self.items {
            match item {
                GraceItem::Note(n) => n.each_token(f),
                GraceItem::Stray(t) => f(t),
            }
        }
        walk_opt(&self.right_brace, f);
    }
}

impl TokenWalk for Tuplet {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.lparen);
        f(&self.p);
        for value in [&self.q, &self.r].into_iter().flatten() {
            f(&value.colon);
            walk_opt(&value.value, f);
        }
    }
}

impl TokenWalk for BarLine {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.bar);
        self.repeat_numbers.iter().for_each(&mut *f);
    }
}

impl TokenWalk for InlineField {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.left_bracket);
        f(&self.header);
        self.tokens.iter().for_each(&mut *f);
        walk_opt(&self.right_bracket, f);
    }
}

impl TokenWalk for InfoLine {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.header);
        self.tokens.iter().for_each(&mut *f);
    }
}

impl TokenWalk for Directive {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        f(&self.marker);
        walk_opt(&self.name, f);
        for value in &self.values {
            value.each_token(f);
        }
        self.tail.iter().for_each(&mut *f);
    }
}

impl TokenWalk for ErrorExpr {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        self.tokens.iter().for_each(&mut *f);
    }
}

impl TokenWalk for ValueExpr {
    fn each_token(&self, f: &mut dyn FnMut(&Token)) {
        match self {
            ValueExpr::KV(kv) => {
                kv.key.each_token(f);
                f(&kv.eq);
                kv.value.each_token(f);
            }
            ValueExpr::Binary(b) => {
                b.lhs.each_token(f);
                f(&b.op);
                b.rhs.each_token(f);
            }
            ValueExpr::Unary(u) => {
                f(&u.op);
                u.operand.each_token(f);
            }
            ValueExpr::Grouping(g) => {
                f(&g.lparen);
                for item in &g.items {
                    item.each_token(f);
                }
                walk_opt(&g.rparen, f);
            }
            ValueExpr::Rational(r) => {
                f(&r.numerator);
                f(&r.slash);
                f(&r.denominator);
            }
            ValueExpr::Measurement(m) => {
                f(&m.number);
                f(&m.unit);
            }
            ValueExpr::AbsolutePitch(p) => {
                f(&p.letter);
                walk_opt(&p.accidental, f);
                walk_opt(&p.octave, f);
            }
            ValueExpr::Token(t) => f(t),
        }
    }
}
