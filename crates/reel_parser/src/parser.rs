use std::collections::HashSet;

use reel_ast::*;
use reel_diagnostics::Issue;
use reel_scanner::scan;
use reel_syntax::{ParseContext, Token, TokenKind};

use crate::values::parse_values;

/// Parses a token stream into a file structure.
pub fn parse(tokens: Vec<Token>, ctx: &mut ParseContext) -> FileStructure {
    Parser::new(tokens, ctx).parse_file()
}

/// Scans and parses a source string in one step.
pub fn parse_source(source: &str, ctx: &mut ParseContext) -> FileStructure {
    let tokens = scan(source, ctx);
    parse(tokens, ctx)
}

/// Recursive-descent parser over a scanned token stream.
pub struct Parser<'c> {
    tokens: Vec<Token>,
    position: usize,
    ctx: &'c mut ParseContext,
    /// Single letters declared by `U:` lines of the current tune.
    user_symbols: HashSet<String>,
    /// Names declared by `m:` lines of the current tune.
    macros: HashSet<String>,
}

impl<'c> Parser<'c> {
    /// Creates a parser for the given tokens.
    pub fn new(tokens: Vec<Token>, ctx: &'c mut ParseContext) -> Self {
        Self {
            tokens,
            position: 0,
            ctx,
            user_symbols: HashSet::new(),
            macros: HashSet::new(),
        }
    }

    // === Navigation ===

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len() || self.check(TokenKind::EOF)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_kind_at(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.position + n).map(|t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        self.position += 1;
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn fresh_id(&mut self) -> u32 {
        self.ctx.fresh_id()
    }

    fn report(&mut self, message: impl Into<String>, token: &Token) {
        let issue = Issue::parser(message, token.line, token.column)
            .with_lexeme(token.lexeme.clone());
        self.ctx.report(issue);
    }

    /// True at a tune start: an info header whose letter is `X`.
    fn at_tune_start(&self) -> bool {
        matches!(self.peek(), Some(t) if t.kind == TokenKind::INF_HDR && t.lexeme.starts_with('X'))
    }

    // === File structure ===

    /// Parses the whole token stream.
    pub fn parse_file(&mut self) -> FileStructure {
        let id = self.fresh_id();
        let file_header = self.parse_file_header();
        let mut items = Vec::new();

        while !self.is_at_end() {
            if self.at_tune_start() {
                items.push(FileItem::Tune(self.parse_tune()));
                continue;
            }
            match self.peek_kind() {
                Some(TokenKind::SCT_BRK) => {
                    let token = self.advance();
                    let id = self.fresh_id();
                    items.push(FileItem::SystemBreak(SystemBreak { id, token }));
                }
                _ => {
                    items.push(FileItem::Stray(self.advance()));
                }
            }
        }

        FileStructure {
            id,
            file_header,
            items,
        }
    }

    /// Collects header items until the first tune, section break, or
    /// free text. Returns None when nothing precedes the first tune.
    fn parse_file_header(&mut self) -> Option<FileHeader> {
        let mut items = Vec::new();
        while !self.is_at_end() && !self.at_tune_start() {
            match self.peek_kind() {
                Some(TokenKind::SCT_BRK) | Some(TokenKind::FREE_TXT) => break,
                Some(TokenKind::INF_HDR)
                | Some(TokenKind::LY_HDR)
                | Some(TokenKind::SY_HDR) => {
                    items.push(self.parse_header_item());
                }
                Some(TokenKind::STYLESHEET_DIRECTIVE) => {
                    let d = self.parse_directive();
                    items.push(HeaderItem::Directive(d));
                }
                Some(TokenKind::COMMENT) => {
                    let token = self.advance();
                    let id = self.fresh_id();
                    items.push(HeaderItem::Comment(Comment { id, token }));
                }
                Some(TokenKind::WS) | Some(TokenKind::EOL) => {
                    items.push(HeaderItem::Stray(self.advance()));
                }
                _ => break,
            }
        }
        if items.is_empty() {
            None
        } else {
            let id = self.fresh_id();
            Some(FileHeader { id, items })
        }
    }

    // === Tunes ===

    fn parse_tune(&mut self) -> Tune {
        let id = self.fresh_id();
        self.user_symbols.clear();
        self.macros.clear();
        let header = self.parse_tune_header();
        let body = self.parse_tune_body();
        Tune { id, header, body }
    }

    /// Header items until the `K:` info line (inclusive) and its newline.
    fn parse_tune_header(&mut self) -> TuneHeader {
        let id = self.fresh_id();
        let mut items = Vec::new();

        while !self.is_at_end() {
            match self.peek_kind() {
                Some(TokenKind::SCT_BRK) => break,
                Some(TokenKind::INF_HDR)
                | Some(TokenKind::LY_HDR)
                | Some(TokenKind::SY_HDR) => {
                    let item = self.parse_header_item();
                    let is_key = matches!(
                        &item,
                        HeaderItem::InfoLine(line) if line.is_key()
                    );
                    items.push(item);
                    if is_key {
                        // The key line's newline still belongs to the header.
                        if let Some(eol) = self.eat(TokenKind::EOL) {
                            items.push(HeaderItem::Stray(eol));
                        }
                        break;
                    }
                }
                Some(TokenKind::STYLESHEET_DIRECTIVE) => {
                    let d = self.parse_directive();
                    items.push(HeaderItem::Directive(d));
                }
                Some(TokenKind::COMMENT) => {
                    let token = self.advance();
                    let id = self.fresh_id();
                    items.push(HeaderItem::Comment(Comment { id, token }));
                }
                Some(TokenKind::WS) | Some(TokenKind::EOL) | Some(TokenKind::INVALID) => {
                    items.push(HeaderItem::Stray(self.advance()));
                }
                _ => break,
            }
        }

        TuneHeader { id, items }
    }

    /// One header line: info line, macro declaration, user symbol
    /// declaration, lyric line, or symbol line.
    fn parse_header_item(&mut self) -> HeaderItem {
        let header = self.advance();
        match header.kind {
            TokenKind::LY_HDR => {
                let line = self.parse_lyric_tail(header);
                return HeaderItem::InfoLine(InfoLine {
                    id: line.id,
                    header: line.header,
                    tokens: line.tokens,
                    values: None,
                });
            }
            TokenKind::SY_HDR => {
                let line = self.parse_symbol_tail(header);
                return HeaderItem::InfoLine(InfoLine {
                    id: line.id,
                    header: line.header,
                    tokens: line.tokens,
                    values: None,
                });
            }
            _ => {}
        }
        let letter = header.lexeme.chars().next().unwrap_or('?');
        let tokens = self.collect_line_tokens();
        let id = self.fresh_id();
        match letter {
            'm' => {
                self.declare_macro(&tokens);
                HeaderItem::MacroDecl(MacroDecl { id, header, tokens })
            }
            'U' => {
                self.declare_user_symbol(&tokens);
                HeaderItem::UserSymbolDecl(UserSymbolDecl { id, header, tokens })
            }
            _ => {
                let values = parse_values(&tokens, self.ctx);
                HeaderItem::InfoLine(InfoLine {
                    id,
                    header,
                    tokens,
                    values,
                })
            }
        }
    }

    fn declare_macro(&mut self, tokens: &[Token]) {
        if let Some(name) = tokens
            .iter()
            .find(|t| !t.is_trivia())
            .filter(|t| t.kind == TokenKind::IDENTIFIER)
        {
            self.macros.insert(name.lexeme.clone());
        }
    }

    fn declare_user_symbol(&mut self, tokens: &[Token]) {
        if let Some(name) = tokens
            .iter()
            .find(|t| !t.is_trivia())
            .filter(|t| t.kind == TokenKind::IDENTIFIER && t.lexeme.len() == 1)
        {
            self.user_symbols.insert(name.lexeme.clone());
        }
    }

    /// Collects everything up to (not including) the line end.
    fn collect_line_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::EOL | TokenKind::SCT_BRK | TokenKind::EOF => break,
                _ => tokens.push(self.advance()),
            }
        }
        tokens
    }

    // === Tune body ===

    fn parse_tune_body(&mut self) -> Option<TuneBody> {
        if self.is_at_end() || self.check(TokenKind::SCT_BRK) {
            return None;
        }
        let id = self.fresh_id();
        let mut systems = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::SCT_BRK) {
            systems.push(self.parse_system());
        }
        Some(TuneBody { id, systems })
    }

    /// One system: elements up to and including the line end. A line
    /// continuation keeps the system going across the newline it owns.
    fn parse_system(&mut self) -> System {
        let id = self.fresh_id();
        let mut raw = Vec::new();

        while !self.is_at_end() && !self.check(TokenKind::SCT_BRK) {
            if self.check(TokenKind::EOL) {
                raw.push(MusicItem::Stray(self.advance()));
                break;
            }
            raw.push(self.parse_music_item());
        }

        System {
            id,
            items: group_beams(raw, self.ctx),
        }
    }

    /// Dispatches one music element by the priority the grammar fixes.
    fn parse_music_item(&mut self) -> MusicItem {
        match self.peek_kind().unwrap() {
            TokenKind::STYLESHEET_DIRECTIVE => MusicItem::Directive(self.parse_directive()),
            TokenKind::COMMENT => {
                let token = self.advance();
                let id = self.fresh_id();
                MusicItem::Comment(Comment { id, token })
            }
            TokenKind::INF_HDR => {
                let header = self.advance();
                let tokens = self.collect_line_tokens();
                let values = parse_values(&tokens, self.ctx);
                let id = self.fresh_id();
                MusicItem::InfoLine(InfoLine {
                    id,
                    header,
                    tokens,
                    values,
                })
            }
            TokenKind::LY_HDR => {
                let header = self.advance();
                MusicItem::LyricLine(self.parse_lyric_tail(header))
            }
            TokenKind::SY_HDR => {
                let header = self.advance();
                MusicItem::SymbolLine(self.parse_symbol_tail(header))
            }
            TokenKind::ANNOTATION => {
                let token = self.advance();
                let id = self.fresh_id();
                if is_chord_symbol(&token.lexeme) {
                    MusicItem::ChordSymbol(ChordSymbol { id, token })
                } else {
                    MusicItem::Annotation(Annotation { id, token })
                }
            }
            TokenKind::DECORATION => {
                let token = self.advance();
                let id = self.fresh_id();
                if self.macros.contains(&token.lexeme) {
                    MusicItem::MacroInvocation(MacroInvocation { id, token })
                } else if self.user_symbols.contains(&token.lexeme) {
                    MusicItem::UserSymbolInvocation(UserSymbolInvocation { id, token })
                } else {
                    MusicItem::Decoration(Decoration { id, token })
                }
            }
            TokenKind::SYMBOL => {
                let token = self.advance();
                let id = self.fresh_id();
                MusicItem::Symbol(Symbol { id, token })
            }
            TokenKind::GRC_GRP_LEFT_BRACE => MusicItem::GraceGroup(self.parse_grace_group()),
            TokenKind::CHRD_LEFT_BRKT => MusicItem::Chord(self.parse_chord()),
            TokenKind::INLN_FLD_LFT_BRKT => MusicItem::InlineField(self.parse_inline_field()),
            TokenKind::TUPLET_LPAREN => MusicItem::Tuplet(self.parse_tuplet()),
            TokenKind::BARLINE => MusicItem::BarLine(self.parse_barline()),
            TokenKind::ACCIDENTAL | TokenKind::NOTE_LETTER => match self.parse_note() {
                Some(note) => MusicItem::Note(note),
                None => self.parse_error_run(),
            },
            TokenKind::REST => self.parse_rest_item(),
            TokenKind::VOICE_OVRLAY => {
                let token = self.advance();
                let id = self.fresh_id();
                MusicItem::VoiceOverlay(VoiceOverlay { id, token })
            }
            TokenKind::Y_SPC => {
                let token = self.advance();
                let rhythm = self.parse_rhythm();
                let id = self.fresh_id();
                MusicItem::YSpacer(YSpacer { id, token, rhythm })
            }
            TokenKind::LINE_CONT => {
                let token = self.advance();
                let id = self.fresh_id();
                MusicItem::LineContinuation(LineContinuation { id, token })
            }
            TokenKind::WS | TokenKind::SLUR => MusicItem::Stray(self.advance()),
            TokenKind::INVALID => {
                // A declared macro name lexes as an invalid run; everything
                // else stays an error node.
                let lexeme = self.peek().unwrap().lexeme.clone();
                if self.macros.contains(&lexeme) {
                    let token = self.advance();
                    let id = self.fresh_id();
                    MusicItem::MacroInvocation(MacroInvocation { id, token })
                } else {
                    self.parse_error_run()
                }
            }
            _ => self.parse_error_run(),
        }
    }

    /// Collects an unparseable token run into an ErrorExpr, resuming at
    /// the next synchronization point.
    fn parse_error_run(&mut self) -> MusicItem {
        let first = self.peek().cloned();
        let mut tokens = Vec::new();
        while let Some(kind) = self.peek_kind() {
            if is_sync_point(kind) {
                break;
            }
            tokens.push(self.advance());
        }
        if tokens.is_empty() {
            // A sync token reached this slot directly; swallow one token
            // so parsing always advances.
            tokens.push(self.advance());
        }
        if let Some(token) = first {
            self.report("unexpected input in tune body", &token);
        }
        let id = self.fresh_id();
        MusicItem::ErrorExpr(ErrorExpr { id, tokens })
    }

    // === Music elements ===

    /// Note = pitch, optional rhythm, optional tie. Returns None without
    /// consuming anything when no pitch shape is present.
    fn parse_note(&mut self) -> Option<Note> {
        let pitch = self.parse_pitch()?;
        let rhythm = self.parse_rhythm();
        let tie = self.eat(TokenKind::TIE);
        let id = self.fresh_id();
        Some(Note {
            id,
            pitch,
            rhythm,
            tie,
        })
    }

    fn parse_pitch(&mut self) -> Option<Pitch> {
        let has_accidental = self.check(TokenKind::ACCIDENTAL);
        let letter_slot = if has_accidental { 1 } else { 0 };
        if self.peek_kind_at(letter_slot) != Some(TokenKind::NOTE_LETTER) {
            return None;
        }
        let accidental = if has_accidental {
            Some(self.advance())
        } else {
            None
        };
        let letter = self.advance();
        let octave = self.eat(TokenKind::OCTAVE);
        let id = self.fresh_id();
        Some(Pitch {
            id,
            accidental,
            letter,
            octave,
        })
    }

    /// Rhythm = optional numerator, separator, denominator, broken marker.
    /// Returns None when none of the four parts is present.
    fn parse_rhythm(&mut self) -> Option<Rhythm> {
        let numerator = self.eat(TokenKind::RHY_NUMER);
        let separator = self.eat(TokenKind::RHY_SEP);
        let denominator = if separator.is_some() {
            self.eat(TokenKind::RHY_DENOM)
        } else {
            None
        };
        let broken = self.eat(TokenKind::RHY_BRKN);
        if numerator.is_none() && separator.is_none() && broken.is_none() {
            return None;
        }
        let id = self.fresh_id();
        Some(Rhythm {
            id,
            numerator,
            separator,
            denominator,
            broken,
        })
    }

    fn parse_rest_item(&mut self) -> MusicItem {
        let rest = self.advance();
        let id = self.fresh_id();
        if rest.lexeme == "Z" || rest.lexeme == "X" {
            let length = self.eat(TokenKind::RHY_NUMER);
            return MusicItem::MultiMeasureRest(MultiMeasureRest { id, rest, length });
        }
        let rhythm = self.parse_rhythm();
        MusicItem::Rest(Rest { id, rest, rhythm })
    }

    /// Chord = `[`, contents, `]`, optional rhythm, optional tie.
    fn parse_chord(&mut self) -> Chord {
        let left_bracket = self.advance();
        let mut items = Vec::new();

        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::CHRD_RIGHT_BRKT => break,
                TokenKind::ACCIDENTAL | TokenKind::NOTE_LETTER => match self.parse_note() {
                    Some(note) => items.push(ChordItem::Note(note)),
                    None => items.push(ChordItem::Stray(self.advance())),
                },
                TokenKind::ANNOTATION => {
                    let token = self.advance();
                    let id = self.fresh_id();
                    items.push(ChordItem::Annotation(Annotation { id, token }));
                }
                TokenKind::WS => items.push(ChordItem::Stray(self.advance())),
                _ if is_sync_point(kind) => break,
                _ => items.push(ChordItem::Stray(self.advance())),
            }
        }

        let right_bracket = self.eat(TokenKind::CHRD_RIGHT_BRKT);
        if right_bracket.is_none() {
            self.report("unclosed chord, missing ']'", &left_bracket);
        }
        let rhythm = self.parse_rhythm();
        let tie = self.eat(TokenKind::TIE);
        let id = self.fresh_id();
        Chord {
            id,
            left_bracket,
            items,
            right_bracket,
            rhythm,
            tie,
        }
    }

    /// Grace group = `{`, optional `/`, notes with whitespace, `}`.
    fn parse_grace_group(&mut self) -> GraceGroup {
        let left_brace = self.advance();
        let slash = self.eat(TokenKind::GRC_GRP_SLSH);
        let mut items = Vec::new();

        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::GRC_GRP_RGHT_BRACE => break,
                TokenKind::ACCIDENTAL | TokenKind::NOTE_LETTER => match self.parse_note() {
                    Some(note) => items.push(GraceItem::Note(note)),
                    None => items.push(GraceItem::Stray(self.advance())),
                },
                TokenKind::WS => items.push(GraceItem::Stray(self.advance())),
                _ if is_sync_point(kind) => break,
                _ => items.push(GraceItem::Stray(self.advance())),
            }
        }

        let right_brace = self.eat(TokenKind::GRC_GRP_RGHT_BRACE);
        if right_brace.is_none() {
            self.report("unclosed grace group, missing '}'", &left_brace);
        }
        let id = self.fresh_id();
        GraceGroup {
            id,
            left_brace,
            slash,
            items,
            right_brace,
        }
    }

    fn parse_tuplet(&mut self) -> Tuplet {
        let lparen = self.advance();
        let p = match self.eat(TokenKind::TUPLET_P) {
            Some(p) => p,
            None => {
                // The scanner always pairs the opener with a p value; a
                // missing one means a truncated stream.
                self.report("tuplet opener without a count", &lparen);
                let id = self.ctx.fresh_id();
                Token::new(TokenKind::TUPLET_P, "", lparen.line, lparen.column, id)
            }
        };
        let q = self.parse_tuplet_value(TokenKind::TUPLET_Q);
        let r = self.parse_tuplet_value(TokenKind::TUPLET_R);
        let id = self.fresh_id();
        Tuplet { id, lparen, p, q, r }
    }

    fn parse_tuplet_value(&mut self, kind: TokenKind) -> Option<TupletValue> {
        let colon = self.eat(TokenKind::TUPLET_COLON)?;
        let value = self.eat(kind);
        Some(TupletValue { colon, value })
    }

    fn parse_barline(&mut self) -> BarLine {
        let bar = self.advance();
        let mut repeat_numbers = Vec::new();
        while self.check(TokenKind::REPEAT_NUMBER) {
            repeat_numbers.push(self.advance());
        }
        let id = self.fresh_id();
        BarLine {
            id,
            bar,
            repeat_numbers,
        }
    }

    fn parse_inline_field(&mut self) -> InlineField {
        let left_bracket = self.advance();
        let header = match self.eat(TokenKind::INF_HDR) {
            Some(h) => h,
            None => {
                let id = self.ctx.fresh_id();
                Token::new(
                    TokenKind::INF_HDR,
                    "",
                    left_bracket.line,
                    left_bracket.column,
                    id,
                )
            }
        };
        let mut tokens = Vec::new();
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::INLN_FLD_RGT_BRKT
                | TokenKind::EOL
                | TokenKind::SCT_BRK
                | TokenKind::EOF => break,
                _ => tokens.push(self.advance()),
            }
        }
        let right_bracket = self.eat(TokenKind::INLN_FLD_RGT_BRKT);
        if right_bracket.is_none() {
            self.report("unclosed inline field, missing ']'", &left_bracket);
        }
        let values = parse_values(&tokens, self.ctx);
        let id = self.fresh_id();
        InlineField {
            id,
            left_bracket,
            header,
            tokens,
            values,
            right_bracket,
        }
    }

    fn parse_lyric_tail(&mut self, header: Token) -> LyricLine {
        let tokens = self.collect_line_tokens();
        let id = self.fresh_id();
        LyricLine { id, header, tokens }
    }

    fn parse_symbol_tail(&mut self, header: Token) -> SymbolLine {
        let tokens = self.collect_line_tokens();
        let id = self.fresh_id();
        SymbolLine { id, header, tokens }
    }

    /// Directive = `%%`, name, values; the text directives carry their
    /// free-text payload (and `%%endtext` tokens) in the tail.
    fn parse_directive(&mut self) -> Directive {
        let marker = self.advance();
        let name = self.eat(TokenKind::IDENTIFIER);
        let mut tail = Vec::new();
        let mut value_tokens = Vec::new();

        let is_text = matches!(
            name.as_ref().map(|t| t.lexeme.as_str()),
            Some("text") | Some("center") | Some("header") | Some("footer") | Some("begintext")
        );

        if is_text {
            while let Some(kind) = self.peek_kind() {
                match kind {
                    TokenKind::FREE_TXT
                    | TokenKind::STYLESHEET_DIRECTIVE
                    | TokenKind::IDENTIFIER => tail.push(self.advance()),
                    _ => break,
                }
            }
        } else {
            while let Some(kind) = self.peek_kind() {
                match kind {
                    TokenKind::EOL | TokenKind::SCT_BRK | TokenKind::EOF => break,
                    _ => value_tokens.push(self.advance()),
                }
            }
        }

        let values = parse_values(&value_tokens, self.ctx).unwrap_or_else(|| {
            value_tokens.into_iter().map(ValueExpr::Token).collect()
        });
        let id = self.fresh_id();
        Directive {
            id,
            marker,
            name,
            values,
            tail,
        }
    }
}

/// Synchronization points for error recovery, and boundaries for chord
/// and grace-group content.
fn is_sync_point(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::EOL
            | TokenKind::SCT_BRK
            | TokenKind::EOF
            | TokenKind::BARLINE
            | TokenKind::WS
            | TokenKind::NOTE_LETTER
            | TokenKind::ACCIDENTAL
            | TokenKind::REST
            | TokenKind::CHRD_LEFT_BRKT
            | TokenKind::GRC_GRP_LEFT_BRACE
            | TokenKind::INLN_FLD_LFT_BRKT
            | TokenKind::TUPLET_LPAREN
            | TokenKind::ANNOTATION
            | TokenKind::COMMENT
            | TokenKind::STYLESHEET_DIRECTIVE
            | TokenKind::INF_HDR
            | TokenKind::LY_HDR
            | TokenKind::SY_HDR
    )
}

/// True when the quoted text names a chord (`"Am7"`, `"C/E"`) rather than
/// a free annotation.
fn is_chord_symbol(lexeme: &str) -> bool {
    let text = lexeme.trim_start_matches('"').trim_end_matches('"');
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if ('A'..='G').contains(&c) => {}
        _ => return false,
    }
    chars.all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '#' | 'b' | '+' | '-' | '/' | 'o' | '7')
    })
}

/// Wraps contiguous beamable runs into Beam nodes. Runs of length one are
/// left unwrapped.
fn group_beams(items: Vec<MusicItem>, ctx: &mut ParseContext) -> Vec<MusicItem> {
    let mut grouped: Vec<MusicItem> = Vec::new();
    let mut run: Vec<MusicItem> = Vec::new();

    for item in items {
        if is_beamable(&item) {
            run.push(item);
        } else {
            flush_beam(&mut run, &mut grouped, ctx);
            grouped.push(item);
        }
    }
    flush_beam(&mut run, &mut grouped, ctx);
    grouped
}

fn flush_beam(run: &mut Vec<MusicItem>, out: &mut Vec<MusicItem>, ctx: &mut ParseContext) {
    match run.len() {
        0 => {}
        1 => out.push(run.pop().unwrap()),
        _ => {
            let id = ctx.fresh_id();
            let items = std::mem::take(run);
            out.push(MusicItem::Beam(Beam { id, items }));
        }
    }
}

fn is_beamable(item: &MusicItem) -> bool {
    matches!(
        item,
        MusicItem::Note(_)
            | MusicItem::Chord(_)
            | MusicItem::GraceGroup(_)
            | MusicItem::Decoration(_)
            | MusicItem::Symbol(_)
            | MusicItem::Annotation(_)
            | MusicItem::ChordSymbol(_)
            | MusicItem::Rest(_)
            | MusicItem::Tuplet(_)
    )
}
