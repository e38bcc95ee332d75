use reel_diagnostics::Issue;
use reel_syntax::{ParseContext, Token, TokenKind};

/// Lexical mode. The top of the mode stack decides how the next bytes are
/// tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    File,
    TuneHeader,
    TuneBody,
    InfoLine { header: char },
    KeyInfo { header: char, seen_root: bool },
    Lyric,
    SymbolLine,
    Directive,
}

/// Scans an entire source into a token stream.
pub fn scan(source: &str, ctx: &mut ParseContext) -> Vec<Token> {
    Scanner::new(source, ctx).scan_tokens()
}

/// A mode-sensitive scanner over UTF-8 text.
pub struct Scanner<'a, 'c> {
    pub(crate) source: &'a str,
    pub(crate) ctx: &'c mut ParseContext,
    /// Byte offset of the current token's first byte.
    pub(crate) start: usize,
    /// Byte offset of the next unconsumed byte.
    pub(crate) current: usize,
    /// 0-based line of `current`.
    pub(crate) line: u32,
    /// Byte offset at which the current line starts.
    pub(crate) line_start: usize,
    /// Position captured when the current token began.
    pub(crate) start_line: u32,
    pub(crate) start_column: u32,
    pub(crate) tokens: Vec<Token>,
    pub(crate) modes: Vec<Mode>,
}

impl<'a, 'c> Scanner<'a, 'c> {
    /// Creates a new scanner for the given source text.
    pub fn new(source: &'a str, ctx: &'c mut ParseContext) -> Self {
        Self {
            source,
            ctx,
            start: 0,
            current: 0,
            line: 0,
            line_start: 0,
            start_line: 0,
            start_column: 0,
            tokens: Vec::new(),
            modes: vec![Mode::File],
        }
    }

    /// Tokenizes the entire source and returns all tokens, EOF last.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.begin_token();
            match self.mode() {
                Mode::File => self.scan_file(),
                Mode::TuneHeader => self.scan_tune_header(),
                Mode::TuneBody => self.scan_tune_body(),
                Mode::InfoLine { header } => self.scan_info_line(header),
                Mode::KeyInfo { header, .. } => self.scan_key_info(header),
                Mode::Lyric => self.scan_lyric(),
                Mode::SymbolLine => self.scan_symbol_line(),
                Mode::Directive => self.scan_directive_values(),
            }
        }
        self.begin_token();
        self.push(TokenKind::EOF);
        self.tokens
    }

    // === Mode stack ===

    pub(crate) fn mode(&self) -> Mode {
        *self.modes.last().unwrap_or(&Mode::File)
    }

    pub(crate) fn push_mode(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    pub(crate) fn pop_mode(&mut self) {
        if self.modes.len() > 1 {
            self.modes.pop();
        }
    }

    /// Replaces the whole stack; used on section breaks, which reset the
    /// scanner to file scope no matter how deep it was.
    pub(crate) fn reset_to_file(&mut self) {
        self.modes.clear();
        self.modes.push(Mode::File);
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.modes.pop();
        self.modes.push(mode);
    }

    // === Cursor ===

    pub(crate) fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    pub(crate) fn begin_token(&mut self) {
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = (self.current - self.line_start) as u32;
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    pub(crate) fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next()
    }

    /// Peeks the nth char ahead (0 = the next unconsumed char).
    pub(crate) fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.current..].chars().nth(n)
    }

    pub(crate) fn advance(&mut self) -> char {
        let c = self.source[self.current..].chars().next().unwrap();
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.current;
        }
        c
    }

    pub(crate) fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes chars while the predicate holds.
    pub(crate) fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    pub(crate) fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    /// Pushes the token spanning `start..current`.
    pub(crate) fn push(&mut self, kind: TokenKind) {
        let lexeme = self.source[self.start..self.current].to_string();
        let token = self
            .ctx
            .token(kind, lexeme, self.start_line, self.start_column);
        self.tokens.push(token);
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = (self.current - self.line_start) as u32;
    }

    pub(crate) fn last_meaningful_kind(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::WS)
            .map(|t| t.kind)
    }

    // === Shared lookahead ===

    /// True when the next unconsumed chars open an info line: an ASCII
    /// letter followed (spaces allowed) by a colon.
    pub(crate) fn at_info_line(&self) -> bool {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                let mut n = 1;
                loop {
                    match self.peek_at(n) {
                        Some(' ') | Some('\t') => n += 1,
                        Some(':') => {
                            return !matches!(self.peek_at(n + 1), Some('|') | Some(':'));
                        }
                        _ => return false,
                    }
                }
            }
            _ => false,
        }
    }

    pub(crate) fn at_line_start(&self) -> bool {
        self.current == self.line_start
    }

    // === File mode ===

    fn scan_file(&mut self) {
        let c = self.peek().unwrap();

        // Section break: two or more newlines collapse into one token.
        if c == '\n' && self.peek_next() == Some('\n') {
            self.scan_section_break();
            return;
        }
        if c == '\n' {
            self.advance();
            self.push(TokenKind::EOL);
            return;
        }
        if c == '%' {
            if self.peek_next() == Some('%') {
                self.scan_directive();
            } else {
                self.scan_comment();
            }
            return;
        }
        if c == ' ' || c == '\t' {
            self.advance_while(|c| c == ' ' || c == '\t');
            self.push(TokenKind::WS);
            return;
        }
        if self.at_info_line() {
            // `X:` opens a tune; any other header letter is a file header
            // item at this level.
            if c == 'X' {
                self.push_mode(Mode::TuneHeader);
            }
            self.scan_info_header();
            return;
        }
        self.scan_free_text();
    }

    pub(crate) fn scan_section_break(&mut self) {
        self.advance_while(|c| c == '\n');
        self.push(TokenKind::SCT_BRK);
        self.reset_to_file();
    }

    pub(crate) fn scan_comment(&mut self) {
        self.advance_while(|c| c != '\n');
        self.push(TokenKind::COMMENT);
    }

    fn scan_free_text(&mut self) {
        self.advance_while(|c| c != '\n');
        if self.current == self.start {
            // Defensive progress guarantee; a lone newline was handled above.
            self.advance();
        }
        self.push(TokenKind::FREE_TXT);
    }

    // === Tune header mode ===

    fn scan_tune_header(&mut self) {
        let c = self.peek().unwrap();

        if c == '\n' && self.peek_next() == Some('\n') {
            self.scan_section_break();
            return;
        }
        if c == '\n' {
            self.advance();
            self.push(TokenKind::EOL);
            return;
        }
        if c == ' ' || c == '\t' {
            self.advance_while(|c| c == ' ' || c == '\t');
            self.push(TokenKind::WS);
            return;
        }
        if c == '%' {
            if self.peek_next() == Some('%') {
                self.scan_directive();
            } else {
                self.scan_comment();
            }
            return;
        }
        if self.at_info_line() {
            self.scan_info_header();
            return;
        }
        // Not a header construct: collect an error run to end of line.
        self.advance_while(|c| c != '\n');
        self.push(TokenKind::INVALID);
        self.report_invalid();
    }

    /// Scans an info-line header (`K:`, `w:`, ...) and installs the mode
    /// the header letter dictates for the rest of the line.
    pub(crate) fn scan_info_header(&mut self) {
        let letter = self.advance();
        self.advance_while(|c| c == ' ' || c == '\t');
        self.advance(); // the colon

        match letter {
            'w' | 'W' => {
                self.push(TokenKind::LY_HDR);
                self.push_mode(Mode::Lyric);
            }
            's' => {
                self.push(TokenKind::SY_HDR);
                self.push_mode(Mode::SymbolLine);
            }
            'K' | 'V' => {
                self.push(TokenKind::INF_HDR);
                self.push_mode(Mode::KeyInfo {
                    header: letter,
                    seen_root: false,
                });
            }
            'M' | 'L' | 'Q' | 'X' | 'P' | 'm' | 'U' => {
                self.push(TokenKind::INF_HDR);
                self.push_mode(Mode::InfoLine { header: letter });
            }
            _ => {
                self.push(TokenKind::INF_HDR);
                self.scan_info_str();
            }
        }
    }

    /// Captures the rest of the line as one INFO_STR token (text headers
    /// such as `T:`, `C:`, `O:`). Stops at a comment or the newline.
    fn scan_info_str(&mut self) {
        self.begin_token();
        self.advance_while(|c| c != '\n' && c != '%');
        if self.current > self.start {
            self.push(TokenKind::INFO_STR);
        }
    }

    pub(crate) fn report_invalid(&mut self) {
        let token = self.tokens.last().unwrap();
        let issue = Issue::scanner(
            "unrecognized input",
            token.line,
            token.column,
        )
        .with_lexeme(token.lexeme.clone());
        self.ctx.report(issue);
    }

    // === Tune body mode ===

    fn scan_tune_body(&mut self) {
        let c = self.peek().unwrap();

        // Structure first: section breaks end the tune, newlines end the
        // current system.
        if c == '\n' && self.peek_next() == Some('\n') {
            self.scan_section_break();
            return;
        }
        if c == '\n' {
            self.advance();
            self.push(TokenKind::EOL);
            return;
        }
        if c == ' ' || c == '\t' {
            self.advance_while(|c| c == ' ' || c == '\t');
            self.push(TokenKind::WS);
            return;
        }
        if c == '%' {
            if self.peek_next() == Some('%') {
                self.scan_directive();
            } else {
                self.scan_comment();
            }
            return;
        }

        // Inline info lines (K:, M:, w:, ...) start at column zero.
        if self.at_line_start() && self.at_info_line() {
            self.scan_info_header();
            return;
        }

        if c == '"' {
            self.scan_annotation();
            return;
        }
        if c == '[' {
            self.scan_left_bracket();
            return;
        }
        if c == '{' {
            self.scan_grace_open();
            return;
        }
        if c == '}' {
            self.advance();
            self.push(TokenKind::GRC_GRP_RGHT_BRACE);
            return;
        }
        if c == ']' {
            self.advance();
            self.push(TokenKind::CHRD_RIGHT_BRKT);
            self.scan_rhythm();
            return;
        }
        if c == '(' {
            self.scan_paren();
            return;
        }
        if c == ')' {
            self.advance();
            self.push(TokenKind::SLUR);
            return;
        }
        if c == '|' || c == ':' {
            self.scan_barline();
            return;
        }
        if c == '-' {
            // A dash is a tie only directly after something tieable: a
            // pitch, a chord close, or a closing slur paren.
            if self.after_tieable() {
                self.advance();
                self.push(TokenKind::TIE);
            } else {
                self.scan_invalid_run();
            }
            return;
        }
        if c == '&' {
            self.advance_while(|c| c == '&');
            self.push(TokenKind::VOICE_OVRLAY);
            return;
        }
        if c == '\\' && self.peek_next() == Some('\n') {
            self.advance();
            self.advance();
            self.push(TokenKind::LINE_CONT);
            return;
        }
        if c == 'y' {
            self.advance();
            self.push(TokenKind::Y_SPC);
            self.scan_rhythm();
            return;
        }
        if c == '`' {
            self.advance();
            self.push(TokenKind::WS);
            return;
        }
        if matches!(c, 'z' | 'Z' | 'x' | 'X') {
            self.advance();
            self.push(TokenKind::REST);
            self.scan_rhythm();
            return;
        }
        if matches!(c, '^' | '_' | '=') || is_note_letter(c) {
            self.scan_pitch();
            return;
        }
        if matches!(
            c,
            '.' | '~' | 'H' | 'L' | 'M' | 'O' | 'P' | 'S' | 'T' | 'u' | 'v'
        ) {
            self.advance();
            self.push(TokenKind::DECORATION);
            return;
        }
        if c == '!' || c == '+' {
            self.scan_symbol(c);
            return;
        }

        self.scan_invalid_run();
    }

    /// `[` is four different things: `[|` barline, `[1` volta, `[K:` inline
    /// field, `[CEG]` chord.
    fn scan_left_bracket(&mut self) {
        match self.peek_next() {
            Some('|') => {
                self.advance();
                self.advance();
                self.push(TokenKind::BARLINE);
                self.scan_repeat_numbers();
            }
            Some(d) if d.is_ascii_digit() => {
                self.advance();
                self.push(TokenKind::BARLINE);
                self.scan_repeat_numbers();
            }
            _ => {
                self.advance();
                if self.at_info_line() {
                    self.push(TokenKind::INLN_FLD_LFT_BRKT);
                    self.scan_inline_field();
                } else {
                    self.push(TokenKind::CHRD_LEFT_BRKT);
                }
            }
        }
    }

    /// Scans the header and content of an inline field, through `]`.
    fn scan_inline_field(&mut self) {
        self.begin_token();
        let letter = self.advance();
        self.advance_while(|c| c == ' ' || c == '\t');
        self.advance(); // colon
        self.push(TokenKind::INF_HDR);

        match letter {
            'K' | 'V' => self.scan_inline_key_content(letter),
            'M' | 'L' | 'Q' | 'P' => self.scan_inline_info_content(letter),
            _ => {
                self.begin_token();
                self.advance_while(|c| c != ']' && c != '\n' && c != '%');
                if self.current > self.start {
                    self.push(TokenKind::INFO_STR);
                }
            }
        }

        self.begin_token();
        if self.match_char(']') {
            self.push(TokenKind::INLN_FLD_RGT_BRKT);
        }
    }

    fn scan_grace_open(&mut self) {
        self.advance();
        self.push(TokenKind::GRC_GRP_LEFT_BRACE);
        if self.peek() == Some('/') {
            self.advance();
            self.push(TokenKind::GRC_GRP_SLSH);
        }
    }

    /// `(` opens a tuplet when a digit follows, otherwise it is a slur.
    fn scan_paren(&mut self) {
        match self.peek_next() {
            Some(d) if d.is_ascii_digit() => {
                self.advance();
                self.push(TokenKind::TUPLET_LPAREN);
                self.advance_while(|c| c.is_ascii_digit());
                self.push(TokenKind::TUPLET_P);
                if self.peek() == Some(':') && !matches!(self.peek_next(), Some('|')) {
                    self.advance();
                    self.push(TokenKind::TUPLET_COLON);
                    self.advance_while(|c| c.is_ascii_digit());
                    if self.current > self.start {
                        self.push(TokenKind::TUPLET_Q);
                    }
                    if self.peek() == Some(':') && !matches!(self.peek_next(), Some('|')) {
                        self.advance();
                        self.push(TokenKind::TUPLET_COLON);
                        self.advance_while(|c| c.is_ascii_digit());
                        if self.current > self.start {
                            self.push(TokenKind::TUPLET_R);
                        }
                    }
                }
            }
            _ => {
                self.advance();
                self.push(TokenKind::SLUR);
            }
        }
    }

    /// Bar lines: `|`, `||`, `|]`, `[|`, `:|`, `|:`, `::`, with optional
    /// repeat numbers after.
    fn scan_barline(&mut self) {
        let c = self.advance();
        match c {
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    // A `::` may be followed by more colons in degenerate
                    // input; consume the run.
                    self.advance_while(|c| c == ':');
                } else if self.peek() == Some('|') {
                    self.advance();
                    // `:|]`, `:||`
                    if matches!(self.peek(), Some(']') | Some('|')) {
                        self.advance();
                    }
                } else {
                    self.push(TokenKind::INVALID);
                    self.report_invalid();
                    return;
                }
            }
            '|' => {
                match self.peek() {
                    Some('|') => {
                        self.advance();
                    }
                    Some(']') => {
                        self.advance();
                    }
                    Some(':') => {
                        self.advance_while(|c| c == ':');
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        self.push(TokenKind::BARLINE);
        self.scan_repeat_numbers();
    }

    /// Repeat numbers directly after a barline: `1`, `2-3`, `1,2x`.
    fn scan_repeat_numbers(&mut self) {
        if matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
            self.advance_while(|c| c.is_ascii_digit() || c == ',' || c == '-' || c == 'x');
            self.push(TokenKind::REPEAT_NUMBER);
        }
    }

    /// Pitch = optional accidental run, note letter, optional octave run,
    /// then any rhythm.
    fn scan_pitch(&mut self) {
        if matches!(self.peek(), Some('^') | Some('_') | Some('=')) {
            let first = self.advance();
            if (first == '^' || first == '_') && self.peek() == Some(first) {
                self.advance();
            }
            self.push(TokenKind::ACCIDENTAL);
            // An accidental with nothing to attach to stays a lone token;
            // the parser turns it into an error node.
            if !matches!(self.peek(), Some(c) if is_note_letter(c)) {
                return;
            }
        }
        self.advance();
        self.push(TokenKind::NOTE_LETTER);
        if matches!(self.peek(), Some('\'') | Some(',')) {
            self.advance_while(|c| c == '\'' || c == ',');
            self.push(TokenKind::OCTAVE);
        }
        self.scan_rhythm();
    }

    /// True when the previous token can carry a tie.
    fn after_tieable(&self) -> bool {
        match self.tokens.last() {
            Some(t) => match t.kind {
                TokenKind::NOTE_LETTER
                | TokenKind::OCTAVE
                | TokenKind::CHRD_RIGHT_BRKT
                | TokenKind::RHY_NUMER
                | TokenKind::RHY_SEP
                | TokenKind::RHY_DENOM
                | TokenKind::RHY_BRKN => true,
                TokenKind::SLUR => t.lexeme == ")",
                _ => false,
            },
            None => false,
        }
    }

    /// Rhythm = optional numerator, optional slash run, optional
    /// denominator, optional broken marker. Also scans a bare broken
    /// marker (`a>b`).
    pub(crate) fn scan_rhythm(&mut self) {
        if matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
            self.advance_while(|c| c.is_ascii_digit());
            self.push(TokenKind::RHY_NUMER);
        }
        if self.peek() == Some('/') {
            self.advance_while(|c| c == '/');
            self.push(TokenKind::RHY_SEP);
            if matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                self.advance_while(|c| c.is_ascii_digit());
                self.push(TokenKind::RHY_DENOM);
            }
        }
        if matches!(self.peek(), Some('>') | Some('<')) {
            let c = self.peek().unwrap();
            self.advance_while(|x| x == c);
            self.push(TokenKind::RHY_BRKN);
        }
    }

    pub(crate) fn scan_annotation(&mut self) {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    self.push(TokenKind::ANNOTATION);
                    return;
                }
                Some('\n') | None => {
                    // Unterminated: keep what we have as an error run.
                    self.push(TokenKind::INVALID);
                    self.report_invalid();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub(crate) fn scan_symbol(&mut self, delimiter: char) {
        self.advance(); // opening delimiter
        loop {
            match self.peek() {
                Some(c) if c == delimiter => {
                    self.advance();
                    self.push(TokenKind::SYMBOL);
                    return;
                }
                Some('\n') | None => {
                    self.push(TokenKind::INVALID);
                    self.report_invalid();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Collects unrecognized bytes into one INVALID token, ending at the
    /// next recovery point.
    pub(crate) fn scan_invalid_run(&mut self) {
        if self.current == self.start {
            self.advance();
        }
        while let Some(c) = self.peek() {
            let recovery = matches!(c, '\n' | ' ' | '\t' | '|' | '"' | '%')
                || is_note_letter(c)
                || matches!(c, '^' | '_' | '=');
            if recovery {
                break;
            }
            self.advance();
        }
        self.push(TokenKind::INVALID);
        self.report_invalid();
    }
}

/// Note letters: A-G and a-g.
pub(crate) fn is_note_letter(c: char) -> bool {
    matches!(c, 'A'..='G' | 'a'..='g')
}
