//! Sub-mode scanners: info lines, key signatures, lyrics, symbol lines,
//! and stylesheet directives.

use reel_syntax::TokenKind;

use crate::scanner::{is_note_letter, Mode, Scanner};

/// Words accepted as key modes, lowercase.
const KEY_MODES: &[&str] = &[
    "m",
    "min",
    "minor",
    "maj",
    "major",
    "mix",
    "mixolydian",
    "dor",
    "dorian",
    "phr",
    "phrygian",
    "lyd",
    "lydian",
    "loc",
    "locrian",
    "aeo",
    "aeolian",
    "ion",
    "ionian",
    "exp",
];

/// Units accepted after a number in directive values.
const UNITS: &[&str] = &["cm", "in", "pt"];

impl<'a, 'c> Scanner<'a, 'c> {
    // === Info line mode (M:, L:, Q:, X:, P:, m:, U:) ===

    pub(crate) fn scan_info_line(&mut self, header: char) {
        if self.peek() == Some('\n') {
            if self.peek_next() == Some('\n') {
                self.scan_section_break();
                return;
            }
            self.advance();
            self.push(TokenKind::EOL);
            self.pop_mode();
            return;
        }
        self.scan_info_token(header, false);
    }

    /// Scans one token of info-line content. Returns false when the caller
    /// should stop (line end, or `]` when `inline`).
    pub(crate) fn scan_info_token(&mut self, header: char, inline: bool) -> bool {
        self.begin_token();
        let c = match self.peek() {
            Some(c) => c,
            None => return false,
        };
        if c == '\n' {
            return false;
        }
        if inline && c == ']' {
            return false;
        }
        match c {
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.push(TokenKind::WS);
            }
            '%' => {
                self.scan_comment();
            }
            '"' => {
                self.scan_annotation();
            }
            '!' => {
                self.scan_symbol('!');
            }
            '=' => {
                self.advance();
                self.push(TokenKind::EQL);
            }
            '-' => {
                self.advance();
                self.push(TokenKind::MINUS);
            }
            '+' => {
                self.advance();
                self.push(TokenKind::PLUS);
            }
            '/' => {
                self.advance();
                self.push(TokenKind::SLASH);
            }
            '(' => {
                self.advance();
                self.push(TokenKind::LPAREN);
            }
            ')' => {
                self.advance();
                self.push(TokenKind::RPAREN);
            }
            '{' => {
                self.advance();
                self.push(TokenKind::LBRACE);
            }
            '}' => {
                self.advance();
                self.push(TokenKind::RBRACE);
            }
            '[' => {
                self.advance();
                self.push(TokenKind::LBRACKET);
            }
            ']' => {
                self.advance();
                self.push(TokenKind::RBRACKET);
            }
            '|' => {
                self.advance();
                self.push(TokenKind::PIPE);
            }
            '0'..='9' => {
                self.scan_number();
            }
            'C' if header == 'M' && self.special_literal_len().is_some() => {
                let len = self.special_literal_len().unwrap();
                for _ in 0..len {
                    self.advance();
                }
                self.push(TokenKind::SPECIAL_LITERAL);
            }
            c if c.is_ascii_alphabetic() => {
                self.scan_info_word();
            }
            _ => {
                self.scan_info_invalid(inline);
            }
        }
        true
    }

    /// Length of a special meter literal at the cursor (`C` or `C|`
    /// followed by whitespace, comment, line end, or `]`), if any.
    fn special_literal_len(&self) -> Option<usize> {
        let boundary = |c: Option<char>| {
            matches!(c, None | Some(' ') | Some('\t') | Some('\n') | Some('%') | Some(']'))
        };
        if self.peek() != Some('C') {
            return None;
        }
        if self.peek_next() == Some('|') && boundary(self.peek_at(2)) {
            return Some(2);
        }
        if boundary(self.peek_next()) {
            return Some(1);
        }
        None
    }

    /// A letter in info content is an absolute pitch (`A`, `Bb4`, `c#`)
    /// when it stands alone or is followed by an accidental/octave digit;
    /// otherwise it opens an identifier. `treble-8` stays three tokens
    /// here (identifier, minus, number).
    fn scan_info_word(&mut self) {
        let first = self.peek().unwrap();
        let second = self.peek_next();
        let boundary = |c: Option<char>| {
            !matches!(c, Some(x) if x.is_ascii_alphanumeric() || x == '_')
        };

        let is_pitch = is_note_letter(first)
            && (boundary(second)
                || matches!(second, Some('#'))
                || matches!(second, Some(d) if d.is_ascii_digit())
                || (second == Some('b') && boundary(self.peek_at(2))));

        if is_pitch {
            self.advance();
            self.push(TokenKind::NOTE_LETTER);
            if matches!(self.peek(), Some('#') | Some('b')) {
                self.advance();
                self.push(TokenKind::ACCIDENTAL);
            }
            if matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                self.advance_while(|c| c.is_ascii_digit());
                self.push(TokenKind::NUMBER);
            }
            return;
        }

        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        self.push(TokenKind::IDENTIFIER);
    }

    fn scan_number(&mut self) {
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(d) if d.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        self.push(TokenKind::NUMBER);
    }

    fn scan_info_invalid(&mut self, inline: bool) {
        self.advance();
        while let Some(c) = self.peek() {
            if matches!(c, '\n' | ' ' | '\t' | '%') || (inline && c == ']') {
                break;
            }
            self.advance();
        }
        self.push(TokenKind::INVALID);
        self.report_invalid();
    }

    /// Inline `[M:...]` / `[L:...]` / `[Q:...]` / `[P:...]` content.
    pub(crate) fn scan_inline_info_content(&mut self, header: char) {
        while self.scan_info_token(header, true) {}
    }

    // === Key info mode (K:, V:) ===

    pub(crate) fn scan_key_info(&mut self, header: char) {
        if self.peek() == Some('\n') {
            if self.peek_next() == Some('\n') {
                self.scan_section_break();
                return;
            }
            self.advance();
            self.push(TokenKind::EOL);
            self.pop_mode();
            // A completed K: line ends the tune header.
            if header == 'K' && self.mode() == Mode::TuneHeader {
                self.set_mode(Mode::TuneBody);
            }
            return;
        }
        let seen_root = match self.mode() {
            Mode::KeyInfo { seen_root, .. } => seen_root,
            _ => true,
        };
        let consumed_root = self.scan_key_token(header, seen_root, false);
        if consumed_root {
            if let Some(Mode::KeyInfo { seen_root, .. }) = self.modes.last_mut() {
                *seen_root = true;
            }
        }
    }

    /// Scans one key-info token. Returns true when the token consumed the
    /// root slot (the key root for K:, the voice name for V:).
    pub(crate) fn scan_key_token(&mut self, header: char, seen_root: bool, inline: bool) -> bool {
        self.begin_token();
        let c = match self.peek() {
            Some(c) => c,
            None => return false,
        };
        match c {
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.push(TokenKind::WS);
            }
            '%' => {
                self.scan_comment();
            }
            '"' => {
                self.scan_annotation();
            }
            '^' | '_' if matches!(self.peek_next(), Some(n) if n.is_ascii_alphabetic()) => {
                self.advance();
                self.advance();
                self.push(TokenKind::KEY_EXPLICIT_ACC);
            }
            // `=c` is an explicit natural unless it follows an identifier
            // (`clef=f` assigns a clef, it does not naturalize f).
            '=' if matches!(self.peek_next(), Some(n) if is_note_letter(n))
                && self.last_meaningful_kind() != Some(TokenKind::IDENTIFIER) =>
            {
                self.advance();
                self.advance();
                self.push(TokenKind::KEY_EXPLICIT_ACC);
            }
            '=' => {
                self.advance();
                self.push(TokenKind::EQL);
            }
            '#' => {
                self.advance();
                self.push(TokenKind::KEY_ACCIDENTAL);
            }
            'b' if self.last_meaningful_kind() == Some(TokenKind::KEY_ROOT) => {
                self.advance();
                self.push(TokenKind::KEY_ACCIDENTAL);
            }
            '0'..='9' => {
                self.scan_number();
            }
            '/' => {
                self.advance();
                self.push(TokenKind::SLASH);
            }
            '+' => {
                self.advance();
                self.push(TokenKind::PLUS);
            }
            '-' => {
                self.advance();
                self.push(TokenKind::MINUS);
            }
            c if c.is_ascii_alphabetic() => {
                return self.scan_key_word(header, seen_root);
            }
            _ => {
                self.scan_info_invalid(inline);
            }
        }
        false
    }

    fn scan_key_word(&mut self, header: char, seen_root: bool) -> bool {
        let first = self.peek().unwrap();

        // V: names its voice first; K: names its root first.
        if header == 'V' && !seen_root {
            self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
            self.push(TokenKind::VOICE);
            return true;
        }
        if !seen_root && first.is_ascii_uppercase() && ('A'..='G').contains(&first) {
            self.advance();
            self.push(TokenKind::KEY_ROOT);
            return true;
        }

        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let word = self.lexeme().to_ascii_lowercase();
        if word == "none" {
            self.push(TokenKind::KEY_NONE);
        } else if KEY_MODES.contains(&word.as_str()) {
            self.push(TokenKind::KEY_MODE);
        } else {
            self.push(TokenKind::IDENTIFIER);
        }
        false
    }

    /// Inline `[K:...]` / `[V:...]` content.
    pub(crate) fn scan_inline_key_content(&mut self, header: char) {
        let mut seen_root = false;
        loop {
            match self.peek() {
                None | Some('\n') | Some(']') => break,
                _ => {}
            }
            if self.scan_key_token(header, seen_root, true) {
                seen_root = true;
            }
        }
    }

    // === Lyric mode (w:, W:) ===

    pub(crate) fn scan_lyric(&mut self) {
        let c = self.peek().unwrap();
        match c {
            '\n' => {
                if self.peek_next() == Some('\n') {
                    self.scan_section_break();
                } else {
                    self.advance();
                    self.push(TokenKind::EOL);
                    self.pop_mode();
                }
            }
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.push(TokenKind::WS);
            }
            '%' => {
                self.scan_comment();
            }
            '|' => {
                self.advance();
                self.push(TokenKind::BARLINE);
            }
            '-' => {
                self.advance();
                self.push(TokenKind::LY_HYPH);
            }
            '_' => {
                self.advance();
                self.push(TokenKind::LY_UNDR);
            }
            '*' => {
                self.advance();
                self.push(TokenKind::LY_STAR);
            }
            '~' => {
                self.advance();
                self.push(TokenKind::LY_SPS);
            }
            '\\' if self.peek_next() == Some('-') => {
                self.advance();
                self.advance();
                self.push(TokenKind::LY_SPS);
            }
            '0'..='9'
                if self.last_meaningful_kind() == Some(TokenKind::LY_HDR)
                    && self.verse_label_len().is_some() =>
            {
                let len = self.verse_label_len().unwrap();
                for _ in 0..len {
                    self.advance();
                }
                self.push(TokenKind::LY_SECT_HDR);
            }
            _ => {
                self.scan_lyric_text();
            }
        }
    }

    /// Length of a verse label (`1.`, `12.`) at the start of lyric content.
    fn verse_label_len(&self) -> Option<usize> {
        let mut n = 0;
        while matches!(self.peek_at(n), Some(d) if d.is_ascii_digit()) {
            n += 1;
        }
        if n > 0 && self.peek_at(n) == Some('.') {
            Some(n + 1)
        } else {
            None
        }
    }

    fn scan_lyric_text(&mut self) {
        loop {
            match self.peek() {
                None | Some('\n') | Some(' ') | Some('\t') | Some('-') | Some('_')
                | Some('*') | Some('~') | Some('|') | Some('%') => break,
                Some('\\') if self.peek_next() == Some('-') => break,
                _ => {
                    self.advance();
                }
            }
        }
        self.push(TokenKind::LY_TXT);
    }

    // === Symbol line mode (s:) ===

    pub(crate) fn scan_symbol_line(&mut self) {
        let c = self.peek().unwrap();
        match c {
            '\n' => {
                if self.peek_next() == Some('\n') {
                    self.scan_section_break();
                } else {
                    self.advance();
                    self.push(TokenKind::EOL);
                    self.pop_mode();
                }
            }
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.push(TokenKind::WS);
            }
            '%' => {
                self.scan_comment();
            }
            '*' => {
                self.advance();
                self.push(TokenKind::SY_STAR);
            }
            '|' => {
                self.advance();
                self.push(TokenKind::BARLINE);
            }
            _ => {
                loop {
                    match self.peek() {
                        None
                        | Some('\n')
                        | Some(' ')
                        | Some('\t')
                        | Some('*')
                        | Some('|')
                        | Some('%') => break,
                        _ => {
                            self.advance();
                        }
                    }
                }
                self.push(TokenKind::SY_TXT);
            }
        }
    }

    // === Directives (%%) ===

    /// Scans `%%` and the directive name; installs Directive mode for the
    /// values unless the directive captures free text.
    pub(crate) fn scan_directive(&mut self) {
        self.advance();
        self.advance();
        self.push(TokenKind::STYLESHEET_DIRECTIVE);

        self.begin_token();
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if self.current == self.start {
            // `%%` with no name; let the current mode handle the rest.
            return;
        }
        let name = self.lexeme().to_string();
        self.push(TokenKind::IDENTIFIER);

        match name.as_str() {
            "text" | "center" | "header" | "footer" => {
                self.begin_token();
                self.advance_while(|c| c != '\n');
                if self.current > self.start {
                    self.push(TokenKind::FREE_TXT);
                }
            }
            "begintext" => {
                self.scan_begin_text();
            }
            _ => {
                self.push_mode(Mode::Directive);
            }
        }
    }

    /// Captures everything between `%%begintext` and `%%endtext` as one
    /// FREE_TXT token, then the closing marker when present.
    fn scan_begin_text(&mut self) {
        self.begin_token();
        let rest = &self.source[self.current..];
        let end = rest.find("\n%%endtext").map(|i| self.current + i + 1);
        match end {
            Some(end) => {
                while self.current < end {
                    self.advance();
                }
                self.push(TokenKind::FREE_TXT);
                self.begin_token();
                self.advance();
                self.advance();
                self.push(TokenKind::STYLESHEET_DIRECTIVE);
                self.begin_token();
                self.advance_while(|c| c.is_ascii_alphanumeric());
                self.push(TokenKind::IDENTIFIER);
            }
            None => {
                self.advance_while(|_| true);
                self.push(TokenKind::FREE_TXT);
            }
        }
    }

    /// One token of directive values (Directive mode).
    pub(crate) fn scan_directive_values(&mut self) {
        let c = self.peek().unwrap();
        match c {
            '\n' => {
                if self.peek_next() == Some('\n') {
                    self.scan_section_break();
                } else {
                    self.advance();
                    self.push(TokenKind::EOL);
                    self.pop_mode();
                }
            }
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.push(TokenKind::WS);
            }
            '%' => {
                self.scan_comment();
            }
            '"' => {
                self.scan_annotation();
            }
            '=' => {
                self.advance();
                self.push(TokenKind::EQL);
            }
            '/' => {
                self.advance();
                self.push(TokenKind::SLASH);
            }
            '(' => {
                self.advance();
                self.push(TokenKind::LPAREN);
            }
            ')' => {
                self.advance();
                self.push(TokenKind::RPAREN);
            }
            '{' => {
                self.advance();
                self.push(TokenKind::LBRACE);
            }
            '}' => {
                self.advance();
                self.push(TokenKind::RBRACE);
            }
            '[' => {
                self.advance();
                self.push(TokenKind::LBRACKET);
            }
            ']' => {
                self.advance();
                self.push(TokenKind::RBRACKET);
            }
            '|' => {
                self.advance();
                self.push(TokenKind::PIPE);
            }
            '-' | '+' if matches!(self.peek_next(), Some(d) if d.is_ascii_digit()) => {
                self.advance();
                self.scan_number_with_unit();
            }
            '-' => {
                self.advance();
                self.push(TokenKind::MINUS);
            }
            '+' => {
                self.advance();
                self.push(TokenKind::PLUS);
            }
            '0'..='9' => {
                self.scan_number_with_unit();
            }
            '^' | '_' if matches!(self.peek_next(), Some(n) if is_note_letter(n)) => {
                self.advance();
                self.push(TokenKind::ACCIDENTAL);
                self.advance();
                self.push(TokenKind::NOTE_LETTER);
                self.scan_directive_octave();
            }
            c if c.is_ascii_alphabetic() => {
                self.scan_directive_word();
            }
            _ => {
                self.scan_info_invalid(false);
            }
        }
    }

    fn scan_number_with_unit(&mut self) {
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(d) if d.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        self.push(TokenKind::NUMBER);

        for unit in UNITS {
            if self.source[self.current..].starts_with(unit) {
                let after = self.peek_at(unit.len());
                let boundary =
                    !matches!(after, Some(x) if x.is_ascii_alphanumeric() || x == '_' || x == '-');
                if boundary {
                    self.begin_token();
                    for _ in 0..unit.len() {
                        self.advance();
                    }
                    self.push(TokenKind::MEASUREMENT_UNIT);
                    return;
                }
            }
        }
    }

    /// `treble-8` is one identifier in directive values; a lone note letter
    /// with octave marks is a pitch.
    fn scan_directive_word(&mut self) {
        let first = self.peek().unwrap();
        let second = self.peek_next();
        if is_note_letter(first)
            && matches!(second, Some('\'') | Some(','))
        {
            self.advance();
            self.push(TokenKind::NOTE_LETTER);
            self.scan_directive_octave();
            return;
        }
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        self.push(TokenKind::IDENTIFIER);
    }

    fn scan_directive_octave(&mut self) {
        if matches!(self.peek(), Some('\'') | Some(',')) {
            self.advance_while(|c| c == '\'' || c == ',');
            self.push(TokenKind::OCTAVE);
        }
    }
}
