//! Token kinds for ABC notation.

#![allow(non_camel_case_types)]

use serde::{Deserialize, Serialize};

/// Kind of a scanned token.
///
/// The same glyph maps to different kinds depending on the lexical mode
/// that was active when it was scanned (`-` is TIE in music code and
/// LY_HYPH in a lyric line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // --- Music code ---
    /// Note letter (A-G, a-g)
    NOTE_LETTER,
    /// Accidental run (^, ^^, =, _, __)
    ACCIDENTAL,
    /// Octave mark run (' or ,)
    OCTAVE,
    /// Rhythm numerator
    RHY_NUMER,
    /// Rhythm separator (/, //, ///)
    RHY_SEP,
    /// Rhythm denominator
    RHY_DENOM,
    /// Broken rhythm (>, >>, <, <<)
    RHY_BRKN,
    /// Rest (z, Z, x, X)
    REST,
    /// Tie (-)
    TIE,
    /// Bar line (|, ||, |], [|, :|, |:, ::)
    BARLINE,
    /// Repeat numbers after a bar line (1, 2-3, 1,2x)
    REPEAT_NUMBER,

    // --- Chords ---
    /// Chord opening bracket ([)
    CHRD_LEFT_BRKT,
    /// Chord closing bracket (])
    CHRD_RIGHT_BRKT,

    // --- Grace groups ---
    /// Grace group opening brace ({)
    GRC_GRP_LEFT_BRACE,
    /// Grace group closing brace (})
    GRC_GRP_RGHT_BRACE,
    /// Acciaccatura slash inside a grace group
    GRC_GRP_SLSH,

    // --- Tuplets ---
    /// Tuplet opening paren
    TUPLET_LPAREN,
    /// Tuplet p value
    TUPLET_P,
    /// Tuplet colon separator
    TUPLET_COLON,
    /// Tuplet q value
    TUPLET_Q,
    /// Tuplet r value
    TUPLET_R,

    // --- Inline fields ---
    /// Inline field opening bracket ([ before letter:)
    INLN_FLD_LFT_BRKT,
    /// Inline field closing bracket (])
    INLN_FLD_RGT_BRKT,

    // --- Info lines ---
    /// Info line header (X:, T:, K:, ...)
    INF_HDR,
    /// Unstructured info line text
    INFO_STR,

    // --- Ornaments and text ---
    /// Quoted annotation ("...")
    ANNOTATION,
    /// Single-character decoration shorthand (., ~, H, T, u, v, ...)
    DECORATION,
    /// Delimited symbol (!trill!, +fermata+)
    SYMBOL,
    /// Slur paren, open or close
    SLUR,

    // --- Voices and layout ---
    /// Voice name token inside V: content
    VOICE,
    /// Voice overlay (&, &&)
    VOICE_OVRLAY,
    /// Line continuation (backslash + newline)
    LINE_CONT,
    /// Vertical spacer (y)
    Y_SPC,

    // --- Lyric lines ---
    /// Lyric line header (w: or W:)
    LY_HDR,
    /// Lyric syllable text
    LY_TXT,
    /// Syllable hyphen (-)
    LY_HYPH,
    /// Held-syllable underscore (_)
    LY_UNDR,
    /// Skip-note star (*)
    LY_STAR,
    /// Syllable space inside a word (~ or \-)
    LY_SPS,
    /// Section header inside a lyric block
    LY_SECT_HDR,

    // --- Symbol lines ---
    /// Symbol line header (s:)
    SY_HDR,
    /// Symbol line content
    SY_TXT,
    /// Symbol line skip star (*)
    SY_STAR,

    // --- Key signatures (K: and V: clef values) ---
    /// Key root letter (A-G)
    KEY_ROOT,
    /// Key accidental (# or b)
    KEY_ACCIDENTAL,
    /// Key mode word (major, m, dor, mix, ...)
    KEY_MODE,
    /// Explicit key accidental (^c, _b, =f)
    KEY_EXPLICIT_ACC,
    /// Literal "none"
    KEY_NONE,

    // --- Directives ---
    /// Stylesheet directive marker (%%)
    STYLESHEET_DIRECTIVE,

    // --- Expression atoms ---
    /// Identifier
    IDENTIFIER,
    /// Number (integer or decimal)
    NUMBER,
    /// Equals sign
    EQL,
    /// Slash
    SLASH,
    /// Minus sign
    MINUS,
    /// Plus sign
    PLUS,
    /// Left parenthesis
    LPAREN,
    /// Right parenthesis
    RPAREN,
    /// Left brace
    LBRACE,
    /// Right brace
    RBRACE,
    /// Left bracket
    LBRACKET,
    /// Right bracket
    RBRACKET,
    /// Pipe
    PIPE,
    /// Measurement unit suffix (cm, in, pt)
    MEASUREMENT_UNIT,
    /// Special meter literal (C, C|)
    SPECIAL_LITERAL,

    // --- Trivia and structure ---
    /// Comment (% ...)
    COMMENT,
    /// Whitespace (spaces, tabs)
    WS,
    /// Newline
    EOL,
    /// Section break (two or more newlines)
    SCT_BRK,
    /// Free text outside any tune
    FREE_TXT,
    /// Unrecognized byte run
    INVALID,
    /// End of input
    EOF,
}

impl TokenKind {
    /// Returns true for whitespace, newlines, and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WS | Self::EOL | Self::COMMENT)
    }

    /// Returns true for tokens that can start a pitch.
    pub fn starts_pitch(self) -> bool {
        matches!(self, Self::ACCIDENTAL | Self::NOTE_LETTER)
    }

    /// Returns true for the rhythm token family.
    pub fn is_rhythm(self) -> bool {
        matches!(
            self,
            Self::RHY_NUMER | Self::RHY_SEP | Self::RHY_DENOM | Self::RHY_BRKN
        )
    }

    /// Returns true for tokens a beam can contain.
    pub fn can_join_beam(self) -> bool {
        matches!(
            self,
            Self::NOTE_LETTER
                | Self::ACCIDENTAL
                | Self::REST
                | Self::CHRD_LEFT_BRKT
                | Self::GRC_GRP_LEFT_BRACE
                | Self::DECORATION
                | Self::SYMBOL
                | Self::ANNOTATION
                | Self::TUPLET_LPAREN
        )
    }

    /// Returns true for lyric-line content tokens.
    pub fn is_lyric_content(self) -> bool {
        matches!(
            self,
            Self::LY_TXT
                | Self::LY_HYPH
                | Self::LY_UNDR
                | Self::LY_STAR
                | Self::LY_SPS
                | Self::LY_SECT_HDR
                | Self::BARLINE
        )
    }

    /// Returns true for key-signature tokens.
    pub fn is_key_token(self) -> bool {
        matches!(
            self,
            Self::KEY_ROOT
                | Self::KEY_ACCIDENTAL
                | Self::KEY_MODE
                | Self::KEY_EXPLICIT_ACC
                | Self::KEY_NONE
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
