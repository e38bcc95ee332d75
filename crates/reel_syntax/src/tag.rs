//! Tree-node tags.

use serde::{Deserialize, Serialize};

/// Tag of a tree node.
///
/// One variant per grammatical construct, plus `System` (the wrapper the
/// CST inserts around each line of music) and `Token` (leaf nodes owning
/// a single token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeTag {
    FileStructure,
    FileHeader,
    Tune,
    TuneHeader,
    TuneBody,
    System,
    InfoLine,
    Directive,
    Comment,
    MacroDecl,
    MacroInvocation,
    UserSymbolDecl,
    UserSymbolInvocation,
    Beam,
    Note,
    Pitch,
    Rhythm,
    Rest,
    MultiMeasureRest,
    Chord,
    GraceGroup,
    Tuplet,
    BarLine,
    InlineField,
    Annotation,
    ChordSymbol,
    Decoration,
    Symbol,
    VoiceOverlay,
    YSpacer,
    LineContinuation,
    SystemBreak,
    LyricLine,
    SymbolLine,
    KV,
    Binary,
    Unary,
    Grouping,
    Rational,
    Measurement,
    AbsolutePitch,
    ErrorExpr,
    /// A leaf node owning a single token.
    Token,
}

impl NodeTag {
    /// Returns true for the expression tags used inside info lines and
    /// directives.
    pub fn is_value_expr(self) -> bool {
        matches!(
            self,
            Self::KV
                | Self::Binary
                | Self::Unary
                | Self::Grouping
                | Self::Rational
                | Self::Measurement
                | Self::AbsolutePitch
        )
    }

    /// Returns true for tags that may carry a Rhythm child.
    pub fn has_rhythm_slot(self) -> bool {
        matches!(self, Self::Note | Self::Chord | Self::Rest | Self::YSpacer)
    }
}

impl std::fmt::Display for NodeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
