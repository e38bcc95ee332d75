//! CST → AST conversion.
//!
//! One builder per node tag; each discriminates its children by tag and
//! token kind. Fields with a structured value list synthesize their flat
//! token list by walking the structured children, per the dual-storage
//! contract of info lines and inline fields.

use reel_ast::*;
use reel_syntax::{NodeTag, Token, TokenKind};

use crate::CsNode;

/// Rebuilds the AST for a CST produced by `from_ast` (possibly edited).
pub fn to_ast(root: &CsNode) -> FileStructure {
    let mut file_header = None;
    let mut items = Vec::new();

    for child in root.children() {
        match child.tag {
            NodeTag::FileHeader => {
                file_header = Some(FileHeader {
                    id: child.id,
                    items: child.children().map(to_header_item).collect(),
                });
            }
            NodeTag::Tune => items.push(FileItem::Tune(to_tune(child))),
            NodeTag::SystemBreak => items.push(FileItem::SystemBreak(SystemBreak {
                id: child.id,
                token: first_token(child),
            })),
            _ => items.push(FileItem::Stray(token_of(child))),
        }
    }

    FileStructure {
        id: root.id,
        file_header,
        items,
    }
}

/// The token of a leaf node; defensive fallback for malformed trees.
fn token_of(node: &CsNode) -> Token {
    node.token
        .clone()
        .unwrap_or_else(|| Token::new(TokenKind::INVALID, "", 0, 0, node.id))
}

/// The first token leaf among the children.
fn first_token(node: &CsNode) -> Token {
    node.children()
        .find(|c| c.is_token())
        .map(token_of)
        .unwrap_or_else(|| Token::new(TokenKind::INVALID, "", 0, 0, node.id))
}

fn child_token(node: &CsNode, kind: TokenKind) -> Option<Token> {
    node.find_child_token(kind).map(token_of)
}

fn to_header_item(node: &CsNode) -> HeaderItem {
    match node.tag {
        NodeTag::InfoLine => HeaderItem::InfoLine(to_info_line(node)),
        NodeTag::Directive => HeaderItem::Directive(to_directive(node)),
        NodeTag::Comment => HeaderItem::Comment(Comment {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::MacroDecl => {
            let (header, tokens) = header_and_rest(node);
            HeaderItem::MacroDecl(MacroDecl {
                id: node.id,
                header,
                tokens,
            })
        }
        NodeTag::UserSymbolDecl => {
            let (header, tokens) = header_and_rest(node);
            HeaderItem::UserSymbolDecl(UserSymbolDecl {
                id: node.id,
                header,
                tokens,
            })
        }
        _ => HeaderItem::Stray(token_of(node)),
    }
}

/// Splits a node into its leading header token and the remaining tokens.
fn header_and_rest(node: &CsNode) -> (Token, Vec<Token>) {
    let mut children = node.children();
    let header = children
        .next()
        .map(token_of)
        .unwrap_or_else(|| Token::new(TokenKind::INF_HDR, "", 0, 0, node.id));
    let rest = children.map(token_of).collect();
    (header, rest)
}

fn to_tune(node: &CsNode) -> Tune {
    let header = node
        .find_child_by_tag(NodeTag::TuneHeader)
        .map(|h| TuneHeader {
            id: h.id,
            items: h.children().map(to_header_item).collect(),
        })
        .unwrap_or(TuneHeader {
            id: node.id,
            items: Vec::new(),
        });
    let body = node.find_child_by_tag(NodeTag::TuneBody).map(|b| TuneBody {
        id: b.id,
        systems: b
            .children()
            .map(|s| System {
                id: s.id,
                items: s.children().map(to_music_item).collect(),
            })
            .collect(),
    });
    Tune {
        id: node.id,
        header,
        body,
    }
}

fn to_music_item(node: &CsNode) -> MusicItem {
    match node.tag {
        NodeTag::Beam => MusicItem::Beam(Beam {
            id: node.id,
            items: node.children().map(to_music_item).collect(),
        }),
        NodeTag::Note => MusicItem::Note(to_note(node)),
        NodeTag::Rest => MusicItem::Rest(Rest {
            id: node.id,
            rest: first_token(node),
            rhythm: node.find_child_by_tag(NodeTag::Rhythm).map(to_rhythm),
        }),
        NodeTag::MultiMeasureRest => MusicItem::MultiMeasureRest(MultiMeasureRest {
            id: node.id,
            rest: first_token(node),
            length: child_token(node, TokenKind::RHY_NUMER),
        }),
        NodeTag::Chord => MusicItem::Chord(to_chord(node)),
        NodeTag::GraceGroup => MusicItem::GraceGroup(to_grace_group(node)),
        NodeTag::Tuplet => MusicItem::Tuplet(to_tuplet(node)),
        NodeTag::BarLine => MusicItem::BarLine(to_barline(node)),
        NodeTag::InlineField => MusicItem::InlineField(to_inline_field(node)),
        NodeTag::Annotation => MusicItem::Annotation(Annotation {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::ChordSymbol => MusicItem::ChordSymbol(ChordSymbol {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::Decoration => MusicItem::Decoration(Decoration {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::Symbol => MusicItem::Symbol(Symbol {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::VoiceOverlay => MusicItem::VoiceOverlay(VoiceOverlay {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::YSpacer => MusicItem::YSpacer(YSpacer {
            id: node.id,
            token: first_token(node),
            rhythm: node.find_child_by_tag(NodeTag::Rhythm).map(to_rhythm),
        }),
        NodeTag::LineContinuation => MusicItem::LineContinuation(LineContinuation {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::Comment => MusicItem::Comment(Comment {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::InfoLine => MusicItem::InfoLine(to_info_line(node)),
        NodeTag::LyricLine => {
            let (header, tokens) = header_and_rest(node);
            MusicItem::LyricLine(LyricLine {
                id: node.id,
                header,
                tokens,
            })
        }
        NodeTag::SymbolLine => {
            let (header, tokens) = header_and_rest(node);
            MusicItem::SymbolLine(SymbolLine {
                id: node.id,
                header,
                tokens,
            })
        }
        NodeTag::Directive => MusicItem::Directive(to_directive(node)),
        NodeTag::MacroInvocation => MusicItem::MacroInvocation(MacroInvocation {
            id: node.id,
            token: first_token(node),
        }),
        NodeTag::UserSymbolInvocation => {
            MusicItem::UserSymbolInvocation(UserSymbolInvocation {
                id: node.id,
                token: first_token(node),
            })
        }
        NodeTag::ErrorExpr => MusicItem::ErrorExpr(ErrorExpr {
            id: node.id,
            tokens: node.children().map(token_of).collect(),
        }),
        _ => MusicItem::Stray(token_of(node)),
    }
}

fn to_note(node: &CsNode) -> Note {
    let pitch = node
        .find_child_by_tag(NodeTag::Pitch)
        .map(to_pitch)
        .unwrap_or(Pitch {
            id: node.id,
            accidental: None,
            letter: Token::new(TokenKind::NOTE_LETTER, "", 0, 0, node.id),
            octave: None,
        });
    Note {
        id: node.id,
        pitch,
        rhythm: node.find_child_by_tag(NodeTag::Rhythm).map(to_rhythm),
        tie: child_token(node, TokenKind::TIE),
    }
}

fn to_pitch(node: &CsNode) -> Pitch {
    Pitch {
        id: node.id,
        accidental: child_token(node, TokenKind::ACCIDENTAL),
        letter: child_token(node, TokenKind::NOTE_LETTER)
            .unwrap_or_else(|| Token::new(TokenKind::NOTE_LETTER, "", 0, 0, node.id)),
        octave: child_token(node, TokenKind::OCTAVE),
    }
}

fn to_rhythm(node: &CsNode) -> Rhythm {
    Rhythm {
        id: node.id,
        numerator: child_token(node, TokenKind::RHY_NUMER),
        separator: child_token(node, TokenKind::RHY_SEP),
        denominator: child_token(node, TokenKind::RHY_DENOM),
        broken: child_token(node, TokenKind::RHY_BRKN),
    }
}

fn to_chord(node: &CsNode) -> Chord {
    let mut left_bracket = None;
    let mut right_bracket = None;
    let mut rhythm = None;
    let mut tie = None;
    let mut items = Vec::new();

    for child in node.children() {
        match child.tag {
            NodeTag::Note => items.push(ChordItem::Note(to_note(child))),
            NodeTag::Annotation => items.push(ChordItem::Annotation(Annotation {
                id: child.id,
                token: first_token(child),
            })),
            NodeTag::Rhythm => rhythm = Some(to_rhythm(child)),
            NodeTag::Token => match child.token_kind() {
                Some(TokenKind::CHRD_LEFT_BRKT) if left_bracket.is_none() => {
                    left_bracket = Some(token_of(child));
                }
                Some(TokenKind::CHRD_RIGHT_BRKT) if right_bracket.is_none() => {
                    right_bracket = Some(token_of(child));
                }
                Some(TokenKind::TIE) => tie = Some(token_of(child)),
                _ => items.push(ChordItem::Stray(token_of(child))),
            },
            _ => {}
        }
    }

    Chord {
        id: node.id,
        left_bracket: left_bracket
            .unwrap_or_else(|| Token::new(TokenKind::CHRD_LEFT_BRKT, "", 0, 0, node.id)),
        items,
        right_bracket,
        rhythm,
        tie,
    }
}

fn to_grace_group(node: &CsNode) -> GraceGroup {
    let mut left_brace = None;
    let mut right_brace = None;
    let mut slash = None;
    let mut items = Vec::new();

    for child in node.children() {
        match child.tag {
            NodeTag::Note => items.push(GraceItem::Note(to_note(child))),
            NodeTag::Token => match child.token_kind() {
                Some(TokenKind::GRC_GRP_LEFT_BRACE) if left_brace.is_none() => {
                    left_brace = Some(token_of(child));
                }
                Some(TokenKind::GRC_GRP_RGHT_BRACE) if right_brace.is_none() => {
                    right_brace = Some(token_of(child));
                }
                Some(TokenKind::GRC_GRP_SLSH) if slash.is_none() => {
                    slash = Some(token_of(child));
                }
                _ => items.push(GraceItem::Stray(token_of(child))),
            },
            _ => {}
        }
    }

    GraceGroup {
        id: node.id,
        left_brace: left_brace
            .unwrap_or_else(|| Token::new(TokenKind::GRC_GRP_LEFT_BRACE, "", 0, 0, node.id)),
        slash,
        items,
        right_brace,
    }
}

fn to_tuplet(node: &CsNode) -> Tuplet {
    let tokens: Vec<Token> = node.children().map(token_of).collect();
    let mut lparen = None;
    let mut p = None;
    let mut q = None;
    let mut r = None;
    let mut pending_colon: Option<Token> = None;

    for token in tokens {
        match token.kind {
            TokenKind::TUPLET_LPAREN => lparen = Some(token),
            TokenKind::TUPLET_P => p = Some(token),
            TokenKind::TUPLET_COLON => {
                // A colon with no value belongs to whichever slot is open.
                if let Some(colon) = pending_colon.take() {
                    if q.is_none() {
                        q = Some(TupletValue { colon, value: None });
                    } else if r.is_none() {
                        r = Some(TupletValue { colon, value: None });
                    }
                }
                pending_colon = Some(token);
            }
            TokenKind::TUPLET_Q => {
                if let Some(colon) = pending_colon.take() {
                    q = Some(TupletValue {
                        colon,
                        value: Some(token),
                    });
                }
            }
            TokenKind::TUPLET_R => {
                if let Some(colon) = pending_colon.take() {
                    r = Some(TupletValue {
                        colon,
                        value: Some(token),
                    });
                }
            }
            _ => {}
        }
    }
    if let Some(colon) = pending_colon {
        if q.is_none() {
            q = Some(TupletValue { colon, value: None });
        } else if r.is_none() {
            r = Some(TupletValue { colon, value: None });
        }
    }

    Tuplet {
        id: node.id,
        lparen: lparen
            .unwrap_or_else(|| Token::new(TokenKind::TUPLET_LPAREN, "", 0, 0, node.id)),
        p: p.unwrap_or_else(|| Token::new(TokenKind::TUPLET_P, "", 0, 0, node.id)),
        q,
        r,
    }
}

fn to_barline(node: &CsNode) -> BarLine {
    let mut children = node.children();
    let bar = children
        .next()
        .map(token_of)
        .unwrap_or_else(|| Token::new(TokenKind::BARLINE, "", 0, 0, node.id));
    BarLine {
        id: node.id,
        bar,
        repeat_numbers: children.map(token_of).collect(),
    }
}

/// Rebuilds values and flat tokens for an info line.
fn to_info_line(node: &CsNode) -> InfoLine {
    let mut children = node.children();
    let header = children
        .next()
        .map(token_of)
        .unwrap_or_else(|| Token::new(TokenKind::INF_HDR, "", 0, 0, node.id));
    let rest: Vec<&CsNode> = children.collect();
    let (tokens, values) = rebuild_values(&rest);
    InfoLine {
        id: node.id,
        header,
        tokens,
        values,
    }
}

fn to_inline_field(node: &CsNode) -> InlineField {
    let mut left_bracket = None;
    let mut header = None;
    let mut right_bracket = None;
    let mut content: Vec<&CsNode> = Vec::new();

    for child in node.children() {
        match child.token_kind() {
            Some(TokenKind::INLN_FLD_LFT_BRKT) if left_bracket.is_none() => {
                left_bracket = Some(token_of(child));
            }
            Some(TokenKind::INF_HDR) if header.is_none() => header = Some(token_of(child)),
            Some(TokenKind::INLN_FLD_RGT_BRKT) if right_bracket.is_none() => {
                right_bracket = Some(token_of(child));
            }
            _ => content.push(child),
        }
    }

    let (tokens, values) = rebuild_values(&content);
    InlineField {
        id: node.id,
        left_bracket: left_bracket
            .unwrap_or_else(|| Token::new(TokenKind::INLN_FLD_LFT_BRKT, "", 0, 0, node.id)),
        header: header.unwrap_or_else(|| Token::new(TokenKind::INF_HDR, "", 0, 0, node.id)),
        tokens,
        values,
        right_bracket,
    }
}

/// Field content children → (flat tokens, structured values). The flat
/// list is synthesized by walking the structured children when any are
/// present.
fn rebuild_values(content: &[&CsNode]) -> (Vec<Token>, Option<Vec<ValueExpr>>) {
    use reel_ast::TokenWalk;

    let structured = content.iter().any(|c| c.tag.is_value_expr());
    if !structured {
        return (content.iter().map(|c| token_of(c)).collect(), None);
    }
    let values: Vec<ValueExpr> = content.iter().map(|c| to_value(c)).collect();
    let mut tokens = Vec::new();
    for value in &values {
        value.each_token(&mut |t| tokens.push(t.clone()));
    }
    (tokens, Some(values))
}

fn to_directive(node: &CsNode) -> Directive {
    let mut children = node.children();
    let marker = children
        .next()
        .map(token_of)
        .unwrap_or_else(|| Token::new(TokenKind::STYLESHEET_DIRECTIVE, "%%", 0, 0, node.id));
    let rest: Vec<&CsNode> = children.collect();

    let mut idx = 0;
    let name = match rest.first() {
        Some(c) if c.token_kind() == Some(TokenKind::IDENTIFIER) => {
            idx = 1;
            Some(token_of(c))
        }
        _ => None,
    };

    // Free-text payloads and closing markers form the tail; everything
    // before them is a value.
    let tail_start = rest[idx..]
        .iter()
        .position(|c| {
            matches!(
                c.token_kind(),
                Some(TokenKind::FREE_TXT) | Some(TokenKind::STYLESHEET_DIRECTIVE)
            )
        })
        .map(|p| idx + p)
        .unwrap_or(rest.len());

    let values = rest[idx..tail_start].iter().map(|c| to_value(c)).collect();
    let tail = rest[tail_start..].iter().map(|c| token_of(c)).collect();

    Directive {
        id: node.id,
        marker,
        name,
        values,
        tail,
    }
}

fn to_value(node: &CsNode) -> ValueExpr {
    match node.tag {
        NodeTag::KV => {
            let parts: Vec<&CsNode> = node.children().collect();
            let key = parts
                .first()
                .map(|c| to_value(c))
                .unwrap_or(ValueExpr::Token(token_of(node)));
            let eq = parts
                .iter()
                .find(|c| c.token_kind() == Some(TokenKind::EQL))
                .map(|c| token_of(c))
                .unwrap_or_else(|| Token::new(TokenKind::EQL, "=", 0, 0, node.id));
            let value = parts
                .last()
                .map(|c| to_value(c))
                .unwrap_or(ValueExpr::Token(token_of(node)));
            ValueExpr::KV(KV {
                id: node.id,
                key: Box::new(key),
                eq,
                value: Box::new(value),
            })
        }
        NodeTag::Binary => {
            let parts: Vec<&CsNode> = node.children().collect();
            let lhs = parts
                .first()
                .map(|c| to_value(c))
                .unwrap_or(ValueExpr::Token(token_of(node)));
            let op = parts
                .get(1)
                .map(|c| token_of(c))
                .unwrap_or_else(|| Token::new(TokenKind::PLUS, "+", 0, 0, node.id));
            let rhs = parts
                .last()
                .map(|c| to_value(c))
                .unwrap_or(ValueExpr::Token(token_of(node)));
            ValueExpr::Binary(Binary {
                id: node.id,
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            })
        }
        NodeTag::Unary => {
            let parts: Vec<&CsNode> = node.children().collect();
            let op = parts
                .first()
                .map(|c| token_of(c))
                .unwrap_or_else(|| Token::new(TokenKind::MINUS, "-", 0, 0, node.id));
            let operand = parts
                .last()
                .map(|c| to_value(c))
                .unwrap_or(ValueExpr::Token(token_of(node)));
            ValueExpr::Unary(Unary {
                id: node.id,
                op,
                operand: Box::new(operand),
            })
        }
        NodeTag::Grouping => {
            let mut lparen = None;
            let mut rparen = None;
            let mut items = Vec::new();
            for child in node.children() {
                match child.token_kind() {
                    Some(TokenKind::LPAREN) if lparen.is_none() => lparen = Some(token_of(child)),
                    Some(TokenKind::RPAREN) => rparen = Some(token_of(child)),
                    _ => items.push(to_value(child)),
                }
            }
            ValueExpr::Grouping(Grouping {
                id: node.id,
                lparen: lparen.unwrap_or_else(|| Token::new(TokenKind::LPAREN, "(", 0, 0, node.id)),
                items,
                rparen,
            })
        }
        NodeTag::Rational => {
            let parts: Vec<Token> = node.children().map(token_of).collect();
            ValueExpr::Rational(Rational {
                id: node.id,
                numerator: parts
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Token::new(TokenKind::NUMBER, "", 0, 0, node.id)),
                slash: parts
                    .get(1)
                    .cloned()
                    .unwrap_or_else(|| Token::new(TokenKind::SLASH, "/", 0, 0, node.id)),
                denominator: parts
                    .get(2)
                    .cloned()
                    .unwrap_or_else(|| Token::new(TokenKind::NUMBER, "", 0, 0, node.id)),
            })
        }
        NodeTag::Measurement => {
            let parts: Vec<Token> = node.children().map(token_of).collect();
            ValueExpr::Measurement(Measurement {
                id: node.id,
                number: parts
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Token::new(TokenKind::NUMBER, "", 0, 0, node.id)),
                unit: parts
                    .get(1)
                    .cloned()
                    .unwrap_or_else(|| Token::new(TokenKind::MEASUREMENT_UNIT, "", 0, 0, node.id)),
            })
        }
        NodeTag::AbsolutePitch => ValueExpr::AbsolutePitch(AbsolutePitch {
            id: node.id,
            letter: child_token(node, TokenKind::NOTE_LETTER)
                .unwrap_or_else(|| Token::new(TokenKind::NOTE_LETTER, "", 0, 0, node.id)),
            accidental: child_token(node, TokenKind::ACCIDENTAL),
            octave: child_token(node, TokenKind::NUMBER),
        }),
        _ => ValueExpr::Token(token_of(node)),
    }
}
