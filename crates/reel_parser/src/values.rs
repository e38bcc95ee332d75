//! Structured-value parsing for info lines, inline fields, and
//! directives.
//!
//! The flat token list of a field is read into a list of expressions
//! (key=value pairs, rationals, measurements, absolute pitches, signed
//! numbers, groupings). Tokens that fit no expression shape pass through
//! as `ValueExpr::Token`, so the structured list always covers every
//! token of the flat list in order. When the content cannot be read as
//! values at all, the field keeps only its flat tokens and an
//! analyzer-origin issue is reported.

use reel_ast::{
    AbsolutePitch, Binary, Grouping, Measurement, Rational, Unary, ValueExpr, KV,
};
use reel_diagnostics::Issue;
use reel_syntax::{ParseContext, Token, TokenKind};

/// Reads a field's flat tokens into structured values. Returns None for
/// plain-text fields and for content value parsing cannot shape.
pub fn parse_values(tokens: &[Token], ctx: &mut ParseContext) -> Option<Vec<ValueExpr>> {
    if tokens.is_empty() {
        return None;
    }
    if let Some(bad) = tokens.iter().find(|t| t.kind == TokenKind::INVALID) {
        ctx.report(
            Issue::analyzer("field value is not parseable", bad.line, bad.column)
                .with_lexeme(bad.lexeme.clone()),
        );
        return None;
    }
    if tokens.iter().any(|t| t.kind == TokenKind::INFO_STR) {
        // Plain-text field; nothing structured to read.
        return None;
    }

    let mut parser = ValueParser {
        tokens,
        position: 0,
        ctx,
    };
    let mut values = Vec::new();
    while parser.position < parser.tokens.len() {
        values.push(parser.parse_expr());
    }
    // A list of bare tokens adds no structure over the flat list; fields
    // only carry a structured form when something actually parsed.
    if values.iter().all(|v| matches!(v, ValueExpr::Token(_))) {
        return None;
    }
    Some(values)
}

struct ValueParser<'a, 'c> {
    tokens: &'a [Token],
    position: usize,
    ctx: &'c mut ParseContext,
}

impl<'a, 'c> ValueParser<'a, 'c> {
    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.position).map(|t| t.kind)
    }

    fn kind_at(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.position + n).map(|t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        self.position += 1;
        token
    }

    fn parse_expr(&mut self) -> ValueExpr {
        match self.peek_kind().unwrap() {
            TokenKind::NUMBER => self.parse_number_led(),
            TokenKind::MINUS | TokenKind::PLUS => self.parse_sign_led(),
            TokenKind::IDENTIFIER => self.parse_identifier_led(),
            TokenKind::NOTE_LETTER => self.parse_pitch_led(),
            TokenKind::LPAREN => self.parse_grouping(),
            _ => ValueExpr::Token(self.advance()),
        }
    }

    /// NUMBER, then possibly a unit, a rational, or a binary tail.
    fn parse_number_led(&mut self) -> ValueExpr {
        let number = self.advance();

        if self.peek_kind() == Some(TokenKind::MEASUREMENT_UNIT) {
            let unit = self.advance();
            let id = self.ctx.fresh_id();
            return ValueExpr::Measurement(Measurement { id, number, unit });
        }

        if self.peek_kind() == Some(TokenKind::SLASH)
            && self.kind_at(1) == Some(TokenKind::NUMBER)
        {
            let slash = self.advance();
            let denominator = self.advance();
            let id = self.ctx.fresh_id();
            let rational = ValueExpr::Rational(Rational {
                id,
                numerator: number,
                slash,
                denominator,
            });
            return self.maybe_kv(rational);
        }

        if matches!(
            self.peek_kind(),
            Some(TokenKind::PLUS) | Some(TokenKind::MINUS)
        ) && self.kind_at(1) == Some(TokenKind::NUMBER)
        {
            let op = self.advance();
            let rhs = self.advance();
            let id = self.ctx.fresh_id();
            return ValueExpr::Binary(Binary {
                id,
                lhs: Box::new(ValueExpr::Token(number)),
                op,
                rhs: Box::new(ValueExpr::Token(rhs)),
            });
        }

        self.maybe_kv(ValueExpr::Token(number))
    }

    /// A sign opens a unary only in operand position: at the start of the
    /// list or after `=`, `(`, or whitespace following a non-operand.
    fn parse_sign_led(&mut self) -> ValueExpr {
        let unary_position = match self.position.checked_sub(1).map(|p| self.tokens[p].kind) {
            None => true,
            Some(TokenKind::EQL) | Some(TokenKind::LPAREN) | Some(TokenKind::WS) => true,
            _ => false,
        };
        if unary_position && self.kind_at(1) == Some(TokenKind::NUMBER) {
            let op = self.advance();
            let operand = self.parse_number_led();
            let id = self.ctx.fresh_id();
            return ValueExpr::Unary(Unary {
                id,
                op,
                operand: Box::new(operand),
            });
        }
        ValueExpr::Token(self.advance())
    }

    fn parse_identifier_led(&mut self) -> ValueExpr {
        let ident = self.advance();
        self.maybe_kv(ValueExpr::Token(ident))
    }

    /// NOTE_LETTER with optional adjacent accidental and octave digit.
    fn parse_pitch_led(&mut self) -> ValueExpr {
        let letter = self.advance();
        let accidental = if self.peek_kind() == Some(TokenKind::ACCIDENTAL) {
            Some(self.advance())
        } else {
            None
        };
        let octave = if self.peek_kind() == Some(TokenKind::NUMBER) {
            Some(self.advance())
        } else {
            None
        };
        let id = self.ctx.fresh_id();
        let pitch = ValueExpr::AbsolutePitch(AbsolutePitch {
            id,
            letter,
            accidental,
            octave,
        });
        self.maybe_kv(pitch)
    }

    /// Wraps `key` into a KV when an `=` with a right-hand side follows.
    fn maybe_kv(&mut self, key: ValueExpr) -> ValueExpr {
        if self.peek_kind() != Some(TokenKind::EQL) || self.kind_at(1).is_none() {
            return key;
        }
        // `=` at the very end of the content has no value to bind.
        if matches!(self.kind_at(1), Some(TokenKind::WS)) {
            return key;
        }
        let eq = self.advance();
        let value = self.parse_expr();
        let id = self.ctx.fresh_id();
        ValueExpr::KV(KV {
            id,
            key: Box::new(key),
            eq,
            value: Box::new(value),
        })
    }

    fn parse_grouping(&mut self) -> ValueExpr {
        let lparen = self.advance();
        let mut items = Vec::new();
        while let Some(kind) = self.peek_kind() {
            if kind == TokenKind::RPAREN {
                break;
            }
            items.push(self.parse_expr());
        }
        let rparen = if self.peek_kind() == Some(TokenKind::RPAREN) {
            Some(self.advance())
        } else {
            None
        };
        let id = self.ctx.fresh_id();
        ValueExpr::Grouping(Grouping {
            id,
            lparen,
            items,
            rparen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_syntax::ParseContext;

    fn tok(ctx: &mut ParseContext, kind: TokenKind, lexeme: &str) -> Token {
        ctx.token(kind, lexeme, 0, 0)
    }

    #[test]
    fn test_rational() {
        let mut ctx = ParseContext::new();
        let tokens = vec![
            tok(&mut ctx, TokenKind::NUMBER, "4"),
            tok(&mut ctx, TokenKind::SLASH, "/"),
            tok(&mut ctx, TokenKind::NUMBER, "4"),
        ];
        let values = parse_values(&tokens, &mut ctx).unwrap();
        assert_eq!(values.len(), 1);
        assert!(matches!(values[0], ValueExpr::Rational(_)));
    }

    #[test]
    fn test_kv_with_rational_key() {
        let mut ctx = ParseContext::new();
        let tokens = vec![
            tok(&mut ctx, TokenKind::NUMBER, "1"),
            tok(&mut ctx, TokenKind::SLASH, "/"),
            tok(&mut ctx, TokenKind::NUMBER, "4"),
            tok(&mut ctx, TokenKind::EQL, "="),
            tok(&mut ctx, TokenKind::NUMBER, "120"),
        ];
        let values = parse_values(&tokens, &mut ctx).unwrap();
        assert_eq!(values.len(), 1);
        match &values[0] {
            ValueExpr::KV(kv) => {
                assert!(matches!(*kv.key, ValueExpr::Rational(_)));
                assert!(matches!(*kv.value, ValueExpr::Token(_)));
            }
            other => panic!("expected KV, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_kv() {
        let mut ctx = ParseContext::new();
        let tokens = vec![
            tok(&mut ctx, TokenKind::IDENTIFIER, "clef"),
            tok(&mut ctx, TokenKind::EQL, "="),
            tok(&mut ctx, TokenKind::IDENTIFIER, "treble"),
        ];
        let values = parse_values(&tokens, &mut ctx).unwrap();
        assert!(matches!(values[0], ValueExpr::KV(_)));
    }

    #[test]
    fn test_invalid_content_keeps_flat_list() {
        let mut ctx = ParseContext::new();
        let tokens = vec![tok(&mut ctx, TokenKind::INVALID, "$$$")];
        assert!(parse_values(&tokens, &mut ctx).is_none());
        assert!(ctx.has_issues());
    }

    #[test]
    fn test_text_field_has_no_values() {
        let mut ctx = ParseContext::new();
        let tokens = vec![tok(&mut ctx, TokenKind::INFO_STR, "My Title")];
        assert!(parse_values(&tokens, &mut ctx).is_none());
        assert!(!ctx.has_issues());
    }

    #[test]
    fn test_roundtrip_through_value_tokens() {
        use reel_ast::TokenWalk;

        let mut ctx = ParseContext::new();
        let tokens = vec![
            tok(&mut ctx, TokenKind::IDENTIFIER, "clef"),
            tok(&mut ctx, TokenKind::EQL, "="),
            tok(&mut ctx, TokenKind::IDENTIFIER, "treble"),
            tok(&mut ctx, TokenKind::WS, " "),
            tok(&mut ctx, TokenKind::NUMBER, "1"),
            tok(&mut ctx, TokenKind::SLASH, "/"),
            tok(&mut ctx, TokenKind::NUMBER, "8"),
        ];
        let values = parse_values(&tokens, &mut ctx).unwrap();
        let mut back = Vec::new();
        for value in &values {
            value.each_token(&mut |t| back.push(t.clone()));
        }
        assert_eq!(back, tokens);
    }

    #[test]
    fn test_unary_number() {
        let mut ctx = ParseContext::new();
        let tokens = vec![
            tok(&mut ctx, TokenKind::MINUS, "-"),
            tok(&mut ctx, TokenKind::NUMBER, "8"),
        ];
        let values = parse_values(&tokens, &mut ctx).unwrap();
        assert!(matches!(values[0], ValueExpr::Unary(_)));
    }

    #[test]
    fn test_hyphenated_identifier_stays_flat() {
        // treble-8 in an info line: identifier, minus, number. Nothing
        // structures, so the field keeps only its flat list.
        let mut ctx = ParseContext::new();
        let tokens = vec![
            tok(&mut ctx, TokenKind::IDENTIFIER, "treble"),
            tok(&mut ctx, TokenKind::MINUS, "-"),
            tok(&mut ctx, TokenKind::NUMBER, "8"),
        ];
        assert!(parse_values(&tokens, &mut ctx).is_none());
    }
}
