//! Rhythm scaling (doubling and halving).

use num_rational::Ratio;
use reel_cst::CsNode;
use reel_syntax::{NodeTag, ParseContext, Token, TokenKind};

use crate::build::{first_token_pos, token_leaf};
use crate::selection::Range;

/// Direction of a rhythm scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleFactor {
    /// Multiply every length by two.
    Double,
    /// Divide every length by two.
    Halve,
}

/// Scales every rhythm under `root` (restricted to `range` when given).
/// Notes, chords, and rests without a rhythm get one synthesized; unit
/// rhythms are removed.
pub fn scale_rhythm(
    root: &mut CsNode,
    factor: ScaleFactor,
    range: Option<Range>,
    ctx: &mut ParseContext,
) {
    walk(root, factor, range.as_ref(), ctx, false);
}

fn walk(
    node: &mut CsNode,
    factor: ScaleFactor,
    range: Option<&Range>,
    ctx: &mut ParseContext,
    inside_chord: bool,
) {
    let scalable = matches!(node.tag, NodeTag::Note | NodeTag::Chord | NodeTag::Rest);
    if scalable && in_range(node, range) {
        // Notes inside a chord only scale an explicit rhythm; the chord
        // itself carries the synthesized one.
        let synthesize = !(inside_chord && node.tag == NodeTag::Note);
        scale_node(node, factor, ctx, synthesize);
    }

    let next_inside = inside_chord || node.tag == NodeTag::Chord;
    let mut link = node.first_child.as_deref_mut();
    while let Some(child) = link {
        walk(child, factor, range, ctx, next_inside);
        link = child.next_sibling.as_deref_mut();
    }
}

fn in_range(node: &CsNode, range: Option<&Range>) -> bool {
    match range {
        None => true,
        Some(range) => first_token_pos(node)
            .map(|(line, column)| range.contains(line, column))
            .unwrap_or(false),
    }
}

fn scale_node(node: &mut CsNode, factor: ScaleFactor, ctx: &mut ParseContext, synthesize: bool) {
    let at = first_token_pos(node).unwrap_or((0, 0));
    let rhythm = node.find_child_by_tag(NodeTag::Rhythm).map(|r| r.id);

    match rhythm {
        None => {
            if !synthesize {
                return;
            }
            let replacement = match factor {
                ScaleFactor::Double => {
                    build_rhythm(ctx, Ratio::from_integer(2), None, at)
                }
                ScaleFactor::Halve => build_rhythm(ctx, Ratio::new(1, 2), None, at),
            };
            node.replace_rhythm(replacement);
        }
        Some(rhythm_id) => {
            let (value, broken) = {
                let rhythm = node.find(rhythm_id).unwrap();
                (read_value(rhythm), read_broken(rhythm))
            };
            let scaled = match factor {
                ScaleFactor::Double => value * 2,
                ScaleFactor::Halve => value / 2,
            };
            let replacement = build_rhythm(ctx, scaled, broken, at);
            match replacement {
                Some(new) => {
                    node.replace_child(rhythm_id, new);
                }
                None => {
                    node.remove_child(rhythm_id);
                }
            }
        }
    }
}

/// The length encoded by a rhythm node: numerator over denominator,
/// where a bare slash run divides by a power of two.
fn read_value(rhythm: &CsNode) -> Ratio<u64> {
    let mut numerator = 1u64;
    let mut slashes = 0u32;
    let mut denominator: Option<u64> = None;

    for child in rhythm.children() {
        let token = match &child.token {
            Some(t) => t,
            None => continue,
        };
        match token.kind {
            TokenKind::RHY_NUMER => numerator = token.lexeme.parse().unwrap_or(1),
            TokenKind::RHY_SEP => slashes = token.lexeme.len() as u32,
            TokenKind::RHY_DENOM => denominator = token.lexeme.parse().ok(),
            _ => {}
        }
    }

    let denom = match (denominator, slashes) {
        (Some(d), s) if s > 0 => d.max(1) * (1u64 << (s - 1)),
        (Some(d), _) => d.max(1),
        (None, s) if s > 0 => 1u64 << s,
        (None, _) => 1,
    };
    Ratio::new(numerator, denom)
}

fn read_broken(rhythm: &CsNode) -> Option<Token> {
    rhythm
        .find_child_token(TokenKind::RHY_BRKN)
        .and_then(|n| n.token.clone())
}

/// Builds the canonical token sequence for a length: integer numerators
/// bare, `/` for one half, `/n` otherwise, redundant `1` dropped. A unit
/// length with no broken marker yields None (the rhythm disappears).
fn build_rhythm(
    ctx: &mut ParseContext,
    value: Ratio<u64>,
    broken: Option<Token>,
    at: (u32, u32),
) -> Option<CsNode> {
    let p = *value.numer();
    let q = *value.denom();
    let mut children = Vec::new();

    if q == 1 {
        if p != 1 {
            children.push(token_leaf(ctx, TokenKind::RHY_NUMER, &p.to_string(), at));
        }
    } else if p == 1 && q == 2 {
        children.push(token_leaf(ctx, TokenKind::RHY_SEP, "/", at));
    } else {
        if p != 1 {
            children.push(token_leaf(ctx, TokenKind::RHY_NUMER, &p.to_string(), at));
        }
        children.push(token_leaf(ctx, TokenKind::RHY_SEP, "/", at));
        children.push(token_leaf(ctx, TokenKind::RHY_DENOM, &q.to_string(), at));
    }

    if let Some(broken) = broken {
        let token = ctx.token(TokenKind::RHY_BRKN, broken.lexeme, at.0, at.1);
        children.push(CsNode::leaf(token));
    }

    if children.is_empty() {
        return None;
    }
    let id = ctx.fresh_id();
    Some(CsNode::with_children(NodeTag::Rhythm, id, children))
}
