//! Shared CST construction helpers for the transforms.

use reel_cst::CsNode;
use reel_syntax::{NodeTag, ParseContext, TokenKind};

use crate::pitch::PitchParts;

/// Builds a token leaf with a fresh id at the given position.
pub(crate) fn token_leaf(
    ctx: &mut ParseContext,
    kind: TokenKind,
    lexeme: &str,
    at: (u32, u32),
) -> CsNode {
    CsNode::leaf(ctx.token(kind, lexeme, at.0, at.1))
}

/// Builds a Pitch node from decoded parts.
pub(crate) fn build_pitch(ctx: &mut ParseContext, parts: &PitchParts, at: (u32, u32)) -> CsNode {
    let (letter, octave) = parts.to_lexemes();
    let mut children = Vec::new();
    if let Some(acc) = &parts.accidental {
        children.push(token_leaf(ctx, TokenKind::ACCIDENTAL, acc, at));
    }
    children.push(token_leaf(ctx, TokenKind::NOTE_LETTER, &letter, at));
    if let Some(octave) = octave {
        children.push(token_leaf(ctx, TokenKind::OCTAVE, &octave, at));
    }
    let id = ctx.fresh_id();
    CsNode::with_children(NodeTag::Pitch, id, children)
}

/// Builds a bare Note (pitch only) from decoded parts.
pub(crate) fn build_note(ctx: &mut ParseContext, parts: &PitchParts, at: (u32, u32)) -> CsNode {
    let pitch = build_pitch(ctx, parts, at);
    let id = ctx.fresh_id();
    CsNode::with_children(NodeTag::Note, id, vec![pitch])
}

/// Decodes the pitch parts of a Note node, along with the letter token's
/// position.
pub(crate) fn pitch_parts_of(note: &CsNode) -> Option<(u32, PitchParts, (u32, u32))> {
    let pitch = note.find_child_by_tag(NodeTag::Pitch)?;
    let letter = pitch.find_child_token(TokenKind::NOTE_LETTER)?;
    let letter_token = letter.token.as_ref()?;
    let accidental = pitch
        .find_child_token(TokenKind::ACCIDENTAL)
        .and_then(|n| n.token.as_ref())
        .map(|t| t.lexeme.as_str());
    let octave = pitch
        .find_child_token(TokenKind::OCTAVE)
        .and_then(|n| n.token.as_ref())
        .map(|t| t.lexeme.as_str());
    let parts = PitchParts::from_lexemes(accidental, &letter_token.lexeme, octave)?;
    Some((
        pitch.id,
        parts,
        (letter_token.line, letter_token.column),
    ))
}

/// Deep-clones a subtree, detaching it from its siblings and assigning
/// fresh ids to every node and token.
pub(crate) fn clone_fresh(node: &CsNode, ctx: &mut ParseContext) -> CsNode {
    let mut copy = node.clone();
    copy.next_sibling = None;
    renumber(&mut copy, ctx);
    copy
}

fn renumber(node: &mut CsNode, ctx: &mut ParseContext) {
    node.id = ctx.fresh_id();
    if let Some(token) = &mut node.token {
        token.id = node.id;
    }
    let mut link = node.first_child.as_deref_mut();
    while let Some(child) = link {
        renumber(child, ctx);
        link = child.next_sibling.as_deref_mut();
    }
}

/// Position of the left-most token in a subtree.
pub(crate) fn first_token_pos(node: &CsNode) -> Option<(u32, u32)> {
    if let Some(token) = &node.token {
        return Some((token.line, token.column));
    }
    for child in node.children() {
        if let Some(pos) = first_token_pos(child) {
            return Some(pos);
        }
    }
    None
}
