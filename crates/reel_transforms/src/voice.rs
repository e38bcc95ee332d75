//! Voice-line extraction.
//!
//! For every system the selection touches, a copy of the line is
//! inserted after it, prefixed with an inline `[V:id]`. Selected notes
//! and chords survive in the copy; everything else playable becomes a
//! rest of the same length. Grace groups whose target was rested are
//! stripped; bar lines and whitespace are preserved. The tune header
//! gains a `V:id` line before `K:` when it does not already declare the
//! voice.

use reel_cst::CsNode;
use reel_syntax::{NodeTag, ParseContext, TokenKind};

use crate::build::{clone_fresh, first_token_pos, token_leaf};
use crate::selection::{hits, Cursor, Selection};

/// Duplicates every selected line into the given voice.
pub fn insert_voice_line(selection: &mut Selection<'_>, voice_id: &str, ctx: &mut ParseContext) {
    let cursors = selection.cursors.clone();
    let root = &mut *selection.root;
    if root.tag == NodeTag::Tune {
        process_tune(root, &cursors, voice_id, ctx);
        return;
    }
    let tune_ids: Vec<u32> = root
        .children()
        .filter(|c| c.tag == NodeTag::Tune)
        .map(|c| c.id)
        .collect();
    for id in tune_ids {
        if let Some(tune) = root.find_mut(id) {
            process_tune(tune, &cursors, voice_id, ctx);
        }
    }
}

fn process_tune(tune: &mut CsNode, cursors: &[Cursor], voice_id: &str, ctx: &mut ParseContext) {
    let body_id = match tune.find_child_by_tag(NodeTag::TuneBody) {
        Some(body) => body.id,
        None => return,
    };
    let selected_systems: Vec<u32> = tune
        .find(body_id)
        .map(|body| {
            body.children()
                .filter(|s| s.tag == NodeTag::System && hits(s, cursors))
                .map(|s| s.id)
                .collect()
        })
        .unwrap_or_default();
    if selected_systems.is_empty() {
        return;
    }

    ensure_voice_header(tune, voice_id, ctx);

    let body = match tune.find_mut(body_id) {
        Some(body) => body,
        None => return,
    };
    for system_id in selected_systems {
        let duplicate = match body.find(system_id) {
            Some(system) => build_voice_copy(system, cursors, voice_id, ctx),
            None => continue,
        };
        ensure_trailing_eol(body, system_id, ctx);
        body.insert_after(system_id, duplicate);
    }
}

/// Adds `V:id` (with its newline) before the `K:` line unless the header
/// already declares this voice.
fn ensure_voice_header(tune: &mut CsNode, voice_id: &str, ctx: &mut ParseContext) {
    let header_id = match tune.find_child_by_tag(NodeTag::TuneHeader) {
        Some(h) => h.id,
        None => return,
    };
    let header = match tune.find_mut(header_id) {
        Some(h) => h,
        None => return,
    };

    let already_declared = header.children().any(|child| {
        child.tag == NodeTag::InfoLine
            && info_header_letter(child) == Some('V')
            && child
                .children()
                .any(|c| matches!(&c.token, Some(t) if t.lexeme == voice_id))
    });
    if already_declared {
        return;
    }

    let key_line = header
        .children()
        .find(|child| child.tag == NodeTag::InfoLine && info_header_letter(child) == Some('K'));
    let (key_id, at) = match key_line {
        Some(line) => (Some(line.id), first_token_pos(line).unwrap_or((0, 0))),
        None => (None, (0, 0)),
    };

    let line_id = ctx.fresh_id();
    let voice_line = CsNode::with_children(
        NodeTag::InfoLine,
        line_id,
        vec![
            token_leaf(ctx, TokenKind::INF_HDR, "V:", at),
            token_leaf(ctx, TokenKind::VOICE, voice_id, at),
        ],
    );
    let eol = token_leaf(ctx, TokenKind::EOL, "\n", at);

    match key_id {
        Some(key_id) => {
            header.insert_before(key_id, voice_line);
            header.insert_before(key_id, eol);
        }
        None => {
            header.append_child(voice_line);
            header.append_child(eol);
        }
    }
}

fn info_header_letter(line: &CsNode) -> Option<char> {
    line.first_child()
        .and_then(|c| c.token.as_ref())
        .and_then(|t| t.lexeme.chars().next())
}

/// Appends an EOL to a system that ends at EOF without one, so the
/// inserted duplicate starts on its own line.
fn ensure_trailing_eol(body: &mut CsNode, system_id: u32, ctx: &mut ParseContext) {
    let needs_eol = body
        .find(system_id)
        .map(|system| {
            !system
                .children()
                .last()
                .and_then(|c| c.token.as_ref())
                .map(|t| t.kind == TokenKind::EOL || t.lexeme.ends_with('\n'))
                .unwrap_or(false)
        })
        .unwrap_or(false);
    if needs_eol {
        let at = body
            .find(system_id)
            .and_then(first_token_pos)
            .unwrap_or((0, 0));
        let eol = token_leaf(ctx, TokenKind::EOL, "\n", at);
        if let Some(system) = body.find_mut(system_id) {
            system.append_child(eol);
        }
    }
}

/// Builds the `[V:id]`-prefixed copy of a system.
fn build_voice_copy(
    system: &CsNode,
    cursors: &[Cursor],
    voice_id: &str,
    ctx: &mut ParseContext,
) -> CsNode {
    let at = first_token_pos(system).unwrap_or((0, 0));
    let mut items = vec![inline_voice_field(voice_id, at, ctx)];
    rewrite_items(system, cursors, ctx, &mut items);
    let id = ctx.fresh_id();
    CsNode::with_children(NodeTag::System, id, items)
}

fn inline_voice_field(voice_id: &str, at: (u32, u32), ctx: &mut ParseContext) -> CsNode {
    let id = ctx.fresh_id();
    CsNode::with_children(
        NodeTag::InlineField,
        id,
        vec![
            token_leaf(ctx, TokenKind::INLN_FLD_LFT_BRKT, "[", at),
            token_leaf(ctx, TokenKind::INF_HDR, "V:", at),
            token_leaf(ctx, TokenKind::VOICE, voice_id, at),
            token_leaf(ctx, TokenKind::INLN_FLD_RGT_BRKT, "]", at),
        ],
    )
}

/// Copies a system's items: selected notes/chords survive, other
/// playable elements become rests of the same length, grace groups
/// follow their target's fate.
fn rewrite_items(
    node: &CsNode,
    cursors: &[Cursor],
    ctx: &mut ParseContext,
    out: &mut Vec<CsNode>,
) {
    let mut pending_grace: Option<CsNode> = None;

    for child in node.children() {
        match child.tag {
            NodeTag::Note | NodeTag::Chord => {
                if hits(child, cursors) {
                    if let Some(grace) = pending_grace.take() {
                        out.push(grace);
                    }
                    out.push(clone_fresh(child, ctx));
                } else {
                    pending_grace = None;
                    out.push(rest_for(child, ctx));
                }
            }
            NodeTag::GraceGroup => {
                pending_grace = Some(clone_fresh(child, ctx));
            }
            NodeTag::Beam => {
                let mut inner = Vec::new();
                rewrite_items(child, cursors, ctx, &mut inner);
                if !inner.is_empty() {
                    let id = ctx.fresh_id();
                    out.push(CsNode::with_children(NodeTag::Beam, id, inner));
                }
            }
            _ => {
                pending_grace = None;
                out.push(clone_fresh(child, ctx));
            }
        }
    }
}

/// A rest with the same rhythm as the replaced note or chord.
fn rest_for(node: &CsNode, ctx: &mut ParseContext) -> CsNode {
    let at = first_token_pos(node).unwrap_or((0, 0));
    let mut children = vec![token_leaf(ctx, TokenKind::REST, "z", at)];
    if let Some(rhythm) = node.find_child_by_tag(NodeTag::Rhythm) {
        children.push(clone_fresh(rhythm, ctx));
    }
    let id = ctx.fresh_id();
    CsNode::with_children(NodeTag::Rest, id, children)
}
