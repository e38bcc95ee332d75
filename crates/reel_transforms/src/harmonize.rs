//! Diatonic harmonization.
//!
//! A selected standalone note becomes a chord of the note and its
//! harmony; a selected chord gains one harmony note per existing note,
//! appended after the last original. Stepping is diatonic and preserves
//! each note's alteration.

use reel_cst::CsNode;
use reel_syntax::{NodeTag, ParseContext, TokenKind};

use crate::build::{build_note, pitch_parts_of, token_leaf};
use crate::pitch::step_diatonic;
use crate::selection::{hits, Cursor, Selection};

/// Harmonizes the selection by the given diatonic step count. Zero steps
/// is the identity.
pub fn harmonize(selection: &mut Selection<'_>, steps: i32, ctx: &mut ParseContext) {
    if steps == 0 {
        return;
    }
    let cursors = selection.cursors.clone();
    walk(selection.root, &cursors, steps, ctx);
}

fn walk(node: &mut CsNode, cursors: &[Cursor], steps: i32, ctx: &mut ParseContext) {
    let mut notes = Vec::new();
    let mut chords = Vec::new();
    for child in node.children() {
        match child.tag {
            NodeTag::Note if hits(child, cursors) => notes.push(child.id),
            NodeTag::Chord if hits(child, cursors) => chords.push(child.id),
            _ => {}
        }
    }
    for id in notes {
        wrap_note_in_chord(node, id, steps, ctx);
    }
    for id in chords {
        if let Some(chord) = node.find_mut(id) {
            harmonize_chord(chord, steps, ctx);
        }
    }

    let mut link = node.first_child.as_deref_mut();
    while let Some(child) = link {
        if !matches!(child.tag, NodeTag::Chord | NodeTag::Note) {
            walk(child, cursors, steps, ctx);
        }
        link = child.next_sibling.as_deref_mut();
    }
}

/// Replaces a standalone note with a chord of the note and its harmony.
/// The note's rhythm and tie move to chord level.
fn wrap_note_in_chord(parent: &mut CsNode, note_id: u32, steps: i32, ctx: &mut ParseContext) {
    let (_, parts, at) = match parent.find(note_id).and_then(pitch_parts_of) {
        Some(found) => found,
        None => return,
    };

    let chord_id = ctx.fresh_id();
    let placeholder = CsNode::interior(NodeTag::Chord, chord_id);
    let mut note = match parent.replace_child(note_id, placeholder) {
        Some(old) => old,
        None => return,
    };

    // Rhythm and tie belong to the chord now.
    let rhythm = note
        .find_child_by_tag(NodeTag::Rhythm)
        .map(|r| r.id)
        .and_then(|id| note.remove_child(id));
    let tie = note
        .find_tie_child()
        .map(|t| t.id)
        .and_then(|id| note.remove_child(id));

    let harmony_parts = step_diatonic(&parts, steps);
    let harmony = build_note(ctx, &harmony_parts, at);

    let mut children = vec![
        token_leaf(ctx, TokenKind::CHRD_LEFT_BRKT, "[", at),
        *note,
        harmony,
        token_leaf(ctx, TokenKind::CHRD_RIGHT_BRKT, "]", at),
    ];
    if let Some(rhythm) = rhythm {
        children.push(*rhythm);
    }
    if let Some(tie) = tie {
        children.push(*tie);
    }

    if let Some(chord) = parent.find_mut(chord_id) {
        chord.set_children(children);
    }
}

/// Appends one harmony note per original note, after the last original.
fn harmonize_chord(chord: &mut CsNode, steps: i32, ctx: &mut ParseContext) {
    let originals: Vec<(u32, crate::pitch::PitchParts, (u32, u32))> = chord
        .children()
        .filter(|c| c.tag == NodeTag::Note)
        .filter_map(|c| pitch_parts_of(c).map(|(_, parts, at)| (c.id, parts, at)))
        .collect();
    let mut anchor = match originals.last() {
        Some((id, _, _)) => *id,
        None => return,
    };
    for (_, parts, at) in &originals {
        let harmony = build_note(ctx, &step_diatonic(parts, steps), *at);
        let harmony_id = harmony.id;
        if chord.insert_after(anchor, harmony) {
            anchor = harmony_id;
        }
    }
}
