//! Chromatic transposition.

use reel_cst::CsNode;
use reel_diagnostics::Issue;
use reel_syntax::{NodeTag, ParseContext};

use crate::build::{build_pitch, pitch_parts_of};
use crate::pitch::{midi_to_pitch, pitch_to_midi};
use crate::selection::{directly_selected, hits, Cursor, Selection};

/// Transposes every selected note (and every note of selected chords) by
/// the given number of semitones. Results outside the MIDI range [0,127]
/// leave the note unchanged and report an issue.
pub fn transpose(selection: &mut Selection<'_>, semitones: i32, ctx: &mut ParseContext) {
    if semitones == 0 {
        return;
    }
    let cursors = selection.cursors.clone();
    walk(selection.root, &cursors, false, semitones, ctx);
}

fn walk(
    node: &mut CsNode,
    cursors: &[Cursor],
    inherited: bool,
    semitones: i32,
    ctx: &mut ParseContext,
) {
    if node.tag == NodeTag::Note {
        if inherited || hits(node, cursors) {
            transpose_note(node, semitones, ctx);
        }
        return;
    }
    let pass_down = inherited || directly_selected(node, cursors);
    let mut link = node.first_child.as_deref_mut();
    while let Some(child) = link {
        walk(child, cursors, pass_down, semitones, ctx);
        link = child.next_sibling.as_deref_mut();
    }
}

fn transpose_note(note: &mut CsNode, semitones: i32, ctx: &mut ParseContext) {
    let (pitch_id, parts, at) = match pitch_parts_of(note) {
        Some(found) => found,
        None => return,
    };
    let midi = pitch_to_midi(&parts) + semitones;
    if !(0..=127).contains(&midi) {
        ctx.report(Issue::interpreter(
            format!("transposition lands outside the MIDI range ({})", midi),
            at.0,
            at.1,
        ));
        return;
    }
    let new_parts = midi_to_pitch(midi, parts.accidental.as_deref());
    let new_pitch = build_pitch(ctx, &new_parts, at);
    note.replace_child(pitch_id, new_pitch);
}
