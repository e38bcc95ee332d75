use reel_ast::*;
use reel_parser::parse_source;
use reel_syntax::{ParseContext, TokenKind};

fn parse(source: &str) -> FileStructure {
    let mut ctx = ParseContext::new();
    parse_source(source, &mut ctx)
}

fn tunes(ast: &FileStructure) -> Vec<&Tune> {
    ast.items
        .iter()
        .filter_map(|i| match i {
            FileItem::Tune(t) => Some(t),
            _ => None,
        })
        .collect()
}

fn first_system(ast: &FileStructure) -> &System {
    &tunes(ast)[0].body.as_ref().unwrap().systems[0]
}

#[test]
fn test_empty_input() {
    let ast = parse("");
    assert!(ast.file_header.is_none());
    assert!(ast.items.is_empty());
}

#[test]
fn test_file_header_only() {
    let ast = parse("T:A Collection\nC:Various\n");
    assert!(ast.file_header.is_some());
    assert!(tunes(&ast).is_empty());
}

#[test]
fn test_header_before_first_tune() {
    let ast = parse("T:Collection\n\nX:1\nK:C\nC|\n");
    assert!(ast.file_header.is_some());
    assert_eq!(tunes(&ast).len(), 1);
    assert!(ast
        .items
        .iter()
        .any(|i| matches!(i, FileItem::SystemBreak(_))));
}

#[test]
fn test_tune_without_body() {
    let ast = parse("X:1\nK:C\n");
    let tunes = tunes(&ast);
    assert_eq!(tunes.len(), 1);
    assert!(tunes[0].body.is_none());
}

#[test]
fn test_header_ends_at_key_line() {
    let ast = parse("X:1\nT:Name\nM:4/4\nK:C\nCDEF|\n");
    let tune = tunes(&ast)[0];
    let info_letters: Vec<char> = tune
        .header
        .items
        .iter()
        .filter_map(|i| match i {
            HeaderItem::InfoLine(l) => l.header_letter(),
            _ => None,
        })
        .collect();
    assert_eq!(info_letters, vec!['X', 'T', 'M', 'K']);
    assert!(tune.body.is_some());
}

#[test]
fn test_multiple_tunes() {
    let ast = parse("X:1\nK:C\nC|\n\nX:2\nK:D\nD|\n");
    assert_eq!(tunes(&ast).len(), 2);
}

#[test]
fn test_beam_groups_contiguous_notes() {
    let ast = parse("X:1\nK:C\nCDE F|\n");
    let system = first_system(&ast);
    let beam = system.items.iter().find_map(|i| match i {
        MusicItem::Beam(b) => Some(b),
        _ => None,
    });
    assert_eq!(beam.unwrap().items.len(), 3);
    // The lone F is not wrapped.
    assert!(system
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::Note(_))));
}

#[test]
fn test_single_note_is_not_beamed() {
    let ast = parse("X:1\nK:C\nC D E|\n");
    let system = first_system(&ast);
    assert!(!system.items.iter().any(|i| matches!(i, MusicItem::Beam(_))));
}

#[test]
fn test_note_components() {
    let ast = parse("X:1\nK:C\n^c'3/2-|\n");
    let system = first_system(&ast);
    let note = system
        .items
        .iter()
        .find_map(|i| match i {
            MusicItem::Note(n) => Some(n),
            _ => None,
        })
        .unwrap();
    assert_eq!(note.pitch.accidental.as_ref().unwrap().lexeme, "^");
    assert_eq!(note.pitch.letter.lexeme, "c");
    assert_eq!(note.pitch.octave.as_ref().unwrap().lexeme, "'");
    let rhythm = note.rhythm.as_ref().unwrap();
    assert_eq!(rhythm.numerator.as_ref().unwrap().lexeme, "3");
    assert_eq!(rhythm.denominator.as_ref().unwrap().lexeme, "2");
    assert!(note.tie.is_some());
}

#[test]
fn test_chord_with_rhythm_and_tie() {
    let ast = parse("X:1\nK:C\n[CEG]2-C|\n");
    let system = first_system(&ast);
    let chord = find_chord(system).unwrap();
    assert_eq!(chord.notes().count(), 3);
    assert!(chord.right_bracket.is_some());
    assert!(chord.rhythm.is_some());
    assert!(chord.tie.is_some());
}

fn find_chord(system: &System) -> Option<&Chord> {
    fn in_items(items: &[MusicItem]) -> Option<&Chord> {
        items.iter().find_map(|i| match i {
            MusicItem::Chord(c) => Some(c),
            MusicItem::Beam(b) => in_items(&b.items),
            _ => None,
        })
    }
    in_items(&system.items)
}

#[test]
fn test_chord_with_annotation_inside() {
    let ast = parse("X:1\nK:C\n[\"oops\"CE]|\n");
    let system = first_system(&ast);
    let chord = find_chord(system).unwrap();
    assert!(chord
        .items
        .iter()
        .any(|i| matches!(i, ChordItem::Annotation(_))));
}

#[test]
fn test_grace_group_acciaccatura() {
    let ast = parse("X:1\nK:C\n{/ab}c|\n");
    let system = first_system(&ast);
    fn find_grace(items: &[MusicItem]) -> Option<&GraceGroup> {
        items.iter().find_map(|i| match i {
            MusicItem::GraceGroup(g) => Some(g),
            MusicItem::Beam(b) => find_grace(&b.items),
            _ => None,
        })
    }
    let grace = find_grace(&system.items).unwrap();
    assert!(grace.is_acciaccatura());
    assert_eq!(grace.notes().count(), 2);
    assert!(grace.right_brace.is_some());
}

#[test]
fn test_tuplet_values() {
    let ast = parse("X:1\nK:C\n(3:2:4CDEF|\n");
    let system = first_system(&ast);
    fn find_tuplet(items: &[MusicItem]) -> Option<&Tuplet> {
        items.iter().find_map(|i| match i {
            MusicItem::Tuplet(t) => Some(t),
            MusicItem::Beam(b) => find_tuplet(&b.items),
            _ => None,
        })
    }
    let tuplet = find_tuplet(&system.items).unwrap();
    assert_eq!(tuplet.p.lexeme, "3");
    assert_eq!(tuplet.q.as_ref().unwrap().value.as_ref().unwrap().lexeme, "2");
    assert_eq!(tuplet.r.as_ref().unwrap().value.as_ref().unwrap().lexeme, "4");
}

#[test]
fn test_barline_with_repeat_numbers() {
    let ast = parse("X:1\nK:C\nC|1 D :|2 E|\n");
    let system = first_system(&ast);
    let bars: Vec<&BarLine> = system
        .items
        .iter()
        .filter_map(|i| match i {
            MusicItem::BarLine(b) => Some(b),
            _ => None,
        })
        .collect();
    assert!(bars.iter().any(|b| !b.repeat_numbers.is_empty()));
}

#[test]
fn test_inline_field_vs_chord() {
    let ast = parse("X:1\nK:C\nC[K:G]D [CE]|\n");
    let system = first_system(&ast);
    assert!(system
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::InlineField(_))));
    assert!(find_chord(system).is_some());
}

#[test]
fn test_inline_field_keeps_flat_tokens() {
    let ast = parse("X:1\nK:C\nC[M:3/4]D|\n");
    let system = first_system(&ast);
    let field = system
        .items
        .iter()
        .find_map(|i| match i {
            MusicItem::InlineField(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert!(!field.tokens.is_empty());
    // 3/4 structures into a rational.
    let values = field.values.as_ref().unwrap();
    assert!(values.iter().any(|v| matches!(v, ValueExpr::Rational(_))));
}

#[test]
fn test_multimeasure_rest() {
    let ast = parse("X:1\nK:C\nZ4|z2|\n");
    let system = first_system(&ast);
    let mmr = system
        .items
        .iter()
        .find_map(|i| match i {
            MusicItem::MultiMeasureRest(r) => Some(r),
            _ => None,
        })
        .unwrap();
    assert_eq!(mmr.length.as_ref().unwrap().lexeme, "4");
    assert!(has_rest(system));
}

fn has_rest(system: &System) -> bool {
    fn in_items(items: &[MusicItem]) -> bool {
        items.iter().any(|i| match i {
            MusicItem::Rest(_) => true,
            MusicItem::Beam(b) => in_items(&b.items),
            _ => false,
        })
    }
    in_items(&system.items)
}

#[test]
fn test_line_continuation_joins_systems() {
    let ast = parse("X:1\nK:C\nCD\\\nEF|\n");
    let body = tunes(&ast)[0].body.as_ref().unwrap();
    assert_eq!(body.systems.len(), 1);
    assert!(body.systems[0]
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::LineContinuation(_))));
}

#[test]
fn test_systems_split_on_newline() {
    let ast = parse("X:1\nK:C\nCD|\nEF|\n");
    let body = tunes(&ast)[0].body.as_ref().unwrap();
    assert_eq!(body.systems.len(), 2);
}

#[test]
fn test_empty_system_retained() {
    let ast = parse("X:1\nK:C\nCD|\n \nEF|\n");
    let body = tunes(&ast)[0].body.as_ref().unwrap();
    assert_eq!(body.systems.len(), 3);
    assert!(body.systems[1].is_empty_of_music());
}

#[test]
fn test_lyric_and_symbol_lines_in_body() {
    let ast = parse("X:1\nK:C\nCDEF|\nw:la la\ns:* !trill!\n");
    let body = tunes(&ast)[0].body.as_ref().unwrap();
    let items: Vec<&MusicItem> = body.systems.iter().flat_map(|s| s.items.iter()).collect();
    assert!(items.iter().any(|i| matches!(i, MusicItem::LyricLine(_))));
    assert!(items.iter().any(|i| matches!(i, MusicItem::SymbolLine(_))));
}

#[test]
fn test_chord_symbol_vs_annotation() {
    let ast = parse("X:1\nK:C\n\"Am7\"C \"some words\"D|\n");
    let system = first_system(&ast);
    fn flat(items: &[MusicItem]) -> Vec<&MusicItem> {
        items
            .iter()
            .flat_map(|i| match i {
                MusicItem::Beam(b) => flat(&b.items),
                other => vec![other],
            })
            .collect()
    }
    let items = flat(&system.items);
    assert!(items.iter().any(|i| matches!(i, MusicItem::ChordSymbol(_))));
    assert!(items.iter().any(|i| matches!(i, MusicItem::Annotation(_))));
}

#[test]
fn test_user_symbol_invocation() {
    let ast = parse("X:1\nU:T = !trill!\nK:C\nTC|\n");
    let system = first_system(&ast);
    fn flat(items: &[MusicItem]) -> Vec<&MusicItem> {
        items
            .iter()
            .flat_map(|i| match i {
                MusicItem::Beam(b) => flat(&b.items),
                other => vec![other],
            })
            .collect()
    }
    assert!(flat(&system.items)
        .iter()
        .any(|i| matches!(i, MusicItem::UserSymbolInvocation(_))));
}

#[test]
fn test_macro_invocation() {
    let ast = parse("X:1\nm:n = GG\nK:C\nnC|\n");
    let tune = tunes(&ast)[0];
    assert!(tune
        .header
        .items
        .iter()
        .any(|i| matches!(i, HeaderItem::MacroDecl(_))));
    let system = first_system(&ast);
    assert!(system
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::MacroInvocation(_))));
}

#[test]
fn test_directive_values() {
    let ast = parse("%%MIDI program=1\nX:1\nK:C\nC|\n");
    let header = ast.file_header.as_ref().unwrap();
    let directive = header
        .items
        .iter()
        .find_map(|i| match i {
            HeaderItem::Directive(d) => Some(d),
            _ => None,
        })
        .unwrap();
    assert_eq!(directive.name_str(), Some("MIDI"));
    assert!(directive
        .values
        .iter()
        .any(|v| matches!(v, ValueExpr::KV(_))));
}

#[test]
fn test_begintext_directive() {
    let ast = parse("%%begintext\nsome prose\n%%endtext\nX:1\nK:C\nC|\n");
    let header = ast.file_header.as_ref().unwrap();
    let directive = header
        .items
        .iter()
        .find_map(|i| match i {
            HeaderItem::Directive(d) => Some(d),
            _ => None,
        })
        .unwrap();
    assert_eq!(directive.name_str(), Some("begintext"));
    assert!(directive
        .tail
        .iter()
        .any(|t| t.kind == TokenKind::FREE_TXT));
    assert!(directive.tail.iter().any(|t| t.lexeme == "endtext"));
}

#[test]
fn test_info_line_values_prefer_structure() {
    let ast = parse("X:1\nQ:1/4=120\nK:C\nC|\n");
    let tune = tunes(&ast)[0];
    let tempo = tune
        .header
        .items
        .iter()
        .find_map(|i| match i {
            HeaderItem::InfoLine(l) if l.header_letter() == Some('Q') => Some(l),
            _ => None,
        })
        .unwrap();
    let values = tempo.values.as_ref().unwrap();
    assert!(values.iter().any(|v| matches!(v, ValueExpr::KV(_))));
    // The flat list survives alongside.
    assert_eq!(tempo.text(), "1/4=120");
}

#[test]
fn test_voice_overlay_and_y_spacer() {
    let ast = parse("X:1\nK:C\nC&D y2|\n");
    let system = first_system(&ast);
    assert!(system
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::VoiceOverlay(_))));
    let spacer = system
        .items
        .iter()
        .find_map(|i| match i {
            MusicItem::YSpacer(y) => Some(y),
            _ => None,
        })
        .unwrap();
    assert!(spacer.rhythm.is_some());
}

#[test]
fn test_source_reproduction() {
    use reel_ast::TokenWalk;

    let sources = [
        "X:1\nK:C\nCDEF|\n",
        "garbage\n\nX:1\nT:T\nK:C\n\"Am\"C .D {a}b (3cde z2 Z4|]\nw:la-la_\n",
        "%%pagewidth 21cm\nX:1\nK:G#m clef=treble\nC[M:3/4]D&y2|1 C:|2 D||\n",
    ];
    for source in sources {
        let ast = parse(source);
        assert_eq!(ast.source(), source, "source mismatch for {:?}", source);
    }
}
