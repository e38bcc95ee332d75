use reel_ast::*;
use reel_diagnostics::Origin;
use reel_parser::parse_source;
use reel_syntax::ParseContext;

fn parse_with_issues(source: &str) -> (FileStructure, Vec<reel_diagnostics::Issue>) {
    let mut ctx = ParseContext::new();
    let ast = parse_source(source, &mut ctx);
    (ast, ctx.into_issues().into_issues())
}

fn first_system(ast: &FileStructure) -> &System {
    let tune = ast
        .items
        .iter()
        .find_map(|i| match i {
            FileItem::Tune(t) => Some(t),
            _ => None,
        })
        .unwrap();
    &tune.body.as_ref().unwrap().systems[0]
}

fn error_exprs(system: &System) -> Vec<&ErrorExpr> {
    system
        .items
        .iter()
        .filter_map(|i| match i {
            MusicItem::ErrorExpr(e) => Some(e),
            _ => None,
        })
        .collect()
}

#[test]
fn test_invalid_run_becomes_error_expr() {
    let (ast, issues) = parse_with_issues("X:1\nK:C\nC@#$ D|\n");
    let system = first_system(&ast);

    let errors = error_exprs(system);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].tokens[0].lexeme, "@#$");
    assert!(issues.iter().any(|i| i.origin == Origin::Scanner));

    // Parsing resumed: the D after the run is a note.
    fn has_note(items: &[MusicItem], letter: &str) -> bool {
        items.iter().any(|i| match i {
            MusicItem::Note(n) => n.pitch.letter.lexeme == letter,
            MusicItem::Beam(b) => has_note(&b.items, letter),
            _ => false,
        })
    }
    assert!(has_note(&system.items, "D"));
}

#[test]
fn test_error_expr_tokens_reproduce_typing() {
    use reel_ast::TokenWalk;

    let source = "X:1\nK:C\nC@@@|\n";
    let (ast, _) = parse_with_issues(source);
    assert_eq!(ast.source(), source);
}

#[test]
fn test_unclosed_chord() {
    let (ast, issues) = parse_with_issues("X:1\nK:C\n[CEG\nD|\n");
    let tune = match &ast.items[0] {
        FileItem::Tune(t) => t,
        other => panic!("expected tune, got {:?}", other),
    };
    let body = tune.body.as_ref().unwrap();
    fn find_chord(items: &[MusicItem]) -> Option<&Chord> {
        items.iter().find_map(|i| match i {
            MusicItem::Chord(c) => Some(c),
            MusicItem::Beam(b) => find_chord(&b.items),
            _ => None,
        })
    }
    let chord = body.systems.iter().find_map(|s| find_chord(&s.items)).unwrap();
    assert!(chord.right_bracket.is_none());
    assert_eq!(chord.notes().count(), 3);
    assert!(issues
        .iter()
        .any(|i| i.origin == Origin::Parser && i.message.contains("unclosed chord")));
}

#[test]
fn test_unclosed_grace_group() {
    let (_, issues) = parse_with_issues("X:1\nK:C\n{ab\nC|\n");
    assert!(issues
        .iter()
        .any(|i| i.message.contains("unclosed grace group")));
}

#[test]
fn test_lone_accidental() {
    let (ast, issues) = parse_with_issues("X:1\nK:C\n^ C|\n");
    let system = first_system(&ast);
    assert_eq!(error_exprs(system).len(), 1);
    assert!(issues.iter().any(|i| i.origin == Origin::Parser));
}

#[test]
fn test_stray_right_bracket() {
    let (ast, _) = parse_with_issues("X:1\nK:C\nC] D|\n");
    let system = first_system(&ast);
    let errors = error_exprs(system);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].tokens[0].lexeme, "]");
}

#[test]
fn test_unterminated_annotation() {
    let (ast, issues) = parse_with_issues("X:1\nK:C\n\"oops\nC|\n");
    assert!(issues.iter().any(|i| i.origin == Origin::Scanner));
    use reel_ast::TokenWalk;
    assert_eq!(ast.source(), "X:1\nK:C\n\"oops\nC|\n");
}

#[test]
fn test_bad_field_value_keeps_flat_tokens() {
    let (ast, issues) = parse_with_issues("X:1\nQ:$$$\nK:C\nC|\n");
    let tune = match &ast.items[0] {
        FileItem::Tune(t) => t,
        _ => panic!(),
    };
    let tempo = tune
        .header
        .items
        .iter()
        .find_map(|i| match i {
            HeaderItem::InfoLine(l) if l.header_letter() == Some('Q') => Some(l),
            _ => None,
        })
        .unwrap();
    assert!(tempo.values.is_none());
    assert!(!tempo.tokens.is_empty());
    assert!(issues.iter().any(|i| i.origin == Origin::Analyzer));
}

#[test]
fn test_recovery_at_barline() {
    let (ast, _) = parse_with_issues("X:1\nK:C\n@@|CDE|\n");
    let system = first_system(&ast);
    // The run stops at the bar; music after it parses normally.
    assert!(system
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::BarLine(_))));
    assert!(system
        .items
        .iter()
        .any(|i| matches!(i, MusicItem::Beam(_))));
}

#[test]
fn test_errors_never_abort() {
    // A pile of malformed input still yields a tree and issues, not a
    // panic.
    let sources = [
        "X:\nK:\n@@@@\n",
        "X:1\nK:C\n[[[\n",
        "X:1\nK:C\n)))---(((\n",
        "]\n",
        "X:1\nK:C\n\u{1F3B5}\n",
    ];
    for source in sources {
        let (ast, _) = parse_with_issues(source);
        use reel_ast::TokenWalk;
        assert_eq!(ast.source(), source, "lossless even on {:?}", source);
    }
}
