use reel_scanner::scan;
use reel_syntax::{ParseContext, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut ctx = ParseContext::new();
    scan(source, &mut ctx).into_iter().map(|t| t.kind).collect()
}

fn kinds_with_text(source: &str) -> Vec<(TokenKind, String)> {
    let mut ctx = ParseContext::new();
    scan(source, &mut ctx)
        .into_iter()
        .map(|t| (t.kind, t.lexeme))
        .collect()
}

fn joined(source: &str) -> String {
    let mut ctx = ParseContext::new();
    scan(source, &mut ctx).iter().map(|t| t.lexeme.as_str()).collect()
}

use TokenKind::*;

#[test]
fn test_empty_input() {
    assert_eq!(kinds(""), vec![EOF]);
}

#[test]
fn test_minimal_tune() {
    assert_eq!(
        kinds("X:1\nK:C\nC|\n"),
        vec![
            INF_HDR, NUMBER, EOL, INF_HDR, KEY_ROOT, EOL, NOTE_LETTER, BARLINE, EOL, EOF
        ]
    );
}

#[test]
fn test_lexemes_concat_to_source() {
    let sources = [
        "",
        "X:1\nK:C\nCDEF|\n",
        "X:1\nT:A Tune\nM:4/4\nL:1/8\nK:G\n|:GABc d2e2:|\nw:la la la\n",
        "free text before\n\nX:2\nK:Am\n[CEG]2 {/ab}c (3def z2|]\n",
        "X:1\nK:C\n\"Am\"C .D !trill!E ~F|\n%%MIDI program 1\n",
        "garbage @@##\nX:1\nK:C\nC@@@D|\n",
        "X:1\nK:C\nC\\\nD|\n",
        "X:1\nK:D\nd2>d \"G\"B-B|1 A :|2 G ||\n",
    ];
    for source in sources {
        assert_eq!(joined(source), source, "lexeme concat mismatch for {:?}", source);
    }
}

#[test]
fn test_header_with_spaces_before_colon() {
    let tokens = kinds_with_text("X:1\nT :Spaced\nK:C\nC|\n");
    assert!(tokens.iter().any(|(k, s)| *k == INF_HDR && s == "T :"));
}

#[test]
fn test_text_headers_capture_info_str() {
    let tokens = kinds_with_text("X:1\nT:The Title\nK:C\nC|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == INFO_STR && s == "The Title"));
}

#[test]
fn test_key_line_tokens() {
    let tokens = kinds_with_text("X:1\nK:G#m\nG|\n");
    assert!(tokens.iter().any(|(k, s)| *k == KEY_ROOT && s == "G"));
    assert!(tokens.iter().any(|(k, s)| *k == KEY_ACCIDENTAL && s == "#"));
    assert!(tokens.iter().any(|(k, s)| *k == KEY_MODE && s == "m"));
}

#[test]
fn test_key_flat_and_mode_word() {
    let tokens = kinds_with_text("X:1\nK:Eb dorian\nE|\n");
    assert!(tokens.iter().any(|(k, s)| *k == KEY_ROOT && s == "E"));
    assert!(tokens.iter().any(|(k, s)| *k == KEY_ACCIDENTAL && s == "b"));
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == KEY_MODE && s == "dorian"));
}

#[test]
fn test_key_explicit_accidentals_and_none() {
    let tokens = kinds_with_text("X:1\nK:D ^f =c\nD|\n");
    assert!(tokens.iter().any(|(k, s)| *k == KEY_EXPLICIT_ACC && s == "^f"));
    assert!(tokens.iter().any(|(k, s)| *k == KEY_EXPLICIT_ACC && s == "=c"));

    let tokens = kinds_with_text("X:1\nK:none\nC|\n");
    assert!(tokens.iter().any(|(k, _)| *k == KEY_NONE));
}

#[test]
fn test_clef_assignment_is_not_explicit_accidental() {
    let tokens = kinds_with_text("X:1\nK:C clef=f\nC|\n");
    assert!(tokens.iter().any(|(k, s)| *k == IDENTIFIER && s == "clef"));
    assert!(tokens.iter().any(|(k, _)| *k == EQL));
    assert!(!tokens.iter().any(|(k, _)| *k == KEY_EXPLICIT_ACC));
}

#[test]
fn test_voice_header() {
    let tokens = kinds_with_text("X:1\nV:T1 clef=treble name=\"Tenor\"\nK:C\nC|\n");
    assert!(tokens.iter().any(|(k, s)| *k == VOICE && s == "T1"));
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == ANNOTATION && s == "\"Tenor\""));
}

#[test]
fn test_meter_special_literals() {
    let tokens = kinds_with_text("X:1\nM:C\nK:C\nC|\n");
    assert!(tokens.iter().any(|(k, s)| *k == SPECIAL_LITERAL && s == "C"));

    let tokens = kinds_with_text("X:1\nM:C|\nK:C\nC|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == SPECIAL_LITERAL && s == "C|"));
}

#[test]
fn test_meter_fraction() {
    let tokens = kinds("X:1\nM:6/8\nK:C\nC|\n");
    let m = tokens
        .windows(3)
        .any(|w| w == [NUMBER, SLASH, NUMBER]);
    assert!(m, "expected NUMBER SLASH NUMBER in {:?}", tokens);
}

#[test]
fn test_pitch_with_accidental_and_octave() {
    assert_eq!(
        kinds("X:1\nK:C\n^c''2|\n"),
        vec![
            INF_HDR, NUMBER, EOL, INF_HDR, KEY_ROOT, EOL, ACCIDENTAL, NOTE_LETTER, OCTAVE,
            RHY_NUMER, BARLINE, EOL, EOF
        ]
    );
}

#[test]
fn test_double_accidentals() {
    let tokens = kinds_with_text("X:1\nK:C\n^^C __D =E|\n");
    assert!(tokens.iter().any(|(k, s)| *k == ACCIDENTAL && s == "^^"));
    assert!(tokens.iter().any(|(k, s)| *k == ACCIDENTAL && s == "__"));
    assert!(tokens.iter().any(|(k, s)| *k == ACCIDENTAL && s == "="));
}

#[test]
fn test_rhythm_forms() {
    // a2, a/, a3/2, a//, a2>
    let tokens = kinds_with_text("X:1\nK:C\na2 b/ c3/2 d// e2>f|\n");
    assert!(tokens.iter().any(|(k, s)| *k == RHY_NUMER && s == "2"));
    assert!(tokens.iter().any(|(k, s)| *k == RHY_SEP && s == "/"));
    assert!(tokens.iter().any(|(k, s)| *k == RHY_SEP && s == "//"));
    assert!(tokens.iter().any(|(k, s)| *k == RHY_DENOM && s == "2"));
    assert!(tokens.iter().any(|(k, s)| *k == RHY_BRKN && s == ">"));
}

#[test]
fn test_tie_in_music_mode() {
    let tokens = kinds("X:1\nK:C\nC-C|\n");
    assert!(tokens.contains(&TIE));
}

#[test]
fn test_hyphen_in_lyric_mode() {
    let tokens = kinds("X:1\nK:C\nCC|\nw:hel-lo\n");
    assert!(tokens.contains(&LY_HYPH));
    assert!(!tokens.contains(&TIE));
}

#[test]
fn test_lyric_line_tokens() {
    let tokens = kinds_with_text("X:1\nK:C\nCCCC|\nw:time_ to go* a~way\n");
    assert!(tokens.iter().any(|(k, _)| *k == LY_UNDR));
    assert!(tokens.iter().any(|(k, _)| *k == LY_STAR));
    assert!(tokens.iter().any(|(k, _)| *k == LY_SPS));
    assert!(tokens.iter().any(|(k, s)| *k == LY_TXT && s == "time"));
}

#[test]
fn test_lyric_verse_label() {
    let tokens = kinds_with_text("X:1\nK:C\nCC|\nw:1. first verse\n");
    assert!(tokens.iter().any(|(k, s)| *k == LY_SECT_HDR && s == "1."));
}

#[test]
fn test_symbol_line_tokens() {
    let tokens = kinds_with_text("X:1\nK:C\nCDEF|\ns:* !trill! * *\n");
    assert!(tokens.iter().any(|(k, _)| *k == SY_HDR));
    assert_eq!(tokens.iter().filter(|(k, _)| *k == SY_STAR).count(), 3);
    assert!(tokens.iter().any(|(k, s)| *k == SY_TXT && s == "!trill!"));
}

#[test]
fn test_slur_vs_tuplet() {
    let tokens = kinds("X:1\nK:C\n(CDE)|\n");
    assert_eq!(tokens.iter().filter(|k| **k == SLUR).count(), 2);

    let tokens = kinds_with_text("X:1\nK:C\n(3CDE|\n");
    assert!(tokens.iter().any(|(k, s)| *k == TUPLET_LPAREN && s == "("));
    assert!(tokens.iter().any(|(k, s)| *k == TUPLET_P && s == "3"));
}

#[test]
fn test_tuplet_with_q_and_r() {
    let tokens = kinds_with_text("X:1\nK:C\n(3:2:4CDEF|\n");
    assert!(tokens.iter().any(|(k, s)| *k == TUPLET_P && s == "3"));
    assert!(tokens.iter().any(|(k, s)| *k == TUPLET_Q && s == "2"));
    assert!(tokens.iter().any(|(k, s)| *k == TUPLET_R && s == "4"));
    assert_eq!(tokens.iter().filter(|(k, _)| *k == TUPLET_COLON).count(), 2);
}

#[test]
fn test_chord_brackets() {
    assert_eq!(
        kinds("X:1\nK:C\n[CEG]2|\n"),
        vec![
            INF_HDR, NUMBER, EOL, INF_HDR, KEY_ROOT, EOL, CHRD_LEFT_BRKT, NOTE_LETTER,
            NOTE_LETTER, NOTE_LETTER, CHRD_RIGHT_BRKT, RHY_NUMER, BARLINE, EOL, EOF
        ]
    );
}

#[test]
fn test_inline_field() {
    assert_eq!(
        kinds("X:1\nK:C\nC[K:G]G|\n"),
        vec![
            INF_HDR, NUMBER, EOL, INF_HDR, KEY_ROOT, EOL, NOTE_LETTER, INLN_FLD_LFT_BRKT,
            INF_HDR, KEY_ROOT, INLN_FLD_RGT_BRKT, NOTE_LETTER, BARLINE, EOL, EOF
        ]
    );
}

#[test]
fn test_inline_meter_field() {
    let tokens = kinds("X:1\nK:C\nC[M:3/4]D|\n");
    assert!(tokens.contains(&INLN_FLD_LFT_BRKT));
    assert!(tokens.contains(&INLN_FLD_RGT_BRKT));
    let m = tokens.windows(3).any(|w| w == [NUMBER, SLASH, NUMBER]);
    assert!(m);
}

#[test]
fn test_grace_group_with_acciaccatura() {
    assert_eq!(
        kinds("X:1\nK:C\n{/ab}c|\n"),
        vec![
            INF_HDR, NUMBER, EOL, INF_HDR, KEY_ROOT, EOL, GRC_GRP_LEFT_BRACE, GRC_GRP_SLSH,
            NOTE_LETTER, NOTE_LETTER, GRC_GRP_RGHT_BRACE, NOTE_LETTER, BARLINE, EOL, EOF
        ]
    );
}

#[test]
fn test_barline_variants() {
    for (src, lexeme) in [
        ("X:1\nK:C\nC|D|\n", "|"),
        ("X:1\nK:C\nC||D|\n", "||"),
        ("X:1\nK:C\nC|]\n", "|]"),
        ("X:1\nK:C\nC|:D|\n", "|:"),
        ("X:1\nK:C\nC:|D|\n", ":|"),
        ("X:1\nK:C\nC::D|\n", "::"),
        ("X:1\nK:C\n[|CD|\n", "[|"),
    ] {
        let tokens = kinds_with_text(src);
        assert!(
            tokens.iter().any(|(k, s)| *k == BARLINE && s == lexeme),
            "expected barline {:?} in {:?}",
            lexeme,
            tokens
        );
    }
}

#[test]
fn test_repeat_numbers() {
    let tokens = kinds_with_text("X:1\nK:C\nC|1 D :|2 E||\n");
    assert!(tokens.iter().any(|(k, s)| *k == REPEAT_NUMBER && s == "1"));
    assert!(tokens.iter().any(|(k, s)| *k == REPEAT_NUMBER && s == "2"));
}

#[test]
fn test_volta_bracket() {
    let tokens = kinds_with_text("X:1\nK:C\nC[1,2-3x D|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == REPEAT_NUMBER && s == "1,2-3x"));
}

#[test]
fn test_decorations_and_symbols() {
    let tokens = kinds_with_text("X:1\nK:C\n.C ~D !trill!E +fermata+F uG vA|\n");
    assert!(tokens.iter().any(|(k, s)| *k == DECORATION && s == "."));
    assert!(tokens.iter().any(|(k, s)| *k == DECORATION && s == "~"));
    assert!(tokens.iter().any(|(k, s)| *k == DECORATION && s == "u"));
    assert!(tokens.iter().any(|(k, s)| *k == DECORATION && s == "v"));
    assert!(tokens.iter().any(|(k, s)| *k == SYMBOL && s == "!trill!"));
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == SYMBOL && s == "+fermata+"));
}

#[test]
fn test_rests() {
    let tokens = kinds_with_text("X:1\nK:C\nz2 Z4 x X|\n");
    assert_eq!(tokens.iter().filter(|(k, _)| *k == REST).count(), 4);
}

#[test]
fn test_voice_overlay_and_y_spacer() {
    let tokens = kinds("X:1\nK:C\nC&D y2|\n");
    assert!(tokens.contains(&VOICE_OVRLAY));
    assert!(tokens.contains(&Y_SPC));
}

#[test]
fn test_line_continuation() {
    let tokens = kinds_with_text("X:1\nK:C\nCD\\\nEF|\n");
    assert!(tokens.iter().any(|(k, s)| *k == LINE_CONT && s == "\\\n"));
}

#[test]
fn test_section_break_separates_tunes() {
    let tokens = kinds("X:1\nK:C\nC|\n\nX:2\nK:D\nD|\n");
    assert_eq!(tokens.iter().filter(|k| **k == SCT_BRK).count(), 1);
    assert_eq!(tokens.iter().filter(|k| **k == INF_HDR).count(), 4);
}

#[test]
fn test_file_header_and_free_text() {
    let tokens = kinds_with_text("T:Collection\nsome stray prose\n\nX:1\nK:C\nC|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == FREE_TXT && s == "some stray prose"));
    assert!(tokens.iter().any(|(k, s)| *k == INFO_STR && s == "Collection"));
}

#[test]
fn test_comment_everywhere() {
    let tokens = kinds_with_text("% file comment\nX:1\nK:C\nC| % bar one\n");
    assert_eq!(tokens.iter().filter(|(k, _)| *k == COMMENT).count(), 2);
}

#[test]
fn test_directive_with_values() {
    let tokens = kinds_with_text("%%pagewidth 21cm\nX:1\nK:C\nC|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == STYLESHEET_DIRECTIVE && s == "%%"));
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == IDENTIFIER && s == "pagewidth"));
    assert!(tokens.iter().any(|(k, s)| *k == NUMBER && s == "21"));
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == MEASUREMENT_UNIT && s == "cm"));
}

#[test]
fn test_directive_identifier_keeps_hyphen() {
    let tokens = kinds_with_text("%%clef treble-8\nX:1\nK:C\nC|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == IDENTIFIER && s == "treble-8"));
}

#[test]
fn test_info_line_splits_hyphenated_word() {
    // In info-line values the same spelling is three tokens.
    let tokens = kinds_with_text("X:1\nQ:treble-8\nK:C\nC|\n");
    assert!(tokens.iter().any(|(k, s)| *k == IDENTIFIER && s == "treble"));
    assert!(tokens.iter().any(|(k, _)| *k == MINUS));
    assert!(tokens.iter().any(|(k, s)| *k == NUMBER && s == "8"));
}

#[test]
fn test_directive_free_text() {
    let tokens = kinds_with_text("%%text hello world\nX:1\nK:C\nC|\n");
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == FREE_TXT && s == " hello world"));
}

#[test]
fn test_begintext_block() {
    let src = "%%begintext\nline one\nline two\n%%endtext\nX:1\nK:C\nC|\n";
    let tokens = kinds_with_text(src);
    assert!(tokens
        .iter()
        .any(|(k, s)| *k == FREE_TXT && s == "\nline one\nline two\n"));
    assert!(tokens.iter().any(|(k, s)| *k == IDENTIFIER && s == "endtext"));
    assert_eq!(joined(src), src);
}

#[test]
fn test_invalid_run_recovers_at_known_points() {
    let tokens = kinds_with_text("X:1\nK:C\nC@#$ D|\n");
    assert!(tokens.iter().any(|(k, s)| *k == INVALID && s == "@#$"));
    // Scanning continued normally after the run.
    assert!(tokens.iter().any(|(k, s)| *k == NOTE_LETTER && s == "D"));
}

#[test]
fn test_invalid_reports_issue() {
    let mut ctx = ParseContext::new();
    scan("X:1\nK:C\nC@@@|\n", &mut ctx);
    assert!(ctx.has_issues());
}

#[test]
fn test_unterminated_annotation_is_invalid() {
    let tokens = kinds("X:1\nK:C\n\"oops\nC|\n");
    assert!(tokens.contains(&INVALID));
}

#[test]
fn test_token_positions() {
    let mut ctx = ParseContext::new();
    let tokens = scan("X:1\nK:C\nC D|\n", &mut ctx);
    let note = tokens
        .iter()
        .find(|t| t.kind == NOTE_LETTER && t.lexeme == "D")
        .unwrap();
    assert_eq!(note.line, 2);
    assert_eq!(note.column, 2);
}

#[test]
fn test_token_ids_unique() {
    let mut ctx = ParseContext::new();
    let tokens = scan("X:1\nK:C\nCDEF|\n", &mut ctx);
    let mut ids: Vec<u32> = tokens.iter().map(|t| t.id).collect();
    let before = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), before);
}
