//! Example: chord sorting and spacing rules
//!
//! Run with: cargo run -p reel_formatter --example format_tune

use reel_formatter::{format_source, FormatOptions};

fn main() {
    // Chords typed in whatever order the arranger reached the notes, bar
    // lines glued to the music, uneven header spacing.
    let draft = "X:7\nT : Harbour Waltz\nM:3/4\nL:1/4\nK:F\n\"F\"[caf]A B|[gec]2 c|\nw:out  on the\n";

    let defaults = FormatOptions::default();
    let keep_chord_order = FormatOptions {
        verbatim: false,
        no_format: true,
    };

    // Default formatting sorts each chord by ascending pitch and puts one
    // space between music and bar lines; the prefix annotation travels
    // with its note.
    println!("formatted:");
    print!("{}", format_source(draft, &defaults));

    // no_format applies the spacing rules but leaves chords as typed.
    println!();
    println!("chords as typed:");
    print!("{}", format_source(draft, &keep_chord_order));

    // Formatting is idempotent: a second pass changes nothing.
    let once = format_source(draft, &defaults);
    let twice = format_source(&once, &defaults);
    assert_eq!(once, twice);

    // And the verbatim printer is the round-trip check: whatever the
    // scanner consumed comes back byte-for-byte.
    let verbatim = format_source(draft, &FormatOptions::passthrough());
    assert_eq!(verbatim, draft);
}
