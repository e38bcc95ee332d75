//! Pitch arithmetic: chromatic (MIDI) and diatonic conversions.
//!
//! ABC pitch notation: uppercase letters sit in octave 4 (`C` is middle
//! C, MIDI 60), lowercase letters in octave 5; each `'` raises and each
//! `,` lowers by an octave. Accidentals `^ ^^ = _ __` alter by
//! semitones.

/// Semitone of each natural letter within an octave.
const NATURAL_SEMITONES: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// A decoded pitch: natural letter (uppercase), octave number, and the
/// accidental lexeme when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchParts {
    pub letter: char,
    pub octave: i32,
    pub accidental: Option<String>,
}

impl PitchParts {
    /// Decodes lexemes as the scanner produced them: a letter token and
    /// optional accidental/octave-mark tokens.
    pub fn from_lexemes(accidental: Option<&str>, letter: &str, octave_marks: Option<&str>) -> Option<Self> {
        let letter_char = letter.chars().next()?;
        let base_octave = if letter_char.is_ascii_lowercase() { 5 } else { 4 };
        let marks = octave_marks.map_or(0, |m| {
            m.chars()
                .map(|c| match c {
                    '\'' => 1,
                    ',' => -1,
                    _ => 0,
                })
                .sum::<i32>()
        });
        let upper = letter_char.to_ascii_uppercase();
        if !NATURAL_SEMITONES.iter().any(|(l, _)| *l == upper) {
            return None;
        }
        Some(Self {
            letter: upper,
            octave: base_octave + marks,
            accidental: accidental.map(|a| a.to_string()),
        })
    }

    /// Renders back to ABC lexemes: (letter lexeme, octave-mark lexeme).
    pub fn to_lexemes(&self) -> (String, Option<String>) {
        if self.octave >= 5 {
            let letter = self.letter.to_ascii_lowercase().to_string();
            let marks = self.octave - 5;
            let octave = if marks > 0 {
                Some("'".repeat(marks as usize))
            } else {
                None
            };
            (letter, octave)
        } else {
            let letter = self.letter.to_string();
            let marks = 4 - self.octave;
            let octave = if marks > 0 {
                Some(",".repeat(marks as usize))
            } else {
                None
            };
            (letter, octave)
        }
    }
}

/// Semitone offset of an accidental lexeme.
pub fn accidental_offset(accidental: &str) -> i32 {
    match accidental {
        "^" => 1,
        "^^" => 2,
        "_" => -1,
        "__" => -2,
        _ => 0,
    }
}

fn natural_semitone(letter: char) -> Option<i32> {
    NATURAL_SEMITONES
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, s)| *s)
}

fn natural_letter(semitone: i32) -> Option<char> {
    NATURAL_SEMITONES
        .iter()
        .find(|(_, s)| *s == semitone)
        .map(|(l, _)| *l)
}

/// Diatonic index of a letter: C=0 ... B=6.
pub fn diatonic_index(letter: char) -> Option<i32> {
    "CDEFGAB".find(letter.to_ascii_uppercase()).map(|i| i as i32)
}

fn diatonic_letter(index: i32) -> char {
    b"CDEFGAB"[index.rem_euclid(7) as usize] as char
}

/// Absolute chromatic pitch of decoded parts (C4 = 60).
pub fn pitch_to_midi(parts: &PitchParts) -> i32 {
    let semitone = natural_semitone(parts.letter).unwrap_or(0);
    let alter = parts.accidental.as_deref().map_or(0, accidental_offset);
    12 * (parts.octave + 1) + semitone + alter
}

/// Decodes a MIDI number back to pitch parts, preferring the natural
/// letter with minimal octave marks. When the previous accidental is
/// still compatible (the altered letter lands on a natural), it is kept;
/// otherwise a sharp names the black key.
pub fn midi_to_pitch(midi: i32, prefer_accidental: Option<&str>) -> PitchParts {
    let octave = midi.div_euclid(12) - 1;
    let pc = midi.rem_euclid(12);

    if let Some(acc) = prefer_accidental {
        let alter = accidental_offset(acc);
        let base = pc - alter;
        if (0..12).contains(&base) {
            if let Some(letter) = natural_letter(base) {
                return PitchParts {
                    letter,
                    octave,
                    accidental: Some(acc.to_string()),
                };
            }
        }
    }

    if let Some(letter) = natural_letter(pc) {
        return PitchParts {
            letter,
            octave,
            accidental: None,
        };
    }

    // A black key with no reusable accidental: sharp of the letter below.
    let letter = natural_letter(pc - 1).unwrap_or('C');
    PitchParts {
        letter,
        octave,
        accidental: Some("^".to_string()),
    }
}

/// Steps a pitch diatonically, preserving its alteration.
pub fn step_diatonic(parts: &PitchParts, steps: i32) -> PitchParts {
    let index = diatonic_index(parts.letter).unwrap_or(0);
    let absolute = parts.octave * 7 + index + steps;
    PitchParts {
        letter: diatonic_letter(absolute),
        octave: absolute.div_euclid(7),
        accidental: parts.accidental.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(letter: char, octave: i32) -> PitchParts {
        PitchParts {
            letter,
            octave,
            accidental: None,
        }
    }

    #[test]
    fn test_middle_c_is_60() {
        assert_eq!(pitch_to_midi(&parts('C', 4)), 60);
        assert_eq!(pitch_to_midi(&parts('C', 5)), 72);
        assert_eq!(pitch_to_midi(&parts('A', 4)), 69);
    }

    #[test]
    fn test_accidental_offsets() {
        let sharp = PitchParts {
            letter: 'C',
            octave: 4,
            accidental: Some("^".into()),
        };
        assert_eq!(pitch_to_midi(&sharp), 61);
        let double_flat = PitchParts {
            letter: 'D',
            octave: 4,
            accidental: Some("__".into()),
        };
        assert_eq!(pitch_to_midi(&double_flat), 60);
    }

    #[test]
    fn test_lexeme_roundtrip() {
        for (acc, letter, octave, rendered) in [
            (None, "C", None, ("C".to_string(), None)),
            (None, "c", Some("''"), ("c".to_string(), Some("''".to_string()))),
            (None, "C", Some(",,"), ("C".to_string(), Some(",,".to_string()))),
            (Some("^"), "f", None, ("f".to_string(), None)),
        ] {
            let parts = PitchParts::from_lexemes(acc, letter, octave).unwrap();
            assert_eq!(parts.to_lexemes(), rendered);
        }
    }

    #[test]
    fn test_midi_roundtrip_naturals() {
        for midi in [48, 60, 62, 64, 65, 67, 69, 71, 72, 84] {
            let parts = midi_to_pitch(midi, None);
            assert_eq!(pitch_to_midi(&parts), midi);
            assert!(parts.accidental.is_none());
        }
    }

    #[test]
    fn test_midi_black_keys_prefer_existing_accidental() {
        // 61 with a flat preference renders as _D, with none as ^C.
        let flat = midi_to_pitch(61, Some("_"));
        assert_eq!(flat.letter, 'D');
        assert_eq!(flat.accidental.as_deref(), Some("_"));

        let plain = midi_to_pitch(61, None);
        assert_eq!(plain.letter, 'C');
        assert_eq!(plain.accidental.as_deref(), Some("^"));
    }

    #[test]
    fn test_step_diatonic_inverse() {
        for steps in [-9, -2, 0, 1, 3, 8] {
            let start = parts('E', 4);
            let there = step_diatonic(&start, steps);
            let back = step_diatonic(&there, -steps);
            assert_eq!(back.letter, start.letter);
            assert_eq!(back.octave, start.octave);
            assert!((0..7).contains(&diatonic_index(there.letter).unwrap()));
        }
    }

    #[test]
    fn test_step_preserves_accidental() {
        let sharp = PitchParts {
            letter: 'C',
            octave: 4,
            accidental: Some("^".into()),
        };
        let stepped = step_diatonic(&sharp, 2);
        assert_eq!(stepped.letter, 'E');
        assert_eq!(stepped.accidental.as_deref(), Some("^"));
    }

    #[test]
    fn test_step_crosses_octaves() {
        let stepped = step_diatonic(&parts('A', 4), 2);
        assert_eq!(stepped.letter, 'C');
        assert_eq!(stepped.octave, 5);

        let down = step_diatonic(&parts('D', 4), -2);
        assert_eq!(down.letter, 'B');
        assert_eq!(down.octave, 3);
    }
}
