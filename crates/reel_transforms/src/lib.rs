//! Structural edit transforms over the CST.
//!
//! All transforms mutate the tree in place through the sibling-splicing
//! primitives of `reel_cst`, drawing ids for new nodes from the parse
//! context. The formatter reprints edited regions with minimal spacing;
//! untouched regions round-trip verbatim.

mod build;
mod harmonize;
mod pitch;
mod rhythm;
mod selection;
mod transpose;
mod voice;

pub use harmonize::harmonize;
pub use pitch::{midi_to_pitch, pitch_to_midi, step_diatonic, PitchParts};
pub use rhythm::{scale_rhythm, ScaleFactor};
pub use selection::{Cursor, Position, Range, Selection};
pub use transpose::transpose;
pub use voice::insert_voice_line;
