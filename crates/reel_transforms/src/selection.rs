//! Selections, cursors, and source ranges.

use std::collections::HashSet;

use reel_cst::CsNode;

/// A set of node ids an editor cursor covers.
pub type Cursor = HashSet<u32>;

/// A (line, character) position, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open span of source positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// True when the given token position falls inside this range.
    pub fn contains(&self, line: u32, column: u32) -> bool {
        let pos = Position::new(line, column);
        self.start <= pos && pos <= self.end
    }
}

/// A CST root together with the cursors a transform applies to.
pub struct Selection<'a> {
    pub root: &'a mut CsNode,
    pub cursors: Vec<Cursor>,
}

impl<'a> Selection<'a> {
    /// Creates a selection over the given root.
    pub fn new(root: &'a mut CsNode, cursors: Vec<Cursor>) -> Self {
        Self { root, cursors }
    }

    /// Creates a selection with a single cursor of node ids.
    pub fn of_ids(root: &'a mut CsNode, ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            root,
            cursors: vec![ids.into_iter().collect()],
        }
    }
}

/// True when the node's own id is named by any cursor.
pub(crate) fn directly_selected(node: &CsNode, cursors: &[Cursor]) -> bool {
    cursors.iter().any(|c| c.contains(&node.id))
}

/// True when the node or any of its descendants is named by a cursor; an
/// editor selecting a note's letter token selects the note.
pub(crate) fn hits(node: &CsNode, cursors: &[Cursor]) -> bool {
    if directly_selected(node, cursors) {
        return true;
    }
    node.ids().iter().any(|id| cursors.iter().any(|c| c.contains(id)))
}
