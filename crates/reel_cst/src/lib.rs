//! Concrete syntax tree for ABC notation.
//!
//! The CST is a homogeneous child/sibling tree: every node carries a tag,
//! a stable id, an optional token (leaves), a first-child link, and a
//! next-sibling link. It owns every token of the source, including
//! whitespace and delimiters, so printing an unedited tree reproduces its
//! source byte-for-byte.
//!
//! `from_ast` and `to_ast` convert between the parser's AST and the CST;
//! `to_ast(from_ast(a))` is structurally the identity. Edit transforms
//! splice the sibling chains in place through the primitives on
//! [`CsNode`].

mod from_ast;
mod node;
mod print;
mod to_ast;

pub use from_ast::{from_ast, from_music_item, from_note};
pub use node::{Children, CsNode};
pub use print::print_cst;
pub use to_ast::to_ast;
