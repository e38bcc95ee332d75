//! Verbatim CST printing.

use crate::CsNode;

/// Prints a CST back to source text by emitting every token's lexeme in
/// child order. An unedited tree reproduces its source byte-for-byte.
pub fn print_cst(root: &CsNode) -> String {
    let mut out = String::new();
    print_node(root, &mut out);
    out
}

fn print_node(node: &CsNode, out: &mut String) {
    if let Some(token) = &node.token {
        out.push_str(&token.lexeme);
    }
    for child in node.children() {
        print_node(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_syntax::{NodeTag, Token, TokenKind};

    #[test]
    fn test_print_leaf() {
        let node = CsNode::leaf(Token::new(TokenKind::NOTE_LETTER, "C", 0, 0, 1));
        assert_eq!(print_cst(&node), "C");
    }

    #[test]
    fn test_print_nested() {
        let acc = CsNode::leaf(Token::new(TokenKind::ACCIDENTAL, "^", 0, 0, 1));
        let letter = CsNode::leaf(Token::new(TokenKind::NOTE_LETTER, "C", 0, 1, 2));
        let pitch = CsNode::with_children(NodeTag::Pitch, 3, vec![acc, letter]);
        let note = CsNode::with_children(NodeTag::Note, 4, vec![pitch]);
        assert_eq!(print_cst(&note), "^C");
    }
}
