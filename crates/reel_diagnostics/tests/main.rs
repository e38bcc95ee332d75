use reel_diagnostics::*;

#[test]
fn test_origin_display() {
    assert_eq!(Origin::Scanner.as_str(), "scanner");
    assert_eq!(Origin::Parser.as_str(), "parser");
    assert_eq!(Origin::Analyzer.as_str(), "analyzer");
    assert_eq!(Origin::Interpreter.as_str(), "interpreter");
}

#[test]
fn test_issue_creation() {
    let issue = Issue::parser("expected a note", 3, 14);
    assert_eq!(issue.origin, Origin::Parser);
    assert_eq!(issue.message, "expected a note");
    assert_eq!(issue.line, 3);
    assert_eq!(issue.column, 14);
    assert!(issue.lexeme.is_none());
}

#[test]
fn test_issue_with_lexeme() {
    let issue = Issue::scanner("unrecognized input", 0, 0).with_lexeme("@#$");
    assert_eq!(issue.lexeme.as_deref(), Some("@#$"));
}

#[test]
fn test_display_positions_are_one_based() {
    let issue = Issue::analyzer("bad value", 0, 0);
    assert_eq!(issue.line_display(), 1);
    assert_eq!(issue.column_display(), 1);
    assert_eq!(issue.to_string(), "analyzer:1:1: bad value");
}

#[test]
fn test_bag_collects_in_order() {
    let mut bag = IssueBag::new();
    bag.report(Issue::scanner("first", 0, 0));
    bag.report(Issue::parser("second", 1, 0));
    bag.report(Issue::interpreter("third", 2, 0));

    let messages: Vec<&str> = bag.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[test]
fn test_bag_filter_by_origin() {
    let mut bag = IssueBag::new();
    bag.report(Issue::scanner("a", 0, 0));
    bag.report(Issue::scanner("b", 0, 1));
    bag.report(Issue::parser("c", 0, 2));

    assert_eq!(bag.from_origin(Origin::Scanner).count(), 2);
    assert_eq!(bag.from_origin(Origin::Parser).count(), 1);
    assert_eq!(bag.from_origin(Origin::Analyzer).count(), 0);
}

#[test]
fn test_bag_into_iter() {
    let mut bag = IssueBag::new();
    bag.report(Issue::parser("one", 0, 0));

    let collected: Vec<Issue> = bag.into_iter().collect();
    assert_eq!(collected.len(), 1);
}

#[test]
fn test_bag_clear() {
    let mut bag = IssueBag::new();
    bag.report(Issue::parser("one", 0, 0));
    assert!(bag.has_issues());
    bag.clear();
    assert!(bag.is_empty());
}

#[test]
fn test_serde_roundtrip() {
    let issue = Issue::interpreter("field not valid here", 5, 2).with_lexeme("K:");
    let json = serde_json::to_string(&issue).unwrap();
    let back: Issue = serde_json::from_str(&json).unwrap();
    assert_eq!(back, issue);
}
