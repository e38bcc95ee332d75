//! Diagnostic types for the reel ABC toolchain.
//!
//! Every pipeline stage (scanner, parser, analyzer, interpreter) pushes
//! structured issue records into a shared reporter; no stage ever aborts.
//!
//! # Example
//!
//! ```
//! use reel_diagnostics::{Issue, IssueBag, Origin, Reporter};
//!
//! let mut bag = IssueBag::new();
//! bag.report(Issue::scanner("unexpected byte", 0, 4).with_lexeme("@"));
//!
//! assert!(bag.has_issues());
//! assert_eq!(bag.iter().next().unwrap().origin, Origin::Scanner);
//! ```

mod issue;
mod sink;

pub use issue::{Issue, Origin};
pub use sink::{IssueBag, Reporter};
