//! Markup-aware matching and splitting.
//!
//! Wikitext constructs nest and overlap freely and may span lines, so a
//! plain regex will happily match inside a comment or split a template in
//! half. Every operation here runs the pattern over the whole text and
//! then filters the matches through a single-pass automaton that knows
//! which constructs are open at each byte offset.
//!
//! ```
//! use regex::Regex;
//! use wiktparse_lib::scanner::{scan, ScanOptions};
//!
//! let pattern = Regex::new("dog").unwrap();
//! let text = "dog {{ux|en|dog}} <!-- dog --> dog";
//! let starts: Vec<_> = scan(&pattern, text, &ScanOptions::default()).map(|m| m.start()).collect();
//! assert_eq!(starts, vec![0, 31]);
//! ```

mod automaton;
mod lines;
mod ops;
mod state;
mod templates;

pub use lines::{WikiLines, Wikiline, split_lines};
pub use ops::{PatternError, Replacement, ScopedMatches, compile, replace, replace_regex, scan, split};
pub use state::{
    Exclusive, ExclusiveKind, LinkPart, Nested, OpenLink, OpenTemplate, ScanOptions, ScanState, TemplateMatch,
};
pub use templates::{TemplateCall, templates};
