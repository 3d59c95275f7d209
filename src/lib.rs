//! Round-trippable parsing of Wiktionary page markup.
//!
//! - [`scanner`] finds, splits and replaces while skipping text inside
//!   comments, tags, templates, tables and links.
//! - [`sections`] builds the heading tree of a page and normalizes the
//!   whitespace and ordering rules between sections.
//! - [`pos`] splits a part-of-speech section into its definition list and
//!   types every list item.
//! - [`fix_coordinator`] ties these together into a page normalizer.
//!
//! ```
//! use wiktparse_lib::{parse, parse_pos};
//!
//! let text = "==English==\n\n===Noun===\n{{en-noun}}\n\n# [[tree]]\n";
//! let doc = parse(text, "tree", None).unwrap();
//! assert_eq!(doc.to_string(), text);
//!
//! let noun = doc.sections_titled(doc.root(), "Noun", true)[0];
//! let pos = parse_pos(&doc, noun, None);
//! assert_eq!(pos.senses.len(), 1);
//! ```

pub mod config;
pub mod diagnostics;
pub mod exit_codes;
pub mod fix_coordinator;
pub mod pos;
pub mod scanner;
pub mod sections;
pub mod utils;

pub use config::{Config, Tables};
pub use diagnostics::{ChangeLog, DiagnosticsSink, ErrorKind, LogEntry};
pub use fix_coordinator::{FixResult, fix_page};
pub use pos::{ItemType, PosParse, parse_pos};
pub use sections::{Document, Section, SectionId, parse};
