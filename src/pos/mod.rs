//! Definition lists of part-of-speech sections.
//!
//! A section's content is split into headlines, the list proper, and
//! footlines. The list is built into a [`ListTree`] whose items are then
//! typed by [`classify::assign_types`].
//!
//! ```
//! use wiktparse_lib::pos::{parse_lines, ItemType};
//! use wiktparse_lib::config::Tables;
//!
//! let lines = vec!["{{en-noun}}".to_string(), "# [[tree]]".to_string(), "#: {{syn|en|wood}}".to_string()];
//! let pos = parse_lines(&lines, "English:Noun", Tables::global(), None);
//! assert_eq!(pos.headlines, vec!["{{en-noun}}"]);
//! let syn = pos.senses.find("#1:1").unwrap();
//! assert_eq!(pos.senses[syn].item_type(), &ItemType::Syn);
//! ```

pub mod classify;
mod item_type;
mod list;
mod pos_names;

pub use classify::{RULES, Rule, assign_types, classify};
pub use item_type::ItemType;
pub use list::{ItemId, ListItem, ListTree};
pub use pos_names::{POS_TITLES, is_pos_title, pos_abbreviation};

use crate::config::Tables;
use crate::diagnostics::{ChangeLog, DiagnosticsSink, ErrorKind, report};
use crate::sections::{Document, SectionId};

/// A part-of-speech section split around its definition list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosParse {
    /// Lines before the first list line
    pub headlines: Vec<String>,
    pub senses: ListTree,
    /// Lines after the last list line
    pub footlines: Vec<String>,
    pub changes: ChangeLog,
}

impl PosParse {
    /// Normalized content lines
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.headlines.clone();
        lines.extend(self.senses.lines());
        lines.extend(self.footlines.iter().cloned());
        lines
    }

    pub fn changelog(&self) -> String {
        self.changes.summary()
    }
}

fn is_list_line(line: &str) -> bool {
    line.starts_with(['#', ':', '*'])
}

/// Split and classify the content of a section using the built-in tables
pub fn parse_pos(doc: &Document, id: SectionId, sink: Option<&mut dyn DiagnosticsSink>) -> PosParse {
    parse_pos_with(doc, id, Tables::global(), sink)
}

pub fn parse_pos_with(
    doc: &Document,
    id: SectionId,
    tables: &Tables,
    sink: Option<&mut dyn DiagnosticsSink>,
) -> PosParse {
    parse_lines(doc[id].content(), &doc.path(id), tables, sink)
}

/// Split and classify content lines.
///
/// A line inside the list bounds that is not a list item leaves the
/// content untouched: every line comes back as a headline.
pub fn parse_lines(
    lines: &[String],
    path: &str,
    tables: &Tables,
    mut sink: Option<&mut dyn DiagnosticsSink>,
) -> PosParse {
    let Some(first) = lines.iter().position(|line| is_list_line(line)) else {
        return PosParse {
            headlines: lines.to_vec(),
            ..PosParse::default()
        };
    };
    let last = lines.iter().rposition(|line| is_list_line(line)).unwrap_or(first);

    match list::build(&lines[first..=last], path, &mut sink) {
        Ok((mut senses, changes)) => {
            assign_types(&mut senses, tables);
            PosParse {
                headlines: lines[..first].to_vec(),
                senses,
                footlines: lines[last + 1..].to_vec(),
                changes,
            }
        }
        Err(err) => {
            log::debug!("'{path}' left as is: {err}");
            report(&mut sink, ErrorKind::NonListItem, path, &err.line);
            PosParse {
                headlines: lines.to_vec(),
                ..PosParse::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogEntry;
    use crate::sections::parse;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_basic() {
        let text = "===Noun===\n{{en-noun}}\n\n# sense1<ref>\nblah blah\n</ref>\n#: {{ux|en|there's a '''sense1''' in here}}\n# sense2\n#: {{syn|es|foo|bar}}\n\n{{footer}}\n";
        let doc = parse(text, "test", None).unwrap();
        let noun = doc.sections_titled(doc.root(), "Noun", true)[0];
        let pos = parse_pos(&doc, noun, None);

        assert_eq!(pos.headlines, vec!["{{en-noun}}", ""]);
        assert_eq!(pos.senses.len(), 2);
        assert_eq!(pos.footlines, vec!["", "{{footer}}"]);
        assert!(pos.changes.is_empty());

        let first = pos.senses.find("#1").unwrap();
        assert_eq!(pos.senses[first].data(), "sense1<ref>\nblah blah\n</ref>");
        assert_eq!(pos.senses[pos.senses.find("#1:1").unwrap()].item_type(), &ItemType::Ux);
        assert_eq!(pos.senses[pos.senses.find("#2:1").unwrap()].item_type(), &ItemType::Syn);
    }

    #[test]
    fn test_no_list() {
        let lines = owned(&["{{en-noun}}", "", "text"]);
        let pos = parse_lines(&lines, "", Tables::global(), None);
        assert_eq!(pos.headlines, lines);
        assert!(pos.senses.is_empty());
        assert!(pos.footlines.is_empty());
    }

    #[test]
    fn test_non_list_line_degrades() {
        let lines = owned(&["{{en-noun}}", "# a", "stray", "# b"]);
        let mut log: Vec<LogEntry> = Vec::new();
        let pos = parse_lines(&lines, "English:Noun", Tables::global(), Some(&mut log));
        assert_eq!(pos.headlines, lines);
        assert!(pos.senses.is_empty());
        assert_eq!(log, vec![LogEntry::new(ErrorKind::NonListItem, "English:Noun", "stray")]);
    }

    #[test]
    fn test_normalized_lines_and_changelog() {
        let lines = owned(&["{{en-noun}}", "#a", "", "# b ", "#:", "{{footer}}"]);
        let pos = parse_lines(&lines, "", Tables::global(), None);
        assert_eq!(pos.lines(), owned(&["{{en-noun}}", "# a", "# b", "{{footer}}"]));
        assert_eq!(
            pos.changelog(),
            "fixed whitespace in list; removed newline in list; removed empty list item"
        );

        let again = parse_lines(&pos.lines(), "", Tables::global(), None);
        assert!(again.changes.is_empty());
        assert_eq!(again.lines(), pos.lines());
    }
}
