use super::heading::{self, Heading};
use super::markers::{is_category, topline_name};
use super::{Document, ROOT, Section, SectionId};
use crate::config::Tables;
use crate::diagnostics::{ChangeLog, DiagnosticsSink, ErrorKind, excerpt, report};
use crate::regex_lazy;
use crate::scanner::{ScanState, split_lines};
use std::borrow::Cow;
use std::sync::LazyLock;

const WT_NORM: &str = "adjusted whitespace per WT:NORM";
const L2_SEPARATOR: &str = "removed ---- L2 separator";
const PARAGRAPH_SEPARATOR: &str = "removed unicode paragraph separator";

/// Parse a page with the built-in tables.
///
/// Returns `None` when the page ends inside unclosed markup and no sink
/// was supplied: without a log there is no way to tell the caller why the
/// page is unsafe to edit. With a sink, each unclosed construct is
/// recorded and the tree is returned.
pub fn parse(text: &str, title: &str, sink: Option<&mut dyn DiagnosticsSink>) -> Option<Document> {
    parse_with(text, title, Tables::global(), sink)
}

/// [`parse`] with caller-supplied tables
pub fn parse_with(
    text: &str,
    title: &str,
    tables: &Tables,
    sink: Option<&mut dyn DiagnosticsSink>,
) -> Option<Document> {
    let mut changes = ChangeLog::new();
    let text: Cow<'_, str> = if text.contains('\u{2029}') {
        changes.push(PARAGRAPH_SEPARATOR);
        Cow::Owned(text.replace('\u{2029}', ""))
    } else {
        Cow::Borrowed(text)
    };

    let mut builder = Builder {
        doc: Document::new(title, text.ends_with('\n')),
        tables,
        sink,
        prev: None,
    };
    builder.doc.changes = changes;

    let mut lines = split_lines(&text);
    for line in lines.by_ref() {
        builder.push_line(line.text);
    }
    let state = lines.finish();
    builder.finish(&text, state)
}

struct Builder<'t, 's> {
    doc: Document,
    tables: &'t Tables,
    sink: Option<&'s mut dyn DiagnosticsSink>,
    /// Most recently opened section
    prev: Option<SectionId>,
}

fn is_blank_or_rule(line: &str) -> bool {
    regex_lazy!(r"^(----+)?\s*$").is_match(line)
}

fn has_rule(lines: &[String]) -> bool {
    lines.iter().any(|line| line.contains("----"))
}

impl Builder<'_, '_> {
    fn change(&mut self, message: impl Into<String>) {
        self.doc.changes.push(message);
    }

    fn section(&mut self, id: SectionId) -> &mut Section {
        &mut self.doc.sections[id.0]
    }

    fn push_line(&mut self, line: &str) {
        if let Some(heading) = Heading::parse(line) {
            self.open_section(heading, line);
            return;
        }
        match self.prev {
            None => self.section(ROOT).content.push(line.to_string()),
            Some(id) => self.add_line(id, line),
        }
    }

    fn parent_for(&self, level: usize) -> SectionId {
        let Some(prev) = self.prev else {
            return ROOT;
        };
        if level > self.doc[prev].level {
            return prev;
        }
        let mut parent = self.doc[prev].parent.unwrap_or(ROOT);
        while parent != ROOT && level <= self.doc[parent].level {
            parent = self.doc[parent].parent.unwrap_or(ROOT);
        }
        parent
    }

    fn open_section(&mut self, heading: Heading, line: &str) {
        let parent = self.parent_for(heading.level);
        match self.prev {
            Some(prev) => self.close_section(prev, heading.level),
            // Headings below L2 are written with a blank line above them
            None if heading.level > 2 && self.doc[ROOT].content.last().is_some_and(|line| !line.is_empty()) => {
                self.change(WT_NORM);
            }
            None => {}
        }

        let id = SectionId(self.doc.sections.len());
        let section = Section::new(heading.level, heading.title, heading.count, Some(parent));
        if section.heading() != line {
            self.change(WT_NORM);
        }
        self.doc.sections.push(section);
        self.section(parent).children.push(id);
        self.prev = Some(id);

        let top = self.doc.topmost(id);
        if top != id && !self.doc[top].categories.is_empty() {
            let path = self.doc.path(top);
            self.change(format!("/*{path}*/ moved categories to end of language, per WT:ELE"));
        }

        if let Some(trailing) = heading.trailing {
            let kind = if heading::is_comment(&trailing) {
                ErrorKind::CommentOnTitle
            } else {
                ErrorKind::TextOnTitle
            };
            let path = self.doc.path(id);
            report(&mut self.sink, kind, &path, line);
            self.add_line(id, &trailing);
        }
    }

    /// Whitespace rules checked when the next heading arrives
    fn close_section(&mut self, prev: SectionId, next_level: usize) {
        let section = &self.doc[prev];
        let message = if next_level == 2 && (has_rule(&section.trailing_blanks) || has_rule(&section.leading_blanks)) {
            Some(L2_SEPARATOR)
        } else if section.content.is_empty() && section.children.is_empty() {
            (section.leading_blanks != [""]).then_some(WT_NORM)
        } else {
            (section.trailing_blanks != [""]).then_some(WT_NORM)
        };
        if let Some(message) = message {
            self.change(message);
        }
    }

    fn add_line(&mut self, id: SectionId, line: &str) {
        if is_blank_or_rule(line) {
            let section = self.section(id);
            if section.content.is_empty() {
                section.leading_blanks.push(line.to_string());
            } else {
                section.trailing_blanks.push(line.to_string());
            }
            return;
        }

        let top = self.doc.topmost(id);
        if is_category(line, self.tables) {
            self.add_category(id, top, line);
        } else if let Some(name) = topline_name(line, self.tables) {
            self.add_topline(id, top, line, &name);
        } else {
            self.add_content(id, top, line);
        }
    }

    fn add_category(&mut self, id: SectionId, top: SectionId, line: &str) {
        let first = self.doc[top].categories.is_empty();
        let section = self.section(id);
        let blanks = if section.content.is_empty() {
            &mut section.leading_blanks
        } else {
            &mut section.trailing_blanks
        };
        // One blank line before the first category, none between categories
        let expected: &[&str] = if first { &[""] } else { &[] };
        let misplaced = blanks.as_slice() != expected;
        blanks.clear();
        if misplaced {
            self.change(WT_NORM);
        }

        if self.doc[top].categories.iter().any(|existing| existing == line) {
            let path = self.doc.path(top);
            self.change(format!("/*{path}*/ removed duplicate categories"));
        } else {
            self.section(top).categories.push(line.to_string());
        }
    }

    fn add_topline(&mut self, id: SectionId, top: SectionId, line: &str, name: &str) {
        if id != top || !self.doc[top].content.is_empty() {
            let path = self.doc.path(top);
            self.change(format!("/*{path}*/ moved {name} template to top"));
        }
        if !self.doc[id].leading_blanks.is_empty() {
            self.section(id).leading_blanks.clear();
            self.change(WT_NORM);
        }

        if self.doc[top].toplines.iter().any(|existing| existing == line) {
            let path = self.doc.path(top);
            self.change(format!("/*{path}*/ removed duplicate topline"));
        } else {
            self.section(top).toplines.push(line.to_string());
        }
    }

    fn add_content(&mut self, id: SectionId, top: SectionId, line: &str) {
        let section = self.section(id);
        let dropped_leading = section.content.is_empty() && !section.leading_blanks.is_empty();
        if dropped_leading {
            section.leading_blanks.clear();
        }
        let mut blanks = std::mem::take(&mut section.trailing_blanks);
        section.content.append(&mut blanks);
        section.content.push(line.to_string());
        if dropped_leading {
            self.change(WT_NORM);
        }

        if !self.doc[top].categories.is_empty() {
            let path = self.doc.path(top);
            self.change(format!("/*{path}*/ moved categories to end of language, per WT:ELE"));
        }
    }

    fn finish(mut self, text: &str, state: ScanState) -> Option<Document> {
        // Trailing whitespace and separators at the end of the page are dropped
        let body = text.strip_suffix('\n').unwrap_or(text);
        let trailing_space = body.len() != body.trim_end().len();
        let trailing_rule = self.prev.is_some_and(|id| {
            let section = &self.doc[id];
            has_rule(&section.trailing_blanks) || has_rule(&section.leading_blanks)
        });
        if trailing_space || trailing_rule {
            self.change(WT_NORM);
        }

        if !state.is_clean() {
            if self.sink.is_none() {
                log::warn!("'{}' ends inside unclosed markup; refusing to parse", self.doc.title);
                return None;
            }
            let path = self.prev.map(|id| self.doc.path(id)).unwrap_or_default();
            for (kind, start) in state.unclosed() {
                report(&mut self.sink, kind, &path, excerpt(&text[start..]));
            }
        }

        self.doc.state = state;
        Some(self.doc)
    }
}
