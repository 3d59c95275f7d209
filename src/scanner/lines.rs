use super::automaton::Tracker;
use super::state::{ScanOptions, ScanState, TemplateMatch};
use std::ops::Range;

/// Newlines split lines everywhere except inside unclosed markup. Link
/// captions may span lines; link targets are abandoned at a newline.
static LINE_OPTIONS: ScanOptions = ScanOptions {
    comments: false,
    nowiki: false,
    refs: false,
    math: false,
    pre: false,
    tables: false,
    templates: TemplateMatch::None,
    links: true,
    special_links: true,
    invert: false,
};

/// A line of wikitext that may span several physical lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wikiline<'a> {
    pub text: &'a str,
    /// Byte range of `text` in the source
    pub span: Range<usize>,
}

/// Lazy iterator over the wikilines of a page
pub struct WikiLines<'a> {
    text: &'a str,
    tracker: Tracker<'a>,
    pos: usize,
    done: bool,
}

impl<'a> WikiLines<'a> {
    /// Scanner state at the end of the page; anything still open means the
    /// last wikiline swallowed the rest of the text
    pub fn finish(self) -> ScanState {
        self.tracker.finish()
    }
}

impl<'a> Iterator for WikiLines<'a> {
    type Item = Wikiline<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut search = self.pos;
        while let Some(offset) = self.text[search..].find('\n') {
            let at = search + offset;
            if self.tracker.matchable_at(at) {
                let line = Wikiline {
                    text: &self.text[self.pos..at],
                    span: self.pos..at,
                };
                self.pos = at + 1;
                return Some(line);
            }
            search = at + 1;
        }

        self.done = true;
        let rest = &self.text[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let rest = rest.strip_suffix('\n').unwrap_or(rest);
        Some(Wikiline {
            text: rest,
            span: self.pos..self.pos + rest.len(),
        })
    }
}

/// Split a page into wikilines.
///
/// A trailing newline does not produce a final empty line.
pub fn split_lines(text: &str) -> WikiLines<'_> {
    WikiLines {
        text,
        tracker: Tracker::new(text, &LINE_OPTIONS),
        pos: 0,
        done: false,
    }
}
