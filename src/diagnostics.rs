//! Diagnostics produced while parsing a page.
//!
//! Two separate channels exist:
//!
//! - the **error log**, an optional caller-supplied sink receiving
//!   [`LogEntry`] values for anomalies a human may want to review
//!   (unclosed markup, text on heading lines, malformed list lines);
//! - the **change log**, an ordered and de-duplicated list of
//!   normalizations that were applied to the text, suitable for an
//!   edit summary.
//!
//! Neither channel ever aborts parsing.

use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;

/// Kind of anomaly recorded in the error log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OpenTemplate,
    OpenHtmlComment,
    OpenNowiki,
    OpenRef,
    OpenMath,
    OpenPre,
    OpenTable,
    CommentOnTitle,
    TextOnTitle,
    RemovedNewline,
    Whitespace,
    EmptyItem,
    NonListItem,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::OpenTemplate => "open_template",
            ErrorKind::OpenHtmlComment => "open_html_comment",
            ErrorKind::OpenNowiki => "open_nowiki",
            ErrorKind::OpenRef => "open_ref",
            ErrorKind::OpenMath => "open_math",
            ErrorKind::OpenPre => "open_pre",
            ErrorKind::OpenTable => "open_table",
            ErrorKind::CommentOnTitle => "comment_on_title",
            ErrorKind::TextOnTitle => "text_on_title",
            ErrorKind::RemovedNewline => "removed_newline",
            ErrorKind::Whitespace => "whitespace",
            ErrorKind::EmptyItem => "empty_item",
            ErrorKind::NonListItem => "non_list_item",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error log record: what happened, in which section, on which line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub kind: ErrorKind,
    /// Colon-separated section path (`English:Noun`), empty for the page header
    pub path: String,
    /// The offending wikiline, or a short excerpt of it
    pub line: String,
}

impl LogEntry {
    pub fn new(kind: ErrorKind, path: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            line: line.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.kind, self.path, self.line)
    }
}

/// Receiver for error log entries.
///
/// Passing `None` where an `Option<&mut dyn DiagnosticsSink>` is expected
/// disables error logging entirely.
pub trait DiagnosticsSink {
    fn record(&mut self, entry: LogEntry);
}

impl DiagnosticsSink for Vec<LogEntry> {
    fn record(&mut self, entry: LogEntry) {
        self.push(entry);
    }
}

/// Record an entry if a sink was supplied, mirroring it to the `log` facade.
pub(crate) fn report(sink: &mut Option<&mut dyn DiagnosticsSink>, kind: ErrorKind, path: &str, line: &str) {
    log::debug!("{kind} at '{path}': {}", excerpt(line));
    if let Some(sink) = sink.as_deref_mut() {
        sink.record(LogEntry::new(kind, path, line));
    }
}

/// Reborrow an optional sink for a nested call without giving it away.
pub fn reborrow<'a>(sink: &'a mut Option<&mut dyn DiagnosticsSink>) -> Option<&'a mut dyn DiagnosticsSink> {
    sink.as_mut().map(|sink| &mut **sink as &mut dyn DiagnosticsSink)
}

/// First physical line of `text`, shortened for log output.
pub(crate) fn excerpt(text: &str) -> &str {
    const MAX: usize = 80;
    let first = text.split('\n').next().unwrap_or("");
    if first.len() <= MAX {
        return first;
    }
    let mut end = MAX;
    while !first.is_char_boundary(end) {
        end -= 1;
    }
    &first[..end]
}

/// Ordered, de-duplicated record of applied normalizations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeLog {
    entries: IndexSet<String>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a change description; repeated descriptions are kept once, at
    /// the position they were first seen.
    pub fn push(&mut self, change: impl Into<String>) {
        self.entries.insert(change.into());
    }

    pub fn extend<I, S>(&mut self, changes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for change in changes {
            self.push(change);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, change: &str) -> bool {
        self.entries.contains(change)
    }

    /// Human-readable edit summary
    pub fn summary(&self) -> String {
        self.iter().collect::<Vec<_>>().join("; ")
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changelog_dedupes_in_first_seen_order() {
        let mut changes = ChangeLog::new();
        changes.push("b");
        changes.push("a");
        changes.push("b");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.summary(), "b; a");
    }

    #[test]
    fn test_report_without_sink_is_silent() {
        let mut sink: Option<&mut dyn DiagnosticsSink> = None;
        report(&mut sink, ErrorKind::OpenTemplate, "", "{{open");
    }

    #[test]
    fn test_report_records_into_vec() {
        let mut entries: Vec<LogEntry> = Vec::new();
        {
            let mut sink: Option<&mut dyn DiagnosticsSink> = Some(&mut entries);
            report(&mut sink, ErrorKind::TextOnTitle, "English:Noun", "===Noun=== extra");
        }
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind.as_str(), "text_on_title");
        assert_eq!(entries[0].path, "English:Noun");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(100);
        let cut = excerpt(&long);
        assert!(cut.len() <= 80);
        assert!(long.starts_with(cut));
        assert_eq!(excerpt("one\ntwo"), "one");
    }
}
