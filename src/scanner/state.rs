use crate::diagnostics::ErrorKind;
use std::collections::HashSet;

/// Which templates have matchable bodies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateMatch {
    /// Every template body is opaque
    #[default]
    None,
    /// Every template body is matchable
    All,
    /// Only bodies of the named templates are matchable; a position is
    /// matchable only if every template enclosing it is in the set
    Named(HashSet<String>),
}

impl TemplateMatch {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TemplateMatch::Named(names.into_iter().map(Into::into).collect())
    }

    pub(crate) fn allows(&self, name: &str) -> bool {
        match self {
            TemplateMatch::None => false,
            TemplateMatch::All => true,
            TemplateMatch::Named(names) => names.contains(name),
        }
    }
}

/// Selects which markup constructs are matchable during a scoped scan.
///
/// Every construct defaults to opaque, so `ScanOptions::default()` only
/// matches plain text outside any markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// `<!-- ... -->`
    pub comments: bool,
    /// `<nowiki> ... </nowiki>`
    pub nowiki: bool,
    /// `<ref> ... </ref>`
    pub refs: bool,
    /// `<math> ... </math>`
    pub math: bool,
    /// `<pre> ... </pre>`
    pub pre: bool,
    /// `{| ... |}`
    pub tables: bool,
    /// `{{ ... }}`
    pub templates: TemplateMatch,
    /// Captions of ordinary `[[target|caption]]` links; targets are never matchable
    pub links: bool,
    /// Captions of File:/Image:/Media:/Special: links
    pub special_links: bool,
    /// Yield only the matches that would otherwise be excluded
    pub invert: bool,
}

impl ScanOptions {
    /// Options that exclude every construct (same as `default()`)
    pub fn opaque() -> Self {
        Self::default()
    }

    /// Options under which every construct is matchable except link targets
    pub fn transparent() -> Self {
        Self {
            comments: true,
            nowiki: true,
            refs: true,
            math: true,
            pre: true,
            tables: true,
            templates: TemplateMatch::All,
            links: true,
            special_links: true,
            invert: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

/// Regions that own the scanner until their close token appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusiveKind {
    Comment,
    Pre,
    Math,
}

/// An open exclusive region and the byte offset of its opener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusive {
    pub kind: ExclusiveKind,
    pub start: usize,
}

/// An open template on the template stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTemplate {
    pub start: usize,
    /// Template name, trimmed, as written between `{{` and the first `|`
    pub name: String,
}

/// A single-level construct that remembers the template depth it opened at.
///
/// Its closer only counts when seen at the same depth, so `|}}` ending a
/// template inside a table is not taken for a table close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nested {
    pub start: usize,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPart {
    Target,
    Caption,
}

/// An open `[[...]]` link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenLink {
    pub start: usize,
    pub depth: usize,
    /// File:/Image:/Media:/Special: link that swallows nested links
    pub special: bool,
    pub part: LinkPart,
    /// Ordinary links nested inside a special link's caption
    pub nested: usize,
}

/// The scanner's running context.
///
/// Only the template stack is multi-level. Comments, `<pre>` and `<math>`
/// share the single `exclusive` slot since at most one of them can be
/// active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub templates: Vec<OpenTemplate>,
    pub exclusive: Option<Exclusive>,
    pub nowiki: Option<usize>,
    pub reference: Option<usize>,
    pub table: Option<Nested>,
    pub link: Option<OpenLink>,
}

impl ScanState {
    pub fn template_depth(&self) -> usize {
        self.templates.len()
    }

    pub fn in_comment(&self) -> bool {
        self.exclusive.is_some_and(|ex| ex.kind == ExclusiveKind::Comment)
    }

    /// True when nothing that can span lines is left open.
    ///
    /// Links are not considered: they are abandoned at the end of their
    /// line and so can never swallow the rest of a page.
    pub fn is_clean(&self) -> bool {
        self.templates.is_empty()
            && self.exclusive.is_none()
            && self.nowiki.is_none()
            && self.reference.is_none()
            && self.table.is_none()
    }

    /// Every construct still open, with the byte offset where it started
    pub fn unclosed(&self) -> Vec<(ErrorKind, usize)> {
        let mut open = Vec::new();
        if let Some(ex) = self.exclusive {
            let kind = match ex.kind {
                ExclusiveKind::Comment => ErrorKind::OpenHtmlComment,
                ExclusiveKind::Pre => ErrorKind::OpenPre,
                ExclusiveKind::Math => ErrorKind::OpenMath,
            };
            open.push((kind, ex.start));
        }
        if let Some(start) = self.nowiki {
            open.push((ErrorKind::OpenNowiki, start));
        }
        if let Some(start) = self.reference {
            open.push((ErrorKind::OpenRef, start));
        }
        if let Some(table) = self.table {
            open.push((ErrorKind::OpenTable, table.start));
        }
        for template in &self.templates {
            open.push((ErrorKind::OpenTemplate, template.start));
        }
        open.sort_by_key(|&(_, start)| start);
        open
    }
}
