//! Section tree for a dictionary page.
//!
//! The page is split into wikilines and every heading line opens a
//! [`Section`]. Sections live in an arena owned by the [`Document`] and are
//! addressed by [`SectionId`]; index 0 is the root, which stands for the
//! page itself and owns the lines before the first heading.
//!
//! Building the tree normalizes the page as it goes: blank-line runs
//! between sections, `----` separators between languages, categories
//! gathered at the end of their language and topline templates at its
//! top. Each fix is recorded in the document's [`ChangeLog`].

mod builder;
mod heading;
pub mod markers;

pub use builder::{parse, parse_with};
pub use heading::MAX_LEVEL;

use crate::diagnostics::ChangeLog;
use crate::scanner::ScanState;
use std::collections::VecDeque;
use std::fmt;
use std::ops::Index;

/// Index of a section in its document's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

impl SectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The page root
pub const ROOT: SectionId = SectionId(0);

/// Traversal order for [`Document::walk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Misuse of the structural editing API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("the page root cannot be moved")]
    MoveRoot,
    #[error("a section cannot be moved under itself or its own descendants")]
    Cycle,
    #[error("insert position {index} is past the end of {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no section with index {0}")]
    UnknownSection(usize),
    #[error("the move would put a heading at level {level}, deeper than {MAX_LEVEL}")]
    TooDeep { level: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub(crate) level: usize,
    pub(crate) title: String,
    pub(crate) count: Option<String>,
    pub(crate) content: Vec<String>,
    pub(crate) leading_blanks: Vec<String>,
    pub(crate) trailing_blanks: Vec<String>,
    pub(crate) categories: Vec<String>,
    pub(crate) toplines: Vec<String>,
    pub(crate) parent: Option<SectionId>,
    pub(crate) children: Vec<SectionId>,
}

impl Section {
    pub(crate) fn new(level: usize, title: String, count: Option<String>, parent: Option<SectionId>) -> Self {
        Self {
            level,
            title,
            count,
            content: Vec::new(),
            leading_blanks: Vec::new(),
            trailing_blanks: Vec::new(),
            categories: Vec::new(),
            toplines: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Title without the count, with any unbalanced `=` kept
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Numeric disambiguator (`2` in "Etymology 2")
    pub fn count(&self) -> Option<&str> {
        self.count.as_deref()
    }

    /// Title as it appears in the heading and in paths
    pub fn full_title(&self) -> String {
        match &self.count {
            Some(count) => format!("{} {count}", self.title),
            None => self.title.clone(),
        }
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Categories gathered for this language block; only the topmost
    /// section of a block has any
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Topline templates gathered for this language block
    pub fn toplines(&self) -> &[String] {
        &self.toplines
    }

    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    pub fn children(&self) -> &[SectionId] {
        &self.children
    }

    /// Canonical heading line
    pub fn heading(&self) -> String {
        heading::render(self.level, &self.title, self.count.as_deref())
    }
}

/// A parsed page
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) title: String,
    pub(crate) sections: Vec<Section>,
    pub(crate) changes: ChangeLog,
    pub(crate) state: ScanState,
    pub(crate) trailing_newline: bool,
}

impl Index<SectionId> for Document {
    type Output = Section;

    fn index(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }
}

impl Document {
    pub(crate) fn new(title: &str, trailing_newline: bool) -> Self {
        Self {
            title: title.to_string(),
            sections: vec![Section::new(1, title.to_string(), None, None)],
            changes: ChangeLog::new(),
            state: ScanState::default(),
            trailing_newline,
        }
    }

    /// Page title
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn root(&self) -> SectionId {
        ROOT
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    /// Lines before the first heading
    pub fn header(&self) -> &[String] {
        &self.sections[ROOT.0].content
    }

    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    /// Edit summary of every normalization applied while parsing
    pub fn changelog(&self) -> String {
        self.changes.summary()
    }

    /// Scanner state at the end of the page
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// False when the page ends inside unclosed markup
    pub fn is_safe(&self) -> bool {
        self.state.is_clean()
    }

    pub fn len(&self) -> usize {
        self.sections.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.sections.len() == 1
    }

    pub fn children(&self, id: SectionId) -> &[SectionId] {
        &self[id].children
    }

    pub fn parent(&self, id: SectionId) -> Option<SectionId> {
        self[id].parent
    }

    /// The section followed by its ancestors, ending with the root
    pub fn ancestors(&self, id: SectionId) -> impl Iterator<Item = SectionId> + '_ {
        std::iter::successors(Some(id), move |&current| self[current].parent)
    }

    /// Top section of the language block containing `id` (the root for the root)
    pub fn topmost(&self, id: SectionId) -> SectionId {
        let mut current = id;
        while let Some(parent) = self[current].parent
            && parent != ROOT
        {
            current = parent;
        }
        current
    }

    /// Colon-separated titles from the top of the block down to `id`
    pub fn path(&self, id: SectionId) -> String {
        let mut titles: Vec<String> = self
            .ancestors(id)
            .filter(|&ancestor| ancestor != ROOT)
            .map(|ancestor| self[ancestor].full_title())
            .collect();
        titles.reverse();
        titles.join(":")
    }

    /// Sections below `scope`, or only its children when not `recursive`
    pub fn walk(&self, scope: SectionId, recursive: bool, order: Order) -> Vec<SectionId> {
        if !recursive {
            return self[scope].children.clone();
        }
        let mut out = Vec::new();
        match order {
            Order::DepthFirst => {
                let mut stack: Vec<SectionId> = self[scope].children.iter().rev().copied().collect();
                while let Some(id) = stack.pop() {
                    out.push(id);
                    stack.extend(self[id].children.iter().rev().copied());
                }
            }
            Order::BreadthFirst => {
                let mut queue: VecDeque<SectionId> = self[scope].children.iter().copied().collect();
                while let Some(id) = queue.pop_front() {
                    out.push(id);
                    queue.extend(self[id].children.iter().copied());
                }
            }
        }
        out
    }

    /// Depth-first sections below `scope` accepted by `matches`
    pub fn filter_sections<F>(&self, scope: SectionId, recursive: bool, matches: F) -> Vec<SectionId>
    where
        F: Fn(&Section) -> bool,
    {
        self.walk(scope, recursive, Order::DepthFirst)
            .into_iter()
            .filter(|&id| matches(&self[id]))
            .collect()
    }

    /// Depth-first sections below `scope` whose title (without count) is `title`
    pub fn sections_titled(&self, scope: SectionId, title: &str, recursive: bool) -> Vec<SectionId> {
        self.filter_sections(scope, recursive, |section| section.title == title)
    }

    /// Rendered text of a section and its subtree; the whole page for the root
    pub fn section_text(&self, id: SectionId) -> String {
        if id == ROOT {
            return self.to_string();
        }
        let mut out = String::new();
        self.write_section(id, &mut out);
        out
    }

    /// Replace a section's content lines, e.g. with normalized list lines
    pub fn replace_content(&mut self, id: SectionId, lines: Vec<String>) {
        self.sections[id.0].content = lines;
    }

    /// Move `id` under `new_parent`, at `index` among its children or last.
    ///
    /// The moved subtree is re-leveled below its new parent and stray `=`
    /// in its titles are dropped.
    pub fn reparent(&mut self, id: SectionId, new_parent: SectionId, index: Option<usize>) -> Result<(), TreeError> {
        for check in [id, new_parent] {
            if check.0 >= self.sections.len() {
                return Err(TreeError::UnknownSection(check.0));
            }
        }
        if id == ROOT {
            return Err(TreeError::MoveRoot);
        }
        if self.ancestors(new_parent).any(|ancestor| ancestor == id) {
            return Err(TreeError::Cycle);
        }

        let old_parent = self[id].parent.unwrap_or(ROOT);
        let len = self[new_parent].children.len() - usize::from(old_parent == new_parent);
        if let Some(index) = index
            && index > len
        {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        let level = self[new_parent].level + 1;
        let deepest = level + self.height(id);
        if deepest > MAX_LEVEL {
            return Err(TreeError::TooDeep { level: deepest });
        }

        self.sections[old_parent.0].children.retain(|&child| child != id);
        let siblings = &mut self.sections[new_parent.0].children;
        match index {
            Some(index) => siblings.insert(index, id),
            None => siblings.push(id),
        }
        self.sections[id.0].parent = Some(new_parent);

        self.adjust_level(id, level);
        Ok(())
    }

    /// Number of heading levels below `id` in its subtree
    fn height(&self, id: SectionId) -> usize {
        self[id]
            .children
            .iter()
            .map(|&child| 1 + self.height(child))
            .max()
            .unwrap_or(0)
    }

    /// Set a section's level, shifting its descendants with it
    pub fn adjust_level(&mut self, id: SectionId, level: usize) {
        let section = &mut self.sections[id.0];
        section.title = section.title.trim_matches(|c| c == ' ' || c == '=').to_string();
        if section.level == level {
            return;
        }
        section.level = level;
        let children = section.children.clone();
        for child in children {
            self.adjust_level(child, level + 1);
        }
    }

    fn write_section(&self, id: SectionId, out: &mut String) {
        let section = &self[id];
        if section.level > 2 {
            out.push('\n');
        }
        out.push_str(&section.heading());
        out.push('\n');
        for line in section.toplines.iter().chain(&section.content) {
            out.push_str(line);
            out.push('\n');
        }
        for &child in &section.children {
            self.write_section(child, out);
        }
        if !section.categories.is_empty() {
            out.push('\n');
            for line in &section.categories {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let header = self.header();
        if !header.is_empty() {
            out.push_str(&header.join("\n"));
            out.push('\n');
        }
        for (index, &child) in self[ROOT].children.iter().enumerate() {
            let mut block = String::new();
            self.write_section(child, &mut block);
            if index > 0 && self[child].level <= 2 {
                out.push('\n');
            }
            // Deeper headings bring their own blank line unless one is already there
            let after_blank = out.ends_with("\n\n") || (index == 0 && header.last().is_none_or(|line| line.is_empty()));
            let block = match block.strip_prefix('\n') {
                Some(rest) if after_blank => rest,
                _ => block.as_str(),
            };
            out.push_str(block);
        }

        let text = out.trim_end();
        f.write_str(text)?;
        if self.trailing_newline && !text.is_empty() {
            f.write_str("\n")?;
        }
        Ok(())
    }
}
