use super::item_type::ItemType;
use crate::diagnostics::{ChangeLog, DiagnosticsSink, ErrorKind, report};
use crate::regex_lazy;
use serde::Serialize;
use std::ops::Index;
use std::sync::LazyLock;

pub(crate) const REMOVED_NEWLINE: &str = "removed newline in list";
pub(crate) const FIXED_WHITESPACE: &str = "fixed whitespace in list";
pub(crate) const REMOVED_EMPTY: &str = "removed empty list item";

/// Index of an item in its [`ListTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(pub(crate) usize);

/// One line of a definition list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub(crate) prefix: String,
    pub(crate) style: char,
    pub(crate) level: usize,
    pub(crate) data: String,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) item_type: ItemType,
    #[serde(skip)]
    pub(crate) parent: Option<ItemId>,
    #[serde(skip)]
    pub(crate) children: Vec<ItemId>,
}

impl ListItem {
    /// The literal run of `#`, `:` and `*`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Last prefix character: `#` sense, `:` detail, `*` citation
    pub fn style(&self) -> char {
        self.style
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Text after the prefix, trimmed
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Position path such as `#2:1`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Normalized wikitext line
    pub fn line(&self) -> String {
        format!("{} {}", self.prefix, self.data)
    }
}

/// Arena tree of list items in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTree {
    pub(crate) items: Vec<ListItem>,
    pub(crate) roots: Vec<ItemId>,
}

impl Index<ItemId> for ListTree {
    type Output = ListItem;

    fn index(&self, id: ItemId) -> &ListItem {
        &self.items[id.0]
    }
}

impl ListTree {
    /// Number of top-level items
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of items at every level
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: ItemId) -> Option<&ListItem> {
        self.items.get(id.0)
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        &self[id].children
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self[id].parent
    }

    pub fn find(&self, name: &str) -> Option<ItemId> {
        self.items.iter().position(|item| item.name == name).map(ItemId)
    }

    /// Items in document order
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ListItem)> + '_ {
        self.items.iter().enumerate().map(|(index, item)| (ItemId(index), item))
    }

    pub fn lines(&self) -> Vec<String> {
        self.items.iter().map(ListItem::line).collect()
    }

    /// Sibling groups: the top level, then every item's children
    pub(crate) fn sibling_groups(&self) -> Vec<Vec<ItemId>> {
        std::iter::once(self.roots.clone())
            .chain(self.items.iter().map(|item| item.children.clone()))
            .filter(|group| !group.is_empty())
            .collect()
    }
}

/// A line inside the list bounds that is not a list item
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a list item: {line}")]
pub(crate) struct ListError {
    pub line: String,
}

/// Build the item tree for the lines between the first and last list line
pub(crate) fn build(
    lines: &[String],
    path: &str,
    sink: &mut Option<&mut dyn DiagnosticsSink>,
) -> Result<(ListTree, ChangeLog), ListError> {
    let prefix_re = regex_lazy!(r"^[#:*]+");
    let mut tree = ListTree::default();
    let mut changes = ChangeLog::new();
    let mut prev: Option<ItemId> = None;

    for line in lines {
        if line.trim().is_empty() {
            report(sink, ErrorKind::RemovedNewline, path, line);
            changes.push(REMOVED_NEWLINE);
            continue;
        }

        let Some(found) = prefix_re.find(line) else {
            return Err(ListError { line: line.clone() });
        };
        let prefix = found.as_str();
        let rest = &line[found.end()..];
        let data = rest.trim();
        if data.is_empty() {
            report(sink, ErrorKind::EmptyItem, path, line);
            changes.push(REMOVED_EMPTY);
            continue;
        }
        if rest.strip_prefix(' ') != Some(data) {
            report(sink, ErrorKind::Whitespace, path, line);
            changes.push(FIXED_WHITESPACE);
        }

        let level = prefix.len();
        let style = prefix.chars().last().unwrap_or('#');
        let parent = match prev {
            None => None,
            Some(prev) if level > tree[prev].level => Some(prev),
            Some(prev) => {
                let mut parent = tree[prev].parent;
                while let Some(candidate) = parent
                    && level <= tree[candidate].level
                {
                    parent = tree[candidate].parent;
                }
                parent
            }
        };

        let name = match parent {
            Some(parent) => format!("{}{style}{}", tree[parent].name, tree[parent].children.len() + 1),
            None => format!("{style}{}", tree.roots.len() + 1),
        };

        let id = ItemId(tree.items.len());
        tree.items.push(ListItem {
            prefix: prefix.to_string(),
            style,
            level,
            data: data.to_string(),
            name,
            item_type: ItemType::Unknown,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => tree.items[parent.0].children.push(id),
            None => tree.roots.push(id),
        }
        prev = Some(id);
    }

    Ok((tree, changes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogEntry;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn build_quiet(text: &str) -> (ListTree, ChangeLog) {
        let mut sink: Option<&mut dyn DiagnosticsSink> = None;
        build(&lines(text), "", &mut sink).unwrap()
    }

    #[test]
    fn test_nesting_and_names() {
        let (tree, changes) = build_quiet("# a\n## b\n### c\n# d");
        assert!(changes.is_empty());
        assert_eq!(tree.len(), 2);
        let first = tree.find("#1").unwrap();
        assert_eq!(tree[first].data(), "a");
        let child = tree.find("#1#1").unwrap();
        assert_eq!(tree.parent(child), Some(first));
        let grandchild = tree.find("#1#1#1").unwrap();
        assert_eq!(tree[grandchild].data(), "c");
        assert_eq!(tree[tree.find("#2").unwrap()].data(), "d");
    }

    #[test]
    fn test_mixed_styles() {
        let (tree, _) = build_quiet("# a\n#: ex\n#* cite\n#*: passage\n# b\n#: ex2");
        assert!(tree.find("#1:1").is_some());
        assert!(tree.find("#1*2").is_some());
        assert!(tree.find("#1*2:1").is_some());
        assert!(tree.find("#2:1").is_some());
        assert_eq!(tree[tree.find("#1*2").unwrap()].style(), '*');
    }

    #[test]
    fn test_shallower_item_climbs_to_matching_level() {
        let (tree, _) = build_quiet("# a\n#:: deep\n#: shallow");
        let deep = tree.find("#1:1").unwrap();
        assert_eq!(tree[deep].level(), 3);
        assert!(tree.find("#1:2").is_some());
    }

    #[test]
    fn test_fixes_are_logged() {
        let mut log: Vec<LogEntry> = Vec::new();
        let mut sink: Option<&mut dyn DiagnosticsSink> = Some(&mut log);
        let (tree, changes) = build(&lines("#a\n\n#  b \n#:\n# c"), "English:Noun", &mut sink).unwrap();
        assert_eq!(tree.lines(), vec!["# a", "# b", "# c"]);
        assert_eq!(
            changes.iter().collect::<Vec<_>>(),
            vec![FIXED_WHITESPACE, REMOVED_NEWLINE, REMOVED_EMPTY]
        );
        let kinds: Vec<_> = log.iter().map(|entry| entry.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::Whitespace,
                ErrorKind::RemovedNewline,
                ErrorKind::Whitespace,
                ErrorKind::EmptyItem
            ]
        );
    }

    #[test]
    fn test_non_list_line_is_an_error() {
        let mut sink: Option<&mut dyn DiagnosticsSink> = None;
        let err = build(&lines("# a\ntext\n# b"), "", &mut sink).unwrap_err();
        assert_eq!(err.line, "text");
    }
}
