//! Item type assignment.
//!
//! Every item is classified on its own by the first rule in [`RULES`]
//! that claims it; items no rule claims are `unknown`. A final pass then
//! looks at each sibling group as a whole.

use super::item_type::ItemType;
use super::list::{ItemId, ListTree};
use crate::config::Tables;
use crate::regex_lazy;
use crate::scanner::templates;
use std::sync::LazyLock;

/// A classification rule: `Some` claims the item
pub type Rule = fn(&ListTree, ItemId, &str, &Tables) -> Option<ItemType>;

/// Rules in priority order
pub const RULES: &[(&str, Rule)] = &[
    ("template", template),
    ("citation_shorthand", citation_shorthand),
    ("bare_quote", bare_quote),
    ("bare_ux", bare_ux),
];

/// Data with comments, references and decorative templates removed
pub fn strip_decorations(data: &str, tables: &Tables) -> String {
    let text = regex_lazy!(r"(?s)<!--.*?-->").replace_all(data, "");
    let text = regex_lazy!(r"(?is)<\s*ref\b[^>]*?/\s*>|<\s*ref\b[^>]*>.*?<\s*/\s*ref\s*>")
        .replace_all(&text, "")
        .into_owned();

    let safe: Vec<_> = templates(&text)
        .into_iter()
        .filter(|call| tables.is_safe_template(&call.name))
        .map(|call| call.span)
        .collect();
    if safe.is_empty() {
        return text;
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in safe {
        out.push_str(&text[last..span.start]);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Recognized templates decide the type. Mixed categories are ambiguous;
/// sense qualifiers may share the line, anything else must be the whole line.
pub fn template(_tree: &ListTree, _id: ItemId, text: &str, tables: &Tables) -> Option<ItemType> {
    let calls = templates(text);
    let mut typed = calls
        .iter()
        .filter_map(|call| tables.template_type(&call.name).map(|kind| (call, kind)));
    let (first_call, kind) = typed.next()?;
    if typed.any(|(_, other)| other != kind) {
        return Some(ItemType::Unknown);
    }
    if *kind == ItemType::Sense {
        return Some(ItemType::Sense);
    }
    if calls.len() != 1 || first_call.text != text.trim() {
        return Some(ItemType::Unknown);
    }
    if first_call.name == "zh-x" && first_call.has_param("ref") {
        return Some(ItemType::Quote);
    }
    Some(kind.clone())
}

/// `{{R:...}}` and `{{RQ:...}}` reference templates cite a source
pub fn citation_shorthand(_tree: &ListTree, _id: ItemId, text: &str, _tables: &Tables) -> Option<ItemType> {
    regex_lazy!(r"^\s*\{\{\s*(?:R|RQ):")
        .is_match(text)
        .then_some(ItemType::Quote)
}

/// A citation line opening with a bold year, ordinal century, or date template
pub fn bare_quote(_tree: &ListTree, _id: ItemId, text: &str, _tables: &Tables) -> Option<ItemType> {
    let re = regex_lazy!(
        r"(?x)
        ^\s*
        (?:<!--.*?-->\s*)?
        (?:
            (?:'''\s*)?
            \{\{\s*(?:c\.|circa|circa2|a\.|ante|post|rfdate|rfdatek)\s*\|
          |
            (?:circa|early|late|mid|ca\.?|c\.?|a\.?)?\s*
            '''\s*
            (?:circa|early|late|mid|ca\.?|c\.?|a\.?)?\s*
            (?:\d{1,2}(?:st|nd|rd|th)|(?:1\d|20)\d{2})
        )"
    );
    re.is_match(text).then_some(ItemType::BareQuote)
}

/// Apostrophe runs as (start, length)
fn apostrophe_runs(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'\'' {
                i += 1;
            }
            if i - start >= 2 {
                runs.push((start, i - start));
            }
        } else {
            i += 1;
        }
    }
    runs
}

/// Number of bold toggles, or `None` if a link sits inside bold text
fn bold_markers(text: &str) -> Option<usize> {
    let mut bold = false;
    let mut markers = 0;
    let mut last = 0;
    for (start, len) in apostrophe_runs(text) {
        if bold && text[last..start].contains("[[") {
            return None;
        }
        if len >= 3 {
            bold = !bold;
            markers += 1;
        }
        last = start + len;
    }
    if bold && text[last..].contains("[[") {
        return None;
    }
    Some(markers)
}

/// A translation under a bare example: balanced bold, sentence case, final punctuation
fn is_translation(tree: &ListTree, id: ItemId) -> bool {
    let item = &tree[id];
    if !item.children.is_empty() {
        return false;
    }
    let text = item.data.trim();
    let balanced = bold_markers(text).is_some_and(|markers| markers >= 2 && markers % 2 == 0);
    let sentence_case = text
        .chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase);
    let closing = text.trim_end_matches(['\'', '"', '“', '”', '‘', '’', ' ']);
    let terminated = closing.ends_with(['.', '!', '?', '…']);
    balanced && sentence_case && terminated
}

/// An italic sentence with a bolded headword is an unlabeled usage example
pub fn bare_ux(tree: &ListTree, id: ItemId, text: &str, _tables: &Tables) -> Option<ItemType> {
    let data = text.trim();
    if data.len() < 4 || !data.starts_with("''") || !data.ends_with("''") {
        return None;
    }
    let lead = data.bytes().take_while(|&b| b == b'\'').count();
    if lead == 3 || lead == 4 {
        return None;
    }
    if bold_markers(data)? < 2 {
        return None;
    }
    match tree[id].children.as_slice() {
        [] => Some(ItemType::BareUx),
        [only] if is_translation(tree, *only) => Some(ItemType::BareUx),
        _ => None,
    }
}

/// Type of a single item, ignoring its siblings
pub fn classify(tree: &ListTree, id: ItemId, tables: &Tables) -> ItemType {
    let text = strip_decorations(&tree[id].data, tables);
    for (name, rule) in RULES {
        if let Some(item_type) = rule(tree, id, &text, tables) {
            log::trace!("{} is {item_type} by the {name} rule", tree[id].name);
            return item_type;
        }
    }
    ItemType::Unknown
}

/// Classify every item, then promote linked glosses
pub fn assign_types(tree: &mut ListTree, tables: &Tables) {
    let mut types = Vec::with_capacity(tree.items.len());
    for index in 0..tree.items.len() {
        types.push(classify(tree, ItemId(index), tables));
    }
    for (item, item_type) in tree.items.iter_mut().zip(types) {
        item.item_type = item_type;
    }
    promote_linked_senses(tree);
}

/// In a group made only of senses and unknowns, unknown lines that carry a
/// wikilink are plain glosses
fn promote_linked_senses(tree: &mut ListTree) {
    for group in tree.sibling_groups() {
        let eligible = group.iter().all(|&id| {
            let item = &tree[id];
            match item.item_type {
                ItemType::Sense => true,
                ItemType::Unknown => item.data.contains("[["),
                _ => false,
            }
        });
        if !eligible {
            continue;
        }
        for id in group {
            let item = &mut tree.items[id.0];
            if item.item_type == ItemType::Unknown {
                item.item_type = ItemType::Sense;
            }
        }
    }
}
