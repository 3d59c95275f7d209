//! Lines that are pure category or topline markup.

use crate::config::Tables;
use crate::regex_lazy;
use std::borrow::Cow;
use std::sync::LazyLock;

fn strip_comments(line: &str) -> Cow<'_, str> {
    regex_lazy!(r"(?s)<!--.*?-->").replace_all(line, "")
}

/// True when the line holds at least one category and nothing else but
/// whitespace and comments
pub fn is_category(line: &str, tables: &Tables) -> bool {
    let stripped = strip_comments(line);
    let remainder = tables.categories.replace_all(&stripped, "");
    remainder != stripped && remainder.trim().is_empty()
}

/// Name of the first topline template if the line holds nothing else
pub fn topline_name(line: &str, tables: &Tables) -> Option<String> {
    let stripped = strip_comments(line);
    let remainder = tables.toplines.replace_all(&stripped, "");
    if remainder == stripped || !remainder.trim().is_empty() {
        return None;
    }
    tables
        .toplines
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_category() {
        let tables = Tables::global();
        assert!(is_category("[[Category:en:Trees]]", tables));
        assert!(is_category("{{c|en|Trees}}", tables));
        assert!(!is_category("# {{c|en|Trees}}", tables));
        assert!(!is_category("[[Category:en:Trees]] text", tables));
        assert!(is_category("[[Category:en:Trees]] <!--text-->", tables));
        assert!(!is_category("<!-- [[Category:en:Trees]] -->", tables));
        assert!(is_category("   [[Category:en:Trees]]    {{c|en|Trees}}   ", tables));
    }

    #[test]
    fn test_topline_name() {
        let tables = Tables::global();
        assert_eq!(topline_name("{{rfd|en}}", tables).as_deref(), Some("rfd"));
        assert_eq!(topline_name("{{ hot word |en}} <!-- x -->", tables).as_deref(), Some("hot word"));
        assert_eq!(topline_name("{{rfd|en}} text", tables), None);
        assert_eq!(topline_name("{{rfdef|en}}", tables), None);
    }
}
