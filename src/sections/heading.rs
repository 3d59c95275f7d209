use crate::regex_lazy;
use std::sync::LazyLock;

/// Deepest heading level; extra `=` beyond it are title text
pub const MAX_LEVEL: usize = 6;

/// A heading line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Heading {
    pub level: usize,
    /// Title including any unbalanced `=` padding
    pub title: String,
    pub count: Option<String>,
    /// Text after the closing `=`, trimmed
    pub trailing: Option<String>,
}

impl Heading {
    pub fn parse(line: &str) -> Option<Self> {
        let re = regex_lazy!(r"^(==+)([^=\n]+)(==+)[ \t]*(?s:(.*?))\s*$");
        let caps = re.captures(line)?;
        let (lead, trail) = (caps[1].len(), caps[3].len());
        let level = lead.min(trail).min(MAX_LEVEL);
        let lpad = "=".repeat(lead - level);
        let rpad = "=".repeat(trail - level);

        let (inner, count) = split_count(caps[2].trim());
        let trailing = caps.get(4).map(|m| m.as_str()).filter(|text| !text.is_empty());

        Some(Self {
            level,
            title: format!("{lpad}{inner}{rpad}"),
            count: count.map(str::to_string),
            trailing: trailing.map(str::to_string),
        })
    }
}

/// Split `Etymology 2` into the title and its numeric disambiguator
fn split_count(title: &str) -> (&str, Option<&str>) {
    let re = regex_lazy!(r"^(.*?)(?:\s+(\d+))?$");
    match re.captures(title) {
        Some(caps) => {
            let inner = caps.get(1).map_or(title, |m| m.as_str());
            (inner, caps.get(2).map(|m| m.as_str()))
        }
        None => (title, None),
    }
}

/// Canonical heading line for a section
pub(crate) fn render(level: usize, title: &str, count: Option<&str>) -> String {
    let marks = "=".repeat(level);
    match count {
        Some(count) => format!("{marks}{title} {count}{marks}"),
        None => format!("{marks}{title}{marks}"),
    }
}

/// Whether the text after a heading is nothing but one HTML comment
pub(crate) fn is_comment(text: &str) -> bool {
    regex_lazy!(r"^(?s)<!--.*-->$").is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_heading() {
        let heading = Heading::parse("===Noun===").unwrap();
        assert_eq!(heading.level, 3);
        assert_eq!(heading.title, "Noun");
        assert_eq!(heading.count, None);
        assert_eq!(heading.trailing, None);
    }

    #[test]
    fn test_unbalanced_padding_kept_in_title() {
        let heading = Heading::parse("=== Noun  ======= <!-- c -->").unwrap();
        assert_eq!(heading.level, 3);
        assert_eq!(heading.title, "Noun====");
        assert_eq!(heading.trailing.as_deref(), Some("<!-- c -->"));
        assert_eq!(render(heading.level, &heading.title, None), "===Noun=======");
    }

    #[test]
    fn test_count() {
        let heading = Heading::parse("===Etymology 2===").unwrap();
        assert_eq!(heading.title, "Etymology");
        assert_eq!(heading.count.as_deref(), Some("2"));
        assert_eq!(render(3, "Etymology", Some("2")), "===Etymology 2===");

        let heading = Heading::parse("===1984===").unwrap();
        assert_eq!(heading.title, "1984");
        assert_eq!(heading.count, None);
    }

    #[test]
    fn test_level_capped() {
        let heading = Heading::parse("========Deep========").unwrap();
        assert_eq!(heading.level, MAX_LEVEL);
        assert_eq!(heading.title, "==Deep==");
    }

    #[test]
    fn test_not_headings() {
        assert!(Heading::parse("=Title=").is_none());
        assert!(Heading::parse("# ==x==").is_none());
        assert!(Heading::parse("====").is_none());
    }

    #[test]
    fn test_trailing_comment_detection() {
        assert!(is_comment("<!-- a -->"));
        assert!(!is_comment("<!-- a --> b"));
    }
}
