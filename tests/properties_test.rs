//! Property-based tests for the scanner and the section round trip

use proptest::prelude::*;
use regex::Regex;
use wiktparse_lib::scanner::{ScanOptions, scan, split_lines};
use wiktparse_lib::sections::parse;

/// Text built from markup pieces, including unbalanced ones
fn markup_strategy() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "a", "x ", "\n", "{{", "}}", "|", "[[", "]]", "File:", "<!--", "-->", "<ref>", "</ref>", "<nowiki>",
        "</nowiki>", "<pre>", "</pre>", "<math>", "</math>", "{|", "|}", "=", "#", "é",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|pieces| pieces.concat())
}

/// Pages made of whole, well-formed lines
fn page_strategy() -> impl Strategy<Value = String> {
    let lines = prop::sample::select(vec![
        "==English==",
        "==Thai==",
        "===Noun===",
        "===Etymology 1===",
        "====Verb====",
        "",
        "----",
        "# sense",
        "#: {{ux|en|x}}",
        "text",
        "[[Category:en:Trees]]",
        "{{c|en|Trees}}",
        "{{rfd|en}}",
        "{{also|x}}",
    ]);
    (prop::collection::vec(lines, 0..30), any::<bool>()).prop_map(|(lines, trailing)| {
        let mut page = lines.join("\n");
        if trailing {
            page.push('\n');
        }
        page
    })
}

proptest! {
    #[test]
    fn scan_and_inverted_scan_partition_matches(text in markup_strategy()) {
        let regex = Regex::new("a|x|é").unwrap();
        let options = ScanOptions::default();
        let inverted = ScanOptions::default().inverted();

        let mut found: Vec<usize> = scan(&regex, &text, &options).map(|m| m.start()).collect();
        found.extend(scan(&regex, &text, &inverted).map(|m| m.start()));
        found.sort_unstable();

        let all: Vec<usize> = regex.find_iter(&text).map(|m| m.start()).collect();
        prop_assert_eq!(found, all);
    }

    #[test]
    fn split_lines_rejoins_to_source(text in markup_strategy()) {
        let lines: Vec<_> = split_lines(&text).collect();
        for line in &lines {
            prop_assert_eq!(&text[line.span.clone()], line.text);
        }
        let joined = lines.iter().map(|line| line.text).collect::<Vec<_>>().join("\n");
        prop_assert_eq!(joined.as_str(), text.strip_suffix('\n').unwrap_or(&text));
    }

    #[test]
    fn rendering_is_a_fixed_point(page in page_strategy()) {
        let once = parse(&page, "test", None).unwrap().to_string();
        let twice = parse(&once, "test", None).unwrap().to_string();
        prop_assert_eq!(once, twice);
    }
}
