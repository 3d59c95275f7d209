use pretty_assertions::assert_eq;
use regex::Regex;
use wiktparse_lib::scanner::{
    PatternError, Replacement, ScanOptions, TemplateMatch, compile, replace, scan, split, split_lines, templates,
};

#[test]
fn test_split_lines_keeps_markup_together() {
    let text = "\
{{template}}
==Section==
{{header}}

# blah <ref>
reference
</ref>
<!-- comment
comment -->
{{template|
template}} {{t
|template}}
";
    let lines: Vec<&str> = split_lines(text).map(|line| line.text).collect();
    assert_eq!(
        lines,
        vec![
            "{{template}}",
            "==Section==",
            "{{header}}",
            "",
            "# blah <ref>\nreference\n</ref>",
            "<!-- comment\ncomment -->",
            "{{template|\ntemplate}} {{t\n|template}}",
        ]
    );
}

#[test]
fn test_scan_ignores_markup_by_default() {
    let regex = Regex::new("cat").unwrap();
    let text = "cat <!-- cat --> {{l|en|cat}} <nowiki>cat</nowiki> [[cat]] cat";
    let found: Vec<usize> = scan(&regex, text, &ScanOptions::default()).map(|m| m.start()).collect();
    assert_eq!(found, vec![0, text.len() - 3]);
}

#[test]
fn test_scan_inverted_yields_the_rest() {
    let regex = Regex::new("cat").unwrap();
    let text = "cat <!-- cat --> {{l|en|cat}} cat";
    let inverted = ScanOptions::default().inverted();
    assert_eq!(scan(&regex, text, &inverted).count(), 2);
}

#[test]
fn test_scan_named_templates_only() {
    let regex = Regex::new(r"\bx\b").unwrap();
    let text = "{{ux|en|x}} {{l|en|x}}";
    let options = ScanOptions {
        templates: TemplateMatch::named(["ux"]),
        ..ScanOptions::default()
    };
    let found: Vec<usize> = scan(&regex, text, &options).map(|m| m.start()).collect();
    assert_eq!(found, vec![8]);
}

#[test]
fn test_split_respects_templates() {
    let pipe = Regex::new(r"\|").unwrap();
    assert_eq!(
        split(&pipe, "a|{{b|c}}|d", &ScanOptions::default()),
        vec!["a", "{{b|c}}", "d"]
    );
}

#[test]
fn test_replace_outside_markup() {
    let text = "dog <!-- dog --> {{ux|en|dog}} dog";
    let replaced = replace("(dog)", Replacement::Expand("${1}s"), text, &ScanOptions::default()).unwrap();
    assert_eq!(replaced, "dogs <!-- dog --> {{ux|en|dog}} dogs");

    let replaced = replace("dog", Replacement::Literal("$1"), "dog", &ScanOptions::default()).unwrap();
    assert_eq!(replaced, "$1");
}

#[test]
fn test_lookaround_patterns_rejected() {
    assert!(matches!(compile("dog(?=s)"), Err(PatternError::Lookaround(_))));
    assert!(matches!(compile("(?<!x)dog"), Err(PatternError::Lookaround(_))));
    assert!(matches!(compile(r"\(?=dog"), Ok(_)));
    assert!(matches!(compile("(dog"), Err(PatternError::Invalid(_))));
}

#[test]
fn test_lookaround_text_inside_classes_allowed() {
    assert!(matches!(compile("[(?=]"), Ok(_)));
    assert!(matches!(compile("[^](?<!]+"), Ok(_)));
    assert!(matches!(compile(r"[\](?!]x"), Ok(_)));
    assert!(matches!(compile("[[:alpha:](?=]+"), Ok(_)));
    assert!(matches!(compile("[a](?=b)"), Err(PatternError::Lookaround(_))));
    assert!(matches!(compile("[[a]b](?!c)"), Err(PatternError::Lookaround(_))));
}

#[test]
fn test_template_calls() {
    let text = "{{a|b}} <!-- {{c}} --> {{d|{{e}}|ref=1}} {{open|";
    let calls = templates(text);
    let names: Vec<&str> = calls.iter().map(|call| call.name.as_str()).collect();
    assert_eq!(names, vec!["a", "d"]);

    let d = &calls[1];
    assert_eq!(d.text, "{{d|{{e}}|ref=1}}");
    assert_eq!(&text[d.span.clone()], d.text);
    assert_eq!(d.params(), vec!["{{e}}", "ref=1"]);
    assert!(d.has_param("ref"));
    assert!(!calls[0].has_param("b"));
}
