use super::automaton::Tracker;
use super::state::{ScanOptions, ScanState};
use crate::utils::regex_cache::get_cached_regex;
use regex::{Captures, Match, Regex};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised for unusable `replace` patterns
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("lookaround is not supported in scoped patterns: {0}")]
    Lookaround(String),
    #[error("invalid pattern: {0}")]
    Invalid(#[from] regex::Error),
}

/// Replacement text for [`replace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement<'r> {
    /// Inserted as-is
    Literal(&'r str),
    /// `$1` / `${name}` references are expanded from the match's captures
    Expand(&'r str),
}

/// Lazy iterator over the matches a scoped scan accepts
pub struct ScopedMatches<'a> {
    inner: regex::Matches<'a, 'a>,
    tracker: Tracker<'a>,
    invert: bool,
}

impl<'a> ScopedMatches<'a> {
    /// Scanner state at the end of the text
    pub fn finish(self) -> ScanState {
        self.tracker.finish()
    }
}

impl<'a> Iterator for ScopedMatches<'a> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for found in self.inner.by_ref() {
            if self.tracker.matchable_at(found.start()) != self.invert {
                return Some(found);
            }
        }
        None
    }
}

struct ScopedCaptures<'a> {
    inner: regex::CaptureMatches<'a, 'a>,
    tracker: Tracker<'a>,
    invert: bool,
}

impl<'a> Iterator for ScopedCaptures<'a> {
    type Item = Captures<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for caps in self.inner.by_ref() {
            let start = caps.get(0).map_or(0, |m| m.start());
            if self.tracker.matchable_at(start) != self.invert {
                return Some(caps);
            }
        }
        None
    }
}

/// Every match of `regex` in `text` that lies outside the constructs
/// `options` marks as opaque, or only those inside them when
/// `options.invert` is set.
pub fn scan<'a>(regex: &'a Regex, text: &'a str, options: &'a ScanOptions) -> ScopedMatches<'a> {
    ScopedMatches {
        inner: regex.find_iter(text),
        tracker: Tracker::new(text, options),
        invert: options.invert,
    }
}

/// Split `text` at every accepted match of `separator`.
///
/// A separator that looks like the opener of an excluded construct (`{{`)
/// can still split on the opener's first byte.
pub fn split<'a>(separator: &Regex, text: &'a str, options: &ScanOptions) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    let mut tracker = Tracker::new(text, options);
    for found in separator.find_iter(text) {
        if tracker.matchable_at(found.start()) == options.invert {
            continue;
        }
        pieces.push(&text[last..found.start()]);
        last = found.end();
    }
    pieces.push(&text[last..]);
    pieces
}

/// Reject patterns the scanner cannot honor, then compile through the cache
pub fn compile(pattern: &str) -> Result<Arc<Regex>, PatternError> {
    if let Some(at) = find_lookaround(pattern) {
        return Err(PatternError::Lookaround(pattern[at..].chars().take(16).collect()));
    }
    Ok(get_cached_regex(pattern)?)
}

const LOOKAROUND_GROUPS: [&[u8]; 4] = [b"?=", b"?!", b"?<=", b"?<!"];

fn find_lookaround(pattern: &str) -> Option<usize> {
    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'[' => i = class_end(bytes, i),
            b'(' => {
                let rest = &bytes[i + 1..];
                if LOOKAROUND_GROUPS.iter().any(|group| rest.starts_with(group)) {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Index just past the `]` closing the character class opened at `start`
fn class_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    if bytes.get(i) == Some(&b'^') {
        i += 1;
    }
    // A `]` right after the opening bracket is literal
    if bytes.get(i) == Some(&b']') {
        i += 1;
    }
    let mut depth = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Replace every accepted match of `pattern`.
pub fn replace(
    pattern: &str,
    replacement: Replacement<'_>,
    text: &str,
    options: &ScanOptions,
) -> Result<String, PatternError> {
    let regex = compile(pattern)?;
    Ok(replace_regex(&regex, replacement, text, options))
}

/// [`replace`] for an already compiled pattern
pub fn replace_regex(regex: &Regex, replacement: Replacement<'_>, text: &str, options: &ScanOptions) -> String {
    let captures = ScopedCaptures {
        inner: regex.captures_iter(text),
        tracker: Tracker::new(text, options),
        invert: options.invert,
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in captures {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        match replacement {
            Replacement::Literal(literal) => out.push_str(literal),
            Replacement::Expand(template) => caps.expand(template, &mut out),
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::state::TemplateMatch;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).expect("test pattern")
    }

    #[test]
    fn test_scan_skips_template_bodies() {
        let regex = re("x");
        let options = ScanOptions::default();
        let found: Vec<_> = scan(&regex, "x {{t|x}} x", &options).map(|m| m.start()).collect();
        assert_eq!(found, vec![0, 10]);
    }

    #[test]
    fn test_scan_named_templates() {
        let regex = re("x");
        let options = ScanOptions {
            templates: TemplateMatch::named(["ok"]),
            ..ScanOptions::default()
        };
        let found: Vec<_> = scan(&regex, "{{ok|x}} {{no|x}} {{ok|{{no|x}}}}", &options)
            .map(|m| m.start())
            .collect();
        assert_eq!(found, vec![5]);
    }

    #[test]
    fn test_scan_inverted_finds_trapped_matches() {
        let regex = re("x");
        let options = ScanOptions::default().inverted();
        let found: Vec<_> = scan(&regex, "x <!-- x --> x", &options).map(|m| m.start()).collect();
        assert_eq!(found, vec![7]);
    }

    #[test]
    fn test_split_respects_templates() {
        let regex = re(r"\|");
        let options = ScanOptions::default();
        assert_eq!(split(&regex, "a|{{b|c}}|d", &options), vec!["a", "{{b|c}}", "d"]);
    }

    #[test]
    fn test_split_on_opener_first_byte() {
        let regex = re(r"\{\{");
        let options = ScanOptions::default();
        assert_eq!(split(&regex, "a{{b}}c", &options), vec!["a", "b}}c"]);
    }

    #[test]
    fn test_replace_literal_and_expand() {
        let options = ScanOptions::default();
        let out = replace(r"(\w+)!", Replacement::Expand("<$1>"), "hi! {{t|no!}}", &options).expect("valid");
        assert_eq!(out, "<hi> {{t|no!}}");
        let out = replace("o", Replacement::Literal("0"), "foo [[boo]] <!--o-->", &ScanOptions::default())
            .expect("valid");
        assert_eq!(out, "f00 [[boo]] <!--o-->");
    }

    #[test]
    fn test_replace_rejects_lookaround() {
        let options = ScanOptions::default();
        assert!(matches!(
            replace(r"a(?=b)", Replacement::Literal(""), "ab", &options),
            Err(PatternError::Lookaround(_))
        ));
        assert!(matches!(
            replace(r"(?<!a)b", Replacement::Literal(""), "ab", &options),
            Err(PatternError::Lookaround(_))
        ));
        assert!(replace(r"(?<name>a)", Replacement::Expand("${name}"), "ab", &options).is_ok());
        assert!(replace(r"\(?=", Replacement::Literal(""), "(=", &options).is_ok());
        assert!(matches!(
            replace(r"(a", Replacement::Literal(""), "ab", &options),
            Err(PatternError::Invalid(_))
        ));
    }
}
