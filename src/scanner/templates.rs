use super::automaton::{Lexer, Signal};
use super::ops::split;
use super::state::ScanOptions;
use crate::regex_lazy;
use std::ops::Range;
use std::sync::LazyLock;

/// A complete, outermost `{{...}}` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCall<'a> {
    pub name: String,
    pub span: Range<usize>,
    /// Source text including the braces
    pub text: &'a str,
}

impl<'a> TemplateCall<'a> {
    /// Text between the braces
    pub fn body(&self) -> &'a str {
        &self.text[2..self.text.len() - 2]
    }

    /// Parameters after the name, split on pipes that are not nested in
    /// other markup
    pub fn params(&self) -> Vec<&'a str> {
        let pipe = regex_lazy!(r"\|");
        let mut pieces = split(pipe, self.body(), &ScanOptions::default());
        pieces.remove(0);
        pieces
    }

    /// Whether a `key=value` parameter with this key is present
    pub fn has_param(&self, key: &str) -> bool {
        self.params()
            .iter()
            .any(|param| param.split_once('=').is_some_and(|(name, _)| name.trim() == key))
    }
}

/// Outermost complete template calls in `text`, in document order.
///
/// Templates inside comments, `<nowiki>`, `<pre>` or `<math>` are not
/// calls; an unclosed template yields nothing.
pub fn templates(text: &str) -> Vec<TemplateCall<'_>> {
    let mut calls = Vec::new();
    let mut lexer = Lexer::new(text);
    let mut open: Option<(usize, String)> = None;

    while let Some(step) = lexer.next_step() {
        match step.signal {
            Signal::TemplateOpen if lexer.state().template_depth() == 1 => {
                let name = lexer
                    .state()
                    .templates
                    .first()
                    .map(|template| template.name.clone())
                    .unwrap_or_default();
                open = Some((step.start, name));
            }
            Signal::TemplateClose if lexer.state().template_depth() == 0 => {
                if let Some((start, name)) = open.take() {
                    calls.push(TemplateCall {
                        name,
                        span: start..step.end,
                        text: &text[start..step.end],
                    });
                }
            }
            _ => {}
        }
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outermost_calls_only() {
        let calls = templates("a {{syn|en|{{l|en|x}}}} b {{ux|en|y}}");
        let names: Vec<_> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["syn", "ux"]);
        assert_eq!(calls[0].text, "{{syn|en|{{l|en|x}}}}");
    }

    #[test]
    fn test_commented_and_unclosed_templates_ignored() {
        assert!(templates("<!-- {{syn|en|x}} -->").is_empty());
        assert!(templates("{{syn|en|x").is_empty());
    }

    #[test]
    fn test_params_split_at_top_level() {
        let calls = templates("{{zh-x|[[a|b]]|{{l|c|d}}|ref=Foo}}");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params(), vec!["[[a|b]]", "{{l|c|d}}", "ref=Foo"]);
        assert!(calls[0].has_param("ref"));
        assert!(!calls[0].has_param("tr"));
    }
}
