//! The signal-token automaton behind every scoped operation.
//!
//! [`Lexer`] walks the text once, left to right, recognizing only the
//! tokens that open or close a construct and updating a [`ScanState`].
//! [`Tracker`] layers a [`ScanOptions`] on top and answers "is a match
//! starting at this offset allowed?" for monotonically increasing offsets.
//!
//! Precedence, highest first:
//! 1. an open comment, `<pre>` or `<math>` swallows everything until its close
//! 2. `<!--` opens a comment anywhere else, including inside `<nowiki>`
//! 3. `<nowiki>`, `<ref>`, `<math>`, `<pre>` tags (case-insensitive, whitespace tolerant)
//! 4. `{|` / `|}` tables
//! 5. `{{` / `}}` templates, kept on a stack
//! 6. `[[` links; File:/Image:/Media:/Special: targets make a special link
//! 7. `|` and `]]` inside an ordinary link

use super::state::{
    Exclusive, ExclusiveKind, LinkPart, Nested, OpenLink, OpenTemplate, ScanOptions, ScanState,
};

const SPECIAL_PREFIXES: [&str; 4] = ["file:", "image:", "media:", "special:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    Nowiki,
    Ref,
    Math,
    Pre,
}

impl Tag {
    fn from_name(name: &[u8]) -> Option<Self> {
        if name.eq_ignore_ascii_case(b"nowiki") {
            Some(Tag::Nowiki)
        } else if name.eq_ignore_ascii_case(b"ref") {
            Some(Tag::Ref)
        } else if name.eq_ignore_ascii_case(b"math") {
            Some(Tag::Math)
        } else if name.eq_ignore_ascii_case(b"pre") {
            Some(Tag::Pre)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    CommentOpen,
    CommentClose,
    TagOpen(Tag),
    TagClose(Tag),
    TableOpen,
    TableClose,
    TemplateOpen,
    TemplateClose,
    LinkOpen,
    LinkPipe,
    LinkClose,
    /// Newline inside a link target: the `[[` was not a link after all
    LinkBreak,
    NestedLinkOpen,
    NestedLinkClose,
}

/// Where, relative to its token, a signal changes what is matchable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// Before the token's first byte
    Start,
    /// After the token's first byte: a match may still begin exactly on
    /// an opener, before the construct is recognized
    AfterFirstByte,
    /// After the token's last byte: closers belong to their construct
    End,
}

impl Signal {
    fn boundary(self) -> Boundary {
        match self {
            Signal::CommentOpen
            | Signal::TagOpen(_)
            | Signal::TableOpen
            | Signal::TemplateOpen
            | Signal::LinkOpen
            | Signal::NestedLinkOpen => Boundary::AfterFirstByte,
            Signal::LinkBreak => Boundary::Start,
            Signal::CommentClose
            | Signal::TagClose(_)
            | Signal::TableClose
            | Signal::TemplateClose
            | Signal::LinkPipe
            | Signal::LinkClose
            | Signal::NestedLinkClose => Boundary::End,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub signal: Signal,
    pub start: usize,
    pub end: usize,
}

struct TagToken {
    tag: Tag,
    closing: bool,
    end: usize,
}

/// Parse `<tag ...>` or `</tag>` at `at`; self-closing tags are not signals.
fn parse_tag(text: &str, at: usize) -> Option<TagToken> {
    let bytes = text.as_bytes();
    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut i = skip_ws(at + 1);
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i = skip_ws(i + 1);
    }
    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    let tag = Tag::from_name(&bytes[name_start..i])?;

    if closing {
        let i = skip_ws(i);
        return (bytes.get(i) == Some(&b'>')).then_some(TagToken {
            tag,
            closing,
            end: i + 1,
        });
    }

    match bytes.get(i) {
        Some(b'>') => {
            return Some(TagToken {
                tag,
                closing,
                end: i + 1,
            });
        }
        Some(c) if c.is_ascii_whitespace() || *c == b'/' => {}
        _ => return None,
    }

    let rest = &text[i..];
    let stop = rest.find(['>', '<'])?;
    if !rest[stop..].starts_with('>') {
        return None;
    }
    if rest[..stop].trim_end().ends_with('/') {
        return None;
    }
    Some(TagToken {
        tag,
        closing,
        end: i + stop + 1,
    })
}

/// Name of the template whose body starts at `from`
fn template_name(text: &str, from: usize) -> String {
    let rest = &text[from..];
    let end = rest.find(['|', '}', '{', '\n']).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

fn is_special_target(text: &str, from: usize) -> bool {
    let rest = &text[from..];
    let end = rest.find(['|', ']', '\n']).unwrap_or(rest.len());
    let target = rest[..end].trim_start();
    let target = target.strip_prefix(':').unwrap_or(target).trim_start();
    let bytes = target.as_bytes();
    SPECIAL_PREFIXES
        .iter()
        .any(|prefix| bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Single-pass recognizer of construct boundaries
pub(crate) struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    state: ScanState,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            state: ScanState::default(),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Run to the end of the text and return the final state
    pub fn finish(mut self) -> ScanState {
        while self.next_step().is_some() {}
        self.state
    }

    /// Advance to the next signal token, apply it, and report it
    pub fn next_step(&mut self) -> Option<Step> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            if let Some(exclusive) = self.state.exclusive {
                return self.close_exclusive(exclusive);
            }

            let offset = bytes[self.pos..]
                .iter()
                .position(|b| matches!(b, b'<' | b'{' | b'}' | b'|' | b'[' | b']' | b'\n'));
            let Some(offset) = offset else {
                self.pos = bytes.len();
                break;
            };
            let at = self.pos + offset;

            let found = if self.state.nowiki.is_some() {
                // Only a comment or the closing tag mean anything inside <nowiki>
                if bytes[at] == b'<' { self.lex_angle(at) } else { None }
            } else {
                match bytes[at] {
                    b'<' => self.lex_angle(at),
                    b'{' => self.lex_open_brace(at),
                    b'}' => self.lex_close_brace(at),
                    b'|' => self.lex_pipe(at),
                    b'[' => self.lex_open_bracket(at),
                    b']' => self.lex_close_bracket(at),
                    _ => self.lex_newline(at),
                }
            };

            match found {
                Some((signal, end)) => {
                    self.pos = end;
                    self.apply(signal, at, end);
                    return Some(Step { signal, start: at, end });
                }
                None => self.pos = at + 1,
            }
        }
        None
    }

    fn close_exclusive(&mut self, exclusive: Exclusive) -> Option<Step> {
        let rest = &self.text[self.pos..];
        let found = match exclusive.kind {
            ExclusiveKind::Comment => rest
                .find("-->")
                .map(|i| (Signal::CommentClose, self.pos + i, self.pos + i + 3)),
            ExclusiveKind::Pre => self.find_close_tag(Tag::Pre),
            ExclusiveKind::Math => self.find_close_tag(Tag::Math),
        };
        match found {
            Some((signal, start, end)) => {
                self.pos = end;
                self.state.exclusive = None;
                Some(Step { signal, start, end })
            }
            None => {
                self.pos = self.text.len();
                None
            }
        }
    }

    fn find_close_tag(&self, tag: Tag) -> Option<(Signal, usize, usize)> {
        let mut from = self.pos;
        while let Some(offset) = self.text[from..].find('<') {
            let at = from + offset;
            if let Some(token) = parse_tag(self.text, at)
                && token.closing
                && token.tag == tag
            {
                return Some((Signal::TagClose(tag), at, token.end));
            }
            from = at + 1;
        }
        None
    }

    fn lex_angle(&self, at: usize) -> Option<(Signal, usize)> {
        if self.text[at..].starts_with("<!--") {
            return Some((Signal::CommentOpen, at + 4));
        }
        let token = parse_tag(self.text, at)?;
        if self.state.nowiki.is_some() {
            return (token.closing && token.tag == Tag::Nowiki).then_some((Signal::TagClose(Tag::Nowiki), token.end));
        }
        if token.closing {
            let open = match token.tag {
                Tag::Nowiki => self.state.nowiki.is_some(),
                Tag::Ref => self.state.reference.is_some(),
                // Exclusive closers are only found by close_exclusive
                Tag::Math | Tag::Pre => false,
            };
            return open.then_some((Signal::TagClose(token.tag), token.end));
        }
        if token.tag == Tag::Ref && self.state.reference.is_some() {
            return None;
        }
        Some((Signal::TagOpen(token.tag), token.end))
    }

    fn lex_open_brace(&self, at: usize) -> Option<(Signal, usize)> {
        let bytes = self.text.as_bytes();
        match bytes.get(at + 1) {
            Some(b'{') => Some((Signal::TemplateOpen, at + 2)),
            Some(b'|') if self.state.table.is_none() && (at == 0 || bytes[at - 1] != b'{') => {
                Some((Signal::TableOpen, at + 2))
            }
            _ => None,
        }
    }

    fn lex_close_brace(&self, at: usize) -> Option<(Signal, usize)> {
        let closes = self.text.as_bytes().get(at + 1) == Some(&b'}') && !self.state.templates.is_empty();
        closes.then_some((Signal::TemplateClose, at + 2))
    }

    fn lex_pipe(&self, at: usize) -> Option<(Signal, usize)> {
        let depth = self.state.templates.len();
        if self.text.as_bytes().get(at + 1) == Some(&b'}')
            && let Some(table) = self.state.table
            && table.depth == depth
        {
            return Some((Signal::TableClose, at + 2));
        }
        match self.state.link {
            Some(link) if link.part == LinkPart::Target && link.depth == depth && link.nested == 0 => {
                Some((Signal::LinkPipe, at + 1))
            }
            _ => None,
        }
    }

    fn lex_open_bracket(&self, at: usize) -> Option<(Signal, usize)> {
        if self.text.as_bytes().get(at + 1) != Some(&b'[') {
            return None;
        }
        match self.state.link {
            None => Some((Signal::LinkOpen, at + 2)),
            Some(link) if link.special && link.depth == self.state.templates.len() => {
                Some((Signal::NestedLinkOpen, at + 2))
            }
            // Links do not stack
            Some(_) => None,
        }
    }

    fn lex_close_bracket(&self, at: usize) -> Option<(Signal, usize)> {
        if self.text.as_bytes().get(at + 1) != Some(&b']') {
            return None;
        }
        match self.state.link {
            Some(link) if link.depth == self.state.templates.len() => {
                if link.special && link.nested > 0 {
                    Some((Signal::NestedLinkClose, at + 2))
                } else {
                    Some((Signal::LinkClose, at + 2))
                }
            }
            _ => None,
        }
    }

    fn lex_newline(&self, at: usize) -> Option<(Signal, usize)> {
        match self.state.link {
            Some(link) if link.part == LinkPart::Target && link.depth == self.state.templates.len() => {
                Some((Signal::LinkBreak, at + 1))
            }
            _ => None,
        }
    }

    fn apply(&mut self, signal: Signal, start: usize, end: usize) {
        let state = &mut self.state;
        match signal {
            Signal::CommentOpen => {
                state.exclusive = Some(Exclusive {
                    kind: ExclusiveKind::Comment,
                    start,
                })
            }
            Signal::TagOpen(Tag::Pre) => {
                state.exclusive = Some(Exclusive {
                    kind: ExclusiveKind::Pre,
                    start,
                })
            }
            Signal::TagOpen(Tag::Math) => {
                state.exclusive = Some(Exclusive {
                    kind: ExclusiveKind::Math,
                    start,
                })
            }
            Signal::TagOpen(Tag::Nowiki) => state.nowiki = Some(start),
            Signal::TagOpen(Tag::Ref) => state.reference = Some(start),
            Signal::TagClose(Tag::Nowiki) => state.nowiki = None,
            Signal::TagClose(Tag::Ref) => state.reference = None,
            Signal::CommentClose | Signal::TagClose(_) => state.exclusive = None,
            Signal::TableOpen => {
                state.table = Some(Nested {
                    start,
                    depth: state.templates.len(),
                })
            }
            Signal::TableClose => state.table = None,
            Signal::TemplateOpen => state.templates.push(OpenTemplate {
                start,
                name: template_name(self.text, end),
            }),
            Signal::TemplateClose => {
                state.templates.pop();
                let depth = state.templates.len();
                // Anything opened inside the template cannot outlive it
                if state.link.is_some_and(|link| link.depth > depth) {
                    state.link = None;
                }
                if state.table.is_some_and(|table| table.depth > depth) {
                    state.table = None;
                }
            }
            Signal::LinkOpen => {
                state.link = Some(OpenLink {
                    start,
                    depth: state.templates.len(),
                    special: is_special_target(self.text, end),
                    part: LinkPart::Target,
                    nested: 0,
                })
            }
            Signal::LinkPipe => {
                if let Some(link) = state.link.as_mut() {
                    link.part = LinkPart::Caption;
                }
            }
            Signal::LinkClose | Signal::LinkBreak => state.link = None,
            Signal::NestedLinkOpen => {
                if let Some(link) = state.link.as_mut() {
                    link.nested += 1;
                }
            }
            Signal::NestedLinkClose => {
                if let Some(link) = state.link.as_mut() {
                    link.nested = link.nested.saturating_sub(1);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    at: usize,
    matchable: bool,
}

/// Answers matchability queries for a fixed set of options
pub(crate) struct Tracker<'a> {
    lexer: Lexer<'a>,
    options: &'a ScanOptions,
    /// One entry per open template: whether its body is matchable
    template_bodies: Vec<bool>,
    opaque_templates: usize,
    matchable: bool,
    pending: Option<Transition>,
    exhausted: bool,
}

impl<'a> Tracker<'a> {
    pub fn new(text: &'a str, options: &'a ScanOptions) -> Self {
        Self {
            lexer: Lexer::new(text),
            options,
            template_bodies: Vec::new(),
            opaque_templates: 0,
            matchable: true,
            pending: None,
            exhausted: false,
        }
    }

    /// Whether a match starting at `offset` lies outside every excluded
    /// construct. Offsets must be queried in non-decreasing order.
    pub fn matchable_at(&mut self, offset: usize) -> bool {
        loop {
            if let Some(transition) = self.pending {
                if transition.at > offset {
                    return self.matchable;
                }
                self.matchable = transition.matchable;
                self.pending = None;
            }
            if self.exhausted {
                return self.matchable;
            }
            match self.lexer.next_step() {
                Some(step) => self.pending = Some(self.transition(step)),
                None => self.exhausted = true,
            }
        }
    }

    pub fn finish(self) -> ScanState {
        self.lexer.finish()
    }

    fn transition(&mut self, step: Step) -> Transition {
        match step.signal {
            Signal::TemplateOpen => {
                let allowed = self
                    .lexer
                    .state()
                    .templates
                    .last()
                    .is_some_and(|template| self.options.templates.allows(&template.name));
                self.template_bodies.push(allowed);
                if !allowed {
                    self.opaque_templates += 1;
                }
            }
            Signal::TemplateClose => {
                if self.template_bodies.pop() == Some(false) {
                    self.opaque_templates -= 1;
                }
            }
            _ => {}
        }

        let at = match step.signal.boundary() {
            Boundary::Start => step.start,
            Boundary::AfterFirstByte => step.start + 1,
            Boundary::End => step.end,
        };
        Transition {
            at,
            matchable: self.compute(),
        }
    }

    fn compute(&self) -> bool {
        let state = self.lexer.state();
        let options = self.options;

        if let Some(exclusive) = state.exclusive {
            let allowed = match exclusive.kind {
                ExclusiveKind::Comment => options.comments,
                ExclusiveKind::Pre => options.pre,
                ExclusiveKind::Math => options.math,
            };
            if !allowed {
                return false;
            }
        }
        if (state.nowiki.is_some() && !options.nowiki)
            || (state.reference.is_some() && !options.refs)
            || (state.table.is_some() && !options.tables)
            || self.opaque_templates > 0
        {
            return false;
        }
        match state.link {
            Some(link) if link.part == LinkPart::Target => false,
            Some(link) if link.special => options.special_links,
            Some(_) => options.links,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(text: &str) -> Vec<Signal> {
        let mut lexer = Lexer::new(text);
        let mut out = Vec::new();
        while let Some(step) = lexer.next_step() {
            out.push(step.signal);
        }
        out
    }

    #[test]
    fn test_parse_tag_variants() {
        assert!(parse_tag("<ref>", 0).is_some_and(|t| t.tag == Tag::Ref && !t.closing));
        assert!(parse_tag("< REF name=\"a\" >", 0).is_some_and(|t| t.tag == Tag::Ref));
        assert!(parse_tag("< / ref >", 0).is_some_and(|t| t.closing && t.end == 9));
        assert!(parse_tag("<ref name=\"a\" />", 0).is_none());
        assert!(parse_tag("<references/>", 0).is_none());
        assert!(parse_tag("<nowiki/>", 0).is_none());
        assert!(parse_tag("<prefix>", 0).is_none());
    }

    #[test]
    fn test_template_stack_and_names() {
        let mut lexer = Lexer::new("{{outer|{{ inner |x}}");
        while lexer.next_step().is_some() {}
        let state = lexer.state().clone();
        assert_eq!(state.templates.len(), 1);
        assert_eq!(state.templates[0].name, "outer");
    }

    #[test]
    fn test_comment_swallows_everything() {
        assert_eq!(
            signals("<!-- {{ [[ <ref> --> }}"),
            vec![Signal::CommentOpen, Signal::CommentClose]
        );
    }

    #[test]
    fn test_pre_swallows_comment_open() {
        let state = Lexer::new("<pre> <!-- </pre> {{x").finish();
        assert!(state.exclusive.is_none());
        assert_eq!(state.template_depth(), 1);
    }

    #[test]
    fn test_comment_opens_inside_nowiki() {
        let state = Lexer::new("<nowiki>{{ <!-- </nowiki>").finish();
        assert!(state.in_comment());
        assert!(state.nowiki.is_some());
        assert!(state.templates.is_empty());
    }

    #[test]
    fn test_pipe_brace_closes_template_not_table() {
        let state = Lexer::new("{|\n| {{t|}}\n").finish();
        assert!(state.table.is_some());
        assert!(state.templates.is_empty());
        let state = Lexer::new("{|\n| {{t|}}\n|}").finish();
        assert!(state.table.is_none());
    }

    #[test]
    fn test_special_link_swallows_nested_links() {
        assert!(is_special_target("[[ :File:x.jpg|thumb]]", 2));
        assert!(is_special_target("[[image:x.png]]", 2));
        assert!(!is_special_target("[[Filer]]", 2));

        let state = Lexer::new("[[File:x.jpg|a [[b]] c").finish();
        let link = state.link.expect("special link still open");
        assert!(link.special);
        assert_eq!(link.nested, 0);
    }

    #[test]
    fn test_link_abandoned_at_newline_in_target() {
        assert_eq!(signals("[[foo\nbar"), vec![Signal::LinkOpen, Signal::LinkBreak]);
        assert!(Lexer::new("[[foo\nbar").finish().link.is_none());
    }

    #[test]
    fn test_tracker_opener_first_byte_is_outside() {
        let options = ScanOptions::default();
        let mut tracker = Tracker::new("a{{b}}c", &options);
        assert!(tracker.matchable_at(0));
        assert!(tracker.matchable_at(1));
        assert!(!tracker.matchable_at(2));
        assert!(!tracker.matchable_at(3));
        assert!(!tracker.matchable_at(4));
        assert!(!tracker.matchable_at(5));
        assert!(tracker.matchable_at(6));
    }

    #[test]
    fn test_tracker_link_target_never_matchable() {
        let options = ScanOptions::transparent();
        let text = "[[target|caption]]";
        let mut tracker = Tracker::new(text, &options);
        assert!(!tracker.matchable_at(text.find("target").unwrap_or(0)));
        assert!(tracker.matchable_at(text.find("caption").unwrap_or(0)));
    }
}
