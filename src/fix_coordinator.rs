//! Whole-page normalization.
//!
//! A page is parsed into sections, every part-of-speech list is rebuilt
//! from its normalized items, and the result is parsed again until the
//! text stops changing.

use crate::config::Tables;
use crate::diagnostics::{ChangeLog, DiagnosticsSink, LogEntry, reborrow};
use crate::pos::{is_pos_title, parse_pos_with};
use crate::sections::{Document, parse_with};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Passes before giving up on a page that keeps changing
const MAX_ITERATIONS: usize = 10;

/// Outcome of normalizing one page
#[derive(Debug, Clone)]
pub struct FixResult {
    /// Normalized page text
    pub text: String,
    /// Every normalization applied, in first-seen order
    pub changes: ChangeLog,
    /// Number of parse passes performed
    pub iterations: usize,
    /// Whether the final pass reproduced its input
    pub converged: bool,
    /// False when the page ends inside unclosed markup; such pages are
    /// reported but never rewritten
    pub safe: bool,
}

impl FixResult {
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Calculate hash of content for convergence detection
fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Normalize the definition lists of every part-of-speech section.
///
/// Returns the number of sections whose content was replaced.
pub fn normalize_lists(doc: &mut Document, tables: &Tables, mut sink: Option<&mut dyn DiagnosticsSink>) -> usize {
    let targets = doc.filter_sections(doc.root(), true, |section| is_pos_title(section.title()));

    let mut fixed = 0;
    for id in targets {
        let pos = parse_pos_with(doc, id, tables, reborrow(&mut sink));
        if pos.changes.is_empty() {
            continue;
        }
        log::debug!("'{}': {}", doc.path(id), pos.changelog());
        doc.changes.extend(&pos.changes);
        doc.replace_content(id, pos.lines());
        fixed += 1;
    }
    fixed
}

/// Parse, normalize and re-render `text` until it stops changing.
///
/// Diagnostics are reported from the first pass only. Returns `None` when
/// the page is unsafe and no sink was supplied.
pub fn fix_page(
    text: &str,
    title: &str,
    tables: &Tables,
    mut sink: Option<&mut dyn DiagnosticsSink>,
) -> Option<FixResult> {
    let mut doc = parse_with(text, title, tables, reborrow(&mut sink))?;
    let mut discarded: Vec<LogEntry> = Vec::new();

    if !doc.is_safe() {
        log::warn!("'{title}' ends inside unclosed markup; leaving it unchanged");
        return Some(FixResult {
            text: text.to_string(),
            changes: ChangeLog::new(),
            iterations: 1,
            converged: true,
            safe: false,
        });
    }

    let mut changes = ChangeLog::new();
    let mut history = vec![hash_content(text)];
    let mut current = text.to_string();
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let pass_sink = if iterations == 1 { reborrow(&mut sink) } else { None };
        normalize_lists(&mut doc, tables, pass_sink);
        changes.extend(doc.changes());
        let rendered = doc.to_string();
        let rendered_hash = hash_content(&rendered);

        if history.last() == Some(&rendered_hash) {
            return Some(FixResult {
                text: rendered,
                changes,
                iterations,
                converged: true,
                safe: true,
            });
        }
        if history.contains(&rendered_hash) {
            log::warn!("'{title}' oscillates between normalized forms");
            return Some(FixResult {
                text: rendered,
                changes,
                iterations,
                converged: false,
                safe: true,
            });
        }
        history.push(rendered_hash);
        current = rendered;

        discarded.clear();
        doc = parse_with(&current, title, tables, Some(&mut discarded))?;
    }

    log::warn!("'{title}' still changing after {MAX_ITERATIONS} passes");
    Some(FixResult {
        text: current,
        changes,
        iterations,
        converged: false,
        safe: true,
    })
}
