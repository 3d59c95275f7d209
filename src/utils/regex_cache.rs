//! Cached regex compilation for patterns that only become known at runtime.
//!
//! Scoped `replace` calls take caller-supplied pattern strings; they go
//! through the global cache here so a pattern used once per page is not
//! recompiled for every page of a dump.
//!
//! # Usage
//!
//! - Use [`get_cached_regex`] for patterns that come from callers.
//! - Use the `regex_lazy!` macro for fixed patterns written in the source.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

/// Compiled patterns keyed by their source
#[derive(Debug, Default)]
struct RegexCache {
    cache: HashMap<String, Arc<Regex>>,
}

impl RegexCache {
    /// Get or compile a regex pattern
    fn get_regex(&mut self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Some(regex) = self.cache.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Arc::new(Regex::new(pattern)?);
        self.cache.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    fn clear(&mut self) {
        self.cache.clear();
    }
}

static GLOBAL_REGEX_CACHE: LazyLock<Mutex<RegexCache>> = LazyLock::new(|| Mutex::new(RegexCache::default()));

/// Get a regex from the global cache
///
/// A poisoned mutex is recovered by clearing the cache, so a panic in one
/// worker thread never takes pattern compilation down for the others.
pub fn get_cached_regex(pattern: &str) -> Result<Arc<Regex>, regex::Error> {
    let mut cache = GLOBAL_REGEX_CACHE.lock().unwrap_or_else(|poisoned| {
        let mut guard = poisoned.into_inner();
        guard.clear();
        guard
    });
    cache.get_regex(pattern)
}

/// Lazily-initialized static regex for a pattern literal.
///
/// # Panics
///
/// Panics on first use if the pattern is invalid. Only use it with
/// patterns written in the source.
///
/// # Example
///
/// ```
/// use std::sync::LazyLock;
/// use wiktparse_lib::regex_lazy;
/// let heading = regex_lazy!(r"^==+[^=]+==+$");
/// assert!(heading.is_match("===Noun==="));
/// ```
#[macro_export]
macro_rules! regex_lazy {
    ($pattern:expr) => {{
        static REGEX: LazyLock<regex::Regex> =
            LazyLock::new(|| regex::Regex::new($pattern).expect("static regex pattern must compile"));
        &*REGEX
    }};
}
