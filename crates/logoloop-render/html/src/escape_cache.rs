use std::borrow::Cow;
use std::rc::Rc;

use logoloop_core::collections::map::HashMap;

pub const ESCAPE_CACHE_INITIAL_CAPACITY: usize = 128;
pub const ESCAPE_CACHE_MAX_CAPACITY: usize = 4096;

/// Which characters need escaping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EscapeMode {
    /// Text content: `&`, `<`, `>`.
    Text,
    /// Double-quoted attribute values: additionally `"`.
    Attribute,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct EscapeCacheKey {
    text: String,
    mode: EscapeMode,
}

impl EscapeCacheKey {
    pub fn new(text: &str, mode: EscapeMode) -> Self {
        Self {
            text: text.to_string(),
            mode,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> EscapeMode {
        self.mode
    }
}

pub fn escape(text: &str, mode: EscapeMode) -> Cow<'_, str> {
    let needs_escape = |c: char| {
        matches!(c, '&' | '<' | '>') || (mode == EscapeMode::Attribute && c == '"')
    };
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if mode == EscapeMode::Attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escaped fragments keyed by source text and mode.
///
/// Strings that need no escaping are never stored. The cache is cleared
/// wholesale when it reaches [`ESCAPE_CACHE_MAX_CAPACITY`].
#[derive(Debug)]
pub struct EscapeCache {
    entries: HashMap<EscapeCacheKey, Rc<str>>,
    hits: u64,
    misses: u64,
}

impl Default for EscapeCache {
    fn default() -> Self {
        let mut entries = HashMap::default();
        entries.reserve(ESCAPE_CACHE_INITIAL_CAPACITY);
        Self {
            entries,
            hits: 0,
            misses: 0,
        }
    }
}

impl EscapeCache {
    pub fn escape(&mut self, text: &str, mode: EscapeMode) -> Rc<str> {
        let escaped = match escape(text, mode) {
            Cow::Borrowed(text) => return Rc::from(text),
            Cow::Owned(escaped) => escaped,
        };
        let key = EscapeCacheKey::new(text, mode);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;
        if self.entries.len() >= ESCAPE_CACHE_MAX_CAPACITY {
            log::trace!("escape cache full, clearing {} entries", self.entries.len());
            self.entries.clear();
        }
        let value: Rc<str> = Rc::from(escaped);
        self.entries.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape("plain", EscapeMode::Text), Cow::Borrowed(_)));
        assert_eq!(escape("a\"b", EscapeMode::Text), "a\"b");
        assert_eq!(escape("a\"b", EscapeMode::Attribute), "a&quot;b");
    }

    #[test]
    fn test_cache_hits_on_repeat() {
        let mut cache = EscapeCache::default();
        cache.escape("Tom & Jerry", EscapeMode::Text);
        cache.escape("Tom & Jerry", EscapeMode::Text);
        cache.escape("Tom & Jerry", EscapeMode::Attribute);
        cache.escape("no escaping", EscapeMode::Text);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
    }
}
