//! Selector parse cache

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::error::QueryError;
use crate::parser::parse_selector;
use crate::selector::SelectorGroup;

type Entries = HashMap<Box<str>, Arc<SelectorGroup>>;

/// Memo of selector text to parsed selector groups
///
/// Selector literals are typically issued from the same call sites on every
/// frame, so parses are memoized for the life of the cache. Entries are
/// immutable once inserted and selector text never changes meaning, so the
/// cache never invalidates; the entry bound only guards against dynamically
/// generated selector strings.
#[derive(Debug)]
pub struct SelectorCache {
    entries: RwLock<Entries>,
    max_entries: usize,
}

impl SelectorCache {
    /// Default entry bound
    pub const DEFAULT_MAX_ENTRIES: usize = 1024;

    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Fetch the parsed form of `selector`, parsing on a miss
    ///
    /// Racing parses of the same string may both run, but every caller
    /// converges on the first entry inserted. Parse failures are not cached.
    pub fn get_or_parse(&self, selector: &str) -> Result<Arc<SelectorGroup>, QueryError> {
        if let Some(group) = self.read().get(selector) {
            trace!(selector, "selector cache hit");
            return Ok(Arc::clone(group));
        }
        let parsed = Arc::new(parse_selector(selector)?);
        let mut entries = self.write();
        if entries.len() >= self.max_entries && !entries.contains_key(selector) {
            debug!(entries = entries.len(), "selector cache at capacity, clearing");
            entries.clear();
        }
        Ok(Arc::clone(entries.entry(selector.into()).or_insert(parsed)))
    }

    /// Number of cached selectors
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop all cached entries
    pub fn clear(&self) {
        self.write().clear();
    }

    // Entries are immutable, so a lock poisoned by a panicking holder cannot
    // expose a broken invariant; recover the guard instead of panicking.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_parse() {
        let cache = SelectorCache::default();
        let first = cache.get_or_parse("View > .float").unwrap();
        let second = cache.get_or_parse("View > .float").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_selectors_cached_separately() {
        let cache = SelectorCache::default();
        cache.get_or_parse("#a").unwrap();
        cache.get_or_parse("#b").unwrap();
        // byte-identical text is the cache key, whitespace included
        cache.get_or_parse("#a ").unwrap();
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_parse_errors_not_cached() {
        let cache = SelectorCache::default();
        assert!(cache.get_or_parse("#").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_clears_before_insert() {
        let cache = SelectorCache::new(2);
        cache.get_or_parse("#a").unwrap();
        cache.get_or_parse("#b").unwrap();
        assert_eq!(cache.len(), 2);
        // re-requesting a cached selector does not trigger the bound
        cache.get_or_parse("#a").unwrap();
        assert_eq!(cache.len(), 2);

        cache.get_or_parse("#c").unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = SelectorCache::default();
        cache.get_or_parse("#a").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        // still usable after a reset
        cache.get_or_parse("#a").unwrap();
        assert_eq!(cache.len(), 1);
    }
}
