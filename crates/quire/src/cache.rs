//! Memoization of rendered pages.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A keyed store of rendered output.
///
/// The cache is an ordinary value owned by the caller; there is no global
/// state. A disabled cache renders on every call, which is what you want
/// while editing templates.
///
/// ```rust
/// use quire::RenderCache;
///
/// let cache = RenderCache::new(true);
/// let first = cache.get_or_render("/blog", || "page".to_string());
/// let second = cache.get_or_render("/blog", || unreachable!());
/// assert_eq!(first, second);
/// ```
#[derive(Debug)]
pub struct RenderCache {
    enabled: bool,
    entries: RwLock<HashMap<String, String>>,
}

impl RenderCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cached output for `key`, rendering and storing it on a miss.
    pub fn get_or_render<F>(&self, key: &str, render: F) -> String
    where
        F: FnOnce() -> String,
    {
        match self.try_get_or_render(key, || Ok::<_, std::convert::Infallible>(render())) {
            Ok(output) => output,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_render`](Self::get_or_render) for fallible rendering.
    /// Failures are not cached.
    pub fn try_get_or_render<F, E>(&self, key: &str, render: F) -> Result<String, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if !self.enabled {
            return render();
        }
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "render cache hit");
            return Ok(hit);
        }

        let output = render()?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), output.clone());
        Ok(output)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Drops one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_memoizes() {
        let cache = RenderCache::new(true);
        let calls = Cell::new(0);
        let render = || {
            calls.set(calls.get() + 1);
            "out".to_string()
        };
        assert_eq!(cache.get_or_render("k", render), "out");
        assert_eq!(cache.get_or_render("k", render), "out");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_disabled_always_renders() {
        let cache = RenderCache::new(false);
        let calls = Cell::new(0);
        for _ in 0..3 {
            cache.get_or_render("k", || {
                calls.set(calls.get() + 1);
                String::new()
            });
        }
        assert_eq!(calls.get(), 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = RenderCache::new(true);
        cache.get_or_render("a", || "1".into());
        cache.get_or_render("b", || "2".into());
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.get_or_render("a", || "3".into()), "3");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = RenderCache::new(true);
        let err: Result<String, &str> = cache.try_get_or_render("k", || Err("boom"));
        assert_eq!(err, Err("boom"));
        assert!(cache.is_empty());
        let ok: Result<String, &str> = cache.try_get_or_render("k", || Ok("ok".into()));
        assert_eq!(ok, Ok("ok".to_string()));
        assert_eq!(cache.get("k").as_deref(), Some("ok"));
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(RenderCache::new(true));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let key = format!("page-{}", i % 2);
                    cache.get_or_render(&key, || i.to_string())
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 2);
    }
}
