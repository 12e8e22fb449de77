//! Partial template resolution.
//!
//! Partials are looked up by name at the moment a `{{>name}}` directive is
//! expanded, never ahead of time. The resolved source is then expanded
//! against the same context as the template that included it.

use std::collections::HashMap;

/// Resolves partial names to template source.
///
/// Returning `None` means the partial is unknown; the directive then renders
/// as an empty string.
///
/// # Implementing for Closures
///
/// Any `Fn(&str) -> Option<String>` is a resolver:
///
/// ```rust
/// use quire_template::{expand, Context};
///
/// let partials = |name: &str| match name {
///     "greeting" => Some("Hello, {{name}}!".to_string()),
///     _ => None,
/// };
///
/// let ctx = Context::new().with("name", "World");
/// assert_eq!(expand("{{>greeting}}", &ctx, &partials), "Hello, World!");
/// ```
pub trait PartialResolver {
    /// Returns the template source for `name`, if known.
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> PartialResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        (self)(name)
    }
}

/// An in-memory set of named partials.
#[derive(Debug, Clone, Default)]
pub struct PartialMap {
    partials: HashMap<String, String>,
}

impl PartialMap {
    /// Creates an empty partial map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a partial, returning the map for chaining.
    pub fn add(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    /// Registers a partial, replacing any previous source under `name`.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.partials.insert(name.into(), source.into());
    }

    /// Returns true if a partial named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.partials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }
}

impl PartialResolver for PartialMap {
    fn resolve(&self, name: &str) -> Option<String> {
        self.partials.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for PartialMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PartialMap::new();
        for (name, source) in iter {
            map.insert(name, source);
        }
        map
    }
}

/// A resolver that knows no partials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPartials;

impl PartialResolver for NoPartials {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}
