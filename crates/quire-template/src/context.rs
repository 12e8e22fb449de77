//! Data context for template expansion.
//!
//! A [`Context`] is an insertion-ordered map from names to [`Value`]s. Values
//! are a closed set of variants rather than arbitrary data: strings, booleans,
//! lists of sub-contexts (for repeated sections) and computed strings that are
//! produced on demand each time a template references them.
//!
//! # Example
//!
//! ```rust
//! use quire_template::{Context, Value};
//!
//! let ctx = Context::new()
//!     .with("title", "Notes")
//!     .with("draft", false)
//!     .with("year", Value::computed(|| "2024".to_string()))
//!     .with("tags", vec![
//!         Context::new().with("tag", "rust"),
//!         Context::new().with("tag", "web"),
//!     ]);
//!
//! assert_eq!(ctx.len(), 4);
//! assert_eq!(ctx.get("year").map(|v| v.render()), Some("2024".to_string()));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// A single context value.
#[derive(Clone)]
pub enum Value {
    /// Plain text, substituted as-is (or escaped, depending on the directive).
    Str(String),

    /// Controls boolean sections: `true` renders the body once.
    Bool(bool),

    /// Repeats a section once per item. Each item's keys shadow the
    /// enclosing context while its body is expanded.
    List(Vec<Context>),

    /// A string computed at expansion time.
    ///
    /// The closure runs every time the value is referenced, so expensive
    /// producers should cache on their side.
    Computed(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Value {
    /// Wraps a closure as a computed value.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Value::Computed(Arc::new(f))
    }

    /// Renders the value for a variable directive.
    ///
    /// Lists have no textual form and render empty.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Computed(f) => f(),
            Value::List(_) => String::new(),
        }
    }

    /// Converts a JSON value, returning `None` for nulls and nested objects.
    ///
    /// Numbers become their decimal text. Array elements that are objects
    /// become sub-contexts; any other element becomes an empty sub-context so
    /// that a section still repeats once per element.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Value::Str(s.clone())),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => Some(Value::Str(n.to_string())),
            serde_json::Value::Array(items) => {
                Some(Value::List(items.iter().map(Context::from_json).collect()))
            }
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Context>> for Value {
    fn from(items: Vec<Context>) -> Self {
        Value::List(items)
    }
}

/// Named values available to a template.
///
/// Keys are compared by exact, case-sensitive match. Looking up a key that
/// is not present is not an error; the expander treats it as empty/falsy.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: IndexMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, returning the context for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value, replacing any previous value under the same key.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Looks up a value by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns true if the context has a value under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a value, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Copies every entry of `other` into this context; `other` wins on
    /// conflicting keys.
    pub fn merge(&mut self, other: &Context) {
        for (key, value) in other.iter() {
            self.entries.insert(key.to_string(), value.clone());
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the context has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds a context from a JSON object.
    ///
    /// Anything other than an object yields an empty context. See
    /// [`Value::from_json`] for how individual fields convert.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => map
                .iter()
                .filter_map(|(key, value)| Value::from_json(value).map(|v| (key.clone(), v)))
                .collect(),
            _ => Context::new(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (key, value) in iter {
            ctx.insert(key, value);
        }
        ctx
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Context::from_json(&value))
    }
}

/// Lookup chain used while expanding list sections.
///
/// The innermost frame is searched first, so an item's keys hide parent keys
/// of the same name only for the duration of that item's expansion.
#[derive(Debug, Clone)]
pub(crate) struct Scope<'a> {
    frames: Vec<&'a Context>,
}

impl<'a> Scope<'a> {
    pub(crate) fn root(context: &'a Context) -> Self {
        Self {
            frames: vec![context],
        }
    }

    /// Returns a new scope with `frame` layered on top.
    pub(crate) fn push(&self, frame: &'a Context) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.extend_from_slice(&self.frames);
        frames.push(frame);
        Self { frames }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}
