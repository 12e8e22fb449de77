//! Truncation settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Elements whose content is never split by truncation.
pub const DEFAULT_ATOMIC_TAGS: &[&str] = &["pre", "code", "img", "table", "style", "script", "h2", "h3"];

/// How many characters a single word may run past the budget before it is
/// clipped.
pub const DEFAULT_OVERFLOW: usize = 15;

/// Marker appended when visible text was cut.
pub const DEFAULT_ELLIPSIS: &str = "&hellip;";

/// Configuration for a [`Truncator`](crate::Truncator).
///
/// Every field has a default, so configuration files only need to name the
/// settings they change:
///
/// ```rust
/// use quire_truncate::TruncateOptions;
///
/// let options: TruncateOptions = serde_json::from_str(r#"{"overflow": 0}"#).unwrap();
/// assert_eq!(options.overflow, 0);
/// assert!(options.atomic.contains("pre"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruncateOptions {
    /// Tag names (case-insensitive) at which scanning stops.
    pub atomic: BTreeSet<String>,

    /// Tolerance for completing the word that crosses the budget.
    pub overflow: usize,

    /// Text appended after the cut.
    pub ellipsis: String,
}

impl TruncateOptions {
    /// Lowercases atomic tag names so lookups can use the normalised name.
    pub(crate) fn normalized(mut self) -> Self {
        self.atomic = self
            .atomic
            .into_iter()
            .map(|tag| tag.to_ascii_lowercase())
            .collect();
        self
    }
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            atomic: DEFAULT_ATOMIC_TAGS.iter().map(|t| t.to_string()).collect(),
            overflow: DEFAULT_OVERFLOW,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TruncateOptions::default();
        assert_eq!(options.atomic.len(), 8);
        assert!(options.atomic.contains("h3"));
        assert_eq!(options.overflow, 15);
        assert_eq!(options.ellipsis, "&hellip;");
    }

    #[test]
    fn test_yaml_partial_override() {
        let options: TruncateOptions = serde_yaml::from_str(
            r#"
atomic: [PRE, figure]
ellipsis: "..."
"#,
        )
        .unwrap();
        assert_eq!(options.overflow, DEFAULT_OVERFLOW);
        assert_eq!(options.ellipsis, "...");

        let options = options.normalized();
        assert!(options.atomic.contains("pre"));
        assert!(options.atomic.contains("figure"));
        assert!(!options.atomic.contains("img"));
    }
}
