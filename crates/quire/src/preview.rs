//! Listing previews of post bodies.

use once_cell::sync::Lazy;
use quire_truncate::Truncator;
use regex::Regex;

/// Visible characters in a blog listing preview.
pub const PREVIEW_BUDGET: usize = 250;

/// Visible characters in a feed entry.
pub const FEED_BUDGET: usize = 10_000;

static DOUBLE_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\s").expect("valid whitespace pattern"));

/// A truncated body and whether a "read more" link is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub html: String,
    pub more: bool,
}

impl Preview {
    /// Builds a preview of `content`.
    ///
    /// Each pair of whitespace characters becomes a single space before
    /// truncating, so `more` compares against the collapsed text, not the
    /// raw body.
    ///
    /// ```rust
    /// use quire::{Preview, Truncator};
    ///
    /// let preview = Preview::build("<p>one  two three</p>", 3, &Truncator::new());
    /// assert_eq!(preview.html, "<p>one&hellip;</p>");
    /// assert!(preview.more);
    /// ```
    pub fn build(content: &str, budget: usize, truncator: &Truncator) -> Self {
        let collapsed = collapse_whitespace(content);
        let html = truncator.truncate(&collapsed, budget);
        let more = html != collapsed;
        Self { html, more }
    }
}

/// Replaces each non-overlapping pair of whitespace characters with a space.
///
/// Runs are halved, not squeezed: three spaces become two.
pub fn collapse_whitespace(text: &str) -> String {
    DOUBLE_SPACE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_pairs() {
        assert_eq!(collapse_whitespace("a  b"), "a b");
        assert_eq!(collapse_whitespace("a\n\nb"), "a b");
        assert_eq!(collapse_whitespace("a   b"), "a  b");
        assert_eq!(collapse_whitespace("a    b"), "a  b");
        assert_eq!(collapse_whitespace("a\nb"), "a\nb");
    }

    #[test]
    fn test_short_body_has_no_more() {
        let preview = Preview::build("<p>short</p>", PREVIEW_BUDGET, &Truncator::new());
        assert_eq!(preview.html, "<p>short</p>");
        assert!(!preview.more);
    }

    #[test]
    fn test_collapse_alone_is_not_more() {
        let preview = Preview::build("<p>a\n\nb</p>", PREVIEW_BUDGET, &Truncator::new());
        assert_eq!(preview.html, "<p>a b</p>");
        assert!(!preview.more);
    }

    #[test]
    fn test_atomic_content_sets_more() {
        let body = "<p>intro</p>\n<pre>code</pre>";
        let preview = Preview::build(body, PREVIEW_BUDGET, &Truncator::new());
        assert_eq!(preview.html, "<p>intro</p>\n");
        assert!(preview.more);
    }

    #[test]
    fn test_feed_budget_keeps_long_body() {
        let body = format!("<p>{}</p>", "word ".repeat(400));
        let preview = Preview::build(&body, FEED_BUDGET, &Truncator::new());
        assert!(!preview.more);
        assert!(Preview::build(&body, PREVIEW_BUDGET, &Truncator::new()).more);
    }
}
