//! Recognition of the markup the truncator steps over.
//!
//! This is not an HTML parser. It only knows enough to tell an opening tag
//! from other markup, skip character entities, and find the close tag that
//! pairs with an opening tag.

use once_cell::sync::Lazy;
use regex::Regex;

static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(\w+)[^>]*>").expect("valid open tag pattern"));
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<!--.*?-->").expect("valid comment pattern"));
static OTHER_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<[/!?][^>]*>").expect("valid markup pattern"));
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)(\w+)[^>]*>").expect("valid tag pattern"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?[A-Za-z0-9]+;").expect("valid entity pattern"));

/// What starts at a `<` in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Markup {
    /// `<name ...>`, with the lowercased name and the tag's byte length.
    Open { name: String, len: usize },
    /// Closing tags, comments, declarations: free, never tracked.
    Other { len: usize },
    /// A `<` that starts no complete tag; it is ordinary text.
    None,
}

/// Classifies the markup starting at byte `at`, which must hold a `<`.
pub(crate) fn markup_at(html: &str, at: usize) -> Markup {
    let rest = &html[at..];
    if let Some(m) = COMMENT.find(rest) {
        return Markup::Other { len: m.len() };
    }
    if let Some(caps) = OPEN_TAG.captures(rest) {
        let len = caps.get(0).map_or(0, |m| m.len());
        return Markup::Open {
            name: caps[1].to_ascii_lowercase(),
            len,
        };
    }
    match OTHER_MARKUP.find(rest) {
        Some(m) => Markup::Other { len: m.len() },
        None => Markup::None,
    }
}

/// Returns the byte length of the entity body following a `&`, if any.
pub(crate) fn entity_len(rest: &str) -> usize {
    ENTITY.find(rest).map_or(0, |m| m.len())
}

/// Finds the close tag for `name`, searching from byte `from`.
///
/// Same-name tags nest, so each nested `<name>` must be closed before the
/// outer one is. Matching is case-insensitive and tolerates attributes or
/// whitespace before the closing `>`. Returns the close tag's offset and
/// byte length.
pub(crate) fn find_matching_close(html: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut search = from;

    while let Some(offset) = html[search..].find('<') {
        let at = search + offset;
        if let Some(m) = COMMENT.find(&html[at..]) {
            search = at + m.len();
            continue;
        }
        let Some(caps) = ANY_TAG.captures(&html[at..]) else {
            search = at + 1;
            continue;
        };
        let len = caps.get(0).map_or(1, |m| m.len());
        if caps[2].eq_ignore_ascii_case(name) {
            if &caps[1] == "/" {
                depth -= 1;
                if depth == 0 {
                    return Some((at, len));
                }
            } else if !caps[0].ends_with("/>") {
                depth += 1;
            }
        }
        search = at + len;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tag() {
        assert_eq!(
            markup_at("<a href='x'>link</a>", 0),
            Markup::Open {
                name: "a".into(),
                len: 12
            }
        );
        assert_eq!(
            markup_at("x<IMG src=y>", 1),
            Markup::Open {
                name: "img".into(),
                len: 11
            }
        );
    }

    #[test]
    fn test_other_markup() {
        assert_eq!(markup_at("</p>", 0), Markup::Other { len: 4 });
        assert_eq!(markup_at("<!-- c -->", 0), Markup::Other { len: 10 });
        assert_eq!(markup_at("<!DOCTYPE html>", 0), Markup::Other { len: 15 });
    }

    #[test]
    fn test_comment_runs_to_its_terminator() {
        assert_eq!(markup_at("<!-- </b> -->", 0), Markup::Other { len: 13 });
        assert_eq!(markup_at("<!-- a > b -->x", 0), Markup::Other { len: 14 });
        assert_eq!(markup_at("<!--\n<p>\n-->", 0), Markup::Other { len: 12 });
    }

    #[test]
    fn test_matching_close_skips_comments() {
        let html = "<b>x<!-- </b> -->y</b>";
        assert_eq!(find_matching_close(html, 3, "b"), Some((18, 4)));
        let html = "<p>a<!-- <p> -->b</p>";
        assert_eq!(find_matching_close(html, 3, "p"), Some((17, 4)));
    }

    #[test]
    fn test_not_markup() {
        assert_eq!(markup_at("a < b", 2), Markup::None);
        assert_eq!(markup_at("<b unterminated", 0), Markup::None);
        assert_eq!(markup_at("<", 0), Markup::None);
    }

    #[test]
    fn test_entity_len() {
        assert_eq!(entity_len("amp; rest"), 4);
        assert_eq!(entity_len("#39;"), 4);
        assert_eq!(entity_len("#x2F;"), 5);
        assert_eq!(entity_len(" not"), 0);
        assert_eq!(entity_len("amp"), 0);
    }

    #[test]
    fn test_matching_close_simple() {
        let html = "<b>bold</b> tail";
        assert_eq!(find_matching_close(html, 3, "b"), Some((7, 4)));
    }

    #[test]
    fn test_matching_close_case_and_whitespace() {
        let html = "<b>x</B >";
        assert_eq!(find_matching_close(html, 3, "b"), Some((4, 5)));
    }

    #[test]
    fn test_matching_close_nested_same_name() {
        let html = "<div>a<div>b</div>c</div>";
        assert_eq!(find_matching_close(html, 5, "div"), Some((19, 6)));
        assert_eq!(find_matching_close(html, 11, "div"), Some((12, 6)));
    }

    #[test]
    fn test_matching_close_ignores_prefix_names() {
        let html = "<b>x<br>y<bdi>z</bdi></b>";
        assert_eq!(find_matching_close(html, 3, "b"), Some((21, 4)));
    }

    #[test]
    fn test_matching_close_missing() {
        assert_eq!(find_matching_close("<p>open only", 3, "p"), None);
    }

    #[test]
    fn test_self_closing_does_not_nest() {
        let html = "<x>a<x/>b</x>";
        assert_eq!(find_matching_close(html, 3, "x"), Some((9, 4)));
    }
}
