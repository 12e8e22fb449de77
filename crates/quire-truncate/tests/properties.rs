//! Property-based tests for truncation using proptest.

use once_cell::sync::Lazy;
use proptest::prelude::*;
use quire_truncate::{truncate, Truncator, DEFAULT_OVERFLOW};
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(/?)(\w+)[^>]*>").unwrap());
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").unwrap());

// ============================================================================
// Test helpers
// ============================================================================

/// Counts visible characters: tags are free, entities count once.
fn visible_len(html: &str) -> usize {
    let text = TAG.replace_all(html, "");
    ENTITY.replace_all(&text, "_").chars().count()
}

/// Like [`visible_len`], skipping whitespace. Trailing whitespace survives
/// an uncut truncation without being counted against the budget.
fn visible_non_space(html: &str) -> usize {
    let text = TAG.replace_all(html, "");
    ENTITY
        .replace_all(&text, "_")
        .chars()
        .filter(|c| !c.is_whitespace())
        .count()
}

/// Checks that every close tag matches the innermost open tag and that
/// nothing is left open.
fn is_balanced(html: &str) -> bool {
    let mut stack: Vec<String> = Vec::new();
    for caps in TAG.captures_iter(html) {
        let name = caps[2].to_ascii_lowercase();
        if &caps[1] == "/" {
            if stack.pop().as_deref() != Some(name.as_str()) {
                return false;
            }
        } else if name != "br" {
            stack.push(name);
        }
    }
    stack.is_empty()
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Zé]{1,12}",
        "[a-z]{16,40}",
        Just(" ".to_string()),
        Just("&amp;".to_string()),
        Just("&#39;".to_string()),
        Just("<b>".to_string()),
        Just("</b>".to_string()),
        Just("<em>".to_string()),
        Just("</em>".to_string()),
        Just("<br>".to_string()),
        Just("<p class='x'>".to_string()),
        Just("</p>".to_string()),
    ]
}

fn loose_html() -> impl Strategy<Value = String> {
    prop::collection::vec(token(), 0..40).prop_map(|tokens| tokens.concat())
}

fn balanced_html() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z]{1,8}",
        "[a-z]{20,30}",
        Just(" ".to_string()),
        Just("&amp;".to_string()),
        Just("<br>".to_string()),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        (
            prop::sample::select(vec!["b", "em", "p", "div", "B"]),
            prop::collection::vec(inner, 0..6),
        )
            .prop_map(|(tag, children)| format!("<{0}>{1}</{0}>", tag, children.concat()))
    })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A budget covering all visible text returns the input untouched.
    #[test]
    fn large_budget_is_identity(html in loose_html(), extra in 0usize..10) {
        let budget = visible_len(&html) + extra;
        prop_assert_eq!(truncate(&html, budget), html);
    }

    /// Truncating the output again changes nothing.
    #[test]
    fn idempotent(html in loose_html(), budget in 0usize..60, extra in 0usize..30) {
        let once = truncate(&html, budget);
        prop_assert_eq!(&truncate(&once, budget), &once);
        prop_assert_eq!(&truncate(&once, budget + extra), &once);
    }

    /// Output never runs further past the budget than the word overflow
    /// tolerance plus the ellipsis itself.
    #[test]
    fn overflow_is_bounded(html in loose_html(), budget in 0usize..60) {
        let output = truncate(&html, budget);
        prop_assert!(visible_non_space(&output) <= budget + DEFAULT_OVERFLOW + 1);
    }

    /// Well-formed input stays well-formed, whatever the cut.
    #[test]
    fn balanced_stays_balanced(html in balanced_html(), budget in 0usize..80) {
        prop_assert!(is_balanced(&html));
        let output = truncate(&html, budget);
        prop_assert!(is_balanced(&output), "unbalanced output: {}", output);
    }

    /// Nothing from an atomic element ever reaches the output.
    #[test]
    fn atomic_never_emitted(
        before in "[a-z ]{0,30}",
        after in "[a-z ]{0,30}",
        budget in 0usize..80,
    ) {
        let html = format!("{}<pre>SECRET</pre>{}", before, after);
        let output = truncate(&html, budget);
        prop_assert!(!output.contains("<pre>"));
        prop_assert!(!output.contains("SECRET"));
    }

    /// Without tolerance, clipping is exact.
    #[test]
    fn zero_overflow_never_exceeds_budget(text in "[a-z ]{0,80}", budget in 1usize..40) {
        let output = Truncator::new().overflow(0).ellipsis("").truncate(&text, budget);
        prop_assert!(output.trim_end().chars().count() <= budget);
    }
}
