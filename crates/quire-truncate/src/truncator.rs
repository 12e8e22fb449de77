//! The budget walk.

use std::collections::BTreeMap;

use crate::markup::{entity_len, find_matching_close, markup_at, Markup};
use crate::options::TruncateOptions;

/// Result of a truncation, for callers that need more than the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// The truncated HTML, with every still-open tag closed.
    pub html: String,

    /// Whether anything was dropped from the input.
    pub cut: bool,

    /// The atomic tag that stopped the scan, if one did.
    pub halted_at: Option<String>,
}

/// Shortens HTML to a visible-character budget.
///
/// Tag markup and entity markup are free; each entity counts as one visible
/// character. Scanning never enters an atomic element: reaching one ends the
/// output right before it.
///
/// # Example
///
/// ```rust
/// use quire_truncate::Truncator;
///
/// let truncator = Truncator::new();
/// assert_eq!(
///     truncator.truncate("<p><b>hello</b> world, again</p>", 5),
///     "<p><b>hello&hellip;</b></p>"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Truncator {
    options: TruncateOptions,
}

/// A close tag discovered ahead of the scan.
#[derive(Debug)]
struct PendingClose {
    closer: String,
    source_len: usize,
    opened: usize,
}

/// Where the scan stopped.
#[derive(Debug)]
struct Scan {
    end: usize,
    pending: BTreeMap<usize, PendingClose>,
    halted_at: Option<String>,
}

/// What follows the scan position when the budget ran out.
#[derive(Debug, PartialEq, Eq)]
enum Tail {
    /// Only whitespace and non-atomic markup.
    Empty,
    /// Only whitespace, markup and one ellipsis marker from an earlier cut.
    Marker,
    /// Markup leading into an atomic element, no visible text first.
    Atomic,
    /// Visible text was cut.
    Visible,
}

impl Truncator {
    /// Creates a truncator with the default atomic tags, overflow and ellipsis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a truncator from explicit options.
    pub fn with_options(options: TruncateOptions) -> Self {
        Self {
            options: options.normalized(),
        }
    }

    /// Replaces the set of atomic tags.
    pub fn atomic_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.atomic = tags
            .into_iter()
            .map(|t| t.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Sets how far a single word may run past the budget.
    pub fn overflow(mut self, overflow: usize) -> Self {
        self.options.overflow = overflow;
        self
    }

    /// Sets the marker appended after a cut.
    pub fn ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.options.ellipsis = ellipsis.into();
        self
    }

    pub fn options(&self) -> &TruncateOptions {
        &self.options
    }

    /// Truncates `html` to roughly `budget` visible characters.
    pub fn truncate(&self, html: &str, budget: usize) -> String {
        self.truncate_report(html, budget).html
    }

    /// Truncates `html` and reports what happened.
    pub fn truncate_report(&self, html: &str, budget: usize) -> Truncation {
        let scan = self.scan(html, budget);

        if let Some(tag) = scan.halted_at {
            tracing::debug!(
                tag = %tag,
                offset = scan.end,
                "truncation halted at atomic element"
            );
            return Truncation {
                html: assemble(html, scan.end, None, scan.pending),
                cut: true,
                halted_at: Some(tag),
            };
        }

        match self.classify_tail(&html[scan.end..]) {
            Tail::Empty | Tail::Marker => Truncation {
                html: html.to_string(),
                cut: false,
                halted_at: None,
            },
            Tail::Atomic => Truncation {
                html: assemble(html, scan.end, None, scan.pending),
                cut: true,
                halted_at: None,
            },
            Tail::Visible => Truncation {
                html: assemble(
                    html,
                    scan.end,
                    Some(self.options.ellipsis.as_str()),
                    scan.pending,
                ),
                cut: true,
                halted_at: None,
            },
        }
    }

    fn is_atomic(&self, name: &str) -> bool {
        self.options.atomic.contains(name)
    }

    fn scan(&self, html: &str, budget: usize) -> Scan {
        let bytes = html.as_bytes();
        let mut pending: BTreeMap<usize, PendingClose> = BTreeMap::new();
        let mut opened = 0usize;
        let mut count = 0usize;
        let mut index = 0usize;

        while count < budget && index < html.len() {
            match bytes[index] {
                b'<' => {
                    if let Some(close) = pending.remove(&index) {
                        index += close.source_len;
                        continue;
                    }
                    match markup_at(html, index) {
                        Markup::Open { name, len } => {
                            if self.is_atomic(&name) {
                                return Scan {
                                    end: index,
                                    pending,
                                    halted_at: Some(name),
                                };
                            }
                            index += len;
                            if let Some((at, source_len)) = find_matching_close(html, index, &name)
                            {
                                pending.insert(
                                    at,
                                    PendingClose {
                                        closer: format!("</{}>", name),
                                        source_len,
                                        opened,
                                    },
                                );
                                opened += 1;
                            }
                        }
                        Markup::Other { len } => index += len,
                        Markup::None => {
                            index += 1;
                            count += 1;
                        }
                    }
                }
                b'&' => {
                    index += 1;
                    index += entity_len(&html[index..]);
                    count += 1;
                }
                _ => {
                    if bytes[index] == b' ' {
                        index += 1;
                        count += 1;
                    }
                    let rest = &html[index..];
                    let word = &rest[..rest.find([' ', '<', '&']).unwrap_or(rest.len())];
                    let mut skip = word.chars().count();
                    if count + skip > budget + self.options.overflow {
                        skip = budget.saturating_sub(count);
                    }
                    index += char_offset(word, skip);
                    count += skip;
                }
            }
        }

        Scan {
            end: index,
            pending,
            halted_at: None,
        }
    }

    fn classify_tail(&self, rest: &str) -> Tail {
        let ellipsis = self.options.ellipsis.as_str();
        let mut seen_marker = false;
        let mut i = 0;

        while i < rest.len() {
            let tail = &rest[i..];
            if tail.starts_with('<') {
                match markup_at(rest, i) {
                    Markup::Open { name, len } => {
                        if self.is_atomic(&name) {
                            return if seen_marker {
                                Tail::Visible
                            } else {
                                Tail::Atomic
                            };
                        }
                        i += len;
                    }
                    Markup::Other { len } => i += len,
                    Markup::None => return Tail::Visible,
                }
                continue;
            }
            if let Some(ch) = tail.chars().next().filter(|c| c.is_whitespace()) {
                i += ch.len_utf8();
                continue;
            }
            if !seen_marker && !ellipsis.is_empty() && tail.starts_with(ellipsis) {
                seen_marker = true;
                i += ellipsis.len();
                continue;
            }
            return Tail::Visible;
        }

        if seen_marker {
            Tail::Marker
        } else {
            Tail::Empty
        }
    }
}

/// Builds the output: consumed prefix, optional ellipsis, then the closers
/// of every tag still open, most recently opened first.
fn assemble(
    html: &str,
    end: usize,
    ellipsis: Option<&str>,
    pending: BTreeMap<usize, PendingClose>,
) -> String {
    let mut closers: Vec<PendingClose> = pending.into_values().collect();
    closers.sort_by(|a, b| b.opened.cmp(&a.opened));

    let mut output = String::with_capacity(end + 16 * (closers.len() + 1));
    output.push_str(&html[..end]);
    if let Some(ellipsis) = ellipsis {
        output.push_str(ellipsis);
    }
    for close in closers {
        output.push_str(&close.closer);
    }
    output
}

/// Byte offset of the `n`th char of `s` (or its length).
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Truncates `html` to `budget` visible characters with default options.
///
/// ```rust
/// use quire_truncate::truncate;
///
/// assert_eq!(truncate("<b>hello world</b>", 5), "<b>hello&hellip;</b>");
/// assert_eq!(truncate("<img src=x><p>caption</p>", 100), "");
/// ```
pub fn truncate(html: &str, budget: usize) -> String {
    Truncator::new().truncate(html, budget)
}
