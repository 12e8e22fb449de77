//! HTML-aware truncation for previews and excerpts.
//!
//! This crate shortens an HTML fragment to a budget of visible characters
//! while keeping its tag structure intact. It handles nested tags correctly:
//! every tag opened before the cut and not yet closed is closed at the end
//! of the output, innermost first.
//!
//! # Example
//!
//! ```rust
//! use quire_truncate::truncate;
//!
//! let html = "<p>A <em>short</em> note about truncation</p>";
//! assert_eq!(truncate(html, 12), "<p>A <em>short</em> note&hellip;</p>");
//! ```
//!
//! # Counting Rules
//!
//! - Tags, comments and declarations cost nothing.
//! - An entity (`&amp;`, `&#39;`) counts as a single character.
//! - Text is consumed a word at a time. The word that crosses the budget is
//!   kept whole unless it would overrun by more than
//!   [`TruncateOptions::overflow`] characters, in which case it is clipped to
//!   the budget exactly.
//! - When visible text is dropped, [`TruncateOptions::ellipsis`] is appended
//!   before the closing tags.
//!
//! # Atomic Elements
//!
//! Some elements must never be split: code blocks, images, tables, scripts,
//! headings. When the scan reaches the opening tag of one of these, the output
//! ends right before it. The default set is [`DEFAULT_ATOMIC_TAGS`].
//!
//! # Idempotence
//!
//! Truncating an already truncated string with the same or a larger budget
//! returns it unchanged: a trailing ellipsis marker is recognised as the
//! mark of an earlier cut rather than as content to cut again.

mod markup;
mod options;
mod truncator;

pub use options::{TruncateOptions, DEFAULT_ATOMIC_TAGS, DEFAULT_ELLIPSIS, DEFAULT_OVERFLOW};
pub use truncator::{truncate, Truncation, Truncator};
