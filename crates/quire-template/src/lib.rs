//! # Quire Template - Mustache-style template expansion
//!
//! `quire-template` expands small text templates against a data [`Context`].
//! It understands four directive forms:
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `{{#name}}...{{/name}}` | Section: repeated per list item, rendered once for `true`, dropped otherwise |
//! | `{{>name}}` | Partial: resolved lazily and expanded against the same context |
//! | `{{{name}}}` | Raw variable, substituted verbatim |
//! | `{{name}}` | Variable, HTML-escaped |
//!
//! Directive names may contain letters, digits, `_`, `-`, `.` and `/`.
//!
//! Expansion is pure: no I/O happens here. Partials come from a
//! [`PartialResolver`] supplied by the caller, which may read them from disk,
//! a map, or anywhere else.
//!
//! ## Quick Start
//!
//! ```rust
//! use quire_template::{expand, Context, PartialMap};
//!
//! let ctx = Context::new()
//!     .with("title", "Hello & welcome")
//!     .with("posts", vec![
//!         Context::new().with("name", "first"),
//!         Context::new().with("name", "second"),
//!     ]);
//! let partials = PartialMap::new().add("post", "<li>{{name}}</li>");
//!
//! let html = expand(
//!     "<h1>{{title}}</h1><ul>{{#posts}}{{>post}}{{/posts}}</ul>",
//!     &ctx,
//!     &partials,
//! );
//! assert_eq!(html, "<h1>Hello &amp; welcome</h1><ul><li>first</li><li>second</li></ul>");
//! ```
//!
//! ## Missing Data
//!
//! Templates are trusted but hand-edited, so missing data never fails:
//! absent values render empty, unknown partials render empty, and directives
//! without a match are left in the output literally. The only error is
//! exceeding the nesting limit under [`Expander::try_expand`].

mod context;
mod error;
mod escape;
mod expand;
mod partials;

pub use context::{Context, Value};
pub use error::ExpandError;
pub use escape::escape_html;
pub use expand::{expand, Expander};
pub use partials::{NoPartials, PartialMap, PartialResolver};
