//! # Quire - Templates and Previews for Small Sites
//!
//! Quire bundles the two text engines a small hand-written site needs, plus
//! the glue around them:
//!
//! - [`quire_template`]: Mustache-style expansion with sections, partials
//!   and HTML escaping
//! - [`quire_truncate`]: HTML-aware truncation that keeps tags balanced
//! - [`Post`]: front-matter posts
//! - [`Preview`]: excerpts built from post bodies
//! - [`Listing`]: paged blog listings with previews and a next-page link
//! - [`Feed`]: Atom feeds of recent posts
//! - [`DirPartials`]: partials read from a template directory
//! - [`RenderCache`]: caller-owned memoization of rendered pages
//! - [`QuireConfig`]: YAML or JSON configuration for all of the above
//!
//! ## Quick Start
//!
//! ```rust
//! use quire::{expand, PartialMap, Post, Preview, Truncator, PREVIEW_BUDGET};
//!
//! let post = Post::parse("---\ntitle: Hello\nstate: post\n---\n<p>Body text</p>");
//! let preview = Preview::build(post.content(), PREVIEW_BUDGET, &Truncator::new());
//!
//! let mut ctx = post.to_context();
//! ctx.insert("content", preview.html);
//! ctx.insert("more", preview.more);
//!
//! let partials = PartialMap::new().add("more", "<a>Read more&hellip;</a>");
//! let html = expand(
//!     "<h1>{{title}}</h1>{{{content}}}{{#more}}{{>more}}{{/more}}",
//!     &ctx,
//!     &partials,
//! );
//! assert_eq!(html, "<h1>Hello</h1><p>Body text</p>");
//! ```

pub mod cache;
pub mod config;
pub mod date;
pub mod error;
pub mod feed;
pub mod listing;
pub mod partials;
pub mod post;
pub mod preview;

pub use quire_template as template;
pub use quire_truncate as truncation;

pub use quire_template::{
    escape_html, expand, Context, ExpandError, Expander, NoPartials, PartialMap, PartialResolver,
    Value,
};
pub use quire_truncate::{truncate, TruncateOptions, Truncation, Truncator};

pub use cache::RenderCache;
pub use config::QuireConfig;
pub use error::{QuireError, Result};
pub use feed::{Feed, FeedEntry, FEED_SIZE};
pub use listing::{Listing, ListingPage, PAGE_SIZE};
pub use partials::DirPartials;
pub use post::{load_posts, Post, PostFile};
pub use preview::{collapse_whitespace, Preview, FEED_BUDGET, PREVIEW_BUDGET};
