//! Paged blog listings.
//!
//! A listing page is a context for the stream template:
//!
//! - `entries`: one context per post on the page, holding the post's front
//!   matter plus `url`, a reader-facing `date`, the preview as `content` and
//!   a `more` flag
//! - `placeholder`: a one-item list with the `url` of the next page, or an
//!   empty list on the last page
//!
//! ```text
//! {{#entries}}<h1><a href='{{url}}'>{{title}}</a></h1>{{{content}}}{{/entries}}
//! {{#placeholder}}<div class='stream' data-url='{{url}}'></div>{{/placeholder}}
//! ```

use quire_template::{Context, PartialResolver};
use quire_truncate::Truncator;

use crate::config::QuireConfig;
use crate::date::{display_date, parse_date};
use crate::post::PostFile;
use crate::preview::Preview;

/// Posts per listing page.
pub const PAGE_SIZE: usize = 10;

/// Which slice of the posts a listing page shows.
///
/// ```rust
/// use quire::{Listing, Post, PostFile, Truncator};
///
/// let posts: Vec<PostFile> = (0..3)
///     .map(|i| PostFile::new(format!("p{}", i), Post::parse("---\nstate: post\n---\nx")))
///     .collect();
/// let page = Listing::new().page_size(2).page(&posts, 250, &Truncator::new());
/// assert_eq!(page.entries.len(), 2);
/// assert_eq!(page.next_url().as_deref(), Some("/blog?id=2"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    start: usize,
    page_size: usize,
    drafts: bool,
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub entries: Vec<Context>,
    /// Index of the first post on the next page, if any posts are left.
    pub next: Option<usize>,
}

impl Listing {
    pub fn new() -> Self {
        Self {
            start: 0,
            page_size: PAGE_SIZE,
            drafts: false,
        }
    }

    /// Skips the first `start` listed posts.
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Lists drafts alongside published posts, for previewing locally.
    pub fn drafts(mut self, drafts: bool) -> Self {
        self.drafts = drafts;
        self
    }

    /// Builds the page from `posts`, which must be newest first.
    ///
    /// `start` counts listed posts only, so hidden drafts do not shift
    /// pages. The next page exists while unread files remain, even if they
    /// all turn out to be hidden.
    pub fn page(&self, posts: &[PostFile], budget: usize, truncator: &Truncator) -> ListingPage {
        let end = self.start + self.page_size;
        let mut entries = Vec::new();
        let mut index = 0;
        let mut read = 0;

        for file in posts {
            if index >= end {
                break;
            }
            read += 1;
            if !(self.drafts || file.post.is_published()) {
                continue;
            }
            if index >= self.start {
                entries.push(entry_context(file, budget, truncator));
            }
            index += 1;
        }

        ListingPage {
            entries,
            next: (read < posts.len()).then_some(index),
        }
    }

    /// Builds the page with the configured preview budget and expands
    /// `template` against it.
    pub fn render<P>(
        &self,
        template: &str,
        posts: &[PostFile],
        config: &QuireConfig,
        partials: &P,
    ) -> String
    where
        P: PartialResolver + ?Sized,
    {
        let page = self.page(posts, config.preview_budget, &config.truncator());
        config.expander().expand(template, &page.to_context(), partials)
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingPage {
    pub fn next_url(&self) -> Option<String> {
        self.next.map(|index| format!("/blog?id={}", index))
    }

    pub fn to_context(&self) -> Context {
        let placeholder: Vec<Context> = self
            .next_url()
            .map(|url| Context::new().with("url", url))
            .into_iter()
            .collect();
        Context::new()
            .with("entries", self.entries.clone())
            .with("placeholder", placeholder)
    }
}

fn entry_context(file: &PostFile, budget: usize, truncator: &Truncator) -> Context {
    let post = &file.post;
    let preview = Preview::build(post.content(), budget, truncator);
    let mut ctx = post.to_context();
    ctx.insert("url", file.location());
    if let Some(raw) = post.get("date") {
        match parse_date(raw) {
            Some(date) => {
                ctx.insert("date", display_date(&date));
            }
            None => tracing::debug!(post = %file.slug, date = raw, "unparsable date shown as is"),
        }
    }
    ctx.insert("content", preview.html);
    ctx.insert("more", preview.more);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Post;
    use quire_template::NoPartials;

    fn post(slug: &str, state: &str) -> PostFile {
        let text = format!(
            "---\ntitle: {slug}\ndate: 2024-01-05 10:00:00 UTC\nstate: {state}\n---\n<p>{slug} body</p>"
        );
        PostFile::new(slug, Post::parse(&text))
    }

    fn titles(page: &ListingPage) -> Vec<String> {
        page.entries
            .iter()
            .map(|e| e.get("title").map(|v| v.render()).unwrap_or_default())
            .collect()
    }

    fn many(n: usize) -> Vec<PostFile> {
        (0..n).map(|i| post(&format!("p{:02}", i), "post")).collect()
    }

    #[test]
    fn test_entry_fields() {
        let page = Listing::new().page(&[post("hello", "post")], 250, &Truncator::new());
        let entry = &page.entries[0];
        let field = |key: &str| entry.get(key).map(|v| v.render());
        assert_eq!(field("url").as_deref(), Some("/blog/hello"));
        assert_eq!(field("date").as_deref(), Some("Jan 5, 2024"));
        assert_eq!(field("content").as_deref(), Some("<p>hello body</p>"));
        assert_eq!(field("more").as_deref(), Some("false"));
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_first_page_and_next() {
        let posts = many(25);
        let page = Listing::new().page(&posts, 250, &Truncator::new());
        assert_eq!(page.entries.len(), 10);
        assert_eq!(titles(&page)[0], "p00");
        assert_eq!(page.next_url().as_deref(), Some("/blog?id=10"));
    }

    #[test]
    fn test_middle_and_last_pages() {
        let posts = many(25);
        let page = Listing::new().start(10).page(&posts, 250, &Truncator::new());
        assert_eq!(titles(&page).first().map(String::as_str), Some("p10"));
        assert_eq!(page.next, Some(20));

        let page = Listing::new().start(20).page(&posts, 250, &Truncator::new());
        assert_eq!(titles(&page), ["p20", "p21", "p22", "p23", "p24"]);
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_start_past_end() {
        let page = Listing::new().start(50).page(&many(3), 250, &Truncator::new());
        assert!(page.entries.is_empty());
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_drafts_hidden_by_default() {
        let posts = vec![post("a", "post"), post("b", "draft"), post("c", "post")];
        let page = Listing::new().page(&posts, 250, &Truncator::new());
        assert_eq!(titles(&page), ["a", "c"]);

        let page = Listing::new().drafts(true).page(&posts, 250, &Truncator::new());
        assert_eq!(titles(&page), ["a", "b", "c"]);
    }

    #[test]
    fn test_hidden_drafts_do_not_shift_pages() {
        let posts = vec![
            post("a", "post"),
            post("b", "draft"),
            post("c", "post"),
            post("d", "post"),
        ];
        let page = Listing::new().page_size(2).page(&posts, 250, &Truncator::new());
        assert_eq!(titles(&page), ["a", "c"]);
        assert_eq!(page.next, Some(2));

        let page = Listing::new().page_size(2).start(2).page(&posts, 250, &Truncator::new());
        assert_eq!(titles(&page), ["d"]);
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_trailing_drafts_still_offer_next_page() {
        let posts = vec![post("a", "post"), post("b", "post"), post("c", "draft")];
        let page = Listing::new().page_size(2).page(&posts, 250, &Truncator::new());
        assert_eq!(page.next, Some(2));
    }

    #[test]
    fn test_preview_budget_sets_more() {
        let page = Listing::new().page(&[post("long", "post")], 4, &Truncator::new());
        let entry = &page.entries[0];
        assert_eq!(
            entry.get("content").map(|v| v.render()).as_deref(),
            Some("<p>long&hellip;</p>")
        );
        assert_eq!(entry.get("more").map(|v| v.render()).as_deref(), Some("true"));
    }

    #[test]
    fn test_render_with_placeholder() {
        let template = "{{#entries}}[{{title}}]{{/entries}}{{#placeholder}}<{{{url}}}>{{/placeholder}}";
        let config = QuireConfig::default();
        let listing = Listing::new().page_size(2);
        assert_eq!(
            listing.render(template, &many(3), &config, &NoPartials),
            "[p00][p01]</blog?id=2>"
        );
        assert_eq!(
            listing.start(2).render(template, &many(3), &config, &NoPartials),
            "[p02]"
        );
    }
}
