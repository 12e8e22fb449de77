//! Atom feeds.
//!
//! Each entry carries the post body cut to the feed budget and escaped for
//! an `html`-typed `<content>` element.

use chrono::{DateTime, Utc};
use quire_template::escape_html;
use quire_truncate::Truncator;

use crate::config::QuireConfig;
use crate::date::{atom_date, parse_date};
use crate::post::PostFile;

/// Entries per feed.
pub const FEED_SIZE: usize = 10;

/// Builds the Atom document for a site.
///
/// ```rust
/// use quire::{Feed, Post, PostFile, QuireConfig};
///
/// let posts = vec![PostFile::new(
///     "hello",
///     Post::parse("---\ntitle: Hello\ndate: 2024-01-05 10:00:00 UTC\nstate: post\n---\n<p>Hi</p>"),
/// )];
/// let xml = Feed::new("Example", "https://example.com").render(&posts, &QuireConfig::default());
/// assert!(xml.contains("<id>https://example.com/blog/hello</id>"));
/// assert!(xml.contains("<content type='html'>&lt;p&gt;Hi&lt;&#x2F;p&gt;</content>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    name: String,
    host: String,
    size: usize,
    drafts: bool,
}

/// One `<entry>` of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub url: String,
    pub title: String,
    /// Set only when the post names an author other than the site.
    pub author: Option<String>,
    pub published: Option<DateTime<Utc>>,
    /// The post's `updated` field, falling back to `published`.
    pub updated: Option<DateTime<Utc>>,
    /// Truncated body, already escaped.
    pub content: String,
}

impl Feed {
    /// `host` is the site origin, such as `https://example.com`.
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        let host: String = host.into();
        Self {
            name: name.into(),
            host: host.trim_end_matches('/').to_string(),
            size: FEED_SIZE,
            drafts: false,
        }
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Includes drafts, for checking a feed before publishing.
    pub fn drafts(mut self, drafts: bool) -> Self {
        self.drafts = drafts;
        self
    }

    /// Collects up to `size` entries from `posts`, which must be newest first.
    pub fn entries(&self, posts: &[PostFile], budget: usize, truncator: &Truncator) -> Vec<FeedEntry> {
        posts
            .iter()
            .filter(|file| self.drafts || file.post.is_published())
            .take(self.size)
            .map(|file| self.entry(file, budget, truncator))
            .collect()
    }

    fn entry(&self, file: &PostFile, budget: usize, truncator: &Truncator) -> FeedEntry {
        let post = &file.post;
        let published = post.get("date").and_then(parse_date);
        let updated = post.get("updated").and_then(parse_date).or(published);
        if published.is_none() {
            tracing::debug!(post = %file.slug, "feed entry without a readable date");
        }

        FeedEntry {
            url: format!("{}{}", self.host, file.location()),
            title: post.get("title").unwrap_or_default().to_string(),
            author: post
                .get("author")
                .filter(|author| *author != self.name)
                .map(str::to_string),
            published,
            updated,
            content: escape_html(&truncator.truncate(post.content(), budget)),
        }
    }

    /// Renders the feed with the configured feed budget and truncation
    /// options.
    ///
    /// The feed's `<updated>` is the newest entry update, or now for a feed
    /// without dated entries.
    pub fn render(&self, posts: &[PostFile], config: &QuireConfig) -> String {
        let entries = self.entries(posts, config.feed_budget, &config.truncator());
        let updated = entries
            .iter()
            .filter_map(|e| e.updated)
            .max()
            .unwrap_or_else(Utc::now);

        let name = escape_html(&self.name);
        let host = &self.host;
        let mut lines = vec![
            "<?xml version='1.0' encoding='UTF-8'?>".to_string(),
            "<feed xmlns='http://www.w3.org/2005/Atom'>".to_string(),
            format!("<title>{name}</title>"),
            format!("<id>{host}/</id>"),
            format!("<icon>{host}/favicon.ico</icon>"),
            format!("<updated>{}</updated>", atom_date(&updated)),
            format!("<author><name>{name}</name></author>"),
            format!("<link rel='alternate' type='text/html' href='{host}/' />"),
            format!("<link rel='self' type='application/atom+xml' href='{host}/blog/atom.xml' />"),
        ];
        for entry in &entries {
            push_entry(&mut lines, entry);
        }
        lines.push("</feed>".to_string());
        lines.join("\n")
    }
}

fn push_entry(lines: &mut Vec<String>, entry: &FeedEntry) {
    let title = escape_html(&entry.title);
    lines.push("<entry>".to_string());
    lines.push(format!("<id>{}</id>", entry.url));
    if let Some(author) = &entry.author {
        lines.push(format!("<author><name>{}</name></author>", escape_html(author)));
    }
    if let Some(published) = &entry.published {
        lines.push(format!("<published>{}</published>", atom_date(published)));
    }
    if let Some(updated) = &entry.updated {
        lines.push(format!("<updated>{}</updated>", atom_date(updated)));
    }
    lines.push(format!("<title type='text'>{title}</title>"));
    lines.push(format!("<content type='html'>{}</content>", entry.content));
    lines.push(format!(
        "<link rel='alternate' type='text/html' href='{}' title='{title}' />",
        entry.url
    ));
    lines.push("</entry>".to_string());
}
