//! Posts with a front-matter header.
//!
//! A post file starts with a block of `key: value` lines fenced by `---`
//! lines, followed by the HTML body:
//!
//! ```text
//! ---
//! title: Moving house
//! date: 2024-01-05 10:00:00 UTC
//! state: post
//! ---
//! <p>The body.</p>
//! ```

use std::path::Path;

use indexmap::IndexMap;
use quire_template::Context;

use crate::error::{QuireError, Result};

/// A parsed post: front-matter fields plus the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    fields: IndexMap<String, String>,
    content: String,
}

impl Post {
    /// Parses post text.
    ///
    /// Front matter is optional; text without it is all content. Lines in
    /// the header without a `:` are ignored. Once the header closes, later
    /// `---` lines are ordinary content.
    ///
    /// ```rust
    /// use quire::Post;
    ///
    /// let post = Post::parse("---\ntitle: \"Hello\"\nstate: post\n---\n<p>Hi</p>");
    /// assert_eq!(post.get("title"), Some("Hello"));
    /// assert!(post.is_published());
    /// assert_eq!(post.content(), "<p>Hi</p>");
    /// ```
    pub fn parse(text: &str) -> Self {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut fields = IndexMap::new();
        let mut content = Vec::new();
        let mut lines = text.split('\n');
        let mut header_seen = false;

        while let Some(line) = lines.next() {
            if !header_seen && line.starts_with("---") {
                header_seen = true;
                for line in lines.by_ref() {
                    if line.starts_with("---") {
                        break;
                    }
                    if let Some((key, value)) = parse_field(line) {
                        fields.insert(key, value);
                    }
                }
                continue;
            }
            content.push(line);
        }

        Self {
            fields,
            content: content.join("\n"),
        }
    }

    /// Reads and parses a post file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| QuireError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Returns a front-matter field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The body, without the header.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether `state` is `post`. Anything else is a draft.
    pub fn is_published(&self) -> bool {
        self.get("state") == Some("post")
    }

    /// Front-matter fields in file order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builds a template context from the fields plus `content`.
    ///
    /// A front-matter field named `content` is replaced by the body.
    pub fn to_context(&self) -> Context {
        let mut ctx: Context = self.fields().collect();
        ctx.insert("content", self.content.as_str());
        ctx
    }
}

/// A post together with the slug it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFile {
    /// File name without the `.html` extension.
    pub slug: String,
    pub post: Post,
}

impl PostFile {
    pub fn new(slug: impl Into<String>, post: Post) -> Self {
        Self {
            slug: slug.into(),
            post,
        }
    }

    /// Site-relative URL of the post: `/blog/<slug>`.
    pub fn location(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

/// Loads every `.html` post in `dir`, newest first.
///
/// Post files are named so that they sort by date (`2024-01-05-moving.html`),
/// so newest first is reverse file-name order. Other files are ignored.
pub fn load_posts<P: AsRef<Path>>(dir: P) -> Result<Vec<PostFile>> {
    let dir = dir.as_ref();
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| QuireError::io(dir, e))? {
        let path = entry.map_err(|e| QuireError::io(dir, e))?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("html") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push((stem.to_string(), path));
            }
        }
    }
    names.sort_by(|a, b| b.0.cmp(&a.0));

    names
        .into_iter()
        .map(|(slug, path)| Ok(PostFile::new(slug, Post::from_file(&path)?)))
        .collect()
}

fn parse_field(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim().trim_matches('"');
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((key.to_string(), value.to_string()))
}
