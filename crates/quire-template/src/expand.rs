//! Recursive template expansion.
//!
//! Templates are expanded in four passes. Each pass runs over the whole
//! output of the previous one:
//!
//! 1. Sections: `{{#name}}body{{/name}}` is replaced by the body expanded once
//!    per list item (item keys shadow the outer context), once for `true`, or
//!    by nothing at all.
//! 2. Partials: `{{>name}}` is replaced by the resolved partial, expanded
//!    against the including template's context.
//! 3. Raw variables: `{{{name}}}` is replaced by the value verbatim.
//! 4. Escaped variables: `{{name}}` is replaced by the HTML-escaped value.
//!
//! Sections run first so that the variables inside a section body are bound
//! to the item being iterated, not to the outer context.
//!
//! # Example
//!
//! ```rust
//! use quire_template::{Context, Expander, PartialMap};
//!
//! let ctx = Context::new()
//!     .with("title", "Links")
//!     .with("links", vec![
//!         Context::new().with("name", "home"),
//!         Context::new().with("name", "about"),
//!     ]);
//! let partials = PartialMap::new().add("item", "<li>{{name}}</li>");
//!
//! let output = Expander::new().expand(
//!     "<h1>{{title}}</h1><ul>{{#links}}{{>item}}{{/links}}</ul>",
//!     &ctx,
//!     &partials,
//! );
//! assert_eq!(output, "<h1>Links</h1><ul><li>home</li><li>about</li></ul>");
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::context::{Context, Scope, Value};
use crate::error::ExpandError;
use crate::escape::escape_html;
use crate::partials::PartialResolver;

// Directive names: letters, digits, `_`, `-`, `.` and `/`.
static SECTION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([#/])\s*([-_/.\w]+)\s*\}\}").expect("valid section pattern"));
static PARTIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{>\s*([-_/.\w]+)\s*\}\}").expect("valid partial pattern"));
static RAW_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\{\s*([-_/.\w]+)\s*\}\}\}").expect("valid raw pattern"));
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([-_/.\w]+)\s*\}\}").expect("valid variable pattern"));

/// Expands templates against a [`Context`].
///
/// The expander itself holds only configuration, so one instance can be
/// shared freely between threads.
///
/// # Depth Limit
///
/// Every section body and every partial is expanded one level deeper than
/// its parent. A partial that includes itself would otherwise recurse without
/// end, so nesting beyond [`max_depth`](Self::max_depth) is cut off:
/// [`expand`](Self::expand) renders the over-deep part as empty, while
/// [`try_expand`](Self::try_expand) reports [`ExpandError::DepthExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    max_depth: usize,
}

impl Expander {
    /// Nesting limit used by [`Expander::new`].
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// Creates an expander with the default depth limit.
    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Returns the nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Expands `template`, never failing.
    ///
    /// Absent values, unknown partials and unmatched directives render as
    /// empty or literal text.
    pub fn expand<P>(&self, template: &str, context: &Context, partials: &P) -> String
    where
        P: PartialResolver + ?Sized,
    {
        self.render(template, &Scope::root(context), partials, 0, false)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "lenient expansion failed, rendering empty");
                String::new()
            })
    }

    /// Expands `template`, failing if the nesting limit is exceeded.
    pub fn try_expand<P>(
        &self,
        template: &str,
        context: &Context,
        partials: &P,
    ) -> Result<String, ExpandError>
    where
        P: PartialResolver + ?Sized,
    {
        self.render(template, &Scope::root(context), partials, 0, true)
    }

    fn render<P>(
        &self,
        template: &str,
        scope: &Scope<'_>,
        partials: &P,
        depth: usize,
        strict: bool,
    ) -> Result<String, ExpandError>
    where
        P: PartialResolver + ?Sized,
    {
        if depth > self.max_depth {
            if strict {
                return Err(ExpandError::DepthExceeded {
                    limit: self.max_depth,
                });
            }
            tracing::warn!(
                limit = self.max_depth,
                "template nesting exceeds depth limit, rendering empty"
            );
            return Ok(String::new());
        }

        let output = self.expand_sections(template, scope, partials, depth, strict)?;
        let output = self.expand_partials(&output, scope, partials, depth, strict)?;
        let output = substitute(&RAW_VARIABLE, &output, scope, false);
        Ok(substitute(&VARIABLE, &output, scope, true))
    }

    fn expand_sections<P>(
        &self,
        template: &str,
        scope: &Scope<'_>,
        partials: &P,
        depth: usize,
        strict: bool,
    ) -> Result<String, ExpandError>
    where
        P: PartialResolver + ?Sized,
    {
        let mut output = String::with_capacity(template.len());
        let mut cursor = 0;
        let mut search = 0;

        while let Some(open) = next_section_tag(template, search) {
            if !open.opening {
                // Orphan close tag stays literal.
                search = open.end;
                continue;
            }
            match find_close(template, open.end, open.name) {
                Some(close) => {
                    output.push_str(&template[cursor..open.start]);
                    let body = &template[skip_one_whitespace(template, open.end)..close.start];
                    output.push_str(
                        &self.render_section(open.name, body, scope, partials, depth, strict)?,
                    );
                    cursor = skip_one_whitespace(template, close.end);
                    search = cursor;
                }
                None => {
                    tracing::debug!(section = open.name, "section without close tag left literal");
                    search = open.end;
                }
            }
        }

        output.push_str(&template[cursor..]);
        Ok(output)
    }

    fn render_section<P>(
        &self,
        name: &str,
        body: &str,
        scope: &Scope<'_>,
        partials: &P,
        depth: usize,
        strict: bool,
    ) -> Result<String, ExpandError>
    where
        P: PartialResolver + ?Sized,
    {
        match scope.lookup(name) {
            Some(Value::List(items)) if !items.is_empty() => {
                let mut output = String::new();
                for item in items {
                    let child = scope.push(item);
                    output.push_str(&self.render(body, &child, partials, depth + 1, strict)?);
                }
                Ok(output)
            }
            Some(Value::Bool(true)) => self.render(body, scope, partials, depth + 1, strict),
            _ => Ok(String::new()),
        }
    }

    fn expand_partials<P>(
        &self,
        template: &str,
        scope: &Scope<'_>,
        partials: &P,
        depth: usize,
        strict: bool,
    ) -> Result<String, ExpandError>
    where
        P: PartialResolver + ?Sized,
    {
        let mut output = String::with_capacity(template.len());
        let mut last = 0;

        for caps in PARTIAL.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            output.push_str(&template[last..whole.start()]);
            let name = &caps[1];
            match partials.resolve(name) {
                Some(source) => {
                    output.push_str(&self.render(&source, scope, partials, depth + 1, strict)?)
                }
                None => tracing::debug!(partial = name, "unresolved partial renders empty"),
            }
            last = whole.end();
        }

        output.push_str(&template[last..]);
        Ok(output)
    }
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands `template` with the default [`Expander`].
///
/// ```rust
/// use quire_template::{expand, Context, NoPartials};
///
/// let ctx = Context::new().with("name", "<b>");
/// assert_eq!(expand("{{name}}", &ctx, &NoPartials), "&lt;b&gt;");
/// assert_eq!(expand("{{{name}}}", &ctx, &NoPartials), "<b>");
/// ```
pub fn expand<P>(template: &str, context: &Context, partials: &P) -> String
where
    P: PartialResolver + ?Sized,
{
    Expander::new().expand(template, context, partials)
}

/// A `{{#name}}` or `{{/name}}` tag located in a template.
struct SectionTag<'t> {
    start: usize,
    end: usize,
    opening: bool,
    name: &'t str,
}

fn next_section_tag(template: &str, from: usize) -> Option<SectionTag<'_>> {
    let caps = SECTION_TAG.captures_at(template, from)?;
    let whole = caps.get(0)?;
    Some(SectionTag {
        start: whole.start(),
        end: whole.end(),
        opening: &caps[1] == "#",
        name: caps.get(2)?.as_str(),
    })
}

/// Finds the close tag pairing with an open tag that ends at `from`.
///
/// Same-name sections nest, so the innermost open pairs with the innermost
/// close.
fn find_close<'t>(template: &'t str, from: usize, name: &str) -> Option<SectionTag<'t>> {
    let mut depth = 1usize;
    let mut search = from;
    while let Some(tag) = next_section_tag(template, search) {
        if tag.name == name {
            if tag.opening {
                depth += 1;
            } else {
                depth -= 1;
                if depth == 0 {
                    return Some(tag);
                }
            }
        }
        search = tag.end;
    }
    None
}

/// Returns `pos` advanced past a single whitespace character, if present.
fn skip_one_whitespace(text: &str, pos: usize) -> usize {
    match text[pos..].chars().next() {
        Some(ch) if ch.is_whitespace() => pos + ch.len_utf8(),
        _ => pos,
    }
}

fn substitute(pattern: &Regex, template: &str, scope: &Scope<'_>, escape: bool) -> String {
    pattern
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            if name.starts_with('/') {
                return caps[0].to_string();
            }
            match scope.lookup(name) {
                Some(value) if escape => escape_html(&value.render()),
                Some(value) => value.render(),
                None => {
                    tracing::trace!(name, "missing variable renders empty");
                    String::new()
                }
            }
        })
        .into_owned()
}
