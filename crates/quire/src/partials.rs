//! Partials read from a template directory.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use quire_template::PartialResolver;

/// Resolves `{{>name}}` to the file `root/name`.
///
/// The root is trusted, the names are not: absolute names and names with a
/// `..` component never leave the root and resolve to nothing. Files are read
/// on every lookup, so edits show up without a restart. Wrap rendering in a
/// [`RenderCache`](crate::RenderCache) to avoid rereading.
///
/// Inline partials added with [`DirPartials::add`] take precedence over files.
///
/// ```rust,ignore
/// use quire::{expand, Context, DirPartials};
///
/// let partials = DirPartials::new("./site").add("footer.html", "<footer/>");
/// let html = expand("{{>header.html}}{{>footer.html}}", &Context::new(), &partials);
/// ```
#[derive(Debug, Clone)]
pub struct DirPartials {
    root: PathBuf,
    inline: HashMap<String, String>,
}

impl DirPartials {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inline: HashMap::new(),
        }
    }

    /// Adds an inline partial that shadows any file of the same name.
    pub fn add(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.inline.insert(name.into(), source.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a partial name to a path under the root, if the name is safe.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if name.is_empty() || relative.is_absolute() {
            return None;
        }
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        safe.then(|| self.root.join(relative))
    }
}

impl PartialResolver for DirPartials {
    fn resolve(&self, name: &str) -> Option<String> {
        if let Some(source) = self.inline.get(name) {
            return Some(source.clone());
        }

        let Some(path) = self.path_for(name) else {
            tracing::debug!(partial = name, "rejected partial name outside template root");
            return None;
        };

        match std::fs::read_to_string(&path) {
            Ok(source) => Some(source),
            Err(err) => {
                tracing::debug!(
                    partial = name,
                    path = %path.display(),
                    %err,
                    "partial not readable"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("header.html"), "<h1>{{title}}</h1>").unwrap();
        fs::create_dir(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/item.html"), "<li>{{name}}</li>").unwrap();
        dir
    }

    #[test]
    fn test_resolves_files() {
        let dir = site();
        let partials = DirPartials::new(dir.path());
        assert_eq!(
            partials.resolve("header.html").as_deref(),
            Some("<h1>{{title}}</h1>")
        );
        assert_eq!(
            partials.resolve("blog/item.html").as_deref(),
            Some("<li>{{name}}</li>")
        );
        assert_eq!(
            partials.resolve("./header.html").as_deref(),
            Some("<h1>{{title}}</h1>")
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = site();
        assert_eq!(DirPartials::new(dir.path()).resolve("nope.html"), None);
    }

    #[test]
    fn test_directory_is_none() {
        let dir = site();
        assert_eq!(DirPartials::new(dir.path()).resolve("blog"), None);
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = site();
        let inner = dir.path().join("blog");
        let partials = DirPartials::new(&inner);
        assert_eq!(partials.resolve("../header.html"), None);
        assert_eq!(partials.resolve("x/../../header.html"), None);
        let absolute = dir.path().join("header.html");
        assert_eq!(partials.resolve(absolute.to_str().unwrap()), None);
        assert_eq!(partials.resolve(""), None);
    }

    #[test]
    fn test_inline_shadows_file() {
        let dir = site();
        let partials = DirPartials::new(dir.path()).add("header.html", "inline");
        assert_eq!(partials.resolve("header.html").as_deref(), Some("inline"));
    }

    #[test]
    fn test_rereads_on_each_lookup() {
        let dir = site();
        let partials = DirPartials::new(dir.path());
        fs::write(dir.path().join("header.html"), "changed").unwrap();
        assert_eq!(partials.resolve("header.html").as_deref(), Some("changed"));
    }
}
