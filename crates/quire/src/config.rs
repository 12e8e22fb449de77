//! Site configuration.
//!
//! Every field has a default, so a configuration file only lists what it
//! changes:
//!
//! ```yaml
//! name: Example Site
//! max_depth: 16
//! preview_budget: 300
//! cache: false
//! truncate:
//!   atomic: [pre, code, img, table, figure]
//!   ellipsis: "..."
//! ```

use std::path::Path;

use quire_template::Expander;
use quire_truncate::{TruncateOptions, Truncator};
use serde::{Deserialize, Serialize};

use crate::cache::RenderCache;
use crate::error::{QuireError, Result};
use crate::preview::{FEED_BUDGET, PREVIEW_BUDGET};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    /// Site name: the feed title and the default post author.
    pub name: String,

    /// Nesting limit for sections and partials.
    pub max_depth: usize,

    /// Visible characters shown in a listing preview.
    pub preview_budget: usize,

    /// Visible characters kept in a feed entry.
    pub feed_budget: usize,

    /// Memoize rendered pages. Turn off while editing templates.
    pub cache: bool,

    pub truncate: TruncateOptions,
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_depth: Expander::DEFAULT_MAX_DEPTH,
            preview_budget: PREVIEW_BUDGET,
            feed_budget: FEED_BUDGET,
            cache: true,
            truncate: TruncateOptions::default(),
        }
    }
}

impl QuireConfig {
    /// Parses configuration from YAML.
    ///
    /// ```rust
    /// use quire::QuireConfig;
    ///
    /// let config = QuireConfig::from_yaml("cache: false\n").unwrap();
    /// assert!(!config.cache);
    /// assert_eq!(config.preview_budget, 250);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        parse_yaml(yaml, "yaml")
    }

    /// Parses configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        parse_json(json, "json")
    }

    /// Loads configuration from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`QuireError::Io`] if the file cannot be read, and
    /// [`QuireError::Config`] if it cannot be parsed or has another extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let content = std::fs::read_to_string(path).map_err(|e| QuireError::io(path, e))?;
        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => parse_yaml(&content, &origin)?,
            Some("json") => parse_json(&content, &origin)?,
            _ => {
                return Err(QuireError::Config {
                    origin,
                    message: "expected a .yaml, .yml or .json file".to_string(),
                })
            }
        };

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Builds an expander with the configured nesting limit.
    pub fn expander(&self) -> Expander {
        Expander::new().with_max_depth(self.max_depth)
    }

    /// Builds a truncator from the `truncate` section.
    pub fn truncator(&self) -> Truncator {
        Truncator::with_options(self.truncate.clone())
    }

    /// Builds a render cache, enabled or not per the `cache` flag.
    pub fn render_cache(&self) -> RenderCache {
        RenderCache::new(self.cache)
    }
}

fn parse_yaml(yaml: &str, origin: &str) -> Result<QuireConfig> {
    // An empty document is null, which would not deserialize into a struct.
    if yaml.trim().is_empty() {
        return Ok(QuireConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| QuireError::Config {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}

fn parse_json(json: &str, origin: &str) -> Result<QuireConfig> {
    serde_json::from_str(json).map_err(|e| QuireError::Config {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}
