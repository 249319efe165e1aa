//! Changelog configuration module.
//!
//! Handles loading and validating `changelog.toml` from the source directory.
//! The configuration is a single immutable record: every recognized option
//! has an explicit default, and validation happens once at build start so the
//! pipeline never has to deal with conditional defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Changelog"            # Site and feed title
//! description = ""               # Site and feed description
//! site_url = ""                  # Absolute URL prefix for permalinks/feeds
//! route_base_path = "changelog"  # URL prefix for rendered routes
//! page_size = 20                 # Entries per listing page, or "all"
//! excerpt_length = 300           # Char cap for derived excerpts
//! authors_map = "authors.json"   # Authors map file, relative to the source dir
//! sidebar_count = 5              # Recent entries shown in the sidebar
//! sidebar_title = "Recent"
//!
//! [archive]
//! enabled = true                 # Convenience alias for the default path
//! route_path = "archive"         # Presence of a path is authoritative
//!
//! [feed]
//! formats = ["all"]              # Any of "rss", "atom", "json", or "all"
//! language = "en"
//! limit = 20                     # Omit to cover the whole collection
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown
//! top-level keys are rejected to catch typos early.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::feed;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),
    #[error(transparent)]
    Feed(#[from] feed::FeedError),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Entries per listing page.
///
/// `All` collapses the listing to a single unbounded page. A numeric size of
/// zero deserializes but is rejected by [`ChangelogConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    All,
    Limit(usize),
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Keyword(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(PageSize::Limit(n as usize)),
            Raw::Keyword(s) if s == "all" => Ok(PageSize::All),
            Raw::Keyword(s) => Err(D::Error::custom(format!(
                "expected a number or \"all\", got \"{s}\""
            ))),
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PageSize::All => serializer.serialize_str("all"),
            PageSize::Limit(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

/// Changelog configuration loaded from `changelog.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChangelogConfig {
    /// Site and feed title.
    pub title: String,
    /// Site and feed description.
    pub description: String,
    /// Absolute URL prefix (`https://example.com`) used for feed permalinks.
    /// Empty means root-relative links.
    pub site_url: String,
    /// URL prefix for all rendered routes.
    pub route_base_path: String,
    /// Entries per listing page, or `"all"` for a single page.
    pub page_size: PageSize,
    /// Character cap applied when deriving an excerpt from the first
    /// paragraph of an entry body.
    pub excerpt_length: usize,
    /// Authors map file (JSON or YAML), relative to the source directory.
    /// A missing file is fine; `authors_map = false` is not recognized —
    /// point it at a nonexistent file to run with zero authors.
    pub authors_map: Option<String>,
    /// Number of recent entries listed in the page sidebar.
    pub sidebar_count: usize,
    /// Heading above the sidebar listing.
    pub sidebar_title: String,
    /// Archive page settings.
    pub archive: ArchiveConfig,
    /// Feed generation settings.
    pub feed: FeedConfig,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            title: "Changelog".to_string(),
            description: String::new(),
            site_url: String::new(),
            route_base_path: "changelog".to_string(),
            page_size: PageSize::Limit(20),
            excerpt_length: 300,
            authors_map: Some("authors.json".to_string()),
            sidebar_count: 5,
            sidebar_title: "Recent".to_string(),
            archive: ArchiveConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl ChangelogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == PageSize::Limit(0) {
            return Err(ConfigError::InvalidPageSize(0));
        }
        if self.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "excerpt_length must be at least 1".into(),
            ));
        }
        feed::parse_formats(&self.feed.formats)?;
        Ok(())
    }

    /// Root-relative href for a path under the changelog route base.
    ///
    /// `href("")` is the listing root, `href("page/2/")` the second listing
    /// page, `href("dark-mode/")` an entry page.
    pub fn href(&self, rel: &str) -> String {
        let base = self.route_base_path.trim_matches('/');
        if base.is_empty() {
            format!("/{rel}")
        } else {
            format!("/{base}/{rel}")
        }
    }

    /// Like [`Self::href`] but prefixed with `site_url` when one is set.
    pub fn link(&self, rel: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), self.href(rel))
    }

    /// Permalink for an entry slug.
    pub fn entry_permalink(&self, slug: &str) -> String {
        self.link(&format!("{slug}/"))
    }
}

/// Archive page settings.
///
/// The path's presence is authoritative; the boolean is a convenience alias.
/// `enabled = true` with no path turns on the default `"archive"` path, and
/// `enabled = false` is ignored when a path is explicitly set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    pub enabled: Option<bool>,
    pub route_path: Option<String>,
}

impl ArchiveConfig {
    /// The effective archive route path, or `None` when disabled.
    pub fn resolved_path(&self) -> Option<String> {
        match (&self.route_path, self.enabled) {
            (Some(path), _) => Some(path.trim_matches('/').to_string()),
            (None, Some(true)) => Some("archive".to_string()),
            (None, _) => None,
        }
    }
}

/// Feed generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Format selectors: any of `"rss"`, `"atom"`, `"json"`, or `"all"`.
    pub formats: Vec<String>,
    /// Feed language code.
    pub language: String,
    /// Most-recent entry cap per feed. Absent means the whole collection.
    pub limit: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            formats: vec!["all".to_string()],
            language: "en".to_string(),
            limit: None,
        }
    }
}

/// Load configuration from `changelog.toml` in the source directory.
///
/// Uses defaults if the file doesn't exist. The returned config has already
/// been validated.
pub fn load_config(source_dir: &Path) -> Result<ChangelogConfig, ConfigError> {
    let config_path = source_dir.join("changelog.toml");

    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        ChangelogConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// A stock `changelog.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# shipnotes configuration. All options are optional - defaults shown.

title = "Changelog"            # Site and feed title
description = ""               # Site and feed description
site_url = ""                  # Absolute URL prefix for permalinks/feeds
route_base_path = "changelog"  # URL prefix for rendered routes
page_size = 20                 # Entries per listing page, or "all"
excerpt_length = 300           # Char cap for derived excerpts
authors_map = "authors.json"   # Authors map file (JSON or YAML)
sidebar_count = 5              # Recent entries shown in the sidebar
sidebar_title = "Recent"

[archive]
# enabled = true               # Archive at the default "archive" path
# route_path = "archive"       # Explicit path wins over `enabled`

[feed]
formats = ["all"]              # Any of "rss", "atom", "json", or "all"
language = "en"
# limit = 20                   # Omit to cover the whole collection
"#
}
