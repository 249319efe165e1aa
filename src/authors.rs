//! Author registry.
//!
//! Loads a mapping from author handle to display identity, used to enrich
//! entries with names, avatars, and links. The registry file is optional and
//! so is every handle in it: resolution is a total function. An unregistered
//! handle degrades to a bare-handle placeholder and never fails the build.
//!
//! ## Map File Formats
//!
//! JSON (`authors.json`):
//!
//! ```json
//! {
//!   "alice": {
//!     "name": "Alice Chen",
//!     "title": "Maintainer",
//!     "url": "https://github.com/alice",
//!     "image_url": "https://github.com/alice.png"
//!   }
//! }
//! ```
//!
//! YAML (`authors.yml` / `authors.yaml`) with the same shape. Only malformed
//! syntax is an error; a missing file produces an empty registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthorMapError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed authors map {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("malformed authors map {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
    #[error("unsupported authors map format: {0} (expected .json, .yml, or .yaml)")]
    UnsupportedFormat(PathBuf),
}

/// Display identity for an author handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub socials: BTreeMap<String, String>,
}

impl Author {
    /// Minimal author for an unregistered handle: the handle is the name.
    pub fn placeholder(handle: &str) -> Self {
        Self {
            name: handle.to_string(),
            title: None,
            url: None,
            image_url: None,
            socials: BTreeMap::new(),
        }
    }
}

/// Handle → [`Author`] mapping, loaded once per build.
#[derive(Debug, Default)]
pub struct AuthorRegistry {
    authors: BTreeMap<String, Author>,
}

impl AuthorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the registry from an optional map file.
    ///
    /// An unset path or an absent file produces an empty registry — the
    /// changelog is usable with zero authors configured. Only malformed
    /// mapping syntax is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AuthorMapError> {
        let Some(path) = path else {
            return Ok(Self::empty());
        };
        if !path.exists() {
            return Ok(Self::empty());
        }

        let content = fs::read_to_string(path).map_err(|source| AuthorMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let authors = match ext.as_str() {
            "json" => serde_json::from_str(&content).map_err(|source| AuthorMapError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            "yml" | "yaml" => {
                serde_yaml_ng::from_str(&content).map_err(|source| AuthorMapError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => return Err(AuthorMapError::UnsupportedFormat(path.to_path_buf())),
        };

        Ok(Self { authors })
    }

    /// Resolve a handle to its author. Total: unregistered handles get a
    /// placeholder with `name = handle`.
    pub fn resolve(&self, handle: &str) -> Author {
        self.authors
            .get(handle)
            .cloned()
            .unwrap_or_else(|| Author::placeholder(handle))
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}
