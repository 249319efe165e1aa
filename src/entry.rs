//! Entry normalization.
//!
//! Second stage of the shipnotes build pipeline. Turns raw source records
//! into canonical [`Entry`] values: front matter is parsed, the date and slug
//! are derived, author handles are resolved, and an excerpt is cut from the
//! body. Entries are immutable after normalization.
//!
//! ## Entry Format
//!
//! ```text
//! ---
//! title: Dark mode                 # Optional if the body has a `# heading`
//! date: 2024-03-01                 # Optional if the filename carries a date
//! slug: dark-mode                  # Optional, derived from filename
//! authors: [alice, bob]            # Or a single handle: `authors: alice`
//! tags: [ui, accessibility]
//! description: Short excerpt.      # Optional explicit excerpt
//! draft: false                     # Drafts are skipped, not an error
//! ---
//!
//! Full release notes follow.
//!
//! <!-- truncate -->
//!
//! Everything below the marker is left out of the excerpt.
//! ```
//!
//! ## Derivation Rules
//!
//! - **Date**: front matter first, else a `YYYY-MM-DD-` filename prefix,
//!   else [`EntryError::MissingField`]. Accepted forms are RFC 3339,
//!   `YYYY-MM-DD`, and `YYYY-MM-DD HH:MM:SS`; anything else is rejected
//!   rather than guessed.
//! - **Title**: front matter first, else the first `# ` heading in the body.
//! - **Slug**: front matter first, else the slugified filename stem with any
//!   date prefix stripped.
//! - **Excerpt**: front matter `description`, else the body up to the
//!   `<!-- truncate -->` marker, else the first paragraph capped at the
//!   configured character budget.
//!
//! Normalization is a pure per-entry function with no cross-entry state, so
//! [`normalize_all`] maps over the raw records in parallel with
//! [rayon](https://docs.rs/rayon).

use crate::authors::{Author, AuthorRegistry};
use crate::source::RawEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Body text above this marker becomes the excerpt.
pub const TRUNCATE_MARKER: &str = "<!-- truncate -->";

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("{path}: invalid front matter: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    #[error(
        "{path}: unparsable date `{value}` (expected RFC 3339, YYYY-MM-DD, or YYYY-MM-DD HH:MM:SS)"
    )]
    Date { path: PathBuf, value: String },
}

/// A normalized changelog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Unique, stable URL slug.
    pub slug: String,
    pub title: String,
    /// Publication timestamp; the collection's primary sort key.
    pub date: DateTime<Utc>,
    /// Resolved authors, in front-matter order.
    pub authors: Vec<Author>,
    /// Sorted, deduplicated tag set.
    pub tags: Vec<String>,
    /// Markdown excerpt for listings and feed summaries.
    pub excerpt: String,
    /// Full markdown body with front matter stripped.
    pub content: String,
    /// Source path relative to the content root.
    pub source_path: String,
}

/// Knobs for excerpt derivation, lifted from the config record.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub excerpt_length: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            excerpt_length: 300,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    slug: Option<String>,
    date: Option<String>,
    authors: AuthorHandles,
    tags: Vec<String>,
    description: Option<String>,
    draft: bool,
}

/// `authors: alice` and `authors: [alice, bob]` are both accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum AuthorHandles {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl AuthorHandles {
    fn into_vec(self) -> Vec<String> {
        match self {
            AuthorHandles::None => vec![],
            AuthorHandles::One(handle) => vec![handle],
            AuthorHandles::Many(handles) => handles,
        }
    }
}

/// Normalize all raw entries in parallel.
///
/// Each entry is normalized from an immutable raw record with no cross-entry
/// dependency; the collection assembler downstream is the synchronization
/// point. Drafts are dropped here.
pub fn normalize_all(
    raws: &[RawEntry],
    registry: &AuthorRegistry,
    options: &NormalizeOptions,
) -> Result<Vec<Entry>, EntryError> {
    let normalized: Vec<Option<Entry>> = raws
        .par_iter()
        .map(|raw| normalize(raw, registry, options))
        .collect::<Result<_, _>>()?;

    Ok(normalized.into_iter().flatten().collect())
}

/// Normalize one raw entry. Returns `None` for drafts.
pub fn normalize(
    raw: &RawEntry,
    registry: &AuthorRegistry,
    options: &NormalizeOptions,
) -> Result<Option<Entry>, EntryError> {
    let (front, body) = split_front_matter(&raw.raw_text);

    let fm: FrontMatter = match front {
        Some(text) => {
            serde_yaml_ng::from_str(text).map_err(|source| EntryError::FrontMatter {
                path: raw.path.clone(),
                source,
            })?
        }
        None => FrontMatter::default(),
    };

    if fm.draft {
        return Ok(None);
    }

    let stem = raw
        .rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let filename_parts = split_filename_date(&stem);

    let date = match &fm.date {
        Some(value) => parse_date(value).ok_or_else(|| EntryError::Date {
            path: raw.path.clone(),
            value: value.clone(),
        })?,
        None => match filename_parts {
            Some((date, _)) => date.and_time(NaiveTime::MIN).and_utc(),
            None => {
                return Err(EntryError::MissingField {
                    path: raw.path.clone(),
                    field: "date",
                });
            }
        },
    };

    let title = fm
        .title
        .or_else(|| first_heading(body))
        .ok_or_else(|| EntryError::MissingField {
            path: raw.path.clone(),
            field: "title",
        })?;

    let slug_source = filename_parts
        .map(|(_, rest)| rest)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(&stem);
    let mut slug = match &fm.slug {
        Some(explicit) => slugify(explicit),
        None => slugify(slug_source),
    };
    if slug.is_empty() {
        slug = slugify(&title);
    }

    let authors: Vec<Author> = fm
        .authors
        .into_vec()
        .iter()
        .map(|handle| registry.resolve(handle))
        .collect();

    let mut tags = fm.tags;
    tags.sort();
    tags.dedup();

    let excerpt = match fm.description {
        Some(description) => description,
        None => derive_excerpt(body, options.excerpt_length),
    };

    Ok(Some(Entry {
        slug,
        title,
        date,
        authors,
        tags,
        excerpt,
        content: strip_truncate_marker(body.trim()),
        source_path: raw.rel_path.to_string_lossy().to_string(),
    }))
}

/// Split `---`-delimited YAML front matter from the body.
///
/// Returns `(None, full_text)` when the text doesn't open with a front
/// matter block or the block is never closed.
fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---\n").or_else(|| raw.strip_prefix("---\r\n")) else {
        return (None, raw);
    };

    let mut search = 0;
    while let Some(pos) = rest[search..].find("\n---") {
        let end = search + pos;
        let after = &rest[end + 4..];
        // The closing delimiter must be a full line
        if after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n") {
            let body = after.strip_prefix('\n').unwrap_or(after);
            return (Some(&rest[..end]), body);
        }
        search = end + 4;
    }

    (None, raw)
}

/// Parse an entry date. Accepted forms only; no guessing.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    None
}

/// Split a `YYYY-MM-DD-name` filename stem into its date and the remainder.
fn split_filename_date(stem: &str) -> Option<(NaiveDate, &str)> {
    let date = NaiveDate::parse_from_str(stem.get(..10)?, "%Y-%m-%d").ok()?;
    let rest = stem.get(10..).and_then(|r| r.strip_prefix('-')).unwrap_or("");
    Some((date, rest))
}

/// First `# ` heading in the body, used as the title fallback.
fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
}

/// Deterministic slugify: lowercase, non-alphanumeric runs collapsed to a
/// single hyphen, leading/trailing hyphens stripped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true; // suppress leading hyphen
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive an excerpt from the body: text above the truncate marker if
/// present, else the first non-heading paragraph capped at `cap` chars.
fn derive_excerpt(body: &str, cap: usize) -> String {
    if let Some(idx) = body.find(TRUNCATE_MARKER) {
        return body[..idx].trim().to_string();
    }

    let paragraph = body
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty() && !block.starts_with('#'))
        .unwrap_or("");

    if paragraph.chars().count() > cap {
        let truncated: String = paragraph.chars().take(cap).collect();
        format!("{}…", truncated.trim_end())
    } else {
        paragraph.to_string()
    }
}

fn strip_truncate_marker(body: &str) -> String {
    match body.find(TRUNCATE_MARKER) {
        Some(idx) => {
            let after = &body[idx + TRUNCATE_MARKER.len()..];
            format!("{}{}", &body[..idx].trim_end(), after)
        }
        None => body.to_string(),
    }
}
