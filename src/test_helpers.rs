//! Shared test utilities for the shipnotes test suite.
//!
//! Provides ready-made [`Entry`] builders for the collection, pagination,
//! feed, and output tests, so those suites can exercise ordering and
//! rendering logic without touching the filesystem or front matter parsing.

use crate::authors::Author;
use crate::entry::Entry;
use chrono::{NaiveDate, NaiveTime};

/// An entry dated `date` (`YYYY-MM-DD`) with slug-derived title and paths.
pub fn entry(slug: &str, date: &str) -> Entry {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_time(NaiveTime::MIN)
        .and_utc();

    Entry {
        slug: slug.to_string(),
        title: format!("Release {slug}"),
        date,
        authors: vec![],
        tags: vec![],
        excerpt: format!("Excerpt for {slug}."),
        content: format!("Full notes for {slug}."),
        source_path: format!("{slug}.md"),
    }
}

/// Like [`entry`], with tags.
pub fn entry_tagged(slug: &str, date: &str, tags: &[&str]) -> Entry {
    let mut e = entry(slug, date);
    e.tags = tags.iter().map(|t| t.to_string()).collect();
    e
}

/// Like [`entry`], with placeholder authors for the given handles.
pub fn entry_authored(slug: &str, date: &str, handles: &[&str]) -> Entry {
    let mut e = entry(slug, date);
    e.authors = handles.iter().map(|h| Author::placeholder(h)).collect();
    e
}
