//! Collection assembly.
//!
//! Third stage of the shipnotes build pipeline and its synchronization
//! point: all normalized entries are observed here, sorted into the one
//! canonical order, and integrity-checked. The resulting [`Collection`] is
//! read-only; pagination and feed generation both borrow it and neither may
//! reorder or mutate it.
//!
//! ## Ordering
//!
//! Entries are sorted by `(date desc, slug asc)`. The order is a pure
//! function of entry dates and slugs — filesystem enumeration order never
//! leaks through.
//!
//! ## Integrity
//!
//! Two entries resolving to the same slug is a build error carrying both
//! source paths, not a silent overwrite.

use crate::entry::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("duplicate slug `{slug}` ({first} and {second})")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// The ordered entry sequence plus its derived tag index.
#[derive(Debug)]
pub struct Collection {
    entries: Vec<Entry>,
    tag_index: BTreeMap<String, Vec<usize>>,
}

/// Sort, integrity-check, and index the normalized entries.
pub fn assemble(mut entries: Vec<Entry>) -> Result<Collection, CollectionError> {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for entry in &entries {
        if let Some(first) = seen.get(entry.slug.as_str()) {
            return Err(CollectionError::DuplicateSlug {
                slug: entry.slug.clone(),
                first: (*first).to_string(),
                second: entry.source_path.clone(),
            });
        }
        seen.insert(&entry.slug, &entry.source_path);
    }

    let mut tag_index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        for tag in &entry.tags {
            tag_index.entry(tag.clone()).or_default().push(idx);
        }
    }

    Ok(Collection { entries, tag_index })
}

impl Collection {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `limit` most recent entries, or all of them when `limit` is
    /// absent.
    pub fn recent(&self, limit: Option<usize>) -> &[Entry] {
        match limit {
            Some(n) => &self.entries[..n.min(self.entries.len())],
            None => &self.entries,
        }
    }

    /// Tags in lexical order, each with the entries carrying it in
    /// collection order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, Vec<&Entry>)> {
        self.tag_index.iter().map(|(tag, indices)| {
            let entries = indices.iter().map(|&i| &self.entries[i]).collect();
            (tag.as_str(), entries)
        })
    }

    pub fn entries_for_tag(&self, tag: &str) -> Vec<&Entry> {
        self.tag_index
            .get(tag)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }
}
