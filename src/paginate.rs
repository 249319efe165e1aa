//! Pagination engine.
//!
//! Splits the assembled collection into contiguous listing pages. Pure
//! borrowing slices — a [`Page`] never owns or copies entries, and
//! concatenating all pages in order reproduces the collection exactly.
//!
//! An empty collection yields exactly one empty page, never zero, so the
//! rendering stage always has a stable target.

use crate::collection::Collection;
use crate::config::PageSize;
use crate::entry::Entry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaginateError {
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),
}

/// A contiguous slice of the collection plus its position metadata.
#[derive(Debug)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    /// Total number of pages.
    pub total: usize,
    pub entries: &'a [Entry],
}

impl Page<'_> {
    pub fn has_next(&self) -> bool {
        self.number < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Split the collection into pages of `size` entries.
///
/// [`PageSize::All`] yields a single unbounded page. A size of zero is
/// rejected before any page is produced.
pub fn paginate(collection: &Collection, size: PageSize) -> Result<Vec<Page<'_>>, PaginateError> {
    let entries = collection.entries();

    let per_page = match size {
        PageSize::All => {
            return Ok(vec![Page {
                number: 1,
                total: 1,
                entries,
            }]);
        }
        PageSize::Limit(0) => return Err(PaginateError::InvalidPageSize(0)),
        PageSize::Limit(n) => n,
    };

    if entries.is_empty() {
        return Ok(vec![Page {
            number: 1,
            total: 1,
            entries,
        }]);
    }

    let total = entries.len().div_ceil(per_page);
    Ok(entries
        .chunks(per_page)
        .enumerate()
        .map(|(idx, chunk)| Page {
            number: idx + 1,
            total,
            entries: chunk,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::assemble;
    use crate::test_helpers::entry;

    fn collection(n: usize) -> Collection {
        let entries = (0..n)
            .map(|i| entry(&format!("e{i:03}"), &format!("2024-01-{:02}", (i % 28) + 1)))
            .collect();
        assemble(entries).unwrap()
    }

    #[test]
    fn pages_concatenate_to_collection() {
        let col = collection(7);
        let pages = paginate(&col, PageSize::Limit(3)).unwrap();

        let concatenated: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.entries.iter().map(|e| e.slug.as_str()))
            .collect();
        let original: Vec<&str> = col.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(concatenated, original);
    }

    #[test]
    fn total_pages_is_ceil_of_n_over_p() {
        assert_eq!(paginate(&collection(7), PageSize::Limit(3)).unwrap().len(), 3);
        assert_eq!(paginate(&collection(6), PageSize::Limit(3)).unwrap().len(), 2);
        assert_eq!(paginate(&collection(1), PageSize::Limit(3)).unwrap().len(), 1);
    }

    #[test]
    fn every_page_but_last_is_full() {
        let col = collection(7);
        let pages = paginate(&col, PageSize::Limit(3)).unwrap();
        assert_eq!(pages[0].entries.len(), 3);
        assert_eq!(pages[1].entries.len(), 3);
        assert_eq!(pages[2].entries.len(), 1);
    }

    #[test]
    fn page_metadata() {
        let col = collection(5);
        let pages = paginate(&col, PageSize::Limit(2)).unwrap();

        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].total, 3);
        assert!(!pages[0].has_previous());
        assert!(pages[0].has_next());

        assert!(pages[1].has_previous());
        assert!(pages[1].has_next());

        assert!(pages[2].has_previous());
        assert!(!pages[2].has_next());
    }

    #[test]
    fn all_mode_is_one_page() {
        let col = collection(50);
        let pages = paginate(&col, PageSize::All).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].entries.len(), 50);
        assert!(!pages[0].has_next());
    }

    #[test]
    fn empty_collection_yields_one_empty_page() {
        let col = collection(0);
        let pages = paginate(&col, PageSize::Limit(10)).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].total, 1);
        assert!(pages[0].entries.is_empty());

        let all = paginate(&col, PageSize::All).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn zero_page_size_is_error() {
        let col = collection(3);
        let result = paginate(&col, PageSize::Limit(0));
        assert!(matches!(result, Err(PaginateError::InvalidPageSize(0))));
    }
}
