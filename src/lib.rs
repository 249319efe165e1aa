//! # shipnotes
//!
//! A minimal static changelog generator. Your filesystem is the data source:
//! a directory of dated markdown release notes becomes a paginated HTML
//! changelog with per-entry pages, an optional year-grouped archive, tag
//! pages, and RSS/Atom/JSON Feed syndication.
//!
//! # Architecture: One-Pass Pipeline
//!
//! Every build runs the same single pass over a fresh read of the source
//! directory — no incremental state, no cross-build caches:
//!
//! ```text
//! source/  →  read  →  normalize  →  assemble  →  { paginate, feeds }  →  dist/
//!             (walk)    (parallel)    (sort +       (both read-only
//!                                      integrity)    over the collection)
//! ```
//!
//! Normalization is a pure per-entry function with no cross-entry
//! dependencies, so it maps over the raw records in parallel; the assembler
//! is the single synchronization point where all entries are sorted into the
//! one canonical `(date desc, slug asc)` order. Pagination and feed
//! generation both borrow the assembled collection and neither mutates it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Walks the source directory, reads raw entry records |
//! | [`authors`] | Handle → display identity registry with total, never-failing resolution |
//! | [`entry`] | Front matter parsing and normalization into canonical entries |
//! | [`collection`] | Sorting, duplicate-slug integrity check, tag index |
//! | [`paginate`] | Splits the collection into contiguous listing pages |
//! | [`feed`] | RSS 2.0, Atom, and JSON Feed 1.1 rendering |
//! | [`generate`] | Orchestrates a build and renders the HTML site with Maud |
//! | [`config`] | `changelog.toml` loading, defaults, validation |
//! | [`markdown`] | pulldown-cmark wrapper shared by pages and feeds |
//! | [`output`] | CLI output formatting for build and check results |
//!
//! # Design Decisions
//!
//! ## Authors Never Fail
//!
//! Author resolution is a total function: an unregistered handle (or a
//! missing authors map altogether) degrades to a placeholder whose name is
//! the handle itself. A changelog must never fail to build because someone
//! forgot to register themselves — the worst case is a plain name without an
//! avatar or link.
//!
//! ## Errors Carry Their Source
//!
//! Everything else that's wrong with the content is a build error, not a
//! warning: unparsable dates, missing titles, duplicate slugs, a zero page
//! size, an unknown feed format. Each error carries the offending path,
//! field, or value so the failure report is actionable.
//!
//! ## Atomic Publish
//!
//! The site is rendered into a staging directory and swapped into place with
//! a rename once complete. An interrupted or failed build leaves the
//! previously published output exactly as it was.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system: malformed markup is a build error, template variables
//! are Rust expressions, and all interpolation is auto-escaped. There is no
//! template directory to ship or get out of sync.

pub mod authors;
pub mod collection;
pub mod config;
pub mod entry;
pub mod feed;
pub mod generate;
pub mod markdown;
pub mod output;
pub mod paginate;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
