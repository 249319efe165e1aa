//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Check
//!
//! ```text
//! Entries
//! 001 Dark mode (2024-03-01)
//!     Source: 2024-03-01-dark-mode.md
//! 002 SSO support (2024-02-01)
//!     Source: 2024-02-01-sso.md
//! ```
//!
//! ## Build
//!
//! ```text
//! 12 entries → 2 listing pages, 12 entry pages
//! Archive: archive/
//! Tags: 5 pages
//! Feeds: rss.xml, atom.xml, feed.json
//! ```

use crate::collection::Collection;
use crate::generate::BuildSummary;

/// Entry inventory for the `check` command.
pub fn format_check_output(collection: &Collection) -> Vec<String> {
    let mut lines = vec!["Entries".to_string()];

    if collection.is_empty() {
        lines.push("    (none)".to_string());
        return lines;
    }

    for (idx, entry) in collection.entries().iter().enumerate() {
        lines.push(format!(
            "{:03} {} ({})",
            idx + 1,
            entry.title,
            entry.date.format("%Y-%m-%d")
        ));
        lines.push(format!("    Source: {}", entry.source_path));
        if !entry.tags.is_empty() {
            lines.push(format!("    Tags: {}", entry.tags.join(", ")));
        }
    }

    lines
}

pub fn print_check_output(collection: &Collection) {
    for line in format_check_output(collection) {
        println!("{line}");
    }
}

/// Build result summary.
pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} → {} listing {}, {} entry {}",
        summary.entries,
        plural(summary.entries, "entry", "entries"),
        summary.listing_pages,
        plural(summary.listing_pages, "page", "pages"),
        summary.entry_pages,
        plural(summary.entry_pages, "page", "pages"),
    )];

    if let Some(path) = &summary.archive_path {
        lines.push(format!("Archive: {path}/"));
    }
    if summary.tag_pages > 0 {
        lines.push(format!(
            "Tags: {} {}",
            summary.tag_pages,
            plural(summary.tag_pages, "page", "pages")
        ));
    }
    if !summary.feeds.is_empty() {
        lines.push(format!("Feeds: {}", summary.feeds.join(", ")));
    }

    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{line}");
    }
}

fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}
