//! Static site generation.
//!
//! Final stage of the shipnotes build pipeline. Runs the full
//! read → normalize → assemble pass, then renders the listing pages, entry
//! pages, archive, tag pages, and feeds into the output directory.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Listing page 1
//! ├── page/2/index.html          # Further listing pages
//! ├── dark-mode/index.html       # One page per entry
//! ├── archive/index.html         # Year-grouped archive (when enabled)
//! ├── tags/index.html            # Tag index
//! ├── tags/ui/index.html         # Per-tag listings
//! ├── rss.xml                    # Feeds (per configured formats)
//! ├── atom.xml
//! └── feed.json
//! ```
//!
//! ## Atomic Publish
//!
//! The site is rendered into a hidden staging directory next to the output
//! directory and swapped in with a rename once complete. A failed build
//! leaves any previously generated output untouched.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The
//! stylesheet is embedded at compile time from `static/style.css`.

use crate::authors::{self, AuthorRegistry};
use crate::collection::{self, Collection};
use crate::config::{self, ChangelogConfig};
use crate::entry::{self, Entry, slugify};
use crate::feed::{self, FeedFormat, FeedMeta};
use crate::markdown;
use crate::paginate::{self, Page};
use crate::source;
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Source(#[from] source::SourceError),
    #[error(transparent)]
    Authors(#[from] authors::AuthorMapError),
    #[error(transparent)]
    Entry(#[from] entry::EntryError),
    #[error(transparent)]
    Collection(#[from] collection::CollectionError),
    #[error(transparent)]
    Paginate(#[from] paginate::PaginateError),
    #[error(transparent)]
    Feed(#[from] feed::FeedError),
}

/// What a build produced, for CLI reporting.
#[derive(Debug)]
pub struct BuildSummary {
    pub entries: usize,
    pub listing_pages: usize,
    pub entry_pages: usize,
    pub tag_pages: usize,
    pub archive_path: Option<String>,
    pub feeds: Vec<&'static str>,
}

const CSS: &str = include_str!("../static/style.css");

/// Run the read → normalize → assemble half of the pipeline.
///
/// Shared by `build` and `check`: everything up to (and including) the
/// integrity checks, without touching the output directory.
pub fn build_collection(
    source_dir: &Path,
    config: &ChangelogConfig,
) -> Result<Collection, GenerateError> {
    let raws = source::read_entries(source_dir)?;

    let map_path = config.authors_map.as_ref().map(|p| source_dir.join(p));
    let registry = AuthorRegistry::load(map_path.as_deref())?;

    let options = entry::NormalizeOptions {
        excerpt_length: config.excerpt_length,
    };
    let entries = entry::normalize_all(&raws, &registry, &options)?;

    Ok(collection::assemble(entries)?)
}

/// Build the changelog site from `source_dir` into `output_dir`.
pub fn generate(source_dir: &Path, output_dir: &Path) -> Result<BuildSummary, GenerateError> {
    let config = config::load_config(source_dir)?;
    let collection = build_collection(source_dir, &config)?;

    let staging = staging_dir(output_dir);
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let result = render_site(&config, &collection, &staging);
    if result.is_err() {
        let _ = fs::remove_dir_all(&staging);
    }
    let summary = result?;

    // Publish: the swap is the only step that touches existing output
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::rename(&staging, output_dir)?;

    Ok(summary)
}

/// Staging directory beside the output directory, on the same filesystem so
/// the publish rename stays atomic.
fn staging_dir(output_dir: &Path) -> PathBuf {
    let name = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "changelog".to_string());
    output_dir.with_file_name(format!(".{name}.staging"))
}

fn render_site(
    config: &ChangelogConfig,
    collection: &Collection,
    staging: &Path,
) -> Result<BuildSummary, GenerateError> {
    let pages = paginate::paginate(collection, config.page_size)?;
    let formats = feed::parse_formats(&config.feed.formats)?;
    let archive_path = config.archive.resolved_path();
    let has_tags = collection.tags().next().is_some();

    // Feeds
    let meta = FeedMeta {
        title: config.title.clone(),
        description: config.description.clone(),
        language: config.feed.language.clone(),
        link: config.link(""),
        limit: config.feed.limit,
    };
    for format in &formats {
        let document = feed::render(*format, collection, &meta)?;
        fs::write(staging.join(format.file_name()), document)?;
    }

    let sidebar = sidebar(config, collection, &archive_path, has_tags);

    // Listing pages
    for page in &pages {
        let content = render_listing(config, page);
        let rel = if page.number == 1 {
            String::new()
        } else {
            format!("page/{}", page.number)
        };
        write_page(
            staging,
            &rel,
            base_document(config, &config.title, &formats, &sidebar, content),
        )?;
    }

    // Entry pages
    for entry in collection.entries() {
        let content = entry_card(config, entry, true);
        write_page(
            staging,
            &entry.slug,
            base_document(config, &entry.title, &formats, &sidebar, content),
        )?;
    }

    // Archive
    if let Some(path) = &archive_path {
        let content = render_archive(config, collection);
        write_page(
            staging,
            path,
            base_document(config, "Archive", &formats, &sidebar, content),
        )?;
    }

    // Tag pages
    let mut tag_pages = 0;
    if has_tags {
        let content = render_tag_index(config, collection);
        write_page(
            staging,
            "tags",
            base_document(config, "Tags", &formats, &sidebar, content),
        )?;
        tag_pages += 1;

        for (tag, entries) in collection.tags() {
            let content = render_tag_listing(config, tag, &entries);
            write_page(
                staging,
                &format!("tags/{}", slugify(tag)),
                base_document(config, tag, &formats, &sidebar, content),
            )?;
            tag_pages += 1;
        }
    }

    Ok(BuildSummary {
        entries: collection.len(),
        listing_pages: pages.len(),
        entry_pages: collection.len(),
        tag_pages,
        archive_path,
        feeds: formats.iter().map(|f| f.file_name()).collect(),
    })
}

fn write_page(staging: &Path, rel: &str, document: Markup) -> std::io::Result<()> {
    let dir = if rel.is_empty() {
        staging.to_path_buf()
    } else {
        staging.join(rel)
    };
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("index.html"), document.into_string())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(
    config: &ChangelogConfig,
    page_title: &str,
    formats: &[FeedFormat],
    sidebar: &Markup,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.feed.language) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page_title) " | " (config.title) }
                @for format in formats {
                    link rel="alternate" type=(format.mime_type()) href=(config.href(format.file_name()));
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.layout {
                    main.content {
                        header.site-header {
                            h1.site-title { a href=(config.href("")) { (config.title) } }
                            @if !config.description.is_empty() {
                                p.site-description { (config.description) }
                            }
                        }
                        (content)
                    }
                    aside.sidebar { (sidebar.clone()) }
                }
            }
        }
    }
}

fn sidebar(
    config: &ChangelogConfig,
    collection: &Collection,
    archive_path: &Option<String>,
    has_tags: bool,
) -> Markup {
    html! {
        h2 { (config.sidebar_title) }
        ul.recent {
            @for entry in collection.recent(Some(config.sidebar_count)) {
                li { a href=(config.href(&format!("{}/", entry.slug))) { (entry.title) } }
            }
        }
        ul.site-nav {
            @if let Some(path) = archive_path {
                li { a href=(config.href(&format!("{path}/"))) { "Archive" } }
            }
            @if has_tags {
                li { a href=(config.href("tags/")) { "Tags" } }
            }
        }
    }
}

/// One entry, as a listing card (linked title + excerpt) or a full page
/// (plain title + complete body).
fn entry_card(config: &ChangelogConfig, entry: &Entry, full: bool) -> Markup {
    html! {
        article.entry {
            header {
                @if full {
                    h1.entry-title { (entry.title) }
                } @else {
                    h2.entry-title {
                        a href=(config.href(&format!("{}/", entry.slug))) { (entry.title) }
                    }
                }
                p.entry-meta {
                    time datetime=(entry.date.to_rfc3339()) { (entry.date.format("%Y-%m-%d")) }
                    @for author in &entry.authors {
                        span.author {
                            @if let Some(image) = &author.image_url {
                                img.avatar src=(image) alt=(author.name);
                            }
                            @if let Some(url) = &author.url {
                                a href=(url) { (author.name) }
                            } @else {
                                (author.name)
                            }
                        }
                    }
                }
            }
            @if full {
                div.entry-body { (PreEscaped(markdown::to_html(&entry.content))) }
            } @else {
                div.entry-excerpt { (PreEscaped(markdown::to_html(&entry.excerpt))) }
            }
            @if !entry.tags.is_empty() {
                ul.tags {
                    @for tag in &entry.tags {
                        li { a href=(config.href(&format!("tags/{}/", slugify(tag)))) { (tag) } }
                    }
                }
            }
        }
    }
}

fn render_listing(config: &ChangelogConfig, page: &Page<'_>) -> Markup {
    html! {
        @if page.entries.is_empty() {
            p.empty { "No entries yet." }
        }
        @for entry in page.entries {
            (entry_card(config, entry, false))
        }
        @if page.total > 1 {
            nav.pagination {
                @if page.has_previous() {
                    a.newer href=(listing_href(config, page.number - 1)) { "Newer entries" }
                }
                span.position { "Page " (page.number) " of " (page.total) }
                @if page.has_next() {
                    a.older href=(listing_href(config, page.number + 1)) { "Older entries" }
                }
            }
        }
    }
}

fn listing_href(config: &ChangelogConfig, number: usize) -> String {
    if number <= 1 {
        config.href("")
    } else {
        config.href(&format!("page/{number}/"))
    }
}

/// Archive page: entries grouped by year, newest year first.
fn render_archive(config: &ChangelogConfig, collection: &Collection) -> Markup {
    let mut years: BTreeMap<i32, Vec<&Entry>> = BTreeMap::new();
    for entry in collection.entries() {
        years.entry(entry.date.year()).or_default().push(entry);
    }

    html! {
        h1 { "Archive" }
        @for (year, entries) in years.iter().rev() {
            section.archive-year {
                h2 { (year) }
                ul {
                    @for entry in entries {
                        li {
                            time datetime=(entry.date.to_rfc3339()) { (entry.date.format("%Y-%m-%d")) }
                            " "
                            a href=(config.href(&format!("{}/", entry.slug))) { (entry.title) }
                        }
                    }
                }
            }
        }
    }
}

fn render_tag_index(config: &ChangelogConfig, collection: &Collection) -> Markup {
    html! {
        h1 { "Tags" }
        ul.tag-index {
            @for (tag, entries) in collection.tags() {
                li {
                    a href=(config.href(&format!("tags/{}/", slugify(tag)))) { (tag) }
                    span.count { " (" (entries.len()) ")" }
                }
            }
        }
    }
}

fn render_tag_listing(config: &ChangelogConfig, tag: &str, entries: &[&Entry]) -> Markup {
    html! {
        h1 { "Tagged " (tag) }
        @for entry in entries {
            (entry_card(config, entry, false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(root: &Path) {
        fs::write(
            root.join("2024-03-01-b.md"),
            "---\ntitle: B\ntags: [ui]\n---\n\nEntry B.\n",
        )
        .unwrap();
        fs::write(root.join("2024-01-01-a.md"), "# A\n\nEntry A.\n").unwrap();
    }

    #[test]
    fn generate_writes_expected_files() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("changelog");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();
        write_source(&source);

        let summary = generate(&source, &output).unwrap();
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.listing_pages, 1);

        assert!(output.join("index.html").exists());
        assert!(output.join("b/index.html").exists());
        assert!(output.join("a/index.html").exists());
        assert!(output.join("tags/ui/index.html").exists());
        assert!(output.join("rss.xml").exists());
        assert!(output.join("atom.xml").exists());
        assert!(output.join("feed.json").exists());
        // Archive is off by default
        assert!(!output.join("archive").exists());
        // No staging leftovers
        assert!(!staging_dir(&output).exists());
    }

    #[test]
    fn failed_build_leaves_previous_output_untouched() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("changelog");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("sentinel.html"), "previous build").unwrap();

        // Two entries resolving to the same slug
        fs::write(source.join("2024-01-01-same.md"), "# One\n\nBody.\n").unwrap();
        fs::write(source.join("2024-02-01-same.md"), "# Two\n\nBody.\n").unwrap();

        let result = generate(&source, &output);
        assert!(matches!(result, Err(GenerateError::Collection(_))));
        assert!(output.join("sentinel.html").exists());
        assert!(!staging_dir(&output).exists());
    }

    #[test]
    fn empty_source_still_renders_a_listing() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("changelog");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let summary = generate(&source, &output).unwrap();
        assert_eq!(summary.entries, 0);
        assert_eq!(summary.listing_pages, 1);

        let index = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(index.contains("No entries yet."));
    }

    #[test]
    fn listing_href_shape() {
        let config = ChangelogConfig::default();
        assert_eq!(listing_href(&config, 1), "/changelog/");
        assert_eq!(listing_href(&config, 3), "/changelog/page/3/");
    }

    #[test]
    fn staging_dir_is_sibling_and_hidden() {
        let staging = staging_dir(Path::new("/site/dist"));
        assert_eq!(staging, Path::new("/site/.dist.staging"));
    }
}
