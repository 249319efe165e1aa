//! Feed generation.
//!
//! Renders the assembled collection into syndication documents: RSS 2.0,
//! Atom, and JSON Feed 1.1. Each feed covers at most the N most recent
//! entries (N from config; absent means the whole collection) in collection
//! order. Feeds are stateless output artifacts, regenerated wholesale each
//! build, and an empty collection produces a valid empty document rather
//! than an error.
//!
//! Fields absent on an entry (no authors, no tags) are omitted from the
//! output, never emitted empty. Timestamps derive from entry dates — the
//! newest entry stamps the channel — so a feed is a pure function of the
//! collection.

use crate::collection::Collection;
use crate::entry::Entry;
use crate::markdown;
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("unsupported feed format `{0}` (expected rss, atom, json, or all)")]
    UnsupportedFormat(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One syndication output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedFormat {
    Rss,
    Atom,
    Json,
}

impl FeedFormat {
    /// Parse a single selector. `"all"` is handled by [`parse_formats`].
    pub fn parse(selector: &str) -> Result<Self, FeedError> {
        match selector {
            "rss" => Ok(FeedFormat::Rss),
            "atom" => Ok(FeedFormat::Atom),
            "json" => Ok(FeedFormat::Json),
            other => Err(FeedError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Output file name under the changelog route.
    pub fn file_name(self) -> &'static str {
        match self {
            FeedFormat::Rss => "rss.xml",
            FeedFormat::Atom => "atom.xml",
            FeedFormat::Json => "feed.json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FeedFormat::Rss => "application/rss+xml",
            FeedFormat::Atom => "application/atom+xml",
            FeedFormat::Json => "application/feed+json",
        }
    }
}

/// Expand configured selectors into a deduplicated format list.
pub fn parse_formats(selectors: &[String]) -> Result<Vec<FeedFormat>, FeedError> {
    let mut formats = Vec::new();
    for selector in selectors {
        match selector.as_str() {
            "all" => formats.extend([FeedFormat::Rss, FeedFormat::Atom, FeedFormat::Json]),
            other => formats.push(FeedFormat::parse(other)?),
        }
    }
    formats.sort();
    formats.dedup();
    Ok(formats)
}

/// Channel-level metadata shared by all formats.
#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    pub language: String,
    /// URL of the changelog listing the feed belongs to.
    pub link: String,
    /// Most-recent entry cap. Absent covers the whole collection.
    pub limit: Option<usize>,
}

/// Render one feed document.
pub fn render(
    format: FeedFormat,
    collection: &Collection,
    meta: &FeedMeta,
) -> Result<String, FeedError> {
    match format {
        FeedFormat::Rss => Ok(render_rss(collection, meta)),
        FeedFormat::Atom => Ok(render_atom(collection, meta)),
        FeedFormat::Json => render_json(collection, meta),
    }
}

fn entry_link(meta: &FeedMeta, entry: &Entry) -> String {
    format!("{}{}/", with_trailing_slash(&meta.link), entry.slug)
}

fn with_trailing_slash(link: &str) -> String {
    if link.ends_with('/') {
        link.to_string()
    } else {
        format!("{link}/")
    }
}

/// Channel timestamp: the newest entry, or the epoch for an empty feed.
fn channel_updated(items: &[Entry]) -> DateTime<Utc> {
    items.first().map(|e| e.date).unwrap_or(DateTime::UNIX_EPOCH)
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_rss(collection: &Collection, meta: &FeedMeta) -> String {
    let items = collection.recent(meta.limit);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(
        "<rss version=\"2.0\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n",
    );
    out.push_str("  <channel>\n");
    out.push_str(&format!("    <title>{}</title>\n", xml_escape(&meta.title)));
    out.push_str(&format!("    <link>{}</link>\n", xml_escape(&meta.link)));
    out.push_str(&format!(
        "    <description>{}</description>\n",
        xml_escape(&meta.description)
    ));
    if !meta.language.is_empty() {
        out.push_str(&format!(
            "    <language>{}</language>\n",
            xml_escape(&meta.language)
        ));
    }
    out.push_str(&format!(
        "    <atom:link href=\"{}{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        xml_escape(&with_trailing_slash(&meta.link)),
        FeedFormat::Rss.file_name()
    ));
    out.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        channel_updated(items).to_rfc2822()
    ));

    for entry in items {
        let link = entry_link(meta, entry);
        out.push_str("    <item>\n");
        out.push_str(&format!(
            "      <title>{}</title>\n",
            xml_escape(&entry.title)
        ));
        out.push_str(&format!("      <link>{}</link>\n", xml_escape(&link)));
        out.push_str(&format!("      <guid>{}</guid>\n", xml_escape(&link)));
        out.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            entry.date.to_rfc2822()
        ));
        out.push_str(&format!(
            "      <description>{}</description>\n",
            xml_escape(&markdown::to_html(&entry.excerpt))
        ));
        for author in &entry.authors {
            out.push_str(&format!(
                "      <dc:creator>{}</dc:creator>\n",
                xml_escape(&author.name)
            ));
        }
        for tag in &entry.tags {
            out.push_str(&format!("      <category>{}</category>\n", xml_escape(tag)));
        }
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

fn render_atom(collection: &Collection, meta: &FeedMeta) -> String {
    let items = collection.recent(meta.limit);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    if meta.language.is_empty() {
        out.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
    } else {
        out.push_str(&format!(
            "<feed xmlns=\"http://www.w3.org/2005/Atom\" xml:lang=\"{}\">\n",
            xml_escape(&meta.language)
        ));
    }
    out.push_str(&format!("  <id>{}</id>\n", xml_escape(&meta.link)));
    out.push_str(&format!("  <title>{}</title>\n", xml_escape(&meta.title)));
    if !meta.description.is_empty() {
        out.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            xml_escape(&meta.description)
        ));
    }
    out.push_str(&format!(
        "  <updated>{}</updated>\n",
        channel_updated(items).to_rfc3339()
    ));
    out.push_str(&format!(
        "  <link href=\"{}\" rel=\"alternate\"/>\n",
        xml_escape(&meta.link)
    ));
    out.push_str(&format!(
        "  <link href=\"{}{}\" rel=\"self\" type=\"application/atom+xml\"/>\n",
        xml_escape(&with_trailing_slash(&meta.link)),
        FeedFormat::Atom.file_name()
    ));

    for entry in items {
        let link = entry_link(meta, entry);
        out.push_str("  <entry>\n");
        out.push_str(&format!("    <id>{}</id>\n", xml_escape(&link)));
        out.push_str(&format!(
            "    <title>{}</title>\n",
            xml_escape(&entry.title)
        ));
        out.push_str(&format!(
            "    <updated>{}</updated>\n",
            entry.date.to_rfc3339()
        ));
        out.push_str(&format!(
            "    <link href=\"{}\" rel=\"alternate\"/>\n",
            xml_escape(&link)
        ));
        if !entry.excerpt.is_empty() {
            out.push_str(&format!(
                "    <summary>{}</summary>\n",
                xml_escape(&entry.excerpt)
            ));
        }
        out.push_str(&format!(
            "    <content type=\"html\">{}</content>\n",
            xml_escape(&markdown::to_html(&entry.content))
        ));
        for author in &entry.authors {
            out.push_str("    <author>\n");
            out.push_str(&format!(
                "      <name>{}</name>\n",
                xml_escape(&author.name)
            ));
            if let Some(url) = &author.url {
                out.push_str(&format!("      <uri>{}</uri>\n", xml_escape(url)));
            }
            out.push_str("    </author>\n");
        }
        for tag in &entry.tags {
            out.push_str(&format!("    <category term=\"{}\"/>\n", xml_escape(tag)));
        }
        out.push_str("  </entry>\n");
    }

    out.push_str("</feed>\n");
    out
}

fn render_json(collection: &Collection, meta: &FeedMeta) -> Result<String, FeedError> {
    let items: Vec<serde_json::Value> = collection
        .recent(meta.limit)
        .iter()
        .map(|entry| {
            let link = entry_link(meta, entry);
            let mut item = json!({
                "id": link,
                "url": link,
                "title": entry.title,
                "date_published": entry.date.to_rfc3339(),
                "summary": entry.excerpt,
                "content_html": markdown::to_html(&entry.content),
            });
            if !entry.tags.is_empty() {
                item["tags"] = json!(entry.tags);
            }
            if !entry.authors.is_empty() {
                item["authors"] = entry
                    .authors
                    .iter()
                    .map(|author| {
                        let mut a = json!({ "name": author.name });
                        if let Some(url) = &author.url {
                            a["url"] = json!(url);
                        }
                        if let Some(image) = &author.image_url {
                            a["avatar"] = json!(image);
                        }
                        a
                    })
                    .collect();
            }
            item
        })
        .collect();

    let mut feed = json!({
        "version": "https://jsonfeed.org/version/1.1",
        "title": meta.title,
        "home_page_url": meta.link,
        "feed_url": format!("{}{}", with_trailing_slash(&meta.link), FeedFormat::Json.file_name()),
        "items": items,
    });
    if !meta.description.is_empty() {
        feed["description"] = json!(meta.description);
    }
    if !meta.language.is_empty() {
        feed["language"] = json!(meta.language);
    }

    Ok(serde_json::to_string_pretty(&feed)?)
}
