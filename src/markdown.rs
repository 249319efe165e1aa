//! Markdown rendering helpers.
//!
//! Thin wrapper around [pulldown-cmark](https://docs.rs/pulldown-cmark) with
//! GFM extensions (tables, strikethrough, task lists) enabled. Used for entry
//! bodies and excerpts in both the HTML pages and the syndication feeds.

use pulldown_cmark::{Options, Parser, html::push_html};

/// Render a markdown fragment to HTML.
pub fn to_html(markdown: &str) -> String {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut html = String::with_capacity(markdown.len() * 2);
    push_html(&mut html, parser);
    html
}
