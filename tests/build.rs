//! End-to-end build tests over a real temporary source tree.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use shipnotes::generate::{GenerateError, generate};

struct Site {
    _tmp: TempDir,
    source: PathBuf,
    output: PathBuf,
}

fn site() -> Site {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("changelog");
    let output = tmp.path().join("dist");
    fs::create_dir_all(&source).unwrap();
    Site {
        source,
        output,
        _tmp: tmp,
    }
}

fn write_entry(source: &Path, filename: &str, front: &str, body: &str) {
    fs::write(source.join(filename), format!("---\n{front}---\n\n{body}\n")).unwrap();
}

/// Three entries dated 2024-01-01, 2024-03-01, 2024-02-01 with slugs
/// `a`, `b`, `c` — the ordering/pagination fixture used throughout.
fn write_three_entries(source: &Path) {
    write_entry(source, "a.md", "title: Alpha\ndate: 2024-01-01\n", "Notes A.");
    write_entry(source, "b.md", "title: Beta\ndate: 2024-03-01\n", "Notes B.");
    write_entry(source, "c.md", "title: Gamma\ndate: 2024-02-01\n", "Notes C.");
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn paginated_build_matches_expected_layout() {
    let site = site();
    write_three_entries(&site.source);
    fs::write(
        site.source.join("changelog.toml"),
        "page_size = 2\n\n[feed]\nlimit = 2\n",
    )
    .unwrap();

    generate(&site.source, &site.output).unwrap();

    // Page 1 = [b, c], page 2 = [a]
    let page1 = read(&site.output.join("index.html"));
    let page2 = read(&site.output.join("page/2/index.html"));

    assert!(page1.contains("Beta") && page1.contains("Gamma"));
    assert!(!page1.contains("Alpha"));
    assert!(page1.find("Beta").unwrap() < page1.find("Gamma").unwrap());
    assert!(page2.contains("Alpha"));
    assert!(page2.contains("Page 2 of 2"));

    // RSS with limit=2 contains [b, c] in that order, and not a
    let rss = read(&site.output.join("rss.xml"));
    assert!(rss.find("Beta").unwrap() < rss.find("Gamma").unwrap());
    assert!(!rss.contains("Alpha"));
    assert!(rss.contains("Mar 2024 00:00:00 +0000"));

    // Entry pages exist under their slugs
    assert!(site.output.join("a/index.html").exists());
    assert!(site.output.join("b/index.html").exists());
    assert!(site.output.join("c/index.html").exists());
}

#[test]
fn zero_page_size_fails_before_producing_output() {
    let site = site();
    write_three_entries(&site.source);
    fs::write(site.source.join("changelog.toml"), "page_size = 0\n").unwrap();

    let result = generate(&site.source, &site.output);
    assert!(matches!(result, Err(GenerateError::Config(_))));
    assert!(!site.output.exists());
}

#[test]
fn page_size_all_renders_single_page() {
    let site = site();
    write_three_entries(&site.source);
    fs::write(site.source.join("changelog.toml"), "page_size = \"all\"\n").unwrap();

    let summary = generate(&site.source, &site.output).unwrap();
    assert_eq!(summary.listing_pages, 1);
    assert!(!site.output.join("page").exists());

    let index = read(&site.output.join("index.html"));
    assert!(index.contains("Alpha") && index.contains("Beta") && index.contains("Gamma"));
}

#[test]
fn authors_resolved_from_map_with_ghost_fallback() {
    let site = site();
    fs::write(
        site.source.join("authors.json"),
        r#"{"alice": {"name": "Alice Chen", "url": "https://github.com/alice"}}"#,
    )
    .unwrap();
    write_entry(
        &site.source,
        "release.md",
        "title: Release\ndate: 2024-03-01\nauthors: [alice, ghost]\n",
        "Notes.",
    );

    generate(&site.source, &site.output).unwrap();

    let page = read(&site.output.join("release/index.html"));
    assert!(page.contains("Alice Chen"));
    assert!(page.contains("https://github.com/alice"));
    // Unregistered handle degrades to a bare name, never fails the build
    assert!(page.contains("ghost"));
}

#[test]
fn archive_and_tags_rendered_when_configured() {
    let site = site();
    fs::write(site.source.join("changelog.toml"), "[archive]\nenabled = true\n").unwrap();
    write_entry(
        &site.source,
        "2023-11-12-launch.md",
        "title: Launch\ntags: [milestone]\n",
        "We shipped.",
    );
    write_entry(
        &site.source,
        "2024-03-01-dark-mode.md",
        "title: Dark mode\ntags: [ui, milestone]\n",
        "Now with less light.",
    );

    let summary = generate(&site.source, &site.output).unwrap();
    assert_eq!(summary.archive_path.as_deref(), Some("archive"));
    assert_eq!(summary.tag_pages, 3); // index + milestone + ui

    let archive = read(&site.output.join("archive/index.html"));
    // Newest year first
    assert!(archive.find("2024").unwrap() < archive.find("2023").unwrap());

    let milestone = read(&site.output.join("tags/milestone/index.html"));
    assert!(milestone.contains("Launch"));
    assert!(milestone.contains("Dark mode"));
    assert!(milestone.find("Dark mode").unwrap() < milestone.find("Launch").unwrap());

    let tag_index = read(&site.output.join("tags/index.html"));
    assert!(tag_index.contains("milestone"));
    assert!(tag_index.contains("(2)"));
}

#[test]
fn feed_format_selection_respected() {
    let site = site();
    write_three_entries(&site.source);
    fs::write(
        site.source.join("changelog.toml"),
        "[feed]\nformats = [\"json\"]\n",
    )
    .unwrap();

    let summary = generate(&site.source, &site.output).unwrap();
    assert_eq!(summary.feeds, vec!["feed.json"]);
    assert!(site.output.join("feed.json").exists());
    assert!(!site.output.join("rss.xml").exists());
    assert!(!site.output.join("atom.xml").exists());

    let parsed: serde_json::Value = serde_json::from_str(&read(&site.output.join("feed.json"))).unwrap();
    let titles: Vec<&str> = parsed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Beta", "Gamma", "Alpha"]);
}

#[test]
fn rebuild_replaces_previous_output() {
    let site = site();
    write_three_entries(&site.source);
    generate(&site.source, &site.output).unwrap();
    assert!(site.output.join("c/index.html").exists());

    // Remove one entry and rebuild: stale pages must not survive
    fs::remove_file(site.source.join("c.md")).unwrap();
    generate(&site.source, &site.output).unwrap();
    assert!(!site.output.join("c/index.html").exists());
    assert!(site.output.join("b/index.html").exists());
}

#[test]
fn entry_parse_error_names_the_file() {
    let site = site();
    write_three_entries(&site.source);
    write_entry(&site.source, "broken.md", "title: Broken\ndate: someday\n", "Body.");

    let result = generate(&site.source, &site.output);
    match result {
        Err(GenerateError::Entry(e)) => {
            assert!(e.to_string().contains("broken.md"));
            assert!(e.to_string().contains("someday"));
        }
        other => panic!("expected entry error, got {other:?}"),
    }
    assert!(!site.output.exists());
}

#[test]
fn missing_source_directory_is_reported() {
    let tmp = TempDir::new().unwrap();
    let result = generate(&tmp.path().join("nope"), &tmp.path().join("dist"));
    assert!(matches!(result, Err(GenerateError::Source(_))));
}
