//! Content source discovery.
//!
//! First stage of the shipnotes build pipeline. Walks the source directory to
//! find changelog entry files and reads them into raw records for the
//! normalizer. Discovery order carries no meaning — the collection assembler
//! re-sorts by date — but the walk is name-sorted so logs stay stable.
//!
//! ## Recognized Files
//!
//! ```text
//! changelog/                       # Source root
//! ├── changelog.toml               # Configuration (skipped here)
//! ├── authors.json                 # Authors map (skipped here)
//! ├── 2024-03-01-dark-mode.md      # Entry (date prefix optional)
//! ├── 2024-02-01-sso.mdx           # Entry
//! ├── _template.md                 # Underscore prefix = skipped
//! └── 2023/                        # Entries may be nested
//!     └── 2023-11-12-launch.md
//! ```
//!
//! Files that don't match the recognized extensions are skipped, never an
//! error. A missing source directory is [`SourceError::NotFound`].

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source directory not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A raw, unparsed changelog entry read from disk.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// Full path to the source file.
    pub path: PathBuf,
    /// Path relative to the source root.
    pub rel_path: PathBuf,
    /// File contents, front matter included.
    pub raw_text: String,
}

const ENTRY_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Discover and read all entry files under `root`.
pub fn read_entries(root: &Path) -> Result<Vec<RawEntry>, SourceError> {
    if !root.is_dir() {
        return Err(SourceError::NotFound(root.to_path_buf()));
    }

    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e.file_name().to_string_lossy().as_ref(), e.depth()));

    for dirent in walker {
        let dirent = match dirent {
            Ok(d) => d,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                return Err(SourceError::Io {
                    path,
                    source: e.into(),
                });
            }
        };

        if !dirent.file_type().is_file() || !is_entry_file(dirent.path()) {
            continue;
        }

        let path = dirent.path().to_path_buf();
        let raw_text = fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let rel_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        entries.push(RawEntry {
            path,
            rel_path,
            raw_text,
        });
    }

    Ok(entries)
}

/// Hidden files and underscore-prefixed partials are skipped entirely.
fn is_skipped(name: &str, depth: usize) -> bool {
    depth > 0 && (name.starts_with('.') || name.starts_with('_'))
}

fn is_entry_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    ENTRY_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = read_entries(&tmp.path().join("nope"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn reads_markdown_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("2024-01-01-a.md"), "# A").unwrap();
        fs::write(tmp.path().join("2024-02-01-b.mdx"), "# B").unwrap();

        let entries = read_entries(tmp.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].raw_text, "# A");
        assert_eq!(entries[0].rel_path, Path::new("2024-01-01-a.md"));
    }

    #[test]
    fn skips_unrecognized_extensions() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("entry.md"), "# A").unwrap();
        fs::write(tmp.path().join("changelog.toml"), "title = \"x\"").unwrap();
        fs::write(tmp.path().join("authors.json"), "{}").unwrap();
        fs::write(tmp.path().join("notes.txt"), "notes").unwrap();

        let entries = read_entries(tmp.path()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn skips_hidden_and_underscore_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("entry.md"), "# A").unwrap();
        fs::write(tmp.path().join(".draft.md"), "# Hidden").unwrap();
        fs::write(tmp.path().join("_template.md"), "# Partial").unwrap();

        let entries = read_entries(tmp.path()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn walks_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let year = tmp.path().join("2023");
        fs::create_dir_all(&year).unwrap();
        fs::write(year.join("launch.md"), "# Launch").unwrap();
        fs::write(tmp.path().join("recent.md"), "# Recent").unwrap();

        let entries = read_entries(tmp.path()).unwrap();
        assert_eq!(entries.len(), 2);

        let rels: Vec<String> = entries
            .iter()
            .map(|e| e.rel_path.to_string_lossy().to_string())
            .collect();
        assert!(rels.iter().any(|r| r.contains("2023")));
    }

    #[test]
    fn empty_directory_yields_no_entries() {
        let tmp = TempDir::new().unwrap();
        let entries = read_entries(tmp.path()).unwrap();
        assert!(entries.is_empty());
    }
}
