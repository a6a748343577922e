use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MAX_TEXT_FILE_BYTES: u64 = 2_000_000;
const MAX_DESCRIPTION_CHARS: usize = 160;

/// Outcome of resolving a named artifact. Absence is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    NotFound { available: Vec<String> },
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Files under `dir` with one of `extensions` (any file when empty), sorted by path.
///
/// Hidden entries and the `exclude` subtree are skipped. A missing `dir` yields nothing.
pub(crate) fn collect_files(
    dir: &Path,
    extensions: &[&str],
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                return false;
            }
            exclude.map_or(true, |ex| entry.path() != ex)
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                log::debug!("Skipping unreadable entry under {}: {err}", dir.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if extensions.is_empty() || has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// UTF-8 content of a text file; unreadable, oversized or non-UTF-8 files read as absent.
pub(crate) fn read_text(path: &Path) -> Option<String> {
    let meta = std::fs::metadata(path).ok()?;
    if meta.len() > MAX_TEXT_FILE_BYTES {
        log::debug!("Skipping oversized file {}", path.display());
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            log::debug!("Skipping unreadable file {}: {err}", path.display());
            None
        }
    }
}

/// First meaningful line of a document, without heading markers or front matter.
pub(crate) fn describe(content: &str) -> String {
    let mut lines = content.lines().map(str::trim).peekable();
    if lines.peek() == Some(&"---") {
        lines.next();
        for line in lines.by_ref() {
            if line == "---" {
                break;
            }
        }
    }
    let line = lines
        .map(|line| line.trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    line.chars().take(MAX_DESCRIPTION_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn describe_skips_front_matter_and_headings() {
        assert_eq!(describe("---\ntitle: x\n---\n\n## Overview\nbody"), "Overview");
        assert_eq!(describe("\n\nplain first line\n"), "plain first line");
        assert_eq!(describe(""), "");
    }

    #[test]
    fn collect_files_filters_and_excludes() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        for rel in ["a.md", "b.TXT", "c.png", ".hidden/d.md", "skip/e.md", "keep/f.md"] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        let files = collect_files(root, &["md", "txt"], Some(&root.join("skip"))).unwrap();
        let rels: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rels, vec!["a.md", "b.TXT", "keep/f.md"]);
    }

    #[test]
    fn non_utf8_file_reads_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(read_text(&path), None);
    }
}
