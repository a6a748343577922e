use crate::descriptor::WorkflowStateDescriptor;
use crate::error::Result;
use crate::layout::{ProjectLayout, ARCHIVE_DIR_NAME};
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

/// State files deeper than this inside a hidden directory are not considered.
const MAX_STATE_DEPTH: usize = 3;
const MAX_STATE_FILE_BYTES: u64 = 1_000_000;

/// Finds workflow state descriptors inside a project's top-level hidden directories.
pub struct ArtifactScanner {
    layout: ProjectLayout,
}

impl ArtifactScanner {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Discover every descriptor, sorted by project-relative path.
    ///
    /// Unreadable, oversized, unparseable, or kind-less candidates are skipped: producers may be
    /// mid-write and unrelated hidden directories are expected.
    pub fn scan(&self) -> Result<Vec<WorkflowStateDescriptor>> {
        let mut descriptors = Vec::new();
        for hidden in self.layout.hidden_dirs()? {
            self.scan_hidden_dir(&hidden, &mut descriptors);
        }
        descriptors.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        log::debug!(
            "Found {} workflow state descriptor(s) under {}",
            descriptors.len(),
            self.layout.root().display()
        );
        Ok(descriptors)
    }

    fn scan_hidden_dir(&self, dir: &Path, out: &mut Vec<WorkflowStateDescriptor>) {
        let walker = WalkDir::new(dir)
            .max_depth(MAX_STATE_DEPTH)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.depth() > 0 && is_archive_dir(entry)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("Skipping unreadable entry under {}: {err}", dir.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != self.layout.state_file_name() {
                continue;
            }
            if let Some(descriptor) = self.load(entry.path()) {
                out.push(descriptor);
            }
        }
    }

    fn load(&self, path: &Path) -> Option<WorkflowStateDescriptor> {
        let meta = std::fs::metadata(path).ok()?;
        if meta.len() > MAX_STATE_FILE_BYTES {
            log::debug!("Skipping oversized state file {}", path.display());
            return None;
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                log::debug!("Skipping unreadable state file {}: {err}", path.display());
                return None;
            }
        };
        let relative = self.layout.relative(path);
        let Some(mut descriptor) = WorkflowStateDescriptor::parse(path.to_path_buf(), relative, &raw)
        else {
            log::debug!(
                "Skipping {}: not a workflow state descriptor",
                path.display()
            );
            return None;
        };
        descriptor.file_modified = meta.modified().ok().map(DateTime::<Utc>::from);
        Some(descriptor)
    }

    /// Number of archived runs: entries of `<hidden>/archive/` across all hidden directories.
    pub fn count_archived_runs(&self) -> Result<usize> {
        let mut total = 0usize;
        for hidden in self.layout.hidden_dirs()? {
            let Ok(entries) = std::fs::read_dir(hidden.join(ARCHIVE_DIR_NAME)) else {
                continue;
            };
            total += entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
                .count();
        }
        Ok(total)
    }
}

fn is_archive_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == ARCHIVE_DIR_NAME
}
