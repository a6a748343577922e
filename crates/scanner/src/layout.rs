use std::path::{Component, Path, PathBuf};

pub const DEFAULT_DOCS_DIR: &str = "docs";
pub const DEFAULT_DECISIONS_DIR: &str = "docs/decisions";
pub const DEFAULT_AUDIT_DIR: &str = ".audit";
pub const DEFAULT_STATE_FILE_NAME: &str = "state.json";
pub const ARCHIVE_DIR_NAME: &str = "archive";

const DEFAULT_SOURCE_DIRS: &[&str] = &[
    "src",
    "lib",
    "programs",
    "contracts",
    "crates",
    "app",
    "packages",
];

/// Hidden directories that never carry workflow state.
const IGNORED_HIDDEN_DIRS: &[&str] = &[".git", ".hg", ".svn", ".jj"];

/// Where each artifact category lives inside a project.
///
/// Every directory except `root` is stored relative to the root so a layout can be rebased onto
/// another project without re-reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    docs_dir: PathBuf,
    decisions_dir: PathBuf,
    audit_dir: PathBuf,
    state_file_name: String,
    source_dirs: Vec<String>,
}

impl ProjectLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            decisions_dir: PathBuf::from(DEFAULT_DECISIONS_DIR),
            audit_dir: PathBuf::from(DEFAULT_AUDIT_DIR),
            state_file_name: DEFAULT_STATE_FILE_NAME.to_string(),
            source_dirs: DEFAULT_SOURCE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn with_root(&self, root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_decisions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.decisions_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_audit_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audit_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_state_file_name(mut self, name: impl Into<String>) -> Self {
        self.state_file_name = name.into();
        self
    }

    #[must_use]
    pub fn with_source_dirs(mut self, dirs: Vec<String>) -> Self {
        self.source_dirs = dirs;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join(&self.docs_dir)
    }

    pub fn decisions_dir(&self) -> PathBuf {
        self.root.join(&self.decisions_dir)
    }

    pub fn audit_dir(&self) -> PathBuf {
        self.root.join(&self.audit_dir)
    }

    pub fn audit_archive_dir(&self) -> PathBuf {
        self.audit_dir().join(ARCHIVE_DIR_NAME)
    }

    pub fn state_file_name(&self) -> &str {
        &self.state_file_name
    }

    pub fn source_dirs(&self) -> &[String] {
        &self.source_dirs
    }

    /// Source directories that currently exist under the root (sorted by configured order).
    pub fn existing_source_dirs(&self) -> Vec<String> {
        self.source_dirs
            .iter()
            .filter(|dir| self.root.join(dir.as_str()).is_dir())
            .cloned()
            .collect()
    }

    /// Top-level hidden directories of the project root, sorted by name.
    ///
    /// A missing root yields an empty list; other listing failures are returned.
    pub fn hidden_dirs(&self) -> std::io::Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                name.starts_with('.')
                    && name.len() > 1
                    && !IGNORED_HIDDEN_DIRS.contains(&name.as_ref())
            })
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.path())
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    /// Root-relative display path using forward slashes.
    pub fn relative(&self, path: &Path) -> String {
        relative_path_string(&self.root, path)
            .unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"))
    }
}

pub fn relative_path_string(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_dirs_skip_vcs_and_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::create_dir_all(root.join(".docs-run")).unwrap();
        std::fs::create_dir_all(root.join(".audit")).unwrap();
        std::fs::create_dir_all(root.join("visible")).unwrap();
        std::fs::write(root.join(".lens.toml"), "").unwrap();

        let layout = ProjectLayout::new(root);
        let names: Vec<String> = layout
            .hidden_dirs()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".audit", ".docs-run"]);
    }

    #[test]
    fn hidden_dirs_of_missing_root_is_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let layout = ProjectLayout::new(tmp.path().join("missing"));
        assert!(layout.hidden_dirs().unwrap().is_empty());
    }

    #[test]
    fn relative_uses_forward_slashes() {
        let layout = ProjectLayout::new("/work/project");
        assert_eq!(
            layout.relative(Path::new("/work/project/docs/decisions/adr-1.md")),
            "docs/decisions/adr-1.md"
        );
    }

    #[test]
    fn existing_source_dirs_respects_configured_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("programs")).unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        let layout = ProjectLayout::new(tmp.path());
        assert_eq!(layout.existing_source_dirs(), vec!["src", "programs"]);
    }
}
