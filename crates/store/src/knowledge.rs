//! Bundled knowledge bases: one subdirectory per base, optional `manifest.json`.
//!
//! Reads never leave the selected base directory.

use crate::error::KnowledgeError;
use crate::text::{collect_files, read_text, Lookup};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
const INDEX_CANDIDATES: &[&str] = &["index.md", "README.md"];

type Result<T> = std::result::Result<T, KnowledgeError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Manifest {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    index: Option<String>,
}

/// Metadata for one knowledge base. Never carries file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeBaseInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeFile {
    pub knowledge_base_id: String,
    pub relative_path: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct KnowledgeLibrary {
    root: PathBuf,
}

impl KnowledgeLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids of every base, sorted. A missing root has none.
    pub fn ids(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Metadata for all bases, or for `id` alone.
    pub fn list(&self, id: Option<&str>) -> Result<Vec<KnowledgeBaseInfo>> {
        let ids = self.ids()?;
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                let id = self.known_id(&ids, id)?;
                Ok(vec![self.info(id)?])
            }
            None => ids.iter().map(|id| self.info(id)).collect(),
        }
    }

    /// Content of `relative_path` inside base `id`, or of its index file when omitted.
    pub fn read(&self, id: &str, relative_path: Option<&str>) -> Result<Lookup<KnowledgeFile>> {
        let ids = self.ids()?;
        let id = self.known_id(&ids, id.trim())?;
        let base = self.root.join(id);

        let relative = match relative_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => path.to_string(),
            None => match self.index_file(&base) {
                Some(index) => index,
                None => {
                    return Ok(Lookup::NotFound {
                        available: self.files(&base)?,
                    })
                }
            },
        };

        let Some(target) = contained_path(&base, &relative) else {
            return Err(KnowledgeError::PathEscape {
                id: id.to_string(),
                path: relative,
            });
        };
        if !target.is_file() {
            return Ok(Lookup::NotFound {
                available: self.files(&base)?,
            });
        }
        let canonical_base = base.canonicalize()?;
        let canonical_target = target.canonicalize()?;
        if !canonical_target.starts_with(&canonical_base) {
            return Err(KnowledgeError::PathEscape {
                id: id.to_string(),
                path: relative,
            });
        }

        match read_text(&canonical_target) {
            Some(content) => Ok(Lookup::Found(KnowledgeFile {
                knowledge_base_id: id.to_string(),
                relative_path: relative.replace('\\', "/"),
                content,
            })),
            None => Ok(Lookup::NotFound {
                available: self.files(&base)?,
            }),
        }
    }

    fn known_id<'a>(&self, ids: &'a [String], id: &str) -> Result<&'a str> {
        ids.iter()
            .find(|known| known.as_str() == id)
            .map(String::as_str)
            .ok_or_else(|| KnowledgeError::UnknownBase {
                id: id.to_string(),
                available: ids.to_vec(),
            })
    }

    fn info(&self, id: &str) -> Result<KnowledgeBaseInfo> {
        let base = self.root.join(id);
        let manifest = load_manifest(&base);
        Ok(KnowledgeBaseInfo {
            id: id.to_string(),
            name: manifest.name.clone().unwrap_or_else(|| id.to_string()),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            index: manifest
                .index
                .filter(|index| contained_path(&base, index).is_some_and(|p| p.is_file()))
                .or_else(|| self.default_index(&base)),
            files: self.files(&base)?,
        })
    }

    fn index_file(&self, base: &Path) -> Option<String> {
        load_manifest(base)
            .index
            .filter(|index| contained_path(base, index).is_some_and(|p| p.is_file()))
            .or_else(|| self.default_index(base))
    }

    fn default_index(&self, base: &Path) -> Option<String> {
        INDEX_CANDIDATES
            .iter()
            .find(|name| base.join(name).is_file())
            .map(|name| name.to_string())
    }

    fn files(&self, base: &Path) -> Result<Vec<String>> {
        let files = collect_files(base, &[], None).map_err(|err| match err {
            crate::StoreError::IoError(io) => KnowledgeError::IoError(io),
            crate::StoreError::WalkError(walk) => KnowledgeError::IoError(walk.into()),
        })?;
        Ok(files
            .iter()
            .filter_map(|path| path.strip_prefix(base).ok())
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .filter(|rel| rel != MANIFEST_FILE_NAME)
            .collect())
    }
}

fn load_manifest(base: &Path) -> Manifest {
    let Some(raw) = read_text(&base.join(MANIFEST_FILE_NAME)) else {
        return Manifest::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed manifest in {}: {err}", base.display());
        Manifest::default()
    })
}

/// `base/relative` when `relative` is a plain relative path with no parent, root, or prefix parts.
pub fn contained_path(base: &Path, relative: &str) -> Option<PathBuf> {
    let rel = Path::new(relative);
    if rel.is_absolute() {
        return None;
    }
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, KnowledgeLibrary) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("knowledge");
        write(
            &root,
            "security/manifest.json",
            r#"{"name":"Security patterns","version":"1.2.0","description":"Common issues","index":"overview.md"}"#,
        );
        write(&root, "security/overview.md", "# Overview\n");
        write(&root, "security/patterns/reentrancy.md", "# Reentrancy\n");
        write(&root, "templates/README.md", "# Templates\n");
        write(tmp.path(), "secret.txt", "do not read");
        let library = KnowledgeLibrary::new(root);
        (tmp, library)
    }

    #[test]
    fn lists_metadata_without_content() {
        let (_tmp, library) = fixture();
        let bases = library.list(None).unwrap();
        assert_eq!(bases.len(), 2);
        assert_eq!(bases[0].id, "security");
        assert_eq!(bases[0].name, "Security patterns");
        assert_eq!(bases[0].version.as_deref(), Some("1.2.0"));
        assert_eq!(bases[0].index.as_deref(), Some("overview.md"));
        assert_eq!(bases[0].files, vec!["overview.md", "patterns/reentrancy.md"]);
        assert_eq!(bases[1].name, "templates");
        assert_eq!(bases[1].index.as_deref(), Some("README.md"));
    }

    #[test]
    fn reads_index_and_named_files() {
        let (_tmp, library) = fixture();
        let index = library.read("security", None).unwrap().found().unwrap();
        assert_eq!(index.relative_path, "overview.md");
        assert_eq!(index.content, "# Overview\n");

        let file = library
            .read("security", Some("./patterns/reentrancy.md"))
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(file.content, "# Reentrancy\n");
    }

    #[test]
    fn missing_file_lists_alternatives() {
        let (_tmp, library) = fixture();
        match library.read("templates", Some("nope.md")).unwrap() {
            Lookup::NotFound { available } => assert_eq!(available, vec!["README.md"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn escaping_paths_fail_closed() {
        let (tmp, library) = fixture();
        let absolute = tmp.path().join("secret.txt");
        for path in [
            "../../secret.txt",
            "patterns/../../secret.txt",
            absolute.to_str().unwrap(),
        ] {
            let err = library.read("security", Some(path)).unwrap_err();
            assert!(
                matches!(err, KnowledgeError::PathEscape { .. }),
                "{path}: {err:?}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_base_fails_closed() {
        let (tmp, library) = fixture();
        std::os::unix::fs::symlink(
            tmp.path().join("secret.txt"),
            tmp.path().join("knowledge/security/leak.md"),
        )
        .unwrap();
        let err = library.read("security", Some("leak.md")).unwrap_err();
        assert!(matches!(err, KnowledgeError::PathEscape { .. }));
    }

    #[test]
    fn unknown_base_is_an_error() {
        let (_tmp, library) = fixture();
        for id in ["missing", "..", "security/patterns"] {
            match library.read(id, None).unwrap_err() {
                KnowledgeError::UnknownBase { available, .. } => {
                    assert_eq!(available, vec!["security", "templates"])
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(matches!(
            library.list(Some("missing")),
            Err(KnowledgeError::UnknownBase { .. })
        ));
    }

    #[test]
    fn missing_root_has_no_bases() {
        let tmp = tempfile::tempdir().unwrap();
        let library = KnowledgeLibrary::new(tmp.path().join("none"));
        assert!(library.list(None).unwrap().is_empty());
    }
}
