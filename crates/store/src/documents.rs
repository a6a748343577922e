use crate::error::Result;
use crate::text::{collect_files, describe, read_text, Lookup};
use chrono::{DateTime, Utc};
use lens_scanner::{relative_path_string, ProjectLayout};
use serde::Serialize;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];
const DECISION_EXTENSIONS: &[&str] = &["md"];

/// A generated text artifact. Decision records share the shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub name: String,
    pub path: String,
    pub description: String,
    pub content: String,
    #[serde(skip)]
    pub modified: Option<DateTime<Utc>>,
}

pub type DecisionRecord = Document;

/// Catalog entry without content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub name: String,
    pub path: String,
    pub description: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            name: doc.name.clone(),
            path: doc.path.clone(),
            description: doc.description.clone(),
        }
    }
}

/// Read-only view over one directory of generated text files.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    dir: PathBuf,
    exclude: Option<PathBuf>,
    extensions: &'static [&'static str],
}

impl DocumentStore {
    /// Documents under the docs directory, minus the decisions subtree.
    pub fn documents(layout: &ProjectLayout) -> Self {
        Self {
            root: layout.root().to_path_buf(),
            dir: layout.docs_dir(),
            exclude: Some(layout.decisions_dir()),
            extensions: DOCUMENT_EXTENSIONS,
        }
    }

    pub fn decisions(layout: &ProjectLayout) -> Self {
        Self {
            root: layout.root().to_path_buf(),
            dir: layout.decisions_dir(),
            exclude: None,
            extensions: DECISION_EXTENSIONS,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every readable file, sorted by name then path.
    pub fn list(&self) -> Result<Vec<Document>> {
        let files = collect_files(&self.dir, self.extensions, self.exclude.as_deref())?;
        let mut docs: Vec<Document> = files.iter().filter_map(|p| self.load(p)).collect();
        docs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        Ok(docs)
    }

    pub fn catalog(&self) -> Result<Vec<DocumentSummary>> {
        Ok(self.list()?.iter().map(DocumentSummary::from).collect())
    }

    /// Resolve one document by name: exact (case-insensitive) first, then substring.
    pub fn get(&self, name: &str) -> Result<Lookup<Document>> {
        let docs = self.list()?;
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        match resolve_name(&names, name) {
            Some(idx) => Ok(Lookup::Found(docs[idx].clone())),
            None => Ok(Lookup::NotFound {
                available: names.into_iter().map(str::to_string).collect(),
            }),
        }
    }

    /// Records whose name or content mentions `topic` (case-insensitive). `None` keeps all.
    pub fn filter_by_topic(&self, topic: Option<&str>) -> Result<Vec<Document>> {
        let docs = self.list()?;
        let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(docs);
        };
        let needle = topic.to_lowercase();
        Ok(docs
            .into_iter()
            .filter(|doc| {
                doc.name.to_lowercase().contains(&needle)
                    || doc.content.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Newest modification time across the store, if any file exists.
    pub fn newest_modified(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.list()?.iter().filter_map(|d| d.modified).max())
    }

    fn load(&self, path: &Path) -> Option<Document> {
        let content = read_text(path)?;
        let name = path.file_stem()?.to_string_lossy().into_owned();
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        Some(Document {
            name,
            path: relative_path_string(&self.root, path)
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            description: describe(&content),
            content,
            modified,
        })
    }
}

/// Index of the first name equal to `query` ignoring case, else the first containing it.
pub fn resolve_name(names: &[&str], query: &str) -> Option<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    names
        .iter()
        .position(|name| name.to_lowercase() == query)
        .or_else(|| {
            names
                .iter()
                .position(|name| name.to_lowercase().contains(&query))
        })
}
