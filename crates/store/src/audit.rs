use crate::documents::resolve_name;
use crate::error::Result;
use crate::text::{collect_files, read_text, Lookup};
use lens_scanner::{relative_path_string, ProjectLayout, ARCHIVE_DIR_NAME};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const REPORT_FILE_NAME: &str = "report.md";
pub const FINDINGS_DIR_NAME: &str = "findings";
pub const SUBSYSTEMS_DIR_NAME: &str = "subsystems";
pub const CURRENT_AUDIT: &str = "current";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditArtifactKind {
    #[default]
    Report,
    Findings,
    Subsystem,
    State,
    List,
}

impl AuditArtifactKind {
    pub const ALL: [AuditArtifactKind; 5] = [
        AuditArtifactKind::Report,
        AuditArtifactKind::Findings,
        AuditArtifactKind::Subsystem,
        AuditArtifactKind::State,
        AuditArtifactKind::List,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AuditArtifactKind::Report => "report",
            AuditArtifactKind::Findings => "findings",
            AuditArtifactKind::Subsystem => "subsystem",
            AuditArtifactKind::State => "state",
            AuditArtifactKind::List => "list",
        }
    }
}

impl fmt::Display for AuditArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown audit artifact type '{s}' (expected one of: report, findings, subsystem, state, list)"
                )
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub kind: AuditArtifactKind,
    pub subsystem: Option<String>,
    pub severity: Option<String>,
    pub audit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditFile {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_hits: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditArtifact {
    pub audit: String,
    pub kind: AuditArtifactKind,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsystem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    pub files: Vec<AuditFile>,
    pub available: Vec<String>,
}

impl AuditArtifact {
    fn new(audit: &str, query: &AuditQuery) -> Self {
        Self {
            audit: audit.to_string(),
            kind: query.kind,
            found: false,
            subsystem: None,
            severity: query.severity.clone(),
            files: Vec::new(),
            available: Vec::new(),
        }
    }
}

/// Read-only access to the current audit run and its archived predecessors.
#[derive(Debug, Clone)]
pub struct AuditStore {
    root: PathBuf,
    dir: PathBuf,
    archive_dir: PathBuf,
}

impl AuditStore {
    pub fn new(layout: &ProjectLayout) -> Self {
        Self {
            root: layout.root().to_path_buf(),
            dir: layout.audit_dir(),
            archive_dir: layout.audit_archive_dir(),
        }
    }

    /// Ids of archived audits, sorted.
    pub fn archived_ids(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.archive_dir) {
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

    /// Directory of the selected run. Ids are matched against the archive listing only.
    pub fn run_dir(&self, audit: Option<&str>) -> Result<Lookup<PathBuf>> {
        match audit.map(str::trim).filter(|id| !id.is_empty() && *id != CURRENT_AUDIT) {
            None if self.dir.is_dir() => Ok(Lookup::Found(self.dir.clone())),
            None => Ok(Lookup::NotFound {
                available: Vec::new(),
            }),
            Some(id) => {
                let ids = self.archived_ids()?;
                if ids.iter().any(|known| known == id) {
                    Ok(Lookup::Found(self.archive_dir.join(id)))
                } else {
                    Ok(Lookup::NotFound { available: ids })
                }
            }
        }
    }

    /// Content of the current run's report, if any.
    pub fn current_report(&self) -> Option<String> {
        report_path(&self.dir).and_then(|path| read_text(&path))
    }

    /// Every readable file of the current run (archive excluded), with content.
    pub fn current_files(&self) -> Result<Vec<AuditFile>> {
        let archive = self.dir.join(ARCHIVE_DIR_NAME);
        let mut files = Vec::new();
        for path in collect_files(&self.dir, &[], Some(&archive))? {
            if let Some(content) = read_text(&path) {
                files.push(self.file_entry(&path, Some(content), None));
            }
        }
        Ok(files)
    }

    pub fn artifact(&self, query: &AuditQuery) -> Result<AuditArtifact> {
        let label = query
            .audit
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(CURRENT_AUDIT);
        let mut artifact = AuditArtifact::new(label, query);
        let run = match self.run_dir(query.audit.as_deref())? {
            Lookup::Found(run) => run,
            Lookup::NotFound { available } => {
                artifact.available = available;
                return Ok(artifact);
            }
        };

        match query.kind {
            AuditArtifactKind::Report => match report_path(&run) {
                Some(path) => self.push_with_content(&mut artifact, &path),
                None => artifact.available = self.top_level_names(&run)?,
            },
            AuditArtifactKind::State => {
                let path = run.join(lens_scanner::DEFAULT_STATE_FILE_NAME);
                if path.is_file() {
                    self.push_with_content(&mut artifact, &path);
                } else {
                    artifact.available = self.top_level_names(&run)?;
                }
            }
            AuditArtifactKind::Findings => {
                let files = collect_files(&run.join(FINDINGS_DIR_NAME), &[], None)?;
                self.push_filtered(&mut artifact, &files, query.severity.as_deref());
            }
            AuditArtifactKind::Subsystem => {
                let names = self.subsystem_names(&run)?;
                let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let picked = query
                    .subsystem
                    .as_deref()
                    .and_then(|wanted| resolve_name(&name_refs, wanted));
                match picked {
                    Some(idx) => {
                        let dir = run.join(SUBSYSTEMS_DIR_NAME).join(&names[idx]);
                        let files = collect_files(&dir, &[], None)?;
                        artifact.subsystem = Some(names[idx].clone());
                        self.push_filtered(&mut artifact, &files, query.severity.as_deref());
                        artifact.found = true;
                    }
                    None => artifact.available = names,
                }
            }
            AuditArtifactKind::List => {
                let archive = run.join(ARCHIVE_DIR_NAME);
                for path in collect_files(&run, &[], Some(&archive))? {
                    artifact.files.push(self.file_entry(&path, None, None));
                }
                artifact.found = !artifact.files.is_empty();
            }
        }
        Ok(artifact)
    }

    fn push_with_content(&self, artifact: &mut AuditArtifact, path: &Path) {
        if let Some(content) = read_text(path) {
            artifact.files.push(self.file_entry(path, Some(content), None));
            artifact.found = true;
        }
    }

    fn push_filtered(&self, artifact: &mut AuditArtifact, files: &[PathBuf], severity: Option<&str>) {
        let severity = severity.map(str::trim).filter(|s| !s.is_empty());
        for path in files {
            let Some(content) = read_text(path) else {
                continue;
            };
            let hits = severity.map(|keyword| count_keyword(&content, keyword));
            if hits == Some(0) {
                continue;
            }
            artifact.files.push(self.file_entry(path, Some(content), hits));
        }
        artifact.found = !artifact.files.is_empty();
    }

    fn file_entry(&self, path: &Path, content: Option<String>, hits: Option<usize>) -> AuditFile {
        AuditFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: relative_path_string(&self.root, path)
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            size_bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            content,
            severity_hits: hits,
        }
    }

    fn subsystem_names(&self, run: &Path) -> Result<Vec<String>> {
        let dir = run.join(SUBSYSTEMS_DIR_NAME);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    fn top_level_names(&self, run: &Path) -> Result<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(run)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.') && name != ARCHIVE_DIR_NAME)
            .collect();
        names.sort();
        Ok(names)
    }
}

/// `report.md`, else the first top-level markdown file by name.
fn report_path(run: &Path) -> Option<PathBuf> {
    let report = run.join(REPORT_FILE_NAME);
    if report.is_file() {
        return Some(report);
    }
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(run)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Case-insensitive occurrences of `keyword`.
pub fn count_keyword(content: &str, keyword: &str) -> usize {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return 0;
    }
    content.to_lowercase().matches(&keyword).count()
}
