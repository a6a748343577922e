use crate::error::Result;
use chrono::{DateTime, Utc};
use lens_scanner::{ArtifactScanner, NormalizedStatus, ProjectLayout, StatusRegistry};
use lens_store::{AuditStore, DocumentStore};

/// Everything the rules look at, gathered once per call.
#[derive(Debug, Clone, Default)]
pub struct ProjectFacts {
    pub workflows: Vec<NormalizedStatus>,
    pub latest_workflow_update: Option<DateTime<Utc>>,
    pub archived_runs: usize,
    pub document_count: usize,
    pub newest_document: Option<DateTime<Utc>>,
    pub decision_count: usize,
    pub source_dirs: Vec<String>,
    pub audit_report: Option<String>,
}

impl ProjectFacts {
    pub fn gather(layout: &ProjectLayout, registry: &StatusRegistry) -> Result<Self> {
        let scanner = ArtifactScanner::new(layout.clone());
        let descriptors = scanner.scan()?;
        let documents = DocumentStore::documents(layout).list()?;
        let decisions = DocumentStore::decisions(layout).list()?;

        Ok(Self {
            workflows: registry.aggregate(&descriptors),
            latest_workflow_update: descriptors
                .iter()
                .filter_map(|d| d.effective_updated())
                .max(),
            archived_runs: scanner.count_archived_runs()?,
            document_count: documents.len(),
            newest_document: documents.iter().filter_map(|d| d.modified).max(),
            decision_count: decisions.len(),
            source_dirs: layout.existing_source_dirs(),
            audit_report: AuditStore::new(layout).current_report(),
        })
    }
}
