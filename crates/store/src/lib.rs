//! # Lens Store
//!
//! Read-only accessors over the artifacts workflows leave behind:
//!
//! - [`DocumentStore`]: generated documents and decision records
//! - [`AuditStore`]: the current audit run and archived audits
//! - [`KnowledgeLibrary`]: bundled, versioned knowledge bases
//!
//! Missing directories read as empty; named lookups that miss return
//! [`Lookup::NotFound`] with the alternatives instead of failing.

mod audit;
mod documents;
mod error;
mod knowledge;
mod text;

pub use audit::{
    count_keyword, AuditArtifact, AuditArtifactKind, AuditFile, AuditQuery, AuditStore,
    CURRENT_AUDIT, FINDINGS_DIR_NAME, REPORT_FILE_NAME, SUBSYSTEMS_DIR_NAME,
};
pub use documents::{resolve_name, DecisionRecord, Document, DocumentStore, DocumentSummary};
pub use error::{KnowledgeError, Result, StoreError};
pub use knowledge::{
    contained_path, KnowledgeBaseInfo, KnowledgeFile, KnowledgeLibrary, MANIFEST_FILE_NAME,
};
pub use text::Lookup;
