//! # Lens Scanner
//!
//! Discovers workflow state descriptors in a project and normalizes them into status records.
//!
//! ## Pipeline
//!
//! ```text
//! Project root
//!     │
//!     ├──> Hidden directories (.docs/, .audit/, ...)
//!     │      └─> state.json candidates (archive/ excluded)
//!     │
//!     ├──> WorkflowStateDescriptor (kind + raw fields, order preserved)
//!     │
//!     └──> StatusRegistry (kind -> phase strategy, "*" fallback)
//!            └─> NormalizedStatus
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use lens_scanner::{ArtifactScanner, ProjectLayout, StatusRegistry};
//!
//! fn main() -> lens_scanner::Result<()> {
//!     let scanner = ArtifactScanner::new(ProjectLayout::new("/path/to/project"));
//!     let statuses = StatusRegistry::builtin().aggregate(&scanner.scan()?);
//!     for status in statuses {
//!         println!("{}: {}", status.workflow_kind, status.current_phase);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod descriptor;
mod error;
mod layout;
mod scanner;
pub mod status;

pub use config::{LayoutOverrides, LensConfig, CONFIG_FILE_NAME, DEFAULT_STALE_DAYS};
pub use descriptor::{
    parse_timestamp, WorkflowStateDescriptor, LAST_UPDATED_KEYS, WORKFLOW_KIND_KEYS,
};
pub use error::{Result, ScanError};
pub use layout::{
    relative_path_string, ProjectLayout, ARCHIVE_DIR_NAME, DEFAULT_AUDIT_DIR,
    DEFAULT_DECISIONS_DIR, DEFAULT_DOCS_DIR, DEFAULT_STATE_FILE_NAME,
};
pub use scanner::ArtifactScanner;
pub use status::{Completion, NormalizedStatus, StatusRegistry};

use serde::Serialize;

/// Result of the `project status` query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStatus {
    pub workflows: Vec<NormalizedStatus>,
    pub archived_runs: usize,
}

/// Scan, normalize, and count archives in one pass.
pub fn project_status(layout: &ProjectLayout, registry: &StatusRegistry) -> Result<ProjectStatus> {
    let scanner = ArtifactScanner::new(layout.clone());
    let descriptors = scanner.scan()?;
    Ok(ProjectStatus {
        workflows: registry.aggregate(&descriptors),
        archived_runs: scanner.count_archived_runs()?,
    })
}
