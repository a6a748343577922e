//! MCP tool dispatch for Artifact Lens.
//!
//! Every tool resolves its project root, runs the file-system work on the blocking pool, and
//! renders a `[CONTENT]` document plus the typed result as structured content.

mod router;
mod service;

use super::context_doc::ContextDocBuilder;
use super::schemas::audit::GetAuditArtifactRequest;
use super::schemas::documents::{
    GetDecisionsRequest, GetDecisionsResult, GetDocumentRequest, GetDocumentResult,
};
use super::schemas::knowledge::{
    ListKnowledgeRequest, ListKnowledgeResult, ReadKnowledgeRequest, ReadKnowledgeResult,
};
use super::schemas::search::SearchRequest;
use super::schemas::status::{ProjectStatusRequest, ProjectStatusResult};
use super::schemas::suggest::{SuggestNextActionRequest, SuggestNextActionResult};
use lens_scanner::{LensConfig, StatusRegistry};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use router::error::{internal_error, DispatchError};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Artifact Lens MCP service. Holds no per-call state.
#[derive(Clone)]
pub struct ArtifactLensService {
    tool_router: ToolRouter<Self>,
    config: Arc<LensConfig>,
    registry: Arc<StatusRegistry>,
}

impl ArtifactLensService {
    /// Configuration for one call: the process configuration, or the same configuration
    /// rebased onto `raw_path` (relative paths resolve against the configured root).
    fn config_for(&self, raw_path: Option<&str>) -> Result<LensConfig, DispatchError> {
        let Some(raw) = raw_path.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(self.config.as_ref().clone());
        };
        let candidate = PathBuf::from(raw);
        let candidate = if candidate.is_absolute() {
            candidate
        } else {
            self.config.root().join(candidate)
        };
        Ok(self.config.for_root(&candidate)?)
    }

    fn registry(&self) -> Arc<StatusRegistry> {
        Arc::clone(&self.registry)
    }
}

/// Run file-system work on the blocking pool; failures come back as ready-to-return tool errors.
async fn run_blocking<T, F>(work: F) -> Result<T, CallToolResult>
where
    F: FnOnce() -> Result<T, DispatchError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.into_result()),
        Err(join) => Err(internal_error(format!("blocking task failed: {join}"))),
    }
}

/// Successful tool result: text document plus the typed result as structured content.
fn finish_with<T: Serialize>(doc: ContextDocBuilder, result: &T) -> CallToolResult {
    match serde_json::to_value(result) {
        Ok(value) => {
            let mut out = CallToolResult::success(vec![Content::text(doc.finish())]);
            out.structured_content = Some(value);
            out
        }
        Err(err) => internal_error(format!("failed to serialize result: {err}")),
    }
}
