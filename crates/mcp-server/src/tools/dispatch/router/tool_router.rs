use super::super::*;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_router};

pub(super) fn build_tool_router() -> ToolRouter<ArtifactLensService> {
    ArtifactLensService::tool_router()
}

#[tool_router]
impl ArtifactLensService {
    /// Normalized status of every workflow in the project.
    #[tool(
        description = "Status of every workflow found in the project's hidden directories: workflow kind, current phase, completion, phase detail, and the recommended next command. Also reports the number of archived runs."
    )]
    pub async fn project_status(
        &self,
        Parameters(request): Parameters<ProjectStatusRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::status::project_status(self, request).await
    }

    /// One generated document, or the catalog.
    #[tool(
        description = "Get a generated document by name (exact case-insensitive match, then substring). Without `name`, returns the catalog of documents with descriptions. Unknown names return the available names."
    )]
    pub async fn get_document(
        &self,
        Parameters(request): Parameters<GetDocumentRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::documents::get_document(self, request).await
    }

    /// Decision records, optionally filtered by topic.
    #[tool(
        description = "Get architecture decision records. `name` resolves one record (exact case-insensitive match, then substring; unknown names return the available names). `topic` keeps records whose name or content mentions it (case-insensitive)."
    )]
    pub async fn get_decisions(
        &self,
        Parameters(request): Parameters<GetDecisionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::documents::get_decisions(self, request).await
    }

    /// Audit report, findings, subsystem notes, state, or file list.
    #[tool(
        description = "Get an audit artifact: type=report (default), findings, subsystem (needs `subsystem`), state, or list. `severity` filters findings/subsystem files by keyword; `audit` selects an archived audit id."
    )]
    pub async fn get_audit_artifact(
        &self,
        Parameters(request): Parameters<GetAuditArtifactRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::audit::get_audit_artifact(self, request).await
    }

    /// Full-text search across generated artifacts.
    #[tool(
        description = "Case-sensitive search across documents, decisions, and the current audit. One hit per matching artifact with the first matching line as context. Optional regex mode and max_results."
    )]
    pub async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::search::search(self, request).await
    }

    /// Priority-sorted next actions.
    #[tool(
        description = "Suggest what to do next: unresolved audit findings, undocumented source, stale docs, workflows to resume, and more, sorted by priority (critical first)."
    )]
    pub async fn suggest_next_action(
        &self,
        Parameters(request): Parameters<SuggestNextActionRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::suggest::suggest_next_action(self, request).await
    }

    /// Knowledge base catalog.
    #[tool(
        description = "List bundled knowledge bases: id, name, version, description, index file, and file list (no content)."
    )]
    pub async fn list_knowledge(
        &self,
        Parameters(request): Parameters<ListKnowledgeRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::knowledge::list_knowledge(self, request).await
    }

    /// One knowledge base file.
    #[tool(
        description = "Read a file from a knowledge base, or its index when `relative_path` is omitted. Paths that leave the knowledge base are rejected."
    )]
    pub async fn read_knowledge(
        &self,
        Parameters(request): Parameters<ReadKnowledgeRequest>,
    ) -> Result<CallToolResult, McpError> {
        super::knowledge::read_knowledge(self, request).await
    }
}
