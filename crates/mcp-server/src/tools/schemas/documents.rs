use lens_store::{DecisionRecord, Document, DocumentSummary};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetDocumentRequest {
    /// Document name
    #[schemars(
        description = "Document name (file stem). Exact case-insensitive match first, then substring. Omit to get the catalog."
    )]
    pub name: Option<String>,

    /// Project directory path
    #[schemars(description = "Project directory path (defaults to the configured root)")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetDocumentResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<DocumentSummary>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetDecisionsRequest {
    /// Decision record name
    #[schemars(
        description = "One decision record by name (file stem): exact case-insensitive match first, then substring. Takes precedence over `topic`."
    )]
    pub name: Option<String>,

    /// Topic filter
    #[schemars(
        description = "Keep records whose name or content mentions this topic (case-insensitive). Omit for all records."
    )]
    pub topic: Option<String>,

    /// Project directory path
    #[schemars(description = "Project directory path (defaults to the configured root)")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetDecisionsResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub total: usize,
    pub decisions: Vec<DecisionRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,
}
