use lens_store::{KnowledgeBaseInfo, KnowledgeFile};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListKnowledgeRequest {
    /// Knowledge base id
    #[schemars(description = "Restrict the listing to one knowledge base id")]
    pub knowledge_base_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListKnowledgeResult {
    pub knowledge_bases: Vec<KnowledgeBaseInfo>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadKnowledgeRequest {
    /// Knowledge base id
    #[schemars(description = "Knowledge base id (see list_knowledge)")]
    pub knowledge_base_id: String,

    /// File inside the knowledge base
    #[schemars(
        description = "Path relative to the knowledge base; omit to read its index. Absolute paths and '..' are rejected."
    )]
    pub relative_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadKnowledgeResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<KnowledgeFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,
}
