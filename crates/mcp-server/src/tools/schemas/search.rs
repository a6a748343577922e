use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Text to find
    #[schemars(description = "Text to find (case-sensitive literal; a regex when regex=true)")]
    pub query: String,

    /// Search scope
    #[schemars(description = "Scope: documents, audit, decisions, or all (default)")]
    pub scope: Option<String>,

    /// Treat the query as a regular expression
    #[schemars(description = "Treat the query as a regular expression (default: false)")]
    pub regex: Option<bool>,

    /// Cap on matching artifacts
    #[schemars(description = "Maximum number of matching artifacts, 1-500 (default: no limit)")]
    pub max_results: Option<usize>,

    /// Project directory path
    #[schemars(description = "Project directory path (defaults to the configured root)")]
    pub path: Option<String>,
}
