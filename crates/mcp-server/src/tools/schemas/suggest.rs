use lens_advisor::Suggestion;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SuggestNextActionRequest {
    /// Project directory path
    #[schemars(description = "Project directory path (defaults to the configured root)")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestNextActionResult {
    pub suggestions: Vec<Suggestion>,
}
